use tracing::{debug, info, warn};

use super::protocol::{args_command, import_command, train_command};
use super::{WorkerHandle, WorkerLauncher};
use crate::batch::BatchSequence;
use crate::errors::{Result, SvTrainError};
use crate::models::RunTypeContext;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChannelState {
    Unstarted,
    Started,
    AwaitingCommandAck,
    Idle,
    AwaitingBatchAck,
    Terminated,
}

impl ChannelState {
    pub fn name(&self) -> &'static str {
        match self {
            ChannelState::Unstarted => "unstarted",
            ChannelState::Started => "started",
            ChannelState::AwaitingCommandAck => "awaiting a command acknowledgment",
            ChannelState::Idle => "idle",
            ChannelState::AwaitingBatchAck => "awaiting a batch acknowledgment",
            ChannelState::Terminated => "terminated",
        }
    }
}

/// Owns the worker for the duration of a run.
///
/// The worker is terminated at most once: explicitly through
/// [`StreamingChannel::terminate`], or forcibly when the channel is dropped on an error
/// path. Nothing is retried; any failure leaves the channel waiting to be torn down.
pub struct StreamingChannel<L: WorkerLauncher> {
    launcher: L,
    worker: Option<L::Handle>,
    state: ChannelState,
}

impl<L: WorkerLauncher> StreamingChannel<L> {
    pub fn new(launcher: L) -> Self {
        Self {
            launcher,
            worker: None,
            state: ChannelState::Unstarted,
        }
    }

    pub fn state(&self) -> ChannelState {
        self.state
    }

    pub fn start(&mut self) -> Result<()> {
        self.expect_state(ChannelState::Unstarted, "start")?;
        match self.launcher.launch() {
            Ok(worker) => {
                self.worker = Some(worker);
                self.state = ChannelState::Started;
                Ok(())
            }
            Err(e) => {
                self.state = ChannelState::Terminated;
                Err(e)
            }
        }
    }

    /// Import the worker module and hand it the run's argument dictionary.
    pub fn initialize(&mut self, module: &str, dictionary: &str) -> Result<()> {
        self.expect_state(ChannelState::Started, "initialize")?;
        self.synchronous_command(&import_command(module))?;

        let command = args_command(dictionary);
        debug!("{}", command);
        self.synchronous_command(&command)?;

        self.state = ChannelState::Idle;
        Ok(())
    }

    /// Send the training command and the batch it consumes, then wait for the worker to
    /// finish training on it. An empty batch sends nothing. Returns whether a batch was sent.
    pub fn flush_batch(
        &mut self,
        entrypoint: &str,
        batch: BatchSequence,
        context: &RunTypeContext,
    ) -> Result<bool> {
        self.expect_state(ChannelState::Idle, "flush a batch")?;
        if batch.is_empty() {
            debug!("no variants to train on; skipping training command");
            return Ok(false);
        }

        let sv_type = context.get().ok_or(SvTrainError::ChannelState {
            operation: "flush a batch",
            state: "no variant type is established",
        })?;
        let batch_size = batch.len();
        let command = train_command(entrypoint, batch_size, sv_type);
        info!(
            "Processing batch of {} variants of type {}",
            batch_size, sv_type
        );

        self.state = ChannelState::AwaitingBatchAck;
        let worker = self.worker_mut("flush a batch")?;
        worker.begin_batch(&command, batch.into_lines())?;
        worker.await_batch_completion()?;

        self.state = ChannelState::Idle;
        Ok(true)
    }

    /// Shut the worker down. A clean shutdown is used from a resting state; a channel
    /// stuck waiting on the worker is torn down forcibly.
    pub fn terminate(&mut self) -> Result<()> {
        let forced = matches!(
            self.state,
            ChannelState::AwaitingCommandAck | ChannelState::AwaitingBatchAck
        );
        self.shutdown(forced)
    }

    fn shutdown(&mut self, forced: bool) -> Result<()> {
        if self.state == ChannelState::Terminated {
            return Ok(());
        }
        self.state = ChannelState::Terminated;
        match self.worker.take() {
            Some(mut worker) => worker.terminate(forced),
            None => Ok(()),
        }
    }

    fn synchronous_command(&mut self, command: &str) -> Result<()> {
        let resting = self.state;
        self.state = ChannelState::AwaitingCommandAck;
        self.worker_mut("send a command")?
            .send_synchronous_command(command)?;
        self.state = resting;
        Ok(())
    }

    fn worker_mut(&mut self, operation: &'static str) -> Result<&mut L::Handle> {
        let state = self.state.name();
        self.worker
            .as_mut()
            .ok_or(SvTrainError::ChannelState { operation, state })
    }

    fn expect_state(&self, expected: ChannelState, operation: &'static str) -> Result<()> {
        if self.state == expected {
            Ok(())
        } else {
            Err(SvTrainError::ChannelState {
                operation,
                state: self.state.name(),
            })
        }
    }
}

impl<L: WorkerLauncher> Drop for StreamingChannel<L> {
    fn drop(&mut self) {
        if self.state != ChannelState::Terminated {
            if let Err(e) = self.shutdown(true) {
                warn!(error = %e, "failed to terminate worker");
            }
        }
    }
}
