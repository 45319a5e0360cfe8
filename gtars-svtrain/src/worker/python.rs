use std::io::{self, BufRead, BufReader};
use std::process::{Child, ChildStdout, Command, Stdio};

use tracing::{debug, warn};

use super::journal::Journal;
use super::protocol::{Ack, BOOTSTRAP};
use super::writer::AsyncLineWriter;
use super::{WorkerHandle, WorkerLauncher};
use crate::config::WorkerSettings;
use crate::errors::{Result, SvTrainError};

/// Launches the Python interpreter running the command loop in [`BOOTSTRAP`].
#[derive(Debug, Clone)]
pub struct PythonLauncher {
    settings: WorkerSettings,
}

impl PythonLauncher {
    pub fn new(settings: WorkerSettings) -> Self {
        Self { settings }
    }

    pub fn settings(&self) -> &WorkerSettings {
        &self.settings
    }
}

impl WorkerLauncher for PythonLauncher {
    type Handle = PythonWorker;

    fn launch(&self) -> Result<PythonWorker> {
        let program = self.settings.python_executable.clone();
        let launch_error = |source: io::Error| SvTrainError::WorkerLaunch {
            program: program.clone(),
            source,
        };

        let mut journal = match &self.settings.journal {
            Some(path) => Some(Journal::create(path)?),
            None => None,
        };

        let mut child = Command::new(&program)
            .arg("-u")
            .arg("-c")
            .arg(BOOTSTRAP)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::inherit())
            .spawn()
            .map_err(launch_error)?;
        debug!(pid = child.id(), program = %program, "started worker");

        let stdin = child.stdin.take();
        let stdout = child.stdout.take();
        let (stdin, stdout) = match (stdin, stdout) {
            (Some(stdin), Some(stdout)) => (stdin, stdout),
            _ => {
                let _ = child.kill();
                let _ = child.wait();
                return Err(launch_error(io::Error::other("worker streams unavailable")));
            }
        };

        let writer = match AsyncLineWriter::spawn(stdin) {
            Ok(writer) => writer,
            Err(e) => {
                let _ = child.kill();
                let _ = child.wait();
                return Err(launch_error(e));
            }
        };

        if let Some(journal) = journal.as_mut() {
            journal.event(&format!("started {} (pid {})", program, child.id()))?;
        }

        Ok(PythonWorker {
            child,
            writer,
            acks: BufReader::new(stdout),
            journal,
            pending_batch: None,
        })
    }
}

pub struct PythonWorker {
    child: Child,
    writer: AsyncLineWriter,
    acks: BufReader<ChildStdout>,
    journal: Option<Journal>,
    pending_batch: Option<String>,
}

impl PythonWorker {
    fn log(&mut self, record: impl FnOnce(&mut Journal) -> io::Result<()>) {
        if let Some(journal) = self.journal.as_mut() {
            if let Err(e) = record(journal) {
                warn!(path = %journal.path().display(), error = %e, "journal write failed; disabling journal");
                self.journal = None;
            }
        }
    }

    fn stream_error(command: &str, e: io::Error) -> SvTrainError {
        SvTrainError::WorkerCommand {
            command: command.to_string(),
            message: format!("lost connection to worker: {}", e),
        }
    }

    fn read_ack(&mut self, command: &str) -> Result<()> {
        let mut reply = String::new();
        let read = self.acks.read_line(&mut reply)?;
        if read == 0 {
            let status = match self.child.try_wait() {
                Ok(Some(status)) => status.to_string(),
                _ => "still running".to_string(),
            };
            return Err(SvTrainError::WorkerCommand {
                command: command.to_string(),
                message: format!("worker closed its output before acknowledging ({})", status),
            });
        }
        self.log(|j| j.incoming(&reply));

        match Ack::parse(&reply) {
            Some(Ack::Success) => Ok(()),
            Some(Ack::Failure(message)) => Err(SvTrainError::WorkerCommand {
                command: command.to_string(),
                message,
            }),
            None => Err(SvTrainError::WorkerCommand {
                command: command.to_string(),
                message: format!("unexpected reply from worker: {}", reply.trim_end()),
            }),
        }
    }
}

impl WorkerHandle for PythonWorker {
    fn send_synchronous_command(&mut self, command: &str) -> Result<()> {
        self.await_batch_completion()?;

        self.log(|j| j.outgoing(command));
        self.writer
            .write_line(command)
            .and_then(|_| self.writer.sync())
            .map_err(|e| Self::stream_error(command, e))?;
        self.read_ack(command)
    }

    fn begin_batch(&mut self, command: &str, lines: Vec<String>) -> Result<()> {
        // one batch in flight at a time
        self.await_batch_completion()?;

        let count = lines.len();
        self.log(|j| j.outgoing(command));
        self.log(|j| j.outgoing(&format!("[{} batch lines]", count)));
        self.writer
            .write_line(command)
            .and_then(|_| self.writer.write_lines(lines))
            .map_err(|e| Self::stream_error(command, e))?;
        self.pending_batch = Some(command.to_string());
        Ok(())
    }

    fn await_batch_completion(&mut self) -> Result<()> {
        let Some(command) = self.pending_batch.take() else {
            return Ok(());
        };
        self.writer
            .sync()
            .map_err(|e| Self::stream_error(&command, e))?;
        self.read_ack(&command)
    }

    fn terminate(&mut self, forced: bool) -> Result<()> {
        if forced {
            // the worker may be blocked reading a batch that will never finish
            let _ = self.child.kill();
        }
        let closed = self.writer.close();
        let status = self.child.wait()?;
        self.log(|j| j.event(&format!("terminated ({})", status)));
        debug!(status = %status, forced, "worker terminated");

        if !forced {
            closed?;
            if !status.success() {
                warn!(status = %status, "worker exited abnormally");
            }
        }
        Ok(())
    }
}
