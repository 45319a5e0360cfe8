//! Everything that talks to the external training process.
//!
//! The worker is reached through two small capability traits so the
//! [`StreamingChannel`] state machine can run against the real Python interpreter
//! ([`PythonLauncher`]) or against an in-process fake in tests.

pub mod channel;
pub mod journal;
pub mod protocol;
pub mod python;
pub mod writer;

pub use channel::{ChannelState, StreamingChannel};
pub use python::{PythonLauncher, PythonWorker};
pub use writer::AsyncLineWriter;

use crate::errors::Result;

/// Starts a worker process.
pub trait WorkerLauncher {
    type Handle: WorkerHandle;

    fn launch(&self) -> Result<Self::Handle>;
}

/// A running worker.
pub trait WorkerHandle {
    /// Send one command line and block until the worker acknowledges it.
    fn send_synchronous_command(&mut self, command: &str) -> Result<()>;

    /// Send `command` followed by `lines` without waiting for either to land.
    fn begin_batch(&mut self, command: &str, lines: Vec<String>) -> Result<()>;

    /// Block until the batch started by [`WorkerHandle::begin_batch`] has been written
    /// and the worker has acknowledged the command that consumed it.
    fn await_batch_completion(&mut self) -> Result<()>;

    /// Stop the worker and release its streams. `forced` kills rather than waiting for a
    /// clean exit.
    fn terminate(&mut self, forced: bool) -> Result<()>;
}
