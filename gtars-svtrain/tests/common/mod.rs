#![allow(dead_code)]

use std::collections::HashMap;
use std::io;
use std::sync::{Arc, Mutex};

use gtars_svtrain::errors::{Result, SvTrainError};
use gtars_svtrain::{Genotype, SvType, VariantRecord, WorkerHandle, WorkerLauncher};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WorkerEvent {
    Launched,
    Command(String),
    Batch { command: String, lines: Vec<String> },
    BatchCompleted,
    Terminated { forced: bool },
}

/// In-process stand-in for the Python worker that records everything it is sent.
#[derive(Clone, Default)]
pub struct FakeLauncher {
    events: Arc<Mutex<Vec<WorkerEvent>>>,
    fail_on: Option<String>,
    fail_launch: bool,
}

impl FakeLauncher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reject any command containing `needle`.
    pub fn failing_on(needle: &str) -> Self {
        Self {
            fail_on: Some(needle.to_string()),
            ..Self::default()
        }
    }

    pub fn unlaunchable() -> Self {
        Self {
            fail_launch: true,
            ..Self::default()
        }
    }

    pub fn events(&self) -> Vec<WorkerEvent> {
        self.events.lock().unwrap().clone()
    }

    pub fn commands(&self) -> Vec<String> {
        self.events()
            .into_iter()
            .filter_map(|event| match event {
                WorkerEvent::Command(command) | WorkerEvent::Batch { command, .. } => {
                    Some(command)
                }
                _ => None,
            })
            .collect()
    }

    pub fn terminations(&self) -> Vec<bool> {
        self.events()
            .into_iter()
            .filter_map(|event| match event {
                WorkerEvent::Terminated { forced } => Some(forced),
                _ => None,
            })
            .collect()
    }
}

impl WorkerLauncher for FakeLauncher {
    type Handle = FakeWorker;

    fn launch(&self) -> Result<FakeWorker> {
        if self.fail_launch {
            return Err(SvTrainError::WorkerLaunch {
                program: "fake-python".to_string(),
                source: io::Error::new(io::ErrorKind::NotFound, "no such file or directory"),
            });
        }
        self.events.lock().unwrap().push(WorkerEvent::Launched);
        Ok(FakeWorker {
            events: Arc::clone(&self.events),
            fail_on: self.fail_on.clone(),
            pending: None,
        })
    }
}

pub struct FakeWorker {
    events: Arc<Mutex<Vec<WorkerEvent>>>,
    fail_on: Option<String>,
    pending: Option<String>,
}

impl FakeWorker {
    fn record(&self, event: WorkerEvent) {
        self.events.lock().unwrap().push(event);
    }

    fn check(&self, command: &str) -> Result<()> {
        match &self.fail_on {
            Some(needle) if command.contains(needle.as_str()) => Err(SvTrainError::WorkerCommand {
                command: command.to_string(),
                message: "ValueError('rejected by fake worker')".to_string(),
            }),
            _ => Ok(()),
        }
    }
}

impl WorkerHandle for FakeWorker {
    fn send_synchronous_command(&mut self, command: &str) -> Result<()> {
        self.record(WorkerEvent::Command(command.to_string()));
        self.check(command)
    }

    fn begin_batch(&mut self, command: &str, lines: Vec<String>) -> Result<()> {
        self.record(WorkerEvent::Batch {
            command: command.to_string(),
            lines,
        });
        self.pending = Some(command.to_string());
        Ok(())
    }

    fn await_batch_completion(&mut self) -> Result<()> {
        if let Some(command) = self.pending.take() {
            self.check(&command)?;
            self.record(WorkerEvent::BatchCompleted);
        }
        Ok(())
    }

    fn terminate(&mut self, forced: bool) -> Result<()> {
        self.record(WorkerEvent::Terminated { forced });
        Ok(())
    }
}

pub fn genotype(values: &[(&str, &str)]) -> Genotype {
    Genotype {
        attributes: values
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect(),
    }
}

pub fn record(id: &str, sv_type: SvType, info: &[(&str, &str)], genotypes: Vec<Genotype>) -> VariantRecord {
    VariantRecord {
        id: id.to_string(),
        contig: "chr1".to_string(),
        start: 100,
        end: 150,
        sv_type,
        info: info
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect::<HashMap<_, _>>(),
        genotypes,
    }
}

pub fn evidence(pe: &str, sr1: &str, sr2: &str, ncn: &str, cnlp: &str) -> Genotype {
    genotype(&[
        ("GT", "0/1"),
        ("PE", pe),
        ("SR1", sr1),
        ("SR2", sr2),
        ("NCN", ncn),
        ("CNLP", cnlp),
    ])
}
