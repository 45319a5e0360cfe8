//! Training arguments forwarded to the worker.
//!
//! [`TrainingArgs`] is built once per run (defaults, then an optional YAML file, then
//! command-line overrides), validated, and rendered into the single-line dictionary
//! literal the worker evaluates as `args`.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::consts::*;
use crate::errors::{Result, SvTrainError};
use crate::worker::protocol::{python_bool, python_float, python_str};

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TrainingArgs {
    /// Tab-delimited table of sample mean coverage.
    pub coverage_file: PathBuf,
    pub output_name: String,
    pub output_dir: PathBuf,
    /// Torch device, e.g. "cpu" or "cuda".
    pub device: String,
    pub random_seed: i64,
    /// Max number of genotype states; 0 lets the worker decide.
    pub num_states: u32,
    pub depth_dilution_factor: f64,
    pub eps_pe: f64,
    pub eps_sr1: f64,
    pub eps_sr2: f64,
    pub phi_pe: f64,
    pub phi_sr1: f64,
    pub phi_sr2: f64,
    pub read_length: u32,
    /// Learning rate decay constant (lower is faster).
    pub lr_decay: f64,
    pub lr_min: f64,
    pub lr_init: f64,
    pub adam_beta1: f64,
    pub adam_beta2: f64,
    pub max_iter: u32,
    pub iter_log_freq: u32,
    pub jit: bool,
}

impl Default for TrainingArgs {
    fn default() -> Self {
        Self {
            coverage_file: PathBuf::new(),
            output_name: String::new(),
            output_dir: PathBuf::new(),
            device: DEFAULT_DEVICE.to_string(),
            random_seed: DEFAULT_RANDOM_SEED,
            num_states: DEFAULT_NUM_STATES,
            depth_dilution_factor: DEFAULT_DEPTH_DILUTION_FACTOR,
            eps_pe: DEFAULT_EPS_PE,
            eps_sr1: DEFAULT_EPS_SR1,
            eps_sr2: DEFAULT_EPS_SR2,
            phi_pe: DEFAULT_PHI_PE,
            phi_sr1: DEFAULT_PHI_SR1,
            phi_sr2: DEFAULT_PHI_SR2,
            read_length: DEFAULT_READ_LENGTH,
            lr_decay: DEFAULT_LR_DECAY,
            lr_min: DEFAULT_LR_MIN,
            lr_init: DEFAULT_LR_INIT,
            adam_beta1: DEFAULT_ADAM_BETA1,
            adam_beta2: DEFAULT_ADAM_BETA2,
            max_iter: DEFAULT_MAX_ITER,
            iter_log_freq: DEFAULT_ITER_LOG_FREQ,
            jit: false,
        }
    }
}

impl TrainingArgs {
    pub fn from_yaml_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path).map_err(|e| SvTrainError::ConfigFile {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        serde_yaml::from_str(&contents).map_err(|e| SvTrainError::ConfigFile {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }

    pub fn validate(&self) -> Result<()> {
        if self.coverage_file.as_os_str().is_empty() {
            return Err(SvTrainError::InvalidConfig(
                "a coverage file is required".to_string(),
            ));
        }
        if self.output_name.is_empty() {
            return Err(SvTrainError::InvalidConfig(
                "an output name is required".to_string(),
            ));
        }
        if self.output_dir.as_os_str().is_empty() {
            return Err(SvTrainError::InvalidConfig(
                "an output directory is required".to_string(),
            ));
        }

        let floats = [
            ("depth_dilution_factor", self.depth_dilution_factor),
            ("eps_pe", self.eps_pe),
            ("eps_sr1", self.eps_sr1),
            ("eps_sr2", self.eps_sr2),
            ("phi_pe", self.phi_pe),
            ("phi_sr1", self.phi_sr1),
            ("phi_sr2", self.phi_sr2),
            ("lr_decay", self.lr_decay),
            ("lr_min", self.lr_min),
            ("lr_init", self.lr_init),
            ("adam_beta1", self.adam_beta1),
            ("adam_beta2", self.adam_beta2),
        ];
        if let Some((name, value)) = floats.iter().find(|(_, v)| !v.is_finite()) {
            return Err(SvTrainError::InvalidConfig(format!(
                "{} must be a finite number, got {}",
                name, value
            )));
        }

        for (name, value) in [
            ("read_length", self.read_length),
            ("max_iter", self.max_iter),
            ("iter_log_freq", self.iter_log_freq),
        ] {
            if value == 0 {
                return Err(SvTrainError::InvalidConfig(format!(
                    "{} must be positive",
                    name
                )));
            }
        }

        Ok(())
    }

    /// Render the worker-side `args` dictionary, pointing it at `samples_file`.
    pub fn to_python_dict(&self, samples_file: &Path) -> Result<String> {
        let coverage_file = std::path::absolute(&self.coverage_file)?;
        let samples_file = std::path::absolute(samples_file)?;
        let num_states = match self.num_states {
            0 => "None".to_string(),
            n => n.to_string(),
        };

        let entries = [
            ("coverage_file", python_str(&coverage_file.to_string_lossy())),
            ("samples_file", python_str(&samples_file.to_string_lossy())),
            ("output_name", python_str(&self.output_name)),
            ("output_dir", python_str(&self.output_dir.to_string_lossy())),
            ("device", python_str(&self.device)),
            ("num_states", num_states),
            ("random_seed", self.random_seed.to_string()),
            ("depth_dilution_factor", python_float(self.depth_dilution_factor)),
            ("eps_pe", python_float(self.eps_pe)),
            ("eps_sr1", python_float(self.eps_sr1)),
            ("eps_sr2", python_float(self.eps_sr2)),
            ("phi_pe", python_float(self.phi_pe)),
            ("phi_sr1", python_float(self.phi_sr1)),
            ("phi_sr2", python_float(self.phi_sr2)),
            ("read_length", self.read_length.to_string()),
            ("lr_decay", python_float(self.lr_decay)),
            ("lr_min", python_float(self.lr_min)),
            ("lr_init", python_float(self.lr_init)),
            ("adam_beta1", python_float(self.adam_beta1)),
            ("adam_beta2", python_float(self.adam_beta2)),
            ("max_iter", self.max_iter.to_string()),
            ("iter_log_freq", self.iter_log_freq.to_string()),
            ("jit", python_bool(self.jit).to_string()),
        ];

        let body = entries
            .iter()
            .map(|(key, value)| format!("{}: {}", python_str(key), value))
            .collect::<Vec<_>>()
            .join(", ");

        Ok(format!("{{ {} }}", body))
    }
}

/// How to reach the worker process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkerSettings {
    pub python_executable: String,
    pub module: String,
    pub entrypoint: String,
    /// Append all protocol traffic to this file.
    pub journal: Option<PathBuf>,
}

impl Default for WorkerSettings {
    fn default() -> Self {
        Self {
            python_executable: DEFAULT_PYTHON_EXECUTABLE.to_string(),
            module: WORKER_MODULE.to_string(),
            entrypoint: WORKER_ENTRYPOINT.to_string(),
            journal: None,
        }
    }
}

impl WorkerSettings {
    pub fn journal_path(args: &TrainingArgs) -> PathBuf {
        args.output_dir
            .join(format!("{}{}", args.output_name, JOURNAL_SUFFIX))
    }
}
