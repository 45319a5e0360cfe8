//! # Structural variant genotyper training
//!
//! Streams structural variant (SV) evidence from a VCF to an external, long-running
//! genotyper training process. A run traverses the input twice:
//!
//! - the first pass validates every record (no depth-only evidence, a single supported
//!   SV type per file) and counts them;
//! - the second pass encodes each record into a tab-separated batch line.
//!
//! The finished batch is written to the worker over its stdin, followed by a wait for
//! the worker to acknowledge that training on it completed.
//!
//! ```rust,ignore
//! use gtars_svtrain::{PythonLauncher, SvTrainer, TrainingArgs, VcfSource, WorkerSettings};
//!
//! let args = TrainingArgs {
//!     coverage_file: "coverage.tsv".into(),
//!     output_name: "cohort".to_string(),
//!     output_dir: "models".into(),
//!     ..Default::default()
//! };
//! let settings = WorkerSettings::default();
//! let source = VcfSource::open("deletions.vcf.gz")?;
//! let summary = SvTrainer::new(args, settings.clone())?
//!     .run(&source, PythonLauncher::new(settings))?;
//! ```

pub mod batch;
pub mod config;
pub mod consts;
pub mod encode;
pub mod errors;
pub mod models;
pub mod source;
pub mod train;
pub mod validate;
pub mod vcf;
pub mod worker;

// re-exports
pub use batch::{BatchAccumulator, BatchSequence};
pub use config::{TrainingArgs, WorkerSettings};
pub use errors::{ErrorKind, Result, SvTrainError};
pub use models::{Genotype, RunTypeContext, SvType, VariantRecord};
pub use source::{MemorySource, VariantSource};
pub use train::{SvTrainer, TrainingSummary, train_from_vcf};
pub use vcf::VcfSource;
pub use worker::{PythonLauncher, StreamingChannel, WorkerHandle, WorkerLauncher};
