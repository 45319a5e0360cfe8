//! Two-pass training run.
//!
//! 1. Write the sample list, launch the worker and send it the run arguments.
//! 2. First pass: validate every record and count them.
//! 3. Second pass: encode every record into the batch.
//! 4. Hand the batch to the worker for training, then shut the worker down.
//!
//! The worker is released on every exit path; on error no summary is produced.

use std::io::Write;
use std::path::Path;

use indicatif::{ProgressBar, ProgressStyle};
use tempfile::NamedTempFile;
use tracing::info;

use crate::batch::{BatchAccumulator, BatchSequence};
use crate::config::{TrainingArgs, WorkerSettings};
use crate::consts::*;
use crate::encode::encode_record;
use crate::errors::{Result, SvTrainError};
use crate::models::{RunTypeContext, SvType};
use crate::source::VariantSource;
use crate::validate::validate_record;
use crate::worker::{StreamingChannel, WorkerLauncher};

/// Outcome of a completed run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrainingSummary {
    pub num_records: usize,
    pub sv_type: Option<SvType>,
    /// Whether a training command was sent; false when no records were found.
    pub trained: bool,
}

pub struct SvTrainer {
    args: TrainingArgs,
    settings: WorkerSettings,
}

impl SvTrainer {
    pub fn new(args: TrainingArgs, settings: WorkerSettings) -> Result<Self> {
        args.validate()?;
        Ok(Self { args, settings })
    }

    pub fn args(&self) -> &TrainingArgs {
        &self.args
    }

    pub fn run<S, L>(&self, source: &S, launcher: L) -> Result<TrainingSummary>
    where
        S: VariantSource + ?Sized,
        L: WorkerLauncher,
    {
        let samples_file = write_sample_list(source.sample_names(), &self.args.output_name)?;

        let mut channel = StreamingChannel::new(launcher);
        channel.start()?;
        let dictionary = self.args.to_python_dict(samples_file.path())?;
        channel.initialize(&self.settings.module, &dictionary)?;

        let mut context = RunTypeContext::new();
        let num_records = first_pass(source, &mut context)?;
        info!(
            "First pass complete: {} records of type {}",
            num_records,
            context.get().map_or("-", |t| t.name())
        );

        let batch = second_pass(source, &context, num_records)?;

        let trained = channel.flush_batch(&self.settings.entrypoint, batch, &context)?;
        channel.terminate()?;

        Ok(TrainingSummary {
            num_records,
            sv_type: context.get().cloned(),
            trained,
        })
    }
}

/// Validate every record, establishing the run's SV type. Returns the record count.
pub fn first_pass<S>(source: &S, context: &mut RunTypeContext) -> Result<usize>
where
    S: VariantSource + ?Sized,
{
    let mut num_records = 0;
    for record in source.records()? {
        validate_record(&record?, context)?;
        num_records += 1;
    }
    Ok(num_records)
}

/// Encode every record into a batch sized from the first pass.
pub fn second_pass<S>(
    source: &S,
    context: &RunTypeContext,
    num_records: usize,
) -> Result<BatchSequence>
where
    S: VariantSource + ?Sized,
{
    let mut batch = BatchAccumulator::with_expected(num_records);

    let bar = ProgressBar::new(num_records as u64);
    bar.set_style(
        ProgressStyle::with_template(
            "[{elapsed_precise}] {bar:40.cyan/blue} {pos:>7}/{len:7} {msg}",
        )
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("##-"),
    );
    bar.set_message("encoding variants");

    for record in source.records()? {
        let record = record?;
        // a record the first pass never saw means the source changed underneath us
        let sv_type = match context.get() {
            Some(sv_type) if batch.len() < num_records => sv_type,
            _ => {
                bar.abandon();
                return Err(SvTrainError::SourceChangedBetweenPasses {
                    first_pass: num_records,
                    second_pass: batch.len() + 1,
                });
            }
        };
        if record.sv_type != *sv_type {
            bar.abandon();
            return Err(SvTrainError::InconsistentVariantType {
                established: sv_type.clone(),
                found: record.sv_type,
                id: record.id,
            });
        }
        batch.push(encode_record(&record, sv_type)?);
        bar.inc(1);
    }
    bar.finish_and_clear();

    if batch.len() != num_records {
        return Err(SvTrainError::SourceChangedBetweenPasses {
            first_pass: num_records,
            second_pass: batch.len(),
        });
    }

    Ok(batch.finish())
}

/// Write sample names, one per line, to a temporary file that lives as long as the
/// returned handle.
pub fn write_sample_list(samples: &[String], output_name: &str) -> Result<NamedTempFile> {
    let mut file = tempfile::Builder::new()
        .prefix(&format!("{}{}", output_name, SAMPLES_FILE_SUFFIX))
        .suffix(TEMP_FILE_EXTENSION)
        .tempfile()?;
    for sample in samples {
        writeln!(file, "{}", sample)?;
    }
    file.flush()?;
    Ok(file)
}

/// Convenience wrapper for callers holding a VCF path.
pub fn train_from_vcf<L: WorkerLauncher>(
    vcf: &Path,
    args: TrainingArgs,
    settings: WorkerSettings,
    launcher: L,
) -> Result<TrainingSummary> {
    let source = crate::vcf::VcfSource::open(vcf)?;
    SvTrainer::new(args, settings)?.run(&source, launcher)
}
