use std::path::PathBuf;

use thiserror::Error;

use crate::models::SvType;

/// Broad failure category, used to tell bad input apart from worker trouble.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    InputSchema,
    WorkerLaunch,
    WorkerCommand,
    InternalInvariant,
    Configuration,
    Io,
}

#[derive(Error, Debug)]
pub enum SvTrainError {
    #[error("Depth-only variant not supported: {0}")]
    UnsupportedEvidenceType(String),

    #[error("Unsupported variant type in first record: {found}. Must be one of: {supported}")]
    UnsupportedVariantType { found: SvType, supported: String },

    #[error(
        "Variants must all have the same SVTYPE. First variant was {established} but found {found} for record {id}"
    )]
    InconsistentVariantType {
        established: SvType,
        found: SvType,
        id: String,
    },

    #[error("Expected variant attribute {attribute} not found for record {id}")]
    MissingRequiredAttribute { attribute: String, id: String },

    #[error("Invalid value '{value}' for attribute {attribute} in record {id}")]
    InvalidAttributeValue {
        attribute: String,
        value: String,
        id: String,
    },

    #[error("Malformed VCF at line {line}: {message}")]
    VcfParse { line: usize, message: String },

    #[error(
        "Variant source changed between passes: first pass saw {first_pass} records, second pass saw {second_pass}"
    )]
    SourceChangedBetweenPasses { first_pass: usize, second_pass: usize },

    #[error("Failed to launch worker process '{program}': {source}")]
    WorkerLaunch {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Worker command failed: {command}: {message}")]
    WorkerCommand { command: String, message: String },

    #[error("Length calculation not supported for type: {0}")]
    UntrackedVariantType(SvType),

    #[error("Streaming channel cannot {operation} while {state}")]
    ChannelState {
        operation: &'static str,
        state: &'static str,
    },

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Can't read configuration file {path}: {message}")]
    ConfigFile { path: PathBuf, message: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, SvTrainError>;

impl SvTrainError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            SvTrainError::UnsupportedEvidenceType(_)
            | SvTrainError::UnsupportedVariantType { .. }
            | SvTrainError::InconsistentVariantType { .. }
            | SvTrainError::MissingRequiredAttribute { .. }
            | SvTrainError::InvalidAttributeValue { .. }
            | SvTrainError::VcfParse { .. }
            | SvTrainError::SourceChangedBetweenPasses { .. } => ErrorKind::InputSchema,
            SvTrainError::WorkerLaunch { .. } => ErrorKind::WorkerLaunch,
            SvTrainError::WorkerCommand { .. } => ErrorKind::WorkerCommand,
            SvTrainError::UntrackedVariantType(_) | SvTrainError::ChannelState { .. } => {
                ErrorKind::InternalInvariant
            }
            SvTrainError::InvalidConfig(_) | SvTrainError::ConfigFile { .. } => {
                ErrorKind::Configuration
            }
            SvTrainError::Io(_) => ErrorKind::Io,
        }
    }

    pub(crate) fn missing_attribute(attribute: &str, id: &str) -> Self {
        SvTrainError::MissingRequiredAttribute {
            attribute: attribute.to_string(),
            id: id.to_string(),
        }
    }

    pub(crate) fn vcf(line: usize, message: impl Into<String>) -> Self {
        SvTrainError::VcfParse {
            line,
            message: message.into(),
        }
    }
}
