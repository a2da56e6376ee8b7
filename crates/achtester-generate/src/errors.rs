use thiserror::Error;

use achtester_core::OutputFormat;

/// Errors emitted while generating records or rendering output files.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum GenerationError {
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("no records to render; generate data first")]
    NoRecords,
    #[error("{format} output needs {expected} records")]
    KindMismatch {
        format: OutputFormat,
        expected: &'static str,
    },
}

pub type GenerationResult<T> = Result<T, GenerationError>;
