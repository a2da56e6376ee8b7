mod logging;

pub use logging::init_cli_logging;

use thiserror::Error;

/// Errors raised while wiring up process-wide diagnostics.
#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("logging error: {0}")]
    Logging(String),
}

pub type RegistryResult<T> = std::result::Result<T, RegistryError>;
