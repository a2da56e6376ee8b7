use thiserror::Error;

/// Core error type shared across achtester crates.
#[derive(Debug, Error)]
pub enum Error {
    /// The key-value store could not read or write a key.
    #[error("store error: {0}")]
    Store(String),
    /// A persisted value could not be decoded.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
    /// A field identifier or value was rejected.
    #[error("invalid field: {0}")]
    InvalidField(String),
    /// A scenario key outside the fixed table.
    #[error("unknown scenario: {0}")]
    UnknownScenario(String),
    /// Catch-all error for unexpected failures.
    #[error("other error: {0}")]
    Other(String),
}

/// Convenience alias for results returned by achtester crates.
pub type Result<T> = std::result::Result<T, Error>;
