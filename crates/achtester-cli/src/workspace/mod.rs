mod atomic;
mod file_store;
mod ids;
mod manifests;
mod paths;
mod settings;

pub use atomic::{write_bytes_atomic, write_json_atomic};
pub use file_store::FileStore;
pub use ids::new_artifact_id;
pub use manifests::{CLI_VERSION, OutManifest};
pub use paths::WorkspacePaths;
pub use settings::{WorkspaceSettings, load_or_create_settings, save_settings};

use std::io;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum WorkspaceError {
    #[error("io error: {0}")]
    Io(#[from] io::Error),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("toml decode error: {0}")]
    TomlDecode(#[from] toml::de::Error),
    #[error("toml encode error: {0}")]
    TomlEncode(#[from] toml::ser::Error),
    #[error("invalid workspace state: {0}")]
    Invalid(String),
}

pub type WorkspaceResult<T> = Result<T, WorkspaceError>;
