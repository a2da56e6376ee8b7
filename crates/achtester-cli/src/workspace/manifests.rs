use serde::{Deserialize, Serialize};

pub const CLI_VERSION: &str = env!("CARGO_PKG_VERSION");

/// `manifest.json` written next to the files of an output run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutManifest {
    pub out_id: String,
    pub format: String,
    pub files: Vec<String>,
    pub records: usize,
    pub requested: u64,
    pub cli_version: String,
    pub created_at: String,
}
