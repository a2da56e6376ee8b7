use serde::{Deserialize, Serialize};

use super::atomic::write_bytes_atomic;
use super::{WorkspacePaths, WorkspaceResult};

/// `config/settings.toml`. Missing keys fall back to their defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorkspaceSettings {
    /// Filter used when `RUST_LOG` is unset.
    pub log_level: String,
    /// Table the ACH `INSERT` statements target.
    pub ach_table: String,
    /// Fallback table for cleared-check inserts when no mapping applies.
    pub cleared_checks_table: String,
    pub nacha_destination_name: String,
    pub nacha_origin_name: String,
    /// Ten characters, right-aligned in the NACHA header.
    pub immediate_origin: String,
}

impl Default for WorkspaceSettings {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            ach_table: "ach_payments".to_string(),
            cleared_checks_table: "cleared_checks".to_string(),
            nacha_destination_name: "TEST BANK".to_string(),
            nacha_origin_name: "ACH PAYMENT TESTER".to_string(),
            immediate_origin: "1234567890".to_string(),
        }
    }
}

pub fn load_or_create_settings(paths: &WorkspacePaths) -> WorkspaceResult<WorkspaceSettings> {
    let path = paths.settings_path();
    if path.exists() {
        let content = std::fs::read_to_string(&path)?;
        let settings: WorkspaceSettings = toml::from_str(&content)?;
        return Ok(settings);
    }

    let settings = WorkspaceSettings::default();
    save_settings(paths, &settings)?;
    Ok(settings)
}

pub fn save_settings(paths: &WorkspacePaths, settings: &WorkspaceSettings) -> WorkspaceResult<()> {
    let path = paths.settings_path();
    let encoded = toml::to_string_pretty(settings)?;
    write_bytes_atomic(&path, encoded.as_bytes())
}
