use std::path::PathBuf;

use chrono::{DateTime, Utc};
use tracing::warn;

use achtester_core::{Result as CoreResult, SchemaCatalog, SchemaMapping, WizardSnapshot};
use achtester_generate::{ClearedCheckTarget, NachaSettings, OutputOptions};

use crate::CliError;
use crate::workspace::{
    FileStore, WorkspacePaths, WorkspaceSettings, load_or_create_settings,
};

/// Workspace handles plus the messages a command wants to print.
pub struct Session {
    pub paths: WorkspacePaths,
    pub settings: WorkspaceSettings,
    pub catalog: SchemaCatalog<FileStore>,
    pub messages: Vec<String>,
}

impl Session {
    pub fn open(root: PathBuf) -> Result<Self, CliError> {
        let paths = WorkspacePaths::new(root);
        paths.ensure_dirs()?;
        let settings = load_or_create_settings(&paths)?;
        let catalog = SchemaCatalog::new(FileStore::new(paths.store_dir.clone()));
        Ok(Self {
            paths,
            settings,
            catalog,
            messages: Vec::new(),
        })
    }

    pub fn push_message(&mut self, message: impl Into<String>) {
        self.messages.push(message.into());
    }

    pub fn take_messages(&mut self) -> Vec<String> {
        std::mem::take(&mut self.messages)
    }

    /// Unwrap a store write; on failure tell the user and carry on in memory.
    pub fn saved<T>(&mut self, what: &str, result: CoreResult<T>) -> Option<T> {
        match result {
            Ok(value) => Some(value),
            Err(err) => {
                warn!(event = "persist_failed", what = %what, error = %err);
                self.push_message(format!("failed to save {what}"));
                None
            }
        }
    }

    /// Unwrap a store read; on failure tell the user and carry on without it.
    pub fn loaded<T>(&mut self, what: &str, result: CoreResult<Option<T>>) -> Option<T> {
        match result {
            Ok(value) => value,
            Err(err) => {
                warn!(event = "load_failed", what = %what, error = %err);
                self.push_message(format!("failed to load {what}"));
                None
            }
        }
    }

    /// Saved wizard state, or a fresh one when nothing usable is stored.
    pub fn load_snapshot(&mut self) -> WizardSnapshot {
        let result = self.catalog.load_snapshot();
        self.loaded("wizard state", result).unwrap_or_default()
    }

    pub fn save_snapshot(&mut self, snapshot: &WizardSnapshot) {
        let result = self.catalog.save_snapshot(snapshot);
        self.saved("wizard state", result);
    }

    /// Insert target for `table`: `preferred` when given, else the saved
    /// mapping, as long as it is complete for the saved structure.
    fn mapping_target(
        &mut self,
        table: &str,
        preferred: Option<&SchemaMapping>,
    ) -> Option<ClearedCheckTarget> {
        let columns = self.catalog.load_structure(table);
        let columns = self.loaded("schema structure", columns)?;
        let mapping = match preferred {
            Some(mapping) => mapping.clone(),
            None => {
                let saved = self.catalog.load_mapping(table);
                self.loaded("field mapping", saved)?
            }
        };
        ClearedCheckTarget::from_mapping(table, &mapping, &columns)
    }

    /// Render options from settings; cleared-check inserts go to `table`
    /// when it has a complete, current mapping.
    pub fn output_options(
        &mut self,
        table: &str,
        preferred: Option<&SchemaMapping>,
        generated_at: DateTime<Utc>,
    ) -> OutputOptions {
        let cleared_checks = self
            .mapping_target(table, preferred)
            .or_else(|| preferred.and_then(|_| self.mapping_target(table, None)))
            .unwrap_or_else(|| {
                ClearedCheckTarget::default_columns(self.settings.cleared_checks_table.clone())
            });
        OutputOptions {
            ach_table: self.settings.ach_table.clone(),
            cleared_checks,
            nacha: NachaSettings {
                immediate_origin: self.settings.immediate_origin.clone(),
                destination_name: self.settings.nacha_destination_name.clone(),
                origin_name: self.settings.nacha_origin_name.clone(),
            },
            generated_at,
        }
    }
}
