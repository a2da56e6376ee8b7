//! Core model and helpers for the ACH payment tester.
//!
//! This crate defines the wizard data model, the `CREATE TABLE` parser and
//! field mapper, the cleared-check scenario table, validation, and the
//! key-value persistence layout shared by the generator and the CLI.

pub mod amount;
pub mod app;
pub mod catalog;
pub mod error;
pub mod mapping;
pub mod paste;
pub mod record;
pub mod scenario;
pub mod schema;
pub mod store;
pub mod validation;
pub mod wizard;

pub use amount::Amount;
pub use app::{
    AchFields, AppData, ClearedCheckFields, ClearedChecksData, DatabaseConfig, OutputFormat,
    SchemaDefinition, SchemaMethod, TestCaseConfig, TestCaseType,
};
pub use catalog::{ImportOutcome, MappingSource, OpenedSchema, SchemaCatalog};
pub use error::{Error, Result};
pub use mapping::{
    CLEARED_CHECK_FIELDS, MappingStatus, RequiredField, SchemaMapping, auto_map,
    is_mapping_complete, mapping_status, reconcile,
};
pub use paste::{PasteError, PastedRow, parse_and_check, parse_pasted_rows};
pub use record::{
    AchRecord, ClearedCheckRecord, GeneratedData, GeneratedRecord, OutputFile, OutputFiles,
    PREVIEW_LIMIT,
};
pub use scenario::{DateState, Flag, MAX_TOTAL_RECORDS, ScenarioCounts, ScenarioKey};
pub use schema::{
    ColumnDefinition, TableSchema, extract_field_defs, extract_table_name, parse_table_schema,
};
pub use store::{KeyValueStore, MemoryStore};
pub use validation::{FieldErrors, FieldId};
pub use wizard::{Step, WizardSnapshot, validate_step};
