//! Saved schemas, mappings, table names and the wizard snapshot, laid out
//! over a [`KeyValueStore`].
//!
//! Key layout:
//! - `schema_<table>`: raw DDL text
//! - `schema_struct_<table>`: JSON array of `{name, type}`
//! - `schema_map_<table>`: JSON object, field key to column name
//! - `tableNames`: JSON array of known table names
//! - `achPaymentTesterData`: the wizard snapshot

use tracing::{info, warn};

use crate::error::Result;
use crate::mapping::{CLEARED_CHECK_FIELDS, SchemaMapping, auto_map, reconcile, stale_columns};
use crate::schema::{ColumnDefinition, parse_table_schema};
use crate::store::KeyValueStore;
use crate::wizard::WizardSnapshot;

pub const SCHEMA_PREFIX: &str = "schema_";
pub const STRUCTURE_PREFIX: &str = "schema_struct_";
pub const MAPPING_PREFIX: &str = "schema_map_";
pub const TABLE_NAMES_KEY: &str = "tableNames";
pub const SNAPSHOT_KEY: &str = "achPaymentTesterData";

/// Result of importing uploaded DDL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImportOutcome {
    /// Nothing was persisted.
    NoTableName,
    /// A schema for `table` is already saved and overwrite was not requested.
    AlreadyExists { table: String },
    /// `table` would share a key with another table's structure or mapping.
    ReservedName { table: String },
    Saved {
        table: String,
        columns: Vec<ColumnDefinition>,
        /// Fresh auto-mapped guess; the user reviews it before it is saved.
        mapping: SchemaMapping,
    },
}

impl ImportOutcome {
    pub const NO_TABLE_NAME_MESSAGE: &'static str =
        "Could not extract table name. Schema not saved.";
}

/// Where the mapping of an [`OpenedSchema`] came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MappingSource {
    Saved,
    /// Saved, but stale entries were dropped and the gaps re-guessed.
    Reconciled,
    Guessed,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OpenedSchema {
    pub columns: Vec<ColumnDefinition>,
    pub mapping: SchemaMapping,
    pub source: MappingSource,
}

pub struct SchemaCatalog<S> {
    store: S,
}

impl<S: KeyValueStore> SchemaCatalog<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn save_schema(&self, table: &str, ddl: &str) -> Result<()> {
        self.store.set(&schema_key(table), ddl)
    }

    pub fn load_schema(&self, table: &str) -> Result<Option<String>> {
        self.store.get(&schema_key(table))
    }

    pub fn schema_exists(&self, table: &str) -> Result<bool> {
        Ok(self.load_schema(table)?.is_some())
    }

    pub fn save_structure(&self, table: &str, columns: &[ColumnDefinition]) -> Result<()> {
        let json = serde_json::to_string(columns)?;
        self.store.set(&structure_key(table), &json)
    }

    pub fn load_structure(&self, table: &str) -> Result<Option<Vec<ColumnDefinition>>> {
        self.load_json(&structure_key(table))
    }

    pub fn save_mapping(&self, table: &str, mapping: &SchemaMapping) -> Result<()> {
        let json = serde_json::to_string(mapping)?;
        self.store.set(&mapping_key(table), &json)?;
        info!(event = "mapping_saved", table = %table, fields = mapping.iter().count());
        Ok(())
    }

    pub fn load_mapping(&self, table: &str) -> Result<Option<SchemaMapping>> {
        self.load_json(&mapping_key(table))
    }

    /// Remove the DDL, structure and mapping saved for `table`.
    pub fn delete_schema(&self, table: &str) -> Result<()> {
        self.store.remove(&schema_key(table))?;
        self.store.remove(&structure_key(table))?;
        self.store.remove(&mapping_key(table))?;
        info!(event = "schema_deleted", table = %table);
        Ok(())
    }

    /// Tables with saved DDL, sorted.
    pub fn list_schemas(&self) -> Result<Vec<String>> {
        Ok(self
            .store
            .list_keys()?
            .into_iter()
            .filter(|key| !key.starts_with(STRUCTURE_PREFIX) && !key.starts_with(MAPPING_PREFIX))
            .filter_map(|key| key.strip_prefix(SCHEMA_PREFIX).map(str::to_string))
            .filter(|table| !table.is_empty())
            .collect())
    }

    pub fn table_names(&self) -> Result<Vec<String>> {
        Ok(self.load_json(TABLE_NAMES_KEY)?.unwrap_or_default())
    }

    /// Returns false when the name is blank or already registered.
    pub fn add_table_name(&self, name: &str) -> Result<bool> {
        let name = name.trim();
        let mut names = self.table_names()?;
        if name.is_empty() || names.iter().any(|existing| existing == name) {
            return Ok(false);
        }
        names.push(name.to_string());
        self.store
            .set(TABLE_NAMES_KEY, &serde_json::to_string(&names)?)?;
        Ok(true)
    }

    pub fn remove_table_name(&self, name: &str) -> Result<bool> {
        let mut names = self.table_names()?;
        let before = names.len();
        names.retain(|existing| existing != name.trim());
        if names.len() == before {
            return Ok(false);
        }
        self.store
            .set(TABLE_NAMES_KEY, &serde_json::to_string(&names)?)?;
        Ok(true)
    }

    /// Parse uploaded DDL and save it under its table name.
    ///
    /// New and overwritten schemas always get a fresh auto-mapped guess, and
    /// any mapping saved for the old structure is dropped so the user has to
    /// map again. The guess is persisted only through
    /// [`SchemaCatalog::save_mapping`].
    pub fn import_schema(&self, ddl: &str, overwrite: bool) -> Result<ImportOutcome> {
        let Some(schema) = parse_table_schema(ddl) else {
            return Ok(ImportOutcome::NoTableName);
        };
        if is_reserved_table_name(&schema.table_name) {
            warn!(event = "schema_name_reserved", table = %schema.table_name);
            return Ok(ImportOutcome::ReservedName {
                table: schema.table_name,
            });
        }
        if !overwrite && self.schema_exists(&schema.table_name)? {
            return Ok(ImportOutcome::AlreadyExists {
                table: schema.table_name,
            });
        }

        self.save_schema(&schema.table_name, ddl)?;
        self.save_structure(&schema.table_name, &schema.columns)?;
        self.store.remove(&mapping_key(&schema.table_name))?;
        info!(
            event = "schema_saved",
            table = %schema.table_name,
            columns = schema.columns.len(),
            overwrite
        );

        let mapping = auto_map(&CLEARED_CHECK_FIELDS, &schema.columns);
        Ok(ImportOutcome::Saved {
            table: schema.table_name,
            columns: schema.columns,
            mapping,
        })
    }

    /// Structure and mapping for a saved table.
    ///
    /// A saved mapping that names columns the structure no longer declares
    /// is reconciled against it; with no saved mapping an auto-mapped guess
    /// is offered.
    pub fn open_schema(&self, table: &str) -> Result<Option<OpenedSchema>> {
        let Some(columns) = self.load_structure(table)? else {
            return Ok(None);
        };
        let (mapping, source) = match self.load_mapping(table)? {
            Some(saved) if stale_columns(&saved, &CLEARED_CHECK_FIELDS, &columns).is_empty() => {
                (saved, MappingSource::Saved)
            }
            Some(saved) => {
                warn!(event = "mapping_stale", table = %table);
                (
                    reconcile(&saved, &CLEARED_CHECK_FIELDS, &columns),
                    MappingSource::Reconciled,
                )
            }
            None => (auto_map(&CLEARED_CHECK_FIELDS, &columns), MappingSource::Guessed),
        };
        Ok(Some(OpenedSchema {
            columns,
            mapping,
            source,
        }))
    }

    pub fn save_snapshot(&self, snapshot: &WizardSnapshot) -> Result<()> {
        let json = serde_json::to_string(snapshot)?;
        self.store.set(SNAPSHOT_KEY, &json)
    }

    pub fn load_snapshot(&self) -> Result<Option<WizardSnapshot>> {
        self.load_json(SNAPSHOT_KEY)
    }

    /// Drop the saved snapshot; schemas, mappings and table names are kept.
    pub fn clear_snapshot(&self) -> Result<()> {
        self.store.remove(SNAPSHOT_KEY)
    }

    fn load_json<T: serde::de::DeserializeOwned>(&self, key: &str) -> Result<Option<T>> {
        match self.store.get(key)? {
            Some(raw) => Ok(Some(serde_json::from_str(&raw)?)),
            None => Ok(None),
        }
    }
}

/// Names such as `map_checks` whose schema key would be read back as the
/// mapping or structure of another table.
pub fn is_reserved_table_name(table: &str) -> bool {
    let key = schema_key(table);
    key.starts_with(STRUCTURE_PREFIX) || key.starts_with(MAPPING_PREFIX)
}

pub fn schema_key(table: &str) -> String {
    format!("{SCHEMA_PREFIX}{table}")
}

pub fn structure_key(table: &str) -> String {
    format!("{STRUCTURE_PREFIX}{table}")
}

pub fn mapping_key(table: &str) -> String {
    format!("{MAPPING_PREFIX}{table}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;

    const DDL: &str = "CREATE TABLE checks (id INT, bank_account_number VARCHAR(20), \
                       check_number VARCHAR(10), amount DECIMAL(10,2), txn_date DATE)";

    #[test]
    fn import_rejects_text_without_table() {
        let catalog = SchemaCatalog::new(MemoryStore::new());
        let outcome = catalog.import_schema("SELECT 1", false).unwrap();
        assert_eq!(outcome, ImportOutcome::NoTableName);
        assert!(catalog.store().list_keys().unwrap().is_empty());
    }

    #[test]
    fn import_saves_then_requires_overwrite() {
        let catalog = SchemaCatalog::new(MemoryStore::new());
        let ImportOutcome::Saved { table, columns, .. } = catalog.import_schema(DDL, false).unwrap()
        else {
            panic!("expected saved outcome");
        };
        assert_eq!(table, "checks");
        assert_eq!(columns.len(), 5);
        assert_eq!(catalog.load_structure("checks").unwrap().unwrap().len(), 5);

        assert_eq!(
            catalog.import_schema(DDL, false).unwrap(),
            ImportOutcome::AlreadyExists {
                table: "checks".to_string()
            }
        );
        assert!(matches!(
            catalog.import_schema(DDL, true).unwrap(),
            ImportOutcome::Saved { .. }
        ));
    }

    #[test]
    fn import_refuses_names_that_clash_with_catalog_keys() {
        let catalog = SchemaCatalog::new(MemoryStore::new());
        catalog.import_schema(DDL, false).unwrap();
        let mut mapping = SchemaMapping::new();
        mapping.set("date", "txn_date");
        catalog.save_mapping("checks", &mapping).unwrap();

        for ddl in [
            "CREATE TABLE map_checks (id INT)",
            "CREATE TABLE struct_checks (id INT)",
        ] {
            assert!(matches!(
                catalog.import_schema(ddl, true).unwrap(),
                ImportOutcome::ReservedName { .. }
            ));
        }
        assert_eq!(catalog.load_mapping("checks").unwrap(), Some(mapping));
        assert_eq!(catalog.list_schemas().unwrap(), vec!["checks"]);
        assert!(!is_reserved_table_name("mapping_checks"));
        assert!(is_reserved_table_name("map_"));
    }

    #[test]
    fn list_schemas_skips_structure_and_mapping_keys() {
        let catalog = SchemaCatalog::new(MemoryStore::new());
        catalog.import_schema(DDL, false).unwrap();
        catalog.save_mapping("checks", &SchemaMapping::new()).unwrap();
        catalog.save_schema("payments", "CREATE TABLE payments (id INT)").unwrap();
        assert_eq!(catalog.list_schemas().unwrap(), vec!["checks", "payments"]);

        catalog.delete_schema("checks").unwrap();
        assert_eq!(catalog.list_schemas().unwrap(), vec!["payments"]);
        assert_eq!(catalog.load_mapping("checks").unwrap(), None);
    }

    #[test]
    fn table_names_are_unique() {
        let catalog = SchemaCatalog::new(MemoryStore::new());
        assert!(catalog.add_table_name("checks").unwrap());
        assert!(!catalog.add_table_name("checks").unwrap());
        assert!(!catalog.add_table_name("  ").unwrap());
        assert!(catalog.add_table_name("payments").unwrap());
        assert!(catalog.remove_table_name("checks").unwrap());
        assert!(!catalog.remove_table_name("checks").unwrap());
        assert_eq!(catalog.table_names().unwrap(), vec!["payments"]);
    }

    #[test]
    fn open_schema_prefers_saved_mapping() {
        let catalog = SchemaCatalog::new(MemoryStore::new());
        catalog.import_schema(DDL, false).unwrap();
        let opened = catalog.open_schema("checks").unwrap().unwrap();
        assert_eq!(opened.source, MappingSource::Guessed);
        assert_eq!(opened.mapping.get("date"), None);

        let mut mapping = opened.mapping;
        mapping.set("date", "txn_date");
        catalog.save_mapping("checks", &mapping).unwrap();
        let opened = catalog.open_schema("checks").unwrap().unwrap();
        assert_eq!(opened.source, MappingSource::Saved);
        assert_eq!(opened.mapping.get("date"), Some("txn_date"));
    }

    #[test]
    fn overwrite_forces_remapping() {
        let catalog = SchemaCatalog::new(MemoryStore::new());
        catalog.import_schema(DDL, false).unwrap();
        let mut mapping = SchemaMapping::new();
        mapping.set("date", "txn_date");
        catalog.save_mapping("checks", &mapping).unwrap();

        catalog.import_schema(DDL, true).unwrap();
        assert_eq!(catalog.load_mapping("checks").unwrap(), None);
    }

    #[test]
    fn open_schema_reconciles_stale_mapping() {
        let catalog = SchemaCatalog::new(MemoryStore::new());
        catalog.import_schema(DDL, false).unwrap();
        let mut mapping = SchemaMapping::new();
        mapping.set("date", "txn_date");
        catalog.save_mapping("checks", &mapping).unwrap();

        let changed = [
            ColumnDefinition::new("check_number", "VARCHAR(10)"),
            ColumnDefinition::new("issued_on", "DATE"),
        ];
        catalog.save_structure("checks", &changed).unwrap();
        let opened = catalog.open_schema("checks").unwrap().unwrap();
        assert_eq!(opened.source, MappingSource::Reconciled);
        assert_eq!(opened.mapping.get("date"), None);
        assert_eq!(opened.mapping.get("checkNumber"), Some("check_number"));
    }
}
