//! Saved-schema management and the cleared-check field mapping.

use std::path::PathBuf;

use achtester_core::mapping::plausible_columns;
use achtester_core::{
    CLEARED_CHECK_FIELDS, ColumnDefinition, ImportOutcome, MappingSource, MappingStatus,
    SchemaMapping, mapping_status,
};
use clap::{Args, Subcommand};

use super::read_input;
use crate::CliError;
use crate::session::Session;

#[derive(Subcommand, Debug)]
pub enum SchemaCommand {
    /// Save the CREATE TABLE statement in FILE under its table name.
    Import {
        file: PathBuf,
        /// Replace a schema already saved for the same table.
        #[arg(long, default_value_t = false)]
        overwrite: bool,
    },
    /// List tables with a saved schema.
    List,
    /// Print the DDL, columns and mapping saved for TABLE.
    Show { table: String },
    /// Remove the DDL, structure and mapping saved for TABLE.
    Delete { table: String },
}

#[derive(Args, Debug)]
pub struct MapArgs {
    pub table: String,
    /// Bind a field to a column, e.g. `date=txn_date`.
    #[arg(long = "set", value_name = "KEY=COLUMN", value_parser = parse_assignment)]
    pub assignments: Vec<(String, String)>,
}

pub fn run(session: &mut Session, command: SchemaCommand) -> Result<(), CliError> {
    match command {
        SchemaCommand::Import { file, overwrite } => import(session, file, overwrite),
        SchemaCommand::List => {
            let tables = session.catalog.list_schemas();
            let tables = session.loaded("schemas", tables.map(Some)).unwrap_or_default();
            if tables.is_empty() {
                session.push_message("no schemas saved");
            }
            for table in tables {
                session.push_message(table);
            }
            Ok(())
        }
        SchemaCommand::Show { table } => show(session, &table),
        SchemaCommand::Delete { table } => {
            if !session.catalog.schema_exists(&table)? {
                return Err(CliError::Invalid(format!("no schema saved for {table}")));
            }
            let deleted = session.catalog.delete_schema(&table);
            if session.saved("schema", deleted).is_some() {
                session.push_message(format!("deleted schema for {table}"));
            }
            Ok(())
        }
    }
}

fn import(session: &mut Session, file: PathBuf, overwrite: bool) -> Result<(), CliError> {
    let ddl = read_input(session, &file)?;
    let outcome = session.catalog.import_schema(&ddl, overwrite);
    let Some(outcome) = session.saved("schema", outcome) else {
        return Ok(());
    };
    match outcome {
        ImportOutcome::NoTableName => Err(CliError::Invalid(
            ImportOutcome::NO_TABLE_NAME_MESSAGE.to_string(),
        )),
        ImportOutcome::ReservedName { table } => Err(CliError::Invalid(format!(
            "table name '{table}' cannot be saved: names starting with map_ or struct_ clash with saved mappings"
        ))),
        ImportOutcome::AlreadyExists { table } => {
            session.push_message(format!(
                "a schema for {table} is already saved; pass --overwrite to replace it"
            ));
            Ok(())
        }
        ImportOutcome::Saved {
            table,
            columns,
            mapping,
        } => {
            let added = session.catalog.add_table_name(&table);
            session.saved("table names", added);
            session.push_message(format!("saved schema for {table} ({} columns)", columns.len()));
            push_columns(session, &columns);
            push_mapping(session, &mapping, &columns);
            session.push_message(format!(
                "review the guess and save it with `achtester map {table}`"
            ));
            Ok(())
        }
    }
}

fn show(session: &mut Session, table: &str) -> Result<(), CliError> {
    let ddl = session.catalog.load_schema(table);
    let Some(ddl) = session.loaded("schema", ddl) else {
        return Err(CliError::Invalid(format!("no schema saved for {table}")));
    };
    session.push_message(ddl.trim_end().to_string());
    session.push_message("");

    let opened = session.catalog.open_schema(table);
    if let Some(opened) = session.loaded("schema structure", opened) {
        push_columns(session, &opened.columns);
        session.push_message(match opened.source {
            MappingSource::Saved => "saved mapping:",
            MappingSource::Reconciled => "saved mapping (adjusted to the current columns):",
            MappingSource::Guessed => "no saved mapping; suggested:",
        });
        push_mapping(session, &opened.mapping, &opened.columns);
    }
    Ok(())
}

/// Apply `--set` edits on top of the current mapping and save the result.
pub fn run_map(session: &mut Session, args: MapArgs) -> Result<(), CliError> {
    let MapArgs { table, assignments } = args;
    let Some(opened) = session.catalog.open_schema(&table)? else {
        return Err(CliError::Invalid(format!("no schema saved for {table}")));
    };
    let mut mapping = opened.mapping;
    for (key, column) in assignments {
        if !CLEARED_CHECK_FIELDS.iter().any(|field| field.key == key) {
            let keys: Vec<&str> = CLEARED_CHECK_FIELDS.iter().map(|field| field.key).collect();
            return Err(CliError::Invalid(format!(
                "unknown field '{key}'; expected one of {}",
                keys.join(", ")
            )));
        }
        if !opened.columns.iter().any(|def| def.name == column) {
            return Err(CliError::Invalid(format!("{table} has no column '{column}'")));
        }
        mapping.set(key, column);
    }

    let saved = session.catalog.save_mapping(&table, &mapping);
    if session.saved("field mapping", saved).is_some() {
        session.push_message(format!("saved mapping for {table}"));
    }
    push_mapping(session, &mapping, &opened.columns);
    Ok(())
}

/// `KEY=COLUMN`, both sides trimmed and non-empty.
pub fn parse_assignment(value: &str) -> Result<(String, String), String> {
    match value.split_once('=') {
        Some((key, column)) if !key.trim().is_empty() && !column.trim().is_empty() => {
            Ok((key.trim().to_string(), column.trim().to_string()))
        }
        _ => Err(format!("expected KEY=COLUMN, got '{value}'")),
    }
}

fn push_columns(session: &mut Session, columns: &[ColumnDefinition]) {
    session.push_message("columns:");
    for column in columns {
        session.push_message(format!("  {} {}", column.name, column.data_type));
    }
}

pub(crate) fn push_mapping(
    session: &mut Session,
    mapping: &SchemaMapping,
    columns: &[ColumnDefinition],
) {
    for field in &CLEARED_CHECK_FIELDS {
        let column = mapping.mapped(field.key).unwrap_or("(unmapped)");
        session.push_message(format!("  {} [{}] -> {column}", field.label, field.key));
    }
    match mapping_status(mapping, &CLEARED_CHECK_FIELDS, columns) {
        MappingStatus::Complete => session.push_message("mapping complete"),
        MappingStatus::Incomplete(missing) => {
            session.push_message(format!("mapping incomplete, missing: {}", missing.join(", ")));
            let candidates: Vec<&str> = plausible_columns(columns)
                .into_iter()
                .map(|column| column.name.as_str())
                .collect();
            if !candidates.is_empty() {
                session.push_message(format!("candidate columns: {}", candidates.join(", ")));
            }
        }
        MappingStatus::Stale(unknown) => {
            session.push_message(format!("mapping names unknown columns: {}", unknown.join(", ")));
        }
    }
}
