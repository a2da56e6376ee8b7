//! The persisted step-by-step wizard. Every subcommand loads the snapshot,
//! acts on it and saves it back.

use std::path::PathBuf;

use achtester_core::{
    CLEARED_CHECK_FIELDS, ClearedChecksData, FieldId, MappingSource, SchemaMethod, Step,
    WizardSnapshot, is_mapping_complete, parse_pasted_rows,
};
use achtester_generate::{
    generate_ach, generate_cleared_checks, records_from_pasted, remediation,
};
use chrono::Utc;
use clap::Subcommand;
use tracing::info;

use super::generate::push_remediation;
use super::schema::push_mapping;
use super::{check, push_preview, push_queries, read_input, write_output_run};
use crate::CliError;
use crate::session::Session;

#[derive(Subcommand, Debug)]
pub enum WizardCommand {
    /// Show the steps, the current position and anything blocking it.
    Status,
    /// Edit a field, e.g. `set table-name checks` or `set scenario:Y_null_null 5`.
    Set { field: String, value: String },
    /// Advance when the current step validates.
    Next,
    /// Go back one step.
    Back,
    /// Jump to step N (1-based) without validation.
    Goto { step: usize },
    /// Perform the current step's action.
    Run {
        /// Pasted rows for the Provide Data step.
        #[arg(long)]
        data: Option<PathBuf>,
    },
    /// Start over. Saved schemas, mappings and table names are kept.
    Reset,
}

pub fn run(session: &mut Session, command: WizardCommand) -> Result<(), CliError> {
    let mut wizard = session.load_snapshot();
    let outcome = match command {
        WizardCommand::Status => {
            push_status(session, &wizard);
            return Ok(());
        }
        WizardCommand::Set { field, value } => {
            let field: FieldId = field.parse()?;
            wizard.update(field, &value)?;
            session.push_message(format!("{field} = {value}"));
            Ok(())
        }
        WizardCommand::Next => {
            let was_last = wizard.is_last();
            match wizard.next() {
                Ok(_) if was_last => {
                    session.push_message("final step completed");
                    Ok(())
                }
                Ok(step) => {
                    session.push_message(format!("step {}: {step}", wizard.current_step));
                    Ok(())
                }
                Err(errors) => check(errors),
            }
        }
        WizardCommand::Back => {
            match wizard.previous() {
                Some(step) => {
                    session.push_message(format!("step {}: {step}", wizard.current_step))
                }
                None => session.push_message("already at the first step"),
            }
            Ok(())
        }
        WizardCommand::Goto { step } => match wizard.go_to(step) {
            Some(current) => {
                session.push_message(format!("step {step}: {current}"));
                Ok(())
            }
            None => Err(CliError::Invalid(format!(
                "step must be between 1 and {}",
                wizard.steps().len()
            ))),
        },
        WizardCommand::Run { data } => run_step(session, &mut wizard, data),
        WizardCommand::Reset => {
            wizard.reset();
            let cleared = session.catalog.clear_snapshot();
            session.saved("wizard state", cleared);
            session.push_message("wizard reset");
            return Ok(());
        }
    };
    session.save_snapshot(&wizard);
    outcome
}

fn push_status(session: &mut Session, wizard: &WizardSnapshot) {
    let data = &wizard.app_data;
    let format = data
        .output_format()
        .map(|format| format.label())
        .unwrap_or("(none)");
    let table = match data.database_config.table_name.as_str() {
        "" => "(none)",
        name => name,
    };
    session.push_message(format!("file type: {format}, table: {table}"));

    let current = wizard.current_step.clamp(1, wizard.steps().len());
    for (idx, step) in wizard.steps().iter().enumerate() {
        let number = idx + 1;
        let marker = if number == current { ">" } else { " " };
        let done = if wizard.is_completed(number) { " (done)" } else { "" };
        session.push_message(format!("{marker} {number}. {step}{done}"));
    }
    for (field, message) in wizard.validate_current().iter() {
        session.push_message(format!("blocked: {field}: {message}"));
    }
}

/// Do what the current step is for; field-entry steps only report their
/// validation state.
fn run_step(
    session: &mut Session,
    wizard: &mut WizardSnapshot,
    data: Option<PathBuf>,
) -> Result<(), CliError> {
    let step = wizard.current();
    info!(event = "step_run", step = %step, number = wizard.current_step);
    let table = wizard.app_data.database_config.table_name.clone();
    let app = &mut wizard.app_data;

    match step {
        Step::FileSelection => {
            check(wizard.validate_current())?;
            let added = session.catalog.add_table_name(&table);
            if session.saved("table names", added) == Some(true) {
                session.push_message(format!("added {table} to the table list"));
            }
        }
        Step::SchemaDefinition => {
            let opened = session.catalog.open_schema(&table);
            match session.loaded("schema structure", opened) {
                Some(opened) => {
                    let ddl = session.catalog.load_schema(&table);
                    app.schema_definition.method = SchemaMethod::Upload;
                    app.schema_definition.file_name = Some(format!("{table}.sql"));
                    app.schema_definition.content = session.loaded("schema", ddl);
                    session.push_message(format!("loaded schema for {table}"));
                    if app.is_cleared_check() {
                        push_mapping(session, &opened.mapping, &opened.columns);
                        let accepted = opened.source != MappingSource::Saved
                            && is_mapping_complete(&opened.mapping, &CLEARED_CHECK_FIELDS);
                        if accepted {
                            let saved = session.catalog.save_mapping(&table, &opened.mapping);
                            if session.saved("field mapping", saved).is_some() {
                                session.push_message(format!("saved mapping for {table}"));
                            }
                        }
                        app.schema_definition.mapping = Some(opened.mapping);
                    }
                }
                None if app.is_cleared_check() => {
                    return Err(CliError::Invalid(format!(
                        "no schema saved for {table}; import one with `achtester schema import`"
                    )));
                }
                None => session.push_message("no saved schema; this step is optional for ACH files"),
            }
        }
        Step::ScenarioQueries => {
            push_queries(session, &table, &app.test_case_config.scenario_counts);
        }
        Step::ProvideData => {
            let Some(path) = data else {
                return Err(CliError::Invalid(
                    "pass the pasted rows with --data <FILE>".to_string(),
                ));
            };
            let text = read_input(session, &path)?;
            let rows = parse_pasted_rows(&text).map_err(|err| CliError::Invalid(err.to_string()))?;
            session.push_message(format!(
                "read {} rows ({} requested)",
                rows.len(),
                app.requested_total()
            ));
            app.cleared_checks_data = Some(ClearedChecksData {
                pasted_data: text,
                parsed_data: rows,
            });
            for (_, message) in wizard.validate_current().iter() {
                session.push_message(message.to_string());
            }
        }
        Step::DataRemediation => {
            let rows = app
                .cleared_checks_data
                .as_ref()
                .map(|data| data.parsed_data.as_slice())
                .unwrap_or_default();
            let fix = remediation(&table, &app.test_case_config.scenario_counts, rows);
            push_remediation(session, &fix);
        }
        Step::DataGeneration => {
            let generated = if app.is_cleared_check() {
                match &app.cleared_checks_data {
                    Some(pasted) if !pasted.parsed_data.is_empty() => {
                        records_from_pasted(&app.cleared_checks_fields, &pasted.parsed_data)?
                    }
                    _ => generate_cleared_checks(
                        &app.cleared_checks_fields,
                        &app.test_case_config.scenario_counts,
                    )?,
                }
            } else {
                generate_ach(
                    &app.ach_fields,
                    app.test_case_config.record_count,
                    Utc::now().date_naive(),
                )?
            };
            push_preview(session, &generated);
            app.generated_data = Some(generated);
        }
        Step::OutputGeneration => {
            let Some(format) = app.output_format() else {
                return Err(CliError::Invalid("File type is required".to_string()));
            };
            let Some(generated) = app.generated_data.clone() else {
                return Err(CliError::Invalid(
                    "Generate test data before continuing.".to_string(),
                ));
            };
            let mapping = app.schema_definition.mapping.clone();
            let (_, summary) =
                write_output_run(session, format, &generated, &table, mapping.as_ref())?;
            wizard.app_data.output_files = Some(summary);
        }
        Step::AchFields | Step::ClearedCheckFields | Step::TestCaseConfig => {
            let errors = wizard.validate_current();
            if errors.is_ok() {
                session.push_message(format!("{step} is complete; run `achtester wizard next`"));
            }
            for (field, message) in errors.iter() {
                session.push_message(format!("{field}: {message}"));
            }
        }
    }
    Ok(())
}
