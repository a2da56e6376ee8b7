//! Subcommand handlers. Each one works on a [`Session`] and reports back
//! through [`Session::push_message`].

pub mod generate;
pub mod schema;
pub mod tables;
pub mod wizard;

use std::path::{Path, PathBuf};

use achtester_core::validation::validate_scenario_counts;
use achtester_core::{
    FieldErrors, GeneratedData, GeneratedRecord, OutputFiles, OutputFormat, ScenarioCounts,
    ScenarioKey, SchemaMapping,
};
use achtester_generate::{build_output_files, generate_scenario_queries, output_summary};
use chrono::Utc;
use clap::Args;
use tracing::{info, warn};

use crate::CliError;
use crate::session::Session;
use crate::workspace::{CLI_VERSION, OutManifest, new_artifact_id, write_bytes_atomic, write_json_atomic};

/// Uploads above this size are accepted with a warning.
pub const SOFT_UPLOAD_LIMIT: u64 = 1024 * 1024;

#[derive(Args, Debug)]
pub struct QueriesArgs {
    /// Table the queries select from.
    #[arg(long)]
    pub table: String,
    /// Rows wanted per scenario, e.g. `Y_null_null=5`.
    #[arg(long = "scenario", value_name = "KEY=N", value_parser = parse_scenario_count, required = true)]
    pub scenarios: Vec<(ScenarioKey, u32)>,
}

pub fn run_queries(session: &mut Session, args: QueriesArgs) -> Result<(), CliError> {
    let counts = scenario_counts(&args.scenarios);
    check(validate_scenario_counts(&counts))?;
    push_queries(session, &args.table, &counts);
    Ok(())
}

pub(crate) fn push_queries(session: &mut Session, table: &str, counts: &ScenarioCounts) {
    for query in generate_scenario_queries(table, counts) {
        session.push_message(format!(
            "-- {} ({}): {} rows",
            query.scenario,
            query.scenario.label(),
            query.count
        ));
        session.push_message(query.sql);
        session.push_message("");
    }
}

/// clap parser for `KEY=N` scenario arguments.
pub fn parse_scenario_count(value: &str) -> Result<(ScenarioKey, u32), String> {
    let (key, count) = value
        .split_once('=')
        .ok_or_else(|| format!("expected KEY=N, got '{value}'"))?;
    let key: ScenarioKey = key.trim().parse().map_err(|err| format!("{err}"))?;
    let count = count
        .trim()
        .parse::<u32>()
        .map_err(|_| format!("count for {key} must be a whole number"))?;
    Ok((key, count))
}

/// Later duplicates of a key override earlier ones.
pub fn scenario_counts(pairs: &[(ScenarioKey, u32)]) -> ScenarioCounts {
    pairs.iter().copied().collect()
}

/// Turn validation messages into a command error.
pub fn check(errors: FieldErrors) -> Result<(), CliError> {
    if errors.is_ok() {
        return Ok(());
    }
    let messages: Vec<String> = errors
        .iter()
        .map(|(field, message)| format!("{field}: {message}"))
        .collect();
    Err(CliError::Invalid(messages.join("\n")))
}

/// Read a user-supplied text file, warning when it is unusually large.
pub fn read_input(session: &mut Session, path: &Path) -> Result<String, CliError> {
    let size = std::fs::metadata(path)?.len();
    if size > SOFT_UPLOAD_LIMIT {
        warn!(event = "large_input", path = %path.display(), bytes = size);
        session.push_message(format!(
            "warning: {} is larger than 1MB; continuing anyway",
            path.display()
        ));
    }
    Ok(std::fs::read_to_string(path)?)
}

pub(crate) fn push_preview(session: &mut Session, data: &GeneratedData) {
    session.push_message(format!(
        "generated {} preview records ({} requested)",
        data.records.len(),
        data.total_count
    ));
    for record in &data.records {
        let line = match record {
            GeneratedRecord::Ach(ach) => format!(
                "  #{} {} {} {} {} {}",
                ach.id,
                ach.routing_number,
                ach.account_number,
                ach.amount,
                ach.transaction_date,
                ach.description
            ),
            GeneratedRecord::ClearedCheck(check) => format!(
                "  {} check {} {} {}{}",
                check.bank_account_number,
                check.check_number,
                check.amount,
                check.date,
                check
                    .scenario
                    .map(|scenario| format!(" [{scenario}]"))
                    .unwrap_or_default()
            ),
        };
        session.push_message(line);
    }
}

/// Render the files for `format` into a fresh `out/<id>/` folder with a
/// `manifest.json` beside them.
pub(crate) fn write_output_run(
    session: &mut Session,
    format: OutputFormat,
    data: &GeneratedData,
    table: &str,
    mapping: Option<&SchemaMapping>,
) -> Result<(PathBuf, OutputFiles), CliError> {
    let generated_at = Utc::now();
    let options = session.output_options(table, mapping, generated_at);
    let files = build_output_files(format, data, &options)?;

    let out_id = new_artifact_id("out");
    let dir = session.paths.out_dir.join(&out_id);
    for file in &files {
        write_bytes_atomic(&dir.join(&file.filename), file.content.as_bytes())?;
    }
    let summary = output_summary(&files, generated_at);
    let manifest = OutManifest {
        out_id: out_id.clone(),
        format: format.to_string(),
        files: summary.files.clone(),
        records: data.records.len(),
        requested: data.total_count,
        cli_version: CLI_VERSION.to_string(),
        created_at: summary.generated_at.clone(),
    };
    write_json_atomic(&dir.join("manifest.json"), &manifest)?;
    info!(
        event = "output_written",
        out_id = %out_id,
        format = %format,
        files = files.len()
    );

    session.push_message(format!("wrote {} files to {}", files.len(), dir.display()));
    for name in &summary.files {
        session.push_message(format!("  {name}"));
    }
    Ok((dir, summary))
}

#[cfg(test)]
pub(crate) fn temp_session() -> Session {
    let root = std::env::temp_dir().join(format!("achtester-cli-{}", uuid::Uuid::new_v4()));
    match Session::open(root) {
        Ok(session) => session,
        Err(err) => panic!("open session: {err}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_scenario_arguments() {
        assert_eq!(
            parse_scenario_count("Y_null_null=5"),
            Ok((ScenarioKey::YesNullNull, 5))
        );
        assert!(parse_scenario_count("Y_null_null").is_err());
        assert!(parse_scenario_count("bogus=1").is_err());
        assert!(parse_scenario_count("N_null_null=-1").is_err());
    }

    #[test]
    fn queries_print_one_statement_per_scenario() {
        let mut session = temp_session();
        let args = QueriesArgs {
            table: "checks".to_string(),
            scenarios: vec![(ScenarioKey::YesNullNull, 5), (ScenarioKey::NoSetSet, 3)],
        };
        run_queries(&mut session, args).expect("queries");
        let messages = session.take_messages();
        let statements: Vec<&String> = messages
            .iter()
            .filter(|line| line.starts_with("SELECT"))
            .collect();
        assert_eq!(statements.len(), 2);
        assert!(statements[0].ends_with("FETCH FIRST 5 ROWS ONLY;"));
        assert!(statements[1].ends_with("FETCH FIRST 3 ROWS ONLY;"));
        let _ = std::fs::remove_dir_all(&session.paths.root);
    }

    #[test]
    fn zero_counts_are_rejected() {
        let mut session = temp_session();
        let args = QueriesArgs {
            table: "checks".to_string(),
            scenarios: vec![(ScenarioKey::YesNullNull, 0)],
        };
        let err = run_queries(&mut session, args).unwrap_err();
        assert!(err.to_string().contains("Select at least one scenario"));
        let _ = std::fs::remove_dir_all(&session.paths.root);
    }
}
