//! One-shot generation: validate the inputs, build the records and write
//! an output run without going through the wizard.

use std::path::PathBuf;

use achtester_core::validation::{
    validate_ach_fields, validate_cleared_check_fields, validate_record_count,
    validate_scenario_counts,
};
use achtester_core::{AchFields, ClearedCheckFields, OutputFormat, ScenarioKey, parse_and_check};
use achtester_generate::{
    Remediation, generate_ach, generate_cleared_checks, records_from_pasted, remediation,
};
use chrono::Utc;
use clap::{Args, Subcommand};

use super::{check, parse_scenario_count, push_preview, read_input, scenario_counts, write_output_run};
use crate::CliError;
use crate::session::Session;

#[derive(Subcommand, Debug)]
pub enum GenerateCommand {
    /// ACH payments: SQL inserts, fixed-width text and a NACHA header.
    Ach(AchArgs),
    /// Cleared checks: fixed-width text and SQL inserts.
    ClearedChecks(ClearedCheckArgs),
}

#[derive(Args, Debug)]
pub struct AchArgs {
    /// Nine-digit routing number.
    #[arg(long)]
    pub routing: String,
    #[arg(long)]
    pub account: String,
    /// Base amount in dollars; each record adds $10.
    #[arg(long)]
    pub amount: String,
    #[arg(long)]
    pub description: Option<String>,
    #[arg(long, default_value_t = 100)]
    pub count: u32,
}

#[derive(Args, Debug)]
pub struct ClearedCheckArgs {
    /// Table whose saved mapping drives the SQL column names.
    #[arg(long)]
    pub table: String,
    #[arg(long = "scenario", value_name = "KEY=N", value_parser = parse_scenario_count, required = true)]
    pub scenarios: Vec<(ScenarioKey, u32)>,
    /// Rows pasted back from the scenario queries (tab or comma separated).
    #[arg(long)]
    pub data: Option<PathBuf>,
    #[arg(long)]
    pub bank_account: Option<String>,
    #[arg(long)]
    pub check_number: Option<String>,
    /// Amount in cents, up to 10 digits.
    #[arg(long)]
    pub amount: Option<String>,
    /// MMDDYY.
    #[arg(long)]
    pub date: Option<String>,
}

pub fn run(session: &mut Session, command: GenerateCommand) -> Result<(), CliError> {
    match command {
        GenerateCommand::Ach(args) => run_ach(session, args),
        GenerateCommand::ClearedChecks(args) => run_cleared_checks(session, args),
    }
}

fn run_ach(session: &mut Session, args: AchArgs) -> Result<(), CliError> {
    let fields = AchFields {
        routing_number: args.routing,
        account_number: args.account,
        amount: args.amount,
        description: args.description.unwrap_or_default(),
    };
    let mut errors = validate_ach_fields(&fields);
    errors.merge(validate_record_count(args.count));
    check(errors)?;

    let data = generate_ach(&fields, args.count, Utc::now().date_naive())?;
    push_preview(session, &data);
    let table = session.settings.ach_table.clone();
    write_output_run(session, OutputFormat::Ach, &data, &table, None)?;
    Ok(())
}

fn run_cleared_checks(session: &mut Session, args: ClearedCheckArgs) -> Result<(), CliError> {
    let fields = ClearedCheckFields {
        bank_account_number: args.bank_account.unwrap_or_default(),
        check_number: args.check_number.unwrap_or_default(),
        amount: args.amount.unwrap_or_default(),
        date: args.date.unwrap_or_default(),
    };
    let counts = scenario_counts(&args.scenarios);
    let mut errors = validate_cleared_check_fields(&fields);
    errors.merge(validate_scenario_counts(&counts));
    check(errors)?;

    let data = match &args.data {
        Some(path) => {
            let text = read_input(session, path)?;
            let rows = parse_and_check(&text, counts.total())
                .map_err(|err| CliError::Invalid(err.to_string()))?;
            push_remediation(session, &remediation(&args.table, &counts, &rows));
            records_from_pasted(&fields, &rows)?
        }
        None => generate_cleared_checks(&fields, &counts)?,
    };
    push_preview(session, &data);
    write_output_run(session, OutputFormat::ClearedCheck, &data, &args.table, None)?;
    Ok(())
}

/// Report scenarios the pasted rows do not cover, with the SQL to fix them.
pub(crate) fn push_remediation(session: &mut Session, fix: &Remediation) {
    if fix.is_empty() {
        session.push_message("pasted data covers every requested scenario");
        return;
    }
    let missing: Vec<&str> = fix.missing.iter().map(|scenario| scenario.as_str()).collect();
    session.push_message(format!("missing scenarios: {}", missing.join(", ")));
    session.push_message(fix.updates.trim_end().to_string());
    if let Some(requery) = &fix.requery {
        session.push_message(requery.clone());
    }
}
