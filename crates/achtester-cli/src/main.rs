mod commands;
mod registry;
mod session;
mod workspace;

use std::path::PathBuf;

use achtester_core::Error as CoreError;
use achtester_generate::GenerationError;
use clap::{Parser, Subcommand};
use registry::init_cli_logging;
use session::Session;
use thiserror::Error;

use commands::generate::GenerateCommand;
use commands::schema::{MapArgs, SchemaCommand};
use commands::tables::TablesCommand;
use commands::wizard::WizardCommand;
use commands::QueriesArgs;

#[derive(Debug, Error)]
enum CliError {
    #[error("workspace error: {0}")]
    Workspace(#[from] workspace::WorkspaceError),
    #[error("registry error: {0}")]
    Registry(#[from] registry::RegistryError),
    #[error("core error: {0}")]
    Core(#[from] CoreError),
    #[error("generation error: {0}")]
    Generation(#[from] GenerationError),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("{0}")]
    Invalid(String),
}

#[derive(Parser, Debug)]
#[command(name = "achtester", version, about = "ACH and cleared-check test data generator")]
struct Cli {
    /// Workspace folder holding settings, saved schemas, outputs and logs.
    #[arg(long, global = true, default_value = ".achtester")]
    workspace: PathBuf,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Create the workspace folder and default settings.
    Init,
    /// Manage the list of known table names.
    #[command(subcommand)]
    Tables(TablesCommand),
    /// Import and manage saved CREATE TABLE schemas.
    #[command(subcommand)]
    Schema(SchemaCommand),
    /// Review or edit the cleared-check field mapping of a saved schema.
    Map(MapArgs),
    /// Print the SELECT statements for each requested scenario.
    Queries(QueriesArgs),
    /// Generate records and write output files in one go.
    #[command(subcommand)]
    Generate(GenerateCommand),
    /// Drive the step-by-step wizard.
    #[command(subcommand)]
    Wizard(WizardCommand),
}

fn main() -> Result<(), CliError> {
    let cli = Cli::parse();
    let mut session = Session::open(cli.workspace)?;
    init_cli_logging(&session.paths.cli_log_path(), &session.settings.log_level)?;
    tracing::info!(
        event = "command_started",
        workspace = %session.paths.root.display()
    );

    let result = run(&mut session, cli.command);
    for message in session.take_messages() {
        println!("{message}");
    }
    if let Err(err) = &result {
        tracing::error!(event = "command_failed", error = %err);
    }
    result
}

fn run(session: &mut Session, command: Command) -> Result<(), CliError> {
    match command {
        Command::Init => {
            // Rewrite settings so keys added since the file was created show up.
            workspace::save_settings(&session.paths, &session.settings)?;
            let root = session.paths.root.display().to_string();
            let store = session.catalog.store().dir().display().to_string();
            session.push_message(format!("workspace ready at {root}"));
            session.push_message(format!("saved schemas live in {store}"));
            Ok(())
        }
        Command::Tables(command) => commands::tables::run(session, command),
        Command::Schema(command) => commands::schema::run(session, command),
        Command::Map(args) => commands::schema::run_map(session, args),
        Command::Queries(args) => commands::run_queries(session, args),
        Command::Generate(command) => commands::generate::run(session, command),
        Command::Wizard(command) => commands::wizard::run(session, command),
    }
}
