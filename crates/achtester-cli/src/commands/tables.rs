use clap::Subcommand;

use crate::CliError;
use crate::session::Session;

#[derive(Subcommand, Debug)]
pub enum TablesCommand {
    /// Show the known table names.
    List,
    /// Register a table name.
    Add { name: String },
    /// Forget a table name. Saved schemas are left alone.
    Remove { name: String },
}

pub fn run(session: &mut Session, command: TablesCommand) -> Result<(), CliError> {
    match command {
        TablesCommand::List => {
            let names = session.catalog.table_names();
            let names = session.loaded("table names", names.map(Some)).unwrap_or_default();
            if names.is_empty() {
                session.push_message("no table names saved");
            }
            for name in names {
                session.push_message(name);
            }
        }
        TablesCommand::Add { name } => {
            let added = session.catalog.add_table_name(&name);
            match session.saved("table names", added) {
                Some(true) => session.push_message(format!("added {}", name.trim())),
                Some(false) => session.push_message(format!("'{}' is blank or already listed", name.trim())),
                None => {}
            }
        }
        TablesCommand::Remove { name } => {
            let removed = session.catalog.remove_table_name(&name);
            match session.saved("table names", removed) {
                Some(true) => session.push_message(format!("removed {}", name.trim())),
                Some(false) => session.push_message(format!("'{}' is not listed", name.trim())),
                None => {}
            }
        }
    }
    Ok(())
}
