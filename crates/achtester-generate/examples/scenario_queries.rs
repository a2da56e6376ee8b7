use std::env;

use achtester_core::{ScenarioCounts, ScenarioKey};
use achtester_generate::generate_scenario_queries;
use tracing_subscriber::EnvFilter;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let mut args = env::args().skip(1);
    let mut table: Option<String> = None;
    let mut counts = ScenarioCounts::new();

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--table" => table = args.next(),
            "--scenario" => {
                let spec = args.next().ok_or("missing KEY=N after --scenario")?;
                let (key, count) = spec.split_once('=').ok_or("expected KEY=N")?;
                counts.set(key.parse::<ScenarioKey>()?, count.trim().parse()?);
            }
            _ => return Err(format!("unexpected argument: {arg}").into()),
        }
    }

    let table = table.ok_or("missing --table")?;
    for query in generate_scenario_queries(&table, &counts) {
        println!("-- {} ({} rows)\n{}\n", query.scenario, query.count, query.sql);
    }
    Ok(())
}
