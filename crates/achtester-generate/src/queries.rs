//! SELECT statements that fetch existing rows for each cleared-check
//! scenario, and the remediation templates for scenarios the pasted data
//! does not cover.

use std::collections::BTreeSet;

use tracing::info;

use achtester_core::{DateState, PastedRow, ScenarioCounts, ScenarioKey, paste::PASTED_COLUMNS};

/// One generated statement for the user to run against their database.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScenarioQuery {
    pub scenario: ScenarioKey,
    pub count: u32,
    pub sql: String,
}

/// `WHERE` clause body selecting rows in `scenario`.
pub fn scenario_predicate(scenario: ScenarioKey) -> String {
    format!(
        "unclaimed_property_yn = '{}' AND cleared_date {} AND void_date {}",
        scenario.flag().as_char(),
        null_test(scenario.cleared_date()),
        null_test(scenario.void_date())
    )
}

/// One query per scenario with a non-zero count, in table order.
pub fn generate_scenario_queries(table: &str, counts: &ScenarioCounts) -> Vec<ScenarioQuery> {
    let queries: Vec<ScenarioQuery> = counts
        .active()
        .map(|(scenario, count)| ScenarioQuery {
            scenario,
            count,
            sql: scenario_query(table, scenario, count),
        })
        .collect();
    info!(
        event = "scenario_queries_generated",
        table = %table,
        queries = queries.len()
    );
    queries
}

fn scenario_query(table: &str, scenario: ScenarioKey, count: u32) -> String {
    let mut sql = format!(
        "SELECT {}\nFROM {table}\nWHERE {}\n",
        PASTED_COLUMNS.join(", "),
        scenario_predicate(scenario)
    );
    let order: Vec<&str> = [
        ("cleared_date", scenario.cleared_date()),
        ("void_date", scenario.void_date()),
    ]
    .into_iter()
    .filter(|(_, state)| *state == DateState::Set)
    .map(|(column, _)| column)
    .collect();
    if !order.is_empty() {
        let order: Vec<String> = order.iter().map(|column| format!("{column} DESC")).collect();
        sql.push_str(&format!("ORDER BY {}\n", order.join(", ")));
    }
    sql.push_str(&format!("FETCH FIRST {count} ROWS ONLY;"));
    sql
}

fn null_test(state: DateState) -> &'static str {
    match state {
        DateState::Null => "IS NULL",
        DateState::Set => "IS NOT NULL",
    }
}

/// Templates for bringing missing scenarios into the table.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Remediation {
    pub missing: Vec<ScenarioKey>,
    /// Commented `UPDATE` templates, one block per missing scenario.
    pub updates: String,
    /// Query to re-run once the updates are applied; `None` when nothing is missing.
    pub requery: Option<String>,
}

impl Remediation {
    pub fn is_empty(&self) -> bool {
        self.missing.is_empty()
    }
}

/// Requested scenarios that no pasted row satisfies, in table order.
pub fn missing_scenarios(counts: &ScenarioCounts, rows: &[PastedRow]) -> Vec<ScenarioKey> {
    let present: BTreeSet<ScenarioKey> = rows.iter().filter_map(PastedRow::scenario).collect();
    counts
        .active()
        .map(|(scenario, _)| scenario)
        .filter(|scenario| !present.contains(scenario))
        .collect()
}

pub fn remediation(table: &str, counts: &ScenarioCounts, rows: &[PastedRow]) -> Remediation {
    let missing = missing_scenarios(counts, rows);
    if missing.is_empty() {
        return Remediation::default();
    }

    let updates = missing
        .iter()
        .map(|scenario| update_template(table, *scenario))
        .collect::<Vec<_>>()
        .join("\n");
    let requery = format!(
        "SELECT {} FROM {table}; -- Re-query all data after running the UPDATE statements.",
        PASTED_COLUMNS.join(", ")
    );
    info!(
        event = "remediation_generated",
        table = %table,
        missing = missing.len()
    );
    Remediation {
        missing,
        updates,
        requery: Some(requery),
    }
}

fn update_template(table: &str, scenario: ScenarioKey) -> String {
    let date_value = |state: DateState| match state {
        DateState::Null => "NULL",
        DateState::Set => "SYSDATE",
    };
    format!(
        "-- Missing scenario: {scenario} ({})\n\
         -- Pick a check to repurpose and run:\n\
         -- UPDATE {table} SET unclaimed_property_yn = '{}', cleared_date = {}, void_date = {} WHERE check_number = <check_number>;\n",
        scenario.label(),
        scenario.flag().as_char(),
        date_value(scenario.cleared_date()),
        date_value(scenario.void_date())
    )
}
