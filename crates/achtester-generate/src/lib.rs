//! Record, query and file generation for the ACH payment tester.
//!
//! Everything here is a pure function of its inputs: the wizard state
//! goes in and preview records, SQL text or file contents come out.

pub mod errors;
pub mod output;
pub mod queries;
pub mod records;

pub use errors::{GenerationError, GenerationResult};
pub use output::{
    ClearedCheckTarget, NachaSettings, OutputOptions, build_output_files, escape_sql,
    format_amount, format_date, output_file_names, output_summary,
};
pub use queries::{
    Remediation, ScenarioQuery, generate_scenario_queries, missing_scenarios, remediation,
    scenario_predicate,
};
pub use records::{generate_ach, generate_cleared_checks, records_from_pasted};
