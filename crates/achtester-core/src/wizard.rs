//! Step sequencing for the data-generation wizard.
//!
//! Steps are numbered from 1. The flow (which steps, in which order) is
//! picked by the selected output format; only forward moves are gated by
//! validation.

use std::collections::BTreeSet;
use std::fmt;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::app::{AppData, OutputFormat};
use crate::error::Result;
use crate::paste::PasteError;
use crate::validation::{
    FieldErrors, FieldId, validate_ach_fields, validate_cleared_check_fields,
    validate_file_selection, validate_mapping, validate_record_count, validate_scenario_counts,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum Step {
    FileSelection,
    SchemaDefinition,
    AchFields,
    ClearedCheckFields,
    TestCaseConfig,
    ScenarioQueries,
    ProvideData,
    DataRemediation,
    DataGeneration,
    OutputGeneration,
}

impl Step {
    pub fn title(self) -> &'static str {
        match self {
            Step::FileSelection => "File Selection",
            Step::SchemaDefinition => "Schema Definition",
            Step::AchFields => "ACH Fields",
            Step::ClearedCheckFields => "Cleared Checks Fields",
            Step::TestCaseConfig => "Test Case Configuration",
            Step::ScenarioQueries => "Scenario Queries",
            Step::ProvideData => "Provide Data",
            Step::DataRemediation => "Data Remediation",
            Step::DataGeneration => "Data Generation",
            Step::OutputGeneration => "Output Generation",
        }
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.title())
    }
}

pub const ACH_FLOW: [Step; 6] = [
    Step::FileSelection,
    Step::SchemaDefinition,
    Step::AchFields,
    Step::TestCaseConfig,
    Step::DataGeneration,
    Step::OutputGeneration,
];

pub const CLEARED_CHECK_FLOW: [Step; 9] = [
    Step::FileSelection,
    Step::TestCaseConfig,
    Step::ScenarioQueries,
    Step::ProvideData,
    Step::DataRemediation,
    Step::SchemaDefinition,
    Step::ClearedCheckFields,
    Step::DataGeneration,
    Step::OutputGeneration,
];

pub fn flow_for(format: Option<OutputFormat>) -> &'static [Step] {
    if format.is_some_and(OutputFormat::is_cleared_check) {
        &CLEARED_CHECK_FLOW
    } else {
        &ACH_FLOW
    }
}

/// Messages that block leaving `step` forwards; empty means it may advance.
pub fn validate_step(step: Step, data: &AppData) -> FieldErrors {
    let cleared = data.is_cleared_check();
    match step {
        Step::FileSelection => validate_file_selection(&data.database_config),
        Step::SchemaDefinition if cleared => {
            let mut errors = FieldErrors::new();
            if data.schema_definition.content.is_none() {
                errors.insert(FieldId::Schema, "Please upload or select a schema file.");
            }
            errors.merge(validate_mapping(data.schema_definition.mapping.as_ref()));
            errors
        }
        Step::SchemaDefinition => FieldErrors::new(),
        Step::AchFields => validate_ach_fields(&data.ach_fields),
        Step::ClearedCheckFields => validate_cleared_check_fields(&data.cleared_checks_fields),
        Step::TestCaseConfig if cleared => {
            validate_scenario_counts(&data.test_case_config.scenario_counts)
        }
        Step::TestCaseConfig => validate_record_count(data.test_case_config.record_count),
        Step::ProvideData => {
            let mut errors = FieldErrors::new();
            let requested = data.requested_total();
            let problem = match &data.cleared_checks_data {
                None => Some(PasteError::Empty),
                Some(pasted) if pasted.pasted_data.trim().is_empty() => Some(PasteError::Empty),
                Some(pasted) if pasted.parsed_data.len() as u64 != requested => {
                    Some(PasteError::CountMismatch {
                        pasted: pasted.parsed_data.len(),
                        requested,
                    })
                }
                Some(_) => None,
            };
            if let Some(problem) = problem {
                errors.insert(FieldId::PastedData, problem.to_string());
            }
            errors
        }
        Step::DataGeneration => {
            let mut errors = FieldErrors::new();
            let generated = data
                .generated_data
                .as_ref()
                .is_some_and(|generated| !generated.records.is_empty());
            if !generated {
                errors.insert(FieldId::GeneratedData, "Generate test data before continuing.");
            }
            errors
        }
        Step::ScenarioQueries | Step::DataRemediation | Step::OutputGeneration => {
            FieldErrors::new()
        }
    }
}

/// Whole-wizard state persisted between runs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct WizardSnapshot {
    pub app_data: AppData,
    /// 1-based index into the active flow.
    pub current_step: usize,
    pub completed_steps: BTreeSet<usize>,
}

impl Default for WizardSnapshot {
    fn default() -> Self {
        Self {
            app_data: AppData::default(),
            current_step: 1,
            completed_steps: BTreeSet::new(),
        }
    }
}

impl WizardSnapshot {
    pub fn steps(&self) -> &'static [Step] {
        flow_for(self.app_data.output_format())
    }

    /// The current step; an out-of-range index from an old snapshot is
    /// clamped into the active flow.
    pub fn current(&self) -> Step {
        let steps = self.steps();
        let idx = self.current_step.clamp(1, steps.len()) - 1;
        steps[idx]
    }

    pub fn is_last(&self) -> bool {
        self.current_step >= self.steps().len()
    }

    pub fn is_completed(&self, number: usize) -> bool {
        self.completed_steps.contains(&number)
    }

    pub fn validate_current(&self) -> FieldErrors {
        validate_step(self.current(), &self.app_data)
    }

    /// Advance one step when the current step validates.
    ///
    /// At the last step this only marks it completed.
    pub fn next(&mut self) -> std::result::Result<Step, FieldErrors> {
        let errors = self.validate_current();
        if !errors.is_ok() {
            return Err(errors);
        }
        self.completed_steps.insert(self.current_step);
        if !self.is_last() {
            self.move_to(self.current_step + 1);
        }
        Ok(self.current())
    }

    /// Go back one step; `None` at the first step.
    pub fn previous(&mut self) -> Option<Step> {
        if self.current_step <= 1 {
            return None;
        }
        self.move_to(self.current_step - 1);
        Some(self.current())
    }

    /// Jump to step `number` (1-based) without validation.
    pub fn go_to(&mut self, number: usize) -> Option<Step> {
        if number == 0 || number > self.steps().len() {
            return None;
        }
        self.move_to(number);
        Some(self.current())
    }

    /// Apply a field edit. Switching between flows restarts at step 1 of the
    /// new flow and forgets completions past it.
    pub fn update(&mut self, field: FieldId, value: &str) -> Result<()> {
        let before = self.steps();
        self.app_data.update(field, value)?;
        if field == FieldId::OutputFormat && self.steps() != before {
            self.completed_steps.retain(|number| *number == 1);
            self.current_step = 1;
            info!(
                event = "flow_changed",
                format = ?self.app_data.output_format(),
                steps = self.steps().len()
            );
        }
        Ok(())
    }

    pub fn reset(&mut self) {
        *self = Self::default();
        info!(event = "wizard_reset");
    }

    fn move_to(&mut self, number: usize) {
        let from = self.current();
        self.current_step = number;
        info!(
            event = "step_changed",
            from = %from,
            to = %self.current(),
            step = number
        );
    }
}
