use std::fmt;
use std::str::FromStr;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::mapping::SchemaMapping;
use crate::paste::PastedRow;
use crate::record::{GeneratedData, OutputFiles};
use crate::scenario::ScenarioCounts;
use crate::validation::FieldId;

/// File type the wizard produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "kebab-case")]
pub enum OutputFormat {
    Ach,
    AchReturn,
    ClearedCheck,
    OriginationReject,
}

impl OutputFormat {
    pub const ALL: [OutputFormat; 4] = [
        OutputFormat::Ach,
        OutputFormat::AchReturn,
        OutputFormat::ClearedCheck,
        OutputFormat::OriginationReject,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            OutputFormat::Ach => "ach",
            OutputFormat::AchReturn => "ach-return",
            OutputFormat::ClearedCheck => "cleared-check",
            OutputFormat::OriginationReject => "origination-reject",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            OutputFormat::Ach => "ACH",
            OutputFormat::AchReturn => "ACH Return",
            OutputFormat::ClearedCheck => "Cleared Checks",
            OutputFormat::OriginationReject => "Origination Reject",
        }
    }

    pub fn is_cleared_check(self) -> bool {
        self == OutputFormat::ClearedCheck
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OutputFormat {
    type Err = Error;

    fn from_str(value: &str) -> std::result::Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|format| format.as_str().eq_ignore_ascii_case(value.trim()))
            .ok_or_else(|| Error::InvalidField(format!("unknown output format: {value}")))
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum TestCaseType {
    #[default]
    Basic,
    Batch,
    Error,
    Custom,
}

impl FromStr for TestCaseType {
    type Err = Error;

    fn from_str(value: &str) -> std::result::Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "basic" => Ok(TestCaseType::Basic),
            "batch" => Ok(TestCaseType::Batch),
            "error" => Ok(TestCaseType::Error),
            "custom" => Ok(TestCaseType::Custom),
            other => Err(Error::InvalidField(format!("unknown test case type: {other}"))),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum SchemaMethod {
    #[default]
    Upload,
    Manual,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct DatabaseConfig {
    pub table_name: String,
    pub output_format: Option<OutputFormat>,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            table_name: String::new(),
            output_format: Some(OutputFormat::Ach),
        }
    }
}

/// Schema text chosen for the configured table, plus the mapping in effect.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct SchemaDefinition {
    pub method: SchemaMethod,
    #[serde(default)]
    pub file_name: Option<String>,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub mapping: Option<SchemaMapping>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct AchFields {
    pub routing_number: String,
    pub account_number: String,
    pub amount: String,
    pub description: String,
}

/// Base values for cleared checks; blanks are filled with synthetic defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ClearedCheckFields {
    pub bank_account_number: String,
    pub check_number: String,
    /// Whole cents, up to 10 digits.
    pub amount: String,
    /// `MMDDYY`.
    pub date: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct TestCaseConfig {
    pub test_case_type: TestCaseType,
    pub record_count: u32,
    #[serde(default)]
    pub scenario_counts: ScenarioCounts,
}

impl Default for TestCaseConfig {
    fn default() -> Self {
        Self {
            test_case_type: TestCaseType::Basic,
            record_count: 100,
            scenario_counts: ScenarioCounts::new(),
        }
    }
}

/// Rows pasted back after running the scenario queries.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ClearedChecksData {
    pub pasted_data: String,
    pub parsed_data: Vec<PastedRow>,
}

/// Everything the user has entered so far.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct AppData {
    pub database_config: DatabaseConfig,
    #[serde(default)]
    pub schema_definition: SchemaDefinition,
    #[serde(default)]
    pub ach_fields: AchFields,
    #[serde(default)]
    pub cleared_checks_fields: ClearedCheckFields,
    #[serde(default)]
    pub test_case_config: TestCaseConfig,
    #[serde(default)]
    pub generated_data: Option<GeneratedData>,
    #[serde(default)]
    pub output_files: Option<OutputFiles>,
    #[serde(default)]
    pub cleared_checks_data: Option<ClearedChecksData>,
}

impl AppData {
    pub fn output_format(&self) -> Option<OutputFormat> {
        self.database_config.output_format
    }

    pub fn is_cleared_check(&self) -> bool {
        self.output_format().is_some_and(OutputFormat::is_cleared_check)
    }

    /// Apply a single text edit to the field it names.
    ///
    /// Values are stored as typed where the field has a type; text fields
    /// keep the raw input so validation can report on it.
    pub fn update(&mut self, field: FieldId, value: &str) -> Result<()> {
        match field {
            FieldId::TableName => self.database_config.table_name = value.trim().to_string(),
            FieldId::OutputFormat => {
                self.database_config.output_format = if value.trim().is_empty() {
                    None
                } else {
                    Some(value.parse()?)
                };
            }
            FieldId::RoutingNumber => self.ach_fields.routing_number = value.to_string(),
            FieldId::AccountNumber => self.ach_fields.account_number = value.to_string(),
            FieldId::AchAmount => self.ach_fields.amount = value.to_string(),
            FieldId::Description => self.ach_fields.description = value.to_string(),
            FieldId::BankAccountNumber => {
                self.cleared_checks_fields.bank_account_number = value.to_string()
            }
            FieldId::CheckNumber => self.cleared_checks_fields.check_number = value.to_string(),
            FieldId::ClearedAmount => self.cleared_checks_fields.amount = value.to_string(),
            FieldId::ClearedDate => self.cleared_checks_fields.date = value.to_string(),
            FieldId::TestCaseType => self.test_case_config.test_case_type = value.parse()?,
            FieldId::RecordCount => self.test_case_config.record_count = parse_count(field, value)?,
            FieldId::ScenarioCount(key) => {
                let count = parse_count(field, value)?;
                self.test_case_config.scenario_counts.set(key, count);
            }
            FieldId::Schema
            | FieldId::Mapping
            | FieldId::ScenarioCounts
            | FieldId::PastedData
            | FieldId::GeneratedData => {
                return Err(Error::InvalidField(format!("{field} cannot be set directly")));
            }
        }
        Ok(())
    }

    /// Requested record total for the active flow.
    pub fn requested_total(&self) -> u64 {
        if self.is_cleared_check() {
            self.test_case_config.scenario_counts.total()
        } else {
            u64::from(self.test_case_config.record_count)
        }
    }
}

fn parse_count(field: FieldId, value: &str) -> Result<u32> {
    let value = value.trim();
    if value.is_empty() {
        return Ok(0);
    }
    value
        .parse::<u32>()
        .map_err(|_| Error::InvalidField(format!("{field} expects a whole number, got '{value}'")))
}
