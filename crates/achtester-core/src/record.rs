use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::amount::Amount;
use crate::scenario::ScenarioKey;

/// Most records a generator materializes for preview and output.
pub const PREVIEW_LIMIT: usize = 10;

/// One mock ACH payment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct AchRecord {
    pub id: u32,
    pub routing_number: String,
    pub account_number: String,
    pub amount: Amount,
    pub description: String,
    /// `YYYY-MM-DD`.
    pub transaction_date: String,
    pub status: String,
}

/// One mock cleared check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ClearedCheckRecord {
    pub bank_account_number: String,
    pub check_number: String,
    pub amount: Amount,
    /// `YYYY-MM-DD` when known; anything else is rendered with the default date.
    pub date: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scenario: Option<ScenarioKey>,
}

/// Record shape resolved once at generation time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum GeneratedRecord {
    Ach(AchRecord),
    ClearedCheck(ClearedCheckRecord),
}

/// Preview records plus the total the user asked for.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct GeneratedData {
    pub records: Vec<GeneratedRecord>,
    pub total_count: u64,
}

/// Rendered file ready to be written or downloaded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputFile {
    pub filename: String,
    pub content: String,
}

/// Names of the files produced by the last output run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct OutputFiles {
    pub files: Vec<String>,
    pub generated_at: String,
}
