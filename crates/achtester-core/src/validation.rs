use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use crate::amount::Amount;
use crate::app::{AchFields, ClearedCheckFields, DatabaseConfig};
use crate::error::Error;
use crate::mapping::{CLEARED_CHECK_FIELDS, SchemaMapping, is_mapping_complete};
use crate::scenario::{MAX_TOTAL_RECORDS, ScenarioCounts, ScenarioKey};

/// Typed identifier for every user-editable or validated field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum FieldId {
    TableName,
    OutputFormat,
    Schema,
    Mapping,
    RoutingNumber,
    AccountNumber,
    AchAmount,
    Description,
    BankAccountNumber,
    CheckNumber,
    ClearedAmount,
    ClearedDate,
    TestCaseType,
    RecordCount,
    ScenarioCounts,
    ScenarioCount(ScenarioKey),
    PastedData,
    GeneratedData,
}

impl FieldId {
    /// Fields that `AppData::update` accepts.
    pub const EDITABLE: [FieldId; 12] = [
        FieldId::TableName,
        FieldId::OutputFormat,
        FieldId::RoutingNumber,
        FieldId::AccountNumber,
        FieldId::AchAmount,
        FieldId::Description,
        FieldId::BankAccountNumber,
        FieldId::CheckNumber,
        FieldId::ClearedAmount,
        FieldId::ClearedDate,
        FieldId::TestCaseType,
        FieldId::RecordCount,
    ];

    pub fn name(self) -> String {
        let name = match self {
            FieldId::TableName => "table-name",
            FieldId::OutputFormat => "output-format",
            FieldId::Schema => "schema",
            FieldId::Mapping => "mapping",
            FieldId::RoutingNumber => "routing-number",
            FieldId::AccountNumber => "account-number",
            FieldId::AchAmount => "ach-amount",
            FieldId::Description => "description",
            FieldId::BankAccountNumber => "bank-account-number",
            FieldId::CheckNumber => "check-number",
            FieldId::ClearedAmount => "cleared-amount",
            FieldId::ClearedDate => "cleared-date",
            FieldId::TestCaseType => "test-case-type",
            FieldId::RecordCount => "record-count",
            FieldId::ScenarioCounts => "scenario-counts",
            FieldId::ScenarioCount(key) => return format!("scenario:{key}"),
            FieldId::PastedData => "pasted-data",
            FieldId::GeneratedData => "generated-data",
        };
        name.to_string()
    }
}

impl fmt::Display for FieldId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name())
    }
}

impl FromStr for FieldId {
    type Err = Error;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let value = value.trim();
        if let Some(key) = value.strip_prefix("scenario:") {
            return Ok(FieldId::ScenarioCount(key.parse()?));
        }
        Self::EDITABLE
            .into_iter()
            .find(|field| field.name() == value)
            .ok_or_else(|| Error::InvalidField(format!("unknown field: {value}")))
    }
}

/// Field to user-facing message. Empty means the form is valid.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct FieldErrors(BTreeMap<FieldId, String>);

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_ok(&self) -> bool {
        self.0.is_empty()
    }

    /// Record a message, replacing any earlier one for the same field.
    pub fn insert(&mut self, field: FieldId, message: impl Into<String>) {
        self.0.insert(field, message.into());
    }

    pub fn get(&self, field: FieldId) -> Option<&str> {
        self.0.get(&field).map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (FieldId, &str)> {
        self.0.iter().map(|(field, message)| (*field, message.as_str()))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn merge(&mut self, other: FieldErrors) {
        self.0.extend(other.0);
    }
}

pub fn validate_file_selection(config: &DatabaseConfig) -> FieldErrors {
    let mut errors = FieldErrors::new();
    if config.table_name.trim().is_empty() {
        errors.insert(FieldId::TableName, "Table name is required");
    }
    if config.output_format.is_none() {
        errors.insert(FieldId::OutputFormat, "File type is required");
    }
    errors
}

pub fn validate_ach_fields(fields: &AchFields) -> FieldErrors {
    let mut errors = FieldErrors::new();

    let routing = fields.routing_number.trim();
    if routing.is_empty() {
        errors.insert(FieldId::RoutingNumber, "Routing number is required");
    } else if !is_digits(routing, 9, 9) {
        errors.insert(FieldId::RoutingNumber, "Routing number must be 9 digits");
    }

    if fields.account_number.trim().is_empty() {
        errors.insert(FieldId::AccountNumber, "Account number is required");
    }

    let amount = fields.amount.trim();
    if amount.is_empty() {
        errors.insert(FieldId::AchAmount, "Amount is required");
    } else if !Amount::parse(amount).is_some_and(Amount::is_positive) {
        errors.insert(FieldId::AchAmount, "Amount must be a positive number");
    }

    errors
}

/// Cleared-check fields are optional; blank values are auto-generated.
pub fn validate_cleared_check_fields(fields: &ClearedCheckFields) -> FieldErrors {
    let mut errors = FieldErrors::new();
    let entries = [
        (FieldId::BankAccountNumber, fields.bank_account_number.as_str(), 13),
        (FieldId::CheckNumber, fields.check_number.as_str(), 10),
        (FieldId::ClearedAmount, fields.amount.as_str(), 10),
        (FieldId::ClearedDate, fields.date.as_str(), 6),
    ];

    for (field, value, width) in entries {
        if value.is_empty() {
            continue;
        }
        if field == FieldId::ClearedAmount && !is_digits(value, 1, 10) {
            errors.insert(field, "Amount must be up to 10 digits, no decimal");
        }
        if field == FieldId::ClearedDate && !is_digits(value, 6, 6) {
            errors.insert(field, "Date must be 6 digits (MMDDYY)");
        }
        if value.chars().count() > width {
            errors.insert(field, format!("Max length is {width} digits"));
        }
    }

    errors
}

pub fn validate_record_count(count: u32) -> FieldErrors {
    let mut errors = FieldErrors::new();
    if count == 0 {
        errors.insert(FieldId::RecordCount, "Record count must be greater than 0");
    } else if u64::from(count) > MAX_TOTAL_RECORDS {
        errors.insert(FieldId::RecordCount, "Record count cannot exceed 10,000");
    }
    errors
}

pub fn validate_scenario_counts(counts: &ScenarioCounts) -> FieldErrors {
    let mut errors = FieldErrors::new();
    let total = counts.total();
    if total == 0 {
        errors.insert(FieldId::ScenarioCounts, "Select at least one scenario");
    } else if total > MAX_TOTAL_RECORDS {
        errors.insert(
            FieldId::ScenarioCounts,
            "Total records across scenarios cannot exceed 10,000",
        );
    }
    errors
}

pub fn validate_mapping(mapping: Option<&SchemaMapping>) -> FieldErrors {
    let mut errors = FieldErrors::new();
    let complete = mapping.is_some_and(|mapping| is_mapping_complete(mapping, &CLEARED_CHECK_FIELDS));
    if !complete {
        errors.insert(FieldId::Mapping, "Please map all required Cleared Checks fields.");
    }
    errors
}

fn is_digits(value: &str, min: usize, max: usize) -> bool {
    (min..=max).contains(&value.len()) && value.bytes().all(|b| b.is_ascii_digit())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ach_fields_report_each_problem() {
        let fields = AchFields {
            routing_number: "12345".to_string(),
            account_number: " ".to_string(),
            amount: "-3".to_string(),
            description: String::new(),
        };
        let errors = validate_ach_fields(&fields);
        assert_eq!(
            errors.get(FieldId::RoutingNumber),
            Some("Routing number must be 9 digits")
        );
        assert_eq!(errors.get(FieldId::AccountNumber), Some("Account number is required"));
        assert_eq!(errors.get(FieldId::AchAmount), Some("Amount must be a positive number"));
        assert_eq!(errors.get(FieldId::Description), None);
    }

    #[test]
    fn cleared_fields_allow_blanks_and_prefer_length_message() {
        assert!(validate_cleared_check_fields(&ClearedCheckFields::default()).is_ok());

        let fields = ClearedCheckFields {
            bank_account_number: "12345678901234".to_string(),
            check_number: String::new(),
            amount: "12.50".to_string(),
            date: "1234567".to_string(),
        };
        let errors = validate_cleared_check_fields(&fields);
        assert_eq!(errors.get(FieldId::BankAccountNumber), Some("Max length is 13 digits"));
        assert_eq!(
            errors.get(FieldId::ClearedAmount),
            Some("Amount must be up to 10 digits, no decimal")
        );
        assert_eq!(errors.get(FieldId::ClearedDate), Some("Max length is 6 digits"));
    }

    #[test]
    fn counts_are_bounded() {
        assert!(!validate_record_count(0).is_ok());
        assert!(validate_record_count(10_000).is_ok());
        assert!(!validate_record_count(10_001).is_ok());

        let mut counts = ScenarioCounts::new();
        assert_eq!(
            validate_scenario_counts(&counts).get(FieldId::ScenarioCounts),
            Some("Select at least one scenario")
        );
        counts.set(ScenarioKey::YesNullNull, 9_000);
        counts.set(ScenarioKey::NoSetSet, 1_001);
        assert!(!validate_scenario_counts(&counts).is_ok());
    }

    #[test]
    fn field_ids_round_trip_through_names() {
        for field in FieldId::EDITABLE {
            assert_eq!(field.name().parse::<FieldId>().unwrap(), field);
        }
        assert_eq!(
            "scenario:Y_null_null".parse::<FieldId>().unwrap(),
            FieldId::ScenarioCount(ScenarioKey::YesNullNull)
        );
        assert!("schema".parse::<FieldId>().is_err());
    }
}
