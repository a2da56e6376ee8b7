use std::collections::BTreeMap;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::schema::ColumnDefinition;

/// A logical field that must be bound to a table column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequiredField {
    pub key: &'static str,
    pub label: &'static str,
}

/// Logical fields every cleared-check table must provide.
pub const CLEARED_CHECK_FIELDS: [RequiredField; 4] = [
    RequiredField {
        key: "bankAccountNumber",
        label: "Bank Account Number",
    },
    RequiredField {
        key: "checkNumber",
        label: "Check Number",
    },
    RequiredField {
        key: "amount",
        label: "Amount",
    },
    RequiredField {
        key: "date",
        label: "Date (MMDDYY)",
    },
];

/// Logical field key to column name. Extra keys are kept but never
/// consulted by completeness checks.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(transparent)]
pub struct SchemaMapping(BTreeMap<String, String>);

impl SchemaMapping {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    pub fn set(&mut self, key: impl Into<String>, column: impl Into<String>) {
        self.0.insert(key.into(), column.into());
    }

    pub fn remove(&mut self, key: &str) -> Option<String> {
        self.0.remove(key)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(key, column)| (key.as_str(), column.as_str()))
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Value for `key` when it is set to something other than whitespace.
    pub fn mapped(&self, key: &str) -> Option<&str> {
        self.get(key).filter(|column| !column.trim().is_empty())
    }
}

impl FromIterator<(String, String)> for SchemaMapping {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Outcome of checking a mapping against the current table structure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MappingStatus {
    Complete,
    /// Required keys with no column.
    Incomplete(Vec<&'static str>),
    /// Mapped columns that the table no longer declares.
    Stale(Vec<String>),
}

/// Guess a column for each required field.
///
/// Names are compared lowercased with separators removed, and a column
/// matches when its name starts with the field key: `bank_account_number`
/// binds `bankAccountNumber`, while `txn_date` does not bind `date`. The
/// first matching column wins; fields with no match stay unmapped.
pub fn auto_map(required: &[RequiredField], columns: &[ColumnDefinition]) -> SchemaMapping {
    let mut mapping = SchemaMapping::new();
    for field in required {
        let key = normalize(field.key);
        if let Some(column) = columns
            .iter()
            .find(|column| normalize(&column.name).starts_with(&key))
        {
            mapping.set(field.key, column.name.clone());
        }
    }
    mapping
}

/// True iff every required key maps to a non-empty column name.
pub fn is_mapping_complete(mapping: &SchemaMapping, required: &[RequiredField]) -> bool {
    missing_fields(mapping, required).is_empty()
}

pub fn missing_fields(mapping: &SchemaMapping, required: &[RequiredField]) -> Vec<&'static str> {
    required
        .iter()
        .filter(|field| mapping.mapped(field.key).is_none())
        .map(|field| field.key)
        .collect()
}

/// Columns bound to `required` keys that are absent from `columns`.
/// Extra keys are ignored, like they are for completeness.
pub fn stale_columns(
    mapping: &SchemaMapping,
    required: &[RequiredField],
    columns: &[ColumnDefinition],
) -> Vec<String> {
    required
        .iter()
        .filter_map(|field| mapping.mapped(field.key))
        .filter(|column| !columns.iter().any(|def| def.name == *column))
        .map(str::to_string)
        .collect()
}

pub fn mapping_status(
    mapping: &SchemaMapping,
    required: &[RequiredField],
    columns: &[ColumnDefinition],
) -> MappingStatus {
    let stale = stale_columns(mapping, required, columns);
    if !stale.is_empty() {
        return MappingStatus::Stale(stale);
    }
    let missing = missing_fields(mapping, required);
    if missing.is_empty() {
        MappingStatus::Complete
    } else {
        MappingStatus::Incomplete(missing)
    }
}

/// Drop entries pointing at vanished columns, then auto-map whatever is
/// left unmapped.
pub fn reconcile(
    saved: &SchemaMapping,
    required: &[RequiredField],
    columns: &[ColumnDefinition],
) -> SchemaMapping {
    let guessed = auto_map(required, columns);
    let mut mapping: SchemaMapping = saved
        .iter()
        .filter(|(_, column)| columns.iter().any(|def| def.name == *column))
        .map(|(key, column)| (key.to_string(), column.to_string()))
        .collect();
    for field in required {
        if mapping.mapped(field.key).is_none() {
            if let Some(column) = guessed.get(field.key) {
                mapping.set(field.key, column);
            }
        }
    }
    mapping
}

/// Columns worth offering for a cleared-check mapping.
pub fn plausible_columns(columns: &[ColumnDefinition]) -> Vec<&ColumnDefinition> {
    columns
        .iter()
        .filter(|column| {
            let name = column.name.to_lowercase();
            ["account", "check", "amount", "date"]
                .iter()
                .any(|hint| name.contains(hint))
        })
        .collect()
}

fn normalize(name: &str) -> String {
    name.chars()
        .filter(|ch| ch.is_ascii_alphanumeric())
        .map(|ch| ch.to_ascii_lowercase())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn columns(names: &[&str]) -> Vec<ColumnDefinition> {
        names
            .iter()
            .map(|name| ColumnDefinition::new(*name, "VARCHAR(10)"))
            .collect()
    }

    #[test]
    fn auto_map_ignores_case_and_separators() {
        let cols = columns(&["ID", "Bank_Account_Number_Primary", "CHECKNUMBER", "amount_usd"]);
        let mapping = auto_map(&CLEARED_CHECK_FIELDS, &cols);
        assert_eq!(mapping.get("bankAccountNumber"), Some("Bank_Account_Number_Primary"));
        assert_eq!(mapping.get("checkNumber"), Some("CHECKNUMBER"));
        assert_eq!(mapping.get("amount"), Some("amount_usd"));
        assert_eq!(mapping.get("date"), None);
    }

    #[test]
    fn completeness_ignores_extra_keys() {
        let mut mapping = SchemaMapping::new();
        mapping.set("bankAccountNumber", "a");
        mapping.set("checkNumber", "b");
        mapping.set("amount", "c");
        assert!(!is_mapping_complete(&mapping, &CLEARED_CHECK_FIELDS));

        mapping.set("unrelated", "zzz");
        assert!(!is_mapping_complete(&mapping, &CLEARED_CHECK_FIELDS));

        mapping.set("date", "  ");
        assert!(!is_mapping_complete(&mapping, &CLEARED_CHECK_FIELDS));

        mapping.set("date", "d");
        assert!(is_mapping_complete(&mapping, &CLEARED_CHECK_FIELDS));
    }

    #[test]
    fn stale_mapping_is_detected_and_reconciled() {
        let mut saved = SchemaMapping::new();
        saved.set("bankAccountNumber", "acct");
        saved.set("checkNumber", "old_check");
        saved.set("amount", "amount");
        saved.set("date", "issued");

        let cols = columns(&["acct", "check_no", "amount", "issued"]);
        assert_eq!(
            mapping_status(&saved, &CLEARED_CHECK_FIELDS, &cols),
            MappingStatus::Stale(vec!["old_check".to_string()])
        );

        let fixed = reconcile(&saved, &CLEARED_CHECK_FIELDS, &cols);
        assert_eq!(fixed.get("checkNumber"), None);
        assert_eq!(fixed.get("date"), Some("issued"));
        assert_eq!(
            mapping_status(&fixed, &CLEARED_CHECK_FIELDS, &cols),
            MappingStatus::Incomplete(vec!["checkNumber"])
        );
    }

    #[test]
    fn extra_keys_never_make_a_mapping_stale() {
        let mut mapping = SchemaMapping::new();
        mapping.set("bankAccountNumber", "acct");
        mapping.set("checkNumber", "check_no");
        mapping.set("amount", "amount");
        mapping.set("date", "issued");
        mapping.set("memo", "dropped_column");

        let cols = columns(&["acct", "check_no", "amount", "issued"]);
        assert!(stale_columns(&mapping, &CLEARED_CHECK_FIELDS, &cols).is_empty());
        assert_eq!(
            mapping_status(&mapping, &CLEARED_CHECK_FIELDS, &cols),
            MappingStatus::Complete
        );
    }

    #[test]
    fn plausible_columns_filter_by_hint() {
        let cols = columns(&["id", "account_no", "memo", "txn_date"]);
        let names: Vec<&str> = plausible_columns(&cols)
            .into_iter()
            .map(|c| c.name.as_str())
            .collect();
        assert_eq!(names, vec!["account_no", "txn_date"]);
    }
}
