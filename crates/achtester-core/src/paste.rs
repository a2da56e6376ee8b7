use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::scenario::{DateState, Flag, ScenarioKey};

/// Column order of the rows returned by the scenario queries.
pub const PASTED_COLUMNS: [&str; 6] = [
    "check_number",
    "amount",
    "check_date",
    "unclaimed_property_yn",
    "cleared_date",
    "void_date",
];

/// One row copied back from the database client.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct PastedRow {
    pub check_number: String,
    pub amount: String,
    pub check_date: String,
    pub unclaimed_property_yn: String,
    pub cleared_date: String,
    pub void_date: String,
}

impl PastedRow {
    fn from_fields(fields: &[&str]) -> Self {
        let field = |idx: usize| fields.get(idx).copied().unwrap_or_default().to_string();
        Self {
            check_number: field(0),
            amount: field(1),
            check_date: field(2),
            unclaimed_property_yn: field(3),
            cleared_date: field(4),
            void_date: field(5),
        }
    }

    /// Scenario this row satisfies, or `None` when the flag is unreadable.
    pub fn scenario(&self) -> Option<ScenarioKey> {
        let flag = match self.unclaimed_property_yn.trim().to_ascii_uppercase().as_str() {
            "Y" | "YES" => Flag::Yes,
            "N" | "NO" => Flag::No,
            _ => return None,
        };
        Some(ScenarioKey::from_parts(
            flag,
            date_state(&self.cleared_date),
            date_state(&self.void_date),
        ))
    }
}

/// Why pasted data was rejected; the messages are shown to the user as-is.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PasteError {
    #[error("Please paste data before proceeding.")]
    Empty,
    #[error(
        "The number of records you pasted ({pasted}) does not match the number of records you requested ({requested}). Please ensure you have copied all the data."
    )]
    CountMismatch { pasted: usize, requested: u64 },
    #[error("Could not read pasted data: {0}")]
    Malformed(String),
}

/// Parse tab- or comma-separated rows in `PASTED_COLUMNS` order.
///
/// The delimiter is a tab when the first non-blank line contains one. A
/// leading header row is skipped, short rows are padded with empty values
/// and blank rows are ignored.
pub fn parse_pasted_rows(text: &str) -> Result<Vec<PastedRow>, PasteError> {
    let first_line = text.lines().find(|line| !line.trim().is_empty());
    let Some(first_line) = first_line else {
        return Ok(Vec::new());
    };
    let tabbed = first_line.contains('\t');

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(csv::Trim::All)
        .delimiter(if tabbed { b'\t' } else { b',' })
        .quoting(!tabbed)
        .from_reader(text.as_bytes());

    let mut rows = Vec::new();
    for (idx, record) in reader.records().enumerate() {
        let record = record.map_err(|err| PasteError::Malformed(err.to_string()))?;
        let fields: Vec<&str> = record.iter().collect();
        if fields.iter().all(|field| field.is_empty()) {
            continue;
        }
        if idx == 0 && fields[0].eq_ignore_ascii_case(PASTED_COLUMNS[0]) {
            continue;
        }
        rows.push(PastedRow::from_fields(&fields));
    }
    Ok(rows)
}

/// Parse pasted data and require exactly `requested` rows.
pub fn parse_and_check(text: &str, requested: u64) -> Result<Vec<PastedRow>, PasteError> {
    if text.trim().is_empty() {
        return Err(PasteError::Empty);
    }
    let rows = parse_pasted_rows(text)?;
    if rows.len() as u64 != requested {
        return Err(PasteError::CountMismatch {
            pasted: rows.len(),
            requested,
        });
    }
    Ok(rows)
}

fn date_state(value: &str) -> DateState {
    let value = value.trim();
    if value.is_empty() || value.eq_ignore_ascii_case("null") {
        DateState::Null
    } else {
        DateState::Set
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_tab_separated_rows_with_header() {
        let text = "check_number\tamount\tcheck_date\tunclaimed_property_yn\tcleared_date\tvoid_date\n\
                    100\t12.50\t2024-07-15\tY\t\t\n\
                    101\t3.00\t2024-07-16\tn\t2024-07-20\tNULL\n";
        let rows = parse_pasted_rows(text).expect("rows");
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].check_number, "100");
        assert_eq!(rows[0].scenario(), Some(ScenarioKey::YesNullNull));
        assert_eq!(rows[1].scenario(), Some(ScenarioKey::NoSetNull));
    }

    #[test]
    fn parses_comma_separated_short_rows() {
        let rows = parse_pasted_rows("7, 1.00\n\n8,2.00,2024-01-01,Y,2024-01-02,2024-01-03").expect("rows");
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].amount, "1.00");
        assert_eq!(rows[0].void_date, "");
        assert_eq!(rows[0].scenario(), None);
        assert_eq!(rows[1].scenario(), Some(ScenarioKey::YesSetSet));
    }

    #[test]
    fn count_must_match_request() {
        assert_eq!(parse_and_check("   ", 1), Err(PasteError::Empty));
        let err = parse_and_check("1\t2", 3).unwrap_err();
        assert_eq!(err, PasteError::CountMismatch { pasted: 1, requested: 3 });
        assert!(err.to_string().starts_with("The number of records you pasted (1)"));
        assert_eq!(parse_and_check("1\t2", 1).map(|rows| rows.len()), Ok(1));
    }
}
