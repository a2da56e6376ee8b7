//! Renders generated records into downloadable files.

pub mod fixed_width;
pub mod nacha;
pub mod sql;

use chrono::{DateTime, NaiveDate, Utc};
use tracing::info;

use achtester_core::{
    AchRecord, Amount, CLEARED_CHECK_FIELDS, ClearedCheckRecord, ColumnDefinition, GeneratedData,
    GeneratedRecord, MappingStatus, OutputFile, OutputFiles, OutputFormat, SchemaMapping,
    mapping_status,
};

use crate::errors::{GenerationError, GenerationResult};

pub use nacha::NachaSettings;

/// Date substituted for missing or unreadable dates.
pub const DEFAULT_DATE: NaiveDate = match NaiveDate::from_ymd_opt(2025, 1, 1) {
    Some(date) => date,
    None => NaiveDate::MIN,
};

pub const ACH_SQL_FILE: &str = "ach_test_data.sql";
pub const ACH_TEXT_FILE: &str = "ach_test_data.txt";
pub const NACHA_FILE: &str = "nacha_file.ach";
pub const CLEARED_CHECK_TEXT_FILE: &str = "clearedcheck.txt";
pub const CLEARED_CHECK_SQL_FILE: &str = "clearedcheck.sql";

/// Cent count left-padded to 10 digits.
pub fn format_amount(amount: Amount) -> String {
    amount.zero_padded(10)
}

/// Re-emit a date as `MMDDYY`, falling back to [`DEFAULT_DATE`].
///
/// Accepts `YYYY-MM-DD` (optionally followed by a time), `MM/DD/YYYY` and
/// the `DD-MON-YY` form Oracle clients print.
pub fn format_date(value: &str) -> String {
    parse_date(value).unwrap_or(DEFAULT_DATE).format("%m%d%y").to_string()
}

fn parse_date(value: &str) -> Option<NaiveDate> {
    let value = value.trim();
    let head = value.get(..10).unwrap_or(value);
    NaiveDate::parse_from_str(head, "%Y-%m-%d")
        .or_else(|_| NaiveDate::parse_from_str(value, "%m/%d/%Y"))
        .or_else(|_| NaiveDate::parse_from_str(value, "%d-%b-%y"))
        .ok()
}

/// Double single quotes so a value is safe inside a SQL string literal.
pub fn escape_sql(value: &str) -> String {
    value.replace('\'', "''")
}

/// Table and column names the cleared-check `INSERT` targets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClearedCheckTarget {
    pub table: String,
    pub bank_account_number: String,
    pub check_number: String,
    pub amount: String,
    pub date: String,
}

impl ClearedCheckTarget {
    /// Default column names on `table`.
    pub fn default_columns(table: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            bank_account_number: "bank_account_number".to_string(),
            check_number: "check_number".to_string(),
            amount: "amount".to_string(),
            date: "date".to_string(),
        }
    }

    /// Mapped columns on `table`, when the mapping is complete and every
    /// mapped column still exists.
    pub fn from_mapping(
        table: &str,
        mapping: &SchemaMapping,
        columns: &[ColumnDefinition],
    ) -> Option<Self> {
        if mapping_status(mapping, &CLEARED_CHECK_FIELDS, columns) != MappingStatus::Complete {
            return None;
        }
        let column = |key: &str| mapping.mapped(key).map(str::to_string);
        Some(Self {
            table: table.to_string(),
            bank_account_number: column("bankAccountNumber")?,
            check_number: column("checkNumber")?,
            amount: column("amount")?,
            date: column("date")?,
        })
    }
}

/// Everything besides the records that the renderers need.
#[derive(Debug, Clone)]
pub struct OutputOptions {
    pub ach_table: String,
    pub cleared_checks: ClearedCheckTarget,
    pub nacha: NachaSettings,
    pub generated_at: DateTime<Utc>,
}

impl OutputOptions {
    pub fn new(generated_at: DateTime<Utc>) -> Self {
        Self {
            ach_table: "ach_payments".to_string(),
            cleared_checks: ClearedCheckTarget::default_columns("cleared_checks"),
            nacha: NachaSettings::default(),
            generated_at,
        }
    }
}

/// File names produced for `format`, in output order.
pub fn output_file_names(format: OutputFormat) -> &'static [&'static str] {
    if format.is_cleared_check() {
        &[CLEARED_CHECK_TEXT_FILE, CLEARED_CHECK_SQL_FILE]
    } else {
        &[ACH_SQL_FILE, ACH_TEXT_FILE, NACHA_FILE]
    }
}

/// Render every file for `format` from the generated records.
pub fn build_output_files(
    format: OutputFormat,
    data: &GeneratedData,
    options: &OutputOptions,
) -> GenerationResult<Vec<OutputFile>> {
    if data.records.is_empty() {
        return Err(GenerationError::NoRecords);
    }

    let files = if format.is_cleared_check() {
        let checks = cleared_check_records(format, data)?;
        vec![
            OutputFile {
                filename: CLEARED_CHECK_TEXT_FILE.to_string(),
                content: fixed_width::cleared_check_lines(&checks),
            },
            OutputFile {
                filename: CLEARED_CHECK_SQL_FILE.to_string(),
                content: sql::cleared_check_inserts(
                    &checks,
                    &options.cleared_checks,
                    options.generated_at.date_naive(),
                ),
            },
        ]
    } else {
        let payments = ach_records(format, data)?;
        vec![
            OutputFile {
                filename: ACH_SQL_FILE.to_string(),
                content: sql::ach_inserts(
                    &payments,
                    &options.ach_table,
                    data.total_count,
                    options.generated_at.date_naive(),
                ),
            },
            OutputFile {
                filename: ACH_TEXT_FILE.to_string(),
                content: fixed_width::ach_lines(&payments),
            },
            OutputFile {
                filename: NACHA_FILE.to_string(),
                content: nacha::file_header(&options.nacha, &payments, options.generated_at),
            },
        ]
    };

    info!(
        event = "output_rendered",
        format = %format,
        files = files.len(),
        records = data.records.len()
    );
    Ok(files)
}

/// Summary recorded in the wizard snapshot after a render.
pub fn output_summary(files: &[OutputFile], generated_at: DateTime<Utc>) -> OutputFiles {
    OutputFiles {
        files: files.iter().map(|file| file.filename.clone()).collect(),
        generated_at: generated_at.to_rfc3339(),
    }
}

fn ach_records(format: OutputFormat, data: &GeneratedData) -> GenerationResult<Vec<&AchRecord>> {
    data.records
        .iter()
        .map(|record| match record {
            GeneratedRecord::Ach(payment) => Ok(payment),
            GeneratedRecord::ClearedCheck(_) => Err(GenerationError::KindMismatch {
                format,
                expected: "ACH",
            }),
        })
        .collect()
}

fn cleared_check_records(
    format: OutputFormat,
    data: &GeneratedData,
) -> GenerationResult<Vec<&ClearedCheckRecord>> {
    data.records
        .iter()
        .map(|record| match record {
            GeneratedRecord::ClearedCheck(check) => Ok(check),
            GeneratedRecord::Ach(_) => Err(GenerationError::KindMismatch {
                format,
                expected: "cleared-check",
            }),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn amounts_are_cents_padded_to_ten() {
        assert_eq!(format_amount(Amount::from_f64(12.345)), "0000001235");
        assert_eq!(format_amount(Amount::ZERO), "0000000000");
        assert_eq!(format_amount(Amount::from_cents(-50)), "0000000050");
    }

    #[test]
    fn dates_fall_back_to_default() {
        assert_eq!(format_date("2024-07-15"), "071524");
        assert_eq!(format_date("2024-07-15 00:00:00"), "071524");
        assert_eq!(format_date("07/15/2024"), "071524");
        assert_eq!(format_date(""), "010125");
        assert_eq!(format_date("2024-13-45"), "010125");
        assert_eq!(format_date("soon"), "010125");
    }

    #[test]
    fn quotes_are_doubled() {
        assert_eq!(escape_sql("O'Brien's"), "O''Brien''s");
    }

    #[test]
    fn mapped_target_requires_fresh_complete_mapping() {
        let columns = vec![
            ColumnDefinition::new("acct", "VARCHAR(20)"),
            ColumnDefinition::new("chk", "VARCHAR(10)"),
            ColumnDefinition::new("amt", "DECIMAL(10,2)"),
            ColumnDefinition::new("issued", "DATE"),
        ];
        let mut mapping = SchemaMapping::new();
        mapping.set("bankAccountNumber", "acct");
        mapping.set("checkNumber", "chk");
        mapping.set("amount", "amt");
        assert_eq!(ClearedCheckTarget::from_mapping("checks", &mapping, &columns), None);

        mapping.set("date", "issued");
        let target = ClearedCheckTarget::from_mapping("checks", &mapping, &columns).unwrap();
        assert_eq!(target.table, "checks");
        assert_eq!(target.date, "issued");

        mapping.set("date", "gone");
        assert_eq!(ClearedCheckTarget::from_mapping("checks", &mapping, &columns), None);
    }

    #[test]
    fn empty_data_is_rejected() {
        let options = OutputOptions::new(Utc::now());
        assert_eq!(
            build_output_files(OutputFormat::Ach, &GeneratedData::default(), &options),
            Err(GenerationError::NoRecords)
        );
    }
}
