//! Fixed-width text renderings.
//!
//! Cleared-check lines are 13 (account) + 10 (check) + 10 (amount in cents)
//! + 6 (`MMDDYY`) + 2 spaces, CRLF-terminated, with a trailing blank line.
//! Numeric fields are zero-padded on the left and never truncated.

use achtester_core::{AchRecord, ClearedCheckRecord};

use super::{format_amount, format_date};

const CRLF: &str = "\r\n";

pub fn cleared_check_line(record: &ClearedCheckRecord) -> String {
    format!(
        "{:0>13}{:0>10}{}{}  ",
        record.bank_account_number.trim(),
        record.check_number.trim(),
        format_amount(record.amount),
        format_date(&record.date)
    )
}

pub fn cleared_check_lines(records: &[&ClearedCheckRecord]) -> String {
    let mut out = String::new();
    for record in records {
        out.push_str(&cleared_check_line(record));
        out.push_str(CRLF);
    }
    out.push_str(CRLF);
    out
}

/// Routing (9) + account (17) + amount in cents (10) + description (80).
/// Text fields are space-padded on the right; the description is cut at 80.
pub fn ach_line(record: &AchRecord) -> String {
    let description: String = record.description.chars().take(80).collect();
    format!(
        "{:<9}{:<17}{}{:<80}",
        record.routing_number,
        record.account_number,
        format_amount(record.amount),
        description
    )
}

pub fn ach_lines(records: &[&AchRecord]) -> String {
    records
        .iter()
        .map(|record| format!("{}{CRLF}", ach_line(record)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use achtester_core::Amount;

    fn check(account: &str, check: &str, cents: i64, date: &str) -> ClearedCheckRecord {
        ClearedCheckRecord {
            bank_account_number: account.to_string(),
            check_number: check.to_string(),
            amount: Amount::from_cents(cents),
            date: date.to_string(),
            scenario: None,
        }
    }

    #[test]
    fn cleared_lines_are_padded_and_crlf_terminated() {
        let first = check("12345", "77", 1235, "2024-07-15");
        let second = check("9", "8", 0, "");
        let text = cleared_check_lines(&[&first, &second]);
        let expected = [
            "0000000012345", "0000000077", "0000001235", "071524", "  \r\n",
            "0000000000009", "0000000008", "0000000000", "010125", "  \r\n",
            "\r\n",
        ]
        .concat();
        assert_eq!(text, expected);
    }

    #[test]
    fn cleared_line_width_is_41() {
        let record = check("1", "2", 3, "2024-01-31");
        let line = cleared_check_line(&record);
        assert_eq!(line.len(), 41);
        assert_eq!(&line[33..39], "013124");
        assert!(line.ends_with("  "));
    }

    #[test]
    fn overwide_values_are_kept_whole() {
        let record = check("12345678901234", "1", 0, "");
        assert_eq!(cleared_check_line(&record).len(), 42);
    }

    #[test]
    fn ach_line_is_116_wide() {
        let record = AchRecord {
            id: 1,
            routing_number: "123456789".to_string(),
            account_number: "ACC000".to_string(),
            amount: Amount::from_cents(10_000),
            description: "x".repeat(90),
            transaction_date: "2024-07-15".to_string(),
            status: "pending".to_string(),
        };
        let line = ach_line(&record);
        assert_eq!(line.len(), 116);
        assert_eq!(&line[26..36], "0000010000");
        assert!(ach_lines(&[&record]).ends_with("\r\n"));
    }
}
