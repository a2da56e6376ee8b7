//! A single NACHA-style file header record.
//!
//! This is an illustrative stub: there are no batch, entry or control
//! records, no block padding and no hash totals. The header line itself
//! follows the 94-character record layout.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use achtester_core::AchRecord;

pub const RECORD_WIDTH: usize = 94;

/// Names and identifiers stamped into the header.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NachaSettings {
    pub immediate_origin: String,
    pub destination_name: String,
    pub origin_name: String,
}

impl Default for NachaSettings {
    fn default() -> Self {
        Self {
            immediate_origin: "1234567890".to_string(),
            destination_name: "TEST BANK".to_string(),
            origin_name: "ACH PAYMENT TESTER".to_string(),
        }
    }
}

/// File header record followed by CRLF. The immediate destination is the
/// routing number of the first record.
pub fn file_header(
    settings: &NachaSettings,
    records: &[&AchRecord],
    created: DateTime<Utc>,
) -> String {
    let routing = records
        .first()
        .map(|record| record.routing_number.as_str())
        .unwrap_or_default();
    let line = [
        "1".to_string(),
        "01".to_string(),
        fit_right(&format!(" {routing}"), 10),
        fit_right(&settings.immediate_origin, 10),
        created.format("%y%m%d").to_string(),
        created.format("%H%M").to_string(),
        "A".to_string(),
        "094".to_string(),
        "10".to_string(),
        "1".to_string(),
        fit_left(&settings.destination_name.to_uppercase(), 23),
        fit_left(&settings.origin_name.to_uppercase(), 23),
        fit_left("", 8),
    ]
    .concat();
    format!("{line}\r\n")
}

fn fit_left(value: &str, width: usize) -> String {
    let cut: String = value.chars().take(width).collect();
    format!("{cut:<width$}")
}

fn fit_right(value: &str, width: usize) -> String {
    let cut: String = value.chars().take(width).collect();
    format!("{cut:>width$}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use achtester_core::Amount;
    use chrono::TimeZone;

    #[test]
    fn header_is_one_94_char_record() {
        let record = AchRecord {
            id: 1,
            routing_number: "123456789".to_string(),
            account_number: "ACC000".to_string(),
            amount: Amount::from_cents(100),
            description: "Payment #1".to_string(),
            transaction_date: "2024-07-15".to_string(),
            status: "pending".to_string(),
        };
        let created = Utc.with_ymd_and_hms(2024, 7, 15, 9, 5, 0).unwrap();
        let text = file_header(&NachaSettings::default(), &[&record], created);
        let line = text.strip_suffix("\r\n").unwrap();

        assert_eq!(line.len(), RECORD_WIDTH);
        assert_eq!(&line[..3], "101");
        assert_eq!(&line[3..13], " 123456789");
        assert_eq!(&line[13..23], "1234567890");
        assert_eq!(&line[23..33], "2407150905");
        assert_eq!(&line[33..40], "A094101");
        assert!(line[40..63].starts_with("TEST BANK"));
    }
}
