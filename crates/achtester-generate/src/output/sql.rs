//! `INSERT` statements for the generated records.

use chrono::NaiveDate;

use achtester_core::{AchRecord, ClearedCheckRecord};

use super::{ClearedCheckTarget, escape_sql};

pub fn ach_inserts(
    records: &[&AchRecord],
    table: &str,
    requested: u64,
    generated_on: NaiveDate,
) -> String {
    let mut sql = format!(
        "-- ACH Test Data SQL Insert Statements\n\
         -- Generated on {}\n\
         -- Records: {} of {requested} requested\n\n",
        generated_on.format("%Y-%m-%d"),
        records.len()
    );
    sql.push_str(&format!(
        "INSERT INTO {table} (routing_number, account_number, amount, description, transaction_date, status) VALUES\n"
    ));
    let rows: Vec<String> = records
        .iter()
        .map(|record| {
            format!(
                "('{}', '{}', {}, '{}', '{}', '{}')",
                escape_sql(&record.routing_number),
                escape_sql(&record.account_number),
                record.amount,
                escape_sql(&record.description),
                escape_sql(&record.transaction_date),
                escape_sql(&record.status)
            )
        })
        .collect();
    sql.push_str(&rows.join(",\n"));
    sql.push_str(";\n");
    sql
}

pub fn cleared_check_inserts(
    records: &[&ClearedCheckRecord],
    target: &ClearedCheckTarget,
    generated_on: NaiveDate,
) -> String {
    let mut sql = format!(
        "-- Cleared Checks SQL Insert\n-- Generated on {}\n",
        generated_on.format("%Y-%m-%d")
    );
    sql.push_str(&format!(
        "INSERT INTO {} ({}, {}, {}, {}) VALUES\n",
        target.table, target.bank_account_number, target.check_number, target.amount, target.date
    ));
    let rows: Vec<String> = records
        .iter()
        .map(|record| {
            format!(
                "('{}', '{}', {}, '{}')",
                escape_sql(&record.bank_account_number),
                escape_sql(&record.check_number),
                record.amount,
                escape_sql(&record.date)
            )
        })
        .collect();
    sql.push_str(&rows.join(",\n"));
    sql.push_str(";\n");
    sql
}

#[cfg(test)]
mod tests {
    use super::*;
    use achtester_core::Amount;

    fn day() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 7, 15).unwrap()
    }

    #[test]
    fn ach_insert_quotes_strings_only() {
        let record = AchRecord {
            id: 1,
            routing_number: "123456789".to_string(),
            account_number: "ACC000".to_string(),
            amount: Amount::from_cents(10_000),
            description: "Rent for O'Hare #1".to_string(),
            transaction_date: "2024-07-15".to_string(),
            status: "pending".to_string(),
        };
        let sql = ach_inserts(&[&record], "ach_payments", 100, day());
        assert!(sql.starts_with("-- ACH Test Data SQL Insert Statements\n-- Generated on 2024-07-15\n"));
        assert!(sql.contains(
            "('123456789', 'ACC000', 100.00, 'Rent for O''Hare #1', '2024-07-15', 'pending');"
        ));
    }

    #[test]
    fn cleared_insert_uses_target_columns() {
        let record = ClearedCheckRecord {
            bank_account_number: "555".to_string(),
            check_number: "900".to_string(),
            amount: Amount::from_cents(1250),
            date: "2024-07-15".to_string(),
            scenario: None,
        };
        let mut target = ClearedCheckTarget::default_columns("checks");
        target.date = "issued_on".to_string();
        let sql = cleared_check_inserts(&[&record, &record], &target, day());
        assert!(sql.contains(
            "INSERT INTO checks (bank_account_number, check_number, amount, issued_on) VALUES\n"
        ));
        assert!(sql.ends_with("('555', '900', 12.50, '2024-07-15'),\n('555', '900', 12.50, '2024-07-15');\n"));
    }
}
