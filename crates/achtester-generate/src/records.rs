//! Mock record generation for the preview and output steps.

use chrono::NaiveDate;
use tracing::info;

use achtester_core::{
    AchFields, AchRecord, Amount, ClearedCheckFields, ClearedCheckRecord, GeneratedData,
    GeneratedRecord, PREVIEW_LIMIT, PastedRow, ScenarioCounts,
};

use crate::errors::{GenerationError, GenerationResult};
use crate::output::DEFAULT_DATE;

/// Bank account used when the user leaves it blank.
pub const DEFAULT_BANK_ACCOUNT: u64 = 1_000_000_000;
/// First synthetic check number.
pub const DEFAULT_CHECK_NUMBER: u64 = 100_001;
/// Synthetic base amount, in cents.
pub const DEFAULT_AMOUNT_CENTS: i64 = 10_000;

/// Preview ACH payments derived from the entered base values.
///
/// Produces `min(count, PREVIEW_LIMIT)` records; `total_count` keeps the
/// requested count.
pub fn generate_ach(
    fields: &AchFields,
    count: u32,
    today: NaiveDate,
) -> GenerationResult<GeneratedData> {
    let base = Amount::parse(&fields.amount).ok_or_else(|| {
        GenerationError::InvalidInput(format!("ACH amount '{}' is not a number", fields.amount))
    })?;
    let description = match fields.description.trim() {
        "" => "Payment",
        text => text,
    };
    let transaction_date = today.format("%Y-%m-%d").to_string();

    let preview = (count as usize).min(PREVIEW_LIMIT);
    let records = (0..preview)
        .map(|idx| {
            GeneratedRecord::Ach(AchRecord {
                id: idx as u32 + 1,
                routing_number: fields.routing_number.trim().to_string(),
                account_number: format!("{}{idx:03}", fields.account_number.trim()),
                amount: base.plus_dollars(idx as i64 * 10),
                description: format!("{description} #{}", idx + 1),
                transaction_date: transaction_date.clone(),
                status: "pending".to_string(),
            })
        })
        .collect::<Vec<_>>();

    info!(
        event = "records_generated",
        kind = "ach",
        preview = records.len(),
        requested = count
    );
    Ok(GeneratedData {
        records,
        total_count: u64::from(count),
    })
}

/// Preview cleared checks, walking scenarios in table order.
///
/// Blank base fields are replaced with synthetic values: an index-derived
/// account and check number, a $100.00 amount rising $10 per record, and
/// the default date. At most `PREVIEW_LIMIT` records are produced across
/// all scenarios.
pub fn generate_cleared_checks(
    fields: &ClearedCheckFields,
    counts: &ScenarioCounts,
) -> GenerationResult<GeneratedData> {
    let base_amount = match fields.amount.trim() {
        "" => Amount::from_cents(DEFAULT_AMOUNT_CENTS),
        text => Amount::parse_cents(text).ok_or_else(|| {
            GenerationError::InvalidInput(format!("cleared-check amount '{text}' is not whole cents"))
        })?,
    };
    let date = iso_from_mmddyy(&fields.date)
        .unwrap_or_else(|| DEFAULT_DATE.format("%Y-%m-%d").to_string());

    let mut records = Vec::new();
    'scenarios: for (scenario, count) in counts.active() {
        for _ in 0..count {
            if records.len() >= PREVIEW_LIMIT {
                break 'scenarios;
            }
            let idx = records.len() as u64;
            records.push(GeneratedRecord::ClearedCheck(ClearedCheckRecord {
                bank_account_number: bank_account(fields, idx),
                check_number: check_number(&fields.check_number, idx),
                amount: base_amount.plus_dollars(idx as i64 * 10),
                date: date.clone(),
                scenario: Some(scenario),
            }));
        }
    }

    let total_count = counts.total();
    info!(
        event = "records_generated",
        kind = "cleared_check",
        preview = records.len(),
        requested = total_count
    );
    Ok(GeneratedData {
        records,
        total_count,
    })
}

/// Cleared checks built from rows pasted back from the database.
///
/// Every row becomes a record; real data is not capped to the preview size.
/// An amount that is not a number fails the whole batch with its 1-based row.
pub fn records_from_pasted(
    fields: &ClearedCheckFields,
    rows: &[PastedRow],
) -> GenerationResult<GeneratedData> {
    let mut records = Vec::with_capacity(rows.len());
    for (idx, row) in rows.iter().enumerate() {
        let amount = Amount::parse(&row.amount).ok_or_else(|| {
            GenerationError::InvalidInput(format!(
                "row {}: amount '{}' is not a number",
                idx + 1,
                row.amount.trim()
            ))
        })?;
        records.push(GeneratedRecord::ClearedCheck(ClearedCheckRecord {
            bank_account_number: bank_account(fields, idx as u64),
            check_number: row.check_number.trim().to_string(),
            amount,
            date: row.check_date.trim().to_string(),
            scenario: row.scenario(),
        }));
    }

    info!(
        event = "records_generated",
        kind = "cleared_check_pasted",
        rows = records.len()
    );
    Ok(GeneratedData {
        total_count: records.len() as u64,
        records,
    })
}

fn bank_account(fields: &ClearedCheckFields, idx: u64) -> String {
    match fields.bank_account_number.trim() {
        "" => (DEFAULT_BANK_ACCOUNT + idx).to_string(),
        value => value.to_string(),
    }
}

fn check_number(base: &str, idx: u64) -> String {
    match base.trim() {
        "" => (DEFAULT_CHECK_NUMBER + idx).to_string(),
        value => match value.parse::<u64>() {
            Ok(number) => number.saturating_add(idx).to_string(),
            Err(_) => value.to_string(),
        },
    }
}

fn iso_from_mmddyy(value: &str) -> Option<String> {
    NaiveDate::parse_from_str(value.trim(), "%m%d%y")
        .ok()
        .map(|date| date.format("%Y-%m-%d").to_string())
}
