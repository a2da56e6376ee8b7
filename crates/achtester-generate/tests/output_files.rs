use chrono::{NaiveDate, TimeZone, Utc};

use achtester_core::{
    AchFields, ClearedCheckFields, OutputFormat, ScenarioCounts, ScenarioKey, parse_pasted_rows,
};
use achtester_generate::{
    GenerationError, OutputOptions, build_output_files, generate_ach, generate_cleared_checks,
    output_summary, records_from_pasted,
};

fn options() -> OutputOptions {
    OutputOptions::new(Utc.with_ymd_and_hms(2024, 7, 15, 12, 0, 0).unwrap())
}

fn ach_fields() -> AchFields {
    AchFields {
        routing_number: "123456789".to_string(),
        account_number: "ACC".to_string(),
        amount: "100.50".to_string(),
        description: "Rent".to_string(),
    }
}

#[test]
fn ach_flow_renders_three_files() {
    let today = NaiveDate::from_ymd_opt(2024, 7, 15).unwrap();
    let data = generate_ach(&ach_fields(), 25, today).unwrap();
    let files = build_output_files(OutputFormat::AchReturn, &data, &options()).unwrap();

    let names: Vec<&str> = files.iter().map(|file| file.filename.as_str()).collect();
    assert_eq!(names, vec!["ach_test_data.sql", "ach_test_data.txt", "nacha_file.ach"]);

    let sql = &files[0].content;
    assert!(sql.contains("-- Generated on 2024-07-15\n"));
    assert!(sql.contains("-- Records: 10 of 25 requested\n"));
    assert!(sql.contains("INSERT INTO ach_payments ("));
    assert!(sql.contains("('123456789', 'ACC009', 190.50, 'Rent #10', '2024-07-15', 'pending');"));

    assert_eq!(files[1].content.lines().count(), 10);
    assert!(files[2].content.starts_with("101 123456789"));

    let summary = output_summary(&files, options().generated_at);
    assert_eq!(summary.files.len(), 3);
    assert!(summary.generated_at.starts_with("2024-07-15T12:00:00"));
}

#[test]
fn cleared_check_flow_renders_text_and_sql() {
    let counts: ScenarioCounts = [(ScenarioKey::YesNullNull, 2)].into_iter().collect();
    let data = generate_cleared_checks(&ClearedCheckFields::default(), &counts).unwrap();
    let files = build_output_files(OutputFormat::ClearedCheck, &data, &options()).unwrap();

    assert_eq!(files[0].filename, "clearedcheck.txt");
    assert!(files[0].content.ends_with("  \r\n\r\n"));
    assert_eq!(files[0].content.matches("\r\n").count(), 3);

    assert_eq!(files[1].filename, "clearedcheck.sql");
    assert!(files[1].content.starts_with("-- Cleared Checks SQL Insert\n-- Generated on 2024-07-15\n"));
    assert!(files[1].content.contains("INSERT INTO cleared_checks (bank_account_number, check_number, amount, date)"));
}

#[test]
fn pasted_rows_flow_through_to_files() {
    let rows = parse_pasted_rows("100\t12.50\t2024-07-15\tY\t\t\n101\t3\t2024-07-16\tN\t\t\n").unwrap();
    let data = records_from_pasted(&ClearedCheckFields::default(), &rows).unwrap();
    let files = build_output_files(OutputFormat::ClearedCheck, &data, &options()).unwrap();
    let first_line = files[0].content.lines().next().unwrap();
    assert_eq!(&first_line[13..23], "0000000100");
    assert_eq!(&first_line[23..33], "0000001250");
    assert_eq!(&first_line[33..39], "071524");
}

#[test]
fn mismatched_record_kind_is_reported() {
    let today = NaiveDate::from_ymd_opt(2024, 7, 15).unwrap();
    let data = generate_ach(&ach_fields(), 1, today).unwrap();
    let err = build_output_files(OutputFormat::ClearedCheck, &data, &options()).unwrap_err();
    assert_eq!(
        err,
        GenerationError::KindMismatch {
            format: OutputFormat::ClearedCheck,
            expected: "cleared-check",
        }
    );
}
