use achtester_core::{
    CLEARED_CHECK_FIELDS, FieldId, ImportOutcome, MappingStatus, MemoryStore, SchemaCatalog,
    Step, WizardSnapshot, is_mapping_complete, mapping_status, validate_step,
};

const CHECKS_DDL: &str = "CREATE TABLE checks (id INT, bank_account_number VARCHAR(20), \
                          check_number VARCHAR(10), amount DECIMAL(10,2), txn_date DATE)";

#[test]
fn uploaded_ddl_needs_manual_date_mapping() {
    let catalog = SchemaCatalog::new(MemoryStore::new());
    let ImportOutcome::Saved {
        table,
        columns,
        mut mapping,
    } = catalog.import_schema(CHECKS_DDL, false).expect("import")
    else {
        panic!("schema should be saved");
    };

    assert_eq!(table, "checks");
    assert_eq!(mapping.get("bankAccountNumber"), Some("bank_account_number"));
    assert_eq!(mapping.get("checkNumber"), Some("check_number"));
    assert_eq!(mapping.get("amount"), Some("amount"));
    assert_eq!(mapping.get("date"), None);
    assert!(!is_mapping_complete(&mapping, &CLEARED_CHECK_FIELDS));
    assert_eq!(
        mapping_status(&mapping, &CLEARED_CHECK_FIELDS, &columns),
        MappingStatus::Incomplete(vec!["date"])
    );

    mapping.set("date", "txn_date");
    assert!(is_mapping_complete(&mapping, &CLEARED_CHECK_FIELDS));
    catalog.save_mapping("checks", &mapping).expect("save mapping");
    assert_eq!(catalog.load_mapping("checks").expect("load"), Some(mapping));
}

#[test]
fn schema_step_blocks_until_mapping_is_complete() {
    let catalog = SchemaCatalog::new(MemoryStore::new());
    catalog.import_schema(CHECKS_DDL, false).expect("import");
    let opened = catalog.open_schema("checks").expect("open").expect("saved");

    let mut wizard = WizardSnapshot::default();
    wizard.update(FieldId::OutputFormat, "cleared-check").expect("format");
    let step = Step::SchemaDefinition;

    wizard.app_data.schema_definition.content = Some(CHECKS_DDL.to_string());
    wizard.app_data.schema_definition.mapping = Some(opened.mapping.clone());
    assert_eq!(
        validate_step(step, &wizard.app_data).get(FieldId::Mapping),
        Some("Please map all required Cleared Checks fields.")
    );

    let mut mapping = opened.mapping;
    mapping.set("date", "txn_date");
    wizard.app_data.schema_definition.mapping = Some(mapping);
    assert!(validate_step(step, &wizard.app_data).is_ok());
}

#[test]
fn snapshot_survives_store_round_trip_and_reset() {
    let catalog = SchemaCatalog::new(MemoryStore::new());
    catalog.add_table_name("checks").expect("table name");

    let mut wizard = WizardSnapshot::default();
    wizard.update(FieldId::TableName, "checks").expect("table");
    wizard.next().expect("advance");
    catalog.save_snapshot(&wizard).expect("save");

    let loaded = catalog.load_snapshot().expect("load").expect("present");
    assert_eq!(loaded, wizard);

    catalog.clear_snapshot().expect("clear");
    assert_eq!(catalog.load_snapshot().expect("load"), None);
    assert_eq!(catalog.table_names().expect("names"), vec!["checks"]);
}
