//! Full pipeline: ingest → detect → clean → validate → emit.

use std::io::Write;

use jet_catalog::builtin_catalog;
use jet_ingest::read_csv_table;
use jet_map::{AmountColumns, FieldDetector};
use jet_model::FieldCode;
use jet_output::write_header_detail;
use jet_transform::clean_mapped_table;
use jet_validate::BalanceValidator;

fn sample_export() -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().expect("temp file");
    write!(
        file,
        "Asiento;Fecha;Cuenta;Debe;Haber;Concepto\n\
         1;2024-01-05;4300;1.000,00;0,00;Compra material\n\
         1;2024-01-05;5720;0,00;1.000,00;Compra material\n\
         2;2024-02-10;6400;250,50;0,00;Nomina\n\
         2;2024-02-10;5720;0,00;250,50;Nomina\n"
    )
    .expect("write");
    file
}

#[test]
fn spanish_export_round_trips_to_standard_files() {
    let export = sample_export();
    let table = read_csv_table(export.path()).expect("ingest");

    let catalog = builtin_catalog();
    let validator = BalanceValidator::default();
    let detector = FieldDetector::new(&catalog);
    let detection = detector.detect(&table, Some("Generic_ES"), Some(&validator));

    assert_eq!(
        detection.column_mapped_to("Asiento"),
        Some(FieldCode::JournalEntryId)
    );
    assert_eq!(detection.column_mapped_to("Debe"), Some(FieldCode::DebitAmount));
    assert_eq!(detection.column_mapped_to("Haber"), Some(FieldCode::CreditAmount));
    assert_eq!(detection.column_mapped_to("Fecha"), Some(FieldCode::PostingDate));
    assert_eq!(
        detection.column_mapped_to("Cuenta"),
        Some(FieldCode::GlAccountNumber)
    );
    assert_eq!(
        detection.column_mapped_to("Concepto"),
        Some(FieldCode::Description)
    );

    let (cleaned, _) = clean_mapped_table(&table, &detection.mappings);

    // Derived columns exist and the cleaned table balances per entry.
    let amounts = AmountColumns {
        debit: Some("debit_amount".to_string()),
        credit: Some("credit_amount".to_string()),
        amount: None,
    };
    let report = validator.validate(&cleaned, &amounts, Some("journal_entry_id"));
    assert!(report.is_balanced);
    assert_eq!(report.entries_count, 2);
    assert_eq!(report.balanced_entries, 2);

    let dir = tempfile::tempdir().expect("tempdir");
    let header_path = dir.path().join("transformed_header.csv");
    let detail_path = dir.path().join("transformed_detail.csv");
    write_header_detail(&cleaned, &header_path, &detail_path).expect("emit");

    let header = std::fs::read_to_string(&header_path).expect("header");
    insta::assert_snapshot!(header, @r"
    journal_entry_id,entry_date,entry_time,posting_date,description,prepared_by,fiscal_year,period_number,total_debit_amount,total_credit_amount,line_count
    1,,,2024-01-05,Compra material,,,,1000.00,1000.00,2
    2,,,2024-02-10,Nomina,,,,250.50,250.50,2
    ");

    let detail = std::fs::read_to_string(&detail_path).expect("detail");
    insta::assert_snapshot!(detail, @r"
    journal_entry_id,line_number,gl_account_number,gl_account_name,amount,debit_amount,credit_amount,debit_credit_indicator,line_description,vendor_id,document_number
    1,,4300,,1000.00,1000.00,0.00,D,,,
    1,,5720,,-1000.00,0.00,1000.00,H,,,
    2,,6400,,250.50,250.50,0.00,D,,,
    2,,5720,,-250.50,0.00,250.50,H,,,
    ");
}

#[test]
fn dryish_run_with_unknown_columns_reports_them() {
    let mut file = tempfile::NamedTempFile::new().expect("temp file");
    write!(file, "mystery_a,mystery_b\nx9,y7\nq2,w4\n").expect("write");
    let table = read_csv_table(file.path()).expect("ingest");

    let catalog = builtin_catalog();
    let detector = FieldDetector::new(&catalog);
    let detection = detector.detect(&table, None, None);

    assert!(detection.mappings.is_empty());
    assert_eq!(detection.unmapped.len(), 2);

    // Cleaning an empty mapping yields an empty canonical table.
    let (cleaned, _) = clean_mapped_table(&table, &detection.mappings);
    assert!(cleaned.is_empty());
}
