//! End-to-end: the real balance validator wired into field detection as
//! the conflict oracle.

use jet_catalog::builtin_catalog;
use jet_map::FieldDetector;
use jet_model::{Column, FieldCode, MatchSource, Table};
use jet_validate::BalanceValidator;

#[test]
fn detection_with_real_oracle_resolves_contested_journal_id() {
    // Two equally-confident journal-id synonyms; only grouping by
    // "ID_Asiento" makes the sign-split amounts balance.
    let table = Table::new(vec![
        Column::from_values("Saldo", &["200.00", "-200.00", "75.50", "-75.50"]),
        Column::from_values("Asiento", &["1", "2", "1", "2"]),
        Column::from_values("ID_Asiento", &["5", "5", "6", "6"]),
    ]);

    let catalog = builtin_catalog();
    let detector = FieldDetector::new(&catalog);
    let validator = BalanceValidator::default();
    let report = detector.detect(&table, Some("Generic_ES"), Some(&validator));

    let journal = report
        .mapping_for(FieldCode::JournalEntryId)
        .expect("journal entry id mapped");
    assert_eq!(journal.column, "ID_Asiento");
    assert_eq!(journal.source, MatchSource::BalanceResolved);
    assert_eq!(report.stats.balance_wins, 1);
}

#[test]
fn oracle_result_is_deterministic() {
    let table = Table::new(vec![
        Column::from_values("Saldo", &["10.00", "-10.00", "4.25", "-4.25"]),
        Column::from_values("Asiento", &["1", "2", "1", "2"]),
        Column::from_values("ID_Asiento", &["5", "5", "6", "6"]),
    ]);
    let catalog = builtin_catalog();
    let detector = FieldDetector::new(&catalog);
    let validator = BalanceValidator::default();

    let first = detector.detect(&table, Some("Generic_ES"), Some(&validator));
    let second = detector.detect(&table, Some("Generic_ES"), Some(&validator));
    assert_eq!(
        first.mapping_for(FieldCode::JournalEntryId).map(|m| m.column.clone()),
        second.mapping_for(FieldCode::JournalEntryId).map(|m| m.column.clone()),
    );
}
