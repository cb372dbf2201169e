//! Property tests for the session invariants: injective mappings,
//! bounded confidences, and deterministic re-runs.

use jet_catalog::builtin_catalog;
use jet_map::FieldDetector;
use jet_model::{Column, Table};
use proptest::prelude::*;

fn arb_column_name() -> impl Strategy<Value = String> {
    let known = prop::sample::select(vec![
        "Asiento",
        "NumAsiento",
        "Debe",
        "Haber",
        "Saldo",
        "Importe",
        "Fecha",
        "FechaEntrada",
        "Cuenta",
        "NombreCuenta",
        "Descripción",
        "Proveedor ID",
        "Periodo",
        "Ejercicio",
    ])
    .prop_map(str::to_string);
    prop_oneof![
        3 => known,
        1 => "[A-Za-z][A-Za-z0-9 _]{0,14}",
    ]
}

fn arb_cell() -> impl Strategy<Value = Option<String>> {
    prop_oneof![
        3 => (-10_000.0f64..10_000.0).prop_map(|v| Some(format!("{v:.2}"))),
        2 => (1u32..50).prop_map(|v| Some(v.to_string())),
        2 => (2000u32..2030, 1u32..13, 1u32..29)
            .prop_map(|(y, m, d)| Some(format!("{y:04}-{m:02}-{d:02}"))),
        2 => "[a-z ]{1,20}".prop_map(Some),
        1 => Just(None),
    ]
}

fn arb_table() -> impl Strategy<Value = Table> {
    let rows = 1usize..12;
    (prop::collection::vec(arb_column_name(), 0..8), rows).prop_flat_map(|(mut names, rows)| {
        // Duplicate column names cannot occur in a decoded table.
        names.sort();
        names.dedup();
        let count = names.len();
        prop::collection::vec(prop::collection::vec(arb_cell(), rows), count).prop_map(
            move |columns| {
                Table::new(
                    names
                        .iter()
                        .cloned()
                        .zip(columns)
                        .map(|(name, values)| Column::new(name, values))
                        .collect(),
                )
            },
        )
    })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn mapping_is_always_injective_and_bounded(table in arb_table()) {
        let catalog = builtin_catalog();
        let detector = FieldDetector::new(&catalog);
        let report = detector.detect(&table, None, None);

        let mut codes: Vec<_> = report.mappings.iter().map(|m| m.code).collect();
        codes.sort();
        let before = codes.len();
        codes.dedup();
        prop_assert_eq!(codes.len(), before, "no field mapped twice");

        let mut columns: Vec<_> = report.mappings.iter().map(|m| m.column.clone()).collect();
        columns.sort();
        let before = columns.len();
        columns.dedup();
        prop_assert_eq!(columns.len(), before, "no column mapped twice");

        for mapping in &report.mappings {
            prop_assert!((0.0..=1.0).contains(&mapping.confidence));
        }

        // Every column ends up either mapped or reported unmapped.
        prop_assert_eq!(
            report.mappings.len() + report.unmapped.len(),
            table.column_count()
        );
    }

    #[test]
    fn detection_is_deterministic(table in arb_table()) {
        let catalog = builtin_catalog();
        let detector = FieldDetector::new(&catalog);
        let first = detector.detect(&table, Some("Generic_ES"), None);
        let second = detector.detect(&table, Some("Generic_ES"), None);

        prop_assert_eq!(first.mappings.len(), second.mappings.len());
        for (a, b) in first.mappings.iter().zip(second.mappings.iter()) {
            prop_assert_eq!(&a.column, &b.column);
            prop_assert_eq!(a.code, b.code);
            prop_assert!((a.confidence - b.confidence).abs() < f64::EPSILON);
            prop_assert_eq!(a.source, b.source);
        }
        prop_assert_eq!(first.unmapped, second.unmapped);
    }
}
