use jet_model::{DataKind, FieldCatalog, FieldCode, FieldDef};

#[test]
fn catalog_serializes_and_round_trips() {
    let mut catalog = FieldCatalog::new();
    let mut def = FieldDef::new(
        FieldCode::JournalEntryId,
        "ID del Asiento Contable",
        DataKind::Numeric,
    );
    def.add_synonym("SAP", "BELNR", 0.95);
    def.add_synonym("Generic_ES", "Asiento", 0.9);
    catalog.insert(def);

    let json = serde_json::to_string_pretty(&catalog).expect("serialize catalog");
    let round: FieldCatalog = serde_json::from_str(&json).expect("deserialize catalog");

    let def = round.get(FieldCode::JournalEntryId).expect("field present");
    assert_eq!(def.display_name, "ID del Asiento Contable");
    assert_eq!(def.synonyms_for_erp("SAP")[0].name, "BELNR");
    assert_eq!(round.total_synonyms(), 2);
}

#[test]
fn field_def_deserializes_without_synonyms() {
    let json = r#"{
        "code": "posting_date",
        "display_name": "Fecha de Contabilización",
        "kind": "date"
    }"#;
    let def: FieldDef = serde_json::from_str(json).expect("deserialize def");
    assert_eq!(def.code, FieldCode::PostingDate);
    assert!(def.synonyms_by_erp.is_empty());
}
