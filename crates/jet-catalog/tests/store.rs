use jet_catalog::{builtin_catalog, load_catalog, merge_catalogs, resolve_catalog, save_catalog};
use jet_model::{DataKind, FieldCatalog, FieldCode, FieldDef};

#[test]
fn save_and_load_round_trip() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("catalog.json");

    let catalog = builtin_catalog();
    save_catalog(&catalog, &path).expect("save");
    let loaded = load_catalog(&path).expect("load");

    assert_eq!(loaded.len(), catalog.len());
    assert_eq!(loaded.total_synonyms(), catalog.total_synonyms());
}

#[test]
fn merge_adds_synonyms_without_duplicating() {
    let mut base = builtin_catalog();
    let base_total = base.total_synonyms();

    let mut overlay = FieldCatalog::new();
    let mut def = FieldDef::new(FieldCode::Amount, "Importe", DataKind::Currency);
    def.add_synonym("SAGE", "net_amount", 0.85);
    // Already present in the built-in catalog under Generic_ES.
    def.add_synonym("Generic_ES", "Importe", 0.95);
    overlay.insert(def);

    merge_catalogs(&mut base, overlay);
    assert_eq!(base.total_synonyms(), base_total + 1);

    let amount = base.get(FieldCode::Amount).unwrap();
    assert!(amount.synonyms_for_erp("SAGE").iter().any(|s| s.name == "net_amount"));
}

#[test]
fn resolve_without_overlay_is_builtin() {
    let resolved = resolve_catalog(None).expect("resolve");
    assert_eq!(resolved.len(), builtin_catalog().len());
}

#[test]
fn resolve_with_overlay_applies_file() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("site.json");

    let mut overlay = FieldCatalog::new();
    let mut def = FieldDef::new(FieldCode::VendorId, "Proveedor", DataKind::Alphanumeric);
    def.add_synonym("SAGE", "supplier_ref", 0.8);
    overlay.insert(def);
    save_catalog(&overlay, &path).expect("save overlay");

    let resolved = resolve_catalog(Some(&path)).expect("resolve");
    let vendor = resolved.get(FieldCode::VendorId).unwrap();
    assert!(vendor.synonyms_for_erp("SAGE").iter().any(|s| s.name == "supplier_ref"));
    // Built-in synonyms survive the merge.
    assert!(vendor.synonyms_for_erp("SAP").iter().any(|s| s.name == "LIFNR"));
}
