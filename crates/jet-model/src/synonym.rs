use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::field::{DataKind, FieldCode};

/// A known alternate column name for a canonical field, scoped to an ERP.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Synonym {
    /// The alternate name as exported by the source system.
    pub name: String,
    /// Extra confidence granted when this synonym matches (0.0 to 1.0).
    #[serde(default)]
    pub confidence_boost: f64,
}

impl Synonym {
    pub fn new(name: impl Into<String>, confidence_boost: f64) -> Self {
        Self {
            name: name.into(),
            confidence_boost: confidence_boost.clamp(0.0, 1.0),
        }
    }
}

/// Definition of one canonical field: display metadata plus its synonym sets.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FieldDef {
    pub code: FieldCode,
    pub display_name: String,
    pub kind: DataKind,
    /// Synonyms grouped by ERP system name (e.g. "SAP", "Generic_ES").
    #[serde(default)]
    pub synonyms_by_erp: BTreeMap<String, Vec<Synonym>>,
}

impl FieldDef {
    pub fn new(code: FieldCode, display_name: impl Into<String>, kind: DataKind) -> Self {
        Self {
            code,
            display_name: display_name.into(),
            kind,
            synonyms_by_erp: BTreeMap::new(),
        }
    }

    /// Synonyms registered for a specific ERP system.
    pub fn synonyms_for_erp(&self, erp_system: &str) -> &[Synonym] {
        self.synonyms_by_erp
            .get(erp_system)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// All synonyms across every ERP system.
    pub fn all_synonyms(&self) -> impl Iterator<Item = &Synonym> {
        self.synonyms_by_erp.values().flatten()
    }

    /// Registers a synonym; returns false if the name already exists for the ERP.
    pub fn add_synonym(
        &mut self,
        erp_system: impl Into<String>,
        name: impl Into<String>,
        confidence_boost: f64,
    ) -> bool {
        let name = name.into();
        let entry = self.synonyms_by_erp.entry(erp_system.into()).or_default();
        if entry.iter().any(|s| s.name.eq_ignore_ascii_case(&name)) {
            return false;
        }
        entry.push(Synonym::new(name, confidence_boost));
        true
    }

    /// Removes a synonym by name; returns true if something was removed.
    pub fn remove_synonym(&mut self, erp_system: &str, name: &str) -> bool {
        let Some(entry) = self.synonyms_by_erp.get_mut(erp_system) else {
            return false;
        };
        let before = entry.len();
        entry.retain(|s| !s.name.eq_ignore_ascii_case(name));
        if entry.is_empty() {
            self.synonyms_by_erp.remove(erp_system);
        }
        before != self.synonyms_by_erp.get(erp_system).map_or(0, Vec::len)
    }
}

/// The resolved synonym catalog a mapping session reads from.
///
/// Read-only during a session; mutation happens only through explicit
/// add/remove before a session starts (catalog reload and mapping are
/// mutually exclusive).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FieldCatalog {
    fields: BTreeMap<FieldCode, FieldDef>,
}

impl FieldCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, def: FieldDef) {
        self.fields.insert(def.code, def);
    }

    pub fn get(&self, code: FieldCode) -> Option<&FieldDef> {
        self.fields.get(&code)
    }

    pub fn get_mut(&mut self, code: FieldCode) -> Option<&mut FieldDef> {
        self.fields.get_mut(&code)
    }

    pub fn fields(&self) -> impl Iterator<Item = &FieldDef> {
        self.fields.values()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// All ERP system names appearing anywhere in the catalog, sorted.
    pub fn erp_systems(&self) -> Vec<&str> {
        let mut systems: Vec<&str> = self
            .fields
            .values()
            .flat_map(|def| def.synonyms_by_erp.keys())
            .map(String::as_str)
            .collect();
        systems.sort_unstable();
        systems.dedup();
        systems
    }

    pub fn total_synonyms(&self) -> usize {
        self.fields
            .values()
            .map(|def| def.all_synonyms().count())
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_and_remove_synonym() {
        let mut def = FieldDef::new(FieldCode::Amount, "Importe", DataKind::Currency);
        assert!(def.add_synonym("SAP", "DMBTR", 0.95));
        assert!(!def.add_synonym("SAP", "dmbtr", 0.5));
        assert_eq!(def.synonyms_for_erp("SAP").len(), 1);
        assert!(def.remove_synonym("SAP", "DMBTR"));
        assert!(def.synonyms_for_erp("SAP").is_empty());
    }

    #[test]
    fn boost_is_clamped() {
        let synonym = Synonym::new("Saldo", 1.7);
        assert_eq!(synonym.confidence_boost, 1.0);
    }

    #[test]
    fn catalog_reports_erp_systems() {
        let mut catalog = FieldCatalog::new();
        let mut def = FieldDef::new(FieldCode::Amount, "Importe", DataKind::Currency);
        def.add_synonym("SAP", "DMBTR", 0.95);
        def.add_synonym("Generic_ES", "Importe", 0.95);
        catalog.insert(def);
        assert_eq!(catalog.erp_systems(), vec!["Generic_ES", "SAP"]);
        assert_eq!(catalog.total_synonyms(), 2);
    }
}
