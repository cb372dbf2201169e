//! File-based catalog storage.
//!
//! Catalogs are stored as a single pretty-printed JSON document. A loaded
//! file can either replace the built-in catalog or be merged on top of it,
//! which is the common deployment shape: built-in defaults plus a site file
//! with extra ERP synonyms.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use tracing::{debug, info};

use jet_model::FieldCatalog;

use crate::builtin::builtin_catalog;

/// Reads a catalog from a JSON file.
pub fn load_catalog(path: &Path) -> Result<FieldCatalog> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("Failed to read catalog from {}", path.display()))?;
    let catalog: FieldCatalog = serde_json::from_str(&contents)
        .with_context(|| format!("Failed to parse catalog from {}", path.display()))?;
    debug!(
        fields = catalog.len(),
        synonyms = catalog.total_synonyms(),
        "catalog loaded"
    );
    Ok(catalog)
}

/// Writes a catalog to a JSON file, creating parent directories as needed.
pub fn save_catalog(catalog: &FieldCatalog, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create catalog directory {}", parent.display()))?;
    }
    let json = serde_json::to_string_pretty(catalog).context("Failed to serialize catalog")?;
    fs::write(path, json)
        .with_context(|| format!("Failed to write catalog to {}", path.display()))?;
    Ok(())
}

/// Merges `overlay` into `base`: field definitions present in the overlay
/// replace display metadata, and their synonyms are added on top of the
/// base set (duplicates by name are kept once).
pub fn merge_catalogs(base: &mut FieldCatalog, overlay: FieldCatalog) {
    for def in overlay.fields().cloned().collect::<Vec<_>>() {
        match base.get_mut(def.code) {
            Some(existing) => {
                existing.display_name = def.display_name;
                existing.kind = def.kind;
                for (erp, synonyms) in def.synonyms_by_erp {
                    for synonym in synonyms {
                        existing.add_synonym(&erp, synonym.name, synonym.confidence_boost);
                    }
                }
            }
            None => base.insert(def),
        }
    }
}

/// Resolves the catalog a session should use: the built-in defaults,
/// optionally overlaid with a site-specific JSON file.
pub fn resolve_catalog(overlay_path: Option<&Path>) -> Result<FieldCatalog> {
    let mut catalog = builtin_catalog();
    if let Some(path) = overlay_path {
        let overlay = load_catalog(path)?;
        merge_catalogs(&mut catalog, overlay);
        info!(
            path = %path.display(),
            fields = catalog.len(),
            synonyms = catalog.total_synonyms(),
            "catalog overlay applied"
        );
    }
    Ok(catalog)
}
