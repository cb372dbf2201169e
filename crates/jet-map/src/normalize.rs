//! Column-name normalization.
//!
//! Two names refer to the same field iff their normalized forms are equal.

use std::collections::HashMap;

/// Normalizes a column name for comparison: folds known accented letters
/// to ASCII, lowercases, and strips everything that is not an ASCII letter
/// or digit.
pub fn normalize_name(raw: &str) -> String {
    let mut normalized = String::with_capacity(raw.len());
    for ch in raw.chars() {
        let folded = fold_accent(ch);
        for ch in folded.to_lowercase() {
            if ch.is_ascii_alphanumeric() {
                normalized.push(ch);
            }
        }
    }
    normalized
}

fn fold_accent(ch: char) -> char {
    match ch {
        'á' | 'à' | 'Á' | 'À' => 'a',
        'é' | 'è' | 'É' | 'È' => 'e',
        'í' | 'ì' | 'Í' | 'Ì' => 'i',
        'ó' | 'ò' | 'Ó' | 'Ò' => 'o',
        'ú' | 'ù' | 'ü' | 'Ú' | 'Ù' | 'Ü' => 'u',
        'ñ' | 'Ñ' => 'n',
        'ç' | 'Ç' => 'c',
        other => other,
    }
}

/// Session-scoped memo cache over [`normalize_name`].
///
/// Mapping sessions are single-threaded; the cache is append-only and is
/// rebuilt per session rather than shared across threads.
#[derive(Debug, Default)]
pub struct NameCache {
    entries: HashMap<String, String>,
}

impl NameCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn normalize(&mut self, raw: &str) -> String {
        if let Some(cached) = self.entries.get(raw) {
            return cached.clone();
        }
        let normalized = normalize_name(raw);
        self.entries.insert(raw.to_string(), normalized.clone());
        normalized
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Accounting vocabulary from German, French, Italian and Portuguese
/// exports, folded to the Spanish tokens the synonym catalog is biased
/// towards. Applied as a retry when the raw name finds no synonym.
const TRANSLATIONS: &[(&str, &str)] = &[
    // German (kontoname before konto so the longer token wins)
    ("datum", "fecha"),
    ("betrag", "importe"),
    ("kontoname", "nombrecuenta"),
    ("konto", "cuenta"),
    ("soll", "debe"),
    ("haben", "haber"),
    ("buchung", "asiento"),
    ("beleg", "documento"),
    ("lieferant", "proveedor"),
    // French
    ("montant", "importe"),
    ("compte", "cuenta"),
    ("ecriture", "asiento"),
    ("fournisseur", "proveedor"),
    // Italian
    ("importo", "importe"),
    ("conto", "cuenta"),
    ("dare", "debe"),
    ("avere", "haber"),
    ("scrittura", "asiento"),
    ("fornitore", "proveedor"),
    // Portuguese
    ("lancamento", "asiento"),
    ("fornecedor", "proveedor"),
    ("conta", "cuenta"),
];

/// Rewrites foreign accounting tokens inside a normalized name to their
/// Spanish equivalents. Returns `None` when nothing was translated.
pub fn translate_name(normalized: &str) -> Option<String> {
    let mut translated = normalized.to_string();
    let mut changed = false;
    for (foreign, spanish) in TRANSLATIONS {
        if translated.contains(foreign) {
            translated = translated.replace(foreign, spanish);
            changed = true;
        }
    }
    changed.then_some(translated)
}
