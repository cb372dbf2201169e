//! Exact and near-exact synonym matching.

use std::collections::BTreeMap;

use rapidfuzz::distance::jaro_winkler::similarity as jaro_similarity;

use jet_model::{Candidate, FieldCatalog, FieldCode, MatchSource};

use crate::normalize::{NameCache, normalize_name, translate_name};

/// Confidence when the normalized column name equals the canonical code.
const CODE_MATCH_CONFIDENCE: f64 = 0.90;
/// Jaro-Winkler floor for the near-exact tier.
const NEAR_EXACT_SIMILARITY: f64 = 0.96;
/// Near-exact matches score this much below the corresponding exact tier.
const NEAR_EXACT_PENALTY: f64 = 0.05;

/// Generic prefixes that flag a problematic partial match: a synonym
/// buried inside a longer name that starts with one of these belongs to a
/// different semantic field (e.g. "FechaCreacionUsuario" vs "usuario").
const PROBLEMATIC_PREFIXES: &[&str] = &["fecha", "numero", "codigo", "tipo", "descripcion"];

/// Looks up candidate fields for a column name by synonym equality,
/// ERP-prioritized, with a near-exact fuzzy tier as backstop.
pub struct ExactMatcher<'c> {
    catalog: &'c FieldCatalog,
}

impl<'c> ExactMatcher<'c> {
    pub fn new(catalog: &'c FieldCatalog) -> Self {
        Self { catalog }
    }

    /// Returns one candidate per matched field, highest confidence kept.
    ///
    /// Priority order per field:
    /// 1. synonym match within the hinted ERP: `min(0.95 + boost*0.05, 1.0)`
    /// 2. synonym match within any ERP: `min(0.85 + boost*0.10, 1.0)`
    /// 3. canonical code match: `0.90`
    ///
    /// A near-exact match (normalized Jaro-Winkler ≥ 0.96) fills in only
    /// for fields that found no exact match, at the tier confidence minus
    /// 0.05. When the raw name matches nothing, known foreign tokens are
    /// folded to Spanish and the lookup retried.
    pub fn find_exact(
        &self,
        cache: &mut NameCache,
        column_name: &str,
        erp_hint: Option<&str>,
    ) -> Vec<Candidate> {
        let normalized = cache.normalize(column_name);
        let matches = self.lookup(cache, column_name, &normalized, erp_hint);
        if !matches.is_empty() {
            return matches;
        }
        match translate_name(&normalized) {
            Some(translated) => self.lookup(cache, column_name, &translated, erp_hint),
            None => matches,
        }
    }

    fn lookup(
        &self,
        cache: &mut NameCache,
        column_name: &str,
        normalized: &str,
        erp_hint: Option<&str>,
    ) -> Vec<Candidate> {
        let mut exact: BTreeMap<FieldCode, f64> = BTreeMap::new();
        let mut near: BTreeMap<FieldCode, f64> = BTreeMap::new();

        for def in self.catalog.fields() {
            // Priority 1: the hinted ERP's synonym set.
            if let Some(erp) = erp_hint {
                for synonym in def.synonyms_for_erp(erp) {
                    self.match_synonym(
                        cache,
                        column_name,
                        normalized,
                        &synonym.name,
                        (0.95_f64 + synonym.confidence_boost * 0.05).min(1.0),
                        def.code,
                        &mut exact,
                        &mut near,
                    );
                }
            }

            // Priority 2: every ERP's synonym set.
            for synonym in def.all_synonyms() {
                self.match_synonym(
                    cache,
                    column_name,
                    normalized,
                    &synonym.name,
                    (0.85_f64 + synonym.confidence_boost * 0.10).min(1.0),
                    def.code,
                    &mut exact,
                    &mut near,
                );
            }

            // Priority 3: the canonical code itself.
            if normalized == normalize_name(def.code.as_str()) {
                merge_max(&mut exact, def.code, CODE_MATCH_CONFIDENCE);
            }
        }

        // Near-exact fills in only where no exact match exists.
        for (code, confidence) in near {
            exact.entry(code).or_insert(confidence);
        }

        exact
            .into_iter()
            .map(|(code, confidence)| Candidate {
                code,
                confidence,
                source: MatchSource::Exact,
            })
            .collect()
    }

    #[allow(clippy::too_many_arguments)]
    fn match_synonym(
        &self,
        cache: &mut NameCache,
        column_name: &str,
        normalized: &str,
        synonym_name: &str,
        tier_confidence: f64,
        code: FieldCode,
        exact: &mut BTreeMap<FieldCode, f64>,
        near: &mut BTreeMap<FieldCode, f64>,
    ) {
        let synonym_normalized = cache.normalize(synonym_name);
        if synonym_normalized.is_empty() {
            return;
        }
        if normalized == synonym_normalized {
            if !is_problematic_partial_match(column_name, synonym_name) {
                merge_max(exact, code, tier_confidence);
            }
            return;
        }
        let similarity = jaro_similarity(normalized.chars(), synonym_normalized.chars());
        if similarity >= NEAR_EXACT_SIMILARITY
            && !is_problematic_partial_match(column_name, synonym_name)
        {
            merge_max(near, code, (tier_confidence - NEAR_EXACT_PENALTY).max(0.0));
        }
    }
}

fn merge_max(map: &mut BTreeMap<FieldCode, f64>, code: FieldCode, confidence: f64) {
    let entry = map.entry(code).or_insert(confidence);
    if confidence > *entry {
        *entry = confidence;
    }
}

/// A synonym that is a strict substring of the column name does not count
/// when the column starts with a generic prefix the synonym lacks.
fn is_problematic_partial_match(column_name: &str, synonym_name: &str) -> bool {
    let column_lower = column_name.to_lowercase();
    let synonym_lower = synonym_name.to_lowercase();
    if column_lower == synonym_lower || !column_lower.contains(&synonym_lower) {
        return false;
    }
    PROBLEMATIC_PREFIXES
        .iter()
        .any(|prefix| column_lower.starts_with(prefix) && !prefix.contains(&synonym_lower))
}
