//! Candidate ranking: merges exact-match and content-analysis signals
//! into a single best candidate per column.

use std::collections::BTreeMap;

use jet_model::{Candidate, FieldCode, MatchSource};

/// Minimum merged confidence for a column to be mapped at all.
pub const MIN_CONFIDENCE: f64 = 0.3;

/// Weight of the incumbent exact score when content agrees.
const EXACT_WEIGHT: f64 = 0.7;
/// Weight of the content score when merged into an exact match.
const CONTENT_WEIGHT: f64 = 0.3;
/// Damping applied to content-only candidates.
const CONTENT_ONLY_FACTOR: f64 = 0.8;

/// Merges exact matches and content scores and returns the best candidate.
///
/// Exact matches form the base. A content score for a field already
/// present combines as `exact*0.7 + content*0.3` (capped at 1.0) and the
/// candidate becomes `Combined`; a content score for a new field enters
/// as `content*0.8`. Candidates below [`MIN_CONFIDENCE`] are dropped.
pub fn rank(
    exact_matches: &[Candidate],
    content_scores: &BTreeMap<FieldCode, f64>,
) -> Option<Candidate> {
    let mut merged: BTreeMap<FieldCode, (f64, MatchSource)> = exact_matches
        .iter()
        .map(|c| (c.code, (c.confidence, MatchSource::Exact)))
        .collect();

    for (&code, &content) in content_scores {
        match merged.get_mut(&code) {
            Some((confidence, source)) => {
                *confidence = (*confidence * EXACT_WEIGHT + content * CONTENT_WEIGHT).min(1.0);
                *source = MatchSource::Combined;
            }
            None => {
                merged.insert(code, (content * CONTENT_ONLY_FACTOR, MatchSource::Content));
            }
        }
    }

    merged
        .into_iter()
        .max_by(|a, b| {
            a.1.0
                .partial_cmp(&b.1.0)
                .unwrap_or(std::cmp::Ordering::Equal)
        })
        .map(|(code, (confidence, source))| Candidate {
            code,
            confidence,
            source,
        })
        .filter(|c| c.confidence >= MIN_CONFIDENCE)
}

/// Hard override: a column whose name carries both a header token and a
/// description token is the entry-header description, regardless of
/// content. Evaluated before ranking; the caller must still check that
/// `description` is unclaimed.
pub fn is_header_description_override(column_name: &str) -> bool {
    let name_lower = column_name.to_lowercase();
    let has_header = name_lower.contains("cabecera") || name_lower.contains("header");
    let has_description = name_lower.contains("descripcion")
        || name_lower.contains("descripción")
        || name_lower.contains("description");
    has_header && has_description
}

/// Confidence granted by the header/description override.
pub const HEADER_OVERRIDE_CONFIDENCE: f64 = 0.95;

#[cfg(test)]
mod tests {
    use super::*;

    fn exact(code: FieldCode, confidence: f64) -> Candidate {
        Candidate {
            code,
            confidence,
            source: MatchSource::Exact,
        }
    }

    #[test]
    fn exact_only_passes_through() {
        let best = rank(&[exact(FieldCode::DebitAmount, 0.95)], &BTreeMap::new()).unwrap();
        assert_eq!(best.code, FieldCode::DebitAmount);
        assert_eq!(best.source, MatchSource::Exact);
        assert!((best.confidence - 0.95).abs() < 1e-9);
    }

    #[test]
    fn agreeing_content_combines_weighted() {
        let mut content = BTreeMap::new();
        content.insert(FieldCode::DebitAmount, 0.8);
        let best = rank(&[exact(FieldCode::DebitAmount, 0.95)], &content).unwrap();
        assert_eq!(best.source, MatchSource::Combined);
        assert!((best.confidence - (0.95 * 0.7 + 0.8 * 0.3)).abs() < 1e-9);
    }

    #[test]
    fn content_only_is_damped() {
        let mut content = BTreeMap::new();
        content.insert(FieldCode::Amount, 0.9);
        let best = rank(&[], &content).unwrap();
        assert_eq!(best.source, MatchSource::Content);
        assert!((best.confidence - 0.72).abs() < 1e-9);
    }

    #[test]
    fn weak_candidates_are_rejected() {
        let mut content = BTreeMap::new();
        content.insert(FieldCode::Description, 0.3);
        // 0.3 * 0.8 = 0.24, below the floor.
        assert!(rank(&[], &content).is_none());
        assert!(rank(&[], &BTreeMap::new()).is_none());
    }

    #[test]
    fn header_description_override_detected() {
        assert!(is_header_description_override("Descripción Cabecera"));
        assert!(is_header_description_override("Header Description"));
        assert!(!is_header_description_override("Descripción"));
        assert!(!is_header_description_override("Cabecera"));
    }
}
