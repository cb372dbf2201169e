use serde::{Deserialize, Serialize};

use crate::field::FieldCode;

/// How a candidate mapping was produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchSource {
    /// Exact or near-exact synonym lookup.
    Exact,
    /// Content-based statistical analysis.
    Content,
    /// Merged exact and content signals.
    Combined,
    /// Winner of a balance-oracle tie-break.
    BalanceResolved,
    /// Forced by a hard name override, bypassing ranking.
    Forced,
}

/// An ephemeral candidate mapping produced for one column.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Candidate {
    pub code: FieldCode,
    /// Confidence in [0.0, 1.0].
    pub confidence: f64,
    pub source: MatchSource,
}

/// Statistical profile of a source column, computed once at ingest.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct ColumnProfile {
    /// True when most non-null values parse as numbers.
    pub is_numeric: bool,
    /// Ratio of non-null values that parse as numbers (0.0 to 1.0).
    pub numeric_ratio: f64,
    /// Ratio of distinct values to non-null values (0.0 to 1.0).
    pub unique_ratio: f64,
    /// Ratio of null/blank cells to total rows (0.0 to 1.0).
    pub null_ratio: f64,
}

/// A settled column-to-field assignment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FieldMapping {
    pub column: String,
    pub code: FieldCode,
    pub confidence: f64,
    pub source: MatchSource,
}

/// Why a conflict was settled the way it was.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResolutionReason {
    /// The challenger's confidence exceeded the incumbent's by the margin.
    HigherConfidence,
    /// The challenger's content looked more like monetary data.
    BetterAmountCandidate,
    /// The challenger's name scored higher on field-specific keywords.
    MoreSpecificName,
    /// The challenger won the grouped balance test outright.
    BalanceScore,
    /// Balance scores tied; confidence broke the tie.
    BalanceTieConfidence,
}

/// Audit record of a resolved mapping conflict.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResolutionOutcome {
    pub code: FieldCode,
    pub winning_column: String,
    pub losing_column: String,
    pub confidence: f64,
    pub reason: ResolutionReason,
}
