//! Unique-assignment resolution.
//!
//! Maintains the one-field-one-column invariant for a mapping session and
//! settles conflicts: by confidence margin, by content, by name
//! specificity, and for the entry identifier by the balance oracle.

use std::collections::BTreeMap;

use tracing::{debug, info};

use jet_model::{
    Candidate, FieldCode, JetError, MatchSource, ResolutionOutcome, ResolutionReason, Table,
};

use crate::balance::{AmountColumns, BalanceOracle};

/// Confidence margin a challenger must clear to displace an incumbent.
const REASSIGN_MARGIN: f64 = 0.2;
/// Minimum recorded confidence for an amount mapping to feed the oracle.
const MIN_AMOUNT_CONFIDENCE: f64 = 0.75;
/// Balance scores closer than this are treated as a tie.
const BALANCE_TIE_WINDOW: f64 = 0.1;

/// Session-scoped bidirectional mapping state.
///
/// Each field maps to at most one column and vice versa. All mutation
/// goes through the resolver's protocol; claims are released before a
/// field is granted to a different column.
#[derive(Debug, Default, Clone)]
pub struct MappingTable {
    by_code: BTreeMap<FieldCode, String>,
    by_column: BTreeMap<String, FieldCode>,
    confidence: BTreeMap<String, f64>,
}

impl MappingTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn column_for(&self, code: FieldCode) -> Option<&str> {
        self.by_code.get(&code).map(String::as_str)
    }

    pub fn code_for(&self, column: &str) -> Option<FieldCode> {
        self.by_column.get(column).copied()
    }

    pub fn confidence_for(&self, column: &str) -> Option<f64> {
        self.confidence.get(column).copied()
    }

    pub fn mappings(&self) -> impl Iterator<Item = (FieldCode, &str)> {
        self.by_code.iter().map(|(code, col)| (*code, col.as_str()))
    }

    pub fn len(&self) -> usize {
        self.by_code.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_code.is_empty()
    }

    /// Grants `code` to `column`. Both sides must be unclaimed; the
    /// resolver releases incumbents first. A caller forcing two fields
    /// onto one column is a structural violation and gets an error.
    pub fn claim(&mut self, code: FieldCode, column: &str, confidence: f64) -> Result<(), JetError> {
        if let Some(existing) = self.by_column.get(column) {
            return Err(JetError::ColumnAlreadyMapped {
                column: column.to_string(),
                code: *existing,
            });
        }
        if self.by_code.contains_key(&code) {
            return Err(JetError::Message(format!(
                "field {code} is already claimed"
            )));
        }
        self.by_code.insert(code, column.to_string());
        self.by_column.insert(column.to_string(), code);
        self.confidence.insert(column.to_string(), confidence.clamp(0.0, 1.0));
        Ok(())
    }

    /// Releases whatever column holds `code`; returns the released column.
    pub fn release(&mut self, code: FieldCode) -> Option<String> {
        let column = self.by_code.remove(&code)?;
        self.by_column.remove(&column);
        self.confidence.remove(&column);
        Some(column)
    }
}

/// Per-field keyword tables used to judge which of two column names is
/// more specific. Hand-tuned and Spanish-biased; treated as data so
/// deployments can swap their own in.
#[derive(Debug, Clone)]
pub struct SpecificityTable {
    keywords: BTreeMap<FieldCode, Vec<String>>,
}

impl Default for SpecificityTable {
    fn default() -> Self {
        let mut keywords = BTreeMap::new();
        let entries: [(FieldCode, &[&str]); 8] = [
            (FieldCode::Amount, &["saldo", "balance", "importe", "amount"]),
            (FieldCode::DebitAmount, &["debe", "debit"]),
            (FieldCode::CreditAmount, &["haber", "credit"]),
            (FieldCode::JournalEntryId, &["asiento", "journal"]),
            (FieldCode::PostingDate, &["fecha", "date"]),
            (FieldCode::GlAccountNumber, &["cuenta", "account"]),
            (FieldCode::GlAccountName, &["nombre", "name"]),
            (FieldCode::VendorId, &["proveedor", "vendor", "supplier"]),
        ];
        for (code, words) in entries {
            keywords.insert(code, words.iter().map(|w| (*w).to_string()).collect());
        }
        Self { keywords }
    }
}

impl SpecificityTable {
    pub fn new(keywords: BTreeMap<FieldCode, Vec<String>>) -> Self {
        Self { keywords }
    }

    /// Counts how many of the field's keywords appear in the name.
    fn score(&self, code: FieldCode, column_name: &str) -> usize {
        let Some(words) = self.keywords.get(&code) else {
            return 0;
        };
        let name_lower = column_name.to_lowercase();
        words.iter().filter(|w| name_lower.contains(w.as_str())).count()
    }
}

/// Counters describing how a session's conflicts were settled.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ResolverStats {
    pub reassignments: usize,
    pub unresolved_conflicts: usize,
    pub balance_wins: usize,
    pub forced_mappings: usize,
}

/// Everything the balance tie-break needs from the caller.
pub struct BalanceContext<'a> {
    pub table: &'a Table,
    pub oracle: &'a dyn BalanceOracle,
}

/// The conflict-resolving writer of a [`MappingTable`].
#[derive(Default)]
pub struct Resolver {
    table: MappingTable,
    specificity: SpecificityTable,
    stats: ResolverStats,
    outcomes: Vec<ResolutionOutcome>,
}

impl Resolver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_specificity(specificity: SpecificityTable) -> Self {
        Self {
            specificity,
            ..Self::default()
        }
    }

    pub fn mapping_table(&self) -> &MappingTable {
        &self.table
    }

    pub fn stats(&self) -> ResolverStats {
        self.stats
    }

    pub fn outcomes(&self) -> &[ResolutionOutcome] {
        &self.outcomes
    }

    pub fn into_parts(self) -> (MappingTable, ResolverStats, Vec<ResolutionOutcome>) {
        (self.table, self.stats, self.outcomes)
    }

    /// Claims a field outside conflict resolution (the header/description
    /// override). Fails if the field or the column is already taken.
    pub fn force_claim(&mut self, code: FieldCode, column: &str, confidence: f64) -> bool {
        if self.table.column_for(code).is_some() {
            debug!(%code, column, "forced mapping skipped: field already claimed");
            return false;
        }
        match self.table.claim(code, column, confidence) {
            Ok(()) => {
                self.stats.forced_mappings += 1;
                info!(%code, column, confidence, "forced mapping");
                true
            }
            Err(error) => {
                debug!(%error, "forced mapping rejected");
                false
            }
        }
    }

    /// Offers a candidate for a column; called once per column in
    /// priority order. Mutates the mapping table and returns the settled
    /// candidate, or `None` when the incumbent stands and the column
    /// stays unmapped.
    pub fn resolve(
        &mut self,
        column_name: &str,
        candidate: Candidate,
        samples: &[&str],
        balance: Option<&BalanceContext<'_>>,
    ) -> Option<Candidate> {
        // A column the session already mapped cannot compete again.
        if self.table.code_for(column_name).is_some() {
            return None;
        }

        let Some(existing_column) = self.table.column_for(candidate.code).map(str::to_string)
        else {
            // No conflict: claim directly.
            return self
                .table
                .claim(candidate.code, column_name, candidate.confidence)
                .ok()
                .map(|()| candidate)
        };
        let existing_confidence = self.table.confidence_for(&existing_column).unwrap_or(0.0);

        if candidate.code == FieldCode::JournalEntryId
            && let Some(ctx) = balance
            && let Some(resolved) = self.resolve_journal_conflict(
                &existing_column,
                existing_confidence,
                column_name,
                &candidate,
                ctx,
            )
        {
            return resolved;
        }

        // Generic rules, in order.
        let reason = if candidate.confidence > existing_confidence + REASSIGN_MARGIN {
            Some(ResolutionReason::HigherConfidence)
        } else if candidate.code == FieldCode::Amount
            && is_better_amount_candidate(column_name, samples)
        {
            Some(ResolutionReason::BetterAmountCandidate)
        } else if self.specificity.score(candidate.code, column_name)
            > self.specificity.score(candidate.code, &existing_column)
        {
            Some(ResolutionReason::MoreSpecificName)
        } else {
            None
        };

        match reason {
            Some(reason) => {
                self.reassign(&existing_column, column_name, candidate, reason);
                Some(candidate)
            }
            None => {
                self.stats.unresolved_conflicts += 1;
                debug!(
                    code = %candidate.code,
                    column = column_name,
                    incumbent = %existing_column,
                    "conflict kept incumbent"
                );
                None
            }
        }
    }

    /// Balance tie-break for `journal_entry_id`. Returns `None` when the
    /// preconditions fail, which drops through to the generic rules.
    fn resolve_journal_conflict(
        &mut self,
        existing_column: &str,
        existing_confidence: f64,
        new_column: &str,
        candidate: &Candidate,
        ctx: &BalanceContext<'_>,
    ) -> Option<Option<Candidate>> {
        let amounts = self.reliable_amount_columns()?;

        let existing_score =
            ctx.oracle
                .entry_balance_score(ctx.table, existing_column, &amounts);
        let new_score = ctx.oracle.entry_balance_score(ctx.table, new_column, &amounts);
        debug!(
            incumbent = existing_column,
            challenger = new_column,
            existing_score,
            new_score,
            "journal entry balance tie-break"
        );

        let (new_wins, reason) = if (existing_score - new_score).abs() < BALANCE_TIE_WINDOW {
            (
                candidate.confidence > existing_confidence,
                ResolutionReason::BalanceTieConfidence,
            )
        } else {
            (new_score > existing_score, ResolutionReason::BalanceScore)
        };

        if new_wins {
            let settled = Candidate {
                source: MatchSource::BalanceResolved,
                ..*candidate
            };
            self.reassign(existing_column, new_column, settled, reason);
            self.stats.balance_wins += 1;
            Some(Some(settled))
        } else {
            // Incumbent confirmed; record the outcome for the audit trail.
            self.outcomes.push(ResolutionOutcome {
                code: candidate.code,
                winning_column: existing_column.to_string(),
                losing_column: new_column.to_string(),
                confidence: existing_confidence,
                reason,
            });
            Some(None)
        }
    }

    /// Amount-family claims usable by the oracle. Aborts (returns `None`)
    /// when none exist or any was recorded below the confidence floor:
    /// unreliable amount columns would make the oracle meaningless.
    fn reliable_amount_columns(&self) -> Option<AmountColumns> {
        let mut amounts = AmountColumns::default();
        for (code, column) in self.table.mappings() {
            if !code.is_amount_family() {
                continue;
            }
            let confidence = self.table.confidence_for(column).unwrap_or(0.0);
            if confidence < MIN_AMOUNT_CONFIDENCE {
                debug!(%code, column, confidence, "amount mapping below oracle floor");
                return None;
            }
            amounts.set(code, column);
        }
        (!amounts.is_empty()).then_some(amounts)
    }

    fn reassign(
        &mut self,
        existing_column: &str,
        new_column: &str,
        candidate: Candidate,
        reason: ResolutionReason,
    ) {
        self.table.release(candidate.code);
        // Claim cannot fail here: the field was just released and a
        // previously mapped challenger is rejected up front.
        let _ = self.table.claim(candidate.code, new_column, candidate.confidence);
        self.stats.reassignments += 1;
        self.outcomes.push(ResolutionOutcome {
            code: candidate.code,
            winning_column: new_column.to_string(),
            losing_column: existing_column.to_string(),
            confidence: candidate.confidence,
            reason,
        });
        info!(
            code = %candidate.code,
            winner = new_column,
            loser = existing_column,
            ?reason,
            "mapping reassigned"
        );
    }
}

/// Content check backing the amount-specific reassignment rule: the name
/// carries an amount keyword and the values vary like money.
fn is_better_amount_candidate(column_name: &str, samples: &[&str]) -> bool {
    let name_lower = column_name.to_lowercase();
    let keyword = ["saldo", "balance", "importe", "amount", "total"]
        .iter()
        .any(|w| name_lower.contains(w));
    if !keyword {
        return false;
    }
    let numbers: Vec<f64> = samples
        .iter()
        .filter_map(|v| v.trim().parse::<f64>().ok())
        .collect();
    if numbers.is_empty() {
        return false;
    }
    let mean = numbers.iter().sum::<f64>() / numbers.len() as f64;
    let std = if numbers.len() < 2 {
        0.0
    } else {
        (numbers.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (numbers.len() - 1) as f64)
            .sqrt()
    };
    std > 1.0 && mean.abs() > 1.0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn candidate(code: FieldCode, confidence: f64) -> Candidate {
        Candidate {
            code,
            confidence,
            source: MatchSource::Exact,
        }
    }

    #[test]
    fn first_claim_succeeds() {
        let mut resolver = Resolver::new();
        let settled = resolver.resolve("Debe", candidate(FieldCode::DebitAmount, 0.95), &[], None);
        assert!(settled.is_some());
        assert_eq!(
            resolver.mapping_table().column_for(FieldCode::DebitAmount),
            Some("Debe")
        );
    }

    #[test]
    fn higher_confidence_displaces_incumbent() {
        let mut resolver = Resolver::new();
        resolver.resolve("Col A", candidate(FieldCode::PostingDate, 0.5), &[], None);
        let settled = resolver.resolve("Col B", candidate(FieldCode::PostingDate, 0.8), &[], None);
        assert!(settled.is_some());
        assert_eq!(
            resolver.mapping_table().column_for(FieldCode::PostingDate),
            Some("Col B")
        );
        assert_eq!(resolver.stats().reassignments, 1);
        assert_eq!(
            resolver.outcomes()[0].reason,
            ResolutionReason::HigherConfidence
        );
        // The loser is fully released.
        assert!(resolver.mapping_table().code_for("Col A").is_none());
    }

    #[test]
    fn close_confidence_keeps_incumbent() {
        let mut resolver = Resolver::new();
        resolver.resolve("Col A", candidate(FieldCode::PostingDate, 0.7), &[], None);
        let settled = resolver.resolve("Col B", candidate(FieldCode::PostingDate, 0.8), &[], None);
        assert!(settled.is_none());
        assert_eq!(resolver.stats().unresolved_conflicts, 1);
        assert_eq!(
            resolver.mapping_table().column_for(FieldCode::PostingDate),
            Some("Col A")
        );
    }

    #[test]
    fn amount_keyword_with_monetary_content_wins() {
        let mut resolver = Resolver::new();
        resolver.resolve("Col X", candidate(FieldCode::Amount, 0.8), &[], None);
        let samples = ["1250.5", "-730.0", "89.9"];
        let settled = resolver.resolve("Saldo", candidate(FieldCode::Amount, 0.75), &samples, None);
        assert!(settled.is_some());
        assert_eq!(
            resolver.outcomes()[0].reason,
            ResolutionReason::BetterAmountCandidate
        );
    }

    #[test]
    fn more_specific_name_wins() {
        let mut resolver = Resolver::new();
        resolver.resolve("Col 7", candidate(FieldCode::JournalEntryId, 0.8), &[], None);
        let settled =
            resolver.resolve("Asiento", candidate(FieldCode::JournalEntryId, 0.75), &[], None);
        assert!(settled.is_some());
        assert_eq!(
            resolver.outcomes()[0].reason,
            ResolutionReason::MoreSpecificName
        );
    }

    #[test]
    fn mapped_column_cannot_compete_again() {
        let mut resolver = Resolver::new();
        resolver.resolve("Fecha", candidate(FieldCode::PostingDate, 0.9), &[], None);
        let settled = resolver.resolve("Fecha", candidate(FieldCode::EntryDate, 0.9), &[], None);
        assert!(settled.is_none());
        assert_eq!(
            resolver.mapping_table().code_for("Fecha"),
            Some(FieldCode::PostingDate)
        );
    }

    #[test]
    fn force_claim_respects_existing_claims() {
        let mut resolver = Resolver::new();
        assert!(resolver.force_claim(FieldCode::Description, "Descripción Cabecera", 0.95));
        assert!(!resolver.force_claim(FieldCode::Description, "Otra Descripción", 0.95));
        assert_eq!(resolver.stats().forced_mappings, 1);
    }

    #[test]
    fn claim_rejects_double_column_use() {
        let mut table = MappingTable::new();
        table.claim(FieldCode::PostingDate, "Fecha", 0.9).unwrap();
        let error = table.claim(FieldCode::EntryDate, "Fecha", 0.9).unwrap_err();
        assert!(matches!(error, JetError::ColumnAlreadyMapped { .. }));
    }
}
