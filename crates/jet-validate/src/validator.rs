use std::collections::BTreeMap;

use serde::Serialize;
use tracing::{debug, warn};

use jet_map::{AmountColumns, BalanceOracle};
use jet_model::Table;
use jet_transform::clean_amount;

/// Default tolerance for decimal drift in summed amounts.
pub const DEFAULT_TOLERANCE: f64 = 0.01;

/// Weight of the total-balance factor in the oracle score.
const TOTAL_BALANCE_WEIGHT: f64 = 0.4;
/// Weight of the balanced-entry ratio in the oracle score.
const ENTRY_RATIO_WEIGHT: f64 = 0.6;

/// Per-entry balance result.
#[derive(Debug, Clone, Serialize)]
pub struct EntryBalance {
    pub entry_id: String,
    pub debit_sum: f64,
    pub credit_sum: f64,
    pub difference: f64,
    pub balanced: bool,
}

/// Full balance validation report for one table.
#[derive(Debug, Clone, Default, Serialize)]
pub struct BalanceReport {
    pub total_debit: f64,
    pub total_credit: f64,
    pub total_difference: f64,
    pub is_balanced: bool,
    pub entries_count: usize,
    pub balanced_entries: usize,
    pub unbalanced_entries: Vec<EntryBalance>,
    pub tolerance: f64,
}

impl BalanceReport {
    /// Ratio of balanced entries, zero when no entries were grouped.
    pub fn balanced_ratio(&self) -> f64 {
        if self.entries_count == 0 {
            return 0.0;
        }
        self.balanced_entries as f64 / self.entries_count as f64
    }
}

/// Validates the debit-equals-credit invariant over a table.
///
/// Works on raw string cells: amounts are cleaned with the same parser
/// the transform stage uses, and unparseable cells count as zero.
#[derive(Debug, Clone)]
pub struct BalanceValidator {
    tolerance: f64,
}

impl Default for BalanceValidator {
    fn default() -> Self {
        Self::new(DEFAULT_TOLERANCE)
    }
}

impl BalanceValidator {
    pub fn new(tolerance: f64) -> Self {
        Self {
            tolerance: tolerance.abs(),
        }
    }

    pub fn tolerance(&self) -> f64 {
        self.tolerance
    }

    /// Validates totals, and per-entry balance when `group_column` names
    /// an identifier column present in the table.
    pub fn validate(
        &self,
        table: &Table,
        amounts: &AmountColumns,
        group_column: Option<&str>,
    ) -> BalanceReport {
        let mut report = BalanceReport {
            tolerance: self.tolerance,
            ..BalanceReport::default()
        };
        if amounts.is_empty() {
            warn!("no amount columns available; skipping balance validation");
            return report;
        }

        let rows = table.row_count();
        let mut groups: BTreeMap<String, (f64, f64)> = BTreeMap::new();
        let group_values = group_column.and_then(|name| table.column(name));

        for row in 0..rows {
            let (debit, credit) = self.row_sides(table, amounts, row);
            report.total_debit += debit;
            report.total_credit += credit;

            if let Some(column) = group_values {
                let Some(key) = column.values.get(row).cloned().flatten() else {
                    continue;
                };
                let entry = groups.entry(key).or_insert((0.0, 0.0));
                entry.0 += debit;
                entry.1 += credit;
            }
        }

        report.total_difference = report.total_debit - report.total_credit;
        report.is_balanced = report.total_difference.abs() < self.tolerance;

        report.entries_count = groups.len();
        for (entry_id, (debit_sum, credit_sum)) in groups {
            let difference = debit_sum - credit_sum;
            let balanced = difference.abs() < self.tolerance;
            if balanced {
                report.balanced_entries += 1;
            } else {
                report.unbalanced_entries.push(EntryBalance {
                    entry_id,
                    debit_sum,
                    credit_sum,
                    difference,
                    balanced,
                });
            }
        }

        debug!(
            total_debit = report.total_debit,
            total_credit = report.total_credit,
            entries = report.entries_count,
            balanced = report.balanced_entries,
            "balance validation finished"
        );
        report
    }

    /// Cleaned debit/credit projection of one row. A lone signed amount
    /// is split into synthetic sides by sign.
    fn row_sides(&self, table: &Table, amounts: &AmountColumns, row: usize) -> (f64, f64) {
        let value_of = |name: &Option<String>| -> Option<f64> {
            name.as_deref()
                .and_then(|n| table.column(n))
                .and_then(|c| c.values.get(row))
                .and_then(|cell| cell.as_deref())
                .map(clean_amount)
        };

        match (value_of(&amounts.debit), value_of(&amounts.credit)) {
            (None, None) => {
                let amount = value_of(&amounts.amount).unwrap_or(0.0);
                if amount >= 0.0 {
                    (amount, 0.0)
                } else {
                    (0.0, -amount)
                }
            }
            (debit, credit) => (debit.unwrap_or(0.0), credit.unwrap_or(0.0)),
        }
    }

    /// Oracle score in [0, 1]: 0.4 for the total balancing plus 0.6 scaled
    /// by the balanced-entry ratio. An unbalanced total earns back part of
    /// the first factor proportionally to how small the drift is.
    fn score(&self, report: &BalanceReport) -> f64 {
        let mut score = 0.0;
        if report.is_balanced {
            score += TOTAL_BALANCE_WEIGHT;
        } else {
            let magnitude = report.total_debit.abs() + report.total_credit.abs();
            if magnitude > 0.0 {
                let drift = report.total_difference.abs() / magnitude;
                score += TOTAL_BALANCE_WEIGHT * (1.0 - drift * 5.0).max(0.0);
            }
        }
        score += ENTRY_RATIO_WEIGHT * report.balanced_ratio();
        score.min(1.0)
    }
}

impl BalanceOracle for BalanceValidator {
    fn entry_balance_score(
        &self,
        table: &Table,
        group_column: &str,
        amounts: &AmountColumns,
    ) -> f64 {
        if amounts.is_empty() || table.column(group_column).is_none() {
            return 0.0;
        }
        let report = self.validate(table, amounts, Some(group_column));
        if report.entries_count == 0 {
            return 0.0;
        }
        self.score(&report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jet_model::Column;

    fn amounts_debit_credit() -> AmountColumns {
        AmountColumns {
            debit: Some("debit_amount".to_string()),
            credit: Some("credit_amount".to_string()),
            amount: None,
        }
    }

    fn balanced_table() -> Table {
        Table::new(vec![
            Column::from_values("journal_entry_id", &["1", "1", "2", "2"]),
            Column::from_values("debit_amount", &["100.00", "0.00", "250.50", "0.00"]),
            Column::from_values("credit_amount", &["0.00", "100.00", "0.00", "250.50"]),
        ])
    }

    #[test]
    fn balanced_table_scores_one() {
        let validator = BalanceValidator::default();
        let report = validator.validate(
            &balanced_table(),
            &amounts_debit_credit(),
            Some("journal_entry_id"),
        );
        assert!(report.is_balanced);
        assert_eq!(report.entries_count, 2);
        assert_eq!(report.balanced_entries, 2);
        assert!(report.unbalanced_entries.is_empty());

        let score = validator.entry_balance_score(
            &balanced_table(),
            "journal_entry_id",
            &amounts_debit_credit(),
        );
        assert!((score - 1.0).abs() < 1e-9);
    }

    #[test]
    fn unbalanced_entries_are_listed() {
        let table = Table::new(vec![
            Column::from_values("journal_entry_id", &["1", "1", "2"]),
            Column::from_values("debit_amount", &["100.00", "0.00", "40.00"]),
            Column::from_values("credit_amount", &["0.00", "100.00", "0.00"]),
        ]);
        let validator = BalanceValidator::default();
        let report = validator.validate(&table, &amounts_debit_credit(), Some("journal_entry_id"));

        assert!(!report.is_balanced);
        assert_eq!(report.balanced_entries, 1);
        assert_eq!(report.unbalanced_entries.len(), 1);
        assert_eq!(report.unbalanced_entries[0].entry_id, "2");
        assert!((report.unbalanced_entries[0].difference - 40.0).abs() < 1e-9);
    }

    #[test]
    fn lone_amount_is_sign_split() {
        let table = Table::new(vec![
            Column::from_values("journal_entry_id", &["1", "1"]),
            Column::from_values("amount", &["500.00", "-500.00"]),
        ]);
        let amounts = AmountColumns {
            debit: None,
            credit: None,
            amount: Some("amount".to_string()),
        };
        let validator = BalanceValidator::default();
        let score = validator.entry_balance_score(&table, "journal_entry_id", &amounts);
        assert!((score - 1.0).abs() < 1e-9);
    }

    #[test]
    fn wrong_grouping_scores_lower_than_right_one() {
        // Grouping by "good" balances every entry; grouping by "bad" does
        // not. The oracle must strictly separate them.
        let table = Table::new(vec![
            Column::from_values("good", &["1", "1", "2", "2"]),
            Column::from_values("bad", &["1", "2", "1", "2"]),
            Column::from_values("amount", &["200.00", "-200.00", "75.50", "-75.50"]),
        ]);
        let amounts = AmountColumns {
            debit: None,
            credit: None,
            amount: Some("amount".to_string()),
        };
        let validator = BalanceValidator::default();
        let good = validator.entry_balance_score(&table, "good", &amounts);
        let bad = validator.entry_balance_score(&table, "bad", &amounts);
        assert!(good > bad + 0.1, "good={good} bad={bad}");
    }

    #[test]
    fn missing_columns_score_zero() {
        let validator = BalanceValidator::default();
        let score = validator.entry_balance_score(
            &Table::default(),
            "journal_entry_id",
            &amounts_debit_credit(),
        );
        assert_eq!(score, 0.0);
    }

    #[test]
    fn tolerance_absorbs_decimal_drift() {
        let table = Table::new(vec![
            Column::from_values("journal_entry_id", &["1", "1"]),
            Column::from_values("debit_amount", &["100.004", "0.00"]),
            Column::from_values("credit_amount", &["0.00", "100.00"]),
        ]);
        let validator = BalanceValidator::default();
        let report = validator.validate(&table, &amounts_debit_credit(), Some("journal_entry_id"));
        assert!(report.is_balanced);
        assert_eq!(report.balanced_entries, 1);
    }
}
