//! Balance-oracle boundary.
//!
//! The resolver consults an oracle to settle `journal_entry_id` conflicts:
//! grouping rows by the right identifier makes debits and credits balance
//! per group. The arithmetic lives outside this crate; the resolver only
//! sees the trait.

use jet_model::{FieldCode, Table};

/// The amount-family columns already settled in the mapping table.
///
/// At least one must be present for a balance test to mean anything, and
/// every claim behind these must have been recorded at high confidence.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AmountColumns {
    pub debit: Option<String>,
    pub credit: Option<String>,
    pub amount: Option<String>,
}

impl AmountColumns {
    pub fn is_empty(&self) -> bool {
        self.debit.is_none() && self.credit.is_none() && self.amount.is_none()
    }

    pub fn set(&mut self, code: FieldCode, column: impl Into<String>) {
        match code {
            FieldCode::DebitAmount => self.debit = Some(column.into()),
            FieldCode::CreditAmount => self.credit = Some(column.into()),
            FieldCode::Amount => self.amount = Some(column.into()),
            _ => {}
        }
    }
}

/// Scores how well a candidate identifier column groups the table into
/// balanced entries.
///
/// Implementations must be pure functions of the data: identical inputs
/// always yield the identical score in `[0.0, 1.0]`. Unparseable amounts
/// contribute zero rather than failing.
pub trait BalanceOracle {
    fn entry_balance_score(&self, table: &Table, group_column: &str, amounts: &AmountColumns)
    -> f64;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn amount_columns_tracks_family_codes() {
        let mut amounts = AmountColumns::default();
        assert!(amounts.is_empty());
        amounts.set(FieldCode::DebitAmount, "Debe");
        amounts.set(FieldCode::PostingDate, "Fecha");
        assert_eq!(amounts.debit.as_deref(), Some("Debe"));
        assert!(amounts.credit.is_none());
        assert!(!amounts.is_empty());
    }
}
