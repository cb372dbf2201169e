//! Column profiling: the statistical hints the content analyzer and
//! diagnostics consume.

use std::collections::BTreeMap;
use std::collections::BTreeSet;

use jet_model::{Column, ColumnProfile, Table};
use jet_transform::is_numeric;

/// Fraction of non-null numeric values above which a column counts as
/// numeric.
const NUMERIC_THRESHOLD: f64 = 0.9;

/// Profiles every column of a table.
pub fn profile_table(table: &Table) -> BTreeMap<String, ColumnProfile> {
    table
        .columns
        .iter()
        .map(|column| (column.name.clone(), profile_column(column)))
        .collect()
}

/// Computes null, uniqueness and numeric ratios for one column.
pub fn profile_column(column: &Column) -> ColumnProfile {
    let total = column.len();
    if total == 0 {
        return ColumnProfile {
            is_numeric: false,
            numeric_ratio: 0.0,
            unique_ratio: 0.0,
            null_ratio: 1.0,
        };
    }

    let mut null_count = 0usize;
    let mut numeric_count = 0usize;
    let mut unique: BTreeSet<&str> = BTreeSet::new();

    for cell in &column.values {
        match cell.as_deref().map(str::trim) {
            Some(value) if !value.is_empty() => {
                unique.insert(value);
                if is_numeric(value) {
                    numeric_count += 1;
                }
            }
            _ => null_count += 1,
        }
    }

    let non_null = total - null_count;
    let numeric_ratio = if non_null > 0 {
        numeric_count as f64 / non_null as f64
    } else {
        0.0
    };

    ColumnProfile {
        is_numeric: non_null > 0 && numeric_ratio > NUMERIC_THRESHOLD,
        numeric_ratio,
        unique_ratio: if non_null > 0 {
            unique.len() as f64 / non_null as f64
        } else {
            0.0
        },
        null_ratio: null_count as f64 / total as f64,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numeric_column_is_flagged() {
        let column = Column::from_values("Debe", &["100", "0", "1.234,56", "7,5"]);
        let profile = profile_column(&column);
        assert!(profile.is_numeric);
        assert_eq!(profile.null_ratio, 0.0);
    }

    #[test]
    fn nulls_and_uniques_are_counted() {
        let column = Column::from_values("Concepto", &["a", "", "a", "b"]);
        let profile = profile_column(&column);
        assert!((profile.null_ratio - 0.25).abs() < 1e-9);
        assert!((profile.unique_ratio - 2.0 / 3.0).abs() < 1e-9);
        assert!(!profile.is_numeric);
    }

    #[test]
    fn empty_column_is_all_null() {
        let column = Column::new("X", Vec::new());
        let profile = profile_column(&column);
        assert_eq!(profile.null_ratio, 1.0);
        assert!(!profile.is_numeric);
    }
}
