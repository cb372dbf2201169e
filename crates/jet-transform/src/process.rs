//! Post-mapping cleaning stage.
//!
//! Takes a raw table plus the settled column mapping, renames columns to
//! canonical codes, cleans the monetary fields, and derives whichever of
//! `amount` / `debit_amount` / `credit_amount` / `debit_credit_indicator`
//! the export did not carry.

use std::collections::BTreeMap;

use tracing::{debug, info};

use jet_model::{Column, FieldCode, FieldMapping, Table};

use crate::datetime::split_datetime;
use crate::numeric::{clean_amount, parse_amount};

/// Counters describing what the cleaning stage did.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CleanStats {
    pub fields_cleaned: usize,
    pub zero_filled_cells: usize,
    pub amounts_calculated: usize,
    pub amounts_from_indicator: usize,
    pub sign_split_rows: usize,
    pub indicators_created: usize,
    pub datetime_cells_split: usize,
}

/// Indicator tokens marking the debit side.
const DEBIT_TOKENS: &[&str] = &["d", "s", "dr", "debe", "debit", "soll"];
/// Indicator tokens marking the credit side.
const CREDIT_TOKENS: &[&str] = &["h", "c", "cr", "haber", "credit", "haben"];

/// Renames mapped columns to canonical codes and cleans the result.
///
/// The output table contains only canonical columns, ordered per
/// [`FieldCode::ALL`]. Downstream stages (balance validation, the
/// header/detail writer) rely on those names.
pub fn clean_mapped_table(table: &Table, mappings: &[FieldMapping]) -> (Table, CleanStats) {
    let mut stats = CleanStats::default();
    let rows = table.row_count();

    let mut columns: BTreeMap<FieldCode, Vec<Option<String>>> = BTreeMap::new();
    for mapping in mappings {
        let Some(source) = table.column(&mapping.column) else {
            debug!(column = %mapping.column, "mapped column absent from table");
            continue;
        };
        let mut values = source.values.clone();
        values.resize(rows, None);
        columns.insert(mapping.code, values);
    }

    clean_amount_columns(&mut columns, &mut stats);
    normalize_date_columns(&mut columns, &mut stats);
    derive_amount_family(&mut columns, rows, &mut stats);

    let ordered: Vec<Column> = FieldCode::ALL
        .iter()
        .filter_map(|code| {
            columns
                .remove(code)
                .map(|values| Column::new(code.as_str(), values))
        })
        .collect();

    info!(
        columns = ordered.len(),
        rows,
        cleaned = stats.fields_cleaned,
        derived = stats.amounts_calculated,
        "mapped table cleaned"
    );
    (Table::new(ordered), stats)
}

fn format_amount(value: f64) -> String {
    format!("{value:.2}")
}

fn clean_amount_columns(
    columns: &mut BTreeMap<FieldCode, Vec<Option<String>>>,
    stats: &mut CleanStats,
) {
    for code in [
        FieldCode::Amount,
        FieldCode::DebitAmount,
        FieldCode::CreditAmount,
    ] {
        let Some(values) = columns.get_mut(&code) else {
            continue;
        };
        for cell in values.iter_mut() {
            let cleaned = match cell.as_deref() {
                Some(raw) => clean_amount(raw),
                None => {
                    stats.zero_filled_cells += 1;
                    0.0
                }
            };
            *cell = Some(format_amount(cleaned));
        }
        stats.fields_cleaned += 1;
    }
}

fn normalize_date_columns(
    columns: &mut BTreeMap<FieldCode, Vec<Option<String>>>,
    stats: &mut CleanStats,
) {
    // Entry dates may carry a time component; spill it into entry_time
    // when that field is otherwise absent.
    let mut spilled_times: Vec<Option<String>> = Vec::new();
    let needs_time = !columns.contains_key(&FieldCode::EntryTime);

    for code in [FieldCode::PostingDate, FieldCode::EntryDate] {
        let Some(values) = columns.get_mut(&code) else {
            continue;
        };
        for (row, cell) in values.iter_mut().enumerate() {
            let Some(raw) = cell.as_deref() else { continue };
            let split = split_datetime(raw);
            if let Some(date) = split.date {
                *cell = Some(date);
            }
            if code == FieldCode::EntryDate && needs_time {
                if let Some(time) = split.time {
                    stats.datetime_cells_split += 1;
                    if spilled_times.len() <= row {
                        spilled_times.resize(row + 1, None);
                    }
                    spilled_times[row] = Some(time);
                }
            }
        }
    }

    if spilled_times.iter().any(Option::is_some) {
        let rows = columns.values().map(Vec::len).max().unwrap_or(0);
        spilled_times.resize(rows, None);
        columns.insert(FieldCode::EntryTime, spilled_times);
    }
}

fn derive_amount_family(
    columns: &mut BTreeMap<FieldCode, Vec<Option<String>>>,
    rows: usize,
    stats: &mut CleanStats,
) {
    let has_amount = columns.contains_key(&FieldCode::Amount);
    let has_debit = columns.contains_key(&FieldCode::DebitAmount);
    let has_credit = columns.contains_key(&FieldCode::CreditAmount);
    let has_indicator = columns.contains_key(&FieldCode::DebitCreditIndicator);

    let cell_number = |columns: &BTreeMap<FieldCode, Vec<Option<String>>>,
                       code: FieldCode,
                       row: usize|
     -> f64 {
        columns
            .get(&code)
            .and_then(|v| v.get(row))
            .and_then(|c| c.as_deref())
            .map(clean_amount)
            .unwrap_or(0.0)
    };

    if has_debit && has_credit && !has_amount {
        // Net amount from the two sides.
        let values: Vec<Option<String>> = (0..rows)
            .map(|row| {
                let net = cell_number(columns, FieldCode::DebitAmount, row)
                    - cell_number(columns, FieldCode::CreditAmount, row);
                Some(format_amount(net))
            })
            .collect();
        stats.amounts_calculated += rows;
        columns.insert(FieldCode::Amount, values);
    } else if has_amount && !has_debit && !has_credit {
        let mut debit: Vec<Option<String>> = Vec::with_capacity(rows);
        let mut credit: Vec<Option<String>> = Vec::with_capacity(rows);
        for row in 0..rows {
            let amount = cell_number(columns, FieldCode::Amount, row);
            let side = if has_indicator {
                indicator_side(
                    columns
                        .get(&FieldCode::DebitCreditIndicator)
                        .and_then(|v| v.get(row))
                        .and_then(|c| c.as_deref()),
                )
            } else {
                None
            };
            let (d, c) = match side {
                Some(Side::Debit) => {
                    stats.amounts_from_indicator += 1;
                    (amount.abs(), 0.0)
                }
                Some(Side::Credit) => {
                    stats.amounts_from_indicator += 1;
                    (0.0, amount.abs())
                }
                None => {
                    stats.sign_split_rows += 1;
                    if amount >= 0.0 {
                        (amount, 0.0)
                    } else {
                        (0.0, -amount)
                    }
                }
            };
            debit.push(Some(format_amount(d)));
            credit.push(Some(format_amount(c)));
        }
        columns.insert(FieldCode::DebitAmount, debit);
        columns.insert(FieldCode::CreditAmount, credit);
    }

    // Synthesize the indicator from the net side when the export had none.
    if !has_indicator
        && (columns.contains_key(&FieldCode::DebitAmount)
            || columns.contains_key(&FieldCode::Amount))
    {
        let values: Vec<Option<String>> = (0..rows)
            .map(|row| {
                let net = if columns.contains_key(&FieldCode::DebitAmount) {
                    cell_number(columns, FieldCode::DebitAmount, row)
                        - cell_number(columns, FieldCode::CreditAmount, row)
                } else {
                    cell_number(columns, FieldCode::Amount, row)
                };
                Some(if net >= 0.0 { "D" } else { "H" }.to_string())
            })
            .collect();
        stats.indicators_created += rows;
        columns.insert(FieldCode::DebitCreditIndicator, values);
    }
}

enum Side {
    Debit,
    Credit,
}

fn indicator_side(raw: Option<&str>) -> Option<Side> {
    let token = raw?.trim().to_lowercase();
    if DEBIT_TOKENS.contains(&token.as_str()) {
        Some(Side::Debit)
    } else if CREDIT_TOKENS.contains(&token.as_str()) {
        Some(Side::Credit)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jet_model::MatchSource;

    fn mapping(column: &str, code: FieldCode) -> FieldMapping {
        FieldMapping {
            column: column.to_string(),
            code,
            confidence: 0.9,
            source: MatchSource::Exact,
        }
    }

    fn cell(table: &Table, name: &str, row: usize) -> String {
        table
            .column(name)
            .and_then(|c| c.values.get(row).cloned().flatten())
            .unwrap_or_default()
    }

    #[test]
    fn debit_and_credit_derive_amount() {
        let table = Table::new(vec![
            Column::from_values("Debe", &["100,50", "", "30"]),
            Column::from_values("Haber", &["0", "100,50", "30"]),
        ]);
        let mappings = vec![
            mapping("Debe", FieldCode::DebitAmount),
            mapping("Haber", FieldCode::CreditAmount),
        ];
        let (cleaned, stats) = clean_mapped_table(&table, &mappings);

        assert_eq!(cell(&cleaned, "amount", 0), "100.50");
        assert_eq!(cell(&cleaned, "amount", 1), "-100.50");
        assert_eq!(cell(&cleaned, "amount", 2), "0.00");
        assert_eq!(stats.amounts_calculated, 3);
        assert_eq!(stats.zero_filled_cells, 1);
        // Indicator synthesized from the net side.
        assert_eq!(cell(&cleaned, "debit_credit_indicator", 1), "H");
    }

    #[test]
    fn indicator_drives_amount_split() {
        let table = Table::new(vec![
            Column::from_values("Importe", &["200", "150"]),
            Column::from_values("DH", &["D", "H"]),
        ]);
        let mappings = vec![
            mapping("Importe", FieldCode::Amount),
            mapping("DH", FieldCode::DebitCreditIndicator),
        ];
        let (cleaned, stats) = clean_mapped_table(&table, &mappings);

        assert_eq!(cell(&cleaned, "debit_amount", 0), "200.00");
        assert_eq!(cell(&cleaned, "credit_amount", 0), "0.00");
        assert_eq!(cell(&cleaned, "debit_amount", 1), "0.00");
        assert_eq!(cell(&cleaned, "credit_amount", 1), "150.00");
        assert_eq!(stats.amounts_from_indicator, 2);
    }

    #[test]
    fn signed_amount_splits_without_indicator() {
        let table = Table::new(vec![Column::from_values("Importe", &["75.5", "-75.5"])]);
        let mappings = vec![mapping("Importe", FieldCode::Amount)];
        let (cleaned, stats) = clean_mapped_table(&table, &mappings);

        assert_eq!(cell(&cleaned, "debit_amount", 0), "75.50");
        assert_eq!(cell(&cleaned, "credit_amount", 1), "75.50");
        assert_eq!(stats.sign_split_rows, 2);
        assert_eq!(stats.indicators_created, 2);
    }

    #[test]
    fn entry_datetime_spills_into_entry_time() {
        let table = Table::new(vec![Column::from_values(
            "FechaEntrada",
            &["2024-01-05 10:30", "2024-01-06 11:00"],
        )]);
        let mappings = vec![mapping("FechaEntrada", FieldCode::EntryDate)];
        let (cleaned, stats) = clean_mapped_table(&table, &mappings);

        assert_eq!(cell(&cleaned, "entry_date", 0), "2024-01-05");
        assert_eq!(cell(&cleaned, "entry_time", 0), "10:30:00");
        assert_eq!(stats.datetime_cells_split, 2);
    }

    #[test]
    fn empty_mapping_yields_empty_table() {
        let table = Table::new(vec![Column::from_values("X", &["1"])]);
        let (cleaned, _) = clean_mapped_table(&table, &[]);
        assert!(cleaned.is_empty());
    }
}
