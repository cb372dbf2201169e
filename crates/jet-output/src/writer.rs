//! Standardized header/detail CSV writing.
//!
//! The header file carries one row per journal entry (deduplicated on
//! `journal_entry_id`, first occurrence wins) plus per-entry totals; the
//! detail file carries one row per line. Both emit their full canonical
//! column set, with empty columns for fields the mapping did not find —
//! downstream staging expects a fixed shape.

use std::collections::BTreeMap;
use std::path::Path;

use anyhow::{Context, Result};
use tracing::info;

use jet_model::{FieldCode, Table};
use jet_transform::clean_amount;

/// Canonical columns of the header (entry-level) file.
const HEADER_FIELDS: &[FieldCode] = &[
    FieldCode::JournalEntryId,
    FieldCode::EntryDate,
    FieldCode::EntryTime,
    FieldCode::PostingDate,
    FieldCode::Description,
    FieldCode::PreparedBy,
    FieldCode::FiscalYear,
    FieldCode::PeriodNumber,
];

/// Computed columns appended to the header file.
const HEADER_COMPUTED: &[&str] = &["total_debit_amount", "total_credit_amount", "line_count"];

/// Canonical columns of the detail (line-level) file.
const DETAIL_FIELDS: &[FieldCode] = &[
    FieldCode::JournalEntryId,
    FieldCode::LineNumber,
    FieldCode::GlAccountNumber,
    FieldCode::GlAccountName,
    FieldCode::Amount,
    FieldCode::DebitAmount,
    FieldCode::CreditAmount,
    FieldCode::DebitCreditIndicator,
    FieldCode::LineDescription,
    FieldCode::VendorId,
    FieldCode::DocumentNumber,
];

/// Writes both standardized files next to each other.
///
/// `cleaned` must be a canonical table (columns named by field code), as
/// produced by the transform stage.
pub fn write_header_detail(cleaned: &Table, header_path: &Path, detail_path: &Path) -> Result<()> {
    write_header_csv(cleaned, header_path)?;
    write_detail_csv(cleaned, detail_path)?;
    Ok(())
}

/// Writes the entry-level header file.
pub fn write_header_csv(cleaned: &Table, path: &Path) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)
        .with_context(|| format!("Failed to create header file {}", path.display()))?;

    let mut columns: Vec<String> = HEADER_FIELDS.iter().map(|c| c.as_str().to_string()).collect();
    columns.extend(HEADER_COMPUTED.iter().map(|c| (*c).to_string()));
    writer.write_record(&columns)?;

    let rows = cleaned.row_count();
    let totals = entry_totals(cleaned);
    let mut seen: Vec<String> = Vec::new();
    let mut records: Vec<(String, Vec<String>)> = Vec::new();

    for row in 0..rows {
        let entry_id = cell(cleaned, FieldCode::JournalEntryId, row);
        if seen.contains(&entry_id) {
            continue;
        }
        seen.push(entry_id.clone());

        let mut record: Vec<String> = HEADER_FIELDS
            .iter()
            .map(|code| cell(cleaned, *code, row))
            .collect();
        let (debit, credit, lines) = totals.get(&entry_id).copied().unwrap_or((0.0, 0.0, 0));
        record.push(format!("{debit:.2}"));
        record.push(format!("{credit:.2}"));
        record.push(lines.to_string());
        records.push((entry_id, record));
    }

    // Entries sort numerically when every id parses, lexically otherwise.
    sort_by_entry_id(&mut records);
    let count = records.len();
    for (_, record) in records {
        writer.write_record(&record)?;
    }
    writer.flush()?;
    info!(path = %path.display(), entries = count, "header file written");
    Ok(())
}

/// Writes the line-level detail file.
pub fn write_detail_csv(cleaned: &Table, path: &Path) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)
        .with_context(|| format!("Failed to create detail file {}", path.display()))?;

    let columns: Vec<String> = DETAIL_FIELDS.iter().map(|c| c.as_str().to_string()).collect();
    writer.write_record(&columns)?;

    let rows = cleaned.row_count();
    for row in 0..rows {
        let record: Vec<String> = DETAIL_FIELDS
            .iter()
            .map(|code| cell(cleaned, *code, row))
            .collect();
        writer.write_record(&record)?;
    }
    writer.flush()?;
    info!(path = %path.display(), lines = rows, "detail file written");
    Ok(())
}

fn cell(table: &Table, code: FieldCode, row: usize) -> String {
    table
        .column(code.as_str())
        .and_then(|c| c.values.get(row).cloned().flatten())
        .unwrap_or_default()
}

/// Per-entry debit/credit totals and line counts.
fn entry_totals(table: &Table) -> BTreeMap<String, (f64, f64, usize)> {
    let mut totals: BTreeMap<String, (f64, f64, usize)> = BTreeMap::new();
    for row in 0..table.row_count() {
        let entry_id = cell(table, FieldCode::JournalEntryId, row);
        let debit = clean_amount(&cell(table, FieldCode::DebitAmount, row));
        let credit = clean_amount(&cell(table, FieldCode::CreditAmount, row));
        let entry = totals.entry(entry_id).or_insert((0.0, 0.0, 0));
        entry.0 += debit;
        entry.1 += credit;
        entry.2 += 1;
    }
    totals
}

fn sort_by_entry_id(records: &mut [(String, Vec<String>)]) {
    let all_numeric = records.iter().all(|(id, _)| id.parse::<f64>().is_ok());
    if all_numeric {
        records.sort_by(|a, b| {
            let a: f64 = a.0.parse().unwrap_or(f64::MAX);
            let b: f64 = b.0.parse().unwrap_or(f64::MAX);
            a.partial_cmp(&b).unwrap_or(std::cmp::Ordering::Equal)
        });
    } else {
        records.sort_by(|a, b| a.0.cmp(&b.0));
    }
}
