//! Human-readable run summary.

use comfy_table::{Table as DisplayTable, presets::UTF8_FULL_CONDENSED};

use crate::types::ConvertResult;

/// Prints the mapping and validation summary for a convert run.
pub fn print_summary(result: &ConvertResult) {
    let detection = &result.detection;

    println!(
        "\n{} — {} rows, {} columns ({} mapped, {} unmapped)",
        result.input.display(),
        result.rows,
        detection.stats.total_columns,
        detection.stats.mapped,
        detection.stats.unmapped,
    );
    if let Some(erp) = &detection.erp_system {
        println!("ERP: {erp}");
    }

    if !detection.mappings.is_empty() {
        let mut table = DisplayTable::new();
        table.load_preset(UTF8_FULL_CONDENSED);
        table.set_header(["Source column", "Canonical field", "Confidence", "Source"]);
        for mapping in &detection.mappings {
            table.add_row([
                mapping.column.clone(),
                mapping.code.to_string(),
                format!("{:.3}", mapping.confidence),
                format!("{:?}", mapping.source).to_lowercase(),
            ]);
        }
        println!("{table}");
    }

    if !detection.unmapped.is_empty() {
        println!("Unmapped columns: {}", detection.unmapped.join(", "));
    }

    for outcome in &detection.outcomes {
        println!(
            "Conflict on {}: '{}' won over '{}' ({:?})",
            outcome.code, outcome.winning_column, outcome.losing_column, outcome.reason
        );
    }

    let stats = &detection.stats;
    if stats.reassignments + stats.balance_wins + stats.forced_mappings > 0 {
        println!(
            "Reassignments: {} (balance wins: {}), forced mappings: {}",
            stats.reassignments, stats.balance_wins, stats.forced_mappings
        );
    }

    match &result.balance {
        Some(balance) => {
            let status = if balance.is_balanced { "OK" } else { "OFF" };
            println!(
                "Balance: {} (debit {:.2} / credit {:.2}, {} of {} entries balanced)",
                status,
                balance.total_debit,
                balance.total_credit,
                balance.balanced_entries,
                balance.entries_count,
            );
            for entry in balance.unbalanced_entries.iter().take(5) {
                println!(
                    "  entry {} off by {:.2}",
                    entry.entry_id, entry.difference
                );
            }
        }
        None => println!("Balance: skipped (no amount fields mapped)"),
    }

    if let (Some(header), Some(detail)) = (&result.header_path, &result.detail_path) {
        println!("Header file: {}", header.display());
        println!("Detail file: {}", detail.display());
    }
}
