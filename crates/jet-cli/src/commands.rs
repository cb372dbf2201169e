//! Command implementations.

use std::path::PathBuf;

use anyhow::{Context, Result};
use comfy_table::{Table as DisplayTable, presets::UTF8_FULL_CONDENSED};
use tracing::{info, info_span, warn};

use jet_catalog::resolve_catalog;
use jet_ingest::{profile_table, read_csv_table};
use jet_map::{AmountColumns, BalanceOracle, FieldDetector};
use jet_model::FieldCode;
use jet_output::write_header_detail;
use jet_transform::clean_mapped_table;
use jet_validate::BalanceValidator;

use crate::cli::ConvertArgs;
use crate::types::ConvertResult;

/// Runs the full convert pipeline on one export file.
pub fn run_convert(args: &ConvertArgs) -> Result<ConvertResult> {
    let span = info_span!("convert", input = %args.input.display());
    let _guard = span.enter();

    let catalog = resolve_catalog(args.catalog.as_deref())?;
    let table = read_csv_table(&args.input)
        .with_context(|| format!("Failed to ingest {}", args.input.display()))?;
    let profiles = profile_table(&table);
    info!(
        columns = table.column_count(),
        rows = table.row_count(),
        numeric_columns = profiles.values().filter(|p| p.is_numeric).count(),
        "export profiled"
    );

    let validator = BalanceValidator::default();
    let oracle: Option<&dyn BalanceOracle> =
        (!args.no_balance_check).then_some(&validator as &dyn BalanceOracle);

    let detector = FieldDetector::new(&catalog);
    let detection = detector.detect(&table, args.erp.as_deref(), oracle);

    let (cleaned, clean_stats) = clean_mapped_table(&table, &detection.mappings);

    // Balance validation over the cleaned canonical table; skipped when
    // the mapping found no amount-family field.
    let mut amounts = AmountColumns::default();
    for code in [
        FieldCode::DebitAmount,
        FieldCode::CreditAmount,
        FieldCode::Amount,
    ] {
        if cleaned.column(code.as_str()).is_some() {
            amounts.set(code, code.as_str());
        }
    }
    let balance = if amounts.is_empty() {
        warn!("no amount fields mapped; balance validation skipped");
        None
    } else {
        let group = cleaned
            .column(FieldCode::JournalEntryId.as_str())
            .map(|_| FieldCode::JournalEntryId.as_str());
        Some(validator.validate(&cleaned, &amounts, group))
    };

    let (header_path, detail_path) = if args.dry_run {
        info!("dry run; no output files written");
        (None, None)
    } else {
        let output_dir = output_dir(args)?;
        std::fs::create_dir_all(&output_dir)
            .with_context(|| format!("Failed to create {}", output_dir.display()))?;
        let header = output_dir.join(format!("{}_header.csv", args.output_prefix));
        let detail = output_dir.join(format!("{}_detail.csv", args.output_prefix));
        write_header_detail(&cleaned, &header, &detail)?;
        (Some(header), Some(detail))
    };

    Ok(ConvertResult {
        input: args.input.clone(),
        rows: table.row_count(),
        detection,
        clean_stats,
        balance,
        header_path,
        detail_path,
    })
}

fn output_dir(args: &ConvertArgs) -> Result<PathBuf> {
    if let Some(dir) = &args.output_dir {
        return Ok(dir.clone());
    }
    Ok(args
        .input
        .parent()
        .map(|p| p.join("output"))
        .unwrap_or_else(|| PathBuf::from("output")))
}

/// Prints the canonical field catalog.
pub fn run_fields(catalog_path: Option<&std::path::Path>) -> Result<()> {
    let catalog = resolve_catalog(catalog_path)?;

    let mut table = DisplayTable::new();
    table.load_preset(UTF8_FULL_CONDENSED);
    table.set_header(["Field", "Display name", "Kind", "Synonyms", "ERP systems"]);
    for def in catalog.fields() {
        let erp_systems: Vec<&str> = def.synonyms_by_erp.keys().map(String::as_str).collect();
        table.add_row([
            def.code.as_str().to_string(),
            def.display_name.clone(),
            format!("{:?}", def.kind).to_lowercase(),
            def.all_synonyms().count().to_string(),
            erp_systems.join(", "),
        ]);
    }
    println!("{table}");
    println!(
        "{} fields, {} synonyms across {} ERP systems",
        catalog.len(),
        catalog.total_synonyms(),
        catalog.erp_systems().len()
    );
    Ok(())
}
