//! Field-detection orchestration.
//!
//! Drives column-by-column analysis in priority order, routes each column
//! through ranking and unique-assignment resolution, and applies the
//! entry-date post-pass. Columns with specific amount-like names go first
//! so high-confidence claims win scarce canonical slots before vaguer
//! columns can grab them on content alone.

use std::collections::BTreeSet;

use serde::Serialize;
use tracing::{debug, info, warn};

use jet_model::{
    Column, FieldCatalog, FieldCode, FieldMapping, MatchSource, ResolutionOutcome, Table,
};

use crate::balance::BalanceOracle;
use crate::content;
use crate::exact::ExactMatcher;
use crate::normalize::NameCache;
use crate::rank::{self, HEADER_OVERRIDE_CONFIDENCE};
use crate::resolve::{BalanceContext, Resolver, ResolverStats, SpecificityTable};

/// Cap on the number of values sampled per column for content analysis.
const SAMPLE_LIMIT: usize = 100;
/// Confidence floor for the entry-date reclassification post-pass.
const RECLASSIFY_MIN_CONFIDENCE: f64 = 0.8;
/// Minimum fingerprint hit ratio to accept an ERP auto-detection.
const ERP_DETECT_FLOOR: f64 = 0.3;

/// Result of one detection session.
#[derive(Debug, Clone, Serialize)]
pub struct DetectionReport {
    pub mappings: Vec<FieldMapping>,
    pub unmapped: Vec<String>,
    pub outcomes: Vec<ResolutionOutcome>,
    /// The ERP the session ran with (hinted or auto-detected).
    pub erp_system: Option<String>,
    pub stats: DetectionStats,
}

impl DetectionReport {
    pub fn mapping_for(&self, code: FieldCode) -> Option<&FieldMapping> {
        self.mappings.iter().find(|m| m.code == code)
    }

    pub fn column_mapped_to(&self, column: &str) -> Option<FieldCode> {
        self.mappings
            .iter()
            .find(|m| m.column == column)
            .map(|m| m.code)
    }
}

/// Session counters surfaced alongside the mapping.
#[derive(Debug, Clone, Copy, Default, Serialize)]
pub struct DetectionStats {
    pub total_columns: usize,
    pub mapped: usize,
    pub unmapped: usize,
    pub forced_mappings: usize,
    pub reassignments: usize,
    pub balance_wins: usize,
    pub unresolved_conflicts: usize,
}

impl DetectionStats {
    fn from_resolver(stats: ResolverStats) -> Self {
        Self {
            forced_mappings: stats.forced_mappings,
            reassignments: stats.reassignments,
            balance_wins: stats.balance_wins,
            unresolved_conflicts: stats.unresolved_conflicts,
            ..Self::default()
        }
    }
}

/// Column-mapping detector for one catalog.
///
/// A detector is cheap to construct and stateless between calls; each
/// `detect` run builds a fresh resolver, so re-running on the same table
/// yields the same result.
pub struct FieldDetector<'c> {
    catalog: &'c FieldCatalog,
    specificity: SpecificityTable,
}

impl<'c> FieldDetector<'c> {
    pub fn new(catalog: &'c FieldCatalog) -> Self {
        Self {
            catalog,
            specificity: SpecificityTable::default(),
        }
    }

    pub fn with_specificity(catalog: &'c FieldCatalog, specificity: SpecificityTable) -> Self {
        Self {
            catalog,
            specificity,
        }
    }

    /// Maps every column of `table` onto canonical fields.
    ///
    /// `erp_hint` scopes synonym lookups; when absent, the ERP is
    /// auto-detected from column-name fingerprints. `oracle` enables the
    /// balance tie-break for `journal_entry_id` conflicts.
    pub fn detect(
        &self,
        table: &Table,
        erp_hint: Option<&str>,
        oracle: Option<&dyn BalanceOracle>,
    ) -> DetectionReport {
        if table.is_empty() {
            warn!("input table has no columns; returning empty mapping");
            return DetectionReport {
                mappings: Vec::new(),
                unmapped: Vec::new(),
                outcomes: Vec::new(),
                erp_system: None,
                stats: DetectionStats::default(),
            };
        }

        let erp_system = erp_hint
            .map(str::to_string)
            .or_else(|| detect_erp(table).map(str::to_string));
        info!(
            columns = table.column_count(),
            rows = table.row_count(),
            erp = erp_system.as_deref().unwrap_or("unknown"),
            "field detection started"
        );

        let matcher = ExactMatcher::new(self.catalog);
        let mut cache = NameCache::new();
        let mut resolver = Resolver::with_specificity(self.specificity.clone());
        let mut mappings: Vec<FieldMapping> = Vec::new();
        let mut journal_candidates: BTreeSet<String> = BTreeSet::new();

        let balance_ctx = oracle.map(|oracle| BalanceContext { table, oracle });

        for column in prioritize_columns(&table.columns) {
            let samples = column.sample(SAMPLE_LIMIT);

            // Hard override, bypassing ranking: header descriptions.
            if rank::is_header_description_override(&column.name)
                && resolver.force_claim(
                    FieldCode::Description,
                    &column.name,
                    HEADER_OVERRIDE_CONFIDENCE,
                )
            {
                mappings.push(FieldMapping {
                    column: column.name.clone(),
                    code: FieldCode::Description,
                    confidence: HEADER_OVERRIDE_CONFIDENCE,
                    source: MatchSource::Forced,
                });
                continue;
            }

            let exact = matcher.find_exact(&mut cache, &column.name, erp_system.as_deref());
            let scores = content::analyze(&column.name, &samples);
            let Some(candidate) = rank::rank(&exact, &scores) else {
                debug!(column = %column.name, "no candidate above threshold");
                continue;
            };
            if candidate.code == FieldCode::JournalEntryId {
                journal_candidates.insert(column.name.clone());
            }

            if let Some(settled) =
                resolver.resolve(&column.name, candidate, &samples, balance_ctx.as_ref())
            {
                // A reassignment may have displaced an earlier mapping.
                mappings.retain(|m| m.code != settled.code);
                mappings.push(FieldMapping {
                    column: column.name.clone(),
                    code: settled.code,
                    confidence: settled.confidence,
                    source: settled.source,
                });
            }
        }

        reclassify_lone_entry_date(table, resolver.mapping_table(), &mut mappings);

        if journal_candidates.len() > 1 {
            info!(
                candidates = journal_candidates.len(),
                "journal entry id contested; reduced to one mapping"
            );
        }

        let (_, resolver_stats, outcomes) = resolver.into_parts();
        let mapped_columns: BTreeSet<&str> =
            mappings.iter().map(|m| m.column.as_str()).collect();
        let unmapped: Vec<String> = table
            .columns
            .iter()
            .filter(|c| !mapped_columns.contains(c.name.as_str()))
            .map(|c| c.name.clone())
            .collect();

        let mut stats = DetectionStats::from_resolver(resolver_stats);
        stats.total_columns = table.column_count();
        stats.mapped = mappings.len();
        stats.unmapped = unmapped.len();

        info!(
            mapped = stats.mapped,
            unmapped = stats.unmapped,
            reassignments = stats.reassignments,
            "field detection finished"
        );

        DetectionReport {
            mappings,
            unmapped,
            outcomes,
            erp_system,
            stats,
        }
    }
}

/// Post-pass for the date-versus-entry-date ambiguity: a lone date column
/// that landed on `entry_date` at high confidence, whose values all fall
/// in one calendar year, is reclassified to `posting_date`. A heuristic,
/// kept exactly as inherited; multi-year entry logs stay `entry_date`.
fn reclassify_lone_entry_date(
    table: &Table,
    mapping_table: &crate::resolve::MappingTable,
    mappings: &mut [FieldMapping],
) {
    if mapping_table.column_for(FieldCode::PostingDate).is_some() {
        return;
    }
    let Some(entry_column) = mapping_table.column_for(FieldCode::EntryDate) else {
        return;
    };
    let Some(mapping) = mappings.iter_mut().find(|m| m.code == FieldCode::EntryDate) else {
        return;
    };
    if mapping.confidence < RECLASSIFY_MIN_CONFIDENCE {
        return;
    }
    let Some(column) = table.column(entry_column) else {
        return;
    };

    let mut years = column.non_null().map(content::date_year);
    let Some(Some(first_year)) = years.next() else {
        return;
    };
    if years.all(|y| y == Some(first_year)) {
        info!(
            column = entry_column,
            year = first_year,
            "entry date reclassified to posting date (single calendar year)"
        );
        mapping.code = FieldCode::PostingDate;
    }
}

/// ERP export fingerprints: characteristic column names per system.
const ERP_FINGERPRINTS: &[(&str, &[&str])] = &[
    (
        "SAP",
        &[
            "belnr", "bukrs", "hkont", "shkzg", "dmbtr", "waers", "bldat", "budat", "xblnr",
            "bschl", "kostl",
        ],
    ),
    (
        "Oracle",
        &[
            "je_header_id",
            "je_line_num",
            "code_combination_id",
            "entered_dr",
            "entered_cr",
            "accounted_dr",
            "accounted_cr",
        ],
    ),
    (
        "Navision",
        &[
            "document_no",
            "posting_date",
            "g_l_account_no",
            "amount_lcy",
            "debit_amount",
            "credit_amount",
        ],
    ),
    (
        "SAGE",
        &[
            "reference",
            "account_code",
            "nominal_code",
            "transaction_type",
            "net_amount",
            "tax_amount",
        ],
    ),
    (
        "PeopleSoft",
        &[
            "business_unit",
            "journal_id",
            "journal_line",
            "account",
            "monetary_amount",
            "statistics_amount",
        ],
    ),
];

/// Auto-detects the source ERP from column-name fingerprints. Returns
/// `Generic_ES` when nothing clears the floor.
pub fn detect_erp(table: &Table) -> Option<&'static str> {
    if table.is_empty() {
        return None;
    }
    let joined = table
        .column_names()
        .join(" ")
        .to_lowercase();

    let mut best: Option<(&str, f64)> = None;
    for (erp, patterns) in ERP_FINGERPRINTS {
        let hits = patterns.iter().filter(|p| joined.contains(*p)).count();
        if hits == 0 {
            continue;
        }
        let score = hits as f64 / patterns.len() as f64;
        if best.is_none_or(|(_, s)| score > s) {
            best = Some((erp, score));
        }
    }

    match best {
        Some((erp, score)) if score > ERP_DETECT_FLOOR => {
            debug!(erp, score, "erp auto-detected");
            Some(erp)
        }
        _ => Some("Generic_ES"),
    }
}

/// Buckets columns by how specific their names look and flattens back to
/// a processing order, stable within each bucket.
fn prioritize_columns(columns: &[Column]) -> Vec<&Column> {
    const PRIORITY_PATTERNS: &[(&[&str], u8)] = &[
        (&["saldo", "balance"], 1),
        (&["debe", "debit"], 1),
        (&["haber", "credit"], 1),
        (&["fecha", "date"], 2),
        (&["asiento", "journal"], 2),
        (&["cuenta", "account"], 2),
        (&["cabecera", "header"], 3),
        (&["concepto", "concept"], 3),
        (&["descripcion", "descripción", "description"], 4),
        (&["doc", "documento", "numero"], 5),
        (&["proveedor", "vendor", "supplier"], 5),
        (&["nombre", "name"], 5),
    ];

    let mut ordered: Vec<(u8, usize, &Column)> = columns
        .iter()
        .enumerate()
        .map(|(index, column)| {
            let name_lower = column.name.to_lowercase();
            let priority = PRIORITY_PATTERNS
                .iter()
                .find(|(patterns, _)| patterns.iter().any(|p| name_lower.contains(p)))
                .map_or(6, |(_, priority)| *priority);
            (priority, index, column)
        })
        .collect();
    ordered.sort_by_key(|(priority, index, _)| (*priority, *index));
    ordered.into_iter().map(|(_, _, column)| column).collect()
}
