//! Content-based field detection.
//!
//! Inspects a sample of a column's values (plus its name) and proposes
//! candidate fields with confidence scores, purely from statistical and
//! lexical signals. Every sub-analysis degrades to an empty result on bad
//! input; nothing here returns an error.

use std::collections::BTreeMap;
use std::sync::LazyLock;

use chrono::{Datelike, NaiveDate, NaiveDateTime};
use regex::Regex;

use jet_model::FieldCode;

/// Minimum ratio of numeric values for a column to be analyzed as numeric.
const NUMERIC_RATIO_GATE: f64 = 0.7;
/// Zero-value ratio above which an amount column reads as debit or credit.
const ZERO_RATIO_SPLIT: f64 = 0.3;

/// Runs every sub-analysis and unions the results.
///
/// Equal field keys keep the maximum confidence; sub-analyses run in a
/// fixed order so the outcome is deterministic.
pub fn analyze(column_name: &str, samples: &[&str]) -> BTreeMap<FieldCode, f64> {
    let mut scores = BTreeMap::new();
    if samples.is_empty() {
        return scores;
    }
    merge_max_all(&mut scores, numeric_analysis(samples));
    merge_max_all(&mut scores, text_analysis(column_name, samples));
    merge_max_all(&mut scores, date_analysis(samples));
    merge_max_all(&mut scores, vendor_id_analysis(column_name, samples));
    merge_max_all(&mut scores, account_name_analysis(column_name, samples));
    merge_max_all(&mut scores, field_name_patterns(column_name));
    scores
}

fn merge_max_all(into: &mut BTreeMap<FieldCode, f64>, from: BTreeMap<FieldCode, f64>) {
    for (code, confidence) in from {
        let entry = into.entry(code).or_insert(confidence);
        if confidence > *entry {
            *entry = confidence;
        }
    }
}

fn parse_plain_number(value: &str) -> Option<f64> {
    value.trim().parse::<f64>().ok()
}

/// Numeric distribution analysis.
fn numeric_analysis(samples: &[&str]) -> BTreeMap<FieldCode, f64> {
    let mut scores = BTreeMap::new();
    let numbers: Vec<f64> = samples.iter().filter_map(|v| parse_plain_number(v)).collect();
    if numbers.is_empty() {
        return scores;
    }
    let numeric_ratio = numbers.len() as f64 / samples.len() as f64;
    if numeric_ratio < NUMERIC_RATIO_GATE {
        return scores;
    }

    let total = numbers.len();
    let zero_count = numbers.iter().filter(|v| **v == 0.0).count();
    let positive_count = numbers.iter().filter(|v| **v > 0.0).count();
    let negative_count = numbers.iter().filter(|v| **v < 0.0).count();
    let min_val = numbers.iter().copied().fold(f64::INFINITY, f64::min);
    let max_val = numbers.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let mean = numbers.iter().sum::<f64>() / total as f64;
    let std = sample_std(&numbers, mean);
    let unique_count = count_distinct(&numbers);
    let unique_ratio = unique_count as f64 / total as f64;

    if mean.abs() > 1.0 && std > 1.0 {
        // Monetary magnitudes.
        let zero_ratio = zero_count as f64 / total as f64;
        if zero_ratio > ZERO_RATIO_SPLIT {
            if positive_count > negative_count {
                scores.insert(FieldCode::DebitAmount, 0.8);
            } else {
                scores.insert(FieldCode::CreditAmount, 0.7);
            }
        } else {
            scores.insert(FieldCode::Amount, 0.9);
        }
    } else if max_val <= 1000.0 && std < 10.0 {
        // Small, barely varying integers read as document numbers.
        if unique_ratio < 0.2 {
            scores.insert(FieldCode::DocumentNumber, 0.7);
        }
    } else if numbers.iter().all(|v| (1900.0..=2100.0).contains(v)) {
        if unique_count <= 5 {
            scores.insert(FieldCode::FiscalYear, 0.9);
        }
    } else if max_val <= 100.0 && min_val >= 1.0 {
        // Runs of consecutive integers suggest line numbers.
        let mut sorted = numbers.clone();
        sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
        let checked = sorted.len().min(20);
        let consecutive = sorted[..checked]
            .windows(2)
            .filter(|w| (w[1] - w[0] - 1.0).abs() < f64::EPSILON)
            .count();
        if consecutive as f64 > sorted.len() as f64 * 0.3 {
            scores.insert(FieldCode::LineNumber, 0.8);
        }
    } else if (unique_count as f64) < total as f64 * 0.7 {
        // Repeated identifiers group lines into entries.
        scores.insert(FieldCode::JournalEntryId, 0.7);
    } else if max_val <= 999_999.0 && min_val >= 1.0 && unique_ratio > 0.8 {
        scores.insert(FieldCode::VendorId, 0.6);
    }

    scores
}

fn sample_std(values: &[f64], mean: f64) -> f64 {
    if values.len() < 2 {
        return 0.0;
    }
    let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>()
        / (values.len() - 1) as f64;
    variance.sqrt()
}

fn count_distinct(values: &[f64]) -> usize {
    let mut seen: Vec<u64> = values.iter().map(|v| v.to_bits()).collect();
    seen.sort_unstable();
    seen.dedup();
    seen.len()
}

/// Text analysis keyed on the field name and value uniqueness.
fn text_analysis(column_name: &str, samples: &[&str]) -> BTreeMap<FieldCode, f64> {
    let mut scores = BTreeMap::new();

    // Skip columns that are numbers rendered as strings.
    let head = samples.len().min(10);
    let numeric_like = samples[..head]
        .iter()
        .filter(|v| parse_plain_number(v).is_some())
        .count();
    if numeric_like as f64 > head as f64 * 0.8 {
        return scores;
    }

    let unique_ratio = distinct_ratio(samples);
    let avg_length =
        samples.iter().map(|v| v.chars().count()).sum::<usize>() as f64 / samples.len() as f64;
    let name_lower = column_name.to_lowercase();

    if name_lower.contains("descripcion")
        || name_lower.contains("descripción")
        || name_lower.contains("description")
    {
        if unique_ratio > 0.7 {
            scores.insert(FieldCode::LineDescription, 0.8);
        } else {
            scores.insert(FieldCode::Description, 0.7);
        }
    } else if name_lower.contains("concepto") || name_lower.contains("concept") {
        scores.insert(FieldCode::Description, 0.8);
    } else if avg_length > 10.0 && unique_ratio > 0.5 {
        scores.insert(FieldCode::LineDescription, 0.6);
    } else if avg_length > 5.0 && unique_ratio < 0.3 {
        scores.insert(FieldCode::Description, 0.5);
    }

    scores
}

fn distinct_ratio(samples: &[&str]) -> f64 {
    if samples.is_empty() {
        return 0.0;
    }
    let mut seen: Vec<&str> = samples.to_vec();
    seen.sort_unstable();
    seen.dedup();
    seen.len() as f64 / samples.len() as f64
}

static DATE_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    const MONTHS_EN: &str =
        "Jan|Feb|Mar|Apr|May|Jun|Jul|Aug|Sep|Oct|Nov|Dec|January|February|March|April|June|July|August|September|October|November|December";
    const MONTHS_ES: &str =
        "Ene|Feb|Mar|Abr|May|Jun|Jul|Ago|Sep|Oct|Nov|Dic|Enero|Febrero|Marzo|Abril|Mayo|Junio|Julio|Agosto|Septiembre|Octubre|Noviembre|Diciembre";
    let month_literals = [
        format!(r"(?i)^\d{{1,2}}[-\s]?({MONTHS_EN})[-\s]?\d{{2,4}}$"),
        format!(r"(?i)^({MONTHS_EN})[-\s]?\d{{1,2}}[-\s]?\d{{2,4}}$"),
        format!(r"(?i)^\d{{2,4}}[-\s]?({MONTHS_EN})[-\s]?\d{{1,2}}$"),
        format!(r"(?i)^\d{{1,2}}[-\s]?({MONTHS_ES})[-\s]?\d{{2,4}}$"),
        format!(r"(?i)^\d{{1,2}}\s({MONTHS_EN}|{MONTHS_ES})\s\d{{4}}$"),
    ];
    let digit_literals = [
        // Written month-day-year: "Jan 1, 2024".
        r"(?i)^\w{3}\s\d{1,2},?\s\d{4}$",
        // Four-digit years with common separators.
        r"^\d{4}-\d{1,2}-\d{1,2}$",
        r"^\d{1,2}/\d{1,2}/\d{4}$",
        r"^\d{4}/\d{1,2}/\d{1,2}$",
        r"^\d{1,2}-\d{1,2}-\d{4}$",
        r"^\d{1,2}\.\d{1,2}\.\d{4}$",
        r"^\d{4}\.\d{1,2}\.\d{1,2}$",
        r"^\d{8}$",
        // Two-digit years.
        r"^\d{1,2}/\d{1,2}/\d{2}$",
        r"^\d{1,2}-\d{1,2}-\d{2}$",
        r"^\d{1,2}\.\d{1,2}\.\d{2}$",
        r"^\d{6}$",
        // Date plus time.
        r"^\d{4}-\d{2}-\d{2}\s\d{1,2}:\d{2}(:\d{2})?(\.\d+)?$",
        r"^\d{1,2}/\d{1,2}/\d{4}\s\d{1,2}:\d{2}(:\d{2})?$",
        r"^\d{1,2}\.\d{1,2}\.\d{4}\s\d{1,2}:\d{2}(:\d{2})?$",
        r"^\d{4}/\d{2}/\d{2}\s\d{1,2}:\d{2}(:\d{2})?$",
        // ISO 8601 timestamps.
        r"^\d{4}-\d{2}-\d{2}T\d{2}:\d{2}:\d{2}(\.\d+)?(Z|[+-]\d{2}:\d{2})?$",
        // Alternative separators.
        r"^\d{1,2}\s\d{1,2}\s\d{2,4}$",
        r"^\d{2,4}\s\d{1,2}\s\d{1,2}$",
        r"^\d{1,2}_\d{1,2}_\d{2,4}$",
        r"^\d{1,2}\|\d{1,2}\|\d{2,4}$",
        // Month-and-year and julian forms seen in ERP extracts.
        r"^\d{1,2}/\d{4}$",
        r"^\d{4}/\d{1,2}$",
        r"^\d{4}-\d{1,2}$",
        r"^\d{4}-\d{3}$",
    ];
    month_literals
        .iter()
        .map(String::as_str)
        .chain(digit_literals.iter().copied())
        .map(|p| Regex::new(p).expect("date pattern compiles"))
        .collect()
});

/// True when the value matches one of the explicit date literal patterns.
fn matches_date_pattern(value: &str) -> bool {
    DATE_PATTERNS.iter().any(|re| re.is_match(value))
}

const FALLBACK_DATE_FORMATS: &[&str] = &[
    "%Y-%m-%d",
    "%d/%m/%Y",
    "%m/%d/%Y",
    "%d.%m.%Y",
    "%Y/%m/%d",
    "%d-%m-%Y",
    "%Y%m%d",
    "%d-%b-%Y",
    "%d %b %Y",
];

const FALLBACK_DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%d/%m/%Y %H:%M:%S",
    "%d/%m/%Y %H:%M",
    "%Y-%m-%dT%H:%M:%S",
];

/// Permissive parse used both as the date-analysis fallback and by the
/// entry-date reclassification pass. Returns the calendar year.
pub(crate) fn date_year(value: &str) -> Option<i32> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }
    for format in FALLBACK_DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(trimmed, format) {
            return in_plausible_range(date.year());
        }
    }
    for format in FALLBACK_DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(trimmed, format) {
            return in_plausible_range(dt.year());
        }
    }
    None
}

fn in_plausible_range(year: i32) -> Option<i32> {
    (1900..=2100).contains(&year).then_some(year)
}

fn is_date_like(value: &str) -> bool {
    let trimmed = value.trim();
    if matches_date_pattern(trimmed) {
        return true;
    }
    // Bare digit strings of up to six characters are small integers, not
    // dates, unless an explicit pattern claimed them above.
    let compact: String = trimmed.chars().filter(|c| !"./-".contains(*c)).collect();
    if compact.chars().all(|c| c.is_ascii_digit()) && trimmed.len() <= 6 {
        return false;
    }
    date_year(trimmed).is_some()
}

/// Date-likeness analysis. Proposes `posting_date` and `entry_date`
/// together at staggered confidences; the two are easily confused and the
/// caller disambiguates later.
fn date_analysis(samples: &[&str]) -> BTreeMap<FieldCode, f64> {
    let mut scores = BTreeMap::new();
    let checked = samples.len().min(20);
    if checked == 0 {
        return scores;
    }
    let date_like = samples[..checked].iter().filter(|v| is_date_like(v)).count();
    let ratio = date_like as f64 / checked as f64;

    if ratio >= 0.8 {
        scores.insert(FieldCode::PostingDate, 0.9);
        scores.insert(FieldCode::EntryDate, 0.85);
    } else if ratio >= 0.6 {
        scores.insert(FieldCode::PostingDate, 0.7);
        scores.insert(FieldCode::EntryDate, 0.65);
    } else if ratio >= 0.4 {
        scores.insert(FieldCode::PostingDate, 0.5);
        scores.insert(FieldCode::EntryDate, 0.45);
    }
    scores
}

const VENDOR_NAME_TOKENS: &[&str] = &[
    "proveedor",
    "vendor",
    "supplier",
    "fornecedor",
    "fournisseur",
    "fornitore",
    "lieferant",
];

/// Vendor-id lexical analysis.
fn vendor_id_analysis(column_name: &str, samples: &[&str]) -> BTreeMap<FieldCode, f64> {
    let mut scores = BTreeMap::new();
    let name_lower = column_name.to_lowercase();
    if !VENDOR_NAME_TOKENS.iter().any(|t| name_lower.contains(t)) {
        return scores;
    }
    if ["id", "codigo", "code", "num"]
        .iter()
        .any(|t| name_lower.contains(t))
    {
        scores.insert(FieldCode::VendorId, 0.9);
    } else {
        let avg_length =
            samples.iter().map(|v| v.chars().count()).sum::<usize>() as f64 / samples.len() as f64;
        if avg_length <= 15.0 && distinct_ratio(samples) > 0.8 {
            scores.insert(FieldCode::VendorId, 0.7);
        }
    }
    scores
}

const ACCOUNT_TOKENS: &[&str] = &["cuenta", "account", "conto", "compte", "konto"];
const NAME_TOKENS: &[&str] = &[
    "nombre",
    "name",
    "denominacion",
    "description",
    "desc",
    "titel",
    "titre",
    "titolo",
];

/// Account-name lexical analysis.
fn account_name_analysis(column_name: &str, samples: &[&str]) -> BTreeMap<FieldCode, f64> {
    let mut scores = BTreeMap::new();
    let name_lower = column_name.to_lowercase();
    let has_name = NAME_TOKENS.iter().any(|t| name_lower.contains(t));
    let has_account = ACCOUNT_TOKENS.iter().any(|t| name_lower.contains(t));

    if has_name && has_account {
        scores.insert(FieldCode::GlAccountName, 0.9);
    } else if has_name && (name_lower.contains("gl") || name_lower.contains("mayor")) {
        scores.insert(FieldCode::GlAccountName, 0.8);
    } else if has_account
        && !["num", "number", "codigo", "code"]
            .iter()
            .any(|t| name_lower.contains(t))
    {
        let avg_length =
            samples.iter().map(|v| v.chars().count()).sum::<usize>() as f64 / samples.len() as f64;
        if avg_length > 10.0 {
            scores.insert(FieldCode::GlAccountName, 0.7);
        }
    }
    scores
}

/// Fixed table of name substrings. The first matching entry wins and
/// stops the pattern pass for the column.
const FIELD_NAME_PATTERNS: &[(&str, FieldCode, f64)] = &[
    ("saldo", FieldCode::Amount, 0.95),
    ("balance", FieldCode::Amount, 0.95),
    ("importe", FieldCode::Amount, 0.9),
    ("total", FieldCode::Amount, 0.85),
    ("debe", FieldCode::DebitAmount, 0.95),
    ("haber", FieldCode::CreditAmount, 0.95),
    ("debit", FieldCode::DebitAmount, 0.95),
    ("credit", FieldCode::CreditAmount, 0.95),
    ("fecha", FieldCode::PostingDate, 0.9),
    ("date", FieldCode::PostingDate, 0.9),
    ("asiento", FieldCode::JournalEntryId, 0.9),
    ("journal", FieldCode::JournalEntryId, 0.9),
    ("cuenta", FieldCode::GlAccountNumber, 0.9),
    ("account", FieldCode::GlAccountNumber, 0.9),
    ("año", FieldCode::FiscalYear, 0.9),
    ("year", FieldCode::FiscalYear, 0.9),
    ("doc", FieldCode::DocumentNumber, 0.8),
    ("documento", FieldCode::DocumentNumber, 0.8),
    ("numero", FieldCode::DocumentNumber, 0.7),
    ("num", FieldCode::DocumentNumber, 0.7),
    ("periodo", FieldCode::PeriodNumber, 0.9),
    ("period", FieldCode::PeriodNumber, 0.9),
    ("preparado", FieldCode::PreparedBy, 0.8),
    ("prepared", FieldCode::PreparedBy, 0.8),
    ("entrada", FieldCode::EntryDate, 0.8),
    ("entry", FieldCode::EntryDate, 0.8),
    ("proveedor", FieldCode::VendorId, 0.7),
    ("vendor", FieldCode::VendorId, 0.7),
    ("supplier", FieldCode::VendorId, 0.7),
];

fn field_name_patterns(column_name: &str) -> BTreeMap<FieldCode, f64> {
    let mut scores = BTreeMap::new();
    let name_lower = column_name.to_lowercase();
    for (pattern, code, confidence) in FIELD_NAME_PATTERNS {
        if name_lower.contains(pattern) {
            scores.insert(*code, *confidence);
            break;
        }
    }
    scores
}
