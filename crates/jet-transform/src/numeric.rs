//! Numeric parsing for accounting exports.
//!
//! Exports render amounts every way imaginable: currency symbols,
//! US thousands separators, European decimal commas, parenthesized
//! negatives. This module turns them into `f64` or says it cannot.

use std::sync::LazyLock;

use regex::Regex;

// Grouped-thousands form first: alternation is ordered, and the generic
// form would otherwise stop at the first group of "1.234,56".
static NUMBER_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"-?\d{1,3}(?:[.,]\d{3})+(?:[.,]\d+)?|-?\d+(?:[.,]\d+)?")
        .expect("number pattern compiles")
});

/// Parse a raw cell into a number.
///
/// Handles:
/// - plain numbers: "123", "-45.67", "1.5e3" is NOT supported (never seen
///   in ledger exports)
/// - currency symbols and spaces: "€ 1.234,56", "$1,234.56"
/// - US format: "1,234.56" / European format: "1.234,56"
/// - parenthesized negatives: "(500,00)"
///
/// Returns `None` when no number can be extracted.
pub fn parse_amount(value: &str) -> Option<f64> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }

    let negative_parens = trimmed.starts_with('(') && trimmed.ends_with(')');
    let stripped: String = trimmed
        .chars()
        .filter(|c| !"€$£¥₹ \u{a0}()".contains(*c))
        .collect();

    let matched = NUMBER_RE.find(&stripped)?.as_str();
    let normalized = normalize_separators(matched);
    let mut number: f64 = normalized.parse().ok()?;
    if negative_parens && number > 0.0 {
        number = -number;
    }
    Some(number)
}

/// Parse a raw cell into a number, treating blanks and garbage as zero.
pub fn clean_amount(value: &str) -> f64 {
    parse_amount(value).unwrap_or(0.0)
}

/// Disambiguates `,` and `.` as thousands/decimal separators.
fn normalize_separators(raw: &str) -> String {
    let has_comma = raw.contains(',');
    let has_dot = raw.contains('.');

    if has_comma && has_dot {
        // The rightmost separator is the decimal one.
        if raw.rfind('.') > raw.rfind(',') {
            raw.replace(',', "")
        } else {
            raw.replace('.', "").replace(',', ".")
        }
    } else if has_comma {
        let parts: Vec<&str> = raw.split(',').collect();
        if parts.len() == 2 && parts[1].len() <= 2 {
            // European decimal: 1234,56
            raw.replace(',', ".")
        } else {
            // Thousands separators: 1,234,567
            raw.replace(',', "")
        }
    } else {
        raw.to_string()
    }
}

/// True when the value parses as a number.
pub fn is_numeric(value: &str) -> bool {
    parse_amount(value).is_some()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_numbers() {
        assert_eq!(parse_amount("123"), Some(123.0));
        assert_eq!(parse_amount("-45.67"), Some(-45.67));
        assert_eq!(parse_amount("  0.5  "), Some(0.5));
    }

    #[test]
    fn us_format() {
        assert_eq!(parse_amount("1,234.56"), Some(1234.56));
        assert_eq!(parse_amount("1,234,567"), Some(1234567.0));
    }

    #[test]
    fn european_format() {
        assert_eq!(parse_amount("1.234,56"), Some(1234.56));
        assert_eq!(parse_amount("1234,56"), Some(1234.56));
        assert_eq!(parse_amount("-1.234.567,89"), Some(-1234567.89));
    }

    #[test]
    fn currency_symbols() {
        assert_eq!(parse_amount("€ 1.234,56"), Some(1234.56));
        assert_eq!(parse_amount("$1,234.56"), Some(1234.56));
        assert_eq!(parse_amount("£99"), Some(99.0));
    }

    #[test]
    fn parenthesized_negative() {
        assert_eq!(parse_amount("(500,00)"), Some(-500.0));
        assert_eq!(parse_amount("(1,234.56)"), Some(-1234.56));
    }

    #[test]
    fn garbage_and_blanks() {
        assert_eq!(parse_amount(""), None);
        assert_eq!(parse_amount("   "), None);
        assert_eq!(parse_amount("n/a"), None);
        assert_eq!(clean_amount("n/a"), 0.0);
        assert_eq!(clean_amount("12,5"), 12.5);
    }
}
