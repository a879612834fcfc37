//! Validation and normalization of winning candidates.
//!
//! Each candidate either becomes an immutable [`RevenueRecord`] or is dropped
//! with a diagnostic; no single bad row ever aborts the batch. Out-of-range
//! hours get a diagnostic distinct from parse failures since they may be
//! correct but rare values worth human review rather than OCR garbage.

use crate::domain::{
    AnalyzeConfig, Category, Diagnostic, DiagnosticKind, RawCandidate, RevenueRecord,
};

/// Validation output: accepted records (ascending by hour) plus diagnostics
/// for everything that was dropped.
#[derive(Debug, Clone)]
pub struct Validated {
    pub records: Vec<RevenueRecord>,
    pub diagnostics: Vec<Diagnostic>,
}

/// Convert winning candidates into records, dropping invalid ones.
pub fn validate(winners: &[RawCandidate], config: &AnalyzeConfig) -> Validated {
    let mut records = Vec::with_capacity(winners.len());
    let mut diagnostics = Vec::new();

    for candidate in winners {
        if candidate.hour < config.hour_min || candidate.hour > config.hour_max {
            diagnostics.push(Diagnostic::new(
                DiagnosticKind::UnusualHour,
                format!(
                    "skipped unusual hour {} (outside business hours {}-{})",
                    candidate.hour, config.hour_min, config.hour_max,
                ),
            ));
            continue;
        }

        let revenue = match parse_amount(&candidate.amount_text) {
            Ok(v) => v,
            Err(e) => {
                diagnostics.push(Diagnostic::new(
                    DiagnosticKind::ParseFailure,
                    format!(
                        "hour {}: unparseable amount '{}': {e}",
                        candidate.hour, candidate.amount_text,
                    ),
                ));
                continue;
            }
        };

        records.push(RevenueRecord {
            hour: candidate.hour,
            time: format!("{:02}:00", candidate.hour),
            revenue,
            // Absence stays absence; zero-filling happens only in aggregate
            // sums, never here.
            quantity: candidate.quantity,
            category: Category::of(candidate.hour, config.threshold_hour),
        });
    }

    // Hour is the only defined ordering; deduplication upstream means ties
    // cannot occur.
    records.sort_by_key(|r| r.hour);

    Validated {
        records,
        diagnostics,
    }
}

/// Parse an amount string into a non-negative decimal.
///
/// A single leading `$` is stripped if present, then thousands separators,
/// then the remainder must parse as a finite non-negative number. Used by
/// both the regex path (where the pattern already constrains the shape) and
/// the lenient vision path.
pub fn parse_amount(text: &str) -> Result<f64, String> {
    let stripped = text.trim();
    let stripped = stripped.strip_prefix('$').unwrap_or(stripped).trim();
    let cleaned = stripped.replace(',', "");
    if cleaned.is_empty() {
        return Err("empty amount".to_string());
    }
    let value: f64 = cleaned
        .parse()
        .map_err(|_| format!("'{cleaned}' is not a number"))?;
    if !value.is_finite() {
        return Err("non-finite amount".to_string());
    }
    if value < 0.0 {
        return Err("negative amount".to_string());
    }
    Ok(value)
}

/// Parse a quantity that may arrive as text with separators ("1,234").
/// Used by the vision path; the regex path captures bare digit runs.
pub fn parse_quantity(text: &str) -> Option<u64> {
    let cleaned = text.trim().replace(',', "");
    if cleaned.is_empty() {
        return None;
    }
    cleaned.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::SourcePattern;

    fn candidate(hour: u8, quantity: Option<u64>, amount: &str) -> RawCandidate {
        RawCandidate {
            hour,
            quantity,
            amount_text: amount.to_string(),
            source: SourcePattern::WithCurrency,
            offset: 0,
        }
    }

    #[test]
    fn out_of_range_hour_is_dropped_with_unusual_diagnostic() {
        let out = validate(&[candidate(25, Some(1), "10.00")], &AnalyzeConfig::default());
        assert!(out.records.is_empty());
        assert_eq!(out.diagnostics.len(), 1);
        assert_eq!(out.diagnostics[0].kind, DiagnosticKind::UnusualHour);
    }

    #[test]
    fn thousands_separators_are_stripped() {
        assert_eq!(parse_amount("$1,270.17").unwrap(), 1270.17);
        assert_eq!(parse_amount("1,270.17").unwrap(), 1270.17);
        assert_eq!(parse_amount("47.48").unwrap(), 47.48);
    }

    #[test]
    fn bad_amounts_are_rejected() {
        assert!(parse_amount("").is_err());
        assert!(parse_amount("$").is_err());
        assert!(parse_amount("abc").is_err());
        assert!(parse_amount("-5.00").is_err());
        assert!(parse_amount("inf").is_err());
    }

    #[test]
    fn unparseable_amount_skips_candidate_but_not_batch() {
        let out = validate(
            &[candidate(9, Some(2), "garbage"), candidate(10, Some(1), "5.00")],
            &AnalyzeConfig::default(),
        );
        assert_eq!(out.records.len(), 1);
        assert_eq!(out.records[0].hour, 10);
        assert_eq!(out.diagnostics.len(), 1);
        assert_eq!(out.diagnostics[0].kind, DiagnosticKind::ParseFailure);
    }

    #[test]
    fn threshold_hour_belongs_to_after_bucket() {
        let out = validate(
            &[candidate(14, None, "1.00"), candidate(15, None, "2.00")],
            &AnalyzeConfig::default(),
        );
        assert_eq!(out.records[0].category, Category::BeforeThreshold);
        assert_eq!(out.records[1].category, Category::AfterThreshold);
    }

    #[test]
    fn missing_quantity_is_preserved_not_zeroed() {
        let out = validate(&[candidate(9, None, "10.00")], &AnalyzeConfig::default());
        assert_eq!(out.records[0].quantity, None);
    }

    #[test]
    fn records_come_out_sorted_by_hour() {
        let out = validate(
            &[
                candidate(16, Some(1), "3.00"),
                candidate(8, Some(1), "1.00"),
                candidate(12, Some(1), "2.00"),
            ],
            &AnalyzeConfig::default(),
        );
        let hours: Vec<u8> = out.records.iter().map(|r| r.hour).collect();
        assert_eq!(hours, vec![8, 12, 16]);
    }

    #[test]
    fn time_string_is_zero_padded() {
        let out = validate(&[candidate(9, None, "10.00")], &AnalyzeConfig::default());
        assert_eq!(out.records[0].time, "09:00");
    }

    #[test]
    fn vision_quantities_tolerate_separators() {
        assert_eq!(parse_quantity("1,234"), Some(1234));
        assert_eq!(parse_quantity(" 12 "), Some(12));
        assert_eq!(parse_quantity("n/a"), None);
        assert_eq!(parse_quantity(""), None);
    }
}
