//! Shared domain types.
//!
//! These types are intentionally kept lightweight and serializable so they can be:
//!
//! - used in-memory during extraction and reconciliation
//! - exported to JSON/CSV
//! - consumed read-only by any presentation layer

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Which extraction pass produced a candidate.
///
/// The variant order reflects the pattern cascade: currency-qualified matches
/// first, then currency-less line matches, then quantity-less fallbacks, then
/// the targeted hour-recovery battery. The vision collaborator is a separate
/// source that feeds the same reconciler.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourcePattern {
    /// Hour + unit marker + quantity + `$`-prefixed amount.
    WithCurrency,
    /// Same shape without the currency symbol, matched line-by-line on lines
    /// that carry no `$`.
    NoCurrency,
    /// Hour + unit marker + anything (non-greedy) + `$`-prefixed amount;
    /// quantity absent unless back-filled from a secondary lookup.
    AltNoQuantity,
    /// Synthetic candidate from the relaxed recovery battery for the
    /// threshold-adjacent hours. Payload is the 1-based battery index.
    HourRecovery(u8),
    /// Candidate supplied by the vision collaborator.
    Vision,
}

/// An unvalidated extraction result.
///
/// Hours always parse (the patterns only admit 1-2 digit tokens, and recovery
/// assigns the hour directly), so they are carried as integers. The amount
/// stays textual; stripping separators and converting to a decimal is the
/// validator's job.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawCandidate {
    pub hour: u8,
    pub quantity: Option<u64>,
    pub amount_text: String,
    pub source: SourcePattern,
    /// Byte offset of the match in the global document text. Page offsets are
    /// accumulated before extraction so multi-page order stays stable.
    pub offset: usize,
}

impl RawCandidate {
    /// Tie-break tier: an explicit quantity always outranks its absence.
    pub fn has_quantity(&self) -> bool {
        self.quantity.is_some()
    }
}

/// Before/after position relative to the configured threshold hour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    BeforeThreshold,
    AfterThreshold,
}

impl Category {
    /// Pure function of hour and threshold; the threshold hour itself is
    /// "after" (3:00 PM belongs to the afternoon bucket).
    pub fn of(hour: u8, threshold_hour: u8) -> Category {
        if hour < threshold_hour {
            Category::BeforeThreshold
        } else {
            Category::AfterThreshold
        }
    }

    /// Human-readable label. The conventional "3:00 PM" wording is used for
    /// the default threshold; other thresholds get a generic label.
    pub fn display_name(self, threshold_hour: u8) -> String {
        let boundary = if threshold_hour == 15 {
            "3:00 PM".to_string()
        } else {
            format!("{threshold_hour:02}:00")
        };
        match self {
            Category::BeforeThreshold => format!("Before {boundary}"),
            Category::AfterThreshold => format!("After {boundary}"),
        }
    }
}

/// A validated, deduplicated hourly revenue entry.
///
/// Exactly one record exists per distinct hour in a run's output; records are
/// immutable once the validator has produced them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RevenueRecord {
    pub hour: u8,
    /// `"HH:00"` display form of the hour.
    pub time: String,
    pub revenue: f64,
    /// `None` means the quantity was genuinely absent from the source text.
    /// It is rendered as "Unknown" and contributes 0 only to aggregate sums.
    pub quantity: Option<u64>,
    pub category: Category,
}

/// Per-category aggregate statistics, recomputed from scratch on every run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BucketStats {
    pub category: Category,
    pub total_revenue: f64,
    pub entry_count: usize,
    pub average_revenue: f64,
    pub total_quantity: u64,
}

/// Whole-run totals across both buckets.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GrandTotals {
    pub total_revenue: f64,
    /// Missing quantities count as 0 here (and only here).
    pub total_quantity: u64,
    /// Number of distinct hours covered by the output.
    pub hours_covered: usize,
}

/// Classification of a non-fatal observation made during a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiagnosticKind {
    /// Hour outside the configured business range. Possibly a correct but
    /// rare value worth human review, so kept distinct from parse failures.
    UnusualHour,
    /// Malformed numeric text on an otherwise-matched candidate.
    ParseFailure,
    /// A threshold-adjacent hour was recovered by the relaxed battery.
    RecoveredHour,
    /// The recovery battery was exhausted; the hour stays absent.
    UnrecoverableHour,
}

/// One human-readable note attached to a run. Append-only; never fatal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Diagnostic {
    pub kind: DiagnosticKind,
    pub message: String,
}

impl Diagnostic {
    pub fn new(kind: DiagnosticKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

impl std::fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let tag = match self.kind {
            DiagnosticKind::UnusualHour => "unusual-hour",
            DiagnosticKind::ParseFailure => "parse-failure",
            DiagnosticKind::RecoveredHour => "recovered",
            DiagnosticKind::UnrecoverableHour => "unrecovered",
        };
        write!(f, "[{tag}] {}", self.message)
    }
}

/// A full run's configuration as understood by the pipeline.
///
/// The business-hours range and the afternoon threshold are domain policy,
/// not algorithmic necessity, so they are carried here rather than hard-coded
/// in the patterns.
#[derive(Debug, Clone)]
pub struct AnalyzeConfig {
    /// Inclusive lower bound of the accepted hour range.
    pub hour_min: u8,
    /// Inclusive upper bound of the accepted hour range.
    pub hour_max: u8,
    /// First hour counted as [`Category::AfterThreshold`].
    pub threshold_hour: u8,

    pub export_csv: Option<PathBuf>,
    pub export_run: Option<PathBuf>,
}

impl Default for AnalyzeConfig {
    fn default() -> Self {
        Self {
            hour_min: 7,
            hour_max: 23,
            threshold_hour: 15,
            export_csv: None,
            export_run: None,
        }
    }
}

impl AnalyzeConfig {
    /// The hours the recovery battery targets: the two hours straddling the
    /// threshold, which OCR mangles most often (14 and 15 by default).
    pub fn recovery_hours(&self) -> [u8; 2] {
        [self.threshold_hour.saturating_sub(1), self.threshold_hour]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn category_boundary_at_threshold() {
        for h in 7..15 {
            assert_eq!(Category::of(h, 15), Category::BeforeThreshold, "hour {h}");
        }
        for h in 15..=23 {
            assert_eq!(Category::of(h, 15), Category::AfterThreshold, "hour {h}");
        }
    }

    #[test]
    fn category_labels_use_pm_wording_for_default_threshold() {
        assert_eq!(Category::BeforeThreshold.display_name(15), "Before 3:00 PM");
        assert_eq!(Category::AfterThreshold.display_name(15), "After 3:00 PM");
        assert_eq!(Category::BeforeThreshold.display_name(12), "Before 12:00");
    }

    #[test]
    fn recovery_hours_straddle_threshold() {
        let config = AnalyzeConfig::default();
        assert_eq!(config.recovery_hours(), [14, 15]);
    }
}
