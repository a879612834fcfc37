//! Compiled pattern set for the extraction cascade.
//!
//! The unit marker (`HRS` in clean scans) is matched tolerantly because OCR
//! output degrades it in recurring ways: a trailing `5` instead of `S`, stray
//! quote punctuation, or a lone capital `H` where the rest of the token was
//! lost. The amount shape is fixed at "up to four leading digits, optional
//! comma groups, exactly two fraction digits" — anything else is not a money
//! amount in these logs.

use once_cell::sync::Lazy;
use regex::Regex;

/// OCR-tolerant unit marker, as a regex fragment.
const UNIT_MARKER: &str = r#"(?:HRS['"]?|HR5|\bH\b)"#;

/// Money amount with optional thousands separators and two fraction digits.
const AMOUNT: &str = r"\d{1,4}(?:,\d{3})*\.\d{2}";

/// Pass 1: hour + unit marker + quantity + `$`-prefixed amount.
/// A period sometimes trails the hour token ("11. HRS 36 $195.88").
pub static WITH_CURRENCY_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(
        r"(\d{{1,2}})\.?\s*{UNIT_MARKER}\s+(\d+)\s+\$({AMOUNT})"
    ))
    .expect("with-currency pattern")
});

/// Pass 2: same shape without the currency symbol ("10 HRS 4 47.48").
/// Applied line-by-line to lines carrying no `$`, so pass-1 lines are not
/// matched twice.
pub static NO_CURRENCY_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(
        r"(\d{{1,2}})\.?\s*{UNIT_MARKER}\s+(\d+)\s+({AMOUNT})"
    ))
    .expect("no-currency pattern")
});

/// Pass 3: hour + unit marker + anything (non-greedy) + `$`-prefixed amount.
/// Catches lines where the quantity column was lost to OCR.
pub static ALT_NO_QUANTITY_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(r"(\d{{1,2}})\s*{UNIT_MARKER}.*?\$({AMOUNT})"))
        .expect("alt-no-quantity pattern")
});

/// Secondary lookup used to back-fill a quantity for a pass-3 match:
/// the same hour token followed by the unit marker and a bare integer.
/// Single-digit hours appear both padded ("09") and bare ("9") in scans.
pub fn quantity_backfill_re(hour: u8) -> Regex {
    let hour_token = if hour < 10 {
        format!("0?{hour}")
    } else {
        format!("{hour}")
    };
    Regex::new(&format!(r"\b{hour_token}\.?\s*{UNIT_MARKER}\s*(\d+)\b"))
        .expect("quantity back-fill pattern")
}

/// One relaxed pattern in the recovery battery for a weak hour.
pub struct RecoveryPattern {
    pub regex: Regex,
    /// What the pattern tolerates, for diagnostics.
    pub note: &'static str,
}

/// Build the ordered recovery battery for a single hour.
///
/// The hour digit `1` frequently OCRs as `l` or `I`, so two-digit hours in
/// the teens get a confusable leading digit. The pair "14" additionally
/// degrades to a bare `M` on some scans, which gets its own battery entry.
/// The quantity group is optional; the `$` prefix is optional too since the
/// currency symbol is often the first casualty.
pub fn recovery_battery(hour: u8) -> Vec<RecoveryPattern> {
    let hour_token = if (10..20).contains(&hour) {
        format!("[1lI]{}", hour - 10)
    } else {
        format!("{hour}")
    };

    let mut battery = vec![RecoveryPattern {
        regex: Regex::new(&format!(
            r"{hour_token}\.?\s*{UNIT_MARKER}\s*(?:(\d+)\s+)?\$?\s*({AMOUNT})"
        ))
        .expect("digit-confusion recovery pattern"),
        note: "digit/letter confusion on the hour token",
    }];

    if hour == 14 {
        battery.push(RecoveryPattern {
            regex: Regex::new(&format!(
                r"\bM\s+{UNIT_MARKER}\s*(?:(\d+)\s+)?\$?\s*({AMOUNT})"
            ))
            .expect("bare-M recovery pattern"),
            note: "bare 'M' standing in for '14'",
        });
    }

    battery
}
