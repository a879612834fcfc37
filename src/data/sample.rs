//! Synthetic noisy revenue-log generation.
//!
//! Produces text shaped like the OCR output of a real register tape, with the
//! corruption modes the extractor is built to survive: dropped currency
//! symbols, degraded unit markers (`HR5`, lone `H`), a trailing period after
//! the hour, and the two classic weak-hour failures (`14` -> `M`, `15` ->
//! `l5`). Deterministic for a given seed, so the output doubles as a fixture.

use rand::prelude::*;
use rand::rngs::StdRng;
use rand_distr::Normal;

/// Hours covered by a generated log (full business day).
const SAMPLE_HOURS: std::ops::RangeInclusive<u8> = 7..=23;

/// Generate one page of synthetic log text.
///
/// `ocr_noise = false` emits clean `HH HRS QTY $AMOUNT` lines; `true` applies
/// the corruption modes above, always mangling hours 14 and 15 so the
/// recovery battery has something to do.
pub fn generate_sample_log(seed: u64, ocr_noise: bool) -> String {
    let mut rng = StdRng::seed_from_u64(seed);
    // Per-item price; clamped so amounts stay positive.
    let price = Normal::<f64>::new(18.0, 6.0).expect("price distribution");

    let mut out = String::new();
    out.push_str("REGISTER TAPE - DAILY REVENUE LOG\n\n");

    for hour in SAMPLE_HOURS {
        // Lunch and dinner rushes move more items.
        let rush = matches!(hour, 12 | 13 | 18 | 19);
        let quantity: u64 = if rush {
            rng.gen_range(25..=60)
        } else {
            rng.gen_range(2..=24)
        };
        let per_item = price.sample(&mut rng).max(2.0);
        let amount = quantity as f64 * per_item;

        out.push_str(&render_line(&mut rng, hour, quantity, amount, ocr_noise));
        out.push('\n');
    }

    out.push_str("\nEND OF TAPE\n");
    out
}

fn render_line(rng: &mut StdRng, hour: u8, quantity: u64, amount: f64, ocr_noise: bool) -> String {
    let amount_text = format_amount(amount);

    if !ocr_noise {
        return format!("{hour:02} HRS {quantity} ${amount_text}");
    }

    // The two threshold-adjacent hours are always corrupted.
    if hour == 14 {
        return format!("M HRS {quantity} ${amount_text}");
    }
    if hour == 15 {
        return format!("l5 HRS {quantity} ${amount_text}");
    }

    let hour_token = if rng.gen_bool(0.15) {
        format!("{hour:02}.")
    } else {
        format!("{hour:02}")
    };
    let marker = match rng.gen_range(0..10) {
        0 => "HR5",
        1 => "HRS'",
        _ => "HRS",
    };
    let currency = if rng.gen_bool(0.25) { "" } else { "$" };

    format!("{hour_token} {marker} {quantity} {currency}{amount_text}")
}

/// Two fraction digits with comma thousands separators ("1,270.17").
fn format_amount(value: f64) -> String {
    let cents = (value * 100.0).round() as u64;
    let whole = cents / 100;
    let frac = cents % 100;

    let digits = whole.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    format!("{grouped}.{frac:02}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::pipeline::run_from_pages;
    use crate::domain::AnalyzeConfig;

    #[test]
    fn same_seed_same_output() {
        assert_eq!(generate_sample_log(7, true), generate_sample_log(7, true));
        assert_ne!(generate_sample_log(7, true), generate_sample_log(8, true));
    }

    #[test]
    fn amounts_group_thousands() {
        assert_eq!(format_amount(1270.17), "1,270.17");
        assert_eq!(format_amount(47.48), "47.48");
        assert_eq!(format_amount(1234567.5), "1,234,567.50");
    }

    #[test]
    fn clean_sample_parses_every_hour() {
        let text = generate_sample_log(42, false);
        let out = run_from_pages(&AnalyzeConfig::default(), &[text]);
        let hours: Vec<u8> = out.records.iter().map(|r| r.hour).collect();
        assert_eq!(hours, (7..=23).collect::<Vec<u8>>());
    }

    #[test]
    fn noisy_sample_still_recovers_weak_hours() {
        let text = generate_sample_log(42, true);
        let out = run_from_pages(&AnalyzeConfig::default(), &[text]);
        assert!(out.records.iter().any(|r| r.hour == 14));
        assert!(out.records.iter().any(|r| r.hour == 15));
    }
}
