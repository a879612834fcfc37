//! Candidate reconciliation: one winner per hour, plus targeted recovery.
//!
//! Tie-break table (explicit, in priority order):
//!
//! 1. a candidate bearing an explicit quantity beats a quantity-less one for
//!    the same hour, regardless of where either appeared
//! 2. among candidates of the same quantity tier, the lowest global offset
//!    (document order) wins, independent of which pattern pass found it;
//!    equal offsets keep the earlier pass's candidate
//!
//! After the primary pass, the relaxed recovery battery runs for the two
//! threshold-adjacent hours if they are absent. A recovered hour is tagged
//! with its battery index; an unrecoverable hour stays absent and is recorded
//! as a diagnostic. The reconciler never fabricates values.

use std::collections::BTreeMap;

use crate::domain::{AnalyzeConfig, Diagnostic, DiagnosticKind, RawCandidate, SourcePattern};
use crate::extract::patterns::recovery_battery;

/// Reconciliation output: winners in ascending hour order, hours in the
/// configured range with no candidate at all, and recovery diagnostics.
#[derive(Debug, Clone)]
pub struct Reconciled {
    pub winners: Vec<RawCandidate>,
    pub missing_hours: Vec<u8>,
    pub diagnostics: Vec<Diagnostic>,
}

/// Merge candidates across patterns and recover known-weak hours.
///
/// `text` is the full document text the candidates came from; the recovery
/// battery re-scans it with relaxed patterns. Pass `None` for candidate
/// sources that have no underlying text (the vision path) — recovery is then
/// skipped and absent weak hours are reported directly.
pub fn reconcile(
    candidates: &[RawCandidate],
    text: Option<&str>,
    config: &AnalyzeConfig,
) -> Reconciled {
    let mut by_hour: BTreeMap<u8, RawCandidate> = BTreeMap::new();

    for candidate in candidates {
        match by_hour.get(&candidate.hour) {
            None => {
                by_hour.insert(candidate.hour, candidate.clone());
            }
            Some(existing) => {
                // Quantity tier beats document order; within a tier the
                // earliest document position wins regardless of which
                // pattern pass produced the candidate.
                let wins = match (candidate.has_quantity(), existing.has_quantity()) {
                    (true, false) => true,
                    (false, true) => false,
                    _ => candidate.offset < existing.offset,
                };
                if wins {
                    by_hour.insert(candidate.hour, candidate.clone());
                }
            }
        }
    }

    let mut diagnostics = Vec::new();

    for hour in config.recovery_hours() {
        if by_hour.contains_key(&hour) {
            continue;
        }
        match text.and_then(|t| recover_hour(t, hour)) {
            Some((candidate, note)) => {
                diagnostics.push(Diagnostic::new(
                    DiagnosticKind::RecoveredHour,
                    format!(
                        "hour {hour} recovered ({note}): qty {}, amount {}",
                        candidate
                            .quantity
                            .map(|q| q.to_string())
                            .unwrap_or_else(|| "unknown".to_string()),
                        candidate.amount_text,
                    ),
                ));
                by_hour.insert(hour, candidate);
            }
            None => {
                let message = if text.is_some() {
                    format!("hour {hour} not found; recovery patterns exhausted, hour left absent")
                } else {
                    format!("hour {hour} absent from candidate set (no text to run recovery on)")
                };
                diagnostics.push(Diagnostic::new(DiagnosticKind::UnrecoverableHour, message));
            }
        }
    }

    let missing_hours = (config.hour_min..=config.hour_max)
        .filter(|h| !by_hour.contains_key(h))
        .collect();

    Reconciled {
        winners: by_hour.into_values().collect(),
        missing_hours,
        diagnostics,
    }
}

/// Try the relaxed battery for one hour; first pattern with a parseable
/// amount wins. Returns the synthetic candidate and the pattern's note.
fn recover_hour(text: &str, hour: u8) -> Option<(RawCandidate, &'static str)> {
    for (idx, pattern) in recovery_battery(hour).iter().enumerate() {
        let Some(caps) = pattern.regex.captures(text) else {
            continue;
        };
        let Some(amount) = caps.get(2) else {
            continue;
        };
        let quantity = caps.get(1).and_then(|q| q.as_str().parse().ok());
        let offset = caps.get(0).map(|m| m.start()).unwrap_or(0);
        return Some((
            RawCandidate {
                hour,
                quantity,
                amount_text: amount.as_str().to_string(),
                source: SourcePattern::HourRecovery(idx as u8 + 1),
                offset,
            },
            pattern.note,
        ));
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn candidate(hour: u8, quantity: Option<u64>, amount: &str, offset: usize) -> RawCandidate {
        RawCandidate {
            hour,
            quantity,
            amount_text: amount.to_string(),
            source: SourcePattern::WithCurrency,
            offset,
        }
    }

    #[test]
    fn quantity_bearing_candidate_wins_regardless_of_order() {
        let cands = vec![
            candidate(9, None, "11.00", 0),
            candidate(9, Some(3), "10.00", 50),
        ];
        let out = reconcile(&cands, Some(""), &AnalyzeConfig::default());
        let winner = out.winners.iter().find(|c| c.hour == 9).unwrap();
        assert_eq!(winner.quantity, Some(3));
        assert_eq!(winner.amount_text, "10.00");
    }

    #[test]
    fn first_candidate_wins_within_same_tier() {
        let cands = vec![
            candidate(9, Some(2), "10.00", 0),
            candidate(9, Some(5), "99.00", 50),
        ];
        let out = reconcile(&cands, Some(""), &AnalyzeConfig::default());
        let winner = out.winners.iter().find(|c| c.hour == 9).unwrap();
        assert_eq!(winner.amount_text, "10.00");
    }

    #[test]
    fn document_order_wins_across_pattern_passes() {
        // The same hour appears on an earlier currency-less line and a later
        // currency-qualified line. Both candidates carry a quantity, so the
        // earlier document position must win even though the currency pass
        // emits its matches first.
        let text = "09 HRS 7 22.00\n09 HRS 5 $10.00\n";
        let cands = crate::extract::extract_candidates(text);
        let out = reconcile(&cands, Some(text), &AnalyzeConfig::default());

        let winner = out.winners.iter().find(|c| c.hour == 9).unwrap();
        assert_eq!(winner.amount_text, "22.00");
        assert_eq!(winner.quantity, Some(7));
        assert_eq!(winner.offset, 0);
    }

    #[test]
    fn bare_m_line_recovers_hour_fourteen() {
        let text = "09 HRS 2 $10.00\nM HRS 21 $134.19\n";
        let cands = vec![candidate(9, Some(2), "10.00", 0)];
        let out = reconcile(&cands, Some(text), &AnalyzeConfig::default());

        let fourteen = out.winners.iter().find(|c| c.hour == 14).unwrap();
        assert_eq!(fourteen.quantity, Some(21));
        assert_eq!(fourteen.amount_text, "134.19");
        assert_eq!(fourteen.source, SourcePattern::HourRecovery(2));
        assert!(
            out.diagnostics
                .iter()
                .any(|d| d.kind == DiagnosticKind::RecoveredHour)
        );
    }

    #[test]
    fn confused_digit_recovers_hour_fifteen() {
        let text = "l5 HRS 8 $61.20\n";
        let out = reconcile(&[], Some(text), &AnalyzeConfig::default());
        let fifteen = out.winners.iter().find(|c| c.hour == 15).unwrap();
        assert_eq!(fifteen.quantity, Some(8));
        assert_eq!(fifteen.source, SourcePattern::HourRecovery(1));
    }

    #[test]
    fn exhausted_battery_reports_and_never_fabricates() {
        let out = reconcile(&[], Some("no revenue lines here"), &AnalyzeConfig::default());
        assert!(out.winners.is_empty());
        let unrecovered: Vec<_> = out
            .diagnostics
            .iter()
            .filter(|d| d.kind == DiagnosticKind::UnrecoverableHour)
            .collect();
        assert_eq!(unrecovered.len(), 2);
        assert!(out.missing_hours.contains(&14));
        assert!(out.missing_hours.contains(&15));
    }

    #[test]
    fn present_recovery_hours_skip_the_battery() {
        let cands = vec![
            candidate(14, Some(1), "5.00", 0),
            candidate(15, Some(1), "6.00", 20),
        ];
        let out = reconcile(&cands, Some("M HRS 99 $999.99"), &AnalyzeConfig::default());
        let fourteen = out.winners.iter().find(|c| c.hour == 14).unwrap();
        assert_eq!(fourteen.amount_text, "5.00");
        assert!(out.diagnostics.is_empty());
    }

    #[test]
    fn missing_hours_cover_the_configured_range() {
        let cands = vec![candidate(9, Some(2), "10.00", 0)];
        let out = reconcile(&cands, None, &AnalyzeConfig::default());
        assert!(!out.missing_hours.contains(&9));
        assert!(out.missing_hours.contains(&7));
        assert!(out.missing_hours.contains(&23));
    }
}
