//! Shared analysis pipeline used by every front-end command.
//!
//! Keeping this in one place avoids duplicating the core workflow:
//! extract -> reconcile -> validate -> aggregate
//!
//! Both candidate sources (regex over OCR text, vision collaborator) feed the
//! same reconciler and validator, so precedence and range rules cannot drift
//! between them. The pipeline itself is infallible: absent or garbage input
//! produces an empty record set plus diagnostics, never an error.

use crate::aggregate::{Aggregated, aggregate};
use crate::domain::{AnalyzeConfig, Diagnostic, RawCandidate, RevenueRecord};
use crate::extract::extract_pages;
use crate::reconcile::reconcile;
use crate::validate::validate;

/// All computed outputs of a single analysis run.
#[derive(Debug, Clone)]
pub struct RunOutput {
    pub records: Vec<RevenueRecord>,
    pub aggregated: Aggregated,
    /// Hours in the configured range with no candidate at all.
    pub missing_hours: Vec<u8>,
    /// Ordered, append-only run notes (recoveries, rejections, failures).
    pub diagnostics: Vec<Diagnostic>,
    /// Raw candidate count before reconciliation (for the run summary).
    pub candidates_found: usize,
}

/// Run the full pipeline over ordered page texts (the OCR path).
pub fn run_from_pages(config: &AnalyzeConfig, pages: &[String]) -> RunOutput {
    let candidates = extract_pages(pages);
    let joined = pages.join("\n");
    run_reconcile_and_validate(config, candidates, Some(&joined))
}

/// Run the pipeline over pre-structured candidates (the vision path, where
/// no text exists for the recovery battery to re-scan).
pub fn run_from_candidates(config: &AnalyzeConfig, candidates: Vec<RawCandidate>) -> RunOutput {
    run_reconcile_and_validate(config, candidates, None)
}

/// Run the pipeline over pre-structured candidates that still have backing
/// text (the text-mode LLM path): the recovery battery re-scans the text for
/// weak hours the model missed.
pub fn run_from_candidates_with_text(
    config: &AnalyzeConfig,
    candidates: Vec<RawCandidate>,
    text: &str,
) -> RunOutput {
    run_reconcile_and_validate(config, candidates, Some(text))
}

fn run_reconcile_and_validate(
    config: &AnalyzeConfig,
    candidates: Vec<RawCandidate>,
    text: Option<&str>,
) -> RunOutput {
    let candidates_found = candidates.len();

    let reconciled = reconcile(&candidates, text, config);
    let validated = validate(&reconciled.winners, config);
    let aggregated = aggregate(&validated.records);

    let mut diagnostics = reconciled.diagnostics;
    diagnostics.extend(validated.diagnostics);

    RunOutput {
        records: validated.records,
        aggregated,
        missing_hours: reconciled.missing_hours,
        diagnostics,
        candidates_found,
    }
}
