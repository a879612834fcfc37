//! Write the full run to a JSON file.
//!
//! The run file is the "portable" representation of an analysis:
//! - validated records and bucket statistics
//! - run metadata (generation date, hour range, threshold)
//! - diagnostics, so a reviewer can see what was rejected or recovered

use std::fs::File;
use std::path::Path;

use chrono::{Local, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::app::pipeline::RunOutput;
use crate::domain::{AnalyzeConfig, BucketStats, Diagnostic, GrandTotals, RevenueRecord};
use crate::error::AppError;

/// Serialized schema of a run file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunFile {
    pub tool: String,
    pub generated: NaiveDate,
    pub hour_min: u8,
    pub hour_max: u8,
    pub threshold_hour: u8,
    pub records: Vec<RevenueRecord>,
    pub buckets: Vec<BucketStats>,
    pub totals: GrandTotals,
    pub missing_hours: Vec<u8>,
    pub diagnostics: Vec<Diagnostic>,
}

/// Write a run JSON file.
pub fn write_run_json(path: &Path, run: &RunOutput, config: &AnalyzeConfig) -> Result<(), AppError> {
    let file = File::create(path).map_err(|e| {
        AppError::usage(format!("Failed to create run JSON '{}': {e}", path.display()))
    })?;

    let run_file = RunFile {
        tool: "revlog".to_string(),
        generated: Local::now().date_naive(),
        hour_min: config.hour_min,
        hour_max: config.hour_max,
        threshold_hour: config.threshold_hour,
        records: run.records.clone(),
        buckets: run.aggregated.buckets.clone(),
        totals: run.aggregated.totals.clone(),
        missing_hours: run.missing_hours.clone(),
        diagnostics: run.diagnostics.clone(),
    };

    serde_json::to_writer_pretty(file, &run_file)
        .map_err(|e| AppError::usage(format!("Failed to write run JSON: {e}")))?;

    Ok(())
}
