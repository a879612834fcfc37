//! Formatted terminal output for runs.
//!
//! We keep formatting code in one place so:
//! - the extraction/aggregation code stays clean and testable
//! - output changes are localized (important for future snapshot tests)

use crate::app::pipeline::RunOutput;
use crate::domain::{AnalyzeConfig, Diagnostic, RevenueRecord};

/// Format the run summary: grand totals, per-bucket stats, missing hours.
pub fn format_run_summary(run: &RunOutput, config: &AnalyzeConfig) -> String {
    let mut out = String::new();

    out.push_str("=== revlog - Revenue Log Analysis ===\n");
    out.push_str(&format!(
        "Hours: [{:02}, {:02}] | threshold {:02}:00\n",
        config.hour_min, config.hour_max, config.threshold_hour,
    ));
    out.push_str(&format!(
        "Candidates: {} | records: {}\n",
        run.candidates_found,
        run.records.len(),
    ));

    let totals = &run.aggregated.totals;
    out.push_str(&format!(
        "Total revenue: ${:.2} | total quantity: {} | hours covered: {}\n",
        totals.total_revenue, totals.total_quantity, totals.hours_covered,
    ));

    if !run.aggregated.buckets.is_empty() {
        out.push_str("\nBucket statistics:\n");
        out.push_str(&format!(
            "{:<16} {:>14} {:>8} {:>14} {:>10}\n",
            "Period", "Total", "Entries", "Average", "Quantity"
        ));
        for bucket in &run.aggregated.buckets {
            out.push_str(&format!(
                "{:<16} {:>14} {:>8} {:>14} {:>10}\n",
                bucket.category.display_name(config.threshold_hour),
                format!("${:.2}", bucket.total_revenue),
                bucket.entry_count,
                format!("${:.2}", bucket.average_revenue),
                bucket.total_quantity,
            ));
        }
    }

    if !run.missing_hours.is_empty() {
        let hours: Vec<String> = run
            .missing_hours
            .iter()
            .map(|h| format!("{h:02}"))
            .collect();
        out.push_str(&format!("\nHours with no entry: {}\n", hours.join(", ")));
    }

    out
}

/// Format the record-level table.
///
/// Missing quantities render as "Unknown", never as "0"; zero-filling only
/// ever happens inside aggregate sums.
pub fn format_records(records: &[RevenueRecord], config: &AnalyzeConfig) -> String {
    if records.is_empty() {
        return "No revenue data was extracted.\n".to_string();
    }

    let mut out = String::new();
    out.push_str(&format!(
        "{:>4} {:>6} {:>12} {:<16} {:>8}\n",
        "Hour", "Time", "Revenue", "Category", "Quantity"
    ));
    out.push_str(&format!(
        "{:->4} {:->6} {:->12} {:-<16} {:->8}\n",
        "", "", "", "", ""
    ));
    for record in records {
        out.push_str(&format!(
            "{:>4} {:>6} {:>12} {:<16} {:>8}\n",
            record.hour,
            record.time,
            format!("${:.2}", record.revenue),
            record.category.display_name(config.threshold_hour),
            record
                .quantity
                .map(|q| q.to_string())
                .unwrap_or_else(|| "Unknown".to_string()),
        ));
    }
    out
}

/// Format the diagnostics list.
pub fn format_diagnostics(diagnostics: &[Diagnostic]) -> String {
    let mut out = String::new();
    out.push_str(&format!("Processing notes ({}):\n", diagnostics.len()));
    for diagnostic in diagnostics {
        out.push_str(&format!("- {diagnostic}\n"));
    }
    out
}
