//! Export the record table to CSV.
//!
//! The export is meant to be easy to consume in spreadsheets or downstream
//! scripts: Revenue is a plain decimal (no currency symbol) and Quantity is
//! left empty when unknown.

use std::fs::File;
use std::io::Write;
use std::path::Path;

use crate::domain::{AnalyzeConfig, RevenueRecord};
use crate::error::AppError;

/// Write validated records to a flat CSV file.
pub fn write_records_csv(
    path: &Path,
    records: &[RevenueRecord],
    config: &AnalyzeConfig,
) -> Result<(), AppError> {
    let mut file = File::create(path).map_err(|e| {
        AppError::usage(format!("Failed to create export CSV '{}': {e}", path.display()))
    })?;

    writeln!(file, "Hour,Time,Revenue,Category,Quantity")
        .map_err(|e| AppError::usage(format!("Failed to write export CSV header: {e}")))?;

    for record in records {
        writeln!(file, "{}", csv_row(record, config))
            .map_err(|e| AppError::usage(format!("Failed to write export CSV row: {e}")))?;
    }

    Ok(())
}

fn csv_row(record: &RevenueRecord, config: &AnalyzeConfig) -> String {
    format!(
        "{},{},{:.2},{},{}",
        record.hour,
        record.time,
        record.revenue,
        record.category.display_name(config.threshold_hour),
        record
            .quantity
            .map(|q| q.to_string())
            .unwrap_or_default(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Category;

    fn record(hour: u8, revenue: f64, quantity: Option<u64>) -> RevenueRecord {
        RevenueRecord {
            hour,
            time: format!("{hour:02}:00"),
            revenue,
            quantity,
            category: Category::of(hour, 15),
        }
    }

    #[test]
    fn row_has_plain_decimal_revenue() {
        let row = csv_row(&record(9, 1270.17, Some(2)), &AnalyzeConfig::default());
        assert_eq!(row, "9,09:00,1270.17,Before 3:00 PM,2");
    }

    #[test]
    fn unknown_quantity_exports_as_empty_field() {
        let row = csv_row(&record(16, 20.0, None), &AnalyzeConfig::default());
        assert_eq!(row, "16,16:00,20.00,After 3:00 PM,");
    }
}
