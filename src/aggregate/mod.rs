//! Per-bucket aggregation and grand totals.
//!
//! Stats are recomputed from the full record set on every run; nothing is
//! mutated incrementally. A bucket with no entries is simply absent from the
//! output rather than showing a NaN average.

use crate::domain::{BucketStats, Category, GrandTotals, RevenueRecord};

/// Aggregation output: one stats row per category present, plus run totals.
#[derive(Debug, Clone, Default)]
pub struct Aggregated {
    pub buckets: Vec<BucketStats>,
    pub totals: GrandTotals,
}

/// Group validated records by category and compute totals, counts, and
/// averages. Empty input yields an empty result set, not an error.
pub fn aggregate(records: &[RevenueRecord]) -> Aggregated {
    let mut buckets = Vec::with_capacity(2);

    for category in [Category::BeforeThreshold, Category::AfterThreshold] {
        let in_bucket: Vec<&RevenueRecord> =
            records.iter().filter(|r| r.category == category).collect();
        if in_bucket.is_empty() {
            continue;
        }

        let total_revenue: f64 = in_bucket.iter().map(|r| r.revenue).sum();
        let entry_count = in_bucket.len();
        // Missing quantities contribute 0 to the sum; they are still rendered
        // as unknown at the record level.
        let total_quantity: u64 = in_bucket.iter().filter_map(|r| r.quantity).sum();

        buckets.push(BucketStats {
            category,
            total_revenue,
            entry_count,
            average_revenue: total_revenue / entry_count as f64,
            total_quantity,
        });
    }

    let totals = GrandTotals {
        total_revenue: records.iter().map(|r| r.revenue).sum(),
        total_quantity: records.iter().filter_map(|r| r.quantity).sum(),
        hours_covered: records.len(),
    };

    Aggregated { buckets, totals }
}

#[cfg(test)]
mod tests {
    use super::*;

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
    fn worked_example_from_two_records() {
        let records = vec![record(9, 10.00, Some(2)), record(16, 20.00, Some(3))];
        let out = aggregate(&records);

        assert_eq!(out.buckets.len(), 2);

        let before = &out.buckets[0];
        assert_eq!(before.category, Category::BeforeThreshold);
        assert_eq!(before.total_revenue, 10.00);
        assert_eq!(before.entry_count, 1);
        assert_eq!(before.average_revenue, 10.00);
        assert_eq!(before.total_quantity, 2);

        let after = &out.buckets[1];
        assert_eq!(after.category, Category::AfterThreshold);
        assert_eq!(after.total_revenue, 20.00);
        assert_eq!(after.entry_count, 1);
        assert_eq!(after.average_revenue, 20.00);
        assert_eq!(after.total_quantity, 3);

        assert_eq!(out.totals.total_revenue, 30.00);
        assert_eq!(out.totals.total_quantity, 5);
        assert_eq!(out.totals.hours_covered, 2);
    }

    #[test]
    fn empty_bucket_is_absent_not_nan() {
        let records = vec![record(9, 10.00, None)];
        let out = aggregate(&records);
        assert_eq!(out.buckets.len(), 1);
        assert_eq!(out.buckets[0].category, Category::BeforeThreshold);
    }

    #[test]
    fn empty_input_yields_empty_output() {
        let out = aggregate(&[]);
        assert!(out.buckets.is_empty());
        assert_eq!(out.totals, GrandTotals::default());
    }

    #[test]
    fn missing_quantity_counts_as_zero_in_sums() {
        let records = vec![record(9, 10.00, None), record(10, 5.00, Some(4))];
        let out = aggregate(&records);
        assert_eq!(out.buckets[0].total_quantity, 4);
        assert_eq!(out.totals.total_quantity, 4);
    }

    #[test]
    fn average_is_total_over_count() {
        let records = vec![
            record(9, 10.00, None),
            record(10, 20.00, None),
            record(11, 60.00, None),
        ];
        let out = aggregate(&records);
        assert_eq!(out.buckets[0].entry_count, 3);
        assert!((out.buckets[0].average_revenue - 30.00).abs() < 1e-12);
    }
}
