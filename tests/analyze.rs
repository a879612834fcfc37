//! End-to-end pipeline checks against generated noisy logs.

use revlog::aggregate::aggregate;
use revlog::app::pipeline::run_from_pages;
use revlog::data::sample::generate_sample_log;
use revlog::domain::{AnalyzeConfig, Category};

#[test]
fn noisy_log_round_trips_every_business_hour() {
    let config = AnalyzeConfig::default();
    let text = generate_sample_log(42, true);
    let out = run_from_pages(&config, &[text]);

    let hours: Vec<u8> = out.records.iter().map(|r| r.hour).collect();
    assert_eq!(hours, (7..=23).collect::<Vec<u8>>());
    assert!(out.missing_hours.is_empty());

    let before = out
        .records
        .iter()
        .filter(|r| r.category == Category::BeforeThreshold)
        .count();
    let after = out
        .records
        .iter()
        .filter(|r| r.category == Category::AfterThreshold)
        .count();
    assert_eq!(before, 8); // 07..14
    assert_eq!(after, 9); // 15..23
}

#[test]
fn bucket_totals_reconcile_with_grand_totals() {
    let config = AnalyzeConfig::default();
    let text = generate_sample_log(7, true);
    let out = run_from_pages(&config, &[text]);

    let bucket_revenue: f64 = out.aggregated.buckets.iter().map(|b| b.total_revenue).sum();
    assert!((bucket_revenue - out.aggregated.totals.total_revenue).abs() < 1e-9);

    let bucket_quantity: u64 = out.aggregated.buckets.iter().map(|b| b.total_quantity).sum();
    assert_eq!(bucket_quantity, out.aggregated.totals.total_quantity);
}

#[test]
fn multi_page_input_analyzes_like_a_single_document() {
    let config = AnalyzeConfig::default();
    let page_one = "09 HRS 2 $10.00\n10 HRS 4 47.48\n".to_string();
    let page_two = "16 HRS 3 $20.00\nM HRS 21 $134.19\n".to_string();

    let out = run_from_pages(&config, &[page_one.clone(), page_two.clone()]);
    let joined = run_from_pages(&config, &[format!("{page_one}\n{page_two}")]);

    assert_eq!(out.records, joined.records);
    assert_eq!(aggregate(&out.records).totals, joined.aggregated.totals);
}
