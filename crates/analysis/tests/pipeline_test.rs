//! End-to-end tests for the launch-cycle pipeline.
//!
//! These tests run the full pipeline over a synthetic but realistic dataset:
//! - Bull-cycle launches that outperform bear-cycle launches
//! - A stablecoin, a wrapped asset and a dead delisted token
//! - A reference series rising into late 2021 and falling through 2022

use chrono::{Days, NaiveDate};
use launch_cycle_analysis::{AnalysisPipeline, ReferenceSeries, SweepParameter};
use launch_cycle_core::{AnalysisConfig, CycleType, ListingStatus, TokenRecord};

// =============================================================================
// Helper Functions
// =============================================================================

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn as_of() -> NaiveDate {
    date(2024, 6, 1)
}

fn config() -> AnalysisConfig {
    let mut config = AnalysisConfig::default();
    config.bootstrap.n_resamples = 2_000;
    config
}

fn token(id: &str, launch: NaiveDate, current: Option<f64>) -> TokenRecord {
    let mut t = TokenRecord::new(id, id.to_uppercase(), id);
    t.launch_date = Some(launch);
    t.launch_price = Some(1.0);
    t.current_price = current;
    t.ath = Some(50.0);
    t.market_cap_rank = Some(200);
    t.listing = ListingStatus::listed();
    t
}

/// 30 bull launches, 30 bear launches and three tokens that the filter and
/// imputation stages must handle.
fn dataset() -> Vec<TokenRecord> {
    let mut tokens = Vec::new();
    for i in 0..30u64 {
        let launch = date(2020, 5, 1) + Days::new(i * 13);
        let mut bull = token(&format!("bull-{i}"), launch, Some(20.0 + i as f64));
        bull.market_cap_rank = Some(20 + i as u32 * 10);
        tokens.push(bull);

        let launch = date(2022, 2, 1) + Days::new(i * 7);
        tokens.push(token(&format!("bear-{i}"), launch, Some(0.3 + 0.01 * i as f64)));
    }

    let mut stable = token("tether", date(2020, 6, 1), Some(1.0));
    stable.symbol = "USDT".to_string();
    tokens.push(stable);

    let mut wrapped = token("wrapped-thing", date(2020, 7, 1), Some(30_000.0));
    wrapped.categories = vec!["Wrapped-Tokens".to_string()];
    tokens.push(wrapped);

    let mut dead = token("dead", date(2020, 8, 1), None);
    dead.listing = ListingStatus::delisted_on(Some(date(2023, 3, 1)));
    tokens.push(dead);

    tokens
}

/// Rises 10/day from 2019-01-01 to 2021-11-01, falls until 2022-11-01, then
/// rises again through the as-of date.
fn reference() -> ReferenceSeries {
    let start = date(2019, 1, 1);
    let peak = date(2021, 11, 1);
    let trough = date(2022, 11, 1);
    let mut points = Vec::new();
    let mut price = 20_000.0;
    let mut d = start;
    while d <= as_of() {
        points.push((d, price));
        price += if d < peak || d >= trough { 10.0 } else { -10.0 };
        d = d + Days::new(1);
    }
    ReferenceSeries::new(points)
}

// =============================================================================
// Pipeline Tests
// =============================================================================

#[test]
fn full_pipeline_detects_bull_advantage() {
    let reference = reference();
    let pipeline = AnalysisPipeline::new(config()).unwrap();
    let report = pipeline.run(&dataset(), Some(&reference), as_of()).report;

    assert_eq!(report.transparency.excluded_stablecoin, 1);
    assert_eq!(report.transparency.excluded_wrapped, 1);
    assert_eq!(report.transparency.imputed_dead, 1);
    assert_eq!(report.total_tokens, 61);
    assert_eq!(report.tokens_by_cycle_type.get(&CycleType::Bull), Some(&31));
    assert_eq!(report.tokens_by_cycle_type.get(&CycleType::Bear), Some(&30));

    let primary = &report.primary_test;
    assert_eq!(primary.n1, 31);
    assert_eq!(primary.n2, 30);
    assert!(primary.significant);
    assert!(primary.p_value.unwrap() < 0.001);
    assert!(primary.effect_size.unwrap() > 0.9);
    assert!(primary.median_diff.unwrap() > 0.0);
    assert!(primary.ci_lower.unwrap() > 0.0);
    assert!(primary.ci_lower.unwrap() <= primary.ci_upper.unwrap());

    let relative = &report.reference_relative_test;
    assert_eq!(relative.n1, 30, "dead token has no reference-relative return");
    assert_eq!(relative.n2, 30);
    assert!(relative.significant);
}

#[test]
fn group_summaries_reflect_dataset() {
    let report = AnalysisPipeline::new(config())
        .unwrap()
        .run(&dataset(), None, as_of())
        .report;

    let bull = &report.groups[&CycleType::Bull];
    let bear = &report.groups[&CycleType::Bear];

    assert_eq!(bull.count, 31);
    assert!(bull.median_annualized_roi.unwrap() > bear.median_annualized_roi.unwrap());
    assert!((bull.delist_rate.unwrap() - 1.0 / 31.0).abs() < 1e-12);
    assert_eq!(bear.delist_rate, Some(0.0));
    assert_eq!(bear.fraction_top_tier, Some(0.0));
    assert!(bull.fraction_top_tier.unwrap() > 0.0);
    assert!(bull.median_drawdown.unwrap() >= 0.0);
}

#[test]
fn performer_lists_are_ordered() {
    let report = AnalysisPipeline::new(config())
        .unwrap()
        .run(&dataset(), None, as_of())
        .report;

    assert_eq!(report.best_performers.len(), 10);
    assert_eq!(report.worst_performers.len(), 10);
    assert_eq!(report.worst_performers[0].id, "dead");

    let best: Vec<f64> = report.best_performers.iter().filter_map(|p| p.annualized_roi).collect();
    assert!(best.windows(2).all(|w| w[0] >= w[1]));
    let worst: Vec<f64> = report.worst_performers.iter().filter_map(|p| p.annualized_roi).collect();
    assert!(worst.windows(2).all(|w| w[0] <= w[1]));
}

#[test]
fn zero_boundary_shift_equals_primary_test() {
    let report = AnalysisPipeline::new(config())
        .unwrap()
        .run(&dataset(), None, as_of())
        .report;

    let shifts: Vec<SweepParameter> = report.boundary_sensitivity.iter().map(|r| r.parameter).collect();
    assert_eq!(
        shifts,
        [-2, -1, 0, 1, 2].map(SweepParameter::ShiftMonths).to_vec()
    );

    let zero = report
        .boundary_sensitivity
        .iter()
        .find(|r| r.parameter == SweepParameter::ShiftMonths(0))
        .unwrap();
    assert_eq!(zero.test, report.primary_test);
}

#[test]
fn moving_average_robustness_agrees_with_cycle_table() {
    let reference = reference();
    let report = AnalysisPipeline::new(config())
        .unwrap()
        .run(&dataset(), Some(&reference), as_of())
        .report;

    assert_eq!(report.moving_average_robustness.len(), 4);
    for (result, window) in report.moving_average_robustness.iter().zip([50, 100, 200, 300]) {
        assert_eq!(result.parameter, SweepParameter::WindowDays(window));
        assert_eq!(result.test.n1, 31, "window {window}");
        assert_eq!(result.test.n2, 30, "window {window}");
        assert!(result.test.significant, "window {window}");
    }
}

#[test]
fn pipeline_is_deterministic() {
    let reference = reference();
    let pipeline = AnalysisPipeline::new(config()).unwrap();

    let first = pipeline.run(&dataset(), Some(&reference), as_of()).report;
    let second = pipeline.run(&dataset(), Some(&reference), as_of()).report;

    assert_eq!(first, second);
}

#[test]
fn report_json_has_only_finite_numbers() {
    let reference = reference();
    let report = AnalysisPipeline::new(config())
        .unwrap()
        .run(&dataset(), Some(&reference), as_of())
        .report;

    let json = serde_json::to_string(&report).unwrap();
    assert!(!json.contains("NaN"));
    assert!(!json.contains("inf"));

    let value: serde_json::Value = serde_json::from_str(&json).unwrap();
    let p = value["primary_test"]["p_value"].as_f64().unwrap();
    assert!((0.0..=1.0).contains(&p));
    assert!(value["groups"]["Bull"].is_object());
}
