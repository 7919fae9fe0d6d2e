//! End-to-end analysis: enrichment, filtering, grouping, testing and the
//! robustness sweeps, composed into one report.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use launch_cycle_core::{AnalysisConfig, AnalysisError, CycleType, TokenRecord};
use serde::{Deserialize, Serialize};

use crate::filter::{prepare_tokens, TransparencyCounts};
use crate::hypothesis::{HypothesisTester, TestResult};
use crate::metrics::{enrich_tokens, EnrichContext};
use crate::reference::ReferenceSeries;
use crate::sensitivity::{bull_vs_bear, SensitivityResult, SensitivityRunner};
use crate::summary::{count_by_cycle_type, rank_performers, summarize_groups, GroupSummary, Metric, PerformerEntry};

/// Everything one analysis run produces.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisReport {
    pub as_of: NaiveDate,
    /// Tokens remaining after exclusions.
    pub total_tokens: usize,
    pub tokens_with_launch_date: usize,
    pub tokens_by_cycle_type: BTreeMap<CycleType, usize>,
    pub groups: BTreeMap<CycleType, GroupSummary>,
    /// Bull vs Bear on annualized ROI.
    pub primary_test: TestResult,
    /// Bull vs Bear on return relative to the reference asset.
    pub reference_relative_test: TestResult,
    pub best_performers: Vec<PerformerEntry>,
    pub worst_performers: Vec<PerformerEntry>,
    pub boundary_sensitivity: Vec<SensitivityResult>,
    /// Empty when no reference series was supplied.
    pub moving_average_robustness: Vec<SensitivityResult>,
    pub transparency: TransparencyCounts,
}

/// Output of [`AnalysisPipeline::run`].
#[derive(Debug, Clone)]
pub struct AnalysisRun {
    pub report: AnalysisReport,
    /// Enriched, filtered and imputed tokens the report was computed from.
    pub tokens: Vec<TokenRecord>,
}

/// Runs the whole study for one configuration.
#[derive(Debug, Clone)]
pub struct AnalysisPipeline {
    config: AnalysisConfig,
    tester: HypothesisTester,
}

impl AnalysisPipeline {
    /// Creates a pipeline after validating `config`.
    ///
    /// # Errors
    ///
    /// Returns the validation error if the configuration is unusable.
    pub fn new(config: AnalysisConfig) -> Result<Self, AnalysisError> {
        config.validate()?;
        let tester = HypothesisTester::from_config(&config);
        Ok(Self { config, tester })
    }

    #[must_use]
    pub fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    /// Runs every stage over `tokens`.
    ///
    /// `reference` enables the reference-relative metric and the
    /// moving-average sweep. `as_of` fixes the date token ages are measured to.
    #[must_use]
    pub fn run(
        &self,
        tokens: &[TokenRecord],
        reference: Option<&ReferenceSeries>,
        as_of: NaiveDate,
    ) -> AnalysisRun {
        let config = &self.config;
        tracing::info!(
            tokens = tokens.len(),
            reference_points = reference.map_or(0, ReferenceSeries::len),
            %as_of,
            "starting analysis"
        );

        let ctx = EnrichContext {
            cycles: &config.cycles,
            reference,
            as_of,
            reference_max_gap_days: config.reference_max_gap_days,
        };
        let enriched = enrich_tokens(tokens, &ctx);
        let prepared = prepare_tokens(&enriched, &config.exclusions);
        let analysed = &prepared.tokens;

        let primary_test = bull_vs_bear(&self.tester, analysed, Metric::AnnualizedRoi);
        let reference_relative_test = bull_vs_bear(&self.tester, analysed, Metric::RoiVsReference);
        let (best_performers, worst_performers) = rank_performers(analysed, config.top_n);

        let runner = SensitivityRunner::new(&self.tester, &config.exclusions);
        let boundary_sensitivity =
            runner.boundary_shift_sweep(&enriched, &config.cycles, &config.boundary_shifts_months);
        let moving_average_robustness = match reference {
            Some(series) => runner.moving_average_sweep(
                &enriched,
                series,
                &config.ma_windows_days,
                config.ma_max_gap_days,
            ),
            None => Vec::new(),
        };

        let report = AnalysisReport {
            as_of,
            total_tokens: analysed.len(),
            tokens_with_launch_date: analysed.iter().filter(|t| t.launch_date.is_some()).count(),
            tokens_by_cycle_type: count_by_cycle_type(analysed),
            groups: summarize_groups(analysed, config.top_rank_tier),
            primary_test,
            reference_relative_test,
            best_performers,
            worst_performers,
            boundary_sensitivity,
            moving_average_robustness,
            transparency: prepared.transparency,
        };

        tracing::info!(
            total = report.total_tokens,
            excluded_stablecoin = report.transparency.excluded_stablecoin,
            excluded_wrapped = report.transparency.excluded_wrapped,
            imputed_dead = report.transparency.imputed_dead,
            p_value = ?report.primary_test.p_value,
            "analysis complete"
        );

        AnalysisRun {
            report,
            tokens: prepared.tokens,
        }
    }
}

/// Validates `config` and runs the pipeline once.
///
/// # Errors
///
/// Returns an error if the configuration is invalid.
pub fn run_analysis(
    tokens: &[TokenRecord],
    reference: Option<&ReferenceSeries>,
    config: AnalysisConfig,
    as_of: NaiveDate,
) -> Result<AnalysisReport, AnalysisError> {
    let pipeline = AnalysisPipeline::new(config)?;
    Ok(pipeline.run(tokens, reference, as_of).report)
}
