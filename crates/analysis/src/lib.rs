pub mod bootstrap;
pub mod classifier;
pub mod filter;
pub mod hypothesis;
pub mod metrics;
pub mod pipeline;
pub mod reference;
pub mod sensitivity;
pub mod summary;

pub use bootstrap::{BootstrapResampler, BootstrapResult};
pub use classifier::{assign_cycles, classify, shift_cycles, MovingAverageClassifier};
pub use filter::{
    exclusion_reason, filter_tokens, impute_dead_tokens, prepare_tokens, ExclusionReason,
    FilterOutcome, ImputationOutcome, PreparedTokens, TransparencyCounts,
};
pub use hypothesis::{mann_whitney_u, rank_biserial, HypothesisTester, MannWhitney, TestResult};
pub use metrics::{
    annualized_roi, drawdown_from_ath, enrich_token, enrich_tokens, roi_since_launch,
    roi_vs_reference, EnrichContext,
};
pub use pipeline::{run_analysis, AnalysisPipeline, AnalysisReport, AnalysisRun};
pub use reference::{PricePoint, ReferenceSeries};
pub use sensitivity::{bull_vs_bear, SensitivityResult, SensitivityRunner, SweepParameter};
pub use summary::{
    cycle_values, group_by_cycle_type, rank_performers, summarize_groups, GroupSummary, Metric,
    PerformerEntry,
};
