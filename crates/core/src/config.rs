use serde::{Deserialize, Serialize};

use crate::cycle::{canonical_cycles, validate_cycles, MarketCycle};
use crate::error::AnalysisError;

/// Parameters of one analysis run.
///
/// Every field has a default, so a configuration file only needs to name
/// what it overrides.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Significance level for the Mann-Whitney test.
    pub alpha: f64,
    /// Minimum finite observations per group before a test is run.
    pub min_sample_size: usize,
    /// Length of the best/worst performer lists.
    pub top_n: usize,
    /// Market-cap rank at or below which a token counts as top tier.
    pub top_rank_tier: u32,
    /// Largest gap tolerated when looking up the reference price at launch.
    pub reference_max_gap_days: i64,
    /// Largest gap tolerated when looking up a moving-average regime.
    pub ma_max_gap_days: i64,
    pub bootstrap: BootstrapSettings,
    /// Boundary shifts for the sensitivity sweep, in calendar months.
    pub boundary_shifts_months: Vec<i32>,
    /// Moving-average windows for the robustness sweep, in days.
    pub ma_windows_days: Vec<usize>,
    pub exclusions: ExclusionSets,
    pub cycles: Vec<MarketCycle>,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            alpha: 0.05,
            min_sample_size: 20,
            top_n: 10,
            top_rank_tier: 100,
            reference_max_gap_days: 30,
            ma_max_gap_days: 7,
            bootstrap: BootstrapSettings::default(),
            boundary_shifts_months: vec![-2, -1, 0, 1, 2],
            ma_windows_days: vec![50, 100, 200, 300],
            exclusions: ExclusionSets::default(),
            cycles: canonical_cycles(),
        }
    }
}

impl AnalysisConfig {
    /// Checks the configuration for values the engine cannot work with.
    ///
    /// # Errors
    ///
    /// Returns `AnalysisError::InvalidConfig` or `AnalysisError::InvalidCycles`.
    pub fn validate(&self) -> Result<(), AnalysisError> {
        if !(self.alpha > 0.0 && self.alpha < 1.0) {
            return Err(AnalysisError::InvalidConfig(format!(
                "alpha must be in (0, 1), got {}",
                self.alpha
            )));
        }
        if self.min_sample_size == 0 {
            return Err(AnalysisError::InvalidConfig(
                "min_sample_size must be at least 1".to_string(),
            ));
        }
        if self.reference_max_gap_days < 0 || self.ma_max_gap_days < 0 {
            return Err(AnalysisError::InvalidConfig(
                "lookup gaps must not be negative".to_string(),
            ));
        }
        if let Some(window) = self.ma_windows_days.iter().find(|w| **w == 0) {
            return Err(AnalysisError::InvalidConfig(format!(
                "moving-average window must be positive, got {window}"
            )));
        }
        self.bootstrap.validate()?;
        validate_cycles(&self.cycles)
    }
}

/// Bootstrap resampling settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BootstrapSettings {
    pub n_resamples: usize,
    pub confidence_level: f64,
    pub seed: u64,
}

impl Default for BootstrapSettings {
    fn default() -> Self {
        Self {
            n_resamples: 10_000,
            confidence_level: 0.95,
            seed: 42,
        }
    }
}

impl BootstrapSettings {
    fn validate(&self) -> Result<(), AnalysisError> {
        if self.n_resamples == 0 {
            return Err(AnalysisError::InvalidConfig(
                "bootstrap.n_resamples must be at least 1".to_string(),
            ));
        }
        if !(self.confidence_level > 0.0 && self.confidence_level < 1.0) {
            return Err(AnalysisError::InvalidConfig(format!(
                "bootstrap.confidence_level must be in (0, 1), got {}",
                self.confidence_level
            )));
        }
        Ok(())
    }
}

/// Reference sets used to exclude stablecoins and wrapped assets.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExclusionSets {
    /// Lowercase symbols always treated as stablecoins.
    pub stablecoin_symbols: Vec<String>,
    /// Category substring marking a stablecoin.
    pub stablecoin_keyword: String,
    /// Category substring that cancels a stablecoin match (issuer governance tokens).
    pub stablecoin_excluded_keyword: String,
    /// Category substrings marking a wrapped, bridged or staked derivative.
    pub wrapped_keywords: Vec<String>,
}

impl Default for ExclusionSets {
    fn default() -> Self {
        let stablecoin_symbols = [
            "ust", "susd", "tusdb", "bgbp", "busd", "usdt", "usdc", "tusd", "dai", "fdusd",
            "usds", "usde", "usd1", "xusd", "rlusd", "gusd", "pax", "eurs",
        ];
        Self {
            stablecoin_symbols: stablecoin_symbols.iter().map(ToString::to_string).collect(),
            stablecoin_keyword: "stablecoin".to_string(),
            stablecoin_excluded_keyword: "issuer".to_string(),
            wrapped_keywords: vec![
                "wrapped".to_string(),
                "bridged".to_string(),
                "liquid staking".to_string(),
            ],
        }
    }
}
