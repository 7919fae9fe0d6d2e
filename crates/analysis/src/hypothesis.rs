//! Two-sample comparison: Mann-Whitney U test, rank-biserial effect size and
//! a bootstrap confidence interval for the median difference.
//!
//! Only the non-parametric test is offered. Return distributions here are
//! heavy-tailed and bounded below at -100%, so no normality assumption is made.

use launch_cycle_core::stats::{cmp_f64, finite_values, median, two_sided_normal_p};
use launch_cycle_core::AnalysisConfig;
use serde::{Deserialize, Serialize};

use crate::bootstrap::BootstrapResampler;

/// Outcome of comparing two samples.
///
/// Statistic fields are `None` when either sample was below the minimum size.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TestResult {
    /// Two-sided Mann-Whitney p-value.
    pub p_value: Option<f64>,
    /// Rank-biserial correlation; positive means sample 1 tends higher.
    pub effect_size: Option<f64>,
    /// Mann-Whitney U for sample 1.
    pub u_statistic: Option<f64>,
    /// `median(sample 1) - median(sample 2)`.
    pub median_diff: Option<f64>,
    /// Bootstrap confidence bounds for `median_diff`.
    pub ci_lower: Option<f64>,
    pub ci_upper: Option<f64>,
    pub n1: usize,
    pub n2: usize,
    pub significant: bool,
}

impl TestResult {
    /// Result for samples too small to test.
    #[must_use]
    pub fn insufficient(n1: usize, n2: usize) -> Self {
        Self {
            p_value: None,
            effect_size: None,
            u_statistic: None,
            median_diff: None,
            ci_lower: None,
            ci_upper: None,
            n1,
            n2,
            significant: false,
        }
    }

    #[must_use]
    pub fn is_insufficient(&self) -> bool {
        self.p_value.is_none()
    }
}

/// Mann-Whitney U statistics under the normal approximation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MannWhitney {
    /// U for sample 1: pairs where sample 1 is higher, ties counting one half.
    pub u1: f64,
    /// U for sample 2, `n1 * n2 - u1`.
    pub u2: f64,
    /// Two-sided p-value in `[0, 1]`.
    pub p_value: f64,
}

/// Two-sided Mann-Whitney U test.
///
/// Ties receive average ranks. The normal approximation applies both the
/// tie correction to the variance and a 0.5 continuity correction. Returns
/// `None` if either sample is empty. Inputs must be finite.
#[must_use]
pub fn mann_whitney_u(a: &[f64], b: &[f64]) -> Option<MannWhitney> {
    let (n1, n2) = (a.len(), b.len());
    if n1 == 0 || n2 == 0 {
        return None;
    }

    // (value, from_first_sample)
    let mut pooled: Vec<(f64, bool)> = a
        .iter()
        .map(|&v| (v, true))
        .chain(b.iter().map(|&v| (v, false)))
        .collect();
    pooled.sort_by(|x, y| cmp_f64(&x.0, &y.0));

    let n = pooled.len();
    let mut rank_sum_a = 0.0;
    let mut tie_term = 0.0;
    let mut i = 0;
    while i < n {
        let mut j = i;
        while j + 1 < n && pooled[j + 1].0 == pooled[i].0 {
            j += 1;
        }
        // 1-based ranks i+1 ..= j+1 share their average.
        let avg_rank = (i + j) as f64 / 2.0 + 1.0;
        let in_a = pooled[i..=j].iter().filter(|(_, first)| *first).count();
        rank_sum_a += avg_rank * in_a as f64;

        let t = (j - i + 1) as f64;
        tie_term += t * t * t - t;
        i = j + 1;
    }

    let (n1f, n2f, nf) = (n1 as f64, n2 as f64, n as f64);
    let u1 = rank_sum_a - n1f * (n1f + 1.0) / 2.0;
    let u2 = n1f * n2f - u1;

    let all_tied = pooled[0].0 == pooled[n - 1].0;
    let variance = n1f * n2f / 12.0 * ((nf + 1.0) - tie_term / (nf * (nf - 1.0)));
    let p_value = if all_tied || variance <= 0.0 {
        1.0
    } else {
        let mean = n1f * n2f / 2.0;
        let z = (u1.max(u2) - mean - 0.5) / variance.sqrt();
        if z <= 0.0 {
            1.0
        } else {
            two_sided_normal_p(z)
        }
    };

    Some(MannWhitney { u1, u2, p_value })
}

/// Rank-biserial correlation from sample 1's U: `2 * u1 / (n1 * n2) - 1`.
///
/// Equivalent to `1 - 2U / (n1 * n2)` with U counting pairs where sample 1 is
/// lower. Ranges over `[-1, 1]`.
#[must_use]
pub fn rank_biserial(u1: f64, n1: usize, n2: usize) -> Option<f64> {
    let pairs = (n1 * n2) as f64;
    if pairs == 0.0 {
        return None;
    }
    Some(2.0 * u1 / pairs - 1.0)
}

/// Runs the full two-sample comparison with fixed settings.
#[derive(Debug, Clone)]
pub struct HypothesisTester {
    alpha: f64,
    min_sample_size: usize,
    bootstrap: BootstrapResampler,
}

impl HypothesisTester {
    #[must_use]
    pub fn new(alpha: f64, min_sample_size: usize, bootstrap: BootstrapResampler) -> Self {
        Self {
            alpha,
            min_sample_size,
            bootstrap,
        }
    }

    #[must_use]
    pub fn from_config(config: &AnalysisConfig) -> Self {
        Self::new(
            config.alpha,
            config.min_sample_size,
            BootstrapResampler::new(config.bootstrap.clone()),
        )
    }

    #[must_use]
    pub fn alpha(&self) -> f64 {
        self.alpha
    }

    /// Compares sample 1 against sample 2.
    ///
    /// Non-finite values are dropped first; the reported sizes are the
    /// finite counts. Below `min_sample_size` in either group the result is
    /// [`TestResult::insufficient`].
    #[must_use]
    pub fn compare(&self, sample1: &[f64], sample2: &[f64]) -> TestResult {
        let a = finite_values(sample1.iter().copied());
        let b = finite_values(sample2.iter().copied());
        let (n1, n2) = (a.len(), b.len());

        if n1 < self.min_sample_size || n2 < self.min_sample_size {
            tracing::warn!(
                n1,
                n2,
                min = self.min_sample_size,
                "insufficient data for comparison"
            );
            return TestResult::insufficient(n1, n2);
        }

        let Some(mw) = mann_whitney_u(&a, &b) else {
            return TestResult::insufficient(n1, n2);
        };
        let median_diff = match (median(&a), median(&b)) {
            (Some(ma), Some(mb)) => Some(ma - mb),
            _ => None,
        };
        let ci = self.bootstrap.median_difference(&a, &b);

        let result = TestResult {
            p_value: Some(mw.p_value),
            effect_size: rank_biserial(mw.u1, n1, n2),
            u_statistic: Some(mw.u1),
            median_diff,
            ci_lower: ci.as_ref().map(|c| c.ci_lower),
            ci_upper: ci.as_ref().map(|c| c.ci_upper),
            n1,
            n2,
            significant: mw.p_value < self.alpha,
        };

        tracing::debug!(
            n1,
            n2,
            p_value = mw.p_value,
            effect_size = ?result.effect_size,
            significant = result.significant,
            "mann-whitney comparison"
        );
        result
    }
}
