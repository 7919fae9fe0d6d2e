//! Percentile bootstrap for the difference of two medians.
//!
//! Each resample draws both groups with replacement, each to its own size,
//! from one seeded ChaCha stream (group 1 first, then group 2), so results
//! are reproducible for a given seed.
//!
//! # Example
//!
//! ```
//! use launch_cycle_analysis::bootstrap::BootstrapResampler;
//! use launch_cycle_core::BootstrapSettings;
//!
//! let resampler = BootstrapResampler::new(BootstrapSettings::default());
//! let result = resampler
//!     .median_difference(&[1.0, 2.0, 3.0], &[0.0, 0.5, 1.0])
//!     .unwrap();
//!
//! assert_eq!(result.point_estimate, 1.5);
//! assert!(result.ci_lower <= result.ci_upper);
//! ```

use launch_cycle_core::stats::{cmp_f64, finite_values, median, median_in_place, percentile_sorted};
use launch_cycle_core::BootstrapSettings;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

/// Result of a bootstrap confidence interval estimation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BootstrapResult {
    /// Statistic on the original samples.
    pub point_estimate: f64,
    pub ci_lower: f64,
    pub ci_upper: f64,
    /// Standard deviation of the bootstrap distribution.
    pub standard_error: f64,
}

impl BootstrapResult {
    #[must_use]
    pub fn ci_width(&self) -> f64 {
        self.ci_upper - self.ci_lower
    }

    /// Returns true if zero is outside the confidence interval.
    #[must_use]
    pub fn excludes_zero(&self) -> bool {
        self.ci_lower > 0.0 || self.ci_upper < 0.0
    }
}

/// Seeded two-sample bootstrap resampler.
#[derive(Debug, Clone)]
pub struct BootstrapResampler {
    settings: BootstrapSettings,
}

impl BootstrapResampler {
    #[must_use]
    pub fn new(settings: BootstrapSettings) -> Self {
        Self { settings }
    }

    #[must_use]
    pub fn settings(&self) -> &BootstrapSettings {
        &self.settings
    }

    /// Fills `out` with `out.len()` draws from `sample` with replacement.
    fn resample_into(sample: &[f64], out: &mut [f64], rng: &mut ChaCha8Rng) {
        let n = sample.len();
        for slot in out.iter_mut() {
            *slot = sample[rng.gen_range(0..n)];
        }
    }

    /// Bootstraps `median(a) - median(b)`.
    ///
    /// Non-finite values are dropped first. Returns `None` if either sample
    /// is empty afterwards.
    #[must_use]
    pub fn median_difference(&self, a: &[f64], b: &[f64]) -> Option<BootstrapResult> {
        let a = finite_values(a.iter().copied());
        let b = finite_values(b.iter().copied());
        let point_estimate = median(&a)? - median(&b)?;

        let mut rng = ChaCha8Rng::seed_from_u64(self.settings.seed);
        let mut buf_a = vec![0.0; a.len()];
        let mut buf_b = vec![0.0; b.len()];
        let mut distribution: Vec<f64> = Vec::with_capacity(self.settings.n_resamples);

        for _ in 0..self.settings.n_resamples {
            Self::resample_into(&a, &mut buf_a, &mut rng);
            Self::resample_into(&b, &mut buf_b, &mut rng);
            if let (Some(ma), Some(mb)) = (median_in_place(&mut buf_a), median_in_place(&mut buf_b)) {
                distribution.push(ma - mb);
            }
        }

        distribution.sort_by(cmp_f64);
        let (ci_lower, ci_upper) = percentile_ci(&distribution, self.settings.confidence_level)?;

        let n = distribution.len() as f64;
        let mean = distribution.iter().sum::<f64>() / n;
        let variance =
            distribution.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / (n - 1.0).max(1.0);

        Some(BootstrapResult {
            point_estimate,
            ci_lower,
            ci_upper,
            standard_error: variance.sqrt(),
        })
    }
}

/// Equal-tailed percentile interval of a sorted bootstrap distribution.
///
/// # Arguments
/// * `distribution` - Sorted bootstrap statistics
/// * `confidence_level` - Desired confidence level (e.g., 0.95)
#[must_use]
pub fn percentile_ci(distribution: &[f64], confidence_level: f64) -> Option<(f64, f64)> {
    let tail = (1.0 - confidence_level) / 2.0;
    let lower = percentile_sorted(distribution, tail)?;
    let upper = percentile_sorted(distribution, 1.0 - tail)?;
    Some((lower, upper))
}

#[cfg(test)]
mod tests {
    use super::*;

    // ============================================================
    // Test Helpers
    // ============================================================

    fn settings(n_resamples: usize, seed: u64) -> BootstrapSettings {
        BootstrapSettings {
            n_resamples,
            confidence_level: 0.95,
            seed,
        }
    }

    fn spread(center: f64, n: usize) -> Vec<f64> {
        (0..n).map(|i| center + (i as f64 - n as f64 / 2.0) * 0.01).collect()
    }

    // ============================================================
    // BootstrapResult Tests
    // ============================================================

    #[test]
    fn result_ci_width_calculated_correctly() {
        let result = BootstrapResult {
            point_estimate: 0.5,
            ci_lower: 0.4,
            ci_upper: 0.6,
            standard_error: 0.05,
        };
        assert!((result.ci_width() - 0.2).abs() < 1e-12);
    }

    #[test]
    fn result_excludes_zero() {
        let above = BootstrapResult {
            point_estimate: 0.1,
            ci_lower: 0.05,
            ci_upper: 0.15,
            standard_error: 0.02,
        };
        let straddling = BootstrapResult {
            ci_lower: -0.05,
            ..above.clone()
        };
        assert!(above.excludes_zero());
        assert!(!straddling.excludes_zero());
    }

    // ============================================================
    // median_difference Tests
    // ============================================================

    #[test]
    fn median_difference_is_deterministic_for_seed() {
        let a = spread(0.10, 25);
        let b = spread(-0.05, 30);

        let first = BootstrapResampler::new(settings(2_000, 42)).median_difference(&a, &b);
        let second = BootstrapResampler::new(settings(2_000, 42)).median_difference(&a, &b);

        assert_eq!(first, second);
    }

    #[test]
    fn median_difference_depends_on_seed() {
        let a: Vec<f64> = (0..40).map(|i| ((i * 37) % 23) as f64).collect();
        let b: Vec<f64> = (0..40).map(|i| ((i * 11) % 19) as f64).collect();

        let first = BootstrapResampler::new(settings(500, 1)).median_difference(&a, &b).unwrap();
        let second = BootstrapResampler::new(settings(500, 2)).median_difference(&a, &b).unwrap();

        assert_eq!(first.point_estimate, second.point_estimate);
        assert_ne!(first.standard_error, second.standard_error);
    }

    #[test]
    fn median_difference_separated_groups_excludes_zero() {
        let a = spread(0.10, 25);
        let b = spread(-0.05, 25);

        let result = BootstrapResampler::new(settings(2_000, 42))
            .median_difference(&a, &b)
            .unwrap();

        assert!((result.point_estimate - 0.15).abs() < 1e-9);
        assert!(result.ci_lower <= result.point_estimate);
        assert!(result.ci_upper >= result.point_estimate);
        assert!(result.excludes_zero());
    }

    #[test]
    fn median_difference_constant_samples_have_zero_width() {
        let result = BootstrapResampler::new(settings(200, 7))
            .median_difference(&[2.0; 10], &[0.5; 12])
            .unwrap();

        assert_eq!(result.point_estimate, 1.5);
        assert_eq!(result.ci_lower, 1.5);
        assert_eq!(result.ci_upper, 1.5);
        assert_eq!(result.standard_error, 0.0);
    }

    #[test]
    fn median_difference_empty_sample_is_none() {
        let resampler = BootstrapResampler::new(settings(100, 42));
        assert!(resampler.median_difference(&[], &[1.0]).is_none());
        assert!(resampler.median_difference(&[1.0], &[f64::NAN]).is_none());
    }

    #[test]
    fn median_difference_ignores_non_finite() {
        let resampler = BootstrapResampler::new(settings(100, 42));
        let result = resampler
            .median_difference(&[1.0, f64::INFINITY, 1.0], &[0.0, f64::NAN])
            .unwrap();
        assert_eq!(result.point_estimate, 1.0);
        assert!(result.ci_lower.is_finite() && result.ci_upper.is_finite());
    }

    // ============================================================
    // percentile_ci Tests
    // ============================================================

    #[test]
    fn percentile_ci_empty_is_none() {
        assert!(percentile_ci(&[], 0.95).is_none());
    }

    #[test]
    fn percentile_ci_single_value_returns_same() {
        assert_eq!(percentile_ci(&[0.3], 0.95), Some((0.3, 0.3)));
    }

    #[test]
    fn percentile_ci_extracts_interpolated_percentiles() {
        let distribution: Vec<f64> = (0..=1000).map(|i| f64::from(i) / 1000.0).collect();
        let (lower, upper) = percentile_ci(&distribution, 0.95).unwrap();

        assert!((lower - 0.025).abs() < 1e-9, "lower was {lower}");
        assert!((upper - 0.975).abs() < 1e-9, "upper was {upper}");
    }

    #[test]
    fn percentile_ci_90_percent_confidence() {
        let distribution: Vec<f64> = (0..=100).map(f64::from).collect();
        let (lower, upper) = percentile_ci(&distribution, 0.90).unwrap();

        assert!((lower - 5.0).abs() < 1e-9);
        assert!((upper - 95.0).abs() < 1e-9);
    }
}
