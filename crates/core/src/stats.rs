//! Numeric helpers shared by the analysis stages.
//!
//! Every function here is total: empty or non-finite input produces `None`
//! rather than NaN, so nothing undefined leaks into reported results.

use statrs::function::erf::erfc;
use std::cmp::Ordering;

/// Keeps only finite values.
#[must_use]
pub fn finite_values<I>(values: I) -> Vec<f64>
where
    I: IntoIterator<Item = f64>,
{
    values.into_iter().filter(|v| v.is_finite()).collect()
}

/// Keeps the finite values of an iterator of optional values.
#[must_use]
pub fn present_finite<I>(values: I) -> Vec<f64>
where
    I: IntoIterator<Item = Option<f64>>,
{
    finite_values(values.into_iter().flatten())
}

/// Converts a non-finite value to `None`.
#[must_use]
pub fn finite(value: f64) -> Option<f64> {
    value.is_finite().then_some(value)
}

/// Total ordering for finite floats; NaN compares equal so sorting never panics.
#[must_use]
pub fn cmp_f64(a: &f64, b: &f64) -> Ordering {
    a.partial_cmp(b).unwrap_or(Ordering::Equal)
}

/// Median of the finite values in `values`.
///
/// Even-length sequences average the two middle values.
///
/// # Examples
/// ```
/// use launch_cycle_core::stats::median;
///
/// assert_eq!(median(&[1.0, 2.0, 3.0, 4.0]), Some(2.5));
/// assert_eq!(median(&[3.0, 1.0, 2.0]), Some(2.0));
/// assert_eq!(median(&[]), None);
/// ```
#[must_use]
pub fn median(values: &[f64]) -> Option<f64> {
    let mut buf = finite_values(values.iter().copied());
    median_in_place(&mut buf)
}

/// Median computed by partially reordering `buf`.
///
/// Callers must pass finite values only. Used on the bootstrap hot path where
/// the buffer is scratch space anyway.
#[must_use]
pub fn median_in_place(buf: &mut [f64]) -> Option<f64> {
    let n = buf.len();
    if n == 0 {
        return None;
    }

    let mid = n / 2;
    let (lower, upper_mid, _) = buf.select_nth_unstable_by(mid, cmp_f64);
    let upper_mid = *upper_mid;

    let value = if n % 2 == 1 {
        upper_mid
    } else {
        // The lower middle is the max of the left partition.
        let lower_mid = lower.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        (lower_mid + upper_mid) / 2.0
    };

    finite(value)
}

/// Percentile of an already sorted slice using linear interpolation between
/// closest ranks.
///
/// `q` is in `[0, 1]`. Returns `None` for an empty slice.
#[must_use]
pub fn percentile_sorted(sorted: &[f64], q: f64) -> Option<f64> {
    let n = sorted.len();
    if n == 0 || !q.is_finite() {
        return None;
    }
    if n == 1 {
        return finite(sorted[0]);
    }

    let q = q.clamp(0.0, 1.0);
    let pos = q * (n - 1) as f64;
    let lo = pos.floor() as usize;
    let hi = pos.ceil() as usize;
    let frac = pos - lo as f64;

    finite(sorted[lo] + (sorted[hi] - sorted[lo]) * frac)
}

/// Two-tailed p-value for a standard normal z-score.
///
/// Uses the complementary error function so tail probabilities stay accurate
/// far from zero.
#[must_use]
pub fn two_sided_normal_p(z: f64) -> f64 {
    if z.is_nan() {
        return 1.0;
    }
    let p = erfc(z.abs() / std::f64::consts::SQRT_2);
    p.clamp(0.0, 1.0)
}

/// Fraction `numerator / denominator`, absent for an empty denominator.
#[must_use]
pub fn ratio(numerator: usize, denominator: usize) -> Option<f64> {
    if denominator == 0 {
        None
    } else {
        Some(numerator as f64 / denominator as f64)
    }
}
