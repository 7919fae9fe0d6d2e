//! Per-token return and risk metrics.
//!
//! Each metric is a pure function returning `None` where it is undefined.
//! Non-finite intermediate results are also mapped to `None` so NaN and
//! infinity never reach the aggregation stages.

use chrono::NaiveDate;
use launch_cycle_core::stats::finite;
use launch_cycle_core::{MarketCycle, TokenRecord};

use crate::classifier::classify;
use crate::reference::ReferenceSeries;

/// Minimum age (exclusive) at which CAGR is defined.
pub const CAGR_MIN_AGE_DAYS: i64 = 365;

/// Days per year used to annualise returns.
pub const DAYS_PER_YEAR: f64 = 365.0;

/// Simple return since launch: `(current - launch) / launch`.
///
/// A current price of zero is a valid total loss. The launch price must be
/// strictly positive.
#[must_use]
pub fn roi_since_launch(current_price: Option<f64>, launch_price: Option<f64>) -> Option<f64> {
    let current = current_price.filter(|p| p.is_finite())?;
    let launch = launch_price.filter(|p| p.is_finite() && *p > 0.0)?;
    finite((current - launch) / launch)
}

/// Compound annual growth rate: `(1 + roi)^(365 / age_days) - 1`.
///
/// Undefined for tokens no older than [`CAGR_MIN_AGE_DAYS`] and for
/// `roi <= -1`, where the fractional power has no real base.
#[must_use]
pub fn annualized_roi(roi: Option<f64>, age_days: Option<i64>) -> Option<f64> {
    let roi = roi.filter(|r| r.is_finite())?;
    let age = age_days.filter(|a| *a > CAGR_MIN_AGE_DAYS)?;
    let growth = 1.0 + roi;
    if growth <= 0.0 {
        return None;
    }
    finite(growth.powf(DAYS_PER_YEAR / age as f64) - 1.0)
}

/// Current decline from the all-time high, clamped at zero.
#[must_use]
pub fn drawdown_from_ath(current_price: Option<f64>, ath: Option<f64>) -> Option<f64> {
    let current = current_price.filter(|p| p.is_finite())?;
    let ath = ath.filter(|a| a.is_finite() && *a > 0.0)?;
    finite(((ath - current) / ath).max(0.0))
}

/// Geometric excess return over the reference asset:
/// `(1 + token_roi) / (1 + reference_roi) - 1`.
#[must_use]
pub fn roi_vs_reference(token_roi: Option<f64>, reference_roi: Option<f64>) -> Option<f64> {
    let token_roi = token_roi.filter(|r| r.is_finite())?;
    let reference_roi = reference_roi.filter(|r| r.is_finite())?;
    let reference_growth = 1.0 + reference_roi;
    if reference_growth <= 0.0 {
        return None;
    }
    finite((1.0 + token_roi) / reference_growth - 1.0)
}

/// Return of the reference asset from `launch_date` to its latest price.
#[must_use]
pub fn reference_roi_since(
    reference: &ReferenceSeries,
    launch_date: NaiveDate,
    max_gap_days: i64,
) -> Option<f64> {
    let current = reference.latest()?;
    let at_launch = reference.price_near(launch_date, max_gap_days)?;
    roi_since_launch(Some(current), Some(at_launch))
}

/// Settings for [`enrich_tokens`].
#[derive(Debug, Clone, Copy)]
pub struct EnrichContext<'a> {
    pub cycles: &'a [MarketCycle],
    pub reference: Option<&'a ReferenceSeries>,
    pub as_of: NaiveDate,
    pub reference_max_gap_days: i64,
}

/// Computes cycle assignment and every derived metric for one token.
#[must_use]
pub fn enrich_token(token: &TokenRecord, ctx: &EnrichContext<'_>) -> TokenRecord {
    let mut out = token.clone();

    let cycle = token.launch_date.and_then(|d| classify(d, ctx.cycles));
    out.cycle_name = cycle.map(|c| c.name.clone());
    out.cycle_type = cycle.map(|c| c.cycle_type);

    out.age_days = token.launch_date.map(|d| (ctx.as_of - d).num_days());
    out.roi_since_launch = roi_since_launch(token.current_price, token.launch_price);
    out.annualized_roi = annualized_roi(out.roi_since_launch, out.age_days);

    let reference_roi = match (ctx.reference, token.launch_date) {
        (Some(reference), Some(launch)) => {
            reference_roi_since(reference, launch, ctx.reference_max_gap_days)
        }
        _ => None,
    };
    out.roi_vs_reference = roi_vs_reference(out.roi_since_launch, reference_roi);
    out.drawdown_from_ath = drawdown_from_ath(token.current_price, token.ath);

    out
}

/// Enriches every token, returning a new collection in input order.
#[must_use]
pub fn enrich_tokens(tokens: &[TokenRecord], ctx: &EnrichContext<'_>) -> Vec<TokenRecord> {
    let enriched: Vec<TokenRecord> = tokens.iter().map(|t| enrich_token(t, ctx)).collect();
    tracing::debug!(
        tokens = enriched.len(),
        classified = enriched.iter().filter(|t| t.is_classified()).count(),
        with_roi = enriched.iter().filter(|t| t.roi_since_launch.is_some()).count(),
        "enriched tokens"
    );
    enriched
}
