//! Group-level statistics per cycle type and performer rankings.

use std::collections::BTreeMap;

use launch_cycle_core::stats::{cmp_f64, median, present_finite, ratio};
use launch_cycle_core::{CycleType, TokenRecord};
use serde::{Deserialize, Serialize};

/// Per-token metric selectable for grouping and testing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Metric {
    RoiSinceLaunch,
    AnnualizedRoi,
    RoiVsReference,
    DrawdownFromAth,
}

impl Metric {
    #[must_use]
    pub fn value(self, token: &TokenRecord) -> Option<f64> {
        match self {
            Metric::RoiSinceLaunch => token.roi_since_launch,
            Metric::AnnualizedRoi => token.annualized_roi,
            Metric::RoiVsReference => token.roi_vs_reference,
            Metric::DrawdownFromAth => token.drawdown_from_ath,
        }
    }
}

/// Aggregates for the tokens launched in one cycle type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupSummary {
    pub count: usize,
    pub median_roi: Option<f64>,
    pub median_annualized_roi: Option<f64>,
    pub median_roi_vs_reference: Option<f64>,
    pub median_drawdown: Option<f64>,
    /// Share of ranked tokens currently inside the top market-cap tier.
    pub fraction_top_tier: Option<f64>,
    pub delist_rate: Option<f64>,
}

/// Buckets classified tokens by cycle type. Unclassified tokens are skipped.
#[must_use]
pub fn group_by_cycle_type(tokens: &[TokenRecord]) -> BTreeMap<CycleType, Vec<&TokenRecord>> {
    let mut groups: BTreeMap<CycleType, Vec<&TokenRecord>> = BTreeMap::new();
    for token in tokens {
        if let Some(cycle_type) = token.cycle_type {
            groups.entry(cycle_type).or_default().push(token);
        }
    }
    groups
}

/// Finite values of `metric` among tokens of one cycle type.
#[must_use]
pub fn cycle_values(tokens: &[TokenRecord], cycle_type: CycleType, metric: Metric) -> Vec<f64> {
    present_finite(
        tokens
            .iter()
            .filter(|t| t.cycle_type == Some(cycle_type))
            .map(|t| metric.value(t)),
    )
}

fn group_median(group: &[&TokenRecord], metric: Metric) -> Option<f64> {
    median(&present_finite(group.iter().map(|t| metric.value(t))))
}

/// Summarises one group.
///
/// # Arguments
/// * `group` - Tokens sharing a cycle type
/// * `top_rank_tier` - Rank at or below which a token counts as top tier
#[must_use]
pub fn summarize_group(group: &[&TokenRecord], top_rank_tier: u32) -> GroupSummary {
    let ranks: Vec<u32> = group.iter().filter_map(|t| t.market_cap_rank).collect();
    let in_tier = ranks.iter().filter(|r| **r <= top_rank_tier).count();
    let delisted = group.iter().filter(|t| t.is_delisted()).count();

    GroupSummary {
        count: group.len(),
        median_roi: group_median(group, Metric::RoiSinceLaunch),
        median_annualized_roi: group_median(group, Metric::AnnualizedRoi),
        median_roi_vs_reference: group_median(group, Metric::RoiVsReference),
        median_drawdown: group_median(group, Metric::DrawdownFromAth),
        fraction_top_tier: ratio(in_tier, ranks.len()),
        delist_rate: ratio(delisted, group.len()),
    }
}

/// Summaries for every cycle type present among classified tokens.
#[must_use]
pub fn summarize_groups(
    tokens: &[TokenRecord],
    top_rank_tier: u32,
) -> BTreeMap<CycleType, GroupSummary> {
    group_by_cycle_type(tokens)
        .into_iter()
        .map(|(cycle_type, group)| (cycle_type, summarize_group(&group, top_rank_tier)))
        .collect()
}

/// Token count per cycle type.
#[must_use]
pub fn count_by_cycle_type(tokens: &[TokenRecord]) -> BTreeMap<CycleType, usize> {
    group_by_cycle_type(tokens)
        .into_iter()
        .map(|(cycle_type, group)| (cycle_type, group.len()))
        .collect()
}

/// Compact view of a token for the best/worst performer lists.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PerformerEntry {
    pub id: String,
    pub symbol: String,
    pub name: String,
    pub cycle_type: Option<CycleType>,
    pub cycle_name: Option<String>,
    pub annualized_roi: Option<f64>,
    pub roi_since_launch: Option<f64>,
    pub roi_vs_reference: Option<f64>,
    pub market_cap_rank: Option<u32>,
    pub delisted: bool,
}

impl From<&TokenRecord> for PerformerEntry {
    fn from(token: &TokenRecord) -> Self {
        Self {
            id: token.id.clone(),
            symbol: token.symbol.clone(),
            name: token.name.clone(),
            cycle_type: token.cycle_type,
            cycle_name: token.cycle_name.clone(),
            annualized_roi: token.annualized_roi,
            roi_since_launch: token.roi_since_launch,
            roi_vs_reference: token.roi_vs_reference,
            market_cap_rank: token.market_cap_rank,
            delisted: token.is_delisted(),
        }
    }
}

/// Best and worst `n` tokens by annualized ROI.
///
/// Tokens without a finite annualized ROI are left out. Best is sorted
/// descending and worst ascending; both sorts are stable, so tied tokens
/// keep their input order.
#[must_use]
pub fn rank_performers(
    tokens: &[TokenRecord],
    n: usize,
) -> (Vec<PerformerEntry>, Vec<PerformerEntry>) {
    let mut ranked: Vec<(f64, &TokenRecord)> = tokens
        .iter()
        .filter_map(|t| t.annualized_roi.filter(|v| v.is_finite()).map(|v| (v, t)))
        .collect();

    ranked.sort_by(|a, b| cmp_f64(&b.0, &a.0));
    let best = ranked.iter().take(n).map(|(_, t)| PerformerEntry::from(*t)).collect();

    ranked.sort_by(|a, b| cmp_f64(&a.0, &b.0));
    let worst = ranked.iter().take(n).map(|(_, t)| PerformerEntry::from(*t)).collect();

    (best, worst)
}
