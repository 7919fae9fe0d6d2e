//! Exclusion of stablecoins and wrapped assets, and loss imputation for dead
//! tokens.
//!
//! Both stages are pure: they take a collection and return a new one along
//! with counters that the report publishes for transparency.

use launch_cycle_core::{ExclusionSets, TokenRecord};
use serde::{Deserialize, Serialize};

use crate::metrics::CAGR_MIN_AGE_DAYS;

/// Value imputed for a token that lost everything.
pub const TOTAL_LOSS: f64 = -1.0;

/// Why a token is left out of the analysis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExclusionReason {
    /// Pegged asset; its return says nothing about launch timing.
    Stablecoin,
    /// Wrapped, bridged or liquid-staking derivative tracking another asset.
    Wrapped,
}

/// Classifies a token against the exclusion sets.
///
/// The stablecoin symbol list takes precedence over category tags, which
/// catches pegged assets the data source miscategorises.
#[must_use]
pub fn exclusion_reason(token: &TokenRecord, sets: &ExclusionSets) -> Option<ExclusionReason> {
    let symbol = token.symbol.to_lowercase();
    if sets.stablecoin_symbols.iter().any(|s| s.eq_ignore_ascii_case(&symbol)) {
        return Some(ExclusionReason::Stablecoin);
    }

    let label = token.category.as_deref().unwrap_or_default();
    let raw: Vec<String> = token.categories.iter().map(|c| c.to_lowercase()).collect();

    let stable_keyword = sets.stablecoin_keyword.to_lowercase();
    let issuer_keyword = sets.stablecoin_excluded_keyword.to_lowercase();
    let stable_tagged = raw.iter().any(|c| {
        !stable_keyword.is_empty()
            && c.contains(&stable_keyword)
            && (issuer_keyword.is_empty() || !c.contains(&issuer_keyword))
    });
    if label.eq_ignore_ascii_case("stablecoin") || stable_tagged {
        return Some(ExclusionReason::Stablecoin);
    }

    let wrapped_tagged = raw.iter().any(|c| {
        sets.wrapped_keywords
            .iter()
            .any(|k| !k.is_empty() && c.contains(&k.to_lowercase()))
    });
    if label.eq_ignore_ascii_case("wrapped") || wrapped_tagged {
        return Some(ExclusionReason::Wrapped);
    }

    None
}

/// Tokens kept by [`filter_tokens`] plus exclusion counts.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterOutcome {
    pub tokens: Vec<TokenRecord>,
    pub excluded_stablecoin: usize,
    pub excluded_wrapped: usize,
}

/// Drops stablecoins and wrapped assets, preserving input order.
#[must_use]
pub fn filter_tokens(tokens: &[TokenRecord], sets: &ExclusionSets) -> FilterOutcome {
    let mut outcome = FilterOutcome::default();
    for token in tokens {
        match exclusion_reason(token, sets) {
            Some(ExclusionReason::Stablecoin) => outcome.excluded_stablecoin += 1,
            Some(ExclusionReason::Wrapped) => outcome.excluded_wrapped += 1,
            None => outcome.tokens.push(token.clone()),
        }
    }

    tracing::debug!(
        kept = outcome.tokens.len(),
        stablecoin = outcome.excluded_stablecoin,
        wrapped = outcome.excluded_wrapped,
        "filtered tokens"
    );
    outcome
}

/// Tokens after [`impute_dead_tokens`] plus how many were imputed.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ImputationOutcome {
    pub tokens: Vec<TokenRecord>,
    pub imputed: usize,
}

/// Returns true if the token should receive a total-loss imputation.
#[must_use]
pub fn needs_imputation(token: &TokenRecord) -> bool {
    token.is_dead() && token.roi_since_launch.is_none()
}

/// Imputes a total loss for delisted tokens with no current price.
///
/// Such tokens would otherwise drop out of every statistic and bias group
/// medians upward. `roi_since_launch` becomes -1.0 and, for tokens older
/// than a year whose CAGR is absent, `annualized_roi` becomes -1.0 too.
/// Applying this twice changes nothing.
#[must_use]
pub fn impute_dead_tokens(tokens: Vec<TokenRecord>) -> ImputationOutcome {
    let mut imputed = 0;
    let tokens = tokens
        .into_iter()
        .map(|mut token| {
            if needs_imputation(&token) {
                token.roi_since_launch = Some(TOTAL_LOSS);
                let old_enough = token.age_days.is_some_and(|age| age > CAGR_MIN_AGE_DAYS);
                if old_enough && token.annualized_roi.is_none() {
                    token.annualized_roi = Some(TOTAL_LOSS);
                }
                imputed += 1;
            }
            token
        })
        .collect();

    tracing::debug!(imputed, "imputed dead tokens");
    ImputationOutcome { tokens, imputed }
}

/// Exclusion and imputation counts published with every report.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransparencyCounts {
    pub excluded_stablecoin: usize,
    pub excluded_wrapped: usize,
    pub imputed_dead: usize,
}

/// Tokens ready for aggregation.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PreparedTokens {
    pub tokens: Vec<TokenRecord>,
    pub transparency: TransparencyCounts,
}

/// Runs [`filter_tokens`] then [`impute_dead_tokens`].
#[must_use]
pub fn prepare_tokens(tokens: &[TokenRecord], sets: &ExclusionSets) -> PreparedTokens {
    let filtered = filter_tokens(tokens, sets);
    let imputed = impute_dead_tokens(filtered.tokens);
    PreparedTokens {
        tokens: imputed.tokens,
        transparency: TransparencyCounts {
            excluded_stablecoin: filtered.excluded_stablecoin,
            excluded_wrapped: filtered.excluded_wrapped,
            imputed_dead: imputed.imputed,
        },
    }
}
