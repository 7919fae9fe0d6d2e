//! Market cycle classification of launch dates.
//!
//! Two classifiers are provided: the hand-curated cycle table (with a
//! boundary-shift transform for sensitivity analysis) and a moving-average
//! regime classifier over the reference asset used as a robustness check.

use chrono::{Days, Months, NaiveDate};
use launch_cycle_core::{CycleType, MarketCycle, TokenRecord};

use crate::reference::ReferenceSeries;

/// Returns the first cycle whose `[start, end)` interval contains `date`.
///
/// Intervals are assumed disjoint. If they overlap, list order decides.
#[must_use]
pub fn classify(date: NaiveDate, cycles: &[MarketCycle]) -> Option<&MarketCycle> {
    cycles.iter().find(|c| c.contains(date))
}

/// Re-assigns cycle name and type on a copy of every token.
///
/// Tokens without a launch date, or whose date matches no cycle, end up
/// unclassified.
#[must_use]
pub fn assign_cycles(tokens: &[TokenRecord], cycles: &[MarketCycle]) -> Vec<TokenRecord> {
    tokens
        .iter()
        .map(|token| {
            let mut out = token.clone();
            let cycle = token.launch_date.and_then(|d| classify(d, cycles));
            out.cycle_name = cycle.map(|c| c.name.clone());
            out.cycle_type = cycle.map(|c| c.cycle_type);
            out
        })
        .collect()
}

/// Moves a date by a signed number of calendar months.
///
/// Days past the end of the target month clamp to its last day.
#[must_use]
pub fn shift_date(date: NaiveDate, months: i32) -> NaiveDate {
    let shifted = if months >= 0 {
        date.checked_add_months(Months::new(months.unsigned_abs()))
    } else {
        date.checked_sub_months(Months::new(months.unsigned_abs()))
    };
    shifted.unwrap_or(date)
}

/// Returns a copy of `cycles` with every concrete boundary shifted by
/// `months`. Open boundaries stay open; names, types and order are kept.
#[must_use]
pub fn shift_cycles(cycles: &[MarketCycle], months: i32) -> Vec<MarketCycle> {
    cycles
        .iter()
        .map(|c| MarketCycle {
            name: c.name.clone(),
            start: c.start.map(|d| shift_date(d, months)),
            end: c.end.map(|d| shift_date(d, months)),
            cycle_type: c.cycle_type,
        })
        .collect()
}

/// Bull/bear classifier based on the reference price versus its trailing
/// simple moving average.
#[derive(Debug, Clone)]
pub struct MovingAverageClassifier<'a> {
    series: &'a ReferenceSeries,
    window: usize,
    max_gap_days: i64,
    sma: Vec<Option<f64>>,
}

impl<'a> MovingAverageClassifier<'a> {
    /// Creates a classifier for a window length in days.
    ///
    /// # Arguments
    /// * `series` - Daily reference prices
    /// * `window` - SMA window length
    /// * `max_gap_days` - How far to look for a neighbouring date when the
    ///   exact date has no SMA value
    #[must_use]
    pub fn new(series: &'a ReferenceSeries, window: usize, max_gap_days: i64) -> Self {
        Self {
            series,
            window,
            max_gap_days,
            sma: series.trailing_sma(window),
        }
    }

    #[must_use]
    pub fn window(&self) -> usize {
        self.window
    }

    /// Regime on an exact series date, if the SMA is defined there.
    fn regime_on(&self, date: NaiveDate) -> Option<CycleType> {
        let idx = self.series.index_of(date)?;
        let sma = self.sma.get(idx).copied().flatten()?;
        let price = self.series.points()[idx].price;
        Some(if price > sma {
            CycleType::Bull
        } else {
            CycleType::Bear
        })
    }

    /// Classifies `date` as Bull when the reference price exceeds its SMA,
    /// Bear otherwise.
    ///
    /// If the date itself has no SMA value the nearest date within
    /// `max_gap_days` is used, trying later before earlier at each distance.
    /// Dates before the first full window are unclassifiable.
    #[must_use]
    pub fn classify(&self, date: NaiveDate) -> Option<CycleType> {
        if let Some(regime) = self.regime_on(date) {
            return Some(regime);
        }

        for offset in 1..=self.max_gap_days.max(0) as u64 {
            let later = date.checked_add_days(Days::new(offset));
            let earlier = date.checked_sub_days(Days::new(offset));
            for candidate in [later, earlier].into_iter().flatten() {
                if let Some(regime) = self.regime_on(candidate) {
                    return Some(regime);
                }
            }
        }

        None
    }

    /// Re-assigns every token's regime from the moving average on a copy.
    #[must_use]
    pub fn assign(&self, tokens: &[TokenRecord]) -> Vec<TokenRecord> {
        tokens
            .iter()
            .map(|token| {
                let mut out = token.clone();
                let regime = token.launch_date.and_then(|d| self.classify(d));
                out.cycle_name = regime.map(|r| format!("SMA{} {}", self.window, r));
                out.cycle_type = regime;
                out
            })
            .collect()
    }
}
