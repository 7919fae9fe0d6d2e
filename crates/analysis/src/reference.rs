//! Daily price series of the reference asset (BTC).
//!
//! Used for two things: the reference-relative return of each token and the
//! moving-average regime classifier.

use chrono::{DateTime, NaiveDate};
use serde::{Deserialize, Serialize};

/// One daily observation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PricePoint {
    pub date: NaiveDate,
    pub price: f64,
}

/// A date-sorted price series with at most one point per day.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReferenceSeries {
    points: Vec<PricePoint>,
}

impl ReferenceSeries {
    /// Builds a series from `(date, price)` pairs in any order.
    ///
    /// Non-finite prices are dropped. When a date occurs more than once the
    /// last occurrence in input order wins.
    #[must_use]
    pub fn new<I>(points: I) -> Self
    where
        I: IntoIterator<Item = (NaiveDate, f64)>,
    {
        let mut points: Vec<PricePoint> = points
            .into_iter()
            .filter(|(_, price)| price.is_finite())
            .map(|(date, price)| PricePoint { date, price })
            .collect();
        // Stable sort keeps input order among equal dates.
        points.sort_by_key(|p| p.date);

        let mut deduped: Vec<PricePoint> = Vec::with_capacity(points.len());
        for point in points {
            match deduped.last_mut() {
                Some(last) if last.date == point.date => *last = point,
                _ => deduped.push(point),
            }
        }

        Self { points: deduped }
    }

    /// Builds a series from `[timestamp_ms, price]` pairs as returned by
    /// market-chart APIs. Timestamps are bucketed by UTC day.
    #[must_use]
    pub fn from_millis(pairs: &[(f64, f64)]) -> Self {
        Self::new(pairs.iter().filter_map(|&(ts_ms, price)| {
            if !ts_ms.is_finite() {
                return None;
            }
            DateTime::from_timestamp_millis(ts_ms as i64).map(|dt| (dt.date_naive(), price))
        }))
    }

    #[must_use]
    pub fn points(&self) -> &[PricePoint] {
        &self.points
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Most recent price.
    #[must_use]
    pub fn latest(&self) -> Option<f64> {
        self.points.last().map(|p| p.price)
    }

    /// Index of the point dated exactly `date`.
    #[must_use]
    pub fn index_of(&self, date: NaiveDate) -> Option<usize> {
        self.points.binary_search_by_key(&date, |p| p.date).ok()
    }

    /// Price on the date closest to `date`, if that date is at most
    /// `max_gap_days` away. Equidistant candidates resolve to the earlier one.
    #[must_use]
    pub fn price_near(&self, date: NaiveDate, max_gap_days: i64) -> Option<f64> {
        let idx = match self.points.binary_search_by_key(&date, |p| p.date) {
            Ok(i) => return Some(self.points[i].price),
            Err(i) => i,
        };

        let gap = |p: &PricePoint| (p.date - date).num_days().abs();
        let before = idx.checked_sub(1).map(|i| &self.points[i]);
        let after = self.points.get(idx);

        let best = match (before, after) {
            (Some(b), Some(a)) => {
                if gap(a) < gap(b) {
                    a
                } else {
                    b
                }
            }
            (Some(b), None) => b,
            (None, Some(a)) => a,
            (None, None) => return None,
        };

        (gap(best) <= max_gap_days).then_some(best.price)
    }

    /// Trailing simple moving average aligned with `points()`.
    ///
    /// Entry `i` is `None` until `window` observations are available. The
    /// series is walked once with a running window sum.
    #[must_use]
    pub fn trailing_sma(&self, window: usize) -> Vec<Option<f64>> {
        if window == 0 {
            return vec![None; self.points.len()];
        }

        let mut sma = Vec::with_capacity(self.points.len());
        let mut sum = 0.0;
        for (i, point) in self.points.iter().enumerate() {
            sum += point.price;
            if i >= window {
                sum -= self.points[i - window].price;
            }
            sma.push((i + 1 >= window).then(|| sum / window as f64));
        }
        sma
    }
}
