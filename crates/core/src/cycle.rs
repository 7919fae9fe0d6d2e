//! Market cycle definitions.
//!
//! A cycle is a half-open interval `[start, end)` of calendar dates with a
//! regime tag. An absent `start` extends to the beginning of history and an
//! absent `end` extends through the present.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::AnalysisError;

/// Market regime of a cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum CycleType {
    Bull,
    Bear,
    Neutral,
    /// History before the first recognised cycle.
    Early,
}

impl CycleType {
    /// Returns the display label.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            CycleType::Bull => "Bull",
            CycleType::Bear => "Bear",
            CycleType::Neutral => "Neutral",
            CycleType::Early => "Early",
        }
    }
}

impl fmt::Display for CycleType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A named market cycle interval.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarketCycle {
    pub name: String,
    /// Inclusive start; `None` means open-ended into the past.
    pub start: Option<NaiveDate>,
    /// Exclusive end; `None` means open-ended through the present.
    pub end: Option<NaiveDate>,
    #[serde(rename = "type")]
    pub cycle_type: CycleType,
}

impl MarketCycle {
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        start: Option<NaiveDate>,
        end: Option<NaiveDate>,
        cycle_type: CycleType,
    ) -> Self {
        Self {
            name: name.into(),
            start,
            end,
            cycle_type,
        }
    }

    /// Returns true if `date` falls in `[start, end)`.
    #[must_use]
    pub fn contains(&self, date: NaiveDate) -> bool {
        let after_start = self.start.map_or(true, |start| date >= start);
        let before_end = self.end.map_or(true, |end| date < end);
        after_start && before_end
    }
}

fn ymd(year: i32, month: u32, day: u32) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(year, month, day)
}

/// The hand-curated crypto market cycle table.
#[must_use]
pub fn canonical_cycles() -> Vec<MarketCycle> {
    use CycleType::{Bear, Bull, Early, Neutral};

    vec![
        MarketCycle::new("Pre-2013 Early", None, ymd(2013, 1, 1), Early),
        MarketCycle::new("2013 Bull", ymd(2013, 1, 1), ymd(2013, 12, 1), Bull),
        MarketCycle::new("2014-2015 Bear", ymd(2013, 12, 1), ymd(2015, 8, 1), Bear),
        MarketCycle::new("2015-2016 Recovery", ymd(2015, 8, 1), ymd(2016, 1, 1), Neutral),
        MarketCycle::new("2016-2017 Bull", ymd(2016, 1, 1), ymd(2018, 1, 1), Bull),
        MarketCycle::new("2018-2019 Bear", ymd(2018, 1, 1), ymd(2018, 12, 1), Bear),
        MarketCycle::new("2019-2020 Recovery", ymd(2018, 12, 1), ymd(2020, 3, 1), Neutral),
        MarketCycle::new("2020-2021 Bull", ymd(2020, 3, 1), ymd(2021, 11, 1), Bull),
        MarketCycle::new("2022 Bear", ymd(2021, 11, 1), ymd(2022, 11, 1), Bear),
        MarketCycle::new("2023 Recovery", ymd(2022, 11, 1), ymd(2023, 10, 1), Neutral),
        MarketCycle::new("2023-2025 Bull", ymd(2023, 10, 1), ymd(2025, 11, 1), Bull),
        MarketCycle::new("2025-2026 Bear", ymd(2025, 11, 1), None, Bear),
    ]
}

/// Checks that a cycle table is sorted and non-overlapping.
///
/// Only the first cycle may have an open start and only the last an open end.
///
/// # Errors
///
/// Returns `AnalysisError::InvalidCycles` describing the first violation.
pub fn validate_cycles(cycles: &[MarketCycle]) -> Result<(), AnalysisError> {
    for (i, cycle) in cycles.iter().enumerate() {
        if let (Some(start), Some(end)) = (cycle.start, cycle.end) {
            if start >= end {
                return Err(AnalysisError::InvalidCycles(format!(
                    "cycle '{}' starts on or after its end ({start} >= {end})",
                    cycle.name
                )));
            }
        }
        if cycle.start.is_none() && i != 0 {
            return Err(AnalysisError::InvalidCycles(format!(
                "only the first cycle may have an open start, found '{}'",
                cycle.name
            )));
        }
        if cycle.end.is_none() && i + 1 != cycles.len() {
            return Err(AnalysisError::InvalidCycles(format!(
                "only the last cycle may have an open end, found '{}'",
                cycle.name
            )));
        }
    }

    for pair in cycles.windows(2) {
        let (prev, next) = (&pair[0], &pair[1]);
        // Both bounds are concrete here: open ends were rejected above.
        if let (Some(prev_end), Some(next_start)) = (prev.end, next.start) {
            if next_start < prev_end {
                return Err(AnalysisError::InvalidCycles(format!(
                    "cycles '{}' and '{}' overlap or are out of order",
                    prev.name, next.name
                )));
            }
        }
    }

    Ok(())
}
