//! Token records as supplied by the collector, plus the fields the engine derives.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::cycle::CycleType;

/// Exchange listing status of a token.
///
/// Flattened into [`TokenRecord`], so the keys sit at the top level of a
/// token document. The collector's exchange-prefixed keys
/// (`binance_listed`, `binance_delisted`, `binance_delist_date`) are
/// accepted as aliases.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListingStatus {
    /// Token was listed on the exchange at some point.
    #[serde(default, alias = "binance_listed")]
    pub listed: bool,
    /// Token was later delisted.
    #[serde(default, alias = "binance_delisted")]
    pub delisted: bool,
    /// Earliest announced delist date.
    #[serde(default, alias = "binance_delist_date")]
    pub delist_date: Option<NaiveDate>,
}

impl ListingStatus {
    /// A token that is currently listed.
    #[must_use]
    pub fn listed() -> Self {
        Self {
            listed: true,
            delisted: false,
            delist_date: None,
        }
    }

    /// A token that was listed and then delisted on `date`.
    #[must_use]
    pub fn delisted_on(date: Option<NaiveDate>) -> Self {
        Self {
            listed: true,
            delisted: true,
            delist_date: date,
        }
    }
}

/// One cryptocurrency token.
///
/// The first block of fields is input data. The `cycle_*` and metric fields
/// are derived by the analysis engine and are `None` until enrichment runs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TokenRecord {
    pub id: String,
    pub symbol: String,
    pub name: String,
    #[serde(default)]
    pub current_price: Option<f64>,
    #[serde(default)]
    pub market_cap: Option<f64>,
    #[serde(default)]
    pub market_cap_rank: Option<u32>,
    #[serde(default)]
    pub ath: Option<f64>,
    #[serde(default)]
    pub atl: Option<f64>,

    // Launch info
    #[serde(default)]
    pub launch_date: Option<NaiveDate>,
    #[serde(default)]
    pub launch_price: Option<f64>,
    #[serde(default)]
    pub launch_market_cap: Option<f64>,
    #[serde(default)]
    pub total_supply: Option<f64>,
    /// Where the launch date came from (e.g. `genesis_date`, `first_price`).
    #[serde(default)]
    pub launch_source: Option<String>,

    // Category tags
    /// Simplified label assigned by the collector (e.g. `DeFi`, `Stablecoin`).
    #[serde(default)]
    pub category: Option<String>,
    /// Raw category tags from the data source.
    #[serde(default)]
    pub categories: Vec<String>,

    #[serde(flatten)]
    pub listing: ListingStatus,

    // Derived
    #[serde(default)]
    pub cycle_name: Option<String>,
    #[serde(default)]
    pub cycle_type: Option<CycleType>,
    #[serde(default)]
    pub age_days: Option<i64>,
    #[serde(default)]
    pub roi_since_launch: Option<f64>,
    #[serde(default)]
    pub annualized_roi: Option<f64>,
    #[serde(default)]
    pub roi_vs_reference: Option<f64>,
    #[serde(default)]
    pub drawdown_from_ath: Option<f64>,
}

impl TokenRecord {
    /// Creates a record with only identity fields set.
    #[must_use]
    pub fn new(id: impl Into<String>, symbol: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            symbol: symbol.into(),
            name: name.into(),
            current_price: None,
            market_cap: None,
            market_cap_rank: None,
            ath: None,
            atl: None,
            launch_date: None,
            launch_price: None,
            launch_market_cap: None,
            total_supply: None,
            launch_source: None,
            category: None,
            categories: Vec::new(),
            listing: ListingStatus::default(),
            cycle_name: None,
            cycle_type: None,
            age_days: None,
            roi_since_launch: None,
            annualized_roi: None,
            roi_vs_reference: None,
            drawdown_from_ath: None,
        }
    }

    /// Returns true if the token was delisted.
    #[must_use]
    pub fn is_delisted(&self) -> bool {
        self.listing.delisted
    }

    /// Returns true if the token has a cycle assignment.
    #[must_use]
    pub fn is_classified(&self) -> bool {
        self.cycle_type.is_some()
    }

    /// Listed-then-delisted token with no current price: treated as dead.
    /// A delisted flag without a listing does not count.
    #[must_use]
    pub fn is_dead(&self) -> bool {
        self.listing.listed && self.listing.delisted && self.current_price.is_none()
    }
}
