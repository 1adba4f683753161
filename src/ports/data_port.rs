//! Market data access port trait.
//!
//! Returns end-of-day (or end-of-week) bars for a single symbol over a
//! trailing window, oldest first. Adapters own transport concerns; a fetch
//! that fails or finds nothing surfaces as `DataUnavailable` for that symbol
//! only. Callers must tolerate short or empty series.

use crate::domain::bar::Bar;
use crate::domain::error::SahambotError;
use std::fmt;

/// Bar granularity requested from the data source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BarInterval {
    Daily,
    Weekly,
}

impl BarInterval {
    /// Interval tag as used in data file names and provider APIs.
    pub fn tag(&self) -> &'static str {
        match self {
            BarInterval::Daily => "1d",
            BarInterval::Weekly => "1wk",
        }
    }
}

impl fmt::Display for BarInterval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.tag())
    }
}

/// Trailing lookback window in whole months, anchored at the newest bar the
/// source has for the symbol.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Lookback {
    pub months: u32,
}

impl Lookback {
    pub const fn months(months: u32) -> Self {
        Self { months }
    }
}

pub trait MarketDataPort {
    fn fetch_bars(
        &self,
        symbol: &str,
        lookback: Lookback,
        interval: BarInterval,
    ) -> Result<Vec<Bar>, SahambotError>;
}
