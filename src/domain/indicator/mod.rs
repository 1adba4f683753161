//! Technical indicator series.
//!
//! Every series is aligned 1:1 with the bar series it was computed from.
//! Positions inside an indicator's warmup window carry `valid = false`;
//! reads go through [`IndicatorSeries::at`], which yields `None` there, so
//! rule code can never mistake an unwarmed value for a real zero.

pub mod rsi;
pub mod sma;

use crate::domain::bar::Bar;
use chrono::NaiveDate;
use std::collections::HashMap;
use std::fmt;

/// Indicator identity plus parameters; doubles as the lookup key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IndicatorKind {
    /// Simple moving average of close over n bars.
    Sma(usize),
    /// Simple moving average of volume over n bars.
    VolumeSma(usize),
    /// Wilder RSI over n bars of close-to-close changes.
    Rsi(usize),
}

impl fmt::Display for IndicatorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IndicatorKind::Sma(period) => write!(f, "MA{}", period),
            IndicatorKind::VolumeSma(period) => write!(f, "VOLMA{}", period),
            IndicatorKind::Rsi(period) => write!(f, "RSI{}", period),
        }
    }
}

#[derive(Debug, Clone)]
pub struct IndicatorPoint {
    pub date: NaiveDate,
    pub valid: bool,
    pub value: f64,
}

#[derive(Debug, Clone)]
pub struct IndicatorSeries {
    pub kind: IndicatorKind,
    pub values: Vec<IndicatorPoint>,
}

impl IndicatorSeries {
    /// Value at `index`, or `None` while the indicator is still warming up
    /// or the index is out of range.
    pub fn at(&self, index: usize) -> Option<f64> {
        let point = self.values.get(index)?;
        point.valid.then_some(point.value)
    }
}

pub fn compute(bars: &[Bar], kind: IndicatorKind) -> IndicatorSeries {
    match kind {
        IndicatorKind::Sma(period) => sma::close_sma(bars, period),
        IndicatorKind::VolumeSma(period) => sma::volume_sma(bars, period),
        IndicatorKind::Rsi(period) => rsi::rsi(bars, period),
    }
}

pub fn compute_all(
    bars: &[Bar],
    kinds: &[IndicatorKind],
) -> HashMap<IndicatorKind, IndicatorSeries> {
    kinds.iter().map(|&kind| (kind, compute(bars, kind))).collect()
}
