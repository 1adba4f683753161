//! Signal classifiers.
//!
//! Each classifier is an independent rule set over the most recent bar (and
//! its predecessor) of an indicator-annotated series. Missing history or an
//! unwarmed indicator skips the symbol; a skip is reported separately and
//! is never a no-match.

pub mod accumulation;
pub mod diagnostic;
pub mod potential;
pub mod strict;

use crate::domain::indicator::IndicatorKind;
use crate::domain::signal::Signal;
use crate::domain::symbol_data::SymbolData;
use crate::ports::data_port::Lookback;
use std::fmt;

/// RSI midline separating bearish from bullish territory.
pub const RSI_NEUTRAL: f64 = 50.0;

#[derive(Debug, Clone, PartialEq)]
pub enum Evaluation {
    Match(Signal),
    NoMatch,
    Skipped(SkipReason),
}

#[derive(Debug, Clone, PartialEq)]
pub enum SkipReason {
    InsufficientBars { bars: usize, minimum: usize },
    IndicatorWarmup,
    ZeroVolumeAverage,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::InsufficientBars { bars, minimum } => {
                write!(f, "only {} bars, minimum {} required", bars, minimum)
            }
            SkipReason::IndicatorWarmup => write!(f, "indicators still warming up"),
            SkipReason::ZeroVolumeAverage => write!(f, "average volume is zero"),
        }
    }
}

pub trait Classifier {
    /// Short name used in logs and report headers.
    fn name(&self) -> &'static str;

    /// Fewest bars the rule set can be evaluated on.
    fn min_bars(&self) -> usize;

    /// Lookback window to request from the data source.
    fn lookback(&self) -> Lookback;

    /// Indicator series the rule set reads.
    fn indicators(&self) -> Vec<IndicatorKind>;

    fn evaluate(&self, data: &SymbolData) -> Evaluation;

    /// Classifier-specific ordering of the final match list. Default keeps
    /// scan order.
    fn sort_matches(&self, _matches: &mut [Signal]) {}
}

/// Bail out with `InsufficientBars` when the series is too short.
pub(crate) fn require_bars(data: &SymbolData, minimum: usize) -> Result<(), SkipReason> {
    let bars = data.bar_count();
    if bars < minimum {
        return Err(SkipReason::InsufficientBars { bars, minimum });
    }
    Ok(())
}

/// Indicator value at `index`, or `IndicatorWarmup` when undefined.
pub(crate) fn required(
    data: &SymbolData,
    kind: IndicatorKind,
    index: usize,
) -> Result<f64, SkipReason> {
    data.value(kind, index).ok_or(SkipReason::IndicatorWarmup)
}
