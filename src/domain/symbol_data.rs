//! Per-symbol bundle of normalized bars plus computed indicator series.

use crate::domain::bar::{self, Bar};
use crate::domain::indicator::{self, IndicatorKind, IndicatorSeries};
use std::collections::HashMap;

#[derive(Debug, Clone)]
pub struct SymbolData {
    pub symbol: String,
    pub bars: Vec<Bar>,
    pub indicators: HashMap<IndicatorKind, IndicatorSeries>,
}

impl SymbolData {
    /// Normalize the raw bars and compute the requested indicator set.
    pub fn prepare(symbol: impl Into<String>, bars: Vec<Bar>, kinds: &[IndicatorKind]) -> Self {
        let bars = bar::normalize(bars);
        let indicators = indicator::compute_all(&bars, kinds);
        Self {
            symbol: symbol.into(),
            bars,
            indicators,
        }
    }

    pub fn bar_count(&self) -> usize {
        self.bars.len()
    }

    /// Index of the most recent bar, if any.
    pub fn last_index(&self) -> Option<usize> {
        self.bars.len().checked_sub(1)
    }

    /// Indicator value at `index`; `None` when the series was not computed
    /// or the point is still inside its warmup.
    pub fn value(&self, kind: IndicatorKind, index: usize) -> Option<f64> {
        self.indicators.get(&kind)?.at(index)
    }
}
