//! Accumulation classifier.
//!
//! Flags symbols trading above MA20 on unusually heavy volume: last volume
//! above `volume_spike` times its own 5-bar average. Matches are ordered by
//! volume ratio, heaviest first, so the report leads with the strongest
//! accumulation candidates.

use crate::domain::classifier::{self, Classifier, Evaluation, SkipReason};
use crate::domain::indicator::IndicatorKind;
use crate::domain::settings::Thresholds;
use crate::domain::signal::{Signal, SignalDetails};
use crate::domain::symbol_data::SymbolData;
use crate::ports::data_port::Lookback;
use std::cmp::Ordering;

pub struct AccumulationClassifier {
    thresholds: Thresholds,
}

impl AccumulationClassifier {
    pub const MIN_BARS: usize = 20;

    pub fn new(thresholds: Thresholds) -> Self {
        Self { thresholds }
    }

    fn try_evaluate(&self, data: &SymbolData) -> Result<Evaluation, SkipReason> {
        classifier::require_bars(data, Self::MIN_BARS)?;
        let last = data.bars.len() - 1;
        let bar = &data.bars[last];

        let ma20 = classifier::required(data, IndicatorKind::Sma(20), last)?;
        let vol_ma5 = classifier::required(data, IndicatorKind::VolumeSma(5), last)?;

        // a zero 5-bar average means no recent trading; the ratio is undefined
        if vol_ma5 <= 0.0 {
            return Err(SkipReason::ZeroVolumeAverage);
        }

        let volume_ratio = bar.volume as f64 / vol_ma5;
        if bar.close > ma20 && volume_ratio > self.thresholds.volume_spike {
            return Ok(Evaluation::Match(Signal {
                symbol: data.symbol.clone(),
                as_of: bar.date,
                price: bar.close,
                details: SignalDetails::Accumulation { volume_ratio, ma20 },
            }));
        }

        Ok(Evaluation::NoMatch)
    }
}

impl Classifier for AccumulationClassifier {
    fn name(&self) -> &'static str {
        "accumulation"
    }

    fn min_bars(&self) -> usize {
        Self::MIN_BARS
    }

    fn lookback(&self) -> Lookback {
        Lookback::months(3)
    }

    fn indicators(&self) -> Vec<IndicatorKind> {
        vec![IndicatorKind::Sma(20), IndicatorKind::VolumeSma(5)]
    }

    fn evaluate(&self, data: &SymbolData) -> Evaluation {
        self.try_evaluate(data).unwrap_or_else(Evaluation::Skipped)
    }

    fn sort_matches(&self, matches: &mut [Signal]) {
        // stable: equal ratios keep scan order
        matches.sort_by(|a, b| {
            let ra = a.volume_ratio().unwrap_or(0.0);
            let rb = b.volume_ratio().unwrap_or(0.0);
            rb.partial_cmp(&ra).unwrap_or(Ordering::Equal)
        });
    }
}
