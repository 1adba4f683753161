//! Strict MA crossover classifier: golden-cross BUY, death-cross SELL.
//!
//! BUY on the bar where MA5 closes above MA20 (prior bar at or below),
//! confirmed by a volume spike, a bullish candle and close above both
//! averages. SELL is the mirror image. BUY is checked first; the condition
//! sets are mutually exclusive because each requires the opposite MA order.

use crate::domain::classifier::{self, Classifier, Evaluation, SkipReason};
use crate::domain::indicator::IndicatorKind;
use crate::domain::settings::Thresholds;
use crate::domain::signal::{Signal, SignalDetails};
use crate::domain::symbol_data::SymbolData;
use crate::ports::data_port::Lookback;

pub struct StrictClassifier {
    thresholds: Thresholds,
}

/// Inputs to one crossover evaluation, all taken from the last bar pair.
#[derive(Debug, Clone, Copy)]
pub(crate) struct CrossoverInputs {
    pub open: f64,
    pub close: f64,
    pub volume: f64,
    pub ma5: f64,
    pub ma20: f64,
    pub prev_ma5: f64,
    pub prev_ma20: f64,
    pub vol_ma20: f64,
}

/// BUY and SELL condition sets side by side. Each requires the opposite
/// MA5/MA20 order, so at most one can hold for a given input.
pub(crate) fn crossover_conditions(c: &CrossoverInputs, volume_ratio: f64) -> (bool, bool) {
    let volume_spike = c.volume > c.vol_ma20 * volume_ratio;

    let buy = c.ma5 > c.ma20
        && c.prev_ma5 <= c.prev_ma20
        && volume_spike
        && c.close > c.open
        && c.close > c.ma5
        && c.close > c.ma20;

    let sell = c.ma5 < c.ma20
        && c.prev_ma5 >= c.prev_ma20
        && volume_spike
        && c.close < c.open
        && c.close < c.ma5
        && c.close < c.ma20;

    (buy, sell)
}

impl StrictClassifier {
    pub const MIN_BARS: usize = 21;

    pub fn new(thresholds: Thresholds) -> Self {
        Self { thresholds }
    }

    fn try_evaluate(&self, data: &SymbolData) -> Result<Evaluation, SkipReason> {
        classifier::require_bars(data, Self::MIN_BARS)?;
        let last = data.bars.len() - 1;
        let prev = last - 1;
        let bar = &data.bars[last];

        let inputs = CrossoverInputs {
            open: bar.open,
            close: bar.close,
            volume: bar.volume as f64,
            ma5: classifier::required(data, IndicatorKind::Sma(5), last)?,
            ma20: classifier::required(data, IndicatorKind::Sma(20), last)?,
            prev_ma5: classifier::required(data, IndicatorKind::Sma(5), prev)?,
            prev_ma20: classifier::required(data, IndicatorKind::Sma(20), prev)?,
            vol_ma20: classifier::required(data, IndicatorKind::VolumeSma(20), last)?,
        };

        let (buy, sell) = crossover_conditions(&inputs, self.thresholds.volume_ratio);

        if buy {
            return Ok(Evaluation::Match(Signal {
                symbol: data.symbol.clone(),
                as_of: bar.date,
                price: bar.close,
                details: SignalDetails::Buy {
                    volume_ratio: inputs.volume / inputs.vol_ma20,
                    ma5: inputs.ma5,
                    ma20: inputs.ma20,
                    entry: bar.close,
                    take_profit: bar.close * (1.0 + self.thresholds.take_profit_pct / 100.0),
                    stop_loss: bar.close * (1.0 - self.thresholds.stop_loss_pct / 100.0),
                },
            }));
        }

        if sell {
            return Ok(Evaluation::Match(Signal {
                symbol: data.symbol.clone(),
                as_of: bar.date,
                price: bar.close,
                details: SignalDetails::Sell {
                    volume_ratio: inputs.volume / inputs.vol_ma20,
                    ma5: inputs.ma5,
                    ma20: inputs.ma20,
                    resistance: inputs.ma20,
                },
            }));
        }

        Ok(Evaluation::NoMatch)
    }
}

impl Classifier for StrictClassifier {
    fn name(&self) -> &'static str {
        "strict crossover"
    }

    fn min_bars(&self) -> usize {
        Self::MIN_BARS
    }

    fn lookback(&self) -> Lookback {
        Lookback::months(3)
    }

    fn indicators(&self) -> Vec<IndicatorKind> {
        vec![
            IndicatorKind::Sma(5),
            IndicatorKind::Sma(20),
            IndicatorKind::VolumeSma(20),
        ]
    }

    fn evaluate(&self, data: &SymbolData) -> Evaluation {
        self.try_evaluate(data).unwrap_or_else(Evaluation::Skipped)
    }
}
