//! Potential uptrend classifier.
//!
//! Fires on the bar where close crosses above MA20 (prior close at or
//! below the prior MA20) while RSI14 sits strictly between the neutral
//! midline and the overbought threshold and MA5 is rising. A softer early
//! signal than the strict golden cross; no volume confirmation.

use crate::domain::classifier::{self, Classifier, Evaluation, SkipReason, RSI_NEUTRAL};
use crate::domain::indicator::IndicatorKind;
use crate::domain::settings::Thresholds;
use crate::domain::signal::{Signal, SignalDetails};
use crate::domain::symbol_data::SymbolData;
use crate::ports::data_port::Lookback;

pub struct PotentialClassifier {
    thresholds: Thresholds,
}

impl PotentialClassifier {
    pub const MIN_BARS: usize = 21;

    pub fn new(thresholds: Thresholds) -> Self {
        Self { thresholds }
    }

    fn try_evaluate(&self, data: &SymbolData) -> Result<Evaluation, SkipReason> {
        classifier::require_bars(data, Self::MIN_BARS)?;
        let last = data.bars.len() - 1;
        let prev = last - 1;

        let close = data.bars[last].close;
        let prev_close = data.bars[prev].close;
        let ma5 = classifier::required(data, IndicatorKind::Sma(5), last)?;
        let prev_ma5 = classifier::required(data, IndicatorKind::Sma(5), prev)?;
        let ma20 = classifier::required(data, IndicatorKind::Sma(20), last)?;
        let prev_ma20 = classifier::required(data, IndicatorKind::Sma(20), prev)?;
        let rsi = classifier::required(data, IndicatorKind::Rsi(14), last)?;

        let crossed_ma20 = close > ma20 && prev_close <= prev_ma20;
        let rsi_in_band = rsi > RSI_NEUTRAL && rsi < self.thresholds.rsi_overbought;
        let ma5_rising = ma5 > prev_ma5;

        if crossed_ma20 && rsi_in_band && ma5_rising {
            let rationale = format!(
                "close crossed above MA20 with RSI {:.1} and a rising MA5",
                rsi
            );
            return Ok(Evaluation::Match(Signal {
                symbol: data.symbol.clone(),
                as_of: data.bars[last].date,
                price: close,
                details: SignalDetails::Potential {
                    rsi,
                    ma5,
                    ma20,
                    rationale,
                },
            }));
        }

        Ok(Evaluation::NoMatch)
    }
}

impl Classifier for PotentialClassifier {
    fn name(&self) -> &'static str {
        "potential uptrend"
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
            IndicatorKind::Rsi(14),
        ]
    }

    fn evaluate(&self, data: &SymbolData) -> Evaluation {
        self.try_evaluate(data).unwrap_or_else(Evaluation::Skipped)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::bar::Bar;
    use crate::domain::signal::SignalKind;
    use chrono::NaiveDate;

    fn make_bars(closes: &[f64]) -> Vec<Bar> {
        closes
            .iter()
            .enumerate()
            .map(|(i, &close)| Bar {
                symbol: "BRPT".into(),
                date: NaiveDate::from_ymd_opt(2025, 6, 1)
                    .unwrap()
                    .checked_add_days(chrono::Days::new(i as u64))
                    .unwrap(),
                open: close,
                high: close,
                low: close,
                close,
                volume: 1_000,
            })
            .collect()
    }

    /// 100/102 oscillation, a soft 100.4 bar, then a 103 breakout. The
    /// breakout bar closes above MA20 (prior close below), RSI14 lands in
    /// the mid 50s and MA5 turns up.
    fn breakout_closes() -> Vec<f64> {
        let mut closes: Vec<f64> = (0..19)
            .map(|i| if i % 2 == 0 { 100.0 } else { 102.0 })
            .collect();
        closes.push(100.4);
        closes.push(103.0);
        closes
    }

    fn evaluate(closes: &[f64]) -> Evaluation {
        let classifier = PotentialClassifier::new(Thresholds::default());
        let data = SymbolData::prepare("BRPT", make_bars(closes), &classifier.indicators());
        classifier.evaluate(&data)
    }

    #[test]
    fn breakout_with_mid_band_rsi_matches() {
        let result = evaluate(&breakout_closes());
        let Evaluation::Match(signal) = result else {
            panic!("expected a match, got {:?}", result);
        };
        assert_eq!(signal.kind(), SignalKind::Potential);
        assert_eq!(signal.price, 103.0);

        let SignalDetails::Potential { rsi, rationale, .. } = signal.details else {
            panic!("expected potential details");
        };
        assert!(rsi > 50.0 && rsi < 70.0, "RSI {} outside band", rsi);
        assert!(rationale.contains("MA20"));
    }

    #[test]
    fn flat_series_no_match() {
        // no cross, and RSI sits at 100 which is not strictly below 70
        let closes = vec![100.0; 21];
        assert_eq!(evaluate(&closes), Evaluation::NoMatch);
    }

    #[test]
    fn no_cross_no_match() {
        // same oscillation but the last bar stays below the 20-bar mean
        let mut closes = breakout_closes();
        closes[20] = 100.2;
        assert_eq!(evaluate(&closes), Evaluation::NoMatch);
    }

    #[test]
    fn already_above_ma20_no_match() {
        // prior close sits above the prior MA20, so there is no fresh cross
        let mut closes = breakout_closes();
        closes[19] = 103.0;
        closes[20] = 104.0;
        assert_eq!(evaluate(&closes), Evaluation::NoMatch);
    }

    #[test]
    fn short_series_is_skipped() {
        let closes = vec![100.0; 20];
        assert_eq!(
            evaluate(&closes),
            Evaluation::Skipped(SkipReason::InsufficientBars {
                bars: 20,
                minimum: 21
            })
        );
    }
}
