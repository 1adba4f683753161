//! Wilder RSI.
//!
//! Average gain/loss uses Wilder's smoothing:
//! - Seed: simple mean of gains/losses over the first n changes
//! - After: avg = (prev_avg * (n-1) + current) / n
//!
//! RSI = 100 - (100 / (1 + avg_gain / avg_loss)); 100 when avg_loss == 0.
//! Warmup: first n bars are invalid (n price changes feed the seed).

use crate::domain::bar::Bar;
use crate::domain::indicator::{IndicatorKind, IndicatorPoint, IndicatorSeries};

pub fn rsi(bars: &[Bar], period: usize) -> IndicatorSeries {
    let kind = IndicatorKind::Rsi(period);

    if period == 0 || bars.len() < period + 1 {
        let values = bars
            .iter()
            .map(|b| IndicatorPoint {
                date: b.date,
                valid: false,
                value: 0.0,
            })
            .collect();
        return IndicatorSeries { kind, values };
    }

    let mut values = Vec::with_capacity(bars.len());
    let mut avg_gain = 0.0;
    let mut avg_loss = 0.0;

    for (i, bar) in bars.iter().enumerate() {
        if i == 0 {
            values.push(IndicatorPoint {
                date: bar.date,
                valid: false,
                value: 0.0,
            });
            continue;
        }

        let change = bar.close - bars[i - 1].close;
        let gain = change.max(0.0);
        let loss = (-change).max(0.0);

        if i < period {
            // seed accumulation
            avg_gain += gain;
            avg_loss += loss;
            values.push(IndicatorPoint {
                date: bar.date,
                valid: false,
                value: 0.0,
            });
            continue;
        }

        if i == period {
            avg_gain = (avg_gain + gain) / period as f64;
            avg_loss = (avg_loss + loss) / period as f64;
        } else {
            avg_gain = (avg_gain * (period - 1) as f64 + gain) / period as f64;
            avg_loss = (avg_loss * (period - 1) as f64 + loss) / period as f64;
        }

        values.push(IndicatorPoint {
            date: bar.date,
            valid: true,
            value: rsi_value(avg_gain, avg_loss),
        });
    }

    IndicatorSeries { kind, values }
}

fn rsi_value(avg_gain: f64, avg_loss: f64) -> f64 {
    if avg_loss == 0.0 {
        100.0
    } else {
        100.0 - (100.0 / (1.0 + avg_gain / avg_loss))
    }
}
