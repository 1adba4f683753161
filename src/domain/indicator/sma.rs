//! Simple moving averages over close and volume.
//!
//! Trailing window of n bars inclusive of the current bar, O(n) sliding
//! window. Warmup: first (n-1) bars are invalid. Period 0 yields an
//! all-invalid series of the same length, keeping bar alignment.

use crate::domain::bar::Bar;
use crate::domain::indicator::{IndicatorKind, IndicatorPoint, IndicatorSeries};

pub fn close_sma(bars: &[Bar], period: usize) -> IndicatorSeries {
    windowed_mean(bars, period, IndicatorKind::Sma(period), |b| b.close)
}

pub fn volume_sma(bars: &[Bar], period: usize) -> IndicatorSeries {
    windowed_mean(bars, period, IndicatorKind::VolumeSma(period), |b| {
        b.volume as f64
    })
}

fn windowed_mean(
    bars: &[Bar],
    period: usize,
    kind: IndicatorKind,
    field: impl Fn(&Bar) -> f64,
) -> IndicatorSeries {
    if period == 0 {
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
    let mut window_sum: f64 = 0.0;

    for (i, bar) in bars.iter().enumerate() {
        window_sum += field(bar);
        if i >= period {
            window_sum -= field(&bars[i - period]);
        }

        let valid = i >= period - 1;
        values.push(IndicatorPoint {
            date: bar.date,
            valid,
            value: if valid { window_sum / period as f64 } else { 0.0 },
        });
    }

    IndicatorSeries { kind, values }
}
