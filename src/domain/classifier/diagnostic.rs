//! Deep single-symbol diagnostic.
//!
//! Unlike the scan classifiers this always produces a verdict: trend
//! position against three moving averages, RSI zone, relative volume and a
//! one-line advice. Advice comes from an ordered rule list evaluated top to
//! bottom, first match wins, `Hold` as the fallthrough.

use crate::domain::classifier::{self, SkipReason, RSI_NEUTRAL};
use crate::domain::indicator::IndicatorKind;
use crate::domain::settings::Thresholds;
use crate::domain::symbol_data::SymbolData;
use chrono::NaiveDate;
use std::fmt;

pub const MIN_BARS: usize = 51;

pub fn indicator_kinds() -> Vec<IndicatorKind> {
    vec![
        IndicatorKind::Sma(5),
        IndicatorKind::Sma(20),
        IndicatorKind::Sma(50),
        IndicatorKind::Rsi(14),
        IndicatorKind::VolumeSma(20),
    ]
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrendPosition {
    StrongUptrend,
    StrongDowntrend,
    Watch,
    Mixed,
}

impl fmt::Display for TrendPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TrendPosition::StrongUptrend => write!(f, "strong uptrend, price above MA5/MA20/MA50"),
            TrendPosition::StrongDowntrend => {
                write!(f, "strong downtrend, price below MA5/MA20/MA50")
            }
            TrendPosition::Watch => write!(f, "above MA20 but still below MA50, watch"),
            TrendPosition::Mixed => write!(f, "mixed, price between its averages"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RsiZone {
    Overbought,
    Oversold,
    Neutral,
}

impl fmt::Display for RsiZone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RsiZone::Overbought => write!(f, "overbought"),
            RsiZone::Oversold => write!(f, "oversold"),
            RsiZone::Neutral => write!(f, "neutral"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Advice {
    SpeculativeBuy,
    ConsiderSell,
    WatchForRebound,
    Hold,
}

impl fmt::Display for Advice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Advice::SpeculativeBuy => write!(f, "Speculative Buy"),
            Advice::ConsiderSell => write!(f, "Consider Sell"),
            Advice::WatchForRebound => write!(f, "Watch for Rebound"),
            Advice::Hold => write!(f, "Hold"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Diagnostic {
    pub symbol: String,
    pub as_of: NaiveDate,
    pub price: f64,
    /// Day-over-day close change in percent.
    pub change_pct: f64,
    pub ma5: f64,
    pub ma20: f64,
    pub ma50: f64,
    pub rsi: f64,
    /// Last volume against its 20-bar average; 0 when there is no volume.
    pub volume_ratio: f64,
    pub trend: TrendPosition,
    pub rsi_zone: RsiZone,
    pub advice: Advice,
}

struct AdviceContext {
    trend: TrendPosition,
    rsi: f64,
    volume_ratio: f64,
}

fn classify_trend(close: f64, ma5: f64, ma20: f64, ma50: f64) -> TrendPosition {
    if close > ma5 && close > ma20 && close > ma50 {
        TrendPosition::StrongUptrend
    } else if close < ma5 && close < ma20 && close < ma50 {
        TrendPosition::StrongDowntrend
    } else if close > ma20 && close < ma50 {
        TrendPosition::Watch
    } else {
        TrendPosition::Mixed
    }
}

fn classify_rsi(rsi: f64, thresholds: &Thresholds) -> RsiZone {
    if rsi > thresholds.rsi_overbought {
        RsiZone::Overbought
    } else if rsi < thresholds.rsi_oversold {
        RsiZone::Oversold
    } else {
        RsiZone::Neutral
    }
}

fn advise(ctx: &AdviceContext, thresholds: &Thresholds) -> Advice {
    // ordered rules, first match wins
    let rules: &[(&dyn Fn(&AdviceContext) -> bool, Advice)] = &[
        (
            &|c: &AdviceContext| {
                c.trend == TrendPosition::StrongUptrend
                    && c.rsi > RSI_NEUTRAL
                    && c.rsi < thresholds.rsi_overbought
                    && c.volume_ratio > 1.0
            },
            Advice::SpeculativeBuy,
        ),
        (
            &|c: &AdviceContext| {
                c.trend == TrendPosition::StrongDowntrend && c.rsi < RSI_NEUTRAL
            },
            Advice::ConsiderSell,
        ),
        (
            &|c: &AdviceContext| c.rsi < thresholds.rsi_oversold,
            Advice::WatchForRebound,
        ),
    ];

    rules
        .iter()
        .find(|(predicate, _)| predicate(ctx))
        .map(|(_, advice)| *advice)
        .unwrap_or(Advice::Hold)
}

pub fn analyze(data: &SymbolData, thresholds: &Thresholds) -> Result<Diagnostic, SkipReason> {
    classifier::require_bars(data, MIN_BARS)?;
    let last = data.bars.len() - 1;
    let prev = last - 1;
    let bar = &data.bars[last];

    let ma5 = classifier::required(data, IndicatorKind::Sma(5), last)?;
    let ma20 = classifier::required(data, IndicatorKind::Sma(20), last)?;
    let ma50 = classifier::required(data, IndicatorKind::Sma(50), last)?;
    let rsi = classifier::required(data, IndicatorKind::Rsi(14), last)?;
    let vol_ma20 = classifier::required(data, IndicatorKind::VolumeSma(20), last)?;

    let prev_close = data.bars[prev].close;
    let change_pct = (bar.close - prev_close) / prev_close * 100.0;
    let volume_ratio = if vol_ma20 > 0.0 {
        bar.volume as f64 / vol_ma20
    } else {
        0.0
    };

    let trend = classify_trend(bar.close, ma5, ma20, ma50);
    let rsi_zone = classify_rsi(rsi, thresholds);
    let advice = advise(
        &AdviceContext {
            trend,
            rsi,
            volume_ratio,
        },
        thresholds,
    );

    Ok(Diagnostic {
        symbol: data.symbol.clone(),
        as_of: bar.date,
        price: bar.close,
        change_pct,
        ma5,
        ma20,
        ma50,
        rsi,
        volume_ratio,
        trend,
        rsi_zone,
        advice,
    })
}
