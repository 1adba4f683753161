//! Universe scan loop.
//!
//! Walks the configured symbol list in order, fetches bars for each symbol
//! independently and evaluates the chosen classifier. One symbol's failure
//! never aborts the scan: every symbol lands in exactly one outcome bucket
//! (match, no-match, skipped or failed) and the report carries the counts.

use crate::domain::classifier::{diagnostic, Classifier, Evaluation, SkipReason};
use crate::domain::classifier::diagnostic::Diagnostic;
use crate::domain::error::SahambotError;
use crate::domain::settings::{Settings, Thresholds};
use crate::domain::signal::{Signal, SignalKind};
use crate::domain::symbol_data::SymbolData;
use crate::ports::data_port::{BarInterval, Lookback, MarketDataPort};
use chrono::NaiveDate;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct SkippedSymbol {
    pub symbol: String,
    pub reason: SkipReason,
}

#[derive(Debug, Clone)]
pub struct FailedSymbol {
    pub symbol: String,
    pub reason: String,
}

#[derive(Debug, Clone)]
pub struct ScanReport {
    pub classifier: &'static str,
    pub as_of: NaiveDate,
    pub scanned: usize,
    pub matches: Vec<Signal>,
    pub skipped: Vec<SkippedSymbol>,
    pub failed: Vec<FailedSymbol>,
}

impl ScanReport {
    pub fn count_of(&self, kind: SignalKind) -> usize {
        self.matches.iter().filter(|s| s.kind() == kind).count()
    }
}

pub fn scan(
    data_port: &dyn MarketDataPort,
    classifier: &dyn Classifier,
    settings: &Settings,
    today: NaiveDate,
) -> ScanReport {
    let kinds = classifier.indicators();
    let mut matches = Vec::new();
    let mut skipped = Vec::new();
    let mut failed = Vec::new();

    eprintln!(
        "Scanning {} symbols with {} rules",
        settings.universe.len(),
        classifier.name()
    );

    for (i, symbol) in settings.universe.iter().enumerate() {
        if i > 0 && settings.fetch_delay_ms > 0 {
            std::thread::sleep(Duration::from_millis(settings.fetch_delay_ms));
        }

        let bars = match data_port.fetch_bars(symbol, classifier.lookback(), BarInterval::Daily) {
            Ok(bars) => bars,
            Err(e) => {
                eprintln!("Warning: skipping {} ({})", symbol, e);
                failed.push(FailedSymbol {
                    symbol: symbol.clone(),
                    reason: e.to_string(),
                });
                continue;
            }
        };

        let data = SymbolData::prepare(symbol.clone(), bars, &kinds);
        match classifier.evaluate(&data) {
            Evaluation::Match(signal) => {
                eprintln!("  {}: {} [{} bars]", symbol, signal.kind(), data.bar_count());
                matches.push(signal);
            }
            Evaluation::NoMatch => {}
            Evaluation::Skipped(reason) => {
                eprintln!("Warning: skipping {} ({})", symbol, reason);
                skipped.push(SkippedSymbol {
                    symbol: symbol.clone(),
                    reason,
                });
            }
        }
    }

    classifier.sort_matches(&mut matches);

    ScanReport {
        classifier: classifier.name(),
        as_of: today,
        scanned: settings.universe.len(),
        matches,
        skipped,
        failed,
    }
}

/// Deep diagnostic for one symbol. Weekly analysis stretches the lookback
/// so the 50-bar average still has history to work with.
pub fn analyze_symbol(
    data_port: &dyn MarketDataPort,
    symbol: &str,
    interval: BarInterval,
    thresholds: &Thresholds,
) -> Result<Diagnostic, SahambotError> {
    let lookback = match interval {
        BarInterval::Daily => Lookback::months(6),
        BarInterval::Weekly => Lookback::months(24),
    };

    let bars = data_port.fetch_bars(symbol, lookback, interval)?;
    let data = SymbolData::prepare(symbol, bars, &diagnostic::indicator_kinds());

    diagnostic::analyze(&data, thresholds).map_err(|reason| match reason {
        SkipReason::InsufficientBars { bars, minimum } => SahambotError::InsufficientData {
            symbol: symbol.to_string(),
            bars,
            minimum,
        },
        _ => SahambotError::InsufficientData {
            symbol: symbol.to_string(),
            bars: data.bar_count(),
            minimum: diagnostic::MIN_BARS,
        },
    })
}
