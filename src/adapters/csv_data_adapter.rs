//! CSV file market data adapter.
//!
//! Bars for each symbol live in `{dir}/{SYMBOL}_{tag}.csv` where the tag
//! is the interval tag (`1d` or `1wk`). Files carry a header row of
//! `date,open,high,low,close,volume` with ISO dates.

use crate::domain::bar::Bar;
use crate::domain::error::SahambotError;
use crate::ports::data_port::{BarInterval, Lookback, MarketDataPort};
use chrono::{Months, NaiveDate};
use std::fs;
use std::path::PathBuf;

pub struct CsvDataAdapter {
    base_path: PathBuf,
}

impl CsvDataAdapter {
    pub fn new(base_path: PathBuf) -> Self {
        Self { base_path }
    }

    fn csv_path(&self, symbol: &str, interval: BarInterval) -> PathBuf {
        self.base_path
            .join(format!("{}_{}.csv", symbol, interval.tag()))
    }
}

fn data_error(symbol: &str, reason: String) -> SahambotError {
    SahambotError::DataUnavailable {
        symbol: symbol.to_string(),
        reason,
    }
}

fn get_field<'a>(
    record: &'a csv::StringRecord,
    index: usize,
    name: &str,
    symbol: &str,
) -> Result<&'a str, SahambotError> {
    record
        .get(index)
        .ok_or_else(|| data_error(symbol, format!("missing {} column", name)))
}

fn parse_field<T: std::str::FromStr>(
    record: &csv::StringRecord,
    index: usize,
    name: &str,
    symbol: &str,
) -> Result<T, SahambotError>
where
    T::Err: std::fmt::Display,
{
    get_field(record, index, name, symbol)?
        .parse()
        .map_err(|e| data_error(symbol, format!("invalid {} value: {}", name, e)))
}

impl MarketDataPort for CsvDataAdapter {
    fn fetch_bars(
        &self,
        symbol: &str,
        lookback: Lookback,
        interval: BarInterval,
    ) -> Result<Vec<Bar>, SahambotError> {
        let path = self.csv_path(symbol, interval);
        let content = fs::read_to_string(&path)
            .map_err(|e| data_error(symbol, format!("failed to read {}: {}", path.display(), e)))?;

        let mut rdr = csv::Reader::from_reader(content.as_bytes());
        let mut bars = Vec::new();

        for result in rdr.records() {
            let record =
                result.map_err(|e| data_error(symbol, format!("CSV parse error: {}", e)))?;

            let date_str = get_field(&record, 0, "date", symbol)?;
            let date = NaiveDate::parse_from_str(date_str, "%Y-%m-%d")
                .map_err(|e| data_error(symbol, format!("invalid date format: {}", e)))?;

            bars.push(Bar {
                symbol: symbol.to_string(),
                date,
                open: parse_field(&record, 1, "open", symbol)?,
                high: parse_field(&record, 2, "high", symbol)?,
                low: parse_field(&record, 3, "low", symbol)?,
                close: parse_field(&record, 4, "close", symbol)?,
                volume: parse_field(&record, 5, "volume", symbol)?,
            });
        }

        // The lookback window is anchored at the newest bar on file, not
        // the wall clock, so stale files still yield a full window.
        if let Some(newest) = bars.iter().map(|b| b.date).max() {
            if let Some(cutoff) = newest.checked_sub_months(Months::new(lookback.months)) {
                bars.retain(|b| b.date > cutoff);
            }
        }

        bars.sort_by_key(|b| b.date);
        Ok(bars)
    }
}
