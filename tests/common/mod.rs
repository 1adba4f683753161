#![allow(dead_code)]

use chrono::NaiveDate;
use sahambot::domain::bar::Bar;
use sahambot::domain::error::SahambotError;
use sahambot::domain::settings::{Settings, Thresholds};
use sahambot::domain::user::UserRecord;
use sahambot::ports::data_port::{BarInterval, Lookback, MarketDataPort};
use sahambot::ports::store_port::UserStorePort;
use std::collections::HashMap;
use std::sync::Mutex;

pub fn test_settings(universe: &[&str]) -> Settings {
    Settings {
        universe: universe.iter().map(|s| s.to_string()).collect(),
        thresholds: Thresholds::default(),
        daily_limit: 20,
        admin_id: "1".to_string(),
        admin_name: "Admin".to_string(),
        fetch_delay_ms: 0,
    }
}

pub struct MockDataPort {
    pub daily: HashMap<String, Vec<Bar>>,
    pub weekly: HashMap<String, Vec<Bar>>,
    pub errors: HashMap<String, String>,
}

impl MockDataPort {
    pub fn new() -> Self {
        Self {
            daily: HashMap::new(),
            weekly: HashMap::new(),
            errors: HashMap::new(),
        }
    }

    pub fn with_daily(mut self, symbol: &str, bars: Vec<Bar>) -> Self {
        self.daily.insert(symbol.to_string(), bars);
        self
    }

    pub fn with_weekly(mut self, symbol: &str, bars: Vec<Bar>) -> Self {
        self.weekly.insert(symbol.to_string(), bars);
        self
    }

    pub fn with_error(mut self, symbol: &str, reason: &str) -> Self {
        self.errors.insert(symbol.to_string(), reason.to_string());
        self
    }
}

impl MarketDataPort for MockDataPort {
    fn fetch_bars(
        &self,
        symbol: &str,
        _lookback: Lookback,
        interval: BarInterval,
    ) -> Result<Vec<Bar>, SahambotError> {
        if let Some(reason) = self.errors.get(symbol) {
            return Err(SahambotError::DataUnavailable {
                symbol: symbol.to_string(),
                reason: reason.clone(),
            });
        }
        let map = match interval {
            BarInterval::Daily => &self.daily,
            BarInterval::Weekly => &self.weekly,
        };
        Ok(map.get(symbol).cloned().unwrap_or_default())
    }
}

/// In-memory user store with the same per-key critical section contract
/// as the real adapters.
pub struct MemoryStoreAdapter {
    users: Mutex<HashMap<String, UserRecord>>,
}

impl MemoryStoreAdapter {
    pub fn new() -> Self {
        Self {
            users: Mutex::new(HashMap::new()),
        }
    }
}

impl UserStorePort for MemoryStoreAdapter {
    fn get(&self, user_id: &str) -> Result<Option<UserRecord>, SahambotError> {
        Ok(self.users.lock().unwrap().get(user_id).cloned())
    }

    fn put(&self, record: &UserRecord) -> Result<(), SahambotError> {
        self.users
            .lock()
            .unwrap()
            .insert(record.user_id.clone(), record.clone());
        Ok(())
    }

    fn update(
        &self,
        user_id: &str,
        apply: &mut dyn FnMut(Option<UserRecord>) -> UserRecord,
    ) -> Result<UserRecord, SahambotError> {
        let mut users = self.users.lock().unwrap();
        let record = apply(users.remove(user_id));
        users.insert(user_id.to_string(), record.clone());
        Ok(record)
    }

    fn count(&self) -> Result<usize, SahambotError> {
        Ok(self.users.lock().unwrap().len())
    }
}

/// Store whose every operation fails, for error propagation tests.
pub struct FailingStoreAdapter;

impl FailingStoreAdapter {
    fn error(&self) -> SahambotError {
        SahambotError::Store {
            reason: "store offline".to_string(),
        }
    }
}

impl UserStorePort for FailingStoreAdapter {
    fn get(&self, _user_id: &str) -> Result<Option<UserRecord>, SahambotError> {
        Err(self.error())
    }

    fn put(&self, _record: &UserRecord) -> Result<(), SahambotError> {
        Err(self.error())
    }

    fn update(
        &self,
        _user_id: &str,
        _apply: &mut dyn FnMut(Option<UserRecord>) -> UserRecord,
    ) -> Result<UserRecord, SahambotError> {
        Err(self.error())
    }

    fn count(&self) -> Result<usize, SahambotError> {
        Err(self.error())
    }
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

pub fn bar(symbol: &str, day: NaiveDate, close: f64, volume: i64) -> Bar {
    Bar {
        symbol: symbol.to_string(),
        date: day,
        open: close,
        high: close + 1.0,
        low: close - 1.0,
        close,
        volume,
    }
}

/// `count` identical bars, one per day from 2025-01-01.
pub fn flat_bars(symbol: &str, count: usize, close: f64, volume: i64) -> Vec<Bar> {
    let start = date(2025, 1, 1);
    (0..count)
        .map(|i| {
            bar(
                symbol,
                start + chrono::Days::new(i as u64),
                close,
                volume,
            )
        })
        .collect()
}

/// Rising closes, one per day: `start_close`, `start_close + 1`, ...
pub fn rising_bars(symbol: &str, count: usize, start_close: f64, volume: i64) -> Vec<Bar> {
    let start = date(2025, 1, 1);
    (0..count)
        .map(|i| {
            bar(
                symbol,
                start + chrono::Days::new(i as u64),
                start_close + i as f64,
                volume,
            )
        })
        .collect()
}

/// 21 bars ending in a fresh golden cross with a volume spike. The final
/// bar closes at 130 on five times the running volume, which lifts MA5
/// above MA20 while the prior bar still had them equal.
pub fn crossover_buy_bars(symbol: &str) -> Vec<Bar> {
    let mut bars = flat_bars(symbol, 20, 100.0, 1000);
    let last_date = bars.last().unwrap().date + chrono::Days::new(1);
    bars.push(Bar {
        symbol: symbol.to_string(),
        date: last_date,
        open: 100.0,
        high: 131.0,
        low: 99.0,
        close: 130.0,
        volume: 5000,
    });
    bars
}

/// 20 rising bars whose last volume spikes to `last_volume` against a
/// background of 1000, putting the close above MA20 with a configurable
/// volume ratio.
pub fn accumulation_bars(symbol: &str, last_volume: i64) -> Vec<Bar> {
    let mut bars = rising_bars(symbol, 20, 100.0, 1000);
    bars.last_mut().unwrap().volume = last_volume;
    bars
}
