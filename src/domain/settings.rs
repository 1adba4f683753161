//! Runtime settings.
//!
//! Built once from the config port at startup and passed explicitly into
//! the scanner and classifiers. Nothing in the domain reads ambient state.

use crate::domain::error::SahambotError;
use crate::ports::config_port::ConfigPort;
use std::collections::HashSet;

/// IDX symbols scanned when `[universe] symbols` is not configured.
pub const DEFAULT_UNIVERSE: &[&str] = &[
    "SSIA", "BWPT", "ADRO", "WIFI", "BOLA", "RELI", "OKAS", "TOBA", "INET", "IOTF", "TEBE",
    "CUAN", "BRPT", "BLOG", "PSAT", "PGAS", "SHID", "PYFA", "BREN", "SOTS", "NICL", "ARCI",
    "PEGE",
];

pub const DEFAULT_DAILY_LIMIT: u32 = 20;

/// Rule thresholds shared by the classifiers.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Thresholds {
    /// Volume must exceed its 20-bar average by this factor (crossover rules).
    pub volume_ratio: f64,
    /// Volume must exceed its 5-bar average by this factor (accumulation).
    pub volume_spike: f64,
    pub take_profit_pct: f64,
    pub stop_loss_pct: f64,
    pub rsi_oversold: f64,
    pub rsi_overbought: f64,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            volume_ratio: 1.1,
            volume_spike: 1.5,
            take_profit_pct: 2.0,
            stop_loss_pct: 2.0,
            rsi_oversold: 30.0,
            rsi_overbought: 70.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub universe: Vec<String>,
    pub thresholds: Thresholds,
    pub daily_limit: u32,
    pub admin_id: String,
    pub admin_name: String,
    /// Pause between symbol fetches during a scan; 0 disables.
    pub fetch_delay_ms: u64,
}

impl Settings {
    pub fn from_config(config: &dyn ConfigPort) -> Result<Self, SahambotError> {
        let admin_id = config.get_string("bot", "admin_id").ok_or_else(|| {
            SahambotError::ConfigMissing {
                section: "bot".to_string(),
                key: "admin_id".to_string(),
            }
        })?;
        let admin_name = config
            .get_string("bot", "admin_name")
            .unwrap_or_else(|| "Admin".to_string());

        let universe = match config.get_string("universe", "symbols") {
            Some(raw) => parse_symbols(&raw)?,
            None => DEFAULT_UNIVERSE.iter().map(|s| s.to_string()).collect(),
        };

        let defaults = Thresholds::default();
        let thresholds = Thresholds {
            volume_ratio: config.get_double("strategy", "volume_ratio_threshold", defaults.volume_ratio),
            volume_spike: config.get_double("strategy", "volume_spike_threshold", defaults.volume_spike),
            take_profit_pct: config.get_double("strategy", "take_profit_pct", defaults.take_profit_pct),
            stop_loss_pct: config.get_double("strategy", "stop_loss_pct", defaults.stop_loss_pct),
            rsi_oversold: config.get_double("strategy", "rsi_oversold", defaults.rsi_oversold),
            rsi_overbought: config.get_double("strategy", "rsi_overbought", defaults.rsi_overbought),
        };

        Ok(Self {
            universe,
            thresholds,
            daily_limit: config.get_int("quota", "daily_limit", DEFAULT_DAILY_LIMIT as i64) as u32,
            admin_id,
            admin_name,
            fetch_delay_ms: config.get_int("data", "fetch_delay_ms", 0) as u64,
        })
    }
}

/// Parse a comma-separated symbol list: trim, uppercase, reject empty
/// tokens and duplicates so the universe stays an ordered set.
pub fn parse_symbols(input: &str) -> Result<Vec<String>, SahambotError> {
    let mut symbols = Vec::new();
    let mut seen = HashSet::new();

    for token in input.split(',') {
        let trimmed = token.trim();
        if trimmed.is_empty() {
            return Err(SahambotError::ConfigInvalid {
                section: "universe".to_string(),
                key: "symbols".to_string(),
                reason: "empty token in symbol list".to_string(),
            });
        }
        let symbol = trimmed.to_uppercase();
        if !seen.insert(symbol.clone()) {
            return Err(SahambotError::ConfigInvalid {
                section: "universe".to_string(),
                key: "symbols".to_string(),
                reason: format!("duplicate symbol: {}", symbol),
            });
        }
        symbols.push(symbol);
    }

    Ok(symbols)
}
