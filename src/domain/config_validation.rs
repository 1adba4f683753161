//! Startup configuration validation.
//!
//! Runs before any port is constructed. A missing bot credential or
//! administrator identity stops the process; threshold values are checked
//! so rule evaluation never sees a nonsensical band.

use crate::domain::error::SahambotError;
use crate::domain::settings;
use crate::ports::config_port::ConfigPort;

pub fn validate_bot_config(config: &dyn ConfigPort) -> Result<(), SahambotError> {
    validate_token(config)?;
    validate_admin_id(config)?;
    validate_universe(config)?;
    validate_volume_thresholds(config)?;
    validate_exit_percentages(config)?;
    validate_rsi_band(config)?;
    validate_daily_limit(config)?;
    Ok(())
}

fn validate_token(config: &dyn ConfigPort) -> Result<(), SahambotError> {
    match config.get_string("bot", "token") {
        Some(s) if !s.trim().is_empty() => Ok(()),
        _ => Err(SahambotError::ConfigMissing {
            section: "bot".to_string(),
            key: "token".to_string(),
        }),
    }
}

fn validate_admin_id(config: &dyn ConfigPort) -> Result<(), SahambotError> {
    match config.get_string("bot", "admin_id") {
        Some(s) if !s.trim().is_empty() => Ok(()),
        _ => Err(SahambotError::ConfigMissing {
            section: "bot".to_string(),
            key: "admin_id".to_string(),
        }),
    }
}

fn validate_universe(config: &dyn ConfigPort) -> Result<(), SahambotError> {
    if let Some(raw) = config.get_string("universe", "symbols") {
        settings::parse_symbols(&raw)?;
    }
    Ok(())
}

fn validate_volume_thresholds(config: &dyn ConfigPort) -> Result<(), SahambotError> {
    let ratio = config.get_double("strategy", "volume_ratio_threshold", 1.1);
    if ratio <= 0.0 {
        return Err(SahambotError::ConfigInvalid {
            section: "strategy".to_string(),
            key: "volume_ratio_threshold".to_string(),
            reason: "volume_ratio_threshold must be positive".to_string(),
        });
    }
    let spike = config.get_double("strategy", "volume_spike_threshold", 1.5);
    if spike <= 0.0 {
        return Err(SahambotError::ConfigInvalid {
            section: "strategy".to_string(),
            key: "volume_spike_threshold".to_string(),
            reason: "volume_spike_threshold must be positive".to_string(),
        });
    }
    Ok(())
}

fn validate_exit_percentages(config: &dyn ConfigPort) -> Result<(), SahambotError> {
    let take_profit = config.get_double("strategy", "take_profit_pct", 2.0);
    if take_profit <= 0.0 {
        return Err(SahambotError::ConfigInvalid {
            section: "strategy".to_string(),
            key: "take_profit_pct".to_string(),
            reason: "take_profit_pct must be positive".to_string(),
        });
    }
    let stop_loss = config.get_double("strategy", "stop_loss_pct", 2.0);
    if stop_loss <= 0.0 || stop_loss >= 100.0 {
        return Err(SahambotError::ConfigInvalid {
            section: "strategy".to_string(),
            key: "stop_loss_pct".to_string(),
            reason: "stop_loss_pct must be between 0 and 100".to_string(),
        });
    }
    Ok(())
}

fn validate_rsi_band(config: &dyn ConfigPort) -> Result<(), SahambotError> {
    let oversold = config.get_double("strategy", "rsi_oversold", 30.0);
    let overbought = config.get_double("strategy", "rsi_overbought", 70.0);

    if !(0.0..=100.0).contains(&oversold) || !(0.0..=100.0).contains(&overbought) {
        return Err(SahambotError::ConfigInvalid {
            section: "strategy".to_string(),
            key: "rsi_oversold".to_string(),
            reason: "RSI thresholds must be between 0 and 100".to_string(),
        });
    }
    if oversold >= overbought {
        return Err(SahambotError::ConfigInvalid {
            section: "strategy".to_string(),
            key: "rsi_oversold".to_string(),
            reason: "rsi_oversold must be below rsi_overbought".to_string(),
        });
    }
    Ok(())
}

fn validate_daily_limit(config: &dyn ConfigPort) -> Result<(), SahambotError> {
    let value = config.get_int("quota", "daily_limit", settings::DEFAULT_DAILY_LIMIT as i64);
    if value < 1 {
        return Err(SahambotError::ConfigInvalid {
            section: "quota".to_string(),
            key: "daily_limit".to_string(),
            reason: "daily_limit must be at least 1".to_string(),
        });
    }
    Ok(())
}
