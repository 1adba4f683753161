//! Domain error types.

/// Top-level error type for sahambot.
#[derive(Debug, thiserror::Error)]
pub enum SahambotError {
    #[error("config parse error in {file}: {reason}")]
    ConfigParse { file: String, reason: String },

    #[error("missing config key [{section}] {key}")]
    ConfigMissing { section: String, key: String },

    #[error("invalid config value [{section}] {key}: {reason}")]
    ConfigInvalid {
        section: String,
        key: String,
        reason: String,
    },

    #[error("no data for {symbol}: {reason}")]
    DataUnavailable { symbol: String, reason: String },

    #[error("insufficient data for {symbol}: have {bars} bars, need {minimum}")]
    InsufficientData {
        symbol: String,
        bars: usize,
        minimum: usize,
    },

    #[error("user store error: {reason}")]
    Store { reason: String },

    #[error("user store corrupt at {path}: {reason}")]
    StoreCorrupt { path: String, reason: String },

    #[error("delivery error: {reason}")]
    Delivery { reason: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl From<&SahambotError> for std::process::ExitCode {
    fn from(err: &SahambotError) -> Self {
        let code: u8 = match err {
            SahambotError::Io(_) => 1,
            SahambotError::ConfigParse { .. }
            | SahambotError::ConfigMissing { .. }
            | SahambotError::ConfigInvalid { .. } => 2,
            SahambotError::Store { .. } | SahambotError::StoreCorrupt { .. } => 3,
            SahambotError::Delivery { .. } => 4,
            SahambotError::DataUnavailable { .. } | SahambotError::InsufficientData { .. } => 5,
        };
        std::process::ExitCode::from(code)
    }
}
