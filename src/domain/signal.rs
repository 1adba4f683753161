//! Typed scan signals.

use chrono::NaiveDate;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SignalKind {
    Buy,
    Sell,
    Potential,
    Accumulation,
}

impl fmt::Display for SignalKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SignalKind::Buy => write!(f, "BUY"),
            SignalKind::Sell => write!(f, "SELL"),
            SignalKind::Potential => write!(f, "POTENTIAL"),
            SignalKind::Accumulation => write!(f, "ACCUMULATION"),
        }
    }
}

/// Kind-specific payload attached to a signal.
#[derive(Debug, Clone, PartialEq)]
pub enum SignalDetails {
    Buy {
        volume_ratio: f64,
        ma5: f64,
        ma20: f64,
        entry: f64,
        take_profit: f64,
        stop_loss: f64,
    },
    Sell {
        volume_ratio: f64,
        ma5: f64,
        ma20: f64,
        resistance: f64,
    },
    Potential {
        rsi: f64,
        ma5: f64,
        ma20: f64,
        rationale: String,
    },
    Accumulation {
        volume_ratio: f64,
        ma20: f64,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct Signal {
    pub symbol: String,
    pub as_of: NaiveDate,
    pub price: f64,
    pub details: SignalDetails,
}

impl Signal {
    pub fn kind(&self) -> SignalKind {
        match self.details {
            SignalDetails::Buy { .. } => SignalKind::Buy,
            SignalDetails::Sell { .. } => SignalKind::Sell,
            SignalDetails::Potential { .. } => SignalKind::Potential,
            SignalDetails::Accumulation { .. } => SignalKind::Accumulation,
        }
    }

    /// Volume ratio for the kinds that carry one.
    pub fn volume_ratio(&self) -> Option<f64> {
        match &self.details {
            SignalDetails::Buy { volume_ratio, .. }
            | SignalDetails::Sell { volume_ratio, .. }
            | SignalDetails::Accumulation { volume_ratio, .. } => Some(*volume_ratio),
            SignalDetails::Potential { .. } => None,
        }
    }
}
