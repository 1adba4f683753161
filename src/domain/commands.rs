//! Chat command surface.
//!
//! Commands arrive as `/name [arg]` text lines from whatever transport
//! fronts the bot. Parsing and dispatch know nothing about that transport:
//! the dispatcher takes a user identity plus a command and returns the
//! reply text. Store failures bubble up as errors; data problems for a
//! single symbol become part of the reply instead.

use crate::domain::classifier::accumulation::AccumulationClassifier;
use crate::domain::classifier::potential::PotentialClassifier;
use crate::domain::classifier::strict::StrictClassifier;
use crate::domain::classifier::Classifier;
use crate::domain::error::SahambotError;
use crate::domain::quota::{self, QuotaDecision};
use crate::domain::report;
use crate::domain::scanner;
use crate::domain::settings::Settings;
use crate::ports::data_port::{BarInterval, MarketDataPort};
use crate::ports::store_port::UserStorePort;
use chrono::NaiveDate;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Start,
    Help,
    ScanStrict,
    ScanPotential,
    ScanAccumulation,
    /// Deep analysis; `symbol` is `None` when the argument was missing.
    Analyze {
        symbol: Option<String>,
        interval: BarInterval,
    },
    Unknown {
        raw: String,
    },
}

/// Parse one chat line. Symbols are uppercased; anything unrecognized comes
/// back as `Unknown` so the caller can send the standard reply.
pub fn parse(text: &str) -> Command {
    let mut parts = text.split_whitespace();
    let head = match parts.next() {
        Some(head) => head,
        None => return Command::Unknown { raw: text.to_string() },
    };
    let arg = parts.next().map(|s| s.to_uppercase());

    match head {
        "/start" => Command::Start,
        "/help" => Command::Help,
        "/signal" => Command::ScanStrict,
        "/potential" => Command::ScanPotential,
        "/accumulation" => Command::ScanAccumulation,
        "/analyze" => Command::Analyze {
            symbol: arg,
            interval: BarInterval::Daily,
        },
        "/weekly" => Command::Analyze {
            symbol: arg,
            interval: BarInterval::Weekly,
        },
        _ => Command::Unknown { raw: text.to_string() },
    }
}

/// Identity of the requesting user as seen by the transport.
#[derive(Debug, Clone)]
pub struct ChatUser {
    pub id: String,
    pub display_name: String,
}

pub struct Dispatcher<'a> {
    pub data: &'a dyn MarketDataPort,
    pub store: &'a dyn UserStorePort,
    pub settings: &'a Settings,
}

impl Dispatcher<'_> {
    /// Handle one command and produce the reply text.
    pub fn dispatch(
        &self,
        user: &ChatUser,
        command: &Command,
        today: NaiveDate,
    ) -> Result<String, SahambotError> {
        match command {
            Command::Start | Command::Help => {
                let record =
                    quota::register_user(self.store, &user.id, &user.display_name, today)?;
                Ok(report::render_welcome(&record.display_name))
            }
            Command::ScanStrict => self.metered_scan(
                user,
                today,
                &StrictClassifier::new(self.settings.thresholds),
            ),
            Command::ScanPotential => self.metered_scan(
                user,
                today,
                &PotentialClassifier::new(self.settings.thresholds),
            ),
            Command::ScanAccumulation => self.metered_scan(
                user,
                today,
                &AccumulationClassifier::new(self.settings.thresholds),
            ),
            Command::Analyze { symbol: None, .. } => Ok(report::render_analyze_usage()),
            Command::Analyze {
                symbol: Some(symbol),
                interval,
            } => self.metered_analyze(user, today, symbol, *interval),
            Command::Unknown { .. } => Ok(report::render_unrecognized()),
        }
    }

    fn metered_scan(
        &self,
        user: &ChatUser,
        today: NaiveDate,
        classifier: &dyn Classifier,
    ) -> Result<String, SahambotError> {
        match self.consume_quota(user, today)? {
            QuotaDecision::Denied { limit } => Ok(report::render_quota_denied(limit)),
            QuotaDecision::Allowed { .. } => {
                let scan_report = scanner::scan(self.data, classifier, self.settings, today);
                Ok(report::render_scan_report(
                    &scan_report,
                    &self.settings.thresholds,
                ))
            }
        }
    }

    fn metered_analyze(
        &self,
        user: &ChatUser,
        today: NaiveDate,
        symbol: &str,
        interval: BarInterval,
    ) -> Result<String, SahambotError> {
        match self.consume_quota(user, today)? {
            QuotaDecision::Denied { limit } => Ok(report::render_quota_denied(limit)),
            QuotaDecision::Allowed { .. } => {
                match scanner::analyze_symbol(self.data, symbol, interval, &self.settings.thresholds)
                {
                    Ok(diag) => Ok(report::render_diagnostic(&diag)),
                    // a bad symbol is the user's problem, not a process error
                    Err(
                        e @ (SahambotError::DataUnavailable { .. }
                        | SahambotError::InsufficientData { .. }),
                    ) => Ok(format!("⚠️ Cannot analyze {}: {}", symbol, e)),
                    Err(e) => Err(e),
                }
            }
        }
    }

    fn consume_quota(
        &self,
        user: &ChatUser,
        today: NaiveDate,
    ) -> Result<QuotaDecision, SahambotError> {
        quota::check_and_consume(
            self.store,
            &user.id,
            &user.display_name,
            today,
            self.settings.daily_limit,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_known_commands() {
        assert_eq!(parse("/start"), Command::Start);
        assert_eq!(parse("/help"), Command::Help);
        assert_eq!(parse("/signal"), Command::ScanStrict);
        assert_eq!(parse("/potential"), Command::ScanPotential);
        assert_eq!(parse("/accumulation"), Command::ScanAccumulation);
    }

    #[test]
    fn parse_analyze_uppercases_symbol() {
        assert_eq!(
            parse("/analyze bbca"),
            Command::Analyze {
                symbol: Some("BBCA".into()),
                interval: BarInterval::Daily,
            }
        );
        assert_eq!(
            parse("/weekly ssia"),
            Command::Analyze {
                symbol: Some("SSIA".into()),
                interval: BarInterval::Weekly,
            }
        );
    }

    #[test]
    fn parse_analyze_without_symbol() {
        assert_eq!(
            parse("/analyze"),
            Command::Analyze {
                symbol: None,
                interval: BarInterval::Daily,
            }
        );
    }

    #[test]
    fn parse_ignores_extra_whitespace() {
        assert_eq!(
            parse("  /analyze   bbca  "),
            Command::Analyze {
                symbol: Some("BBCA".into()),
                interval: BarInterval::Daily,
            }
        );
    }

    #[test]
    fn parse_unknown_keeps_raw_text() {
        assert_eq!(
            parse("/moon"),
            Command::Unknown {
                raw: "/moon".into()
            }
        );
        assert_eq!(
            parse("hello there"),
            Command::Unknown {
                raw: "hello there".into()
            }
        );
    }
}
