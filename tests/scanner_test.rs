//! Integration tests for the universe scan loop and single-symbol analysis.
//!
//! Tests cover:
//! - Outcome isolation: one universe, every symbol in exactly one bucket
//! - Bar normalization between fetch and evaluation
//! - Accumulation match ordering
//! - analyze_symbol interval selection and error mapping

mod common;

use common::*;
use sahambot::domain::classifier::accumulation::AccumulationClassifier;
use sahambot::domain::classifier::diagnostic::{Advice, RsiZone, TrendPosition};
use sahambot::domain::classifier::strict::StrictClassifier;
use sahambot::domain::classifier::SkipReason;
use sahambot::domain::error::SahambotError;
use sahambot::domain::scanner;
use sahambot::domain::settings::Thresholds;
use sahambot::domain::signal::SignalKind;
use sahambot::ports::data_port::BarInterval;

mod scan {
    use super::*;

    #[test]
    fn every_symbol_lands_in_one_bucket() {
        let data = MockDataPort::new()
            .with_daily("GOOD", crossover_buy_bars("GOOD"))
            .with_daily("FLAT", flat_bars("FLAT", 21, 100.0, 1000))
            .with_daily("SHRT", flat_bars("SHRT", 10, 100.0, 1000))
            .with_error("BADX", "connection refused");
        let settings = test_settings(&["GOOD", "FLAT", "SHRT", "BADX"]);
        let classifier = StrictClassifier::new(settings.thresholds);

        let report = scanner::scan(&data, &classifier, &settings, date(2025, 8, 12));

        assert_eq!(report.scanned, 4);
        assert_eq!(report.as_of, date(2025, 8, 12));
        assert_eq!(report.classifier, "strict crossover");

        assert_eq!(report.matches.len(), 1);
        assert_eq!(report.matches[0].symbol, "GOOD");
        assert_eq!(report.matches[0].kind(), SignalKind::Buy);
        assert_eq!(report.count_of(SignalKind::Buy), 1);
        assert_eq!(report.count_of(SignalKind::Sell), 0);

        assert_eq!(report.skipped.len(), 1);
        assert_eq!(report.skipped[0].symbol, "SHRT");
        assert!(matches!(
            report.skipped[0].reason,
            SkipReason::InsufficientBars {
                bars: 10,
                minimum: 21
            }
        ));

        assert_eq!(report.failed.len(), 1);
        assert_eq!(report.failed[0].symbol, "BADX");
        assert!(report.failed[0].reason.contains("connection refused"));
    }

    #[test]
    fn one_failure_does_not_abort_the_scan() {
        let data = MockDataPort::new()
            .with_error("BADX", "timeout")
            .with_daily("GOOD", crossover_buy_bars("GOOD"));
        // failing symbol comes first in the universe
        let settings = test_settings(&["BADX", "GOOD"]);
        let classifier = StrictClassifier::new(settings.thresholds);

        let report = scanner::scan(&data, &classifier, &settings, date(2025, 8, 12));

        assert_eq!(report.failed.len(), 1);
        assert_eq!(report.matches.len(), 1);
        assert_eq!(report.matches[0].symbol, "GOOD");
    }

    #[test]
    fn unordered_bars_are_normalized_before_evaluation() {
        let mut bars = crossover_buy_bars("GOOD");
        bars.reverse();
        let data = MockDataPort::new().with_daily("GOOD", bars);
        let settings = test_settings(&["GOOD"]);
        let classifier = StrictClassifier::new(settings.thresholds);

        let report = scanner::scan(&data, &classifier, &settings, date(2025, 8, 12));

        assert_eq!(report.matches.len(), 1);
        assert_eq!(report.matches[0].kind(), SignalKind::Buy);
    }

    #[test]
    fn accumulation_matches_are_ordered_by_volume_ratio() {
        let data = MockDataPort::new()
            .with_daily("LOWV", accumulation_bars("LOWV", 2000))
            .with_daily("HIGH", accumulation_bars("HIGH", 9000))
            .with_daily("MIDV", accumulation_bars("MIDV", 4000));
        let settings = test_settings(&["LOWV", "HIGH", "MIDV"]);
        let classifier = AccumulationClassifier::new(settings.thresholds);

        let report = scanner::scan(&data, &classifier, &settings, date(2025, 8, 12));

        let order: Vec<&str> = report.matches.iter().map(|s| s.symbol.as_str()).collect();
        assert_eq!(order, vec!["HIGH", "MIDV", "LOWV"]);

        let ratios: Vec<f64> = report
            .matches
            .iter()
            .map(|s| s.volume_ratio().unwrap())
            .collect();
        assert!(ratios.windows(2).all(|w| w[0] >= w[1]));
    }

    #[test]
    fn no_signals_is_an_empty_match_list() {
        let data = MockDataPort::new().with_daily("FLAT", flat_bars("FLAT", 30, 100.0, 1000));
        let settings = test_settings(&["FLAT"]);
        let classifier = StrictClassifier::new(settings.thresholds);

        let report = scanner::scan(&data, &classifier, &settings, date(2025, 8, 12));

        assert!(report.matches.is_empty());
        assert!(report.skipped.is_empty());
        assert!(report.failed.is_empty());
        assert_eq!(report.scanned, 1);
    }
}

mod analyze {
    use super::*;

    #[test]
    fn daily_diagnostic_for_a_rising_symbol() {
        let bars = rising_bars("TLKM", 60, 100.0, 1000);
        let last_date = bars.last().unwrap().date;
        let data = MockDataPort::new().with_daily("TLKM", bars);

        let diag =
            scanner::analyze_symbol(&data, "TLKM", BarInterval::Daily, &Thresholds::default())
                .unwrap();

        assert_eq!(diag.symbol, "TLKM");
        assert_eq!(diag.as_of, last_date);
        assert_eq!(diag.price, 159.0);
        // (159 - 158) / 158
        assert!((diag.change_pct - 0.6329).abs() < 0.001);
        assert_eq!(diag.trend, TrendPosition::StrongUptrend);
        // a 60-bar monotonic rise saturates RSI
        assert_eq!(diag.rsi_zone, RsiZone::Overbought);
        assert_eq!(diag.advice, Advice::Hold);
        assert!((diag.volume_ratio - 1.0).abs() < 1e-9);
    }

    #[test]
    fn weekly_interval_reads_weekly_bars() {
        let data = MockDataPort::new().with_weekly("TLKM", rising_bars("TLKM", 60, 100.0, 1000));

        // no daily fixture: the daily request has nothing to work with
        let daily =
            scanner::analyze_symbol(&data, "TLKM", BarInterval::Daily, &Thresholds::default());
        assert!(matches!(
            daily,
            Err(SahambotError::InsufficientData { bars: 0, .. })
        ));

        let weekly =
            scanner::analyze_symbol(&data, "TLKM", BarInterval::Weekly, &Thresholds::default())
                .unwrap();
        assert_eq!(weekly.price, 159.0);
    }

    #[test]
    fn too_few_bars_is_insufficient_data() {
        let data = MockDataPort::new().with_daily("NEWL", rising_bars("NEWL", 10, 100.0, 1000));

        let result =
            scanner::analyze_symbol(&data, "NEWL", BarInterval::Daily, &Thresholds::default());

        assert!(matches!(
            result,
            Err(SahambotError::InsufficientData {
                ref symbol,
                bars: 10,
                minimum: 51,
            }) if symbol == "NEWL"
        ));
    }

    #[test]
    fn fetch_failure_is_data_unavailable() {
        let data = MockDataPort::new().with_error("ZZZZ", "unknown ticker");

        let result =
            scanner::analyze_symbol(&data, "ZZZZ", BarInterval::Daily, &Thresholds::default());

        assert!(matches!(
            result,
            Err(SahambotError::DataUnavailable { ref symbol, .. }) if symbol == "ZZZZ"
        ));
    }
}
