//! Integration tests for command dispatch: registration, metering and the
//! reply surface users actually see.

mod common;

use common::*;
use sahambot::domain::commands::{Command, ChatUser, Dispatcher};
use sahambot::domain::error::SahambotError;
use sahambot::domain::user::{Tier, UserRecord};
use sahambot::ports::data_port::BarInterval;
use sahambot::ports::store_port::UserStorePort;

fn budi() -> ChatUser {
    ChatUser {
        id: "42".to_string(),
        display_name: "Budi".to_string(),
    }
}

#[test]
fn start_registers_the_user_and_welcomes_them() {
    let data = MockDataPort::new();
    let store = MemoryStoreAdapter::new();
    let settings = test_settings(&["FLAT"]);
    let dispatcher = Dispatcher {
        data: &data,
        store: &store,
        settings: &settings,
    };

    let reply = dispatcher
        .dispatch(&budi(), &Command::Start, date(2025, 8, 12))
        .unwrap();

    assert!(reply.contains("Hello *Budi*"));
    assert!(reply.contains("/signal"));

    let record = store.get("42").unwrap().unwrap();
    assert_eq!(record.tier, Tier::Free);
    assert_eq!(record.requests_today, 0);
}

#[test]
fn repeated_start_keeps_the_stored_name() {
    let data = MockDataPort::new();
    let store = MemoryStoreAdapter::new();
    let settings = test_settings(&["FLAT"]);
    let dispatcher = Dispatcher {
        data: &data,
        store: &store,
        settings: &settings,
    };
    let today = date(2025, 8, 12);

    dispatcher.dispatch(&budi(), &Command::Start, today).unwrap();

    let renamed = ChatUser {
        id: "42".to_string(),
        display_name: "B. Santoso".to_string(),
    };
    let reply = dispatcher
        .dispatch(&renamed, &Command::Help, today)
        .unwrap();

    assert!(reply.contains("Hello *Budi*"));
    assert_eq!(store.count().unwrap(), 1);
}

#[test]
fn unknown_command_gets_the_standard_reply() {
    let data = MockDataPort::new();
    let store = MemoryStoreAdapter::new();
    let settings = test_settings(&["FLAT"]);
    let dispatcher = Dispatcher {
        data: &data,
        store: &store,
        settings: &settings,
    };

    let reply = dispatcher
        .dispatch(
            &budi(),
            &Command::Unknown {
                raw: "/moon".to_string(),
            },
            date(2025, 8, 12),
        )
        .unwrap();

    assert!(reply.contains("do not understand"));
    assert!(reply.contains("/help"));
}

#[test]
fn scan_reply_carries_the_signal_report() {
    let data = MockDataPort::new().with_daily("GOOD", crossover_buy_bars("GOOD"));
    let store = MemoryStoreAdapter::new();
    let settings = test_settings(&["GOOD"]);
    let dispatcher = Dispatcher {
        data: &data,
        store: &store,
        settings: &settings,
    };

    let reply = dispatcher
        .dispatch(&budi(), &Command::ScanStrict, date(2025, 8, 12))
        .unwrap();

    assert!(reply.contains("Signal scan: strict crossover"));
    assert!(reply.contains("BUY SIGNAL: GOOD"));
    assert!(reply.contains("Analyzed: *1*"));
}

#[test]
fn scans_consume_quota_and_deny_past_the_limit() {
    let data = MockDataPort::new().with_daily("FLAT", flat_bars("FLAT", 30, 100.0, 1000));
    let store = MemoryStoreAdapter::new();
    let mut settings = test_settings(&["FLAT"]);
    settings.daily_limit = 2;
    let dispatcher = Dispatcher {
        data: &data,
        store: &store,
        settings: &settings,
    };
    let today = date(2025, 8, 12);

    for _ in 0..2 {
        let reply = dispatcher
            .dispatch(&budi(), &Command::ScanStrict, today)
            .unwrap();
        assert!(reply.contains("Signal scan"));
    }

    let denied = dispatcher
        .dispatch(&budi(), &Command::ScanStrict, today)
        .unwrap();
    assert!(denied.contains("daily limit of 2"));

    let record = store.get("42").unwrap().unwrap();
    assert_eq!(record.requests_today, 2);
}

#[test]
fn premium_users_are_never_denied() {
    let data = MockDataPort::new().with_daily("FLAT", flat_bars("FLAT", 30, 100.0, 1000));
    let store = MemoryStoreAdapter::new();
    let mut settings = test_settings(&["FLAT"]);
    settings.daily_limit = 1;
    let today = date(2025, 8, 12);
    store.put(&UserRecord::admin("1", "Admin", today)).unwrap();

    let dispatcher = Dispatcher {
        data: &data,
        store: &store,
        settings: &settings,
    };
    let admin = ChatUser {
        id: "1".to_string(),
        display_name: "Admin".to_string(),
    };

    for _ in 0..5 {
        let reply = dispatcher
            .dispatch(&admin, &Command::ScanStrict, today)
            .unwrap();
        assert!(reply.contains("Signal scan"));
    }
}

#[test]
fn analyze_without_symbol_explains_usage() {
    let data = MockDataPort::new();
    let store = MemoryStoreAdapter::new();
    let settings = test_settings(&["FLAT"]);
    let dispatcher = Dispatcher {
        data: &data,
        store: &store,
        settings: &settings,
    };

    let reply = dispatcher
        .dispatch(
            &budi(),
            &Command::Analyze {
                symbol: None,
                interval: BarInterval::Daily,
            },
            date(2025, 8, 12),
        )
        .unwrap();

    assert!(reply.contains("Usage"));
    // a usage hint is free
    assert_eq!(store.get("42").unwrap(), None);
}

#[test]
fn analyze_renders_the_diagnostic() {
    let data = MockDataPort::new().with_daily("TLKM", rising_bars("TLKM", 60, 100.0, 1000));
    let store = MemoryStoreAdapter::new();
    let settings = test_settings(&["FLAT"]);
    let dispatcher = Dispatcher {
        data: &data,
        store: &store,
        settings: &settings,
    };

    let reply = dispatcher
        .dispatch(
            &budi(),
            &Command::Analyze {
                symbol: Some("TLKM".to_string()),
                interval: BarInterval::Daily,
            },
            date(2025, 8, 12),
        )
        .unwrap();

    assert!(reply.contains("STOCK ANALYSIS: TLKM"));
    assert!(reply.contains("Advice:"));
}

#[test]
fn analyze_failure_is_a_reply_and_still_costs_a_request() {
    let data = MockDataPort::new().with_error("ZZZZ", "unknown ticker");
    let store = MemoryStoreAdapter::new();
    let settings = test_settings(&["FLAT"]);
    let dispatcher = Dispatcher {
        data: &data,
        store: &store,
        settings: &settings,
    };

    let reply = dispatcher
        .dispatch(
            &budi(),
            &Command::Analyze {
                symbol: Some("ZZZZ".to_string()),
                interval: BarInterval::Daily,
            },
            date(2025, 8, 12),
        )
        .unwrap();

    assert!(reply.contains("Cannot analyze ZZZZ"));

    // the quota was consumed before the fetch failed
    let record = store.get("42").unwrap().unwrap();
    assert_eq!(record.requests_today, 1);
}

#[test]
fn store_failures_bubble_out_of_dispatch() {
    let data = MockDataPort::new();
    let store = FailingStoreAdapter;
    let settings = test_settings(&["FLAT"]);
    let dispatcher = Dispatcher {
        data: &data,
        store: &store,
        settings: &settings,
    };
    let today = date(2025, 8, 12);

    let start = dispatcher.dispatch(&budi(), &Command::Start, today);
    assert!(matches!(start, Err(SahambotError::Store { .. })));

    let scan = dispatcher.dispatch(&budi(), &Command::ScanStrict, today);
    assert!(matches!(scan, Err(SahambotError::Store { .. })));
}
