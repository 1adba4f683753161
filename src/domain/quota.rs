//! Daily request quota.
//!
//! One atomic read-modify-write per metered request, through
//! [`UserStorePort::update`]. Every branch persists its outcome, including
//! the day-boundary reset on a call that still ends up denied, so the
//! stored counter always reflects the date it belongs to.

use crate::domain::error::SahambotError;
use crate::domain::user::{Tier, UserRecord};
use crate::ports::store_port::UserStorePort;
use chrono::NaiveDate;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuotaDecision {
    /// Request may proceed. `remaining` is `None` for premium users, who
    /// are never counted.
    Allowed { remaining: Option<u32> },
    /// Daily limit reached for a free user.
    Denied { limit: u32 },
}

impl QuotaDecision {
    pub fn is_allowed(&self) -> bool {
        matches!(self, QuotaDecision::Allowed { .. })
    }
}

/// Check the caller's quota and consume one request if allowed.
///
/// Load-or-create, date reset, tier check and increment all happen inside
/// the store's per-key critical section.
pub fn check_and_consume(
    store: &dyn UserStorePort,
    user_id: &str,
    display_name: &str,
    today: NaiveDate,
    daily_limit: u32,
) -> Result<QuotaDecision, SahambotError> {
    let mut decision = QuotaDecision::Allowed { remaining: None };

    store.update(user_id, &mut |existing| {
        let mut record =
            existing.unwrap_or_else(|| UserRecord::new(user_id, display_name, today));

        // day boundary: reset before the limit is consulted
        if record.last_request_date != today {
            record.requests_today = 0;
            record.last_request_date = today;
        }

        decision = match record.tier {
            Tier::Premium => QuotaDecision::Allowed { remaining: None },
            Tier::Free => {
                if record.requests_today >= daily_limit {
                    QuotaDecision::Denied { limit: daily_limit }
                } else {
                    record.requests_today += 1;
                    QuotaDecision::Allowed {
                        remaining: Some(daily_limit - record.requests_today),
                    }
                }
            }
        };

        record
    })?;

    Ok(decision)
}

/// Create the user's record on first contact. Later calls change nothing:
/// the stored name and tier always win.
pub fn register_user(
    store: &dyn UserStorePort,
    user_id: &str,
    display_name: &str,
    today: NaiveDate,
) -> Result<UserRecord, SahambotError> {
    store.update(user_id, &mut |existing| {
        existing.unwrap_or_else(|| UserRecord::new(user_id, display_name, today))
    })
}

/// Seed the configured administrator as premium, but only into an empty
/// store. An existing population is never touched.
pub fn bootstrap_admin(
    store: &dyn UserStorePort,
    admin_id: &str,
    admin_name: &str,
    today: NaiveDate,
) -> Result<(), SahambotError> {
    if store.count()? == 0 {
        store.put(&UserRecord::admin(admin_id, admin_name, today))?;
        eprintln!("Seeded administrator {} as premium", admin_id);
    }
    Ok(())
}
