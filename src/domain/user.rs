//! Durable per-user state.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tier {
    Free,
    Premium,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserRecord {
    pub user_id: String,
    pub display_name: String,
    pub tier: Tier,
    pub requests_today: u32,
    pub last_request_date: NaiveDate,
}

impl UserRecord {
    /// Fresh free-tier record for a first-time user.
    pub fn new(user_id: impl Into<String>, display_name: impl Into<String>, today: NaiveDate) -> Self {
        Self {
            user_id: user_id.into(),
            display_name: display_name.into(),
            tier: Tier::Free,
            requests_today: 0,
            last_request_date: today,
        }
    }

    /// Premium record used when seeding the administrator.
    pub fn admin(user_id: impl Into<String>, display_name: impl Into<String>, today: NaiveDate) -> Self {
        Self {
            tier: Tier::Premium,
            ..Self::new(user_id, display_name, today)
        }
    }
}
