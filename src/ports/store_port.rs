//! User state store port trait.
//!
//! Durable mapping from user id to [`UserRecord`]. `update` is the write
//! path the quota tracker relies on: the adapter must run the whole
//! load-apply-save cycle as a critical section per key, so two racing
//! requests cannot both observe the same counter value.

use crate::domain::error::SahambotError;
use crate::domain::user::UserRecord;

pub trait UserStorePort {
    fn get(&self, user_id: &str) -> Result<Option<UserRecord>, SahambotError>;

    fn put(&self, record: &UserRecord) -> Result<(), SahambotError>;

    /// Atomic read-modify-write. `apply` receives the current record (or
    /// `None` for a new user) and returns the record to persist; the
    /// persisted record is returned.
    fn update(
        &self,
        user_id: &str,
        apply: &mut dyn FnMut(Option<UserRecord>) -> UserRecord,
    ) -> Result<UserRecord, SahambotError>;

    fn count(&self) -> Result<usize, SahambotError>;
}
