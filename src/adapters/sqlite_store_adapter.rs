//! SQLite user store adapter.
//!
//! `update` runs inside an immediate transaction, so the read-modify-write
//! cycle holds the database write lock for its whole duration and racing
//! writers queue behind it.

use crate::domain::error::SahambotError;
use crate::domain::user::{Tier, UserRecord};
use crate::ports::config_port::ConfigPort;
use crate::ports::store_port::UserStorePort;
use chrono::NaiveDate;
use r2d2::Pool;
use r2d2_sqlite::SqliteConnectionManager;
use rusqlite::{params, OptionalExtension, TransactionBehavior};

const SELECT_USER: &str = "SELECT user_id, display_name, tier, requests_today, last_request_date
     FROM users WHERE user_id = ?1";

pub struct SqliteStoreAdapter {
    pool: Pool<SqliteConnectionManager>,
}

fn pool_error(e: r2d2::Error) -> SahambotError {
    SahambotError::Store {
        reason: e.to_string(),
    }
}

fn sql_error(e: rusqlite::Error) -> SahambotError {
    SahambotError::Store {
        reason: e.to_string(),
    }
}

fn tier_to_str(tier: Tier) -> &'static str {
    match tier {
        Tier::Free => "free",
        Tier::Premium => "premium",
    }
}

fn tier_from_str(s: &str) -> Option<Tier> {
    match s {
        "free" => Some(Tier::Free),
        "premium" => Some(Tier::Premium),
        _ => None,
    }
}

fn row_to_record(row: &rusqlite::Row<'_>) -> rusqlite::Result<UserRecord> {
    let tier_str: String = row.get(2)?;
    let tier = tier_from_str(&tier_str).ok_or_else(|| {
        rusqlite::Error::FromSqlConversionFailure(
            2,
            rusqlite::types::Type::Text,
            format!("unknown tier '{}'", tier_str).into(),
        )
    })?;

    let date_str: String = row.get(4)?;
    let last_request_date = NaiveDate::parse_from_str(&date_str, "%Y-%m-%d").map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(4, rusqlite::types::Type::Text, Box::new(e))
    })?;

    Ok(UserRecord {
        user_id: row.get(0)?,
        display_name: row.get(1)?,
        tier,
        requests_today: row.get(3)?,
        last_request_date,
    })
}

fn upsert(conn: &rusqlite::Connection, record: &UserRecord) -> Result<(), SahambotError> {
    conn.execute(
        "INSERT OR REPLACE INTO users (user_id, display_name, tier, requests_today, last_request_date)
         VALUES (?1, ?2, ?3, ?4, ?5)",
        params![
            record.user_id,
            record.display_name,
            tier_to_str(record.tier),
            record.requests_today,
            record.last_request_date.format("%Y-%m-%d").to_string()
        ],
    )
    .map_err(sql_error)?;
    Ok(())
}

impl SqliteStoreAdapter {
    pub fn from_config(config: &dyn ConfigPort) -> Result<Self, SahambotError> {
        let db_path =
            config
                .get_string("store", "path")
                .ok_or_else(|| SahambotError::ConfigMissing {
                    section: "store".into(),
                    key: "path".into(),
                })?;

        let pool_size = config.get_int("store", "pool_size", 4) as u32;

        let manager = SqliteConnectionManager::file(&db_path);
        let pool = Pool::builder()
            .max_size(pool_size)
            .build(manager)
            .map_err(pool_error)?;

        let adapter = Self { pool };
        adapter.initialize_schema()?;
        Ok(adapter)
    }

    /// Private in-memory database. Capped at one connection since every
    /// pooled connection would otherwise see its own empty database.
    pub fn in_memory() -> Result<Self, SahambotError> {
        let manager = SqliteConnectionManager::memory();
        let pool = Pool::builder()
            .max_size(1)
            .build(manager)
            .map_err(pool_error)?;

        let adapter = Self { pool };
        adapter.initialize_schema()?;
        Ok(adapter)
    }

    fn initialize_schema(&self) -> Result<(), SahambotError> {
        let conn = self.pool.get().map_err(pool_error)?;

        conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS users (
                user_id TEXT PRIMARY KEY,
                display_name TEXT NOT NULL,
                tier TEXT NOT NULL,
                requests_today INTEGER NOT NULL,
                last_request_date TEXT NOT NULL
            );",
        )
        .map_err(sql_error)
    }
}

impl UserStorePort for SqliteStoreAdapter {
    fn get(&self, user_id: &str) -> Result<Option<UserRecord>, SahambotError> {
        let conn = self.pool.get().map_err(pool_error)?;
        conn.query_row(SELECT_USER, params![user_id], row_to_record)
            .optional()
            .map_err(sql_error)
    }

    fn put(&self, record: &UserRecord) -> Result<(), SahambotError> {
        let conn = self.pool.get().map_err(pool_error)?;
        upsert(&conn, record)
    }

    fn update(
        &self,
        user_id: &str,
        apply: &mut dyn FnMut(Option<UserRecord>) -> UserRecord,
    ) -> Result<UserRecord, SahambotError> {
        let mut conn = self.pool.get().map_err(pool_error)?;
        let tx = conn
            .transaction_with_behavior(TransactionBehavior::Immediate)
            .map_err(sql_error)?;

        let existing = tx
            .query_row(SELECT_USER, params![user_id], row_to_record)
            .optional()
            .map_err(sql_error)?;

        let record = apply(existing);
        upsert(&tx, &record)?;
        tx.commit().map_err(sql_error)?;
        Ok(record)
    }

    fn count(&self) -> Result<usize, SahambotError> {
        let conn = self.pool.get().map_err(pool_error)?;
        let count: i64 = conn
            .query_row("SELECT COUNT(*) FROM users", [], |row| row.get(0))
            .map_err(sql_error)?;
        Ok(count as usize)
    }
}
