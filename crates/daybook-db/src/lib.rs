//! Storage layer for the daybook record keeper.
//!
//! Provides persistence for expense records and training sessions using
//! `rusqlite`. Each variant app owns an independent store with its own
//! versioned schema: [`ExpenseStore`] and [`TrainingStore`].
//!
//! # Thread Safety
//!
//! Both store types wrap a `rusqlite::Connection`, which is `Send` but not
//! `Sync`. A store can be moved between threads but not shared without
//! external synchronization. The expected usage is a single logical session
//! issuing one operation at a time and awaiting completion before the next
//! dependent call.
//!
//! # Schema
//!
//! ## Calendar dates
//!
//! Record dates are stored as TEXT in canonical `YYYY-MM-DD` form with no
//! time component. Lexicographic ordering matches chronological ordering,
//! and this form is the only one read or written by date-indexed queries.
//!
//! ## Row timestamps
//!
//! `created_at`/`updated_at` are stored as TEXT in ISO 8601 UTC form
//! (e.g. `2025-03-09T10:30:00.000Z`). The store stamps them itself from an
//! injected [`Clock`], so tests can pin time.
//!
//! ## Versioning
//!
//! Each store tracks its schema version in `PRAGMA user_version`.
//! Migrations are additive, run at most once per version bump, and are
//! idempotent when replayed against an already-migrated store.

mod expense;
mod training;

use chrono::{DateTime, SecondsFormat, Utc};
use rusqlite::Connection;
use thiserror::Error;

pub use expense::ExpenseStore;
pub use training::TrainingStore;

/// Storage errors.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The underlying store cannot be opened or written (missing file
    /// permissions, exhausted disk, read-only volume). Distinct from other
    /// SQLite failures so callers can tell "storage is gone" apart from a
    /// bad query.
    #[error("storage unavailable: {0}")]
    Unavailable(#[source] rusqlite::Error),

    /// Any other error from the underlying database.
    #[error("sqlite error: {0}")]
    Sqlite(#[source] rusqlite::Error),

    /// A stored row could not be decoded into a record.
    #[error("invalid stored record {id}: {message}")]
    InvalidRecord { id: i64, message: String },

    /// A record field could not be encoded for storage.
    #[error("failed to encode record data: {0}")]
    Encode(#[from] serde_json::Error),
}

impl From<rusqlite::Error> for StoreError {
    fn from(err: rusqlite::Error) -> Self {
        use rusqlite::ErrorCode::{CannotOpen, DiskFull, PermissionDenied, ReadOnly};
        match &err {
            rusqlite::Error::SqliteFailure(failure, _)
                if matches!(
                    failure.code,
                    CannotOpen | DiskFull | PermissionDenied | ReadOnly
                ) =>
            {
                Self::Unavailable(err)
            }
            _ => Self::Sqlite(err),
        }
    }
}

/// Source of "now" for store-stamped timestamps.
///
/// Injected so inserts and updates are deterministic under test.
pub trait Clock {
    fn now(&self) -> DateTime<Utc>;
}

/// The wall clock. Default for stores opened without an explicit clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

pub(crate) fn format_timestamp(timestamp: DateTime<Utc>) -> String {
    timestamp.to_rfc3339_opts(SecondsFormat::Millis, true)
}

pub(crate) fn parse_timestamp(text: &str) -> Result<DateTime<Utc>, chrono::ParseError> {
    DateTime::parse_from_rfc3339(text).map(|parsed| parsed.with_timezone(&Utc))
}

/// One additive schema step. `sql` must be idempotent (`IF NOT EXISTS`).
pub(crate) struct Migration {
    pub version: i32,
    pub sql: &'static str,
}

/// Applies every migration newer than the store's current version, each in
/// its own transaction so a failed step leaves the version untouched.
pub(crate) fn run_migrations(
    conn: &Connection,
    migrations: &[Migration],
) -> Result<(), StoreError> {
    let current: i64 = conn.query_row("PRAGMA user_version", [], |row| row.get(0))?;
    for migration in migrations {
        if i64::from(migration.version) <= current {
            continue;
        }
        tracing::debug!(version = migration.version, "applying schema migration");
        let tx = conn.unchecked_transaction()?;
        tx.execute_batch(migration.sql)?;
        tx.pragma_update(None, "user_version", migration.version)?;
        tx.commit()?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn open_failure_maps_to_unavailable() {
        let result = Connection::open("/definitely/not/a/real/dir/daybook.db")
            .map_err(StoreError::from);
        match result {
            Err(StoreError::Unavailable(_)) => {}
            other => panic!("expected Unavailable, got {other:?}"),
        }
    }

    #[test]
    fn timestamp_roundtrip_keeps_millis() {
        let now = parse_timestamp("2025-03-09T10:30:00.125Z").expect("valid timestamp");
        assert_eq!(format_timestamp(now), "2025-03-09T10:30:00.125Z");
    }

    #[test]
    fn migrations_run_once_and_replay_safely() {
        const MIGRATIONS: &[Migration] = &[
            Migration {
                version: 1,
                sql: "CREATE TABLE IF NOT EXISTS demo (id INTEGER PRIMARY KEY, name TEXT);",
            },
            Migration {
                version: 2,
                sql: "CREATE TABLE IF NOT EXISTS demo_extra (id INTEGER PRIMARY KEY);",
            },
        ];

        let conn = Connection::open_in_memory().expect("open in-memory db");
        run_migrations(&conn, MIGRATIONS).expect("first run");
        conn.execute("INSERT INTO demo (name) VALUES ('kept')", [])
            .expect("insert");

        run_migrations(&conn, MIGRATIONS).expect("second run");
        let version: i64 = conn
            .query_row("PRAGMA user_version", [], |row| row.get(0))
            .unwrap();
        assert_eq!(version, 2);
        let count: i64 = conn
            .query_row("SELECT COUNT(*) FROM demo", [], |row| row.get(0))
            .unwrap();
        assert_eq!(count, 1);
    }
}
