//! The training session store, with a secondary index on the session date.

use std::path::Path;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use rusqlite::{Connection, OptionalExtension, params};

use daybook_core::dates::{format_date, parse_date};
use daybook_core::session::{SessionDetails, TrainingSession};
use daybook_core::{CustomMetric, TrainingKind};

use crate::{Clock, Migration, StoreError, SystemClock, format_timestamp, parse_timestamp,
            run_migrations};

const MIGRATIONS: &[Migration] = &[Migration {
    version: 1,
    sql: "
    CREATE TABLE IF NOT EXISTS sessions (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        date TEXT NOT NULL,
        type TEXT NOT NULL,
        title TEXT NOT NULL,
        focus_area TEXT,
        series INTEGER,
        reps_per_series INTEGER,
        rep_times TEXT NOT NULL DEFAULT '[]',
        recovery_time REAL,
        distance_segments TEXT,
        distance_per_rep REAL,
        distance_unit TEXT,
        weight_per_rep REAL,
        weight_unit TEXT,
        custom_metrics TEXT NOT NULL DEFAULT '[]',
        notes TEXT,
        created_at TEXT NOT NULL,
        updated_at TEXT NOT NULL
    );

    CREATE INDEX IF NOT EXISTS idx_sessions_date ON sessions(date);
    ",
}];

/// Persistent store for the training variant.
///
/// Timestamps are stamped from the injected [`Clock`]: `created_at` only on
/// a true insert, `updated_at` on every write.
pub struct TrainingStore {
    conn: Connection,
    clock: Box<dyn Clock>,
}

impl TrainingStore {
    /// Opens (and migrates) the store at the given path, creating it if
    /// necessary. Timestamps come from the system clock.
    pub fn open(path: &Path) -> Result<Self, StoreError> {
        Self::open_with_clock(path, Box::new(SystemClock))
    }

    /// Opens the store with an explicit clock.
    pub fn open_with_clock(path: &Path, clock: Box<dyn Clock>) -> Result<Self, StoreError> {
        Self::from_connection(Connection::open(path)?, clock)
    }

    /// Opens an in-memory store. Useful for testing.
    pub fn open_in_memory() -> Result<Self, StoreError> {
        Self::from_connection(Connection::open_in_memory()?, Box::new(SystemClock))
    }

    /// Opens an in-memory store with an explicit clock.
    pub fn open_in_memory_with_clock(clock: Box<dyn Clock>) -> Result<Self, StoreError> {
        Self::from_connection(Connection::open_in_memory()?, clock)
    }

    fn from_connection(conn: Connection, clock: Box<dyn Clock>) -> Result<Self, StoreError> {
        run_migrations(&conn, MIGRATIONS)?;
        Ok(Self { conn, clock })
    }

    /// Inserts the session when it has no id, otherwise overwrites the
    /// session at that id.
    ///
    /// `created_at` is taken from the incoming session when present, from
    /// the previously stored row otherwise, and defaults to "now" only on a
    /// true insert. `updated_at` is always "now". The row write and the
    /// date-index update happen in one transaction, so a failed put leaves
    /// no half-updated index.
    pub fn put(&mut self, session: &TrainingSession) -> Result<TrainingSession, StoreError> {
        let now = self.clock.now();
        let tx = self.conn.transaction()?;

        let stored_created: Option<String> = match session.id {
            Some(id) => tx
                .query_row(
                    "SELECT created_at FROM sessions WHERE id = ?1",
                    [id],
                    |row| row.get(0),
                )
                .optional()?,
            None => None,
        };
        let created_at = resolve_created_at(session, stored_created.as_deref(), now)?;

        let rep_times = serde_json::to_string(&session.rep_times)?;
        let custom_metrics = serde_json::to_string(&session.custom_metrics)?;
        let (distance_segments, distance_per_rep, distance_unit, weight_per_rep, weight_unit) =
            match &session.details {
                SessionDetails::Running {
                    distance_segments,
                    distance_per_rep,
                    distance_unit,
                } => (
                    Some(serde_json::to_string(distance_segments)?),
                    *distance_per_rep,
                    Some(distance_unit.as_str()),
                    None,
                    None,
                ),
                SessionDetails::Gym {
                    weight_per_rep,
                    weight_unit,
                } => (None, None, None, *weight_per_rep, Some(weight_unit.as_str())),
            };

        tx.execute(
            "
            INSERT OR REPLACE INTO sessions
            (id, date, type, title, focus_area, series, reps_per_series, rep_times,
             recovery_time, distance_segments, distance_per_rep, distance_unit,
             weight_per_rep, weight_unit, custom_metrics, notes, created_at, updated_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16, ?17, ?18)
            ",
            params![
                session.id,
                format_date(session.date),
                session.kind().as_str(),
                session.title,
                session.focus_area,
                session.series,
                session.reps_per_series,
                rep_times,
                session.recovery_time,
                distance_segments,
                distance_per_rep,
                distance_unit,
                weight_per_rep,
                weight_unit,
                custom_metrics,
                session.notes,
                format_timestamp(created_at),
                format_timestamp(now),
            ],
        )?;
        let id = match session.id {
            Some(id) => id,
            None => tx.last_insert_rowid(),
        };
        tx.commit()?;

        Ok(TrainingSession {
            id: Some(id),
            created_at: Some(created_at),
            updated_at: Some(now),
            ..session.clone()
        })
    }

    /// Lists every session ordered by (date, creation time, id).
    pub fn get_all(&self) -> Result<Vec<TrainingSession>, StoreError> {
        self.query_sessions(
            "
            SELECT id, date, type, title, focus_area, series, reps_per_series, rep_times,
                   recovery_time, distance_segments, distance_per_rep, distance_unit,
                   weight_per_rep, weight_unit, custom_metrics, notes, created_at, updated_at
            FROM sessions
            ORDER BY date ASC, created_at ASC, id ASC
            ",
            [],
        )
    }

    /// Lists the sessions on exactly `date`, in `get_all` order.
    ///
    /// Served from the secondary index on the date column, which SQLite
    /// keeps consistent with the row data on every write.
    pub fn get_by_date(&self, date: NaiveDate) -> Result<Vec<TrainingSession>, StoreError> {
        self.query_sessions(
            "
            SELECT id, date, type, title, focus_area, series, reps_per_series, rep_times,
                   recovery_time, distance_segments, distance_per_rep, distance_unit,
                   weight_per_rep, weight_unit, custom_metrics, notes, created_at, updated_at
            FROM sessions
            WHERE date = ?1
            ORDER BY date ASC, created_at ASC, id ASC
            ",
            [format_date(date)],
        )
    }

    /// Removes the session. Deleting an id that does not exist is a no-op.
    pub fn delete(&mut self, id: i64) -> Result<(), StoreError> {
        self.conn
            .execute("DELETE FROM sessions WHERE id = ?1", [id])?;
        Ok(())
    }

    fn query_sessions<P: rusqlite::Params>(
        &self,
        sql: &str,
        params: P,
    ) -> Result<Vec<TrainingSession>, StoreError> {
        let mut stmt = self.conn.prepare(sql)?;
        let rows = stmt.query_map(params, |row| {
            Ok(SessionRow {
                id: row.get(0)?,
                date: row.get(1)?,
                kind: row.get(2)?,
                title: row.get(3)?,
                focus_area: row.get(4)?,
                series: row.get(5)?,
                reps_per_series: row.get(6)?,
                rep_times: row.get(7)?,
                recovery_time: row.get(8)?,
                distance_segments: row.get(9)?,
                distance_per_rep: row.get(10)?,
                distance_unit: row.get(11)?,
                weight_per_rep: row.get(12)?,
                weight_unit: row.get(13)?,
                custom_metrics: row.get(14)?,
                notes: row.get(15)?,
                created_at: row.get(16)?,
                updated_at: row.get(17)?,
            })
        })?;

        let mut sessions = Vec::new();
        for row in rows {
            sessions.push(row?.into_session()?);
        }
        Ok(sessions)
    }
}

/// Raw row shape, converted to a domain record in a second step so decode
/// failures can name the offending row.
struct SessionRow {
    id: i64,
    date: String,
    kind: String,
    title: String,
    focus_area: Option<String>,
    series: Option<u32>,
    reps_per_series: Option<u32>,
    rep_times: Option<String>,
    recovery_time: Option<f64>,
    distance_segments: Option<String>,
    distance_per_rep: Option<f64>,
    distance_unit: Option<String>,
    weight_per_rep: Option<f64>,
    weight_unit: Option<String>,
    custom_metrics: Option<String>,
    notes: Option<String>,
    created_at: String,
    updated_at: String,
}

impl SessionRow {
    fn into_session(self) -> Result<TrainingSession, StoreError> {
        let id = self.id;
        let date = parse_date(&self.date).ok_or_else(|| StoreError::InvalidRecord {
            id,
            message: format!("malformed date {}", self.date),
        })?;
        let kind =
            TrainingKind::from_str(&self.kind).map_err(|_| StoreError::InvalidRecord {
                id,
                message: format!("unknown training type {}", self.kind),
            })?;
        let created_at = row_timestamp(id, "created_at", &self.created_at)?;
        let updated_at = row_timestamp(id, "updated_at", &self.updated_at)?;

        let details = match kind {
            TrainingKind::Running => SessionDetails::Running {
                distance_segments: decode_json_list(id, "distance_segments", self.distance_segments),
                distance_per_rep: self.distance_per_rep,
                distance_unit: decode_unit(id, self.distance_unit),
            },
            TrainingKind::Gym => SessionDetails::Gym {
                weight_per_rep: self.weight_per_rep,
                weight_unit: decode_unit(id, self.weight_unit),
            },
        };

        Ok(TrainingSession {
            id: Some(id),
            date,
            title: self.title,
            focus_area: self.focus_area,
            series: self.series,
            reps_per_series: self.reps_per_series,
            rep_times: decode_json_list(id, "rep_times", self.rep_times),
            recovery_time: self.recovery_time,
            details,
            custom_metrics: decode_metrics(id, self.custom_metrics),
            notes: self.notes,
            created_at: Some(created_at),
            updated_at: Some(updated_at),
        })
    }
}

fn resolve_created_at(
    session: &TrainingSession,
    stored: Option<&str>,
    now: DateTime<Utc>,
) -> Result<DateTime<Utc>, StoreError> {
    if let Some(created_at) = session.created_at {
        return Ok(created_at);
    }
    match stored {
        Some(text) => row_timestamp(session.id.unwrap_or_default(), "created_at", text),
        None => Ok(now),
    }
}

fn row_timestamp(id: i64, column: &str, text: &str) -> Result<DateTime<Utc>, StoreError> {
    parse_timestamp(text).map_err(|err| StoreError::InvalidRecord {
        id,
        message: format!("malformed {column} {text}: {err}"),
    })
}

/// Decodes a JSON number-list column. A malformed value is treated as empty
/// so reads stay total; the row is reported once via the log.
fn decode_json_list(id: i64, column: &str, raw: Option<String>) -> Vec<f64> {
    let Some(raw) = raw else {
        return Vec::new();
    };
    match serde_json::from_str(&raw) {
        Ok(values) => values,
        Err(err) => {
            tracing::warn!(id, column, error = %err, "skipping malformed list column");
            Vec::new()
        }
    }
}

fn decode_metrics(id: i64, raw: Option<String>) -> Vec<CustomMetric> {
    let Some(raw) = raw else {
        return Vec::new();
    };
    match serde_json::from_str(&raw) {
        Ok(metrics) => metrics,
        Err(err) => {
            tracing::warn!(id, error = %err, "skipping malformed custom metrics");
            Vec::new()
        }
    }
}

/// Decodes a unit column, falling back to the unit's default when the stored
/// string is missing or unknown.
fn decode_unit<U>(id: i64, raw: Option<String>) -> U
where
    U: Default + FromStr,
{
    raw.and_then(|text| match text.parse() {
        Ok(unit) => Some(unit),
        Err(_) => {
            tracing::warn!(id, unit = %text, "unknown stored unit, using default");
            None
        }
    })
    .unwrap_or_default()
}
