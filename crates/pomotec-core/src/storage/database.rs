//! SQLite-based session storage and statistics.
//!
//! Provides persistent storage for:
//! - Completed focus and break phases
//! - Session statistics (daily and all-time)
//! - Key-value store for the one-shot CLI's timer state

use std::path::Path;

use chrono::{DateTime, Duration, Local, SecondsFormat, TimeZone, Utc};
use rusqlite::{params, Connection, OptionalExtension};
use serde::{Deserialize, Serialize};

use super::data_dir;
use crate::error::{CoreError, DatabaseError};
use crate::timer::Phase;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionRecord {
    pub id: i64,
    pub phase: Phase,
    pub duration_min: u64,
    pub started_at: DateTime<Utc>,
    pub completed_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Stats {
    pub total_sessions: u64,
    pub completed_pomodoros: u64,
    pub total_focus_min: u64,
    pub total_break_min: u64,
}

/// SQLite database for session storage.
pub struct Database {
    conn: Connection,
}

impl Database {
    /// Open the database at `<data_dir>/pomotec.db`.
    ///
    /// Creates the database file and schema if they don't exist.
    pub fn open() -> Result<Self, CoreError> {
        let path = data_dir()?.join("pomotec.db");
        Ok(Self::open_at(&path)?)
    }

    pub fn open_at(path: &Path) -> Result<Self, DatabaseError> {
        let conn = Connection::open(path).map_err(|source| DatabaseError::OpenFailed {
            path: path.to_path_buf(),
            source,
        })?;
        let db = Self { conn };
        db.migrate()?;
        Ok(db)
    }

    /// Open an in-memory database (for tests).
    pub fn open_memory() -> Result<Self, DatabaseError> {
        let conn = Connection::open_in_memory()?;
        let db = Self { conn };
        db.migrate()?;
        Ok(db)
    }

    fn migrate(&self) -> Result<(), DatabaseError> {
        self.conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS sessions (
                id           INTEGER PRIMARY KEY AUTOINCREMENT,
                phase        TEXT NOT NULL,
                duration_min INTEGER NOT NULL,
                started_at   TEXT NOT NULL,
                completed_at TEXT NOT NULL
            );

            CREATE TABLE IF NOT EXISTS kv (
                key   TEXT PRIMARY KEY,
                value TEXT NOT NULL
            );

            CREATE INDEX IF NOT EXISTS idx_sessions_completed_at ON sessions(completed_at);",
        )?;
        Ok(())
    }

    /// Record a completed phase.
    pub fn record_session(
        &self,
        phase: Phase,
        duration_min: u64,
        completed_at: DateTime<Utc>,
    ) -> Result<i64, DatabaseError> {
        let started_at =
            completed_at - Duration::try_minutes(duration_min as i64).unwrap_or_default();
        self.conn.execute(
            "INSERT INTO sessions (phase, duration_min, started_at, completed_at)
             VALUES (?1, ?2, ?3, ?4)",
            params![
                phase.as_str(),
                duration_min,
                timestamp(started_at),
                timestamp(completed_at),
            ],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    /// Stats for sessions completed since local midnight.
    pub fn stats_today(&self) -> Result<Stats, DatabaseError> {
        let midnight = Local::now()
            .date_naive()
            .and_hms_opt(0, 0, 0)
            .and_then(|naive| Local.from_local_datetime(&naive).earliest())
            .map(|local| local.with_timezone(&Utc))
            .unwrap_or_else(Utc::now);
        self.stats_since(Some(midnight))
    }

    pub fn stats_all(&self) -> Result<Stats, DatabaseError> {
        self.stats_since(None)
    }

    fn stats_since(&self, since: Option<DateTime<Utc>>) -> Result<Stats, DatabaseError> {
        // RFC 3339 UTC strings sort chronologically.
        let since = since
            .map(timestamp)
            .unwrap_or_else(|| String::from("0000"));
        let mut stmt = self.conn.prepare(
            "SELECT phase, COUNT(*), COALESCE(SUM(duration_min), 0)
             FROM sessions WHERE completed_at >= ?1 GROUP BY phase",
        )?;
        let rows = stmt.query_map(params![since], |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, u64>(1)?,
                row.get::<_, u64>(2)?,
            ))
        })?;

        let mut stats = Stats::default();
        for row in rows {
            let (phase, count, minutes) = row?;
            stats.total_sessions += count;
            match phase.as_str() {
                "focus" => {
                    stats.completed_pomodoros += count;
                    stats.total_focus_min += minutes;
                }
                _ => stats.total_break_min += minutes,
            }
        }
        Ok(stats)
    }

    /// Most recent completed sessions, newest first.
    pub fn recent_sessions(&self, limit: usize) -> Result<Vec<SessionRecord>, DatabaseError> {
        let mut stmt = self.conn.prepare(
            "SELECT id, phase, duration_min, started_at, completed_at
             FROM sessions ORDER BY completed_at DESC, id DESC LIMIT ?1",
        )?;
        let rows = stmt.query_map(params![limit as i64], |row| {
            let phase: String = row.get(1)?;
            let started: String = row.get(3)?;
            let completed: String = row.get(4)?;
            Ok(SessionRecord {
                id: row.get(0)?,
                phase: if phase == "break" { Phase::Break } else { Phase::Focus },
                duration_min: row.get(2)?,
                started_at: parse_timestamp(&started),
                completed_at: parse_timestamp(&completed),
            })
        })?;
        Ok(rows.collect::<Result<Vec<_>, _>>()?)
    }

    pub fn kv_get(&self, key: &str) -> Result<Option<String>, DatabaseError> {
        Ok(self
            .conn
            .query_row("SELECT value FROM kv WHERE key = ?1", params![key], |row| {
                row.get(0)
            })
            .optional()?)
    }

    pub fn kv_set(&self, key: &str, value: &str) -> Result<(), DatabaseError> {
        self.conn.execute(
            "INSERT INTO kv (key, value) VALUES (?1, ?2)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value",
            params![key, value],
        )?;
        Ok(())
    }
}

/// Fixed-width UTC form so stored timestamps compare lexically.
fn timestamp(t: DateTime<Utc>) -> String {
    t.to_rfc3339_opts(SecondsFormat::Millis, true)
}

fn parse_timestamp(s: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(s)
        .map(|t| t.with_timezone(&Utc))
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_and_query() {
        let db = Database::open_memory().unwrap();
        let now = Utc::now();
        db.record_session(Phase::Focus, 25, now).unwrap();
        db.record_session(Phase::Break, 5, now).unwrap();
        db.record_session(Phase::Focus, 25, now).unwrap();

        let stats = db.stats_all().unwrap();
        assert_eq!(
            stats,
            Stats {
                total_sessions: 3,
                completed_pomodoros: 2,
                total_focus_min: 50,
                total_break_min: 5,
            }
        );
        assert_eq!(db.stats_today().unwrap().total_sessions, 3);
    }

    #[test]
    fn old_sessions_excluded_from_today() {
        let db = Database::open_memory().unwrap();
        db.record_session(Phase::Focus, 25, Utc::now() - Duration::days(3))
            .unwrap();
        assert_eq!(db.stats_today().unwrap().total_sessions, 0);
        assert_eq!(db.stats_all().unwrap().total_sessions, 1);
    }

    #[test]
    fn recent_sessions_newest_first() {
        let db = Database::open_memory().unwrap();
        let now = Utc::now();
        db.record_session(Phase::Focus, 25, now - Duration::minutes(30))
            .unwrap();
        db.record_session(Phase::Break, 5, now).unwrap();
        let recent = db.recent_sessions(10).unwrap();
        assert_eq!(recent.len(), 2);
        assert_eq!(recent[0].phase, Phase::Break);
        assert_eq!(recent[0].completed_at - recent[0].started_at, Duration::minutes(5));
    }

    #[test]
    fn kv_store() {
        let db = Database::open_memory().unwrap();
        assert_eq!(db.kv_get("foo").unwrap(), None);
        db.kv_set("foo", "bar").unwrap();
        assert_eq!(db.kv_get("foo").unwrap(), Some("bar".to_string()));
        db.kv_set("foo", "baz").unwrap();
        assert_eq!(db.kv_get("foo").unwrap(), Some("baz".to_string()));
    }

    #[test]
    fn open_at_creates_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("pomotec.db");
        let db = Database::open_at(&path).unwrap();
        db.kv_set("k", "v").unwrap();
        drop(db);
        let db = Database::open_at(&path).unwrap();
        assert_eq!(db.kv_get("k").unwrap().as_deref(), Some("v"));
    }
}
