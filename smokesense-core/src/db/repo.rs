//! Database repository layer
//!
//! Provides query and insert operations for logs and profiles, and
//! broadcasts a [`LogChange`] to subscribers after every write to the log
//! table.

use crate::error::Result;
use crate::types::{Category, Phase, Profile, SmokeLog};
use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::path::PathBuf;
use std::str::FromStr;
use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::{Mutex, MutexGuard, PoisonError};

/// Change to a user's logs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogChange {
    Inserted { user_id: String, log_id: String },
    Deleted { user_id: String, count: usize },
}

impl LogChange {
    pub fn user_id(&self) -> &str {
        match self {
            LogChange::Inserted { user_id, .. } | LogChange::Deleted { user_id, .. } => user_id,
        }
    }
}

/// Time range for listing logs. Both bounds are inclusive.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogFilter {
    pub since: Option<DateTime<Utc>>,
    pub until: Option<DateTime<Utc>>,
}

impl LogFilter {
    pub fn since(since: DateTime<Utc>) -> Self {
        Self {
            since: Some(since),
            until: None,
        }
    }

    fn is_unbounded(&self) -> bool {
        self.since.is_none() && self.until.is_none()
    }

    /// Whether `log` falls in range. Unparseable timestamps only match an
    /// unbounded filter.
    fn matches(&self, log: &SmokeLog) -> bool {
        if self.is_unbounded() {
            return true;
        }
        let Some(ts) = log.occurred_at() else {
            return false;
        };
        self.since.map_or(true, |since| ts >= since) && self.until.map_or(true, |until| ts <= until)
    }
}

/// Database handle (single connection)
pub struct Database {
    conn: Mutex<Connection>,
    subscribers: Mutex<Vec<Sender<LogChange>>>,
}

impl Database {
    /// Open or create a database at the given path
    pub fn open(path: &PathBuf) -> Result<Self> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let conn = Connection::open(path)?;

        conn.execute_batch(
            "
            PRAGMA foreign_keys = ON;
            PRAGMA journal_mode = WAL;
            PRAGMA synchronous = NORMAL;
            ",
        )?;

        tracing::debug!(path = %path.display(), "Opened database");
        Ok(Self::with_connection(conn))
    }

    /// Open an in-memory database (for testing)
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        conn.execute("PRAGMA foreign_keys = ON", [])?;
        Ok(Self::with_connection(conn))
    }

    fn with_connection(conn: Connection) -> Self {
        Self {
            conn: Mutex::new(conn),
            subscribers: Mutex::new(Vec::new()),
        }
    }

    /// Run migrations on this database
    pub fn migrate(&self) -> Result<()> {
        let conn = self.conn();
        super::schema::run_migrations(&conn)
    }

    /// Lock the connection, recovering it from a poisoned mutex.
    fn conn(&self) -> MutexGuard<'_, Connection> {
        self.conn.lock().unwrap_or_else(PoisonError::into_inner)
    }

    // ============================================
    // Change notifications
    // ============================================

    /// Receive a [`LogChange`] after every insert or delete.
    pub fn subscribe(&self) -> Receiver<LogChange> {
        let (tx, rx) = mpsc::channel();
        self.subscribers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(tx);
        rx
    }

    fn notify(&self, change: LogChange) {
        let mut subscribers = self
            .subscribers
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        // Dropped receivers are pruned
        subscribers.retain(|tx| tx.send(change.clone()).is_ok());
        tracing::debug!(?change, subscribers = subscribers.len(), "Published log change");
    }

    // ============================================
    // Log operations
    // ============================================

    /// Append a log
    pub fn insert_log(&self, log: &SmokeLog) -> Result<()> {
        let conn = self.conn();
        conn.execute(
            r#"
            INSERT INTO cigarette_logs
                (id, user_id, logged_at, mood, activity, location, was_delayed, delay_seconds, notes)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
            "#,
            params![
                log.id,
                log.user_id,
                log.logged_at,
                log.mood.map(|m| m.as_str()),
                log.activity.map(|a| a.as_str()),
                log.location.map(|l| l.as_str()),
                log.was_delayed,
                log.delay_seconds,
                log.notes,
            ],
        )?;
        drop(conn);

        tracing::info!(log_id = %log.id, user_id = %log.user_id, "Recorded log");
        self.notify(LogChange::Inserted {
            user_id: log.user_id.clone(),
            log_id: log.id.clone(),
        });
        Ok(())
    }

    /// List a user's logs in range, oldest first
    pub fn list_logs(&self, user_id: &str, filter: &LogFilter) -> Result<Vec<SmokeLog>> {
        let conn = self.conn();
        let mut stmt = conn.prepare(
            "SELECT * FROM cigarette_logs WHERE user_id = ? ORDER BY logged_at ASC, id ASC",
        )?;
        let logs = stmt
            .query_map([user_id], Self::row_to_log)?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        Ok(logs.into_iter().filter(|log| filter.matches(log)).collect())
    }

    /// Most recent log with a valid timestamp
    pub fn latest_log(&self, user_id: &str) -> Result<Option<SmokeLog>> {
        let logs = self.list_logs(user_id, &LogFilter::default())?;
        Ok(logs
            .into_iter()
            .filter_map(|log| log.occurred_at().map(|ts| (ts, log)))
            .max_by_key(|(ts, _)| *ts)
            .map(|(_, log)| log))
    }

    /// Count all logs for a user
    pub fn count_logs(&self, user_id: &str) -> Result<usize> {
        let conn = self.conn();
        let count: i64 = conn.query_row(
            "SELECT COUNT(*) FROM cigarette_logs WHERE user_id = ?",
            [user_id],
            |r| r.get(0),
        )?;
        Ok(count as usize)
    }

    /// Delete every log for a user. The profile is kept.
    pub fn delete_all_logs(&self, user_id: &str) -> Result<usize> {
        let conn = self.conn();
        let count = conn.execute("DELETE FROM cigarette_logs WHERE user_id = ?", [user_id])?;
        drop(conn);

        tracing::info!(user_id, count, "Deleted all logs");
        self.notify(LogChange::Deleted {
            user_id: user_id.to_string(),
            count,
        });
        Ok(count)
    }

    /// Delete a user's logs at or after `since`
    pub fn delete_logs_since(&self, user_id: &str, since: DateTime<Utc>) -> Result<usize> {
        let doomed: Vec<String> = self
            .list_logs(user_id, &LogFilter::since(since))?
            .into_iter()
            .map(|log| log.id)
            .collect();

        let mut conn = self.conn();
        let tx = conn.transaction()?;
        {
            let mut stmt = tx.prepare("DELETE FROM cigarette_logs WHERE id = ?")?;
            for id in &doomed {
                stmt.execute([id])?;
            }
        }
        tx.commit()?;
        drop(conn);

        let count = doomed.len();
        tracing::info!(user_id, count, since = %since, "Deleted logs");
        self.notify(LogChange::Deleted {
            user_id: user_id.to_string(),
            count,
        });
        Ok(count)
    }

    fn row_to_log(row: &Row) -> rusqlite::Result<SmokeLog> {
        let delay_seconds: Option<i64> = row.get("delay_seconds")?;
        Ok(SmokeLog {
            id: row.get("id")?,
            user_id: row.get("user_id")?,
            logged_at: row.get("logged_at")?,
            mood: parse_tag("mood", row.get("mood")?),
            activity: parse_tag("activity", row.get("activity")?),
            location: parse_tag("location", row.get("location")?),
            was_delayed: row.get("was_delayed")?,
            delay_seconds,
            notes: row.get("notes")?,
        })
    }

    // ============================================
    // Profile operations
    // ============================================

    /// Get a user's profile
    pub fn get_profile(&self, user_id: &str) -> Result<Option<Profile>> {
        let conn = self.conn();
        Ok(conn
            .query_row(
                "SELECT * FROM profiles WHERE user_id = ?",
                [user_id],
                Self::row_to_profile,
            )
            .optional()?)
    }

    /// Insert or update a profile
    pub fn save_profile(&self, profile: &Profile) -> Result<()> {
        let conn = self.conn();
        conn.execute(
            r#"
            INSERT INTO profiles (
                user_id, display_name, phase, daily_budget, unit_price,
                motivation_text, motivation_image, disguise_enabled, disguise_name, updated_at
            )
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)
            ON CONFLICT(user_id) DO UPDATE SET
                display_name = excluded.display_name,
                phase = excluded.phase,
                daily_budget = excluded.daily_budget,
                unit_price = excluded.unit_price,
                motivation_text = excluded.motivation_text,
                motivation_image = excluded.motivation_image,
                disguise_enabled = excluded.disguise_enabled,
                disguise_name = excluded.disguise_name,
                updated_at = excluded.updated_at
            "#,
            params![
                profile.user_id,
                profile.display_name,
                profile.phase.as_str(),
                profile.daily_budget,
                profile.unit_price,
                profile.motivation_text,
                profile.motivation_image,
                profile.disguise_enabled,
                profile.disguise_name,
                Utc::now().to_rfc3339(),
            ],
        )?;
        tracing::info!(user_id = %profile.user_id, "Saved profile");
        Ok(())
    }

    fn row_to_profile(row: &Row) -> rusqlite::Result<Profile> {
        let phase_str: String = row.get("phase")?;
        let budget: Option<i64> = row.get("daily_budget")?;

        Ok(Profile {
            user_id: row.get("user_id")?,
            display_name: row.get("display_name")?,
            phase: parse_tag::<Phase>("phase", Some(phase_str)).unwrap_or_default(),
            daily_budget: budget.and_then(|b| u32::try_from(b).ok()),
            unit_price: row.get("unit_price")?,
            motivation_text: row.get("motivation_text")?,
            motivation_image: row.get("motivation_image")?,
            disguise_enabled: row.get("disguise_enabled")?,
            disguise_name: row.get("disguise_name")?,
        })
    }
}

/// Parse a stored identifier, dropping values this build does not know.
fn parse_tag<T: FromStr>(column: &'static str, value: Option<String>) -> Option<T> {
    let value = value?;
    match value.parse() {
        Ok(parsed) => Some(parsed),
        Err(_) => {
            tracing::warn!(column, value = %value, "Ignoring unknown stored value");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Activity, Location, Mood};
    use chrono::{Duration, TimeZone};

    fn test_db() -> Database {
        let db = Database::open_in_memory().unwrap();
        db.migrate().unwrap();
        db
    }

    fn at(h: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 5, 1, h, 0, 0).unwrap()
    }

    #[test]
    fn test_insert_and_list_logs() {
        let db = test_db();
        let log = SmokeLog::new("u1", at(9))
            .with_mood(Mood::Stressed)
            .with_activity(Activity::Work)
            .with_location(Location::Work)
            .with_delay(120);
        db.insert_log(&log).unwrap();
        db.insert_log(&SmokeLog::new("u1", at(7))).unwrap();
        db.insert_log(&SmokeLog::new("u2", at(8))).unwrap();

        let logs = db.list_logs("u1", &LogFilter::default()).unwrap();
        assert_eq!(logs.len(), 2);
        assert_eq!(logs[1], log);
        assert!(logs[0].occurred_at().unwrap() < logs[1].occurred_at().unwrap());
        assert_eq!(db.count_logs("u2").unwrap(), 1);
    }

    #[test]
    fn test_list_logs_in_range() {
        let db = test_db();
        for h in [6, 9, 12, 15] {
            db.insert_log(&SmokeLog::new("u1", at(h))).unwrap();
        }
        let filter = LogFilter {
            since: Some(at(9)),
            until: Some(at(12)),
        };
        let logs = db.list_logs("u1", &filter).unwrap();
        assert_eq!(logs.len(), 2);
    }

    #[test]
    fn test_unknown_tags_and_bad_timestamps_survive_reads() {
        let db = test_db();
        db.connection_for_test()
            .execute(
                "INSERT INTO cigarette_logs (id, user_id, logged_at, mood, location)
                 VALUES ('x', 'u1', 'not a time', 'ecstatic', 'car')",
                [],
            )
            .unwrap();
        db.insert_log(&SmokeLog::new("u1", at(10))).unwrap();

        let logs = db.list_logs("u1", &LogFilter::default()).unwrap();
        assert_eq!(logs.len(), 2);
        let odd = logs.iter().find(|l| l.id == "x").unwrap();
        assert_eq!(odd.mood, None);
        assert_eq!(odd.location, Some(Location::Car));

        // Bounded queries skip the unparseable row
        assert_eq!(db.list_logs("u1", &LogFilter::since(at(0))).unwrap().len(), 1);
        assert_eq!(
            db.latest_log("u1").unwrap().unwrap().occurred_at(),
            Some(at(10))
        );
    }

    #[test]
    fn test_delete_logs_since_keeps_older() {
        let db = test_db();
        for h in [1, 5, 10, 20] {
            db.insert_log(&SmokeLog::new("u1", at(h))).unwrap();
        }
        db.insert_log(&SmokeLog::new("u2", at(21))).unwrap();

        assert_eq!(db.delete_logs_since("u1", at(10)).unwrap(), 2);
        assert_eq!(db.count_logs("u1").unwrap(), 2);
        assert_eq!(db.count_logs("u2").unwrap(), 1);
    }

    #[test]
    fn test_reset_keeps_profile() {
        let db = test_db();
        let mut profile = Profile::new("u1");
        profile.daily_budget = Some(5);
        db.save_profile(&profile).unwrap();
        db.insert_log(&SmokeLog::new("u1", at(3))).unwrap();

        assert_eq!(db.delete_all_logs("u1").unwrap(), 1);
        assert!(db.latest_log("u1").unwrap().is_none());
        assert_eq!(db.get_profile("u1").unwrap(), Some(profile));
    }

    #[test]
    fn test_profile_upsert() {
        let db = test_db();
        assert!(db.get_profile("u1").unwrap().is_none());

        let mut profile = Profile::new("u1");
        db.save_profile(&profile).unwrap();

        profile.display_name = Some("Sam".to_string());
        profile.phase = Phase::Control;
        profile.unit_price = Some(18.0);
        profile.disguise_enabled = true;
        db.save_profile(&profile).unwrap();

        let stored = db.get_profile("u1").unwrap().unwrap();
        assert_eq!(stored, profile);
        assert_eq!(stored.disguise_name, "Notes");
    }

    #[test]
    fn test_subscribers_see_every_change() {
        let db = test_db();
        let rx = db.subscribe();
        let dropped = db.subscribe();
        drop(dropped);

        let log = SmokeLog::new("u1", Utc::now() - Duration::minutes(1));
        db.insert_log(&log).unwrap();
        db.delete_all_logs("u1").unwrap();

        assert_eq!(
            rx.try_recv().unwrap(),
            LogChange::Inserted {
                user_id: "u1".to_string(),
                log_id: log.id.clone()
            }
        );
        let deleted = rx.try_recv().unwrap();
        assert_eq!(deleted.user_id(), "u1");
        assert_eq!(
            deleted,
            LogChange::Deleted {
                user_id: "u1".to_string(),
                count: 1
            }
        );
        assert!(rx.try_recv().is_err());
    }

    impl Database {
        fn connection_for_test(&self) -> MutexGuard<'_, Connection> {
            self.conn()
        }
    }
}
