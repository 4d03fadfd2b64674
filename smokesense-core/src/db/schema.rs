//! Database schema and migrations
//!
//! Uses SQLite with embedded migrations managed via PRAGMA user_version.

use rusqlite::Connection;

/// Current schema version
pub const SCHEMA_VERSION: i32 = 1;

/// SQL migrations, indexed by version number
const MIGRATIONS: &[&str] = &[
    // Version 1: logs and profiles
    r#"
    -- One row per user, never touched by resets
    CREATE TABLE IF NOT EXISTS profiles (
        user_id          TEXT PRIMARY KEY,
        display_name     TEXT,
        phase            TEXT NOT NULL DEFAULT 'awareness',
        daily_budget     INTEGER,
        unit_price       REAL,
        motivation_text  TEXT,
        motivation_image TEXT,
        disguise_enabled INTEGER NOT NULL DEFAULT 0,
        disguise_name    TEXT NOT NULL DEFAULT 'Notes',
        updated_at       TEXT NOT NULL
    );

    -- Append-only; rows leave only through bulk resets
    CREATE TABLE IF NOT EXISTS cigarette_logs (
        id               TEXT PRIMARY KEY,
        user_id          TEXT NOT NULL,
        logged_at        TEXT NOT NULL,
        mood             TEXT,
        activity         TEXT,
        location         TEXT,
        was_delayed      INTEGER NOT NULL DEFAULT 0,
        delay_seconds    INTEGER,
        notes            TEXT
    );

    CREATE INDEX IF NOT EXISTS idx_cigarette_logs_user_time
        ON cigarette_logs(user_id, logged_at);
    "#,
];

/// Run all pending migrations
pub fn run_migrations(conn: &Connection) -> crate::error::Result<()> {
    let current_version: i32 = conn
        .query_row("PRAGMA user_version", [], |r| r.get(0))
        .unwrap_or(0);

    tracing::info!(
        current_version,
        target_version = SCHEMA_VERSION,
        "Checking database migrations"
    );

    for (i, migration) in MIGRATIONS.iter().enumerate() {
        let version = (i + 1) as i32;
        if version > current_version {
            tracing::info!(version, "Running migration");
            conn.execute_batch(migration)?;
            conn.execute(&format!("PRAGMA user_version = {}", version), [])?;
        }
    }

    if current_version < SCHEMA_VERSION {
        tracing::info!(
            from = current_version,
            to = SCHEMA_VERSION,
            "Migrations complete"
        );
    }

    Ok(())
}

/// Get the current schema version from the database
pub fn get_schema_version(conn: &Connection) -> crate::error::Result<i32> {
    let version: i32 = conn.query_row("PRAGMA user_version", [], |r| r.get(0))?;
    Ok(version)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_migrations_idempotent() {
        let conn = Connection::open_in_memory().unwrap();

        run_migrations(&conn).unwrap();
        run_migrations(&conn).unwrap();

        let version = get_schema_version(&conn).unwrap();
        assert_eq!(version, SCHEMA_VERSION);
    }

    #[test]
    fn test_tables_created() {
        let conn = Connection::open_in_memory().unwrap();
        run_migrations(&conn).unwrap();

        for table in ["profiles", "cigarette_logs"] {
            let exists: i32 = conn
                .query_row(
                    "SELECT COUNT(*) FROM sqlite_master WHERE type='table' AND name=?",
                    [table],
                    |r| r.get(0),
                )
                .unwrap();
            assert_eq!(exists, 1, "Table {} should exist", table);
        }
    }
}
