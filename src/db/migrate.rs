//! Versioned schema migrations, tracked through `PRAGMA user_version`.

use crate::errors::{AppError, AppResult};
use rusqlite::Connection;

struct Migration {
    version: i32,
    name: &'static str,
    sql: &'static str,
}

const MIGRATIONS: &[Migration] = &[
    Migration {
        version: 1,
        name: "create drivers table",
        sql: r#"
        CREATE TABLE IF NOT EXISTS drivers (
            id          TEXT PRIMARY KEY NOT NULL,
            full_name   TEXT NOT NULL,
            data        TEXT NOT NULL,
            updated_at  TEXT NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_drivers_full_name ON drivers(full_name);
        "#,
    },
    Migration {
        version: 2,
        name: "create users and sessions tables",
        sql: r#"
        CREATE TABLE IF NOT EXISTS users (
            email          TEXT PRIMARY KEY NOT NULL,
            password_hash  TEXT NOT NULL,
            created_at     TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS sessions (
            token       TEXT PRIMARY KEY NOT NULL,
            email       TEXT NOT NULL REFERENCES users(email) ON DELETE CASCADE,
            created_at  TEXT NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_sessions_email ON sessions(email);
        "#,
    },
];

/// Current schema version of the connected database.
pub fn schema_version(conn: &Connection) -> AppResult<i32> {
    let v: i32 = conn.query_row("PRAGMA user_version", [], |row| row.get(0))?;
    Ok(v)
}

/// Latest schema version this build knows about.
pub fn latest_version() -> i32 {
    MIGRATIONS.last().map(|m| m.version).unwrap_or(0)
}

/// Public entry point: run all pending migrations, each in its own
/// transaction. Returns the number of migrations applied.
pub fn run_pending_migrations(conn: &Connection) -> AppResult<usize> {
    let current = schema_version(conn)?;

    if current > latest_version() {
        return Err(AppError::Migration(format!(
            "database schema v{current} is newer than this build (v{})",
            latest_version()
        )));
    }

    let mut applied = 0;
    for m in MIGRATIONS.iter().filter(|m| m.version > current) {
        let batch = format!(
            "BEGIN;\n{}\nPRAGMA user_version = {};\nCOMMIT;",
            m.sql, m.version
        );

        if let Err(e) = conn.execute_batch(&batch) {
            let _ = conn.execute_batch("ROLLBACK;");
            return Err(AppError::Migration(format!(
                "v{} ({}) failed: {e}",
                m.version, m.name
            )));
        }

        log::info!("migration applied: v{} {}", m.version, m.name);
        applied += 1;
    }

    Ok(applied)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn migrations_are_idempotent() {
        let conn = Connection::open_in_memory().unwrap();
        assert_eq!(run_pending_migrations(&conn).unwrap(), MIGRATIONS.len());
        assert_eq!(run_pending_migrations(&conn).unwrap(), 0);
        assert_eq!(schema_version(&conn).unwrap(), latest_version());
    }

    #[test]
    fn newer_schema_is_rejected() {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch("PRAGMA user_version = 99;").unwrap();
        assert!(matches!(
            run_pending_migrations(&conn),
            Err(AppError::Migration(_))
        ));
    }
}
