use crate::errors::{AppError, AppResult};
use crate::models::{Driver, DriverId, DriverRecord, Session};
use chrono::Local;
use rusqlite::{Connection, OptionalExtension, Result, Row, params};

// ---------------------------
// Drivers
// ---------------------------

pub fn map_driver_row(row: &Row) -> Result<Driver> {
    let id: String = row.get("id")?;
    let data: String = row.get("data")?;

    let record: DriverRecord = serde_json::from_str(&data).map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(
            0,
            rusqlite::types::Type::Text,
            Box::new(AppError::Store(format!("malformed driver document {id}: {e}"))),
        )
    })?;

    Ok(Driver::new(id, record))
}

/// Load the whole driver collection ordered by key.
/// Documents that no longer deserialize are skipped with a warning.
pub fn load_drivers(conn: &Connection) -> AppResult<Vec<Driver>> {
    let mut stmt = conn.prepare_cached("SELECT id, data FROM drivers ORDER BY id ASC")?;
    let rows = stmt.query_map([], |row| {
        Ok((row.get::<_, String>("id")?, row.get::<_, String>("data")?))
    })?;

    let mut out = Vec::new();
    for r in rows {
        let (id, data) = r?;
        match serde_json::from_str::<DriverRecord>(&data) {
            Ok(record) => out.push(Driver::new(id, record)),
            Err(e) => log::warn!("skipping malformed driver document {id}: {e}"),
        }
    }
    Ok(out)
}

pub fn load_driver(conn: &Connection, id: &DriverId) -> AppResult<Option<Driver>> {
    let mut stmt = conn.prepare_cached("SELECT id, data FROM drivers WHERE id = ?1")?;
    let driver = stmt.query_row([id.as_str()], map_driver_row).optional()?;
    Ok(driver)
}

/// Insert or replace the whole document stored under `id`.
pub fn upsert_driver(conn: &Connection, id: &DriverId, record: &DriverRecord) -> AppResult<()> {
    let data = serde_json::to_string(record)?;
    conn.execute(
        "INSERT INTO drivers (id, full_name, data, updated_at)
         VALUES (?1, ?2, ?3, ?4)
         ON CONFLICT(id) DO UPDATE SET
            full_name = excluded.full_name,
            data = excluded.data,
            updated_at = excluded.updated_at",
        params![
            id.as_str(),
            record.full_name,
            data,
            Local::now().to_rfc3339()
        ],
    )?;
    Ok(())
}

/// Delete a driver; returns whether a row existed.
pub fn delete_driver(conn: &Connection, id: &DriverId) -> AppResult<bool> {
    let n = conn.execute("DELETE FROM drivers WHERE id = ?1", [id.as_str()])?;
    Ok(n > 0)
}

// ---------------------------
// Users
// ---------------------------

pub fn insert_user(conn: &Connection, email: &str, password_hash: &str) -> AppResult<()> {
    conn.execute(
        "INSERT INTO users (email, password_hash, created_at) VALUES (?1, ?2, ?3)",
        params![email, password_hash, Local::now().to_rfc3339()],
    )?;
    Ok(())
}

pub fn find_password_hash(conn: &Connection, email: &str) -> AppResult<Option<String>> {
    let hash = conn
        .query_row(
            "SELECT password_hash FROM users WHERE email = ?1",
            [email],
            |row| row.get(0),
        )
        .optional()?;
    Ok(hash)
}

/// (email, created_at) for every account, ordered by email.
pub fn list_users(conn: &Connection) -> AppResult<Vec<(String, String)>> {
    let mut stmt = conn.prepare("SELECT email, created_at FROM users ORDER BY email ASC")?;
    let rows = stmt.query_map([], |row| Ok((row.get(0)?, row.get(1)?)))?;

    let mut out = Vec::new();
    for r in rows {
        out.push(r?);
    }
    Ok(out)
}

pub fn delete_user(conn: &Connection, email: &str) -> AppResult<bool> {
    // sessions go with the account through ON DELETE CASCADE
    let n = conn.execute("DELETE FROM users WHERE email = ?1", [email])?;
    Ok(n > 0)
}

// ---------------------------
// Sessions
// ---------------------------

pub fn insert_session(conn: &Connection, session: &Session) -> AppResult<()> {
    conn.execute(
        "INSERT INTO sessions (token, email, created_at) VALUES (?1, ?2, ?3)",
        params![session.token, session.email, session.created_at],
    )?;
    Ok(())
}

pub fn find_session(conn: &Connection, token: &str) -> AppResult<Option<Session>> {
    let session = conn
        .query_row(
            "SELECT token, email, created_at FROM sessions WHERE token = ?1",
            [token],
            |row| {
                Ok(Session {
                    token: row.get(0)?,
                    email: row.get(1)?,
                    created_at: row.get(2)?,
                })
            },
        )
        .optional()?;
    Ok(session)
}

pub fn delete_session(conn: &Connection, token: &str) -> AppResult<()> {
    conn.execute("DELETE FROM sessions WHERE token = ?1", [token])?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::migrate::run_pending_migrations;

    fn conn() -> Connection {
        let c = Connection::open_in_memory().unwrap();
        c.pragma_update(None, "foreign_keys", "ON").unwrap();
        run_pending_migrations(&c).unwrap();
        c
    }

    fn record(name: &str) -> DriverRecord {
        DriverRecord {
            full_name: name.into(),
            pesel: "12345678901".into(),
            ..Default::default()
        }
    }

    #[test]
    fn upsert_overwrites_whole_document() {
        let c = conn();
        let id = DriverId::from("a");
        let mut r = record("Anna Nowak");
        r.education = Some("School".into());
        upsert_driver(&c, &id, &r).unwrap();

        upsert_driver(&c, &id, &record("Anna Kowalska")).unwrap();

        let all = load_drivers(&c).unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].record.full_name, "Anna Kowalska");
        assert_eq!(all[0].record.education, None);
    }

    #[test]
    fn malformed_document_does_not_hide_the_rest() {
        let c = conn();
        upsert_driver(&c, &DriverId::from("a"), &record("Anna Nowak")).unwrap();
        c.execute(
            "INSERT INTO drivers (id, full_name, data, updated_at) VALUES (?1, ?2, ?3, ?4)",
            params!["b", "Bad Row", r#"{"fullName":"Bad Row","experience":"many"}"#, "x"],
        )
        .unwrap();
        c.execute(
            "INSERT INTO drivers (id, full_name, data, updated_at) VALUES (?1, ?2, ?3, ?4)",
            params!["c", "Jan Kowalski", r#"{"fullName":"Jan Kowalski","experience":"7"}"#, "x"],
        )
        .unwrap();

        let all = load_drivers(&c).unwrap();
        let ids: Vec<_> = all.iter().map(|d| d.id.as_str()).collect();
        assert_eq!(ids, ["a", "c"]);
        assert_eq!(all[1].record.experience, 7);
    }

    #[test]
    fn delete_is_idempotent() {
        let c = conn();
        let id = DriverId::from("a");
        upsert_driver(&c, &id, &record("Anna Nowak")).unwrap();
        assert!(delete_driver(&c, &id).unwrap());
        assert!(!delete_driver(&c, &id).unwrap());
        assert!(load_driver(&c, &id).unwrap().is_none());
    }

    #[test]
    fn deleting_a_user_drops_their_sessions() {
        let c = conn();
        insert_user(&c, "op@example.com", "hash").unwrap();
        let s = Session {
            email: "op@example.com".into(),
            token: "t1".into(),
            created_at: Local::now().to_rfc3339(),
        };
        insert_session(&c, &s).unwrap();
        assert!(find_session(&c, "t1").unwrap().is_some());

        assert!(delete_user(&c, "op@example.com").unwrap());
        assert!(find_session(&c, "t1").unwrap().is_none());
    }
}
