//! Identity client over the local database.
//!
//! Accounts and sessions live in SQLite; the active session token is kept
//! in a small file so that a login survives across invocations.

use super::IdentityClient;
use super::password::{hash_password, verify_password};
use crate::db::initialize::init_db;
use crate::db::pool::DbPool;
use crate::db::queries;
use crate::errors::{AppError, AppResult};
use crate::models::Session;
use chrono::Local;
use rand_core::{OsRng, RngCore};
use std::fs;
use std::path::{Path, PathBuf};

const INVALID_CREDENTIALS: &str = "неверный email или пароль";

pub struct SqliteIdentity {
    pool: DbPool,
    session_file: PathBuf,
}

fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// 256 random bits, hex encoded.
fn new_token() -> String {
    let mut bytes = [0u8; 32];
    OsRng.fill_bytes(&mut bytes);
    bytes.iter().map(|b| format!("{b:02x}")).collect()
}

impl SqliteIdentity {
    pub fn open(db_path: impl AsRef<Path>, session_file: impl Into<PathBuf>) -> AppResult<Self> {
        let pool = DbPool::new(db_path)?;
        init_db(&pool.conn)?;
        Ok(Self {
            pool,
            session_file: session_file.into(),
        })
    }

    pub fn add_user(&self, email: &str, password: &str) -> AppResult<()> {
        let email = normalize_email(email);
        if queries::find_password_hash(&self.pool.conn, &email)?.is_some() {
            return Err(AppError::Other(format!("user already exists: {email}")));
        }
        let hash = hash_password(password)?;
        queries::insert_user(&self.pool.conn, &email, &hash)
    }

    pub fn remove_user(&self, email: &str) -> AppResult<bool> {
        queries::delete_user(&self.pool.conn, &normalize_email(email))
    }

    pub fn list_users(&self) -> AppResult<Vec<(String, String)>> {
        queries::list_users(&self.pool.conn)
    }

    fn stored_token(&self) -> AppResult<Option<String>> {
        if !self.session_file.exists() {
            return Ok(None);
        }
        let token = fs::read_to_string(&self.session_file)?.trim().to_string();
        Ok((!token.is_empty()).then_some(token))
    }

    fn store_token(&self, token: &str) -> AppResult<()> {
        if let Some(parent) = self.session_file.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&self.session_file, token)?;
        Ok(())
    }

    fn forget_token(&self) -> AppResult<()> {
        if self.session_file.exists() {
            fs::remove_file(&self.session_file)?;
        }
        Ok(())
    }
}

impl IdentityClient for SqliteIdentity {
    fn sign_in(&self, email: &str, password: &str) -> AppResult<Session> {
        let email = normalize_email(email);

        let Some(hash) = queries::find_password_hash(&self.pool.conn, &email)? else {
            log::info!("sign-in rejected: unknown account");
            return Err(AppError::Auth(INVALID_CREDENTIALS.into()));
        };

        if !verify_password(password, &hash)? {
            log::info!("sign-in rejected: bad password");
            return Err(AppError::Auth(INVALID_CREDENTIALS.into()));
        }

        // a new login replaces whatever session this client held
        if let Some(old) = self.stored_token()? {
            queries::delete_session(&self.pool.conn, &old)?;
        }

        let session = Session {
            email,
            token: new_token(),
            created_at: Local::now().to_rfc3339(),
        };
        queries::insert_session(&self.pool.conn, &session)?;
        self.store_token(&session.token)?;

        Ok(session)
    }

    fn sign_out(&self) -> AppResult<()> {
        if let Some(token) = self.stored_token()? {
            queries::delete_session(&self.pool.conn, &token)?;
        }
        self.forget_token()
    }

    fn current_session(&self) -> AppResult<Option<Session>> {
        match self.stored_token()? {
            Some(token) => queries::find_session(&self.pool.conn, &token),
            None => Ok(None),
        }
    }
}
