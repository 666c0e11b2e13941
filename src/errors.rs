//! Unified application error type.
//! All modules (db, store, identity, core, cli) return AppError to keep the
//! error handling consistent and easy to manage.

use std::fmt;
use std::io;
use thiserror::Error;

/// A single field-level validation failure, shown inline next to the field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: &'static str,
    pub message: String,
}

impl FieldError {
    pub fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

fn join_field_errors(errors: &[FieldError]) -> String {
    errors
        .iter()
        .map(|e| format!("  - {e}"))
        .collect::<Vec<_>>()
        .join("\n")
}

#[derive(Error, Debug)]
pub enum AppError {
    // ---------------------------
    // IO
    // ---------------------------
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    // ---------------------------
    // Database-related
    // ---------------------------
    #[error("Database error: {0}")]
    Db(#[from] rusqlite::Error),

    #[error("Database migration error: {0}")]
    Migration(String),

    // ---------------------------
    // Record store / live feed
    // ---------------------------
    #[error("Record store error: {0}")]
    Store(String),

    #[error("Live feed error: {0}")]
    Feed(String),

    #[error("Driver not found: {0}")]
    DriverNotFound(String),

    // ---------------------------
    // Input validation
    // ---------------------------
    #[error("Validation failed:\n{}", join_field_errors(.0))]
    Validation(Vec<FieldError>),

    // ---------------------------
    // Identity
    // ---------------------------
    #[error("Ошибка входа: {0}")]
    Auth(String),

    #[error("Not signed in. Run `driverdesk login` first.")]
    NotSignedIn,

    #[error("Password hashing error: {0}")]
    PasswordHash(String),

    // ---------------------------
    // Config errors
    // ---------------------------
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Failed to parse configuration: {0}")]
    ConfigParse(#[from] serde_yaml::Error),

    // ---------------------------
    // Serialization / export errors
    // ---------------------------
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Export error: {0}")]
    Export(String),

    // ---------------------------
    // Generic fallback
    // ---------------------------
    #[error("Internal error: {0}")]
    Other(String),
}

pub type AppResult<T> = Result<T, AppError>;
