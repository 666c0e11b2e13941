use crate::errors::{AppError, AppResult, FieldError};
use crate::identity::IdentityClient;
use crate::models::Session;
use regex::Regex;
use std::sync::LazyLock;

static EMAIL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("valid regex"));

pub const MIN_PASSWORD_LEN: usize = 6;

/// Local credential checks, run before the identity client is contacted.
/// Each field reports its first failing rule only.
pub fn validate_credentials(email: &str, password: &str) -> Result<(), Vec<FieldError>> {
    let mut errors = Vec::new();

    if email.is_empty() {
        errors.push(FieldError::new("email", "Введите email."));
    } else if !EMAIL_RE.is_match(email) {
        errors.push(FieldError::new("email", "Введите корректный email."));
    }

    if let Some(msg) = password_problem(password) {
        errors.push(FieldError::new("password", msg));
    }

    if errors.is_empty() { Ok(()) } else { Err(errors) }
}

/// First password rule `password` breaks, if any.
pub fn password_problem(password: &str) -> Option<&'static str> {
    if password.is_empty() {
        Some("Введите пароль.")
    } else if password.chars().count() < MIN_PASSWORD_LEN {
        Some("Пароль должен быть не менее 6 символов.")
    } else if !password.chars().any(|c| c.is_ascii_uppercase()) {
        Some("Пароль должен содержать хотя бы одну заглавную букву.")
    } else if !password.chars().any(|c| c.is_ascii_digit()) {
        Some("Пароль должен содержать хотя бы одну цифру.")
    } else {
        None
    }
}

pub struct LoginLogic;

impl LoginLogic {
    pub fn apply(identity: &impl IdentityClient, email: &str, password: &str) -> AppResult<Session> {
        validate_credentials(email, password).map_err(AppError::Validation)?;
        identity.sign_in(email, password)
    }
}
