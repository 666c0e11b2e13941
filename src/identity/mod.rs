//! Identity client: operator sign-in, session persistence and sign-out.

pub mod password;
pub mod sqlite;

pub use sqlite::SqliteIdentity;

use crate::errors::AppResult;
use crate::models::Session;

pub trait IdentityClient {
    /// Authenticate and open a session. Failures are `AppError::Auth`.
    fn sign_in(&self, email: &str, password: &str) -> AppResult<Session>;

    /// Close the current session, if any.
    fn sign_out(&self) -> AppResult<()>;

    /// The session currently backing this client, if still valid.
    fn current_session(&self) -> AppResult<Option<Session>>;
}
