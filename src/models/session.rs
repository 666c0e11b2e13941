use serde::{Deserialize, Serialize};

/// An authenticated operator session.
///
/// The token is opaque to callers; it is only meaningful to the identity
/// client that issued it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub email: String,
    pub token: String,
    pub created_at: String, // RFC 3339, local time
}
