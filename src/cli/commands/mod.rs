pub mod config;
pub mod db;
pub mod del;
pub mod export;
pub mod init;
pub mod list;
pub mod login;
pub mod roster;
pub mod show;
pub mod submit;
pub mod user;

use crate::config::Config;
use crate::core::{FeedStatus, RosterController};
use crate::errors::{AppError, AppResult};
use crate::identity::{IdentityClient, SqliteIdentity};
use crate::store::SqliteStore;
use crate::ui::messages::{stale_banner, warning};
use crate::utils::path::expand_tilde;
use std::io::{self, Write};
use std::time::Duration;

/// How long one-shot commands wait for the first roster snapshot.
const FIRST_SNAPSHOT_TIMEOUT: Duration = Duration::from_secs(10);

pub(crate) fn open_store(cfg: &Config) -> AppResult<SqliteStore> {
    SqliteStore::open(expand_tilde(&cfg.database), cfg.poll_interval())
}

pub(crate) fn open_identity(cfg: &Config) -> AppResult<SqliteIdentity> {
    SqliteIdentity::open(expand_tilde(&cfg.database), expand_tilde(&cfg.session_file))
}

/// Build a roster for the signed-in operator and wait for its first snapshot.
/// Without a session this is the redirect to `login`.
pub(crate) fn open_roster(
    cfg: &Config,
    identity: &SqliteIdentity,
) -> AppResult<RosterController<SqliteStore>> {
    let session = identity.current_session()?.ok_or(AppError::NotSignedIn)?;

    let mut roster = RosterController::new(open_store(cfg)?);
    roster.on_session_established(&session)?;
    roster.wait_for_update(FIRST_SNAPSHOT_TIMEOUT);

    match roster.status() {
        FeedStatus::Live => {}
        FeedStatus::Stale(reason) => {
            return Err(AppError::Feed(reason.clone()));
        }
        FeedStatus::Loading | FeedStatus::Closed => {
            return Err(AppError::Feed("no data received from the store".into()));
        }
    }
    Ok(roster)
}

pub(crate) fn show_feed_status(status: &FeedStatus) {
    if let FeedStatus::Stale(reason) = status {
        stale_banner(reason);
    }
}

/// Ask a yes/no confirmation from the user
pub(crate) fn ask_confirmation(prompt: &str) -> bool {
    warning(prompt);
    print!("Confirm [y/N]: ");
    let _ = io::stdout().flush();

    let mut s = String::new();
    if io::stdin().read_line(&mut s).is_ok() {
        matches!(s.trim().to_lowercase().as_str(), "y" | "yes")
    } else {
        false
    }
}
