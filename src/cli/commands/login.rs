use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::LoginLogic;
use crate::errors::{AppError, AppResult};
use crate::identity::IdentityClient;
use crate::ui::messages::{info, success};

use super::open_identity;

pub fn handle_login(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Login { email, password } = cmd {
        let identity = open_identity(cfg)?;

        let session = LoginLogic::apply(&identity, email, password)?;
        success(format!("Signed in as {}", session.email));
        info("Next: `driverdesk roster` or `driverdesk list`");
    }
    Ok(())
}

pub fn handle_logout(cfg: &Config) -> AppResult<()> {
    let identity = open_identity(cfg)?;
    let had_session = identity.current_session()?.is_some();
    identity.sign_out()?;

    if had_session {
        success("Signed out.");
    } else {
        info("No active session.");
    }
    Ok(())
}

pub fn handle_whoami(cfg: &Config) -> AppResult<()> {
    let identity = open_identity(cfg)?;
    match identity.current_session()? {
        Some(s) => println!("{} (since {})", s.email, s.created_at),
        None => return Err(AppError::NotSignedIn),
    }
    Ok(())
}
