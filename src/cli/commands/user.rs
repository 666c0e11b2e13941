use crate::cli::parser::{Commands, UserAction};
use crate::config::Config;
use crate::core::login::validate_credentials;
use crate::errors::{AppError, AppResult};
use crate::ui::messages::{info, success, warning};
use crate::utils::table::Table;

use super::open_identity;

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::User { action } = cmd {
        let identity = open_identity(cfg)?;

        match action {
            UserAction::Add { email, password } => {
                validate_credentials(email.trim(), password).map_err(AppError::Validation)?;
                identity.add_user(email, password)?;
                success(format!("User {} created.", email.trim().to_lowercase()));
            }
            UserAction::List => {
                let users = identity.list_users()?;
                if users.is_empty() {
                    info("No users. Create one with `driverdesk user add`.");
                    return Ok(());
                }
                let mut table = Table::new(["Email", "Created"]);
                for (email, created) in users {
                    table.add_row(vec![email, created]);
                }
                print!("{}", table.render());
            }
            UserAction::Del { email } => {
                if identity.remove_user(email)? {
                    success(format!("User {email} deleted."));
                } else {
                    warning(format!("No such user: {email}"));
                }
            }
        }
    }
    Ok(())
}
