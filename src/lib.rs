//! driverdesk library root.
//! Exposes the CLI parser, the high-level run() function, and the modules
//! behind them: questionnaire validation, operator sign-in, and the live roster.

pub mod cli;
pub mod config;
pub mod core;
pub mod db;
pub mod errors;
pub mod export;
pub mod identity;
pub mod models;
pub mod store;
pub mod ui;
pub mod utils;

use clap::Parser;
use cli::commands;
use cli::parser::{Cli, Commands};
use config::Config;
use errors::AppResult;

/// Central command dispatcher
pub fn dispatch(cli: &Cli, cfg: &Config) -> AppResult<()> {
    match &cli.command {
        Commands::Init => commands::init::handle(cli),
        Commands::Config { .. } => commands::config::handle(&cli.command, cfg),
        Commands::Db { .. } => commands::db::handle(&cli.command, cfg),
        Commands::Submit(_) => commands::submit::handle(&cli.command, cfg),
        Commands::Login { .. } => commands::login::handle_login(&cli.command, cfg),
        Commands::Logout => commands::login::handle_logout(cfg),
        Commands::Whoami => commands::login::handle_whoami(cfg),
        Commands::User { .. } => commands::user::handle(&cli.command, cfg),
        Commands::List { .. } => commands::list::handle(&cli.command, cfg),
        Commands::Show { .. } => commands::show::handle(&cli.command, cfg),
        Commands::Del { .. } => commands::del::handle(&cli.command, cfg),
        Commands::Export { .. } => commands::export::handle(&cli.command, cfg),
        Commands::Roster => commands::roster::handle(cfg),
    }
}

/// Entry point used by main.rs
pub fn run() -> AppResult<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();

    // `init` writes the config, so a broken one on disk must not stop it
    let mut cfg = match (&cli.command, Config::load()) {
        (_, Ok(cfg)) => cfg,
        (Commands::Init, Err(e)) => {
            log::warn!("ignoring unreadable config: {e}");
            Config::default()
        }
        (_, Err(e)) => return Err(e),
    };

    if let Some(custom_db) = &cli.db {
        cfg.database = custom_db.clone();
    }

    dispatch(&cli, &cfg)
}
