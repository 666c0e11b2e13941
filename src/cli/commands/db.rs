use crate::cli::parser::Commands;
use crate::config::Config;
use crate::db::migrate::{latest_version, run_pending_migrations, schema_version};
use crate::db::pool::DbPool;
use crate::errors::{AppError, AppResult};
use crate::ui::messages::{info, success};
use crate::utils::path::expand_tilde;

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Db {
        migrate,
        check,
        vacuum,
        info: show_info,
    } = cmd
    {
        let pool = DbPool::new(expand_tilde(&cfg.database))?;

        if *migrate {
            let applied = run_pending_migrations(&pool.conn)?;
            success(format!("{applied} migration(s) applied."));
        }

        if *check {
            let result: String =
                pool.conn
                    .query_row("PRAGMA integrity_check", [], |row| row.get(0))?;
            if result == "ok" {
                success("Database integrity OK.");
            } else {
                return Err(AppError::Other(format!("integrity check failed: {result}")));
            }
        }

        if *vacuum {
            pool.conn.execute_batch("VACUUM;")?;
            success("Database optimized.");
        }

        if *show_info {
            let count = |table: &str| -> AppResult<i64> {
                let sql = format!("SELECT COUNT(*) FROM {table}");
                Ok(pool.conn.query_row(&sql, [], |row| row.get(0))?)
            };

            info(format!("Database : {}", cfg.database));
            info(format!(
                "Schema   : v{} (latest v{})",
                schema_version(&pool.conn)?,
                latest_version()
            ));
            if schema_version(&pool.conn)? >= latest_version() {
                info(format!("Drivers  : {}", count("drivers")?));
                info(format!("Users    : {}", count("users")?));
                info(format!("Sessions : {}", count("sessions")?));
            }
        }
    }

    Ok(())
}
