use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::{BulkReport, Outcome};
use crate::errors::{AppError, AppResult};
use crate::models::DriverId;
use crate::ui::messages::{error, info, success, warning};

use super::{ask_confirmation, open_identity, open_roster, show_feed_status};

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Del { ids, yes } = cmd {
        let identity = open_identity(cfg)?;
        let mut roster = open_roster(cfg, &identity)?;
        show_feed_status(roster.status());

        for raw in ids {
            let id = DriverId::from(raw.as_str());
            if roster.contains(&id) {
                if !roster.is_selected(&id) {
                    roster.toggle_selection(&id);
                }
            } else {
                warning(format!("Driver not found: {id}"));
            }
        }

        if roster.selection().is_empty() {
            return Err(AppError::DriverNotFound(ids.join(", ")));
        }

        if !*yes {
            let names: Vec<&str> = roster
                .selection()
                .iter()
                .filter_map(|id| roster.get(id))
                .map(|d| d.record.full_name.as_str())
                .collect();
            let prompt = format!(
                "Delete {} driver(s): {}? This cannot be undone.",
                names.len(),
                names.join(", ")
            );
            if !ask_confirmation(&prompt) {
                info("Operation cancelled.");
                return Ok(());
            }
        }

        let report = roster.delete_selected();
        print_report(&report);
        if !report.is_clean() {
            return Err(AppError::Store(report.to_string()));
        }
    }
    Ok(())
}

/// Summary line plus one line per id that did not succeed.
pub(crate) fn print_report(report: &BulkReport) {
    for (id, outcome) in &report.outcomes {
        match outcome {
            Outcome::Missing => warning(format!("{id}: already gone")),
            Outcome::Failed(reason) => error(format!("{id}: {reason}")),
            Outcome::Exported(path) => info(format!("{id}: {}", path.display())),
            Outcome::Deleted => {}
        }
    }

    if report.is_clean() {
        success(report);
    } else {
        warning(report);
    }
}
