use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::RosterController;
use crate::errors::{AppError, AppResult};
use crate::export::{DirSink, ExportFormat, ExportLogic};
use crate::models::{Driver, DriverId};
use crate::store::RecordStore;
use crate::ui::messages::{info, warning};
use crate::utils::path::expand_tilde;

use super::del::print_report;
use super::{open_identity, open_roster, show_feed_status};

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Export {
        ids,
        all,
        search,
        format,
        dir,
        file,
        force,
    } = cmd
    {
        if ids.is_empty() && !*all {
            return Err(AppError::Export(
                "nothing to export: pass driver ids or --all".into(),
            ));
        }

        let identity = open_identity(cfg)?;
        let mut roster = open_roster(cfg, &identity)?;
        show_feed_status(roster.status());

        if *all {
            if let Some(term) = search {
                roster.set_search_term(term.as_str());
            }
            roster.select_all();
        } else {
            select_ids(&mut roster, ids);
        }

        if roster.selection().is_empty() {
            warning("No drivers match. Nothing to export.");
            return Ok(());
        }

        match format {
            ExportFormat::Txt => {
                let target = dir.as_deref().unwrap_or(&cfg.export_dir);
                let mut sink = DirSink::new(expand_tilde(target), *force);
                info(format!("Exporting to {}", sink.dir().display()));

                let report = roster.export_selected(&mut sink);
                print_report(&report);
                if !report.is_clean() {
                    return Err(AppError::Export(report.to_string()));
                }
            }
            ExportFormat::Csv | ExportFormat::Json => {
                let Some(file) = file else {
                    return Err(AppError::Export(format!(
                        "--file is required for {} export",
                        format.as_str()
                    )));
                };
                let path = expand_tilde(file);
                let drivers = selected_drivers(&roster);
                ExportLogic::table(&drivers, format, &path, *force)?;
            }
        }
    }
    Ok(())
}

fn select_ids<S: RecordStore>(roster: &mut RosterController<S>, ids: &[String]) {
    for raw in ids {
        let id = DriverId::from(raw.as_str());
        if !roster.contains(&id) {
            warning(format!("Driver not found: {id}"));
        } else if !roster.is_selected(&id) {
            roster.toggle_selection(&id);
        }
    }
}

/// Selected records in roster order.
fn selected_drivers<S: RecordStore>(roster: &RosterController<S>) -> Vec<Driver> {
    roster
        .mirror()
        .iter()
        .filter(|d| roster.is_selected(&d.id))
        .cloned()
        .collect()
}
