//! Interactive live roster.
//!
//! Feed updates are applied between commands, so every listing shows the
//! latest snapshot the store has pushed.

use crate::config::Config;
use crate::core::{BulkAction, BulkReport, FeedStatus, RosterController};
use crate::errors::AppResult;
use crate::export::DirSink;
use crate::identity::{IdentityClient, SqliteIdentity};
use crate::models::DriverId;
use crate::store::RecordStore;
use crate::ui::messages::{info, roster_title, warning};
use crate::utils::path::expand_tilde;
use std::io::{self, Write};

use super::del::print_report;
use super::list::print_roster;
use super::show::print_details;
use super::{ask_confirmation, open_identity, open_roster, show_feed_status};

const HELP: &str = "\
Commands:
  list                 show the (filtered) roster
  search [TERM]        filter by name; no TERM clears the filter
  toggle <N|ID>        select or unselect one driver
  all                  select every shown driver (again: unselect)
  none                 clear the selection
  expand <N|ID>        show or hide full details of one driver
  delete               delete the selected drivers
  export <N|ID>        export one driver as a text sheet
  export-selected      export every selected driver
  refresh              wait briefly for changes from the store
  help                 this text
  quit                 leave the roster";

enum Flow {
    Continue,
    Quit,
}

pub fn handle(cfg: &Config) -> AppResult<()> {
    let identity = open_identity(cfg)?;
    let mut roster = open_roster(cfg, &identity)?;

    if let Some(s) = roster.session() {
        roster_title(&s.email, roster.mirror().len());
    }
    print_roster(&roster);
    println!("Type `help` for commands.");

    loop {
        if !session_still_valid(&mut roster, &identity)? {
            warning("Session ended. Sign in again with `driverdesk login`.");
            return Ok(());
        }
        if roster.pump() {
            log::debug!("roster updated: {} drivers", roster.mirror().len());
        }
        show_feed_status(roster.status());

        print!("roster> ");
        io::stdout().flush().ok();

        // stdin stays unlocked between reads; confirmation prompts use it too
        let mut line = String::new();
        if io::stdin().read_line(&mut line)? == 0 {
            break;
        }

        match run_command(&mut roster, cfg, line.trim())? {
            Flow::Continue => {}
            Flow::Quit => break,
        }
    }

    roster.on_session_cleared();
    Ok(())
}

/// Follow sign-outs and re-logins made from another terminal.
fn session_still_valid<S: RecordStore>(
    roster: &mut RosterController<S>,
    identity: &SqliteIdentity,
) -> AppResult<bool> {
    match identity.current_session()? {
        Some(session) => {
            roster.on_session_established(&session)?;
            Ok(true)
        }
        None => {
            roster.on_session_cleared();
            Ok(false)
        }
    }
}

/// A 1-based position in the filtered view, or a driver id.
fn resolve<S: RecordStore>(roster: &RosterController<S>, token: &str) -> Option<DriverId> {
    if let Ok(n) = token.parse::<usize>() {
        let view = roster.filtered_view();
        if n >= 1 && n <= view.len() {
            return Some(view[n - 1].id.clone());
        }
    }
    let id = DriverId::from(token);
    roster.contains(&id).then_some(id)
}

fn run_command<S: RecordStore>(
    roster: &mut RosterController<S>,
    cfg: &Config,
    line: &str,
) -> AppResult<Flow> {
    let (cmd, arg) = match line.split_once(char::is_whitespace) {
        Some((c, rest)) => (c, rest.trim()),
        None => (line, ""),
    };

    match cmd {
        "" => {}
        "list" | "ls" => print_roster(roster),
        "search" | "s" => {
            roster.set_search_term(arg);
            print_roster(roster);
        }
        "toggle" | "t" => match resolve(roster, arg) {
            Some(id) => {
                roster.toggle_selection(&id);
                let state = if roster.is_selected(&id) { "selected" } else { "unselected" };
                info(format!("{id} {state}"));
            }
            None => warning(format!("No such driver: '{arg}'")),
        },
        "all" => {
            roster.select_all();
            info(format!("{} selected", roster.selection().len()));
        }
        "none" => {
            roster.deselect_all();
            info("Selection cleared");
        }
        "expand" | "x" => match resolve(roster, arg) {
            Some(id) => {
                roster.toggle_expanded(&id);
                if roster.is_expanded(&id) {
                    print_details(roster, &id);
                } else {
                    info(format!("{id} collapsed"));
                }
            }
            None => warning(format!("No such driver: '{arg}'")),
        },
        "delete" | "del" => {
            let count = roster.selection().len();
            if count == 0 {
                warning("Nothing selected.");
            } else if ask_confirmation(&format!("Delete {count} selected driver(s)?")) {
                let report = roster.delete_selected();
                print_report(&report);
                roster.wait_for_update(cfg.poll_interval() * 5);
            } else {
                info("Operation cancelled.");
            }
        }
        "export" | "e" => match resolve(roster, arg) {
            Some(id) => {
                let mut sink = DirSink::new(expand_tilde(&cfg.export_dir), false);
                let mut report = BulkReport::new(BulkAction::Export);
                report.push(id.clone(), roster.export_to(&id, &mut sink));
                print_report(&report);
            }
            None => warning(format!("No such driver: '{arg}'")),
        },
        "export-selected" | "es" => {
            if roster.selection().is_empty() {
                warning("Nothing selected.");
            } else {
                let mut sink = DirSink::new(expand_tilde(&cfg.export_dir), false);
                print_report(&roster.export_selected(&mut sink));
            }
        }
        "refresh" | "r" => {
            if roster.wait_for_update(cfg.poll_interval() * 5) {
                print_roster(roster);
            } else if *roster.status() == FeedStatus::Live {
                info("No changes.");
            }
        }
        "help" | "?" => println!("{HELP}"),
        "quit" | "exit" | "q" => return Ok(Flow::Quit),
        other => warning(format!("Unknown command '{other}'. Type `help`.")),
    }

    Ok(Flow::Continue)
}
