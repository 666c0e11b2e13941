use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::RosterController;
use crate::errors::AppResult;
use crate::store::RecordStore;
use crate::ui::messages::info;
use crate::utils::table::Table;

use super::{open_identity, open_roster, show_feed_status};

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::List { search } = cmd {
        let identity = open_identity(cfg)?;
        let mut roster = open_roster(cfg, &identity)?;

        if let Some(term) = search {
            roster.set_search_term(term.as_str());
        }

        show_feed_status(roster.status());
        print_roster(&roster);
    }
    Ok(())
}

/// Numbered table of the filtered view. Numbers are 1-based positions
/// in the view and can be used wherever a driver id is accepted.
pub(crate) fn print_roster<S: RecordStore>(roster: &RosterController<S>) {
    let view = roster.filtered_view();
    if view.is_empty() {
        if roster.search_term().is_empty() {
            info("No drivers yet.");
        } else {
            info(format!("No drivers match '{}'.", roster.search_term()));
        }
        return;
    }

    let mut table = Table::new(["", "#", "ID", "Имя и фамилия", "Телефон", "Опыт"]);
    for (i, d) in view.iter().enumerate() {
        let mark = if roster.is_selected(&d.id) { "[x]" } else { "[ ]" };
        table.add_row(vec![
            mark.to_string(),
            (i + 1).to_string(),
            d.id.to_string(),
            d.record.full_name.clone(),
            d.record.phone_number.clone(),
            d.record.experience.to_string(),
        ]);
    }
    print!("{}", table.render());
    println!(
        "{} shown, {} total, {} selected",
        view.len(),
        roster.mirror().len(),
        roster.selection().len()
    );
}
