use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::RosterController;
use crate::errors::{AppError, AppResult};
use crate::models::DriverId;
use crate::store::RecordStore;

use super::{open_identity, open_roster, show_feed_status};

const WRAP_WIDTH: usize = 72;

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Show { id } = cmd {
        let identity = open_identity(cfg)?;
        let roster = open_roster(cfg, &identity)?;
        show_feed_status(roster.status());

        let id = DriverId::from(id.as_str());
        if !print_details(&roster, &id) {
            return Err(AppError::DriverNotFound(id.to_string()));
        }
    }
    Ok(())
}

/// Print the labelled detail block for `id`. False when it is not in the roster.
pub(crate) fn print_details<S: RecordStore>(roster: &RosterController<S>, id: &DriverId) -> bool {
    let Some(lines) = roster.detail_lines(id) else {
        return false;
    };

    let label_width = lines
        .iter()
        .map(|(label, _)| label.chars().count())
        .max()
        .unwrap_or(0);
    let indent = " ".repeat(label_width + 4);

    for (label, value) in lines {
        let head = format!("  {label:<label_width$}: ");
        if value.trim().is_empty() {
            println!("{head}");
            continue;
        }
        let options = textwrap::Options::new(WRAP_WIDTH)
            .initial_indent(&head)
            .subsequent_indent(&indent);
        println!("{}", textwrap::fill(&value, options));
    }
    true
}
