mod fs_utils;
mod json_csv;
pub mod logic;
mod model;
pub mod text;

pub use fs_utils::{DirSink, FileSink};
pub use logic::ExportLogic;
pub use model::DriverExport;
pub use text::{ExportedFile, export_record, render_details};

use crate::ui::messages::success;
use clap::ValueEnum;
use std::path::Path;

/// Shared completion message for exports.
pub(crate) fn notify_export_success(label: &str, path: &Path) {
    success(format!("{label} export completed: {}", path.display()));
}

#[derive(Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum ExportFormat {
    /// One `<Full_Name>_details.txt` sheet per driver
    Txt,
    Csv,
    Json,
}

impl ExportFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            ExportFormat::Txt => "txt",
            ExportFormat::Csv => "csv",
            ExportFormat::Json => "json",
        }
    }
}
