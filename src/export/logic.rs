use crate::errors::{AppError, AppResult};
use crate::export::ExportFormat;
use crate::export::fs_utils::ensure_writable;
use crate::export::json_csv::{export_csv, export_json};
use crate::export::model::{DriverExport, to_rows};
use crate::models::Driver;
use crate::ui::messages::warning;
use std::path::Path;

/// Whole-roster tabular export.
pub struct ExportLogic;

impl ExportLogic {
    /// Write `drivers` as one CSV or JSON table to `file`.
    /// Per-record text sheets go through the roster and a `FileSink` instead.
    pub fn table(drivers: &[Driver], format: &ExportFormat, file: &Path, force: bool) -> AppResult<()> {
        let write: fn(&[DriverExport], &Path) -> AppResult<()> = match format {
            ExportFormat::Csv => export_csv,
            ExportFormat::Json => export_json,
            ExportFormat::Txt => {
                return Err(AppError::Export(
                    "txt exports one file per driver; use --dir instead of --file".into(),
                ));
            }
        };

        if drivers.is_empty() {
            warning("No drivers match. Nothing to export.");
            return Ok(());
        }

        if let Some(parent) = file.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)?;
        }
        ensure_writable(file, force)?;

        write(&to_rows(drivers), file)
    }
}
