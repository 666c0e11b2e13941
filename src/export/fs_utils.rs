use crate::errors::{AppError, AppResult};
use crate::export::text::ExportedFile;
use crate::ui::messages::{info, warning};
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

/// Check whether a file may be created or overwritten.
///
/// - file does NOT exist → Ok
/// - file exists and `force` → Ok
/// - file exists and `force == false` → ask the user.
pub(crate) fn ensure_writable(path: &Path, force: bool) -> AppResult<()> {
    if !path.exists() || force {
        return Ok(());
    }

    warning(format!("The file '{}' already exists.", path.display()));

    print!("Overwrite? [y/N]: ");
    io::stdout().flush().ok();

    let mut answer = String::new();
    io::stdin().read_line(&mut answer)?;
    let ans = answer.trim().to_ascii_lowercase();

    if ans == "y" || ans == "yes" {
        info("Existing file will be overwritten.");
        Ok(())
    } else {
        Err(AppError::Export(format!(
            "existing file not overwritten: {}",
            path.display()
        )))
    }
}

/// Destination for rendered single-record exports.
pub trait FileSink {
    /// Persist `file`, returning where it ended up.
    fn save(&mut self, file: &ExportedFile) -> AppResult<PathBuf>;
}

/// Saves exports into a directory, one UTF-8 file per record.
pub struct DirSink {
    dir: PathBuf,
    force: bool,
}

impl DirSink {
    pub fn new(dir: impl Into<PathBuf>, force: bool) -> Self {
        Self {
            dir: dir.into(),
            force,
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

impl FileSink for DirSink {
    fn save(&mut self, file: &ExportedFile) -> AppResult<PathBuf> {
        fs::create_dir_all(&self.dir)?;
        let path = self.dir.join(&file.file_name);
        ensure_writable(&path, self.force)?;
        fs::write(&path, file.contents.as_bytes())?;
        Ok(path)
    }
}
