use crate::config::Config;
use crate::errors::{AppError, AppResult};
use std::fs;
use std::path::Path;
use std::process::Command;

pub struct ConfigLogic;

impl ConfigLogic {
    pub fn print(path: &Path) -> AppResult<String> {
        fs::read_to_string(path)
            .map_err(|e| AppError::Config(format!("cannot read {}: {e}", path.display())))
    }

    /// Editor to use: explicit choice, then $EDITOR / $VISUAL, then a platform default.
    pub fn pick_editor(requested: Option<&str>) -> String {
        requested
            .map(str::to_string)
            .or_else(|| std::env::var("EDITOR").ok())
            .or_else(|| std::env::var("VISUAL").ok())
            .unwrap_or_else(|| {
                if cfg!(target_os = "windows") {
                    "notepad".to_string()
                } else {
                    "nano".to_string()
                }
            })
    }

    pub fn edit(path: &Path, editor: &str) -> AppResult<()> {
        let status = Command::new(editor)
            .arg(path)
            .status()
            .map_err(|e| AppError::Config(format!("cannot start editor '{editor}': {e}")))?;

        if !status.success() {
            return Err(AppError::Config(format!(
                "editor '{editor}' exited with {status}"
            )));
        }

        // reject edits that no longer parse
        Config::load()?;
        Ok(())
    }
}
