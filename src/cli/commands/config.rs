use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::config::ConfigLogic;
use crate::errors::AppResult;
use crate::ui::messages::{success, warning};

/// Handle the `config` subcommand
pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Config {
        print_config,
        check,
        edit_config,
        editor,
    } = cmd
    {
        let path = Config::config_file();

        if *print_config {
            if path.exists() {
                println!("📄 {}:\n", path.display());
                println!("{}", ConfigLogic::print(&path)?);
            } else {
                println!("📄 No config file, effective defaults:\n");
                println!("{}", serde_yaml::to_string(cfg)?);
            }
        }

        if *check {
            let missing = Config::missing_keys()?;
            if missing.is_empty() {
                success("Configuration is complete.");
            } else {
                for key in missing {
                    warning(format!("Missing key '{key}' (default will be used)"));
                }
            }
        }

        if *edit_config {
            let editor_to_use = ConfigLogic::pick_editor(editor.as_deref());
            ConfigLogic::edit(&path, &editor_to_use)?;
            success(format!(
                "Configuration file edited successfully using '{editor_to_use}'"
            ));
        }
    }

    Ok(())
}
