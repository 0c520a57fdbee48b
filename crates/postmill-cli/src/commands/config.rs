//! Configuration commands.

use super::get_paths;
use anyhow::{Context, Result};
use colored::Colorize;
use postmill_config::Config;

pub fn show() -> Result<()> {
    let paths = get_paths()?;

    if !paths.config_file.exists() {
        anyhow::bail!("Config file not found. Run 'postmill init' first.");
    }

    let contents =
        std::fs::read_to_string(&paths.config_file).context("Failed to read config file")?;

    println!("{}", "Current Configuration".cyan().bold());
    println!("{}", "─".repeat(50));
    println!("{}", contents);

    Ok(())
}

pub fn set(key: &str, value: &str) -> Result<()> {
    let paths = get_paths()?;

    let mut config = Config::load_from(&paths.config_file).context("Failed to load config")?;
    apply(&mut config, key, value)?;

    config
        .save_to(&paths.config_file)
        .context("Failed to save config")?;

    println!("{} Set {} = {}", "✓".green(), key.cyan(), value);

    Ok(())
}

/// Update one dotted config key in place.
fn apply(config: &mut Config, key: &str, value: &str) -> Result<()> {
    let parts: Vec<&str> = key.split('.').collect();

    match parts.as_slice() {
        ["general", "data_dir"] => config.general.data_dir = Some(value.to_string()),
        ["import", "default_author"] => config.import.default_author = value.to_string(),
        ["import", "case_insensitive_extensions"] => {
            config.import.case_insensitive_extensions =
                value.parse().context("Invalid boolean value")?;
        }
        ["import", "abort_on_entry_error"] => {
            config.import.abort_on_entry_error =
                value.parse().context("Invalid boolean value")?;
        }
        ["import", "scratch_dir"] => config.import.scratch_dir = Some(value.to_string()),
        ["ui", "color"] => {
            config.ui.color = value.parse().context("Invalid boolean value")?;
        }
        _ => {
            anyhow::bail!("Unknown config key: {}", key);
        }
    }

    Ok(())
}
