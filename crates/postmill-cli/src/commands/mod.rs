//! CLI command implementations.

pub mod config;
pub mod import;
pub mod init;
pub mod show;

use anyhow::{Context, Result};
use postmill_config::{AppPaths, Config};
use postmill_db::Database;
use std::path::PathBuf;

/// Expand `~` and environment variables in a user-supplied path.
pub fn expand_path(path: &str) -> PathBuf {
    let expanded = shellexpand::full(path)
        .map(|p| p.into_owned())
        .unwrap_or_else(|_| path.to_string());
    PathBuf::from(expanded)
}

/// Get the application paths, honoring `general.data_dir`.
pub fn get_paths() -> Result<AppPaths> {
    let paths = AppPaths::new().context("Failed to determine application directories")?;
    let config = Config::load_from(&paths.config_file).context("Failed to load config")?;

    Ok(match config.general.data_dir {
        Some(dir) => AppPaths::from_dirs(paths.config_dir, expand_path(&dir)),
        None => paths,
    })
}

/// Get a database connection, ensuring postmill is initialized.
pub fn get_database() -> Result<Database> {
    let paths = get_paths()?;

    if !paths.is_initialized() {
        anyhow::bail!("Postmill is not initialized. Run 'postmill init' first.");
    }

    Database::open(&paths.database_file).context("Failed to open database")
}

/// First eight characters of an ID, for display.
pub fn short_id(id: &str) -> String {
    id.chars().take(8).collect()
}
