//! Initialize Postmill.

use super::get_paths;
use anyhow::{Context, Result};
use colored::Colorize;
use postmill_config::Config;
use postmill_db::Database;

pub fn run() -> Result<()> {
    let paths = get_paths()?;

    if paths.is_initialized() {
        println!("{} Postmill is already initialized.", "Note:".yellow().bold());
        println!("  Config: {}", paths.config_file.display());
        println!("  Database: {}", paths.database_file.display());
        return Ok(());
    }

    println!("{}", "Initializing Postmill...".cyan().bold());

    paths.ensure_dirs().context("Failed to create directories")?;
    println!("  {} Created directories", "✓".green());

    if !paths.config_file.exists() {
        Config::create_default_file(&paths.config_file).context("Failed to create config file")?;
        println!(
            "  {} Created config: {}",
            "✓".green(),
            paths.config_file.display()
        );
    }

    let _db = Database::open(&paths.database_file).context("Failed to initialize database")?;
    println!(
        "  {} Created database: {}",
        "✓".green(),
        paths.database_file.display()
    );

    println!();
    println!("{}", "Postmill initialized successfully!".green().bold());
    println!();
    println!("Next steps:");
    println!(
        "  1. Set the default author: {}",
        "postmill config set import.default_author <name>".cyan()
    );
    println!(
        "  2. Import posts: {}",
        "postmill import ~/Downloads/notion-export.zip".cyan()
    );

    Ok(())
}
