//! Postmill CLI - Import Markdown posts into your blog.

mod commands;

use clap::{Parser, Subcommand};
use colored::Colorize;
use postmill_config::Config;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Postmill - Markdown and ZIP importer for your blog
#[derive(Parser)]
#[command(name = "postmill")]
#[command(author = "Lalo Morales <lalomorales22@github.com>")]
#[command(version)]
#[command(about = "Import Markdown files, Notion exports and ZIP archives as blog posts", long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize Postmill (create config and database)
    Init,

    /// Manage configuration
    #[command(subcommand)]
    Config(ConfigCommands),

    /// Import Markdown files, directories or a ZIP archive
    Import {
        /// Files or directories to import; a single .zip is imported as an archive
        #[arg(required = true)]
        paths: Vec<String>,

        /// Author recorded on the imported posts (default: from config)
        #[arg(short, long)]
        author: Option<String>,

        /// Show what would be imported without storing anything
        #[arg(long)]
        dry_run: bool,

        /// Print the result as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show a stored post
    Show {
        /// Post ID
        id: String,
    },
}

#[derive(Subcommand)]
enum ConfigCommands {
    /// Show current configuration
    Show,

    /// Set a configuration value
    Set {
        /// Configuration key (e.g., import.default_author)
        key: String,

        /// Value to set
        value: String,
    },
}

fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("postmill=debug,info"))
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("postmill=info,warn"))
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if let Ok(config) = Config::load() {
        if !config.ui.color {
            colored::control::set_override(false);
        }
    }

    let result = match cli.command {
        Commands::Init => commands::init::run(),
        Commands::Config(cmd) => match cmd {
            ConfigCommands::Show => commands::config::show(),
            ConfigCommands::Set { key, value } => commands::config::set(&key, &value),
        },
        Commands::Import {
            paths,
            author,
            dry_run,
            json,
        } => commands::import::run(&paths, author, dry_run, json),
        Commands::Show { id } => commands::show::run(&id),
    };

    if let Err(e) = result {
        eprintln!("{} {:#}", "Error:".red().bold(), e);
        std::process::exit(1);
    }
}
