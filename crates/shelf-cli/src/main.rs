//! Shelf CLI
//!
//! Command-line interface for Shelf - a local book tracker.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use shelf_core::{Config, FileStorage, ReadStatus, Tracker};

mod commands;
mod output;
mod prompt;
mod tui;

use output::{Output, OutputFormat};

#[derive(Parser)]
#[command(name = "shelf")]
#[command(about = "Shelf - Track your books and reading progress")]
#[command(version)]
#[command(propagate_version = true)]
struct Cli {
    /// Output as JSON
    #[arg(long, global = true)]
    json: bool,

    /// Quiet mode - minimal output
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Path to an alternative config file
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the TUI interface
    Tui,
    /// Add a book
    Add {
        /// Book title
        #[arg(short, long)]
        name: String,
        /// Author name
        #[arg(short, long)]
        author: String,
        /// Number of pages
        #[arg(short, long)]
        pages: String,
        /// Whether the book has been read (yes or no)
        #[arg(short, long, default_value = "Yes")]
        read: String,
    },
    /// List books
    #[command(alias = "ls")]
    List {
        /// Only books with this read status (yes or no)
        #[arg(short, long)]
        read: Option<String>,
    },
    /// Change the read status of a book
    Edit {
        /// Book ID
        id: String,
        /// New read status (yes or no)
        status: String,
    },
    /// Delete a book
    #[command(alias = "rm")]
    Delete {
        /// Book ID
        id: String,
    },
    /// Delete every book
    Clear {
        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
    /// Show the "Done reading" and "Yet to read" lists
    Aside,
    /// Show status (storage location, counts)
    Status,
    /// Show or set configuration
    Config {
        #[command(subcommand)]
        command: Option<ConfigCommands>,
    },
}

#[derive(Subcommand, Clone)]
enum ConfigCommands {
    /// Show current configuration
    Show,
    /// Set a configuration value
    Set {
        /// Configuration key (data_dir, flavor, notice_timeout_ms, log_file)
        key: String,
        /// Configuration value
        value: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let output = Output::new(OutputFormat::from_flags(cli.json, cli.quiet));
    let config_path = cli.config.as_ref();

    // Config commands don't need the store
    if let Some(Commands::Config { command }) = &cli.command {
        init_cli_logging();
        return handle_config_command(command.clone(), config_path, &output);
    }

    let config =
        Config::load_with_cli_override(config_path).context("Failed to load configuration")?;

    // TUI (default when no command given) sets up its own file logging
    let Some(command) = cli.command else {
        return tui::run(config).await;
    };
    if matches!(command, Commands::Tui) {
        return tui::run(config).await;
    }

    init_cli_logging();
    let mut tracker = open_tracker(&config)?;

    match command {
        Commands::Tui | Commands::Config { .. } => Ok(()), // Handled above
        Commands::Add {
            name,
            author,
            pages,
            read,
        } => commands::book::add(&mut tracker, &config, name, author, pages, read, &output),
        Commands::List { read } => {
            let filter = read
                .map(|r| r.parse::<ReadStatus>())
                .transpose()
                .context("Invalid --read filter")?;
            commands::book::list(&tracker, filter, &output)
        }
        Commands::Edit { id, status } => {
            commands::book::edit(&mut tracker, &config, id, status, &output)
        }
        Commands::Delete { id } => commands::book::delete(&mut tracker, &config, id, &output),
        Commands::Clear { yes } => commands::book::clear(&mut tracker, &config, yes, &output),
        Commands::Aside => commands::book::aside(&tracker, &output),
        Commands::Status => commands::status::show(&tracker, &config, &output),
    }
}

/// Open the tracker over the configured data directory
fn open_tracker(config: &Config) -> Result<Tracker<FileStorage>> {
    Tracker::open(FileStorage::from_config(config))
        .with_context(|| format!("Failed to open book store in {:?}", config.data_dir))
}

fn handle_config_command(
    command: Option<ConfigCommands>,
    config_path: Option<&PathBuf>,
    output: &Output,
) -> Result<()> {
    match command {
        Some(ConfigCommands::Show) | None => commands::config::show(config_path, output),
        Some(ConfigCommands::Set { key, value }) => {
            commands::config::set(key, value, config_path, output)
        }
    }
}

/// Initialize stderr logging for CLI commands
///
/// Only initializes if SHELF_LOG environment variable is set.
fn init_cli_logging() {
    let Ok(log_level) = std::env::var("SHELF_LOG") else {
        return;
    };

    let env_filter = EnvFilter::new(format!("shelf_core={},shelf={}", log_level, log_level));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}
