//! Daybreak CLI - static site build wiring with a theme toggle.

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{fmt, EnvFilter};

mod commands;

#[derive(Parser)]
#[command(name = "daybreak")]
#[command(about = "Static site build wiring with a persisted light/dark theme toggle")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Path to site.toml config file
    #[arg(short, long, default_value = "site.toml")]
    config: PathBuf,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a starter site next to the config file
    Init {
        /// Overwrite existing files
        #[arg(short, long)]
        yes: bool,
    },

    /// Run stylesheet steps and copy passthrough assets
    Build {
        /// Output directory (defaults to config or "dist")
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Minify stylesheets regardless of config
        #[arg(long)]
        minify: bool,
    },

    /// Build, then rebuild whenever a watch target changes
    Watch {
        /// Minify stylesheets regardless of config
        #[arg(long)]
        minify: bool,
    },

    /// Show the resolved theme, or flip and save it
    Theme {
        /// Preference file (defaults to .daybreak/preferences.json)
        #[arg(short, long)]
        store: Option<PathBuf>,

        /// Flip the theme and save it as an explicit choice
        #[arg(short, long)]
        toggle: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    fmt().with_env_filter(filter).with_target(false).init();

    match cli.command {
        Commands::Init { yes } => {
            commands::init::run(&cli.config, yes)?;
        }
        Commands::Build { output, minify } => {
            commands::build::run(&cli.config, output, minify)?;
        }
        Commands::Watch { minify } => {
            commands::watch::run(&cli.config, minify).await?;
        }
        Commands::Theme { store, toggle } => {
            commands::theme::run(&cli.config, store, toggle)?;
        }
    }

    Ok(())
}
