//! Muva CLI - Feed validation tools.
//!
//! # Usage
//!
//! ```bash
//! # Check a catalog file before uploading it
//! muva-cli catalog check crates/storefront/public/catalog.json
//!
//! # Fail on any normalization issue (for CI)
//! muva-cli catalog check catalog.json --strict
//!
//! # See which features a settings file enables
//! muva-cli settings check crates/storefront/public/settings.json
//! ```
//!
//! # Commands
//!
//! - `catalog check` - Parse a catalog feed the way the storefront does
//! - `settings check` - Report the booking and contact configuration

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::path::PathBuf;

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "muva-cli")]
#[command(author, version, about = "Muva boutique CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate catalog feeds
    Catalog {
        #[command(subcommand)]
        action: CatalogAction,
    },
    /// Validate settings feeds
    Settings {
        #[command(subcommand)]
        action: SettingsAction,
    },
}

#[derive(Subcommand)]
enum CatalogAction {
    /// Parse a catalog file and report products, facets and issues
    Check {
        /// Path to catalog.json
        path: PathBuf,

        /// Exit non-zero if any entry had to be skipped or corrected
        #[arg(long)]
        strict: bool,
    },
}

#[derive(Subcommand)]
enum SettingsAction {
    /// Parse a settings file and report which features it enables
    Check {
        /// Path to settings.json
        path: PathBuf,
    },
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Catalog { action } => match action {
            CatalogAction::Check { path, strict } => {
                commands::catalog::check(&path, strict).await?;
            }
        },
        Commands::Settings { action } => match action {
            SettingsAction::Check { path } => {
                commands::settings::check(&path).await?;
            }
        },
    }
    Ok(())
}
