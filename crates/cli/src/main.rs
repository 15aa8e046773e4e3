//! Duka CLI - catalog and cart inspection tools.
//!
//! # Usage
//!
//! ```bash
//! # Audit the catalog the storefront would load
//! duka-cli catalog check
//!
//! # Audit a specific catalog file
//! duka-cli catalog check --path content/catalog.json
//!
//! # Summarise an exported cart
//! duka-cli cart total cart.json
//! ```
//!
//! # Commands
//!
//! - `catalog check` - Report product cards whose price text would be recorded as zero
//! - `cart total` - Print item count and total of a persisted cart

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::path::PathBuf;

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "duka-cli")]
#[command(author, version, about = "Duka CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Inspect the product catalog
    Catalog {
        #[command(subcommand)]
        action: CatalogAction,
    },
    /// Inspect persisted carts
    Cart {
        #[command(subcommand)]
        action: CartAction,
    },
}

#[derive(Subcommand)]
enum CatalogAction {
    /// List every card with its parsed price; fail if any reads as zero
    Check {
        /// Catalog JSON file (default: `STOREFRONT_CATALOG_PATH`, then built-in)
        #[arg(short, long)]
        path: Option<PathBuf>,
    },
}

#[derive(Subcommand)]
enum CartAction {
    /// Print item count and total for a cart JSON export
    Total {
        /// Cart JSON file (array of `{name, price, quantity}`)
        file: PathBuf,
    },
}

fn main() {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Catalog { action } => match action {
            CatalogAction::Check { path } => commands::catalog::check(path)?,
        },
        Commands::Cart { action } => match action {
            CartAction::Total { file } => commands::cart::total(&file)?,
        },
    }
    Ok(())
}
