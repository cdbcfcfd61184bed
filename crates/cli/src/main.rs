//! Storekit CLI - Catalog and cart tools.
//!
//! # Usage
//!
//! ```bash
//! # Print a category tree from a flat export
//! storekit tree categories.json --sort-order
//!
//! # Resolve product facets
//! storekit facets attributes.yaml --select Color=Red
//!
//! # Work with the persisted cart
//! storekit cart add p1 10.50 --qty 2
//! storekit cart show
//! ```
//!
//! # Commands
//!
//! - `tree` - Build and print a category tree
//! - `breadcrumbs` - Print the path from a root to a category
//! - `facets` - Group attribute values into facets
//! - `cart` - Inspect or change the cart snapshot
//!
//! Logs are written to stderr; set `RUST_LOG` to adjust verbosity.

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use rust_decimal::Decimal;
use storekit_core::SelectedOption;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;
mod config;
mod error;
mod input;

use commands::cart::CartAction;
use config::CliConfig;
use error::CliError;

#[derive(Parser)]
#[command(name = "storekit")]
#[command(author, version, about = "Storekit catalog and cart tools")]
struct Cli {
    /// Emit logs as JSON
    #[arg(long, global = true)]
    log_json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build a category tree from a flat record file
    Tree {
        /// JSON or YAML file with category records
        file: PathBuf,

        /// Sort siblings by `sortOrder` instead of input order
        #[arg(long)]
        sort_order: bool,

        /// Hide inactive categories and their subtrees
        #[arg(long)]
        active_only: bool,

        /// Print the tree as JSON
        #[arg(long)]
        json: bool,
    },
    /// Print the path from a root category to the given category
    Breadcrumbs {
        /// JSON or YAML file with category records
        file: PathBuf,

        /// Category id
        id: i64,
    },
    /// Group a product's attribute values into facets
    Facets {
        /// JSON or YAML file with attribute value records
        file: PathBuf,

        /// Preselect a value (`NAME=VALUE`), repeatable
        #[arg(short, long = "select", value_parser = parse_option)]
        selections: Vec<SelectedOption>,

        /// Print facets and selection as JSON
        #[arg(long)]
        json: bool,
    },
    /// Inspect or change the persisted cart
    Cart {
        /// Directory holding the cart snapshot (overrides `STOREKIT_DATA_DIR`)
        #[arg(long)]
        data_dir: Option<PathBuf>,

        /// Cart store name (overrides `STOREKIT_CART_STORE`)
        #[arg(long)]
        store: Option<String>,

        /// Print the cart as JSON
        #[arg(long)]
        json: bool,

        #[command(subcommand)]
        action: CartCommand,
    },
}

#[derive(Subcommand)]
enum CartCommand {
    /// Show the cart
    Show,
    /// Add a product, merging with an existing line
    Add {
        /// Product or variant id
        product_id: String,

        /// Unit price, e.g. 10.50
        price: Decimal,

        /// Quantity to add
        #[arg(short, long, default_value_t = 1)]
        qty: u32,

        /// Display title
        #[arg(short, long)]
        title: Option<String>,

        /// Selected option (`NAME=VALUE`), repeatable
        #[arg(short, long = "option", value_parser = parse_option)]
        options: Vec<SelectedOption>,
    },
    /// Raise a line's quantity by one
    Increment { key: String },
    /// Lower a line's quantity by one (never below 1)
    Decrement { key: String },
    /// Set a line's quantity (0 removes the line)
    Set { key: String, quantity: u32 },
    /// Remove a line
    Remove { key: String },
    /// Empty the cart
    Clear,
}

impl From<CartCommand> for CartAction {
    fn from(command: CartCommand) -> Self {
        match command {
            CartCommand::Show => Self::Show,
            CartCommand::Add {
                product_id,
                price,
                qty,
                title,
                options,
            } => Self::Add {
                product_id,
                unit_price: price,
                quantity: qty,
                title,
                options,
            },
            CartCommand::Increment { key } => Self::Increment(key),
            CartCommand::Decrement { key } => Self::Decrement(key),
            CartCommand::Set { key, quantity } => Self::Set(key, quantity),
            CartCommand::Remove { key } => Self::Remove(key),
            CartCommand::Clear => Self::Clear,
        }
    }
}

/// Parse `NAME=VALUE` into a selected option.
fn parse_option(s: &str) -> Result<SelectedOption, String> {
    let (name, value) = s
        .split_once('=')
        .ok_or_else(|| format!("expected NAME=VALUE, got {s:?}"))?;
    if name.is_empty() {
        return Err(format!("option name cannot be empty in {s:?}"));
    }
    Ok(SelectedOption::new(name, value))
}

fn init_tracing(json: bool) {
    // Defaults to info level for our crates if RUST_LOG is not set
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "storekit_cli=info,storekit_core=info".into());

    let registry = tracing_subscriber::registry().with(env_filter);
    if json {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_writer(std::io::stderr),
            )
            .init();
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.log_json);

    if let Err(e) = run(cli) {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), CliError> {
    match cli.command {
        Commands::Tree {
            file,
            sort_order,
            active_only,
            json,
        } => commands::catalog::tree(&file, sort_order, active_only, json),
        Commands::Breadcrumbs { file, id } => commands::catalog::breadcrumbs(&file, id),
        Commands::Facets {
            file,
            selections,
            json,
        } => commands::catalog::facets(&file, &selections, json),
        Commands::Cart {
            data_dir,
            store,
            json,
            action,
        } => {
            let mut config = CliConfig::from_env()?;
            if let Some(dir) = data_dir {
                config.data_dir = dir;
            }
            if let Some(name) = store {
                config.set_cart_store(name)?;
            }
            commands::cart::run(&config, action.into(), json)
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_option() {
        assert_eq!(
            parse_option("Size=10 cm").unwrap(),
            SelectedOption::new("Size", "10 cm")
        );
        assert_eq!(parse_option("Note=").unwrap(), SelectedOption::new("Note", ""));
        assert!(parse_option("Size").is_err());
        assert!(parse_option("=Red").is_err());
    }

    #[test]
    fn test_cli_parses_cart_add() {
        let cli = Cli::try_parse_from([
            "storekit", "cart", "--json", "add", "tee", "19.99", "--qty", "2", "-o", "Size=M",
        ])
        .unwrap();

        let Commands::Cart { json, action, .. } = cli.command else {
            panic!("expected cart command");
        };
        assert!(json);
        assert_eq!(
            CartAction::from(action),
            CartAction::Add {
                product_id: "tee".to_string(),
                unit_price: Decimal::new(1999, 2),
                quantity: 2,
                title: None,
                options: vec![SelectedOption::new("Size", "M")],
            }
        );
    }

    #[test]
    fn test_cli_verifies() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
