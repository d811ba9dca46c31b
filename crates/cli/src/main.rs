//! Price Cart CLI - catalog and checkout tools.
//!
//! # Usage
//!
//! ```bash
//! # Print the live catalog
//! price-cart catalog
//!
//! # Same, as JSON, at most 3 prices
//! price-cart catalog --limit 3 --json
//!
//! # Open a hosted checkout session for two items
//! price-cart checkout --item price_123:2 --item price_456 --return-url https://shop.example.com/
//! ```
//!
//! # Commands
//!
//! - `catalog` - List active prices the storefront would show
//! - `checkout` - Create a hosted checkout session and print its URL
//!
//! Both read the `STRIPE_*` variables (and `.env`) like the storefront.

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};

mod commands;

use commands::checkout::ItemArg;

#[derive(Parser)]
#[command(name = "price-cart")]
#[command(author, version, about = "Price Cart CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the live catalog
    Catalog {
        /// Number of prices to fetch (defaults to `STRIPE_CATALOG_LIMIT`)
        #[arg(short, long, value_parser = clap::value_parser!(u8).range(1..=100))]
        limit: Option<u8>,

        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },
    /// Create a hosted checkout session
    Checkout {
        /// Line item as `PRICE_ID[:QUANTITY]` (quantity defaults to 1)
        #[arg(short, long = "item", required = true)]
        items: Vec<ItemArg>,

        /// URL Stripe returns to after payment or cancellation
        #[arg(short, long)]
        return_url: url::Url,
    },
}

#[tokio::main]
async fn main() {
    // Initialize tracing (stderr, so stdout stays machine-readable)
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Catalog { limit, json } => commands::catalog::list(limit, json).await?,
        Commands::Checkout { items, return_url } => {
            commands::checkout::create(items, &return_url).await?;
        }
    }
    Ok(())
}
