//! Print the live catalog.

use std::io::Write;

use price_cart_storefront::config::StripeConfig;
use price_cart_storefront::services::catalog::load_catalog;
use price_cart_storefront::stripe::StripeClient;
use tracing::info;

/// Fetch the catalog and print it to stdout.
///
/// # Errors
///
/// Returns an error if the Stripe settings are missing or invalid, Stripe
/// cannot be reached, or any price is malformed.
pub async fn list(limit: Option<u8>, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let config = StripeConfig::from_env()?;
    let client = StripeClient::new(&config)?;
    let limit = limit.unwrap_or(config.catalog_limit);

    let items = load_catalog(&client, limit).await?;
    info!(count = items.len(), "Loaded catalog");

    let mut out = std::io::stdout().lock();

    if json {
        serde_json::to_writer_pretty(&mut out, &items)?;
        writeln!(out)?;
        return Ok(());
    }

    for item in &items {
        writeln!(
            out,
            "{:<32} {:>10}  {}{}",
            item.id,
            item.unit_price,
            item.name,
            item.image
                .as_deref()
                .map(|image| format!("  [{image}]"))
                .unwrap_or_default()
        )?;
    }

    Ok(())
}
