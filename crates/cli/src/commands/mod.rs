//! CLI command implementations.

pub mod cart;
pub mod order;
pub mod products;

use std::time::Duration;

use corner_shop_storefront::catalog::{CatalogClient, CatalogError};
use corner_shop_storefront::config::{CatalogApiConfig, ConfigError};
use thiserror::Error;

/// Errors reported by CLI commands.
#[derive(Debug, Error)]
pub enum CliError {
    #[error("Missing {flag} (or set {env})")]
    MissingSetting {
        flag: &'static str,
        env: &'static str,
    },
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Catalog(#[from] CatalogError),
    #[error("{0}")]
    Invalid(String),
}

/// Build an uncached catalog client from the connection flags.
///
/// # Errors
///
/// Returns an error if a setting is missing or invalid.
pub fn connect(
    base_url: Option<&str>,
    api_path: Option<&str>,
    timeout_secs: u64,
) -> Result<CatalogClient, CliError> {
    let base_url = base_url.ok_or(CliError::MissingSetting {
        flag: "--base-url",
        env: "CATALOG_API_BASE_URL",
    })?;
    let api_path = api_path.ok_or(CliError::MissingSetting {
        flag: "--api-path",
        env: "CATALOG_API_PATH",
    })?;

    let config = CatalogApiConfig::new(
        base_url,
        api_path,
        Duration::from_secs(timeout_secs),
        Duration::ZERO,
    )?;

    Ok(CatalogClient::new(&config)?)
}

/// Check that the catalog API answers.
///
/// # Errors
///
/// Returns an error if the product listing cannot be fetched.
#[allow(clippy::print_stdout)]
pub async fn health(client: &CatalogClient) -> Result<(), CliError> {
    client.health_check().await?;
    println!("Catalog API is reachable");
    Ok(())
}
