//! Remote catalog API client.
//!
//! # Architecture
//!
//! - Plain REST + JSON over `reqwest`
//! - The remote service is the source of truth for products, the cart, and
//!   orders - NO local state beyond an in-memory product cache
//! - Product listings and details are cached via `moka` (configurable TTL);
//!   cart and order calls are never cached
//!
//! # Example
//!
//! ```rust,ignore
//! use corner_shop_core::Quantity;
//! use corner_shop_storefront::catalog::CatalogClient;
//!
//! let client = CatalogClient::new(&config.catalog)?;
//!
//! let page = client.list_products(1, None).await?;
//! let product = client.get_product(&page.products[0].id).await?;
//!
//! client.add_to_cart(&product.id, Quantity::ONE).await?;
//! let cart = client.get_cart().await?;
//! ```

mod cache;
mod client;
mod wire;

pub use client::CatalogClient;

use reqwest::StatusCode;
use thiserror::Error;

/// Errors that can occur when talking to the catalog API.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// HTTP request failed (connection, timeout, body read).
    ///
    /// Stored without its URL, which contains the shop path.
    #[error("HTTP error: {0}")]
    Http(reqwest::Error),

    /// Response body could not be decoded.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// The API answered with `success: false` or a non-success status.
    #[error("API error ({status}): {message}")]
    Api {
        /// HTTP status of the response.
        status: StatusCode,
        /// Message reported by the API.
        message: String,
    },

    /// Requested resource does not exist.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Rate limited by the API.
    #[error("Rate limited, retry after {0} seconds")]
    RateLimited(u64),
}

impl From<reqwest::Error> for CatalogError {
    fn from(err: reqwest::Error) -> Self {
        Self::Http(err.without_url())
    }
}

impl CatalogError {
    /// Text suitable for showing to the shopper.
    ///
    /// Uses the remote message when the API supplied one; transport and
    /// decoding failures get a generic message.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Api { message, .. } | Self::NotFound(message) => message.clone(),
            Self::RateLimited(secs) => {
                format!("Too many requests. Please try again in {secs} seconds.")
            }
            Self::Http(e) if e.is_timeout() => {
                "The shop is taking too long to respond. Please try again.".to_string()
            }
            Self::Http(_) | Self::Parse(_) => {
                "The shop is temporarily unavailable. Please try again.".to_string()
            }
        }
    }

    /// Whether this is a failure of the remote service or the network
    /// rather than a rejection of the request.
    #[must_use]
    pub fn is_upstream_failure(&self) -> bool {
        match self {
            Self::Http(_) | Self::Parse(_) => true,
            Self::Api { status, .. } => status.is_server_error(),
            Self::NotFound(_) | Self::RateLimited(_) => false,
        }
    }
}
