//! Catalog API client implementation.
//!
//! Caches product listings and details using `moka`. The cart and orders
//! always go to the network.

use std::sync::Arc;

use corner_shop_core::{
    CartItemId, CartSummary, OrderReceipt, Product, ProductId, ProductPage, Quantity, ValidOrder,
};
use moka::future::Cache;
use reqwest::StatusCode;
use url::Url;
use serde::de::DeserializeOwned;
use tracing::{debug, instrument};

use super::CatalogError;
use super::cache::{CacheKey, CacheValue};
use super::wire::{
    CartLineBody, CartResponse, DataBody, Envelope, MessageResponse, OrderBody, ProductResponse,
    ProductsResponse,
};
use crate::config::CatalogApiConfig;

/// How much of an unexpected response body to log.
const LOGGED_BODY_CHARS: usize = 500;

// =============================================================================
// CatalogClient
// =============================================================================

/// Client for the remote catalog API.
///
/// Cheap to clone; clones share the HTTP connection pool and the cache.
#[derive(Clone)]
pub struct CatalogClient {
    inner: Arc<CatalogClientInner>,
}

impl std::fmt::Debug for CatalogClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // The API root carries the shop path, so it stays out of logs
        f.debug_struct("CatalogClient")
            .field("caching", &self.is_caching())
            .finish_non_exhaustive()
    }
}

struct CatalogClientInner {
    client: reqwest::Client,
    api_root: Url,
    cache: Option<Cache<CacheKey, CacheValue>>,
}

impl CatalogClient {
    /// Create a new catalog API client.
    ///
    /// A zero `cache_ttl` disables caching.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(config: &CatalogApiConfig) -> Result<Self, CatalogError> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .user_agent(concat!(
                env!("CARGO_PKG_NAME"),
                "/",
                env!("CARGO_PKG_VERSION")
            ))
            .build()?;

        let cache = (!config.cache_ttl.is_zero()).then(|| {
            Cache::builder()
                .max_capacity(1000)
                .time_to_live(config.cache_ttl)
                .build()
        });

        Ok(Self {
            inner: Arc::new(CatalogClientInner {
                client,
                api_root: config.api_root(),
                cache,
            }),
        })
    }

    /// Endpoint URL under the API root. Each segment is percent-encoded
    /// on its own, so an id containing `/` cannot climb out of its path.
    fn url(&self, segments: &[&str]) -> Url {
        let mut url = self.inner.api_root.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.extend(segments);
        }
        url
    }

    /// Send a request and decode the response body.
    async fn send<T: DeserializeOwned>(
        &self,
        request: reqwest::RequestBuilder,
    ) -> Result<T, CatalogError> {
        let response = request.send().await?;
        let status = response.status();

        if status == StatusCode::TOO_MANY_REQUESTS {
            let retry_after = response
                .headers()
                .get("Retry-After")
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.trim().parse::<u64>().ok())
                .unwrap_or(1);
            return Err(CatalogError::RateLimited(retry_after));
        }

        // Read as text first so failures can be logged with the body
        let body = response.text().await?;
        decode_response(status, &body)
    }

    async fn cached(&self, key: &CacheKey) -> Option<CacheValue> {
        match &self.inner.cache {
            Some(cache) => cache.get(key).await,
            None => None,
        }
    }

    async fn store(&self, key: CacheKey, value: CacheValue) {
        if let Some(cache) = &self.inner.cache {
            cache.insert(key, value).await;
        }
    }

    // =========================================================================
    // Product Methods
    // =========================================================================

    /// Get one page of products.
    ///
    /// Pages below 1 are treated as page 1.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self))]
    pub async fn list_products(
        &self,
        page: u32,
        category: Option<&str>,
    ) -> Result<ProductPage, CatalogError> {
        let page = page.max(1);
        let category = category.map(str::trim).filter(|c| !c.is_empty());
        let key = CacheKey::Products {
            page,
            category: category.map(str::to_owned),
        };

        if let Some(CacheValue::Products(products)) = self.cached(&key).await {
            debug!("Cache hit for products");
            return Ok(products);
        }

        let products = self.fetch_products(page, category).await?;
        self.store(key, CacheValue::Products(products.clone())).await;

        Ok(products)
    }

    async fn fetch_products(
        &self,
        page: u32,
        category: Option<&str>,
    ) -> Result<ProductPage, CatalogError> {
        let mut query = vec![("page", page.to_string())];
        if let Some(category) = category {
            query.push(("category", category.to_owned()));
        }

        let request = self.inner.client.get(self.url(&["products"])).query(&query);
        let response: ProductsResponse = self.send(request).await?;
        Ok(response.into())
    }

    /// Get a single product.
    ///
    /// # Errors
    ///
    /// Returns an error if the product does not exist or the API request
    /// fails.
    #[instrument(skip(self), fields(product_id = %id))]
    pub async fn get_product(&self, id: &ProductId) -> Result<Product, CatalogError> {
        let key = CacheKey::Product(id.clone());

        if let Some(CacheValue::Product(product)) = self.cached(&key).await {
            debug!("Cache hit for product");
            return Ok(*product);
        }

        let segment = id_segment(id.as_str(), "Product not found")?;
        let request = self.inner.client.get(self.url(&["product", segment]));
        let response: ProductResponse = self.send(request).await?;
        let product = response.product;

        self.store(key, CacheValue::Product(Box::new(product.clone())))
            .await;

        Ok(product)
    }

    // =========================================================================
    // Cart Methods (not cached - mutable state)
    // =========================================================================

    /// Get the current cart with its totals.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self))]
    pub async fn get_cart(&self) -> Result<CartSummary, CatalogError> {
        let request = self.inner.client.get(self.url(&["cart"]));
        let response: CartResponse = self.send(request).await?;
        Ok(response.data)
    }

    /// Add a product to the cart.
    ///
    /// Returns the API's confirmation message.
    ///
    /// # Errors
    ///
    /// Returns an error if the API rejects the line or the request fails.
    #[instrument(skip(self), fields(product_id = %product_id, qty = %qty))]
    pub async fn add_to_cart(
        &self,
        product_id: &ProductId,
        qty: Quantity,
    ) -> Result<String, CatalogError> {
        let body = DataBody {
            data: CartLineBody {
                product_id,
                qty: qty.get(),
            },
        };

        let request = self.inner.client.post(self.url(&["cart"])).json(&body);
        let response: MessageResponse = self.send(request).await?;
        Ok(response.into_text())
    }

    /// Set the quantity of an existing cart line.
    ///
    /// # Errors
    ///
    /// Returns an error if the API rejects the update or the request fails.
    #[instrument(skip(self), fields(item_id = %item_id, qty = %qty))]
    pub async fn update_cart_item(
        &self,
        item_id: &CartItemId,
        product_id: &ProductId,
        qty: Quantity,
    ) -> Result<String, CatalogError> {
        let body = DataBody {
            data: CartLineBody {
                product_id,
                qty: qty.get(),
            },
        };

        let segment = id_segment(item_id.as_str(), "Cart item not found")?;
        let request = self
            .inner
            .client
            .put(self.url(&["cart", segment]))
            .json(&body);
        let response: MessageResponse = self.send(request).await?;
        Ok(response.into_text())
    }

    /// Remove one line from the cart.
    ///
    /// # Errors
    ///
    /// Returns an error if the line does not exist or the request fails.
    #[instrument(skip(self), fields(item_id = %item_id))]
    pub async fn remove_cart_item(&self, item_id: &CartItemId) -> Result<String, CatalogError> {
        let segment = id_segment(item_id.as_str(), "Cart item not found")?;
        let request = self.inner.client.delete(self.url(&["cart", segment]));
        let response: MessageResponse = self.send(request).await?;
        Ok(response.into_text())
    }

    /// Remove every line from the cart.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self))]
    pub async fn clear_cart(&self) -> Result<String, CatalogError> {
        let request = self.inner.client.delete(self.url(&["carts"]));
        let response: MessageResponse = self.send(request).await?;
        Ok(response.into_text())
    }

    // =========================================================================
    // Order Methods
    // =========================================================================

    /// Place an order for the current cart.
    ///
    /// # Errors
    ///
    /// Returns an error if the API rejects the order (for example, an empty
    /// cart) or the request fails.
    #[instrument(skip(self, order))]
    pub async fn submit_order(&self, order: &ValidOrder) -> Result<OrderReceipt, CatalogError> {
        let body = DataBody {
            data: OrderBody::from(order),
        };

        let request = self.inner.client.post(self.url(&["order"])).json(&body);
        let receipt: OrderReceipt = self.send(request).await?;
        tracing::info!(order_id = %receipt.order_id, "Order placed");
        Ok(receipt)
    }

    // =========================================================================
    // Maintenance
    // =========================================================================

    /// Check that the API is reachable, bypassing the cache.
    ///
    /// # Errors
    ///
    /// Returns the failure if the API cannot be reached or answers with an
    /// error.
    pub async fn health_check(&self) -> Result<(), CatalogError> {
        self.fetch_products(1, None).await.map(|_| ())
    }

    /// Whether responses are cached.
    #[must_use]
    pub fn is_caching(&self) -> bool {
        self.inner.cache.is_some()
    }
}

/// Classify and decode a response body.
///
/// A `success: false` flag or a non-success status becomes an error
/// carrying the API's message; anything else is decoded as `T`.
fn decode_response<T: DeserializeOwned>(status: StatusCode, body: &str) -> Result<T, CatalogError> {
    let envelope = serde_json::from_str::<Envelope>(body).ok();
    let rejected = envelope
        .as_ref()
        .is_some_and(|e| e.success == Some(false));

    if rejected || !status.is_success() {
        tracing::warn!(
            status = %status,
            body = %truncate(body),
            "Catalog API returned an error"
        );

        let message = envelope
            .and_then(|e| e.message)
            .map(super::wire::ApiMessage::into_text)
            .filter(|m| !m.trim().is_empty())
            .unwrap_or_else(|| {
                status
                    .canonical_reason()
                    .unwrap_or("Request failed")
                    .to_string()
            });

        return Err(if status == StatusCode::NOT_FOUND {
            CatalogError::NotFound(message)
        } else {
            CatalogError::Api { status, message }
        });
    }

    serde_json::from_str(body).map_err(|e| {
        tracing::error!(
            error = %e,
            body = %truncate(body),
            "Failed to parse catalog API response"
        );
        CatalogError::Parse(e)
    })
}

/// An id usable as one path segment. Blank and dot segments would address
/// a different endpoint, so they are treated as unknown ids.
fn id_segment<'a>(id: &'a str, missing: &str) -> Result<&'a str, CatalogError> {
    if id.trim().is_empty() || matches!(id, "." | "..") {
        return Err(CatalogError::NotFound(missing.to_string()));
    }
    Ok(id)
}

fn truncate(body: &str) -> String {
    body.chars().take(LOGGED_BODY_CHARS).collect()
}
