//! Catalog, cart, and pagination records.
//!
//! These mirror the JSON shapes of the remote catalog API. They are
//! ephemeral copies of server state and are replaced wholesale on every
//! fetch, so they carry no invariants beyond what the server guarantees.

use std::ops::RangeInclusive;

use serde::{Deserialize, Deserializer, Serialize};

use super::id::{CartItemId, ProductId};
use super::price::Price;

// =============================================================================
// Product
// =============================================================================

/// A product in the remote catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub title: String,
    #[serde(default)]
    pub category: String,
    /// Primary image URL.
    #[serde(rename = "imageUrl", default)]
    pub image_url: String,
    /// Additional image URLs.
    #[serde(rename = "imagesUrl", default)]
    pub images_url: Vec<String>,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub description: String,
    pub price: Price,
    /// List price before the discount.
    #[serde(rename = "origin_price")]
    pub original_price: Price,
    /// Display unit, e.g. "box".
    #[serde(default)]
    pub unit: String,
    #[serde(default = "default_enabled", deserialize_with = "flag")]
    pub is_enabled: bool,
}

impl Product {
    /// Whether the sale price is below the list price.
    #[must_use]
    pub fn is_discounted(&self) -> bool {
        self.price < self.original_price
    }
}

const fn default_enabled() -> bool {
    true
}

/// The API encodes flags as either `0`/`1` or `false`/`true`.
fn flag<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Flag {
        Bool(bool),
        Int(i64),
    }

    Ok(match Flag::deserialize(deserializer)? {
        Flag::Bool(b) => b,
        Flag::Int(i) => i != 0,
    })
}

// =============================================================================
// Cart
// =============================================================================

/// One line of the remote cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartItem {
    pub id: CartItemId,
    pub product_id: ProductId,
    pub product: Product,
    pub qty: u32,
    /// Line total before discounts.
    #[serde(default)]
    pub total: Price,
    /// Line total after discounts.
    #[serde(default)]
    pub final_total: Price,
}

/// The whole remote cart with its computed totals.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CartSummary {
    #[serde(rename = "carts", default)]
    pub items: Vec<CartItem>,
    #[serde(default)]
    pub total: Price,
    #[serde(default)]
    pub final_total: Price,
}

impl CartSummary {
    /// An empty cart with zero totals.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Whether the cart has no lines.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Total number of units across all lines.
    #[must_use]
    pub fn item_count(&self) -> u32 {
        self.items.iter().map(|item| item.qty).sum()
    }
}

// =============================================================================
// Pagination
// =============================================================================

/// Page metadata returned alongside a product listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pagination {
    pub total_pages: u32,
    pub current_page: u32,
    pub has_pre: bool,
    pub has_next: bool,
    #[serde(default)]
    pub category: String,
}

impl Pagination {
    /// Pagination for a listing that fits on one page.
    #[must_use]
    pub const fn single_page() -> Self {
        Self {
            total_pages: 1,
            current_page: 1,
            has_pre: false,
            has_next: false,
            category: String::new(),
        }
    }

    /// Page numbers to render, `1..=total_pages`.
    #[must_use]
    pub const fn pages(&self) -> RangeInclusive<u32> {
        1..=self.total_pages
    }

    /// The previous page number, if there is one.
    #[must_use]
    pub const fn previous_page(&self) -> Option<u32> {
        if self.has_pre && self.current_page > 1 {
            Some(self.current_page - 1)
        } else {
            None
        }
    }

    /// The next page number, if there is one.
    #[must_use]
    pub const fn next_page(&self) -> Option<u32> {
        if self.has_next {
            Some(self.current_page.saturating_add(1))
        } else {
            None
        }
    }

    /// Whether `page` is the page being displayed.
    #[must_use]
    pub const fn is_current(&self, page: u32) -> bool {
        self.current_page == page
    }
}

impl Default for Pagination {
    fn default() -> Self {
        Self::single_page()
    }
}

/// One page of products.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ProductPage {
    pub products: Vec<Product>,
    pub pagination: Pagination,
}
