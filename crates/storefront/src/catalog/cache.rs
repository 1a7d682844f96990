//! Cache types for catalog API responses.

use corner_shop_core::{Product, ProductId, ProductPage};

/// Cache key for product listings and details.
#[derive(Debug, Clone, Hash, PartialEq, Eq)]
pub enum CacheKey {
    Products { page: u32, category: Option<String> },
    Product(ProductId),
}

/// Cached value types.
#[derive(Debug, Clone)]
pub enum CacheValue {
    Products(ProductPage),
    Product(Box<Product>),
}
