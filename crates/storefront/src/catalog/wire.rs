//! Request and response bodies of the catalog API.

use corner_shop_core::{
    CartSummary, OrderUser, Pagination, Product, ProductId, ProductPage, ValidOrder,
};
use serde::{Deserialize, Serialize};

/// The `message` field: a string on most endpoints, a list on some
/// validation failures.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum ApiMessage {
    Text(String),
    List(Vec<String>),
}

impl ApiMessage {
    /// Flatten into one line of text.
    pub fn into_text(self) -> String {
        match self {
            Self::Text(text) => text,
            Self::List(items) => items.join("; "),
        }
    }
}

/// Fields every response carries.
#[derive(Debug, Deserialize)]
pub struct Envelope {
    #[serde(default)]
    pub success: Option<bool>,
    #[serde(default)]
    pub message: Option<ApiMessage>,
}

/// `GET /products`
#[derive(Debug, Deserialize)]
pub struct ProductsResponse {
    #[serde(default)]
    pub products: Vec<Product>,
    #[serde(default)]
    pub pagination: Pagination,
}

impl From<ProductsResponse> for ProductPage {
    fn from(response: ProductsResponse) -> Self {
        Self {
            products: response.products,
            pagination: response.pagination,
        }
    }
}

/// `GET /product/{id}`
#[derive(Debug, Deserialize)]
pub struct ProductResponse {
    pub product: Product,
}

/// `GET /cart`
#[derive(Debug, Deserialize)]
pub struct CartResponse {
    #[serde(default)]
    pub data: CartSummary,
}

/// Mutations that only report a message.
#[derive(Debug, Deserialize)]
pub struct MessageResponse {
    #[serde(default)]
    pub message: Option<ApiMessage>,
}

impl MessageResponse {
    pub fn into_text(self) -> String {
        self.message.map(ApiMessage::into_text).unwrap_or_default()
    }
}

/// Body wrapper: the API expects every payload under `data`.
#[derive(Debug, Serialize)]
pub struct DataBody<T> {
    pub data: T,
}

/// `POST /cart`, `PUT /cart/{id}`
#[derive(Debug, Serialize)]
pub struct CartLineBody<'a> {
    pub product_id: &'a ProductId,
    pub qty: u32,
}

/// `POST /order`
#[derive(Debug, Serialize)]
pub struct OrderBody<'a> {
    pub user: &'a OrderUser,
    pub message: &'a str,
}

impl<'a> From<&'a ValidOrder> for OrderBody<'a> {
    fn from(order: &'a ValidOrder) -> Self {
        Self {
            user: &order.user,
            message: &order.message,
        }
    }
}
