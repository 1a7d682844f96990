//! Cart route handlers.
//!
//! The cart lives on the catalog API. Every mutation is followed by a fresh
//! `GET /cart` and answered with the re-rendered cart section, plus an
//! `HX-Trigger` so the header badge refreshes itself.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Path, State},
    http::HeaderValue,
    response::{AppendHeaders, IntoResponse, Response},
};
use corner_shop_core::{CartItemId, CartSummary, ProductId, Quantity};
use serde::Deserialize;
use tracing::instrument;

use crate::error::{AppError, Result, add_breadcrumb};
use crate::state::AppState;

/// Event fired after any cart change.
pub const CART_UPDATED: &str = "cart-updated";
/// Event that closes the product modal.
pub const CLOSE_MODAL: &str = "close-modal";

/// Cart line form data, used for both add and update.
#[derive(Debug, Deserialize)]
pub struct CartLineForm {
    pub product_id: String,
    #[serde(default)]
    pub qty: String,
}

impl CartLineForm {
    /// Parse the submitted quantity. A missing value means 1.
    ///
    /// # Errors
    ///
    /// Returns `AppError::BadRequest` if the value is not a whole number in
    /// the accepted range.
    pub fn quantity(&self) -> Result<Quantity> {
        let raw = self.qty.trim();
        if raw.is_empty() {
            return Ok(Quantity::ONE);
        }

        let value = raw
            .parse::<i64>()
            .map_err(|_| AppError::BadRequest("Quantity must be a whole number".to_string()))?;

        Quantity::new(value).map_err(|e| AppError::BadRequest(capitalize(&e.to_string())))
    }

    fn product_id(&self) -> Result<ProductId> {
        let id = self.product_id.trim();
        if id.is_empty() {
            return Err(AppError::BadRequest("Missing product".to_string()));
        }
        Ok(ProductId::new(id))
    }
}

fn capitalize(message: &str) -> String {
    let mut chars = message.chars();
    chars.next().map_or_else(String::new, |first| {
        first.to_uppercase().chain(chars).collect()
    })
}

/// Cart section fragment template (for HTMX).
#[derive(Template, WebTemplate)]
#[template(path = "partials/cart.html")]
pub struct CartTemplate {
    pub cart: CartSummary,
}

/// Cart count badge fragment template (for HTMX).
#[derive(Template, WebTemplate)]
#[template(path = "partials/cart_count.html")]
pub struct CartCountTemplate {
    pub count: u32,
}

/// Fetch the cart and render it with a `cart-updated` trigger.
async fn refreshed_cart(state: &AppState, events: &'static str) -> Result<Response> {
    let cart = state.catalog().get_cart().await?;
    Ok((AppendHeaders([("HX-Trigger", events)]), CartTemplate { cart }).into_response())
}

/// Cart section (HTMX).
#[instrument(skip(state))]
pub async fn show(State(state): State<AppState>) -> Result<CartTemplate> {
    let cart = state.catalog().get_cart().await?;
    Ok(CartTemplate { cart })
}

/// Add a product to the cart from the modal (HTMX).
///
/// The modal is closed whether or not the add succeeds.
#[instrument(skip(state))]
pub async fn add(State(state): State<AppState>, Form(form): Form<CartLineForm>) -> Response {
    let result: Result<Response> = async {
        let product_id = form.product_id()?;
        let qty = form.quantity()?;

        state.catalog().add_to_cart(&product_id, qty).await?;
        add_breadcrumb(
            "cart",
            "Added to cart",
            Some(&[("product_id", product_id.as_str())]),
        );

        refreshed_cart(&state, "cart-updated, close-modal").await
    }
    .await;

    result.unwrap_or_else(|e| {
        let mut response = e.into_response();
        response
            .headers_mut()
            .insert("HX-Trigger", HeaderValue::from_static(CLOSE_MODAL));
        response
    })
}

/// Set the quantity of a cart line (HTMX).
#[instrument(skip(state))]
pub async fn update(
    State(state): State<AppState>,
    Path(item_id): Path<String>,
    Form(form): Form<CartLineForm>,
) -> Result<Response> {
    let product_id = form.product_id()?;
    let qty = form.quantity()?;
    let item_id = CartItemId::new(item_id);

    state
        .catalog()
        .update_cart_item(&item_id, &product_id, qty)
        .await?;

    refreshed_cart(&state, CART_UPDATED).await
}

/// Remove a cart line (HTMX).
#[instrument(skip(state))]
pub async fn remove(
    State(state): State<AppState>,
    Path(item_id): Path<String>,
) -> Result<Response> {
    state
        .catalog()
        .remove_cart_item(&CartItemId::new(item_id))
        .await?;

    refreshed_cart(&state, CART_UPDATED).await
}

/// Remove every cart line (HTMX).
#[instrument(skip(state))]
pub async fn clear(State(state): State<AppState>) -> Result<Response> {
    state.catalog().clear_cart().await?;
    add_breadcrumb("cart", "Cleared cart", None);

    refreshed_cart(&state, CART_UPDATED).await
}

/// Cart count badge (HTMX).
///
/// A failed lookup shows 0 rather than an alert; the badge refreshes on
/// every cart event.
#[instrument(skip(state))]
pub async fn count(State(state): State<AppState>) -> CartCountTemplate {
    let count = match state.catalog().get_cart().await {
        Ok(cart) => cart.item_count(),
        Err(e) => {
            tracing::warn!(error = %e, "Failed to fetch cart count");
            0
        }
    };

    CartCountTemplate { count }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use corner_shop_core::{CartItem, Price, Product};

    use super::*;

    fn form(qty: &str) -> CartLineForm {
        CartLineForm {
            product_id: "-Lp1".to_string(),
            qty: qty.to_string(),
        }
    }

    fn cart() -> CartSummary {
        let product = Product {
            id: ProductId::new("-Lp1"),
            title: "Rice Crackers".to_string(),
            category: "Snacks".to_string(),
            image_url: String::new(),
            images_url: vec![],
            content: String::new(),
            description: String::new(),
            price: Price::from_whole(80),
            original_price: Price::from_whole(100),
            unit: "bag".to_string(),
            is_enabled: true,
        };

        CartSummary {
            items: vec![CartItem {
                id: CartItemId::new("-Cart1"),
                product_id: product.id.clone(),
                product,
                qty: 2,
                total: Price::from_whole(160),
                final_total: Price::from_whole(160),
            }],
            total: Price::from_whole(160),
            final_total: Price::from_whole(1_160),
        }
    }

    #[test]
    fn test_quantity_defaults_to_one() {
        assert_eq!(form("").quantity().unwrap(), Quantity::ONE);
        assert_eq!(form(" 3 ").quantity().unwrap().get(), 3);
    }

    #[test]
    fn test_quantity_below_one_is_bad_request() {
        let err = form("0").quantity().unwrap_err();
        assert!(matches!(err, AppError::BadRequest(ref m) if m.starts_with("Quantity must be at least 1")));
        assert!(matches!(
            form("two").quantity(),
            Err(AppError::BadRequest(_))
        ));
    }

    #[test]
    fn test_blank_product_id_is_bad_request() {
        let form = CartLineForm {
            product_id: "  ".to_string(),
            qty: "1".to_string(),
        };
        assert!(matches!(form.product_id(), Err(AppError::BadRequest(_))));
    }

    #[test]
    fn test_capitalize() {
        assert_eq!(capitalize("quantity must"), "Quantity must");
        assert_eq!(capitalize(""), "");
    }

    #[test]
    fn test_cart_renders_lines_and_totals() {
        let html = CartTemplate { cart: cart() }.render().unwrap();

        assert!(html.contains("id=\"cart\""));
        assert!(html.contains("Rice Crackers"));
        assert!(html.contains("hx-put=\"/cart/-Cart1\""));
        assert!(html.contains("hx-delete=\"/cart/-Cart1\""));
        assert!(html.contains("name=\"qty\" min=\"1\" value=\"2\""));
        assert!(html.contains("NT$1,160"));
        assert!(html.contains("Clear cart"));
    }

    #[test]
    fn test_empty_cart_renders_notice() {
        let html = CartTemplate {
            cart: CartSummary::empty(),
        }
        .render()
        .unwrap();

        assert!(html.contains("Your cart is empty"));
        assert!(!html.contains("Clear cart"));
    }

    #[test]
    fn test_count_fragment() {
        let html = CartCountTemplate { count: 4 }.render().unwrap();
        assert_eq!(html.trim(), "4");
    }
}
