//! HTTP route handlers for storefront.
//!
//! # Route Structure
//!
//! ```text
//! GET    /                          - Storefront page (products, cart, checkout)
//! GET    /health                    - Liveness check
//! GET    /health/ready              - Readiness check (catalog API reachable)
//!
//! # Products (HTMX fragments)
//! GET    /products?page=N           - Product table + pagination
//! GET    /products/{id}/modal       - Product detail modal (?num=&current=)
//!
//! # Cart (HTMX fragments)
//! GET    /cart                      - Cart section
//! GET    /cart/count                - Cart count badge
//!
//! # Mutations (rate limited)
//! POST   /cart                      - Add line (triggers cart-updated, close-modal)
//! PUT    /cart/{item_id}            - Set line quantity
//! DELETE /cart/{item_id}            - Remove line
//! DELETE /cart                      - Clear cart
//! POST   /orders                    - Validate and place order (triggers order-placed)
//! ```

pub mod cart;
pub mod health;
pub mod home;
pub mod orders;
pub mod products;

use axum::{
    Router,
    routing::{get, post, put},
};

use crate::middleware::mutation_rate_limiter;
use crate::state::AppState;

/// Create all page and fragment routes for the storefront.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(home::home))
        .merge(product_routes())
        .merge(cart_routes())
        .merge(mutation_routes())
}

/// Liveness and readiness checks.
pub fn health_routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health::health))
        .route("/health/ready", get(health::readiness))
}

/// Product listing and detail fragments.
pub fn product_routes() -> Router<AppState> {
    Router::new()
        .route("/products", get(products::list))
        .route("/products/{id}/modal", get(products::modal))
}

/// Read-only cart fragments. The badge polls these on every cart event, so
/// they stay outside the rate limiter.
pub fn cart_routes() -> Router<AppState> {
    Router::new()
        .route("/cart", get(cart::show))
        .route("/cart/count", get(cart::count))
}

/// Cart changes and checkout, rate limited per client IP.
pub fn mutation_routes() -> Router<AppState> {
    Router::new()
        .route("/cart", post(cart::add).delete(cart::clear))
        .route("/cart/{item_id}", put(cart::update).delete(cart::remove))
        .route("/orders", post(orders::create))
        .layer(mutation_rate_limiter())
}
