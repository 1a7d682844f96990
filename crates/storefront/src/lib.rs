//! Corner Shop storefront library.
//!
//! Server-rendered HTMX storefront over a remote catalog API. Built as a
//! library so the binary and the integration tests share one router.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod catalog;
pub mod config;
pub mod error;
mod filters;
pub mod middleware;
pub mod routes;
pub mod state;

use axum::{Router, body::Body, http::Request, middleware::from_fn};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use state::AppState;

/// Directory static assets are served from.
pub const STATIC_DIR: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/static");

/// Build the complete application router.
///
/// Mutating routes are rate limited by client IP; serve with
/// `into_make_service_with_connect_info::<SocketAddr>()` so the peer address
/// is available when no proxy header is present.
pub fn app(state: AppState) -> Router {
    Router::new()
        .merge(routes::health_routes())
        .merge(routes::routes())
        .nest_service("/static", ServeDir::new(STATIC_DIR))
        .layer(from_fn(middleware::security_headers_middleware))
        .layer(from_fn(middleware::csp_nonce_middleware))
        .layer(from_fn(middleware::request_id_middleware))
        .layer(TraceLayer::new_for_http().make_span_with(request_span))
        .with_state(state)
        // Sentry layers (outermost for full request coverage)
        .layer(sentry_tower::NewSentryLayer::new_from_top())
        .layer(sentry_tower::SentryHttpLayer::new().enable_transaction())
}

/// Span for one request; `request_id` is filled in by the request ID
/// middleware.
fn request_span(request: &Request<Body>) -> tracing::Span {
    tracing::info_span!(
        "request",
        method = %request.method(),
        uri = %request.uri(),
        request_id = tracing::field::Empty,
    )
}
