//! Unified error handling with Sentry integration.
//!
//! Every failure becomes an alert fragment. HTMX swaps it into `#alerts`
//! (via `HX-Retarget`/`HX-Reswap`) no matter which element the request
//! originally targeted, so handlers only need to return `Result<T, AppError>`.

use askama::Template;
use axum::{
    http::StatusCode,
    response::{AppendHeaders, Html, IntoResponse, Response},
};
use thiserror::Error;

use crate::catalog::CatalogError;

/// Selector of the element alerts are swapped into.
pub const ALERTS_TARGET: &str = "#alerts";

/// Application-level error type for the storefront.
#[derive(Debug, Error)]
pub enum AppError {
    /// Catalog API call failed or was rejected.
    #[error("Catalog error: {0}")]
    Catalog(#[from] CatalogError),

    /// Bad request from client.
    #[error("Bad request: {0}")]
    BadRequest(String),
}

/// Alert fragment template.
#[derive(Template)]
#[template(path = "partials/alert.html")]
pub struct AlertTemplate<'a> {
    pub message: &'a str,
}

impl AppError {
    /// HTTP status for this error.
    #[must_use]
    pub fn status(&self) -> StatusCode {
        match self {
            Self::Catalog(err) => match err {
                CatalogError::NotFound(_) => StatusCode::NOT_FOUND,
                CatalogError::RateLimited(_) => StatusCode::TOO_MANY_REQUESTS,
                err if err.is_upstream_failure() => StatusCode::BAD_GATEWAY,
                _ => StatusCode::BAD_REQUEST,
            },
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
        }
    }

    /// Text shown in the alert.
    ///
    /// Remote messages are passed through; transport details are not.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Catalog(err) => err.user_message(),
            Self::BadRequest(msg) => msg.clone(),
        }
    }

    fn is_server_fault(&self) -> bool {
        match self {
            Self::Catalog(err) => err.is_upstream_failure(),
            Self::BadRequest(_) => false,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Capture server errors to Sentry
        if self.is_server_fault() {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Request error"
            );
        } else {
            tracing::warn!(error = %self, "Request rejected");
        }

        let status = self.status();
        let message = self.user_message();

        let body = AlertTemplate { message: &message }
            .render()
            .unwrap_or_else(|e| {
                tracing::error!(error = %e, "Failed to render alert");
                message.clone()
            });

        (
            status,
            AppendHeaders([
                ("HX-Retarget", ALERTS_TARGET),
                ("HX-Reswap", "innerHTML"),
            ]),
            Html(body),
        )
            .into_response()
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;

/// Add a breadcrumb for user actions.
///
/// Breadcrumbs appear in Sentry error reports to show the trail of user actions
/// leading up to an error.
///
/// # Example
///
/// ```rust,ignore
/// add_breadcrumb("cart", "Added to cart", Some(&[("product_id", "-Lp1")]));
/// ```
pub fn add_breadcrumb(category: &str, message: &str, data: Option<&[(&str, &str)]>) {
    let mut breadcrumb = sentry::Breadcrumb {
        category: Some(category.to_string()),
        message: Some(message.to_string()),
        level: sentry::Level::Info,
        ..Default::default()
    };

    if let Some(pairs) = data {
        for (key, value) in pairs {
            breadcrumb.data.insert(
                (*key).to_string(),
                serde_json::Value::String((*value).to_string()),
            );
        }
    }

    sentry::add_breadcrumb(breadcrumb);
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use http_body_util::BodyExt;

    use super::*;

    fn api_error(status: StatusCode, message: &str) -> AppError {
        AppError::Catalog(CatalogError::Api {
            status,
            message: message.to_string(),
        })
    }

    #[test]
    fn test_app_error_display() {
        let err = AppError::BadRequest("invalid input".to_string());
        assert_eq!(err.to_string(), "Bad request: invalid input");
        assert_eq!(err.user_message(), "invalid input");
    }

    #[test]
    fn test_bad_request_status_code() {
        let response = AppError::BadRequest("test".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_catalog_error_status_codes() {
        assert_eq!(
            api_error(StatusCode::SERVICE_UNAVAILABLE, "down").status(),
            StatusCode::BAD_GATEWAY
        );
        assert_eq!(
            api_error(StatusCode::BAD_REQUEST, "qty invalid").status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AppError::from(CatalogError::NotFound("gone".to_string())).status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            AppError::from(CatalogError::RateLimited(5)).status(),
            StatusCode::TOO_MANY_REQUESTS
        );
    }

    #[test]
    fn test_parse_details_are_hidden() {
        let parse = serde_json::from_str::<u8>("x").unwrap_err();
        let err = AppError::from(CatalogError::Parse(parse));
        assert!(!err.user_message().contains("expected"));
        assert_eq!(err.status(), StatusCode::BAD_GATEWAY);
    }

    #[tokio::test]
    async fn test_response_is_retargeted_alert() {
        let response = api_error(StatusCode::BAD_REQUEST, "Cart is empty").into_response();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(response.headers()["HX-Retarget"], ALERTS_TARGET);
        assert_eq!(response.headers()["HX-Reswap"], "innerHTML");

        let body = response.into_body().collect().await.unwrap().to_bytes();
        let html = String::from_utf8(body.to_vec()).unwrap();
        assert!(html.contains("Cart is empty"));
        assert!(html.contains("role=\"alert\""));
    }

    #[tokio::test]
    async fn test_alert_escapes_remote_message() {
        let response = api_error(StatusCode::BAD_REQUEST, "<script>x</script>").into_response();
        let body = response.into_body().collect().await.unwrap().to_bytes();
        let html = String::from_utf8(body.to_vec()).unwrap();
        assert!(!html.contains("<script>"));
    }
}
