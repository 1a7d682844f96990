//! Storefront page route handler.

use askama::Template;
use askama_web::WebTemplate;
use axum::extract::{Query, State};
use corner_shop_core::{CartSummary, ProductPage};
use tracing::instrument;

use super::orders::OrderFormView;
use super::products::PageQuery;
use crate::filters;
use crate::middleware::CspNonce;
use crate::state::AppState;

/// Full storefront page template.
#[derive(Template, WebTemplate)]
#[template(path = "index.html")]
pub struct IndexTemplate {
    pub nonce: String,
    pub page: ProductPage,
    pub cart: CartSummary,
    pub order: OrderFormView,
    /// Alerts to show on first render.
    pub alerts: Vec<String>,
}

/// Display the storefront page.
///
/// Loads the requested product page and the cart together. Either failing
/// still renders the page, with that section empty and an alert shown.
#[instrument(skip(state, nonce))]
pub async fn home(
    State(state): State<AppState>,
    Query(query): Query<PageQuery>,
    CspNonce(nonce): CspNonce,
) -> IndexTemplate {
    let catalog = state.catalog();
    let (products, cart) = tokio::join!(
        catalog.list_products(query.page(), query.category()),
        catalog.get_cart()
    );

    let mut alerts = Vec::new();

    let page = products.unwrap_or_else(|e| {
        tracing::warn!(error = %e, "Failed to load products");
        alerts.push(e.user_message());
        ProductPage::default()
    });

    let cart = cart.unwrap_or_else(|e| {
        tracing::warn!(error = %e, "Failed to load cart");
        alerts.push(e.user_message());
        CartSummary::empty()
    });

    IndexTemplate {
        nonce,
        page,
        cart,
        order: OrderFormView::default(),
        alerts,
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn page(alerts: Vec<String>) -> IndexTemplate {
        IndexTemplate {
            nonce: "bm9uY2U=".to_string(),
            page: ProductPage::default(),
            cart: CartSummary::empty(),
            order: OrderFormView::default(),
            alerts,
        }
    }

    #[test]
    fn test_page_has_all_sections() {
        let html = page(vec![]).render().unwrap();

        assert!(html.contains("id=\"products\""));
        assert!(html.contains("id=\"cart\""));
        assert!(html.contains("id=\"order-form\""));
        assert!(html.contains("id=\"alerts\""));
        assert!(html.contains("id=\"product-modal\""));
        assert!(html.contains("name=\"htmx-config\""));
    }

    #[test]
    fn test_inline_script_carries_nonce() {
        let html = page(vec![]).render().unwrap();
        assert!(html.contains("<script nonce=\"bm9uY2U=\">"));
    }

    #[test]
    fn test_initial_alerts_render() {
        let html = page(vec!["The shop is temporarily unavailable.".to_string()])
            .render()
            .unwrap();
        assert!(html.contains("role=\"alert\""));
        assert!(html.contains("The shop is temporarily unavailable."));
    }
}
