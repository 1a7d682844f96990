//! Product route handlers.

use askama::Template;
use askama_web::WebTemplate;
use axum::extract::{Path, Query, State};
use corner_shop_core::{Product, ProductId, ProductPage, Quantity};
use serde::Deserialize;
use tracing::instrument;

use crate::error::Result;
use crate::state::AppState;

/// Listing query parameters.
///
/// Kept as raw strings so a malformed `page` falls back to page 1 instead of
/// failing extraction.
#[derive(Debug, Default, Deserialize)]
pub struct PageQuery {
    pub page: Option<String>,
    pub category: Option<String>,
}

impl PageQuery {
    /// Requested page, at least 1.
    #[must_use]
    pub fn page(&self) -> u32 {
        self.page
            .as_deref()
            .and_then(|p| p.trim().parse::<u32>().ok())
            .unwrap_or(1)
            .max(1)
    }

    /// Category filter, if a non-blank one was given.
    #[must_use]
    pub fn category(&self) -> Option<&str> {
        self.category
            .as_deref()
            .map(str::trim)
            .filter(|c| !c.is_empty())
    }
}

/// Modal query parameters.
///
/// `num` is the requested quantity, `current` the quantity currently shown.
#[derive(Debug, Default, Deserialize)]
pub struct ModalQuery {
    pub num: Option<String>,
    pub current: Option<String>,
}

impl ModalQuery {
    /// Quantity to show: `num` when it is valid, otherwise `current`,
    /// otherwise 1.
    #[must_use]
    pub fn quantity(&self) -> Quantity {
        let current = parse_int(self.current.as_deref())
            .and_then(|n| Quantity::new(n).ok())
            .unwrap_or(Quantity::ONE);

        match parse_int(self.num.as_deref()) {
            Some(requested) => current.adjust(requested),
            None => current,
        }
    }
}

fn parse_int(raw: Option<&str>) -> Option<i64> {
    raw.and_then(|s| s.trim().parse::<i64>().ok())
}

/// Product table and pagination fragment.
#[derive(Template, WebTemplate)]
#[template(path = "partials/products.html")]
pub struct ProductListTemplate {
    pub page: ProductPage,
}

/// Product detail modal fragment.
#[derive(Template, WebTemplate)]
#[template(path = "partials/product_modal.html")]
pub struct ProductModalTemplate {
    pub product: Product,
    pub qty: Quantity,
}

/// Product table for one page (HTMX).
#[instrument(skip(state))]
pub async fn list(
    State(state): State<AppState>,
    Query(query): Query<PageQuery>,
) -> Result<ProductListTemplate> {
    let page = state
        .catalog()
        .list_products(query.page(), query.category())
        .await?;

    Ok(ProductListTemplate { page })
}

/// Product detail modal (HTMX).
///
/// Re-requested with `?num=` when the quantity changes; invalid quantities
/// keep the one already shown.
#[instrument(skip(state))]
pub async fn modal(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(query): Query<ModalQuery>,
) -> Result<ProductModalTemplate> {
    let product = state.catalog().get_product(&ProductId::new(id)).await?;

    Ok(ProductModalTemplate {
        product,
        qty: query.quantity(),
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use corner_shop_core::{Pagination, Price};

    use super::*;

    fn query(num: Option<&str>, current: Option<&str>) -> ModalQuery {
        ModalQuery {
            num: num.map(str::to_string),
            current: current.map(str::to_string),
        }
    }

    fn product(id: &str, title: &str) -> Product {
        Product {
            id: ProductId::new(id),
            title: title.to_string(),
            category: "Snacks".to_string(),
            image_url: "https://img.example.com/a.jpg".to_string(),
            images_url: vec![],
            content: "Crunchy".to_string(),
            description: "Rice crackers".to_string(),
            price: Price::from_whole(80),
            original_price: Price::from_whole(100),
            unit: "bag".to_string(),
            is_enabled: true,
        }
    }

    #[test]
    fn test_page_query_defaults_and_clamps() {
        assert_eq!(PageQuery::default().page(), 1);

        let q = PageQuery {
            page: Some("0".to_string()),
            category: None,
        };
        assert_eq!(q.page(), 1);

        let q = PageQuery {
            page: Some("abc".to_string()),
            category: Some("  ".to_string()),
        };
        assert_eq!(q.page(), 1);
        assert_eq!(q.category(), None);

        let q = PageQuery {
            page: Some(" 3 ".to_string()),
            category: Some("Snacks".to_string()),
        };
        assert_eq!(q.page(), 3);
        assert_eq!(q.category(), Some("Snacks"));
    }

    #[test]
    fn test_modal_quantity_defaults_to_one() {
        assert_eq!(query(None, None).quantity(), Quantity::ONE);
    }

    #[test]
    fn test_modal_quantity_accepts_valid_num() {
        assert_eq!(query(Some("4"), Some("1")).quantity().get(), 4);
    }

    #[test]
    fn test_modal_quantity_keeps_current_on_invalid_num() {
        assert_eq!(query(Some("0"), Some("3")).quantity().get(), 3);
        assert_eq!(query(Some("-2"), Some("3")).quantity().get(), 3);
        assert_eq!(query(Some("lots"), Some("3")).quantity().get(), 3);
        assert_eq!(query(Some("0"), Some("nope")).quantity().get(), 1);
    }

    #[test]
    fn test_product_table_renders_rows_and_pagination() {
        let html = ProductListTemplate {
            page: ProductPage {
                products: vec![product("-Lp1", "Rice Crackers")],
                pagination: Pagination {
                    total_pages: 3,
                    current_page: 2,
                    has_pre: true,
                    has_next: true,
                    category: String::new(),
                },
            },
        }
        .render()
        .unwrap();

        assert!(html.contains("id=\"products\""));
        assert!(html.contains("Rice Crackers"));
        assert!(html.contains("hx-get=\"/products/-Lp1/modal\""));
        assert!(html.contains("<del>NT$100</del>"));
        assert!(html.contains("hx-get=\"/products?page=1\""));
        assert!(html.contains("hx-get=\"/products?page=3\""));
        assert!(html.contains("aria-current=\"page\""));
    }

    #[test]
    fn test_each_row_adds_one_to_cart() {
        let mut sold_out = product("-Lp2", "Oolong Tea");
        sold_out.is_enabled = false;
        let html = ProductListTemplate {
            page: ProductPage {
                products: vec![product("-Lp1", "Rice Crackers"), sold_out],
                pagination: Pagination {
                    total_pages: 2,
                    current_page: 1,
                    has_pre: false,
                    has_next: true,
                    category: String::new(),
                },
            },
        }
        .render()
        .unwrap();

        assert_eq!(html.matches("hx-post=\"/cart\"").count(), 2);
        assert!(html.contains("name=\"product_id\" value=\"-Lp1\""));
        assert!(html.contains("name=\"qty\" value=\"1\""));
        assert!(html.contains("hx-target=\"#cart\""));
        assert_eq!(html.matches("data-add-to-cart disabled").count(), 1);
    }

    #[test]
    fn test_page_changes_show_loading_indicator() {
        let html = ProductListTemplate {
            page: ProductPage {
                products: vec![product("-Lp1", "Rice Crackers")],
                pagination: Pagination {
                    total_pages: 2,
                    current_page: 1,
                    has_pre: false,
                    has_next: true,
                    category: String::new(),
                },
            },
        }
        .render()
        .unwrap();

        assert!(html.contains("id=\"products-loading\""));
        assert!(html.contains("hx-get=\"/products?page=2\""));
        assert!(html.contains("hx-indicator=\"#products-loading\""));
    }

    #[test]
    fn test_pagination_disables_edges() {
        let html = ProductListTemplate {
            page: ProductPage {
                products: vec![],
                pagination: Pagination::single_page(),
            },
        }
        .render()
        .unwrap();

        assert!(html.contains("No products found"));
        assert!(html.contains("data-page=\"previous\" disabled"));
        assert!(html.contains("data-page=\"next\" disabled"));
    }

    #[test]
    fn test_pagination_without_pages_renders_no_numbers() {
        let html = ProductListTemplate {
            page: ProductPage {
                products: vec![],
                pagination: Pagination {
                    total_pages: 0,
                    current_page: 0,
                    has_pre: false,
                    has_next: false,
                    category: String::new(),
                },
            },
        }
        .render()
        .unwrap();

        assert!(!html.contains("data-page=\"number\""));
    }

    #[test]
    fn test_modal_disables_decrement_at_one() {
        let html = ProductModalTemplate {
            product: product("-Lp1", "Rice Crackers"),
            qty: Quantity::ONE,
        }
        .render()
        .unwrap();

        assert!(html.contains("data-qty=\"decrement\" disabled"));
        assert!(html.contains("name=\"qty\" value=\"1\""));
        assert!(html.contains("name=\"product_id\" value=\"-Lp1\""));
    }

    #[test]
    fn test_modal_links_neighbouring_quantities() {
        let html = ProductModalTemplate {
            product: product("-Lp1", "Rice Crackers"),
            qty: Quantity::new(3).unwrap(),
        }
        .render()
        .unwrap();

        assert!(!html.contains("data-qty=\"decrement\" disabled"));
        assert!(html.contains("/products/-Lp1/modal?num=2&amp;current=3"));
        assert!(html.contains("/products/-Lp1/modal?num=4&amp;current=3"));
    }
}
