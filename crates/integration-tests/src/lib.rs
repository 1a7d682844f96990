//! Integration tests for the Corner Shop storefront.
//!
//! Each test starts two servers on ephemeral ports:
//!
//! - [`FakeCatalog`] - an in-memory stand-in for the remote catalog API,
//!   answering with the same JSON envelopes
//! - the real storefront router, pointed at the fake
//!
//! and drives the storefront over HTTP the way HTMX would.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p corner-shop-integration-tests
//! ```

use std::net::SocketAddr;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use axum::{
    Json, Router,
    extract::{Path, Query, Request, State},
    http::StatusCode,
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::{delete, get, post, put},
};
use corner_shop_storefront::{
    config::{CatalogApiConfig, StorefrontConfig},
    state::AppState,
};
use reqwest::Client;
use serde::Deserialize;
use serde_json::{Value, json};
use tokio::net::TcpListener;

/// Shop path the storefront is configured with.
pub const API_PATH: &str = "corner";

/// Products per page served by the fake.
pub const PAGE_SIZE: usize = 2;

// =============================================================================
// Fake Catalog API
// =============================================================================

/// In-memory catalog API with a seeded product list and a shared cart.
#[derive(Clone)]
pub struct FakeCatalog {
    inner: Arc<Mutex<CatalogData>>,
}

struct CatalogData {
    products: Vec<Value>,
    cart: Vec<CartLine>,
    next_line: u32,
    next_order: u32,
    failing: bool,
    requests: Vec<String>,
}

struct CartLine {
    id: String,
    product_id: String,
    qty: u32,
}

impl Default for FakeCatalog {
    fn default() -> Self {
        Self::new()
    }
}

impl FakeCatalog {
    /// A catalog with three products across two categories.
    #[must_use]
    pub fn new() -> Self {
        let products = vec![
            product("-Lp1", "Rice Crackers", "Snacks", 80, 100, true),
            product("-Lp2", "Oolong Tea", "Drinks", 300, 300, true),
            product("-Lp3", "Sesame Cake", "Snacks", 450, 500, false),
        ];

        Self {
            inner: Arc::new(Mutex::new(CatalogData {
                products,
                cart: Vec::new(),
                next_line: 1,
                next_order: 1,
                failing: false,
                requests: Vec::new(),
            })),
        }
    }

    fn lock(&self) -> MutexGuard<'_, CatalogData> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Make every endpoint answer with a 500 error envelope.
    pub fn set_failing(&self, failing: bool) {
        self.lock().failing = failing;
    }

    /// Requests received so far, as `"METHOD /path"`.
    #[must_use]
    pub fn requests(&self) -> Vec<String> {
        self.lock().requests.clone()
    }

    /// Current cart lines as `(line id, product id, qty)`.
    #[must_use]
    pub fn cart_lines(&self) -> Vec<(String, String, u32)> {
        self.lock()
            .cart
            .iter()
            .map(|l| (l.id.clone(), l.product_id.clone(), l.qty))
            .collect()
    }

    /// Put a line in the cart directly, returning its id.
    pub fn seed_cart(&self, product_id: &str, qty: u32) -> String {
        let mut data = self.lock();
        let id = format!("-Cart{}", data.next_line);
        data.next_line += 1;
        data.cart.push(CartLine {
            id: id.clone(),
            product_id: product_id.to_string(),
            qty,
        });
        id
    }

    /// Build the fake API router, mounted under `/api/{API_PATH}`.
    pub fn router(&self) -> Router {
        let api = Router::new()
            .route("/products", get(list_products))
            .route("/product/{id}", get(get_product))
            .route("/cart", get(get_cart).post(add_cart_line))
            .route("/cart/{id}", put(update_cart_line).delete(remove_cart_line))
            .route("/carts", delete(clear_cart))
            .route("/order", post(create_order))
            .with_state(self.clone());

        Router::new()
            .nest(&format!("/api/{API_PATH}"), api)
            .layer(middleware::from_fn_with_state(self.clone(), record_and_fail))
    }
}

fn product(id: &str, title: &str, category: &str, price: i64, origin: i64, enabled: bool) -> Value {
    json!({
        "id": id,
        "title": title,
        "category": category,
        "imageUrl": format!("https://img.example.com/{id}.jpg"),
        "imagesUrl": [],
        "content": format!("{title} content"),
        "description": format!("{title} description"),
        "price": price,
        "origin_price": origin,
        "unit": "box",
        "is_enabled": i32::from(enabled),
    })
}

fn failure(status: StatusCode, message: &str) -> Response {
    (status, Json(json!({"success": false, "message": message}))).into_response()
}

async fn record_and_fail(State(catalog): State<FakeCatalog>, request: Request, next: Next) -> Response {
    let failing = {
        let mut data = catalog.lock();
        data.requests
            .push(format!("{} {}", request.method(), request.uri().path()));
        data.failing
    };

    if failing {
        return failure(StatusCode::INTERNAL_SERVER_ERROR, "Service unavailable");
    }
    next.run(request).await
}

#[derive(Deserialize)]
struct ProductsQuery {
    page: Option<usize>,
    category: Option<String>,
}

async fn list_products(
    State(catalog): State<FakeCatalog>,
    Query(query): Query<ProductsQuery>,
) -> Json<Value> {
    let data = catalog.lock();
    let category = query.category.unwrap_or_default();
    let matching: Vec<&Value> = data
        .products
        .iter()
        .filter(|p| category.is_empty() || p["category"] == category.as_str())
        .collect();

    let total_pages = matching.len().div_ceil(PAGE_SIZE).max(1);
    let page = query.page.unwrap_or(1).clamp(1, total_pages);
    let products: Vec<&Value> = matching
        .into_iter()
        .skip((page - 1) * PAGE_SIZE)
        .take(PAGE_SIZE)
        .collect();

    Json(json!({
        "success": true,
        "products": products,
        "pagination": {
            "total_pages": total_pages,
            "current_page": page,
            "has_pre": page > 1,
            "has_next": page < total_pages,
            "category": category,
        },
        "messages": [],
    }))
}

async fn get_product(State(catalog): State<FakeCatalog>, Path(id): Path<String>) -> Response {
    let data = catalog.lock();
    data.products.iter().find(|p| p["id"] == id.as_str()).map_or_else(
        || failure(StatusCode::NOT_FOUND, "Product not found"),
        |product| Json(json!({"success": true, "product": product})).into_response(),
    )
}

fn cart_json(data: &CatalogData) -> Value {
    let mut total = 0;
    let carts: Vec<Value> = data
        .cart
        .iter()
        .filter_map(|line| {
            let product = data.products.iter().find(|p| p["id"] == line.product_id.as_str())?;
            let line_total = product["price"].as_i64().unwrap_or(0) * i64::from(line.qty);
            total += line_total;
            Some(json!({
                "id": line.id,
                "product_id": line.product_id,
                "product": product,
                "qty": line.qty,
                "total": line_total,
                "final_total": line_total,
            }))
        })
        .collect();

    json!({"carts": carts, "total": total, "final_total": total})
}

async fn get_cart(State(catalog): State<FakeCatalog>) -> Json<Value> {
    let data = catalog.lock();
    Json(json!({"success": true, "data": cart_json(&data), "messages": []}))
}

#[derive(Deserialize)]
struct LineBody {
    data: LineData,
}

#[derive(Deserialize)]
struct LineData {
    product_id: String,
    qty: u32,
}

async fn add_cart_line(State(catalog): State<FakeCatalog>, Json(body): Json<LineBody>) -> Response {
    let mut data = catalog.lock();
    if !data.products.iter().any(|p| p["id"] == body.data.product_id.as_str()) {
        return failure(StatusCode::BAD_REQUEST, "Product not found");
    }

    if let Some(line) = data
        .cart
        .iter_mut()
        .find(|l| l.product_id == body.data.product_id)
    {
        line.qty += body.data.qty;
    } else {
        let id = format!("-Cart{}", data.next_line);
        data.next_line += 1;
        data.cart.push(CartLine {
            id,
            product_id: body.data.product_id,
            qty: body.data.qty,
        });
    }

    Json(json!({"success": true, "message": "Added to cart"})).into_response()
}

async fn update_cart_line(
    State(catalog): State<FakeCatalog>,
    Path(id): Path<String>,
    Json(body): Json<LineBody>,
) -> Response {
    let mut data = catalog.lock();
    let Some(line) = data.cart.iter_mut().find(|l| l.id == id) else {
        return failure(StatusCode::BAD_REQUEST, "Cart line not found");
    };
    line.qty = body.data.qty;
    line.product_id = body.data.product_id;

    Json(json!({"success": true, "message": "Cart updated"})).into_response()
}

async fn remove_cart_line(State(catalog): State<FakeCatalog>, Path(id): Path<String>) -> Response {
    let mut data = catalog.lock();
    let before = data.cart.len();
    data.cart.retain(|l| l.id != id);
    if data.cart.len() == before {
        return failure(StatusCode::BAD_REQUEST, "Cart line not found");
    }

    Json(json!({"success": true, "message": "Removed from cart"})).into_response()
}

async fn clear_cart(State(catalog): State<FakeCatalog>) -> Json<Value> {
    catalog.lock().cart.clear();
    Json(json!({"success": true, "message": "Cart cleared"}))
}

async fn create_order(State(catalog): State<FakeCatalog>, Json(body): Json<Value>) -> Response {
    let mut data = catalog.lock();
    let user = &body["data"]["user"];
    if ["name", "email", "tel", "address"]
        .iter()
        .any(|field| user[field].as_str().is_none_or(str::is_empty))
    {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({"success": false, "message": ["user details are required"]})),
        )
            .into_response();
    }
    if data.cart.is_empty() {
        return failure(StatusCode::BAD_REQUEST, "Cart is empty");
    }

    let total = cart_json(&data)["final_total"].clone();
    let order_id = format!("-Order{}", data.next_order);
    data.next_order += 1;
    data.cart.clear();

    Json(json!({
        "success": true,
        "message": "Order created",
        "total": total,
        "create_at": 1_700_000_000,
        "orderId": order_id,
    }))
    .into_response()
}

// =============================================================================
// Test Context
// =============================================================================

/// A running fake catalog plus a storefront wired to it.
pub struct TestContext {
    /// Client with no cookie store or redirects, like a plain HTMX request.
    pub client: Client,
    /// Storefront base URL, e.g. `http://127.0.0.1:54321`.
    pub storefront_url: String,
    /// Handle on the fake API's data.
    pub catalog: FakeCatalog,
}

impl TestContext {
    /// Start both servers on ephemeral ports.
    ///
    /// # Panics
    ///
    /// Panics if a listener cannot be bound or the storefront fails to
    /// build; tests cannot proceed without either.
    #[allow(clippy::expect_used)]
    pub async fn start() -> Self {
        let catalog = FakeCatalog::new();
        let api_addr = spawn(catalog.router()).await;

        let config = StorefrontConfig {
            host: [127, 0, 0, 1].into(),
            port: 0,
            catalog: CatalogApiConfig::new(
                &format!("http://{api_addr}"),
                API_PATH,
                Duration::from_secs(5),
                Duration::ZERO,
            )
            .expect("valid catalog config"),
            sentry_dsn: None,
            sentry_environment: None,
            sentry_sample_rate: 1.0,
            sentry_traces_sample_rate: 0.0,
        };
        let state = AppState::new(config).expect("Failed to build app state");
        let storefront_addr = spawn(corner_shop_storefront::app(state)).await;

        let client = Client::builder()
            .timeout(Duration::from_secs(10))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            client,
            storefront_url: format!("http://{storefront_addr}"),
            catalog,
        }
    }

    /// Absolute storefront URL for `path`.
    #[must_use]
    pub fn url(&self, path: &str) -> String {
        format!("{}{path}", self.storefront_url)
    }
}

#[allow(clippy::expect_used)]
async fn spawn(router: Router) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind test listener");
    let addr = listener.local_addr().expect("listener has an address");

    tokio::spawn(async move {
        axum::serve(
            listener,
            router.into_make_service_with_connect_info::<SocketAddr>(),
        )
        .await
        .ok();
    });

    addr
}
