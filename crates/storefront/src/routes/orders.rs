//! Checkout route handler.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::State,
    http::StatusCode,
    response::{AppendHeaders, IntoResponse, Response},
};
use corner_shop_core::{FieldErrors, OrderField, OrderForm};
use tracing::instrument;

use crate::error::{Result, add_breadcrumb};
use crate::state::AppState;

/// Event fired after an order is placed; the cart and badge reload on it.
pub const ORDER_PLACED: &str = "order-placed";

/// Order form display data for templates.
#[derive(Debug, Clone, Default)]
pub struct OrderFormView {
    /// Values to pre-fill.
    pub form: OrderForm,
    pub errors: FieldErrors,
    /// Confirmation shown after a successful order.
    pub notice: Option<String>,
}

impl OrderFormView {
    /// Validation message for the input named `name`, or `""`.
    #[must_use]
    pub fn error(&self, name: &str) -> &'static str {
        field(name).map_or("", |f| self.errors.message(f))
    }

    /// Whether the input named `name` failed validation.
    #[must_use]
    pub fn has_error(&self, name: &str) -> bool {
        field(name).is_some_and(|f| self.errors.get(f).is_some())
    }
}

fn field(name: &str) -> Option<OrderField> {
    OrderField::ALL.into_iter().find(|f| f.as_str() == name)
}

/// Order form fragment template (for HTMX).
#[derive(Template, WebTemplate)]
#[template(path = "partials/order_form.html")]
pub struct OrderFormTemplate {
    pub order: OrderFormView,
}

/// Validate and place an order (HTMX).
///
/// Invalid input re-renders the form with per-field messages and a 422
/// without calling the catalog API. A rejected order surfaces as an alert
/// and leaves the form as typed.
#[instrument(skip(state, form))]
pub async fn create(State(state): State<AppState>, Form(form): Form<OrderForm>) -> Result<Response> {
    let order = match form.validate() {
        Ok(order) => order,
        Err(invalid) => {
            tracing::debug!(fields = invalid.0.len(), "Order form rejected");
            let view = OrderFormView {
                form,
                errors: invalid.0,
                notice: None,
            };
            return Ok((
                StatusCode::UNPROCESSABLE_ENTITY,
                OrderFormTemplate { order: view },
            )
                .into_response());
        }
    };

    let receipt = state.catalog().submit_order(&order).await?;
    add_breadcrumb(
        "order",
        "Placed order",
        Some(&[("order_id", receipt.order_id.as_str())]),
    );

    let view = OrderFormView {
        notice: Some(format!(
            "Thank you! Your order {} has been placed.",
            receipt.order_id
        )),
        ..OrderFormView::default()
    };

    Ok((
        AppendHeaders([("HX-Trigger", ORDER_PLACED)]),
        OrderFormTemplate { order: view },
    )
        .into_response())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn invalid_view() -> OrderFormView {
        let form = OrderForm {
            name: "Lin Mei".to_string(),
            email: "abc@x".to_string(),
            tel: String::new(),
            address: "Taipei".to_string(),
            message: "Ring twice".to_string(),
        };
        let errors = form.validate().unwrap_err().0;
        OrderFormView {
            form,
            errors,
            notice: None,
        }
    }

    #[test]
    fn test_view_error_lookup() {
        let view = invalid_view();
        assert_eq!(view.error("email"), OrderForm::EMAIL_INVALID);
        assert_eq!(view.error("tel"), OrderForm::TEL_REQUIRED);
        assert_eq!(view.error("name"), "");
        assert_eq!(view.error("unknown"), "");
        assert!(view.has_error("tel"));
        assert!(!view.has_error("address"));
    }

    #[test]
    fn test_form_renders_errors_and_values() {
        let html = OrderFormTemplate {
            order: invalid_view(),
        }
        .render()
        .unwrap();

        assert!(html.contains("id=\"order-form\""));
        assert!(html.contains(OrderForm::EMAIL_INVALID));
        assert!(html.contains(OrderForm::TEL_REQUIRED));
        assert!(html.contains("value=\"Lin Mei\""));
        assert!(html.contains("Ring twice"));
    }

    #[test]
    fn test_form_renders_notice_and_empty_fields() {
        let html = OrderFormTemplate {
            order: OrderFormView {
                notice: Some("Thank you! Your order -Order1 has been placed.".to_string()),
                ..OrderFormView::default()
            },
        }
        .render()
        .unwrap();

        assert!(html.contains("-Order1"));
        assert!(html.contains("name=\"name\" type=\"text\" value=\"\""));
        assert!(!html.contains("field-error\">Name"));
    }
}
