//! Checkout order form and its validation rules.
//!
//! [`OrderForm`] holds exactly what the buyer typed. [`OrderForm::validate`]
//! turns it into a [`ValidOrder`] ready to send, or reports one message per
//! failing field. No network call should be made while errors exist.

use std::collections::BTreeMap;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use super::email::Email;
use super::id::OrderId;
use super::price::Price;

static TEL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    #[allow(clippy::unwrap_used)] // literal pattern
    Regex::new(r"^[0-9]{8,}$").unwrap()
});

/// A validated form field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderField {
    Name,
    Email,
    Tel,
    Address,
}

impl OrderField {
    /// Every validated field in display order.
    pub const ALL: [Self; 4] = [Self::Name, Self::Email, Self::Tel, Self::Address];

    /// The form input name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::Email => "email",
            Self::Tel => "tel",
            Self::Address => "address",
        }
    }
}

/// Per-field validation messages, at most one per field.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FieldErrors(BTreeMap<OrderField, &'static str>);

impl FieldErrors {
    /// Whether no field failed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Number of failing fields.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Message for `field`, if it failed.
    #[must_use]
    pub fn get(&self, field: OrderField) -> Option<&'static str> {
        self.0.get(&field).copied()
    }

    /// Message for `field`, or an empty string when it passed.
    ///
    /// Convenient in templates where an absent message renders as nothing.
    #[must_use]
    pub fn message(&self, field: OrderField) -> &'static str {
        self.get(field).unwrap_or("")
    }

    /// Iterate over failing fields in display order.
    pub fn iter(&self) -> impl Iterator<Item = (OrderField, &'static str)> + '_ {
        self.0.iter().map(|(field, msg)| (*field, *msg))
    }

    fn insert_first(&mut self, field: OrderField, message: &'static str) {
        self.0.entry(field).or_insert(message);
    }
}

/// Validation failure for an order form.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("order form has {} invalid field(s)", .0.len())]
pub struct OrderValidationError(pub FieldErrors);

/// Raw checkout form input.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderForm {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub tel: String,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub message: String,
}

impl OrderForm {
    pub const NAME_REQUIRED: &'static str = "Name is required";
    pub const EMAIL_REQUIRED: &'static str = "Email is required";
    pub const EMAIL_INVALID: &'static str = "Please enter a valid email address";
    pub const TEL_REQUIRED: &'static str = "Phone number is required";
    pub const TEL_INVALID: &'static str = "Please enter a valid phone number";
    pub const ADDRESS_REQUIRED: &'static str = "Address is required";

    /// Current value of `field`, as typed.
    #[must_use]
    pub fn value(&self, field: OrderField) -> &str {
        match field {
            OrderField::Name => &self.name,
            OrderField::Email => &self.email,
            OrderField::Tel => &self.tel,
            OrderField::Address => &self.address,
        }
    }

    /// Validate the form.
    ///
    /// Values are trimmed first. Only the first failing rule per field is
    /// reported.
    ///
    /// # Errors
    ///
    /// Returns [`OrderValidationError`] listing every failing field.
    pub fn validate(&self) -> Result<ValidOrder, OrderValidationError> {
        let mut errors = FieldErrors::default();

        let name = self.name.trim();
        if name.is_empty() {
            errors.insert_first(OrderField::Name, Self::NAME_REQUIRED);
        }

        let email = self.email.trim();
        let parsed_email = if email.is_empty() {
            errors.insert_first(OrderField::Email, Self::EMAIL_REQUIRED);
            None
        } else {
            Email::parse(email)
                .map_err(|_| errors.insert_first(OrderField::Email, Self::EMAIL_INVALID))
                .ok()
        };

        let tel = self.tel.trim();
        if tel.is_empty() {
            errors.insert_first(OrderField::Tel, Self::TEL_REQUIRED);
        } else if !TEL_PATTERN.is_match(tel) {
            errors.insert_first(OrderField::Tel, Self::TEL_INVALID);
        }

        let address = self.address.trim();
        if address.is_empty() {
            errors.insert_first(OrderField::Address, Self::ADDRESS_REQUIRED);
        }

        match parsed_email {
            Some(email) if errors.is_empty() => Ok(ValidOrder {
                user: OrderUser {
                    name: name.to_owned(),
                    email,
                    tel: tel.to_owned(),
                    address: address.to_owned(),
                },
                message: self.message.trim().to_owned(),
            }),
            _ => Err(OrderValidationError(errors)),
        }
    }
}

/// Recipient details sent with an order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderUser {
    pub name: String,
    pub email: Email,
    pub tel: String,
    pub address: String,
}

/// An order that passed validation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidOrder {
    pub user: OrderUser,
    /// Free-form note to the shop; may be empty.
    pub message: String,
}

/// Confirmation returned after an order is created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderReceipt {
    #[serde(rename = "orderId")]
    pub order_id: OrderId,
    #[serde(default)]
    pub total: Price,
    /// Creation time in unix seconds.
    #[serde(default)]
    pub create_at: i64,
    #[serde(default)]
    pub message: String,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn valid_form() -> OrderForm {
        OrderForm {
            name: "Lin Mei".to_string(),
            email: "lin.mei@example.com".to_string(),
            tel: "0912345678".to_string(),
            address: "No. 7, Section 5, Xinyi Road, Taipei".to_string(),
            message: String::new(),
        }
    }

    #[test]
    fn test_valid_form_produces_order() {
        let order = valid_form().validate().unwrap();
        assert_eq!(order.user.name, "Lin Mei");
        assert_eq!(order.user.email.as_str(), "lin.mei@example.com");
        assert!(order.message.is_empty());
    }

    #[test]
    fn test_values_are_trimmed() {
        let form = OrderForm {
            name: "  Lin Mei ".to_string(),
            email: " lin.mei@example.com ".to_string(),
            tel: " 0912345678".to_string(),
            message: "  leave at door ".to_string(),
            ..valid_form()
        };
        let order = form.validate().unwrap();
        assert_eq!(order.user.name, "Lin Mei");
        assert_eq!(order.user.tel, "0912345678");
        assert_eq!(order.message, "leave at door");
    }

    #[test]
    fn test_empty_form_reports_required_fields() {
        let err = OrderForm::default().validate().unwrap_err();
        let errors = err.0;
        assert_eq!(errors.len(), 4);
        assert_eq!(errors.get(OrderField::Name), Some(OrderForm::NAME_REQUIRED));
        assert_eq!(errors.get(OrderField::Email), Some(OrderForm::EMAIL_REQUIRED));
        assert_eq!(errors.get(OrderField::Tel), Some(OrderForm::TEL_REQUIRED));
        assert_eq!(
            errors.get(OrderField::Address),
            Some(OrderForm::ADDRESS_REQUIRED)
        );
    }

    #[test]
    fn test_blank_name_is_required() {
        let form = OrderForm {
            name: "   ".to_string(),
            ..valid_form()
        };
        let errors = form.validate().unwrap_err().0;
        assert_eq!(errors.len(), 1);
        assert_eq!(errors.message(OrderField::Name), OrderForm::NAME_REQUIRED);
    }

    #[test]
    fn test_invalid_email_pattern() {
        let form = OrderForm {
            email: "ab@x.com".to_string(),
            ..valid_form()
        };
        let errors = form.validate().unwrap_err().0;
        assert_eq!(errors.get(OrderField::Email), Some(OrderForm::EMAIL_INVALID));
        assert_eq!(errors.get(OrderField::Name), None);
    }

    #[test]
    fn test_tel_rules() {
        for tel in ["1234567", "0912-345-678", "phone1234"] {
            let form = OrderForm {
                tel: tel.to_string(),
                ..valid_form()
            };
            let errors = form.validate().unwrap_err().0;
            assert_eq!(
                errors.get(OrderField::Tel),
                Some(OrderForm::TEL_INVALID),
                "tel {tel:?} should be rejected"
            );
        }

        let form = OrderForm {
            tel: "12345678".to_string(),
            ..valid_form()
        };
        assert!(form.validate().is_ok());
    }

    #[test]
    fn test_errors_iterate_in_display_order() {
        let form = OrderForm {
            address: String::new(),
            name: String::new(),
            ..valid_form()
        };
        let errors = form.validate().unwrap_err().0;
        let fields: Vec<_> = errors.iter().map(|(field, _)| field).collect();
        assert_eq!(fields, vec![OrderField::Name, OrderField::Address]);
    }

    #[test]
    fn test_receipt_decodes_api_shape() {
        let receipt: OrderReceipt = serde_json::from_value(serde_json::json!({
            "success": true,
            "message": "Order created",
            "total": 1260,
            "create_at": 1_700_000_000,
            "orderId": "-Order1"
        }))
        .unwrap();
        assert_eq!(receipt.order_id.as_str(), "-Order1");
        assert_eq!(receipt.total, Price::from_whole(1260));
        assert_eq!(receipt.message, "Order created");
    }
}
