//! Core types for Corner Shop.
//!
//! This module provides the catalog records mirrored from the remote API and
//! type-safe wrappers for common domain concepts.

pub mod catalog;
pub mod email;
pub mod id;
pub mod order;
pub mod price;
pub mod quantity;

pub use catalog::{CartItem, CartSummary, Pagination, Product, ProductPage};
pub use email::{Email, EmailError};
pub use id::*;
pub use order::{
    FieldErrors, OrderField, OrderForm, OrderReceipt, OrderUser, OrderValidationError, ValidOrder,
};
pub use price::Price;
pub use quantity::{Quantity, QuantityError};
