//! Corner Shop Core - Shared types library.
//!
//! This crate provides the types used across all Corner Shop components:
//! - `storefront` - Server-rendered storefront backed by the remote catalog API
//! - `cli` - Command-line access to the same catalog, cart, and order calls
//!
//! # Architecture
//!
//! The core crate contains only types and validation - no I/O, no HTTP
//! clients. This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Catalog records, type-safe IDs, prices, quantities, and the
//!   checkout order form

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
