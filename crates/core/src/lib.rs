//! Stock Dashboard Core - Shared types and dashboard logic.
//!
//! This crate provides the types and logic shared by the stock dashboard
//! components:
//! - `client` - Async REST client that fetches raw records
//! - `cli` - Command-line front end rendering the dashboard views
//!
//! # Architecture
//!
//! The core crate contains only types and pure functions - no I/O, no HTTP
//! clients, no logging. Records flow through it in one direction:
//!
//! ```text
//! wire (server field names) -> adapter -> model (view model) -> stats / search
//! ```
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for identifiers, money, and statuses
//! - [`wire`] - Raw API records exactly as the server sends them
//! - [`model`] - Normalized view models
//! - [`adapter`] - Tolerant mapping from wire records to view models
//! - [`stats`] - Dashboard aggregation (stock totals, low stock, revenue)
//! - [`search`] - Case-insensitive substring filtering

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod adapter;
pub mod model;
pub mod search;
pub mod stats;
pub mod types;
pub mod wire;

pub use adapter::{AdaptWarning, Adapted};
pub use model::{LocalizedNames, Order, OrderItem, Product, StockMovement};
pub use types::*;
