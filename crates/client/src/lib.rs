//! Stock Dashboard Client - REST API access for the dashboard.
//!
//! Fetches products, orders and stock movements from the stock management
//! API and hands them back as adapted view models from
//! [`stock_dashboard_core`].
//!
//! # Architecture
//!
//! - [`ApiClient`] is a cheap-to-clone handle around one `reqwest::Client`
//! - Authentication state lives in an explicit [`Session`] value that is
//!   passed to every authenticated call; the client itself holds no token
//! - Adapter warnings are logged with `tracing` at the point of fetch
//! - [`DashboardSnapshot`] loads the dashboard collections concurrently and
//!   keeps "failed to load" distinct from "empty"
//! - [`HealthMonitor`] polls the liveness endpoint for online/offline status

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod client;
pub mod config;
pub mod dashboard;
pub mod error;
pub mod health;
pub mod session;

pub use client::ApiClient;
pub use config::{AuthConfig, ClientConfig, ConfigError};
pub use dashboard::{DashboardSnapshot, Fetched};
pub use error::ApiError;
pub use health::{ConnectionStatus, HealthMonitor};
pub use session::Session;
