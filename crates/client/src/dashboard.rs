//! Data behind the dashboard page.
//!
//! Products and orders are loaded concurrently and independently: one
//! collection failing does not hide the other, and a collection that failed
//! to load is never confused with one that is empty.

use chrono::{DateTime, Utc};
use serde::Serialize;
use stock_dashboard_core::stats::{
    self, DashboardStats, RECENT_ORDERS_SHOWN, dashboard_stats, most_recent_orders,
};
use stock_dashboard_core::{Order, Product};

use crate::client::ApiClient;
use crate::error::ApiError;
use crate::session::Session;

/// A collection that either loaded or failed to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", content = "data", rename_all = "snake_case")]
pub enum Fetched<T> {
    /// The request succeeded; the list may be empty.
    Loaded(Vec<T>),
    /// The request failed, with the reason.
    Unavailable(String),
}

impl<T> Fetched<T> {
    /// Wrap a fetch result, logging failures.
    pub fn from_result(resource: &'static str, result: Result<Vec<T>, ApiError>) -> Self {
        match result {
            Ok(items) => Self::Loaded(items),
            Err(e) => {
                tracing::error!(resource, error = %e, "Failed to load");
                Self::Unavailable(e.to_string())
            }
        }
    }

    /// Loaded items, or an empty slice when unavailable.
    #[must_use]
    pub fn items(&self) -> &[T] {
        match self {
            Self::Loaded(items) => items,
            Self::Unavailable(_) => &[],
        }
    }

    #[must_use]
    pub const fn is_available(&self) -> bool {
        matches!(self, Self::Loaded(_))
    }

    /// Failure reason, when unavailable.
    #[must_use]
    pub fn error(&self) -> Option<&str> {
        match self {
            Self::Loaded(_) => None,
            Self::Unavailable(reason) => Some(reason),
        }
    }
}

/// Products and orders fetched together for the dashboard.
#[derive(Debug, Clone, Serialize)]
pub struct DashboardSnapshot {
    pub products: Fetched<Product>,
    pub orders: Fetched<Order>,
    pub fetched_at: DateTime<Utc>,
}

impl DashboardSnapshot {
    /// Load active products and the latest `order_limit` orders concurrently.
    pub async fn load(client: &ApiClient, session: &Session, order_limit: u32) -> Self {
        let (products, orders) = tokio::join!(
            client.products(session, true),
            client.all_orders(session, order_limit),
        );

        Self::from_results(products, orders, Utc::now())
    }

    /// Build a snapshot from fetch results obtained at `fetched_at`.
    pub fn from_results(
        products: Result<Vec<Product>, ApiError>,
        orders: Result<Vec<Order>, ApiError>,
        fetched_at: DateTime<Utc>,
    ) -> Self {
        Self {
            products: Fetched::from_result("products", products),
            orders: Fetched::from_result("orders", orders),
            fetched_at,
        }
    }

    /// Headline figures. Unavailable collections count as empty.
    #[must_use]
    pub fn stats(&self) -> DashboardStats {
        dashboard_stats(self.products.items(), self.orders.items(), self.fetched_at)
    }

    /// Products that need reordering.
    #[must_use]
    pub fn low_stock(&self) -> Vec<&Product> {
        stats::low_stock_products(self.products.items())
    }

    /// The newest orders, for the "latest orders" panel.
    #[must_use]
    pub fn latest_orders(&self) -> Vec<&Order> {
        most_recent_orders(self.orders.items(), RECENT_ORDERS_SHOWN)
    }

    /// Whether both collections loaded.
    #[must_use]
    pub const fn is_complete(&self) -> bool {
        self.products.is_available() && self.orders.is_available()
    }
}
