//! Integration tests for the stock dashboard client.
//!
//! Every test runs the real [`ApiClient`] against an `httpmock` server that
//! plays the stock management API, so no backend is needed.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p stock-dashboard-integration-tests
//! ```
//!
//! # Test Categories
//!
//! - `client_auth` - login, sessions, token handling
//! - `client_catalog` - products, stock, movements, orders
//! - `dashboard_snapshot` - concurrent loading and partial failure
//! - `health_monitor` - online/offline probing

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::time::Duration;

use chrono::{DateTime, Utc};
use httpmock::MockServer;
use secrecy::SecretString;
use serde_json::{Value, json};
use stock_dashboard_client::{ApiClient, ClientConfig, Session};
use url::Url;

/// Token accepted by the mocks.
pub const TEST_TOKEN: &str = "test-token-1234";

/// Header value every authenticated mock expects.
pub const BEARER: &str = "Bearer test-token-1234";

/// Client configuration pointing at the mock server.
///
/// # Panics
///
/// Panics if the mock server URL is not a valid URL.
#[must_use]
pub fn config_for(server: &MockServer) -> ClientConfig {
    let base_url = Url::parse(&server.base_url()).expect("mock server URL is valid");
    let mut config = ClientConfig::new(base_url);
    config.timeout = Duration::from_secs(5);
    config
}

/// Client pointing at the mock server.
///
/// # Panics
///
/// Panics if the client cannot be built.
#[must_use]
pub fn client_for(server: &MockServer) -> ApiClient {
    ApiClient::new(&config_for(server)).expect("client builds")
}

/// Session holding [`TEST_TOKEN`].
#[must_use]
pub fn session() -> Session {
    Session::from_token(SecretString::from(TEST_TOKEN))
}

/// Two products in the two wire shapes the API has used.
///
/// `CC33` is low on stock (5 available), `FO33` is not. Stock totals add up
/// to 250.
#[must_use]
pub fn products_json() -> Value {
    json!([
        {
            "id": 1,
            "code": "CC33",
            "name": "Coca-Cola 33cl",
            "name_ar": "كوكا كولا 33cl",
            "price": "4.50",
            "is_active": true,
            "stock_quantity": 150,
            "reserved_quantity": 145,
            "available_quantity": 5
        },
        {
            "id": "2",
            "code": "FO33",
            "name": "Fanta Orange 33cl",
            "price": 4.0,
            "stock_total": 100,
            "stock_reserved": 15,
            "stock_available": 85
        }
    ])
}

/// Two orders: one placed a day before `now`, one a month before.
#[must_use]
pub fn orders_json(now: DateTime<Utc>) -> Value {
    let yesterday = (now - chrono::Duration::days(1)).to_rfc3339();
    let last_month = (now - chrono::Duration::days(30)).to_rfc3339();
    json!([
        {
            "id": 10,
            "order_number": "CMD-2024-001",
            "customer_name": "Hanane El Idrissi",
            "customer_phone": "0612345678",
            "total_amount": "240.00",
            "status": "confirmed",
            "payment_status": "paid",
            "created_at": yesterday,
            "items": [
                {
                    "id": 1,
                    "product_id": 1,
                    "product_name": "Coca-Cola 33cl",
                    "quantity": 24,
                    "unit_price": "10.00",
                    "total_price": "240.00"
                }
            ]
        },
        {
            "id": 11,
            "order_number": "CMD-2024-002",
            "customer_phone": "0687654321",
            "total": "89.50",
            "status": "pending",
            "payment_status": "pending",
            "created_at": last_month
        }
    ])
}
