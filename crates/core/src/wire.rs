//! Raw API records, exactly as the REST server sends them.
//!
//! The server has gone through several iterations and does not agree with
//! itself on shapes: identifiers are sometimes integers and sometimes
//! strings, amounts are sometimes numbers and sometimes numeric strings, and
//! fields come and go. Numeric and identifier fields are held as
//! [`serde_json::Value`], and text, flag and nested fields go through the
//! lenient deserializers at the bottom of this module, so that deserializing
//! a response never fails because of one odd record. [`crate::adapter`]
//! turns these into the view models in [`crate::model`].

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

// =============================================================================
// Catalog
// =============================================================================

/// A product with its stock counters, as returned by `GET /api/products`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawProduct {
    #[serde(default)]
    pub id: Value,
    #[serde(default)]
    pub code: Value,
    #[serde(default, deserialize_with = "lenient_text")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub name_fr: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub name_ar: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub name_en: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub description: Option<String>,
    #[serde(default)]
    pub category_id: Value,
    #[serde(default, deserialize_with = "lenient_text")]
    pub unit_type: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub unit_size: Option<String>,
    #[serde(default)]
    pub units_per_case: Value,
    #[serde(default)]
    pub price: Value,
    #[serde(default, deserialize_with = "lenient_bool")]
    pub is_active: Option<bool>,
    /// Total units on hand.
    #[serde(default)]
    pub stock_quantity: Value,
    /// Units promised to open orders.
    #[serde(default)]
    pub reserved_quantity: Value,
    /// Units free to sell.
    #[serde(default)]
    pub available_quantity: Value,
    /// Older name of `stock_quantity`.
    #[serde(default, skip_serializing_if = "Value::is_null")]
    pub stock_total: Value,
    /// Older name of `reserved_quantity`.
    #[serde(default, skip_serializing_if = "Value::is_null")]
    pub stock_reserved: Value,
    /// Older name of `available_quantity`.
    #[serde(default, skip_serializing_if = "Value::is_null")]
    pub stock_available: Value,
    #[serde(default, deserialize_with = "lenient_text")]
    pub created_at: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub updated_at: Option<String>,
}

/// Response of `GET /api/stock/check/{id}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StockCheck {
    pub product_id: i64,
    pub available: bool,
    pub quantity: i64,
    pub product_name: String,
    #[serde(default, deserialize_with = "lenient_text")]
    pub product_name_local: Option<String>,
}

/// Body of `PUT /api/stock/{id}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StockUpdate {
    pub quantity: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reserved_quantity: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// A stock movement, as returned by `GET /api/stock/movements`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawStockMovement {
    #[serde(default)]
    pub id: Value,
    #[serde(default)]
    pub product_id: Value,
    #[serde(default, deserialize_with = "lenient")]
    pub product: Option<Box<RawProduct>>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub movement_type: Option<String>,
    #[serde(default)]
    pub quantity: Value,
    #[serde(default, deserialize_with = "lenient_text")]
    pub reason: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub notes: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub created_at: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub created_by: Option<String>,
}

// =============================================================================
// Orders
// =============================================================================

/// An order, as returned by `GET /api/orders/all`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawOrder {
    #[serde(default)]
    pub id: Value,
    #[serde(default, deserialize_with = "lenient_text")]
    pub order_number: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub customer_name: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub customer_phone: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub customer_address: Option<String>,
    /// Order total as sent by the current server.
    #[serde(default)]
    pub total_amount: Value,
    /// Order total under its older name.
    #[serde(default)]
    pub total: Value,
    #[serde(default, deserialize_with = "lenient_text")]
    pub status: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub payment_status: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub language: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub notes: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub created_at: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub updated_at: Option<String>,
    #[serde(default, deserialize_with = "lenient_list")]
    pub items: Option<Vec<RawOrderItem>>,
}

/// A line of an order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawOrderItem {
    #[serde(default)]
    pub id: Value,
    #[serde(default)]
    pub product_id: Value,
    #[serde(default, deserialize_with = "lenient_text")]
    pub product_name: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub product: Option<Box<RawProduct>>,
    #[serde(default)]
    pub quantity: Value,
    #[serde(default)]
    pub unit_price: Value,
    #[serde(default)]
    pub total_price: Value,
}

/// Body of `POST /api/orders`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewOrder {
    pub customer_phone: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub customer_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub customer_address: Option<String>,
    pub language: String,
    pub items: Vec<NewOrderItem>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// One requested line of a [`NewOrder`]. Prices are set by the server.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewOrderItem {
    pub product_id: i64,
    pub quantity: i64,
}

// =============================================================================
// Auth & health
// =============================================================================

/// The authenticated user, as returned by login and `GET /api/auth/me`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserInfo {
    pub id: i64,
    pub username: String,
    pub role: String,
    #[serde(default = "default_true")]
    pub is_active: bool,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
}

const fn default_true() -> bool {
    true
}

/// Response of `POST /api/auth/verify`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenVerification {
    pub valid: bool,
    #[serde(default)]
    pub username: Option<String>,
}

/// Response of `GET /api/health`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthReport {
    pub status: String,
    #[serde(default)]
    pub timestamp: Option<String>,
}

impl HealthReport {
    /// Whether the server describes itself as healthy.
    #[must_use]
    pub fn is_healthy(&self) -> bool {
        matches!(self.status.as_str(), "healthy" | "ok")
    }
}

// =============================================================================
// Lenient field deserializers
// =============================================================================

/// Text field. Numbers and booleans are rendered as text; anything else is
/// absent.
fn lenient_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(text) => Some(text),
        Value::Number(number) => Some(number.to_string()),
        Value::Bool(flag) => Some(flag.to_string()),
        _ => None,
    })
}

/// Flag field. Accepts booleans, `0`/`1`, and the usual words.
fn lenient_bool<'de, D>(deserializer: D) -> Result<Option<bool>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Bool(flag) => Some(flag),
        Value::Number(number) => match number.as_i64() {
            Some(0) => Some(false),
            Some(1) => Some(true),
            _ => None,
        },
        Value::String(text) => match text.trim().to_ascii_lowercase().as_str() {
            "true" | "1" | "yes" => Some(true),
            "false" | "0" | "no" => Some(false),
            _ => None,
        },
        _ => None,
    })
}

/// Nested record. A value of the wrong shape is absent.
fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    Ok(serde_json::from_value(Value::deserialize(deserializer)?).ok())
}

/// List of nested records. Elements of the wrong shape are skipped; a value
/// that is not a list is absent.
fn lenient_list<'de, D, T>(deserializer: D) -> Result<Option<Vec<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Array(values) => Some(
            values
                .into_iter()
                .filter_map(|value| serde_json::from_value(value).ok())
                .collect(),
        ),
        _ => None,
    })
}
