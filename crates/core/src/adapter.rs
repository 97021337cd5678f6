//! Tolerant conversion from wire records to view models.
//!
//! Adapting never fails. Missing, null or malformed fields degrade to
//! defaults (`0` for counters and amounts, empty for identifiers), so a view
//! always has something to render. Anything suspicious the adapter notices
//! along the way is returned as an [`AdaptWarning`] next to the value; the
//! caller decides whether to log it.
//!
//! # Stock reconciliation
//!
//! The server reports `available_quantity` alongside `stock_quantity` and
//! `reserved_quantity`, and the three do not always agree. The reported
//! `available_quantity` is authoritative (absent means `0`). When it differs
//! from `stock_quantity - reserved_quantity`, or exceeds `stock_quantity`, a
//! warning is emitted and the reported value is kept.
//!
//! Older payloads name the counters `stock_total`, `stock_reserved` and
//! `stock_available`. When a record carries both spellings the current
//! names win.

use core::fmt;

use chrono::{DateTime, NaiveDateTime, Utc};
use rust_decimal::Decimal;
use serde_json::Value;

use crate::model::{LocalizedNames, Order, OrderItem, Product, StockMovement};
use crate::types::{
    CategoryId, MovementId, MovementKind, Money, OrderId, OrderItemId, OrderStatus,
    PaymentStatus, ProductId,
};
use crate::wire::{RawOrder, RawOrderItem, RawProduct, RawStockMovement};

/// Timestamp layouts without an offset, interpreted as UTC.
const NAIVE_TIMESTAMP_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
];

/// Largest float magnitude converted to an integer counter.
const MAX_EXACT_FLOAT: f64 = 9_007_199_254_740_992.0;

// =============================================================================
// Results
// =============================================================================

/// An adapted value together with the anomalies found while adapting it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Adapted<T> {
    pub value: T,
    pub warnings: Vec<AdaptWarning>,
}

impl<T> Adapted<T> {
    const fn new(value: T, warnings: Vec<AdaptWarning>) -> Self {
        Self { value, warnings }
    }

    /// Split into the value and its warnings.
    #[must_use]
    pub fn into_parts(self) -> (T, Vec<AdaptWarning>) {
        (self.value, self.warnings)
    }

    /// Whether adapting found nothing suspicious.
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.warnings.is_empty()
    }
}

/// Something suspicious noticed while adapting a record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AdaptWarning {
    /// Reported available units differ from total minus reserved.
    StockDivergence {
        code: String,
        reported: i64,
        derived: i64,
    },
    /// Reported available units exceed the units on hand.
    AvailableExceedsTotal {
        code: String,
        available: i64,
        total: i64,
    },
    /// A line's server total differs from quantity times unit price.
    LineTotalMismatch {
        order_number: String,
        product_id: ProductId,
        expected: Money,
        reported: Money,
    },
    /// Quantity times unit price does not fit in a decimal; the line total
    /// falls back to zero.
    LineTotalOutOfRange {
        order_number: String,
        product_id: ProductId,
        quantity: i64,
        unit_price: Money,
    },
    /// A status string that is not one of the known values.
    UnknownStatus { field: &'static str, value: String },
}

impl fmt::Display for AdaptWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::StockDivergence {
                code,
                reported,
                derived,
            } => write!(
                f,
                "product {code}: available_quantity {reported} differs from stock minus reserved ({derived})"
            ),
            Self::AvailableExceedsTotal {
                code,
                available,
                total,
            } => write!(
                f,
                "product {code}: available_quantity {available} exceeds stock_quantity {total}"
            ),
            Self::LineTotalMismatch {
                order_number,
                product_id,
                expected,
                reported,
            } => write!(
                f,
                "order {order_number}, product {product_id}: line total {reported} differs from quantity x unit price ({expected})"
            ),
            Self::LineTotalOutOfRange {
                order_number,
                product_id,
                quantity,
                unit_price,
            } => write!(
                f,
                "order {order_number}, product {product_id}: {quantity} x {unit_price} is out of range"
            ),
            Self::UnknownStatus { field, value } => {
                write!(f, "unknown {field} {value:?}, using default")
            }
        }
    }
}

// =============================================================================
// Products
// =============================================================================

/// Adapt one product record.
#[must_use]
pub fn adapt_product(raw: RawProduct) -> Adapted<Product> {
    let code = coerce_text(&raw.code).unwrap_or_default();
    let total = coerce_int(&raw.stock_quantity).or_else(|| coerce_int(&raw.stock_total));
    let reserved =
        coerce_int(&raw.reserved_quantity).or_else(|| coerce_int(&raw.stock_reserved));
    let reported =
        coerce_int(&raw.available_quantity).or_else(|| coerce_int(&raw.stock_available));

    let stock_total = total.unwrap_or(0);
    let stock_reserved = reserved.unwrap_or(0);
    let stock_available = reported.unwrap_or(0);

    let mut warnings = Vec::new();
    if let (Some(reported), Some(total), Some(reserved)) = (reported, total, reserved) {
        let derived = total.saturating_sub(reserved);
        if reported != derived {
            warnings.push(AdaptWarning::StockDivergence {
                code: code.clone(),
                reported,
                derived,
            });
        }
    }
    if let (Some(available), Some(total)) = (reported, total)
        && available > total
    {
        warnings.push(AdaptWarning::AvailableExceedsTotal {
            code: code.clone(),
            available,
            total,
        });
    }

    let product = Product {
        id: ProductId::new(coerce_id(&raw.id)),
        code,
        name: raw.name.unwrap_or_default(),
        localized_names: LocalizedNames {
            fr: raw.name_fr,
            ar: raw.name_ar,
            en: raw.name_en,
        },
        description: raw.description,
        category_id: Some(coerce_id(&raw.category_id))
            .filter(|id| !id.is_empty())
            .map(CategoryId::new),
        unit_type: raw.unit_type,
        unit_size: raw.unit_size,
        units_per_case: coerce_int(&raw.units_per_case),
        price: coerce_money(&raw.price).unwrap_or_default(),
        is_active: raw.is_active.unwrap_or(true),
        stock_available,
        stock_reserved,
        stock_total,
        created_at: parse_timestamp(raw.created_at.as_deref()),
        updated_at: parse_timestamp(raw.updated_at.as_deref()),
    };

    Adapted::new(product, warnings)
}

/// Adapt a list of product records, keeping their order.
#[must_use]
pub fn adapt_products(raws: Vec<RawProduct>) -> Adapted<Vec<Product>> {
    adapt_all(raws, adapt_product)
}

// =============================================================================
// Orders
// =============================================================================

/// Adapt one order record, including its lines.
#[must_use]
pub fn adapt_order(raw: RawOrder) -> Adapted<Order> {
    let mut warnings = Vec::new();

    let id = OrderId::new(coerce_id(&raw.id));
    let order_number = raw
        .order_number
        .map(|number| number.trim().to_owned())
        .unwrap_or_default();
    let total = coerce_money(&raw.total_amount)
        .or_else(|| coerce_money(&raw.total))
        .unwrap_or_default();
    let status: OrderStatus = parse_status("order status", raw.status.as_deref(), &mut warnings);
    let payment_status: PaymentStatus = parse_status(
        "payment status",
        raw.payment_status.as_deref(),
        &mut warnings,
    );

    let label = if order_number.is_empty() {
        id.to_string()
    } else {
        order_number.clone()
    };
    let items = raw
        .items
        .unwrap_or_default()
        .into_iter()
        .map(|item| {
            let (item, item_warnings) = adapt_order_item(&label, item).into_parts();
            warnings.extend(item_warnings);
            item
        })
        .collect();

    let order = Order {
        id,
        order_number,
        customer_name: raw.customer_name,
        customer_phone: raw.customer_phone.unwrap_or_default(),
        customer_address: raw.customer_address,
        total,
        payment_status,
        status,
        language: raw.language,
        notes: raw.notes,
        created_at: parse_timestamp(raw.created_at.as_deref()),
        updated_at: parse_timestamp(raw.updated_at.as_deref()),
        items,
    };

    Adapted::new(order, warnings)
}

/// Adapt a list of order records, keeping their order.
#[must_use]
pub fn adapt_orders(raws: Vec<RawOrder>) -> Adapted<Vec<Order>> {
    adapt_all(raws, adapt_order)
}

/// Adapt one order line. `order_number` only labels warnings.
///
/// The line total is the server's `total_price` when present, otherwise
/// `quantity x unit_price`, or zero when that product is out of range.
#[must_use]
pub fn adapt_order_item(order_number: &str, raw: RawOrderItem) -> Adapted<OrderItem> {
    let mut warnings = Vec::new();

    let product_id = ProductId::new(first_id(
        &raw.product_id,
        raw.product.as_deref().map(|p| &p.id),
    ));
    let product_name = raw
        .product_name
        .or_else(|| raw.product.and_then(|p| p.name));
    let quantity = coerce_int(&raw.quantity).unwrap_or(0);
    let unit_price = coerce_money(&raw.unit_price).unwrap_or_default();
    let expected = unit_price.checked_times(quantity);
    if expected.is_none() {
        warnings.push(AdaptWarning::LineTotalOutOfRange {
            order_number: order_number.to_owned(),
            product_id: product_id.clone(),
            quantity,
            unit_price,
        });
    }

    let line_total = match coerce_money(&raw.total_price) {
        Some(reported) => {
            if let Some(expected) = expected
                && reported != expected
            {
                warnings.push(AdaptWarning::LineTotalMismatch {
                    order_number: order_number.to_owned(),
                    product_id: product_id.clone(),
                    expected,
                    reported,
                });
            }
            reported
        }
        None => expected.unwrap_or(Money::ZERO),
    };

    let item = OrderItem {
        id: Some(coerce_id(&raw.id))
            .filter(|id| !id.is_empty())
            .map(OrderItemId::new),
        product_id,
        product_name,
        quantity,
        unit_price,
        line_total,
    };

    Adapted::new(item, warnings)
}

// =============================================================================
// Stock movements
// =============================================================================

/// Adapt one stock movement record. Unknown kinds become adjustments.
#[must_use]
pub fn adapt_movement(raw: RawStockMovement) -> Adapted<StockMovement> {
    let mut warnings = Vec::new();

    let kind: MovementKind =
        parse_status("movement kind", raw.movement_type.as_deref(), &mut warnings);
    let product_id = ProductId::new(first_id(
        &raw.product_id,
        raw.product.as_deref().map(|p| &p.id),
    ));

    let movement = StockMovement {
        id: MovementId::new(coerce_id(&raw.id)),
        product_id,
        product_name: raw.product.and_then(|p| p.name),
        kind,
        quantity: coerce_int(&raw.quantity).unwrap_or(0),
        reason: raw.reason.or(raw.notes).unwrap_or_default(),
        created_at: parse_timestamp(raw.created_at.as_deref()),
        created_by: raw.created_by,
    };

    Adapted::new(movement, warnings)
}

/// Adapt a list of stock movement records, keeping their order.
#[must_use]
pub fn adapt_movements(raws: Vec<RawStockMovement>) -> Adapted<Vec<StockMovement>> {
    adapt_all(raws, adapt_movement)
}

// =============================================================================
// Helpers
// =============================================================================

fn adapt_all<R, T>(raws: Vec<R>, adapt: fn(R) -> Adapted<T>) -> Adapted<Vec<T>> {
    let mut warnings = Vec::new();
    let values = raws
        .into_iter()
        .map(|raw| {
            let (value, found) = adapt(raw).into_parts();
            warnings.extend(found);
            value
        })
        .collect();
    Adapted::new(values, warnings)
}

/// Parse a status, falling back to the default. Blank means absent.
fn parse_status<S>(field: &'static str, raw: Option<&str>, warnings: &mut Vec<AdaptWarning>) -> S
where
    S: core::str::FromStr + Default,
{
    match raw.map(str::trim).filter(|text| !text.is_empty()) {
        None => S::default(),
        Some(text) => text.parse().unwrap_or_else(|_| {
            warnings.push(AdaptWarning::UnknownStatus {
                field,
                value: text.to_owned(),
            });
            S::default()
        }),
    }
}

/// Render an identifier in textual form. Non-scalar values become empty.
fn coerce_id(value: &Value) -> String {
    match value {
        Value::String(text) => text.trim().to_owned(),
        Value::Number(number) => number.to_string(),
        _ => String::new(),
    }
}

fn first_id(primary: &Value, fallback: Option<&Value>) -> String {
    let id = coerce_id(primary);
    if id.is_empty() {
        fallback.map(coerce_id).unwrap_or_default()
    } else {
        id
    }
}

fn coerce_text(value: &Value) -> Option<String> {
    match value {
        Value::String(text) => Some(text.trim().to_owned()),
        Value::Number(number) => Some(number.to_string()),
        _ => None,
    }
}

/// Read an integer counter from a number or numeric string.
///
/// Fractional values are truncated toward zero.
fn coerce_int(value: &Value) -> Option<i64> {
    match value {
        Value::Number(number) => number
            .as_i64()
            .or_else(|| number.as_f64().and_then(float_to_int)),
        Value::String(text) => {
            let text = text.trim();
            text.parse::<i64>()
                .ok()
                .or_else(|| text.parse::<f64>().ok().and_then(float_to_int))
        }
        _ => None,
    }
}

#[allow(clippy::cast_possible_truncation)] // range checked against MAX_EXACT_FLOAT
fn float_to_int(value: f64) -> Option<i64> {
    (value.is_finite() && value.abs() <= MAX_EXACT_FLOAT).then(|| value.trunc() as i64)
}

fn coerce_money(value: &Value) -> Option<Money> {
    match value {
        Value::Number(number) => parse_decimal(&number.to_string()),
        Value::String(text) => parse_decimal(text.trim()),
        _ => None,
    }
    .map(Money::new)
}

fn parse_decimal(text: &str) -> Option<Decimal> {
    text.parse::<Decimal>()
        .or_else(|_| Decimal::from_scientific(text))
        .ok()
}

/// Parse an RFC 3339 timestamp, or a naive one interpreted as UTC.
fn parse_timestamp(raw: Option<&str>) -> Option<DateTime<Utc>> {
    let text = raw?.trim();
    if text.is_empty() {
        return None;
    }
    if let Ok(timestamp) = DateTime::parse_from_rfc3339(text) {
        return Some(timestamp.with_timezone(&Utc));
    }
    NAIVE_TIMESTAMP_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(text, format).ok())
        .map(|naive| naive.and_utc())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::TimeZone;
    use serde_json::json;

    use super::*;

    fn raw_product(value: Value) -> RawProduct {
        serde_json::from_value(value).unwrap()
    }

    fn raw_order(value: Value) -> RawOrder {
        serde_json::from_value(value).unwrap()
    }

    // =========================================================================
    // Products
    // =========================================================================

    #[test]
    fn test_missing_available_quantity_defaults_to_zero() {
        let adapted = adapt_product(raw_product(json!({
            "id": 1,
            "code": "CC33",
            "name": "Coca-Cola 33cl",
            "stock_quantity": 150,
            "reserved_quantity": 30
        })));

        assert_eq!(adapted.value.stock_available, 0);
        assert_eq!(adapted.value.stock_total, 150);
        assert_eq!(adapted.value.stock_reserved, 30);
        assert!(adapted.is_clean());
    }

    #[test]
    fn test_null_and_garbage_counters_default_to_zero() {
        let product = adapt_product(raw_product(json!({
            "stock_quantity": null,
            "reserved_quantity": "n/a",
            "available_quantity": {"value": 3}
        })))
        .value;

        assert_eq!(product.stock_total, 0);
        assert_eq!(product.stock_reserved, 0);
        assert_eq!(product.stock_available, 0);
    }

    #[test]
    fn test_numeric_strings_are_accepted() {
        let product = adapt_product(raw_product(json!({
            "id": "42",
            "price": "12.50",
            "stock_quantity": "100",
            "reserved_quantity": 15,
            "available_quantity": 85.0
        })))
        .value;

        assert_eq!(product.id, ProductId::from(42));
        assert_eq!(product.price, Money::new(Decimal::new(1250, 2)));
        assert_eq!(product.stock_total, 100);
        assert_eq!(product.stock_available, 85);
    }

    #[test]
    fn test_float_price_keeps_short_representation() {
        let product = adapt_product(raw_product(json!({"price": 0.1}))).value;
        assert_eq!(product.price, Money::new(Decimal::new(1, 1)));
    }

    #[test]
    fn test_divergent_available_is_kept_and_reported() {
        let adapted = adapt_product(raw_product(json!({
            "code": "SP33",
            "stock_quantity": 80,
            "reserved_quantity": 10,
            "available_quantity": 5
        })));

        assert_eq!(adapted.value.stock_available, 5);
        assert_eq!(
            adapted.warnings,
            vec![AdaptWarning::StockDivergence {
                code: "SP33".to_owned(),
                reported: 5,
                derived: 70,
            }]
        );
    }

    #[test]
    fn test_available_above_total_is_reported() {
        let adapted = adapt_product(raw_product(json!({
            "code": "FO15",
            "stock_quantity": 10,
            "available_quantity": 25
        })));

        assert_eq!(adapted.value.stock_available, 25);
        assert!(matches!(
            adapted.warnings.as_slice(),
            [AdaptWarning::AvailableExceedsTotal {
                available: 25,
                total: 10,
                ..
            }]
        ));
    }

    #[test]
    fn test_legacy_stock_names() {
        let adapted = adapt_product(raw_product(json!({
            "code": "FO33",
            "stock_total": 100,
            "stock_reserved": 15,
            "stock_available": 85
        })));

        assert_eq!(adapted.value.stock_total, 100);
        assert_eq!(adapted.value.stock_reserved, 15);
        assert_eq!(adapted.value.stock_available, 85);
        assert!(adapted.is_clean());
    }

    #[test]
    fn test_current_stock_names_win_over_legacy() {
        let product = adapt_product(raw_product(json!({
            "code": "CC33",
            "stock_quantity": 150,
            "stock_total": 1,
            "reserved_quantity": null,
            "stock_reserved": 30,
            "available_quantity": 120,
            "stock_available": 2
        })))
        .value;

        assert_eq!(product.stock_total, 150);
        assert_eq!(product.stock_reserved, 30);
        assert_eq!(product.stock_available, 120);
    }

    #[test]
    fn test_product_defaults() {
        let product = adapt_product(RawProduct::default()).value;
        assert!(product.id.is_empty());
        assert!(product.code.is_empty());
        assert!(product.is_active);
        assert!(product.category_id.is_none());
        assert!(product.price.is_zero());
    }

    #[test]
    fn test_adapt_products_keeps_order_and_collects_warnings() {
        let adapted = adapt_products(vec![
            raw_product(json!({"code": "A", "stock_quantity": 1, "reserved_quantity": 0, "available_quantity": 9})),
            raw_product(json!({"code": "B"})),
        ]);

        let codes: Vec<_> = adapted.value.iter().map(|p| p.code.as_str()).collect();
        assert_eq!(codes, ["A", "B"]);
        assert_eq!(adapted.warnings.len(), 2);
    }

    // =========================================================================
    // Orders
    // =========================================================================

    #[test]
    fn test_order_total_prefers_total_amount() {
        let order = adapt_order(raw_order(json!({
            "id": 7,
            "order_number": "CMD007",
            "total_amount": "2450.00",
            "total": 1
        })))
        .value;
        assert_eq!(order.total, Money::new(Decimal::new(2450, 0)));

        let legacy = adapt_order(raw_order(json!({"id": "x", "total": 890}))).value;
        assert_eq!(legacy.total, Money::new(Decimal::new(890, 0)));
    }

    #[test]
    fn test_order_status_defaults() {
        let adapted = adapt_order(raw_order(json!({"id": 1, "status": "  "})));
        assert_eq!(adapted.value.status, OrderStatus::Pending);
        assert_eq!(adapted.value.payment_status, PaymentStatus::Pending);
        assert!(adapted.is_clean());
    }

    #[test]
    fn test_unknown_status_is_reported() {
        let adapted = adapt_order(raw_order(json!({
            "id": 1,
            "status": "shipped",
            "payment_status": "paid"
        })));

        assert_eq!(adapted.value.status, OrderStatus::Pending);
        assert_eq!(adapted.value.payment_status, PaymentStatus::Paid);
        assert_eq!(
            adapted.warnings,
            vec![AdaptWarning::UnknownStatus {
                field: "order status",
                value: "shipped".to_owned(),
            }]
        );
    }

    #[test]
    fn test_naive_timestamps_are_utc() {
        let order = adapt_order(raw_order(json!({
            "id": 1,
            "created_at": "2024-03-05T14:30:00.123456",
            "updated_at": "2024-03-05 15:00:00"
        })))
        .value;

        let created = order.created_at.unwrap();
        assert_eq!(created.timestamp(), Utc.with_ymd_and_hms(2024, 3, 5, 14, 30, 0).unwrap().timestamp());
        assert_eq!(
            order.updated_at,
            Some(Utc.with_ymd_and_hms(2024, 3, 5, 15, 0, 0).unwrap())
        );
    }

    #[test]
    fn test_offset_timestamps_are_converted() {
        let order = adapt_order(raw_order(json!({
            "id": 1,
            "created_at": "2024-03-05T14:30:00+02:00"
        })))
        .value;
        assert_eq!(
            order.created_at,
            Some(Utc.with_ymd_and_hms(2024, 3, 5, 12, 30, 0).unwrap())
        );
    }

    #[test]
    fn test_unparseable_timestamp_is_absent() {
        let order = adapt_order(raw_order(json!({"id": 1, "created_at": "yesterday"}))).value;
        assert!(order.created_at.is_none());
    }

    // =========================================================================
    // Order items
    // =========================================================================

    #[test]
    fn test_line_total_computed_when_absent() {
        let item = adapt_order_item(
            "CMD001",
            serde_json::from_value(json!({"product_id": 3, "quantity": 24, "unit_price": 12})).unwrap(),
        )
        .value;

        assert_eq!(item.line_total, Money::new(Decimal::new(288, 0)));
        assert_eq!(item.product_id, ProductId::from(3));
    }

    #[test]
    fn test_line_total_mismatch_keeps_server_value() {
        let adapted = adapt_order_item(
            "CMD001",
            serde_json::from_value(json!({
                "product_id": 3,
                "quantity": 2,
                "unit_price": "15.00",
                "total_price": 29
            }))
            .unwrap(),
        );

        assert_eq!(adapted.value.line_total, Money::new(Decimal::new(29, 0)));
        assert_eq!(
            adapted.warnings,
            vec![AdaptWarning::LineTotalMismatch {
                order_number: "CMD001".to_owned(),
                product_id: ProductId::from(3),
                expected: Money::new(Decimal::new(30, 0)),
                reported: Money::new(Decimal::new(29, 0)),
            }]
        );
    }

    #[test]
    fn test_line_total_out_of_range_falls_back_to_zero() {
        let adapted = adapt_order_item(
            "CMD009",
            serde_json::from_value(json!({
                "product_id": 1,
                "quantity": 2,
                "unit_price": "79228162514264337593543950335"
            }))
            .unwrap(),
        );

        assert_eq!(adapted.value.line_total, Money::ZERO);
        assert_eq!(adapted.value.unit_price, Money::new(Decimal::MAX));
        assert!(matches!(
            adapted.warnings.as_slice(),
            [AdaptWarning::LineTotalOutOfRange { quantity: 2, .. }]
        ));
    }

    #[test]
    fn test_out_of_range_line_keeps_server_total() {
        let adapted = adapt_order_item(
            "CMD009",
            serde_json::from_value(json!({
                "product_id": 1,
                "quantity": 2,
                "unit_price": "79228162514264337593543950335",
                "total_price": 100
            }))
            .unwrap(),
        );

        assert_eq!(adapted.value.line_total, Money::new(Decimal::new(100, 0)));
        assert_eq!(adapted.warnings.len(), 1);
    }

    #[test]
    fn test_item_falls_back_to_nested_product() {
        let item = adapt_order_item(
            "CMD001",
            serde_json::from_value(json!({
                "quantity": 1,
                "unit_price": 15,
                "total_price": 15,
                "product": {"id": 9, "name": "Fanta Orange 1.5L"}
            }))
            .unwrap(),
        );

        assert!(item.is_clean());
        assert_eq!(item.value.product_id, ProductId::from(9));
        assert_eq!(item.value.product_name.as_deref(), Some("Fanta Orange 1.5L"));
    }

    #[test]
    fn test_order_item_warnings_are_labelled_with_id_when_unnumbered() {
        let adapted = adapt_order(raw_order(json!({
            "id": 12,
            "items": [{"product_id": 1, "quantity": 1, "unit_price": 10, "total_price": 11}]
        })));

        assert!(matches!(
            adapted.warnings.as_slice(),
            [AdaptWarning::LineTotalMismatch { order_number, .. }] if order_number == "12"
        ));
    }

    // =========================================================================
    // Movements
    // =========================================================================

    #[test]
    fn test_movement_reason_falls_back_to_notes() {
        let movement = adapt_movement(
            serde_json::from_value(json!({
                "id": 3,
                "product_id": 1,
                "movement_type": "adjustment",
                "quantity": -5,
                "notes": "Inventaire - produits endommagés"
            }))
            .unwrap(),
        )
        .value;

        assert_eq!(movement.kind, MovementKind::Adjustment);
        assert_eq!(movement.quantity, -5);
        assert_eq!(movement.reason, "Inventaire - produits endommagés");
    }

    #[test]
    fn test_unknown_movement_kind_becomes_adjustment() {
        let adapted = adapt_movement(
            serde_json::from_value(json!({"id": 1, "movement_type": "transfer", "quantity": 4}))
                .unwrap(),
        );
        assert_eq!(adapted.value.kind, MovementKind::Adjustment);
        assert_eq!(adapted.warnings.len(), 1);
    }

    #[test]
    fn test_warning_display() {
        let warning = AdaptWarning::StockDivergence {
            code: "SP33".to_owned(),
            reported: 5,
            derived: 70,
        };
        assert_eq!(
            warning.to_string(),
            "product SP33: available_quantity 5 differs from stock minus reserved (70)"
        );
    }
}
