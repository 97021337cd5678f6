//! Dashboard aggregation over adapted products, orders and movements.
//!
//! Thresholds are fixed constants. A product is low on stock when its
//! available units are strictly below [`LOW_STOCK_THRESHOLD`]; that single
//! comparison is used by every figure in this module.
//!
//! Unit sums saturate at the `i64` range.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::model::{Order, Product, StockMovement};
use crate::types::{MovementKind, Money, OrderStatus, PaymentStatus};

/// Available units below which a product needs reordering.
pub const LOW_STOCK_THRESHOLD: i64 = 10;

/// Trailing window, in days, for counting an order as recent.
pub const RECENT_ORDER_WINDOW_DAYS: i64 = 7;

/// Number of orders shown in a "latest orders" list.
pub const RECENT_ORDERS_SHOWN: usize = 5;

/// Fill percentage below which stock is only "medium".
pub const MEDIUM_STOCK_PERCENT: i64 = 50;

// =============================================================================
// Dashboard
// =============================================================================

/// Headline figures for the dashboard.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DashboardStats {
    pub total_products: usize,
    pub total_stock: i64,
    pub recent_orders: usize,
    pub low_stock_products: usize,
}

/// Compute the dashboard figures as of `now`.
#[must_use]
pub fn dashboard_stats(products: &[Product], orders: &[Order], now: DateTime<Utc>) -> DashboardStats {
    DashboardStats {
        total_products: products.len(),
        total_stock: products
            .iter()
            .fold(0, |sum: i64, p| sum.saturating_add(p.stock_total)),
        recent_orders: orders.iter().filter(|o| is_recent(o, now)).count(),
        low_stock_products: products.iter().filter(|p| is_low_stock(p)).count(),
    }
}

/// Whether a product's available units are below the threshold.
#[must_use]
pub const fn is_low_stock(product: &Product) -> bool {
    product.stock_available < LOW_STOCK_THRESHOLD
}

/// Products that need reordering, in input order.
#[must_use]
pub fn low_stock_products(products: &[Product]) -> Vec<&Product> {
    products.iter().filter(|p| is_low_stock(p)).collect()
}

/// The trailing window used by [`is_recent`].
#[must_use]
pub fn recent_order_window() -> Duration {
    Duration::days(RECENT_ORDER_WINDOW_DAYS)
}

/// Whether an order was created within the trailing window before `now`.
///
/// Undated orders are never recent. Orders stamped slightly in the future
/// (clock skew) count as recent.
#[must_use]
pub fn is_recent(order: &Order, now: DateTime<Utc>) -> bool {
    order
        .created_at
        .is_some_and(|created| created >= now - recent_order_window())
}

/// Orders created within the trailing window, in input order.
#[must_use]
pub fn recent_orders(orders: &[Order], now: DateTime<Utc>) -> Vec<&Order> {
    orders.iter().filter(|o| is_recent(o, now)).collect()
}

/// The `limit` newest orders, newest first. Undated orders sort last and
/// ties keep input order.
#[must_use]
pub fn most_recent_orders(orders: &[Order], limit: usize) -> Vec<&Order> {
    let mut sorted: Vec<&Order> = orders.iter().collect();
    sorted.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    sorted.truncate(limit);
    sorted
}

// =============================================================================
// Stock
// =============================================================================

/// How well stocked a product is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StockLevel {
    /// Nothing available.
    Empty,
    /// Below [`LOW_STOCK_THRESHOLD`].
    Low,
    /// Less than [`MEDIUM_STOCK_PERCENT`] of the units on hand are available.
    Medium,
    Good,
}

impl StockLevel {
    /// Classify a stock position.
    #[must_use]
    pub const fn classify(available: i64, total: i64) -> Self {
        if available <= 0 || total <= 0 {
            Self::Empty
        } else if available < LOW_STOCK_THRESHOLD {
            Self::Low
        } else if available.saturating_mul(100) < total.saturating_mul(MEDIUM_STOCK_PERCENT) {
            Self::Medium
        } else {
            Self::Good
        }
    }

    /// Classify a product.
    #[must_use]
    pub const fn of(product: &Product) -> Self {
        Self::classify(product.stock_available, product.stock_total)
    }

    /// Short label for display.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Empty => "out of stock",
            Self::Low => "low",
            Self::Medium => "medium",
            Self::Good => "good",
        }
    }
}

impl std::fmt::Display for StockLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Available units as a percentage of units on hand, clamped to `0..=100`.
///
/// A product with no units on hand is treated as having one, so the result
/// is always defined.
#[must_use]
#[allow(clippy::cast_precision_loss)] // stock counts are far below 2^52
pub fn fill_percent(product: &Product) -> f64 {
    let total = product.stock_total.max(1) as f64;
    let available = product.stock_available as f64;
    (available / total * 100.0).clamp(0.0, 100.0)
}

/// Totals shown above the stock table.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StockSummary {
    pub total: i64,
    pub available: i64,
    pub reserved: i64,
    pub low_stock: usize,
}

/// Sum the stock counters of all products.
#[must_use]
pub fn stock_summary<'a>(products: impl IntoIterator<Item = &'a Product>) -> StockSummary {
    products.into_iter().fold(StockSummary::default(), |acc, p| StockSummary {
        total: acc.total.saturating_add(p.stock_total),
        available: acc.available.saturating_add(p.stock_available),
        reserved: acc.reserved.saturating_add(p.stock_reserved),
        low_stock: acc.low_stock + usize::from(is_low_stock(p)),
    })
}

/// How many products are in stock, low, or out of stock.
///
/// The three counts always add up to the number of products.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AvailabilityBreakdown {
    pub in_stock: usize,
    pub low: usize,
    pub out_of_stock: usize,
}

/// Bucket products by available units.
#[must_use]
pub fn availability_breakdown<'a>(
    products: impl IntoIterator<Item = &'a Product>,
) -> AvailabilityBreakdown {
    let mut breakdown = AvailabilityBreakdown::default();
    for product in products {
        if product.stock_available <= 0 {
            breakdown.out_of_stock += 1;
        } else if is_low_stock(product) {
            breakdown.low += 1;
        } else {
            breakdown.in_stock += 1;
        }
    }
    breakdown
}

// =============================================================================
// Orders
// =============================================================================

/// Order counts by lifecycle status.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusCounts {
    pub pending: usize,
    pub confirmed: usize,
    pub delivered: usize,
    pub cancelled: usize,
}

impl StatusCounts {
    /// Count for one status.
    #[must_use]
    pub const fn get(&self, status: OrderStatus) -> usize {
        match status {
            OrderStatus::Pending => self.pending,
            OrderStatus::Confirmed => self.confirmed,
            OrderStatus::Delivered => self.delivered,
            OrderStatus::Cancelled => self.cancelled,
        }
    }

    fn slot(&mut self, status: OrderStatus) -> &mut usize {
        match status {
            OrderStatus::Pending => &mut self.pending,
            OrderStatus::Confirmed => &mut self.confirmed,
            OrderStatus::Delivered => &mut self.delivered,
            OrderStatus::Cancelled => &mut self.cancelled,
        }
    }
}

/// Totals shown above the order list.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderSummary {
    pub total_orders: usize,
    /// Sum of all order totals.
    pub revenue: Money,
    /// Sum of the totals of paid orders.
    pub paid_revenue: Money,
    pub by_status: StatusCounts,
}

/// Summarize a list of orders.
#[must_use]
pub fn order_summary<'a>(orders: impl IntoIterator<Item = &'a Order>) -> OrderSummary {
    let mut summary = OrderSummary::default();
    for order in orders {
        summary.total_orders += 1;
        summary.revenue += order.total;
        if order.payment_status == PaymentStatus::Paid {
            summary.paid_revenue += order.total;
        }
        *summary.by_status.slot(order.status) += 1;
    }
    summary
}

// =============================================================================
// Movements
// =============================================================================

/// Net effect of a list of stock movements.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MovementSummary {
    /// Units received.
    pub units_in: i64,
    /// Units shipped.
    pub units_out: i64,
    /// Signed sum of adjustments.
    pub adjustments: i64,
}

impl MovementSummary {
    /// Overall change in units on hand.
    #[must_use]
    pub const fn net_change(&self) -> i64 {
        self.units_in
            .saturating_sub(self.units_out)
            .saturating_add(self.adjustments)
    }
}

/// Summarize stock movements. In/out quantities count by magnitude whatever
/// sign the server used.
#[must_use]
pub fn movement_summary<'a>(
    movements: impl IntoIterator<Item = &'a StockMovement>,
) -> MovementSummary {
    movements
        .into_iter()
        .fold(MovementSummary::default(), |mut acc, movement| {
            match movement.kind {
                MovementKind::In => {
                    acc.units_in = acc.units_in.saturating_add(movement.quantity.saturating_abs());
                }
                MovementKind::Out => {
                    acc.units_out = acc.units_out.saturating_add(movement.quantity.saturating_abs());
                }
                MovementKind::Adjustment => {
                    acc.adjustments = acc.adjustments.saturating_add(movement.quantity);
                }
            }
            acc
        })
}
