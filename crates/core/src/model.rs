//! Normalized view models.
//!
//! These are the shapes every view works with. All stock counters are plain
//! integers (never absent), all identifiers are textual, and all timestamps
//! are UTC. Build them from wire records with [`crate::adapter`].

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::{
    CategoryId, MovementId, MovementKind, Money, OrderId, OrderItemId, OrderStatus,
    PaymentStatus, ProductId,
};

/// Product names in the languages the distributor sells in.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocalizedNames {
    pub fr: Option<String>,
    pub ar: Option<String>,
    pub en: Option<String>,
}

/// A catalog product with its stock position.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub code: String,
    pub name: String,
    pub localized_names: LocalizedNames,
    pub description: Option<String>,
    pub category_id: Option<CategoryId>,
    pub unit_type: Option<String>,
    pub unit_size: Option<String>,
    pub units_per_case: Option<i64>,
    pub price: Money,
    pub is_active: bool,
    /// Units free to sell. This is the server's reported figure.
    pub stock_available: i64,
    /// Units promised to open orders.
    pub stock_reserved: i64,
    /// Units on hand.
    pub stock_total: i64,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl Product {
    /// Name to display for `language` (`fr`, `ar`, `en`), falling back to the
    /// default name when no translation exists.
    #[must_use]
    pub fn display_name(&self, language: &str) -> &str {
        let localized = match language {
            "fr" => self.localized_names.fr.as_deref(),
            "ar" => self.localized_names.ar.as_deref(),
            "en" => self.localized_names.en.as_deref(),
            _ => None,
        };
        localized
            .filter(|name| !name.trim().is_empty())
            .unwrap_or(&self.name)
    }

    /// Available units as implied by the other two counters.
    #[must_use]
    pub const fn derived_available(&self) -> i64 {
        self.stock_total.saturating_sub(self.stock_reserved)
    }

    /// Value of the units on hand at list price, or `None` when it is out
    /// of the decimal range.
    #[must_use]
    pub fn stock_value(&self) -> Option<Money> {
        self.price.checked_times(self.stock_total)
    }
}

/// A customer order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    pub id: OrderId,
    pub order_number: String,
    pub customer_name: Option<String>,
    pub customer_phone: String,
    pub customer_address: Option<String>,
    pub total: Money,
    pub payment_status: PaymentStatus,
    pub status: OrderStatus,
    pub language: Option<String>,
    pub notes: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
    pub items: Vec<OrderItem>,
}

impl Order {
    /// Order number for display, falling back to the identifier.
    #[must_use]
    pub fn reference(&self) -> &str {
        if self.order_number.is_empty() {
            self.id.as_str()
        } else {
            &self.order_number
        }
    }

    /// Number of units across all lines.
    #[must_use]
    pub fn unit_count(&self) -> i64 {
        self.items
            .iter()
            .fold(0, |count: i64, item| count.saturating_add(item.quantity))
    }

    /// Sum of the line totals.
    #[must_use]
    pub fn items_total(&self) -> Money {
        self.items.iter().map(|item| item.line_total).sum()
    }
}

/// One line of an [`Order`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderItem {
    pub id: Option<OrderItemId>,
    pub product_id: ProductId,
    pub product_name: Option<String>,
    pub quantity: i64,
    pub unit_price: Money,
    pub line_total: Money,
}

/// A change to a product's stock.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StockMovement {
    pub id: MovementId,
    pub product_id: ProductId,
    pub product_name: Option<String>,
    pub kind: MovementKind,
    /// Signed for adjustments; in/out movements are reported as magnitudes.
    pub quantity: i64,
    pub reason: String,
    pub created_at: Option<DateTime<Utc>>,
    pub created_by: Option<String>,
}
