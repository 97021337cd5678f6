//! Terminal rendering for command results.
//!
//! Every renderer writes to a caller-supplied writer so the same code serves
//! stdout and tests.

use std::io::{self, Write};

use serde::Serialize;
use stock_dashboard_client::{ConnectionStatus, DashboardSnapshot};
use stock_dashboard_core::stats::{
    LOW_STOCK_THRESHOLD, RECENT_ORDER_WINDOW_DAYS, StockLevel, availability_breakdown,
    fill_percent, movement_summary, order_summary, stock_summary,
};
use stock_dashboard_core::wire::UserInfo;
use stock_dashboard_core::{Order, OrderStatus, Product, StockMovement};

use crate::commands::CliError;

const NAME_WIDTH: usize = 28;
const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M";

/// Output style selected by the global `--json` flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Text,
    Json,
}

/// Write `value` as pretty-printed JSON followed by a newline.
pub fn write_json<W: Write, T: Serialize + ?Sized>(out: &mut W, value: &T) -> Result<(), CliError> {
    serde_json::to_writer_pretty(&mut *out, value)?;
    writeln!(out)?;
    Ok(())
}

pub fn render_status<W: Write>(out: &mut W, status: &ConnectionStatus) -> io::Result<()> {
    writeln!(out, "API {status}")
}

pub fn render_user<W: Write>(out: &mut W, user: &UserInfo) -> io::Result<()> {
    let active = if user.is_active { "active" } else { "inactive" };
    writeln!(out, "{} (role: {}, {active})", user.username, user.role)
}

/// Product catalog table.
pub fn render_products<W: Write>(
    out: &mut W,
    products: &[&Product],
    language: &str,
) -> io::Result<()> {
    if products.is_empty() {
        return writeln!(out, "No products found.");
    }

    writeln!(
        out,
        "{:<10} {:<NAME_WIDTH$} {:>10} {:>9}  STATUS",
        "CODE", "NAME", "PRICE", "AVAILABLE"
    )?;
    for product in products {
        writeln!(
            out,
            "{:<10} {:<NAME_WIDTH$} {:>10} {:>9}  {}{}",
            product.code,
            truncate(product.display_name(language), NAME_WIDTH),
            product.price.to_string(),
            product.stock_available,
            StockLevel::of(product).label(),
            if product.is_active { "" } else { " (inactive)" },
        )?;
    }
    writeln!(out, "\n{} product(s)", products.len())
}

/// Stock table with totals and availability buckets.
pub fn render_stock<W: Write>(out: &mut W, products: &[&Product], language: &str) -> io::Result<()> {
    if products.is_empty() {
        return writeln!(out, "No products found.");
    }

    writeln!(
        out,
        "{:<10} {:<NAME_WIDTH$} {:>9} {:>8} {:>7} {:>5}  LEVEL",
        "CODE", "NAME", "AVAILABLE", "RESERVED", "TOTAL", "FILL"
    )?;
    for product in products {
        writeln!(
            out,
            "{:<10} {:<NAME_WIDTH$} {:>9} {:>8} {:>7} {:>4.0}%  {}",
            product.code,
            truncate(product.display_name(language), NAME_WIDTH),
            product.stock_available,
            product.stock_reserved,
            product.stock_total,
            fill_percent(product),
            StockLevel::of(product).label(),
        )?;
    }

    let summary = stock_summary(products.iter().copied());
    let breakdown = availability_breakdown(products.iter().copied());
    writeln!(out)?;
    writeln!(
        out,
        "Units: {} total, {} available, {} reserved",
        summary.total, summary.available, summary.reserved
    )?;
    writeln!(
        out,
        "Products: {} in stock, {} low (under {LOW_STOCK_THRESHOLD}), {} out of stock",
        breakdown.in_stock, breakdown.low, breakdown.out_of_stock
    )
}

/// Order table with revenue and status counts.
pub fn render_orders<W: Write>(out: &mut W, orders: &[&Order]) -> io::Result<()> {
    if orders.is_empty() {
        return writeln!(out, "No orders found.");
    }

    writeln!(
        out,
        "{:<12} {:<20} {:<12} {:>10}  {:<10} {:<8} DATE",
        "NUMBER", "CUSTOMER", "PHONE", "TOTAL", "STATUS", "PAYMENT"
    )?;
    for order in orders {
        writeln!(
            out,
            "{:<12} {:<20} {:<12} {:>10}  {:<10} {:<8} {}",
            order.reference(),
            truncate(order.customer_name.as_deref().unwrap_or("-"), 20),
            order.customer_phone,
            order.total.to_string(),
            order.status.as_str(),
            order.payment_status.as_str(),
            order
                .created_at
                .map_or_else(|| "-".to_string(), |at| at.format(TIMESTAMP_FORMAT).to_string()),
        )?;
    }

    let summary = order_summary(orders.iter().copied());
    let by_status: Vec<String> = OrderStatus::ALL
        .iter()
        .map(|status| format!("{} {}", status.as_str(), summary.by_status.get(*status)))
        .collect();
    writeln!(out)?;
    writeln!(
        out,
        "{} order(s), revenue {} ({} paid)",
        summary.total_orders, summary.revenue, summary.paid_revenue
    )?;
    writeln!(out, "{}", by_status.join(", "))
}

/// Stock movement history with net change.
pub fn render_movements<W: Write>(out: &mut W, movements: &[&StockMovement]) -> io::Result<()> {
    if movements.is_empty() {
        return writeln!(out, "No stock movements found.");
    }

    writeln!(
        out,
        "{:<16} {:<NAME_WIDTH$} {:<10} {:>6}  REASON",
        "DATE", "PRODUCT", "KIND", "QTY"
    )?;
    for movement in movements {
        writeln!(
            out,
            "{:<16} {:<NAME_WIDTH$} {:<10} {:>6}  {}",
            movement
                .created_at
                .map_or_else(|| "-".to_string(), |at| at.format(TIMESTAMP_FORMAT).to_string()),
            truncate(
                movement
                    .product_name
                    .as_deref()
                    .unwrap_or_else(|| movement.product_id.as_str()),
                NAME_WIDTH
            ),
            movement.kind.as_str(),
            movement.quantity,
            movement.reason,
        )?;
    }

    let summary = movement_summary(movements.iter().copied());
    writeln!(out)?;
    writeln!(
        out,
        "In {}, out {}, adjustments {:+}, net {:+}",
        summary.units_in,
        summary.units_out,
        summary.adjustments,
        summary.net_change()
    )
}

/// Dashboard page: headline figures, low-stock list and latest orders.
pub fn render_dashboard<W: Write>(
    out: &mut W,
    snapshot: &DashboardSnapshot,
    language: &str,
) -> io::Result<()> {
    let stats = snapshot.stats();

    writeln!(
        out,
        "Dashboard as of {} UTC",
        snapshot.fetched_at.format(TIMESTAMP_FORMAT)
    )?;
    if let Some(reason) = snapshot.products.error() {
        writeln!(out, "  Products unavailable: {reason}")?;
    } else {
        writeln!(out, "  Products:       {}", stats.total_products)?;
        writeln!(out, "  Units in stock: {}", stats.total_stock)?;
        writeln!(out, "  Low stock:      {}", stats.low_stock_products)?;
    }
    if let Some(reason) = snapshot.orders.error() {
        writeln!(out, "  Orders unavailable: {reason}")?;
    } else {
        writeln!(
            out,
            "  Recent orders:  {} (last {RECENT_ORDER_WINDOW_DAYS} days)",
            stats.recent_orders
        )?;
    }

    if snapshot.products.is_available() {
        writeln!(out, "\nLow stock")?;
        let low = snapshot.low_stock();
        if low.is_empty() {
            writeln!(out, "  No products under {LOW_STOCK_THRESHOLD} units.")?;
        }
        for product in low {
            writeln!(
                out,
                "  {:<10} {:<NAME_WIDTH$} {:>4} left",
                product.code,
                truncate(product.display_name(language), NAME_WIDTH),
                product.stock_available
            )?;
        }
    }

    if snapshot.orders.is_available() {
        writeln!(out, "\nLatest orders")?;
        let latest = snapshot.latest_orders();
        if latest.is_empty() {
            writeln!(out, "  No orders yet.")?;
        }
        for order in latest {
            writeln!(
                out,
                "  {:<12} {:>10}  {}",
                order.reference(),
                order.total.to_string(),
                order.status.as_str()
            )?;
        }
    }
    Ok(())
}

/// Shorten `text` to at most `width` characters.
fn truncate(text: &str, width: usize) -> String {
    if text.chars().count() <= width {
        return text.to_string();
    }
    let mut short: String = text.chars().take(width.saturating_sub(1)).collect();
    short.push('…');
    short
}
