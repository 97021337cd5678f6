//! Dashboard overview.

use std::io::Write;

use chrono::{DateTime, Utc};
use serde::Serialize;
use stock_dashboard_client::DashboardSnapshot;
use stock_dashboard_core::stats::DashboardStats;
use stock_dashboard_core::{Order, Product};

use super::{CliError, Context};
use crate::output::{self, Format};

/// JSON shape of the dashboard.
#[derive(Serialize)]
struct DashboardReport<'a> {
    fetched_at: DateTime<Utc>,
    stats: DashboardStats,
    low_stock: Vec<&'a Product>,
    latest_orders: Vec<&'a Order>,
    products_error: Option<&'a str>,
    orders_error: Option<&'a str>,
}

/// Load products and orders and print the dashboard.
///
/// A collection that fails to load is reported in place; the command still
/// succeeds with whatever did load.
pub async fn run<W: Write>(ctx: &Context<'_>, order_limit: u32, out: &mut W) -> Result<(), CliError> {
    let snapshot = DashboardSnapshot::load(ctx.client, ctx.session, order_limit).await;
    if !snapshot.is_complete() {
        tracing::warn!("Dashboard is incomplete");
    }

    match ctx.format {
        Format::Json => output::write_json(
            out,
            &DashboardReport {
                fetched_at: snapshot.fetched_at,
                stats: snapshot.stats(),
                low_stock: snapshot.low_stock(),
                latest_orders: snapshot.latest_orders(),
                products_error: snapshot.products.error(),
                orders_error: snapshot.orders.error(),
            },
        ),
        Format::Text => Ok(output::render_dashboard(out, &snapshot, ctx.language)?),
    }
}
