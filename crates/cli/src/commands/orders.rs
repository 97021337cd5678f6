//! Orders and stock movements.

use std::io::Write;

use stock_dashboard_core::search;

use super::{CliError, Context};
use crate::output::{self, Format};

/// List the latest orders, optionally filtered by a search term.
pub async fn list<W: Write>(
    ctx: &Context<'_>,
    term: Option<&str>,
    limit: u32,
    out: &mut W,
) -> Result<(), CliError> {
    let orders = ctx.client.all_orders(ctx.session, limit).await?;
    let matching = search::filter(&orders, term.unwrap_or_default());

    match ctx.format {
        Format::Json => output::write_json(out, &matching),
        Format::Text => Ok(output::render_orders(out, &matching)?),
    }
}

/// Stock movement history, for one product or all, optionally filtered by
/// product name or reason.
pub async fn movements<W: Write>(
    ctx: &Context<'_>,
    product: Option<&str>,
    term: Option<&str>,
    out: &mut W,
) -> Result<(), CliError> {
    let product_id = product.map(stock_dashboard_core::ProductId::new);
    let movements = ctx
        .client
        .stock_movements(ctx.session, product_id.as_ref())
        .await?;
    let matching = search::filter(&movements, term.unwrap_or_default());

    match ctx.format {
        Format::Json => output::write_json(out, &matching),
        Format::Text => Ok(output::render_movements(out, &matching)?),
    }
}
