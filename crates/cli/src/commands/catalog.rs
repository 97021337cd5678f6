//! Product catalog and stock levels.

use std::io::Write;

use stock_dashboard_core::search;

use super::{CliError, Context};
use crate::output::{self, Format};

/// List products, optionally filtered by a search term.
pub async fn products<W: Write>(
    ctx: &Context<'_>,
    term: Option<&str>,
    include_inactive: bool,
    out: &mut W,
) -> Result<(), CliError> {
    let products = ctx.client.products(ctx.session, !include_inactive).await?;
    let matching = search::filter(&products, term.unwrap_or_default());

    match ctx.format {
        Format::Json => output::write_json(out, &matching),
        Format::Text => Ok(output::render_products(out, &matching, ctx.language)?),
    }
}

/// Stock levels of active products.
pub async fn stock<W: Write>(ctx: &Context<'_>, term: Option<&str>, out: &mut W) -> Result<(), CliError> {
    let products = ctx.client.products(ctx.session, true).await?;
    let matching = search::filter(&products, term.unwrap_or_default());

    match ctx.format {
        Format::Json => output::write_json(out, &matching),
        Format::Text => Ok(output::render_stock(out, &matching, ctx.language)?),
    }
}
