//! Session inspection.

use std::io::Write;

use super::{CliError, Context};
use crate::output::{self, Format};

/// Show who the configured credentials belong to.
pub async fn whoami<W: Write>(ctx: &Context<'_>, out: &mut W) -> Result<(), CliError> {
    let user = ctx.client.me(ctx.session).await?;
    tracing::debug!(username = %user.username, role = %user.role, "Resolved session user");

    match ctx.format {
        Format::Json => output::write_json(out, &user),
        Format::Text => Ok(output::render_user(out, &user)?),
    }
}
