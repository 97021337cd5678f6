//! API liveness check.

use std::io::Write;
use std::time::Duration;

use stock_dashboard_client::{ApiClient, ConnectionStatus, HealthMonitor};

use super::CliError;
use crate::output::{self, Format};

/// Probe the API once, or keep probing until Ctrl-C when `watch` is set.
///
/// A single probe that finds the API offline is an error, so scripts can
/// rely on the exit status.
pub async fn run<W: Write>(
    client: &ApiClient,
    interval: Duration,
    watch: bool,
    format: Format,
    out: &mut W,
) -> Result<(), CliError> {
    let monitor = HealthMonitor::new(client.clone(), interval);

    if !watch {
        let status = monitor.check().await;
        emit(out, &status, format)?;
        return match status {
            ConnectionStatus::Online { .. } => Ok(()),
            ConnectionStatus::Offline { reason } => Err(CliError::Offline(reason)),
        };
    }

    tracing::info!(interval_secs = interval.as_secs(), "Watching API health, Ctrl-C to stop");

    let shutdown = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::warn!(error = %e, "Could not listen for Ctrl-C");
        }
    };

    let mut write_error = None;
    monitor
        .run_until(shutdown, |status| {
            if write_error.is_none()
                && let Err(e) = emit(out, status, format)
            {
                write_error = Some(e);
            }
        })
        .await;

    write_error.map_or(Ok(()), Err)
}

fn emit<W: Write>(out: &mut W, status: &ConnectionStatus, format: Format) -> Result<(), CliError> {
    match format {
        Format::Json => output::write_json(out, status),
        Format::Text => Ok(output::render_status(out, status)?),
    }
}
