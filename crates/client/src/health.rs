//! Online/offline tracking through the liveness endpoint.

use std::future::Future;
use std::time::Duration;

use serde::Serialize;
use tokio::time::MissedTickBehavior;

use crate::client::ApiClient;

/// Shortest polling interval a [`HealthMonitor`] uses.
pub const MIN_POLL_INTERVAL: Duration = Duration::from_millis(10);

/// Result of one health probe.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum ConnectionStatus {
    /// The server answered and reports itself healthy.
    Online {
        /// Status string reported by the server.
        status: String,
        /// Server clock at the time of the probe, as sent.
        server_time: Option<String>,
    },
    /// The server could not be reached or reports a problem.
    Offline {
        /// Why the probe failed.
        reason: String,
    },
}

impl ConnectionStatus {
    #[must_use]
    pub const fn is_online(&self) -> bool {
        matches!(self, Self::Online { .. })
    }

    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Online { .. } => "online",
            Self::Offline { .. } => "offline",
        }
    }
}

impl std::fmt::Display for ConnectionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Online {
                server_time: Some(time),
                ..
            } => write!(f, "online (server time {time})"),
            Self::Online { .. } => f.write_str("online"),
            Self::Offline { reason } => write!(f, "offline: {reason}"),
        }
    }
}

/// Polls `GET /api/health` on a fixed interval.
#[derive(Debug, Clone)]
pub struct HealthMonitor {
    client: ApiClient,
    interval: Duration,
}

impl HealthMonitor {
    /// Intervals shorter than [`MIN_POLL_INTERVAL`] are raised to it.
    #[must_use]
    pub fn new(client: ApiClient, interval: Duration) -> Self {
        Self {
            client,
            interval: interval.max(MIN_POLL_INTERVAL),
        }
    }

    #[must_use]
    pub const fn interval(&self) -> Duration {
        self.interval
    }

    /// Probe the server once.
    pub async fn check(&self) -> ConnectionStatus {
        match self.client.health().await {
            Ok(report) if report.is_healthy() => ConnectionStatus::Online {
                status: report.status,
                server_time: report.timestamp,
            },
            Ok(report) => ConnectionStatus::Offline {
                reason: format!("server reports status '{}'", report.status),
            },
            Err(e) => ConnectionStatus::Offline {
                reason: e.to_string(),
            },
        }
    }

    /// Probe immediately and then once per interval until `shutdown`
    /// resolves, handing every result to `on_status`.
    ///
    /// Transitions between online and offline are logged. Returns the number
    /// of probes made.
    pub async fn run_until<S, F>(&self, shutdown: S, mut on_status: F) -> usize
    where
        S: Future<Output = ()>,
        F: FnMut(&ConnectionStatus),
    {
        let mut ticker = tokio::time::interval(self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        tokio::pin!(shutdown);

        let mut was_online: Option<bool> = None;
        let mut probes = 0;

        loop {
            tokio::select! {
                biased;
                () = &mut shutdown => break,
                _ = ticker.tick() => {
                    let status = self.check().await;
                    probes += 1;

                    let online = status.is_online();
                    if was_online != Some(online) {
                        if online {
                            tracing::info!(%status, "API reachable");
                        } else {
                            tracing::warn!(%status, "API unreachable");
                        }
                    }
                    was_online = Some(online);

                    on_status(&status);
                }
            }
        }

        tracing::debug!(probes, "Health monitor stopped");
        probes
    }
}
