//! Subcommand implementations.

pub mod auth;
pub mod catalog;
pub mod dashboard;
pub mod health;
pub mod orders;

use stock_dashboard_client::{ApiClient, ApiError, ConfigError, Session};
use thiserror::Error;

use crate::output::Format;

/// Errors that end a command.
#[derive(Debug, Error)]
pub enum CliError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Api(#[from] ApiError),

    #[error("Output error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON output error: {0}")]
    Json(#[from] serde_json::Error),

    /// The health probe reported the API as down.
    #[error("API offline: {0}")]
    Offline(String),
}

/// What an authenticated command needs.
pub struct Context<'a> {
    pub client: &'a ApiClient,
    pub session: &'a Session,
    /// Language for product names
    pub language: &'a str,
    pub format: Format,
}
