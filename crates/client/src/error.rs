//! Errors returned by the stock management API client.

use thiserror::Error;

/// Errors that can occur when talking to the stock management API.
#[derive(Debug, Error)]
pub enum ApiError {
    /// HTTP request failed (connection refused, timeout, TLS).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Response body was not the JSON we expected.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// An endpoint URL could not be built.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// The configured base URL cannot have paths appended to it.
    #[error("Base URL cannot be used for API paths: {0}")]
    InvalidBaseUrl(String),

    /// The session token was rejected (missing, expired or revoked).
    #[error("Unauthorized - session expired or invalid")]
    Unauthorized,

    /// Login was refused.
    #[error("Authentication failed: {0}")]
    AuthenticationFailed(String),

    /// Neither a token nor credentials were configured.
    #[error("No credentials configured - set STOCK_API_TOKEN or STOCK_API_USERNAME/STOCK_API_PASSWORD")]
    NoCredentials,

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Any other non-success response.
    #[error("Server error ({status}): {message}")]
    Server {
        /// HTTP status code.
        status: u16,
        /// Message from the response body's `detail` or `message` field.
        message: String,
    },
}

impl ApiError {
    /// Whether the failure means the session must be re-established.
    #[must_use]
    pub const fn is_auth(&self) -> bool {
        matches!(
            self,
            Self::Unauthorized | Self::AuthenticationFailed(_) | Self::NoCredentials
        )
    }
}
