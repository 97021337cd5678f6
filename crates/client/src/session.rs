//! Authenticated session state.
//!
//! A [`Session`] is obtained from [`ApiClient::login`](crate::ApiClient::login)
//! or built from a pre-issued token, and is passed by reference to every
//! authenticated call. Dropping it or calling [`Session::end`] forgets the
//! token; nothing else in the process holds a copy.

use chrono::{DateTime, Utc};
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use stock_dashboard_core::wire::UserInfo;

/// Bearer token plus what the server told us about its owner.
///
/// Implements `Debug` manually to redact the token.
#[derive(Clone)]
pub struct Session {
    token: SecretString,
    token_type: String,
    user: Option<UserInfo>,
    started_at: DateTime<Utc>,
}

/// Response from `POST /api/auth/login`.
#[derive(Deserialize)]
pub(crate) struct TokenResponse {
    access_token: String,
    #[serde(default = "default_token_type")]
    token_type: String,
    #[serde(default)]
    user: Option<UserInfo>,
}

fn default_token_type() -> String {
    "bearer".to_string()
}

impl Session {
    /// Wrap a token issued earlier. The user is unknown until
    /// [`ApiClient::me`](crate::ApiClient::me) is called.
    #[must_use]
    pub fn from_token(token: SecretString) -> Self {
        Self {
            token,
            token_type: default_token_type(),
            user: None,
            started_at: Utc::now(),
        }
    }

    pub(crate) fn from_login(response: TokenResponse) -> Self {
        Self {
            token: SecretString::from(response.access_token),
            token_type: response.token_type,
            user: response.user,
            started_at: Utc::now(),
        }
    }

    /// The user the token belongs to, when known.
    #[must_use]
    pub const fn user(&self) -> Option<&UserInfo> {
        self.user.as_ref()
    }

    /// Username of the session owner, when known.
    #[must_use]
    pub fn username(&self) -> Option<&str> {
        self.user.as_ref().map(|user| user.username.as_str())
    }

    /// Token type reported at login (normally `bearer`).
    #[must_use]
    pub fn token_type(&self) -> &str {
        &self.token_type
    }

    /// When the session was opened.
    #[must_use]
    pub const fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    /// Record the user returned by `GET /api/auth/me`.
    pub fn set_user(&mut self, user: UserInfo) {
        self.user = Some(user);
    }

    /// Attach the bearer credential to a request.
    pub(crate) fn authorize(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        request.bearer_auth(self.token.expose_secret())
    }

    /// Close the session. The token is dropped with it.
    pub fn end(self) {
        tracing::debug!(
            username = self.username().unwrap_or("unknown"),
            duration_secs = (Utc::now() - self.started_at).num_seconds(),
            "Session ended"
        );
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("token", &"[REDACTED]")
            .field("token_type", &self.token_type)
            .field("user", &self.user)
            .field("started_at", &self.started_at)
            .finish()
    }
}
