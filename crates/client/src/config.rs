//! Client configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Optional
//! - `STOCK_API_BASE_URL` - API root (default: `http://localhost:8000`)
//! - `STOCK_API_TIMEOUT_SECS` - Per-request timeout (default: 30)
//! - `STOCK_API_LANGUAGE` - Catalog language, `fr`, `ar` or `en` (default: fr)
//! - `STOCK_HEALTH_INTERVAL_SECS` - Health polling interval (default: 30)
//!
//! ## Authentication (one of)
//! - `STOCK_API_TOKEN` - Pre-issued bearer token
//! - `STOCK_API_USERNAME` and `STOCK_API_PASSWORD` - Login credentials
//!
//! When both are present the token wins.

use std::time::Duration;

use secrecy::SecretString;
use thiserror::Error;
use url::Url;

const DEFAULT_BASE_URL: &str = "http://localhost:8000";
const DEFAULT_TIMEOUT_SECS: &str = "30";
const DEFAULT_LANGUAGE: &str = "fr";
const DEFAULT_HEALTH_INTERVAL_SECS: &str = "30";

/// Languages the catalog has names for.
const SUPPORTED_LANGUAGES: &[&str] = &["fr", "ar", "en"];

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// How the client authenticates.
///
/// Implements `Debug` manually to redact secrets.
#[derive(Clone)]
pub enum AuthConfig {
    /// Use a bearer token issued earlier.
    Token(SecretString),
    /// Log in with a username and password.
    Credentials {
        username: String,
        password: SecretString,
    },
}

impl std::fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Token(_) => f.debug_tuple("Token").field(&"[REDACTED]").finish(),
            Self::Credentials { username, .. } => f
                .debug_struct("Credentials")
                .field("username", username)
                .field("password", &"[REDACTED]")
                .finish(),
        }
    }
}

/// Stock management API client configuration.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// API root; endpoint paths are appended to it
    pub base_url: Url,
    /// Per-request timeout
    pub timeout: Duration,
    /// Language for localized product names
    pub language: String,
    /// Interval between health probes
    pub health_interval: Duration,
    /// Authentication (optional - only the health check works without it)
    pub auth: Option<AuthConfig>,
}

impl ClientConfig {
    /// Configuration pointing at `base_url` with every other setting at
    /// its default and no authentication.
    #[must_use]
    pub fn new(base_url: Url) -> Self {
        Self {
            base_url,
            timeout: Duration::from_secs(30),
            language: DEFAULT_LANGUAGE.to_string(),
            health_interval: Duration::from_secs(30),
            auth: None,
        }
    }

    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is present but invalid, or if only
    /// half of the username/password pair is set.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        Self::from_vars(|key| std::env::var(key).ok())
    }

    /// Load configuration through a variable lookup function.
    ///
    /// # Errors
    ///
    /// Same as [`ClientConfig::from_env`].
    pub fn from_vars<F>(var: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let base_url = parse_base_url(&get_env_or_default(
            &var,
            "STOCK_API_BASE_URL",
            DEFAULT_BASE_URL,
        ))?;
        let timeout = get_duration_secs(&var, "STOCK_API_TIMEOUT_SECS", DEFAULT_TIMEOUT_SECS)?;
        let health_interval = get_duration_secs(
            &var,
            "STOCK_HEALTH_INTERVAL_SECS",
            DEFAULT_HEALTH_INTERVAL_SECS,
        )?;

        let language = get_env_or_default(&var, "STOCK_API_LANGUAGE", DEFAULT_LANGUAGE)
            .trim()
            .to_lowercase();
        if !SUPPORTED_LANGUAGES.contains(&language.as_str()) {
            return Err(ConfigError::InvalidEnvVar(
                "STOCK_API_LANGUAGE".to_string(),
                format!("must be one of {}", SUPPORTED_LANGUAGES.join(", ")),
            ));
        }

        let auth = AuthConfig::from_vars(&var)?;

        Ok(Self {
            base_url,
            timeout,
            language,
            health_interval,
            auth,
        })
    }

    /// Returns the authentication settings, if any.
    #[must_use]
    pub const fn auth(&self) -> Option<&AuthConfig> {
        self.auth.as_ref()
    }
}

impl AuthConfig {
    fn from_vars<F>(var: &F) -> Result<Option<Self>, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(token) = get_optional_env(var, "STOCK_API_TOKEN") {
            return Ok(Some(Self::Token(SecretString::from(token))));
        }

        let username = get_optional_env(var, "STOCK_API_USERNAME");
        let password = get_optional_env(var, "STOCK_API_PASSWORD");

        match (username, password) {
            (Some(username), Some(password)) => Ok(Some(Self::Credentials {
                username,
                password: SecretString::from(password),
            })),
            (None, None) => Ok(None),
            (Some(_), None) => Err(ConfigError::MissingEnvVar("STOCK_API_PASSWORD".to_string())),
            (None, Some(_)) => Err(ConfigError::MissingEnvVar("STOCK_API_USERNAME".to_string())),
        }
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get an optional variable; blank values count as unset.
fn get_optional_env<F>(var: &F, key: &str) -> Option<String>
where
    F: Fn(&str) -> Option<String>,
{
    var(key).filter(|value| !value.trim().is_empty())
}

/// Get a variable with a default value.
fn get_env_or_default<F>(var: &F, key: &str, default: &str) -> String
where
    F: Fn(&str) -> Option<String>,
{
    get_optional_env(var, key).unwrap_or_else(|| default.to_string())
}

/// Get a positive whole number of seconds.
fn get_duration_secs<F>(var: &F, key: &str, default: &str) -> Result<Duration, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let secs = get_env_or_default(var, key, default)
        .trim()
        .parse::<u64>()
        .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))?;
    if secs == 0 {
        return Err(ConfigError::InvalidEnvVar(
            key.to_string(),
            "must be greater than zero".to_string(),
        ));
    }
    Ok(Duration::from_secs(secs))
}

/// Parse the API root. Only http(s) URLs that can carry a path are accepted.
fn parse_base_url(value: &str) -> Result<Url, ConfigError> {
    let url = Url::parse(value.trim()).map_err(|e| {
        ConfigError::InvalidEnvVar("STOCK_API_BASE_URL".to_string(), e.to_string())
    })?;
    if !matches!(url.scheme(), "http" | "https") || url.cannot_be_a_base() {
        return Err(ConfigError::InvalidEnvVar(
            "STOCK_API_BASE_URL".to_string(),
            "must be an http or https URL".to_string(),
        ));
    }
    Ok(url)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::collections::HashMap;

    use secrecy::ExposeSecret;

    use super::*;

    fn load(vars: &[(&str, &str)]) -> Result<ClientConfig, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        ClientConfig::from_vars(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = load(&[]).unwrap();
        assert_eq!(config.base_url.as_str(), "http://localhost:8000/");
        assert_eq!(config.timeout, Duration::from_secs(30));
        assert_eq!(config.health_interval, Duration::from_secs(30));
        assert_eq!(config.language, "fr");
        assert!(config.auth().is_none());
    }

    #[test]
    fn test_overrides() {
        let config = load(&[
            ("STOCK_API_BASE_URL", "https://stock.example.com/v1/"),
            ("STOCK_API_TIMEOUT_SECS", "5"),
            ("STOCK_API_LANGUAGE", "AR"),
            ("STOCK_HEALTH_INTERVAL_SECS", "10"),
        ])
        .unwrap();
        assert_eq!(config.base_url.as_str(), "https://stock.example.com/v1/");
        assert_eq!(config.timeout, Duration::from_secs(5));
        assert_eq!(config.language, "ar");
        assert_eq!(config.health_interval, Duration::from_secs(10));
    }

    #[test]
    fn test_invalid_timeout() {
        let err = load(&[("STOCK_API_TIMEOUT_SECS", "soon")]).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidEnvVar(key, _) if key == "STOCK_API_TIMEOUT_SECS"));

        let err = load(&[("STOCK_HEALTH_INTERVAL_SECS", "0")]).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidEnvVar(_, _)));
    }

    #[test]
    fn test_invalid_base_url() {
        assert!(load(&[("STOCK_API_BASE_URL", "not a url")]).is_err());
        assert!(load(&[("STOCK_API_BASE_URL", "mailto:ops@example.com")]).is_err());
        assert!(load(&[("STOCK_API_BASE_URL", "ftp://example.com")]).is_err());
    }

    #[test]
    fn test_unsupported_language() {
        assert!(load(&[("STOCK_API_LANGUAGE", "de")]).is_err());
    }

    #[test]
    fn test_token_auth() {
        let config = load(&[("STOCK_API_TOKEN", "eyJhbGciOi.abc.def")]).unwrap();
        match config.auth() {
            Some(AuthConfig::Token(token)) => assert_eq!(token.expose_secret(), "eyJhbGciOi.abc.def"),
            other => panic!("expected token auth, got {other:?}"),
        }
    }

    #[test]
    fn test_token_wins_over_credentials() {
        let config = load(&[
            ("STOCK_API_TOKEN", "tok"),
            ("STOCK_API_USERNAME", "admin"),
            ("STOCK_API_PASSWORD", "pw"),
        ])
        .unwrap();
        assert!(matches!(config.auth(), Some(AuthConfig::Token(_))));
    }

    #[test]
    fn test_credentials_must_be_paired() {
        let err = load(&[("STOCK_API_USERNAME", "admin")]).unwrap_err();
        assert!(matches!(err, ConfigError::MissingEnvVar(key) if key == "STOCK_API_PASSWORD"));

        let err = load(&[("STOCK_API_PASSWORD", "pw")]).unwrap_err();
        assert!(matches!(err, ConfigError::MissingEnvVar(key) if key == "STOCK_API_USERNAME"));

        let config = load(&[
            ("STOCK_API_USERNAME", "admin"),
            ("STOCK_API_PASSWORD", "s3cret!"),
        ])
        .unwrap();
        assert!(matches!(
            config.auth(),
            Some(AuthConfig::Credentials { username, .. }) if username == "admin"
        ));
    }

    #[test]
    fn test_blank_values_count_as_unset() {
        let config = load(&[("STOCK_API_TOKEN", "  "), ("STOCK_API_LANGUAGE", "")]).unwrap();
        assert!(config.auth().is_none());
        assert_eq!(config.language, "fr");
    }

    #[test]
    fn test_auth_config_debug_redacts_secrets() {
        let auth = AuthConfig::Credentials {
            username: "warehouse".to_string(),
            password: SecretString::from("super_secret_password"),
        };
        let debug_output = format!("{auth:?}");

        // Public fields should be visible
        assert!(debug_output.contains("warehouse"));

        // Secret fields should be redacted
        assert!(debug_output.contains("[REDACTED]"));
        assert!(!debug_output.contains("super_secret_password"));

        let token = AuthConfig::Token(SecretString::from("bearer_secret_value"));
        assert!(!format!("{token:?}").contains("bearer_secret_value"));
    }
}
