//! Stock management REST API client.
//!
//! Provides typed access to the catalog, stock and order endpoints. Product,
//! order and movement responses are adapted into view models before they
//! are returned; any adapter warnings are logged here.

use std::sync::Arc;

use reqwest::{RequestBuilder, StatusCode};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use serde_json::Value;
use stock_dashboard_core::adapter::{
    Adapted, adapt_movements, adapt_order, adapt_orders, adapt_product, adapt_products,
};
use stock_dashboard_core::wire::{
    HealthReport, NewOrder, RawOrder, RawProduct, RawStockMovement, StockCheck, StockUpdate,
    TokenVerification, UserInfo,
};
use stock_dashboard_core::{Order, Product, ProductId, StockMovement};
use tracing::instrument;
use url::Url;

use crate::config::{AuthConfig, ClientConfig};
use crate::error::ApiError;
use crate::session::{Session, TokenResponse};

/// Default page size for `GET /api/orders/all`.
pub const DEFAULT_ORDER_LIMIT: u32 = 50;

/// Default page size for a customer's order history.
pub const DEFAULT_CUSTOMER_ORDER_LIMIT: u32 = 10;

/// Stock management API client.
///
/// Cloning is cheap; clones share one connection pool. The client holds no
/// credentials: authenticated calls take a [`Session`].
#[derive(Clone)]
pub struct ApiClient {
    inner: Arc<ApiClientInner>,
}

struct ApiClientInner {
    http: reqwest::Client,
    base_url: Url,
    /// Language sent with search and stock-check requests
    language: String,
}

/// Request body for `POST /api/auth/login`.
#[derive(Serialize)]
struct LoginRequest<'a> {
    username: &'a str,
    password: &'a str,
}

/// Error body returned by the API. `detail` is a string for most errors and
/// a list for validation failures.
#[derive(Deserialize)]
struct ErrorBody {
    #[serde(default)]
    detail: Option<Value>,
    #[serde(default)]
    message: Option<String>,
}

impl ApiClient {
    /// Create a client for the configured server.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::InvalidBaseUrl` if the base URL cannot carry a path,
    /// or `ApiError::Http` if the HTTP client cannot be built.
    pub fn new(config: &ClientConfig) -> Result<Self, ApiError> {
        if config.base_url.cannot_be_a_base() {
            return Err(ApiError::InvalidBaseUrl(config.base_url.to_string()));
        }

        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()?;

        Ok(Self {
            inner: Arc::new(ApiClientInner {
                http,
                base_url: config.base_url.clone(),
                language: config.language.clone(),
            }),
        })
    }

    /// The server this client talks to.
    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.inner.base_url
    }

    /// Language used for localized lookups.
    #[must_use]
    pub fn language(&self) -> &str {
        &self.inner.language
    }

    // =========================================================================
    // Authentication
    // =========================================================================

    /// Log in with a username and password.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::AuthenticationFailed` if the credentials are refused.
    #[instrument(skip(self, password))]
    pub async fn login(&self, username: &str, password: &SecretString) -> Result<Session, ApiError> {
        let url = self.endpoint(&["api", "auth", "login"])?;
        let response = self
            .inner
            .http
            .post(url)
            .json(&LoginRequest {
                username,
                password: password.expose_secret(),
            })
            .send()
            .await?;

        let status = response.status();
        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            let body = response.bytes().await.unwrap_or_default();
            let message =
                error_message(&body).unwrap_or_else(|| "Invalid credentials".to_string());
            tracing::warn!(%status, "Login refused");
            return Err(ApiError::AuthenticationFailed(message));
        }
        if !status.is_success() {
            return Err(error_from_response(response).await);
        }

        let body = response.bytes().await?;
        let token: TokenResponse = serde_json::from_slice(&body)?;
        let session = Session::from_login(token);
        tracing::info!(username = session.username().unwrap_or(username), "Logged in");
        Ok(session)
    }

    /// Open a session from the configured authentication settings.
    ///
    /// A configured token is used as is; credentials trigger a login.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::NoCredentials` if nothing is configured, or the
    /// login error.
    pub async fn open_session(&self, config: &ClientConfig) -> Result<Session, ApiError> {
        match config.auth() {
            Some(AuthConfig::Token(token)) => Ok(Session::from_token(token.clone())),
            Some(AuthConfig::Credentials { username, password }) => {
                self.login(username, password).await
            }
            None => Err(ApiError::NoCredentials),
        }
    }

    /// Fetch the user owning the session.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Unauthorized` if the token is not accepted.
    #[instrument(skip(self, session))]
    pub async fn me(&self, session: &Session) -> Result<UserInfo, ApiError> {
        let url = self.endpoint(&["api", "auth", "me"])?;
        send(session.authorize(self.inner.http.get(url))).await
    }

    /// Ask the server whether the session token is still valid.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self, session))]
    pub async fn verify(&self, session: &Session) -> Result<TokenVerification, ApiError> {
        let url = self.endpoint(&["api", "auth", "verify"])?;
        send(session.authorize(self.inner.http.post(url))).await
    }

    // =========================================================================
    // Products
    // =========================================================================

    /// List products, optionally restricted to active ones.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the body is not a product list.
    #[instrument(skip(self, session))]
    pub async fn products(
        &self,
        session: &Session,
        active_only: bool,
    ) -> Result<Vec<Product>, ApiError> {
        let mut url = self.endpoint(&["api", "products"])?;
        url.query_pairs_mut()
            .append_pair("active_only", if active_only { "true" } else { "false" });

        let raw: Vec<RawProduct> = send(session.authorize(self.inner.http.get(url))).await?;
        let products = log_warnings("product", adapt_products(raw));
        tracing::debug!(count = products.len(), "Fetched products");
        Ok(products)
    }

    /// Fetch one product.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::NotFound` if the product does not exist.
    #[instrument(skip(self, session, id), fields(product_id = %id))]
    pub async fn product(&self, session: &Session, id: &ProductId) -> Result<Product, ApiError> {
        let url = self.endpoint(&["api", "products", id.as_str()])?;
        let raw: RawProduct = send(session.authorize(self.inner.http.get(url))).await?;
        Ok(log_warnings("product", adapt_product(raw)))
    }

    /// Server-side product search in the configured language.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self, session))]
    pub async fn search_products(
        &self,
        session: &Session,
        term: &str,
    ) -> Result<Vec<Product>, ApiError> {
        let mut url = self.endpoint(&["api", "products", "search", term])?;
        url.query_pairs_mut()
            .append_pair("language", &self.inner.language);

        let raw: Vec<RawProduct> = send(session.authorize(self.inner.http.get(url))).await?;
        Ok(log_warnings("product", adapt_products(raw)))
    }

    // =========================================================================
    // Stock
    // =========================================================================

    /// Check availability of one product.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::NotFound` if the product does not exist.
    #[instrument(skip(self, session, id), fields(product_id = %id))]
    pub async fn check_stock(&self, session: &Session, id: &ProductId) -> Result<StockCheck, ApiError> {
        let mut url = self.endpoint(&["api", "stock", "check", id.as_str()])?;
        url.query_pairs_mut()
            .append_pair("language", &self.inner.language);
        send(session.authorize(self.inner.http.get(url))).await
    }

    /// Set the stock counters of a product.
    ///
    /// # Errors
    ///
    /// Returns an error if the server rejects the update.
    #[instrument(skip(self, session, id, update), fields(product_id = %id, quantity = update.quantity))]
    pub async fn update_stock(
        &self,
        session: &Session,
        id: &ProductId,
        update: &StockUpdate,
    ) -> Result<(), ApiError> {
        let url = self.endpoint(&["api", "stock", id.as_str()])?;
        send_empty(session.authorize(self.inner.http.put(url).json(update)))
            .await?;
        tracing::info!("Stock updated");
        Ok(())
    }

    /// List stock movements, for one product or for all.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self, session))]
    pub async fn stock_movements(
        &self,
        session: &Session,
        product_id: Option<&ProductId>,
    ) -> Result<Vec<StockMovement>, ApiError> {
        let mut url = self.endpoint(&["api", "stock", "movements"])?;
        if let Some(id) = product_id {
            url.query_pairs_mut().append_pair("product_id", id.as_str());
        }

        let raw: Vec<RawStockMovement> =
            send(session.authorize(self.inner.http.get(url))).await?;
        Ok(log_warnings("stock movement", adapt_movements(raw)))
    }

    // =========================================================================
    // Orders
    // =========================================================================

    /// List the most recent orders across all customers.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the body is not an order list.
    #[instrument(skip(self, session))]
    pub async fn all_orders(&self, session: &Session, limit: u32) -> Result<Vec<Order>, ApiError> {
        let mut url = self.endpoint(&["api", "orders", "all"])?;
        url.query_pairs_mut()
            .append_pair("limit", &limit.to_string());

        let raw: Vec<RawOrder> = send(session.authorize(self.inner.http.get(url))).await?;
        let orders = log_warnings("order", adapt_orders(raw));
        tracing::debug!(count = orders.len(), "Fetched orders");
        Ok(orders)
    }

    /// Order history of one customer, identified by phone number.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self, session))]
    pub async fn customer_orders(
        &self,
        session: &Session,
        customer_phone: &str,
        limit: u32,
    ) -> Result<Vec<Order>, ApiError> {
        let mut url = self.endpoint(&["api", "orders", customer_phone])?;
        url.query_pairs_mut()
            .append_pair("limit", &limit.to_string());

        let raw: Vec<RawOrder> = send(session.authorize(self.inner.http.get(url))).await?;
        Ok(log_warnings("order", adapt_orders(raw)))
    }

    /// Place an order.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Server` if the order is rejected (for example,
    /// insufficient stock).
    #[instrument(skip(self, session, order), fields(customer_phone = %order.customer_phone, items = order.items.len()))]
    pub async fn create_order(&self, session: &Session, order: &NewOrder) -> Result<Order, ApiError> {
        let url = self.endpoint(&["api", "orders"])?;
        let raw: RawOrder = send(session.authorize(self.inner.http.post(url).json(order)))
            .await?;
        let order = log_warnings("order", adapt_order(raw));
        tracing::info!(order_number = %order.reference(), "Order created");
        Ok(order)
    }

    // =========================================================================
    // Health
    // =========================================================================

    /// Liveness probe. Needs no session.
    ///
    /// # Errors
    ///
    /// Returns an error if the server is unreachable or unhealthy.
    #[instrument(skip(self))]
    pub async fn health(&self) -> Result<HealthReport, ApiError> {
        let url = self.endpoint(&["api", "health"])?;
        send(self.inner.http.get(url)).await
    }

    // =========================================================================
    // Plumbing
    // =========================================================================

    /// Append path segments to the base URL, percent-encoding each one.
    fn endpoint(&self, segments: &[&str]) -> Result<Url, ApiError> {
        let mut url = self.inner.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| ApiError::InvalidBaseUrl(self.inner.base_url.to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.inner.base_url.as_str())
            .field("language", &self.inner.language)
            .finish_non_exhaustive()
    }
}

/// Send a request and decode a JSON response body.
async fn send<T: DeserializeOwned>(request: RequestBuilder) -> Result<T, ApiError> {
    let response = request.send().await?;
    if !response.status().is_success() {
        return Err(error_from_response(response).await);
    }
    let body = response.bytes().await?;
    Ok(serde_json::from_slice(&body)?)
}

/// Send a request whose response body is ignored.
async fn send_empty(request: RequestBuilder) -> Result<(), ApiError> {
    let response = request.send().await?;
    if !response.status().is_success() {
        return Err(error_from_response(response).await);
    }
    Ok(())
}

/// Log adapter warnings and keep the value.
fn log_warnings<T>(resource: &'static str, adapted: Adapted<T>) -> T {
    let (value, warnings) = adapted.into_parts();
    for warning in &warnings {
        tracing::warn!(resource, %warning, "Inconsistent record from API");
    }
    value
}

/// Map a non-success response to an error.
async fn error_from_response(response: reqwest::Response) -> ApiError {
    let status = response.status();
    let path = response.url().path().to_string();
    let body = response.bytes().await.unwrap_or_default();
    let message = error_message(&body);

    tracing::debug!(%status, %path, "API request failed");

    match status {
        StatusCode::UNAUTHORIZED => ApiError::Unauthorized,
        StatusCode::NOT_FOUND => ApiError::NotFound(message.unwrap_or(path)),
        _ => ApiError::Server {
            status: status.as_u16(),
            message: message.unwrap_or_else(|| {
                status
                    .canonical_reason()
                    .unwrap_or("Unknown error")
                    .to_string()
            }),
        },
    }
}

/// Pull a human-readable message out of an error body: `detail` first, then
/// `message`, then the raw text.
fn error_message(body: &[u8]) -> Option<String> {
    if let Ok(parsed) = serde_json::from_slice::<ErrorBody>(body) {
        match parsed.detail {
            Some(Value::String(detail)) if !detail.is_empty() => return Some(detail),
            Some(Value::Null) | None => {}
            Some(other) => return Some(other.to_string()),
        }
        if let Some(message) = parsed.message.filter(|m| !m.is_empty()) {
            return Some(message);
        }
        return None;
    }

    let text = String::from_utf8_lossy(body);
    let text = text.trim();
    (!text.is_empty()).then(|| text.to_string())
}
