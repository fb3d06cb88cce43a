//! Sessioned request client for the forum REST API.
//!
//! Every backend call goes through [`SessionedClient::send`]: it attaches the
//! stored bearer token, decodes whatever comes back into a
//! [`ResponseEnvelope`], and on a 401 drops the token and hands the user to
//! the injected [`Navigator`] before reporting the failure.

use std::sync::Arc;
use std::time::Duration;

use reqwest::{header, Client, Response, StatusCode};
use serde_json::Value;
use tracing::{debug, warn};

use crate::auth::SessionStore;
use crate::config::{Config, DEFAULT_LOGIN_PATH};

use super::decode::DecodedBody;
use super::envelope::{Method, RequestEnvelope, ResponseEnvelope};
use super::navigator::{Navigator, NoopNavigator};
use super::ApiError;

/// Clone is cheap - reqwest::Client, the store and the navigator are all
/// shared, so clones see the same credential.
#[derive(Clone)]
pub struct SessionedClient {
    client: Client,
    base_url: String,
    login_path: String,
    store: Arc<dyn SessionStore>,
    navigator: Arc<dyn Navigator>,
}

impl SessionedClient {
    /// Create a client with no request timeout beyond the transport default.
    pub fn new(base_url: impl Into<String>, store: Arc<dyn SessionStore>) -> Result<Self, ApiError> {
        Self::with_timeout(base_url, store, None)
    }

    pub fn with_timeout(
        base_url: impl Into<String>,
        store: Arc<dyn SessionStore>,
        timeout: Option<Duration>,
    ) -> Result<Self, ApiError> {
        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build()?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            login_path: DEFAULT_LOGIN_PATH.to_string(),
            store,
            navigator: Arc::new(NoopNavigator),
        })
    }

    pub fn from_config(config: &Config, store: Arc<dyn SessionStore>) -> Result<Self, ApiError> {
        let timeout = config.request_timeout_secs.map(Duration::from_secs);
        Ok(Self::with_timeout(config.api_base_url.clone(), store, timeout)?
            .with_login_path(config.login_path.clone()))
    }

    pub fn with_navigator(mut self, navigator: Arc<dyn Navigator>) -> Self {
        self.navigator = navigator;
        self
    }

    pub fn with_login_path(mut self, login_path: impl Into<String>) -> Self {
        self.login_path = login_path.into();
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn login_path(&self) -> &str {
        &self.login_path
    }

    // ===== Credential =====

    /// Overwrite any stored credential. Tokens that can't be sent as a
    /// header value are refused.
    pub fn store_credential(&self, token: &str) -> Result<(), ApiError> {
        if bearer_value(token).is_none() {
            return Err(ApiError::CredentialStore(
                "token is not a valid header value".to_string(),
            ));
        }
        self.store
            .store(token)
            .map_err(|e| ApiError::CredentialStore(format!("{:#}", e)))
    }

    /// Remove the stored credential. Never fails: store errors are logged,
    /// and clearing an empty store is a no-op.
    pub fn clear_credential(&self) {
        if let Err(e) = self.store.clear() {
            warn!(error = %format!("{:#}", e), "Failed to clear stored credential");
        }
    }

    /// Whether a credential is stored right now. Says nothing about whether
    /// the backend would still accept it.
    pub fn has_credential(&self) -> bool {
        self.credential().is_some()
    }

    /// The stored credential, if any. Unreadable stores count as empty.
    pub fn credential(&self) -> Option<String> {
        match self.store.load() {
            Ok(token) => token.filter(|t| !t.is_empty()),
            Err(e) => {
                warn!(error = %format!("{:#}", e), "Failed to read stored credential");
                None
            }
        }
    }

    /// A stored token that can't be sent is dropped, and the request goes
    /// out unauthenticated.
    fn auth_headers(&self) -> header::HeaderMap {
        let mut headers = header::HeaderMap::new();
        headers.insert(
            header::ACCEPT,
            header::HeaderValue::from_static("application/json"),
        );
        if let Some(token) = self.credential() {
            match bearer_value(&token) {
                Some(value) => {
                    headers.insert(header::AUTHORIZATION, value);
                }
                None => {
                    warn!("Stored token is not a valid header value, clearing session");
                    self.clear_credential();
                }
            }
        }
        headers
    }

    fn resolve_url(&self, endpoint: &str) -> Result<String, ApiError> {
        let endpoint = endpoint.trim();
        if endpoint.is_empty() {
            return Err(ApiError::InvalidEndpoint(endpoint.to_string()));
        }
        if endpoint.starts_with("http://") || endpoint.starts_with("https://") {
            return Ok(endpoint.to_string());
        }
        if endpoint.starts_with('/') {
            Ok(format!("{}{}", self.base_url, endpoint))
        } else {
            Ok(format!("{}/{}", self.base_url, endpoint))
        }
    }

    // ===== Calls =====

    /// `call(endpoint, method, body)`: one round trip, no retry.
    pub async fn call(
        &self,
        endpoint: &str,
        method: Method,
        body: Option<Value>,
    ) -> Result<ResponseEnvelope, ApiError> {
        self.send(RequestEnvelope::new(endpoint, method).with_body(body))
            .await
    }

    pub async fn get(&self, endpoint: &str) -> Result<ResponseEnvelope, ApiError> {
        self.call(endpoint, Method::Get, None).await
    }

    pub async fn send(&self, request: RequestEnvelope) -> Result<ResponseEnvelope, ApiError> {
        let url = self.resolve_url(&request.endpoint)?;

        let mut builder = self
            .client
            .request(request.method.into(), &url)
            .headers(self.auth_headers());
        if !request.query.is_empty() {
            builder = builder.query(&request.query);
        }
        if let Some(ref body) = request.body {
            // sets Content-Type: application/json
            builder = builder.json(body);
        }

        debug!(method = %request.method, url = %url, "Sending request");
        let response = builder.send().await.map_err(|e| {
            warn!(method = %request.method, url = %url, error = %e, "Request failed");
            ApiError::Transport(e)
        })?;

        let status = response.status();
        let decoded = Self::decode_response(response).await;

        // The session is dropped even when the 401 body can't be read.
        if status == StatusCode::UNAUTHORIZED {
            warn!(url = %url, "Credential rejected, clearing session");
            self.clear_credential();
            self.navigator.redirect_to_login(&self.login_path);
            let envelope = decoded.unwrap_or_else(|e| {
                debug!(error = %e, "Failed to read 401 body");
                ResponseEnvelope::default()
            });
            return Err(ApiError::from_status(status, &envelope));
        }
        let envelope = decoded?;

        if !status.is_success() {
            debug!(status = status.as_u16(), url = %url, "Request returned error status");
            return Err(ApiError::from_status(status, &envelope));
        }

        if !envelope.is_success() {
            debug!(status = status.as_u16(), url = %url, "Envelope reported failure");
            return Err(ApiError::Application {
                status: Some(status.as_u16()),
                message: envelope.message_or_fallback(),
            });
        }

        Ok(envelope)
    }

    async fn decode_response(response: Response) -> Result<ResponseEnvelope, ApiError> {
        let content_type = response
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let body = response.text().await?;
        debug!(body = %ApiError::truncate_body(&body), "Response body received");
        Ok(DecodedBody::decode(content_type.as_deref(), &body).into_envelope())
    }
}

fn bearer_value(token: &str) -> Option<header::HeaderValue> {
    let mut value = header::HeaderValue::from_str(&format!("Bearer {}", token)).ok()?;
    value.set_sensitive(true);
    Some(value)
}
