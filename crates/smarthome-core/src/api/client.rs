//! Authenticated request gateway for the smart-home backend.
//!
//! Every call goes through [`ApiClient::send`], which attaches the stored
//! access token and, on a 401, makes one refresh-and-resend attempt before
//! handing the failure back to the caller.

use std::sync::Arc;
use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use reqwest::header::{self, HeaderMap, HeaderName, HeaderValue};
use reqwest::{Client, Method, Response, StatusCode, Url};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, warn};

use crate::auth::TokenStore;
use crate::config::Config;

use super::ApiError;

// ============================================================================
// Constants
// ============================================================================

/// HTTP request timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Path of the token refresh endpoint
const REFRESH_PATH: &str = "refresh";

#[derive(Deserialize)]
struct RefreshResponse {
    #[serde(rename = "accessToken", alias = "access_token")]
    access_token: String,
}

/// An outbound call, kept in replayable form.
///
/// The `retried` marker guarantees a request is resent at most once. Public
/// calls such as login start out marked, so a 401 there never triggers a
/// refresh.
#[derive(Debug, Clone)]
pub struct PendingRequest {
    method: Method,
    segments: Vec<String>,
    body: Option<Value>,
    headers: HeaderMap,
    access_token: Option<String>,
    retried: bool,
}

impl PendingRequest {
    /// `path` is split on `/`; use [`segment`](Self::segment) for values
    /// that need escaping.
    pub fn new(method: Method, path: &str) -> Self {
        Self {
            method,
            segments: path
                .split('/')
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .collect(),
            body: None,
            headers: HeaderMap::new(),
            access_token: None,
            retried: false,
        }
    }

    pub fn get(path: &str) -> Self {
        Self::new(Method::GET, path)
    }

    pub fn post(path: &str) -> Self {
        Self::new(Method::POST, path)
    }

    pub fn put(path: &str) -> Self {
        Self::new(Method::PUT, path)
    }

    pub fn delete(path: &str) -> Self {
        Self::new(Method::DELETE, path)
    }

    /// Append one path segment verbatim; it is percent-encoded on send.
    pub fn segment(mut self, segment: impl ToString) -> Self {
        self.segments.push(segment.to_string());
        self
    }

    pub fn json<B: Serialize + ?Sized>(mut self, body: &B) -> Result<Self, ApiError> {
        self.body = Some(serde_json::to_value(body)?);
        Ok(self)
    }

    /// Add a header. `Authorization` is owned by the gateway and ignored here.
    pub fn header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        if name != header::AUTHORIZATION {
            self.headers.insert(name, value);
        }
        self
    }

    /// Never refresh on 401 for this request.
    pub fn without_refresh(mut self) -> Self {
        self.retried = true;
        self
    }

    pub fn method(&self) -> &Method {
        &self.method
    }

    pub fn path(&self) -> String {
        format!("/{}", self.segments.join("/"))
    }

    pub fn is_retried(&self) -> bool {
        self.retried
    }
}

/// API client for the smart-home backend.
/// Clone is cheap - the connection pool and token store are shared.
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base_url: Url,
    tokens: Arc<TokenStore>,
}

impl ApiClient {
    /// Create a client against `base_url` with the default timeout.
    pub fn new(base_url: &str, tokens: Arc<TokenStore>) -> Result<Self> {
        Self::with_timeout(base_url, tokens, Duration::from_secs(DEFAULT_TIMEOUT_SECS))
    }

    pub fn with_timeout(base_url: &str, tokens: Arc<TokenStore>, timeout: Duration) -> Result<Self> {
        let base_url = Url::parse(base_url)
            .with_context(|| format!("Invalid backend URL: {}", base_url))?;
        if base_url.cannot_be_a_base() {
            return Err(anyhow!("Backend URL cannot be used as a base: {}", base_url));
        }

        let client = Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            client,
            base_url,
            tokens,
        })
    }

    pub fn from_config(config: &Config, tokens: Arc<TokenStore>) -> Result<Self> {
        Self::with_timeout(&config.base_url, tokens, config.request_timeout())
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// The session shared by every clone of this client.
    pub fn tokens(&self) -> &Arc<TokenStore> {
        &self.tokens
    }

    pub fn is_authenticated(&self) -> bool {
        self.tokens.is_authenticated()
    }

    /// Send a request, recovering once from an expired access token.
    ///
    /// Returns the response on 2xx. Other statuses come back as
    /// [`ApiError::from_status`]; when recovery fails it is the original
    /// 401 that is returned.
    pub async fn send(&self, mut pending: PendingRequest) -> Result<Response, ApiError> {
        let response = self.dispatch(&pending).await?;

        if response.status() != StatusCode::UNAUTHORIZED || pending.retried {
            return Self::check_response(response).await;
        }

        pending.retried = true;
        let original = Self::response_error(response).await;

        let Some(refresh_token) = self.tokens.refresh_token() else {
            debug!(path = %pending.path(), "401 with no refresh token stored");
            return Err(original);
        };

        match self.refresh_access_token(&refresh_token).await {
            Ok(access_token) => {
                debug!(path = %pending.path(), "Access token refreshed, resending request");
                self.tokens.set_tokens(&access_token, &refresh_token);
                pending.access_token = Some(access_token);
                let response = self.dispatch(&pending).await?;
                Self::check_response(response).await
            }
            Err(e) => {
                warn!(error = %e, "Token refresh failed, clearing session");
                self.tokens.clear_tokens();
                Err(original)
            }
        }
    }

    /// Send and decode a JSON response body.
    pub async fn send_json<T: DeserializeOwned>(&self, pending: PendingRequest) -> Result<T, ApiError> {
        let path = pending.path();
        let response = self.send(pending).await?;
        Self::parse_json(response, &path).await
    }

    /// Send and discard the response body.
    pub async fn send_empty(&self, pending: PendingRequest) -> Result<(), ApiError> {
        self.send(pending).await?;
        Ok(())
    }

    /// Exchange the refresh token for a new access token.
    ///
    /// The exchange is authorized with the refresh token itself and is never
    /// retried.
    async fn refresh_access_token(&self, refresh_token: &str) -> Result<String, ApiError> {
        let url = self.url_for(&[REFRESH_PATH.to_string()])?;
        debug!("Requesting new access token");

        let response = self
            .client
            .post(url)
            .bearer_auth(refresh_token)
            .json(&serde_json::json!({}))
            .send()
            .await?;

        let response = Self::check_response(response).await?;
        let refreshed: RefreshResponse = Self::parse_json(response, REFRESH_PATH).await?;

        if refreshed.access_token.is_empty() {
            return Err(ApiError::InvalidResponse(
                "Refresh endpoint returned an empty access token".to_string(),
            ));
        }
        Ok(refreshed.access_token)
    }

    async fn dispatch(&self, pending: &PendingRequest) -> Result<Response, ApiError> {
        let url = self.url_for(&pending.segments)?;
        let token = pending
            .access_token
            .clone()
            .or_else(|| self.tokens.access_token());

        debug!(
            method = %pending.method,
            path = %pending.path(),
            authenticated = token.is_some(),
            retry = pending.retried,
            "Sending request"
        );

        let mut request = self
            .client
            .request(pending.method.clone(), url)
            .headers(pending.headers.clone());
        if let Some(token) = token {
            request = request.bearer_auth(token);
        }
        if let Some(ref body) = pending.body {
            request = request.json(body);
        }

        Ok(request.send().await?)
    }

    fn url_for(&self, segments: &[String]) -> Result<Url, ApiError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| ApiError::InvalidResponse(format!("Unusable base URL: {}", self.base_url)))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// Check if response is successful, returning an error with body if not.
    async fn check_response(response: Response) -> Result<Response, ApiError> {
        if response.status().is_success() {
            Ok(response)
        } else {
            Err(Self::response_error(response).await)
        }
    }

    async fn response_error(response: Response) -> ApiError {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        debug!(status = %status, "Request failed");
        ApiError::from_status(status, &body)
    }

    async fn parse_json<T: DeserializeOwned>(response: Response, path: &str) -> Result<T, ApiError> {
        let text = response.text().await?;
        serde_json::from_str(&text).map_err(|e| {
            ApiError::InvalidResponse(format!(
                "Failed to parse response from /{}: {}",
                path.trim_start_matches('/'),
                e
            ))
        })
    }
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.base_url.as_str())
            .field("tokens", &self.tokens)
            .finish()
    }
}
