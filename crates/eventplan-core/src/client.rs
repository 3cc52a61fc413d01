//! HTTP client for the event planner backend
//!
//! Every call goes through [`ApiClient::request`], which resolves the URL
//! against the configured base, attaches the stored bearer token, enforces
//! the request timeout, and turns the response into either a parsed body or
//! a single [`ApiError`].

use reqwest::header::{HeaderMap, HeaderName, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Duration;

use crate::config::ClientConfig;
use crate::error::{ApiError, AppError, Result};
use crate::storage::SessionStore;

pub use reqwest::Method;

/// Options for a single request
#[derive(Debug, Clone)]
pub struct RequestOptions {
    pub method: Method,
    /// JSON body; a JSON string is sent verbatim
    pub body: Option<Value>,
    /// Extra headers, applied over the defaults
    pub headers: Vec<(String, String)>,
}

impl Default for RequestOptions {
    fn default() -> Self {
        Self {
            method: Method::GET,
            body: None,
            headers: Vec::new(),
        }
    }
}

impl RequestOptions {
    pub fn get() -> Self {
        Self::default()
    }

    pub fn post(body: Value) -> Self {
        Self {
            method: Method::POST,
            body: Some(body),
            headers: Vec::new(),
        }
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }
}

/// Backend API client
///
/// Cheap to clone; clones share the connection pool and session store.
#[derive(Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    timeout_ms: u64,
    store: Arc<dyn SessionStore>,
}

impl ApiClient {
    pub fn new(config: &ClientConfig, store: Arc<dyn SessionStore>) -> Result<Self> {
        config.validate()?;

        let http = reqwest::Client::builder()
            .build()
            .map_err(|e| AppError::ConfigError(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            http,
            base_url: config.base_url.clone(),
            timeout_ms: config.timeout_ms,
            store,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn timeout_ms(&self) -> u64 {
        self.timeout_ms
    }

    /// Session store used for outgoing auth headers
    pub fn store(&self) -> &Arc<dyn SessionStore> {
        &self.store
    }

    /// Perform a request and return the parsed response body.
    ///
    /// A request still running after `timeout_ms` is dropped and reported as
    /// [`ApiError::Timeout`]. Nothing is retried.
    pub async fn request(
        &self,
        path: &str,
        options: RequestOptions,
    ) -> std::result::Result<Value, ApiError> {
        let url = build_url(&self.base_url, path);
        let method = options.method.clone();
        tracing::debug!("{} {}", method, url);

        match tokio::time::timeout(
            Duration::from_millis(self.timeout_ms),
            self.send(&url, options),
        )
        .await
        {
            Ok(result) => {
                if let Err(e) = &result {
                    tracing::debug!("{} {} failed: {}", method, url, e);
                }
                result
            }
            Err(_) => {
                tracing::warn!("{} {} timed out after {} ms", method, url, self.timeout_ms);
                Err(ApiError::Timeout {
                    timeout_ms: self.timeout_ms,
                })
            }
        }
    }

    async fn send(
        &self,
        url: &str,
        options: RequestOptions,
    ) -> std::result::Result<Value, ApiError> {
        let headers = self.build_headers(&options.headers)?;

        let mut request = self.http.request(options.method, url).headers(headers);
        match options.body {
            None => {}
            Some(Value::String(raw)) => request = request.body(raw),
            Some(body) => request = request.body(body.to_string()),
        }

        let response = request
            .send()
            .await
            .map_err(|e| ApiError::Transport(format!("Request to {url} failed: {e}")))?;

        let status = response.status();
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_string();

        let bytes = response
            .bytes()
            .await
            .map_err(|e| ApiError::Transport(format!("Failed to read response body: {e}")))?;

        if !status.is_success() {
            // An error page mislabelled as JSON still has to report its status.
            let body = parse_body(&content_type, &bytes).unwrap_or_else(|_| text_body(&bytes));
            return Err(ApiError::from_status(status.as_u16(), body));
        }

        parse_body(&content_type, &bytes)
    }

    fn build_headers(
        &self,
        extra: &[(String, String)],
    ) -> std::result::Result<HeaderMap, ApiError> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        for (name, value) in extra {
            let name = HeaderName::from_bytes(name.as_bytes()).map_err(|e| {
                ApiError::InvalidRequest(format!("Invalid header name {name:?}: {e}"))
            })?;
            let value = HeaderValue::from_str(value).map_err(|e| {
                ApiError::InvalidRequest(format!("Invalid value for header {name}: {e}"))
            })?;
            headers.insert(name, value);
        }

        // The stored token always wins over a caller-supplied Authorization.
        if let Some(token) = self.store.token() {
            let value = HeaderValue::from_str(&format!("Bearer {token}"))
                .map_err(|e| {
                    ApiError::InvalidRequest(format!("Stored token is not a valid header: {e}"))
                })?;
            headers.insert(AUTHORIZATION, value);
        }

        Ok(headers)
    }
}

/// Join `path` onto `base_url`.
///
/// Absolute `http(s)://` paths pass through unchanged and an empty path
/// yields the base itself.
pub fn build_url(base_url: &str, path: &str) -> String {
    if path.is_empty() {
        return base_url.to_string();
    }
    if path.starts_with("http://") || path.starts_with("https://") {
        return path.to_string();
    }

    let base = base_url.trim_end_matches('/');
    if path.starts_with('/') {
        format!("{base}{path}")
    } else {
        format!("{base}/{path}")
    }
}

/// Parse a response body according to its declared content type.
///
/// JSON is decoded when declared; anything else is wrapped as
/// `{"message": text}`. Empty bodies are `null`.
pub fn parse_body(content_type: &str, bytes: &[u8]) -> std::result::Result<Value, ApiError> {
    if content_type.contains("application/json") {
        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(Value::Null);
        }
        return serde_json::from_slice(bytes).map_err(|e| ApiError::Decode(e.to_string()));
    }

    Ok(text_body(bytes))
}

fn text_body(bytes: &[u8]) -> Value {
    let text = String::from_utf8_lossy(bytes);
    if text.is_empty() {
        Value::Null
    } else {
        json!({ "message": text })
    }
}
