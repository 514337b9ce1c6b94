//! Backend transport for the salary API.
//!
//! Components talk to the backend through the [`Backend`] trait so that the
//! form, reference and chart flows can be exercised against a stub. The
//! production implementation, [`HttpBackend`], is a synchronous `ureq`
//! client:
//!
//! - `GET` and JSON `POST` against `api.base_url`
//! - non-2xx responses are returned, not raised, so callers can read `error`
//! - `Set-Cookie` values are surfaced for the [`cookies::CookieJar`]

pub mod cookies;
pub mod endpoints;

use std::time::Duration;

use serde::de::DeserializeOwned;

use crate::config::schema::ApiConfig;
use crate::models::ErrorBody;

pub use endpoints::Endpoints;

// ---------------------------------------------------------------------------
// Transport types
// ---------------------------------------------------------------------------

/// A completed HTTP exchange, whatever its status.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiResponse {
    pub status: u16,
    pub body: String,
    /// Raw `Set-Cookie` header values.
    pub set_cookies: Vec<String>,
}

impl ApiResponse {
    /// Build a response with no cookies (handy for stubs).
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
            set_cookies: Vec::new(),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Decode the body as JSON.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T, serde_json::Error> {
        serde_json::from_str(&self.body)
    }

    /// The `error` field of a JSON error body, if there is one.
    pub fn error_message(&self) -> Option<String> {
        self.json::<ErrorBody>()
            .ok()
            .and_then(|b| b.error)
            .filter(|msg| !msg.trim().is_empty())
    }
}

/// The request never produced a response.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TransportError {
    #[error("request to {url} failed: {reason}")]
    Request { url: String, reason: String },
    #[error("failed to read response body: {0}")]
    Body(String),
}

/// Failure of a `GET` that expects a typed JSON body.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error(transparent)]
    Transport(#[from] TransportError),
    #[error("HTTP {status}: {message}")]
    Status { status: u16, message: String },
    #[error("invalid JSON response: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Minimal request surface the client components need.
pub trait Backend {
    /// `GET path` (path may carry a query string).
    fn get(&self, path: &str) -> Result<ApiResponse, TransportError>;

    /// `POST path` with a JSON body and `Content-Type: application/json`.
    fn post_json(&self, path: &str, body: &serde_json::Value)
    -> Result<ApiResponse, TransportError>;
}

/// `GET` a path and decode a 2xx JSON body.
pub fn fetch_json<T: DeserializeOwned>(
    backend: &dyn Backend,
    path: &str,
) -> Result<T, FetchError> {
    let resp = backend.get(path)?;
    if !resp.is_success() {
        let message = resp
            .error_message()
            .unwrap_or_else(|| "request failed".to_string());
        return Err(FetchError::Status {
            status: resp.status,
            message,
        });
    }
    Ok(resp.json()?)
}

// ---------------------------------------------------------------------------
// HTTP implementation
// ---------------------------------------------------------------------------

/// Synchronous HTTP backend.
///
/// Created from an [`ApiConfig`] once per CLI invocation. Sends the stored
/// session cookies, if any, with every request.
#[derive(Debug)]
pub struct HttpBackend {
    base_url: String,
    agent: ureq::Agent,
    cookie_header: Option<String>,
}

impl HttpBackend {
    /// Build a backend from the resolved config.
    pub fn from_config(config: &ApiConfig) -> Self {
        let agent = ureq::AgentBuilder::new()
            .timeout(Duration::from_millis(config.timeout_ms))
            .build();
        Self {
            // "localhost" may resolve to ::1 first while the dev server binds IPv4 only.
            base_url: config
                .base_url
                .trim_end_matches('/')
                .replace("://localhost", "://127.0.0.1"),
            agent,
            cookie_header: None,
        }
    }

    /// Attach a `Cookie` header to every request. Empty headers are ignored.
    pub fn with_cookies(mut self, header: impl Into<String>) -> Self {
        let header = header.into();
        self.cookie_header = (!header.is_empty()).then_some(header);
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Absolute URL of a backend path.
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn request(&self, method: &str, url: &str) -> ureq::Request {
        let req = self.agent.request(method, url);
        match &self.cookie_header {
            Some(cookies) => req.set("Cookie", cookies),
            None => req,
        }
    }

    fn finish(
        &self,
        url: &str,
        result: Result<ureq::Response, ureq::Error>,
    ) -> Result<ApiResponse, TransportError> {
        let resp = match result {
            Ok(resp) => resp,
            // Non-2xx still carries a body the caller wants to read.
            Err(ureq::Error::Status(_, resp)) => resp,
            Err(ureq::Error::Transport(t)) => {
                return Err(TransportError::Request {
                    url: url.to_string(),
                    reason: t.to_string(),
                });
            }
        };

        let status = resp.status();
        let set_cookies = resp
            .all("Set-Cookie")
            .into_iter()
            .map(str::to_string)
            .collect();
        let body = resp
            .into_string()
            .map_err(|e| TransportError::Body(e.to_string()))?;

        Ok(ApiResponse {
            status,
            body,
            set_cookies,
        })
    }
}

impl Backend for HttpBackend {
    fn get(&self, path: &str) -> Result<ApiResponse, TransportError> {
        let url = self.url(path);
        let result = self.request("GET", &url).call();
        self.finish(&url, result)
    }

    fn post_json(
        &self,
        path: &str,
        body: &serde_json::Value,
    ) -> Result<ApiResponse, TransportError> {
        let url = self.url(path);
        let result = self
            .request("POST", &url)
            .set("Content-Type", "application/json")
            .send_string(&body.to_string());
        self.finish(&url, result)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
