//! Upstream forwarding seam.
//!
//! [`Upstream`] abstracts the single backend the proxy relays to.
//! [`HttpUpstream`] is the real implementation over a shared
//! [`reqwest::Client`]; tests substitute mocks to observe or fail the
//! forward leg deterministically.

use axum::http::{HeaderValue, Method, StatusCode, header};
use bytes::Bytes;

use crate::error::ProxyError;

/// The outbound request the proxy hands to its upstream.
#[derive(Debug, Clone)]
pub struct UpstreamRequest {
    /// HTTP method, forwarded unchanged.
    pub method: Method,
    /// Path (plus query string, when present) relative to the upstream
    /// origin. Always starts with `/`.
    pub path_and_query: String,
    /// The inbound `Authorization` header, forwarded only when present and
    /// non-empty. `None` means the outbound request carries no
    /// `Authorization` header at all.
    pub authorization: Option<HeaderValue>,
    /// Raw request body. `None` for GET (and any other bodyless forward);
    /// forwarded verbatim otherwise.
    pub body: Option<Bytes>,
}

/// What came back from the upstream, kept raw.
///
/// The body is deliberately untouched bytes: re-parsing would corrupt
/// non-JSON or intentionally malformed payloads on the way through.
#[derive(Debug, Clone)]
pub struct UpstreamResponse {
    /// Upstream status code, relayed unchanged.
    pub status: StatusCode,
    /// Upstream `Content-Type`, if it sent one.
    pub content_type: Option<String>,
    /// Raw response body.
    pub body: Bytes,
}

/// The single fixed backend the proxy forwards to.
#[async_trait::async_trait]
pub trait Upstream: Send + Sync {
    /// Forwards one request and returns the raw response.
    ///
    /// # Errors
    ///
    /// Returns [`ProxyError::Upstream`] for any failure to complete the
    /// round trip. All causes (DNS, refused connection, timeout) are
    /// flattened into the one variant; the handler converts them all to the
    /// same 500 envelope.
    async fn forward(&self, request: UpstreamRequest) -> Result<UpstreamResponse, ProxyError>;

    /// The origin this upstream targets, for logging.
    fn origin(&self) -> &str;
}

/// Real upstream over HTTP.
#[derive(Debug, Clone)]
pub struct HttpUpstream {
    client: reqwest::Client,
    origin: String,
}

impl HttpUpstream {
    /// Creates an upstream targeting `origin` (scheme + host + port, no
    /// trailing slash; one is trimmed if present).
    #[must_use]
    pub fn new(origin: &str) -> Self {
        Self {
            client: reqwest::Client::new(),
            origin: origin.trim_end_matches('/').to_string(),
        }
    }
}

#[async_trait::async_trait]
impl Upstream for HttpUpstream {
    async fn forward(&self, request: UpstreamRequest) -> Result<UpstreamResponse, ProxyError> {
        let url = format!("{}{}", self.origin, request.path_and_query);

        let mut outbound = self
            .client
            .request(request.method, url)
            .header(header::CONTENT_TYPE, "application/json");

        if let Some(authorization) = request.authorization {
            outbound = outbound.header(header::AUTHORIZATION, authorization);
        }
        if let Some(body) = request.body {
            outbound = outbound.body(body);
        }

        let response = outbound
            .send()
            .await
            .map_err(|e| ProxyError::Upstream(e.to_string()))?;

        let status = response.status();
        let content_type = response
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(ToString::to_string);
        let body = response
            .bytes()
            .await
            .map_err(|e| ProxyError::Upstream(e.to_string()))?;

        Ok(UpstreamResponse {
            status,
            content_type,
            body,
        })
    }

    fn origin(&self) -> &str {
        &self.origin
    }
}
