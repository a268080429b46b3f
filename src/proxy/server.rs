//! Proxy ingress served over axum.
//!
//! One handler catches every method and path, short-circuits CORS
//! preflights, strips the ingress prefix, forwards through the configured
//! [`Upstream`], and relays the upstream response verbatim with CORS
//! headers layered on. Any forward failure becomes a 500 JSON envelope;
//! nothing propagates and nothing is retried.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::extract::{Request, State};
use axum::http::{HeaderValue, Method, StatusCode, header};
use axum::response::{IntoResponse, Response};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};
use uuid::Uuid;

use super::forwarder::{Upstream, UpstreamRequest, UpstreamResponse};
use crate::error::ProxyError;

/// CORS headers attached to every response, preflight or not. Values are
/// exact for interop with existing browser clients.
const CORS_HEADERS: [(&str, &str); 3] = [
    ("Access-Control-Allow-Origin", "*"),
    ("Access-Control-Allow-Headers", "Content-Type, Authorization"),
    ("Access-Control-Allow-Methods", "GET, POST, PUT, DELETE, OPTIONS"),
];

/// Default response content type when the upstream omits one.
const DEFAULT_CONTENT_TYPE: &str = "application/json";

// ============================================================================
// State
// ============================================================================

/// Shared state for the proxy handlers.
///
/// There is no mutable state here: every request is independent, which is
/// what makes the relay safe under arbitrary concurrent invocation.
pub struct ProxyState {
    /// The single fixed backend.
    pub upstream: Arc<dyn Upstream>,
    /// Path prefix stripped from inbound requests before forwarding.
    pub ingress_prefix: String,
}

// ============================================================================
// Router
// ============================================================================

/// Builds the proxy router. A fallback handler catches every method and
/// path, so prefix handling lives in exactly one place.
pub fn build_router(state: Arc<ProxyState>) -> Router {
    Router::new().fallback(relay).with_state(state)
}

/// The relay handler.
async fn relay(State(state): State<Arc<ProxyState>>, request: Request) -> Response {
    // Preflight short-circuit: 200, empty body, CORS only. No upstream call.
    if request.method() == Method::OPTIONS {
        return with_cors(Response::builder())
            .status(StatusCode::OK)
            .body(Body::empty())
            .unwrap_or_else(|_| StatusCode::INTERNAL_SERVER_ERROR.into_response());
    }

    let request_id = Uuid::new_v4();
    let method = request.method().clone();
    let (parts, body) = request.into_parts();

    let relative = strip_ingress_prefix(
        parts
            .uri
            .path_and_query()
            .map_or_else(|| parts.uri.path(), |pq| pq.as_str()),
        &state.ingress_prefix,
    );

    // Never forward an empty Authorization header; absence upstream must
    // mean absence inbound.
    let authorization = parts
        .headers
        .get(header::AUTHORIZATION)
        .filter(|value| !value.is_empty())
        .cloned();

    // GET forwards no body at all; everything else forwards it verbatim.
    let body = if method == Method::GET {
        None
    } else {
        match axum::body::to_bytes(body, usize::MAX).await {
            Ok(bytes) => Some(bytes),
            Err(e) => {
                warn!(%request_id, error = %e, "failed to read inbound body");
                return error_envelope(&e.to_string());
            }
        }
    };

    debug!(%request_id, %method, path = %relative, upstream = state.upstream.origin(), "forwarding");

    let forwarded = state
        .upstream
        .forward(UpstreamRequest {
            method,
            path_and_query: relative,
            authorization,
            body,
        })
        .await;

    match forwarded {
        Ok(upstream_response) => relay_response(upstream_response),
        Err(e) => {
            warn!(%request_id, error = %e, "upstream forward failed");
            error_envelope(&e.to_string())
        }
    }
}

/// Builds the success-path response: upstream status and body unchanged,
/// upstream content type (default `application/json`), CORS attached.
fn relay_response(upstream: UpstreamResponse) -> Response {
    let content_type = upstream
        .content_type
        .as_deref()
        .and_then(|v| HeaderValue::from_str(v).ok())
        .unwrap_or_else(|| HeaderValue::from_static(DEFAULT_CONTENT_TYPE));

    with_cors(Response::builder())
        .status(upstream.status)
        .header(header::CONTENT_TYPE, content_type)
        .body(Body::from(upstream.body))
        .unwrap_or_else(|_| StatusCode::INTERNAL_SERVER_ERROR.into_response())
}

/// The uniform failure envelope: 500 with a JSON body, CORS attached.
/// Every failure cause is flattened into this one shape.
fn error_envelope(message: &str) -> Response {
    let body = serde_json::json!({
        "error": "Internal server error",
        "message": message,
    });

    with_cors(Response::builder())
        .status(StatusCode::INTERNAL_SERVER_ERROR)
        .header(header::CONTENT_TYPE, DEFAULT_CONTENT_TYPE)
        .body(Body::from(body.to_string()))
        .unwrap_or_else(|_| StatusCode::INTERNAL_SERVER_ERROR.into_response())
}

fn with_cors(mut builder: axum::http::response::Builder) -> axum::http::response::Builder {
    for (name, value) in CORS_HEADERS {
        builder = builder.header(name, value);
    }
    builder
}

/// Strips the ingress prefix from an inbound path, yielding the path
/// forwarded to the upstream. The result always starts with `/`. The prefix
/// only matches on a segment boundary (`/apix` is not under `/api`); paths
/// that do not carry the prefix pass through unchanged.
#[must_use]
pub fn strip_ingress_prefix(path_and_query: &str, prefix: &str) -> String {
    match path_and_query.strip_prefix(prefix) {
        Some(rest) if rest.is_empty() || rest.starts_with('?') => format!("/{rest}"),
        Some(rest) if rest.starts_with('/') => rest.to_string(),
        _ => path_and_query.to_string(),
    }
}

// ============================================================================
// Serving
// ============================================================================

/// Binds the proxy to `bind_addr` and serves until `cancel` fires.
///
/// Returns the actual bound address (useful when binding port 0 in tests)
/// and the server task handle.
///
/// # Errors
///
/// Returns [`ProxyError::Bind`] if the TCP listener cannot bind.
pub async fn bind(
    state: Arc<ProxyState>,
    bind_addr: &str,
    cancel: CancellationToken,
) -> Result<(SocketAddr, JoinHandle<()>), ProxyError> {
    let listener = TcpListener::bind(bind_addr)
        .await
        .map_err(|e| ProxyError::Bind(format!("bind failed for {bind_addr}: {e}")))?;

    let bound_addr = listener
        .local_addr()
        .map_err(|e| ProxyError::Bind(format!("local_addr failed: {e}")))?;

    let router = build_router(state);
    let handle = tokio::spawn(async move {
        info!(%bound_addr, "proxy listening");
        axum::serve(listener, router)
            .with_graceful_shutdown(async move {
                cancel.cancelled().await;
            })
            .await
            .ok();
        debug!("proxy shut down");
    });

    Ok((bound_addr, handle))
}

/// Parses a bind address string into a full `host:port` form.
///
/// Accepts:
/// - `:8787` → `0.0.0.0:8787`
/// - `8787` → `0.0.0.0:8787`
/// - `1.2.3.4:8787` → as-is
///
/// # Errors
///
/// Returns [`ProxyError::Bind`] if the result cannot be parsed as a valid
/// socket address.
pub fn parse_bind_addr(input: &str) -> Result<String, ProxyError> {
    let addr = if input.starts_with(':') {
        format!("0.0.0.0{input}")
    } else if input.parse::<u16>().is_ok() {
        format!("0.0.0.0:{input}")
    } else {
        input.to_string()
    };
    addr.parse::<SocketAddr>()
        .map_err(|e| ProxyError::Bind(format!("invalid bind address \"{input}\": {e}")))?;
    Ok(addr)
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use axum::http::Request as HttpRequest;
    use bytes::Bytes;
    use tower::util::ServiceExt;

    /// Mock upstream recording every forward and answering from a canned
    /// response.
    struct MockUpstream {
        calls: AtomicUsize,
        last_request: Mutex<Option<UpstreamRequest>>,
        response: Result<UpstreamResponse, String>,
    }

    impl MockUpstream {
        fn replying(response: UpstreamResponse) -> Arc<Self> {
            Arc::new(Self {
                calls: AtomicUsize::new(0),
                last_request: Mutex::new(None),
                response: Ok(response),
            })
        }

        fn failing(message: &str) -> Arc<Self> {
            Arc::new(Self {
                calls: AtomicUsize::new(0),
                last_request: Mutex::new(None),
                response: Err(message.to_string()),
            })
        }

        fn ok_json(body: &str) -> Arc<Self> {
            Self::replying(UpstreamResponse {
                status: StatusCode::OK,
                content_type: Some("application/json".to_string()),
                body: Bytes::copy_from_slice(body.as_bytes()),
            })
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }

        fn last_request(&self) -> UpstreamRequest {
            self.last_request
                .lock()
                .unwrap()
                .clone()
                .expect("no forward recorded")
        }
    }

    #[async_trait::async_trait]
    impl Upstream for MockUpstream {
        async fn forward(
            &self,
            request: UpstreamRequest,
        ) -> Result<UpstreamResponse, ProxyError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            *self.last_request.lock().unwrap() = Some(request);
            match &self.response {
                Ok(response) => Ok(response.clone()),
                Err(message) => Err(ProxyError::Upstream(message.clone())),
            }
        }

        fn origin(&self) -> &str {
            "mock://upstream"
        }
    }

    fn router_with(upstream: Arc<MockUpstream>, prefix: &str) -> Router {
        build_router(Arc::new(ProxyState {
            upstream,
            ingress_prefix: prefix.to_string(),
        }))
    }

    fn assert_cors(response: &Response) {
        let headers = response.headers();
        assert_eq!(headers["Access-Control-Allow-Origin"], "*");
        assert_eq!(
            headers["Access-Control-Allow-Headers"],
            "Content-Type, Authorization"
        );
        assert_eq!(
            headers["Access-Control-Allow-Methods"],
            "GET, POST, PUT, DELETE, OPTIONS"
        );
    }

    async fn body_string(response: Response) -> String {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    // ------------------------------------------------------------------
    // Preflight
    // ------------------------------------------------------------------

    #[tokio::test]
    async fn options_returns_200_empty_with_cors_and_no_upstream_call() {
        let upstream = MockUpstream::ok_json("{}");
        let app = router_with(Arc::clone(&upstream), "/api");

        let request = HttpRequest::builder()
            .method("OPTIONS")
            .uri("/api/users/42")
            .body(Body::empty())
            .unwrap();

        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_cors(&response);
        assert_eq!(body_string(response).await, "");
        assert_eq!(upstream.calls(), 0);
    }

    #[tokio::test]
    async fn options_on_any_path_short_circuits() {
        let upstream = MockUpstream::ok_json("{}");
        let app = router_with(Arc::clone(&upstream), "/api");

        let request = HttpRequest::builder()
            .method("OPTIONS")
            .uri("/completely/unrelated")
            .body(Body::empty())
            .unwrap();

        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(upstream.calls(), 0);
    }

    // ------------------------------------------------------------------
    // Forwarding
    // ------------------------------------------------------------------

    #[tokio::test]
    async fn get_is_forwarded_with_prefix_stripped_and_no_body() {
        let upstream = MockUpstream::ok_json(r#"{"id":42}"#);
        let app = router_with(Arc::clone(&upstream), "/api");

        let request = HttpRequest::builder()
            .method("GET")
            .uri("/api/users/42")
            .body(Body::empty())
            .unwrap();

        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_cors(&response);
        assert_eq!(
            response.headers()[header::CONTENT_TYPE],
            "application/json"
        );
        assert_eq!(body_string(response).await, r#"{"id":42}"#);

        let forwarded = upstream.last_request();
        assert_eq!(forwarded.method, Method::GET);
        assert_eq!(forwarded.path_and_query, "/users/42");
        assert!(forwarded.body.is_none());
        assert!(forwarded.authorization.is_none());
    }

    #[tokio::test]
    async fn netlify_shaped_prefix_is_stripped() {
        let upstream = MockUpstream::ok_json("{}");
        let app = router_with(Arc::clone(&upstream), "/.netlify/functions/proxy");

        let request = HttpRequest::builder()
            .method("GET")
            .uri("/.netlify/functions/proxy/users/42")
            .body(Body::empty())
            .unwrap();

        app.oneshot(request).await.unwrap();
        assert_eq!(upstream.last_request().path_and_query, "/users/42");
    }

    #[tokio::test]
    async fn query_string_is_preserved() {
        let upstream = MockUpstream::ok_json("{}");
        let app = router_with(Arc::clone(&upstream), "/api");

        let request = HttpRequest::builder()
            .method("GET")
            .uri("/api/search?q=cholera&limit=5")
            .body(Body::empty())
            .unwrap();

        app.oneshot(request).await.unwrap();
        assert_eq!(
            upstream.last_request().path_and_query,
            "/search?q=cholera&limit=5"
        );
    }

    #[tokio::test]
    async fn post_body_is_forwarded_verbatim() {
        let upstream = MockUpstream::ok_json("{}");
        let app = router_with(Arc::clone(&upstream), "/api");

        let payload = r#"{"name": "test", "not json at all: }"#;
        let request = HttpRequest::builder()
            .method("POST")
            .uri("/api/items")
            .body(Body::from(payload))
            .unwrap();

        app.oneshot(request).await.unwrap();
        let forwarded = upstream.last_request();
        assert_eq!(forwarded.method, Method::POST);
        assert_eq!(forwarded.body.unwrap(), Bytes::from(payload));
    }

    #[tokio::test]
    async fn authorization_header_is_copied_when_present() {
        let upstream = MockUpstream::ok_json("{}");
        let app = router_with(Arc::clone(&upstream), "/api");

        let request = HttpRequest::builder()
            .method("POST")
            .uri("/api/items")
            .header(header::AUTHORIZATION, "Bearer xyz")
            .body(Body::from("{}"))
            .unwrap();

        app.oneshot(request).await.unwrap();
        assert_eq!(
            upstream.last_request().authorization.unwrap(),
            HeaderValue::from_static("Bearer xyz")
        );
    }

    #[tokio::test]
    async fn absent_authorization_stays_absent() {
        let upstream = MockUpstream::ok_json("{}");
        let app = router_with(Arc::clone(&upstream), "/api");

        let request = HttpRequest::builder()
            .method("POST")
            .uri("/api/items")
            .body(Body::from("{}"))
            .unwrap();

        app.oneshot(request).await.unwrap();
        assert!(upstream.last_request().authorization.is_none());
    }

    #[tokio::test]
    async fn empty_authorization_is_not_forwarded() {
        let upstream = MockUpstream::ok_json("{}");
        let app = router_with(Arc::clone(&upstream), "/api");

        let request = HttpRequest::builder()
            .method("POST")
            .uri("/api/items")
            .header(header::AUTHORIZATION, "")
            .body(Body::from("{}"))
            .unwrap();

        app.oneshot(request).await.unwrap();
        assert!(upstream.last_request().authorization.is_none());
    }

    // ------------------------------------------------------------------
    // Response relay
    // ------------------------------------------------------------------

    #[tokio::test]
    async fn upstream_status_and_body_pass_through_unchanged() {
        let upstream = MockUpstream::replying(UpstreamResponse {
            status: StatusCode::NOT_FOUND,
            content_type: Some("text/plain".to_string()),
            body: Bytes::from_static(b"no such user"),
        });
        let app = router_with(Arc::clone(&upstream), "/api");

        let request = HttpRequest::builder()
            .method("GET")
            .uri("/api/users/999")
            .body(Body::empty())
            .unwrap();

        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_cors(&response);
        assert_eq!(response.headers()[header::CONTENT_TYPE], "text/plain");
        assert_eq!(body_string(response).await, "no such user");
    }

    #[tokio::test]
    async fn missing_upstream_content_type_defaults_to_json() {
        let upstream = MockUpstream::replying(UpstreamResponse {
            status: StatusCode::OK,
            content_type: None,
            body: Bytes::from_static(b"{}"),
        });
        let app = router_with(upstream, "/api");

        let request = HttpRequest::builder()
            .method("GET")
            .uri("/api/ping")
            .body(Body::empty())
            .unwrap();

        let response = app.oneshot(request).await.unwrap();
        assert_eq!(
            response.headers()[header::CONTENT_TYPE],
            "application/json"
        );
    }

    // ------------------------------------------------------------------
    // Failure envelope
    // ------------------------------------------------------------------

    #[tokio::test]
    async fn upstream_failure_becomes_500_envelope_with_cors() {
        let upstream = MockUpstream::failing("connection refused");
        let app = router_with(Arc::clone(&upstream), "/api");

        let request = HttpRequest::builder()
            .method("GET")
            .uri("/api/users/42")
            .body(Body::empty())
            .unwrap();

        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_cors(&response);

        let body: serde_json::Value =
            serde_json::from_str(&body_string(response).await).unwrap();
        assert_eq!(body["error"], "Internal server error");
        assert_eq!(body["message"], "connection refused");
    }

    // ------------------------------------------------------------------
    // Prefix stripping
    // ------------------------------------------------------------------

    #[test]
    fn strip_removes_prefix() {
        assert_eq!(strip_ingress_prefix("/api/users/42", "/api"), "/users/42");
    }

    #[test]
    fn strip_of_bare_prefix_yields_root() {
        assert_eq!(strip_ingress_prefix("/api", "/api"), "/");
    }

    #[test]
    fn strip_keeps_query_on_bare_prefix() {
        assert_eq!(strip_ingress_prefix("/api?x=1", "/api"), "/?x=1");
    }

    #[test]
    fn strip_passes_through_unprefixed_paths() {
        assert_eq!(strip_ingress_prefix("/other/path", "/api"), "/other/path");
    }

    #[test]
    fn strip_respects_segment_boundaries() {
        assert_eq!(strip_ingress_prefix("/apix/users", "/api"), "/apix/users");
    }

    // ------------------------------------------------------------------
    // parse_bind_addr
    // ------------------------------------------------------------------

    #[test]
    fn parse_bind_addr_colon_port() {
        assert_eq!(parse_bind_addr(":8787").unwrap(), "0.0.0.0:8787");
    }

    #[test]
    fn parse_bind_addr_port_only() {
        assert_eq!(parse_bind_addr("8787").unwrap(), "0.0.0.0:8787");
    }

    #[test]
    fn parse_bind_addr_full() {
        assert_eq!(parse_bind_addr("127.0.0.1:3000").unwrap(), "127.0.0.1:3000");
    }

    #[test]
    fn parse_bind_addr_invalid() {
        assert!(parse_bind_addr("not-an-address").is_err());
    }

    // ------------------------------------------------------------------
    // Serving
    // ------------------------------------------------------------------

    #[tokio::test]
    async fn bind_port_zero_and_shutdown() {
        let cancel = CancellationToken::new();
        let state = Arc::new(ProxyState {
            upstream: MockUpstream::ok_json("{}"),
            ingress_prefix: "/api".to_string(),
        });

        let (addr, handle) = bind(state, "127.0.0.1:0", cancel.clone()).await.unwrap();
        assert_ne!(addr.port(), 0);

        cancel.cancel();
        handle.await.unwrap();
    }
}
