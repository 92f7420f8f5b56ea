//! Request-level layers: client identity, the global rate limiter, panic
//! recovery and security headers.

use std::any::Any;
use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use axum::extract::{ConnectInfo, FromRequestParts, Request, State};
use axum::http::header::{self, HeaderName, HeaderValue};
use axum::http::request::Parts;
use axum::http::{Extensions, HeaderMap};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use tower_http::set_header::SetResponseHeaderLayer;

use crate::error::RelayError;
use crate::metrics::{REPORTS_TOTAL, record_rejected};
use crate::rate_limit::RateDecision;
use crate::state::AppState;

pub const UNKNOWN_CLIENT: &str = "unknown";

/// Peer IP of the connection, or `"unknown"` when the server was not started
/// with connect info.
pub fn client_identity(extensions: &Extensions) -> String {
    extensions
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.ip().to_string())
        .unwrap_or_else(|| UNKNOWN_CLIENT.to_string())
}

// Extractor for the rate-limit key
pub struct ClientIp(pub String);

impl<S> FromRequestParts<S> for ClientIp
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(ClientIp(client_identity(&parts.extensions)))
    }
}

fn set_rate_headers(headers: &mut HeaderMap, decision: &RateDecision) {
    let reset_secs = decision.reset_after.as_secs_f64().ceil() as u64;
    headers.insert("ratelimit-limit", HeaderValue::from(decision.limit));
    headers.insert("ratelimit-remaining", HeaderValue::from(decision.remaining));
    headers.insert("ratelimit-reset", HeaderValue::from(reset_secs));
    if !decision.allowed {
        headers.insert(header::RETRY_AFTER, HeaderValue::from(reset_secs));
    }
}

/// Per-client request cap, checked before the body is read.
pub async fn global_rate_limit(
    State(state): State<Arc<AppState>>,
    request: Request,
    next: Next,
) -> Response {
    REPORTS_TOTAL.inc();
    let client = client_identity(request.extensions());
    let decision = state.global_limiter.check(&client);

    let mut response = if decision.allowed {
        next.run(request).await
    } else {
        tracing::warn!(client = %client, "global rate limit exceeded");
        record_rejected("rate_limited");
        RelayError::RateLimited.into_response()
    };
    set_rate_headers(response.headers_mut(), &decision);
    response
}

/// Turns a handler panic into the opaque `server_error` response.
pub fn panic_response(err: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(s) = err.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        s.to_string()
    } else {
        "unknown panic".to_string()
    };
    record_rejected("server_error");
    RelayError::internal(format!("handler panicked: {detail}")).into_response()
}

/// Adds hardening headers to every response that does not already set them.
pub fn with_security_headers<S>(router: Router<S>) -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    [
        (header::X_CONTENT_TYPE_OPTIONS, "nosniff"),
        (header::X_FRAME_OPTIONS, "SAMEORIGIN"),
        (header::REFERRER_POLICY, "no-referrer"),
        (header::X_DNS_PREFETCH_CONTROL, "off"),
        (
            HeaderName::from_static("cross-origin-resource-policy"),
            "same-origin",
        ),
        (
            header::STRICT_TRANSPORT_SECURITY,
            "max-age=15552000; includeSubDomains",
        ),
    ]
    .into_iter()
    .fold(router, |router, (name, value)| {
        router.layer(SetResponseHeaderLayer::if_not_present(
            name,
            HeaderValue::from_static(value),
        ))
    })
}
