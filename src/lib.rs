//! Abuse-resistant relay from game clients to a webhook sink.
//!
//! ```text
//! POST /report
//!   -> global limiter (route layer, before the body is read)
//!   -> burst tracker
//!   -> validate -> sanitize -> build payload
//!   -> forward (single attempt, bounded timeout)
//!   -> { ok, msg?, status? }
//! ```

pub mod config;
pub mod error;
pub mod forwarder;
pub mod handlers;
pub mod metrics;
pub mod middleware;
pub mod models;
pub mod payload;
pub mod rate_limit;
pub mod sanitize;
pub mod shutdown;
pub mod state;
pub mod validate;

use std::sync::Arc;

use axum::Router;
use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::trace::TraceLayer;

pub use config::RelayConfig;
pub use shutdown::Shutdown;
pub use state::AppState;

pub fn build_router(state: Arc<AppState>) -> Router {
    let router = Router::new()
        .route("/report", post(handlers::report_handler))
        .route_layer(axum::middleware::from_fn_with_state(
            state.clone(),
            middleware::global_rate_limit,
        ))
        .route("/health", get(handlers::health_handler))
        .route("/metrics", get(handlers::metrics_handler))
        .layer(DefaultBodyLimit::max(state.body_limit))
        .layer(CatchPanicLayer::custom(middleware::panic_response));

    middleware::with_security_headers(router)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
