//! Shared helpers for the relay integration tests.

#![allow(dead_code)]

use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::Json;
use axum::Router;
use axum::body::Body;
use axum::extract::{ConnectInfo, State};
use axum::http::{Request, StatusCode, header};
use axum::response::Response;
use axum::routing::post;
use serde_json::Value;
use tokio::net::TcpListener;
use url::Url;

use report_relay::config::Limits;
use report_relay::{AppState, RelayConfig, build_router};

/// Webhook stand-in recording every message it receives.
pub struct MockSink {
    pub url: Url,
    pub received: Arc<Mutex<Vec<Value>>>,
}

impl MockSink {
    pub fn messages(&self) -> Vec<Value> {
        self.received.lock().unwrap().clone()
    }
}

#[derive(Clone)]
struct SinkState {
    status: StatusCode,
    delay: Duration,
    received: Arc<Mutex<Vec<Value>>>,
}

async fn sink_handler(State(state): State<SinkState>, Json(body): Json<Value>) -> StatusCode {
    state.received.lock().unwrap().push(body);
    tokio::time::sleep(state.delay).await;
    state.status
}

/// Start a mock sink that answers every POST with `status` after `delay`.
pub async fn start_sink(status: StatusCode, delay: Duration) -> MockSink {
    let received = Arc::new(Mutex::new(Vec::new()));
    let app = Router::new()
        .route("/webhook", post(sink_handler))
        .with_state(SinkState {
            status,
            delay,
            received: received.clone(),
        });

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });

    MockSink {
        url: Url::parse(&format!("http://{addr}/webhook")).unwrap(),
        received,
    }
}

/// A loopback URL nothing is listening on.
pub async fn dead_sink_url() -> Url {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    Url::parse(&format!("http://{addr}/webhook")).unwrap()
}

pub fn relay_with(config: RelayConfig) -> Router {
    let client = reqwest::Client::builder().no_proxy().build().unwrap();
    build_router(Arc::new(AppState::new(&config, client)))
}

pub fn relay(sink_url: Url, limits: Limits) -> Router {
    let mut config = RelayConfig::new(sink_url);
    config.limits = limits;
    relay_with(config)
}

/// Limits loose enough that only the layer under test can trip.
pub fn generous_global() -> Limits {
    Limits {
        max_requests: 1_000,
        ..Limits::default()
    }
}

pub fn report_request(ip: &str, body: impl Into<Body>) -> Request<Body> {
    let addr: SocketAddr = format!("{ip}:40000").parse().unwrap();
    let mut request = Request::builder()
        .method("POST")
        .uri("/report")
        .header(header::CONTENT_TYPE, "application/json")
        .body(body.into())
        .unwrap();
    request.extensions_mut().insert(ConnectInfo(addr));
    request
}

pub fn json_report(ip: &str, body: &Value) -> Request<Body> {
    report_request(ip, body.to_string())
}

pub async fn read_json(response: Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}
