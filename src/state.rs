use std::sync::Arc;

use crate::config::RelayConfig;
use crate::forwarder::Forwarder;
use crate::payload::Fallbacks;
use crate::rate_limit::{BurstTracker, GlobalLimiter};

// app's shared state, created once at startup and injected into handlers

pub struct AppState {
    pub forwarder: Forwarder,
    pub global_limiter: Arc<GlobalLimiter>,
    pub burst_tracker: Arc<BurstTracker>,
    pub fallbacks: Fallbacks,
    pub body_limit: usize,
}

impl AppState {
    pub fn new(config: &RelayConfig, client: reqwest::Client) -> Self {
        let limits = &config.limits;
        Self {
            forwarder: Forwarder::new(client, config.webhook_url.clone(), config.sink_timeout),
            global_limiter: Arc::new(GlobalLimiter::new(limits.max_requests, limits.window)),
            burst_tracker: Arc::new(BurstTracker::new(limits.max_burst, limits.burst_gap)),
            fallbacks: config.fallbacks.clone(),
            body_limit: config.body_limit,
        }
    }
}
