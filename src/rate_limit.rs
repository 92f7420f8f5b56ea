//! Per-client throttling in two layers.
//!
//! `GlobalLimiter` keeps a sliding log of accepted request times per client,
//! so no rolling window ever holds more than the cap. `BurstTracker` keeps a
//! decaying counter per client and trips when requests keep arriving within a
//! short gap of each other.
//!
//! Both stores are `DashMap`s. A client's read-modify-write happens while
//! holding its entry guard, so concurrent requests from one client see each
//! other's updates. `sweep` uses `retain`, which takes the same shard locks.

use std::collections::VecDeque;
use std::sync::Arc;

use dashmap::DashMap;
use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tokio::time::{Duration, Instant, interval};

use crate::metrics::TRACKED_CLIENTS;

// Accepted request times for one client, oldest first
#[derive(Default)]
pub struct RateLimitEntry {
    pub hits: VecDeque<Instant>,
}

impl RateLimitEntry {
    // Forget hits that have left the window ending at `now`
    fn prune(&mut self, now: Instant, window: Duration) {
        while let Some(oldest) = self.hits.front() {
            if now.saturating_duration_since(*oldest) >= window {
                self.hits.pop_front();
            } else {
                break;
            }
        }
    }
}

// Outcome of a global limiter check
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateDecision {
    pub allowed: bool,
    pub limit: u32,
    pub remaining: u32,
    pub reset_after: Duration,
}

pub struct GlobalLimiter {
    entries: DashMap<String, RateLimitEntry>,
    max_requests: u32,
    window: Duration,
}

impl GlobalLimiter {
    pub fn new(max_requests: u32, window: Duration) -> Self {
        Self {
            entries: DashMap::new(),
            max_requests,
            window,
        }
    }

    pub fn check(&self, client: &str) -> RateDecision {
        self.check_at(client, Instant::now())
    }

    /// Counts one request from `client` at `now` against the rolling window.
    /// Rejected requests do not consume quota.
    pub fn check_at(&self, client: &str, now: Instant) -> RateDecision {
        let mut entry = self.entries.entry(client.to_string()).or_default();
        entry.prune(now, self.window);

        let allowed = entry.hits.len() < self.max_requests as usize;
        if allowed {
            entry.hits.push_back(now);
        }

        // the oldest hit leaving the window frees the next slot
        let reset_after = entry
            .hits
            .front()
            .map(|oldest| self.window.saturating_sub(now.saturating_duration_since(*oldest)))
            .unwrap_or(self.window);
        let used = u32::try_from(entry.hits.len()).unwrap_or(u32::MAX);

        RateDecision {
            allowed,
            limit: self.max_requests,
            remaining: self.max_requests.saturating_sub(used),
            reset_after,
        }
    }

    /// Drops clients with no hits left in the window.
    pub fn sweep_at(&self, now: Instant) -> usize {
        let window = self.window;
        let before = self.entries.len();
        self.entries.retain(|_, entry| {
            entry.prune(now, window);
            !entry.hits.is_empty()
        });
        before.saturating_sub(self.entries.len())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

// Burst state for one client
#[derive(Debug, Clone, Copy)]
pub struct ClientState {
    pub count: u32,
    pub last_seen_at: Instant,
}

pub struct BurstTracker {
    clients: DashMap<String, ClientState>,
    gap: Duration,
    max_burst: u32,
}

impl BurstTracker {
    pub fn new(max_burst: u32, gap: Duration) -> Self {
        Self {
            clients: DashMap::new(),
            gap,
            max_burst,
        }
    }

    pub fn record(&self, client: &str) -> bool {
        self.record_at(client, Instant::now())
    }

    /// Updates `client`'s counter and returns whether the request may proceed.
    /// A request within `gap` of the previous one increments the count,
    /// otherwise the count restarts at 1. Every request, allowed or not,
    /// refreshes `last_seen_at`.
    pub fn record_at(&self, client: &str, now: Instant) -> bool {
        let count = {
            let mut state = self
                .clients
                .entry(client.to_string())
                .or_insert(ClientState {
                    count: 0,
                    last_seen_at: now,
                });

            if now.saturating_duration_since(state.last_seen_at) < self.gap {
                state.count = state.count.saturating_add(1);
            } else {
                state.count = 1;
            }
            state.last_seen_at = now;
            state.count
        };

        // len() locks every shard, so the entry guard must be gone by now
        TRACKED_CLIENTS.set(self.clients.len() as f64);
        count <= self.max_burst
    }

    /// Evicts clients idle for longer than `ttl`.
    pub fn sweep_at(&self, now: Instant, ttl: Duration) -> usize {
        let before = self.clients.len();
        self.clients
            .retain(|_, state| now.saturating_duration_since(state.last_seen_at) <= ttl);
        before.saturating_sub(self.clients.len())
    }

    pub fn get(&self, client: &str) -> Option<ClientState> {
        self.clients.get(client).map(|state| *state)
    }

    pub fn len(&self) -> usize {
        self.clients.len()
    }

    pub fn is_empty(&self) -> bool {
        self.clients.is_empty()
    }
}

// Sweep task - runs every `every` until shutdown fires
pub async fn sweeper(
    global: Arc<GlobalLimiter>,
    burst: Arc<BurstTracker>,
    every: Duration,
    ttl: Duration,
    mut shutdown: broadcast::Receiver<()>,
) {
    let mut interval = interval(every);

    tracing::info!(interval = ?every, ttl = ?ttl, "client sweeper started");

    loop {
        tokio::select! {
            _ = interval.tick() => {
                let now = Instant::now();
                let evicted = burst.sweep_at(now, ttl);
                let expired = global.sweep_at(now);
                TRACKED_CLIENTS.set(burst.len() as f64);
                if evicted > 0 || expired > 0 {
                    tracing::debug!(evicted, expired, tracked = burst.len(), "swept idle clients");
                }
            }
            _ = shutdown.recv() => {
                tracing::info!("client sweeper stopped");
                break;
            }
        }
    }
}

pub fn spawn_sweeper(
    global: Arc<GlobalLimiter>,
    burst: Arc<BurstTracker>,
    every: Duration,
    ttl: Duration,
    shutdown: broadcast::Receiver<()>,
) -> JoinHandle<()> {
    tokio::spawn(sweeper(global, burst, every, ttl, shutdown))
}
