use clap::Parser;
use std::time::Duration;
use thiserror::Error;
use url::Url;

use crate::payload::Fallbacks;

// CLI argument structure
#[derive(Parser, Debug, Clone)]
#[command(name = "report-relay")]
#[command(about = "Rate-limited relay from game clients to a webhook")]
pub struct Args {
    // Port to run the server on
    #[arg(short, long, env = "PORT", default_value_t = 3000)]
    pub port: u16,

    // Webhook the reports are forwarded to (required)
    #[arg(short, long, env = "WEBHOOK_URL")]
    pub webhook_url: Option<String>,

    // Rate limit max requests per window, per client
    #[arg(long, default_value_t = 6)]
    pub rate_limit: u32,

    // Rate limit window in seconds
    #[arg(long, default_value_t = 60)]
    pub rate_window: u64,

    // Max requests in a burst before rejecting
    #[arg(long, default_value_t = 10)]
    pub burst_limit: u32,

    // Gap (ms) under which consecutive requests count as one burst
    #[arg(long, default_value_t = 5000)]
    pub burst_window_ms: u64,

    // How often idle clients are swept, in seconds
    #[arg(long, default_value_t = 60)]
    pub sweep_interval: u64,

    // Idle time in seconds before a client is forgotten
    #[arg(long, default_value_t = 300)]
    pub client_ttl: u64,

    // Timeout for the outbound webhook call, in seconds
    #[arg(long, default_value_t = 10)]
    pub sink_timeout: u64,

    // Max request body size in KiB
    #[arg(long, default_value_t = 150)]
    pub body_limit_kb: usize,

    // Username shown on messages when the client sends none
    #[arg(long, default_value = "Souza Logger")]
    pub bot_username: String,

    // Embed title used when the client sends none
    #[arg(long, default_value = "Auto Souza")]
    pub embed_title: String,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("WEBHOOK_URL is not set")]
    MissingWebhookUrl,

    #[error("WEBHOOK_URL is not a valid URL: {0}")]
    InvalidWebhookUrl(#[from] url::ParseError),

    #[error("WEBHOOK_URL must use http or https, got {0}")]
    UnsupportedScheme(String),

    #[error("{0} must be greater than zero")]
    ZeroValue(&'static str),
}

#[derive(Debug, Clone)]
pub struct Limits {
    pub max_requests: u32,
    pub window: Duration,
    pub max_burst: u32,
    pub burst_gap: Duration,
    pub sweep_interval: Duration,
    pub client_ttl: Duration,
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            max_requests: 6,
            window: Duration::from_secs(60),
            max_burst: 10,
            burst_gap: Duration::from_millis(5000),
            sweep_interval: Duration::from_secs(60),
            client_ttl: Duration::from_secs(300),
        }
    }
}

// Validated runtime configuration
#[derive(Debug, Clone)]
pub struct RelayConfig {
    pub port: u16,
    pub webhook_url: Url,
    pub limits: Limits,
    pub sink_timeout: Duration,
    pub body_limit: usize,
    pub fallbacks: Fallbacks,
}

impl RelayConfig {
    pub fn new(webhook_url: Url) -> Self {
        Self {
            port: 3000,
            webhook_url,
            limits: Limits::default(),
            sink_timeout: Duration::from_secs(10),
            body_limit: 150 * 1024,
            fallbacks: Fallbacks::default(),
        }
    }

    pub fn from_args(args: Args) -> Result<Self, ConfigError> {
        let raw = args
            .webhook_url
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .ok_or(ConfigError::MissingWebhookUrl)?;
        let webhook_url = parse_webhook_url(raw)?;

        let nonzero = [
            ("rate-limit", args.rate_limit as u64),
            ("rate-window", args.rate_window),
            ("burst-limit", args.burst_limit as u64),
            ("burst-window-ms", args.burst_window_ms),
            ("sweep-interval", args.sweep_interval),
            ("client-ttl", args.client_ttl),
            ("sink-timeout", args.sink_timeout),
            ("body-limit-kb", args.body_limit_kb as u64),
        ];
        if let Some((name, _)) = nonzero.iter().find(|(_, v)| *v == 0) {
            return Err(ConfigError::ZeroValue(*name));
        }

        let fallbacks = Fallbacks {
            username: args.bot_username,
            title: args.embed_title,
            ..Fallbacks::default()
        };

        Ok(Self {
            port: args.port,
            webhook_url,
            limits: Limits {
                max_requests: args.rate_limit,
                window: Duration::from_secs(args.rate_window),
                max_burst: args.burst_limit,
                burst_gap: Duration::from_millis(args.burst_window_ms),
                sweep_interval: Duration::from_secs(args.sweep_interval),
                client_ttl: Duration::from_secs(args.client_ttl),
            },
            sink_timeout: Duration::from_secs(args.sink_timeout),
            body_limit: args.body_limit_kb * 1024,
            fallbacks,
        })
    }
}

pub fn parse_webhook_url(raw: &str) -> Result<Url, ConfigError> {
    let url = Url::parse(raw)?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(ConfigError::UnsupportedScheme(other.to_string())),
    }
}
