use clap::Parser; // for cli
use std::net::SocketAddr;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use report_relay::config::{Args, RelayConfig};
use report_relay::rate_limit::spawn_sweeper;
use report_relay::shutdown::wait_for_signal;
use report_relay::{AppState, Shutdown, build_router};

// this is main async function with tokio
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "report_relay=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // parse cli arguments, refuse to start without a sink
    let args = Args::parse();
    let config = match RelayConfig::from_args(args) {
        Ok(config) => config,
        Err(err) => {
            tracing::error!(error = %err, "invalid configuration");
            return Err(err.into());
        }
    };

    let client = reqwest::Client::builder().build()?;
    let state = Arc::new(AppState::new(&config, client));

    // spawn the background sweeper
    let shutdown = Shutdown::new();
    let sweeper = spawn_sweeper(
        state.global_limiter.clone(),
        state.burst_tracker.clone(),
        config.limits.sweep_interval,
        config.limits.client_ttl,
        shutdown.subscribe(),
    );

    let app = build_router(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let listener = tokio::net::TcpListener::bind(addr).await?;

    tracing::info!(address = %listener.local_addr()?, "relay listening");
    tracing::info!(
        sink_host = config.webhook_url.host_str().unwrap_or("-"),
        timeout = ?config.sink_timeout,
        "forwarding reports"
    );
    tracing::info!(
        rate_limit = config.limits.max_requests,
        rate_window = ?config.limits.window,
        burst_limit = config.limits.max_burst,
        burst_gap = ?config.limits.burst_gap,
        "rate limits configured"
    );

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(wait_for_signal())
    .await?;

    shutdown.trigger();
    sweeper.await?;
    tracing::info!("shutdown complete");
    Ok(())
}
