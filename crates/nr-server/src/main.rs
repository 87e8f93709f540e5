//! NR configuration server - recommends 5G NR site settings over HTTP

use anyhow::{Context, Result};
use std::net::SocketAddr;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use nr_server::{api, config::Config, state::AppState};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("nr_server=debug".parse()?)
                .add_directive("nr_geodata=info".parse()?),
        )
        .init();

    tracing::info!("Starting NR configuration server...");

    let config = Config::from_env();
    tracing::info!(
        "Overpass: {}, elevation: {}, radius {} km, peak threshold {}, timeout {}s",
        config.overpass_url,
        config.elevation_url,
        config.search_radius_km,
        config.mountain_peak_threshold,
        config.request_timeout_s
    );
    if config.cache_ttl_s > 0 {
        tracing::info!(
            "Feature cache enabled: ttl {}s, max {} entries",
            config.cache_ttl_s,
            config.cache_max_entries
        );
    }

    let state = Arc::new(AppState::new(&config));
    let app = api::routes().with_state(state);

    let addr: SocketAddr = format!("{}:{}", config.host, config.server_port)
        .parse()
        .with_context(|| format!("invalid listen address {}:{}", config.host, config.server_port))?;
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", err);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
