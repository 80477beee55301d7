//! Skyline search server: natural-language building search for the 3D map.

use anyhow::Result;
use skyline_server::{
    api,
    config::{Config, LogFormat},
    state::AppState,
};
use std::net::SocketAddr;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env();

    let fmt_layer = match config.log_format {
        LogFormat::Json => tracing_subscriber::fmt::layer().json().boxed(),
        LogFormat::Text => tracing_subscriber::fmt::layer().boxed(),
    };
    tracing_subscriber::registry()
        .with(fmt_layer)
        .with(EnvFilter::from_default_env().add_directive("skyline_server=debug".parse()?))
        .init();

    tracing::info!("Starting Skyline search server...");

    let port = config.server_port;
    let state = Arc::new(AppState::from_config(&config));
    let app = api::app(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
