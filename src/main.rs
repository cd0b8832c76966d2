mod config;
mod routes;
mod state;
mod untappd;

use anyhow::{Context, Result};
use std::net::SocketAddr;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::ServerConfig;
use crate::state::AppState;
use crate::untappd::UntappdClient;

#[tokio::main]
async fn main() -> Result<()> {
    // A missing .env is fine; the real environment is used as-is
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "untappical=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = ServerConfig::load()?;
    let route_prefix = config.route_prefix();

    let feed = UntappdClient::new(&config).context("Invalid UNTAPPD_API_URL")?;
    let state = AppState::new(&config.domain, feed);

    let app = routes::app(state, &route_prefix);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        %addr,
        route = %format!("{}/{{username}}", route_prefix),
        "🍻 untappical live"
    );

    axum::serve(listener, app).await.context("Server error")?;

    Ok(())
}
