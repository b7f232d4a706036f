use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use axum::{Router, middleware};
use tower_http::cors::{Any, CorsLayer};
use tower_http::timeout::TimeoutLayer;

use crate::aggregator::WeatherAggregator;
use crate::api::{self, AppState};
use crate::config::{ProviderConfig, ServerConfig, WeatherBackConfig};
use crate::upstream::OpenWeatherClient;

/// Two sequential upstream calls plus a second of slack
fn request_timeout(provider: &ProviderConfig) -> Duration {
    provider.timeout() * 2 + Duration::from_secs(1)
}

pub fn build_app(state: AppState, server: &ServerConfig, request_timeout: Duration) -> Router {
    let app = api::router(state)
        .layer(middleware::from_fn(api::catch_internal_errors))
        .layer(TimeoutLayer::new(request_timeout));

    if server.testing {
        return app;
    }

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    app.layer(cors)
}

pub async fn run(config: WeatherBackConfig) -> Result<()> {
    let client = OpenWeatherClient::new(config.provider.clone())?;
    let aggregator =
        WeatherAggregator::from_provider(Arc::new(client), &config.provider.country_qualifier);

    let app = build_app(
        AppState::new(aggregator),
        &config.server,
        request_timeout(&config.provider),
    );

    let addr = config.server.bind_address();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    tracing::info!("Web server running at http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Web server terminated unexpectedly")
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        return;
    }
    tracing::info!("Shutdown signal received");
}
