//! HTTP routes
//!
//! Thin handlers that turn query strings into aggregator calls. All error
//! bodies are rendered by [`WeatherBackError`]'s `IntoResponse`.

use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use axum::{
    Router,
    extract::{
        Path, Query, Request, State,
        rejection::{PathRejection, QueryRejection},
    },
    middleware::Next,
    response::{IntoResponse, Json, Response},
    routing::get,
};
use futures::FutureExt;
use serde::Deserialize;
use serde_json::{Value, json};

use crate::aggregator::WeatherAggregator;
use crate::models::{AggregateResult, SummaryResult};
use crate::{Result, VERSION, WeatherBackError};

/// Shared state handed to every handler
#[derive(Clone)]
pub struct AppState {
    pub aggregator: Arc<WeatherAggregator>,
}

impl AppState {
    pub fn new(aggregator: WeatherAggregator) -> Self {
        Self {
            aggregator: Arc::new(aggregator),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct WeatherParams {
    pub loc: Option<String>,
}

/// Coordinates arrive as raw strings so a missing value and a malformed one
/// can be reported differently
#[derive(Debug, Deserialize)]
pub struct CoordinateParams {
    pub lat: Option<String>,
    pub lon: Option<String>,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/weather", get(get_weather))
        .route("/weather/summary", get(get_weather_summary))
        .route("/weather/{loc}", get(get_weather_by_path))
        .route("/coordinates", get(get_coordinates))
        .route("/health", get(health))
        .with_state(state)
}

async fn get_weather(
    State(state): State<AppState>,
    query: std::result::Result<Query<WeatherParams>, QueryRejection>,
) -> Result<Json<AggregateResult>> {
    let Query(params) = query?;
    let loc = params.loc.unwrap_or_default();
    let result = state.aggregator.resolve_by_text(&loc).await?;
    Ok(Json(result))
}

async fn get_weather_by_path(
    State(state): State<AppState>,
    path: std::result::Result<Path<String>, PathRejection>,
) -> Result<Json<AggregateResult>> {
    let Path(loc) = path?;
    let result = state.aggregator.resolve_by_text(&loc).await?;
    Ok(Json(result))
}

async fn get_weather_summary(
    State(state): State<AppState>,
    query: std::result::Result<Query<WeatherParams>, QueryRejection>,
) -> Result<Json<SummaryResult>> {
    let Query(params) = query?;
    let loc = params.loc.unwrap_or_default();
    let result = state.aggregator.summarize_by_text(&loc).await?;
    Ok(Json(result))
}

async fn get_coordinates(
    State(state): State<AppState>,
    query: std::result::Result<Query<CoordinateParams>, QueryRejection>,
) -> Result<Json<AggregateResult>> {
    let Query(params) = query?;
    let lat = parse_coordinate("lat", params.lat.as_deref())?;
    let lon = parse_coordinate("lon", params.lon.as_deref())?;

    let result = state.aggregator.resolve_by_coordinates(lat, lon).await?;
    Ok(Json(result))
}

async fn health() -> Json<Value> {
    Json(json!({ "status": "ok", "version": VERSION }))
}

/// Blank values count as missing; anything else must be a finite number
fn parse_coordinate(name: &'static str, raw: Option<&str>) -> Result<Option<f64>> {
    let Some(raw) = raw.map(str::trim).filter(|s| !s.is_empty()) else {
        return Ok(None);
    };

    match raw.parse::<f64>() {
        Ok(value) if value.is_finite() => Ok(Some(value)),
        _ => Err(WeatherBackError::invalid_parameter(
            name,
            format!("'{raw}' is not a number"),
        )),
    }
}

/// Turns a panicking handler into a 500 that names the request URL
pub async fn catch_internal_errors(request: Request, next: Next) -> Response {
    let url = request.uri().to_string();

    match AssertUnwindSafe(next.run(request)).catch_unwind().await {
        Ok(response) => response,
        Err(panic) => WeatherBackError::internal(panic_message(panic.as_ref()), Some(url))
            .into_response(),
    }
}

fn panic_message(panic: &(dyn Any + Send)) -> String {
    if let Some(message) = panic.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = panic.downcast_ref::<String>() {
        message.clone()
    } else {
        "unexpected failure while handling request".to_string()
    }
}
