//! OpenWeather API client
//!
//! Implements the upstream capabilities against the OpenWeather geocoding
//! (`/geo/1.0`) and one-call (`/data/3.0`) APIs. One `reqwest` client with a
//! fixed timeout is shared by all calls; there are no retries.

use std::time::Instant;

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use tracing::{debug, info, instrument, warn};

use super::{FetchForecast, GeocodeByPostalCode, GeocodeByText, ReverseGeocode};
use crate::config::ProviderConfig;
use crate::error::{UpstreamError, UpstreamOutcome, UpstreamStage};
use crate::models::{Coordinates, ForecastPayload, LocationRecord};

/// Sections of the one-call response the service never reads
const EXCLUDED_SECTIONS: &str = "minutely,hourly,alerts";

/// Error body OpenWeather sends with non-2xx responses
#[derive(Debug, Deserialize)]
struct ProviderErrorBody {
    message: Option<String>,
}

/// HTTP client for the OpenWeather APIs
pub struct OpenWeatherClient {
    client: Client,
    config: ProviderConfig,
}

impl OpenWeatherClient {
    /// Create a new client from provider settings
    pub fn new(config: ProviderConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout())
            .user_agent(concat!("WeatherBack/", env!("CARGO_PKG_VERSION")))
            .build()
            .with_context(|| "Failed to create HTTP client")?;

        Ok(Self { client, config })
    }

    fn geo_url(&self, endpoint: &str) -> String {
        format!("{}/{}", self.config.geo_base_url.trim_end_matches('/'), endpoint)
    }

    fn data_url(&self, endpoint: &str) -> String {
        format!("{}/{}", self.config.data_base_url.trim_end_matches('/'), endpoint)
    }

    /// Send a GET and normalize whatever happens into an outcome
    async fn get_json<T: DeserializeOwned>(
        &self,
        stage: UpstreamStage,
        url: &str,
        params: &[(&str, String)],
    ) -> UpstreamOutcome<T> {
        debug!(%stage, url, ?params, "Calling upstream");
        let start = Instant::now();

        let api_key = self.config.api_key.as_deref().unwrap_or_default();
        let response = self
            .client
            .get(url)
            .query(params)
            .query(&[("appid", api_key)])
            .send()
            .await
            .map_err(|e| {
                let message = if e.is_timeout() {
                    format!(
                        "request timed out after {}s",
                        self.config.timeout().as_secs()
                    )
                } else {
                    format!("request failed: {e}")
                };
                warn!(%stage, "{}", message);
                UpstreamError::transport(stage, message)
            })?;

        let status = response.status();
        debug!(
            %stage,
            status = status.as_u16(),
            "Upstream responded in {:.3}s",
            start.elapsed().as_secs_f64()
        );

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let detail = serde_json::from_str::<ProviderErrorBody>(&body)
                .ok()
                .and_then(|b| b.message)
                .unwrap_or_else(|| status.canonical_reason().unwrap_or("unknown error").to_string());
            warn!(%stage, status = status.as_u16(), "Upstream error: {}", detail);
            return Err(UpstreamError::new(
                stage,
                status,
                format!("upstream returned {}: {}", status.as_u16(), detail),
            ));
        }

        response.json::<T>().await.map_err(|e| {
            warn!(%stage, "Malformed upstream body: {}", e);
            UpstreamError::transport(stage, format!("invalid response body: {e}"))
        })
    }
}

#[async_trait]
impl GeocodeByText for OpenWeatherClient {
    #[instrument(skip(self))]
    async fn geocode_by_text(&self, query: &str) -> UpstreamOutcome<Vec<LocationRecord>> {
        let records: Vec<LocationRecord> = self
            .get_json(
                UpstreamStage::Location,
                &self.geo_url("direct"),
                &[("q", query.to_string())],
            )
            .await?;

        info!("Found {} geocoding candidates for '{}'", records.len(), query);
        Ok(records)
    }
}

#[async_trait]
impl GeocodeByPostalCode for OpenWeatherClient {
    #[instrument(skip(self))]
    async fn geocode_by_postal_code(&self, postal_code: &str) -> UpstreamOutcome<LocationRecord> {
        self.get_json(
            UpstreamStage::Location,
            &self.geo_url("zip"),
            &[("zip", postal_code.to_string())],
        )
        .await
    }
}

#[async_trait]
impl ReverseGeocode for OpenWeatherClient {
    #[instrument(skip(self))]
    async fn reverse_geocode(&self, coordinates: Coordinates) -> UpstreamOutcome<Vec<LocationRecord>> {
        self.get_json(
            UpstreamStage::ReverseLocation,
            &self.geo_url("reverse"),
            &[
                ("lat", coordinates.latitude.to_string()),
                ("lon", coordinates.longitude.to_string()),
                ("limit", "1".to_string()),
            ],
        )
        .await
    }
}

#[async_trait]
impl FetchForecast for OpenWeatherClient {
    #[instrument(skip(self))]
    async fn fetch_forecast(&self, coordinates: Coordinates) -> UpstreamOutcome<ForecastPayload> {
        let payload: ForecastPayload = self
            .get_json(
                UpstreamStage::Forecast,
                &self.data_url("onecall"),
                &[
                    ("lat", coordinates.latitude.to_string()),
                    ("lon", coordinates.longitude.to_string()),
                    ("units", "metric".to_string()),
                    ("exclude", EXCLUDED_SECTIONS.to_string()),
                ],
            )
            .await?;

        info!("Retrieved forecast with {} daily entries", payload.daily_len());
        Ok(payload)
    }
}
