//! Weather aggregation
//!
//! Chains a location lookup and a forecast lookup into one response. The
//! forecast depends on the resolved coordinates, so the calls run one after
//! the other and the first failure ends the request with that failure's
//! status. A partial body is never produced.

use std::sync::Arc;

use tracing::{info, instrument};

use crate::error::{UpstreamError, UpstreamStage};
use crate::location_resolver::{CoordinateResolver, ReverseCoordinateResolver};
use crate::models::{AggregateResult, Coordinates, ForecastSummary, SummaryResult};
use crate::upstream::WeatherProvider;
use crate::weather::ForecastFetcher;
use crate::{Result, WeatherBackError};

/// Parameters the coordinate entry point requires
pub const COORDINATE_PARAMS: &[&str] = &["lat", "lon"];

/// Parameter the text entry point requires
pub const LOCATION_PARAMS: &[&str] = &["loc"];

/// Orchestrates resolver and fetcher calls for both input modes
pub struct WeatherAggregator {
    coordinates: CoordinateResolver,
    reverse: ReverseCoordinateResolver,
    forecast: ForecastFetcher,
}

impl WeatherAggregator {
    pub fn new(
        coordinates: CoordinateResolver,
        reverse: ReverseCoordinateResolver,
        forecast: ForecastFetcher,
    ) -> Self {
        Self {
            coordinates,
            reverse,
            forecast,
        }
    }

    /// Wire every stage to the same provider
    pub fn from_provider<P>(provider: Arc<P>, country_qualifier: &str) -> Self
    where
        P: WeatherProvider + 'static,
    {
        Self::new(
            CoordinateResolver::new(provider.clone(), provider.clone(), country_qualifier),
            ReverseCoordinateResolver::new(provider.clone()),
            ForecastFetcher::new(provider),
        )
    }

    /// Resolve a place name or postal code, then fetch its forecast
    #[instrument(skip(self))]
    pub async fn resolve_by_text(&self, query: &str) -> Result<AggregateResult> {
        if query.trim().is_empty() {
            return Err(WeatherBackError::missing(vec!["loc"], LOCATION_PARAMS));
        }

        let location = self.coordinates.resolve(query).await?;
        let forecast = self.forecast.fetch(location.coordinates()).await?;

        info!("Weather ready for {}", location.display_name());
        Ok(AggregateResult { location, forecast })
    }

    /// Reverse-geocode a coordinate pair, then fetch its forecast
    #[instrument(skip(self))]
    pub async fn resolve_by_coordinates(
        &self,
        lat: Option<f64>,
        lon: Option<f64>,
    ) -> Result<AggregateResult> {
        let coordinates = match (lat, lon) {
            (Some(latitude), Some(longitude)) => Coordinates::new(latitude, longitude),
            _ => {
                let missing = COORDINATE_PARAMS
                    .iter()
                    .zip([lat, lon])
                    .filter(|(_, value)| value.is_none())
                    .map(|(name, _)| *name)
                    .collect();
                return Err(WeatherBackError::missing(missing, COORDINATE_PARAMS));
            }
        };

        let location = self.reverse.resolve(coordinates).await?;
        let forecast = self.forecast.fetch(coordinates).await?;

        info!("Weather ready for {}", location.display_name());
        Ok(AggregateResult { location, forecast })
    }

    /// Same as [`Self::resolve_by_text`], with the forecast normalized
    pub async fn summarize_by_text(&self, query: &str) -> Result<SummaryResult> {
        let AggregateResult { location, forecast } = self.resolve_by_text(query).await?;

        let summary = ForecastSummary::from_payload(&forecast).map_err(|e| {
            UpstreamError::transport(
                UpstreamStage::Forecast,
                format!("forecast is missing expected fields: {e}"),
            )
        })?;

        Ok(SummaryResult { location, summary })
    }
}
