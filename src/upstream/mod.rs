//! Upstream provider capabilities
//!
//! The aggregator only depends on these traits, so the concrete transport
//! ([`OpenWeatherClient`]) can be swapped for an in-memory double in tests.
//! Every method returns an [`UpstreamOutcome`]; implementations must never
//! let a transport fault escape in any other form.

use async_trait::async_trait;

use crate::error::UpstreamOutcome;
use crate::models::{Coordinates, ForecastPayload, LocationRecord};

pub mod openweather;

#[cfg(test)]
pub(crate) mod mock;

pub use openweather::OpenWeatherClient;

/// Free-text ("direct") geocoding, returning ordered candidates
#[async_trait]
pub trait GeocodeByText: Send + Sync {
    async fn geocode_by_text(&self, query: &str) -> UpstreamOutcome<Vec<LocationRecord>>;
}

/// Postal-code geocoding, returning exactly one record
#[async_trait]
pub trait GeocodeByPostalCode: Send + Sync {
    async fn geocode_by_postal_code(&self, postal_code: &str) -> UpstreamOutcome<LocationRecord>;
}

/// Reverse geocoding, returning at most one candidate
#[async_trait]
pub trait ReverseGeocode: Send + Sync {
    async fn reverse_geocode(&self, coordinates: Coordinates) -> UpstreamOutcome<Vec<LocationRecord>>;
}

/// One-call forecast (current conditions and daily outlook)
#[async_trait]
pub trait FetchForecast: Send + Sync {
    async fn fetch_forecast(&self, coordinates: Coordinates) -> UpstreamOutcome<ForecastPayload>;
}

/// Everything a full weather provider offers
pub trait WeatherProvider: GeocodeByText + GeocodeByPostalCode + ReverseGeocode + FetchForecast {}

impl<T> WeatherProvider for T where T: GeocodeByText + GeocodeByPostalCode + ReverseGeocode + FetchForecast {}
