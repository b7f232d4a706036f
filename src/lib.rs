//! `WeatherBack` - location-aware weather backend
//!
//! Resolves a place name, postal code or coordinate pair through the
//! OpenWeather geocoding APIs, fetches a one-call forecast for the result and
//! returns both in a single response, keeping the provider's API key on the
//! server.

pub mod aggregator;
pub mod api;
pub mod config;
pub mod error;
pub mod location_resolver;
pub mod logging;
pub mod models;
pub mod upstream;
pub mod weather;
pub mod web;

// Re-export core types for public API
pub use crate::config::WeatherBackConfig;
pub use aggregator::WeatherAggregator;
pub use error::{UpstreamError, UpstreamOutcome, UpstreamStage, WeatherBackError};
pub use location_resolver::{CoordinateResolver, LocationQueryKind, ReverseCoordinateResolver};
pub use models::{AggregateResult, Coordinates, ForecastPayload, LocationRecord};
pub use upstream::OpenWeatherClient;
pub use weather::ForecastFetcher;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Core result type used throughout the library
pub type Result<T> = std::result::Result<T, WeatherBackError>;
