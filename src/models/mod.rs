//! Data models for `WeatherBack`
//!
//! This module contains the request-scoped values organized by concern:
//! - Location: geocoded location records and coordinate pairs
//! - Forecast: the pass-through one-call payload and the combined response
//! - Weather: the optional normalized forecast summary

pub mod forecast;
pub mod location;
pub mod weather;

pub use forecast::{AggregateResult, ForecastPayload, SummaryResult};
pub use location::{Coordinates, LocationRecord, STATE_NOT_APPLICABLE};
pub use weather::{CurrentSummary, DailySummary, ForecastSummary, Temperature};
