//! Forecast payload and the combined response bodies

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{ForecastSummary, LocationRecord};

/// One-call forecast exactly as the provider returned it
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(transparent)]
pub struct ForecastPayload(pub Value);

impl ForecastPayload {
    #[must_use]
    pub fn into_inner(self) -> Value {
        self.0
    }

    /// Number of entries in the daily outlook
    #[must_use]
    pub fn daily_len(&self) -> usize {
        self.0
            .get("daily")
            .and_then(Value::as_array)
            .map_or(0, Vec::len)
    }
}

/// Success body of the weather endpoints
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct AggregateResult {
    pub location: LocationRecord,
    pub forecast: ForecastPayload,
}

/// Success body of the summary endpoint
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct SummaryResult {
    pub location: LocationRecord,
    pub summary: ForecastSummary,
}
