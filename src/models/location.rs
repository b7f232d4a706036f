//! Location model for geocoded places and coordinate pairs

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Region value used when the upstream lookup path carries no state
pub const STATE_NOT_APPLICABLE: &str = "N/A";

/// A latitude/longitude pair in decimal degrees
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinates {
    #[must_use]
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Format as a `lat, lon` string
    #[must_use]
    pub fn format(&self) -> String {
        format!("{:.4}, {:.4}", self.latitude, self.longitude)
    }
}

/// Normalized location record as returned by the provider's geocoding APIs
///
/// Fields the service does not interpret (`local_names`, `zip`, ...) are kept
/// in `extra` so the record reaches the client in the shape the provider sent.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct LocationRecord {
    /// Display name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Country code (ISO 3166-1 alpha-2)
    #[serde(default)]
    pub country: String,
    /// State or region, [`STATE_NOT_APPLICABLE`] on the postal-code path
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    /// Latitude in decimal degrees
    pub lat: f64,
    /// Longitude in decimal degrees
    pub lon: f64,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl LocationRecord {
    #[must_use]
    pub fn new(name: &str, country: &str, state: Option<&str>, lat: f64, lon: f64) -> Self {
        Self {
            name: Some(name.to_string()),
            country: country.to_string(),
            state: state.map(str::to_string),
            lat,
            lon,
            extra: Map::new(),
        }
    }

    #[must_use]
    pub fn coordinates(&self) -> Coordinates {
        Coordinates::new(self.lat, self.lon)
    }

    /// Fill a missing state with the "not applicable" sentinel
    #[must_use]
    pub fn with_state_sentinel(mut self) -> Self {
        if self.state.is_none() {
            self.state = Some(STATE_NOT_APPLICABLE.to_string());
        }
        self
    }

    /// Human readable label, e.g. `Gloucester, Massachusetts, US`
    #[must_use]
    pub fn display_name(&self) -> String {
        let mut parts: Vec<&str> = Vec::new();
        if let Some(name) = &self.name {
            parts.push(name);
        }
        if let Some(state) = self.state.as_deref().filter(|s| *s != STATE_NOT_APPLICABLE) {
            parts.push(state);
        }
        if !self.country.is_empty() {
            parts.push(&self.country);
        }

        if parts.is_empty() {
            self.coordinates().format()
        } else {
            parts.join(", ")
        }
    }
}
