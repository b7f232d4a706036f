//! In-memory provider double with call recording

use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use serde_json::json;

use super::{FetchForecast, GeocodeByPostalCode, GeocodeByText, ReverseGeocode};
use crate::error::UpstreamOutcome;
use crate::models::{Coordinates, ForecastPayload, LocationRecord};

pub fn gloucester() -> LocationRecord {
    LocationRecord::new("Gloucester", "US", Some("Massachusetts"), 42.6208, -70.6721)
}

pub fn gloucester_zip() -> LocationRecord {
    LocationRecord::new("Gloucester", "US", None, 42.6208, -70.6721)
}

pub fn sample_forecast() -> ForecastPayload {
    ForecastPayload(json!({
        "lat": 42.6208,
        "lon": -70.6721,
        "current": {
            "temp": 7.5,
            "humidity": 70,
            "wind_speed": 3.6,
            "weather": [{"id": 800, "main": "Clear", "description": "clear sky", "icon": "01d"}]
        },
        "daily": [
            {"dt": 1_700_000_000, "temp": {"max": 9.1, "min": 1.4},
             "weather": [{"main": "Clear", "icon": "01d"}]}
        ]
    }))
}

pub struct MockProvider {
    direct: UpstreamOutcome<Vec<LocationRecord>>,
    zip: UpstreamOutcome<LocationRecord>,
    reverse: UpstreamOutcome<Vec<LocationRecord>>,
    forecast: UpstreamOutcome<ForecastPayload>,
    pub text_queries: Mutex<Vec<String>>,
    pub postal_queries: Mutex<Vec<String>>,
    pub reverse_calls: AtomicUsize,
    pub forecast_calls: Mutex<Vec<Coordinates>>,
}

impl Default for MockProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl MockProvider {
    pub fn new() -> Self {
        Self {
            direct: Ok(vec![gloucester()]),
            zip: Ok(gloucester_zip()),
            reverse: Ok(vec![gloucester()]),
            forecast: Ok(sample_forecast()),
            text_queries: Mutex::default(),
            postal_queries: Mutex::default(),
            reverse_calls: AtomicUsize::new(0),
            forecast_calls: Mutex::default(),
        }
    }

    pub fn with_direct(mut self, outcome: UpstreamOutcome<Vec<LocationRecord>>) -> Self {
        self.direct = outcome;
        self
    }

    pub fn with_zip(mut self, outcome: UpstreamOutcome<LocationRecord>) -> Self {
        self.zip = outcome;
        self
    }

    pub fn with_reverse(mut self, outcome: UpstreamOutcome<Vec<LocationRecord>>) -> Self {
        self.reverse = outcome;
        self
    }

    pub fn with_forecast(mut self, outcome: UpstreamOutcome<ForecastPayload>) -> Self {
        self.forecast = outcome;
        self
    }

    pub fn text_queries(&self) -> Vec<String> {
        self.text_queries.lock().unwrap().clone()
    }

    pub fn postal_queries(&self) -> Vec<String> {
        self.postal_queries.lock().unwrap().clone()
    }

    pub fn reverse_count(&self) -> usize {
        self.reverse_calls.load(Ordering::SeqCst)
    }

    pub fn forecast_count(&self) -> usize {
        self.forecast_calls.lock().unwrap().len()
    }
}

#[async_trait]
impl GeocodeByText for MockProvider {
    async fn geocode_by_text(&self, query: &str) -> UpstreamOutcome<Vec<LocationRecord>> {
        self.text_queries.lock().unwrap().push(query.to_string());
        self.direct.clone()
    }
}

#[async_trait]
impl GeocodeByPostalCode for MockProvider {
    async fn geocode_by_postal_code(&self, postal_code: &str) -> UpstreamOutcome<LocationRecord> {
        self.postal_queries.lock().unwrap().push(postal_code.to_string());
        self.zip.clone()
    }
}

#[async_trait]
impl ReverseGeocode for MockProvider {
    async fn reverse_geocode(&self, _coordinates: Coordinates) -> UpstreamOutcome<Vec<LocationRecord>> {
        self.reverse_calls.fetch_add(1, Ordering::SeqCst);
        self.reverse.clone()
    }
}

#[async_trait]
impl FetchForecast for MockProvider {
    async fn fetch_forecast(&self, coordinates: Coordinates) -> UpstreamOutcome<ForecastPayload> {
        self.forecast_calls.lock().unwrap().push(coordinates);
        self.forecast.clone()
    }
}
