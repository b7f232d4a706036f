use std::sync::Arc;

use tracing::instrument;

use crate::error::UpstreamOutcome;
use crate::models::{Coordinates, ForecastPayload};
use crate::upstream::FetchForecast;

/// Fetches the one-call forecast for a coordinate pair
pub struct ForecastFetcher {
    upstream: Arc<dyn FetchForecast>,
}

impl ForecastFetcher {
    pub fn new(upstream: Arc<dyn FetchForecast>) -> Self {
        Self { upstream }
    }

    #[instrument(skip(self))]
    pub async fn fetch(&self, coordinates: Coordinates) -> UpstreamOutcome<ForecastPayload> {
        self.upstream.fetch_forecast(coordinates).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{UpstreamError, UpstreamStage};
    use crate::upstream::mock::{MockProvider, sample_forecast};
    use axum::http::StatusCode;

    #[tokio::test]
    async fn test_fetch_passes_payload_through() {
        let provider = Arc::new(MockProvider::new());
        let fetcher = ForecastFetcher::new(provider.clone());

        let payload = fetcher.fetch(Coordinates::new(42.6208, -70.6721)).await.unwrap();

        assert_eq!(payload, sample_forecast());
        assert_eq!(provider.forecast_count(), 1);
    }

    #[tokio::test]
    async fn test_fetch_failure_keeps_status() {
        let provider = Arc::new(MockProvider::new().with_forecast(Err(UpstreamError::new(
            UpstreamStage::Forecast,
            StatusCode::TOO_MANY_REQUESTS,
            "quota exceeded",
        ))));

        let err = ForecastFetcher::new(provider)
            .fetch(Coordinates::new(1.0, 2.0))
            .await
            .unwrap_err();

        assert_eq!(err.status, StatusCode::TOO_MANY_REQUESTS);
    }
}
