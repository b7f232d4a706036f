//! Location Resolution Module
//!
//! Resolves a raw location string or a coordinate pair into a
//! [`LocationRecord`] by calling the matching upstream geocoding endpoint.

use std::sync::Arc;

use tracing::{debug, instrument};

use crate::error::{UpstreamError, UpstreamOutcome, UpstreamStage};
use crate::models::{Coordinates, LocationRecord};
use crate::upstream::{GeocodeByPostalCode, GeocodeByText, ReverseGeocode};

/// Number of leading digits that mark a postal code
const POSTAL_CODE_DIGITS: usize = 5;

/// Lookup strategy for a raw location string
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LocationQueryKind {
    /// Starts with a 5-digit postal code; forwarded unchanged
    PostalCode(String),
    /// Free-text place name, already cleaned and qualified
    Place(String),
}

impl LocationQueryKind {
    /// Classify a raw location string
    ///
    /// Place names have all whitespace stripped. A name in "city, region"
    /// form gets `country_qualifier` appended.
    #[must_use]
    pub fn parse(raw: &str, country_qualifier: &str) -> Self {
        if Self::is_postal_code(raw) {
            return LocationQueryKind::PostalCode(raw.to_string());
        }

        let cleaned = raw.split_whitespace().collect::<String>();

        if cleaned.contains(',') {
            LocationQueryKind::Place(format!("{cleaned},{country_qualifier}"))
        } else {
            LocationQueryKind::Place(cleaned)
        }
    }

    /// Leading characters match five ASCII digits
    fn is_postal_code(raw: &str) -> bool {
        raw.len() >= POSTAL_CODE_DIGITS
            && raw.as_bytes()[..POSTAL_CODE_DIGITS]
                .iter()
                .all(u8::is_ascii_digit)
    }
}

/// Resolves free text or postal codes to a location
pub struct CoordinateResolver {
    text: Arc<dyn GeocodeByText>,
    postal: Arc<dyn GeocodeByPostalCode>,
    country_qualifier: String,
}

impl CoordinateResolver {
    pub fn new(
        text: Arc<dyn GeocodeByText>,
        postal: Arc<dyn GeocodeByPostalCode>,
        country_qualifier: impl Into<String>,
    ) -> Self {
        Self {
            text,
            postal,
            country_qualifier: country_qualifier.into(),
        }
    }

    #[instrument(skip(self))]
    pub async fn resolve(&self, raw_location: &str) -> UpstreamOutcome<LocationRecord> {
        let query = LocationQueryKind::parse(raw_location, &self.country_qualifier);
        debug!("Resolving location query: {:?}", query);

        let location = match query {
            LocationQueryKind::PostalCode(postal) => self
                .postal
                .geocode_by_postal_code(&postal)
                .await?
                .with_state_sentinel(),
            LocationQueryKind::Place(place) => {
                first_candidate(self.text.geocode_by_text(&place).await?).ok_or_else(|| {
                    UpstreamError::not_found(
                        UpstreamStage::Location,
                        format!("no location found for '{place}'"),
                    )
                })?
            }
        };

        debug!(
            "Resolved location: {} at ({}, {})",
            location.display_name(),
            location.lat,
            location.lon
        );

        Ok(location)
    }
}

/// Resolves a coordinate pair to a human-readable location
pub struct ReverseCoordinateResolver {
    reverse: Arc<dyn ReverseGeocode>,
}

impl ReverseCoordinateResolver {
    pub fn new(reverse: Arc<dyn ReverseGeocode>) -> Self {
        Self { reverse }
    }

    #[instrument(skip(self))]
    pub async fn resolve(&self, coordinates: Coordinates) -> UpstreamOutcome<LocationRecord> {
        let candidates = self.reverse.reverse_geocode(coordinates).await?;

        first_candidate(candidates).ok_or_else(|| {
            UpstreamError::not_found(
                UpstreamStage::ReverseLocation,
                format!("no location found at ({})", coordinates.format()),
            )
        })
    }
}

/// Candidates arrive best match first
fn first_candidate(candidates: Vec<LocationRecord>) -> Option<LocationRecord> {
    candidates.into_iter().next()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::STATE_NOT_APPLICABLE;
    use crate::upstream::mock::{MockProvider, gloucester};
    use axum::http::StatusCode;
    use rstest::rstest;

    fn resolver(provider: &Arc<MockProvider>) -> CoordinateResolver {
        CoordinateResolver::new(provider.clone(), provider.clone(), "US")
    }

    #[rstest]
    #[case("01930", LocationQueryKind::PostalCode("01930".into()))]
    #[case("01930,US", LocationQueryKind::PostalCode("01930,US".into()))]
    #[case("123456", LocationQueryKind::PostalCode("123456".into()))]
    #[case("1234", LocationQueryKind::Place("1234".into()))]
    #[case("Gloucester", LocationQueryKind::Place("Gloucester".into()))]
    #[case("Gloucester,MA", LocationQueryKind::Place("Gloucester,MA,US".into()))]
    #[case(" Gloucester , MA ", LocationQueryKind::Place("Gloucester,MA,US".into()))]
    #[case("New York", LocationQueryKind::Place("NewYork".into()))]
    #[case("New York, NY", LocationQueryKind::Place("NewYork,NY,US".into()))]
    #[case("MA 01930", LocationQueryKind::Place("MA01930".into()))]
    fn test_query_kind(#[case] raw: &str, #[case] expected: LocationQueryKind) {
        assert_eq!(LocationQueryKind::parse(raw, "US"), expected);
    }

    #[tokio::test]
    async fn test_postal_code_uses_postal_path_with_sentinel() {
        let provider = Arc::new(MockProvider::new());

        let location = resolver(&provider).resolve("01930").await.unwrap();

        assert_eq!(provider.postal_queries(), vec!["01930"]);
        assert!(provider.text_queries().is_empty());
        assert_eq!(location.state.as_deref(), Some(STATE_NOT_APPLICABLE));
    }

    #[rstest]
    #[case("Gloucester,MA", "Gloucester,MA,US")]
    #[case("Gloucester, MA", "Gloucester,MA,US")]
    #[case("Gloucester", "Gloucester")]
    #[tokio::test]
    async fn test_place_name_qualifier(#[case] raw: &str, #[case] expected: &str) {
        let provider = Arc::new(MockProvider::new());

        let location = resolver(&provider).resolve(raw).await.unwrap();

        assert_eq!(provider.text_queries(), vec![expected]);
        assert!(provider.postal_queries().is_empty());
        assert_eq!(location, gloucester());
    }

    #[tokio::test]
    async fn test_empty_candidates_is_not_found() {
        let provider = Arc::new(MockProvider::new().with_direct(Ok(vec![])));

        let err = resolver(&provider).resolve("Atlantis").await.unwrap_err();

        assert_eq!(err.status, StatusCode::NOT_FOUND);
        assert_eq!(err.stage, UpstreamStage::Location);
        assert!(err.message.contains("Atlantis"));
    }

    #[tokio::test]
    async fn test_upstream_error_is_returned_unchanged() {
        let failure = UpstreamError::new(UpstreamStage::Location, StatusCode::BAD_REQUEST, "bad zip");
        let provider = Arc::new(MockProvider::new().with_zip(Err(failure.clone())));

        let err = resolver(&provider).resolve("99999").await.unwrap_err();

        assert_eq!(err, failure);
    }

    #[tokio::test]
    async fn test_reverse_resolver_takes_first_candidate() {
        let other = LocationRecord::new("Rockport", "US", Some("Massachusetts"), 42.65, -70.62);
        let provider = Arc::new(MockProvider::new().with_reverse(Ok(vec![gloucester(), other])));

        let location = ReverseCoordinateResolver::new(provider.clone())
            .resolve(Coordinates::new(42.6208, -70.6721))
            .await
            .unwrap();

        assert_eq!(location, gloucester());
        assert_eq!(provider.reverse_count(), 1);
    }

    #[tokio::test]
    async fn test_reverse_resolver_empty_is_not_found() {
        let provider = Arc::new(MockProvider::new().with_reverse(Ok(vec![])));

        let err = ReverseCoordinateResolver::new(provider)
            .resolve(Coordinates::new(0.0, 0.0))
            .await
            .unwrap_err();

        assert_eq!(err.status, StatusCode::NOT_FOUND);
        assert_eq!(err.stage, UpstreamStage::ReverseLocation);
    }
}
