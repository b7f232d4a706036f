//! Error types and handling for `WeatherBack`
//!
//! Every upstream call is normalized into an [`UpstreamOutcome`] at the call
//! site. The aggregator only ever looks at that pair and never at raw
//! transport errors.

use std::fmt;

use axum::{
    Json,
    extract::rejection::{PathRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::{Value, json};
use thiserror::Error;

/// Which upstream call produced a failure
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpstreamStage {
    /// Postal-code or free-text geocoding
    Location,
    /// Reverse geocoding of a coordinate pair
    ReverseLocation,
    /// One-call forecast
    Forecast,
}

impl UpstreamStage {
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            UpstreamStage::Location => "location",
            UpstreamStage::ReverseLocation => "reverse_location",
            UpstreamStage::Forecast => "forecast",
        }
    }
}

impl fmt::Display for UpstreamStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            UpstreamStage::Location => "location lookup",
            UpstreamStage::ReverseLocation => "reverse location lookup",
            UpstreamStage::Forecast => "forecast lookup",
        };
        f.write_str(label)
    }
}

/// Failure half of an upstream outcome, always paired with a status code
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{stage} failed: {message}")]
pub struct UpstreamError {
    pub stage: UpstreamStage,
    pub status: StatusCode,
    pub message: String,
}

impl UpstreamError {
    pub fn new<S: Into<String>>(stage: UpstreamStage, status: StatusCode, message: S) -> Self {
        Self {
            stage,
            status,
            message: message.into(),
        }
    }

    /// The upstream answered successfully but had no matching record
    pub fn not_found<S: Into<String>>(stage: UpstreamStage, message: S) -> Self {
        Self::new(stage, StatusCode::NOT_FOUND, message)
    }

    /// The call never produced a usable status (network failure, timeout,
    /// undecodable body)
    pub fn transport<S: Into<String>>(stage: UpstreamStage, message: S) -> Self {
        Self::new(stage, StatusCode::INTERNAL_SERVER_ERROR, message)
    }
}

/// Result of any upstream call
pub type UpstreamOutcome<T> = std::result::Result<T, UpstreamError>;

/// Main error type for the `WeatherBack` service
#[derive(Error, Debug)]
pub enum WeatherBackError {
    /// One or more required query parameters were absent
    #[error(
        "missing required parameter(s): {} (expected: {})",
        .missing.join(", "),
        .expected.join(", ")
    )]
    MissingParameters {
        missing: Vec<&'static str>,
        expected: &'static [&'static str],
    },

    /// A parameter was present but could not be interpreted
    #[error("invalid value for parameter '{name}': {message}")]
    InvalidParameter { name: &'static str, message: String },

    /// The query string or path could not be decoded at all
    #[error("malformed request: {message}")]
    MalformedRequest { message: String },

    /// An upstream call failed; its status passes through unchanged
    #[error(transparent)]
    Upstream(#[from] UpstreamError),

    /// Configuration-related errors
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// Anything else that went wrong while serving a request
    #[error("Internal error: {message}")]
    Internal { message: String, url: Option<String> },
}

impl WeatherBackError {
    pub fn missing(missing: Vec<&'static str>, expected: &'static [&'static str]) -> Self {
        Self::MissingParameters { missing, expected }
    }

    pub fn invalid_parameter<S: Into<String>>(name: &'static str, message: S) -> Self {
        Self::InvalidParameter {
            name,
            message: message.into(),
        }
    }

    pub fn malformed<S: Into<String>>(message: S) -> Self {
        Self::MalformedRequest {
            message: message.into(),
        }
    }

    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    pub fn internal<S: Into<String>>(message: S, url: Option<String>) -> Self {
        Self::Internal {
            message: message.into(),
            url,
        }
    }

    /// HTTP status this error is reported with
    #[must_use]
    pub fn status(&self) -> StatusCode {
        match self {
            WeatherBackError::MissingParameters { .. }
            | WeatherBackError::InvalidParameter { .. }
            | WeatherBackError::MalformedRequest { .. } => StatusCode::BAD_REQUEST,
            WeatherBackError::Upstream(err) => err.status,
            WeatherBackError::Config { .. } | WeatherBackError::Internal { .. } => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// JSON body sent to the client
    #[must_use]
    pub fn body(&self) -> Value {
        let mut body = json!({
            "error": self.to_string(),
            "status": self.status().as_u16(),
        });

        match self {
            WeatherBackError::MissingParameters { missing, .. } => {
                body["missing"] = json!(missing);
            }
            WeatherBackError::InvalidParameter { name, .. } => {
                body["parameter"] = json!(name);
            }
            WeatherBackError::Upstream(err) => {
                body["stage"] = json!(err.stage.as_str());
            }
            WeatherBackError::Internal { url: Some(url), .. } => {
                body["url"] = json!(url);
            }
            WeatherBackError::Internal { url: None, .. }
            | WeatherBackError::MalformedRequest { .. }
            | WeatherBackError::Config { .. } => {}
        }

        body
    }
}

impl From<QueryRejection> for WeatherBackError {
    fn from(rejection: QueryRejection) -> Self {
        Self::malformed(rejection.body_text())
    }
}

impl From<PathRejection> for WeatherBackError {
    fn from(rejection: PathRejection) -> Self {
        Self::malformed(rejection.body_text())
    }
}

impl IntoResponse for WeatherBackError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(status = status.as_u16(), "{}", self);
        } else {
            tracing::warn!(status = status.as_u16(), "{}", self);
        }
        (status, Json(self.body())).into_response()
    }
}
