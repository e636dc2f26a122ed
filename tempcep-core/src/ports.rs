//! Traits describing the lookup backends and the errors they share.

use async_trait::async_trait;
use reqwest::Error as ReqwestError;

use crate::model::City;

#[derive(thiserror::Error, Debug)]
/// Errors that can occur while talking to the lookup backends.
pub enum PortError {
    /// Postal code is not exactly eight digits.
    #[error("invalid zipcode")]
    InvalidPostalCode,
    /// Directory service has no entry for the postal code.
    #[error("can not find zipcode")]
    PostalCodeNotFound,
    /// Weather service credential was not configured.
    #[error("weather API key is missing")]
    MissingCredential,
    /// Network layer failed.
    #[error("Network error: {0}")]
    Network(#[from] ReqwestError),
    /// Backend answered with a non-success status.
    #[error("status {status}{}", detail_suffix(.detail))]
    UpstreamStatus {
        /// HTTP status returned by the backend.
        status: u16,
        /// Body excerpt or backend-provided message, possibly empty.
        detail: String,
    },
    /// Backend answered 200 but the body could not be used.
    #[error("Malformed response: {0}")]
    MalformedResponse(String),
}

impl PortError {
    /// Whether the error originates from the remote backend rather than from
    /// the caller's input or local configuration.
    #[must_use]
    pub fn is_upstream_failure(&self) -> bool {
        matches!(
            self,
            Self::Network(_) | Self::UpstreamStatus { .. } | Self::MalformedResponse(_)
        )
    }
}

fn detail_suffix(detail: &str) -> String {
    if detail.is_empty() {
        String::new()
    } else {
        format!(" - {detail}")
    }
}

#[async_trait]
/// Directory backend translating postal codes into city names.
pub trait LocationResolver: Send + Sync {
    /// Resolve the city for a raw postal code.
    ///
    /// Implementations validate the shape with
    /// [`PostalCode::parse`](crate::model::PostalCode::parse) before issuing
    /// any request.
    ///
    /// # Errors
    ///
    /// Returns [`PortError::InvalidPostalCode`] for malformed input,
    /// [`PortError::PostalCodeNotFound`] when the directory has no entry, and
    /// an upstream variant when the backend call fails.
    async fn resolve(&self, postal_code: &str) -> Result<City, PortError>;
}

#[async_trait]
/// Weather backend reporting the current temperature of a city.
pub trait TemperatureFetcher: Send + Sync {
    /// Fetch the current temperature in degrees Celsius.
    ///
    /// # Errors
    ///
    /// Returns [`PortError::MissingCredential`] when no credential is set and
    /// an upstream variant when the backend call fails.
    async fn fetch(&self, city: &City) -> Result<f64, PortError>;
}
