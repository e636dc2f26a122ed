//! Mapping of lookup failures to HTTP responses.

use std::any::Any;

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use tempcep_core::{model::ErrorResponse, ports::PortError, service::LookupError};

pub(crate) const INVALID_ZIPCODE: &str = "invalid zipcode";
pub(crate) const ZIPCODE_NOT_FOUND: &str = "can not find zipcode";
pub(crate) const MISSING_ZIPCODE: &str = "CEP parameter is missing";
pub(crate) const LOCATION_FAILURE: &str = "Internal server error while fetching location";
pub(crate) const WEATHER_FAILURE: &str = "Internal server error while fetching weather data";
pub(crate) const INTERNAL_FAILURE: &str = "Internal server error";

/// Error returned by the weather handler.
#[derive(Debug)]
pub enum ApiError {
    /// Request path carried no postal code.
    MissingPostalCode,
    /// Path segment could not be decoded into a string at all.
    UndecodablePath(String),
    /// One of the lookup stages failed.
    Lookup {
        /// Postal code from the request path, for logging.
        postal_code: String,
        /// Stage-tagged failure.
        error: LookupError,
    },
}

impl ApiError {
    /// Status code and caller-visible message. Upstream details never leak here.
    #[must_use]
    pub fn status_and_message(&self) -> (StatusCode, &'static str) {
        match self {
            Self::MissingPostalCode => (StatusCode::BAD_REQUEST, MISSING_ZIPCODE),
            Self::UndecodablePath(_) => (StatusCode::UNPROCESSABLE_ENTITY, INVALID_ZIPCODE),
            Self::Lookup { error, .. } => match error {
                LookupError::Location(PortError::InvalidPostalCode) => {
                    (StatusCode::UNPROCESSABLE_ENTITY, INVALID_ZIPCODE)
                }
                LookupError::Location(PortError::PostalCodeNotFound) => {
                    (StatusCode::NOT_FOUND, ZIPCODE_NOT_FOUND)
                }
                LookupError::Location(_) => (StatusCode::INTERNAL_SERVER_ERROR, LOCATION_FAILURE),
                LookupError::Weather { .. } => (StatusCode::INTERNAL_SERVER_ERROR, WEATHER_FAILURE),
            },
        }
    }

    fn log(&self) {
        match self {
            Self::MissingPostalCode => tracing::debug!("request without postal code"),
            Self::UndecodablePath(reason) => {
                tracing::info!(stage = "location", %reason, "postal code rejected");
            }
            Self::Lookup { postal_code, error } => match error {
                LookupError::Location(
                    err @ (PortError::InvalidPostalCode | PortError::PostalCodeNotFound),
                ) => {
                    tracing::info!(
                        stage = "location",
                        cep = %postal_code,
                        error = %err,
                        "postal code rejected"
                    );
                }
                LookupError::Location(err) => {
                    tracing::error!(
                        stage = "location",
                        cep = %postal_code,
                        error = %err,
                        "location lookup failed"
                    );
                }
                LookupError::Weather { city, source } => {
                    tracing::error!(
                        stage = "weather",
                        cep = %postal_code,
                        %city,
                        error = %source,
                        "weather lookup failed"
                    );
                }
            },
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        self.log();
        let (status, message) = self.status_and_message();
        (status, Json(ErrorResponse::new(message))).into_response()
    }
}

/// Answer a request whose handler panicked with the generic 500 body.
pub(crate) fn panic_response(panic: Box<dyn Any + Send + 'static>) -> Response {
    let detail = match panic.downcast::<String>() {
        Ok(message) => *message,
        Err(panic) => panic
            .downcast::<&str>()
            .map_or_else(|_| "non-string panic payload".to_owned(), |message| (*message).to_owned()),
    };
    tracing::error!(panic = %detail, "request handler panicked");

    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ErrorResponse::new(INTERNAL_FAILURE)),
    )
        .into_response()
}
