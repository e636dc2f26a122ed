//! HTTP routes: `GET /weather/{cep}` and `GET /health`.

use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Path, State, rejection::PathRejection},
    routing::get,
};
use tempcep_core::{model::ConvertedTemperature, service::WeatherService};
use tower_http::{catch_panic::CatchPanicLayer, trace::TraceLayer};

use crate::error::{self, ApiError};

/// Build the application router around a ready service.
pub fn router(service: Arc<WeatherService>) -> Router {
    Router::new()
        .route("/weather/{cep}", get(weather_by_cep))
        .route("/weather", get(missing_postal_code))
        .route("/weather/", get(missing_postal_code))
        .route("/health", get(health))
        .layer(CatchPanicLayer::custom(error::panic_response))
        .layer(TraceLayer::new_for_http())
        .with_state(service)
}

async fn weather_by_cep(
    State(service): State<Arc<WeatherService>>,
    cep: Result<Path<String>, PathRejection>,
) -> Result<Json<ConvertedTemperature>, ApiError> {
    let Path(cep) = cep.map_err(|rejection| ApiError::UndecodablePath(rejection.body_text()))?;
    if cep.is_empty() {
        return Err(ApiError::MissingPostalCode);
    }

    match service.weather_for(&cep).await {
        Ok(converted) => Ok(Json(converted)),
        Err(error) => Err(ApiError::Lookup {
            postal_code: cep,
            error,
        }),
    }
}

async fn missing_postal_code() -> ApiError {
    ApiError::MissingPostalCode
}

async fn health() -> &'static str {
    "OK"
}
