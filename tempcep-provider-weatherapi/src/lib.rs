//! Temperature provider backed by the `WeatherAPI` current-conditions endpoint.

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Deserialize;

use tempcep_core::{
    model::City,
    ports::{PortError, TemperatureFetcher},
};

/// Public `WeatherAPI` endpoint.
pub const DEFAULT_BASE_URL: &str = "http://api.weatherapi.com";

/// Response from /v1/current.json
#[derive(Debug, Deserialize)]
struct CurrentResponse {
    current: Current,
    // location, condition... are ignored
}

/// Nested current-conditions object.
#[derive(Debug, Deserialize)]
struct Current {
    temp_c: f64,
}

/// Error envelope sent with non-200 answers, e.g. `{"error": {"code": 1006, "message": "..."}}`.
#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: String,
}

/// Current temperature lookup against `WeatherAPI`.
pub struct WeatherApiFetcher {
    client: Client,
    api_key: String,
    base_url: String,
}

impl WeatherApiFetcher {
    /// Create a fetcher for the public `WeatherAPI` endpoint.
    ///
    /// An empty key is accepted here; every [`fetch`](TemperatureFetcher::fetch)
    /// then fails with [`PortError::MissingCredential`].
    #[must_use]
    pub fn new<K: Into<String>>(client: Client, api_key: K) -> Self {
        Self::with_base_url(client, api_key, DEFAULT_BASE_URL)
    }

    /// Create a fetcher for an alternative endpoint (mirrors, tests).
    #[must_use]
    pub fn with_base_url<K: Into<String>, U: Into<String>>(
        client: Client,
        api_key: K,
        base_url: U,
    ) -> Self {
        let mut base_url = base_url.into();
        while base_url.ends_with('/') {
            base_url.pop();
        }
        Self {
            client,
            api_key: api_key.into(),
            base_url,
        }
    }

    /// Whether a usable credential was configured.
    #[must_use]
    pub fn has_credential(&self) -> bool {
        !self.api_key.trim().is_empty()
    }
}

#[async_trait]
impl TemperatureFetcher for WeatherApiFetcher {
    async fn fetch(&self, city: &City) -> Result<f64, PortError> {
        if !self.has_credential() {
            return Err(PortError::MissingCredential);
        }

        tracing::debug!(%city, "querying WeatherAPI");

        let resp = self
            .client
            .get(format!("{}/v1/current.json", self.base_url))
            .query(&[
                ("key", self.api_key.as_str()),
                ("q", city.as_str()),
                ("aqi", "no"),
            ])
            .send()
            .await?;

        let status = resp.status();
        let body = resp.text().await?;

        if status != StatusCode::OK {
            return Err(PortError::UpstreamStatus {
                status: status.as_u16(),
                detail: error_message(&body).unwrap_or_default(),
            });
        }

        serde_json::from_str::<CurrentResponse>(&body)
            .map(|parsed| parsed.current.temp_c)
            .map_err(|err| PortError::MalformedResponse(format!("WeatherAPI body: {err}")))
    }
}

/// Pull `error.message` out of a failure body, if it has one.
fn error_message(body: &str) -> Option<String> {
    serde_json::from_str::<ErrorEnvelope>(body)
        .ok()
        .map(|envelope| envelope.error.message)
        .filter(|message| !message.is_empty())
}
