//! Construction of the shared HTTP client and the weather service.

use std::sync::Arc;
use std::time::Duration;

use reqwest::Client;
use tempcep_core::service::WeatherService;
use tempcep_provider_viacep::ViaCepResolver;
use tempcep_provider_weatherapi::WeatherApiFetcher;

use crate::config::ServerConfig;

/// User agent sent to both backends.
const USER_AGENT: &str = concat!("tempcep/", env!("CARGO_PKG_VERSION"));

/// Build the shared HTTP client honouring the configured timeout.
///
/// # Errors
///
/// Returns a [`reqwest::Error`] when the TLS backend cannot be initialised.
pub fn http_client(config: &ServerConfig) -> Result<Client, reqwest::Error> {
    let mut builder = Client::builder().user_agent(USER_AGENT);
    if let Some(secs) = config.request_timeout_secs {
        builder = builder.timeout(Duration::from_secs(secs));
    }
    builder.build()
}

/// Wire the `ViaCEP` and `WeatherAPI` providers into a [`WeatherService`].
///
/// # Errors
///
/// Returns a [`reqwest::Error`] when the HTTP client cannot be built.
pub fn build_service(config: &ServerConfig) -> Result<Arc<WeatherService>, reqwest::Error> {
    let client = http_client(config)?;

    let locations = Arc::new(ViaCepResolver::with_base_url(
        client.clone(),
        config.viacep_base_url.as_str(),
    ));
    let temperatures = Arc::new(WeatherApiFetcher::with_base_url(
        client,
        config.weather_api_key.as_str(),
        config.weatherapi_base_url.as_str(),
    ));

    Ok(Arc::new(WeatherService::new(locations, temperatures)))
}
