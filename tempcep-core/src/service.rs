//! High-level service facade chaining the location and weather lookups.

use std::sync::Arc;

use crate::model::{City, ConvertedTemperature};
use crate::ports::{LocationResolver, PortError, TemperatureFetcher};

#[derive(thiserror::Error, Debug)]
/// Failure of a lookup, tagged with the stage that produced it.
pub enum LookupError {
    /// Resolving the postal code failed.
    #[error("location lookup failed: {0}")]
    Location(#[source] PortError),
    /// Fetching the temperature failed after the city was resolved.
    #[error("weather lookup for {city} failed: {source}")]
    Weather {
        /// City that was being looked up.
        city: City,
        /// Underlying backend error.
        #[source]
        source: PortError,
    },
}

impl LookupError {
    /// Underlying backend error regardless of stage.
    #[must_use]
    pub fn port_error(&self) -> &PortError {
        match self {
            Self::Location(err) | Self::Weather { source: err, .. } => err,
        }
    }
}

/// Public entry point resolving a postal code to a converted temperature.
pub struct WeatherService {
    locations: Arc<dyn LocationResolver>,
    temperatures: Arc<dyn TemperatureFetcher>,
}

impl WeatherService {
    /// Create a new service bound to the provided backends.
    #[must_use]
    pub fn new(
        locations: Arc<dyn LocationResolver>,
        temperatures: Arc<dyn TemperatureFetcher>,
    ) -> Self {
        Self {
            locations,
            temperatures,
        }
    }

    /// Resolve the city for `postal_code`, fetch its temperature and convert it.
    ///
    /// The weather backend is only called once a city has been resolved.
    ///
    /// # Errors
    ///
    /// Returns [`LookupError::Location`] when the postal code is invalid,
    /// unknown, or the directory call fails, and [`LookupError::Weather`] when
    /// the temperature cannot be fetched.
    pub async fn weather_for(&self, postal_code: &str) -> Result<ConvertedTemperature, LookupError> {
        let city = self
            .locations
            .resolve(postal_code)
            .await
            .map_err(LookupError::Location)?;

        let celsius = match self.temperatures.fetch(&city).await {
            Ok(celsius) => celsius,
            Err(source) => return Err(LookupError::Weather { city, source }),
        };

        Ok(ConvertedTemperature::for_city(city.into_inner(), celsius))
    }
}
