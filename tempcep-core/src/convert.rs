//! Celsius to Fahrenheit/Kelvin conversion.

use crate::model::ConvertedTemperature;

/// Offset between the Celsius and Kelvin scales.
pub const KELVIN_OFFSET: f64 = 273.15;

/// Convert a Celsius reading into all three scales without rounding.
#[must_use]
pub fn convert(celsius: f64) -> ConvertedTemperature {
    ConvertedTemperature {
        city: None,
        celsius,
        fahrenheit: celsius * 1.8 + 32.0,
        kelvin: celsius + KELVIN_OFFSET,
    }
}

impl ConvertedTemperature {
    /// Convert a reading and tag it with the city it was taken for.
    #[must_use]
    pub fn for_city<S: Into<String>>(city: S, celsius: f64) -> Self {
        Self {
            city: Some(city.into()),
            ..convert(celsius)
        }
    }
}
