//! Domain data structures for postal codes, cities, and temperature readings.

use std::fmt;

use serde::{Serialize, Serializer};

use crate::ports::PortError;

/// Number of digits in a valid postal code.
pub const POSTAL_CODE_LEN: usize = 8;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
/// Postal code made of exactly eight ASCII digits.
///
/// Only obtainable through [`PostalCode::parse`], so holding one means the
/// shape has already been checked.
pub struct PostalCode(String);

impl PostalCode {
    /// Validate and wrap a raw postal code.
    ///
    /// No trimming or normalisation happens: `"01001-000"` and `" 01001000"`
    /// are both rejected.
    ///
    /// # Errors
    ///
    /// Returns [`PortError::InvalidPostalCode`] unless the input is exactly
    /// eight ASCII digits.
    pub fn parse(raw: &str) -> Result<Self, PortError> {
        if raw.len() == POSTAL_CODE_LEN && raw.bytes().all(|byte| byte.is_ascii_digit()) {
            Ok(Self(raw.to_owned()))
        } else {
            Err(PortError::InvalidPostalCode)
        }
    }

    /// Borrow the digits.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PostalCode {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
/// Name of a city as returned by the directory service.
pub struct City(String);

impl City {
    /// Wrap a city name, rejecting empty or blank names.
    #[must_use]
    pub fn new<S: Into<String>>(name: S) -> Option<Self> {
        let name = name.into();
        if name.trim().is_empty() {
            None
        } else {
            Some(Self(name))
        }
    }

    /// Borrow the name.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consume the wrapper and return the name.
    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for City {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
/// A temperature expressed in the three supported scales.
pub struct ConvertedTemperature {
    /// City the reading belongs to, when known.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    /// Degrees Celsius.
    #[serde(rename = "temp_C", serialize_with = "serialize_compact")]
    pub celsius: f64,
    /// Degrees Fahrenheit.
    #[serde(rename = "temp_F", serialize_with = "serialize_compact")]
    pub fahrenheit: f64,
    /// Kelvin.
    #[serde(rename = "temp_K", serialize_with = "serialize_compact")]
    pub kelvin: f64,
}

/// Largest magnitude below which every integer is exactly representable in `f64`.
const EXACT_INTEGER_LIMIT: f64 = 9_007_199_254_740_992.0;

/// Write integral readings without a fractional part (`25` rather than `25.0`).
fn serialize_compact<S: Serializer>(value: &f64, serializer: S) -> Result<S::Ok, S::Error> {
    if value.fract() == 0.0 && value.abs() < EXACT_INTEGER_LIMIT {
        #[expect(
            clippy::cast_possible_truncation,
            reason = "value is integral and within the exact f64 integer range"
        )]
        let whole = *value as i64;
        serializer.serialize_i64(whole)
    } else {
        serializer.serialize_f64(*value)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
/// Body returned for every failed request.
pub struct ErrorResponse {
    /// Human-readable reason.
    pub message: String,
}

impl ErrorResponse {
    /// Build a response from any message.
    #[must_use]
    pub fn new<S: Into<String>>(message: S) -> Self {
        Self {
            message: message.into(),
        }
    }
}
