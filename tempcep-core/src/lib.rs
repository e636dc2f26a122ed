//! Core types and service wiring for the tempcep postal-code weather lookup.

/// Celsius to Fahrenheit/Kelvin conversion.
pub mod convert;
/// Domain models shared by all backends.
pub mod model;
/// Traits describing the backend interfaces.
pub mod ports;
/// High-level service facade used by the HTTP layer.
pub mod service;

pub use convert::convert;
pub use model::*;
pub use ports::*;
pub use service::*;
