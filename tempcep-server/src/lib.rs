//! HTTP front end for tempcep: configuration, logging, and routing.

/// Service wiring from configuration.
pub mod app;
/// Server settings.
pub mod config;
/// Lookup failure to HTTP response mapping.
pub mod error;
/// Tracing subscriber setup.
pub mod logging;
/// Axum routes.
pub mod routes;
