//! Server configuration: defaults, optional TOML file, optional `.env` file, environment overrides.

use std::collections::HashMap;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use reqwest::Url;
use serde::Deserialize;

/// Port used when nothing else is configured.
pub const DEFAULT_PORT: u16 = 8080;

/// Errors raised while loading configuration.
#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    /// The config file exists but could not be read.
    #[error("failed to read {}: {source}", path.display())]
    Io {
        /// File that was being read.
        path: PathBuf,
        /// Underlying IO error.
        source: std::io::Error,
    },
    /// The `.env` file exists but could not be read or parsed.
    #[error("failed to load env file {}: {source}", path.display())]
    EnvFile {
        /// File that was being read.
        path: PathBuf,
        /// Underlying dotenv error.
        source: dotenvy::Error,
    },
    /// The config file is not valid TOML for [`ServerConfig`].
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
    /// A setting holds an unusable value.
    #[error("invalid value {value:?} for {key}: {reason}")]
    InvalidValue {
        /// Setting name.
        key: &'static str,
        /// Offending value.
        value: String,
        /// Why it was rejected.
        reason: String,
    },
}

/// Runtime settings for the HTTP server and its backends.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ServerConfig {
    /// `WeatherAPI` credential. Empty means every weather lookup fails.
    pub weather_api_key: String,
    /// Port the HTTP listener binds to.
    pub web_server_port: u16,
    /// Base URL of the `ViaCEP` directory.
    pub viacep_base_url: String,
    /// Base URL of `WeatherAPI`.
    pub weatherapi_base_url: String,
    /// Per-request timeout for outbound calls; `None` keeps the client default.
    pub request_timeout_secs: Option<u64>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            weather_api_key: String::new(),
            web_server_port: DEFAULT_PORT,
            viacep_base_url: tempcep_provider_viacep::DEFAULT_BASE_URL.to_owned(),
            weatherapi_base_url: tempcep_provider_weatherapi::DEFAULT_BASE_URL.to_owned(),
            request_timeout_secs: None,
        }
    }
}

impl ServerConfig {
    /// Load defaults, then `path` if it exists, then the environment.
    ///
    /// Environment values come from the process first and from `env_file`
    /// second, so a variable already exported is never shadowed by the file.
    /// Either file may be absent.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] when a file cannot be read or parsed, or
    /// when a resulting value is invalid.
    pub fn load(path: &Path, env_file: &Path) -> Result<Self, ConfigError> {
        let mut config = match std::fs::read_to_string(path) {
            Ok(content) => Self::from_toml_str(&content)?,
            Err(err) if err.kind() == ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "no config file, using defaults");
                Self::default()
            }
            Err(source) => {
                return Err(ConfigError::Io {
                    path: path.to_path_buf(),
                    source,
                });
            }
        };

        let file_vars = read_env_file(env_file)?;
        config.apply_env(|key| std::env::var(key).ok().or_else(|| file_vars.get(key).cloned()))?;
        config.validate()?;
        Ok(config)
    }

    /// Parse a TOML document; missing keys keep their defaults.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] for malformed TOML or unknown keys.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    /// Override settings from environment-style variables.
    ///
    /// Recognised keys: `WEATHER_API_KEY`, `WEB_SERVER_PORT`,
    /// `VIACEP_BASE_URL`, `WEATHERAPI_BASE_URL`, `REQUEST_TIMEOUT_SECS`.
    /// Empty values are ignored.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidValue`] when a numeric variable does not parse.
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        if let Some(key) = var("WEATHER_API_KEY") {
            self.weather_api_key = key;
        }
        if let Some(port) = var("WEB_SERVER_PORT") {
            self.web_server_port = parse_number("WEB_SERVER_PORT", &port)?;
        }
        if let Some(url) = var("VIACEP_BASE_URL") {
            self.viacep_base_url = url;
        }
        if let Some(url) = var("WEATHERAPI_BASE_URL") {
            self.weatherapi_base_url = url;
        }
        if let Some(secs) = var("REQUEST_TIMEOUT_SECS") {
            self.request_timeout_secs = Some(parse_number("REQUEST_TIMEOUT_SECS", &secs)?);
        }
        Ok(())
    }

    /// Check that URLs are usable and numbers are in range.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidValue`] for the first bad setting.
    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_url("viacep_base_url", &self.viacep_base_url)?;
        validate_url("weatherapi_base_url", &self.weatherapi_base_url)?;

        if self.request_timeout_secs == Some(0) {
            return Err(ConfigError::InvalidValue {
                key: "request_timeout_secs",
                value: "0".to_owned(),
                reason: "timeout must be at least one second".to_owned(),
            });
        }
        Ok(())
    }

    /// Whether a weather credential is configured.
    #[must_use]
    pub fn has_weather_api_key(&self) -> bool {
        !self.weather_api_key.trim().is_empty()
    }
}

/// Read `KEY=value` pairs from a dotenv file without touching the process environment.
///
/// A missing file yields no variables.
///
/// # Errors
///
/// Returns [`ConfigError::EnvFile`] when the file cannot be read or has a malformed line.
pub fn read_env_file(path: &Path) -> Result<HashMap<String, String>, ConfigError> {
    let env_file_error = |source| ConfigError::EnvFile {
        path: path.to_path_buf(),
        source,
    };

    let entries = match dotenvy::from_path_iter(path) {
        Ok(entries) => entries,
        Err(err) if err.not_found() => {
            tracing::debug!(path = %path.display(), "no env file");
            return Ok(HashMap::new());
        }
        Err(err) => return Err(env_file_error(err)),
    };

    entries.collect::<Result<_, _>>().map_err(env_file_error)
}

fn parse_number<T: std::str::FromStr>(key: &'static str, raw: &str) -> Result<T, ConfigError>
where
    T::Err: std::fmt::Display,
{
    raw.trim().parse().map_err(|err: T::Err| ConfigError::InvalidValue {
        key,
        value: raw.to_owned(),
        reason: err.to_string(),
    })
}

fn validate_url(key: &'static str, raw: &str) -> Result<(), ConfigError> {
    let invalid = |reason: String| ConfigError::InvalidValue {
        key,
        value: raw.to_owned(),
        reason,
    };

    let url = Url::parse(raw).map_err(|err| invalid(err.to_string()))?;
    match url.scheme() {
        "http" | "https" => Ok(()),
        scheme => Err(invalid(format!("unsupported scheme {scheme}"))),
    }
}
