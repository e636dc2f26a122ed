//! Location provider backed by the `ViaCEP` postal code directory.

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Deserializer};

use tempcep_core::{
    model::{City, PostalCode},
    ports::{LocationResolver, PortError},
};

/// Public `ViaCEP` endpoint.
pub const DEFAULT_BASE_URL: &str = "https://viacep.com.br";

/// Longest body excerpt carried in an upstream error.
const BODY_EXCERPT_LIMIT: usize = 200;

/// Response from /ws/{cep}/json/
#[derive(Debug, Deserialize)]
struct LookupResponse {
    #[serde(rename = "localidade", default)]
    city: Option<String>,

    #[serde(rename = "erro", default, deserialize_with = "deserialize_error_flag")]
    not_found: bool,
    // uf, bairro, logradouro... are not needed
}

/// `ViaCEP` has been observed to send the miss marker both as `true` and as `"true"`.
#[derive(Deserialize)]
#[serde(untagged)]
enum ErrorFlag {
    Bool(bool),
    Text(String),
}

fn deserialize_error_flag<'de, D: Deserializer<'de>>(deserializer: D) -> Result<bool, D::Error> {
    let flag = Option::<ErrorFlag>::deserialize(deserializer)?;
    Ok(match flag {
        Some(ErrorFlag::Bool(set)) => set,
        Some(ErrorFlag::Text(text)) => text.trim().eq_ignore_ascii_case("true"),
        None => false,
    })
}

/// Postal code lookup against `ViaCEP`.
pub struct ViaCepResolver {
    client: Client,
    base_url: String,
}

impl ViaCepResolver {
    /// Create a resolver for the public `ViaCEP` endpoint.
    #[must_use]
    pub fn new(client: Client) -> Self {
        Self::with_base_url(client, DEFAULT_BASE_URL)
    }

    /// Create a resolver for an alternative endpoint (mirrors, tests).
    #[must_use]
    pub fn with_base_url<S: Into<String>>(client: Client, base_url: S) -> Self {
        let mut base_url = base_url.into();
        while base_url.ends_with('/') {
            base_url.pop();
        }
        Self { client, base_url }
    }

    fn lookup_url(&self, postal_code: &PostalCode) -> String {
        format!("{}/ws/{postal_code}/json/", self.base_url)
    }
}

#[async_trait]
impl LocationResolver for ViaCepResolver {
    async fn resolve(&self, postal_code: &str) -> Result<City, PortError> {
        let postal_code = PostalCode::parse(postal_code)?;
        let url = self.lookup_url(&postal_code);

        tracing::debug!(%postal_code, %url, "querying ViaCEP");

        let resp = self.client.get(&url).send().await?;
        let status = resp.status();
        let body = resp.text().await?;

        if status != StatusCode::OK {
            return Err(PortError::UpstreamStatus {
                status: status.as_u16(),
                detail: excerpt(&body),
            });
        }

        parse_lookup(&body)
    }
}

/// Turn a 200 body into a city, a miss, or a malformed-response error.
fn parse_lookup(body: &str) -> Result<City, PortError> {
    let lookup: LookupResponse = serde_json::from_str(body)
        .map_err(|err| PortError::MalformedResponse(format!("ViaCEP body: {err}")))?;

    if lookup.not_found {
        return Err(PortError::PostalCodeNotFound);
    }

    lookup
        .city
        .and_then(City::new)
        .ok_or_else(|| PortError::MalformedResponse("ViaCEP returned no city name".into()))
}

fn excerpt(body: &str) -> String {
    match body.char_indices().nth(BODY_EXCERPT_LIMIT) {
        Some((cut, _)) => format!("{}...", body.get(..cut).unwrap_or(body)),
        None => body.to_owned(),
    }
}
