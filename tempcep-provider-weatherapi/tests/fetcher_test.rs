use httpmock::prelude::*;
use reqwest::Client;
use tempcep_core::{City, PortError, TemperatureFetcher};
use tempcep_provider_weatherapi::WeatherApiFetcher;

const API_KEY: &str = "test-api-key";

fn fetcher(server: &MockServer, api_key: &str) -> WeatherApiFetcher {
    WeatherApiFetcher::with_base_url(Client::new(), api_key, server.base_url())
}

fn city(name: &str) -> City {
    City::new(name).expect("non-empty city")
}

#[tokio::test]
async fn returns_current_celsius() {
    let server = MockServer::start_async().await;
    let current = server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/v1/current.json")
                .query_param("key", API_KEY)
                .query_param("q", "São Paulo")
                .query_param("aqi", "no");
            then.status(200).json_body(serde_json::json!({
                "location": {"name": "Sao Paulo"},
                "current": {"temp_c": 25.5, "temp_f": 77.9}
            }));
        })
        .await;

    let celsius = fetcher(&server, API_KEY)
        .fetch(&city("São Paulo"))
        .await
        .expect("temperature should be returned");

    assert!((celsius - 25.5).abs() < f64::EPSILON, "temp_c is returned");
    current.assert_hits_async(1).await;
}

#[tokio::test]
async fn missing_key_makes_no_request() {
    let server = MockServer::start_async().await;
    let current = server
        .mock_async(|when, then| {
            when.method(GET);
            then.status(200).json_body(serde_json::json!({"current": {"temp_c": 20.0}}));
        })
        .await;

    let err = fetcher(&server, "")
        .fetch(&city("São Paulo"))
        .await
        .expect_err("no credential configured");

    assert!(matches!(err, PortError::MissingCredential), "got {err:?}");
    assert!(err.to_string().contains("key is missing"), "message names the key");
    current.assert_hits_async(0).await;
}

#[tokio::test]
async fn non_ok_status_carries_backend_message() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/v1/current.json");
            then.status(400).json_body(serde_json::json!({
                "error": {"code": 1006, "message": "No matching location found."}
            }));
        })
        .await;

    let err = fetcher(&server, API_KEY)
        .fetch(&city("InvalidCity"))
        .await
        .expect_err("backend rejects the city");

    assert!(err.is_upstream_failure(), "got {err:?}");
    assert!(
        err.to_string().contains("status 400 - No matching location found."),
        "message was {err}"
    );
}

#[tokio::test]
async fn non_ok_status_without_message_falls_back_to_status() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/v1/current.json");
            then.status(502).body("Bad Gateway");
        })
        .await;

    let err = fetcher(&server, API_KEY)
        .fetch(&city("London"))
        .await
        .expect_err("gateway failure");

    match &err {
        PortError::UpstreamStatus { status, detail } => {
            assert_eq!(*status, 502, "status is carried");
            assert!(detail.is_empty(), "no backend message");
            assert_eq!(err.to_string(), "status 502", "display falls back to status");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn undecodable_body_is_malformed() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/v1/current.json");
            then.status(200).json_body(serde_json::json!({"current": {"temp_f": 70.0}}));
        })
        .await;

    let err = fetcher(&server, API_KEY)
        .fetch(&city("London"))
        .await
        .expect_err("temp_c is missing");

    assert!(matches!(err, PortError::MalformedResponse(_)), "got {err:?}");
}

#[tokio::test]
async fn unreachable_backend_is_network_error() {
    let fetcher = WeatherApiFetcher::with_base_url(Client::new(), API_KEY, "http://127.0.0.1:1");

    let err = fetcher
        .fetch(&city("London"))
        .await
        .expect_err("nothing listens on port 1");

    assert!(matches!(err, PortError::Network(_)), "got {err:?}");
}
