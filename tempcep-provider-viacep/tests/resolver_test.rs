use httpmock::prelude::*;
use reqwest::Client;
use tempcep_core::{LocationResolver, PortError};
use tempcep_provider_viacep::ViaCepResolver;

fn resolver(server: &MockServer) -> ViaCepResolver {
    ViaCepResolver::with_base_url(Client::new(), server.base_url())
}

#[tokio::test]
async fn resolves_city_for_known_postal_code() {
    let server = MockServer::start_async().await;
    let lookup = server
        .mock_async(|when, then| {
            when.method(GET).path("/ws/01001000/json/");
            then.status(200).json_body(serde_json::json!({
                "cep": "01001-000",
                "logradouro": "Praça da Sé",
                "localidade": "São Paulo",
                "uf": "SP"
            }));
        })
        .await;

    let city = resolver(&server)
        .resolve("01001000")
        .await
        .expect("city should resolve");

    assert_eq!(city.as_str(), "São Paulo", "localidade is returned");
    lookup.assert_hits_async(1).await;
}

#[tokio::test]
async fn invalid_postal_code_makes_no_request() {
    let server = MockServer::start_async().await;
    let lookup = server
        .mock_async(|when, then| {
            when.method(GET);
            then.status(200).json_body(serde_json::json!({"localidade": "São Paulo"}));
        })
        .await;
    let resolver = resolver(&server);

    for raw in ["12345", "123456789", "01001-000", "abcdefgh", ""] {
        let err = resolver.resolve(raw).await.expect_err("invalid shape");
        assert!(
            matches!(err, PortError::InvalidPostalCode),
            "{raw:?} gave {err:?}"
        );
    }

    lookup.assert_hits_async(0).await;
}

#[tokio::test]
async fn error_flag_means_not_found() {
    let server = MockServer::start_async().await;
    let lookup = server
        .mock_async(|when, then| {
            when.method(GET).path("/ws/99999999/json/");
            then.status(200).body("{\n  \"erro\": true\n}");
        })
        .await;

    let err = resolver(&server)
        .resolve("99999999")
        .await
        .expect_err("postal code is unknown");

    assert!(matches!(err, PortError::PostalCodeNotFound), "got {err:?}");
    lookup.assert_hits_async(1).await;
}

#[tokio::test]
async fn string_error_flag_means_not_found() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/ws/99999999/json/");
            then.status(200).json_body(serde_json::json!({"erro": "true"}));
        })
        .await;

    let err = resolver(&server)
        .resolve("99999999")
        .await
        .expect_err("postal code is unknown");

    assert!(matches!(err, PortError::PostalCodeNotFound), "got {err:?}");
}

#[tokio::test]
async fn non_ok_status_is_upstream_failure() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/ws/01001000/json/");
            then.status(500).body("server error");
        })
        .await;

    let err = resolver(&server)
        .resolve("01001000")
        .await
        .expect_err("upstream is down");

    match err {
        PortError::UpstreamStatus { status, detail } => {
            assert_eq!(status, 500, "status is carried");
            assert_eq!(detail, "server error", "body excerpt is carried");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn undecodable_body_is_malformed() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/ws/01001000/json/");
            then.status(200).body("<html>maintenance</html>");
        })
        .await;

    let err = resolver(&server)
        .resolve("01001000")
        .await
        .expect_err("body is not json");

    assert!(matches!(err, PortError::MalformedResponse(_)), "got {err:?}");
    assert!(err.is_upstream_failure(), "malformed bodies are upstream failures");
}

#[tokio::test]
async fn empty_city_is_malformed() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/ws/01001000/json/");
            then.status(200).json_body(serde_json::json!({"localidade": "", "uf": "SP"}));
        })
        .await;

    let err = resolver(&server)
        .resolve("01001000")
        .await
        .expect_err("city name is empty");

    assert!(matches!(err, PortError::MalformedResponse(_)), "got {err:?}");
}

#[tokio::test]
async fn unreachable_backend_is_network_error() {
    let resolver = ViaCepResolver::with_base_url(Client::new(), "http://127.0.0.1:1");

    let err = resolver
        .resolve("01001000")
        .await
        .expect_err("nothing listens on port 1");

    assert!(matches!(err, PortError::Network(_)), "got {err:?}");
}
