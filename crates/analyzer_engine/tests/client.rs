use std::time::Duration;

use analyzer_core::InaccessibleLink;
use analyzer_engine::{
    run_analysis, AnalysisClient, AnalysisSettings, ReqwestAnalysisClient, TransportError,
    TransportOutcome,
};
use pretty_assertions::assert_eq;
use serde_json::json;
use tokio_util::sync::CancellationToken;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client_for(server: &MockServer) -> ReqwestAnalysisClient {
    client_with(server, AnalysisSettings::default())
}

fn client_with(server: &MockServer, settings: AnalysisSettings) -> ReqwestAnalysisClient {
    ReqwestAnalysisClient::new(AnalysisSettings {
        base_url: server.uri(),
        ..settings
    })
    .expect("client")
}

fn analysis_body() -> serde_json::Value {
    json!({
        "ID": 41,
        "CreatedAt": "2025-05-01T12:00:00Z",
        "UpdatedAt": "2025-05-01T12:00:05Z",
        "DeletedAt": null,
        "URL": "https://site.test",
        "Title": "Site",
        "HTMLVersion": "HTML 5",
        "HeadingsCount": "{\"h1\":1,\"h3\":2}",
        "InternalLinks": 5,
        "ExternalLinks": 2,
        "InaccessibleLinks": [
            { "ID": 1, "URLID": 41, "url": "https://site.test/404", "status": 404 },
            { "ID": 2, "URLID": 41, "url": "https://dead.test", "status": 0 }
        ],
        "HasLoginForm": true
    })
}

#[tokio::test]
async fn analyze_posts_url_and_decodes_record() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/analyze"))
        .and(body_json(json!({ "url": "https://site.test" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(analysis_body()))
        .expect(1)
        .mount(&server)
        .await;

    let record = client_for(&server)
        .analyze("https://site.test")
        .await
        .expect("analysis ok");

    assert_eq!(record.id, 41);
    assert_eq!(record.source_url, "https://site.test");
    assert_eq!(record.title, "Site");
    assert_eq!(record.html_version, "HTML 5");
    assert_eq!(record.heading_counts.get("h1"), Some(&1));
    assert_eq!(record.heading_counts.get("h3"), Some(&2));
    assert_eq!(record.internal_link_count, 5);
    assert_eq!(record.external_link_count, 2);
    assert_eq!(
        record.inaccessible_links,
        vec![
            InaccessibleLink::new("https://site.test/404", Some(404)),
            InaccessibleLink::new("https://dead.test", None),
        ]
    );
    assert!(record.has_login_form);
    assert_eq!(record.created_at, "2025-05-01T12:00:00Z");
}

#[tokio::test]
async fn analyze_tolerates_missing_optional_fields() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/analyze"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "ID": 3,
            "URL": "https://bare.test",
            "HeadingsCount": "not json",
            "InaccessibleLinks": null
        })))
        .mount(&server)
        .await;

    let record = client_for(&server)
        .analyze("https://bare.test")
        .await
        .expect("analysis ok");
    assert_eq!(record.id, 3);
    assert!(record.heading_counts.is_empty());
    assert!(record.inaccessible_links.is_empty());
    assert!(!record.has_login_form);
}

#[tokio::test]
async fn analyze_passes_service_error_message_through() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/analyze"))
        .respond_with(ResponseTemplate::new(500).set_body_json(json!({
            "error": "Failed to analyze page: dial tcp: no such host"
        })))
        .mount(&server)
        .await;

    let err = client_for(&server)
        .analyze("https://nope.test")
        .await
        .unwrap_err();
    assert_eq!(
        err,
        TransportError::Status {
            code: 500,
            message: "Failed to analyze page: dial tcp: no such host".to_string(),
        }
    );
    assert_eq!(err.message(), "Failed to analyze page: dial tcp: no such host");
}

#[tokio::test]
async fn analyze_substitutes_generic_message_without_body() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/analyze"))
        .respond_with(ResponseTemplate::new(502))
        .mount(&server)
        .await;

    let err = client_for(&server)
        .analyze("https://a.test")
        .await
        .unwrap_err();
    assert_eq!(err.status_code(), Some(502));
    assert_eq!(err.message(), "Request failed with status code 502");
}

#[tokio::test]
async fn analyze_reports_undecodable_body() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/analyze"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
        .mount(&server)
        .await;

    let err = client_for(&server)
        .analyze("https://a.test")
        .await
        .unwrap_err();
    assert!(matches!(err, TransportError::Decode(_)));
}

#[tokio::test]
async fn analyze_times_out_on_slow_service() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/analyze"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_delay(Duration::from_millis(300))
                .set_body_json(analysis_body()),
        )
        .mount(&server)
        .await;

    let settings = AnalysisSettings {
        request_timeout: Duration::from_millis(50),
        ..AnalysisSettings::default()
    };
    let err = client_with(&server, settings)
        .analyze("https://a.test")
        .await
        .unwrap_err();
    assert!(matches!(err, TransportError::Timeout(_)));
}

#[tokio::test]
async fn cancelling_in_flight_call_yields_cancelled() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/analyze"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_delay(Duration::from_secs(5))
                .set_body_json(analysis_body()),
        )
        .mount(&server)
        .await;

    let client = client_for(&server);
    let token = CancellationToken::new();
    let trigger = token.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(50)).await;
        trigger.cancel();
    });

    let outcome = tokio::time::timeout(
        Duration::from_secs(2),
        run_analysis(&client, "https://a.test", &token),
    )
    .await
    .expect("cancel returns promptly");
    assert_eq!(outcome, TransportOutcome::Cancelled);
}

#[test]
fn endpoint_keeps_base_path() {
    let client = ReqwestAnalysisClient::new(AnalysisSettings {
        base_url: "http://localhost:8080/api".to_string(),
        ..AnalysisSettings::default()
    })
    .expect("client");
    assert_eq!(client.endpoint().as_str(), "http://localhost:8080/api/analyze");
}

#[test]
fn invalid_base_url_is_rejected() {
    let err = ReqwestAnalysisClient::new(AnalysisSettings {
        base_url: "not a url".to_string(),
        ..AnalysisSettings::default()
    })
    .unwrap_err();
    assert!(matches!(err, TransportError::InvalidUrl(_)));
}
