//! Integration tests for the reqwest transport against a mock backend.

use std::sync::Arc;

use flora_api::{ApiClient, ApiError, HttpTransport};
use flora_core::PickedFile;
use url::Url;
use wiremock::matchers::{body_string_contains, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client_for(server: &MockServer) -> ApiClient {
    let base = Url::parse(&server.uri()).expect("mock server uri should parse");
    ApiClient::new(base, Arc::new(HttpTransport::new())).expect("client should build")
}

#[tokio::test]
async fn health_reads_extended_metrics() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/health"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "model_status": "ready",
            "uptime": 3725.4,
            "total_predictions": 12,
            "avg_inference": 0.43,
            "cpu_usage": 17.5
        })))
        .expect(1)
        .mount(&server)
        .await;

    let report = client_for(&server)
        .health()
        .await
        .expect("health should succeed");
    assert!(report.online);
    assert_eq!(report.model_status, "ready");
    assert_eq!(report.total_predictions, Some(12));
    assert_eq!(report.cpu_usage_percent, Some(17.5));
}

#[tokio::test]
async fn predict_posts_multipart_file_field() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/predict"))
        .and(body_string_contains("name=\"file\""))
        .and(body_string_contains("filename=\"rose.jpg\""))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(serde_json::json!({"class": "rose", "confidence": "99.99%"})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let image = PickedFile::new("rose.jpg", "image/jpeg", b"jpeg-bytes".to_vec());
    let result = client_for(&server)
        .predict(&image)
        .await
        .expect("predict should succeed");
    assert_eq!(result.label, "rose");
    assert_eq!(result.confidence_percent, Some(99.99));
}

#[tokio::test]
async fn predict_server_error_maps_to_status() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/predict"))
        .respond_with(
            ResponseTemplate::new(500)
                .set_body_json(serde_json::json!({"detail": "Prediction failed: model missing"})),
        )
        .mount(&server)
        .await;

    let image = PickedFile::new("rose.jpg", "image/jpeg", b"jpeg-bytes".to_vec());
    let error = client_for(&server)
        .predict(&image)
        .await
        .expect_err("500 should fail");
    assert!(matches!(error, ApiError::Status { status: 500, .. }));
    assert_eq!(error.detail(), Some("Prediction failed: model missing"));
}

#[tokio::test]
async fn train_sends_force_flag() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/train"))
        .and(query_param("force", "true"))
        .respond_with(ResponseTemplate::new(200).set_body_json(
            serde_json::json!({"message": "Training triggered successfully", "pid": 31337}),
        ))
        .expect(1)
        .mount(&server)
        .await;

    let response = client_for(&server)
        .trigger_training(true)
        .await
        .expect("train should succeed");
    assert_eq!(response.pid, 31337);
}

#[tokio::test]
async fn unreachable_backend_is_connectivity_error() {
    let base = Url::parse("http://127.0.0.1:1").expect("url should parse");
    let client = ApiClient::new(base, Arc::new(HttpTransport::new())).expect("client should build");

    let error = client.health().await.expect_err("closed port should fail");
    assert!(error.is_connectivity(), "unexpected error: {error}");
}
