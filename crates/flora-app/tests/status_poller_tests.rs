//! Integration tests for health polling and status rendering.

mod common;

use std::time::Duration;

use common::Reply;
use flora_app::{ClientConfig, Profile};
use flora_ui::{API_OFFLINE_TEXT, API_ONLINE_TEXT, Connectivity, EMPTY_METRIC, Region, Style};

#[tokio::test]
async fn status_poller_tests_ready_backend_reads_online() {
    let harness = common::harness(common::local_config());
    harness
        .transport
        .push("/health", Reply::json(200, r#"{"model_status":"ready"}"#));

    let report = harness.controller.check_status().await;

    let ui = harness.view.snapshot();
    assert!(report.online);
    assert_eq!(ui.text(Region::ApiStatus), API_ONLINE_TEXT);
    assert_eq!(
        ui.style(Region::ApiStatus),
        Some(Style::Badge(Connectivity::Online))
    );
    assert_eq!(ui.text(Region::ModelStatus), "ready");
}

#[tokio::test]
async fn status_poller_tests_unreachable_backend_reads_offline() {
    let harness = common::harness(common::local_config());
    harness.transport.push("/health", Reply::Unreachable);

    let report = harness.controller.check_status().await;

    let ui = harness.view.snapshot();
    assert!(!report.online);
    assert_eq!(ui.text(Region::ApiStatus), API_OFFLINE_TEXT);
    assert_eq!(
        ui.style(Region::ApiStatus),
        Some(Style::Badge(Connectivity::Offline))
    );
    assert_eq!(ui.text(Region::ModelStatus), "Unreachable");
}

#[tokio::test]
async fn status_poller_tests_server_error_reads_offline() {
    let harness = common::harness(common::local_config());
    harness
        .transport
        .push("/health", Reply::json(503, r#"{"detail":"warming up"}"#));

    harness.controller.check_status().await;

    let ui = harness.view.snapshot();
    assert_eq!(ui.text(Region::ApiStatus), API_OFFLINE_TEXT);
    assert_eq!(ui.text(Region::ModelStatus), "Unreachable");
    assert!(!harness.controller.snapshot().health.online);
}

#[tokio::test]
async fn status_poller_tests_renders_extended_metrics_and_keeps_them_when_offline() {
    let harness = common::harness(common::local_config());
    harness.transport.push(
        "/health",
        Reply::json(
            200,
            r#"{"model_status":"ready","uptime":3725.9,"total_predictions":42,"avg_inference":0.456,"cpu_usage":12.5}"#,
        ),
    );
    harness.transport.push("/health", Reply::Unreachable);

    harness.controller.check_status().await;
    let ui = harness.view.snapshot();
    assert_eq!(ui.text(Region::MetricUptime), "1h 2m 5s");
    assert_eq!(ui.text(Region::MetricPredictions), "42");
    assert_eq!(ui.text(Region::MetricInference), "0.5s");
    assert_eq!(ui.text(Region::MetricCpu), "12.5%");

    harness.controller.check_status().await;
    let ui = harness.view.snapshot();
    assert_eq!(ui.text(Region::ModelStatus), "Unreachable");
    assert_eq!(ui.text(Region::MetricPredictions), "42");
    assert_eq!(ui.text(Region::MetricCpu), "12.5%");
}

#[tokio::test]
async fn status_poller_tests_float_prediction_count_still_reads_online() {
    let harness = common::harness(common::local_config());
    harness.transport.push(
        "/health",
        Reply::json(200, r#"{"model_status":"ready","total_predictions":42.0}"#),
    );

    let report = harness.controller.check_status().await;

    let ui = harness.view.snapshot();
    assert!(report.online);
    assert_eq!(ui.text(Region::ApiStatus), API_ONLINE_TEXT);
    assert_eq!(ui.text(Region::ModelStatus), "ready");
    assert_eq!(ui.text(Region::MetricPredictions), "42");
}

#[tokio::test]
async fn status_poller_tests_mistyped_metric_is_skipped_not_fatal() {
    let harness = common::harness(common::local_config());
    harness.transport.push(
        "/health",
        Reply::json(
            200,
            r#"{"model_status":"ready","total_predictions":-3,"cpu_usage":"n/a","uptime":61}"#,
        ),
    );

    harness.controller.check_status().await;

    let ui = harness.view.snapshot();
    assert_eq!(ui.text(Region::ApiStatus), API_ONLINE_TEXT);
    assert_eq!(ui.text(Region::MetricUptime), "0h 1m 1s");
    assert_eq!(ui.text(Region::MetricPredictions), EMPTY_METRIC);
    assert_eq!(ui.text(Region::MetricCpu), EMPTY_METRIC);
}

#[tokio::test]
async fn status_poller_tests_deployed_profile_hides_extended_metrics() {
    let config = ClientConfig {
        base_url: "https://flowers.example.test".to_string(),
        ..ClientConfig::for_profile(Profile::Deployed)
    };
    let harness = common::harness(config);
    harness.transport.push(
        "/health",
        Reply::json(200, r#"{"model_status":"ready","total_predictions":42}"#),
    );

    harness.controller.check_status().await;

    let ui = harness.view.snapshot();
    assert_eq!(ui.text(Region::ModelStatus), "ready");
    assert_eq!(ui.text(Region::MetricPredictions), EMPTY_METRIC);
    let request = &harness.transport.requests()[0];
    assert_eq!(request.url.as_str(), "https://flowers.example.test/health");
}

#[tokio::test(start_paused = true)]
async fn status_poller_tests_checks_immediately_then_every_interval() {
    let harness = common::harness(common::local_config());
    harness.transport.push("/health", Reply::Unreachable);
    harness
        .transport
        .push("/health", Reply::json(200, r#"{"model_status":"ready"}"#));

    let poller = harness.controller.spawn_status_poller();

    tokio::time::sleep(Duration::from_millis(10)).await;
    assert_eq!(harness.transport.count("/health"), 1);
    assert_eq!(harness.view.snapshot().text(Region::ApiStatus), API_OFFLINE_TEXT);

    // A failed tick does not stop later ticks.
    tokio::time::sleep(Duration::from_millis(2_000)).await;
    assert_eq!(harness.transport.count("/health"), 2);
    assert_eq!(harness.view.snapshot().text(Region::ApiStatus), API_ONLINE_TEXT);

    tokio::time::sleep(Duration::from_millis(4_000)).await;
    assert_eq!(harness.transport.count("/health"), 4);

    poller.abort();
}
