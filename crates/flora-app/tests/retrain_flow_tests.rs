//! Integration tests for retraining, its cooldown, and completion tracking.

mod common;

use std::time::Duration;

use common::Reply;
use flora_api::Method;
use flora_app::{
    ClientConfig, RETRAIN_FAILED_MESSAGE, RETRAIN_PROMPT, TRAINING_COMPLETE_MESSAGE,
    TrainingWatch,
};
use flora_ui::{Region, Style, Tone};

fn config_with_watch(training_watch: TrainingWatch) -> ClientConfig {
    ClientConfig {
        training_watch,
        ..common::local_config()
    }
}

#[tokio::test]
async fn retrain_flow_tests_declined_prompt_sends_nothing() {
    let harness = common::harness(common::local_config());
    harness.view.set_confirm_answer(false);

    let handle = harness.controller.trigger_retrain().await;

    assert!(handle.is_none());
    let ui = harness.view.snapshot();
    assert_eq!(ui.prompts, vec![RETRAIN_PROMPT]);
    assert_eq!(ui.text(Region::TrainMessage), "");
    assert!(ui.is_enabled(Region::RetrainButton));
    assert!(harness.transport.requests().is_empty());
}

#[tokio::test]
async fn retrain_flow_tests_confirmed_prompt_reports_pid() {
    let harness = common::harness(config_with_watch(TrainingWatch::Disabled));
    harness.view.set_confirm_answer(true);
    harness.transport.push(
        "/train",
        Reply::json(200, r#"{"message":"Training started","pid":77}"#),
    );

    let handle = harness
        .controller
        .trigger_retrain()
        .await
        .expect("retrain should start");

    assert_eq!(handle.pid, 77);
    assert!(handle.watch.is_none());
    let ui = harness.view.snapshot();
    assert_eq!(ui.text(Region::TrainMessage), "Training started! (PID: 77)");
    assert_eq!(
        ui.style(Region::TrainMessage),
        Some(Style::Tone(Tone::Success))
    );

    let request = &harness.transport.requests()[0];
    assert_eq!(request.method, Method::Post);
    assert_eq!(request.url.as_str(), "http://flora.test/train?force=true");
}

#[tokio::test]
async fn retrain_flow_tests_failure_shows_error_message() {
    let harness = common::harness(common::local_config());
    harness.view.set_confirm_answer(true);
    harness.transport.push(
        "/train",
        Reply::json(409, r#"{"detail":"Training already running"}"#),
    );

    let handle = harness.controller.trigger_retrain().await;

    assert!(handle.is_none());
    let ui = harness.view.snapshot();
    assert_eq!(ui.text(Region::TrainMessage), RETRAIN_FAILED_MESSAGE);
    assert_eq!(
        ui.style(Region::TrainMessage),
        Some(Style::Tone(Tone::Error))
    );
}

#[tokio::test(start_paused = true)]
async fn retrain_flow_tests_trigger_stays_disabled_for_cooldown() {
    let harness = common::harness(config_with_watch(TrainingWatch::Disabled));
    harness.view.set_confirm_answer(true);
    harness
        .transport
        .push("/train", Reply::json(200, r#"{"message":"ok","pid":5}"#));

    harness.controller.trigger_retrain().await;
    assert!(!harness.view.snapshot().is_enabled(Region::RetrainButton));

    // Ignored while cooling down, without prompting again.
    assert!(harness.controller.trigger_retrain().await.is_none());
    assert_eq!(harness.view.snapshot().prompts.len(), 1);
    assert_eq!(harness.transport.count("/train"), 1);

    tokio::time::sleep(Duration::from_millis(4_999)).await;
    assert!(!harness.view.snapshot().is_enabled(Region::RetrainButton));

    tokio::time::sleep(Duration::from_millis(2)).await;
    assert!(harness.view.snapshot().is_enabled(Region::RetrainButton));
    assert!(!harness.controller.snapshot().controls.retrain_busy);
}

#[tokio::test(start_paused = true)]
async fn retrain_flow_tests_status_watch_reports_completion() {
    let harness = common::harness(config_with_watch(TrainingWatch::PollStatus {
        interval: Duration::from_secs(2),
        max_polls: 10,
    }));
    harness.view.set_confirm_answer(true);
    harness
        .transport
        .push("/train", Reply::json(200, r#"{"message":"ok","pid":77}"#));
    harness.transport.push(
        "/train/status",
        Reply::json(200, r#"{"pid":77,"state":"running"}"#),
    );
    harness.transport.push(
        "/train/status",
        Reply::json(200, r#"{"pid":77,"state":"completed"}"#),
    );

    let handle = harness
        .controller
        .trigger_retrain()
        .await
        .expect("retrain should start");
    handle
        .watch
        .expect("watch should be spawned")
        .await
        .expect("watch should finish");

    let ui = harness.view.snapshot();
    assert_eq!(ui.text(Region::TrainMessage), TRAINING_COMPLETE_MESSAGE);
    assert_eq!(
        ui.style(Region::TrainMessage),
        Some(Style::Tone(Tone::Success))
    );
    assert_eq!(harness.transport.count("/train/status"), 2);
    assert!(
        harness
            .transport
            .requests()
            .iter()
            .any(|request| request.url.query() == Some("pid=77"))
    );
}

#[tokio::test(start_paused = true)]
async fn retrain_flow_tests_status_watch_reports_failure_detail() {
    let harness = common::harness(config_with_watch(TrainingWatch::PollStatus {
        interval: Duration::from_secs(2),
        max_polls: 10,
    }));
    harness.view.set_confirm_answer(true);
    harness
        .transport
        .push("/train", Reply::json(200, r#"{"message":"ok","pid":9}"#));
    harness.transport.push(
        "/train/status",
        Reply::json(200, r#"{"pid":9,"state":"failed","detail":"dataset empty"}"#),
    );

    let handle = harness.controller.trigger_retrain().await.expect("started");
    handle.watch.expect("watch").await.expect("joined");

    let ui = harness.view.snapshot();
    assert_eq!(ui.text(Region::TrainMessage), "Training failed: dataset empty");
    assert_eq!(
        ui.style(Region::TrainMessage),
        Some(Style::Tone(Tone::Error))
    );
}

#[tokio::test(start_paused = true)]
async fn retrain_flow_tests_status_watch_stops_when_endpoint_missing() {
    let harness = common::harness(config_with_watch(TrainingWatch::PollStatus {
        interval: Duration::from_secs(2),
        max_polls: 10,
    }));
    harness.view.set_confirm_answer(true);
    harness
        .transport
        .push("/train", Reply::json(200, r#"{"message":"ok","pid":3}"#));

    let handle = harness.controller.trigger_retrain().await.expect("started");
    handle.watch.expect("watch").await.expect("joined");

    assert_eq!(harness.transport.count("/train/status"), 1);
    assert_eq!(
        harness.view.snapshot().text(Region::TrainMessage),
        "Training started! (PID: 3)"
    );
}

#[tokio::test(start_paused = true)]
async fn retrain_flow_tests_fixed_delay_watch_reports_completion() {
    let harness = common::harness(config_with_watch(TrainingWatch::FixedDelay(
        Duration::from_secs(10),
    )));
    harness.view.set_confirm_answer(true);
    harness
        .transport
        .push("/train", Reply::json(200, r#"{"message":"ok","pid":12}"#));

    harness.controller.trigger_retrain().await.expect("started");

    tokio::time::sleep(Duration::from_millis(9_900)).await;
    assert_eq!(
        harness.view.snapshot().text(Region::TrainMessage),
        "Training started! (PID: 12)"
    );

    tokio::time::sleep(Duration::from_millis(200)).await;
    assert_eq!(
        harness.view.snapshot().text(Region::TrainMessage),
        TRAINING_COMPLETE_MESSAGE
    );
    assert_eq!(harness.transport.count("/train/status"), 0);
}

#[tokio::test(start_paused = true)]
async fn retrain_flow_tests_newer_retrain_supersedes_old_watch() {
    let harness = common::harness(config_with_watch(TrainingWatch::FixedDelay(
        Duration::from_secs(10),
    )));
    harness.view.set_confirm_answer(true);
    harness
        .transport
        .push("/train", Reply::json(200, r#"{"message":"ok","pid":1}"#));
    harness
        .transport
        .push("/train", Reply::json(200, r#"{"message":"ok","pid":2}"#));

    harness.controller.trigger_retrain().await.expect("first");
    tokio::time::sleep(Duration::from_secs(6)).await;
    harness.controller.trigger_retrain().await.expect("second");

    // The first watch fires here but belongs to a stale generation.
    tokio::time::sleep(Duration::from_secs(5)).await;
    assert_eq!(
        harness.view.snapshot().text(Region::TrainMessage),
        "Training started! (PID: 2)"
    );

    tokio::time::sleep(Duration::from_secs(6)).await;
    assert_eq!(
        harness.view.snapshot().text(Region::TrainMessage),
        TRAINING_COMPLETE_MESSAGE
    );
}
