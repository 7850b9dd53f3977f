#![warn(missing_docs)]
//! # flora-api-contract
//!
//! ## Purpose
//! Defines the JSON payloads exchanged with the classification backend and
//! maps them onto the `flora-core` model.
//!
//! ## Responsibilities
//! - Parse `/health`, `/predict`, `/train`, and `/train/status` responses.
//! - Extract human-readable `detail` messages from error bodies.
//! - Keep wire field names (`class`, `avg_inference`, ...) out of the rest of
//!   the workspace.
//!
//! ## Data flow
//! Raw response bytes -> `parse_*` helper -> core model value
//! ([`HealthReport`], [`PredictionResult`], [`TrainingState`]).
//!
//! ## Ownership and lifetimes
//! Parsed values are owned and never borrow from the transient network buffer.
//!
//! ## Error model
//! Invalid JSON and contract violations both return [`ContractError`].

use flora_core::{HealthReport, PredictionResult, TrainingState};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use thiserror::Error;

/// Fallback message when an upload failure carries no usable `detail`.
pub const GENERIC_UPLOAD_FAILURE: &str = "Upload failed";

/// `GET /health` response body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Model availability text (for example `ready` or `missing`).
    pub model_status: String,
    /// Backend uptime in seconds.
    #[serde(default, deserialize_with = "lenient_metric")]
    pub uptime: Option<f64>,
    /// Predictions served since startup.
    #[serde(default, deserialize_with = "lenient_count")]
    pub total_predictions: Option<u64>,
    /// Mean inference time in seconds.
    #[serde(default, deserialize_with = "lenient_metric")]
    pub avg_inference: Option<f64>,
    /// Host CPU usage percentage.
    #[serde(default, deserialize_with = "lenient_metric")]
    pub cpu_usage: Option<f64>,
}

/// Reads an optional metric as a finite number.
///
/// Any other JSON value becomes `None` so one odd metric never fails the
/// whole health report.
fn lenient_metric<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value
        .as_ref()
        .and_then(Value::as_f64)
        .filter(|metric| metric.is_finite()))
}

/// Reads an optional counter. Integral floats such as `42.0` are accepted;
/// negative, fractional, or non-numeric values become `None`.
fn lenient_count<'de, D>(deserializer: D) -> Result<Option<u64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    let Some(Value::Number(number)) = value else {
        return Ok(None);
    };

    Ok(number.as_u64().or_else(|| {
        number
            .as_f64()
            .filter(|count| count.is_finite() && *count >= 0.0 && count.fract() == 0.0)
            .map(|count| count as u64)
    }))
}

impl From<HealthResponse> for HealthReport {
    fn from(response: HealthResponse) -> Self {
        HealthReport {
            online: true,
            model_status: response.model_status,
            uptime_seconds: response.uptime,
            total_predictions: response.total_predictions,
            avg_inference_seconds: response.avg_inference,
            cpu_usage_percent: response.cpu_usage,
        }
    }
}

/// `POST /predict` response body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PredictResponse {
    /// Predicted class label.
    #[serde(rename = "class")]
    pub label: String,
    /// Confidence string with `%` suffix.
    pub confidence: String,
}

/// `POST /train` response body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrainResponse {
    /// Backend process id of the training job.
    pub pid: u64,
    /// Optional status message.
    #[serde(default)]
    pub message: Option<String>,
}

/// Job state as spelled on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WireTrainingState {
    /// Job still running.
    Running,
    /// Job finished successfully.
    Completed,
    /// Job failed.
    Failed,
}

impl From<WireTrainingState> for TrainingState {
    fn from(state: WireTrainingState) -> Self {
        match state {
            WireTrainingState::Running => TrainingState::Running,
            WireTrainingState::Completed => TrainingState::Completed,
            WireTrainingState::Failed => TrainingState::Failed,
        }
    }
}

/// `GET /train/status?pid=N` response body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrainingStatusResponse {
    /// Process id the status refers to.
    pub pid: u64,
    /// Current job state.
    pub state: WireTrainingState,
    /// Failure reason or progress note.
    #[serde(default)]
    pub detail: Option<String>,
}

/// Training job status mapped into core types.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrainingStatus {
    /// Current job state.
    pub state: TrainingState,
    /// Failure reason or progress note.
    pub detail: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    detail: Option<Value>,
}

/// Parses a health body into a fresh online report.
///
/// # Errors
/// Returns [`ContractError::Decode`] for invalid JSON or a missing
/// `model_status`.
pub fn parse_health_response(raw: &[u8]) -> Result<HealthReport, ContractError> {
    let parsed: HealthResponse = serde_json::from_slice(raw)?;
    Ok(parsed.into())
}

/// Parses a prediction body.
///
/// # Errors
/// Returns [`ContractError::Decode`] when `class` or `confidence` is missing.
pub fn parse_prediction_response(raw: &[u8]) -> Result<PredictionResult, ContractError> {
    let parsed: PredictResponse = serde_json::from_slice(raw)?;
    Ok(PredictionResult::new(parsed.label, parsed.confidence))
}

/// Parses a training trigger body.
///
/// # Errors
/// Returns [`ContractError::Decode`] when `pid` is missing or not a number.
pub fn parse_train_response(raw: &[u8]) -> Result<TrainResponse, ContractError> {
    Ok(serde_json::from_slice(raw)?)
}

/// Parses a training status body and checks it refers to `expected_pid`.
///
/// # Errors
/// Returns [`ContractError::Decode`] for invalid JSON.
/// Returns [`ContractError::InvalidContract`] when the response names a
/// different process.
pub fn parse_training_status(
    raw: &[u8],
    expected_pid: u64,
) -> Result<TrainingStatus, ContractError> {
    let parsed: TrainingStatusResponse = serde_json::from_slice(raw)?;
    if parsed.pid != expected_pid {
        return Err(ContractError::InvalidContract(format!(
            "status for pid {} does not match requested pid {expected_pid}",
            parsed.pid
        )));
    }

    Ok(TrainingStatus {
        state: parsed.state.into(),
        detail: parsed.detail,
    })
}

/// Extracts a string `detail` field from an error body.
///
/// FastAPI validation errors carry `detail` as a list of objects; those, and
/// bodies that are not JSON at all, yield `None`.
pub fn error_detail(raw: &[u8]) -> Option<String> {
    let body: ErrorBody = serde_json::from_slice(raw).ok()?;
    match body.detail? {
        Value::String(detail) if !detail.trim().is_empty() => Some(detail),
        _ => None,
    }
}

/// Contract parse errors.
#[derive(Debug, Error)]
pub enum ContractError {
    /// JSON decode failure.
    #[error("response decode failure: {0}")]
    Decode(#[from] serde_json::Error),
    /// Parsed payload violates contract invariants.
    #[error("response contract violation: {0}")]
    InvalidContract(String),
}
