#![warn(missing_docs)]
//! # flora-core
//!
//! ## Purpose
//! Defines the transient, client-resident data model shared by the `flora`
//! workspace.
//!
//! ## Responsibilities
//! - Represent picked files and the single staged image awaiting prediction.
//! - Represent backend health snapshots, including the offline sentinel.
//! - Parse prediction confidence strings and format uptime counters.
//!
//! ## Data flow
//! A file picker or drop target yields a [`PickedFile`]. Image files become a
//! [`StagedImage`] carrying a preview data URL. Health polling produces a
//! [`HealthReport`] per tick, and prediction responses become a
//! [`PredictionResult`] ready for rendering.
//!
//! ## Ownership and lifetimes
//! File bytes live in an `Arc<[u8]>`. The staged image and an in-flight
//! request can share one buffer without copying or borrowing across awaits.
//!
//! ## Error model
//! Staging a non-image file returns [`CoreError::NotAnImage`]. Callers treat
//! it as a silent no-op rather than a user-facing error.
//!
//! ## Example
//! ```rust
//! use flora_core::{format_uptime, parse_confidence};
//!
//! assert_eq!(parse_confidence("99.99%"), Some(99.99));
//! assert_eq!(format_uptime(3_725.0), "1h 2m 5s");
//! ```

use std::sync::Arc;

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use serde::Serialize;
use thiserror::Error;

/// Model status text shown when the backend cannot be reached.
pub const UNREACHABLE_MODEL_STATUS: &str = "Unreachable";

/// Media type prefix accepted for prediction input.
pub const IMAGE_MEDIA_PREFIX: &str = "image/";

/// One file handed over by a picker or drop target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PickedFile {
    /// File name as reported by the source, used for multipart uploads.
    pub name: String,
    /// Declared media type (for example `image/png`).
    pub media_type: String,
    /// Raw file contents.
    pub bytes: Arc<[u8]>,
}

impl PickedFile {
    /// Creates a picked file from owned parts.
    pub fn new(
        name: impl Into<String>,
        media_type: impl Into<String>,
        bytes: impl Into<Arc<[u8]>>,
    ) -> Self {
        Self {
            name: name.into(),
            media_type: media_type.into(),
            bytes: bytes.into(),
        }
    }

    /// Returns `true` when the declared media type starts with `image/`.
    pub fn is_image(&self) -> bool {
        self.media_type.starts_with(IMAGE_MEDIA_PREFIX)
    }

    /// Returns the content length in bytes.
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Returns `true` when the file has no content.
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

/// The image currently staged for prediction.
///
/// At most one staged image is active per controller; staging a new one
/// replaces the previous value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StagedImage {
    /// Raw file retained for the multipart submission.
    pub file: PickedFile,
    /// `data:` URL used for the preview surface.
    pub preview_data_url: String,
}

impl StagedImage {
    /// Validates the media type and builds the preview data URL.
    ///
    /// # Errors
    /// Returns [`CoreError::NotAnImage`] when the media type is not `image/*`.
    pub fn from_file(file: PickedFile) -> Result<Self, CoreError> {
        if !file.is_image() {
            return Err(CoreError::NotAnImage {
                media_type: file.media_type.clone(),
            });
        }

        let preview_data_url = preview_data_url(&file);
        Ok(Self {
            file,
            preview_data_url,
        })
    }
}

/// Encodes file contents as a base64 `data:` URL.
pub fn preview_data_url(file: &PickedFile) -> String {
    format!(
        "data:{};base64,{}",
        file.media_type,
        STANDARD.encode(&file.bytes)
    )
}

/// Backend health snapshot produced by one poll tick.
///
/// Each successful poll replaces the whole report. Nothing is merged
/// field by field.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HealthReport {
    /// Whether the last poll reached the backend with a 2xx response.
    pub online: bool,
    /// Model status text reported by the backend.
    pub model_status: String,
    /// Backend uptime in seconds.
    pub uptime_seconds: Option<f64>,
    /// Number of predictions served since startup.
    pub total_predictions: Option<u64>,
    /// Mean inference time in seconds.
    pub avg_inference_seconds: Option<f64>,
    /// Host CPU usage percentage.
    pub cpu_usage_percent: Option<f64>,
}

impl HealthReport {
    /// Sentinel used before the first poll and after any failed poll.
    pub fn offline() -> Self {
        Self {
            online: false,
            model_status: UNREACHABLE_MODEL_STATUS.to_string(),
            uptime_seconds: None,
            total_predictions: None,
            avg_inference_seconds: None,
            cpu_usage_percent: None,
        }
    }
}

impl Default for HealthReport {
    fn default() -> Self {
        Self::offline()
    }
}

/// Classification ready for rendering.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PredictionResult {
    /// Predicted class label, rendered verbatim.
    pub label: String,
    /// Confidence exactly as returned by the backend (for example `"99.99%"`).
    pub confidence_text: String,
    /// Numeric percentage parsed from `confidence_text`, if any.
    pub confidence_percent: Option<f64>,
}

impl PredictionResult {
    /// Builds a result and parses the numeric confidence.
    pub fn new(label: impl Into<String>, confidence_text: impl Into<String>) -> Self {
        let confidence_text = confidence_text.into();
        let confidence_percent = parse_confidence(&confidence_text);
        Self {
            label: label.into(),
            confidence_text,
            confidence_percent,
        }
    }

    /// Width of the confidence bar in percent. Not clamped to `0..=100`.
    ///
    /// Unparseable confidence renders as an empty bar.
    pub fn bar_width_percent(&self) -> f64 {
        self.confidence_percent.unwrap_or(0.0)
    }
}

/// Lifecycle of a backend training job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum TrainingState {
    /// Job is still running.
    Running,
    /// Job finished successfully.
    Completed,
    /// Job terminated with an error.
    Failed,
}

/// Reads the leading decimal literal of a confidence string.
///
/// Leading whitespace is skipped. Everything after the numeric prefix
/// (typically `%`) is ignored. Returns `None` when no digits lead the text.
pub fn parse_confidence(text: &str) -> Option<f64> {
    let trimmed = text.trim_start();
    let bytes = trimmed.as_bytes();
    let mut end = 0;

    if matches!(bytes.first(), Some(b'+' | b'-')) {
        end += 1;
    }

    let integer_start = end;
    while end < bytes.len() && bytes[end].is_ascii_digit() {
        end += 1;
    }
    let mut digits = end - integer_start;

    if end < bytes.len() && bytes[end] == b'.' {
        let fraction_start = end + 1;
        let mut fraction_end = fraction_start;
        while fraction_end < bytes.len() && bytes[fraction_end].is_ascii_digit() {
            fraction_end += 1;
        }
        digits += fraction_end - fraction_start;
        if digits > 0 {
            end = fraction_end;
        }
    }

    if digits == 0 {
        return None;
    }

    // Exponent only counts when at least one digit follows it.
    if end < bytes.len() && matches!(bytes[end], b'e' | b'E') {
        let mut exponent_end = end + 1;
        if matches!(bytes.get(exponent_end), Some(b'+' | b'-')) {
            exponent_end += 1;
        }
        let exponent_digits_start = exponent_end;
        while exponent_end < bytes.len() && bytes[exponent_end].is_ascii_digit() {
            exponent_end += 1;
        }
        if exponent_end > exponent_digits_start {
            end = exponent_end;
        }
    }

    trimmed[..end].parse::<f64>().ok()
}

/// Formats a seconds counter as `"{h}h {m}m {s}s"`.
///
/// Fractional seconds are truncated. Negative or non-finite input renders as zero.
pub fn format_uptime(seconds: f64) -> String {
    let total = if seconds.is_finite() && seconds > 0.0 {
        seconds.floor() as u64
    } else {
        0
    };

    let hours = total / 3600;
    let minutes = (total % 3600) / 60;
    let secs = total % 60;
    format!("{hours}h {minutes}m {secs}s")
}

/// Error type for core model validation.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CoreError {
    /// File media type is not `image/*`.
    #[error("not an image: media type {media_type:?}")]
    NotAnImage {
        /// Declared media type of the rejected file.
        media_type: String,
    },
}
