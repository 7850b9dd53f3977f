#![warn(missing_docs)]
//! # flora-ui
//!
//! ## Purpose
//! Defines the view-binding surface the `flora` controller renders through.
//!
//! ## Responsibilities
//! - Name every region the controller reads or writes ([`Region`]).
//! - Expose the capability set a renderer must provide ([`View`]): read the
//!   training-file selection, set text/visibility/enabled/style, show
//!   alerts and confirmations.
//! - Track per-trigger busy flags ([`UiControlState`]).
//! - Provide [`MemoryView`], an in-memory renderer for tests and headless
//!   front ends.
//!
//! ## Data flow
//! Controller flows call [`View`] setters; renderers translate them to
//! widgets, DOM nodes, or log lines.
//!
//! ## Ownership and lifetimes
//! Views are shared as `Arc<dyn View>` and mutate through `&self`, so
//! implementations use interior mutability.
//!
//! ## Error model
//! View calls are infallible. A renderer that cannot apply an update drops it.

mod memory;

use flora_core::PickedFile;

pub use memory::{MemoryView, RegionState, UiState};

/// Badge text while the backend answers health checks.
pub const API_ONLINE_TEXT: &str = "API Online";
/// Badge text while the backend is unreachable.
pub const API_OFFLINE_TEXT: &str = "API Offline";
/// Predict trigger label while idle.
pub const PREDICT_IDLE_LABEL: &str = "Analyze Flower";
/// Predict trigger label while a request is in flight.
pub const PREDICT_BUSY_LABEL: &str = "Analyzing...";
/// Upload trigger label.
pub const UPLOAD_LABEL: &str = "Upload Data";
/// Retrain trigger label.
pub const RETRAIN_LABEL: &str = "Retrain Model";
/// Drop-zone placeholder text shown until an image is staged.
pub const DROP_ZONE_PLACEHOLDER: &str = "Drag & drop an image here, or click to browse";
/// Placeholder for metrics that have not been reported yet.
pub const EMPTY_METRIC: &str = "--";

/// Named regions of the client surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Region {
    /// Connectivity badge.
    ApiStatus,
    /// Model status text.
    ModelStatus,
    /// Uptime metric.
    MetricUptime,
    /// Total predictions metric.
    MetricPredictions,
    /// Average inference time metric.
    MetricInference,
    /// CPU usage metric.
    MetricCpu,
    /// Drop target for images.
    DropZone,
    /// Empty-state text inside the drop zone.
    DropZonePlaceholder,
    /// Staged image preview.
    PreviewImage,
    /// Predict trigger.
    PredictButton,
    /// Container for the last prediction.
    ResultArea,
    /// Predicted label.
    PredictionClass,
    /// Confidence bar.
    ConfidenceBar,
    /// Confidence text.
    PredictionConfidence,
    /// Training archive picker.
    TrainFileInput,
    /// Training upload trigger.
    UploadTrainButton,
    /// Training upload status line.
    UploadMessage,
    /// Retrain trigger.
    RetrainButton,
    /// Retrain status line.
    TrainMessage,
}

impl Region {
    /// Every region, in layout order.
    pub const ALL: [Region; 19] = [
        Region::ApiStatus,
        Region::ModelStatus,
        Region::MetricUptime,
        Region::MetricPredictions,
        Region::MetricInference,
        Region::MetricCpu,
        Region::DropZone,
        Region::DropZonePlaceholder,
        Region::PreviewImage,
        Region::PredictButton,
        Region::ResultArea,
        Region::PredictionClass,
        Region::ConfidenceBar,
        Region::PredictionConfidence,
        Region::TrainFileInput,
        Region::UploadTrainButton,
        Region::UploadMessage,
        Region::RetrainButton,
        Region::TrainMessage,
    ];
}

/// Status-line color coding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    /// Secondary text color for in-progress messages.
    Neutral,
    /// Success color.
    Success,
    /// Error color.
    Error,
}

/// Connectivity badge state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Connectivity {
    /// Last health check succeeded.
    Online,
    /// Last health check failed.
    Offline,
}

/// Style updates a region can receive.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Style {
    /// Badge styling for the connectivity indicator.
    Badge(Connectivity),
    /// Text color of a status line.
    Tone(Tone),
    /// Width of a bar in percent (not clamped).
    WidthPercent(f64),
    /// Accent border while a drag hovers the drop zone.
    Highlight(bool),
}

/// Renderer capability set used by the controller.
pub trait View: Send + Sync {
    /// Replaces the text of a region.
    fn set_text(&self, region: Region, text: &str);
    /// Shows or hides a region.
    fn set_visible(&self, region: Region, visible: bool);
    /// Enables or disables an interactive region.
    fn set_enabled(&self, region: Region, enabled: bool);
    /// Applies a style update.
    fn set_style(&self, region: Region, style: Style);
    /// Sets the source of an image region (a `data:` URL).
    fn set_image_source(&self, region: Region, source: &str);
    /// Returns the archive currently selected in the training file input.
    fn selected_training_file(&self) -> Option<PickedFile>;
    /// Clears the training file input.
    fn clear_training_selection(&self);
    /// Opens the platform image picker.
    fn open_image_picker(&self);
    /// Shows a blocking, dismiss-only message.
    fn alert(&self, message: &str);
    /// Asks a blocking yes/no question.
    fn confirm(&self, prompt: &str) -> bool;
}

/// Drag-and-drop event delivered by the renderer.
pub trait DragEvent {
    /// Suppresses the platform default action so the drop is accepted.
    fn prevent_default(&mut self);
    /// Files carried by the event (empty for dragover/dragleave).
    fn files(&self) -> &[PickedFile];
}

/// Plain drag event for renderers without a native event object.
#[derive(Debug, Clone, Default)]
pub struct DroppedFiles {
    /// Carried files.
    pub files: Vec<PickedFile>,
    /// Whether [`DragEvent::prevent_default`] was called.
    pub default_prevented: bool,
}

impl DroppedFiles {
    /// Creates an event carrying `files`.
    pub fn new(files: Vec<PickedFile>) -> Self {
        Self {
            files,
            default_prevented: false,
        }
    }
}

impl DragEvent for DroppedFiles {
    fn prevent_default(&mut self) {
        self.default_prevented = true;
    }

    fn files(&self) -> &[PickedFile] {
        &self.files
    }
}

/// User-triggered actions guarded by a busy flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trigger {
    /// Image prediction.
    Predict,
    /// Training archive upload.
    UploadTrainingData,
    /// Retraining request.
    Retrain,
}

impl Trigger {
    /// Region of the control that starts this action.
    pub fn region(self) -> Region {
        match self {
            Trigger::Predict => Region::PredictButton,
            Trigger::UploadTrainingData => Region::UploadTrainButton,
            Trigger::Retrain => Region::RetrainButton,
        }
    }
}

/// Per-trigger busy flags.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UiControlState {
    /// Prediction request in flight.
    pub predict_busy: bool,
    /// Upload in flight or cooling down.
    pub upload_busy: bool,
    /// Retrain in flight or cooling down.
    pub retrain_busy: bool,
}

impl UiControlState {
    /// Returns the busy flag for `trigger`.
    pub fn is_busy(&self, trigger: Trigger) -> bool {
        *self.slot(trigger)
    }

    /// Marks `trigger` busy. Returns `false` if it already was.
    pub fn begin(&mut self, trigger: Trigger) -> bool {
        let slot = self.slot_mut(trigger);
        if *slot {
            return false;
        }
        *slot = true;
        true
    }

    /// Clears the busy flag for `trigger`.
    pub fn release(&mut self, trigger: Trigger) {
        *self.slot_mut(trigger) = false;
    }

    fn slot(&self, trigger: Trigger) -> &bool {
        match trigger {
            Trigger::Predict => &self.predict_busy,
            Trigger::UploadTrainingData => &self.upload_busy,
            Trigger::Retrain => &self.retrain_busy,
        }
    }

    fn slot_mut(&mut self, trigger: Trigger) -> &mut bool {
        match trigger {
            Trigger::Predict => &mut self.predict_busy,
            Trigger::UploadTrainingData => &mut self.upload_busy,
            Trigger::Retrain => &mut self.retrain_busy,
        }
    }
}
