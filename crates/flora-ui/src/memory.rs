//! In-memory renderer.
//!
//! [`MemoryView`] keeps the whole surface in a [`UiState`] so flows can be
//! exercised and inspected without a real rendering toolkit.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use flora_core::PickedFile;

use crate::{
    DROP_ZONE_PLACEHOLDER, EMPTY_METRIC, PREDICT_IDLE_LABEL, RETRAIN_LABEL, Region, Style,
    UPLOAD_LABEL, View,
};

/// Rendered state of one region.
#[derive(Debug, Clone, PartialEq)]
pub struct RegionState {
    /// Text content.
    pub text: String,
    /// Visibility.
    pub visible: bool,
    /// Enabled flag (meaningful for controls only).
    pub enabled: bool,
    /// Last applied style.
    pub style: Option<Style>,
    /// Image source for image regions.
    pub source: Option<String>,
}

impl Default for RegionState {
    fn default() -> Self {
        Self {
            text: String::new(),
            visible: true,
            enabled: true,
            style: None,
            source: None,
        }
    }
}

/// Aggregate surface state.
#[derive(Debug, Clone, PartialEq)]
pub struct UiState {
    regions: HashMap<Region, RegionState>,
    /// Alerts shown, oldest first.
    pub alerts: Vec<String>,
    /// Confirmation prompts shown, oldest first.
    pub prompts: Vec<String>,
    /// Current training archive selection.
    pub training_selection: Option<PickedFile>,
    /// Answer returned by the next confirmation prompts.
    pub confirm_answer: bool,
    /// Number of times the image picker was requested.
    pub picker_requests: usize,
}

impl UiState {
    /// Creates the initial layout: nothing staged, no result, idle triggers.
    pub fn new() -> Self {
        let mut regions: HashMap<Region, RegionState> = Region::ALL
            .iter()
            .map(|region| (*region, RegionState::default()))
            .collect();

        let mut init = |region: Region, text: &str, visible: bool, enabled: bool| {
            let state = regions.entry(region).or_default();
            state.text = text.to_string();
            state.visible = visible;
            state.enabled = enabled;
        };

        init(Region::ApiStatus, "Checking...", true, true);
        init(Region::ModelStatus, EMPTY_METRIC, true, true);
        init(Region::MetricUptime, EMPTY_METRIC, true, true);
        init(Region::MetricPredictions, EMPTY_METRIC, true, true);
        init(Region::MetricInference, EMPTY_METRIC, true, true);
        init(Region::MetricCpu, EMPTY_METRIC, true, true);
        init(Region::DropZonePlaceholder, DROP_ZONE_PLACEHOLDER, true, true);
        init(Region::PreviewImage, "", false, true);
        init(Region::PredictButton, PREDICT_IDLE_LABEL, true, false);
        init(Region::ResultArea, "", false, true);
        init(Region::UploadTrainButton, UPLOAD_LABEL, true, true);
        init(Region::RetrainButton, RETRAIN_LABEL, true, true);

        regions
            .entry(Region::ConfidenceBar)
            .or_default()
            .style = Some(Style::WidthPercent(0.0));

        Self {
            regions,
            alerts: Vec::new(),
            prompts: Vec::new(),
            training_selection: None,
            confirm_answer: false,
            picker_requests: 0,
        }
    }

    /// Returns a copy of one region's state.
    pub fn region(&self, region: Region) -> RegionState {
        self.regions.get(&region).cloned().unwrap_or_default()
    }

    /// Text of `region`.
    pub fn text(&self, region: Region) -> String {
        self.region(region).text
    }

    /// Visibility of `region`.
    pub fn is_visible(&self, region: Region) -> bool {
        self.region(region).visible
    }

    /// Enabled flag of `region`.
    pub fn is_enabled(&self, region: Region) -> bool {
        self.region(region).enabled
    }

    /// Last style applied to `region`.
    pub fn style(&self, region: Region) -> Option<Style> {
        self.region(region).style
    }

    fn region_mut(&mut self, region: Region) -> &mut RegionState {
        self.regions.entry(region).or_default()
    }
}

impl Default for UiState {
    fn default() -> Self {
        Self::new()
    }
}

/// Thread-safe [`View`] over a [`UiState`].
#[derive(Debug, Default)]
pub struct MemoryView {
    state: Mutex<UiState>,
}

impl MemoryView {
    /// Creates a view in the initial layout.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a snapshot of the whole surface.
    pub fn snapshot(&self) -> UiState {
        self.lock().clone()
    }

    /// Text of one region, read in place without copying the whole surface.
    pub fn text(&self, region: Region) -> String {
        self.lock()
            .regions
            .get(&region)
            .map(|state| state.text.clone())
            .unwrap_or_default()
    }

    /// Sets the answer for subsequent confirmation prompts.
    pub fn set_confirm_answer(&self, answer: bool) {
        self.lock().confirm_answer = answer;
    }

    /// Simulates the user choosing a training archive.
    pub fn select_training_file(&self, file: Option<PickedFile>) {
        self.lock().training_selection = file;
    }

    fn lock(&self) -> MutexGuard<'_, UiState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl View for MemoryView {
    fn set_text(&self, region: Region, text: &str) {
        self.lock().region_mut(region).text = text.to_string();
    }

    fn set_visible(&self, region: Region, visible: bool) {
        self.lock().region_mut(region).visible = visible;
    }

    fn set_enabled(&self, region: Region, enabled: bool) {
        self.lock().region_mut(region).enabled = enabled;
    }

    fn set_style(&self, region: Region, style: Style) {
        self.lock().region_mut(region).style = Some(style);
    }

    fn set_image_source(&self, region: Region, source: &str) {
        self.lock().region_mut(region).source = Some(source.to_string());
    }

    fn selected_training_file(&self) -> Option<PickedFile> {
        self.lock().training_selection.clone()
    }

    fn clear_training_selection(&self) {
        self.lock().training_selection = None;
    }

    fn open_image_picker(&self) {
        self.lock().picker_requests += 1;
    }

    fn alert(&self, message: &str) {
        self.lock().alerts.push(message.to_string());
    }

    fn confirm(&self, prompt: &str) -> bool {
        let mut state = self.lock();
        state.prompts.push(prompt.to_string());
        state.confirm_answer
    }
}
