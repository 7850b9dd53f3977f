//! Prediction submission.

use std::time::Duration;

use flora_api::ApiError;
use flora_core::PredictionResult;
use flora_ui::{PREDICT_BUSY_LABEL, PREDICT_IDLE_LABEL, Region, Style, Trigger};
use log::{debug, info, warn};

use crate::ClientController;

/// Alert shown when the backend answers a prediction with a non-2xx status.
pub const PREDICTION_FAILED_ALERT: &str = "Prediction failed. Ensure model is loaded.";

/// Alert shown when no usable response arrives (unreachable backend or
/// unreadable success body).
pub const CONNECTION_FAILED_ALERT: &str = "Error connecting to API.";

impl ClientController {
    /// Submits the staged image and renders the classification.
    ///
    /// No-op without a staged image or while a prediction is in flight.
    /// Failures raise an alert and leave the result area untouched.
    pub async fn submit_prediction(&self) -> Option<PredictionResult> {
        let image = {
            let state = self.lock_state();
            match state.staged.as_ref() {
                Some(staged) => staged.file.clone(),
                None => {
                    debug!("predict requested with nothing staged");
                    return None;
                }
            }
        };

        let _busy = self.try_begin(Trigger::Predict, Some(PREDICT_IDLE_LABEL), Duration::ZERO)?;
        self.view.set_text(Region::PredictButton, PREDICT_BUSY_LABEL);

        match self.api.predict(&image).await {
            Ok(result) => {
                info!(
                    "predicted {} ({}) for {}",
                    result.label, result.confidence_text, image.name
                );
                self.render_prediction(&result);
                self.lock_state().last_prediction = Some(result.clone());
                Some(result)
            }
            Err(error) => {
                warn!("prediction for {} failed: {error}", image.name);
                // Only a non-2xx answer is a rejection; an unreadable 2xx body
                // counts as a broken exchange with the API.
                let message = match error {
                    ApiError::Status { .. } => PREDICTION_FAILED_ALERT,
                    _ => CONNECTION_FAILED_ALERT,
                };
                self.view.alert(message);
                None
            }
        }
    }

    fn render_prediction(&self, result: &PredictionResult) {
        self.view.set_visible(Region::ResultArea, true);
        self.view.set_text(Region::PredictionClass, &result.label);
        self.view.set_style(
            Region::ConfidenceBar,
            Style::WidthPercent(result.bar_width_percent()),
        );
        self.view
            .set_text(Region::PredictionConfidence, &result.confidence_text);
    }
}
