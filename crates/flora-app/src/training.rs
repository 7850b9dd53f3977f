//! Training archive upload.

use flora_api_contract::GENERIC_UPLOAD_FAILURE;
use flora_ui::{Region, Style, Tone, Trigger};
use log::{info, warn};

use crate::ClientController;

/// Alert shown when upload is requested with no archive selected.
pub const SELECT_ARCHIVE_ALERT: &str = "Please select a .zip file first.";

/// Status line while the upload is in flight.
pub const UPLOAD_PENDING_MESSAGE: &str = "Uploading and extracting...";

/// Status line after a successful upload.
pub const UPLOAD_SUCCESS_MESSAGE: &str = "Success! Data added.";

impl ClientController {
    /// Uploads the selected training archive.
    ///
    /// The upload trigger stays disabled for the configured cooldown after
    /// the request resolves, whatever the outcome. Returns `true` on success.
    pub async fn upload_training_data(&self) -> bool {
        if self.is_busy(Trigger::UploadTrainingData) {
            return false;
        }

        let Some(archive) = self.view.selected_training_file() else {
            self.view.alert(SELECT_ARCHIVE_ALERT);
            return false;
        };

        let Some(_busy) = self.try_begin(
            Trigger::UploadTrainingData,
            None,
            self.config.upload_cooldown,
        ) else {
            return false;
        };

        self.view
            .set_text(Region::UploadMessage, UPLOAD_PENDING_MESSAGE);
        self.view
            .set_style(Region::UploadMessage, Style::Tone(Tone::Neutral));

        match self.api.upload_training_data(&archive).await {
            Ok(()) => {
                info!("uploaded training archive {} ({} bytes)", archive.name, archive.len());
                self.view
                    .set_text(Region::UploadMessage, UPLOAD_SUCCESS_MESSAGE);
                self.view
                    .set_style(Region::UploadMessage, Style::Tone(Tone::Success));
                self.view.clear_training_selection();
                true
            }
            Err(error) => {
                warn!("training archive upload failed: {error}");
                let reason = error.detail().unwrap_or(GENERIC_UPLOAD_FAILURE);
                self.view
                    .set_text(Region::UploadMessage, &format!("Error: {reason}"));
                self.view
                    .set_style(Region::UploadMessage, Style::Tone(Tone::Error));
                false
            }
        }
    }
}
