//! Image staging from drag-and-drop or the file picker.

use flora_core::{PickedFile, StagedImage};
use flora_ui::{DragEvent, Region, Style, Trigger};
use log::{debug, warn};

use crate::ClientController;

impl ClientController {
    /// Stages `file` for prediction and shows its preview.
    ///
    /// Non-image files are ignored without any UI change. Returns `true` when
    /// the file became the staged image.
    pub async fn stage_file(&self, file: PickedFile) -> bool {
        if !file.is_image() {
            debug!(
                "ignoring {} with media type {:?}",
                file.name, file.media_type
            );
            return false;
        }

        let generation = {
            let mut state = self.lock_state();
            state.stage_generation += 1;
            state.stage_generation
        };

        let staged = match tokio::task::spawn_blocking(move || StagedImage::from_file(file)).await
        {
            Ok(Ok(staged)) => staged,
            Ok(Err(error)) => {
                debug!("staging rejected: {error}");
                return false;
            }
            Err(error) => {
                warn!("preview encoding task failed: {error}");
                return false;
            }
        };

        let preview = staged.preview_data_url.clone();
        let predict_enabled = {
            let mut state = self.lock_state();
            if state.stage_generation != generation {
                debug!("discarding superseded preview for {}", staged.file.name);
                return false;
            }
            debug!("staged {} ({} bytes)", staged.file.name, staged.file.len());
            state.staged = Some(staged);
            !state.controls.is_busy(Trigger::Predict)
        };

        // View calls run without the state lock so renderers may read snapshots.
        self.view.set_image_source(Region::PreviewImage, &preview);
        self.view.set_visible(Region::PreviewImage, true);
        self.view.set_visible(Region::DropZonePlaceholder, false);
        self.view.set_enabled(Region::PredictButton, predict_enabled);
        self.view.set_visible(Region::ResultArea, false);
        true
    }

    /// Stages the first file of a picker change event.
    pub async fn handle_file_input_change(&self, files: Vec<PickedFile>) -> bool {
        match files.into_iter().next() {
            Some(file) => self.stage_file(file).await,
            None => false,
        }
    }

    /// Accepts a hovering drag and highlights the drop zone.
    pub fn handle_drag_over(&self, event: &mut dyn DragEvent) {
        event.prevent_default();
        self.view.set_style(Region::DropZone, Style::Highlight(true));
    }

    /// Clears the drop-zone highlight.
    pub fn handle_drag_leave(&self) {
        self.view.set_style(Region::DropZone, Style::Highlight(false));
    }

    /// Accepts a drop and stages its first file.
    pub async fn handle_drop<E>(&self, event: &mut E) -> bool
    where
        E: DragEvent + ?Sized,
    {
        event.prevent_default();
        self.view.set_style(Region::DropZone, Style::Highlight(false));

        let first = event.files().first().cloned();
        match first {
            Some(file) => self.stage_file(file).await,
            None => false,
        }
    }

    /// Opens the image picker for a click on the drop zone.
    pub fn handle_drop_zone_click(&self) {
        self.view.open_image_picker();
    }
}
