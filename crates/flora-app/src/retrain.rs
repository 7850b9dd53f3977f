//! Retraining trigger and completion watch.
//!
//! A watch belongs to the retrain generation that started it and stops
//! writing to the UI once a newer retrain begins.

use flora_core::TrainingState;
use flora_ui::{Region, Style, Tone, Trigger};
use log::{debug, info, warn};
use tokio::task::JoinHandle;

use crate::{ClientController, TrainingWatch};

/// Confirmation prompt shown before retraining.
pub const RETRAIN_PROMPT: &str =
    "Are you sure you want to trigger model retraining? This may take a while.";

/// Status line while the trigger request is in flight.
pub const RETRAIN_PENDING_MESSAGE: &str = "Triggering training...";

/// Status line when the trigger request fails.
pub const RETRAIN_FAILED_MESSAGE: &str = "Error triggering training.";

/// Status line once the backend reports the job finished.
pub const TRAINING_COMPLETE_MESSAGE: &str = "Training complete!";

/// A training job started by [`ClientController::trigger_retrain`].
#[derive(Debug)]
pub struct RetrainHandle {
    /// Backend process id.
    pub pid: u64,
    /// Completion watch task, when one is configured.
    pub watch: Option<JoinHandle<()>>,
}

impl ClientController {
    /// Asks for confirmation, then triggers retraining with `force=true`.
    ///
    /// Declining the prompt sends nothing. The retrain trigger stays disabled
    /// for the configured cooldown after the request resolves.
    pub async fn trigger_retrain(&self) -> Option<RetrainHandle> {
        if self.is_busy(Trigger::Retrain) {
            return None;
        }

        if !self.view.confirm(RETRAIN_PROMPT) {
            debug!("retrain declined");
            return None;
        }

        let _busy = self.try_begin(Trigger::Retrain, None, self.config.retrain_cooldown)?;
        let generation = {
            let mut state = self.lock_state();
            state.retrain_generation += 1;
            state.retrain_generation
        };

        self.view
            .set_text(Region::TrainMessage, RETRAIN_PENDING_MESSAGE);
        self.view
            .set_style(Region::TrainMessage, Style::Tone(Tone::Neutral));

        match self.api.trigger_training(true).await {
            Ok(response) => {
                info!("training started with pid {}", response.pid);
                self.view.set_text(
                    Region::TrainMessage,
                    &format!("Training started! (PID: {})", response.pid),
                );
                self.view
                    .set_style(Region::TrainMessage, Style::Tone(Tone::Success));

                Some(RetrainHandle {
                    pid: response.pid,
                    watch: self.spawn_training_watch(response.pid, generation),
                })
            }
            Err(error) => {
                warn!("training trigger failed: {error}");
                self.view
                    .set_text(Region::TrainMessage, RETRAIN_FAILED_MESSAGE);
                self.view
                    .set_style(Region::TrainMessage, Style::Tone(Tone::Error));
                None
            }
        }
    }

    fn spawn_training_watch(&self, pid: u64, generation: u64) -> Option<JoinHandle<()>> {
        if self.config.training_watch == TrainingWatch::Disabled {
            return None;
        }

        let controller = self.clone();
        Some(tokio::spawn(async move {
            controller.watch_training(pid, generation).await;
        }))
    }

    async fn watch_training(&self, pid: u64, generation: u64) {
        match self.config.training_watch {
            TrainingWatch::Disabled => {}
            TrainingWatch::FixedDelay(delay) => {
                tokio::time::sleep(delay).await;
                self.finish_training(generation, TrainingState::Completed, None);
            }
            TrainingWatch::PollStatus {
                interval,
                max_polls,
            } => {
                for _ in 0..max_polls {
                    tokio::time::sleep(interval).await;
                    if !self.is_current_retrain(generation) {
                        debug!("training watch for pid {pid} superseded");
                        return;
                    }

                    match self.api.training_status(pid).await {
                        Ok(status) if status.state == TrainingState::Running => {}
                        Ok(status) => {
                            info!("training pid {pid} finished: {:?}", status.state);
                            self.finish_training(generation, status.state, status.detail);
                            return;
                        }
                        Err(error) => {
                            warn!("training status unavailable for pid {pid}: {error}");
                            return;
                        }
                    }
                }
                info!("stopped watching training pid {pid} after {max_polls} polls");
            }
        }
    }

    fn finish_training(&self, generation: u64, state: TrainingState, detail: Option<String>) {
        if !self.is_current_retrain(generation) {
            return;
        }

        match state {
            TrainingState::Running => {}
            TrainingState::Completed => {
                self.view
                    .set_text(Region::TrainMessage, TRAINING_COMPLETE_MESSAGE);
                self.view
                    .set_style(Region::TrainMessage, Style::Tone(Tone::Success));
            }
            TrainingState::Failed => {
                let reason = detail.unwrap_or_else(|| "unknown error".to_string());
                self.view
                    .set_text(Region::TrainMessage, &format!("Training failed: {reason}"));
                self.view
                    .set_style(Region::TrainMessage, Style::Tone(Tone::Error));
            }
        }
    }

    fn is_current_retrain(&self, generation: u64) -> bool {
        self.lock_state().retrain_generation == generation
    }
}
