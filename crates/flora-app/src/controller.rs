//! Controller construction, shared state, and busy-flag bookkeeping.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use flora_api::{ApiClient, ApiTransport, HttpTransport};
use flora_core::{HealthReport, PredictionResult, StagedImage};
use flora_ui::{Connectivity, Trigger, UiControlState, View};

use crate::{AppError, ClientConfig};

/// Mutable client state. Never held across an `.await`.
#[derive(Debug, Default)]
pub(crate) struct ControllerState {
    pub(crate) health: HealthReport,
    pub(crate) connectivity: Option<Connectivity>,
    pub(crate) staged: Option<StagedImage>,
    pub(crate) stage_generation: u64,
    pub(crate) last_prediction: Option<PredictionResult>,
    pub(crate) controls: UiControlState,
    pub(crate) retrain_generation: u64,
}

/// Read-only projection of controller state.
#[derive(Debug, Clone, PartialEq)]
pub struct ControllerSnapshot {
    /// Latest health report (offline sentinel before the first success).
    pub health: HealthReport,
    /// File name of the staged image, if any.
    pub staged_file: Option<String>,
    /// Last rendered prediction.
    pub last_prediction: Option<PredictionResult>,
    /// Busy flags.
    pub controls: UiControlState,
}

/// Client controller bound to one view and one backend.
///
/// Cloning is cheap and clones share state. Flows must run inside a Tokio
/// runtime because cooldowns and watches spawn timer tasks.
#[derive(Clone)]
pub struct ClientController {
    pub(crate) config: Arc<ClientConfig>,
    pub(crate) api: ApiClient,
    pub(crate) view: Arc<dyn View>,
    state: Arc<Mutex<ControllerState>>,
}

impl ClientController {
    /// Creates a controller over an explicit transport.
    ///
    /// # Errors
    /// Returns [`AppError::Config`] for an invalid configuration and
    /// [`AppError::Api`] when the base URL is not usable.
    pub fn new(
        config: ClientConfig,
        transport: Arc<dyn ApiTransport>,
        view: Arc<dyn View>,
    ) -> Result<Self, AppError> {
        config.validate()?;
        let api = ApiClient::new(config.api_base()?, transport)?;

        Ok(Self {
            config: Arc::new(config),
            api,
            view,
            state: Arc::new(Mutex::new(ControllerState::default())),
        })
    }

    /// Creates a controller that talks HTTP through `reqwest`.
    ///
    /// # Errors
    /// Same as [`ClientController::new`].
    pub fn with_http(config: ClientConfig, view: Arc<dyn View>) -> Result<Self, AppError> {
        Self::new(config, Arc::new(HttpTransport::new()), view)
    }

    /// Returns the active configuration.
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Projects current state.
    pub fn snapshot(&self) -> ControllerSnapshot {
        let state = self.lock_state();
        ControllerSnapshot {
            health: state.health.clone(),
            staged_file: state.staged.as_ref().map(|staged| staged.file.name.clone()),
            last_prediction: state.last_prediction.clone(),
            controls: state.controls,
        }
    }

    pub(crate) fn lock_state(&self) -> MutexGuard<'_, ControllerState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Marks `trigger` busy and disables its control.
    ///
    /// Returns `None` when the trigger is already busy. Dropping the guard
    /// restores the control, after `cooldown` when it is non-zero.
    pub(crate) fn try_begin(
        &self,
        trigger: Trigger,
        idle_label: Option<&'static str>,
        cooldown: Duration,
    ) -> Option<BusyGuard> {
        if !self.lock_state().controls.begin(trigger) {
            return None;
        }
        self.view.set_enabled(trigger.region(), false);

        Some(BusyGuard {
            controller: self.clone(),
            trigger,
            idle_label,
            cooldown,
        })
    }

    pub(crate) fn is_busy(&self, trigger: Trigger) -> bool {
        self.lock_state().controls.is_busy(trigger)
    }

    fn release(&self, trigger: Trigger) {
        self.lock_state().controls.release(trigger);
        self.view.set_enabled(trigger.region(), true);
    }
}

/// Restores a trigger when a flow ends, whichever way it ends.
pub(crate) struct BusyGuard {
    controller: ClientController,
    trigger: Trigger,
    idle_label: Option<&'static str>,
    cooldown: Duration,
}

impl Drop for BusyGuard {
    fn drop(&mut self) {
        if let Some(label) = self.idle_label {
            self.controller
                .view
                .set_text(self.trigger.region(), label);
        }

        if self.cooldown.is_zero() {
            self.controller.release(self.trigger);
            return;
        }

        match tokio::runtime::Handle::try_current() {
            Ok(handle) => {
                let controller = self.controller.clone();
                let trigger = self.trigger;
                let cooldown = self.cooldown;
                handle.spawn(async move {
                    tokio::time::sleep(cooldown).await;
                    controller.release(trigger);
                });
            }
            // Runtime already gone; nothing can observe the cooldown.
            Err(_) => self.controller.release(self.trigger),
        }
    }
}
