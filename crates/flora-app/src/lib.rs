#![warn(missing_docs)]
//! # flora-app
//!
//! ## Purpose
//! Orchestrates health polling, image staging, prediction, training-data
//! upload, and retraining for the `flora` classification client.
//!
//! ## Responsibilities
//! - Own all client state in one [`ClientController`] per surface.
//! - Poll `/health` on a fixed cadence and project it onto the view.
//! - Run each user-triggered flow with its own busy flag and cooldown.
//! - Load configuration profiles and bootstrap logging for the binary.
//!
//! ## Data flow
//! Renderer events -> controller flow -> [`flora_api::ApiClient`] ->
//! backend -> parsed result -> [`flora_ui::View`] updates.
//!
//! ## Ownership and lifetimes
//! The controller is a bundle of `Arc`s. Clones share state, and spawned
//! tasks (poller, cooldown release, training watch) each hold one.
//!
//! ## Error model
//! Only construction is fallible ([`AppError`]). Flows turn every request
//! failure into a view update and leave the UI idle and retryable.

mod config;
mod controller;
mod files;
mod logging;
mod predict;
mod retrain;
mod status;
mod training;
mod upload;

use flora_api::ApiError;
use thiserror::Error;

pub use config::{
    ClientConfig, ConfigError, DEFAULT_ORIGIN, DEFAULT_RETRAIN_COOLDOWN, DEFAULT_UPLOAD_COOLDOWN,
    ENV_BASE_URL, ENV_EXTENDED_METRICS, ENV_ORIGIN, ENV_POLL_INTERVAL_MS, ENV_PROFILE, Profile,
    TrainingWatch,
};
pub use controller::{ClientController, ControllerSnapshot};
pub use files::load_picked_file;
pub use logging::init_logging;
pub use predict::{CONNECTION_FAILED_ALERT, PREDICTION_FAILED_ALERT};
pub use retrain::{
    RETRAIN_FAILED_MESSAGE, RETRAIN_PENDING_MESSAGE, RETRAIN_PROMPT, RetrainHandle,
    TRAINING_COMPLETE_MESSAGE,
};
pub use training::{SELECT_ARCHIVE_ALERT, UPLOAD_PENDING_MESSAGE, UPLOAD_SUCCESS_MESSAGE};

/// Build-time application version loaded from root `VERSION` file.
pub const APP_VERSION: &str = env!("FLORA_VERSION");

/// Returns the app version sourced from root `VERSION`.
pub fn app_version() -> &'static str {
    APP_VERSION
}

/// App integration error type.
#[derive(Debug, Error)]
pub enum AppError {
    /// Configuration could not be loaded or validated.
    #[error("config error: {0}")]
    Config(#[from] ConfigError),
    /// API client could not be constructed.
    #[error("api error: {0}")]
    Api(#[from] ApiError),
    /// Local file could not be read.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}
