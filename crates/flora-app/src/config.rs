//! Client configuration and deployment profiles.
//!
//! Values layer in this order: profile defaults, `FLORA_*` environment
//! variables, then CLI flags applied by the binary.

use std::str::FromStr;
use std::time::Duration;

use thiserror::Error;
use url::Url;

/// Origin used when the base URL is empty (same-origin deployments).
pub const DEFAULT_ORIGIN: &str = "http://127.0.0.1:8000";

/// Minimum time the upload trigger stays disabled after a request resolves.
pub const DEFAULT_UPLOAD_COOLDOWN: Duration = Duration::from_millis(2_000);

/// Minimum time the retrain trigger stays disabled after a request resolves.
pub const DEFAULT_RETRAIN_COOLDOWN: Duration = Duration::from_millis(5_000);

/// Profile name (`local` or `deployed`).
pub const ENV_PROFILE: &str = "FLORA_PROFILE";
/// Backend base URL.
pub const ENV_BASE_URL: &str = "FLORA_BASE_URL";
/// Origin used when the base URL is empty.
pub const ENV_ORIGIN: &str = "FLORA_ORIGIN";
/// Health poll interval in milliseconds.
pub const ENV_POLL_INTERVAL_MS: &str = "FLORA_POLL_INTERVAL_MS";
/// Extended metrics toggle (`true`/`false`, `1`/`0`, `on`/`off`).
pub const ENV_EXTENDED_METRICS: &str = "FLORA_EXTENDED_METRICS";

/// Deployment profile selecting default values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Profile {
    /// Served next to the backend: same origin, fast polling, full metrics.
    Local,
    /// Remote backend at an absolute URL, slow polling, status only.
    Deployed,
}

impl FromStr for Profile {
    type Err = ConfigError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "local" => Ok(Profile::Local),
            "deployed" => Ok(Profile::Deployed),
            _ => Err(ConfigError::InvalidValue {
                key: ENV_PROFILE.to_string(),
                value: value.to_string(),
            }),
        }
    }
}

/// How the client learns that a triggered training job finished.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrainingWatch {
    /// Leave the "started" message in place.
    Disabled,
    /// Show the completion message after a fixed delay, without asking the backend.
    FixedDelay(Duration),
    /// Poll `/train/status` until the job leaves the running state.
    PollStatus {
        /// Delay between polls.
        interval: Duration,
        /// Upper bound on polls before giving up.
        max_polls: u32,
    },
}

/// Controller configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Profile the defaults came from.
    pub profile: Profile,
    /// Backend base URL; empty means same origin.
    pub base_url: String,
    /// Origin that stands in for "same origin" in a native client.
    pub origin: String,
    /// Health poll cadence.
    pub poll_interval: Duration,
    /// Whether uptime/prediction/inference/CPU metrics are rendered.
    pub show_extended_metrics: bool,
    /// Upload trigger cooldown.
    pub upload_cooldown: Duration,
    /// Retrain trigger cooldown.
    pub retrain_cooldown: Duration,
    /// Training completion tracking.
    pub training_watch: TrainingWatch,
}

impl ClientConfig {
    /// Returns profile defaults.
    pub fn for_profile(profile: Profile) -> Self {
        match profile {
            Profile::Local => Self {
                profile,
                base_url: String::new(),
                origin: DEFAULT_ORIGIN.to_string(),
                poll_interval: Duration::from_millis(2_000),
                show_extended_metrics: true,
                upload_cooldown: DEFAULT_UPLOAD_COOLDOWN,
                retrain_cooldown: DEFAULT_RETRAIN_COOLDOWN,
                training_watch: TrainingWatch::PollStatus {
                    interval: Duration::from_secs(2),
                    max_polls: 900,
                },
            },
            Profile::Deployed => Self {
                profile,
                base_url: String::new(),
                origin: DEFAULT_ORIGIN.to_string(),
                poll_interval: Duration::from_millis(10_000),
                show_extended_metrics: false,
                upload_cooldown: DEFAULT_UPLOAD_COOLDOWN,
                retrain_cooldown: DEFAULT_RETRAIN_COOLDOWN,
                training_watch: TrainingWatch::Disabled,
            },
        }
    }

    /// Loads configuration from the process environment.
    ///
    /// # Errors
    /// Returns [`ConfigError`] for unparseable values or an invalid result.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Loads configuration through an arbitrary key lookup.
    ///
    /// Unset or blank variables keep the profile default.
    ///
    /// # Errors
    /// Returns [`ConfigError`] for unparseable values or an invalid result.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let read = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let profile = match read(ENV_PROFILE) {
            Some(raw) => raw.parse()?,
            None => Profile::Local,
        };
        let mut config = Self::for_profile(profile);

        if let Some(base_url) = read(ENV_BASE_URL) {
            config.base_url = base_url.trim().to_string();
        }
        if let Some(origin) = read(ENV_ORIGIN) {
            config.origin = origin.trim().to_string();
        }
        if let Some(raw) = read(ENV_POLL_INTERVAL_MS) {
            let millis: u64 = raw.trim().parse().map_err(|_| ConfigError::InvalidValue {
                key: ENV_POLL_INTERVAL_MS.to_string(),
                value: raw.clone(),
            })?;
            config.poll_interval = Duration::from_millis(millis);
        }
        if let Some(raw) = read(ENV_EXTENDED_METRICS) {
            config.show_extended_metrics = parse_flag(ENV_EXTENDED_METRICS, &raw)?;
        }

        config.validate()?;
        Ok(config)
    }

    /// Checks cross-field invariants.
    ///
    /// # Errors
    /// - [`ConfigError::ZeroPollInterval`] when the poll interval is zero.
    /// - [`ConfigError::MissingBaseUrl`] for a deployed profile without a base URL.
    /// - [`ConfigError::InvalidBaseUrl`] when the effective base does not parse.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.poll_interval.is_zero() {
            return Err(ConfigError::ZeroPollInterval);
        }
        if self.profile == Profile::Deployed && self.base_url.trim().is_empty() {
            return Err(ConfigError::MissingBaseUrl);
        }
        self.api_base().map(|_| ())
    }

    /// Effective backend base URL.
    ///
    /// # Errors
    /// Returns [`ConfigError::InvalidBaseUrl`] when the URL does not parse.
    pub fn api_base(&self) -> Result<Url, ConfigError> {
        let raw = if self.base_url.trim().is_empty() {
            self.origin.trim()
        } else {
            self.base_url.trim()
        };

        Url::parse(raw).map_err(|error| ConfigError::InvalidBaseUrl(format!("{raw}: {error}")))
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::for_profile(Profile::Local)
    }
}

fn parse_flag(key: &str, raw: &str) -> Result<bool, ConfigError> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::InvalidValue {
            key: key.to_string(),
            value: raw.to_string(),
        }),
    }
}

/// Configuration errors.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// A setting could not be parsed.
    #[error("invalid value {value:?} for {key}")]
    InvalidValue {
        /// Setting name.
        key: String,
        /// Raw value.
        value: String,
    },
    /// Effective base URL does not parse.
    #[error("invalid base url: {0}")]
    InvalidBaseUrl(String),
    /// Deployed profile requires an absolute base URL.
    #[error("deployed profile requires FLORA_BASE_URL")]
    MissingBaseUrl,
    /// Poll interval must be positive.
    #[error("poll interval must be greater than zero")]
    ZeroPollInterval,
}
