//! Health polling.
//!
//! Each tick is independent: a failure downgrades the display and the next
//! tick tries again. There is no backoff.

use flora_core::{HealthReport, UNREACHABLE_MODEL_STATUS, format_uptime};
use flora_ui::{API_OFFLINE_TEXT, API_ONLINE_TEXT, Connectivity, Region, Style};
use log::{debug, info, warn};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use crate::ClientController;

impl ClientController {
    /// Performs one health check and renders the outcome.
    ///
    /// On failure the metric regions keep their previous values; only the
    /// badge and model status change.
    pub async fn check_status(&self) -> HealthReport {
        let report = match self.api.health().await {
            Ok(report) => {
                debug!("health ok: model_status={}", report.model_status);
                self.render_online(&report);
                report
            }
            Err(error) => {
                debug!("health check failed: {error}");
                self.render_offline();
                HealthReport::offline()
            }
        };

        let connectivity = if report.online {
            Connectivity::Online
        } else {
            Connectivity::Offline
        };

        let previous = {
            let mut state = self.lock_state();
            state.health = report.clone();
            state.connectivity.replace(connectivity)
        };

        if previous != Some(connectivity) {
            match connectivity {
                Connectivity::Online => info!("backend online at {}", self.api.base_url()),
                Connectivity::Offline => warn!("backend unreachable at {}", self.api.base_url()),
            }
        }

        report
    }

    /// Checks immediately, then once per poll interval, forever.
    pub async fn run_status_poller(&self) {
        let mut ticker = tokio::time::interval(self.config.poll_interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            ticker.tick().await;
            self.check_status().await;
        }
    }

    /// Spawns [`ClientController::run_status_poller`] on the current runtime.
    ///
    /// Aborting the returned handle stops polling.
    pub fn spawn_status_poller(&self) -> JoinHandle<()> {
        let controller = self.clone();
        tokio::spawn(async move { controller.run_status_poller().await })
    }

    fn render_online(&self, report: &HealthReport) {
        self.view.set_text(Region::ApiStatus, API_ONLINE_TEXT);
        self.view
            .set_style(Region::ApiStatus, Style::Badge(Connectivity::Online));
        self.view.set_text(Region::ModelStatus, &report.model_status);

        if !self.config.show_extended_metrics {
            return;
        }

        if let Some(uptime) = report.uptime_seconds {
            self.view
                .set_text(Region::MetricUptime, &format_uptime(uptime));
        }
        if let Some(total) = report.total_predictions {
            self.view
                .set_text(Region::MetricPredictions, &total.to_string());
        }
        if let Some(seconds) = report.avg_inference_seconds {
            self.view
                .set_text(Region::MetricInference, &format!("{seconds:.1}s"));
        }
        if let Some(percent) = report.cpu_usage_percent {
            self.view
                .set_text(Region::MetricCpu, &format!("{percent}%"));
        }
    }

    fn render_offline(&self) {
        self.view.set_text(Region::ApiStatus, API_OFFLINE_TEXT);
        self.view
            .set_style(Region::ApiStatus, Style::Badge(Connectivity::Offline));
        self.view
            .set_text(Region::ModelStatus, UNREACHABLE_MODEL_STATUS);
    }
}
