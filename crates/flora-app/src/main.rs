#![warn(missing_docs)]
//! # flora binary
//!
//! Console front end for the flower classification backend.

use std::error::Error;
use std::io::{BufRead, Write};
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use flora_app::{
    ClientConfig, ClientController, ConfigError, ENV_BASE_URL, ENV_POLL_INTERVAL_MS, ENV_PROFILE,
    init_logging, load_picked_file,
};
use flora_core::PickedFile;
use flora_ui::{MemoryView, Region, Style, View};
use log::{error, info};

#[derive(Parser)]
#[command(name = "flora")]
#[command(version = flora_app::APP_VERSION)]
#[command(about = "Console client for the flower classification API")]
struct Cli {
    /// Deployment profile (`local` or `deployed`); overrides FLORA_PROFILE
    #[arg(long, global = true)]
    profile: Option<String>,

    /// Backend base URL; overrides FLORA_BASE_URL
    #[arg(long, global = true)]
    base_url: Option<String>,

    /// Health poll interval in milliseconds; overrides FLORA_POLL_INTERVAL_MS
    #[arg(long, global = true)]
    poll_interval_ms: Option<u64>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Poll backend health until interrupted
    Watch,
    /// Classify one image
    Predict {
        /// Image file to classify
        image: PathBuf,
    },
    /// Upload a .zip archive of labelled training images
    UploadData {
        /// Archive to upload
        archive: PathBuf,
    },
    /// Trigger model retraining
    Train {
        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
}

/// Headless view that mirrors status lines to the log.
struct ConsoleView {
    inner: MemoryView,
    assume_yes: bool,
}

impl ConsoleView {
    fn new(assume_yes: bool) -> Self {
        Self {
            inner: MemoryView::new(),
            assume_yes,
        }
    }

    fn text(&self, region: Region) -> String {
        self.inner.text(region)
    }
}

impl View for ConsoleView {
    fn set_text(&self, region: Region, text: &str) {
        let changed = self.inner.text(region) != text;
        self.inner.set_text(region, text);
        if changed && !text.is_empty() {
            info!("{region:?}: {text}");
        }
    }

    fn set_visible(&self, region: Region, visible: bool) {
        self.inner.set_visible(region, visible);
    }

    fn set_enabled(&self, region: Region, enabled: bool) {
        self.inner.set_enabled(region, enabled);
    }

    fn set_style(&self, region: Region, style: Style) {
        self.inner.set_style(region, style);
    }

    fn set_image_source(&self, region: Region, source: &str) {
        self.inner.set_image_source(region, source);
    }

    fn selected_training_file(&self) -> Option<PickedFile> {
        self.inner.selected_training_file()
    }

    fn clear_training_selection(&self) {
        self.inner.clear_training_selection();
    }

    fn open_image_picker(&self) {
        eprintln!("pass an image path to `flora predict` instead");
    }

    fn alert(&self, message: &str) {
        eprintln!("{message}");
        self.inner.alert(message);
    }

    fn confirm(&self, prompt: &str) -> bool {
        if self.assume_yes {
            return true;
        }

        eprint!("{prompt} [y/N] ");
        let _ = std::io::stderr().flush();
        let mut answer = String::new();
        if std::io::stdin().lock().read_line(&mut answer).is_err() {
            return false;
        }
        matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes")
    }
}

fn build_config(cli: &Cli) -> Result<ClientConfig, ConfigError> {
    let poll_interval_ms = cli.poll_interval_ms.map(|millis| millis.to_string());

    // CLI flags are the top layer over the FLORA_* environment.
    ClientConfig::from_lookup(|key| {
        let flag = match key {
            ENV_PROFILE => cli.profile.clone(),
            ENV_BASE_URL => cli.base_url.clone(),
            ENV_POLL_INTERVAL_MS => poll_interval_ms.clone(),
            _ => None,
        };
        flag.or_else(|| std::env::var(key).ok())
    })
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<ExitCode, Box<dyn Error>> {
    init_logging();
    let cli = Cli::parse();
    let config = build_config(&cli)?;

    let assume_yes = matches!(cli.command, Commands::Train { yes: true });
    let view = Arc::new(ConsoleView::new(assume_yes));
    let controller = ClientController::with_http(config, view.clone())?;
    info!(
        "flora {} using {}",
        flora_app::app_version(),
        controller.config().api_base()?
    );

    match cli.command {
        Commands::Watch => {
            let poller = controller.spawn_status_poller();
            tokio::signal::ctrl_c().await?;
            poller.abort();
            Ok(ExitCode::SUCCESS)
        }
        Commands::Predict { image } => {
            let file = load_picked_file(&image).await?;
            if !controller.stage_file(file).await {
                error!("{} is not an image", image.display());
                return Ok(ExitCode::from(2));
            }
            match controller.submit_prediction().await {
                Some(result) => {
                    println!("{}", serde_json::to_string_pretty(&result)?);
                    Ok(ExitCode::SUCCESS)
                }
                None => Ok(ExitCode::FAILURE),
            }
        }
        Commands::UploadData { archive } => {
            let file = load_picked_file(&archive).await?;
            view.inner.select_training_file(Some(file));
            let uploaded = controller.upload_training_data().await;
            println!("{}", view.text(Region::UploadMessage));
            Ok(if uploaded {
                ExitCode::SUCCESS
            } else {
                ExitCode::FAILURE
            })
        }
        Commands::Train { .. } => {
            let Some(handle) = controller.trigger_retrain().await else {
                let message = view.text(Region::TrainMessage);
                if !message.is_empty() {
                    println!("{message}");
                }
                return Ok(ExitCode::FAILURE);
            };
            if let Some(watch) = handle.watch {
                watch.await?;
            }
            println!("{}", view.text(Region::TrainMessage));
            Ok(ExitCode::SUCCESS)
        }
    }
}
