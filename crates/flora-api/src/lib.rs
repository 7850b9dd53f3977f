#![warn(missing_docs)]
//! # flora-api
//!
//! ## Purpose
//! Talks to the classification backend over its fixed REST surface.
//!
//! ## Responsibilities
//! - Resolve endpoint URLs against a configurable base.
//! - Execute requests through an injectable [`ApiTransport`].
//! - Map status codes and bodies into `flora-core` values or [`ApiError`].
//!
//! ## Data flow
//! Controller flow -> [`ApiClient`] method -> [`ApiRequest`] ->
//! [`ApiTransport::send`] -> [`ApiResponse`] -> contract parser -> core value.
//!
//! ## Ownership and lifetimes
//! Requests own their URL and body. A transport may move them into a spawned
//! future without borrowing from the caller.
//!
//! ## Error model
//! Network failures, non-2xx statuses, and undecodable bodies are distinct
//! [`ApiError`] variants. Flows choose their user messaging per variant.
//! No request is retried here.

mod http;

use std::sync::Arc;

use async_trait::async_trait;
use flora_api_contract::{
    ContractError, TrainResponse, TrainingStatus, error_detail, parse_health_response,
    parse_prediction_response, parse_train_response, parse_training_status,
};
use flora_core::{HealthReport, PickedFile, PredictionResult};
use log::debug;
use thiserror::Error;
use url::Url;

pub use http::HttpTransport;

/// Multipart field name used by `/predict` and `/upload_data`.
pub const FILE_FIELD: &str = "file";

/// HTTP method subset used by the backend contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    /// `GET`
    Get,
    /// `POST`
    Post,
}

/// Request body variants.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RequestBody {
    /// No body.
    Empty,
    /// `multipart/form-data` with a single file part.
    Multipart {
        /// Form field name.
        field: String,
        /// File sent as the part contents.
        file: PickedFile,
    },
}

/// Transport-level request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiRequest {
    /// Request method.
    pub method: Method,
    /// Fully resolved URL.
    pub url: Url,
    /// Request body.
    pub body: RequestBody,
}

/// Transport-level response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiResponse {
    /// HTTP status code.
    pub status: u16,
    /// Raw response body.
    pub body: Vec<u8>,
}

impl ApiResponse {
    /// Returns `true` for 2xx statuses.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Abstract transport used by [`ApiClient`].
#[async_trait]
pub trait ApiTransport: Send + Sync {
    /// Sends one request and returns the raw response.
    ///
    /// Non-2xx statuses are returned as `Ok`; only failures to obtain a
    /// response at all are errors.
    async fn send(&self, request: ApiRequest) -> Result<ApiResponse, ApiError>;
}

/// Backend client bound to one base URL.
#[derive(Clone)]
pub struct ApiClient {
    base: Url,
    transport: Arc<dyn ApiTransport>,
}

impl ApiClient {
    /// Creates a client for `base`.
    ///
    /// # Errors
    /// Returns [`ApiError::InvalidEndpoint`] when the base is not an
    /// `http`/`https` URL.
    pub fn new(base: Url, transport: Arc<dyn ApiTransport>) -> Result<Self, ApiError> {
        if !matches!(base.scheme(), "http" | "https") {
            return Err(ApiError::InvalidEndpoint(format!(
                "unsupported scheme {:?} in base url {base}",
                base.scheme()
            )));
        }

        Ok(Self { base, transport })
    }

    /// Returns the configured base URL.
    pub fn base_url(&self) -> &Url {
        &self.base
    }

    /// Resolves `path` (with optional query) below the base URL.
    ///
    /// A base path such as `/api` is kept: `/api` + `/health` -> `/api/health`.
    ///
    /// # Errors
    /// Returns [`ApiError::InvalidEndpoint`] when the joined URL is invalid.
    pub fn endpoint(&self, path: &str) -> Result<Url, ApiError> {
        let mut base = self.base.clone();
        if !base.path().ends_with('/') {
            let with_slash = format!("{}/", base.path());
            base.set_path(&with_slash);
        }

        base.join(path.trim_start_matches('/'))
            .map_err(|error| ApiError::InvalidEndpoint(format!("cannot resolve {path}: {error}")))
    }

    /// `GET /health`.
    ///
    /// # Errors
    /// Any transport, status, or decode failure.
    pub async fn health(&self) -> Result<HealthReport, ApiError> {
        let response = self.execute(Method::Get, "/health", RequestBody::Empty).await?;
        Ok(parse_health_response(&response.body)?)
    }

    /// `POST /predict` with the image under field `file`.
    ///
    /// # Errors
    /// Any transport, status, or decode failure.
    pub async fn predict(&self, image: &PickedFile) -> Result<PredictionResult, ApiError> {
        let response = self
            .execute(Method::Post, "/predict", multipart(image))
            .await?;
        Ok(parse_prediction_response(&response.body)?)
    }

    /// `POST /upload_data` with the archive under field `file`.
    ///
    /// The success body is not inspected.
    ///
    /// # Errors
    /// [`ApiError::Status`] carries the server `detail` string when present.
    pub async fn upload_training_data(&self, archive: &PickedFile) -> Result<(), ApiError> {
        self.execute(Method::Post, "/upload_data", multipart(archive))
            .await?;
        Ok(())
    }

    /// `POST /train?force=<force>` with no body.
    ///
    /// # Errors
    /// Any transport, status, or decode failure.
    pub async fn trigger_training(&self, force: bool) -> Result<TrainResponse, ApiError> {
        let path = format!("/train?force={force}");
        let response = self.execute(Method::Post, &path, RequestBody::Empty).await?;
        Ok(parse_train_response(&response.body)?)
    }

    /// `GET /train/status?pid=<pid>`.
    ///
    /// # Errors
    /// Any transport, status, or decode failure; a status body naming another
    /// pid is a contract error.
    pub async fn training_status(&self, pid: u64) -> Result<TrainingStatus, ApiError> {
        let path = format!("/train/status?pid={pid}");
        let response = self.execute(Method::Get, &path, RequestBody::Empty).await?;
        Ok(parse_training_status(&response.body, pid)?)
    }

    async fn execute(
        &self,
        method: Method,
        path: &str,
        body: RequestBody,
    ) -> Result<ApiResponse, ApiError> {
        let url = self.endpoint(path)?;
        debug!("{method:?} {url}");

        let response = self.transport.send(ApiRequest { method, url, body }).await?;
        if !response.is_success() {
            return Err(ApiError::Status {
                status: response.status,
                detail: error_detail(&response.body),
            });
        }

        Ok(response)
    }
}

fn multipart(file: &PickedFile) -> RequestBody {
    RequestBody::Multipart {
        field: FILE_FIELD.to_string(),
        file: file.clone(),
    }
}

/// Errors produced by the API client and transports.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Base URL or endpoint path cannot form a valid URL.
    #[error("invalid endpoint: {0}")]
    InvalidEndpoint(String),
    /// Request could not be built (for example an invalid media type).
    #[error("invalid request: {0}")]
    InvalidRequest(String),
    /// No response was obtained (DNS, refused connection, reset).
    #[error("transport failure: {0}")]
    Transport(String),
    /// Backend answered with a non-2xx status.
    #[error("backend returned status {status}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// String `detail` from the error body, if any.
        detail: Option<String>,
    },
    /// 2xx body did not match the contract.
    #[error("contract error: {0}")]
    Contract(#[from] ContractError),
}

impl ApiError {
    /// Returns `true` when the backend was never reached.
    pub fn is_connectivity(&self) -> bool {
        matches!(self, ApiError::Transport(_))
    }

    /// Returns the server-provided detail message, if any.
    pub fn detail(&self) -> Option<&str> {
        match self {
            ApiError::Status { detail, .. } => detail.as_deref(),
            _ => None,
        }
    }
}
