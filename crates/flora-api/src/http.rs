//! `reqwest`-backed transport.

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};

use crate::{ApiError, ApiRequest, ApiResponse, ApiTransport, Method, RequestBody};

/// Production transport over a shared `reqwest::Client`.
///
/// No request-level timeout is configured; the client's own defaults apply.
#[derive(Debug, Clone, Default)]
pub struct HttpTransport {
    client: reqwest::Client,
}

impl HttpTransport {
    /// Creates a transport with a default client.
    pub fn new() -> Self {
        Self::default()
    }

    /// Wraps an existing client (for custom TLS or proxy settings).
    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ApiTransport for HttpTransport {
    async fn send(&self, request: ApiRequest) -> Result<ApiResponse, ApiError> {
        let builder = match request.method {
            Method::Get => self.client.get(request.url),
            Method::Post => self.client.post(request.url),
        };

        let builder = match request.body {
            RequestBody::Empty => builder,
            RequestBody::Multipart { field, file } => {
                let mut part = Part::bytes(file.bytes.to_vec()).file_name(file.name.clone());
                if !file.media_type.is_empty() {
                    part = part.mime_str(&file.media_type).map_err(|error| {
                        ApiError::InvalidRequest(format!(
                            "invalid media type {:?}: {error}",
                            file.media_type
                        ))
                    })?;
                }
                builder.multipart(Form::new().part(field, part))
            }
        };

        let response = builder
            .send()
            .await
            .map_err(|error| ApiError::Transport(error.to_string()))?;
        let status = response.status().as_u16();
        let body = response
            .bytes()
            .await
            .map_err(|error| ApiError::Transport(format!("failed reading body: {error}")))?;

        Ok(ApiResponse {
            status,
            body: body.to_vec(),
        })
    }
}
