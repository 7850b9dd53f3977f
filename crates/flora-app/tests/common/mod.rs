//! Shared fixtures for controller integration tests.

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use flora_api::{ApiError, ApiRequest, ApiResponse, ApiTransport};
use flora_app::{ClientConfig, ClientController, Profile};
use flora_core::PickedFile;
use flora_ui::MemoryView;

/// One scripted reply.
#[derive(Debug, Clone)]
#[allow(dead_code)]
pub enum Reply {
    /// Respond with a status and body.
    Respond(u16, String),
    /// Fail without a response.
    Unreachable,
}

impl Reply {
    /// Convenience JSON response.
    #[allow(dead_code)]
    pub fn json(status: u16, body: &str) -> Self {
        Reply::Respond(status, body.to_string())
    }
}

/// In-memory transport keyed by URL path.
///
/// Replies are consumed in order; the last reply for a path repeats.
/// Unscripted paths answer 404.
#[derive(Debug, Default)]
pub struct ScriptedTransport {
    replies: Mutex<HashMap<String, VecDeque<Reply>>>,
    requests: Mutex<Vec<ApiRequest>>,
}

#[allow(dead_code)]
impl ScriptedTransport {
    /// Queues `reply` for `path`.
    pub fn push(&self, path: &str, reply: Reply) {
        self.replies
            .lock()
            .expect("replies lock should work")
            .entry(path.to_string())
            .or_default()
            .push_back(reply);
    }

    /// All requests seen so far.
    pub fn requests(&self) -> Vec<ApiRequest> {
        self.requests.lock().expect("requests lock should work").clone()
    }

    /// Number of requests sent to `path`.
    pub fn count(&self, path: &str) -> usize {
        self.requests()
            .iter()
            .filter(|request| request.url.path() == path)
            .count()
    }
}

#[async_trait]
impl ApiTransport for ScriptedTransport {
    async fn send(&self, request: ApiRequest) -> Result<ApiResponse, ApiError> {
        let path = request.url.path().to_string();
        self.requests
            .lock()
            .expect("requests lock should work")
            .push(request);

        let reply = {
            let mut replies = self.replies.lock().expect("replies lock should work");
            match replies.get_mut(&path) {
                Some(queue) if queue.len() > 1 => queue.pop_front(),
                Some(queue) => queue.front().cloned(),
                None => None,
            }
        };

        match reply {
            Some(Reply::Respond(status, body)) => Ok(ApiResponse {
                status,
                body: body.into_bytes(),
            }),
            Some(Reply::Unreachable) => Err(ApiError::Transport("connection refused".to_string())),
            None => Ok(ApiResponse {
                status: 404,
                body: br#"{"detail":"Not Found"}"#.to_vec(),
            }),
        }
    }
}

/// Controller wired to a [`MemoryView`] and a [`ScriptedTransport`].
#[allow(dead_code)]
pub struct Harness {
    pub controller: ClientController,
    pub view: Arc<MemoryView>,
    pub transport: Arc<ScriptedTransport>,
}

/// Local profile pointed at a fake origin.
#[allow(dead_code)]
pub fn local_config() -> ClientConfig {
    ClientConfig {
        origin: "http://flora.test".to_string(),
        ..ClientConfig::for_profile(Profile::Local)
    }
}

/// Builds a harness for `config`.
#[allow(dead_code)]
pub fn harness(config: ClientConfig) -> Harness {
    let view = Arc::new(MemoryView::new());
    let transport = Arc::new(ScriptedTransport::default());
    let controller = ClientController::new(config, transport.clone(), view.clone())
        .expect("controller should build");

    Harness {
        controller,
        view,
        transport,
    }
}

/// Small PNG-typed fixture.
#[allow(dead_code)]
pub fn image_file() -> PickedFile {
    PickedFile::new("sunflower.png", "image/png", b"\x89PNG fixture".to_vec())
}

/// Zip-typed training archive fixture.
#[allow(dead_code)]
pub fn archive_file() -> PickedFile {
    PickedFile::new("extra_flowers.zip", "application/zip", b"PK fixture".to_vec())
}

/// Non-image fixture.
#[allow(dead_code)]
pub fn text_file() -> PickedFile {
    PickedFile::new("readme.txt", "text/plain", b"not an image".to_vec())
}
