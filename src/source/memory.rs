use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use super::FragmentSource;
use crate::error::{FragmentError, FragmentResult};

#[derive(Debug, Clone)]
enum Response {
    Body(String),
    Status(u16),
    Transport(String),
}

#[derive(Debug, Clone)]
struct Entry {
    response: Response,
    delay: Option<Duration>,
}

/// In-process source with canned responses. Unknown paths answer 404.
#[derive(Debug, Default)]
pub struct MemoryFragmentSource {
    entries: HashMap<String, Entry>,
    requests: AtomicUsize,
    log: Mutex<Vec<String>>,
}

impl MemoryFragmentSource {
    pub fn new() -> Self {
        Self::default()
    }

    fn insert(mut self, path: &str, response: Response) -> Self {
        self.entries.insert(
            path.trim_start_matches('/').to_string(),
            Entry {
                response,
                delay: None,
            },
        );
        self
    }

    pub fn with_fragment(self, path: &str, body: impl Into<String>) -> Self {
        self.insert(path, Response::Body(body.into()))
    }

    pub fn with_status(self, path: &str, status: u16) -> Self {
        self.insert(path, Response::Status(status))
    }

    pub fn with_transport_error(self, path: &str, message: impl Into<String>) -> Self {
        self.insert(path, Response::Transport(message.into()))
    }

    /// Delay the response for an already registered path.
    pub fn with_delay(mut self, path: &str, delay: Duration) -> Self {
        if let Some(entry) = self.entries.get_mut(path.trim_start_matches('/')) {
            entry.delay = Some(delay);
        }
        self
    }

    pub fn request_count(&self) -> usize {
        self.requests.load(Ordering::SeqCst)
    }

    /// Requested paths in arrival order.
    pub fn requested_paths(&self) -> Vec<String> {
        self.log.lock().clone()
    }
}

#[async_trait]
impl FragmentSource for MemoryFragmentSource {
    async fn fetch(&self, path: &str) -> FragmentResult<String> {
        let key = path.trim_start_matches('/');
        self.requests.fetch_add(1, Ordering::SeqCst);
        self.log.lock().push(key.to_string());

        let Some(entry) = self.entries.get(key) else {
            return Err(FragmentError::Fetch { status: 404 });
        };
        if let Some(delay) = entry.delay {
            tokio::time::sleep(delay).await;
        }
        match &entry.response {
            Response::Body(body) => Ok(body.clone()),
            Response::Status(status) if (200..300).contains(status) => Ok(String::new()),
            Response::Status(status) => Err(FragmentError::Fetch { status: *status }),
            Response::Transport(message) => Err(FragmentError::Transport(message.clone())),
        }
    }

    fn describe(&self) -> String {
        format!("memory:{} fragments", self.entries.len())
    }
}
