use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::mpsc;

/// Composition events, delivered to an optional observer channel.
#[derive(Clone, Debug, Serialize)]
pub enum ComposeEvent {
    /// Placeholder written, fetch issued
    FragmentStarted {
        container_id: String,
        source_name: String,
        timestamp: DateTime<Utc>,
    },

    FragmentLoaded {
        container_id: String,
        bytes: usize,
        elapsed_ms: u64,
        timestamp: DateTime<Utc>,
    },

    FragmentFailed {
        container_id: String,
        error: String,
        timestamp: DateTime<Utc>,
    },

    ContainerMissing {
        container_id: String,
        timestamp: DateTime<Utc>,
    },

    /// Every fragment settled; the completion signal fires right after.
    AllSettled {
        loaded: usize,
        failed: usize,
        skipped: usize,
        timestamp: DateTime<Utc>,
    },
}

pub type EventSender = mpsc::UnboundedSender<ComposeEvent>;

pub type EventReceiver = mpsc::UnboundedReceiver<ComposeEvent>;


pub fn create_event_channel() -> (EventSender, EventReceiver) {
    mpsc::unbounded_channel()
}
