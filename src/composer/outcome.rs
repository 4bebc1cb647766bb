use chrono::{DateTime, Utc};
use serde::Serialize;
use std::time::Duration;

use crate::config::FragmentSpec;
use crate::error::{ErrorContext, FragmentError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FragmentState {
    Pending,
    Loaded,
    Failed,
    /// The container was absent; nothing was written.
    Skipped,
}

impl FragmentState {
    pub fn is_settled(&self) -> bool {
        !matches!(self, FragmentState::Pending)
    }
}

/// Result of one fragment load. The fetched body is not kept here: it belongs
/// to the load call and is gone once injected.
#[derive(Debug, Clone, Serialize)]
pub struct FragmentOutcome {
    pub container_id: String,
    pub source_name: String,
    pub state: FragmentState,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorContext>,
    pub elapsed_ms: u64,
}

impl FragmentOutcome {
    pub fn pending(spec: &FragmentSpec) -> Self {
        Self {
            container_id: spec.container_id.clone(),
            source_name: spec.source_name.clone(),
            state: FragmentState::Pending,
            error: None,
            elapsed_ms: 0,
        }
    }

    fn settle(mut self, state: FragmentState, error: Option<&FragmentError>, elapsed: Duration) -> Self {
        debug_assert!(!self.state.is_settled(), "outcome settled twice");
        self.state = state;
        self.error = error.map(FragmentError::to_context);
        self.elapsed_ms = elapsed.as_millis() as u64;
        self
    }

    pub fn loaded(self, elapsed: Duration) -> Self {
        self.settle(FragmentState::Loaded, None, elapsed)
    }

    pub fn failed(self, error: &FragmentError, elapsed: Duration) -> Self {
        self.settle(FragmentState::Failed, Some(error), elapsed)
    }

    pub fn skipped(self, error: &FragmentError) -> Self {
        self.settle(FragmentState::Skipped, Some(error), Duration::ZERO)
    }
}

/// Summary of one load cycle.
#[derive(Debug, Clone, Serialize)]
pub struct ComposeReport {
    pub outcomes: Vec<FragmentOutcome>,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

impl ComposeReport {
    pub fn new(
        outcomes: Vec<FragmentOutcome>,
        started_at: DateTime<Utc>,
        finished_at: DateTime<Utc>,
    ) -> Self {
        Self {
            outcomes,
            started_at,
            finished_at,
        }
    }

    fn count(&self, state: FragmentState) -> usize {
        self.outcomes.iter().filter(|o| o.state == state).count()
    }

    pub fn loaded(&self) -> usize {
        self.count(FragmentState::Loaded)
    }

    pub fn failed(&self) -> usize {
        self.count(FragmentState::Failed)
    }

    pub fn skipped(&self) -> usize {
        self.count(FragmentState::Skipped)
    }

    /// Every outcome reached a terminal state.
    pub fn is_settled(&self) -> bool {
        self.outcomes.iter().all(|o| o.state.is_settled())
    }

    pub fn all_loaded(&self) -> bool {
        self.outcomes.iter().all(|o| o.state == FragmentState::Loaded)
    }

    pub fn outcome(&self, container_id: &str) -> Option<&FragmentOutcome> {
        self.outcomes.iter().find(|o| o.container_id == container_id)
    }
}
