use chrono::Utc;
use futures::future::join_all;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::watch;
use tracing::{debug, error, info, warn};

use super::events::{ComposeEvent, EventSender};
use super::outcome::{ComposeReport, FragmentOutcome};
use super::rewrite::AssetRewriter;
use super::signal::{CompletionSignal, SectionsReady};
use crate::config::{validate_config, ComposerConfig, FragmentSpec};
use crate::document::{Document, ReadyState};
use crate::error::{ComposeResult, FragmentError, FragmentResult};
use crate::source::FragmentSource;

/// Load cycle state. A cycle that is dropped before it settles goes back to
/// `Idle`, so the next caller starts over.
#[derive(Debug, Clone)]
enum Cycle {
    Idle,
    Running,
    Done(SectionsReady),
}

/// Resets an abandoned cycle on drop.
struct CycleGuard<'a> {
    cycle: &'a watch::Sender<Cycle>,
    settled: bool,
}

impl Drop for CycleGuard<'_> {
    fn drop(&mut self) {
        if !self.settled {
            warn!("Load cycle cancelled before settling; it will restart on the next call");
            self.cycle.send_replace(Cycle::Idle);
        }
    }
}

/// Composes a [`Document`] from the configured section registry.
pub struct FragmentComposer {
    config: ComposerConfig,
    document: Arc<Document>,
    source: Arc<dyn FragmentSource>,
    rewriter: AssetRewriter,
    signal: Arc<CompletionSignal>,
    event_tx: Option<EventSender>,
    cycle: watch::Sender<Cycle>,
}

impl FragmentComposer {
    pub fn builder(document: Arc<Document>, source: Arc<dyn FragmentSource>) -> FragmentComposerBuilder {
        FragmentComposerBuilder {
            document,
            source,
            config: ComposerConfig::default(),
            signal: None,
            event_tx: None,
        }
    }

    pub fn document(&self) -> &Arc<Document> {
        &self.document
    }

    pub fn signal(&self) -> Arc<CompletionSignal> {
        self.signal.clone()
    }

    pub fn sections(&self) -> &[FragmentSpec] {
        &self.config.sections
    }

    pub fn config(&self) -> &ComposerConfig {
        &self.config
    }

    fn emit(&self, event: ComposeEvent) {
        if let Some(tx) = &self.event_tx {
            let _ = tx.send(event);
        }
    }

    /// Load one fragment into its container.
    ///
    /// Never fails: a missing container is skipped with a warning, a failed
    /// fetch leaves the error placeholder in the container.
    pub async fn load_fragment(&self, spec: &FragmentSpec) -> FragmentOutcome {
        let outcome = FragmentOutcome::pending(spec);
        let container_id = spec.container_id.as_str();

        if !self
            .document
            .set_content(container_id, self.config.placeholders.loading.as_str())
        {
            warn!(container_id, "Container not found: {}", container_id);
            self.emit(ComposeEvent::ContainerMissing {
                container_id: container_id.to_string(),
                timestamp: Utc::now(),
            });
            return outcome.skipped(&FragmentError::ContainerMissing(container_id.to_string()));
        }

        self.emit(ComposeEvent::FragmentStarted {
            container_id: container_id.to_string(),
            source_name: spec.source_name.clone(),
            timestamp: Utc::now(),
        });

        let started = Instant::now();
        match self.fetch_fragment(spec).await {
            Ok(raw) => {
                let html = self.rewriter.rewrite(&raw);
                let bytes = html.len();
                self.document.set_content(container_id, html);
                let elapsed = started.elapsed();
                info!(container_id, bytes, "Section loaded: {}", spec.source_name);
                self.emit(ComposeEvent::FragmentLoaded {
                    container_id: container_id.to_string(),
                    bytes,
                    elapsed_ms: elapsed.as_millis() as u64,
                    timestamp: Utc::now(),
                });
                outcome.loaded(elapsed)
            }
            Err(e) => {
                error!(container_id, error = %e, "Error loading {}", spec.source_name);
                self.document
                    .set_content(container_id, self.config.placeholders.error.as_str());
                self.emit(ComposeEvent::FragmentFailed {
                    container_id: container_id.to_string(),
                    error: e.to_string(),
                    timestamp: Utc::now(),
                });
                outcome.failed(&e, started.elapsed())
            }
        }
    }

    async fn fetch_fragment(&self, spec: &FragmentSpec) -> FragmentResult<String> {
        let path = self.config.fragment_path(&spec.source_name);
        debug!(path = %path, source = %self.source.describe(), "Fetching fragment");
        match tokio::time::timeout(self.config.fetch_timeout(), self.source.fetch(&path)).await {
            Ok(result) => result,
            Err(_) => Err(FragmentError::deadline_exceeded(self.config.fetch_timeout_ms)),
        }
    }

    /// Load every registered fragment concurrently and fire the completion
    /// signal once they all settled.
    ///
    /// Only one cycle completes; concurrent and later calls return its token.
    /// If the running call is dropped first, a waiting or later call reruns it.
    pub async fn load_all_fragments(&self) -> SectionsReady {
        loop {
            let mut claimed = false;
            self.cycle.send_if_modified(|state| {
                if matches!(state, Cycle::Idle) {
                    *state = Cycle::Running;
                    claimed = true;
                }
                false
            });
            if claimed {
                return self.run_cycle().await;
            }
            debug!("Load cycle already started; waiting for it to settle");
            if let Some(ready) = self.settled_cycle().await {
                return ready;
            }
        }
    }

    /// Waits until no cycle is running. `None` means the cycle was abandoned.
    async fn settled_cycle(&self) -> Option<SectionsReady> {
        let mut rx = self.cycle.subscribe();
        let state = rx
            .wait_for(|state| !matches!(state, Cycle::Running))
            .await
            .ok()?;
        match &*state {
            Cycle::Done(ready) => Some(ready.clone()),
            Cycle::Idle | Cycle::Running => None,
        }
    }

    async fn run_cycle(&self) -> SectionsReady {
        let mut guard = CycleGuard {
            cycle: &self.cycle,
            settled: false,
        };

        info!(sections = self.config.sections.len(), "Loading sections");
        let started_at = Utc::now();
        let outcomes = join_all(self.config.sections.iter().map(|spec| self.load_fragment(spec))).await;
        let report = ComposeReport::new(outcomes, started_at, Utc::now());
        debug_assert!(report.is_settled(), "completion fired before every fragment settled");

        if report.failed() == 0 && report.skipped() == 0 {
            info!(loaded = report.loaded(), "All sections loaded");
        } else {
            warn!(
                loaded = report.loaded(),
                failed = report.failed(),
                skipped = report.skipped(),
                "Sections settled with errors"
            );
        }
        self.emit(ComposeEvent::AllSettled {
            loaded: report.loaded(),
            failed: report.failed(),
            skipped: report.skipped(),
            timestamp: Utc::now(),
        });

        let mut ready = SectionsReady::new(report);
        if !self.signal.fire(ready.clone()) {
            // A shared signal fired by another composer keeps its first token.
            if let Some(first) = self.signal.ready() {
                ready = first;
            }
        }
        self.cycle.send_replace(Cycle::Done(ready.clone()));
        guard.settled = true;
        ready
    }

    /// Start composition once the document is parsed.
    pub async fn init(&self) -> SectionsReady {
        if self.document.ready_state() == ReadyState::Loading {
            debug!("Document still loading; deferring section load");
            self.document.parsed().await;
        }
        self.load_all_fragments().await
    }
}

impl std::fmt::Debug for FragmentComposer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FragmentComposer")
            .field("sections", &self.config.sections.len())
            .field("source", &self.source.describe())
            .field("signal", &self.signal)
            .finish()
    }
}

pub struct FragmentComposerBuilder {
    document: Arc<Document>,
    source: Arc<dyn FragmentSource>,
    config: ComposerConfig,
    signal: Option<Arc<CompletionSignal>>,
    event_tx: Option<EventSender>,
}

impl FragmentComposerBuilder {
    pub fn config(mut self, config: ComposerConfig) -> Self {
        self.config = config;
        self
    }

    pub fn sections(mut self, sections: Vec<FragmentSpec>) -> Self {
        self.config.sections = sections;
        self
    }

    /// Share a signal with other subscribers created ahead of the composer.
    pub fn signal(mut self, signal: Arc<CompletionSignal>) -> Self {
        self.signal = Some(signal);
        self
    }

    pub fn event_sender(mut self, tx: EventSender) -> Self {
        self.event_tx = Some(tx);
        self
    }

    pub fn build(self) -> ComposeResult<FragmentComposer> {
        validate_config(&self.config)?;
        let rewriter = AssetRewriter::new(&self.config.rewrite)?;
        Ok(FragmentComposer {
            rewriter,
            config: self.config,
            document: self.document,
            source: self.source,
            signal: self.signal.unwrap_or_else(CompletionSignal::shared),
            event_tx: self.event_tx,
            cycle: watch::channel(Cycle::Idle).0,
        })
    }
}
