//! One-shot completion signal.
//!
//! Fired once per load cycle after every fragment settled. Unlike a DOM event
//! it keeps its value: [`CompletionSignal::wait`] and
//! [`CompletionSignal::on_complete`] still observe it after it fired.

use parking_lot::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::watch;

use super::outcome::ComposeReport;

/// Proof that the page has been composed.
///
/// Only the composer can create one, so code that takes `&SectionsReady`
/// cannot run before the containers it queries exist.
#[derive(Debug, Clone)]
pub struct SectionsReady {
    report: Arc<ComposeReport>,
}

impl SectionsReady {
    pub(crate) fn new(report: ComposeReport) -> Self {
        Self {
            report: Arc::new(report),
        }
    }

    pub fn report(&self) -> &ComposeReport {
        &self.report
    }
}

type Listener = Box<dyn FnOnce(&SectionsReady) + Send>;

pub struct CompletionSignal {
    fired: AtomicBool,
    state: watch::Sender<Option<SectionsReady>>,
    listeners: Mutex<Vec<Listener>>,
}

impl CompletionSignal {
    pub fn new() -> Self {
        let (state, _) = watch::channel(None);
        Self {
            fired: AtomicBool::new(false),
            state,
            listeners: Mutex::new(Vec::new()),
        }
    }

    pub fn shared() -> Arc<Self> {
        Arc::new(Self::new())
    }

    pub fn is_fired(&self) -> bool {
        self.fired.load(Ordering::SeqCst)
    }

    /// The token, if the signal already fired.
    pub fn ready(&self) -> Option<SectionsReady> {
        self.state.borrow().clone()
    }

    /// Run `listener` once with the token. Runs immediately if already fired.
    pub fn on_complete<F>(&self, listener: F)
    where
        F: FnOnce(&SectionsReady) + Send + 'static,
    {
        let mut listeners = self.listeners.lock();
        if let Some(ready) = self.ready() {
            drop(listeners);
            listener(&ready);
            return;
        }
        listeners.push(Box::new(listener));
    }

    /// Resolves with the token once the signal fired.
    pub async fn wait(&self) -> SectionsReady {
        let mut rx = self.state.subscribe();
        loop {
            let current = rx.borrow_and_update().clone();
            if let Some(ready) = current {
                return ready;
            }
            if rx.changed().await.is_err() {
                // `self` owns the sender, so this is unreachable while borrowed.
                std::future::pending::<()>().await;
            }
        }
    }

    /// Fire the signal. Returns `false` (and does nothing) if it already fired.
    pub(crate) fn fire(&self, ready: SectionsReady) -> bool {
        if self
            .fired
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            tracing::warn!("Completion signal already fired; ignoring second emission");
            return false;
        }

        let listeners = {
            let mut guard = self.listeners.lock();
            self.state.send_replace(Some(ready.clone()));
            std::mem::take(&mut *guard)
        };
        tracing::debug!(listeners = listeners.len(), "Completion signal fired");
        for listener in listeners {
            listener(&ready);
        }
        true
    }
}

impl Default for CompletionSignal {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for CompletionSignal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CompletionSignal")
            .field("fired", &self.is_fired())
            .field("pending_listeners", &self.listeners.lock().len())
            .finish()
    }
}
