//! Page behavior initialization.
//!
//! Initializers query the composed document, so they take a
//! [`SectionsReady`] token and can only run after composition. Register them
//! before the load cycle starts; [`InitializerRegistry::attach`] runs them once
//! the completion signal fires.

pub mod builtin;

use serde::Serialize;
use std::sync::Arc;
use tokio::sync::oneshot;
use tracing::{error, info};

use crate::assets::AssetUrlResolver;
use crate::composer::{CompletionSignal, SectionsReady};
use crate::config::ComposerConfig;
use crate::document::Document;
use crate::error::InitError;

pub use builtin::{AssetBaseUrls, FooterYear};

pub trait PageInitializer: Send + Sync {
    fn name(&self) -> &str;

    fn initialize(&self, document: &Document, ready: &SectionsReady) -> Result<(), InitError>;
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct InitReport {
    pub succeeded: Vec<String>,
    pub failed: Vec<(String, String)>,
}

/// Ordered set of initializers; one failing does not stop the rest.
#[derive(Default)]
pub struct InitializerRegistry {
    initializers: Vec<Arc<dyn PageInitializer>>,
}

impl InitializerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// The built-in initializers a configuration asks for.
    pub fn from_config(config: &ComposerConfig) -> Self {
        let mut registry = Self::new();
        registry.register(AssetBaseUrls::new(
            AssetUrlResolver::from_config(&config.assets),
            &config.rewrite,
        ));
        if let Some(footer_id) = &config.footer_id {
            registry.register(FooterYear::current(footer_id.as_str()));
        }
        registry
    }

    pub fn register(&mut self, initializer: impl PageInitializer + 'static) -> &mut Self {
        self.initializers.push(Arc::new(initializer));
        self
    }

    pub fn len(&self) -> usize {
        self.initializers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.initializers.is_empty()
    }

    /// Run every initializer in registration order.
    pub fn run(&self, document: &Document, ready: &SectionsReady) -> InitReport {
        info!(initializers = self.initializers.len(), "Initializing page behavior");
        let mut report = InitReport::default();
        for initializer in &self.initializers {
            match initializer.initialize(document, ready) {
                Ok(()) => report.succeeded.push(initializer.name().to_string()),
                Err(e) => {
                    error!(initializer = initializer.name(), error = %e, "Initializer failed");
                    report
                        .failed
                        .push((initializer.name().to_string(), e.to_string()));
                }
            }
        }
        report
    }

    /// Run on completion. The receiver yields the report once they ran.
    pub fn attach(
        self,
        signal: &CompletionSignal,
        document: Arc<Document>,
    ) -> oneshot::Receiver<InitReport> {
        let (tx, rx) = oneshot::channel();
        signal.on_complete(move |ready| {
            let report = self.run(&document, ready);
            let _ = tx.send(report);
        });
        rx
    }
}

impl std::fmt::Debug for InitializerRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let names: Vec<&str> = self.initializers.iter().map(|i| i.name()).collect();
        f.debug_struct("InitializerRegistry")
            .field("initializers", &names)
            .finish()
    }
}
