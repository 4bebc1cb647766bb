//! Fragment sources.
//!
//! A [`FragmentSource`] turns an origin-relative path (`secciones/hero.html`)
//! into the fragment body. Any non-success status is a
//! [`FragmentError::Fetch`](crate::error::FragmentError::Fetch); anything lower
//! level is a transport error.

pub mod fs;
#[cfg(feature = "http-source")]
pub mod http;
pub mod memory;

use async_trait::async_trait;
use std::sync::Arc;

use crate::config::{HttpPoolConfig, SourceConfig};
use crate::error::{ComposeResult, FragmentResult};

pub use fs::DirFragmentSource;
#[cfg(feature = "http-source")]
pub use http::HttpFragmentSource;
pub use memory::MemoryFragmentSource;

#[async_trait]
pub trait FragmentSource: Send + Sync {
    /// Fetch the body at `path`, relative to the page origin.
    async fn fetch(&self, path: &str) -> FragmentResult<String>;

    /// Short label used in logs.
    fn describe(&self) -> String;
}

/// Build the source named by the config.
#[cfg(feature = "http-source")]
pub fn source_from_config(
    source: &SourceConfig,
    http: &HttpPoolConfig,
) -> ComposeResult<Arc<dyn FragmentSource>> {
    match source {
        SourceConfig::Http { base_url } => Ok(Arc::new(HttpFragmentSource::new(base_url, http)?)),
        SourceConfig::Dir { root } => Ok(Arc::new(DirFragmentSource::new(root.clone()))),
    }
}

/// Build the source named by the config.
#[cfg(not(feature = "http-source"))]
pub fn source_from_config(
    source: &SourceConfig,
    _http: &HttpPoolConfig,
) -> ComposeResult<Arc<dyn FragmentSource>> {
    match source {
        SourceConfig::Http { base_url } => Err(crate::error::ComposeError::Source(format!(
            "http source {} requires the `http-source` feature",
            base_url
        ))),
        SourceConfig::Dir { root } => Ok(Arc::new(DirFragmentSource::new(root.clone()))),
    }
}
