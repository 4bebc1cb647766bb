//! Asset URL resolution for outbound resource references.

use crate::config::AssetConfig;

/// Maps root-relative asset paths to the URL they are served from.
///
/// With no base URL the path stays root-relative, which works both locally and
/// when the page itself is served from the bucket.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AssetUrlResolver {
    base_url: Option<String>,
}

impl AssetUrlResolver {
    pub fn new(base_url: Option<&str>) -> Self {
        let base_url = base_url
            .map(|b| b.trim().trim_end_matches('/'))
            .filter(|b| !b.is_empty())
            .map(str::to_string);
        Self { base_url }
    }

    pub fn from_config(config: &AssetConfig) -> Self {
        Self::new(config.base_url.as_deref())
    }

    pub fn base_url(&self) -> Option<&str> {
        self.base_url.as_deref()
    }

    /// `artifacts/logo.png` → `/artifacts/logo.png`, prefixed with the base URL
    /// when one is configured.
    pub fn resolve(&self, path: &str) -> String {
        let normalized = if path.starts_with('/') {
            path.to_string()
        } else {
            format!("/{}", path)
        };
        match &self.base_url {
            Some(base) => format!("{}{}", base, normalized),
            None => normalized,
        }
    }
}
