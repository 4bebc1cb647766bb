use std::collections::HashSet;

use super::schema::{ComposerConfig, SourceConfig};
use crate::error::{ComposeError, ComposeResult};

/// Validate a parsed ComposerConfig
pub fn validate_config(config: &ComposerConfig) -> ComposeResult<()> {
    if config.fetch_timeout_ms == 0 {
        return Err(ComposeError::ConfigInvalid(
            "fetch_timeout_ms must be greater than zero".into(),
        ));
    }

    if config.shell.trim().is_empty() {
        return Err(ComposeError::ConfigInvalid("shell path is empty".into()));
    }

    // Check registry entries and unique container IDs
    let mut ids = HashSet::new();
    for spec in &config.sections {
        if spec.container_id.trim().is_empty() {
            return Err(ComposeError::ConfigInvalid("empty container id".into()));
        }
        if spec.source_name.trim().is_empty() {
            return Err(ComposeError::ConfigInvalid(format!(
                "empty source name for container: {}",
                spec.container_id
            )));
        }
        if !ids.insert(spec.container_id.as_str()) {
            return Err(ComposeError::ConfigInvalid(format!(
                "duplicate container id: {}",
                spec.container_id
            )));
        }
    }

    // Rewrite targets end up inside a double-quoted attribute
    for image in &config.rewrite.images {
        if image.is_empty() || image.contains('"') || image.contains('/') {
            return Err(ComposeError::ConfigInvalid(format!(
                "invalid bare image name: {:?}",
                image
            )));
        }
    }
    let prefix = &config.rewrite.video_prefix;
    if prefix.is_empty() || prefix.starts_with('/') || prefix.contains('"') {
        return Err(ComposeError::ConfigInvalid(format!(
            "video prefix must be a bare relative path: {:?}",
            prefix
        )));
    }
    let artifact_dir = &config.rewrite.artifact_dir;
    if !artifact_dir.starts_with('/') || artifact_dir.trim_matches('/').is_empty() {
        return Err(ComposeError::ConfigInvalid(format!(
            "artifact_dir must be an absolute directory below the root: {}",
            artifact_dir
        )));
    }

    if config.footer_id.as_deref().is_some_and(|id| id.trim().is_empty()) {
        return Err(ComposeError::ConfigInvalid("empty footer id".into()));
    }

    if let SourceConfig::Http { base_url } = &config.source {
        url::Url::parse(base_url).map_err(|e| {
            ComposeError::ConfigInvalid(format!("invalid source base_url {}: {}", base_url, e))
        })?;
    }

    Ok(())
}
