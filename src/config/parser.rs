//! Config parser: converts raw YAML/JSON/TOML text into [`ComposerConfig`].

use std::path::Path;

use super::schema::ComposerConfig;
use super::validator::validate_config;
use crate::error::{ComposeError, ComposeResult};

/// Supported config formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    /// YAML format (`.yaml` / `.yml`).
    Yaml,
    /// JSON format (`.json`).
    Json,
    /// TOML format (`.toml`).
    Toml,
}

impl ConfigFormat {
    /// Pick the format from a file extension.
    pub fn from_path(path: &Path) -> Option<Self> {
        match path.extension()?.to_str()?.to_ascii_lowercase().as_str() {
            "yaml" | "yml" => Some(ConfigFormat::Yaml),
            "json" => Some(ConfigFormat::Json),
            "toml" => Some(ConfigFormat::Toml),
            _ => None,
        }
    }
}

/// Parse and validate config content.
pub fn parse_config(content: &str, format: ConfigFormat) -> ComposeResult<ComposerConfig> {
    let config: ComposerConfig = match format {
        ConfigFormat::Yaml => serde_saphyr::from_str(content)
            .map_err(|e| ComposeError::ConfigParse(e.to_string()))?,
        ConfigFormat::Json => serde_json::from_str(content)?,
        ConfigFormat::Toml => {
            toml::from_str(content).map_err(|e| ComposeError::ConfigParse(e.to_string()))?
        }
    };
    validate_config(&config)?;
    Ok(config)
}

/// Read a config file, choosing the format from its extension.
pub fn load_config_file(path: impl AsRef<Path>) -> ComposeResult<ComposerConfig> {
    let path = path.as_ref();
    let format = ConfigFormat::from_path(path).ok_or_else(|| {
        ComposeError::ConfigParse(format!("unsupported config extension: {}", path.display()))
    })?;
    let content = std::fs::read_to_string(path)?;
    parse_config(&content, format)
}
