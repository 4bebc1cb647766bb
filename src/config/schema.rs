use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_FRAGMENT_DIR: &str = "secciones";
pub const DEFAULT_SHELL: &str = "index.html";
pub const DEFAULT_FETCH_TIMEOUT_MS: u64 = 10_000;
pub const DEFAULT_LOADING_PLACEHOLDER: &str = r#"<div class="loading-spinner"></div>"#;
pub const DEFAULT_ERROR_PLACEHOLDER: &str =
    r#"<div class="error-message">Error al cargar la sección</div>"#;

/// One registry entry: which fragment goes into which container.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FragmentSpec {
    #[serde(alias = "id", alias = "containerId")]
    pub container_id: String,
    #[serde(alias = "file", alias = "fileName")]
    pub source_name: String,
}

impl FragmentSpec {
    pub fn new(container_id: impl Into<String>, source_name: impl Into<String>) -> Self {
        Self {
            container_id: container_id.into(),
            source_name: source_name.into(),
        }
    }
}

/// The six sections of the landing page, in document order.
pub fn default_sections() -> Vec<FragmentSpec> {
    [
        ("navbar-container", "navbar.html"),
        ("hero-container", "hero.html"),
        ("features-container", "features.html"),
        ("tatuadores-container", "tatuadores.html"),
        ("galeria-container", "galeria.html"),
        ("cta-container", "cta.html"),
    ]
    .into_iter()
    .map(|(id, file)| FragmentSpec::new(id, file))
    .collect()
}

/// Asset path rewriting rules applied to every fragment body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RewriteRules {
    /// Absolute directory bare images are moved under.
    pub artifact_dir: String,
    /// Bare image filenames fragments are allowed to reference.
    pub images: Vec<String>,
    /// Relative video prefix that gets rooted at `/`.
    pub video_prefix: String,
}

impl Default for RewriteRules {
    fn default() -> Self {
        Self {
            artifact_dir: "/artifacts".to_string(),
            images: vec!["logo.png".to_string(), "founder.jpg".to_string()],
            video_prefix: "videos/".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Placeholders {
    pub loading: String,
    pub error: String,
}

impl Default for Placeholders {
    fn default() -> Self {
        Self {
            loading: DEFAULT_LOADING_PLACEHOLDER.to_string(),
            error: DEFAULT_ERROR_PLACEHOLDER.to_string(),
        }
    }
}

/// Base URL configuration for outbound asset references.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AssetConfig {
    /// Empty or absent means root-relative paths.
    pub base_url: Option<String>,
    // Reference only, never used to build URLs.
    pub s3_bucket: Option<String>,
    pub s3_region: Option<String>,
}

impl Default for AssetConfig {
    fn default() -> Self {
        Self {
            base_url: None,
            s3_bucket: Some("app-pinohub-landing".to_string()),
            s3_region: Some("us-east-1".to_string()),
        }
    }
}

/// Where fragments are fetched from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SourceConfig {
    /// Page origin served over HTTP(S).
    Http { base_url: String },
    /// Local site root on disk.
    Dir { root: PathBuf },
}

impl Default for SourceConfig {
    fn default() -> Self {
        SourceConfig::Dir {
            root: PathBuf::from("."),
        }
    }
}

/// Connection pool options for the HTTP source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpPoolConfig {
    pub pool_max_idle_per_host: usize,
    pub pool_idle_timeout_secs: u64,
    pub tcp_keepalive_secs: Option<u64>,
    pub http2_enabled: bool,
}

impl Default for HttpPoolConfig {
    fn default() -> Self {
        Self {
            pool_max_idle_per_host: 10,
            pool_idle_timeout_secs: 90,
            tcp_keepalive_secs: Some(60),
            http2_enabled: true,
        }
    }
}

impl HttpPoolConfig {
    pub fn pool_idle_timeout(&self) -> Duration {
        Duration::from_secs(self.pool_idle_timeout_secs)
    }

    pub fn tcp_keepalive(&self) -> Option<Duration> {
        self.tcp_keepalive_secs.map(Duration::from_secs)
    }
}

/// Full composer configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ComposerConfig {
    /// Shell page, relative to the source root.
    pub shell: String,
    pub fragment_dir: String,
    pub fetch_timeout_ms: u64,
    pub sections: Vec<FragmentSpec>,
    pub rewrite: RewriteRules,
    pub placeholders: Placeholders,
    pub assets: AssetConfig,
    pub source: SourceConfig,
    pub http: HttpPoolConfig,
    /// Element holding the `© YYYY` notice refreshed after composition.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub footer_id: Option<String>,
}

impl Default for ComposerConfig {
    fn default() -> Self {
        Self {
            shell: DEFAULT_SHELL.to_string(),
            fragment_dir: DEFAULT_FRAGMENT_DIR.to_string(),
            fetch_timeout_ms: DEFAULT_FETCH_TIMEOUT_MS,
            sections: default_sections(),
            rewrite: RewriteRules::default(),
            placeholders: Placeholders::default(),
            assets: AssetConfig::default(),
            source: SourceConfig::default(),
            http: HttpPoolConfig::default(),
            footer_id: None,
        }
    }
}

impl ComposerConfig {
    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_millis(self.fetch_timeout_ms)
    }

    /// Path of a fragment relative to the page origin, e.g. `secciones/hero.html`.
    pub fn fragment_path(&self, source_name: &str) -> String {
        let dir = self.fragment_dir.trim_matches('/');
        let name = source_name.trim_start_matches('/');
        if dir.is_empty() {
            name.to_string()
        } else {
            format!("{}/{}", dir, name)
        }
    }
}
