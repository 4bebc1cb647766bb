use async_trait::async_trait;
use url::Url;

use super::FragmentSource;
use crate::config::HttpPoolConfig;
use crate::error::{ComposeError, ComposeResult, FragmentError, FragmentResult};

/// Fetches fragments with `GET <origin>/<path>`.
///
/// The per-fragment deadline is enforced by the composer, not by the client,
/// so a slow origin surfaces as the same transport error whatever the source.
#[derive(Debug, Clone)]
pub struct HttpFragmentSource {
    base_url: Url,
    client: reqwest::Client,
}

impl HttpFragmentSource {
    pub fn new(base_url: &str, config: &HttpPoolConfig) -> ComposeResult<Self> {
        let client = Self::build_client(config)?;
        Self::with_client(base_url, client)
    }

    pub fn with_client(base_url: &str, client: reqwest::Client) -> ComposeResult<Self> {
        let mut base_url = Url::parse(base_url)
            .map_err(|e| ComposeError::Source(format!("invalid base url {}: {}", base_url, e)))?;
        // `Url::join` drops the last segment unless the base ends with '/'
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }
        Ok(Self { base_url, client })
    }

    fn build_client(config: &HttpPoolConfig) -> ComposeResult<reqwest::Client> {
        let mut builder = reqwest::Client::builder()
            .pool_max_idle_per_host(config.pool_max_idle_per_host)
            .pool_idle_timeout(config.pool_idle_timeout())
            .tcp_keepalive(config.tcp_keepalive());

        if !config.http2_enabled {
            builder = builder.http1_only();
        }

        builder
            .build()
            .map_err(|e| ComposeError::Source(e.to_string()))
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn url_for(&self, path: &str) -> FragmentResult<Url> {
        self.base_url
            .join(path.trim_start_matches('/'))
            .map_err(|e| FragmentError::Transport(format!("invalid fragment path {}: {}", path, e)))
    }
}

#[async_trait]
impl FragmentSource for HttpFragmentSource {
    async fn fetch(&self, path: &str) -> FragmentResult<String> {
        let url = self.url_for(path)?;
        let resp = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| FragmentError::Transport(e.to_string()))?;

        let status = resp.status();
        if !status.is_success() {
            return Err(FragmentError::Fetch {
                status: status.as_u16(),
            });
        }

        resp.text()
            .await
            .map_err(|e| FragmentError::Transport(e.to_string()))
    }

    fn describe(&self) -> String {
        format!("http:{}", self.base_url)
    }
}
