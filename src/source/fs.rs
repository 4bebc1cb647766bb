use async_trait::async_trait;
use std::io::ErrorKind;
use std::path::{Component, Path, PathBuf};

use super::FragmentSource;
use crate::error::{FragmentError, FragmentResult};

/// Reads fragments from a local site root, the way a static file server would.
#[derive(Debug, Clone)]
pub struct DirFragmentSource {
    root: PathBuf,
}

impl DirFragmentSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn resolve(&self, path: &str) -> FragmentResult<PathBuf> {
        let relative = Path::new(path.trim_start_matches('/'));
        let escapes = relative
            .components()
            .any(|c| !matches!(c, Component::Normal(_) | Component::CurDir));
        if escapes {
            return Err(FragmentError::Fetch { status: 403 });
        }
        Ok(self.root.join(relative))
    }
}

#[async_trait]
impl FragmentSource for DirFragmentSource {
    async fn fetch(&self, path: &str) -> FragmentResult<String> {
        let file = self.resolve(path)?;
        tokio::fs::read_to_string(&file).await.map_err(|e| match e.kind() {
            ErrorKind::NotFound => FragmentError::Fetch { status: 404 },
            ErrorKind::PermissionDenied => FragmentError::Fetch { status: 403 },
            _ => FragmentError::Transport(format!("{}: {}", file.display(), e)),
        })
    }

    fn describe(&self) -> String {
        format!("dir:{}", self.root.display())
    }
}
