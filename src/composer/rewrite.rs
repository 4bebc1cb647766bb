//! Asset path rewriting.
//!
//! Fragments are authored with bare file names (`src="logo.png"`,
//! `src="videos/intro.mp4"`). Served from a nested path or an object-storage
//! origin those resolve against the wrong directory, so they are rooted
//! before injection. Only the bare forms match, which makes the rewrite
//! idempotent.

use regex::Regex;
use std::borrow::Cow;

use crate::config::RewriteRules;
use crate::error::{ComposeError, ComposeResult};

#[derive(Debug, Clone)]
pub struct AssetRewriter {
    images: Option<Regex>,
    artifact_dir: String,
    video_from: String,
    video_to: String,
}

impl AssetRewriter {
    pub fn new(rules: &RewriteRules) -> ComposeResult<Self> {
        let images = if rules.images.is_empty() {
            None
        } else {
            let alternatives: Vec<String> = rules.images.iter().map(|i| regex::escape(i)).collect();
            let pattern = format!(r#"src="({})""#, alternatives.join("|"));
            Some(Regex::new(&pattern).map_err(|e| ComposeError::ConfigInvalid(e.to_string()))?)
        };

        let prefix = rules.video_prefix.trim_start_matches('/');
        Ok(Self {
            images,
            artifact_dir: rules.artifact_dir.trim_end_matches('/').to_string(),
            video_from: format!(r#"src="{}"#, prefix),
            video_to: format!(r#"src="/{}"#, prefix),
        })
    }

    /// Rewrite a fragment body. Anything that is not a bare known image or a
    /// bare video reference passes through untouched.
    pub fn rewrite<'a>(&self, html: &'a str) -> Cow<'a, str> {
        let html = match &self.images {
            Some(re) => re.replace_all(html, |caps: &regex::Captures<'_>| {
                format!(r#"src="{}/{}""#, self.artifact_dir, &caps[1])
            }),
            None => Cow::Borrowed(html),
        };

        if html.contains(&self.video_from) {
            Cow::Owned(html.replace(&self.video_from, &self.video_to))
        } else {
            html
        }
    }
}

impl Default for AssetRewriter {
    fn default() -> Self {
        Self::new(&RewriteRules::default()).expect("default rewrite rules are valid")
    }
}
