use chrono::Datelike;
use regex::Regex;

use super::PageInitializer;
use crate::assets::AssetUrlResolver;
use crate::composer::{FragmentState, SectionsReady};
use crate::config::RewriteRules;
use crate::document::Document;
use crate::error::InitError;

/// Keeps the copyright year in the footer current.
#[derive(Debug, Clone)]
pub struct FooterYear {
    container_id: String,
    year: i32,
    pattern: Regex,
}

impl FooterYear {
    pub fn new(container_id: impl Into<String>, year: i32) -> Self {
        Self {
            container_id: container_id.into(),
            year,
            pattern: Regex::new(r"©\s*\d{4}").expect("static pattern"),
        }
    }

    pub fn current(container_id: impl Into<String>) -> Self {
        Self::new(container_id, chrono::Local::now().year())
    }
}

impl PageInitializer for FooterYear {
    fn name(&self) -> &str {
        "footer-year"
    }

    fn initialize(&self, document: &Document, _ready: &SectionsReady) -> Result<(), InitError> {
        let replacement = format!("© {}", self.year);
        let found = document.update_content(&self.container_id, |html| {
            self.pattern.replace_all(html, replacement.as_str()).into_owned()
        });
        if !found {
            return Err(InitError::MissingElement(self.container_id.clone()));
        }
        Ok(())
    }
}

/// Points rooted asset references of loaded sections at the configured asset
/// origin. Does nothing without a base URL.
#[derive(Debug, Clone)]
pub struct AssetBaseUrls {
    resolver: AssetUrlResolver,
    pattern: Option<Regex>,
}

impl AssetBaseUrls {
    pub fn new(resolver: AssetUrlResolver, rules: &RewriteRules) -> Self {
        let dirs: Vec<String> = [
            rules.artifact_dir.trim_matches('/'),
            rules.video_prefix.trim_matches('/'),
        ]
        .iter()
        .filter(|dir| !dir.is_empty())
        .map(|dir| regex::escape(&format!("/{}", dir)))
        .collect();
        // an empty alternative would match every rooted or protocol-relative src
        let pattern = (!dirs.is_empty()).then(|| {
            Regex::new(&format!(r#"src="((?:{})/[^"]*)""#, dirs.join("|"))).expect("escaped pattern")
        });
        Self { resolver, pattern }
    }
}

impl PageInitializer for AssetBaseUrls {
    fn name(&self) -> &str {
        "asset-base-urls"
    }

    fn initialize(&self, document: &Document, ready: &SectionsReady) -> Result<(), InitError> {
        let Some(pattern) = &self.pattern else {
            return Ok(());
        };
        if self.resolver.base_url().is_none() {
            return Ok(());
        }
        for outcome in &ready.report().outcomes {
            if outcome.state != FragmentState::Loaded {
                continue;
            }
            document.update_content(&outcome.container_id, |html| {
                pattern
                    .replace_all(html, |caps: &regex::Captures<'_>| {
                        format!(r#"src="{}""#, self.resolver.resolve(&caps[1]))
                    })
                    .into_owned()
            });
        }
        Ok(())
    }
}
