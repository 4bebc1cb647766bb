//! In-memory page document.
//!
//! [`Document`] keeps the shell HTML untouched and records, per element id, the
//! inner HTML written since parsing. Reads and renders splice those writes
//! back into the shell, so writing a container replaces whatever it held,
//! nested elements included.

pub mod shell;

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::ops::Range;
use tokio::sync::watch;

use crate::error::ComposeResult;
pub use shell::{parse_shell, ShellElement};

/// Document parsing state, mirroring the browser's `document.readyState`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReadyState {
    Loading,
    Interactive,
    Complete,
}

pub struct Document {
    html: String,
    /// Sorted by inner start; properly nested.
    elements: Vec<ShellElement>,
    index: HashMap<String, usize>,
    written: RwLock<HashMap<String, String>>,
    ready_state: watch::Sender<ReadyState>,
}

impl Document {
    fn from_elements(html: String, elements: Vec<ShellElement>) -> Self {
        let index = elements
            .iter()
            .enumerate()
            .map(|(i, e)| (e.id.clone(), i))
            .collect();
        let (ready_state, _) = watch::channel(ReadyState::Interactive);
        Self {
            html,
            elements,
            index,
            written: RwLock::new(HashMap::new()),
            ready_state,
        }
    }

    /// Parse a shell page. The result is already past `Loading`.
    pub fn parse(html: &str) -> ComposeResult<Self> {
        let elements = parse_shell(html)?;
        Ok(Self::from_elements(html.to_string(), elements))
    }

    /// Build a document made only of empty `<div>` containers.
    pub fn with_containers<I, S>(ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut html = String::new();
        let mut elements: Vec<ShellElement> = Vec::new();
        for id in ids {
            let id = id.into();
            if elements.iter().any(|e| e.id == id) {
                continue;
            }
            if !html.is_empty() {
                html.push('\n');
            }
            html.push_str(&format!(r#"<div id="{}">"#, id));
            let at = html.len();
            html.push_str("</div>");
            elements.push(ShellElement {
                id,
                tag: "div".to_string(),
                inner: at..at,
            });
        }
        Self::from_elements(html, elements)
    }

    pub fn contains(&self, container_id: &str) -> bool {
        self.index.contains_key(container_id)
    }

    /// Current inner HTML of an element, `None` if there is no such id.
    pub fn content(&self, container_id: &str) -> Option<String> {
        let written = self.written.read();
        self.content_with(&written, container_id)
    }

    fn content_with(&self, written: &HashMap<String, String>, container_id: &str) -> Option<String> {
        let element = &self.elements[*self.index.get(container_id)?];
        match written.get(container_id) {
            Some(content) => Some(content.clone()),
            None => Some(self.render_range(written, element.inner.clone())),
        }
    }

    /// Replace an element's inner HTML. Returns `false` if there is no such id.
    pub fn set_content(&self, container_id: &str, html: impl Into<String>) -> bool {
        if !self.contains(container_id) {
            return false;
        }
        self.written.write().insert(container_id.to_string(), html.into());
        true
    }

    /// Rewrite an element's inner HTML in place. Returns `false` if there is no such id.
    pub fn update_content<F>(&self, container_id: &str, f: F) -> bool
    where
        F: FnOnce(&str) -> String,
    {
        let mut written = self.written.write();
        let Some(current) = self.content_with(&written, container_id) else {
            return false;
        };
        let updated = f(&current);
        written.insert(container_id.to_string(), updated);
        true
    }

    /// Element ids in document order.
    pub fn container_ids(&self) -> Vec<String> {
        self.elements.iter().map(|e| e.id.clone()).collect()
    }

    /// Serialize the document with current contents.
    pub fn render(&self) -> String {
        let written = self.written.read();
        self.render_range(&written, 0..self.html.len())
    }

    /// Shell text in `range` with written elements spliced in. A written
    /// element hides everything nested in it.
    fn render_range(&self, written: &HashMap<String, String>, range: Range<usize>) -> String {
        let mut out = String::with_capacity(range.len());
        let mut cursor = range.start;
        for element in &self.elements {
            if element.inner.start < cursor || element.inner.end > range.end {
                continue;
            }
            if let Some(content) = written.get(&element.id) {
                out.push_str(&self.html[cursor..element.inner.start]);
                out.push_str(content);
                cursor = element.inner.end;
            }
        }
        out.push_str(&self.html[cursor..range.end]);
        out
    }

    pub fn ready_state(&self) -> ReadyState {
        *self.ready_state.borrow()
    }

    pub fn set_ready_state(&self, state: ReadyState) {
        self.ready_state.send_replace(state);
    }

    pub fn mark_interactive(&self) {
        self.ready_state.send_if_modified(|state| {
            if *state == ReadyState::Loading {
                *state = ReadyState::Interactive;
                true
            } else {
                false
            }
        });
    }

    pub fn mark_complete(&self) {
        self.set_ready_state(ReadyState::Complete);
    }

    /// Resolves once the document has left `Loading`.
    pub async fn parsed(&self) {
        let mut rx = self.ready_state.subscribe();
        // The sender lives as long as `self`, so the channel cannot close here.
        let _ = rx.wait_for(|state| *state != ReadyState::Loading).await;
    }
}

impl std::fmt::Debug for Document {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Document")
            .field("containers", &self.container_ids())
            .field("ready_state", &self.ready_state())
            .finish()
    }
}
