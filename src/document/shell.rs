//! Shell document parsing.
//!
//! A shell is the static page served before composition. Every closed element
//! that carries an `id` attribute becomes addressable, whatever it already
//! holds (`<div id="hero-container"><!-- hero --></div>`). Its inner HTML is
//! what a fragment replaces; everything else is kept verbatim.

use regex::Regex;
use std::collections::HashSet;
use std::ops::Range;
use std::sync::OnceLock;

use crate::error::{ComposeError, ComposeResult};

const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "param", "source",
    "track", "wbr",
];

/// Elements whose content is not markup.
const RAW_TEXT_ELEMENTS: &[&str] = &["script", "style", "textarea", "title"];

/// An element with an `id`, located by its inner HTML byte range.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShellElement {
    pub id: String,
    pub tag: String,
    pub inner: Range<usize>,
}

fn token_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r#"(?s)<!--.*?-->|<!.*?>|<(/?)([a-zA-Z][a-zA-Z0-9-]*)((?:[^>"']|"[^"]*"|'[^']*')*)>"#)
            .expect("static pattern")
    })
}

fn id_attr_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r#"(?i)(?:^|\s)id\s*=\s*(?:"([^"]*)"|'([^']*)'|([^\s"'=<>`]+))"#)
            .expect("static pattern")
    })
}

fn id_attr(attrs: &str) -> Option<String> {
    let caps = id_attr_re().captures(attrs)?;
    let value = caps.get(1).or_else(|| caps.get(2)).or_else(|| caps.get(3))?;
    let id = value.as_str().trim();
    (!id.is_empty()).then(|| id.to_string())
}

struct OpenElement {
    tag: String,
    id: Option<String>,
    inner_start: usize,
}

/// Locate every closed element carrying an `id`, in document order.
///
/// Void and self-closing elements have no inner HTML and are skipped, as are
/// elements whose end tag is implied rather than written.
pub fn parse_shell(html: &str) -> ComposeResult<Vec<ShellElement>> {
    let mut elements = Vec::new();
    let mut stack: Vec<OpenElement> = Vec::new();
    let mut seen = HashSet::new();
    let mut pos = 0;

    while let Some(caps) = token_re().captures_at(html, pos) {
        let Some(whole) = caps.get(0) else {
            break;
        };
        pos = whole.end();
        // comments and doctype
        let Some(tag) = caps.get(2) else {
            continue;
        };
        let tag = tag.as_str().to_ascii_lowercase();

        if caps.get(1).is_some_and(|m| !m.as_str().is_empty()) {
            if let Some(depth) = stack.iter().rposition(|open| open.tag == tag) {
                stack.truncate(depth + 1);
                if let Some(OpenElement {
                    id: Some(id),
                    inner_start,
                    ..
                }) = stack.pop()
                {
                    elements.push(ShellElement {
                        id,
                        tag,
                        inner: inner_start..whole.start(),
                    });
                }
            }
            continue;
        }

        let attrs = caps.get(3).map_or("", |m| m.as_str());
        let id = id_attr(attrs);
        if let Some(id) = &id {
            if !seen.insert(id.clone()) {
                return Err(ComposeError::Shell(format!("duplicate element id: {}", id)));
            }
        }
        if attrs.trim_end().ends_with('/') || VOID_ELEMENTS.contains(&tag.as_str()) {
            continue;
        }

        if RAW_TEXT_ELEMENTS.contains(&tag.as_str()) {
            let close = format!("</{}", tag);
            let Some(offset) = html[pos..].to_ascii_lowercase().find(&close) else {
                break;
            };
            if let Some(id) = id {
                elements.push(ShellElement {
                    id,
                    tag,
                    inner: pos..pos + offset,
                });
            }
            // the end tag itself is unmatched on the stack and ignored
            pos += offset;
            continue;
        }

        stack.push(OpenElement {
            tag,
            id,
            inner_start: pos,
        });
    }

    elements.sort_by_key(|e| e.inner.start);
    Ok(elements)
}
