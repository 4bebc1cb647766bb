#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use section_composer::{default_sections, Document, MemoryFragmentSource};

pub const LANDING_SHELL: &str = r#"<!DOCTYPE html>
<html lang="es">
<head><title>PinoHub</title></head>
<body>
    <div id="navbar-container"></div>
    <main>
        <div id="hero-container"></div>
        <div id="features-container"></div>
        <div id="tatuadores-container"></div>
        <div id="galeria-container"></div>
        <div id="cta-container"></div>
    </main>
    <footer class="footer-bottom"><p>© 2024 PinoHub.</p></footer>
</body>
</html>"#;

pub fn landing_document() -> Arc<Document> {
    Arc::new(Document::parse(LANDING_SHELL).expect("landing shell parses"))
}

/// A memory source answering every default section with a small body.
pub fn landing_source() -> MemoryFragmentSource {
    default_sections()
        .into_iter()
        .fold(MemoryFragmentSource::new(), |source, spec| {
            let body = format!(r#"<section class="{}"><img src="logo.png"></section>"#, spec.source_name);
            source.with_fragment(&format!("secciones/{}", spec.source_name), body)
        })
}

pub async fn with_timeout<F, T>(label: &str, duration: Duration, f: F) -> T
where
    F: std::future::Future<Output = T>,
{
    tokio::time::timeout(duration, f)
        .await
        .unwrap_or_else(|_| panic!("'{}' timed out after {:?}", label, duration))
}
