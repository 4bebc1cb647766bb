use std::sync::Arc;
use std::time::Duration;

use section_composer::config::{HttpPoolConfig, DEFAULT_ERROR_PLACEHOLDER};
use section_composer::{
    ComposerConfig, FragmentComposer, FragmentError, FragmentSource, FragmentState,
    HttpFragmentSource,
};

use crate::helpers::{landing_document, with_timeout};

/// A guard that keeps the mock server and its mocks alive for the test duration.
struct MockServerGuard {
    server: mockito::ServerGuard,
    _mocks: Vec<mockito::Mock>,
}

async fn setup_mock_server(endpoints: &[(&str, usize, &str)]) -> MockServerGuard {
    let mut server = mockito::Server::new_async().await;
    let mut mocks = Vec::new();
    for (path, status, body) in endpoints {
        let mock = server
            .mock("GET", *path)
            .with_status(*status)
            .with_header("content-type", "text/html; charset=utf-8")
            .with_body(*body)
            .create_async()
            .await;
        mocks.push(mock);
    }
    MockServerGuard {
        server,
        _mocks: mocks,
    }
}

#[tokio::test]
async fn http_source_fetches_relative_to_origin() {
    let guard = setup_mock_server(&[("/secciones/hero.html", 200, "<h1>Hero</h1>")]).await;
    let source = HttpFragmentSource::new(&guard.server.url(), &HttpPoolConfig::default()).unwrap();

    let body = source.fetch("secciones/hero.html").await.unwrap();
    assert_eq!(body, "<h1>Hero</h1>");
}

#[tokio::test]
async fn http_source_maps_status_to_fetch_error() {
    let guard = setup_mock_server(&[("/secciones/cta.html", 404, "not found")]).await;
    let source = HttpFragmentSource::new(&guard.server.url(), &HttpPoolConfig::default()).unwrap();

    let err = source.fetch("secciones/cta.html").await.unwrap_err();
    assert_eq!(err, FragmentError::Fetch { status: 404 });
}

#[tokio::test]
async fn http_source_connection_failure_is_transport_error() {
    // Nothing listens on the discard port on loopback in CI.
    let source = HttpFragmentSource::new("http://127.0.0.1:9", &HttpPoolConfig::default()).unwrap();
    let err = source.fetch("secciones/hero.html").await.unwrap_err();
    assert!(matches!(err, FragmentError::Transport(_)));
}

#[tokio::test]
async fn landing_page_over_http() {
    let guard = setup_mock_server(&[
        ("/secciones/navbar.html", 200, r#"<nav><img src="logo.png"></nav>"#),
        ("/secciones/hero.html", 200, r#"<video src="videos/hero.mp4"></video>"#),
        ("/secciones/features.html", 200, "<ul></ul>"),
        ("/secciones/tatuadores.html", 200, r#"<div class="tatuadores-grid"></div>"#),
        ("/secciones/galeria.html", 500, "boom"),
        ("/secciones/cta.html", 200, r#"<img src="founder.jpg">"#),
    ])
    .await;

    let document = landing_document();
    let source = HttpFragmentSource::new(&guard.server.url(), &HttpPoolConfig::default()).unwrap();
    let composer = FragmentComposer::builder(document.clone(), Arc::new(source))
        .config(ComposerConfig::default())
        .build()
        .unwrap();

    let ready = with_timeout("http compose", Duration::from_secs(10), composer.init()).await;
    assert_eq!(ready.report().loaded(), 5);
    assert_eq!(
        ready.report().outcome("galeria-container").unwrap().state,
        FragmentState::Failed
    );

    assert_eq!(
        document.content("navbar-container").unwrap(),
        r#"<nav><img src="/artifacts/logo.png"></nav>"#
    );
    assert_eq!(
        document.content("hero-container").unwrap(),
        r#"<video src="/videos/hero.mp4"></video>"#
    );
    assert_eq!(
        document.content("cta-container").unwrap(),
        r#"<img src="/artifacts/founder.jpg">"#
    );
    assert_eq!(
        document.content("galeria-container").unwrap(),
        DEFAULT_ERROR_PLACEHOLDER
    );
}
