use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use section_composer::config::{DEFAULT_ERROR_PLACEHOLDER, DEFAULT_LOADING_PLACEHOLDER};
use section_composer::{
    create_event_channel, default_sections, ComposeEvent, Document, FragmentComposer,
    FragmentSpec, FragmentState, MemoryFragmentSource, ReadyState,
};

use crate::helpers::{landing_document, landing_source, with_timeout};

#[tokio::test]
async fn six_sections_compose_and_signal_fires_once() {
    let document = landing_document();
    let composer = FragmentComposer::builder(document.clone(), Arc::new(landing_source()))
        .build()
        .unwrap();

    let fired = Arc::new(AtomicUsize::new(0));
    {
        let fired = fired.clone();
        composer.signal().on_complete(move |_| {
            fired.fetch_add(1, Ordering::SeqCst);
        });
    }

    let ready = with_timeout("init", Duration::from_secs(5), composer.init()).await;
    assert_eq!(ready.report().loaded(), 6);
    assert!(ready.report().all_loaded());
    assert_eq!(fired.load(Ordering::SeqCst), 1);

    for spec in default_sections() {
        let content = document.content(&spec.container_id).unwrap();
        assert!(!content.is_empty(), "{} is empty", spec.container_id);
        assert!(content.contains(r#"src="/artifacts/logo.png""#));
    }

    // a second init does not fire again
    composer.init().await;
    assert_eq!(fired.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn signal_fires_after_every_container_settled() {
    let document = landing_document();
    let source = landing_source()
        .with_status("secciones/features.html", 404)
        .with_delay("secciones/hero.html", Duration::from_millis(50));
    let composer = FragmentComposer::builder(document.clone(), Arc::new(source))
        .build()
        .unwrap();

    let snapshot = Arc::new(Mutex::new(Vec::new()));
    {
        let snapshot = snapshot.clone();
        let document = document.clone();
        composer.signal().on_complete(move |ready| {
            let mut snapshot = snapshot.lock();
            for outcome in &ready.report().outcomes {
                snapshot.push(document.content(&outcome.container_id).unwrap_or_default());
            }
        });
    }

    composer.init().await;
    let snapshot = snapshot.lock();
    assert_eq!(snapshot.len(), 6);
    for content in snapshot.iter() {
        assert!(!content.is_empty());
        assert_ne!(content, DEFAULT_LOADING_PLACEHOLDER);
    }
}

#[tokio::test]
async fn failed_fragment_is_isolated() {
    let document = landing_document();
    let source = landing_source()
        .with_status("secciones/galeria.html", 503)
        .with_transport_error("secciones/cta.html", "connection reset by peer");
    let composer = FragmentComposer::builder(document.clone(), Arc::new(source))
        .build()
        .unwrap();

    let ready = composer.init().await;
    let report = ready.report();
    assert_eq!(report.loaded(), 4);
    assert_eq!(report.failed(), 2);
    assert_eq!(report.outcome("galeria-container").unwrap().state, FragmentState::Failed);

    assert_eq!(document.content("galeria-container").unwrap(), DEFAULT_ERROR_PLACEHOLDER);
    assert_eq!(document.content("cta-container").unwrap(), DEFAULT_ERROR_PLACEHOLDER);
    assert!(document
        .content("hero-container")
        .unwrap()
        .contains("hero.html"));
}

#[tokio::test]
async fn missing_container_is_skipped() {
    let document = Arc::new(Document::with_containers(["hero-container", "cta-container"]));
    let composer = FragmentComposer::builder(document.clone(), Arc::new(landing_source()))
        .build()
        .unwrap();

    let ready = composer.init().await;
    assert_eq!(ready.report().loaded(), 2);
    assert_eq!(ready.report().skipped(), 4);
    assert_eq!(
        ready.report().outcome("navbar-container").unwrap().state,
        FragmentState::Skipped
    );
    assert!(!document.content("hero-container").unwrap().is_empty());
    assert!(!document.content("cta-container").unwrap().is_empty());
}

#[tokio::test]
async fn containers_with_shell_content_are_replaced() {
    let document = Arc::new(
        Document::parse(concat!(
            r#"<div id="hero-container"><!-- hero se carga aqui --></div>"#,
            r#"<div id='cta-container'> <div class="loading-spinner"></div> </div>"#,
            "<footer>x</footer>",
        ))
        .unwrap(),
    );
    let source = MemoryFragmentSource::new()
        .with_fragment("secciones/hero.html", "<h1>Hero</h1>")
        .with_fragment("secciones/cta.html", "<a>CTA</a>");
    let composer = FragmentComposer::builder(document.clone(), Arc::new(source))
        .sections(vec![
            FragmentSpec::new("hero-container", "hero.html"),
            FragmentSpec::new("cta-container", "cta.html"),
        ])
        .build()
        .unwrap();

    let ready = composer.init().await;
    assert_eq!(ready.report().loaded(), 2);
    assert_eq!(ready.report().skipped(), 0);
    assert_eq!(
        document.render(),
        r#"<div id="hero-container"><h1>Hero</h1></div><div id='cta-container'><a>CTA</a></div><footer>x</footer>"#
    );
}

#[tokio::test]
async fn init_waits_for_document_parse() {
    let document = landing_document();
    document.set_ready_state(ReadyState::Loading);
    let source = Arc::new(landing_source());
    let composer = Arc::new(
        FragmentComposer::builder(document.clone(), source.clone())
            .build()
            .unwrap(),
    );

    let task = {
        let composer = composer.clone();
        tokio::spawn(async move { composer.init().await })
    };
    tokio::time::sleep(Duration::from_millis(20)).await;
    assert_eq!(source.request_count(), 0);
    assert!(!composer.signal().is_fired());

    document.mark_interactive();
    let ready = with_timeout("deferred init", Duration::from_secs(5), task)
        .await
        .unwrap();
    assert_eq!(ready.report().loaded(), 6);
    assert_eq!(source.request_count(), 6);
}

#[tokio::test]
async fn late_subscriber_still_observes_completion() {
    let composer = FragmentComposer::builder(landing_document(), Arc::new(landing_source()))
        .build()
        .unwrap();
    composer.init().await;

    let signal = composer.signal();
    let ready = with_timeout("late wait", Duration::from_millis(200), signal.wait()).await;
    assert_eq!(ready.report().loaded(), 6);

    let called = Arc::new(AtomicUsize::new(0));
    let c = called.clone();
    signal.on_complete(move |_| {
        c.fetch_add(1, Ordering::SeqCst);
    });
    assert_eq!(called.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn concurrent_waiters_share_one_cycle() {
    let source = Arc::new(landing_source().with_delay("secciones/cta.html", Duration::from_millis(30)));
    let composer = FragmentComposer::builder(landing_document(), source.clone())
        .build()
        .unwrap();

    let (a, b) = tokio::join!(composer.init(), composer.load_all_fragments());
    assert_eq!(a.report().loaded(), 6);
    assert_eq!(b.report().loaded(), 6);
    assert_eq!(source.request_count(), 6);
}

#[tokio::test]
async fn events_follow_fragment_lifecycle() {
    let (tx, mut rx) = create_event_channel();
    let document = Arc::new(Document::with_containers(["hero-container"]));
    let source = MemoryFragmentSource::new()
        .with_fragment("secciones/hero.html", "<h1>PinoHub</h1>")
        .with_status("secciones/cta.html", 500);
    let composer = FragmentComposer::builder(document, Arc::new(source))
        .sections(vec![
            FragmentSpec::new("hero-container", "hero.html"),
            FragmentSpec::new("cta-container", "cta.html"),
        ])
        .event_sender(tx)
        .build()
        .unwrap();

    composer.init().await;
    drop(composer);

    let mut events = Vec::new();
    while let Some(event) = rx.recv().await {
        events.push(event);
    }

    assert!(events.iter().any(|e| matches!(
        e,
        ComposeEvent::FragmentLoaded { container_id, bytes: 16, .. } if container_id == "hero-container"
    )));
    assert!(events.iter().any(|e| matches!(
        e,
        ComposeEvent::ContainerMissing { container_id, .. } if container_id == "cta-container"
    )));
    match events.last() {
        Some(ComposeEvent::AllSettled {
            loaded,
            failed,
            skipped,
            ..
        }) => {
            assert_eq!((*loaded, *failed, *skipped), (1, 0, 1));
        }
        other => panic!("expected AllSettled last, got {:?}", other),
    }
}
