use std::sync::Arc;

use anyhow::Context;
use section_composer::{
    load_config_file, source_from_config, ComposerConfig, Document, FragmentComposer,
    FragmentSource, InitializerRegistry,
};

/// Usage: `section-composer [config.{yaml,json,toml}] [output.html]`
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let mut args = std::env::args().skip(1);
    let config = match args.next() {
        Some(path) => load_config_file(&path).with_context(|| format!("loading {}", path))?,
        None => ComposerConfig::default(),
    };
    let output = args.next();

    let source = source_from_config(&config.source, &config.http)?;
    let shell = source
        .fetch(&config.shell)
        .await
        .with_context(|| format!("fetching shell {} from {}", config.shell, source.describe()))?;
    let document = Arc::new(Document::parse(&shell)?);

    let registry = InitializerRegistry::from_config(&config);

    let composer = FragmentComposer::builder(document.clone(), source)
        .config(config)
        .build()?;
    let initialized = registry.attach(&composer.signal(), document.clone());

    let ready = composer.init().await;
    let init_report = initialized.await.context("page initializers did not run")?;
    document.mark_complete();

    tracing::info!(
        loaded = ready.report().loaded(),
        failed = ready.report().failed(),
        skipped = ready.report().skipped(),
        initializers_failed = init_report.failed.len(),
        "Page composed"
    );

    let html = document.render();
    match output {
        Some(path) => tokio::fs::write(&path, html)
            .await
            .with_context(|| format!("writing {}", path))?,
        None => println!("{}", html),
    }
    Ok(())
}
