//! # section-composer — landing page composition from HTML fragments
//!
//! The landing page ships as a shell with placeholder containers plus one HTML
//! fragment per section. `section-composer` assembles the final document:
//!
//! - **Concurrent loading**: every fragment is fetched at once; the slowest one
//!   bounds total latency, and each fetch carries its own deadline.
//! - **Failure isolation**: a failed fragment shows an error placeholder in its
//!   own container and never blocks its siblings.
//! - **Asset path rewriting**: bare `logo.png` / `founder.jpg` / `videos/…`
//!   references are rooted so they resolve from any origin.
//! - **Completion signal**: fired exactly once after every fragment settled;
//!   late subscribers still observe it.
//! - **Typed readiness**: page initializers require a [`SectionsReady`] token,
//!   which only the composer produces.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use section_composer::{ComposerConfig, Document, DirFragmentSource, FragmentComposer};
//!
//! #[tokio::main]
//! async fn main() {
//!     let shell = std::fs::read_to_string("site/index.html").unwrap();
//!     let document = Arc::new(Document::parse(&shell).unwrap());
//!     let composer = FragmentComposer::builder(
//!         document.clone(),
//!         Arc::new(DirFragmentSource::new("site")),
//!     )
//!     .config(ComposerConfig::default())
//!     .build()
//!     .unwrap();
//!
//!     let ready = composer.init().await;
//!     println!("{} sections loaded", ready.report().loaded());
//!     println!("{}", document.render());
//! }
//! ```
//!
//! # Feature Flags
//!
//! | Flag | Description |
//! |------|-------------|
//! | `http-source` | Enables [`HttpFragmentSource`] (reqwest). On by default. |

pub mod assets;
pub mod composer;
pub mod config;
pub mod document;
pub mod error;
pub mod page;
pub mod source;

pub use crate::assets::AssetUrlResolver;
pub use crate::composer::{
    create_event_channel, AssetRewriter, CompletionSignal, ComposeEvent, ComposeReport,
    EventReceiver, EventSender, FragmentComposer, FragmentComposerBuilder, FragmentOutcome,
    FragmentState, SectionsReady,
};
pub use crate::config::{
    default_sections, load_config_file, parse_config, ComposerConfig, ConfigFormat, FragmentSpec,
    SourceConfig,
};
pub use crate::document::{Document, ReadyState};
pub use crate::error::{ComposeError, ComposeResult, FragmentError, InitError};
pub use crate::page::{InitReport, InitializerRegistry, PageInitializer};
#[cfg(feature = "http-source")]
pub use crate::source::HttpFragmentSource;
pub use crate::source::{
    source_from_config, DirFragmentSource, FragmentSource, MemoryFragmentSource,
};
