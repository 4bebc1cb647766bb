//! Section composition.
//!
//! [`FragmentComposer`] fetches every registered fragment concurrently,
//! rewrites asset paths, writes each into its container and fires the
//! [`CompletionSignal`] once all of them settled. Code that needs the composed
//! page takes a [`SectionsReady`] token, which only the composer can mint.

pub mod events;
pub mod loader;
pub mod outcome;
pub mod rewrite;
pub mod signal;

pub use events::{create_event_channel, ComposeEvent, EventReceiver, EventSender};
pub use loader::{FragmentComposer, FragmentComposerBuilder};
pub use outcome::{ComposeReport, FragmentOutcome, FragmentState};
pub use rewrite::AssetRewriter;
pub use signal::{CompletionSignal, SectionsReady};
