//! Change detection and host-side plumbing for the talkwatch notifier.
//!
//! The decision logic lives in [`differ`] and [`renderer`]; both are pure
//! functions. The rest of the crate is the boundary around them: reading
//! snapshots ([`source`]), persisting the last-known-good one ([`store`]),
//! and noticing that the watched document was rewritten ([`watcher`]).

mod differ;
mod error;
mod renderer;
mod source;
mod store;
mod watcher;

pub use differ::diff;
pub use error::TalkwatchError;
pub use renderer::render;
pub use source::{RetryPolicy, SnapshotSource};
pub use store::SnapshotStore;
pub use watcher::{ScheduleWatcher, WatcherHandle, spawn_poll_trigger};

/// Result type for talkwatch-core operations.
pub type Result<T> = std::result::Result<T, TalkwatchError>;
