//! Shared types for the talkwatch schedule notifier.

mod change;
mod schedule;

pub use change::ChangeEvent;
pub use schedule::{Schedule, Talk, UNANNOUNCED_HOSTS};
