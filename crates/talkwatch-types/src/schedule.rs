//! Schedule snapshot types.
//!
//! A snapshot captures one occurrence of the event: its date label, the
//! announced hosts, and the scheduled talks. Snapshots are plain values;
//! every fetch produces a wholly new one.

use serde::{Deserialize, Serialize};

/// Host list the upstream document carries while the real hosts are not yet
/// announced. Owned by the data producer, not configurable here.
pub const UNANNOUNCED_HOSTS: &[&str] = &["fixme"];

/// A single talk.
///
/// The title is the only identity: two talks across snapshots are the same
/// logical talk iff their titles are byte-for-byte equal. The upstream
/// document carries no stable talk key, so a retitled talk reads as a
/// removal plus an addition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Talk {
    /// Identity key, matched case-sensitively across snapshots.
    pub title: String,
    /// Free-form description.
    pub description: String,
    /// Presenters, in announcement order.
    pub persons: Vec<String>,
}

/// One point-in-time capture of the full schedule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Schedule {
    /// Opaque occurrence label (e.g. an ISO date). Compared for equality,
    /// never parsed.
    pub date: String,
    /// Announced hosts, in order. [`UNANNOUNCED_HOSTS`] until announced.
    pub hosts: Vec<String>,
    /// Scheduled talks, in announcement order.
    pub talks: Vec<Talk>,
}

impl Schedule {
    /// First talk whose title exactly equals `title`, if any.
    pub fn find_talk(&self, title: &str) -> Option<&Talk> {
        self.talks.iter().find(|t| t.title == title)
    }

    /// Whether the hosts list is still the upstream placeholder.
    pub fn hosts_unannounced(&self) -> bool {
        self.hosts.len() == UNANNOUNCED_HOSTS.len()
            && self.hosts.iter().zip(UNANNOUNCED_HOSTS).all(|(h, p)| h == p)
    }

    /// A snapshot is trivial when it has no talks and the hosts are still
    /// the placeholder: a freshly rolled-over date with nothing real in it.
    pub fn is_trivial(&self) -> bool {
        self.talks.is_empty() && self.hosts_unannounced()
    }
}
