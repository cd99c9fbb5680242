//! Classified change events produced by the differ.

use crate::Talk;
use serde::{Deserialize, Serialize};

/// One classified unit of difference between two schedule snapshots.
///
/// The differ emits these in a significant order (date and hosts before
/// talk-level events); the renderer regroups them for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ChangeEvent {
    /// The event rolled over to a new occurrence.
    DateChanged { new_date: String },
    /// The hosts list changed as a whole; individual hosts are not tracked.
    HostsChanged {
        old_hosts: Vec<String>,
        new_hosts: Vec<String>,
    },
    /// A talk title appeared that the previous snapshot did not have.
    TalkAdded { talk: Talk },
    /// A talk title disappeared from the schedule.
    TalkRemoved { talk: Talk },
    /// Same title, different description and/or persons.
    TalkChanged { old_talk: Talk, new_talk: Talk },
}
