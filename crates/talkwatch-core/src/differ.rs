//! Snapshot comparison.
//!
//! [`diff`] classifies the differences between the previous and the freshly
//! fetched schedule into an ordered [`ChangeEvent`] sequence. It is a pure
//! function: no I/O, no state, both inputs already validated by the caller.

use talkwatch_types::{ChangeEvent, Schedule};

/// Compare two snapshots and classify the differences.
///
/// When the date label differs, the event has rolled over to a new
/// occurrence: the old snapshot is discarded wholesale and the new one is
/// reported as a fresh announcement (date, hosts, every talk as added).
/// A still-trivial new snapshot (no talks, hosts placeholder) emits
/// nothing, so an upstream date bump alone stays silent.
///
/// On an unchanged date, the hosts are compared as one ordered list and
/// talks are matched by exact title. A title that survives with a different
/// description or persons yields one `TalkChanged`; a vanished title yields
/// `TalkRemoved`; a new title yields `TalkAdded`. The removed/changed pass
/// and the added pass are independent, so an unchanged-title talk never
/// produces both.
pub fn diff(old: &Schedule, new: &Schedule) -> Vec<ChangeEvent> {
    let mut changes = Vec::new();

    if old.date != new.date {
        // Next occurrence: nothing from the old snapshot is worth diffing.
        if !new.is_trivial() {
            changes.push(ChangeEvent::DateChanged {
                new_date: new.date.clone(),
            });
            changes.push(ChangeEvent::HostsChanged {
                old_hosts: Vec::new(),
                new_hosts: new.hosts.clone(),
            });
            changes.extend(
                new.talks
                    .iter()
                    .map(|talk| ChangeEvent::TalkAdded { talk: talk.clone() }),
            );
        }
        return changes;
    }

    if old.hosts != new.hosts {
        changes.push(ChangeEvent::HostsChanged {
            old_hosts: old.hosts.clone(),
            new_hosts: new.hosts.clone(),
        });
    }

    for talk in &old.talks {
        match new.find_talk(&talk.title) {
            None => changes.push(ChangeEvent::TalkRemoved { talk: talk.clone() }),
            Some(matched) if matched != talk => changes.push(ChangeEvent::TalkChanged {
                old_talk: talk.clone(),
                new_talk: matched.clone(),
            }),
            Some(_) => {}
        }
    }

    // Additions are matched against the OLD list. Matching a new talk
    // against the new list always finds the talk itself and never fires.
    for talk in &new.talks {
        if old.find_talk(&talk.title).is_none() {
            changes.push(ChangeEvent::TalkAdded { talk: talk.clone() });
        }
    }

    changes
}
