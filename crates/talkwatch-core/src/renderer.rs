//! Change rendering.
//!
//! Turns an ordered change-event sequence into the Markdown message sent to
//! chat destinations. All formatting rules live here; the transport treats
//! the result as an opaque string.

use talkwatch_types::{ChangeEvent, Talk};

/// Render changes into a chat message.
///
/// Returns `None` when there is nothing to announce; callers must not
/// deliver an empty message.
///
/// The header frames a date change as a fresh announcement ("Talks on …")
/// and anything else as an update to the current occurrence ("Changes to
/// talks on …", using `fallback_date`). Blocks follow in fixed order:
/// added, changed (new state only; the old version is not shown), removed,
/// then the hosts line.
pub fn render(changes: &[ChangeEvent], fallback_date: &str) -> Option<String> {
    if changes.is_empty() {
        return None;
    }

    let mut date = None;
    let mut hosts = None;
    let mut added = Vec::new();
    let mut changed = Vec::new();
    let mut removed = Vec::new();
    for change in changes {
        match change {
            ChangeEvent::DateChanged { new_date } => {
                if date.is_none() {
                    date = Some(new_date.as_str());
                }
            }
            ChangeEvent::HostsChanged {
                old_hosts,
                new_hosts,
            } => {
                if hosts.is_none() {
                    hosts = Some((old_hosts, new_hosts));
                }
            }
            ChangeEvent::TalkAdded { talk } => added.push(talk),
            ChangeEvent::TalkChanged { new_talk, .. } => changed.push(new_talk),
            ChangeEvent::TalkRemoved { talk } => removed.push(talk),
        }
    }

    let mut out = String::new();
    match date {
        Some(date) => out.push_str(&format!("*Talks on {date}*:\n\n")),
        None => out.push_str(&format!("*Changes to talks on {fallback_date}*:\n\n")),
    }

    push_talk_block(&mut out, "Talks added:", &added);
    push_talk_block(&mut out, "Talks changed:", &changed);
    push_talk_block(&mut out, "Talks removed:", &removed);

    if let Some((old_hosts, new_hosts)) = hosts {
        out.push_str(&format!(
            "New hosts: {} (instead of {})\n",
            new_hosts.join(", "),
            old_hosts.join(", "),
        ));
    }

    Some(out)
}

fn push_talk_block(out: &mut String, heading: &str, talks: &[&Talk]) {
    if talks.is_empty() {
        return;
    }
    out.push_str(heading);
    out.push('\n');
    for talk in talks {
        out.push_str(&format!(" • {} ({})\n", talk.title, talk.persons.join(", ")));
    }
    out.push('\n');
}
