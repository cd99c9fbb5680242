//! Integration tests for the full update cycle against real files.
//!
//! These drive bootstrap → data-file edit → trigger processing through the
//! actual source, store, and renderer, asserting on outcomes and on the
//! persisted state file.

use std::path::{Path, PathBuf};
use std::time::Duration;
use talkwatch_bot::cycle::{CycleOutcome, UpdateCycle};
use talkwatch_bot::telegram::{ConsoleTransport, Transport};
use talkwatch_core::{RetryPolicy, SnapshotSource, SnapshotStore};
use talkwatch_types::{Schedule, Talk};
use tempfile::TempDir;

fn talk(title: &str, persons: &[&str]) -> Talk {
    Talk {
        title: title.to_string(),
        description: String::new(),
        persons: persons.iter().map(|p| p.to_string()).collect(),
    }
}

fn schedule(date: &str, hosts: &[&str], talks: Vec<Talk>) -> Schedule {
    Schedule {
        date: date.to_string(),
        hosts: hosts.iter().map(|h| h.to_string()).collect(),
        talks,
    }
}

fn write_schedule(path: &Path, schedule: &Schedule) {
    std::fs::write(path, serde_json::to_string(schedule).unwrap()).unwrap();
}

fn quick_retry() -> RetryPolicy {
    RetryPolicy {
        initial_delay: Duration::from_millis(1),
        max_delay: Duration::from_millis(5),
        multiplier: 2.0,
    }
}

fn state_path(temp: &TempDir) -> PathBuf {
    temp.path().join("state").join("current.json")
}

fn data_path(temp: &TempDir) -> PathBuf {
    temp.path().join("new.json")
}

async fn bootstrap_cycle(temp: &TempDir, initial: &Schedule) -> UpdateCycle {
    write_schedule(&data_path(temp), initial);
    let source = SnapshotSource::new(data_path(temp));
    let store = SnapshotStore::open(state_path(temp)).unwrap();
    UpdateCycle::bootstrap(
        source,
        store,
        Transport::Console(ConsoleTransport),
        vec![1],
        quick_retry(),
    )
    .await
    .unwrap()
}

fn persisted(temp: &TempDir) -> Schedule {
    let raw = std::fs::read_to_string(state_path(temp)).unwrap();
    serde_json::from_str(&raw).unwrap()
}

#[tokio::test]
async fn bootstrap_persists_a_fresh_snapshot() {
    let temp = TempDir::new().unwrap();
    let initial = schedule("d1", &["Alice"], vec![talk("T1", &["P"])]);

    let cycle = bootstrap_cycle(&temp, &initial).await;

    assert_eq!(cycle.current_date(), "d1");
    assert_eq!(persisted(&temp), initial);
}

#[tokio::test]
async fn bootstrap_prefers_the_persisted_snapshot() {
    let temp = TempDir::new().unwrap();
    let older = schedule("d0", &["Alice"], vec![]);

    let store = SnapshotStore::open(state_path(&temp)).unwrap();
    store.persist(&older).unwrap();

    // Data file already moved on; bootstrap must still restore d0 so the
    // first trigger reports the d0 → d1 difference.
    let cycle = bootstrap_cycle(&temp, &schedule("d1", &["Alice"], vec![])).await;
    assert_eq!(cycle.current_date(), "d0");
}

#[tokio::test]
async fn unchanged_snapshot_publishes_nothing() {
    let temp = TempDir::new().unwrap();
    let initial = schedule("d1", &["Alice"], vec![talk("T1", &["P"])]);
    let mut cycle = bootstrap_cycle(&temp, &initial).await;

    let outcome = cycle.process_update().await.unwrap();
    assert_eq!(outcome, CycleOutcome::NoChanges);
    assert_eq!(persisted(&temp), initial);
}

#[tokio::test]
async fn edited_snapshot_is_published_and_persisted() {
    let temp = TempDir::new().unwrap();
    let initial = schedule("d1", &["Alice"], vec![talk("T1", &["P"])]);
    let mut cycle = bootstrap_cycle(&temp, &initial).await;

    let edited = schedule(
        "d1",
        &["Alice"],
        vec![talk("T1", &["P"]), talk("T2", &["Q"])],
    );
    write_schedule(&data_path(&temp), &edited);

    let outcome = cycle.process_update().await.unwrap();
    assert_eq!(
        outcome,
        CycleOutcome::Published {
            events: 1,
            delivered: 1,
            failed: 0,
        }
    );
    assert_eq!(persisted(&temp), edited);
    assert_eq!(cycle.current_date(), "d1");
}

#[tokio::test]
async fn trivial_rollover_stays_silent_but_advances_state() {
    let temp = TempDir::new().unwrap();
    let initial = schedule("d1", &["Alice"], vec![talk("T1", &["P"])]);
    let mut cycle = bootstrap_cycle(&temp, &initial).await;

    // Upstream bumped the date but has not filled anything in yet.
    let rolled = schedule("d2", &["fixme"], vec![]);
    write_schedule(&data_path(&temp), &rolled);

    let outcome = cycle.process_update().await.unwrap();
    assert_eq!(outcome, CycleOutcome::NoChanges);
    assert_eq!(persisted(&temp), rolled);
    assert_eq!(cycle.current_date(), "d2");

    // Once the schedule fills in on the now-current date, the talks are
    // announced as additions.
    let filled = schedule("d2", &["Bob"], vec![talk("T9", &["R"])]);
    write_schedule(&data_path(&temp), &filled);

    let outcome = cycle.process_update().await.unwrap();
    assert_eq!(
        outcome,
        CycleOutcome::Published {
            events: 2,
            delivered: 1,
            failed: 0,
        }
    );
    assert_eq!(persisted(&temp), filled);
}

#[tokio::test]
async fn populated_rollover_is_announced_wholesale() {
    let temp = TempDir::new().unwrap();
    let initial = schedule("d1", &["Alice"], vec![talk("T1", &["P"])]);
    let mut cycle = bootstrap_cycle(&temp, &initial).await;

    let next = schedule("d2", &["Bob"], vec![talk("T2", &["Q"]), talk("T3", &["R"])]);
    write_schedule(&data_path(&temp), &next);

    // DateChanged + HostsChanged + one TalkAdded per talk.
    let outcome = cycle.process_update().await.unwrap();
    assert_eq!(
        outcome,
        CycleOutcome::Published {
            events: 4,
            delivered: 1,
            failed: 0,
        }
    );
    assert_eq!(cycle.current_date(), "d2");
}

#[tokio::test]
async fn duplicate_triggers_are_harmless() {
    let temp = TempDir::new().unwrap();
    let initial = schedule("d1", &["Alice"], vec![talk("T1", &["P"])]);
    let mut cycle = bootstrap_cycle(&temp, &initial).await;

    let edited = schedule("d1", &["Bob"], vec![talk("T1", &["P"])]);
    write_schedule(&data_path(&temp), &edited);

    // First trigger publishes, the second (same write) sees no difference.
    assert!(matches!(
        cycle.process_update().await.unwrap(),
        CycleOutcome::Published { events: 1, .. }
    ));
    assert_eq!(cycle.process_update().await.unwrap(), CycleOutcome::NoChanges);
}
