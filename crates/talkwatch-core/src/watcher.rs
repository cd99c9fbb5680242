//! Change trigger.
//!
//! Watches the talks-data file and sends one trigger per meaningful write.
//! The update cycle always diffs against the last persisted snapshot, so
//! duplicate and missed triggers are both tolerable: an unchanged snapshot
//! diffs to nothing, and the next trigger catches up on anything missed.

use crate::Result;
use notify::{
    Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher,
    event::{AccessKind, AccessMode, ModifyKind},
};
use std::path::PathBuf;
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::{debug, trace};

/// Watches the data file and forwards triggers on a channel.
pub struct ScheduleWatcher {
    path: PathBuf,
}

impl ScheduleWatcher {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Start watching. One `()` is sent on `trigger_tx` per relevant
    /// filesystem event. The file must exist when watching starts.
    pub fn spawn(self, trigger_tx: mpsc::UnboundedSender<()>) -> Result<WatcherHandle> {
        let (stop_tx, mut stop_rx) = mpsc::unbounded_channel::<()>();
        let (notify_tx, mut notify_rx) = mpsc::unbounded_channel();

        let mut file_watcher =
            notify::recommended_watcher(move |res: std::result::Result<Event, notify::Error>| {
                if let Ok(event) = res {
                    let _ = notify_tx.send(event);
                }
            })?;
        file_watcher.watch(&self.path, RecursiveMode::NonRecursive)?;

        let path = self.path;
        tokio::spawn(async move {
            loop {
                tokio::select! {
                    Some(event) = notify_rx.recv() => {
                        if is_write_event(&event.kind) {
                            trace!(
                                target: "talkwatch::watch",
                                path = %path.display(),
                                kind = ?event.kind,
                                "write event"
                            );
                            if trigger_tx.send(()).is_err() {
                                // Cycle is gone; nothing left to notify.
                                break;
                            }
                        }
                    }
                    Some(()) = stop_rx.recv() => {
                        debug!(target: "talkwatch::watch", "stopping schedule watcher");
                        break;
                    }
                    else => break,
                }
            }
        });

        Ok(WatcherHandle {
            stop_tx,
            _file_watcher: file_watcher,
        })
    }
}

/// The writer closed the file, or its data changed (platforms without
/// close-write notifications report plain modifications instead).
fn is_write_event(kind: &EventKind) -> bool {
    matches!(
        kind,
        EventKind::Access(AccessKind::Close(AccessMode::Write))
            | EventKind::Modify(ModifyKind::Data(_))
            | EventKind::Modify(ModifyKind::Any)
    )
}

/// Handle to a running watcher; keeps the underlying filesystem watch
/// alive. Dropping it ends notifications.
pub struct WatcherHandle {
    stop_tx: mpsc::UnboundedSender<()>,
    _file_watcher: RecommendedWatcher,
}

impl WatcherHandle {
    /// Stop the watcher task.
    pub fn stop(&self) {
        let _ = self.stop_tx.send(());
    }
}

/// Fixed-interval trigger for hosts without usable filesystem
/// notifications. The first tick is consumed so the interval starts with a
/// full wait instead of an immediate trigger.
pub fn spawn_poll_trigger(
    interval: Duration,
    trigger_tx: mpsc::UnboundedSender<()>,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(interval);
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
        ticker.tick().await;
        loop {
            ticker.tick().await;
            if trigger_tx.send(()).is_err() {
                break;
            }
        }
    })
}
