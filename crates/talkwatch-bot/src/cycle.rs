//! The update cycle.
//!
//! Owns the single current snapshot and processes triggers strictly one at
//! a time: fetch the new snapshot (retrying until it parses), diff against
//! the current one, render, deliver to every configured chat, persist, and
//! only then swap the in-memory state. Concurrency discipline lives
//! entirely here: the core functions are pure and the trigger channel has
//! exactly one consumer.

use crate::telegram::Transport;
use anyhow::{Context, Result};
use talkwatch_core::{RetryPolicy, SnapshotSource, SnapshotStore, diff, render};
use talkwatch_types::Schedule;
use tokio::sync::mpsc;
use tracing::{error, info, warn};

/// Outcome of one processed trigger.
#[derive(Debug, PartialEq, Eq)]
pub enum CycleOutcome {
    /// The new snapshot produced no change events.
    NoChanges,
    /// Changes were rendered and delivery was attempted.
    Published {
        events: usize,
        delivered: usize,
        failed: usize,
    },
}

/// Host-side state handle for the update loop.
pub struct UpdateCycle {
    current: Schedule,
    source: SnapshotSource,
    store: SnapshotStore,
    transport: Transport,
    chat_ids: Vec<i64>,
    retry: RetryPolicy,
}

impl UpdateCycle {
    /// Initialize the cycle state: the persisted snapshot if one exists,
    /// otherwise a fresh fetch persisted immediately.
    pub async fn bootstrap(
        source: SnapshotSource,
        store: SnapshotStore,
        transport: Transport,
        chat_ids: Vec<i64>,
        retry: RetryPolicy,
    ) -> Result<Self> {
        let current = match store.load().context("loading persisted snapshot")? {
            Some(snapshot) => {
                info!(
                    target: "talkwatch::cycle",
                    date = %snapshot.date,
                    "restored persisted snapshot"
                );
                snapshot
            }
            None => {
                let snapshot = source.fetch_with_retry(&retry).await;
                store
                    .persist(&snapshot)
                    .context("persisting bootstrap snapshot")?;
                info!(
                    target: "talkwatch::cycle",
                    date = %snapshot.date,
                    "bootstrapped from fresh fetch"
                );
                snapshot
            }
        };

        Ok(Self {
            current,
            source,
            store,
            transport,
            chat_ids,
            retry,
        })
    }

    /// The date label of the snapshot the next diff will compare against.
    pub fn current_date(&self) -> &str {
        &self.current.date
    }

    /// Consume triggers until every sender is dropped.
    pub async fn run(mut self, mut triggers: mpsc::UnboundedReceiver<()>) {
        while triggers.recv().await.is_some() {
            match self.process_update().await {
                Ok(CycleOutcome::NoChanges) => {
                    info!(target: "talkwatch::cycle", "no changes detected");
                }
                Ok(CycleOutcome::Published {
                    events,
                    delivered,
                    failed,
                }) => {
                    info!(
                        target: "talkwatch::cycle",
                        events, delivered, failed,
                        "changes published"
                    );
                }
                Err(e) => {
                    // The previous snapshot stays current and persisted;
                    // the next trigger re-diffs against it.
                    error!(target: "talkwatch::cycle", error = %e, "update cycle failed");
                }
            }
        }
    }

    /// Process one trigger end to end.
    pub async fn process_update(&mut self) -> Result<CycleOutcome> {
        let new = self.source.fetch_with_retry(&self.retry).await;
        let changes = diff(&self.current, &new);

        let outcome = match render(&changes, &self.current.date) {
            None => CycleOutcome::NoChanges,
            Some(message) => {
                let mut delivered = 0;
                let mut failed = 0;
                for &chat_id in &self.chat_ids {
                    match self.transport.deliver(chat_id, &message).await {
                        Ok(()) => delivered += 1,
                        Err(e) => {
                            // One unreachable chat must not starve the rest.
                            failed += 1;
                            warn!(
                                target: "talkwatch::cycle",
                                chat_id,
                                error = %e,
                                "delivery failed"
                            );
                        }
                    }
                }
                CycleOutcome::Published {
                    events: changes.len(),
                    delivered,
                    failed,
                }
            }
        };

        // Persisted once per cycle, after delivery was attempted: skipping
        // the persist would re-announce the same edit on the next trigger.
        self.store.persist(&new).context("persisting snapshot")?;
        self.current = new;
        Ok(outcome)
    }
}
