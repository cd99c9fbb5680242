//! Snapshot source.
//!
//! Reads the upstream talks-data document and turns it into a validated
//! [`Schedule`]. The differ never sees a failed fetch: [`SnapshotSource::fetch_with_retry`]
//! keeps trying with a growing delay until the document reads and parses.

use crate::Result;
use std::path::{Path, PathBuf};
use std::time::Duration;
use talkwatch_types::Schedule;
use tracing::{debug, warn};

/// Delay policy for [`SnapshotSource::fetch_with_retry`].
///
/// The delay starts at `initial_delay` and is multiplied by `multiplier`
/// after each failed attempt, capped at `max_delay`.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    pub initial_delay: Duration,
    pub max_delay: Duration,
    pub multiplier: f64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            initial_delay: Duration::from_secs(1),
            max_delay: Duration::from_secs(60),
            multiplier: 2.0,
        }
    }
}

/// Reads schedule snapshots from the watched data file.
pub struct SnapshotSource {
    path: PathBuf,
}

impl SnapshotSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// The watched file path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Single fetch attempt: read and deserialize the data file.
    ///
    /// A missing file or a document with a missing/mistyped field is an
    /// error; shape validation happens here so the differ only ever sees
    /// complete snapshots.
    pub fn fetch(&self) -> Result<Schedule> {
        let raw = std::fs::read_to_string(&self.path)?;
        let snapshot = serde_json::from_str(&raw)?;
        Ok(snapshot)
    }

    /// Fetch, retrying with an accumulating capped delay until a valid
    /// snapshot is available.
    ///
    /// An explicit loop, not recursion; it never gives up on its own, so
    /// the caller decides how long to wait (usually forever, since the
    /// update cycle is useless without data).
    pub async fn fetch_with_retry(&self, policy: &RetryPolicy) -> Schedule {
        let mut delay = policy.initial_delay;
        let mut attempt: u32 = 1;
        loop {
            match self.fetch() {
                Ok(snapshot) => {
                    if attempt > 1 {
                        debug!(
                            target: "talkwatch::source",
                            attempt,
                            "fetch succeeded after retries"
                        );
                    }
                    return snapshot;
                }
                Err(e) => {
                    warn!(
                        target: "talkwatch::source",
                        attempt,
                        delay_ms = delay.as_millis() as u64,
                        error = %e,
                        "fetch failed, retrying"
                    );
                    tokio::time::sleep(delay).await;
                    let next_ms = (delay.as_millis() as f64 * policy.multiplier) as u64;
                    delay = Duration::from_millis(next_ms).min(policy.max_delay);
                    attempt += 1;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const VALID: &str = r#"{"date": "d1", "hosts": ["A"], "talks": []}"#;

    fn quick_policy() -> RetryPolicy {
        RetryPolicy {
            initial_delay: Duration::from_millis(1),
            max_delay: Duration::from_millis(5),
            multiplier: 2.0,
        }
    }

    #[test]
    fn fetch_reads_a_valid_document() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("new.json");
        std::fs::write(&path, VALID).unwrap();

        let snapshot = SnapshotSource::new(&path).fetch().unwrap();
        assert_eq!(snapshot.date, "d1");
        assert_eq!(snapshot.hosts, vec!["A"]);
    }

    #[test]
    fn fetch_fails_on_missing_file() {
        let temp = TempDir::new().unwrap();
        let source = SnapshotSource::new(temp.path().join("absent.json"));
        assert!(source.fetch().is_err());
    }

    #[test]
    fn fetch_fails_on_incomplete_shape() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("new.json");
        std::fs::write(&path, r#"{"date": "d1", "hosts": []}"#).unwrap();

        assert!(SnapshotSource::new(&path).fetch().is_err());
    }

    #[tokio::test]
    async fn fetch_with_retry_waits_for_the_file_to_appear() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("new.json");

        let writer_path = path.clone();
        let writer = tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(20)).await;
            std::fs::write(&writer_path, VALID).unwrap();
        });

        let source = SnapshotSource::new(&path);
        let snapshot = source.fetch_with_retry(&quick_policy()).await;
        assert_eq!(snapshot.date, "d1");
        writer.await.unwrap();
    }

    #[tokio::test]
    async fn fetch_with_retry_outlasts_a_malformed_document() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("new.json");
        std::fs::write(&path, "{not json").unwrap();

        let writer_path = path.clone();
        let writer = tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(20)).await;
            std::fs::write(&writer_path, VALID).unwrap();
        });

        let snapshot = SnapshotSource::new(&path)
            .fetch_with_retry(&quick_policy())
            .await;
        assert_eq!(snapshot.date, "d1");
        writer.await.unwrap();
    }
}
