//! Error types for talkwatch-core.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum TalkwatchError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Watch error: {0}")]
    Watch(#[from] notify::Error),
}
