//! Storage module for persisting crawl progress
//!
//! Progress is kept in a single JSON file that serves both as the periodic
//! checkpoint of a running crawl and as the page cache read by `--build-only`.
//! The file is always replaced whole.

mod checkpoint;

pub use checkpoint::{Checkpoint, CheckpointStore, CHECKPOINT_VERSION};

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while reading or writing checkpoints
#[derive(Debug, Error)]
pub enum CheckpointError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("No checkpoint found at {}", .0.display())]
    Missing(PathBuf),

    #[error("Unsupported checkpoint version {0}")]
    UnsupportedVersion(u32),
}

/// Result type for checkpoint operations
pub type CheckpointResult<T> = Result<T, CheckpointError>;
