use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// A failure that stops the traversal of one root.
#[derive(Debug, Error)]
pub enum WalkError {
    #[error("failed to traverse {}: {source}", root.display())]
    Traversal {
        root: PathBuf,
        #[source]
        source: walkdir::Error,
    },

    #[error("failed to read metadata for {}: {source}", path.display())]
    Metadata {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl WalkError {
    /// Path of the entry the failure is attached to, when known.
    pub fn path(&self) -> Option<&std::path::Path> {
        match self {
            WalkError::Traversal { source, .. } => source.path(),
            WalkError::Metadata { path, .. } => Some(path),
        }
    }
}

/// Failures reported back to the caller of an action.
#[derive(Debug, Error)]
pub enum ActionError {
    #[error("Action non reconnue")]
    Unrecognized { name: String },

    #[error("worker task failed: {0}")]
    Worker(String),

    #[error("failed to encode result: {0}")]
    Encode(#[from] serde_json::Error),
}
