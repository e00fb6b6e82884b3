//! Publish error types

use thiserror::Error;

/// Why a line was not delivered
#[derive(Debug, Error)]
pub enum PublishError {
    #[error("Failed to launch {program}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("{program} exited with status {code:?}")]
    Status { program: String, code: Option<i32> },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
