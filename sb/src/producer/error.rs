//! Producer error types

use thiserror::Error;

/// Why a producer yielded no text
#[derive(Debug, Error)]
pub enum ProducerError {
    #[error("Failed to launch command '{command}'")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to read output of '{command}'")]
    Read {
        command: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid clock format '{format}'")]
    ClockFormat { format: String },
}
