//! Configuration error types

use std::path::PathBuf;
use thiserror::Error;

use crate::domain::BarId;

/// Errors that abort startup
///
/// Each variant class maps to its own process exit code so scripts can
/// tell a typo in an interval from an unreadable file.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{bar} bar module description must have exactly three elements, yours has {found} (module {module})")]
    WrongArity { bar: BarId, module: String, found: usize },

    #[error("refresh interval cannot be negative, yours is {interval} (module {module})")]
    NegativeInterval { module: String, interval: i64 },

    #[error("trigger id must be between 0 and 30, yours is {trigger} (module {module})")]
    InvalidTrigger { module: String, trigger: i64 },

    #[error("invalid {field} for module {module}: {reason}")]
    InvalidField {
        module: String,
        field: &'static str,
        reason: String,
    },

    #[error("Failed to read config file {path}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config file {path}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },
}

impl ConfigError {
    /// Process exit code for this class of violation
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::WrongArity { .. } => 1,
            Self::NegativeInterval { .. } => 2,
            Self::InvalidTrigger { .. } => 3,
            Self::InvalidField { .. } => 4,
            Self::Read { .. } | Self::Parse { .. } => 5,
        }
    }
}
