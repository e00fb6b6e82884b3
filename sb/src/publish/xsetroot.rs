//! Root window name publisher

use std::process::Stdio;

use async_trait::async_trait;
use tokio::process::Command;
use tracing::debug;

use super::{PublishError, Publisher};

/// Sets the X root window name, which dwm shows as its status text
#[derive(Debug, Clone)]
pub struct XsetrootPublisher {
    program: String,
}

impl XsetrootPublisher {
    pub fn new() -> Self {
        Self::with_program("xsetroot")
    }

    /// Use a different `xsetroot`-compatible program (`<program> -name <text>`)
    pub fn with_program(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }
}

impl Default for XsetrootPublisher {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Publisher for XsetrootPublisher {
    fn name(&self) -> &'static str {
        "xsetroot"
    }

    async fn publish(&self, text: &str) -> Result<(), PublishError> {
        debug!(program = %self.program, len = text.len(), "XsetrootPublisher::publish: called");
        let status = Command::new(&self.program)
            .arg("-name")
            .arg(text)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .await
            .map_err(|source| PublishError::Spawn {
                program: self.program.clone(),
                source,
            })?;

        if status.success() {
            Ok(())
        } else {
            Err(PublishError::Status {
                program: self.program.clone(),
                code: status.code(),
            })
        }
    }
}
