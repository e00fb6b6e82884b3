//! External command producer

use std::process::Stdio;

use async_trait::async_trait;
use tokio::process::Command;
use tracing::debug;

use super::{Producer, ProducerError};

/// Runs a shell command and returns its stdout
///
/// The exit status is ignored: whatever the command printed is the module
/// text. Stderr is discarded. The child is killed if the future is dropped,
/// so a shutdown does not leave hung scripts behind.
#[derive(Debug, Clone)]
pub struct CommandProducer {
    command: String,
}

impl CommandProducer {
    pub fn new(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
        }
    }

    pub fn command(&self) -> &str {
        &self.command
    }
}

#[async_trait]
impl Producer for CommandProducer {
    fn kind(&self) -> &'static str {
        "command"
    }

    async fn produce(&self) -> Result<String, ProducerError> {
        debug!(command = %self.command, "CommandProducer::produce: called");
        let child = Command::new("sh")
            .arg("-c")
            .arg(&self.command)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .kill_on_drop(true)
            .spawn()
            .map_err(|source| ProducerError::Spawn {
                command: self.command.clone(),
                source,
            })?;

        let output = child.wait_with_output().await.map_err(|source| ProducerError::Read {
            command: self.command.clone(),
            source,
        })?;

        debug!(status = ?output.status, len = output.stdout.len(), "CommandProducer::produce: command completed");
        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_command_stdout() {
        let producer = CommandProducer::new("echo net:ok");
        let text = producer.produce().await.unwrap();
        assert_eq!(text, "net:ok\n");
    }

    #[tokio::test]
    async fn test_command_failure_still_yields_output() {
        let producer = CommandProducer::new("printf partial; exit 3");
        let text = producer.produce().await.unwrap();
        assert_eq!(text, "partial");
    }

    #[tokio::test]
    async fn test_command_stderr_is_discarded() {
        let producer = CommandProducer::new("echo oops >&2");
        let text = producer.produce().await.unwrap();
        assert!(text.is_empty());
    }

    #[tokio::test]
    async fn test_command_invalid_utf8_is_lossy() {
        let producer = CommandProducer::new(r"printf 'a\377b'");
        let text = producer.produce().await.unwrap();
        assert!(text.starts_with('a'));
        assert!(text.ends_with('b'));
    }
}
