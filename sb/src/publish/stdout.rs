//! Line-per-update publisher

use async_trait::async_trait;
use tokio::io::{AsyncWriteExt, Stdout};
use tokio::sync::Mutex;

use super::{PublishError, Publisher};

/// Writes each composed line to stdout
///
/// Suits bars that read status lines from a pipe (lemonbar, i3bar-style
/// wrappers) and `sb once`.
pub struct StdoutPublisher {
    out: Mutex<Stdout>,
}

impl StdoutPublisher {
    pub fn new() -> Self {
        Self {
            out: Mutex::new(tokio::io::stdout()),
        }
    }
}

impl Default for StdoutPublisher {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Publisher for StdoutPublisher {
    fn name(&self) -> &'static str {
        "stdout"
    }

    async fn publish(&self, text: &str) -> Result<(), PublishError> {
        let mut out = self.out.lock().await;
        out.write_all(text.as_bytes()).await?;
        out.write_all(b"\n").await?;
        out.flush().await?;
        Ok(())
    }
}
