//! Built-in clock producer

use std::fmt::Write;

use async_trait::async_trait;
use chrono::Local;

use super::{Producer, ProducerError};

/// Local time formatted with strftime syntax
#[derive(Debug, Clone)]
pub struct ClockProducer {
    format: String,
}

impl ClockProducer {
    pub fn new(format: impl Into<String>) -> Self {
        Self { format: format.into() }
    }
}

#[async_trait]
impl Producer for ClockProducer {
    fn kind(&self) -> &'static str {
        "clock"
    }

    async fn produce(&self) -> Result<String, ProducerError> {
        let mut text = String::new();
        // chrono reports bad specifiers through fmt::Error instead of panicking here
        write!(text, "{}", Local::now().format(&self.format)).map_err(|_| ProducerError::ClockFormat {
            format: self.format.clone(),
        })?;
        Ok(text)
    }
}
