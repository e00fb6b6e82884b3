//! Constant text producer

use async_trait::async_trait;

use super::{Producer, ProducerError};

/// Always produces the same text
#[derive(Debug, Clone)]
pub struct TextProducer {
    text: String,
}

impl TextProducer {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }
}

#[async_trait]
impl Producer for TextProducer {
    fn kind(&self) -> &'static str {
        "text"
    }

    async fn produce(&self) -> Result<String, ProducerError> {
        Ok(self.text.clone())
    }
}
