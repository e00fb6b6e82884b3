//! Producers: where module text comes from
//!
//! A producer is anything that can be asked for the current text of a
//! module. The configuration selects one of the built-in kinds; tests and
//! embedders can implement [`Producer`] directly.

mod clock;
mod command;
mod error;
mod text;

pub use clock::ClockProducer;
pub use command::CommandProducer;
pub use error::ProducerError;
pub use text::TextProducer;

use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::ProducerSpec;

/// Source of one module's text
#[async_trait]
pub trait Producer: Send + Sync {
    /// Short kind name for logs
    fn kind(&self) -> &'static str;

    /// Produce the current text
    ///
    /// May take arbitrarily long; an error means nothing was produced and
    /// the module keeps its previous text.
    async fn produce(&self) -> Result<String, ProducerError>;
}

/// Build the producer selected by a module spec
pub fn create_producer(spec: &ProducerSpec) -> Arc<dyn Producer> {
    match spec {
        ProducerSpec::Command(command) => Arc::new(CommandProducer::new(command.clone())),
        ProducerSpec::Clock(format) => Arc::new(ClockProducer::new(format.clone())),
        ProducerSpec::Text(text) => Arc::new(TextProducer::new(text.clone())),
    }
}
