//! Module runner

use std::sync::Arc;

use tracing::{debug, warn};

use crate::aggregator::SlotWriter;
use crate::producer::Producer;

/// Result of one `run_once`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunOutcome {
    /// The slot was written
    Written,
    /// The producer failed; the slot keeps its previous text
    ProducerFailed,
    /// The Aggregator is gone; nothing will ever be published again
    AggregatorClosed,
}

/// Runs one module's producer and stores the result in its slot
pub struct ModuleRunner {
    name: String,
    producer: Arc<dyn Producer>,
    output_cap: usize,
    writer: SlotWriter,
}

impl ModuleRunner {
    pub fn new(name: impl Into<String>, producer: Arc<dyn Producer>, output_cap: usize, writer: SlotWriter) -> Self {
        Self {
            name: name.into(),
            producer,
            output_cap,
            writer,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Produce, truncate, write the slot
    ///
    /// Producer failures are logged and otherwise ignored. There is no
    /// timeout: a slow producer only delays this module.
    pub async fn run_once(&self) -> RunOutcome {
        debug!(module = %self.name, kind = self.producer.kind(), "ModuleRunner::run_once: called");
        let text = match self.producer.produce().await {
            Ok(text) => text,
            Err(e) => {
                warn!(module = %self.name, error = %e, "Producer failed, keeping previous output");
                return RunOutcome::ProducerFailed;
            }
        };

        let text = truncate_chars(text, self.output_cap);
        match self.writer.write(text).await {
            Ok(()) => RunOutcome::Written,
            Err(e) => {
                debug!(module = %self.name, error = %e, "ModuleRunner::run_once: aggregator closed");
                RunOutcome::AggregatorClosed
            }
        }
    }
}

/// Keep at most `cap` characters, never splitting a character
pub fn truncate_chars(mut text: String, cap: usize) -> String {
    if let Some((idx, _)) = text.char_indices().nth(cap) {
        text.truncate(idx);
    }
    text
}
