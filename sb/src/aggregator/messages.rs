//! Message types for the Aggregator

use eyre::{Result, eyre};
use tokio::sync::{mpsc, oneshot};
use tracing::debug;

use crate::domain::SlotId;

/// A module's freshly produced text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlotUpdate {
    pub slot: SlotId,
    pub text: String,
}

/// Requests to the Aggregator task
#[derive(Debug)]
pub enum AggregatorRequest {
    /// Store new text for a slot
    Update(SlotUpdate),

    /// Reply with the currently composed line
    Snapshot { reply_tx: oneshot::Sender<String> },

    /// Publish pending updates and stop
    Shutdown,
}

/// The only way to write a slot
///
/// Issued once per slot by [`super::Aggregator::writer`] and deliberately
/// not `Clone`, so each slot has exactly one writer.
#[derive(Debug)]
pub struct SlotWriter {
    slot: SlotId,
    tx: mpsc::Sender<AggregatorRequest>,
}

impl SlotWriter {
    pub(crate) fn new(slot: SlotId, tx: mpsc::Sender<AggregatorRequest>) -> Self {
        Self { slot, tx }
    }

    pub fn slot(&self) -> SlotId {
        self.slot
    }

    /// Replace the slot's text and mark the aggregate dirty
    pub async fn write(&self, text: String) -> Result<()> {
        debug!(slot = %self.slot, len = text.len(), "SlotWriter::write: called");
        self.tx
            .send(AggregatorRequest::Update(SlotUpdate { slot: self.slot, text }))
            .await
            .map_err(|_| eyre!("Aggregator channel closed"))
    }
}
