//! AggregatorHandle - client interface for the Aggregator task

use eyre::{Result, eyre};
use tokio::sync::{mpsc, oneshot};
use tracing::debug;

use super::messages::AggregatorRequest;

/// Cloneable handle for reading and stopping the Aggregator
///
/// It cannot write slots; that takes a [`super::SlotWriter`].
#[derive(Clone, Debug)]
pub struct AggregatorHandle {
    tx: mpsc::Sender<AggregatorRequest>,
}

impl AggregatorHandle {
    pub(crate) fn new(tx: mpsc::Sender<AggregatorRequest>) -> Self {
        Self { tx }
    }

    /// Get the currently composed line
    pub async fn snapshot(&self) -> Result<String> {
        debug!("AggregatorHandle::snapshot: called");
        let (reply_tx, reply_rx) = oneshot::channel();

        self.tx
            .send(AggregatorRequest::Snapshot { reply_tx })
            .await
            .map_err(|_| eyre!("Aggregator channel closed"))?;

        reply_rx.await.map_err(|_| eyre!("Aggregator shutdown before reply"))
    }

    /// Ask the Aggregator to publish anything pending and stop
    pub async fn shutdown(&self) -> Result<()> {
        debug!("AggregatorHandle::shutdown: called");
        self.tx
            .send(AggregatorRequest::Shutdown)
            .await
            .map_err(|_| eyre!("Aggregator channel closed"))
    }
}
