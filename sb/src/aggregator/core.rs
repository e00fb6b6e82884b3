//! Main Aggregator task implementation

use std::collections::HashSet;
use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use super::compose::{Aggregate, compose_line};
use super::handle::AggregatorHandle;
use super::messages::{AggregatorRequest, SlotUpdate, SlotWriter};
use crate::domain::{BarId, BarLayout, SlotId};
use crate::publish::Publisher;

/// Channel buffer size for aggregator requests
pub const DEFAULT_CHANNEL_BUFFER: usize = 1024;

/// Owns every slot and publishes the composed line
///
/// Updates that arrive while the task is busy (publishing, or between two
/// wakes) are drained together and produce a single publish of the latest
/// state.
pub struct Aggregator {
    top: Aggregate,
    bottom: Option<Aggregate>,
    separator: String,
    publisher: Arc<dyn Publisher>,
    issued: HashSet<SlotId>,
    tx: mpsc::Sender<AggregatorRequest>,
    rx: mpsc::Receiver<AggregatorRequest>,
}

impl Aggregator {
    /// Create an Aggregator with one empty slot per module in the layout
    pub fn new(layout: &BarLayout, publisher: Arc<dyn Publisher>) -> Self {
        debug!(modules = layout.module_count(), publisher = publisher.name(), "Aggregator::new: called");
        let (tx, rx) = mpsc::channel(DEFAULT_CHANNEL_BUFFER);
        Self {
            top: Aggregate::new(layout.top.style.clone(), layout.top.modules.len()),
            bottom: layout
                .bottom
                .as_ref()
                .map(|b| Aggregate::new(b.style.clone(), b.modules.len())),
            separator: layout.separator.clone(),
            publisher,
            issued: HashSet::new(),
            tx,
            rx,
        }
    }

    /// Get a handle for snapshots and shutdown
    pub fn handle(&self) -> AggregatorHandle {
        AggregatorHandle::new(self.tx.clone())
    }

    /// Issue the writer for a slot
    ///
    /// Returns None if the slot does not exist or its writer was already
    /// issued.
    pub fn writer(&mut self, slot: SlotId) -> Option<SlotWriter> {
        debug!(%slot, "Aggregator::writer: called");
        if self.aggregate(slot.bar)?.len() <= slot.position {
            debug!(%slot, "Aggregator::writer: no such slot");
            return None;
        }
        if !self.issued.insert(slot) {
            debug!(%slot, "Aggregator::writer: writer already issued");
            return None;
        }
        Some(SlotWriter::new(slot, self.tx.clone()))
    }

    /// The line as it would be published right now
    pub fn compose(&self) -> String {
        compose_line(&self.top, self.bottom.as_ref(), &self.separator)
    }

    /// Apply every queued request without publishing
    ///
    /// Returns true if any slot changed.
    pub fn drain_pending(&mut self) -> bool {
        let mut dirty = false;
        while let Ok(req) = self.rx.try_recv() {
            self.handle_request(req, &mut dirty);
        }
        dirty
    }

    fn aggregate(&self, bar: BarId) -> Option<&Aggregate> {
        match bar {
            BarId::Top => Some(&self.top),
            BarId::Bottom => self.bottom.as_ref(),
        }
    }

    fn apply(&mut self, update: SlotUpdate) -> bool {
        let aggregate = match update.slot.bar {
            BarId::Top => Some(&mut self.top),
            BarId::Bottom => self.bottom.as_mut(),
        };
        match aggregate {
            Some(agg) => agg.write(update.slot.position, update.text),
            None => false,
        }
    }

    /// Handle one request; returns true when shutdown was requested
    fn handle_request(&mut self, req: AggregatorRequest, dirty: &mut bool) -> bool {
        match req {
            AggregatorRequest::Update(update) => {
                let slot = update.slot;
                if self.apply(update) {
                    *dirty = true;
                } else {
                    warn!(%slot, "Update for unknown slot dropped");
                }
                false
            }
            AggregatorRequest::Snapshot { reply_tx } => {
                let _ = reply_tx.send(self.compose());
                false
            }
            AggregatorRequest::Shutdown => true,
        }
    }

    async fn publish(&self) {
        let line = self.compose();
        debug!(len = line.len(), "Aggregator::publish: publishing");
        if let Err(e) = self.publisher.publish(&line).await {
            warn!(publisher = self.publisher.name(), error = %e, "Failed to publish status line");
        }
    }

    /// Run the Aggregator task
    ///
    /// This consumes the Aggregator and runs until shutdown is requested.
    pub async fn run(mut self) {
        info!(publisher = self.publisher.name(), "Aggregator started");

        while let Some(req) = self.rx.recv().await {
            let mut dirty = false;
            let mut shutdown = self.handle_request(req, &mut dirty);

            // Coalesce everything already queued into this cycle
            while !shutdown && let Ok(req) = self.rx.try_recv() {
                shutdown = self.handle_request(req, &mut dirty);
            }

            if dirty {
                self.publish().await;
            }

            if shutdown {
                debug!("Aggregator::run: shutdown requested");
                break;
            }
        }

        info!("Aggregator stopped");
    }
}
