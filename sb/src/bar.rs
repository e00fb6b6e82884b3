//! StatusBar - wires modules, triggers and the Aggregator together

use std::sync::Arc;
use std::time::Duration;

use eyre::{Result, eyre};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::aggregator::{Aggregator, AggregatorHandle};
use crate::domain::{BarLayout, ModuleSpec};
use crate::modules::{ModuleRunner, RefreshScheduler};
use crate::producer::{Producer, create_producer};
use crate::publish::Publisher;
use crate::trigger::TriggerRouter;

/// How long `shutdown` waits for each task before aborting it
const SHUTDOWN_GRACE: Duration = Duration::from_secs(5);

/// A running status bar
///
/// One scheduler task per module, one Aggregator task, and a shared
/// trigger router. Dropping it without calling [`StatusBar::shutdown`]
/// leaves the tasks running until the runtime stops.
pub struct StatusBar {
    aggregator: AggregatorHandle,
    aggregator_task: JoinHandle<()>,
    router: Arc<TriggerRouter>,
    schedulers: Vec<JoinHandle<()>>,
    shutdown_tx: watch::Sender<bool>,
}

impl StatusBar {
    /// Start every module in the layout with the producers it configures
    pub fn start(layout: &BarLayout, publisher: Arc<dyn Publisher>) -> Result<Self> {
        Self::start_with(layout, publisher, |spec| create_producer(&spec.producer))
    }

    /// Start every module, choosing each module's producer with `producers`
    ///
    /// Must be called inside a Tokio runtime.
    pub fn start_with<F>(layout: &BarLayout, publisher: Arc<dyn Publisher>, mut producers: F) -> Result<Self>
    where
        F: FnMut(&ModuleSpec) -> Arc<dyn Producer>,
    {
        debug!(modules = layout.module_count(), "StatusBar::start_with: called");
        let mut aggregator = Aggregator::new(layout, publisher);
        let mut router = TriggerRouter::new();
        let (shutdown_tx, shutdown_rx) = watch::channel(false);

        let mut schedulers = Vec::with_capacity(layout.module_count());
        let mut pending = Vec::with_capacity(layout.module_count());
        for (slot, spec) in layout.slots() {
            let writer = aggregator
                .writer(slot)
                .ok_or_else(|| eyre!("No writer available for slot {}", slot))?;
            let runner = ModuleRunner::new(spec.name.clone(), producers(spec), layout.output_cap, writer);
            let wake = router.subscribe(spec.trigger);
            pending.push(RefreshScheduler::new(
                runner,
                spec.refresh_mode(),
                wake,
                shutdown_rx.clone(),
            ));
            debug!(%slot, module = %spec.name, trigger = ?spec.trigger, "StatusBar::start_with: module prepared");
        }

        let handle = aggregator.handle();
        let aggregator_task = tokio::spawn(aggregator.run());
        for scheduler in pending {
            schedulers.push(tokio::spawn(scheduler.run()));
        }

        info!(modules = schedulers.len(), "Status bar started");
        Ok(Self {
            aggregator: handle,
            aggregator_task,
            router: Arc::new(router),
            schedulers,
            shutdown_tx,
        })
    }

    /// The trigger router, for signal listeners
    pub fn router(&self) -> Arc<TriggerRouter> {
        self.router.clone()
    }

    /// Receiver for the shutdown broadcast, for tasks that should stop with the bar
    pub fn shutdown_receiver(&self) -> watch::Receiver<bool> {
        self.shutdown_tx.subscribe()
    }

    /// Wake the modules subscribed to `id`; out-of-range ids are ignored
    pub fn trigger(&self, id: i64) -> usize {
        debug!(id, "StatusBar::trigger: called");
        self.router.route(id)
    }

    /// Refresh every module that has a trigger
    pub fn refresh_all(&self) -> usize {
        debug!("StatusBar::refresh_all: called");
        self.router.route_all()
    }

    /// Number of module scheduler tasks
    pub fn scheduler_count(&self) -> usize {
        self.schedulers.len()
    }

    /// The line as it would be published right now
    pub async fn snapshot(&self) -> Result<String> {
        self.aggregator.snapshot().await
    }

    /// Stop every scheduler, then flush and stop the Aggregator
    pub async fn shutdown(self) -> Result<()> {
        info!("Status bar shutting down");
        // Err only means every scheduler already exited
        let _ = self.shutdown_tx.send(true);

        for task in self.schedulers {
            let abort = task.abort_handle();
            if tokio::time::timeout(SHUTDOWN_GRACE, task).await.is_err() {
                warn!("Module scheduler did not stop in time, aborting");
                abort.abort();
            }
        }

        self.aggregator.shutdown().await?;
        let abort = self.aggregator_task.abort_handle();
        if tokio::time::timeout(SHUTDOWN_GRACE, self.aggregator_task).await.is_err() {
            warn!("Aggregator did not stop in time, aborting");
            abort.abort();
        }

        debug!("StatusBar::shutdown: done");
        Ok(())
    }
}

/// Run every module once and return the composed line
///
/// Used by `sb once`. Nothing is published.
pub async fn render_once(layout: &BarLayout) -> Result<String> {
    debug!("render_once: called");
    let mut aggregator = Aggregator::new(layout, Arc::new(crate::publish::StdoutPublisher::new()));
    let mut runners = Vec::with_capacity(layout.module_count());
    for (slot, spec) in layout.slots() {
        let writer = aggregator
            .writer(slot)
            .ok_or_else(|| eyre!("No writer available for slot {}", slot))?;
        runners.push(ModuleRunner::new(
            spec.name.clone(),
            create_producer(&spec.producer),
            layout.output_cap,
            writer,
        ));
    }

    let mut runs = tokio::task::JoinSet::new();
    for runner in runners {
        runs.spawn(async move { runner.run_once().await });
    }
    while let Some(result) = runs.join_next().await {
        result?;
    }

    // Every update is queued; compose without publishing
    aggregator.drain_pending();
    Ok(aggregator.compose())
}
