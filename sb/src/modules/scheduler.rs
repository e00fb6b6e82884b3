//! Per-module refresh scheduler

use std::sync::Arc;

use tokio::sync::{Notify, watch};
use tracing::{debug, info};

use super::runner::{ModuleRunner, RunOutcome};
use crate::domain::RefreshMode;

/// Decides when one module refreshes
///
/// Runs the module once at startup, then waits on its wake signal: up to
/// the interval in [`RefreshMode::Interval`], indefinitely in
/// [`RefreshMode::TriggerOnly`]. The interval re-arms after every run, so a
/// trigger resets the phase. A trigger that arrives while the module is
/// running is kept by the wake signal and causes one more run.
pub struct RefreshScheduler {
    runner: ModuleRunner,
    mode: RefreshMode,
    wake: Arc<Notify>,
    shutdown: watch::Receiver<bool>,
}

impl RefreshScheduler {
    pub fn new(runner: ModuleRunner, mode: RefreshMode, wake: Arc<Notify>, shutdown: watch::Receiver<bool>) -> Self {
        debug!(module = %runner.name(), ?mode, "RefreshScheduler::new: called");
        Self {
            runner,
            mode,
            wake,
            shutdown,
        }
    }

    pub fn mode(&self) -> RefreshMode {
        self.mode
    }

    /// Run until the shutdown broadcast or until the Aggregator goes away
    pub async fn run(mut self) {
        info!(module = %self.runner.name(), mode = ?self.mode, "Module scheduler started");

        loop {
            if *self.shutdown.borrow() {
                debug!(module = %self.runner.name(), "RefreshScheduler::run: shutdown already set");
                break;
            }

            // A hung producer must not block shutdown; dropping the future kills it
            let outcome = tokio::select! {
                outcome = self.runner.run_once() => outcome,
                _ = self.shutdown.changed() => break,
            };
            if outcome == RunOutcome::AggregatorClosed {
                break;
            }

            if !self.wait().await {
                break;
            }
        }

        info!(module = %self.runner.name(), "Module scheduler stopped");
    }

    /// Wait for the next refresh; false means shut down
    async fn wait(&mut self) -> bool {
        match self.mode {
            RefreshMode::Interval(interval) => tokio::select! {
                _ = self.wake.notified() => {
                    debug!(module = %self.runner.name(), "RefreshScheduler::wait: woken by trigger");
                    true
                }
                _ = tokio::time::sleep(interval) => true,
                _ = self.shutdown.changed() => false,
            },
            RefreshMode::TriggerOnly => tokio::select! {
                _ = self.wake.notified() => {
                    debug!(module = %self.runner.name(), "RefreshScheduler::wait: woken by trigger");
                    true
                }
                _ = self.shutdown.changed() => false,
            },
        }
    }
}
