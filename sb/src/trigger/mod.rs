//! Trigger routing and delivery
//!
//! [`TriggerRouter`] maps trigger ids to the wake signals of subscribed
//! modules. On Linux, real-time signals `SIGRTMIN + id` are delivered to
//! the router by [`spawn_signal_listeners`], and [`send_trigger`] raises
//! them from another process.

mod router;
mod signals;

pub use router::TriggerRouter;
pub use signals::{send_trigger, signal_number, spawn_signal_listeners};
