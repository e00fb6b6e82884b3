//! Module execution and refresh scheduling
//!
//! Each module gets a [`ModuleRunner`] (produce, truncate, write the slot)
//! driven by its own [`RefreshScheduler`] task.

mod runner;
mod scheduler;

pub use runner::{ModuleRunner, RunOutcome, truncate_chars};
pub use scheduler::RefreshScheduler;
