//! statusbar - signal-driven status bar for dwm
//!
//! Runs a set of independent modules, each producing a short piece of
//! text, and publishes one composed line whenever any of them changes.
//!
//! # Core Concepts
//!
//! - **One task per module**: every module refreshes on its own interval,
//!   on its trigger, or both
//! - **Triggers**: external wake-ups numbered 0-30, delivered as the
//!   real-time signal `SIGRTMIN + id`
//! - **Single writer per slot**: only a module's own task writes its slot,
//!   and the Aggregator owns every slot
//! - **Coalesced publishing**: a burst of updates becomes one published line
//!
//! # Modules
//!
//! - [`domain`] - Bar layout, module and trigger types
//! - [`config`] - Configuration types, validation and loading
//! - [`producer`] - Where module text comes from (command, clock, text)
//! - [`modules`] - Running a module once and scheduling its refreshes
//! - [`trigger`] - Trigger routing and real-time signal delivery
//! - [`aggregator`] - Slot ownership, line composition and publishing
//! - [`publish`] - Publish destinations (xsetroot, stdout)
//! - [`bar`] - Wiring everything into a running status bar
//! - [`daemon`] - PID file management for the running process
//! - [`cli`] - Command-line interface

pub mod aggregator;
pub mod bar;
pub mod cli;
pub mod config;
pub mod daemon;
pub mod domain;
pub mod modules;
pub mod producer;
pub mod publish;
pub mod trigger;

// Re-export commonly used types
pub use aggregator::{Aggregate, Aggregator, AggregatorHandle, SlotWriter, collapse_newlines, compose_line};
pub use bar::{StatusBar, render_once};
pub use config::{Config, ConfigError, PublisherKind};
pub use daemon::{DaemonManager, DaemonStatus};
pub use domain::{BarId, BarLayout, BarSpec, BarStyle, ModuleSpec, ProducerSpec, RefreshMode, SlotId, TriggerId};
pub use modules::{ModuleRunner, RefreshScheduler, RunOutcome};
pub use producer::{Producer, ProducerError, create_producer};
pub use publish::{PublishError, Publisher, create_publisher};
pub use trigger::{TriggerRouter, send_trigger, spawn_signal_listeners};
