//! Aggregator for module outputs
//!
//! The Aggregator task owns every module slot. Runners never touch the
//! slots directly; they send [`SlotUpdate`]s through a [`SlotWriter`], and
//! the Aggregator handles three requests:
//! - **Update:** store a module's latest text and mark the bar dirty
//! - **Snapshot:** reply with the currently composed line
//! - **Shutdown:** publish anything pending and stop

mod compose;
mod core;
mod handle;
mod messages;

pub use compose::{Aggregate, collapse_newlines, compose_line};
pub use core::{Aggregator, DEFAULT_CHANNEL_BUFFER};
pub use handle::AggregatorHandle;
pub use messages::{AggregatorRequest, SlotUpdate, SlotWriter};
