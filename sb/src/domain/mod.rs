//! Domain types shared by the scheduler, the aggregator and configuration
//!
//! Everything here is built once at startup from the configuration and
//! never mutated afterwards.

mod bar;
mod module;
mod trigger;

pub use bar::{BarId, BarLayout, BarSpec, BarStyle, SlotId};
pub use module::{ModuleSpec, ProducerSpec, RefreshMode};
pub use trigger::{MAX_TRIGGER_ID, TRIGGER_COUNT, TriggerId};
