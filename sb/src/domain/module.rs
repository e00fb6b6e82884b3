//! Module descriptors

use std::time::Duration;

use super::trigger::TriggerId;

/// Where a module's text comes from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProducerSpec {
    /// Shell command; its stdout becomes the module text
    Command(String),
    /// Local time rendered with a strftime format
    Clock(String),
    /// Constant text
    Text(String),
}

impl ProducerSpec {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Command(_) => "command",
            Self::Clock(_) => "clock",
            Self::Text(_) => "text",
        }
    }
}

/// How a module's scheduler decides to refresh
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshMode {
    /// Refresh every `Duration`, or earlier on a trigger
    Interval(Duration),
    /// Refresh once at startup and then only on a trigger
    TriggerOnly,
}

/// Immutable description of one module
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleSpec {
    /// Display name used in logs and `sb check`
    pub name: String,

    /// Producer for the module text
    pub producer: ProducerSpec,

    /// Refresh interval in seconds; 0 means trigger-only
    pub interval_secs: u64,

    /// Trigger that forces an out-of-schedule refresh
    pub trigger: Option<TriggerId>,
}

impl ModuleSpec {
    pub fn refresh_mode(&self) -> RefreshMode {
        if self.interval_secs == 0 {
            RefreshMode::TriggerOnly
        } else {
            RefreshMode::Interval(Duration::from_secs(self.interval_secs))
        }
    }
}
