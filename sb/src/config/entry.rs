//! Module entries as written in the config file

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::warn;

use super::error::ConfigError;
use crate::domain::{BarId, ModuleSpec, ProducerSpec, TriggerId};

/// A scalar in a module entry
///
/// Any YAML scalar is accepted here so that a wrong type is reported as an
/// invalid field of the module instead of a parse failure of the file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Int(i64),
    Float(f64),
    Bool(bool),
    Text(String),
}

impl FieldValue {
    fn as_text(&self) -> String {
        match self {
            Self::Int(i) => i.to_string(),
            Self::Float(f) => f.to_string(),
            Self::Bool(b) => b.to_string(),
            Self::Text(s) => s.clone(),
        }
    }

    fn as_int(&self, module: &str, field: &'static str) -> Result<i64, ConfigError> {
        let invalid = |reason: String| ConfigError::InvalidField {
            module: module.to_string(),
            field,
            reason,
        };
        match self {
            Self::Int(i) => Ok(*i),
            Self::Text(s) => s
                .trim()
                .parse()
                .map_err(|e: std::num::ParseIntError| invalid(format!("'{}' is not an integer ({})", s, e))),
            Self::Float(f) => Err(invalid(format!("{} is not an integer", f))),
            Self::Bool(b) => Err(invalid(format!("{} is not an integer", b))),
        }
    }
}

/// Mapping form of a module entry
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ModuleFields {
    /// Display name (defaults to the command)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Shell command producing the text
    #[serde(skip_serializing_if = "Option::is_none")]
    pub command: Option<String>,

    /// strftime format for the built-in clock
    #[serde(skip_serializing_if = "Option::is_none")]
    pub clock: Option<String>,

    /// Constant text
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,

    /// Refresh interval in seconds (0 = trigger-only); required
    #[serde(skip_serializing_if = "Option::is_none")]
    pub interval: Option<FieldValue>,

    /// Trigger id (0..=30)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trigger: Option<FieldValue>,
}

/// One module entry, either `[command, interval, trigger]` or a mapping
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ModuleEntry {
    Compact(Vec<FieldValue>),
    Full(ModuleFields),
}

impl ModuleEntry {
    /// Shorthand for the compact form
    pub fn compact(command: &str, interval: i64, trigger: i64) -> Self {
        Self::Compact(vec![
            FieldValue::Text(command.to_string()),
            FieldValue::Int(interval),
            FieldValue::Int(trigger),
        ])
    }

    /// Name used in error messages before the entry is validated
    fn label(&self) -> String {
        match self {
            Self::Compact(fields) => fields.first().map(FieldValue::as_text).unwrap_or_default(),
            Self::Full(f) => f
                .name
                .clone()
                .or_else(|| f.command.clone())
                .or_else(|| f.clock.as_ref().map(|_| "clock".to_string()))
                .or_else(|| f.text.as_ref().map(|_| "text".to_string()))
                .unwrap_or_default(),
        }
    }

    /// Validate the entry into an immutable module spec
    pub fn to_spec(&self, bar: BarId) -> Result<ModuleSpec, ConfigError> {
        let module = self.label();
        match self {
            Self::Compact(fields) => {
                if fields.len() != 3 {
                    return Err(ConfigError::WrongArity {
                        bar,
                        module,
                        found: fields.len(),
                    });
                }
                let command = expand_home(&fields[0].as_text());
                let interval_secs = validate_interval(&module, fields[1].as_int(&module, "interval")?)?;
                let trigger = validate_trigger(&module, fields[2].as_int(&module, "trigger")?)?;
                Ok(ModuleSpec {
                    name: module,
                    producer: ProducerSpec::Command(command),
                    interval_secs,
                    trigger: Some(trigger),
                })
            }
            Self::Full(f) => {
                let producer = match (&f.command, &f.clock, &f.text) {
                    (Some(command), None, None) => ProducerSpec::Command(expand_home(command)),
                    (None, Some(format), None) => ProducerSpec::Clock(format.clone()),
                    (None, None, Some(text)) => ProducerSpec::Text(text.clone()),
                    (None, None, None) => {
                        return Err(ConfigError::InvalidField {
                            module,
                            field: "producer",
                            reason: "one of command, clock or text is required".to_string(),
                        });
                    }
                    _ => {
                        return Err(ConfigError::InvalidField {
                            module,
                            field: "producer",
                            reason: "only one of command, clock or text may be set".to_string(),
                        });
                    }
                };
                let interval = f.interval.as_ref().ok_or_else(|| ConfigError::InvalidField {
                    module: module.clone(),
                    field: "interval",
                    reason: "interval is required (0 refreshes on the trigger only)".to_string(),
                })?;
                let interval_secs = validate_interval(&module, interval.as_int(&module, "interval")?)?;
                let trigger = f
                    .trigger
                    .as_ref()
                    .map(|t| t.as_int(&module, "trigger").and_then(|t| validate_trigger(&module, t)))
                    .transpose()?;
                if interval_secs == 0 && trigger.is_none() {
                    warn!(%module, "Module has interval 0 and no trigger; it will run only once");
                }
                Ok(ModuleSpec {
                    name: module,
                    producer,
                    interval_secs,
                    trigger,
                })
            }
        }
    }
}

fn validate_interval(module: &str, interval: i64) -> Result<u64, ConfigError> {
    u64::try_from(interval).map_err(|_| ConfigError::NegativeInterval {
        module: module.to_string(),
        interval,
    })
}

fn validate_trigger(module: &str, trigger: i64) -> Result<TriggerId, ConfigError> {
    TriggerId::new(trigger).ok_or_else(|| ConfigError::InvalidTrigger {
        module: module.to_string(),
        trigger,
    })
}

/// Expand a leading `~/` to the home directory
fn expand_home(command: &str) -> String {
    match command.strip_prefix("~/") {
        Some(rest) => dirs::home_dir()
            .map(|home| home.join(rest))
            .unwrap_or_else(|| PathBuf::from(command))
            .to_string_lossy()
            .into_owned(),
        None => command.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compact_entry() {
        let spec = ModuleEntry::compact("dwmbar-net", 8, 4).to_spec(BarId::Top).unwrap();
        assert_eq!(spec.name, "dwmbar-net");
        assert_eq!(spec.producer, ProducerSpec::Command("dwmbar-net".to_string()));
        assert_eq!(spec.interval_secs, 8);
        assert_eq!(spec.trigger, TriggerId::new(4));
    }

    #[test]
    fn test_compact_entry_with_string_numbers() {
        let entry = ModuleEntry::Compact(vec![
            FieldValue::Text("dwmbar-audio".to_string()),
            FieldValue::Text("0".to_string()),
            FieldValue::Text(" 5 ".to_string()),
        ]);
        let spec = entry.to_spec(BarId::Top).unwrap();
        assert_eq!(spec.interval_secs, 0);
        assert_eq!(spec.trigger, TriggerId::new(5));
    }

    #[test]
    fn test_compact_wrong_arity() {
        let entry = ModuleEntry::Compact(vec![
            FieldValue::Text("dwmbar-net".to_string()),
            FieldValue::Int(8),
        ]);
        let err = entry.to_spec(BarId::Top).unwrap_err();
        assert!(matches!(err, ConfigError::WrongArity { found: 2, .. }));
        assert_eq!(err.exit_code(), 1);
    }

    #[test]
    fn test_negative_interval() {
        let err = ModuleEntry::compact("net", -1, 4).to_spec(BarId::Top).unwrap_err();
        assert!(matches!(err, ConfigError::NegativeInterval { interval: -1, .. }));
        assert_eq!(err.exit_code(), 2);
    }

    #[test]
    fn test_negative_trigger() {
        let err = ModuleEntry::compact("net", 8, -2).to_spec(BarId::Top).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidTrigger { trigger: -2, .. }));
        assert_eq!(err.exit_code(), 3);
    }

    #[test]
    fn test_trigger_above_range() {
        let err = ModuleEntry::compact("net", 8, 31).to_spec(BarId::Top).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidTrigger { trigger: 31, .. }));
    }

    #[test]
    fn test_non_numeric_interval() {
        let entry = ModuleEntry::Compact(vec![
            FieldValue::Text("net".to_string()),
            FieldValue::Text("soon".to_string()),
            FieldValue::Int(1),
        ]);
        let err = entry.to_spec(BarId::Top).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidField { field: "interval", .. }));
        assert_eq!(err.exit_code(), 4);
    }

    #[test]
    fn test_full_entry_clock_without_trigger() {
        let entry = ModuleEntry::Full(ModuleFields {
            name: Some("date".to_string()),
            clock: Some("%H:%M".to_string()),
            interval: Some(FieldValue::Int(30)),
            ..Default::default()
        });
        let spec = entry.to_spec(BarId::Bottom).unwrap();
        assert_eq!(spec.name, "date");
        assert_eq!(spec.producer, ProducerSpec::Clock("%H:%M".to_string()));
        assert!(spec.trigger.is_none());
    }

    #[test]
    fn test_full_entry_requires_exactly_one_producer() {
        let none = ModuleEntry::Full(ModuleFields {
            name: Some("empty".to_string()),
            interval: Some(FieldValue::Int(1)),
            ..Default::default()
        });
        assert!(matches!(
            none.to_spec(BarId::Top),
            Err(ConfigError::InvalidField { field: "producer", .. })
        ));

        let both = ModuleEntry::Full(ModuleFields {
            command: Some("date".to_string()),
            text: Some("x".to_string()),
            interval: Some(FieldValue::Int(1)),
            ..Default::default()
        });
        assert!(matches!(
            both.to_spec(BarId::Top),
            Err(ConfigError::InvalidField { field: "producer", .. })
        ));
    }

    #[test]
    fn test_full_entry_requires_interval() {
        let entry = ModuleEntry::Full(ModuleFields {
            text: Some("hello".to_string()),
            trigger: Some(FieldValue::Int(2)),
            ..Default::default()
        });
        let err = entry.to_spec(BarId::Top).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidField { field: "interval", .. }));
        assert_eq!(err.exit_code(), 4);
    }

    fn parse_entry(yaml: &str) -> ModuleEntry {
        serde_yaml::from_str(yaml).unwrap()
    }

    #[test]
    fn test_wrong_scalar_types_are_invalid_fields() {
        let cases = [
            ("{command: net, interval: soon, trigger: 4}", "interval"),
            ("{command: net, interval: 8, trigger: x}", "trigger"),
            ("{command: net, interval: 1.5}", "interval"),
            ("[net, 1.5, 4]", "interval"),
            ("[net, 8, true]", "trigger"),
        ];
        for (yaml, expected) in cases {
            let err = parse_entry(yaml).to_spec(BarId::Top).unwrap_err();
            match err {
                ConfigError::InvalidField { field, .. } => assert_eq!(field, expected, "{}", yaml),
                other => panic!("{}: expected InvalidField, got {:?}", yaml, other),
            }
        }
    }

    #[test]
    fn test_mapping_accepts_quoted_numbers() {
        let spec = parse_entry("{command: net, interval: \"8\", trigger: \"4\"}")
            .to_spec(BarId::Top)
            .unwrap();
        assert_eq!(spec.interval_secs, 8);
        assert_eq!(spec.trigger, TriggerId::new(4));
    }

    #[test]
    fn test_expand_home() {
        assert_eq!(expand_home("date +%H"), "date +%H");
        if let Some(home) = dirs::home_dir() {
            let expanded = expand_home("~/bin/net");
            assert_eq!(expanded, home.join("bin/net").to_string_lossy());
        }
    }
}
