//! Status bar configuration types and loading

mod entry;
mod error;

pub use entry::{FieldValue, ModuleEntry, ModuleFields};
pub use error::ConfigError;

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::domain::{BarId, BarLayout, BarSpec, BarStyle, ModuleSpec};

/// Default cap on the characters kept from one module's output
pub const DEFAULT_OUTPUT_CAP: usize = 500;

/// Main status bar configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Log level (TRACE, DEBUG, INFO, WARN, ERROR)
    #[serde(rename = "log-level", skip_serializing_if = "Option::is_none")]
    pub log_level: Option<String>,

    /// Maximum characters kept from a module's output
    #[serde(rename = "output-cap")]
    pub output_cap: usize,

    /// Where the composed line is published
    pub publisher: PublisherKind,

    /// The main bar
    pub top: BarConfig,

    /// Optional extra bar, appended after `bar-separator`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bottom: Option<BarConfig>,

    /// Separator between the top and bottom bar text
    #[serde(rename = "bar-separator")]
    pub bar_separator: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_level: None,
            output_cap: DEFAULT_OUTPUT_CAP,
            publisher: PublisherKind::default(),
            top: BarConfig::default(),
            bottom: None,
            bar_separator: ";".to_string(),
        }
    }
}

/// Publish destination
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PublisherKind {
    /// Set the X root window name (what dwm displays)
    #[default]
    Xsetroot,
    /// Print one line per update
    Stdout,
}

/// Configuration of one bar
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BarConfig {
    /// Text before the first module
    pub prefix: String,

    /// Text after the last module
    pub suffix: String,

    /// Text between modules
    pub delimiter: String,

    /// Modules in display order
    pub modules: Vec<ModuleEntry>,
}

impl Default for BarConfig {
    fn default() -> Self {
        Self {
            prefix: String::new(),
            suffix: String::new(),
            delimiter: " | ".to_string(),
            modules: vec![ModuleEntry::Full(ModuleFields {
                name: Some("clock".to_string()),
                clock: Some("%a %d %b %H:%M".to_string()),
                interval: Some(FieldValue::Int(30)),
                trigger: Some(FieldValue::Int(1)),
                ..Default::default()
            })],
        }
    }
}

impl BarConfig {
    fn to_spec(&self, bar: BarId) -> Result<BarSpec, ConfigError> {
        debug!(%bar, modules = self.modules.len(), "BarConfig::to_spec: called");
        let modules = self
            .modules
            .iter()
            .map(|entry| entry.to_spec(bar))
            .collect::<Result<Vec<ModuleSpec>, _>>()?;
        Ok(BarSpec {
            style: BarStyle {
                prefix: self.prefix.clone(),
                suffix: self.suffix.clone(),
                delimiter: self.delimiter.clone(),
            },
            modules,
        })
    }
}

impl Config {
    /// Validate every module entry and build the immutable bar layout
    ///
    /// The first invalid entry aborts validation.
    pub fn layout(&self) -> Result<BarLayout, ConfigError> {
        debug!("Config::layout: called");
        let top = self.top.to_spec(BarId::Top)?;
        let bottom = self.bottom.as_ref().map(|b| b.to_spec(BarId::Bottom)).transpose()?;
        Ok(BarLayout {
            top,
            bottom,
            separator: self.bar_separator.clone(),
            output_cap: self.output_cap,
        })
    }

    /// Load configuration with fallback chain
    pub fn load(config_path: Option<&PathBuf>) -> Result<Self, ConfigError> {
        // An explicit path must load
        if let Some(path) = config_path {
            return Self::load_from_file(path);
        }

        // Try user config: ~/.config/statusbar/statusbar.yml
        if let Some(user_config) = default_config_path()
            && user_config.exists()
        {
            return Self::load_from_file(&user_config);
        }

        // No config file found, use defaults
        tracing::info!("No config file found, using defaults");
        Ok(Self::default())
    }

    /// Read just the log level, ignoring every error
    ///
    /// Called before logging is set up, so failures are silent here and
    /// reported by the full `load` afterwards.
    pub fn load_log_level(config_path: Option<&PathBuf>) -> Option<String> {
        let path = config_path.cloned().or_else(default_config_path)?;
        let content = fs::read_to_string(path).ok()?;
        let config: Self = serde_yaml::from_str(&content).ok()?;
        config.log_level
    }

    fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        let config: Self = serde_yaml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;

        tracing::info!("Loaded config from: {}", path.display());
        Ok(config)
    }
}

/// `~/.config/statusbar/statusbar.yml`
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("statusbar").join("statusbar.yml"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ProducerSpec, TriggerId};
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_config(yaml: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(yaml.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.output_cap, 500);
        assert_eq!(config.publisher, PublisherKind::Xsetroot);
        assert_eq!(config.bar_separator, ";");
        assert!(config.bottom.is_none());

        let layout = config.layout().unwrap();
        assert_eq!(layout.top.modules.len(), 1);
        assert!(matches!(layout.top.modules[0].producer, ProducerSpec::Clock(_)));
    }

    #[test]
    fn test_load_compact_and_full_entries() {
        let file = write_config(
            r#"
output-cap: 100
publisher: stdout
top:
  prefix: "["
  suffix: "]"
  delimiter: "]["
  modules:
    - [dwmbar-net, 8, 4]
    - ["dwmbar-audio", "0", "5"]
    - name: date
      clock: "%H:%M"
      interval: 30
      trigger: 1
bottom:
  delimiter: " | "
  modules:
    - text: hello
      interval: 0
bar-separator: ";"
"#,
        );

        let config = Config::load(Some(&file.path().to_path_buf())).unwrap();
        assert_eq!(config.output_cap, 100);
        assert_eq!(config.publisher, PublisherKind::Stdout);

        let layout = config.layout().unwrap();
        assert_eq!(layout.output_cap, 100);
        assert_eq!(layout.top.style.delimiter, "][");
        assert_eq!(layout.top.modules.len(), 3);
        assert_eq!(layout.top.modules[1].interval_secs, 0);
        assert_eq!(layout.top.modules[1].trigger, TriggerId::new(5));
        assert_eq!(layout.top.modules[2].name, "date");

        let bottom = layout.bottom.unwrap();
        assert_eq!(bottom.modules[0].producer, ProducerSpec::Text("hello".to_string()));
        assert_eq!(bottom.style.prefix, "");
    }

    #[test]
    fn test_layout_reports_first_violation() {
        let file = write_config(
            r#"
top:
  modules:
    - [net, 8, 4]
    - [mem, -3, 2]
    - [tor, 9]
"#,
        );

        let config = Config::load(Some(&file.path().to_path_buf())).unwrap();
        let err = config.layout().unwrap_err();
        assert_eq!(err.exit_code(), 2);
    }

    #[test]
    fn test_bottom_bar_errors_name_the_bar() {
        let file = write_config(
            r#"
top:
  modules: []
bottom:
  modules:
    - [net, 8, 4, extra]
"#,
        );

        let config = Config::load(Some(&file.path().to_path_buf())).unwrap();
        let err = config.layout().unwrap_err();
        assert!(matches!(err, ConfigError::WrongArity { bar: BarId::Bottom, found: 4, .. }));
    }

    #[test]
    fn test_missing_explicit_file_is_read_error() {
        let path = PathBuf::from("/definitely/not/here/statusbar.yml");
        let err = Config::load(Some(&path)).unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
        assert_eq!(err.exit_code(), 5);
    }

    #[test]
    fn test_wrong_field_types_exit_with_invalid_field_code() {
        let configs = [
            "top:\n  modules:\n    - {command: net, interval: soon, trigger: 4}\n",
            "top:\n  modules:\n    - {command: net, interval: 8, trigger: x}\n",
            "top:\n  modules:\n    - [net, 1.5, 4]\n",
        ];
        for yaml in configs {
            let file = write_config(yaml);
            let config = Config::load(Some(&file.path().to_path_buf())).unwrap();
            let err = config.layout().unwrap_err();
            assert!(matches!(err, ConfigError::InvalidField { .. }), "{}: {:?}", yaml, err);
            assert_eq!(err.exit_code(), 4);
        }
    }

    #[test]
    fn test_malformed_yaml_is_parse_error() {
        let file = write_config("top: [this is: not a bar");
        let err = Config::load(Some(&file.path().to_path_buf())).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }

    #[test]
    fn test_load_log_level() {
        let file = write_config("log-level: debug\n");
        let level = Config::load_log_level(Some(&file.path().to_path_buf()));
        assert_eq!(level.as_deref(), Some("debug"));
    }

    #[test]
    fn test_load_log_level_ignores_errors() {
        let path = PathBuf::from("/definitely/not/here/statusbar.yml");
        assert!(Config::load_log_level(Some(&path)).is_none());
    }
}
