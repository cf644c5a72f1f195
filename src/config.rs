//! Configuration file support.
//!
//! Settings are stored as versioned JSON. Native builds keep the file under
//! the user's config directory; missing or unreadable files fall back to
//! defaults with a warning.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::constants::{MAGNIFIER_LENS_SIZE, MAGNIFIER_SCALE, MIN_BOX_SIZE};
use crate::drawing::DiscardPolicy;
use crate::geometry::LayoutBounds;
use crate::model::{Issue, IssueCatalog, default_issues};
use crate::tagging::TaggingMode;

/// Log level setting for the application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    /// Show only errors
    Error,
    /// Show errors and warnings
    Warn,
    /// Show errors, warnings, and info messages
    #[default]
    Info,
    /// Show debug-level logging
    Debug,
    /// Show all log messages including trace
    Trace,
}

impl LogLevel {
    /// Convert to log crate's LevelFilter.
    pub fn to_level_filter(&self) -> log::LevelFilter {
        match self {
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

/// Current configuration file format version.
/// Increment this when making breaking changes to the config format.
pub const CONFIG_VERSION: u32 = 1;

/// Application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StudioConfig {
    /// Version of the configuration file format
    pub version: u32,

    #[serde(default)]
    pub preferences: Preferences,

    #[serde(default)]
    pub api: ApiConfig,

    /// Built-in issues for fixed-list tagging
    #[serde(default = "default_issues")]
    pub issues: Vec<Issue>,
}

/// Annotation behavior preferences.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Preferences {
    pub log_level: LogLevel,
    pub tagging_mode: TaggingMode,
    pub min_box_size: f32,
    pub discard_policy: DiscardPolicy,
    pub magnifier_scale: f32,
    pub magnifier_lens_size: f32,
    pub feedback_duration_ms: u64,
    pub layout: LayoutBounds,
    /// Images per validation queue page
    pub validation_page_size: u32,
}

impl Preferences {
    pub fn feedback_duration(&self) -> Duration {
        Duration::from_millis(self.feedback_duration_ms)
    }
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            log_level: LogLevel::default(),
            tagging_mode: TaggingMode::default(),
            min_box_size: MIN_BOX_SIZE,
            discard_policy: DiscardPolicy::default(),
            magnifier_scale: MAGNIFIER_SCALE,
            magnifier_lens_size: MAGNIFIER_LENS_SIZE,
            feedback_duration_ms: 1000,
            layout: LayoutBounds::default(),
            validation_page_size: 10,
        }
    }
}

/// Backend location and identity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ApiConfig {
    pub base_url: String,
    pub employee_id: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:5000".to_string(),
            employee_id: String::new(),
        }
    }
}

impl StudioConfig {
    /// Create a new configuration with default values.
    pub fn new() -> Self {
        Self {
            version: CONFIG_VERSION,
            preferences: Preferences::default(),
            api: ApiConfig::default(),
            issues: default_issues(),
        }
    }

    /// Issue catalog seeded with the configured built-ins.
    pub fn catalog(&self) -> IssueCatalog {
        IssueCatalog::new(self.issues.clone())
    }

    /// Serialize the configuration to JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Deserialize configuration from JSON.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;

        // Validate version compatibility
        if config.version > CONFIG_VERSION {
            return Err(ConfigError::VersionTooNew {
                file_version: config.version,
                supported_version: CONFIG_VERSION,
            });
        }

        Ok(config)
    }

    /// Get the default filename for the config file.
    pub fn default_filename() -> &'static str {
        "annotation-studio.json"
    }

    /// Get the default config file path.
    /// Returns None on WASM (no filesystem access).
    #[cfg(not(target_arch = "wasm32"))]
    pub fn default_path() -> Option<std::path::PathBuf> {
        if let Some(config_dir) = dirs::config_dir() {
            Some(
                config_dir
                    .join("annotation-studio")
                    .join(Self::default_filename()),
            )
        } else {
            dirs::home_dir().map(|home_dir| {
                home_dir
                    .join(".config")
                    .join("annotation-studio")
                    .join(Self::default_filename())
            })
        }
    }

    /// Load configuration from a file.
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load(path: &std::path::Path) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path)?;
        let config = Self::from_json(&json)?;
        log::info!("Loaded configuration from {:?}", path);
        Ok(config)
    }

    /// Try to load configuration from the default path.
    /// Returns None if the file doesn't exist or can't be read.
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load_from_default_path() -> Option<Self> {
        let path = Self::default_path()?;
        if !path.exists() {
            log::debug!("No config file found at {:?}", path);
            return None;
        }

        match Self::load(&path) {
            Ok(config) => Some(config),
            Err(e) => {
                log::warn!("Failed to load config file {:?}: {}", path, e);
                None
            }
        }
    }

    /// Save configuration to the default path.
    #[cfg(not(target_arch = "wasm32"))]
    pub fn save_to_default_path(&self) -> Result<(), ConfigError> {
        let path = Self::default_path().ok_or_else(|| {
            ConfigError::IoError(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                "Could not determine config directory",
            ))
        })?;

        // Create parent directories if needed
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let json = self.to_json()?;
        std::fs::write(&path, json)?;
        log::info!("Saved configuration to {:?}", path);
        Ok(())
    }
}

impl Default for StudioConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// JSON parsing error
    #[error("Failed to parse configuration: {0}")]
    ParseError(#[from] serde_json::Error),

    /// Configuration version is newer than supported
    #[error(
        "Configuration file version {file_version} is newer than supported version {supported_version}"
    )]
    VersionTooNew {
        file_version: u32,
        supported_version: u32,
    },

    /// I/O error when reading/writing config
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = StudioConfig::new();
        assert_eq!(config.version, CONFIG_VERSION);
        assert_eq!(config.preferences.min_box_size, 5.0);
        assert_eq!(config.preferences.feedback_duration(), Duration::from_secs(1));
        assert_eq!(config.issues.len(), 6);
        assert_eq!(config.catalog().issues().count(), 6);
    }

    #[test]
    fn test_config_round_trip() {
        let mut config = StudioConfig::new();
        config.preferences.tagging_mode = TaggingMode::FixedList;
        config.preferences.discard_policy = DiscardPolicy::BothAxes;
        config.api.employee_id = "emp-3".to_string();

        let json = config.to_json().expect("serializable");
        assert!(json.contains("\"fixed_list\""));
        assert!(json.contains("\"employeeId\""));

        let parsed = StudioConfig::from_json(&json).expect("parseable");
        assert_eq!(parsed.preferences.tagging_mode, TaggingMode::FixedList);
        assert_eq!(parsed.preferences.discard_policy, DiscardPolicy::BothAxes);
        assert_eq!(parsed.api.employee_id, "emp-3");
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let json = r#"{"version": 1, "preferences": {"log_level": "debug"}}"#;
        let config = StudioConfig::from_json(json).expect("parseable");
        assert_eq!(config.preferences.log_level, LogLevel::Debug);
        assert_eq!(config.preferences.magnifier_scale, MAGNIFIER_SCALE);
        assert_eq!(config.api, ApiConfig::default());
        assert_eq!(config.issues.len(), 6);
    }

    #[test]
    fn test_version_too_new() {
        let result = StudioConfig::from_json(r#"{"version": 99}"#);
        assert!(matches!(
            result,
            Err(ConfigError::VersionTooNew {
                file_version: 99,
                supported_version: CONFIG_VERSION
            })
        ));
    }

    #[test]
    fn test_log_level_filter() {
        assert_eq!(LogLevel::Warn.to_level_filter(), log::LevelFilter::Warn);
        assert_eq!(LogLevel::default().to_level_filter(), log::LevelFilter::Info);
    }
}
