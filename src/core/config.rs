//! Configuration module for the theme workbench
//!
//! Supports loading configuration from a TOML file.
//! Configuration is stored in a standard location:
//! - Windows: %APPDATA%\theme_workbench\config.toml
//! - Linux: ~/.config/theme_workbench/config.toml
//! - macOS: ~/Library/Application Support/theme_workbench/config.toml

use crate::color::wheel::{ColorWheel, DEFAULT_WHEEL_SIZE, MAX_DEVICE_SIZE, MAX_WHEEL_SIZE};
use crate::theme::fonts::FontId;
use crate::theme::registry::{ThemeMode, ThemeRegistry, DEFAULT_DARK_THEME, DEFAULT_LIGHT_THEME};
use crate::theme::session::SessionDefaults;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Application name used for config directory
const APP_NAME: &str = "theme_workbench";

/// Default config file name
const CONFIG_FILE_NAME: &str = "config.toml";

/// Local override file name
const LOCAL_CONFIG_FILE_NAME: &str = "theme_workbench.toml";

/// Default preference store file name
const STORE_FILE_NAME: &str = "preferences.json";

/// Get the standard configuration directory for the application.
pub fn get_config_dir() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join(APP_NAME))
}

/// Get the standard configuration file path.
pub fn get_config_path() -> Option<PathBuf> {
    get_config_dir().map(|dir| dir.join(CONFIG_FILE_NAME))
}

/// Ensure the configuration directory exists.
pub fn ensure_config_dir() -> Result<PathBuf, ConfigError> {
    let config_dir = get_config_dir().ok_or(ConfigError::ConfigDirNotFound)?;

    if !config_dir.exists() {
        fs::create_dir_all(&config_dir)
            .map_err(|e| ConfigError::WriteError(config_dir.clone(), e.to_string()))?;
    }

    Ok(config_dir)
}

/// Initialize the configuration file if it doesn't exist.
///
/// Creates the config directory and writes the default config template.
/// Returns the path to the config file.
pub fn init_config() -> Result<PathBuf, ConfigError> {
    let config_dir = ensure_config_dir()?;
    let config_path = config_dir.join(CONFIG_FILE_NAME);

    if !config_path.exists() {
        fs::write(&config_path, Config::generate_default_config())
            .map_err(|e| ConfigError::WriteError(config_path.clone(), e.to_string()))?;
    }

    Ok(config_path)
}

/// Main configuration structure
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Session defaults and persistence
    pub session: SessionConfig,

    /// Color wheel settings
    pub wheel: WheelConfig,

    /// Logging settings
    pub logging: LoggingConfig,
}

/// Session configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Theme used in light mode when nothing valid is persisted
    pub default_light_theme: String,

    /// Theme used in dark mode when nothing valid is persisted
    pub default_dark_theme: String,

    /// Font used when nothing valid is persisted
    pub default_font: FontId,

    /// Preference store file; empty means the standard location
    pub store_file: PathBuf,

    /// Mode assumed at startup
    pub initial_mode: ThemeMode,
}

/// Color wheel configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WheelConfig {
    /// Diameter in CSS pixels
    pub size: u32,

    /// Device pixels per CSS pixel
    pub pixel_ratio: f64,
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level: error, warn, info, debug, trace
    pub level: String,

    /// Log to file
    pub log_to_file: bool,

    /// Log file path
    pub log_file: PathBuf,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            default_light_theme: DEFAULT_LIGHT_THEME.to_string(),
            default_dark_theme: DEFAULT_DARK_THEME.to_string(),
            default_font: FontId::default(),
            store_file: PathBuf::new(),
            initial_mode: ThemeMode::Light,
        }
    }
}

impl Default for WheelConfig {
    fn default() -> Self {
        Self {
            size: DEFAULT_WHEEL_SIZE,
            pixel_ratio: 1.0,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "warn".to_string(),
            log_to_file: false,
            log_file: PathBuf::from("./theme_workbench.log"),
        }
    }
}

impl Config {
    /// Load configuration from a TOML file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(ConfigError::FileNotFound(path.to_path_buf()));
        }

        let content = fs::read_to_string(path)
            .map_err(|e| ConfigError::ReadError(path.to_path_buf(), e.to_string()))?;

        let config: Config = toml::from_str(&content)
            .map_err(|e| ConfigError::ParseError(path.to_path_buf(), e.to_string()))?;

        Ok(config)
    }

    /// Load configuration from default locations
    ///
    /// Search order:
    /// 1. ./theme_workbench.toml (current directory - for project overrides)
    /// 2. Standard config location
    ///
    /// If no config file is found, returns default configuration.
    pub fn load_default() -> Result<Self, ConfigError> {
        let local = PathBuf::from(LOCAL_CONFIG_FILE_NAME);
        if local.exists() {
            return Self::load(&local);
        }

        if let Some(config_path) = get_config_path() {
            if config_path.exists() {
                return Self::load(&config_path);
            }
        }

        Ok(Self::default())
    }

    /// Get the path where the config file is (or would be) located.
    pub fn get_active_config_path() -> PathBuf {
        let local = PathBuf::from(LOCAL_CONFIG_FILE_NAME);
        if local.exists() {
            return local;
        }

        get_config_path().unwrap_or(local)
    }

    /// Save configuration to a TOML file
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), ConfigError> {
        let content =
            toml::to_string_pretty(self).map_err(|e| ConfigError::SerializeError(e.to_string()))?;

        fs::write(path.as_ref(), content)
            .map_err(|e| ConfigError::WriteError(path.as_ref().to_path_buf(), e.to_string()))?;

        Ok(())
    }

    /// Generate a default config file with comments
    pub fn generate_default_config() -> String {
        include_str!("../../config.example.toml").to_string()
    }

    /// Check values that parse but cannot be used
    pub fn validate(&self, registry: &ThemeRegistry) -> Result<(), ConfigError> {
        if !(1..=MAX_WHEEL_SIZE).contains(&self.wheel.size) {
            return Err(ConfigError::Invalid(format!(
                "wheel.size must be between 1 and {}, got {}",
                MAX_WHEEL_SIZE, self.wheel.size
            )));
        }
        if !(self.wheel.pixel_ratio.is_finite() && self.wheel.pixel_ratio > 0.0) {
            return Err(ConfigError::Invalid(format!(
                "wheel.pixel_ratio must be positive, got {}",
                self.wheel.pixel_ratio
            )));
        }
        if self.wheel.size as f64 * self.wheel.pixel_ratio > MAX_DEVICE_SIZE as f64 {
            return Err(ConfigError::Invalid(format!(
                "wheel.size * wheel.pixel_ratio exceeds {} device pixels",
                MAX_DEVICE_SIZE
            )));
        }

        let slots = [
            ("default_light_theme", &self.session.default_light_theme, ThemeMode::Light),
            ("default_dark_theme", &self.session.default_dark_theme, ThemeMode::Dark),
        ];
        for (key, id, mode) in slots {
            if !registry.has_mode(id, mode) {
                return Err(ConfigError::Invalid(format!(
                    "session.{} '{}' is not a known {} theme",
                    key, id, mode
                )));
            }
        }

        Ok(())
    }

    /// Fallbacks handed to the session
    pub fn session_defaults(&self) -> SessionDefaults {
        SessionDefaults {
            light_theme: self.session.default_light_theme.clone(),
            dark_theme: self.session.default_dark_theme.clone(),
            font: self.session.default_font,
        }
    }

    /// Preference store location, resolving the empty default
    pub fn store_path(&self) -> PathBuf {
        if !self.session.store_file.as_os_str().is_empty() {
            return self.session.store_file.clone();
        }
        get_config_dir()
            .map(|dir| dir.join(STORE_FILE_NAME))
            .unwrap_or_else(|| PathBuf::from(STORE_FILE_NAME))
    }

    /// Wheel built from the `[wheel]` section
    pub fn wheel(&self) -> ColorWheel {
        ColorWheel::new(self.wheel.size).with_pixel_ratio(self.wheel.pixel_ratio)
    }
}

/// Configuration error types
#[derive(Debug)]
pub enum ConfigError {
    /// Configuration file was not found at the specified path
    FileNotFound(PathBuf),
    /// Failed to read the configuration file
    ReadError(PathBuf, String),
    /// Failed to parse the configuration file (invalid TOML)
    ParseError(PathBuf, String),
    /// Failed to serialize configuration to TOML
    SerializeError(String),
    /// Failed to write configuration file
    WriteError(PathBuf, String),
    /// Could not determine config directory
    ConfigDirNotFound,
    /// A value parsed but is unusable
    Invalid(String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::FileNotFound(path) => {
                write!(f, "Configuration file not found: {}", path.display())
            }
            ConfigError::ReadError(path, err) => {
                write!(
                    f,
                    "Failed to read config file '{}': {}",
                    path.display(),
                    err
                )
            }
            ConfigError::ParseError(path, err) => {
                write!(
                    f,
                    "Failed to parse config file '{}': {}",
                    path.display(),
                    err
                )
            }
            ConfigError::SerializeError(err) => {
                write!(f, "Failed to serialize configuration: {}", err)
            }
            ConfigError::WriteError(path, err) => {
                write!(
                    f,
                    "Failed to write config file '{}': {}",
                    path.display(),
                    err
                )
            }
            ConfigError::ConfigDirNotFound => {
                write!(f, "Could not determine configuration directory")
            }
            ConfigError::Invalid(reason) => write!(f, "Invalid configuration: {}", reason),
        }
    }
}

impl std::error::Error for ConfigError {}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_config_defaults() {
        let config = Config::default();
        assert_eq!(config.session.default_light_theme, "maritime");
        assert_eq!(config.session.default_dark_theme, "dark");
        assert_eq!(config.session.default_font, FontId::Inter);
        assert_eq!(config.session.initial_mode, ThemeMode::Light);
        assert_eq!(config.wheel.size, 220);
        assert!(config.validate(&ThemeRegistry::builtin()).is_ok());
    }

    #[test]
    fn test_example_config_matches_defaults() {
        let parsed: Config = toml::from_str(&Config::generate_default_config()).unwrap();
        assert_eq!(parsed, Config::default());
    }

    #[test]
    fn test_partial_config_fills_defaults() {
        let parsed: Config = toml::from_str(
            r#"
            [session]
            default_dark_theme = "midnight"
            initial_mode = "dark"

            [wheel]
            size = 260
            "#,
        )
        .unwrap();

        assert_eq!(parsed.session.default_dark_theme, "midnight");
        assert_eq!(parsed.session.default_light_theme, "maritime");
        assert_eq!(parsed.session.initial_mode, ThemeMode::Dark);
        assert_eq!(parsed.wheel.size, 260);
        assert_eq!(parsed.wheel.pixel_ratio, 1.0);
        assert_eq!(parsed.session_defaults().dark_theme, "midnight");
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let registry = ThemeRegistry::builtin();

        let mut config = Config::default();
        config.wheel.size = 0;
        assert!(config.validate(&registry).is_err());

        let mut config = Config::default();
        config.wheel.size = MAX_WHEEL_SIZE + 1;
        let err = config.validate(&registry).unwrap_err();
        assert!(err.to_string().contains("wheel.size"));

        let mut config = Config::default();
        config.wheel.size = MAX_WHEEL_SIZE;
        assert!(config.validate(&registry).is_ok());
        config.wheel.pixel_ratio = 3.0;
        assert!(config.validate(&registry).is_err());

        let mut config = Config::default();
        config.wheel.pixel_ratio = 0.0;
        assert!(config.validate(&registry).is_err());

        // a light theme cannot fill the dark slot
        let mut config = Config::default();
        config.session.default_dark_theme = "forest".to_string();
        let err = config.validate(&registry).unwrap_err();
        assert!(err.to_string().contains("default_dark_theme"));
    }

    #[test]
    fn test_save_and_load() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");

        let mut config = Config::default();
        config.session.default_font = FontId::Lexend;
        config.wheel.pixel_ratio = 2.0;
        config.save(&path).unwrap();

        let loaded = Config::load(&path).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_load_missing_file() {
        let dir = TempDir::new().unwrap();
        let err = Config::load(dir.path().join("absent.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::FileNotFound(_)));
    }

    #[test]
    fn test_load_invalid_toml() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "[wheel\nsize = ").unwrap();
        assert!(matches!(
            Config::load(&path).unwrap_err(),
            ConfigError::ParseError(_, _)
        ));
    }

    #[test]
    fn test_store_path_override() {
        let mut config = Config::default();
        config.session.store_file = PathBuf::from("/tmp/prefs.json");
        assert_eq!(config.store_path(), PathBuf::from("/tmp/prefs.json"));
    }
}
