use crate::model::PackageManager;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const CONFIG_FILENAME: &str = ".pmrc";

/// User configuration read from `~/.pmrc`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    /// Used when no project-level hint names a package manager
    #[serde(default)]
    pub default_package_manager: Option<PackageManager>,

    #[serde(default = "default_registry")]
    pub registry: String,

    /// Install `@types/*` companions after `pm add` in TypeScript projects
    #[serde(default = "default_true")]
    pub auto_install_types: bool,

    #[serde(default)]
    pub picker: PickerConfig,
}

fn default_registry() -> String {
    "https://registry.npmjs.org".to_string()
}

fn default_true() -> bool {
    true
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_package_manager: None,
            registry: default_registry(),
            auto_install_types: true,
            picker: PickerConfig::default(),
        }
    }
}

/// Script picker behavior
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PickerConfig {
    /// Report clicks and wheel scrolling
    #[serde(default = "default_true")]
    pub mouse: bool,

    #[serde(default = "default_true")]
    pub alternate_screen: bool,
}

impl Default for PickerConfig {
    fn default() -> Self {
        Self {
            mouse: true,
            alternate_screen: true,
        }
    }
}

impl Config {
    /// `~/.pmrc`, if a home directory is known.
    pub fn default_path() -> Option<PathBuf> {
        dirs::home_dir().map(|home| home.join(CONFIG_FILENAME))
    }

    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path.as_ref())
            .map_err(|e| ConfigError::IoError(e.to_string()))?;

        let config: Config =
            serde_json::from_str(&contents).map_err(|e| ConfigError::ParseError(e.to_string()))?;

        config.validate()?;
        Ok(config)
    }

    /// Load the configuration for this run.
    ///
    /// An explicit path must load. The default `~/.pmrc` is optional: a
    /// missing file gives defaults silently, a broken one gives defaults
    /// with a warning.
    pub fn load(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        if let Some(path) = explicit {
            return Self::load_from_file(path);
        }

        let Some(path) = Self::default_path() else {
            return Ok(Self::default());
        };
        if !path.exists() {
            return Ok(Self::default());
        }

        match Self::load_from_file(&path) {
            Ok(config) => {
                tracing::debug!("Loaded config from {}", path.display());
                Ok(config)
            }
            Err(e) => {
                tracing::warn!("Ignoring config {}: {}", path.display(), e);
                Ok(Self::default())
            }
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let registry = self.registry.trim();
        if !(registry.starts_with("http://") || registry.starts_with("https://")) {
            return Err(ConfigError::ValidationError(format!(
                "registry must be an http(s) URL, got '{}'",
                self.registry
            )));
        }
        Ok(())
    }
}

/// Configuration error types
#[derive(Debug)]
pub enum ConfigError {
    IoError(String),
    ParseError(String),
    ValidationError(String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::IoError(msg) => write!(f, "IO error: {msg}"),
            ConfigError::ParseError(msg) => write!(f, "Parse error: {msg}"),
            ConfigError::ValidationError(msg) => write!(f, "Validation error: {msg}"),
        }
    }
}

impl std::error::Error for ConfigError {}
