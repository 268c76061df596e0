//! Configuration management with layered loading
//!
//! Precedence (lowest to highest):
//! 1. Compiled defaults
//! 2. Global config: `$XDG_CONFIG_HOME/argtree/argtree.toml`
//! 3. Environment variables: `ARGTREE_*` prefix

use std::path::{Path, PathBuf};

use config::{Config, ConfigError, Environment};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// When to emit ANSI colors.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum ColorMode {
    #[default]
    Auto,
    Always,
    Never,
}

impl ColorMode {
    /// Resolve against the terminal; `auto` defers to `colored`'s own
    /// NO_COLOR / CLICOLOR handling.
    pub fn apply(self) {
        match self {
            ColorMode::Auto => colored::control::unset_override(),
            ColorMode::Always => colored::control::set_override(true),
            ColorMode::Never => colored::control::set_override(false),
        }
    }
}

impl std::str::FromStr for ColorMode {
    type Err = SettingsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "auto" => Ok(ColorMode::Auto),
            "always" => Ok(ColorMode::Always),
            "never" => Ok(ColorMode::Never),
            other => Err(SettingsError::Config {
                message: format!("invalid color mode '{}', expected auto/always/never", other),
            }),
        }
    }
}

#[derive(Error, Debug)]
pub enum SettingsError {
    #[error("config error: {message}")]
    Config { message: String },
}

/// Rendering settings for diagnostics and help.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Settings {
    /// ANSI colors (default: auto)
    pub color: ColorMode,
    /// Append "see --help" hints and example values to diagnostics
    pub hints: bool,
    /// Show the subcommand tree in help output
    pub help_tree: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            color: ColorMode::Auto,
            hints: true,
            help_tree: true,
        }
    }
}

/// Raw settings for intermediate parsing (`None` → not specified).
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawSettings {
    pub color: Option<ColorMode>,
    pub hints: Option<bool>,
    pub help_tree: Option<bool>,
}

/// Get the XDG config directory for argtree.
pub fn global_config_dir() -> Option<PathBuf> {
    ProjectDirs::from("", "", "argtree").map(|dirs| dirs.config_dir().to_path_buf())
}

/// Get the path to the global config file.
pub fn global_config_path() -> Option<PathBuf> {
    global_config_dir().map(|dir| dir.join("argtree.toml"))
}

fn load_raw_settings(path: &Path) -> Result<RawSettings, SettingsError> {
    let content = std::fs::read_to_string(path).map_err(|e| SettingsError::Config {
        message: format!("read {}: {}", path.display(), e),
    })?;
    toml::from_str(&content).map_err(|e| SettingsError::Config {
        message: format!("parse {}: {}", path.display(), e),
    })
}

impl Settings {
    fn merge_with(&self, overlay: &RawSettings) -> Self {
        Self {
            color: overlay.color.unwrap_or(self.color),
            hints: overlay.hints.unwrap_or(self.hints),
            help_tree: overlay.help_tree.unwrap_or(self.help_tree),
        }
    }

    /// Load settings from the global config location.
    pub fn load() -> Result<Self, SettingsError> {
        Self::load_from(global_config_path().as_deref())
    }

    /// Load with an explicit config file (missing file → skipped).
    pub fn load_from(config_path: Option<&Path>) -> Result<Self, SettingsError> {
        let mut current = Self::default();

        if let Some(path) = config_path {
            if path.exists() {
                let raw = load_raw_settings(path)?;
                current = current.merge_with(&raw);
            }
        }

        Self::apply_env_overrides(current)
    }

    /// Apply ARGTREE_* environment variables as explicit overrides.
    fn apply_env_overrides(mut settings: Self) -> Result<Self, SettingsError> {
        let config = Config::builder()
            .add_source(Environment::with_prefix("ARGTREE").separator("__"))
            .build()
            .map_err(config_err)?;

        if let Ok(val) = config.get_string("color") {
            settings.color = val.parse()?;
        }
        if let Ok(val) = config.get_bool("hints") {
            settings.hints = val;
        }
        if let Ok(val) = config.get_bool("help_tree") {
            settings.help_tree = val;
        }

        Ok(settings)
    }

    /// Show the effective configuration as TOML.
    pub fn to_toml(&self) -> Result<String, SettingsError> {
        toml::to_string_pretty(self).map_err(|e| SettingsError::Config {
            message: format!("serialize config: {e}"),
        })
    }

    /// Generate a template config file.
    pub fn template() -> String {
        r#"# argtree configuration
#
# Locations (by precedence, lowest to highest):
#   Global: ~/.config/argtree/argtree.toml
#   Env:    ARGTREE_* environment variables (e.g. ARGTREE_COLOR=never)

# ANSI colors: "auto", "always" or "never"
# color = "auto"

# Append "see --help" hints and example values to error messages
# hints = true

# Show the subcommand tree in help output
# help_tree = true
"#
        .to_string()
    }
}

fn config_err(e: ConfigError) -> SettingsError {
    SettingsError::Config {
        message: e.to_string(),
    }
}
