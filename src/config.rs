//! Configuration management for the application.
//!
//! This module handles loading, validating, and saving application configuration
//! in TOML format with platform-specific directory resolution.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::constants::{CONFIG_DIR_ENV, CONFIG_DIR_NAME, DEFAULT_LAYER_COLORS, DEFAULT_SCALE};
use crate::keycode_db::{DisplayMode, KeycodeDb};
use crate::services::IconResolver;

/// Theme display mode preference.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum ThemeMode {
    /// Automatically detect OS theme (dark/light)
    #[default]
    Auto,
    /// Always use dark theme
    Dark,
    /// Always use light theme
    Light,
}

impl ThemeMode {
    /// Lowercase name as written in the config file.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Auto => "auto",
            Self::Dark => "dark",
            Self::Light => "light",
        }
    }
}

/// Path configuration for file system locations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct PathConfig {
    /// Icon base: a local directory or an `http(s)://` URL prefix
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icons: Option<String>,
    /// Icon file extension (default "svg")
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon_extension: Option<String>,
    /// Symbol table override file (JSON)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub symbols: Option<PathBuf>,
    /// Modifier table override file (JSON)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub modifiers: Option<PathBuf>,
}

impl PathConfig {
    /// True when the icon base is a remote URL prefix.
    #[must_use]
    pub fn icons_are_remote(&self) -> bool {
        self.icons
            .as_deref()
            .is_some_and(|base| base.starts_with("http://") || base.starts_with("https://"))
    }
}

/// UI preferences configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UiConfig {
    /// Theme mode preference (auto, dark, light)
    #[serde(default)]
    pub theme_mode: ThemeMode,
    /// How keycap labels are rendered (html, text, icon)
    #[serde(default)]
    pub display_mode: DisplayMode,
    /// Pixels per keyboard unit
    #[serde(default = "default_keyboard_scale")]
    pub keyboard_scale: f32,
    /// Layer palette as CSS hex colors, cycled by layer index
    #[serde(default = "default_layer_colors")]
    pub layer_colors: Vec<String>,
}

fn default_keyboard_scale() -> f32 {
    DEFAULT_SCALE
}

fn default_layer_colors() -> Vec<String> {
    DEFAULT_LAYER_COLORS.iter().map(|c| (*c).to_string()).collect()
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            theme_mode: ThemeMode::default(),
            display_mode: DisplayMode::default(),
            keyboard_scale: default_keyboard_scale(),
            layer_colors: default_layer_colors(),
        }
    }
}

/// Application configuration.
///
/// # File Location
///
/// - Linux: `~/.config/ZmkKeymapViewer/config.toml`
/// - macOS: `~/Library/Application Support/ZmkKeymapViewer/config.toml`
/// - Windows: `%APPDATA%\ZmkKeymapViewer\config.toml`
///
/// # Validation
///
/// - `keyboard_scale` must be between 10 and 400 pixels
/// - `layer_colors` must be non-empty `#rgb` / `#rrggbb` colors
/// - override files and a local icon directory must exist when set
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Config {
    /// File system paths
    #[serde(default)]
    pub paths: PathConfig,
    /// UI preferences
    #[serde(default)]
    pub ui: UiConfig,
}

impl Config {
    /// Creates a new Config with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Gets the config directory path.
    ///
    /// `ZMKVIEW_CONFIG_DIR` wins over the platform location when set.
    pub fn config_dir() -> Result<PathBuf> {
        if let Some(dir) = std::env::var_os(CONFIG_DIR_ENV).filter(|dir| !dir.is_empty()) {
            return Ok(PathBuf::from(dir));
        }

        let config_dir = dirs::config_dir()
            .context("Failed to determine config directory")?
            .join(CONFIG_DIR_NAME);

        Ok(config_dir)
    }

    /// Gets the full path to the config file.
    pub fn config_file_path() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join("config.toml"))
    }

    /// Loads configuration from the default config file.
    ///
    /// If the file doesn't exist, returns default configuration.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_file_path()?)
    }

    /// Loads configuration from a specific file, defaulting when absent.
    pub fn load_from(config_path: &Path) -> Result<Self> {
        if !config_path.exists() {
            debug!("No config at {}, using defaults", config_path.display());
            return Ok(Self::new());
        }

        let content = fs::read_to_string(config_path)
            .with_context(|| format!("Failed to read config file: {}", config_path.display()))?;

        let config: Self = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", config_path.display()))?;

        config.validate()?;
        Ok(config)
    }

    /// Saves configuration to the default config file.
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_file_path()?)
    }

    /// Saves configuration to a specific file using atomic write.
    ///
    /// Uses temp file + rename pattern for atomic writes.
    pub fn save_to(&self, config_path: &Path) -> Result<()> {
        self.validate()?;

        if let Some(config_dir) = config_path.parent() {
            fs::create_dir_all(config_dir).with_context(|| {
                format!("Failed to create config directory: {}", config_dir.display())
            })?;
        }

        let content = toml::to_string_pretty(self).context("Failed to serialize configuration")?;
        let temp_path = config_path.with_extension("toml.tmp");

        fs::write(&temp_path, content).with_context(|| {
            format!("Failed to write temp config file: {}", temp_path.display())
        })?;

        fs::rename(&temp_path, config_path).with_context(|| {
            format!("Failed to rename temp config file to: {}", config_path.display())
        })?;

        Ok(())
    }

    /// Validates configuration values.
    pub fn validate(&self) -> Result<()> {
        let scale = self.ui.keyboard_scale;
        if !scale.is_finite() || !(10.0..=400.0).contains(&scale) {
            anyhow::bail!("keyboard_scale must be between 10 and 400, got {scale}");
        }

        if self.ui.layer_colors.is_empty() {
            anyhow::bail!("layer_colors must contain at least one color");
        }
        if let Some(bad) = self.ui.layer_colors.iter().find(|c| !is_hex_color(c)) {
            anyhow::bail!("Invalid layer color '{bad}': expected #rgb or #rrggbb");
        }

        for path in [&self.paths.symbols, &self.paths.modifiers].into_iter().flatten() {
            if !path.is_file() {
                anyhow::bail!("Symbol table override not found: {}", path.display());
            }
        }

        if let Some(icons) = &self.paths.icons {
            if !self.paths.icons_are_remote() && !Path::new(icons).is_dir() {
                anyhow::bail!("Icon directory does not exist: {icons}");
            }
        }

        Ok(())
    }

    /// Loads the symbol tables with this config's override files applied.
    pub fn keycode_db(&self) -> Result<KeycodeDb> {
        KeycodeDb::load_with_overrides(
            self.paths.symbols.as_deref(),
            self.paths.modifiers.as_deref(),
        )
    }

    /// Builds the icon resolver for static output.
    #[must_use]
    pub fn icon_resolver(&self) -> IconResolver {
        IconResolver::from_base(
            self.paths.icons.as_deref(),
            self.paths.icon_extension.as_deref(),
        )
    }
}

fn is_hex_color(color: &str) -> bool {
    color
        .strip_prefix('#')
        .is_some_and(|hex| matches!(hex.len(), 3 | 6) && hex.chars().all(|c| c.is_ascii_hexdigit()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_config_new() {
        let config = Config::new();
        assert_eq!(config.paths.icons, None);
        assert_eq!(config.ui.theme_mode, ThemeMode::Auto);
        assert_eq!(config.ui.display_mode, DisplayMode::Html);
        assert!((config.ui.keyboard_scale - 60.0).abs() < f32::EPSILON);
        assert_eq!(config.ui.layer_colors.len(), DEFAULT_LAYER_COLORS.len());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_validate_scale_and_colors() {
        let mut config = Config::new();
        config.ui.keyboard_scale = 0.0;
        assert!(config.validate().is_err());

        let mut config = Config::new();
        config.ui.layer_colors = vec!["#abc".into(), "red".into()];
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("'red'"));

        config.ui.layer_colors.clear();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_validate_paths() {
        let temp_dir = TempDir::new().unwrap();

        let mut config = Config::new();
        config.paths.icons = Some(temp_dir.path().join("missing").display().to_string());
        assert!(config.validate().is_err());

        config.paths.icons = Some(temp_dir.path().display().to_string());
        assert!(config.validate().is_ok());

        config.paths.icons = Some("https://cdn.example.com/mdi".into());
        assert!(config.paths.icons_are_remote());
        assert!(config.validate().is_ok());

        config.paths.symbols = Some(temp_dir.path().join("symbols.json"));
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_save_and_load() {
        let temp_dir = TempDir::new().unwrap();
        let config_file = temp_dir.path().join("nested").join("config.toml");

        let mut config = Config::new();
        config.ui.theme_mode = ThemeMode::Light;
        config.ui.display_mode = DisplayMode::Icon;
        config.paths.icon_extension = Some("png".into());
        config.save_to(&config_file).unwrap();

        let content = fs::read_to_string(&config_file).unwrap();
        assert!(content.contains("theme_mode = \"light\""));
        assert!(!config_file.with_extension("toml.tmp").exists());

        let loaded = Config::load_from(&config_file).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_load_missing_file_gives_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let loaded = Config::load_from(&temp_dir.path().join("config.toml")).unwrap();
        assert_eq!(loaded, Config::new());
    }

    #[test]
    fn test_load_partial_file() {
        let temp_dir = TempDir::new().unwrap();
        let config_file = temp_dir.path().join("config.toml");
        fs::write(&config_file, "[ui]\ntheme_mode = \"dark\"\n").unwrap();

        let loaded = Config::load_from(&config_file).unwrap();
        assert_eq!(loaded.ui.theme_mode, ThemeMode::Dark);
        assert_eq!(loaded.ui.layer_colors, default_layer_colors());
    }

    #[test]
    fn test_load_invalid_toml() {
        let temp_dir = TempDir::new().unwrap();
        let config_file = temp_dir.path().join("config.toml");
        fs::write(&config_file, "[ui\n").unwrap();

        let err = Config::load_from(&config_file).unwrap_err();
        assert!(err.to_string().contains("Failed to parse config file"));
    }

    #[test]
    fn test_config_dir_name() {
        if std::env::var_os(CONFIG_DIR_ENV).is_some() {
            return;
        }
        if let Ok(dir) = Config::config_dir() {
            assert!(dir.ends_with(CONFIG_DIR_NAME));
        }
    }
}
