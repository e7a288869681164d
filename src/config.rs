//! Configuration for the preview pipeline
//!
//! Holds the fixed values the pipeline needs: debounce delay, document
//! shell styling, the KaTeX asset location, and file size limits.
//! Configuration is persisted as JSON in the user configuration
//! directory.

use crate::error::{ConfigError, ConfigResult};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Application identifier used for the configuration directory
pub const APP_ID: &str = "mdpreview";

/// Debounce delay between the last keystroke and a preview render
pub const DEFAULT_DEBOUNCE_MS: u64 = 300;

/// Maximum file size the preview will open (10 MB)
pub const MAX_FILE_SIZE: u64 = 10 * 1024 * 1024;

/// Default font family for the rendered document
pub const DEFAULT_FONT_FAMILY: &str = "Raleway";

/// Default base font size in pixels
pub const DEFAULT_FONT_SIZE_PX: u16 = 18;

/// Default text color
pub const DEFAULT_TEXT_COLOR: &str = "#222";

/// Default background color
pub const DEFAULT_BACKGROUND_COLOR: &str = "#FFFFEE";

/// Preview pipeline configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct PreviewConfig {
    /// Document shell styling
    pub shell: ShellConfig,

    /// Timing configuration
    pub timing: TimingConfig,

    /// Static asset locations
    pub assets: AssetConfig,

    /// File handling limits
    pub files: FileLimits,
}

impl PreviewConfig {
    /// Load configuration from disk or return defaults when absent
    pub fn load() -> ConfigResult<Self> {
        let path = Self::config_file()?;
        if !path.exists() {
            return Ok(Self::default());
        }
        let data = std::fs::read_to_string(&path)
            .map_err(|e| ConfigError::LoadError(e.to_string()))?;
        serde_json::from_str(&data).map_err(|e| ConfigError::LoadError(e.to_string()))
    }

    /// Save configuration to disk
    pub fn save(&self) -> ConfigResult<()> {
        let path = Self::config_file()?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| ConfigError::SaveError(e.to_string()))?;
        }
        let data = serde_json::to_string_pretty(self)
            .map_err(|e| ConfigError::SaveError(e.to_string()))?;
        std::fs::write(&path, data).map_err(|e| ConfigError::SaveError(e.to_string()))
    }

    /// Get the configuration directory path
    pub fn config_dir() -> ConfigResult<PathBuf> {
        dirs::config_dir()
            .map(|p| p.join(APP_ID))
            .ok_or(ConfigError::DirectoryError)
    }

    fn config_file() -> ConfigResult<PathBuf> {
        Self::config_dir().map(|p| p.join("preview.json"))
    }
}

/// Styling applied to the rendered document shell
///
/// These are fixed values, not computed: the shell carries a single
/// consistent look regardless of document content.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShellConfig {
    /// Font family for body text
    pub font_family: String,

    /// Base font size in pixels
    pub font_size_px: u16,

    /// Body text color
    pub text_color: String,

    /// Page background color
    pub background_color: String,
}

impl Default for ShellConfig {
    fn default() -> Self {
        Self {
            font_family: DEFAULT_FONT_FAMILY.to_string(),
            font_size_px: DEFAULT_FONT_SIZE_PX,
            text_color: DEFAULT_TEXT_COLOR.to_string(),
            background_color: DEFAULT_BACKGROUND_COLOR.to_string(),
        }
    }
}

/// Timing configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimingConfig {
    /// Editor-to-preview debounce delay in milliseconds
    pub debounce_ms: u64,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            debounce_ms: DEFAULT_DEBOUNCE_MS,
        }
    }
}

/// Static asset locations referenced from the document shell
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssetConfig {
    /// Directory containing the KaTeX distribution
    /// (`katex.min.css`, `katex.min.js`, `contrib/auto-render.min.js`)
    pub katex_dir: PathBuf,
}

impl Default for AssetConfig {
    fn default() -> Self {
        Self {
            katex_dir: PathBuf::from("assets/katex"),
        }
    }
}

/// File handling limits
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileLimits {
    /// Maximum file size to open (in bytes)
    pub max_file_size: u64,
}

impl Default for FileLimits {
    fn default() -> Self {
        Self {
            max_file_size: MAX_FILE_SIZE,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = PreviewConfig::default();
        assert_eq!(config.timing.debounce_ms, DEFAULT_DEBOUNCE_MS);
        assert_eq!(config.shell.font_family, "Raleway");
        assert_eq!(config.shell.background_color, "#FFFFEE");
        assert_eq!(config.files.max_file_size, MAX_FILE_SIZE);
    }

    #[test]
    fn test_config_serialization() {
        let config = PreviewConfig::default();
        let json = serde_json::to_string(&config).unwrap();
        let deserialized: PreviewConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(config.shell.font_size_px, deserialized.shell.font_size_px);
        assert_eq!(config.timing.debounce_ms, deserialized.timing.debounce_ms);
    }
}
