//! User settings and preferences for code2html
//!
//! This module defines the `Settings` struct that holds all user-configurable
//! rendering options, with serde support for JSON persistence. A fresh
//! `BuildOptions` is derived from these values on every invocation; nothing
//! here caches option state between renders.

// Allow dead code - this module carries display-label helpers alongside the
// fields the render path reads
#![allow(dead_code)]

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::str::FromStr;

// ─────────────────────────────────────────────────────────────────────────────
// File Path Header Mode
// ─────────────────────────────────────────────────────────────────────────────

/// How each rendered file is labeled above its code block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ShowFilePath {
    /// Bare filename (default)
    #[default]
    Filename,
    /// Path relative to the workspace root, falling back to the filename
    Relative,
    /// Full absolute path
    Absolute,
    /// No header at all
    None,
}

impl ShowFilePath {
    /// Get the display label for this mode.
    pub fn label(&self) -> &'static str {
        match self {
            ShowFilePath::Filename => "filename",
            ShowFilePath::Relative => "relative",
            ShowFilePath::Absolute => "absolute",
            ShowFilePath::None => "none",
        }
    }

    /// Get all available modes.
    pub fn all() -> &'static [ShowFilePath] {
        &[
            ShowFilePath::Filename,
            ShowFilePath::Relative,
            ShowFilePath::Absolute,
            ShowFilePath::None,
        ]
    }
}

impl FromStr for ShowFilePath {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "filename" => Ok(ShowFilePath::Filename),
            "relative" => Ok(ShowFilePath::Relative),
            "absolute" => Ok(ShowFilePath::Absolute),
            "none" => Ok(ShowFilePath::None),
            other => Err(format!(
                "unknown file path mode '{}' (expected filename, relative, absolute, or none)",
                other
            )),
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Settings
// ─────────────────────────────────────────────────────────────────────────────

/// The sentinel theme value meaning "resolve the host's active theme".
pub const ACTIVE_THEME_SENTINEL: &str = "active";

/// All user-configurable options, persisted as JSON.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Theme to render with: a built-in theme name, a path to a theme JSON
    /// file, or the `"active"` sentinel.
    pub theme: String,

    /// Number each line in a two-column table.
    pub line_numbers: bool,

    /// Draw a border with rounded corners around each code block.
    pub border: bool,

    /// Let long lines wrap instead of scrolling horizontally.
    pub word_wrap: bool,

    /// How each file is labeled above its block.
    pub show_file_path: ShowFilePath,

    /// Force a language instead of detecting from the path. `"auto"` and
    /// empty both mean detection.
    pub language_override: Option<String>,

    /// Directory scanned for installed theme extensions when the theme is
    /// the `"active"` sentinel.
    pub extensions_dir: Option<PathBuf>,

    /// Identifier of the active theme looked up among the extensions.
    pub active_theme: Option<String>,

    /// Base directory `show_file_path = "relative"` strips from paths.
    pub workspace_root: Option<PathBuf>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            theme: crate::theme::builtin::DEFAULT_THEME.to_string(),
            line_numbers: false,
            border: false,
            word_wrap: false,
            show_file_path: ShowFilePath::default(),
            language_override: None,
            extensions_dir: None,
            active_theme: None,
            workspace_root: None,
        }
    }
}

impl Settings {
    /// Parse settings from JSON and normalize degenerate values.
    pub fn from_json_sanitized(json: &str) -> serde_json::Result<Self> {
        let mut settings: Settings = serde_json::from_str(json)?;
        settings.sanitize();
        Ok(settings)
    }

    /// Normalize values that deserialize cleanly but mean "unset".
    pub fn sanitize(&mut self) {
        if self.theme.trim().is_empty() {
            self.theme = crate::theme::builtin::DEFAULT_THEME.to_string();
        }
        if let Some(lang) = &self.language_override {
            let lang = lang.trim();
            if lang.is_empty() || lang == "auto" {
                self.language_override = None;
            }
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_settings() {
        let settings = Settings::default();
        assert_eq!(settings.theme, "github-dark");
        assert!(!settings.line_numbers);
        assert!(!settings.border);
        assert!(!settings.word_wrap);
        assert_eq!(settings.show_file_path, ShowFilePath::Filename);
        assert_eq!(settings.language_override, None);
    }

    #[test]
    fn test_show_file_path_round_trip() {
        for mode in ShowFilePath::all() {
            let json = serde_json::to_string(mode).unwrap();
            let parsed: ShowFilePath = serde_json::from_str(&json).unwrap();
            assert_eq!(*mode, parsed);
        }
    }

    #[test]
    fn test_show_file_path_serializes_lowercase() {
        assert_eq!(
            serde_json::to_string(&ShowFilePath::Filename).unwrap(),
            "\"filename\""
        );
        assert_eq!(serde_json::to_string(&ShowFilePath::None).unwrap(), "\"none\"");
    }

    #[test]
    fn test_show_file_path_from_str() {
        assert_eq!(
            "relative".parse::<ShowFilePath>().unwrap(),
            ShowFilePath::Relative
        );
        assert!("sideways".parse::<ShowFilePath>().is_err());
    }

    #[test]
    fn test_partial_config_uses_defaults_for_missing() {
        let settings: Settings = serde_json::from_str(r#"{"line_numbers": true}"#).unwrap();
        assert!(settings.line_numbers);
        assert_eq!(settings.theme, "github-dark");
        assert_eq!(settings.show_file_path, ShowFilePath::Filename);
    }

    #[test]
    fn test_unknown_fields_ignored() {
        let settings: Settings =
            serde_json::from_str(r#"{"theme": "nord", "future_feature": true}"#).unwrap();
        assert_eq!(settings.theme, "nord");
    }

    #[test]
    fn test_sanitize_empty_theme() {
        let settings = Settings::from_json_sanitized(r#"{"theme": "  "}"#).unwrap();
        assert_eq!(settings.theme, "github-dark");
    }

    #[test]
    fn test_sanitize_auto_language_override() {
        let settings =
            Settings::from_json_sanitized(r#"{"language_override": "auto"}"#).unwrap();
        assert_eq!(settings.language_override, None);

        let settings = Settings::from_json_sanitized(r#"{"language_override": ""}"#).unwrap();
        assert_eq!(settings.language_override, None);

        let settings =
            Settings::from_json_sanitized(r#"{"language_override": "python"}"#).unwrap();
        assert_eq!(settings.language_override.as_deref(), Some("python"));
    }

    #[test]
    fn test_settings_round_trip() {
        let original = Settings {
            theme: "dracula".to_string(),
            line_numbers: true,
            border: true,
            word_wrap: false,
            show_file_path: ShowFilePath::Relative,
            language_override: Some("rust".to_string()),
            extensions_dir: Some(PathBuf::from("/ext")),
            active_theme: Some("Dracula".to_string()),
            workspace_root: Some(PathBuf::from("/work")),
        };
        let json = serde_json::to_string_pretty(&original).unwrap();
        let loaded: Settings = serde_json::from_str(&json).unwrap();
        assert_eq!(original, loaded);
    }
}
