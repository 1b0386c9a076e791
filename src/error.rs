//! Centralized error handling for code2html
//!
//! This module provides a unified error type that covers all error scenarios
//! in the application: file I/O, configuration, theme loading, and rendering.

use log::warn;
use std::fmt;
use std::io;
use std::path::PathBuf;

// ─────────────────────────────────────────────────────────────────────────────
// Custom Result Type Alias
// ─────────────────────────────────────────────────────────────────────────────

/// A specialized `Result` type for the application.
pub type Result<T> = std::result::Result<T, Error>;

/// The centralized error type for the application.
#[derive(Debug)]
pub enum Error {
    // ─────────────────────────────────────────────────────────────────────────
    // File I/O Errors
    // ─────────────────────────────────────────────────────────────────────────
    /// Generic I/O error wrapper
    Io(io::Error),

    // ─────────────────────────────────────────────────────────────────────────
    // Configuration Errors
    // ─────────────────────────────────────────────────────────────────────────
    /// Failed to load configuration file
    ConfigLoad {
        path: PathBuf,
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Failed to save configuration file
    ConfigSave {
        path: PathBuf,
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Failed to parse configuration (invalid JSON/format)
    ConfigParse {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Configuration directory not found or inaccessible
    ConfigDirNotFound,

    // ─────────────────────────────────────────────────────────────────────────
    // Theme Errors
    // ─────────────────────────────────────────────────────────────────────────
    /// A theme file could not be parsed
    ThemeParse { message: String },

    /// A theme name matched neither the built-in set nor a theme file
    UnknownTheme(String),

    /// A theme `include` chain exceeded the recursion bound
    IncludeChainTooDeep(PathBuf),

    // ─────────────────────────────────────────────────────────────────────────
    // Rendering Errors
    // ─────────────────────────────────────────────────────────────────────────
    /// A language override named a language the engine does not recognize
    UnsupportedLanguage(String),

    /// The highlighting engine failed while rendering a block
    Highlight(String),

    /// No renderable input was supplied (empty or fully filtered file list)
    NothingToRender,

    /// A `--lines` range was out of bounds or inverted
    InvalidLineRange(String),

    // ─────────────────────────────────────────────────────────────────────────
    // Output Errors
    // ─────────────────────────────────────────────────────────────────────────
    /// Clipboard access or write failed
    Clipboard(String),

    /// The preview document could not be written or opened
    Preview(String),
}

// Implement From traits for convenient error conversion
impl From<io::Error> for Error {
    fn from(err: io::Error) -> Self {
        Error::Io(err)
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::ConfigParse {
            message: err.to_string(),
            source: Some(Box::new(err)),
        }
    }
}

impl From<syntect::Error> for Error {
    fn from(err: syntect::Error) -> Self {
        Error::Highlight(err.to_string())
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Display trait implementation for user-friendly error messages
// ─────────────────────────────────────────────────────────────────────────────
impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            // File I/O Errors
            Error::Io(err) => write!(f, "I/O error: {}", err),

            // Configuration Errors
            Error::ConfigLoad { path, source } => {
                write!(
                    f,
                    "Failed to load configuration from '{}': {}",
                    path.display(),
                    source
                )
            }
            Error::ConfigSave { path, source } => {
                write!(
                    f,
                    "Failed to save configuration to '{}': {}",
                    path.display(),
                    source
                )
            }
            Error::ConfigParse { message, .. } => {
                write!(f, "Invalid configuration format: {}", message)
            }
            Error::ConfigDirNotFound => {
                write!(f, "Configuration directory not found")
            }

            // Theme Errors
            Error::ThemeParse { message } => {
                write!(f, "Invalid theme file: {}", message)
            }
            Error::UnknownTheme(name) => {
                write!(f, "Unknown theme '{}'", name)
            }
            Error::IncludeChainTooDeep(path) => {
                write!(f, "Theme include chain too deep at '{}'", path.display())
            }

            // Rendering Errors
            Error::UnsupportedLanguage(lang) => {
                write!(f, "Language '{}' is not supported by the highlighter", lang)
            }
            Error::Highlight(msg) => write!(f, "Highlighting failed: {}", msg),
            Error::NothingToRender => {
                write!(f, "No readable text files to render")
            }
            Error::InvalidLineRange(msg) => write!(f, "Invalid line range: {}", msg),

            // Output Errors
            Error::Clipboard(msg) => write!(f, "Clipboard error: {}", msg),
            Error::Preview(msg) => write!(f, "Preview error: {}", msg),
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// std::error::Error trait implementation for error chaining
// ─────────────────────────────────────────────────────────────────────────────
impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Io(err) => Some(err),
            Error::ConfigLoad { source, .. } => Some(source.as_ref()),
            Error::ConfigSave { source, .. } => Some(source.as_ref()),
            Error::ConfigParse { source, .. } => source
                .as_ref()
                .map(|s| s.as_ref() as &(dyn std::error::Error + 'static)),
            _ => None,
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Graceful Degradation Helpers
// ─────────────────────────────────────────────────────────────────────────────

/// Extension trait for Result to support graceful degradation.
pub trait ResultExt<T> {
    /// If the result is an error, log it at warning level and return the provided default.
    fn unwrap_or_warn_default(self, default: T, context: &str) -> T;
}

impl<T> ResultExt<T> for Result<T> {
    fn unwrap_or_warn_default(self, default: T, context: &str) -> T {
        match self {
            Ok(value) => value,
            Err(err) => {
                warn!("{}: {}. Using default.", context, err);
                default
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
    fn test_io_error_creation() {
        let io_err = io::Error::new(io::ErrorKind::NotFound, "test error");
        let err = Error::from(io_err);
        assert!(matches!(err, Error::Io(_)));
    }

    #[test]
    fn test_serde_json_error_conversion() {
        let json_result: std::result::Result<String, _> = serde_json::from_str("invalid json");
        let err = Error::from(json_result.unwrap_err());
        assert!(matches!(err, Error::ConfigParse { .. }));
    }

    #[test]
    fn test_display_unknown_theme() {
        let err = Error::UnknownTheme("nope".to_string());
        assert!(err.to_string().contains("nope"));
    }

    #[test]
    fn test_display_unsupported_language() {
        let err = Error::UnsupportedLanguage("klingon".to_string());
        let msg = format!("{}", err);
        assert!(msg.contains("klingon"));
        assert!(msg.contains("not supported"));
    }

    #[test]
    fn test_display_include_chain() {
        let err = Error::IncludeChainTooDeep(PathBuf::from("/themes/loop.json"));
        assert!(err.to_string().contains("include chain too deep"));
    }

    #[test]
    fn test_error_source_io() {
        use std::error::Error as StdError;
        let io_err = io::Error::new(io::ErrorKind::NotFound, "not found");
        let err = Error::Io(io_err);
        assert!(err.source().is_some());
    }

    #[test]
    fn test_error_source_none_for_simple_variants() {
        use std::error::Error as StdError;
        let err = Error::NothingToRender;
        assert!(err.source().is_none());
    }

    #[test]
    fn test_unwrap_or_warn_default_ok() {
        let result: Result<i32> = Ok(42);
        let value = result.unwrap_or_warn_default(0, "test context");
        assert_eq!(value, 42);
    }

    #[test]
    fn test_unwrap_or_warn_default_err() {
        let result: Result<i32> = Err(Error::NothingToRender);
        let value = result.unwrap_or_warn_default(0, "test context");
        assert_eq!(value, 0);
    }
}
