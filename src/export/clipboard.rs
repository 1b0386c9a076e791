//! Clipboard operations for HTML output
//!
//! This module provides cross-platform clipboard functionality for copying
//! rendered HTML to the system clipboard using the arboard crate.

// Allow dead code - this module includes plain-text and explicit-fallback
// variants beyond the one call the command flow makes
#![allow(dead_code)]

use arboard::Clipboard;

// ─────────────────────────────────────────────────────────────────────────────
// Clipboard Error
// ─────────────────────────────────────────────────────────────────────────────

/// Errors that can occur during clipboard operations.
#[derive(Debug)]
pub enum ClipboardError {
    /// Failed to access clipboard
    Access(String),
    /// Failed to set clipboard content
    Write(String),
}

impl std::fmt::Display for ClipboardError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ClipboardError::Access(msg) => write!(f, "Clipboard access error: {}", msg),
            ClipboardError::Write(msg) => write!(f, "Clipboard write error: {}", msg),
        }
    }
}

impl std::error::Error for ClipboardError {}

impl From<ClipboardError> for crate::error::Error {
    fn from(err: ClipboardError) -> Self {
        crate::error::Error::Clipboard(err.to_string())
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Clipboard Operations
// ─────────────────────────────────────────────────────────────────────────────

/// Copy rendered HTML to the clipboard as HTML-typed content.
///
/// The raw markup doubles as the plain-text fallback, so targets without
/// rich paste still receive the markup itself.
pub fn copy_html_to_clipboard(html: &str) -> Result<(), ClipboardError> {
    copy_html_with_fallback(html, html)
}

/// Copy HTML with an explicit plain-text fallback to the clipboard.
///
/// Sets both representations, allowing rich paste in supported apps while
/// everything else falls back to the plain text.
pub fn copy_html_with_fallback(html: &str, plain_text: &str) -> Result<(), ClipboardError> {
    let mut clipboard = Clipboard::new().map_err(|e| ClipboardError::Access(e.to_string()))?;

    clipboard
        .set_html(html, Some(plain_text))
        .map_err(|e| ClipboardError::Write(e.to_string()))?;

    Ok(())
}

/// Copy plain text to the clipboard.
pub fn copy_text_to_clipboard(text: &str) -> Result<(), ClipboardError> {
    let mut clipboard = Clipboard::new().map_err(|e| ClipboardError::Access(e.to_string()))?;

    clipboard
        .set_text(text)
        .map_err(|e| ClipboardError::Write(e.to_string()))?;

    Ok(())
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clipboard_error_display() {
        let err = ClipboardError::Access("no display".to_string());
        assert!(err.to_string().contains("no display"));

        let err = ClipboardError::Write("write failed".to_string());
        assert!(err.to_string().contains("write failed"));
    }

    #[test]
    fn test_clipboard_error_converts_to_app_error() {
        let err: crate::error::Error = ClipboardError::Write("boom".to_string()).into();
        assert!(matches!(err, crate::error::Error::Clipboard(_)));
    }

    // Note: Actual clipboard tests require a display/clipboard context
    // which isn't typically available in CI environments.
}
