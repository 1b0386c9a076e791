//! Preview rendering for code2html
//!
//! Wraps a composed HTML fragment in a minimal standalone document and
//! shows it in the system browser. The panel keeps at most one live
//! preview surface: a second `show` replaces the existing document's
//! content instead of opening another one. The document carries a strict
//! content-security policy (inline styles plus one nonce-tagged script)
//! and a "Copy HTML" toolbar action.

// Allow dead code - the panel implements the full surface lifecycle
// (refresh, close) even though a one-shot invocation only opens it
#![allow(dead_code)]

use crate::error::{Error, Result};
use crate::html::escape_html;
use log::{debug, info};
use std::collections::hash_map::DefaultHasher;
use std::fs;
use std::hash::{Hash, Hasher};
use std::path::PathBuf;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

/// Callback the panel re-runs to regenerate its content.
pub type RefreshFn = Box<dyn FnMut() -> Result<String>>;

const DEFAULT_TITLE: &str = "code2html preview";
const DOCUMENT_NAME: &str = "code2html-preview.html";

// ─────────────────────────────────────────────────────────────────────────────
// Preview Panel
// ─────────────────────────────────────────────────────────────────────────────

/// The single preview surface. Owned by the application coordinator; there
/// is no process-wide static.
#[derive(Default)]
pub struct PreviewPanel {
    document_path: Option<PathBuf>,
    refresh: Option<RefreshFn>,
    title: String,
}

impl PreviewPanel {
    pub fn new() -> Self {
        Self {
            document_path: None,
            refresh: None,
            title: DEFAULT_TITLE.to_string(),
        }
    }

    /// Show a fragment in the preview surface.
    ///
    /// The first call writes the wrapped document into the system temp
    /// directory and opens it in the default browser. Later calls re-title
    /// the panel and rewrite the same document in place.
    pub fn show(&mut self, html: &str, refresh: RefreshFn, title: &str) -> Result<()> {
        self.refresh = Some(refresh);
        self.title = title.to_string();

        let document = wrap_document(html, title);

        if let Some(path) = &self.document_path {
            debug!("Replacing preview content at {}", path.display());
            fs::write(path, document)?;
            return Ok(());
        }

        let path = std::env::temp_dir().join(DOCUMENT_NAME);
        fs::write(&path, document)?;
        open::that(&path).map_err(|e| Error::Preview(e.to_string()))?;
        info!("Opened preview at {}", path.display());
        self.document_path = Some(path);
        Ok(())
    }

    /// Regenerate the preview via the stored callback. A no-op when no
    /// surface is open.
    pub fn refresh(&mut self) -> Result<()> {
        if self.document_path.is_none() {
            return Ok(());
        }
        let Some(mut callback) = self.refresh.take() else {
            return Ok(());
        };
        let result = callback();
        self.refresh = Some(callback);

        let html = result?;
        if let Some(path) = &self.document_path {
            fs::write(path, wrap_document(&html, &self.title))?;
        }
        Ok(())
    }

    pub fn is_open(&self) -> bool {
        self.document_path.is_some()
    }

    /// Dispose the surface: clears the stored document path and refresh
    /// callback, removing the document best-effort.
    pub fn close(&mut self) {
        if let Some(path) = self.document_path.take() {
            let _ = fs::remove_file(&path);
        }
        self.refresh = None;
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Document Wrapping
// ─────────────────────────────────────────────────────────────────────────────

/// Wrap a fragment in a standalone HTML document.
///
/// The content-security policy allows inline styles and exactly one
/// nonce-tagged script: the "Copy HTML" toolbar handler, which copies the
/// raw inner markup to the clipboard. Highlighted block backgrounds are
/// neutralized inside the preview chrome so the page theme shows through.
pub fn wrap_document(html: &str, title: &str) -> String {
    let nonce = generate_nonce();
    format!(
        r#"<!DOCTYPE html>
<html>
<head>
<meta charset="UTF-8">
<meta http-equiv="Content-Security-Policy" content="default-src 'none'; style-src 'unsafe-inline'; script-src 'nonce-{nonce}';">
<title>{title}</title>
<style>
  body {{ padding: 16px; font-family: system-ui, sans-serif; }}
  .toolbar {{ margin-bottom: 12px; }}
  .toolbar button {{
    padding: 6px 14px;
    cursor: pointer;
    background: #007acc;
    color: #fff;
    border: none;
    border-radius: 4px;
    font-size: 13px;
  }}
  .toolbar button:hover {{
    background: #005f9e;
  }}
  .preview {{ margin-top: 8px; }}
  .preview pre * {{ background: transparent !important; }}
</style>
</head>
<body>
<div class="toolbar">
  <button id="copyBtn">Copy HTML</button>
</div>
<div class="preview">{html}</div>
<script nonce="{nonce}">
  const rawHtml = document.querySelector('.preview').innerHTML;
  document.getElementById('copyBtn').addEventListener('click', () => {{
    navigator.clipboard.writeText(rawHtml);
  }});
</script>
</body>
</html>"#,
        nonce = nonce,
        title = escape_html(title),
        html = html,
    )
}

/// A per-document nonce. Only uniqueness matters: each generated document
/// must tag its one script with a value not guessable from a previous one.
fn generate_nonce() -> String {
    static COUNTER: AtomicU64 = AtomicU64::new(0);

    let mut hasher = DefaultHasher::new();
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos())
        .unwrap_or_default()
        .hash(&mut hasher);
    COUNTER.fetch_add(1, Ordering::Relaxed).hash(&mut hasher);
    std::process::id().hash(&mut hasher);
    format!("{:016x}", hasher.finish())
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wrap_document_structure() {
        let doc = wrap_document("<div>fragment</div>", "My Preview");
        assert!(doc.starts_with("<!DOCTYPE html>"));
        assert!(doc.contains("<title>My Preview</title>"));
        assert!(doc.contains("<div>fragment</div>"));
        assert!(doc.ends_with("</html>"));
    }

    #[test]
    fn test_wrap_document_csp_and_nonce() {
        let doc = wrap_document("<div>x</div>", "t");
        assert!(doc.contains("Content-Security-Policy"));
        assert!(doc.contains("default-src 'none'"));
        assert!(doc.contains("style-src 'unsafe-inline'"));

        // The script nonce matches the one declared in the policy
        let marker = "script-src 'nonce-";
        let start = doc.find(marker).unwrap() + marker.len();
        let nonce = &doc[start..start + 16];
        assert!(doc.contains(&format!("<script nonce=\"{}\">", nonce)));
    }

    #[test]
    fn test_wrap_document_has_copy_toolbar() {
        let doc = wrap_document("<div>x</div>", "t");
        assert!(doc.contains("Copy HTML"));
        assert!(doc.contains("id=\"copyBtn\""));
    }

    #[test]
    fn test_wrap_document_neutralizes_block_backgrounds() {
        let doc = wrap_document("<div>x</div>", "t");
        assert!(doc.contains(".preview pre * { background: transparent !important; }"));
    }

    #[test]
    fn test_wrap_document_escapes_title() {
        let doc = wrap_document("<div>x</div>", "a <b> & c");
        assert!(doc.contains("<title>a &lt;b&gt; &amp; c</title>"));
    }

    #[test]
    fn test_nonces_differ_between_documents() {
        let a = wrap_document("<div>x</div>", "t");
        let b = wrap_document("<div>x</div>", "t");
        let nonce_of = |doc: &str| {
            let marker = "script-src 'nonce-";
            let start = doc.find(marker).unwrap() + marker.len();
            doc[start..start + 16].to_string()
        };
        assert_ne!(nonce_of(&a), nonce_of(&b));
    }

    #[test]
    fn test_refresh_without_surface_is_noop() {
        let mut panel = PreviewPanel::new();
        assert!(!panel.is_open());
        assert!(panel.refresh().is_ok());
    }

    #[test]
    fn test_close_without_surface_is_safe() {
        let mut panel = PreviewPanel::new();
        panel.close();
        assert!(!panel.is_open());
    }
}
