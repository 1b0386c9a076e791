//! HTML composition
//!
//! Turns one or more `(path, content)` entries plus a rendering
//! configuration into a single self-contained HTML fragment: per-file
//! header, highlighting, line numbering, border and word-wrap decoration,
//! multi-file concatenation. The output carries inline styles only, so it
//! can be pasted into arbitrary third-party documents.
//!
//! Decoration steps rewrite the highlighted block by string-pattern
//! matching over its known `<pre><code>` shape. Every step that does not
//! find the shape it expects leaves the block unmodified; output is always
//! valid HTML even when a decoration is skipped.

use crate::config::ShowFilePath;
use crate::error::{Error, Result};
use crate::highlight::{Highlighter, ThemeSelection};
use crate::language;
use crate::theme::builtin;
use regex::Regex;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

// ─────────────────────────────────────────────────────────────────────────────
// Input Types
// ─────────────────────────────────────────────────────────────────────────────

/// One unit of source text to render.
#[derive(Debug, Clone, PartialEq)]
pub struct FileEntry {
    pub absolute_path: PathBuf,
    pub content: String,
    /// 1-based number the first line is labeled with, for rendering a
    /// selection with numbers matching its position in the original file.
    pub start_line: Option<u32>,
}

impl FileEntry {
    pub fn new(absolute_path: impl Into<PathBuf>, content: impl Into<String>) -> Self {
        Self {
            absolute_path: absolute_path.into(),
            content: content.into(),
            start_line: None,
        }
    }

    pub fn with_start_line(mut self, start_line: u32) -> Self {
        self.start_line = Some(start_line);
        self
    }
}

/// Rendering configuration for one composition. Constructed fresh from
/// current settings on every invocation.
#[derive(Debug, Clone, PartialEq)]
pub struct BuildOptions {
    pub theme: ThemeSelection,
    pub line_numbers: bool,
    pub border: bool,
    pub word_wrap: bool,
    pub show_file_path: ShowFilePath,
    pub workspace_root: Option<PathBuf>,
    pub language_override: Option<String>,
}

impl Default for BuildOptions {
    fn default() -> Self {
        Self {
            theme: ThemeSelection::named(builtin::DEFAULT_THEME),
            line_numbers: false,
            border: false,
            word_wrap: false,
            show_file_path: ShowFilePath::Filename,
            workspace_root: None,
            language_override: None,
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Escaping
// ─────────────────────────────────────────────────────────────────────────────

/// Escape `&`, `<`, `>` for text the composer generates itself (headers).
/// Code content is escaped by the highlighter.
pub fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

// ─────────────────────────────────────────────────────────────────────────────
// Composition
// ─────────────────────────────────────────────────────────────────────────────

const WORD_WRAP_STYLE: &str = "white-space:pre-wrap;word-wrap:break-word;";
const BORDER_STYLE: &str = "border:1px solid #858585;border-radius:6px;";

/// Compose the final fragment for an ordered, non-empty list of entries.
///
/// Per file: resolve the effective language (override unless `"auto"`, else
/// detection), highlight, then decorate in fixed order: attribute strip,
/// word wrap, line numbers, border, header. Fragments concatenate in input
/// order inside one outer container with bounded width and horizontal
/// scroll.
pub fn build_html(
    entries: &[FileEntry],
    options: &BuildOptions,
    highlighter: &mut Highlighter,
) -> Result<String> {
    if entries.is_empty() {
        return Err(Error::NothingToRender);
    }

    let mut parts: Vec<String> = Vec::new();
    for (index, entry) in entries.iter().enumerate() {
        let lang = effective_language(entry, options);
        let mut block = highlighter.highlight(&entry.content, lang, &options.theme)?;

        block = strip_engine_attributes(&block);
        if options.word_wrap {
            block = inject_outer_style(&block, WORD_WRAP_STYLE);
        }
        if options.line_numbers {
            block = add_line_numbers(&block, entry.start_line.unwrap_or(1));
        }
        if options.border {
            block = inject_outer_style(&block, BORDER_STYLE);
        }

        if let Some(name) = display_name(
            &entry.absolute_path,
            options.show_file_path,
            options.workspace_root.as_deref(),
        ) {
            parts.push(header_html(&name, index == 0));
        }
        parts.push(block);
    }

    Ok(format!(
        "<div style=\"max-width:100%;overflow-x:auto\">\n{}\n</div>",
        parts.join("\n")
    ))
}

fn effective_language<'a>(entry: &'a FileEntry, options: &'a BuildOptions) -> &'a str {
    match options.language_override.as_deref() {
        Some(lang) if lang != "auto" => lang,
        _ => language::detect(&entry.absolute_path),
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Block Decoration
// ─────────────────────────────────────────────────────────────────────────────

fn code_block_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?s)^(<pre[^>]*><code[^>]*>)(.*)(</code></pre>)$").expect("valid regex")
    })
}

/// Remove `class`/`tabindex` attributes from the block's opening tags.
/// Output must not depend on external stylesheets; only the opening-tag
/// region is touched so code content survives untouched.
fn strip_engine_attributes(block: &str) -> String {
    static RE: OnceLock<Regex> = OnceLock::new();
    let re = RE
        .get_or_init(|| Regex::new(r#" (?:class|tabindex)="[^"]*""#).expect("valid regex"));

    let head_end = match block.find("<code") {
        Some(pos) => match block[pos..].find('>') {
            Some(offset) => pos + offset + 1,
            None => return block.to_string(),
        },
        None => match block.find('>') {
            Some(pos) => pos + 1,
            None => return block.to_string(),
        },
    };

    format!("{}{}", re.replace_all(&block[..head_end], ""), &block[head_end..])
}

/// Insert CSS declarations at the front of the outer block's inline style.
/// Blocks without a style attribute on the outer tag pass through.
fn inject_outer_style(block: &str, css: &str) -> String {
    static RE: OnceLock<Regex> = OnceLock::new();
    let re = RE.get_or_init(|| Regex::new(r#"^<pre[^>]*?style=""#).expect("valid regex"));

    match re.find(block) {
        Some(m) => format!("{}{}{}", &block[..m.end()], css, &block[m.end()..]),
        None => block.to_string(),
    }
}

const NUMBER_CELL_STYLE: &str = "border:none;padding:0 1em 0 0;text-align:right;\
user-select:none;opacity:0.5;white-space:nowrap;line-height:inherit;font-size:inherit";
const LINE_CELL_STYLE: &str =
    "border:none;padding:0;white-space:pre;line-height:inherit;font-size:inherit";

/// Rewrite the code block as a two-column table, one row per line: a
/// right-aligned, dimmed, non-selectable number next to the line's original
/// markup. Blocks that do not match the expected shape pass through.
fn add_line_numbers(block: &str, start_line: u32) -> String {
    let Some(caps) = code_block_re().captures(block) else {
        return block.to_string();
    };
    let (open, body, close) = (&caps[1], &caps[2], &caps[3]);

    let mut lines: Vec<&str> = body.split('\n').collect();
    // A final newline produces one empty trailing segment, not a line
    if lines.last() == Some(&"") {
        lines.pop();
    }

    let rows: Vec<String> = lines
        .iter()
        .enumerate()
        .map(|(i, line)| {
            format!(
                "<tr><td style=\"{NUMBER_CELL_STYLE}\">{}</td>\
<td style=\"{LINE_CELL_STYLE}\">{line}</td></tr>",
                start_line + i as u32
            )
        })
        .collect();

    format!(
        "{open}<table style=\"border-collapse:collapse;width:100%\"><tbody>\n{}\n</tbody></table>{close}",
        rows.join("\n")
    )
}

// ─────────────────────────────────────────────────────────────────────────────
// File Path Headers
// ─────────────────────────────────────────────────────────────────────────────

fn display_name(path: &Path, mode: ShowFilePath, workspace_root: Option<&Path>) -> Option<String> {
    let filename = || {
        path.file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string())
    };

    match mode {
        ShowFilePath::None => None,
        ShowFilePath::Absolute => Some(path.display().to_string()),
        ShowFilePath::Relative => Some(
            workspace_root
                .and_then(|root| path.strip_prefix(root).ok())
                .map(|rel| rel.display().to_string())
                .unwrap_or_else(filename),
        ),
        ShowFilePath::Filename => Some(filename()),
    }
}

fn header_html(name: &str, first: bool) -> String {
    // The first header sits flush with the container; later ones get a
    // separating top margin
    let margin = if first {
        "margin:0 0 0.25em"
    } else {
        "margin:1em 0 0.25em"
    };
    format!(
        "<p style=\"font-family:monospace;{margin}\"><strong>{}</strong></p>",
        escape_html(name)
    )
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
