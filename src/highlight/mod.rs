//! Tokenizer/theme facade over syntect
//!
//! Owns a lazily-initialized highlighting engine: the syntect syntax set
//! plus the built-in theme definitions converted to engine themes at
//! construction. Converts `(code, language, theme)` into a self-contained
//! `<pre><code>` fragment with inline per-token color styles, and exposes
//! `reset()` so a theme-configuration change can rebuild the engine.
//!
//! The engine instance is an owned field of [`Highlighter`], not a global;
//! the application coordinator holds exactly one facade and passes it down.

// Allow dead code - lifecycle inspection helpers are exercised by the
// coordinator's tests rather than the render path
#![allow(dead_code)]

use crate::error::{Error, Result};
use crate::language::{self, PLAIN_TEXT};
use crate::theme::{builtin, ThemeDefinition};
use log::debug;
use std::collections::BTreeMap;
use std::str::FromStr;
use syntect::easy::HighlightLines;
use syntect::highlighting::{
    Color, FontStyle, ScopeSelectors, StyleModifier, Theme, ThemeItem,
};
use syntect::html::{styled_line_to_highlighted_html, IncludeBackground};
use syntect::parsing::SyntaxSet;
use syntect::util::LinesWithEndings;

// ─────────────────────────────────────────────────────────────────────────────
// Theme Selection
// ─────────────────────────────────────────────────────────────────────────────

/// The theme a render runs with: a name from the engine's cached set, or a
/// fully materialized definition the engine accepts transiently.
#[derive(Debug, Clone, PartialEq)]
pub enum ThemeSelection {
    Named(String),
    Custom(ThemeDefinition),
}

impl ThemeSelection {
    pub fn named(name: &str) -> Self {
        ThemeSelection::Named(name.to_string())
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Highlighter Facade
// ─────────────────────────────────────────────────────────────────────────────

/// The facade callers render through. Holds at most one live engine,
/// constructed on first use and dropped by [`Highlighter::reset`].
#[derive(Default)]
pub struct Highlighter {
    engine: Option<HighlightEngine>,
}

impl Highlighter {
    pub fn new() -> Self {
        Self { engine: None }
    }

    /// Render code to a themed HTML fragment.
    ///
    /// `plaintext` bypasses the engine entirely: the text is HTML-escaped
    /// and wrapped in a minimal boxed block with no coloring. Any other
    /// identifier goes through the engine; identifiers outside the engine's
    /// grammar set fail with [`Error::UnsupportedLanguage`].
    pub fn highlight(
        &mut self,
        code: &str,
        language_id: &str,
        theme: &ThemeSelection,
    ) -> Result<String> {
        if language_id == PLAIN_TEXT {
            return Ok(plaintext_block(code));
        }
        self.engine().render(code, language_id, theme)
    }

    /// Drop the cached engine. The next render reconstructs it, picking up
    /// any changed theme configuration.
    pub fn reset(&mut self) {
        if self.engine.take().is_some() {
            debug!("Highlight engine reset");
        }
    }

    pub fn is_initialized(&self) -> bool {
        self.engine.is_some()
    }

    fn engine(&mut self) -> &HighlightEngine {
        self.engine.get_or_insert_with(HighlightEngine::new)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Engine
// ─────────────────────────────────────────────────────────────────────────────

/// The expensive, cached half: loaded grammars and converted themes.
struct HighlightEngine {
    syntax_set: SyntaxSet,
    themes: BTreeMap<String, Theme>,
}

impl HighlightEngine {
    fn new() -> Self {
        debug!("Loading syntax set and built-in themes");
        let syntax_set = SyntaxSet::load_defaults_newlines();
        let themes = builtin::all()
            .iter()
            .map(|def| (def.name.clone(), convert_theme(def)))
            .collect::<BTreeMap<_, _>>();
        debug!(
            "Loaded {} syntaxes and {} themes",
            syntax_set.syntaxes().len(),
            themes.len()
        );
        Self { syntax_set, themes }
    }

    fn render(&self, code: &str, language_id: &str, theme: &ThemeSelection) -> Result<String> {
        let token = language::engine_token(language_id).unwrap_or(language_id);
        let syntax = self
            .syntax_set
            .find_syntax_by_token(token)
            .ok_or_else(|| Error::UnsupportedLanguage(language_id.to_string()))?;

        let transient;
        let theme = match theme {
            ThemeSelection::Named(name) => self
                .themes
                .get(name)
                .ok_or_else(|| Error::UnknownTheme(name.clone()))?,
            ThemeSelection::Custom(def) => {
                transient = convert_theme(def);
                &transient
            }
        };

        let background = theme
            .settings
            .background
            .map(color_to_hex)
            .unwrap_or_else(|| "#ffffff".to_string());
        let foreground = theme
            .settings
            .foreground
            .map(color_to_hex)
            .unwrap_or_else(|| "#000000".to_string());

        let mut highlighter = HighlightLines::new(syntax, theme);
        let mut body = String::new();
        for line in LinesWithEndings::from(code) {
            let mut ranges = highlighter.highlight_line(line, &self.syntax_set)?;
            // Keep the newline out of the final token so every markup line
            // maps to exactly one source line.
            if let Some(last) = ranges.last_mut() {
                last.1 = last.1.trim_end_matches(['\r', '\n']);
                if last.1.is_empty() {
                    ranges.pop();
                }
            }
            body.push_str(&styled_line_to_highlighted_html(
                &ranges,
                IncludeBackground::No,
            )?);
            body.push('\n');
        }

        Ok(format!(
            "<pre style=\"background-color:{background};color:{foreground};padding:1em;overflow-x:auto\"><code>{body}</code></pre>"
        ))
    }
}

/// Engine bypass for the `plaintext` sentinel: escaped text in a minimal
/// boxed block, no syntax coloring.
fn plaintext_block(code: &str) -> String {
    let escaped = code
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;");
    format!("<pre style=\"padding:1em;overflow-x:auto\"><code>{escaped}</code></pre>")
}

// ─────────────────────────────────────────────────────────────────────────────
// Theme Conversion
// ─────────────────────────────────────────────────────────────────────────────

/// Convert a materialized theme definition to an engine theme.
///
/// Scoped rules are applied in sequence (legacy `settings` first, then
/// `tokenColors`), preserving the ordering contract the include-chain merge
/// depends on. Rules with unparsable scope selectors are skipped.
pub fn convert_theme(def: &ThemeDefinition) -> Theme {
    let mut theme = Theme {
        name: Some(def.name.clone()),
        ..Theme::default()
    };
    theme.settings.background = def.background().and_then(parse_color);
    theme.settings.foreground = def.foreground().and_then(parse_color);

    for rule in def.settings.iter().chain(def.token_colors.iter()) {
        let Some(scope) = &rule.scope else {
            continue;
        };
        let selectors = match ScopeSelectors::from_str(&scope.to_selector()) {
            Ok(selectors) => selectors,
            Err(err) => {
                debug!("Skipping rule with unparsable scope: {:?}", err);
                continue;
            }
        };
        theme.scopes.push(ThemeItem {
            scope: selectors,
            style: StyleModifier {
                foreground: rule.settings.foreground.as_deref().and_then(parse_color),
                background: rule.settings.background.as_deref().and_then(parse_color),
                font_style: rule.settings.font_style.as_deref().map(parse_font_style),
            },
        });
    }

    theme
}

/// Parse `#rgb`, `#rrggbb`, or `#rrggbbaa`.
fn parse_color(hex: &str) -> Option<Color> {
    let hex = hex.strip_prefix('#')?;
    if !hex.is_ascii() {
        return None;
    }
    let nib = |i: usize| u8::from_str_radix(&hex[i..i + 1], 16).ok();
    let byte = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
    match hex.len() {
        3 => Some(Color {
            r: nib(0)? * 17,
            g: nib(1)? * 17,
            b: nib(2)? * 17,
            a: 0xff,
        }),
        6 => Some(Color {
            r: byte(0)?,
            g: byte(2)?,
            b: byte(4)?,
            a: 0xff,
        }),
        8 => Some(Color {
            r: byte(0)?,
            g: byte(2)?,
            b: byte(4)?,
            a: byte(6)?,
        }),
        _ => None,
    }
}

fn color_to_hex(color: Color) -> String {
    format!("#{:02x}{:02x}{:02x}", color.r, color.g, color.b)
}

fn parse_font_style(text: &str) -> FontStyle {
    let mut style = FontStyle::empty();
    for word in text.split_whitespace() {
        match word {
            "bold" => style |= FontStyle::BOLD,
            "italic" => style |= FontStyle::ITALIC,
            "underline" => style |= FontStyle::UNDERLINE,
            _ => {}
        }
    }
    style
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
