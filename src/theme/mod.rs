//! Theme System for code2html
//!
//! This module defines the materialized theme object shared by the built-in
//! palette set, the contribution resolver, and the highlighting engine, plus
//! the child-over-parent merge used when resolving `include` chains.
//!
//! # Theme Files
//!
//! - `builtin.rs` - the fixed built-in theme definitions
//! - `resolver.rs` - contribution lookup, relaxed JSON parsing, include chains

pub mod builtin;
pub mod resolver;

pub use resolver::{
    find_theme_contribution, load_theme_from_file, parse_theme_json, resolve_active_theme,
    DiskThemeHost, ExtensionInfo, ThemeContribution, ThemeHost,
};

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

// ─────────────────────────────────────────────────────────────────────────────
// Theme Definition
// ─────────────────────────────────────────────────────────────────────────────

/// A fully materialized theme: a name, workbench colors, and ordered
/// token-scope rules.
///
/// The shape follows editor theme JSON files: a `colors` map keyed by
/// well-known identifiers (`editor.background`, `editor.foreground`), a
/// modern `tokenColors` rule list, and an optional legacy `settings` rule
/// list. Unknown fields in source files are ignored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct ThemeDefinition {
    pub name: String,

    /// Relative path to a parent theme. Present only while a file is being
    /// loaded; stripped from every resolved theme.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub include: Option<String>,

    pub colors: BTreeMap<String, String>,

    #[serde(rename = "tokenColors")]
    pub token_colors: Vec<ThemeRule>,

    pub settings: Vec<ThemeRule>,
}

/// One token-scope rule: a lexical scope selector and the style it maps to.
///
/// Rules without a scope act as global defaults (legacy theme dialect).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct ThemeRule {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scope: Option<Scope>,
    pub settings: TokenStyle,
}

/// A scope selector: theme files write either a single string or an array.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Scope {
    One(String),
    Many(Vec<String>),
}

impl Scope {
    /// Flatten to the comma-separated selector form the engine parses.
    pub fn to_selector(&self) -> String {
        match self {
            Scope::One(s) => s.clone(),
            Scope::Many(parts) => parts.join(", "),
        }
    }
}

/// Display settings a rule assigns to its scope.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct TokenStyle {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub foreground: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub background: Option<String>,
    #[serde(rename = "fontStyle", skip_serializing_if = "Option::is_none")]
    pub font_style: Option<String>,
}

impl ThemeDefinition {
    /// The theme's background color, preferring the workbench `colors` map
    /// over a legacy unscoped `settings` rule.
    pub fn background(&self) -> Option<&str> {
        self.colors
            .get("editor.background")
            .map(String::as_str)
            .or_else(|| self.global_style(|s| s.background.as_deref()))
    }

    /// The theme's default foreground color.
    pub fn foreground(&self) -> Option<&str> {
        self.colors
            .get("editor.foreground")
            .map(String::as_str)
            .or_else(|| self.global_style(|s| s.foreground.as_deref()))
    }

    fn global_style<'a>(
        &'a self,
        pick: impl Fn(&'a TokenStyle) -> Option<&'a str>,
    ) -> Option<&'a str> {
        self.settings
            .iter()
            .filter(|rule| rule.scope.is_none())
            .find_map(|rule| pick(&rule.settings))
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Merge
// ─────────────────────────────────────────────────────────────────────────────

/// Merge a child theme over its parent.
///
/// Scalar fields take the child's value (the child's `name` wins when
/// non-empty). `colors` maps merge key-by-key with the child overriding.
/// `tokenColors` and legacy `settings` sequences concatenate with the
/// parent's rules first, so downstream rule matching lets the child
/// override. The `include` key never survives a merge.
pub fn merge_themes(parent: ThemeDefinition, child: ThemeDefinition) -> ThemeDefinition {
    let name = if child.name.is_empty() {
        parent.name
    } else {
        child.name
    };

    let mut colors = parent.colors;
    colors.extend(child.colors);

    let mut token_colors = parent.token_colors;
    token_colors.extend(child.token_colors);

    let mut settings = parent.settings;
    settings.extend(child.settings);

    ThemeDefinition {
        name,
        include: None,
        colors,
        token_colors,
        settings,
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
