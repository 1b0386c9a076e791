//! Theme resolution from installed host contributions
//!
//! Locates a theme file among installed extension descriptors, parses the
//! relaxed JSON dialect theme files are written in (comments and trailing
//! commas tolerated), and resolves parent/child `include` chains with a
//! bounded depth. Resolution failures never escape `resolve_active_theme`;
//! callers fall back to a built-in default instead.

use crate::error::{Error, Result};
use crate::theme::{merge_themes, ThemeDefinition};
use log::{debug, warn};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

// ─────────────────────────────────────────────────────────────────────────────
// Contribution Lookup
// ─────────────────────────────────────────────────────────────────────────────

/// One installed extension: its root directory and parsed manifest.
#[derive(Debug, Clone, Default)]
pub struct ExtensionInfo {
    pub path: PathBuf,
    pub manifest: ExtensionManifest,
}

/// The slice of an extension manifest this tool cares about.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ExtensionManifest {
    pub contributes: Contributes,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Contributes {
    pub themes: Vec<ThemeContributionDecl>,
}

/// A single declared theme: id and/or label, plus the theme file path
/// relative to the extension root.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ThemeContributionDecl {
    pub id: Option<String>,
    pub label: Option<String>,
    pub path: String,
}

/// A resolved pointer to a theme file on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ThemeContribution {
    pub extension_path: PathBuf,
    pub theme_path: PathBuf,
}

/// Find the contribution matching a requested theme identifier.
///
/// Extensions are scanned in their given order, each declaration list in
/// declared order; the first match wins. A declaration matches on its `id`,
/// or on its `label` only when no `id` is declared.
pub fn find_theme_contribution(
    extensions: &[ExtensionInfo],
    theme_id: &str,
) -> Option<ThemeContribution> {
    for ext in extensions {
        for decl in &ext.manifest.contributes.themes {
            let matched = match &decl.id {
                Some(id) => id == theme_id,
                None => decl.label.as_deref() == Some(theme_id),
            };
            if matched {
                return Some(ThemeContribution {
                    extension_path: ext.path.clone(),
                    theme_path: ext.path.join(&decl.path),
                });
            }
        }
    }
    None
}

// ─────────────────────────────────────────────────────────────────────────────
// Relaxed JSON Parsing
// ─────────────────────────────────────────────────────────────────────────────

/// Parse a theme file written in the relaxed JSON dialect.
///
/// `//` and `/* */` comments and trailing commas are stripped outside string
/// literals; the remaining text must be structurally valid JSON.
pub fn parse_theme_json(text: &str) -> Result<ThemeDefinition> {
    let cleaned = strip_trailing_commas(&strip_comments(text));
    serde_json::from_str(&cleaned).map_err(|e| Error::ThemeParse {
        message: e.to_string(),
    })
}

/// Remove `//` and `/* */` comments, leaving string literals untouched.
/// Line comments keep their terminating newline so error line numbers from
/// the JSON parser stay meaningful.
fn strip_comments(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();
    let mut in_string = false;
    let mut escaped = false;

    while let Some(c) = chars.next() {
        if in_string {
            out.push(c);
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == '"' {
                in_string = false;
            }
            continue;
        }

        match c {
            '"' => {
                in_string = true;
                out.push(c);
            }
            '/' if chars.peek() == Some(&'/') => {
                for next in chars.by_ref() {
                    if next == '\n' {
                        out.push('\n');
                        break;
                    }
                }
            }
            '/' if chars.peek() == Some(&'*') => {
                chars.next();
                let mut prev = '\0';
                for next in chars.by_ref() {
                    if prev == '*' && next == '/' {
                        break;
                    }
                    prev = next;
                }
            }
            _ => out.push(c),
        }
    }

    out
}

/// Remove commas that directly precede a closing brace or bracket.
fn strip_trailing_commas(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut in_string = false;
    let mut escaped = false;

    for (i, c) in text.char_indices() {
        if in_string {
            out.push(c);
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == '"' {
                in_string = false;
            }
            continue;
        }

        match c {
            '"' => {
                in_string = true;
                out.push(c);
            }
            ',' => {
                let next = text[i + 1..].chars().find(|ch| !ch.is_whitespace());
                if !matches!(next, Some('}') | Some(']')) {
                    out.push(c);
                }
            }
            _ => out.push(c),
        }
    }

    out
}

// ─────────────────────────────────────────────────────────────────────────────
// Include Chain Loading
// ─────────────────────────────────────────────────────────────────────────────

/// Upper bound on `include` hops. A safety valve against cyclic include
/// graphs, not a meaningful domain limit.
const MAX_INCLUDE_DEPTH: usize = 10;

/// Load a theme file, recursively resolving its `include` chain.
///
/// The parent path is resolved relative to the including file's directory.
/// Child fields override parent fields per [`merge_themes`], and the
/// `include` key is stripped from the result.
pub fn load_theme_from_file(path: &Path) -> Result<ThemeDefinition> {
    load_with_depth(path, MAX_INCLUDE_DEPTH)
}

fn load_with_depth(path: &Path, remaining: usize) -> Result<ThemeDefinition> {
    if remaining == 0 {
        return Err(Error::IncludeChainTooDeep(path.to_path_buf()));
    }

    let text = fs::read_to_string(path)?;
    let mut theme = parse_theme_json(&text)?;

    if let Some(include) = theme.include.take() {
        let parent_path = path.parent().unwrap_or(Path::new("")).join(&include);
        debug!(
            "Theme '{}' includes '{}'",
            path.display(),
            parent_path.display()
        );
        let parent = load_with_depth(&parent_path, remaining - 1)?;
        theme = merge_themes(parent, theme);
    }

    Ok(theme)
}

// ─────────────────────────────────────────────────────────────────────────────
// Host Capabilities
// ─────────────────────────────────────────────────────────────────────────────

/// The two host capabilities active-theme resolution depends on. Everything
/// else in this module is pure and testable with fakes of this trait.
pub trait ThemeHost {
    /// The identifier of the host's currently active theme, if any.
    fn active_theme_id(&self) -> Option<String>;

    /// Installed extension descriptors, in the host's declaration order.
    fn installed_extensions(&self) -> Vec<ExtensionInfo>;
}

/// A host backed by an on-disk extensions directory, where each extension is
/// a subdirectory carrying a `package.json` manifest.
pub struct DiskThemeHost {
    extensions_dir: PathBuf,
    active_theme: Option<String>,
}

impl DiskThemeHost {
    pub fn new(extensions_dir: PathBuf, active_theme: Option<String>) -> Self {
        Self {
            extensions_dir,
            active_theme,
        }
    }
}

impl ThemeHost for DiskThemeHost {
    fn active_theme_id(&self) -> Option<String> {
        self.active_theme.clone()
    }

    fn installed_extensions(&self) -> Vec<ExtensionInfo> {
        let entries = match fs::read_dir(&self.extensions_dir) {
            Ok(entries) => entries,
            Err(err) => {
                debug!(
                    "Cannot read extensions directory '{}': {}",
                    self.extensions_dir.display(),
                    err
                );
                return Vec::new();
            }
        };

        let mut dirs: Vec<PathBuf> = entries
            .filter_map(|e| e.ok())
            .map(|e| e.path())
            .filter(|p| p.is_dir())
            .collect();
        // Directory iteration order is platform-dependent; sort for a stable
        // scan order.
        dirs.sort();

        let mut extensions = Vec::new();
        for dir in dirs {
            let manifest_path = dir.join("package.json");
            let Ok(text) = fs::read_to_string(&manifest_path) else {
                continue;
            };
            match serde_json::from_str::<ExtensionManifest>(&text) {
                Ok(manifest) => extensions.push(ExtensionInfo {
                    path: dir,
                    manifest,
                }),
                Err(err) => {
                    debug!("Skipping unparsable manifest '{}': {}", manifest_path.display(), err);
                }
            }
        }
        extensions
    }
}

/// Resolve the host's active theme to a fully merged definition.
///
/// Returns `None` (never an error) when the host declares no active theme,
/// no contribution matches, or loading fails for any reason. The resolved
/// theme always carries a name; when the file declares none, the requested
/// identifier is substituted.
pub fn resolve_active_theme(host: &dyn ThemeHost) -> Option<ThemeDefinition> {
    let id = host.active_theme_id()?;
    let extensions = host.installed_extensions();

    let contribution = match find_theme_contribution(&extensions, &id) {
        Some(c) => c,
        None => {
            warn!("No installed theme contribution matches '{}'", id);
            return None;
        }
    };

    match load_theme_from_file(&contribution.theme_path) {
        Ok(mut theme) => {
            if theme.name.is_empty() {
                theme.name = id;
            }
            Some(theme)
        }
        Err(err) => {
            warn!("Failed to load theme '{}': {}", id, err);
            None
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
