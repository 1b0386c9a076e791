//! Built-in theme definitions
//!
//! The fixed theme set the highlighting engine is constructed with. Each
//! palette is a materialized [`ThemeDefinition`] carrying the workbench
//! background/foreground and an ordered token-scope rule list, mirroring the
//! upstream palettes these themes are named after.

// Allow dead code - the palette API is wider than the render path calls
#![allow(dead_code)]

use super::{Scope, ThemeDefinition, ThemeRule, TokenStyle};
use std::collections::BTreeMap;

/// Theme used when nothing else is configured or resolution fails.
pub const DEFAULT_THEME: &str = "github-dark";

// ─────────────────────────────────────────────────────────────────────────────
// Construction Helpers
// ─────────────────────────────────────────────────────────────────────────────

/// Scope selectors shared by every built-in palette, paired per-theme with
/// a foreground color and an optional font style.
const RULE_SCOPES: &[&str] = &[
    "comment, punctuation.definition.comment",
    "string, punctuation.definition.string",
    "keyword, storage",
    "entity.name.function, support.function",
    "constant.numeric, constant.language, constant.character",
    "entity.name.type, entity.name.class, support.type, support.class",
];

/// One palette: foreground per [`RULE_SCOPES`] entry plus a font style slot.
struct Palette {
    name: &'static str,
    background: &'static str,
    foreground: &'static str,
    /// (color, font_style) per scope group, in `RULE_SCOPES` order.
    rules: [(&'static str, Option<&'static str>); 6],
}

const PALETTES: &[Palette] = &[
    Palette {
        name: "github-dark",
        background: "#24292e",
        foreground: "#e1e4e8",
        rules: [
            ("#6a737d", Some("italic")),
            ("#9ecbff", None),
            ("#f97583", None),
            ("#b392f0", None),
            ("#79b8ff", None),
            ("#b392f0", None),
        ],
    },
    Palette {
        name: "github-light",
        background: "#ffffff",
        foreground: "#24292e",
        rules: [
            ("#6a737d", Some("italic")),
            ("#032f62", None),
            ("#d73a49", None),
            ("#6f42c1", None),
            ("#005cc5", None),
            ("#6f42c1", None),
        ],
    },
    Palette {
        name: "dracula",
        background: "#282a36",
        foreground: "#f8f8f2",
        rules: [
            ("#6272a4", None),
            ("#f1fa8c", None),
            ("#ff79c6", None),
            ("#50fa7b", None),
            ("#bd93f9", None),
            ("#8be9fd", Some("italic")),
        ],
    },
    Palette {
        name: "nord",
        background: "#2e3440",
        foreground: "#d8dee9",
        rules: [
            ("#616e88", None),
            ("#a3be8c", None),
            ("#81a1c1", None),
            ("#88c0d0", None),
            ("#b48ead", None),
            ("#8fbcbb", None),
        ],
    },
    Palette {
        name: "one-dark-pro",
        background: "#282c34",
        foreground: "#abb2bf",
        rules: [
            ("#5c6370", Some("italic")),
            ("#98c379", None),
            ("#c678dd", None),
            ("#61afef", None),
            ("#d19a66", None),
            ("#e5c07b", None),
        ],
    },
    Palette {
        name: "monokai",
        background: "#272822",
        foreground: "#f8f8f2",
        rules: [
            ("#75715e", None),
            ("#e6db74", None),
            ("#f92672", None),
            ("#a6e22e", None),
            ("#ae81ff", None),
            ("#66d9ef", Some("italic")),
        ],
    },
    Palette {
        name: "solarized-dark",
        background: "#002b36",
        foreground: "#839496",
        rules: [
            ("#586e75", Some("italic")),
            ("#2aa198", None),
            ("#859900", None),
            ("#268bd2", None),
            ("#d33682", None),
            ("#b58900", None),
        ],
    },
    Palette {
        name: "solarized-light",
        background: "#fdf6e3",
        foreground: "#657b83",
        rules: [
            ("#93a1a1", Some("italic")),
            ("#2aa198", None),
            ("#859900", None),
            ("#268bd2", None),
            ("#d33682", None),
            ("#b58900", None),
        ],
    },
    Palette {
        name: "night-owl",
        background: "#011627",
        foreground: "#d6deeb",
        rules: [
            ("#637777", Some("italic")),
            ("#ecc48d", None),
            ("#c792ea", None),
            ("#82aaff", None),
            ("#f78c6c", None),
            ("#ffcb8b", None),
        ],
    },
    Palette {
        name: "catppuccin-mocha",
        background: "#1e1e2e",
        foreground: "#cdd6f4",
        rules: [
            ("#6c7086", Some("italic")),
            ("#a6e3a1", None),
            ("#cba6f7", None),
            ("#89b4fa", None),
            ("#fab387", None),
            ("#f9e2af", None),
        ],
    },
];

impl Palette {
    fn to_definition(&self) -> ThemeDefinition {
        let mut colors = BTreeMap::new();
        colors.insert("editor.background".to_string(), self.background.to_string());
        colors.insert("editor.foreground".to_string(), self.foreground.to_string());

        let token_colors = RULE_SCOPES
            .iter()
            .zip(self.rules.iter())
            .map(|(scope, (color, style))| ThemeRule {
                scope: Some(Scope::One((*scope).to_string())),
                settings: TokenStyle {
                    foreground: Some((*color).to_string()),
                    background: None,
                    font_style: style.map(str::to_string),
                },
            })
            .collect();

        ThemeDefinition {
            name: self.name.to_string(),
            include: None,
            colors,
            token_colors,
            settings: Vec::new(),
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Public API
// ─────────────────────────────────────────────────────────────────────────────

/// All built-in theme definitions, in declaration order.
pub fn all() -> Vec<ThemeDefinition> {
    PALETTES.iter().map(Palette::to_definition).collect()
}

/// Look up a built-in theme by name.
pub fn find(name: &str) -> Option<ThemeDefinition> {
    PALETTES
        .iter()
        .find(|p| p.name == name)
        .map(Palette::to_definition)
}

/// The names of all built-in themes.
pub fn names() -> Vec<&'static str> {
    PALETTES.iter().map(|p| p.name).collect()
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_theme_exists() {
        assert!(find(DEFAULT_THEME).is_some());
    }

    #[test]
    fn test_known_theme_names() {
        let names = names();
        assert!(names.contains(&"github-dark"));
        assert!(names.contains(&"github-light"));
        assert!(names.contains(&"dracula"));
        assert!(names.contains(&"nord"));
        assert_eq!(names.len(), 10);
    }

    #[test]
    fn test_dracula_background() {
        let dracula = find("dracula").unwrap();
        assert_eq!(dracula.background(), Some("#282a36"));
    }

    #[test]
    fn test_unknown_name_is_none() {
        assert!(find("no-such-theme").is_none());
    }

    #[test]
    fn test_every_theme_is_complete() {
        for theme in all() {
            assert!(!theme.name.is_empty());
            assert!(theme.background().is_some(), "{} has no background", theme.name);
            assert!(theme.foreground().is_some(), "{} has no foreground", theme.name);
            assert_eq!(
                theme.token_colors.len(),
                RULE_SCOPES.len(),
                "{} rule count",
                theme.name
            );
            assert!(theme.include.is_none());
        }
    }

    #[test]
    fn test_light_and_dark_variants_differ() {
        let dark = find("github-dark").unwrap();
        let light = find("github-light").unwrap();
        assert_ne!(dark.background(), light.background());
    }
}
