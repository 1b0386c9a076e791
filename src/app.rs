//! Application coordinator for code2html
//!
//! Owns the two long-lived resources a render invocation touches: the
//! highlighter facade with its cached engine, and the preview panel with
//! its single surface. Both live here as plain fields, constructed lazily
//! and reset explicitly; there is no ambient global state. The host shell
//! (`main.rs`) drives one coordinator per process.

// Allow dead code - the coordinator exposes the full render/preview API
// (refresh, open checks) even where the one-shot CLI flow doesn't call it
#![allow(dead_code)]

use crate::config::{Settings, ACTIVE_THEME_SENTINEL};
use crate::error::{Error, Result};
use crate::highlight::{Highlighter, ThemeSelection};
use crate::html::{build_html, BuildOptions, FileEntry};
use crate::preview::PreviewPanel;
use crate::theme::{builtin, load_theme_from_file, resolve_active_theme, DiskThemeHost};
use log::warn;
use std::path::{Path, PathBuf};

// ─────────────────────────────────────────────────────────────────────────────
// App
// ─────────────────────────────────────────────────────────────────────────────

pub struct App {
    settings: Settings,
    highlighter: Highlighter,
    preview: PreviewPanel,
}

impl App {
    pub fn new(settings: Settings) -> Self {
        Self {
            settings,
            highlighter: Highlighter::new(),
            preview: PreviewPanel::new(),
        }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Switch the configured theme. The cached engine bakes its theme set
    /// in at construction, so a change drops it for reconstruction on the
    /// next render.
    pub fn set_theme(&mut self, theme: String) {
        if self.settings.theme != theme {
            self.settings.theme = theme;
            self.highlighter.reset();
        }
    }

    // ─────────────────────────────────────────────────────────────────────
    // Options
    // ─────────────────────────────────────────────────────────────────────

    /// Build fresh rendering options from the current settings.
    ///
    /// Resolves the configured theme value: the `"active"` sentinel goes
    /// through the host theme resolver (falling back to the default
    /// built-in theme with a warning), a built-in name stays a name, and
    /// anything naming an existing file loads as a materialized theme.
    pub fn build_options(&mut self) -> Result<BuildOptions> {
        let theme = self.resolve_theme_selection()?;
        Ok(BuildOptions {
            theme,
            line_numbers: self.settings.line_numbers,
            border: self.settings.border,
            word_wrap: self.settings.word_wrap,
            show_file_path: self.settings.show_file_path,
            workspace_root: self.settings.workspace_root.clone(),
            language_override: self.settings.language_override.clone(),
        })
    }

    fn resolve_theme_selection(&mut self) -> Result<ThemeSelection> {
        let configured = self.settings.theme.clone();

        if configured == ACTIVE_THEME_SENTINEL {
            let host = DiskThemeHost::new(
                self.settings.extensions_dir.clone().unwrap_or_else(|| PathBuf::from(".")),
                self.settings.active_theme.clone(),
            );
            return Ok(match resolve_active_theme(&host) {
                Some(definition) => ThemeSelection::Custom(definition),
                None => {
                    warn!(
                        "Could not resolve the active theme; falling back to '{}'",
                        builtin::DEFAULT_THEME
                    );
                    ThemeSelection::named(builtin::DEFAULT_THEME)
                }
            });
        }

        if builtin::find(&configured).is_some() {
            return Ok(ThemeSelection::Named(configured));
        }

        let path = Path::new(&configured);
        if path.extension().is_some_and(|ext| ext == "json") || path.exists() {
            return Ok(ThemeSelection::Custom(load_theme_from_file(path)?));
        }

        Err(Error::UnknownTheme(configured))
    }

    // ─────────────────────────────────────────────────────────────────────
    // Rendering
    // ─────────────────────────────────────────────────────────────────────

    /// Compose the final HTML fragment for the given entries.
    pub fn render(&mut self, entries: &[FileEntry], options: &BuildOptions) -> Result<String> {
        build_html(entries, options, &mut self.highlighter)
    }

    /// Render and show in the preview surface. The refresh callback the
    /// surface stores re-renders the same entries with the same options.
    pub fn show_preview(
        &mut self,
        entries: &[FileEntry],
        options: &BuildOptions,
        title: &str,
    ) -> Result<()> {
        let html = self.render(entries, options)?;

        let entries_owned = entries.to_vec();
        let options_owned = options.clone();
        let refresh = Box::new(move || {
            let mut highlighter = Highlighter::new();
            build_html(&entries_owned, &options_owned, &mut highlighter)
        });

        self.preview.show(&html, refresh, title)
    }

    /// Regenerate the open preview, if any.
    pub fn refresh_preview(&mut self) -> Result<()> {
        self.preview.refresh()
    }

    pub fn preview_open(&self) -> bool {
        self.preview.is_open()
    }

    #[cfg(test)]
    fn engine_initialized(&self) -> bool {
        self.highlighter.is_initialized()
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn app_with_theme(theme: &str) -> App {
        App::new(Settings {
            theme: theme.to_string(),
            ..Settings::default()
        })
    }

    #[test]
    fn test_build_options_with_builtin_theme() {
        let mut app = app_with_theme("dracula");
        let options = app.build_options().unwrap();
        assert_eq!(options.theme, ThemeSelection::named("dracula"));
    }

    #[test]
    fn test_build_options_unknown_theme_errors() {
        let mut app = app_with_theme("definitely-not-a-theme");
        let err = app.build_options().unwrap_err();
        assert!(matches!(err, Error::UnknownTheme(_)));
    }

    #[test]
    fn test_build_options_theme_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("custom.json");
        fs::write(
            &path,
            r##"{"name": "custom", "colors": {"editor.background": "#123123"}}"##,
        )
        .unwrap();

        let mut app = app_with_theme(path.to_str().unwrap());
        let options = app.build_options().unwrap();
        match options.theme {
            ThemeSelection::Custom(def) => {
                assert_eq!(def.name, "custom");
                assert_eq!(def.background(), Some("#123123"));
            }
            other => panic!("expected custom theme, got {:?}", other),
        }
    }

    #[test]
    fn test_active_sentinel_falls_back_to_default() {
        let mut app = App::new(Settings {
            theme: ACTIVE_THEME_SENTINEL.to_string(),
            extensions_dir: Some(PathBuf::from("/no/extensions/here")),
            active_theme: Some("Ghost Theme".to_string()),
            ..Settings::default()
        });
        let options = app.build_options().unwrap();
        assert_eq!(options.theme, ThemeSelection::named(builtin::DEFAULT_THEME));
    }

    #[test]
    fn test_active_sentinel_resolves_installed_theme() {
        let dir = TempDir::new().unwrap();
        let ext = dir.path().join("acme.mytheme");
        fs::create_dir_all(ext.join("themes")).unwrap();
        fs::write(
            ext.join("package.json"),
            r#"{"contributes": {"themes": [{"id": "My Theme", "path": "themes/my.json"}]}}"#,
        )
        .unwrap();
        fs::write(
            ext.join("themes/my.json"),
            r##"{"name": "My Theme", "colors": {"editor.background": "#010203"}}"##,
        )
        .unwrap();

        let mut app = App::new(Settings {
            theme: ACTIVE_THEME_SENTINEL.to_string(),
            extensions_dir: Some(dir.path().to_path_buf()),
            active_theme: Some("My Theme".to_string()),
            ..Settings::default()
        });
        let options = app.build_options().unwrap();
        match options.theme {
            ThemeSelection::Custom(def) => assert_eq!(def.background(), Some("#010203")),
            other => panic!("expected custom theme, got {:?}", other),
        }
    }

    #[test]
    fn test_render_end_to_end() {
        let mut app = app_with_theme("github-dark");
        let options = app.build_options().unwrap();
        let entries = vec![FileEntry::new("/tmp/demo.rs", "fn main() {}")];
        let html = app.render(&entries, &options).unwrap();
        assert!(html.starts_with("<div "));
        assert!(html.ends_with("</div>"));
        assert!(html.contains("fn"));
    }

    #[test]
    fn test_set_theme_resets_engine() {
        let mut app = app_with_theme("github-dark");
        let options = app.build_options().unwrap();
        let entries = vec![FileEntry::new("/tmp/demo.py", "x = 1")];
        app.render(&entries, &options).unwrap();
        assert!(app.engine_initialized());

        app.set_theme("nord".to_string());
        assert!(!app.engine_initialized());

        // Same theme again is a no-op and must not drop the engine
        let options = app.build_options().unwrap();
        app.render(&entries, &options).unwrap();
        assert!(app.engine_initialized());
        app.set_theme("nord".to_string());
        assert!(app.engine_initialized());
    }

    #[test]
    fn test_no_preview_open_initially() {
        let app = app_with_theme("github-dark");
        assert!(!app.preview_open());
    }
}
