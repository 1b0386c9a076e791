//! code2html - Main Entry Point
//!
//! Converts source-code files (or a line range of one file) into themed,
//! self-contained HTML and hands the result to the system clipboard, to
//! stdout, or to a browser preview.

mod app;
mod cli;
mod config;
mod error;
mod export;
mod files;
mod highlight;
mod html;
mod language;
mod preview;
mod theme;

use app::App;
use clap::Parser;
use cli::Cli;
use config::{load_config, save_config, Settings};
use error::{Error, Result};
use html::FileEntry;
use log::{error, info};
use std::process::ExitCode;

fn main() -> ExitCode {
    // Initialize logging
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();
    match run(cli) {
        Ok(summary) => {
            println!("{}", summary);
            ExitCode::SUCCESS
        }
        Err(err) => {
            // One user-visible message at the outermost boundary; nothing
            // below this point prints
            error!("{}", err);
            eprintln!("code2html failed: {}", err);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<String> {
    let mut settings = load_config();
    apply_overrides(&cli, &mut settings);

    if cli.files.is_empty() {
        return Err(Error::NothingToRender);
    }

    let (entries, skipped) = collect_entries(&cli)?;
    if skipped > 0 {
        info!("Skipped {} unreadable, binary, or oversize file(s)", skipped);
    }
    if entries.is_empty() {
        return Err(Error::NothingToRender);
    }

    let mut app = App::new(settings);
    if let Some(theme) = &cli.theme {
        app.set_theme(theme.clone());
    }
    let options = app.build_options()?;

    if cli.save_defaults {
        save_config(app.settings())?;
    }

    if cli.preview {
        app.show_preview(&entries, &options, "code2html preview")?;
        return Ok(summary_line("Previewing", &cli, entries.len(), skipped));
    }

    let html = app.render(&entries, &options)?;
    if cli.stdout {
        return Ok(html);
    }

    export::copy_html_to_clipboard(&html)?;
    Ok(summary_line("Copied", &cli, entries.len(), skipped))
}

/// CLI flags override stored settings for this invocation. The theme flag
/// is applied later through [`App::set_theme`] so an engine built for the
/// old theme would be dropped.
fn apply_overrides(cli: &Cli, settings: &mut Settings) {
    if cli.line_numbers {
        settings.line_numbers = true;
    }
    if cli.border {
        settings.border = true;
    }
    if cli.word_wrap {
        settings.word_wrap = true;
    }
    if let Some(mode) = cli.show_file_path {
        settings.show_file_path = mode;
    }
    if let Some(language) = &cli.language {
        settings.language_override = Some(language.clone());
    }
    if let Some(root) = &cli.workspace_root {
        settings.workspace_root = Some(root.clone());
    }
    settings.sanitize();
}

fn collect_entries(cli: &Cli) -> Result<(Vec<FileEntry>, usize)> {
    if let Some(range) = cli.lines {
        if cli.files.len() != 1 {
            return Err(Error::InvalidLineRange(
                "--lines applies to exactly one file".to_string(),
            ));
        }
        let entry = files::read_line_range(&cli.files[0], range.start, range.end)?;
        return Ok((vec![entry], 0));
    }
    Ok(files::collect_file_entries(&cli.files))
}

fn summary_line(verb: &str, cli: &Cli, count: usize, skipped: usize) -> String {
    let mut summary = if cli.lines.is_some() {
        format!("{} selection as HTML", verb)
    } else if count == 1 {
        format!("{} file as HTML", verb)
    } else {
        format!("{} {} files as HTML", verb, count)
    };
    if skipped > 0 {
        summary.push_str(&format!(" ({} skipped)", skipped));
    }
    summary
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ShowFilePath;
    use std::fs;
    use tempfile::TempDir;

    fn cli_from(args: &[&str]) -> Cli {
        Cli::try_parse_from(args).unwrap()
    }

    #[test]
    fn test_apply_overrides_flags_win() {
        let cli = cli_from(&[
            "code2html",
            "-n",
            "--show-file-path",
            "none",
            "--language",
            "rust",
            "a.rs",
        ]);
        let mut settings = Settings::default();
        apply_overrides(&cli, &mut settings);

        assert!(settings.line_numbers);
        assert_eq!(settings.show_file_path, ShowFilePath::None);
        assert_eq!(settings.language_override.as_deref(), Some("rust"));
    }

    #[test]
    fn test_apply_overrides_keeps_stored_values() {
        let cli = cli_from(&["code2html", "a.rs"]);
        let mut settings = Settings {
            border: true,
            ..Settings::default()
        };
        apply_overrides(&cli, &mut settings);
        assert!(settings.border);
    }

    #[test]
    fn test_apply_overrides_sanitizes_auto_language() {
        let cli = cli_from(&["code2html", "--language", "auto", "a.rs"]);
        let mut settings = Settings::default();
        apply_overrides(&cli, &mut settings);
        assert_eq!(settings.language_override, None);
    }

    #[test]
    fn test_collect_entries_reads_files() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("demo.rs");
        fs::write(&file, "fn main() {}").unwrap();

        let cli = cli_from(&["code2html", file.to_str().unwrap()]);
        let (entries, skipped) = collect_entries(&cli).unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(skipped, 0);
    }

    #[test]
    fn test_collect_entries_line_range_needs_single_file() {
        let cli = cli_from(&["code2html", "--lines", "1-2", "a.rs", "b.rs"]);
        let err = collect_entries(&cli).unwrap_err();
        assert!(matches!(err, Error::InvalidLineRange(_)));
    }

    #[test]
    fn test_summary_line_variants() {
        let one = cli_from(&["code2html", "a.rs"]);
        assert_eq!(summary_line("Copied", &one, 1, 0), "Copied file as HTML");

        let many = cli_from(&["code2html", "a.rs", "b.rs", "c.rs"]);
        assert_eq!(
            summary_line("Copied", &many, 2, 1),
            "Copied 2 files as HTML (1 skipped)"
        );

        let selection = cli_from(&["code2html", "--lines", "3-9", "a.rs"]);
        assert_eq!(
            summary_line("Copied", &selection, 1, 0),
            "Copied selection as HTML"
        );
    }
}
