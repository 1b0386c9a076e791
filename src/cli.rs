//! Command-line interface for code2html
//!
//! Arguments layer over the stored configuration: every flag given here
//! overrides the corresponding setting for this invocation only (unless
//! `--save-defaults` persists the result).

use crate::config::ShowFilePath;
use clap::Parser;
use std::path::PathBuf;
use std::str::FromStr;

// ─────────────────────────────────────────────────────────────────────────────
// Line Ranges
// ─────────────────────────────────────────────────────────────────────────────

/// An inclusive 1-based line range, written `START-END` or just `START`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineRange {
    pub start: u32,
    pub end: u32,
}

impl FromStr for LineRange {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (start, end) = match s.split_once('-') {
            Some((a, b)) => (a, b),
            None => (s, s),
        };
        let parse = |v: &str| {
            v.trim()
                .parse::<u32>()
                .map_err(|_| format!("'{}' is not a line number", v.trim()))
        };
        let range = LineRange {
            start: parse(start)?,
            end: parse(end)?,
        };
        if range.start < 1 {
            return Err("line numbers start at 1".to_string());
        }
        Ok(range)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Arguments
// ─────────────────────────────────────────────────────────────────────────────

/// Convert source code to themed, self-contained HTML.
#[derive(Parser, Debug)]
#[command(name = "code2html", version, about)]
pub struct Cli {
    /// Files to render, in output order
    pub files: Vec<PathBuf>,

    /// Theme: a built-in name, a path to a theme JSON file, or "active"
    #[arg(short, long)]
    pub theme: Option<String>,

    /// Number each line
    #[arg(short = 'n', long)]
    pub line_numbers: bool,

    /// Draw a rounded border around each code block
    #[arg(short, long)]
    pub border: bool,

    /// Wrap long lines instead of scrolling horizontally
    #[arg(short, long)]
    pub word_wrap: bool,

    /// File label above each block: filename, relative, absolute, or none
    #[arg(long, value_name = "MODE")]
    pub show_file_path: Option<ShowFilePath>,

    /// Force a language instead of detecting from the path
    #[arg(short, long, value_name = "LANG")]
    pub language: Option<String>,

    /// Render only this 1-based line range (single file only), e.g. 10-20
    #[arg(long, value_name = "START-END")]
    pub lines: Option<LineRange>,

    /// Base directory for relative file labels
    #[arg(long, value_name = "DIR")]
    pub workspace_root: Option<PathBuf>,

    /// Open the result in a browser preview instead of copying
    #[arg(short, long)]
    pub preview: bool,

    /// Print the HTML to stdout instead of copying
    #[arg(long)]
    pub stdout: bool,

    /// Persist the effective options as the new defaults
    #[arg(long)]
    pub save_defaults: bool,
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_minimal_invocation() {
        let cli = Cli::try_parse_from(["code2html", "src/main.rs"]).unwrap();
        assert_eq!(cli.files, vec![PathBuf::from("src/main.rs")]);
        assert!(!cli.line_numbers);
        assert!(!cli.preview);
        assert_eq!(cli.theme, None);
    }

    #[test]
    fn test_parse_full_invocation() {
        let cli = Cli::try_parse_from([
            "code2html",
            "-n",
            "--border",
            "--word-wrap",
            "--theme",
            "dracula",
            "--show-file-path",
            "relative",
            "--workspace-root",
            "/work",
            "a.rs",
            "b.rs",
        ])
        .unwrap();
        assert!(cli.line_numbers);
        assert!(cli.border);
        assert!(cli.word_wrap);
        assert_eq!(cli.theme.as_deref(), Some("dracula"));
        assert_eq!(cli.show_file_path, Some(ShowFilePath::Relative));
        assert_eq!(cli.files.len(), 2);
    }

    #[test]
    fn test_parse_lines_range() {
        let cli = Cli::try_parse_from(["code2html", "--lines", "10-20", "a.rs"]).unwrap();
        assert_eq!(
            cli.lines,
            Some(LineRange {
                start: 10,
                end: 20
            })
        );
    }

    #[test]
    fn test_parse_single_line() {
        let range: LineRange = "7".parse().unwrap();
        assert_eq!(range, LineRange { start: 7, end: 7 });
    }

    #[test]
    fn test_line_range_rejects_garbage() {
        assert!("abc".parse::<LineRange>().is_err());
        assert!("10-x".parse::<LineRange>().is_err());
        assert!("0-5".parse::<LineRange>().is_err());
    }

    #[test]
    fn test_invalid_show_file_path_rejected() {
        assert!(Cli::try_parse_from(["code2html", "--show-file-path", "sideways", "a.rs"])
            .is_err());
    }
}
