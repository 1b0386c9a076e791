//! Language detection from file paths
//!
//! Maps a file path to a language identifier using filename and extension
//! rules only. Detection never reads file content and never fails: paths
//! that match nothing degrade to the `plaintext` sentinel, which the
//! highlighter renders as an uncolored block.

use std::path::Path;

// ─────────────────────────────────────────────────────────────────────────────
// Supported Language Set
// ─────────────────────────────────────────────────────────────────────────────

/// Sentinel returned for paths that match no known language.
pub const PLAIN_TEXT: &str = "plaintext";

/// A language the highlighting engine can render.
///
/// `id` is the canonical identifier detection returns; `engine_token` is the
/// lookup token the engine resolves the grammar with. They differ where the
/// engine's grammar set names things by extension (e.g. `rust` vs `rs`) or
/// where one grammar serves several identifiers (`typescript` renders with
/// the JavaScript grammar).
pub struct Language {
    pub id: &'static str,
    pub engine_token: &'static str,
}

/// The fixed set of languages the engine is constructed with.
///
/// Detection only ever returns identifiers from this table (or the
/// `plaintext` sentinel), so every detected language is renderable.
pub const SUPPORTED_LANGUAGES: &[Language] = &[
    Language { id: "bash", engine_token: "bash" },
    Language { id: "batch", engine_token: "bat" },
    Language { id: "c", engine_token: "c" },
    Language { id: "clojure", engine_token: "clj" },
    Language { id: "cpp", engine_token: "cpp" },
    Language { id: "csharp", engine_token: "cs" },
    Language { id: "css", engine_token: "css" },
    Language { id: "d", engine_token: "d" },
    Language { id: "diff", engine_token: "diff" },
    Language { id: "erlang", engine_token: "erl" },
    Language { id: "go", engine_token: "go" },
    Language { id: "graphviz", engine_token: "dot" },
    Language { id: "groovy", engine_token: "groovy" },
    Language { id: "haskell", engine_token: "hs" },
    Language { id: "html", engine_token: "html" },
    Language { id: "java", engine_token: "java" },
    Language { id: "javascript", engine_token: "js" },
    Language { id: "json", engine_token: "json" },
    Language { id: "latex", engine_token: "tex" },
    Language { id: "lisp", engine_token: "lisp" },
    Language { id: "lua", engine_token: "lua" },
    Language { id: "makefile", engine_token: "makefile" },
    Language { id: "markdown", engine_token: "md" },
    Language { id: "matlab", engine_token: "matlab" },
    Language { id: "objective-c", engine_token: "m" },
    Language { id: "ocaml", engine_token: "ml" },
    Language { id: "pascal", engine_token: "pas" },
    Language { id: "perl", engine_token: "pl" },
    Language { id: "php", engine_token: "php" },
    Language { id: "python", engine_token: "py" },
    Language { id: "r", engine_token: "r" },
    Language { id: "ruby", engine_token: "rb" },
    Language { id: "rust", engine_token: "rs" },
    Language { id: "scala", engine_token: "scala" },
    Language { id: "sql", engine_token: "sql" },
    Language { id: "tcl", engine_token: "tcl" },
    Language { id: "typescript", engine_token: "js" },
    Language { id: "xml", engine_token: "xml" },
    Language { id: "yaml", engine_token: "yaml" },
];

/// Look up a supported language by identifier.
pub fn find_language(id: &str) -> Option<&'static Language> {
    SUPPORTED_LANGUAGES.iter().find(|l| l.id == id)
}

/// Resolve the engine lookup token for a language identifier.
pub fn engine_token(id: &str) -> Option<&'static str> {
    find_language(id).map(|l| l.engine_token)
}

// ─────────────────────────────────────────────────────────────────────────────
// Detection Tables
// ─────────────────────────────────────────────────────────────────────────────

/// Canonical filenames (build and dependency manifests) mapped to languages.
const FILENAME_LANGUAGES: &[(&str, &str)] = &[
    ("brewfile", "ruby"),
    ("gemfile", "ruby"),
    ("gnumakefile", "makefile"),
    ("rakefile", "ruby"),
    ("sconstruct", "python"),
    ("vagrantfile", "ruby"),
];

/// Extensions whose language identifier differs from the extension itself.
const EXTENSION_ALIASES: &[(&str, &str)] = &[
    ("bat", "batch"),
    ("cc", "cpp"),
    ("cjs", "javascript"),
    ("clj", "clojure"),
    ("cljs", "clojure"),
    ("cmd", "batch"),
    ("cs", "csharp"),
    ("cts", "typescript"),
    ("cxx", "cpp"),
    ("dot", "graphviz"),
    ("el", "lisp"),
    ("erl", "erlang"),
    ("gemspec", "ruby"),
    ("gradle", "groovy"),
    ("gv", "graphviz"),
    ("h", "c"),
    ("hh", "cpp"),
    ("hpp", "cpp"),
    ("hrl", "erlang"),
    ("hs", "haskell"),
    ("htm", "html"),
    ("hxx", "cpp"),
    ("jsx", "javascript"),
    ("lhs", "haskell"),
    ("lsp", "lisp"),
    ("m", "objective-c"),
    ("mak", "makefile"),
    ("md", "markdown"),
    ("mdown", "markdown"),
    ("mjs", "javascript"),
    ("mk", "makefile"),
    ("ml", "ocaml"),
    ("mli", "ocaml"),
    ("mm", "objective-c"),
    ("mts", "typescript"),
    ("pas", "pascal"),
    ("patch", "diff"),
    ("pl", "perl"),
    ("plist", "xml"),
    ("pm", "perl"),
    ("pp", "pascal"),
    ("py", "python"),
    ("pyw", "python"),
    ("rb", "ruby"),
    ("rs", "rust"),
    ("scm", "lisp"),
    ("sh", "bash"),
    ("sty", "latex"),
    ("svg", "xml"),
    ("tex", "latex"),
    ("ts", "typescript"),
    ("tsx", "typescript"),
    ("xhtml", "html"),
    ("xsl", "xml"),
    ("yml", "yaml"),
    ("zsh", "bash"),
];

// ─────────────────────────────────────────────────────────────────────────────
// Detection
// ─────────────────────────────────────────────────────────────────────────────

/// Detect the language for a file path.
///
/// Rules apply in order, case-insensitively on both basename and extension:
///
/// 1. the bare filename matches a language identifier (e.g. `Makefile`);
/// 2. the bare filename matches the fixed filename table (e.g. `Gemfile`);
/// 3. the extension matches a language identifier directly (e.g. `.go`);
/// 4. the extension matches the alias table (e.g. `.rs`, `.hpp`, `.svg`);
/// 5. otherwise [`PLAIN_TEXT`].
pub fn detect(path: &Path) -> &'static str {
    let basename = path
        .file_name()
        .map(|n| n.to_string_lossy().to_lowercase())
        .unwrap_or_default();

    if let Some(lang) = find_language(&basename) {
        return lang.id;
    }

    if let Some((_, id)) = FILENAME_LANGUAGES.iter().find(|(name, _)| *name == basename) {
        return id;
    }

    let ext = match basename.rsplit_once('.') {
        Some((stem, ext)) if !stem.is_empty() => ext,
        _ => return PLAIN_TEXT,
    };

    if let Some(lang) = find_language(ext) {
        return lang.id;
    }

    if let Some((_, id)) = EXTENSION_ALIASES.iter().find(|(e, _)| *e == ext) {
        return id;
    }

    PLAIN_TEXT
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    fn detect_str(p: &str) -> &'static str {
        detect(Path::new(p))
    }

    #[test]
    fn test_detects_by_extension_alias() {
        assert_eq!(detect_str("/foo/bar.ts"), "typescript");
        assert_eq!(detect_str("/foo/bar.py"), "python");
        assert_eq!(detect_str("/foo/bar.rs"), "rust");
        assert_eq!(detect_str("/foo/bar.sh"), "bash");
    }

    #[test]
    fn test_detects_by_extension_as_id() {
        assert_eq!(detect_str("/foo/bar.go"), "go");
        assert_eq!(detect_str("/foo/bar.css"), "css");
        assert_eq!(detect_str("/foo/bar.json"), "json");
        assert_eq!(detect_str("/foo/bar.java"), "java");
    }

    #[test]
    fn test_detects_by_basename_language_id() {
        assert_eq!(detect_str("/foo/makefile"), "makefile");
        assert_eq!(detect_str("/foo/Makefile"), "makefile");
    }

    #[test]
    fn test_detects_by_filename_table() {
        assert_eq!(detect_str("/proj/Gemfile"), "ruby");
        assert_eq!(detect_str("/proj/Rakefile"), "ruby");
        assert_eq!(detect_str("/proj/Vagrantfile"), "ruby");
        assert_eq!(detect_str("/proj/GNUmakefile"), "makefile");
        assert_eq!(detect_str("/proj/SConstruct"), "python");
    }

    #[test]
    fn test_resolves_extension_aliases() {
        assert_eq!(detect_str("/foo/bar.htm"), "html");
        assert_eq!(detect_str("/foo/bar.mjs"), "javascript");
        assert_eq!(detect_str("/foo/bar.cjs"), "javascript");
        assert_eq!(detect_str("/foo/bar.mts"), "typescript");
        assert_eq!(detect_str("/foo/bar.cts"), "typescript");
        assert_eq!(detect_str("/foo/bar.cxx"), "cpp");
        assert_eq!(detect_str("/foo/bar.cc"), "cpp");
        assert_eq!(detect_str("/foo/bar.hpp"), "cpp");
        assert_eq!(detect_str("/foo/bar.h"), "c");
        assert_eq!(detect_str("/foo/bar.svg"), "xml");
    }

    #[test]
    fn test_unknown_extension_is_plaintext() {
        assert_eq!(detect_str("/foo/bar.xyz"), PLAIN_TEXT);
        assert_eq!(detect_str("/foo/bar"), PLAIN_TEXT);
        assert_eq!(detect_str("/foo/bar."), PLAIN_TEXT);
    }

    #[test]
    fn test_case_insensitive() {
        assert_eq!(detect_str("/foo/bar.TS"), "typescript");
        assert_eq!(detect_str("/foo/bar.PY"), "python");
        assert_eq!(detect_str("/foo/MAKEFILE"), "makefile");
    }

    #[test]
    fn test_dotfile_has_no_extension() {
        // A leading dot is not an extension separator
        assert_eq!(detect_str("/home/user/.gitignore"), PLAIN_TEXT);
    }

    #[test]
    fn test_only_last_extension_counts() {
        assert_eq!(detect_str("/foo/archive.tar.rs"), "rust");
        assert_eq!(detect_str("/foo/component.test.ts"), "typescript");
    }

    #[test]
    fn test_every_supported_language_has_engine_token() {
        for lang in SUPPORTED_LANGUAGES {
            assert!(!lang.engine_token.is_empty(), "no token for {}", lang.id);
        }
    }

    #[test]
    fn test_engine_token_lookup() {
        assert_eq!(engine_token("rust"), Some("rs"));
        assert_eq!(engine_token("typescript"), Some("js"));
        assert_eq!(engine_token("plaintext"), None);
        assert_eq!(engine_token("klingon"), None);
    }
}
