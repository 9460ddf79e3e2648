//! End-to-end builds through the public library API with the real
//! pulldown-cmark and syntect collaborators.
//!
//! Run with: cargo test --test build_pipeline

use simple_docs::config::SiteConfig;
use simple_docs::generate::{self, FileError};
use simple_docs::transform::{
    CmarkRenderer, ContentTransformer, Highlighted, Highlighter, SyntectHighlighter,
    TransformError,
};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

fn project(files: &[(&str, &str)]) -> TempDir {
    let tmp = TempDir::new().unwrap();
    for (rel, contents) in files {
        let path = tmp.path().join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, contents).unwrap();
    }
    tmp
}

fn output_files(dir: &Path) -> BTreeMap<String, Vec<u8>> {
    fs::read_dir(dir)
        .unwrap()
        .map(|e| e.unwrap())
        .map(|e| {
            (
                e.file_name().to_string_lossy().into_owned(),
                fs::read(e.path()).unwrap(),
            )
        })
        .collect()
}

fn read(dir: &Path, name: &str) -> String {
    fs::read_to_string(dir.join(name)).unwrap()
}

/// Delegates to syntect but refuses any source containing `BROKEN`.
struct Picky(SyntectHighlighter);

impl Highlighter for Picky {
    fn highlight(&self, source: &str, hint: Option<&str>) -> Result<Highlighted, TransformError> {
        if source.contains("BROKEN") {
            return Err(TransformError::Collaborator("refused".into()));
        }
        self.0.highlight(source, hint)
    }
}

// =========================================================================
// Artifacts
// =========================================================================

#[test]
fn markdown_and_code_become_flat_pages() {
    let src = project(&[
        ("README.md", "# Title\n\nSome *text*.\n"),
        ("src/app.js", "const x = 1;\n"),
        ("src/style.css", "body { color: red; }\n"),
    ]);
    let out = TempDir::new().unwrap();

    let report = generate::generate(src.path(), out.path(), &SiteConfig::default()).unwrap();

    assert_eq!(report.files_seen, 3);
    assert_eq!(report.succeeded(), 3);
    assert_eq!(report.failed_count(), 0);

    let readme = read(out.path(), "__SLASH__README.md.html");
    assert!(readme.contains("<h1>Title</h1>"));
    assert!(readme.contains("<em>text</em>"));

    let app = read(out.path(), "__SLASH__src__SLASH__app.js.html");
    assert!(app.contains(r#"<span class="source js">"#));
    assert!(app.contains(r#"data-lang="JavaScript""#));

    let css = read(out.path(), "__SLASH__src__SLASH__style.css.html");
    assert!(css.contains(r#"data-lang="CSS""#));
}

#[test]
fn unknown_extension_is_highlighted_not_rendered() {
    let src = project(&[("notes.txt", "# not a heading\n")]);
    let out = TempDir::new().unwrap();

    generate::generate(src.path(), out.path(), &SiteConfig::default()).unwrap();

    let page = read(out.path(), "__SLASH__notes.txt.html");
    assert!(!page.contains("<h1>"));
    assert!(page.contains("# not a heading"));
}

#[test]
fn tree_script_and_stylesheet_are_written() {
    let src = project(&[("README.md", "hi"), ("a/b/y.css", "a {}")]);
    let out = TempDir::new().unwrap();

    let report = generate::generate(src.path(), out.path(), &SiteConfig::default()).unwrap();

    assert!(report.tree_written);
    assert!(report.stylesheet_written);
    let script = read(out.path(), "tree.js");
    assert!(script.contains(r#"["tree:init",{"/":["README.md"],"/a/b":["y.css"]}]"#));
    assert!(read(out.path(), "highlight.css").contains("color"));
}

// =========================================================================
// Walk
// =========================================================================

#[test]
fn pruned_directories_produce_nothing() {
    let src = project(&[
        ("index.js", "1;"),
        ("node_modules/dep/index.js", "2;"),
        (".git/config", "[core]"),
        ("target/debug/out.txt", "bin"),
    ]);
    let out = TempDir::new().unwrap();

    let report = generate::generate(src.path(), out.path(), &SiteConfig::default()).unwrap();

    assert_eq!(report.files_seen, 1);
    let names: Vec<String> = output_files(out.path()).into_keys().collect();
    assert!(names.iter().all(|n| !n.contains("node_modules")));
    assert!(names.iter().all(|n| !n.contains(".git")));
    let script = read(out.path(), "tree.js");
    assert!(!script.contains("node_modules"));
    assert!(!script.contains("target"));
}

#[test]
fn default_output_inside_source_is_not_rescanned() {
    let src = project(&[("README.md", "# One"), ("docs/guide.md", "# Guide")]);
    let config = SiteConfig::default();
    let out = src.path().join(&config.output_dir);

    generate::generate(src.path(), &out, &config).unwrap();
    let second = generate::generate(src.path(), &out, &config).unwrap();

    assert_eq!(second.files_seen, 2);
    let script = read(&out, "tree.js");
    assert!(script.contains(r#"{"/":["README.md"],"/docs":["guide.md"]}"#));
    assert!(!script.contains(&config.output_dir));
    assert!(read(&out, "__SLASH__docs__SLASH__guide.md.html").contains("<h1>Guide</h1>"));
}

// =========================================================================
// Failure isolation
// =========================================================================

#[test]
fn failing_file_does_not_stop_siblings() {
    let src = project(&[
        ("good.js", "let ok = 1;"),
        ("bad.js", "BROKEN"),
        ("README.md", "# Fine"),
    ]);
    let out = TempDir::new().unwrap();
    let transformer =
        ContentTransformer::new(CmarkRenderer::new(), Picky(SyntectHighlighter::new()));

    let report =
        generate::generate_with(&transformer, src.path(), out.path(), &SiteConfig::default())
            .unwrap();

    assert_eq!(report.succeeded(), 2);
    assert_eq!(report.failed_count(), 1);
    assert!(report.failed[0].path.ends_with("bad.js"));
    assert!(matches!(report.failed[0].error, FileError::Transform(_)));

    let files = output_files(out.path());
    assert!(files.contains_key("__SLASH__good.js.html"));
    assert!(files.contains_key("__SLASH__README.md.html"));
    assert!(!files.contains_key("__SLASH__bad.js.html"));
    // The tree still lists the failed file.
    assert!(read(out.path(), "tree.js").contains("bad.js"));
}

#[test]
fn colliding_names_keep_the_first_path() {
    let src = project(&[
        ("x/y.md", "nested"),
        ("x__SLASH__y.md", "literal"),
    ]);
    let out = TempDir::new().unwrap();

    let report = generate::generate(src.path(), out.path(), &SiteConfig::default()).unwrap();

    assert_eq!(report.succeeded(), 1);
    assert_eq!(report.failed_count(), 1);
    assert!(matches!(report.failed[0].error, FileError::Naming(_)));
    assert!(report.failed[0].path.ends_with("x__SLASH__y.md"));
    assert!(read(out.path(), "__SLASH__x__SLASH__y.md.html").contains("nested"));
}

#[test]
fn missing_source_is_fatal() {
    let tmp = TempDir::new().unwrap();
    let result = generate::generate(
        &tmp.path().join("nope"),
        &tmp.path().join("out"),
        &SiteConfig::default(),
    );
    assert!(result.is_err());
}

// =========================================================================
// Determinism
// =========================================================================

#[test]
fn rebuild_is_byte_identical() {
    let src = project(&[
        ("README.md", "# Docs\n\n- one\n- two\n"),
        ("src/main.rs", "fn main() {}\n"),
        ("src/lib/util.py", "def f():\n    return 1\n"),
        ("web/index.html", "<p>hi</p>\n"),
        ("web/site.sass", "body\n  color: red\n"),
    ]);
    let first = TempDir::new().unwrap();
    let second = TempDir::new().unwrap();

    generate::generate(src.path(), first.path(), &SiteConfig::default()).unwrap();
    generate::generate(src.path(), second.path(), &SiteConfig::default()).unwrap();

    assert_eq!(output_files(first.path()), output_files(second.path()));
}
