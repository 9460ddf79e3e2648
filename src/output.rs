//! CLI output formatting.
//!
//! Logging (via `tracing`) carries the per-unit diagnostics; this module
//! renders the human-facing inventory printed after `check` and `build`.
//!
//! # Output Format
//!
//! ## Check
//!
//! ```text
//! Tree
//! /
//!     001 README.md
//! /src
//!     001 app.js
//!     002 style.css
//!
//! 2 directories, 3 files
//! ```
//!
//! ## Build
//!
//! ```text
//! Artifacts
//! 001 /README.md → __SLASH__README.md.html
//! 002 /src/app.js → __SLASH__src__SLASH__app.js.html
//!
//! Failed
//! 001 /src/blob.bin (read): read failed: stream did not contain valid UTF-8
//!
//! Support files
//!     tree.js: written
//!     highlight.css: written
//!
//! Generated 2 artifacts, 1 failed
//! ```
//!
//! # Architecture
//!
//! Each view has a `format_*` function (returns `Vec<String>`) for
//! testability and a `print_*` wrapper that writes to stdout. Format
//! functions are pure — no I/O, no side effects.

use crate::config::SiteConfig;
use crate::generate::BuildReport;
use crate::naming::relative_key;
use crate::tree::NavigationTree;
use std::path::Path;

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

/// Return indentation string: 4 spaces per depth level.
fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

fn display_relative(path: &Path, root: &Path) -> String {
    relative_key(path, root).unwrap_or_else(|| path.display().to_string())
}

fn written_marker(written: bool) -> &'static str {
    if written { "written" } else { "skipped" }
}

// ============================================================================
// Check
// ============================================================================

/// Format the navigation tree: one header per directory, children indented.
pub fn format_tree(tree: &NavigationTree) -> Vec<String> {
    let mut lines = vec!["Tree".to_string()];
    for (dir, children) in tree.iter() {
        lines.push(dir.to_string());
        for (i, child) in children.iter().enumerate() {
            lines.push(format!("{}{} {}", indent(1), format_index(i + 1), child));
        }
    }
    lines.push(String::new());
    lines.push(format!(
        "{} directories, {} files",
        tree.dir_count(),
        tree.file_count()
    ));
    lines
}

pub fn print_tree(tree: &NavigationTree) {
    for line in format_tree(tree) {
        println!("{}", line);
    }
}

// ============================================================================
// Build
// ============================================================================

/// Format the build report: artifacts, failures, support files, summary.
pub fn format_build_report(report: &BuildReport, config: &SiteConfig) -> Vec<String> {
    let mut lines = Vec::new();

    if !report.written.is_empty() {
        lines.push("Artifacts".to_string());
        for (i, artifact) in report.written.iter().enumerate() {
            lines.push(format!(
                "{} {} \u{2192} {}",
                format_index(i + 1),
                display_relative(&artifact.source, &report.root),
                artifact.output_name
            ));
        }
    }

    if !report.failed.is_empty() {
        if !lines.is_empty() {
            lines.push(String::new());
        }
        lines.push("Failed".to_string());
        for (i, failure) in report.failed.iter().enumerate() {
            lines.push(format!(
                "{} {} ({}): {}",
                format_index(i + 1),
                display_relative(&failure.path, &report.root),
                failure.error.stage(),
                failure.error
            ));
        }
    }

    if !lines.is_empty() {
        lines.push(String::new());
    }
    lines.push("Support files".to_string());
    lines.push(format!(
        "{}{}: {}",
        indent(1),
        config.tree.script,
        written_marker(report.tree_written)
    ));
    lines.push(format!(
        "{}{}: {}",
        indent(1),
        config.highlight.stylesheet,
        written_marker(report.stylesheet_written)
    ));

    lines.push(String::new());
    lines.push(format!(
        "Generated {} artifacts, {} failed",
        report.succeeded(),
        report.failed_count()
    ));
    lines
}

pub fn print_build_report(report: &BuildReport, config: &SiteConfig) {
    for line in format_build_report(report, config) {
        println!("{}", line);
    }
}

// ============================================================================
// Tests
// ============================================================================
