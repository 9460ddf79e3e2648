//! File classification by extension.
//!
//! Every path maps to exactly one [`ContentKind`]. Markdown is rendered to
//! HTML; everything else is syntax-highlighted, either with a fixed language
//! hint for the handful of web formats we know about or with auto-detection.
//!
//! | Extension | Kind |
//! |-----------|------|
//! | `.md`     | `Markdown` |
//! | `.css`    | `Highlight(Some("css"))` |
//! | `.js`     | `Highlight(Some("js"))` |
//! | `.html`   | `Highlight(Some("html"))` |
//! | `.sass`   | `Highlight(Some("sass"))` |
//! | other     | `Highlight(None)` |
//!
//! Matching is case-insensitive: `README.MD` is markdown.

use std::path::Path;

/// How a file's contents get turned into HTML.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentKind {
    Markdown,
    /// Highlighted source; `None` means the highlighter picks the language.
    Highlight(Option<&'static str>),
}

const LANGUAGE_HINTS: &[(&str, &str)] = &[
    ("css", "css"),
    ("js", "js"),
    ("html", "html"),
    ("sass", "sass"),
];

/// Classify a path by its extension. Total: unknown or missing extensions
/// fall back to auto-detected highlighting.
pub fn classify(path: &Path) -> ContentKind {
    let ext = path
        .extension()
        .map(|e| e.to_string_lossy().to_lowercase())
        .unwrap_or_default();

    if ext == "md" {
        return ContentKind::Markdown;
    }

    let hint = LANGUAGE_HINTS
        .iter()
        .find(|(known, _)| *known == ext)
        .map(|(_, hint)| *hint);
    ContentKind::Highlight(hint)
}

/// Raw file text paired with its classification.
#[derive(Debug, Clone)]
pub struct ClassifiedContent {
    pub kind: ContentKind,
    pub raw_text: String,
}

impl ClassifiedContent {
    pub fn new(path: &Path, raw_text: String) -> Self {
        Self {
            kind: classify(path),
            raw_text,
        }
    }
}
