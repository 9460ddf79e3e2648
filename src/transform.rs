//! Content transformation: file text in, HTML fragment out.
//!
//! [`ContentTransformer`] dispatches on [`ContentKind`] to one of two
//! collaborators:
//!
//! - [`MarkdownRenderer`] — markdown to HTML, returned verbatim.
//! - [`Highlighter`] — source text plus an optional language hint to a
//!   highlighted HTML fragment. With no hint the highlighter detects the
//!   language itself.
//!
//! Both collaborators are plain values built once per run and handed to the
//! transformer, so tests can swap in mocks (see `tests::MockHighlighter`).
//! They must be `Sync` because the pipeline calls them from rayon workers.
//!
//! The production pair is [`CmarkRenderer`] (pulldown-cmark) and
//! [`SyntectHighlighter`] (syntect, class-based output). Class-based output
//! keeps the artifacts theme-independent; [`theme_stylesheet`] produces the
//! matching CSS once per build.

use crate::classify::ContentKind;
use maud::{PreEscaped, html};
use pulldown_cmark::{Options, Parser, html as md_html};
use syntect::highlighting::ThemeSet;
use syntect::html::{ClassStyle, ClassedHTMLGenerator, css_for_theme_with_class_style};
use syntect::parsing::{SyntaxReference, SyntaxSet};
use syntect::util::LinesWithEndings;
use thiserror::Error;
use tracing::debug;

#[derive(Error, Debug)]
pub enum TransformError {
    #[error("highlighting failed: {0}")]
    Highlight(#[from] syntect::Error),
    #[error("unknown highlight theme: {0}")]
    UnknownTheme(String),
    #[error("{0}")]
    Collaborator(String),
}

/// Markdown to HTML.
pub trait MarkdownRenderer: Sync {
    fn render(&self, markdown: &str) -> Result<String, TransformError>;
}

/// Highlighted fragment plus the language it was highlighted as.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Highlighted {
    pub html: String,
    pub language: String,
}

/// Source text to a highlighted HTML fragment.
pub trait Highlighter: Sync {
    /// Highlight `source`. `hint` forces the language; `None` means detect.
    fn highlight(&self, source: &str, hint: Option<&str>) -> Result<Highlighted, TransformError>;
}

impl<T: MarkdownRenderer + ?Sized> MarkdownRenderer for &T {
    fn render(&self, markdown: &str) -> Result<String, TransformError> {
        (**self).render(markdown)
    }
}

impl<T: Highlighter + ?Sized> Highlighter for &T {
    fn highlight(&self, source: &str, hint: Option<&str>) -> Result<Highlighted, TransformError> {
        (**self).highlight(source, hint)
    }
}

/// pulldown-cmark with its default (CommonMark) option set.
#[derive(Debug, Clone)]
pub struct CmarkRenderer {
    options: Options,
}

impl CmarkRenderer {
    pub fn new() -> Self {
        Self {
            options: Options::empty(),
        }
    }
}

impl Default for CmarkRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl MarkdownRenderer for CmarkRenderer {
    fn render(&self, markdown: &str) -> Result<String, TransformError> {
        let parser = Parser::new_ext(markdown, self.options);
        let mut out = String::with_capacity(markdown.len() * 3 / 2);
        md_html::push_html(&mut out, parser);
        Ok(out)
    }
}

/// syntect highlighter over the bundled syntax definitions.
///
/// Output is `<pre class="highlight" data-lang="…"><code>…</code></pre>`
/// with one `<span class="…">` per scope, e.g. `<span class="source js">`.
pub struct SyntectHighlighter {
    syntaxes: SyntaxSet,
}

impl SyntectHighlighter {
    pub fn new() -> Self {
        Self {
            syntaxes: SyntaxSet::load_defaults_newlines(),
        }
    }

    /// Hint first, then first-line detection (shebangs, `<?xml`,
    /// modelines), then plain text.
    ///
    /// A hint only counts when it names the grammar or its primary
    /// extension. The bundled set has no Sass grammar and Ruby Haml lists
    /// `sass` as a secondary extension, so `sass` falls through to detection.
    fn resolve_syntax(&self, source: &str, hint: Option<&str>) -> &SyntaxReference {
        hint.and_then(|h| {
            self.syntaxes
                .find_syntax_by_token(h)
                .filter(|syntax| hint_matches(syntax, h))
        })
        .or_else(|| self.syntaxes.find_syntax_by_first_line(source))
        .unwrap_or_else(|| self.syntaxes.find_syntax_plain_text())
    }
}

fn hint_matches(syntax: &SyntaxReference, hint: &str) -> bool {
    syntax.name.eq_ignore_ascii_case(hint)
        || syntax
            .file_extensions
            .first()
            .is_some_and(|ext| ext.eq_ignore_ascii_case(hint))
}

impl Default for SyntectHighlighter {
    fn default() -> Self {
        Self::new()
    }
}

impl Highlighter for SyntectHighlighter {
    fn highlight(&self, source: &str, hint: Option<&str>) -> Result<Highlighted, TransformError> {
        let syntax = self.resolve_syntax(source, hint);
        let mut generator =
            ClassedHTMLGenerator::new_with_class_style(syntax, &self.syntaxes, ClassStyle::Spaced);
        for line in LinesWithEndings::from(source) {
            generator.parse_html_for_line_which_includes_newline(line)?;
        }
        let spans = generator.finalize();

        let fragment = html! {
            pre.highlight data-lang=(syntax.name) {
                code { (PreEscaped(spans)) }
            }
        };
        Ok(Highlighted {
            html: fragment.into_string(),
            language: syntax.name.clone(),
        })
    }
}

/// Class-based CSS for a bundled syntect theme.
pub fn theme_stylesheet(theme_name: &str) -> Result<String, TransformError> {
    let themes = ThemeSet::load_defaults();
    let theme = themes
        .themes
        .get(theme_name)
        .ok_or_else(|| TransformError::UnknownTheme(theme_name.to_string()))?;
    Ok(css_for_theme_with_class_style(theme, ClassStyle::Spaced)?)
}

/// Dispatches one file's text to the right collaborator.
pub struct ContentTransformer<M, H> {
    markdown: M,
    highlighter: H,
}

impl ContentTransformer<CmarkRenderer, SyntectHighlighter> {
    /// pulldown-cmark + syntect.
    pub fn standard() -> Self {
        Self::new(CmarkRenderer::new(), SyntectHighlighter::new())
    }
}

impl<M: MarkdownRenderer, H: Highlighter> ContentTransformer<M, H> {
    pub fn new(markdown: M, highlighter: H) -> Self {
        Self {
            markdown,
            highlighter,
        }
    }

    pub fn transform(&self, kind: ContentKind, raw_text: &str) -> Result<String, TransformError> {
        match kind {
            ContentKind::Markdown => self.markdown.render(raw_text),
            ContentKind::Highlight(hint) => {
                let highlighted = self.highlighter.highlight(raw_text, hint)?;
                debug!(hint = ?hint, language = %highlighted.language, "highlighted");
                Ok(highlighted.html)
            }
        }
    }
}
