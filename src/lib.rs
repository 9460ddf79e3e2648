//! # Simple Docs
//!
//! A minimal static documentation generator for source trees. Point it at a
//! project directory and every file becomes one HTML page: markdown is
//! rendered, everything else is syntax highlighted. A small script describing
//! the directory tree is written alongside so a front end can build its own
//! navigation.
//!
//! # Architecture: Walk, Fold, Fan Out
//!
//! ```text
//! 1. Walk       source/   →  Vec<FileRecord>        (parallel, pruned, sorted)
//! 2. Fold       records   →  NavigationTree         → tree.js
//! 3. Name       records   →  flat artifact names    (collisions rejected)
//! 4. Render     per file  →  read → classify → transform → write
//! ```
//!
//! Steps 1 and 4 run on a rayon pool. Every file is its own unit of work: a
//! file that cannot be read, transformed, or written is logged and reported,
//! and its siblings carry on.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`scan`] | Parallel recursive walk with a directory prune set |
//! | [`tree`] | Folds walk records into the directory → children map and its init script |
//! | [`naming`] | Flattens nested paths into single artifact file names |
//! | [`classify`] | Markdown vs. highlightable text, with a language hint from the extension |
//! | [`transform`] | Markdown rendering (pulldown-cmark) and syntax highlighting (syntect) |
//! | [`generate`] | The build pipeline: snapshot, tree, names, per-file fan-out |
//! | [`config`] | `config.toml` loading, merging over stock defaults, validation |
//! | [`types`] | Records shared between stages (`FileRecord`, `Artifact`) |
//! | [`output`] | CLI output formatting for `check` and `build` |
//!
//! # Design Decisions
//!
//! ## One Flat Output Directory
//!
//! Artifacts are not nested. `src/app.js` becomes
//! `__SLASH__src__SLASH__app.js.html`, so the whole site is one directory
//! that a viewer can index without walking anything. The token is
//! configurable; see [`naming`].
//!
//! ## Tree From the Snapshot, Not From the Output
//!
//! The navigation tree is built from what the walk found, before any page
//! is rendered. A page that later fails to render still shows up in the
//! tree. The tree describes the project, not the build.
//!
//! ## Collaborators Behind Traits
//!
//! Markdown rendering and highlighting sit behind
//! [`transform::MarkdownRenderer`] and [`transform::Highlighter`]. The CLI
//! wires in pulldown-cmark and syntect; tests wire in mocks that record
//! what they were asked to do.
//!
//! ## Class-Based Highlighting
//!
//! Highlighted pages carry CSS classes, not inline colors. The theme lives
//! in one `highlight.css` generated from a syntect theme, so switching
//! themes never touches the pages.

pub mod classify;
pub mod config;
pub mod generate;
pub mod naming;
pub mod output;
pub mod scan;
pub mod transform;
pub mod tree;
pub mod types;

#[cfg(test)]
pub(crate) mod test_helpers;
