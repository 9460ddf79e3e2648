//! The build pipeline.
//!
//! Composes the other modules into one run over a source tree:
//!
//! ```text
//! 1. Walk       source/  →  snapshot of FileRecords (sorted)
//! 2. Tree       snapshot →  output/tree.js          (+ output/highlight.css)
//! 3. Name       snapshot →  one flat artifact name per record, collisions rejected
//! 4. Render     per file →  read → classify → transform → write, in parallel
//! ```
//!
//! ## Output Structure
//!
//! ```text
//! .simple-docs/
//! ├── tree.js                                  # navigation tree init script
//! ├── highlight.css                            # classes used by highlighted files
//! ├── __SLASH__README.md.html                  # one artifact per source file
//! ├── __SLASH__src__SLASH__app.js.html
//! └── ...
//! ```
//!
//! ## Failure isolation
//!
//! Only an unreadable source root or an uncreatable output directory stops a
//! build. Everything after that is per unit: the tree script and stylesheet
//! are each attempted once, and every file is read, transformed, and written
//! on its own. A unit that fails is logged, recorded in the [`BuildReport`],
//! and left out of the output; nothing is retried.
//!
//! The tree is built from the walk snapshot before any file is rendered, so
//! it lists every discovered file even if some of them later fail.
//!
//! ## Determinism
//!
//! The snapshot is sorted before use, so the tree script is identical across
//! runs over an unchanged tree, and so is every artifact.

use crate::classify::ClassifiedContent;
use crate::config::SiteConfig;
use crate::naming::{self, NameAssignment, NamingError};
use crate::scan::{self, ScanError};
use crate::transform::{
    ContentTransformer, Highlighter, MarkdownRenderer, TransformError, theme_stylesheet,
};
use crate::tree::NavigationTree;
use crate::types::{Artifact, FileRecord};
use rayon::prelude::*;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info, warn};

/// Errors that stop a build before any file is rendered.
#[derive(Error, Debug)]
pub enum GenerateError {
    #[error(transparent)]
    Scan(#[from] ScanError),
    #[error("cannot create output directory {}: {source}", .path.display())]
    OutputDir {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Why one file produced no artifact.
#[derive(Error, Debug)]
pub enum FileError {
    #[error(transparent)]
    Naming(#[from] NamingError),
    #[error("read failed: {0}")]
    Read(#[source] io::Error),
    #[error("transform failed: {0}")]
    Transform(#[from] TransformError),
    #[error("write failed: {0}")]
    Write(#[source] io::Error),
}

impl FileError {
    /// Pipeline step that failed, for display.
    pub fn stage(&self) -> &'static str {
        match self {
            FileError::Naming(_) => "name",
            FileError::Read(_) => "read",
            FileError::Transform(_) => "transform",
            FileError::Write(_) => "write",
        }
    }
}

#[derive(Debug)]
pub struct FileFailure {
    pub path: PathBuf,
    pub error: FileError,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WrittenArtifact {
    pub source: PathBuf,
    pub output_name: String,
}

/// Per-unit results of one build.
#[derive(Debug, Default)]
pub struct BuildReport {
    /// Canonical source root the build ran against.
    pub root: PathBuf,
    pub files_seen: usize,
    /// Sorted by output name.
    pub written: Vec<WrittenArtifact>,
    /// Sorted by source path.
    pub failed: Vec<FileFailure>,
    pub tree_written: bool,
    pub stylesheet_written: bool,
}

impl BuildReport {
    pub fn succeeded(&self) -> usize {
        self.written.len()
    }

    pub fn failed_count(&self) -> usize {
        self.failed.len()
    }
}

/// Result of walking a source tree, shared by `build` and `check`.
#[derive(Debug)]
pub struct Snapshot {
    pub root: PathBuf,
    pub records: Vec<FileRecord>,
    pub tree: NavigationTree,
}

/// Walk `source` once and fold the result into a navigation tree.
///
/// Records under `exclude` (typically the output directory, when it sits
/// inside the source tree) are dropped so earlier output is never re-read.
pub fn snapshot(
    source: &Path,
    exclude: Option<&Path>,
    config: &SiteConfig,
) -> Result<Snapshot, GenerateError> {
    let root = fs::canonicalize(source).map_err(|source_err| ScanError::RootUnreadable {
        path: source.to_path_buf(),
        source: source_err,
    })?;

    let mut records = scan::walk(&root, &config.walk.prune)?;
    if let Some(exclude) = exclude {
        let (kept, foreign) = drop_excluded(records, exclude, config);
        if foreign > 0 {
            warn!(
                output = %exclude.display(),
                files = foreign,
                "output directory holds files that are not build output, leaving them out"
            );
        }
        records = kept;
    }
    records.sort();

    let tree = NavigationTree::build(&records, &root, &config.tree.junk_files);
    Ok(Snapshot {
        root,
        records,
        tree,
    })
}

/// Drop records under `exclude`. Also returns how many of the dropped
/// records do not look like output of an earlier build.
fn drop_excluded(
    records: Vec<FileRecord>,
    exclude: &Path,
    config: &SiteConfig,
) -> (Vec<FileRecord>, usize) {
    let (excluded, kept): (Vec<FileRecord>, Vec<FileRecord>) = records
        .into_iter()
        .partition(|r| r.path.starts_with(exclude));
    let foreign = excluded
        .iter()
        .filter(|r| !is_build_output(r.path(), exclude, config))
        .count();
    (kept, foreign)
}

fn is_build_output(path: &Path, output_dir: &Path, config: &SiteConfig) -> bool {
    if path.parent() != Some(output_dir) {
        return false;
    }
    let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
        return false;
    };
    name == config.tree.script
        || name == config.highlight.stylesheet
        || (name.starts_with(&config.naming.separator_token) && name.ends_with(".html"))
}

/// Build with the standard pulldown-cmark + syntect collaborators.
pub fn generate(
    source: &Path,
    output_dir: &Path,
    config: &SiteConfig,
) -> Result<BuildReport, GenerateError> {
    let transformer = ContentTransformer::standard();
    generate_with(&transformer, source, output_dir, config)
}

/// Build with caller-supplied collaborators.
pub fn generate_with<M, H>(
    transformer: &ContentTransformer<M, H>,
    source: &Path,
    output_dir: &Path,
    config: &SiteConfig,
) -> Result<BuildReport, GenerateError>
where
    M: MarkdownRenderer,
    H: Highlighter,
{
    fs::create_dir_all(output_dir).map_err(|source| GenerateError::OutputDir {
        path: output_dir.to_path_buf(),
        source,
    })?;
    let output_dir = fs::canonicalize(output_dir).map_err(|source| GenerateError::OutputDir {
        path: output_dir.to_path_buf(),
        source,
    })?;

    let Snapshot {
        root,
        records,
        tree,
    } = snapshot(source, Some(&output_dir), config)?;
    info!(
        root = %root.display(),
        files = records.len(),
        dirs = tree.dir_count(),
        "walk complete"
    );

    let tree_written = write_tree_script(&tree, &output_dir, config);
    let stylesheet_written = write_stylesheet(&output_dir, config);

    let NameAssignment { named, rejected } =
        naming::assign_names(&records, &root, &config.naming.separator_token);

    let mut failed: Vec<FileFailure> = rejected
        .into_iter()
        .map(|(record, e)| FileFailure {
            path: record.path,
            error: e.into(),
        })
        .collect();

    let outcomes: Vec<Result<WrittenArtifact, FileFailure>> = named
        .into_par_iter()
        .map(|(record, output_name)| render_file(transformer, &record, output_name, &output_dir))
        .collect();

    let mut written = Vec::with_capacity(outcomes.len());
    for outcome in outcomes {
        match outcome {
            Ok(artifact) => written.push(artifact),
            Err(failure) => failed.push(failure),
        }
    }
    failed.sort_by(|a, b| a.path.cmp(&b.path));
    for failure in &failed {
        warn!(
            path = %failure.path.display(),
            stage = failure.error.stage(),
            error = %failure.error,
            "skipped file"
        );
    }

    info!(
        written = written.len(),
        failed = failed.len(),
        "build complete"
    );

    Ok(BuildReport {
        root,
        files_seen: records.len(),
        written,
        failed,
        tree_written,
        stylesheet_written,
    })
}

/// Read, classify, transform, and persist one file.
fn render_file<M, H>(
    transformer: &ContentTransformer<M, H>,
    record: &FileRecord,
    output_name: String,
    output_dir: &Path,
) -> Result<WrittenArtifact, FileFailure>
where
    M: MarkdownRenderer,
    H: Highlighter,
{
    let fail = |error: FileError| FileFailure {
        path: record.path.clone(),
        error,
    };

    let raw = fs::read_to_string(record.path()).map_err(|e| fail(FileError::Read(e)))?;
    let content = ClassifiedContent::new(record.path(), raw);
    let html = transformer
        .transform(content.kind, &content.raw_text)
        .map_err(|e| fail(e.into()))?;

    let artifact = Artifact { output_name, html };
    fs::write(output_dir.join(&artifact.output_name), &artifact.html)
        .map_err(|e| fail(FileError::Write(e)))?;
    debug!(
        source = %record.path.display(),
        artifact = %artifact.output_name,
        size = artifact.html.len(),
        "wrote artifact"
    );

    Ok(WrittenArtifact {
        source: record.path.clone(),
        output_name: artifact.output_name,
    })
}

fn write_tree_script(tree: &NavigationTree, output_dir: &Path, config: &SiteConfig) -> bool {
    let path = output_dir.join(&config.tree.script);
    let script = match tree.init_script(&config.tree.queue_var, &config.tree.command) {
        Ok(s) => s,
        Err(e) => {
            warn!(error = %e, "cannot serialize navigation tree");
            return false;
        }
    };
    write_side_artifact(&path, &script, "navigation tree")
}

fn write_stylesheet(output_dir: &Path, config: &SiteConfig) -> bool {
    let path = output_dir.join(&config.highlight.stylesheet);
    match theme_stylesheet(&config.highlight.theme) {
        Ok(css) => write_side_artifact(&path, &css, "highlight stylesheet"),
        Err(e) => {
            warn!(theme = %config.highlight.theme, error = %e, "cannot build highlight stylesheet");
            false
        }
    }
}

fn write_side_artifact(path: &Path, contents: &str, what: &str) -> bool {
    match fs::write(path, contents) {
        Ok(()) => {
            debug!(path = %path.display(), "wrote {what}");
            true
        }
        Err(e) => {
            warn!(path = %path.display(), error = %e, "cannot write {what}");
            false
        }
    }
}
