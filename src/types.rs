//! Shared types passed between pipeline stages.
//!
//! The walker produces [`FileRecord`]s, every later stage consumes them, and
//! the transformer hands back one [`Artifact`] per successfully converted file.

use std::path::{Path, PathBuf};

/// A regular file discovered by the walker.
///
/// Identity is the path alone; paths are unique within one run.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FileRecord {
    /// Absolute (or root-joined) path to the source file.
    pub path: PathBuf,
}

impl FileRecord {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// One rendered output file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifact {
    /// Flat filename inside the output directory (see [`crate::naming`]).
    pub output_name: String,
    pub html: String,
}
