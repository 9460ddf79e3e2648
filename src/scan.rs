//! Filesystem walking.
//!
//! Stage 1 of the build. Recursively enumerates every regular file under the
//! source root and returns one [`FileRecord`] per file.
//!
//! ## Pruning
//!
//! Directories whose name is in the prune set are skipped together with
//! their whole subtree. The match is on the directory's own name at any
//! depth, so `node_modules` is pruned wherever it appears. The root itself is
//! never pruned.
//!
//! ```text
//! project/
//! ├── README.md            ✓
//! ├── .git/                ✗ pruned
//! ├── node_modules/        ✗ pruned
//! └── src/
//!     ├── app.js           ✓
//!     └── vendor/
//!         └── node_modules ✗ pruned
//! ```
//!
//! ## Concurrency
//!
//! The immediate children of every directory are visited in parallel on the
//! rayon pool, and each child directory fans out again. Results are spliced
//! together as they complete, so the returned order is unspecified; callers
//! that need determinism sort the snapshot.
//!
//! ## Failure isolation
//!
//! Only an unreadable root is fatal. Any other listing or stat failure is
//! logged and the affected subtree contributes nothing, while its siblings
//! still complete.
//!
//! Symlinks to files are followed. Symlinks to directories are not, which
//! keeps the walk finite in the presence of link cycles.

use crate::types::FileRecord;
use rayon::prelude::*;
use std::fs::{self, DirEntry};
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, warn};

#[derive(Error, Debug)]
pub enum ScanError {
    #[error("cannot read source root {}: {source}", .path.display())]
    RootUnreadable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Walk `root`, skipping any directory named in `prune`.
pub fn walk(root: &Path, prune: &[String]) -> Result<Vec<FileRecord>, ScanError> {
    let entries = fs::read_dir(root).map_err(|source| ScanError::RootUnreadable {
        path: root.to_path_buf(),
        source,
    })?;

    let children = collect_entries(root, entries);
    let records = walk_entries(children, prune);
    debug!(root = %root.display(), files = records.len(), "walk complete");
    Ok(records)
}

fn walk_entries(entries: Vec<DirEntry>, prune: &[String]) -> Vec<FileRecord> {
    entries
        .into_par_iter()
        .flat_map_iter(|entry| visit(entry, prune))
        .collect()
}

fn visit(entry: DirEntry, prune: &[String]) -> Vec<FileRecord> {
    let path = entry.path();
    let file_type = match entry.file_type() {
        Ok(t) => t,
        Err(e) => {
            warn!(path = %path.display(), error = %e, "cannot stat entry, skipping");
            return Vec::new();
        }
    };

    if file_type.is_symlink() {
        return match fs::metadata(&path) {
            Ok(meta) if meta.is_file() => vec![FileRecord::new(path)],
            Ok(_) => {
                debug!(path = %path.display(), "not following symlink");
                Vec::new()
            }
            Err(e) => {
                warn!(path = %path.display(), error = %e, "dangling symlink, skipping");
                Vec::new()
            }
        };
    }

    if file_type.is_dir() {
        if is_pruned(&entry, prune) {
            debug!(path = %path.display(), "pruned");
            return Vec::new();
        }
        return walk_entries(list_dir(&path), prune);
    }

    if file_type.is_file() {
        vec![FileRecord::new(path)]
    } else {
        // Sockets, fifos, devices
        Vec::new()
    }
}

fn is_pruned(entry: &DirEntry, prune: &[String]) -> bool {
    let name = entry.file_name();
    let name = name.to_string_lossy();
    prune.iter().any(|p| *p == name)
}

/// List a non-root directory. Failure yields an empty listing.
fn list_dir(path: &Path) -> Vec<DirEntry> {
    match fs::read_dir(path) {
        Ok(entries) => collect_entries(path, entries),
        Err(e) => {
            warn!(path = %path.display(), error = %e, "cannot read directory, skipping subtree");
            Vec::new()
        }
    }
}

fn collect_entries(dir: &Path, entries: fs::ReadDir) -> Vec<DirEntry> {
    entries
        .filter_map(|entry| match entry {
            Ok(e) => Some(e),
            Err(e) => {
                warn!(dir = %dir.display(), error = %e, "unreadable directory entry");
                None
            }
        })
        .collect()
}
