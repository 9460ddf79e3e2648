//! Shared test utilities for the simple-docs test suite.
//!
//! # Usage
//!
//! ```rust
//! use crate::test_helpers::*;
//!
//! let tmp = write_tree(&[("README.md", "# Title"), ("src/app.js", "let x;")]);
//! let records = walk(tmp.path(), &prune).unwrap();
//! assert_eq!(relative_paths(&records, tmp.path()), vec!["/README.md", "/src/app.js"]);
//! ```

use std::collections::BTreeMap;
use std::path::Path;
use tempfile::TempDir;

use crate::naming::relative_key;
use crate::types::FileRecord;

// =========================================================================
// Fixture setup
// =========================================================================

/// Create a temp directory holding `files`, given as `(relative path, contents)`.
///
/// Parent directories are created as needed.
pub fn write_tree(files: &[(&str, &str)]) -> TempDir {
    let tmp = TempDir::new().unwrap();
    for (rel, contents) in files {
        let path = tmp.path().join(rel);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).unwrap();
        }
        std::fs::write(&path, contents).unwrap();
    }
    tmp
}

// =========================================================================
// Extractors
// =========================================================================

/// Root-relative `/`-prefixed paths of `records`, sorted.
///
/// Walk order is unspecified, so comparisons always go through this.
pub fn relative_paths(records: &[FileRecord], root: &Path) -> Vec<String> {
    let mut paths: Vec<String> = records
        .iter()
        .map(|r| {
            relative_key(r.path(), root).unwrap_or_else(|| {
                panic!(
                    "record {} not under {}",
                    r.path.display(),
                    root.display()
                )
            })
        })
        .collect();
    paths.sort();
    paths
}

/// Every file directly inside `dir`, name → bytes.
pub fn read_dir_contents(dir: &Path) -> BTreeMap<String, Vec<u8>> {
    std::fs::read_dir(dir)
        .unwrap()
        .map(|e| e.unwrap())
        .filter(|e| e.file_type().unwrap().is_file())
        .map(|e| {
            (
                e.file_name().to_string_lossy().into_owned(),
                std::fs::read(e.path()).unwrap(),
            )
        })
        .collect()
}
