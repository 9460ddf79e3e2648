//! Navigation tree: which files live in which directory.
//!
//! Folds the walk snapshot into a map from directory key to child file
//! names. Keys are root-relative with a leading `/`; files directly in the
//! root live under `"/"`.
//!
//! ```text
//! /proj/a/x.md, /proj/a/b/y.css, /proj/README.md
//!   →  { "/": ["README.md"], "/a": ["x.md"], "/a/b": ["y.css"] }
//! ```
//!
//! Only directories that directly contain files get a key. Children keep the
//! order of the input records.
//!
//! The tree is handed to the front end as a small script that pushes one
//! `[command, tree]` event onto a global queue:
//!
//! ```js
//! (function (w) {
//!   w.__docsQueue = w.__docsQueue || [];
//!   w.__docsQueue.push(["tree:init",{"/":["README.md"]}]);
//! })(typeof window !== "undefined" ? window : globalThis);
//! ```

use crate::naming::relative_key;
use crate::types::FileRecord;
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::Path;
use tracing::debug;

/// Key used for files directly inside the scan root.
pub const ROOT_KEY: &str = "/";

/// Directory key → child base names.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct NavigationTree {
    dirs: BTreeMap<String, Vec<String>>,
}

impl NavigationTree {
    /// Fold `records` into a tree, skipping base names listed in `junk`.
    pub fn build(records: &[FileRecord], root: &Path, junk: &[String]) -> Self {
        let mut dirs: BTreeMap<String, Vec<String>> = BTreeMap::new();

        for record in records {
            let Some(key) = relative_key(record.path(), root) else {
                debug!(path = %record.path.display(), "record outside root, not in tree");
                continue;
            };
            let (dir, base) = split_key(&key);
            if base.is_empty() || junk.iter().any(|j| j == base) {
                continue;
            }
            dirs.entry(dir.to_string())
                .or_default()
                .push(base.to_string());
        }

        Self { dirs }
    }

    pub fn children(&self, dir: &str) -> Option<&[String]> {
        self.dirs.get(dir).map(Vec::as_slice)
    }

    /// Directories in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.dirs.iter().map(|(k, v)| (k.as_str(), v.as_slice()))
    }

    pub fn dir_count(&self) -> usize {
        self.dirs.len()
    }

    pub fn file_count(&self) -> usize {
        self.dirs.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.dirs.is_empty()
    }

    /// Render the self-executing init script for the front end.
    pub fn init_script(&self, queue_var: &str, command: &str) -> Result<String, serde_json::Error> {
        let event = serde_json::to_string(&(command, self))?;
        Ok(format!(
            "(function (w) {{\n  w.{q} = w.{q} || [];\n  w.{q}.push({event});\n}})(typeof window !== \"undefined\" ? window : globalThis);\n",
            q = queue_var,
        ))
    }
}

/// `"/a/b/y.css"` → `("/a/b", "y.css")`; `"/x.md"` → `("/", "x.md")`.
fn split_key(key: &str) -> (&str, &str) {
    match key.rsplit_once('/') {
        Some(("", base)) => (ROOT_KEY, base),
        Some((dir, base)) => (dir, base),
        None => (ROOT_KEY, key),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn junk() -> Vec<String> {
        crate::config::TreeConfig::default().junk_files
    }

    fn records(paths: &[&str]) -> Vec<FileRecord> {
        paths.iter().map(|p| FileRecord::new(*p)).collect()
    }

    #[test]
    fn nested_directories_fold_by_parent() {
        let tree = NavigationTree::build(
            &records(&["/proj/a/x.md", "/proj/a/b/y.css"]),
            Path::new("/proj"),
            &junk(),
        );
        let expected: BTreeMap<String, Vec<String>> = [
            ("/a".to_string(), vec!["x.md".to_string()]),
            ("/a/b".to_string(), vec!["y.css".to_string()]),
        ]
        .into_iter()
        .collect();
        assert_eq!(tree.dirs, expected);
    }

    #[test]
    fn root_files_use_slash_key() {
        let tree = NavigationTree::build(
            &records(&["/proj/README.md", "/proj/LICENSE"]),
            Path::new("/proj"),
            &junk(),
        );
        assert_eq!(
            tree.children(ROOT_KEY).unwrap(),
            &["README.md".to_string(), "LICENSE".to_string()]
        );
        assert_eq!(tree.dir_count(), 1);
    }

    #[test]
    fn children_keep_record_order() {
        let tree = NavigationTree::build(
            &records(&["/p/d/z.md", "/p/d/a.md", "/p/d/m.md"]),
            Path::new("/p"),
            &junk(),
        );
        assert_eq!(tree.children("/d").unwrap(), &["z.md", "a.md", "m.md"]);
    }

    #[test]
    fn junk_files_are_skipped() {
        let tree = NavigationTree::build(
            &records(&["/p/.DS_Store", "/p/a/Thumbs.db", "/p/a/real.md"]),
            Path::new("/p"),
            &junk(),
        );
        assert!(tree.children(ROOT_KEY).is_none());
        assert_eq!(tree.children("/a").unwrap(), &["real.md"]);
        assert_eq!(tree.file_count(), 1);
    }

    #[test]
    fn records_outside_root_are_ignored() {
        let tree = NavigationTree::build(&records(&["/other/x.md"]), Path::new("/p"), &junk());
        assert!(tree.is_empty());
    }

    #[test]
    fn split_key_cases() {
        assert_eq!(split_key("/a/b/y.css"), ("/a/b", "y.css"));
        assert_eq!(split_key("/x.md"), ("/", "x.md"));
    }

    #[test]
    fn serializes_as_plain_object() {
        let tree = NavigationTree::build(&records(&["/p/a/x.md"]), Path::new("/p"), &junk());
        assert_eq!(serde_json::to_string(&tree).unwrap(), r#"{"/a":["x.md"]}"#);
    }

    #[test]
    fn init_script_pushes_single_event() {
        let tree = NavigationTree::build(
            &records(&["/p/README.md", "/p/src/app.js"]),
            Path::new("/p"),
            &junk(),
        );
        let script = tree.init_script("__docsQueue", "tree:init").unwrap();

        assert!(script.contains("w.__docsQueue = w.__docsQueue || [];"));
        assert!(script.contains(
            r#"w.__docsQueue.push(["tree:init",{"/":["README.md"],"/src":["app.js"]}]);"#
        ));
        assert_eq!(script.matches(".push(").count(), 1);
    }

    #[test]
    fn init_script_escapes_names() {
        let tree = NavigationTree::build(&records(&["/p/we\"ird.md"]), Path::new("/p"), &junk());
        let script = tree.init_script("q", "tree:init").unwrap();
        assert!(script.contains(r#"we\"ird.md"#));
    }
}
