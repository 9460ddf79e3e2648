//! Flat artifact names for nested source paths.
//!
//! Every artifact lives directly in the output directory, so the nested
//! relative path of its source file is flattened into a single filename:
//! each path separator becomes a fixed multi-character token and `.html` is
//! appended. Markdown keeps its `.md` too; nothing is ever stripped.
//!
//! ```text
//! root/README.md            →  __SLASH__README.md.html
//! root/src/app.js           →  __SLASH__src__SLASH__app.js.html
//! root/docs/guide/intro.md  →  __SLASH__docs__SLASH__guide__SLASH__intro.md.html
//! ```
//!
//! ## Uniqueness
//!
//! Two distinct relative paths flatten to distinct names as long as the
//! token never appears inside a path component. That is an assumption, not
//! a guarantee: `a__SLASH__b.md` and `a/b.md` both flatten to the same name.
//! [`assign_names`] detects such collisions before anything is written and
//! rejects all but one member of each colliding group, so an artifact is
//! never silently overwritten by another file's output.

use crate::types::FileRecord;
use std::collections::BTreeMap;
use std::path::{Component, Path, PathBuf};
use thiserror::Error;

/// Separator token used when no config overrides it.
pub const DEFAULT_SEPARATOR_TOKEN: &str = "__SLASH__";

const ARTIFACT_EXTENSION: &str = ".html";

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum NamingError {
    #[error("{} is not inside scan root {}", .path.display(), .root.display())]
    OutsideRoot { path: PathBuf, root: PathBuf },
    #[error("artifact name {name} already taken by {}", .kept.display())]
    Collision { name: String, kept: PathBuf },
}

/// Derive the flat output filename for `path`, relative to `root`.
///
/// The relative path always starts at a separator boundary, so the result
/// begins with `token`. Non-UTF-8 components are converted lossily.
pub fn artifact_name(path: &Path, root: &Path, token: &str) -> Result<String, NamingError> {
    let rel = path
        .strip_prefix(root)
        .map_err(|_| NamingError::OutsideRoot {
            path: path.to_path_buf(),
            root: root.to_path_buf(),
        })?;

    let mut name = String::new();
    for component in rel.components() {
        if let Component::Normal(part) = component {
            name.push_str(token);
            name.push_str(&part.to_string_lossy());
        }
    }
    name.push_str(ARTIFACT_EXTENSION);
    Ok(name)
}

/// Root-relative path in `/`-separated form, with a leading `/`.
///
/// Shared by the navigation tree so both views of a file agree on its
/// relative location regardless of platform separator.
pub fn relative_key(path: &Path, root: &Path) -> Option<String> {
    let rel = path.strip_prefix(root).ok()?;
    let mut key = String::new();
    for component in rel.components() {
        if let Component::Normal(part) = component {
            key.push('/');
            key.push_str(&part.to_string_lossy());
        }
    }
    Some(key)
}

/// Outcome of naming a whole walk snapshot.
#[derive(Debug, Default)]
pub struct NameAssignment {
    /// Records that own their artifact name, sorted by name.
    pub named: Vec<(FileRecord, String)>,
    /// Records that could not be given a name of their own.
    pub rejected: Vec<(FileRecord, NamingError)>,
}

/// Name every record and resolve collisions.
///
/// Within a group of records that flatten to the same name, the
/// lexicographically smallest path keeps it; the rest are rejected with
/// [`NamingError::Collision`]. The result does not depend on input order.
pub fn assign_names(records: &[FileRecord], root: &Path, token: &str) -> NameAssignment {
    let mut groups: BTreeMap<String, Vec<&FileRecord>> = BTreeMap::new();
    let mut assignment = NameAssignment::default();

    for record in records {
        match artifact_name(record.path(), root, token) {
            Ok(name) => groups.entry(name).or_default().push(record),
            Err(e) => assignment.rejected.push((record.clone(), e)),
        }
    }

    for (name, mut members) in groups {
        members.sort();
        let kept = members[0];
        for other in &members[1..] {
            assignment.rejected.push((
                (*other).clone(),
                NamingError::Collision {
                    name: name.clone(),
                    kept: kept.path.clone(),
                },
            ));
        }
        assignment.named.push((kept.clone(), name));
    }

    assignment
}
