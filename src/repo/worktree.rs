//! repo::worktree
//!
//! Working-tree synchronization: restoring a snapshot onto disk,
//! comparing two file maps, and the two-way merge.
//!
//! Everything here except [`restore`] is pure over [`FileMap`]s.

use std::collections::BTreeSet;

use crate::core::fs::write_atomic;
use crate::core::paths::RepoPaths;
use crate::core::types::{FileMap, RepoPath};
use crate::store::ObjectStore;

use super::error::RepoError;

/// Write every file in `files` into the working tree.
///
/// Parent directories are created as needed and existing files are
/// overwritten. Files not named in `files` are left alone. Returns the
/// number of files written.
pub fn restore(
    paths: &RepoPaths,
    store: &dyn ObjectStore,
    files: &FileMap,
) -> Result<usize, RepoError> {
    for (path, digest) in files {
        let bytes = store.get(digest)?;
        let target = paths.work_file(path);
        write_atomic(&target, &bytes).map_err(|e| RepoError::io(&target, e))?;
        tracing::trace!(path = %path, "restored file");
    }
    Ok(files.len())
}

/// Path-level comparison of two snapshots.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TreeDiff {
    /// In the second snapshot only.
    pub added: BTreeSet<RepoPath>,
    /// In the first snapshot only.
    pub removed: BTreeSet<RepoPath>,
    /// In both, with different contents.
    pub conflicting: BTreeSet<RepoPath>,
}

impl TreeDiff {
    /// True when the snapshots track the same paths with the same contents.
    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.removed.is_empty() && self.conflicting.is_empty()
    }
}

/// Compare `a` against `b`.
pub fn diff_file_maps(a: &FileMap, b: &FileMap) -> TreeDiff {
    let mut diff = TreeDiff::default();

    for (path, digest) in a {
        match b.get(path) {
            None => {
                diff.removed.insert(path.clone());
            }
            Some(other) if other != digest => {
                diff.conflicting.insert(path.clone());
            }
            Some(_) => {}
        }
    }

    diff.added.extend(b.keys().filter(|p| !a.contains_key(*p)).cloned());
    diff
}

/// Overlay `incoming` onto `current`.
///
/// A path present in both with different digests is a conflict. On any
/// conflict nothing is merged and every conflicting path is returned,
/// sorted.
pub fn merge_file_maps(current: &FileMap, incoming: &FileMap) -> Result<FileMap, Vec<RepoPath>> {
    let conflicts: Vec<RepoPath> = incoming
        .iter()
        .filter(|(path, digest)| current.get(*path).is_some_and(|d| d != *digest))
        .map(|(path, _)| path.clone())
        .collect();

    if !conflicts.is_empty() {
        return Err(conflicts);
    }

    let mut merged = current.clone();
    merged.extend(incoming.iter().map(|(p, d)| (p.clone(), d.clone())));
    Ok(merged)
}
