//! repo::index
//!
//! The staging index: pending `path -> blob digest` entries accumulated
//! by `add` and consumed by `commit`.
//!
//! # Storage
//!
//! `.giclone/index` holds a JSON object sorted by path. The file is
//! absent whenever nothing is staged, so "no index file" and "empty
//! index" mean the same thing.
//!
//! # Invariants
//!
//! - Keys are unique by path; re-staging a path replaces its digest
//! - Staging merges into earlier entries, it never drops them
//! - The index never decides what is ignored; callers filter first

use std::fs;
use std::io;

use crate::core::fs::{remove_if_exists, write_atomic};
use crate::core::paths::RepoPaths;
use crate::core::types::{Digest, FileMap, RepoPath};

use super::error::RepoError;

/// File-backed staging index.
#[derive(Debug, Clone)]
pub struct StagingIndex {
    paths: RepoPaths,
}

impl StagingIndex {
    /// Index for the repository at `paths`.
    pub fn new(paths: RepoPaths) -> Self {
        Self { paths }
    }

    /// Current staged entries, or an empty map if none are persisted.
    ///
    /// # Errors
    ///
    /// - [`RepoError::CorruptIndex`] if the file does not parse
    /// - [`RepoError::Io`] if the file cannot be read
    pub fn load(&self) -> Result<FileMap, RepoError> {
        let path = self.paths.index_path();
        let bytes = match fs::read(&path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(FileMap::new()),
            Err(e) => return Err(RepoError::io(path, e)),
        };

        serde_json::from_slice(&bytes).map_err(|e| RepoError::CorruptIndex {
            message: e.to_string(),
        })
    }

    /// Upsert a single entry.
    pub fn stage(&self, path: RepoPath, digest: Digest) -> Result<(), RepoError> {
        self.stage_all(std::iter::once((path, digest)))
    }

    /// Upsert many entries with one read and one write.
    pub fn stage_all<I>(&self, entries: I) -> Result<(), RepoError>
    where
        I: IntoIterator<Item = (RepoPath, Digest)>,
    {
        let mut staged = self.load()?;
        let before = staged.len();
        staged.extend(entries);
        tracing::debug!(
            total = staged.len(),
            new = staged.len() - before,
            "updated staging index"
        );
        self.save(&staged)
    }

    /// Replace the whole index with `entries`.
    pub fn replace(&self, entries: &FileMap) -> Result<(), RepoError> {
        self.save(entries)
    }

    /// Remove every staged entry.
    pub fn clear(&self) -> Result<(), RepoError> {
        let path = self.paths.index_path();
        remove_if_exists(&path).map_err(|e| RepoError::io(path, e))
    }

    /// True when nothing is staged.
    pub fn is_empty(&self) -> Result<bool, RepoError> {
        Ok(self.load()?.is_empty())
    }

    fn save(&self, entries: &FileMap) -> Result<(), RepoError> {
        if entries.is_empty() {
            return self.clear();
        }
        let path = self.paths.index_path();
        let json = serde_json::to_vec_pretty(entries).map_err(|e| RepoError::CorruptIndex {
            message: e.to_string(),
        })?;
        write_atomic(&path, &json).map_err(|e| RepoError::io(path, e))
    }
}
