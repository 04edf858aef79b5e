//! repo::commit
//!
//! Immutable commit records and history traversal.
//!
//! A commit is stored in the object store like any blob. Its digest is
//! the SHA-256 of its canonical serialization: compact JSON with fields
//! in declaration order and the file map sorted by path. Two commits with
//! the same message, files and parent therefore always share a digest.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::core::types::{Digest, FileMap};
use crate::store::{ObjectStore, StoreError};

use super::error::RepoError;

/// A snapshot of tracked files plus its history link.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Commit {
    pub message: String,
    pub files: FileMap,
    pub parent: Option<Digest>,
}

impl Commit {
    /// Canonical bytes; the commit digest is the hash of these.
    pub fn to_canonical_bytes(&self) -> Result<Vec<u8>, serde_json::Error> {
        serde_json::to_vec(self)
    }

    /// Parse stored bytes back into a commit.
    pub fn from_bytes(digest: &Digest, bytes: &[u8]) -> Result<Self, RepoError> {
        serde_json::from_slice(bytes).map_err(|e| RepoError::CorruptObject {
            digest: digest.clone(),
            message: e.to_string(),
        })
    }
}

/// Commit operations over an object store.
#[derive(Clone, Copy)]
pub struct CommitGraph<'a> {
    store: &'a dyn ObjectStore,
}

impl<'a> CommitGraph<'a> {
    pub fn new(store: &'a dyn ObjectStore) -> Self {
        Self { store }
    }

    /// Store a new commit and return its digest.
    pub fn append(
        &self,
        message: &str,
        files: FileMap,
        parent: Option<Digest>,
    ) -> Result<Digest, RepoError> {
        let commit = Commit {
            message: message.to_string(),
            files,
            parent,
        };
        let bytes = commit
            .to_canonical_bytes()
            .map_err(|source| RepoError::EncodeCommit { source })?;
        let digest = self.store.put(&bytes)?;
        tracing::debug!(
            commit = %digest.short(12),
            files = commit.files.len(),
            "stored commit"
        );
        Ok(digest)
    }

    /// Load a commit.
    ///
    /// # Errors
    ///
    /// - [`RepoError::CommitNotFound`] if nothing is stored under `digest`
    /// - [`RepoError::CorruptObject`] if the object is not a commit
    pub fn load(&self, digest: &Digest) -> Result<Commit, RepoError> {
        let bytes = match self.store.get(digest) {
            Ok(bytes) => bytes,
            Err(StoreError::NotFound { digest }) => {
                return Err(RepoError::CommitNotFound { digest })
            }
            Err(e) => return Err(e.into()),
        };
        Commit::from_bytes(digest, &bytes)
    }

    /// True when `digest` names a stored commit (not a blob).
    pub fn is_commit(&self, digest: &Digest) -> Result<bool, RepoError> {
        if !self.store.exists(digest)? {
            return Ok(false);
        }
        match self.load(digest) {
            Ok(_) => Ok(true),
            Err(RepoError::CorruptObject { .. }) => Ok(false),
            Err(e) => Err(e),
        }
    }

    /// Walk history from `start`, newest first.
    ///
    /// Each call starts a fresh walk; nothing is cached between walks.
    pub fn walk(&self, start: Digest) -> CommitWalk<'a> {
        CommitWalk {
            store: self.store,
            next: Some(start),
            seen: HashSet::new(),
            first: true,
        }
    }
}

/// Lazy iterator over a parent chain.
///
/// Yields `(digest, commit)` pairs. A parent that cannot be loaded, or a
/// digest seen twice, is reported as [`RepoError::CorruptObject`]; the
/// iterator is exhausted after the first error.
pub struct CommitWalk<'a> {
    store: &'a dyn ObjectStore,
    next: Option<Digest>,
    seen: HashSet<Digest>,
    first: bool,
}

impl Iterator for CommitWalk<'_> {
    type Item = Result<(Digest, Commit), RepoError>;

    fn next(&mut self) -> Option<Self::Item> {
        let digest = self.next.take()?;
        let is_start = std::mem::replace(&mut self.first, false);

        if !self.seen.insert(digest.clone()) {
            return Some(Err(RepoError::CorruptObject {
                digest,
                message: "commit history contains a cycle".to_string(),
            }));
        }

        let graph = CommitGraph::new(self.store);
        match graph.load(&digest) {
            Ok(commit) => {
                self.next = commit.parent.clone();
                Some(Ok((digest, commit)))
            }
            Err(RepoError::CommitNotFound { digest }) if !is_start => {
                Some(Err(RepoError::CorruptObject {
                    message: "dangling parent reference".to_string(),
                    digest,
                }))
            }
            Err(e) => Some(Err(e)),
        }
    }
}

impl std::iter::FusedIterator for CommitWalk<'_> {}
