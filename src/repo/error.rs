//! repo::error
//!
//! Error taxonomy for repository operations.
//!
//! Every failure maps onto one of five [`ErrorKind`]s, which in turn
//! decide the process exit code. Lower-layer errors (storage, locking,
//! config, type validation) are wrapped with `#[from]` and classified by
//! [`RepoError::kind`].

use std::path::PathBuf;

use thiserror::Error;

use crate::core::config::ConfigError;
use crate::core::ops::LockError;
use crate::core::types::{BranchName, Digest, RepoPath, TypeError};
use crate::store::StoreError;

/// Coarse classification of a repository failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Missing object, commit, branch, path or repository.
    NotFound,
    /// Underlying storage read/write failure.
    IoFailure,
    /// Merge found paths with divergent digests.
    Conflict,
    /// Stored bytes do not parse into the expected structure.
    CorruptObject,
    /// Operation invoked in a state that forbids it.
    InvalidState,
}

impl ErrorKind {
    /// Process exit code for this kind.
    pub fn exit_code(self) -> i32 {
        match self {
            ErrorKind::NotFound => 2,
            ErrorKind::IoFailure => 3,
            ErrorKind::Conflict => 4,
            ErrorKind::CorruptObject => 5,
            ErrorKind::InvalidState => 6,
        }
    }
}

/// Errors from repository operations.
#[derive(Debug, Error)]
pub enum RepoError {
    #[error("not a giclone repository (or any parent): {path}")]
    NotARepo { path: PathBuf },

    #[error("branch not found: {name}")]
    BranchNotFound { name: BranchName },

    #[error("commit not found: {digest}")]
    CommitNotFound { digest: Digest },

    #[error("'{rev}' is neither a branch nor a known commit")]
    RevisionNotFound { rev: String },

    #[error("path does not exist: {path}")]
    PathNotFound { path: PathBuf },

    #[error("object {digest} is not a valid commit: {message}")]
    CorruptObject { digest: Digest, message: String },

    #[error("staging index is corrupt: {message}")]
    CorruptIndex { message: String },

    #[error("ref {name} is corrupt: {message}")]
    CorruptRef { name: String, message: String },

    #[error("merge of '{branch}' conflicts in: {}", join_paths(.paths))]
    MergeConflict {
        branch: BranchName,
        paths: Vec<RepoPath>,
    },

    #[error("no commits yet on branch '{branch}'")]
    Unborn { branch: BranchName },

    #[error("branch '{name}' has no commits")]
    UnbornBranch { name: BranchName },

    #[error("branch already exists: {name}")]
    BranchExists { name: BranchName },

    #[error("branch '{name}' collides with existing branch path '{existing}'")]
    BranchNameConflict { name: BranchName, existing: String },

    #[error("staged changes are pending; commit them first")]
    StagedChangesPending,

    #[error("path is outside the repository: {path}")]
    PathOutsideRepo { path: PathBuf },

    #[error("destination already exists: {path}")]
    DestinationExists { path: PathBuf },

    #[error("failed to encode commit: {source}")]
    EncodeCommit { source: serde_json::Error },

    #[error("i/o error at {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Lock(#[from] LockError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Type(#[from] TypeError),
}

impl RepoError {
    /// Build an IO error tagged with the path being accessed.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        RepoError::Io {
            path: path.into(),
            source,
        }
    }

    /// Classify this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            RepoError::NotARepo { .. }
            | RepoError::BranchNotFound { .. }
            | RepoError::CommitNotFound { .. }
            | RepoError::RevisionNotFound { .. }
            | RepoError::PathNotFound { .. } => ErrorKind::NotFound,

            RepoError::CorruptObject { .. }
            | RepoError::CorruptIndex { .. }
            | RepoError::CorruptRef { .. } => ErrorKind::CorruptObject,

            RepoError::MergeConflict { .. } => ErrorKind::Conflict,

            RepoError::Unborn { .. }
            | RepoError::UnbornBranch { .. }
            | RepoError::BranchExists { .. }
            | RepoError::BranchNameConflict { .. }
            | RepoError::StagedChangesPending
            | RepoError::PathOutsideRepo { .. }
            | RepoError::DestinationExists { .. }
            | RepoError::Config(_)
            | RepoError::Type(_) => ErrorKind::InvalidState,

            RepoError::Io { .. } | RepoError::EncodeCommit { .. } => ErrorKind::IoFailure,

            RepoError::Store(e) => match e {
                StoreError::NotFound { .. } => ErrorKind::NotFound,
                StoreError::Corrupt { .. } => ErrorKind::CorruptObject,
                StoreError::Io { .. } => ErrorKind::IoFailure,
            },

            RepoError::Lock(e) => match e {
                LockError::AlreadyLocked => ErrorKind::InvalidState,
                _ => ErrorKind::IoFailure,
            },
        }
    }

    /// Process exit code for this error.
    pub fn exit_code(&self) -> i32 {
        self.kind().exit_code()
    }
}

fn join_paths(paths: &[RepoPath]) -> String {
    paths
        .iter()
        .map(RepoPath::as_str)
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn branch(name: &str) -> BranchName {
        BranchName::new(name).unwrap()
    }

    #[test]
    fn kinds_follow_taxonomy() {
        assert_eq!(
            RepoError::BranchNotFound { name: branch("x") }.kind(),
            ErrorKind::NotFound
        );
        assert_eq!(
            RepoError::Unborn { branch: branch("main") }.kind(),
            ErrorKind::InvalidState
        );
        assert_eq!(
            RepoError::MergeConflict {
                branch: branch("feature"),
                paths: vec![],
            }
            .kind(),
            ErrorKind::Conflict
        );
        assert_eq!(
            RepoError::CorruptIndex {
                message: "bad".into()
            }
            .kind(),
            ErrorKind::CorruptObject
        );
        assert_eq!(
            RepoError::from(StoreError::NotFound {
                digest: Digest::of(b"x")
            })
            .kind(),
            ErrorKind::NotFound
        );
        assert_eq!(
            RepoError::from(LockError::AlreadyLocked).kind(),
            ErrorKind::InvalidState
        );
    }

    #[test]
    fn exit_codes_are_distinct() {
        let codes = [
            ErrorKind::NotFound,
            ErrorKind::IoFailure,
            ErrorKind::Conflict,
            ErrorKind::CorruptObject,
            ErrorKind::InvalidState,
        ]
        .map(ErrorKind::exit_code);
        let mut sorted = codes.to_vec();
        sorted.sort();
        sorted.dedup();
        assert_eq!(sorted.len(), codes.len());
        assert!(codes.iter().all(|&c| c > 1));
    }

    #[test]
    fn conflict_message_lists_paths() {
        let err = RepoError::MergeConflict {
            branch: branch("feature"),
            paths: vec![
                RepoPath::new("a.txt").unwrap(),
                RepoPath::new("b.txt").unwrap(),
            ],
        };
        let msg = err.to_string();
        assert!(msg.contains("feature"));
        assert!(msg.contains("a.txt, b.txt"));
    }
}
