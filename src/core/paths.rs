//! core::paths
//!
//! Centralized path routing for repository storage locations.
//!
//! **Hard rule:** no code outside this module joins file names onto the
//! state directory. Every on-disk location goes through [`RepoPaths`].
//!
//! # Storage Layout
//!
//! All repository state lives under `<work_dir>/.giclone/`:
//! - `objects/<digest>` - Blobs and serialized commits
//! - `HEAD` - `refs/heads/<name>` or a raw commit digest
//! - `refs/heads/<name>` - Branch tips (empty file means unborn)
//! - `index` - Staging index (absent when nothing is staged)
//! - `ignore` - Ignore patterns
//! - `config.toml` - Repository configuration
//! - `lock` - Advisory lock file
//!
//! # Example
//!
//! ```
//! use giclone::core::paths::RepoPaths;
//! use std::path::PathBuf;
//!
//! let paths = RepoPaths::new(PathBuf::from("/work"));
//!
//! assert_eq!(paths.state_dir(), PathBuf::from("/work/.giclone"));
//! assert_eq!(paths.head_path(), PathBuf::from("/work/.giclone/HEAD"));
//! ```

use std::path::{Path, PathBuf};

use crate::core::types::{BranchName, Digest, RepoPath};

/// Name of the hidden state directory at the root of the work tree.
pub const STATE_DIR_NAME: &str = ".giclone";

/// Centralized path routing for repository storage.
///
/// # Invariants
///
/// - `state_dir` is always `work_dir/.giclone`
/// - Working-tree files are only reached through [`RepoPaths::work_file`],
///   which takes a validated [`RepoPath`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoPaths {
    /// Root of the working tree.
    pub work_dir: PathBuf,
}

impl RepoPaths {
    /// Create paths for a repository rooted at `work_dir`.
    pub fn new(work_dir: PathBuf) -> Self {
        Self { work_dir }
    }

    /// Get the working tree root.
    pub fn work_dir(&self) -> &Path {
        &self.work_dir
    }

    // =========================================================================
    // State directory
    // =========================================================================

    /// The hidden state directory, `<work_dir>/.giclone`.
    pub fn state_dir(&self) -> PathBuf {
        self.work_dir.join(STATE_DIR_NAME)
    }

    /// Directory holding every stored object.
    pub fn objects_dir(&self) -> PathBuf {
        self.state_dir().join("objects")
    }

    /// Location of a single object.
    pub fn object_path(&self, digest: &Digest) -> PathBuf {
        self.objects_dir().join(digest.as_str())
    }

    /// The HEAD pointer file.
    pub fn head_path(&self) -> PathBuf {
        self.state_dir().join("HEAD")
    }

    /// Directory holding branch refs.
    pub fn heads_dir(&self) -> PathBuf {
        self.state_dir().join("refs").join("heads")
    }

    /// Location of a branch ref. Nested names map to nested files.
    pub fn branch_path(&self, branch: &BranchName) -> PathBuf {
        branch
            .as_str()
            .split('/')
            .fold(self.heads_dir(), |path, part| path.join(part))
    }

    /// The staging index file.
    pub fn index_path(&self) -> PathBuf {
        self.state_dir().join("index")
    }

    /// The ignore pattern file.
    pub fn ignore_path(&self) -> PathBuf {
        self.state_dir().join("ignore")
    }

    /// The repository configuration file.
    pub fn config_path(&self) -> PathBuf {
        self.state_dir().join("config.toml")
    }

    /// The advisory lock file.
    pub fn lock_path(&self) -> PathBuf {
        self.state_dir().join("lock")
    }

    // =========================================================================
    // Helpers
    // =========================================================================

    /// Absolute location of a tracked file in the working tree.
    pub fn work_file(&self, path: &RepoPath) -> PathBuf {
        self.work_dir.join(path.to_path_buf())
    }

    /// Check whether a state directory exists at this root.
    pub fn is_repository(&self) -> bool {
        self.state_dir().is_dir()
    }

    /// Create the state directory skeleton.
    ///
    /// # Errors
    ///
    /// Returns an IO error if directory creation fails.
    pub fn ensure_dirs(&self) -> std::io::Result<()> {
        std::fs::create_dir_all(self.objects_dir())?;
        std::fs::create_dir_all(self.heads_dir())?;
        Ok(())
    }
}
