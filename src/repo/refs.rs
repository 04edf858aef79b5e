//! repo::refs
//!
//! HEAD and branch references.
//!
//! # Storage
//!
//! - `HEAD` holds either `refs/heads/<name>` (attached) or a raw commit
//!   digest (detached).
//! - `refs/heads/<name>` holds the digest the branch points to. An empty
//!   or missing file means the branch is unborn.
//!
//! All writes go through [`write_atomic`].

use std::fs;
use std::io;
use std::path::Path;

use crate::core::fs::write_atomic;
use crate::core::paths::RepoPaths;
use crate::core::types::{BranchName, Digest};

use super::error::RepoError;

/// Where HEAD points.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HeadState {
    /// HEAD names a branch that has no commit yet. The first commit
    /// creates `branch`.
    Unborn { branch: BranchName },
    /// HEAD names a branch with at least one commit.
    Attached(BranchName),
    /// HEAD names a commit directly.
    Detached(Digest),
}

impl HeadState {
    /// The branch HEAD names, if any.
    pub fn branch(&self) -> Option<&BranchName> {
        match self {
            HeadState::Unborn { branch } | HeadState::Attached(branch) => Some(branch),
            HeadState::Detached(_) => None,
        }
    }
}

impl std::fmt::Display for HeadState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            HeadState::Unborn { branch } => write!(f, "{} (no commits yet)", branch),
            HeadState::Attached(branch) => write!(f, "{}", branch),
            HeadState::Detached(digest) => write!(f, "detached at {}", digest.short(12)),
        }
    }
}

/// File-backed HEAD and branch store.
#[derive(Debug, Clone)]
pub struct RefStore {
    paths: RepoPaths,
}

impl RefStore {
    /// Ref store for the repository at `paths`.
    pub fn new(paths: RepoPaths) -> Self {
        Self { paths }
    }

    /// Read and classify HEAD.
    ///
    /// # Errors
    ///
    /// - [`RepoError::CorruptRef`] if HEAD is neither a branch ref nor a digest
    /// - [`RepoError::Io`] if HEAD cannot be read
    pub fn read_head(&self) -> Result<HeadState, RepoError> {
        let path = self.paths.head_path();
        let text = fs::read_to_string(&path).map_err(|e| RepoError::io(&path, e))?;
        let text = text.trim();

        if let Some(parsed) = BranchName::from_head_ref(text) {
            let branch = parsed.map_err(|e| corrupt("HEAD", e))?;
            return Ok(match self.resolve_branch(&branch)? {
                Some(_) => HeadState::Attached(branch),
                None => HeadState::Unborn { branch },
            });
        }

        Digest::new(text)
            .map(HeadState::Detached)
            .map_err(|e| corrupt("HEAD", e))
    }

    /// Point HEAD at a branch or commit.
    pub fn write_head(&self, state: &HeadState) -> Result<(), RepoError> {
        let text = match state {
            HeadState::Unborn { branch } | HeadState::Attached(branch) => branch.head_ref(),
            HeadState::Detached(digest) => digest.to_string(),
        };
        let path = self.paths.head_path();
        write_atomic(&path, text.as_bytes()).map_err(|e| RepoError::io(&path, e))?;
        tracing::debug!(head = %text, "wrote HEAD");
        Ok(())
    }

    /// The commit a branch points to; `None` when the branch is unborn
    /// or does not exist.
    pub fn resolve_branch(&self, name: &BranchName) -> Result<Option<Digest>, RepoError> {
        let path = self.paths.branch_path(name);
        let text = match fs::read_to_string(&path) {
            Ok(text) => text,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            // A directory here means `name` is a prefix of nested branches.
            Err(_) if path.is_dir() => return Ok(None),
            Err(e) => return Err(RepoError::io(&path, e)),
        };

        let text = text.trim();
        if text.is_empty() {
            return Ok(None);
        }
        Digest::new(text)
            .map(Some)
            .map_err(|e| corrupt(&name.head_ref(), e))
    }

    /// True when a branch file exists, even an unborn one.
    pub fn branch_exists(&self, name: &BranchName) -> bool {
        self.paths.branch_path(name).is_file()
    }

    /// Point a branch at a commit, creating the branch if absent.
    pub fn update_branch(&self, name: &BranchName, digest: &Digest) -> Result<(), RepoError> {
        let path = self.paths.branch_path(name);
        write_atomic(&path, digest.as_str().as_bytes()).map_err(|e| RepoError::io(&path, e))?;
        tracing::debug!(branch = %name, commit = %digest.short(12), "updated branch");
        Ok(())
    }

    /// Create an unborn branch file.
    pub fn create_unborn_branch(&self, name: &BranchName) -> Result<(), RepoError> {
        let path = self.paths.branch_path(name);
        write_atomic(&path, b"").map_err(|e| RepoError::io(&path, e))
    }

    /// Create `name` at the commit HEAD currently resolves to.
    ///
    /// # Errors
    ///
    /// - [`RepoError::Unborn`] if HEAD has no commit to branch from
    /// - [`RepoError::BranchExists`] if `name` already exists
    /// - [`RepoError::BranchNameConflict`] if `name` is a prefix of an
    ///   existing branch, or an existing branch is a prefix of `name`
    pub fn create_branch(&self, name: &BranchName) -> Result<Digest, RepoError> {
        let head = self.read_head()?;
        let digest = match self.head_commit_of(&head)? {
            Some(digest) => digest,
            None => {
                let branch = head.branch().cloned().unwrap_or_default();
                return Err(RepoError::Unborn { branch });
            }
        };

        self.check_branch_free(name)?;
        self.update_branch(name, &digest)?;
        Ok(digest)
    }

    /// Fail unless `name` can be written without touching another branch's
    /// file or directory under `refs/heads/`.
    fn check_branch_free(&self, name: &BranchName) -> Result<(), RepoError> {
        let path = self.paths.branch_path(name);
        if path.is_file() {
            return Err(RepoError::BranchExists { name: name.clone() });
        }
        if path.exists() {
            return Err(RepoError::BranchNameConflict {
                name: name.clone(),
                existing: format!("{name}/..."),
            });
        }

        let components: Vec<&str> = name.as_str().split('/').collect();
        let mut ancestor = self.paths.heads_dir();
        for (depth, part) in components.iter().enumerate().take(components.len() - 1) {
            ancestor.push(part);
            if ancestor.is_file() {
                return Err(RepoError::BranchNameConflict {
                    name: name.clone(),
                    existing: components[..=depth].join("/"),
                });
            }
        }
        Ok(())
    }

    /// Every branch, sorted by name. Nested names are included.
    pub fn list_branches(&self) -> Result<Vec<BranchName>, RepoError> {
        let root = self.paths.heads_dir();
        let mut names = Vec::new();
        collect_branches(&root, &root, &mut names)?;
        names.sort();
        Ok(names)
    }

    /// The commit HEAD resolves to, or `None` when unborn.
    pub fn head_commit(&self) -> Result<Option<Digest>, RepoError> {
        let head = self.read_head()?;
        self.head_commit_of(&head)
    }

    fn head_commit_of(&self, head: &HeadState) -> Result<Option<Digest>, RepoError> {
        match head {
            HeadState::Unborn { .. } => Ok(None),
            HeadState::Attached(branch) => self.resolve_branch(branch),
            HeadState::Detached(digest) => Ok(Some(digest.clone())),
        }
    }
}

fn corrupt(name: &str, err: impl std::fmt::Display) -> RepoError {
    RepoError::CorruptRef {
        name: name.to_string(),
        message: err.to_string(),
    }
}

fn collect_branches(root: &Path, dir: &Path, out: &mut Vec<BranchName>) -> Result<(), RepoError> {
    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(()),
        Err(e) => return Err(RepoError::io(dir, e)),
    };

    for entry in entries {
        let entry = entry.map_err(|e| RepoError::io(dir, e))?;
        let path = entry.path();
        if path.is_dir() {
            collect_branches(root, &path, out)?;
            continue;
        }

        let Ok(relative) = path.strip_prefix(root) else {
            continue;
        };
        let name = relative
            .components()
            .map(|c| c.as_os_str().to_string_lossy())
            .collect::<Vec<_>>()
            .join("/");
        // Temp files from interrupted writes start with '.', which no
        // valid branch name does.
        if let Ok(branch) = BranchName::new(name) {
            out.push(branch);
        }
    }
    Ok(())
}
