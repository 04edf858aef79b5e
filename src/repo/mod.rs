//! repo
//!
//! The repository engine.
//!
//! # Modules
//!
//! - [`index`] - Staging index of pending `path -> digest` entries
//! - [`refs`] - HEAD and branch references
//! - [`commit`] - Commit records, canonical hashing, history walks
//! - [`worktree`] - Restore, diff and two-way merge of file maps
//! - [`error`] - Error taxonomy and exit codes
//!
//! # The Repository Handle
//!
//! [`Repository`] owns everything a command needs: path routing, the
//! resolved configuration, an object store and an ignore predicate. There
//! is no ambient global state; two handles on the same directory share
//! only what is on disk.
//!
//! Every mutating operation holds the repository lock ([`RepoLock`]) for
//! its whole duration. The lock is released on every exit path because
//! it is an RAII guard. Internal helpers never take the lock themselves.
//!
//! # Example
//!
//! ```no_run
//! use std::path::{Path, PathBuf};
//! use giclone::repo::Repository;
//!
//! # fn main() -> Result<(), giclone::repo::RepoError> {
//! let (repo, _) = Repository::init(Path::new("project"), None)?;
//! repo.add(&[PathBuf::from("README.md")])?;
//! repo.commit("first commit")?;
//! # Ok(())
//! # }
//! ```

pub mod commit;
pub mod error;
pub mod index;
pub mod refs;
pub mod worktree;

pub use commit::{Commit, CommitGraph, CommitWalk};
pub use error::{ErrorKind, RepoError};
pub use index::StagingIndex;
pub use refs::{HeadState, RefStore};
pub use worktree::TreeDiff;

use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use ignore::WalkBuilder;

use crate::core::config::{Config, RepoConfig, SnapshotMode};
use crate::core::fs::write_atomic;
use crate::core::ignore::{load_ignore_patterns, IgnorePatterns, IgnorePredicate};
use crate::core::ops::RepoLock;
use crate::core::paths::{RepoPaths, STATE_DIR_NAME};
use crate::core::types::{BranchName, Digest, FileMap, RepoPath};
use crate::store::{FsObjectStore, ObjectStore};

/// Result of [`Repository::init`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InitOutcome {
    Created,
    AlreadyInitialized,
}

/// Result of [`Repository::add`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AddReport {
    /// Paths staged, sorted.
    pub staged: Vec<RepoPath>,
    /// Paths skipped by the ignore predicate, sorted.
    pub ignored: Vec<RepoPath>,
}

/// Result of [`Repository::commit`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommitOutcome {
    /// The staging index was empty. Nothing was written.
    NothingToCommit,
    Committed {
        digest: Digest,
        /// Branch advanced by the commit; `None` when HEAD is detached.
        branch: Option<BranchName>,
        /// Number of files staged for this commit.
        file_count: usize,
    },
}

/// Result of [`Repository::checkout`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckoutReport {
    pub head: HeadState,
    /// Number of files written into the working tree.
    pub restored: usize,
}

/// Result of a successful [`Repository::merge`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergeOutcome {
    pub digest: Digest,
    pub files: FileMap,
}

/// One entry of [`Repository::branches`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BranchInfo {
    pub name: BranchName,
    /// `None` for an unborn branch.
    pub commit: Option<Digest>,
    /// HEAD names this branch.
    pub current: bool,
}

/// Result of [`Repository::status`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Status {
    pub head: HeadState,
    pub staged: FileMap,
}

/// A revision resolved for checkout.
enum Target {
    Branch(BranchName, Digest),
    Commit(Digest),
}

/// Handle on one repository.
pub struct Repository {
    paths: RepoPaths,
    config: Config,
    store: Box<dyn ObjectStore>,
    ignore: Box<dyn IgnorePredicate>,
}

impl std::fmt::Debug for Repository {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Repository")
            .field("paths", &self.paths)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl Repository {
    // =========================================================================
    // Construction
    // =========================================================================

    /// Create a repository at `root`, creating `root` if needed.
    ///
    /// An existing repository is opened unchanged and reported as
    /// [`InitOutcome::AlreadyInitialized`]. When `default_branch` is given
    /// it is recorded in the repo config and becomes the unborn branch
    /// HEAD names.
    pub fn init(
        root: &Path,
        default_branch: Option<BranchName>,
    ) -> Result<(Self, InitOutcome), RepoError> {
        fs::create_dir_all(root).map_err(|e| RepoError::io(root, e))?;
        let root = fs::canonicalize(root).map_err(|e| RepoError::io(root, e))?;
        let paths = RepoPaths::new(root.clone());

        if paths.is_repository() {
            tracing::debug!(root = %root.display(), "repository already initialized");
            return Ok((Self::open(&root)?, InitOutcome::AlreadyInitialized));
        }

        paths
            .ensure_dirs()
            .map_err(|e| RepoError::io(paths.state_dir(), e))?;
        let _lock = RepoLock::acquire(&paths)?;

        if let Some(branch) = default_branch {
            let repo_config = RepoConfig {
                default_branch: Some(branch.to_string()),
                ..RepoConfig::default()
            };
            Config::write_repo(&paths, &repo_config)?;
        }
        let branch = Config::load(Some(&paths))?.default_branch();

        let refs = RefStore::new(paths.clone());
        refs.create_unborn_branch(&branch)?;
        refs.write_head(&HeadState::Unborn {
            branch: branch.clone(),
        })?;

        let ignore_path = paths.ignore_path();
        if !ignore_path.exists() {
            write_atomic(
                &ignore_path,
                IgnorePatterns::default_file_contents().as_bytes(),
            )
            .map_err(|e| RepoError::io(&ignore_path, e))?;
        }

        tracing::info!(root = %root.display(), branch = %branch, "initialized repository");
        Ok((Self::open(&root)?, InitOutcome::Created))
    }

    /// Open the repository rooted exactly at `root`.
    ///
    /// # Errors
    ///
    /// - [`RepoError::NotARepo`] if `root` has no state directory
    /// - [`RepoError::Config`] if a config file is invalid
    pub fn open(root: &Path) -> Result<Self, RepoError> {
        let not_a_repo = || RepoError::NotARepo {
            path: root.to_path_buf(),
        };
        let root = fs::canonicalize(root).map_err(|_| not_a_repo())?;
        let paths = RepoPaths::new(root);
        if !paths.is_repository() {
            return Err(not_a_repo());
        }

        let config = Config::load(Some(&paths))?;
        if let Some(path) = config.repo_config_loaded_from() {
            tracing::debug!(path = %path.display(), "loaded repository config");
        }
        let patterns =
            load_ignore_patterns(&paths).map_err(|e| RepoError::io(paths.ignore_path(), e))?;
        let store = FsObjectStore::new(paths.objects_dir());

        Ok(Self {
            paths,
            config,
            store: Box::new(store),
            ignore: Box::new(patterns),
        })
    }

    /// Open the nearest repository at or above `start`.
    pub fn discover(start: &Path) -> Result<Self, RepoError> {
        let absolute = fs::canonicalize(start).map_err(|_| RepoError::NotARepo {
            path: start.to_path_buf(),
        })?;

        for dir in absolute.ancestors() {
            if RepoPaths::new(dir.to_path_buf()).is_repository() {
                tracing::debug!(root = %dir.display(), "discovered repository");
                return Self::open(dir);
            }
        }
        Err(RepoError::NotARepo { path: absolute })
    }

    /// Replace the ignore predicate loaded from the ignore file.
    pub fn with_ignore(mut self, predicate: impl IgnorePredicate + 'static) -> Self {
        self.ignore = Box::new(predicate);
        self
    }

    /// Replace the object store.
    pub fn with_store(mut self, store: impl ObjectStore + 'static) -> Self {
        self.store = Box::new(store);
        self
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    pub fn paths(&self) -> &RepoPaths {
        &self.paths
    }

    /// Root of the working tree.
    pub fn work_dir(&self) -> &Path {
        self.paths.work_dir()
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn store(&self) -> &dyn ObjectStore {
        self.store.as_ref()
    }

    pub fn refs(&self) -> RefStore {
        RefStore::new(self.paths.clone())
    }

    pub fn index(&self) -> StagingIndex {
        StagingIndex::new(self.paths.clone())
    }

    pub fn graph(&self) -> CommitGraph<'_> {
        CommitGraph::new(self.store.as_ref())
    }

    fn lock(&self) -> Result<RepoLock, RepoError> {
        Ok(RepoLock::acquire(&self.paths)?)
    }

    // =========================================================================
    // Staging and committing
    // =========================================================================

    /// Stage files.
    ///
    /// Relative paths are taken from the repository root; absolute paths
    /// must lie inside the working tree. Directories are expanded
    /// recursively, never descending into the state directory.
    ///
    /// # Errors
    ///
    /// - [`RepoError::PathNotFound`] if an input does not exist
    /// - [`RepoError::PathOutsideRepo`] if an input resolves outside the
    ///   working tree
    pub fn add(&self, inputs: &[PathBuf]) -> Result<AddReport, RepoError> {
        let _lock = self.lock()?;

        let mut candidates = BTreeMap::new();
        for input in inputs {
            self.collect_files(input, &mut candidates)?;
        }

        let mut report = AddReport::default();
        let mut entries = Vec::with_capacity(candidates.len());
        for (path, absolute) in candidates {
            if in_state_dir(&path) || self.ignore.is_ignored(&path) {
                tracing::debug!(path = %path, "ignoring path");
                report.ignored.push(path);
                continue;
            }
            let bytes = fs::read(&absolute).map_err(|e| RepoError::io(&absolute, e))?;
            let digest = self.store.put(&bytes)?;
            entries.push((path.clone(), digest));
            report.staged.push(path);
        }

        if !entries.is_empty() {
            self.index().stage_all(entries)?;
        }
        tracing::info!(
            staged = report.staged.len(),
            ignored = report.ignored.len(),
            "staged files"
        );
        Ok(report)
    }

    /// Record the staged entries as a new commit.
    ///
    /// An empty index is reported as [`CommitOutcome::NothingToCommit`],
    /// not an error.
    pub fn commit(&self, message: &str) -> Result<CommitOutcome, RepoError> {
        let _lock = self.lock()?;

        let staged = self.index().load()?;
        if staged.is_empty() {
            return Ok(CommitOutcome::NothingToCommit);
        }
        let file_count = staged.len();
        let (digest, branch) = self.record_commit(message, staged)?;
        Ok(CommitOutcome::Committed {
            digest,
            branch,
            file_count,
        })
    }

    /// Build, store and reference a commit, then clear the index.
    /// Returns the new digest and the branch that moved, if any.
    ///
    /// Caller holds the lock.
    fn record_commit(
        &self,
        message: &str,
        staged: FileMap,
    ) -> Result<(Digest, Option<BranchName>), RepoError> {
        let refs = self.refs();
        let head = refs.read_head()?;
        let parent = refs.head_commit()?;

        let file_count = staged.len();
        let files = match (self.config.snapshot_mode(), &parent) {
            (SnapshotMode::Layered, Some(parent)) => {
                let mut files = self.graph().load(parent)?.files;
                files.extend(staged);
                files
            }
            _ => staged,
        };

        let digest = self.graph().append(message, files, parent)?;

        let branch = match head {
            HeadState::Unborn { branch } => {
                refs.update_branch(&branch, &digest)?;
                refs.write_head(&HeadState::Attached(branch.clone()))?;
                Some(branch)
            }
            HeadState::Attached(branch) => {
                refs.update_branch(&branch, &digest)?;
                Some(branch)
            }
            HeadState::Detached(_) => {
                refs.write_head(&HeadState::Detached(digest.clone()))?;
                None
            }
        };

        self.index().clear()?;
        tracing::info!(
            commit = %digest.short(12),
            branch = ?branch.as_ref().map(BranchName::as_str),
            files = file_count,
            "created commit"
        );

        Ok((digest, branch))
    }

    // =========================================================================
    // Branches and navigation
    // =========================================================================

    /// Create a branch at HEAD's commit.
    pub fn branch(&self, name: &BranchName) -> Result<Digest, RepoError> {
        let _lock = self.lock()?;
        let digest = self.refs().create_branch(name)?;
        tracing::info!(branch = %name, commit = %digest.short(12), "created branch");
        Ok(digest)
    }

    /// Every branch, sorted, with HEAD's branch marked.
    pub fn branches(&self) -> Result<Vec<BranchInfo>, RepoError> {
        let refs = self.refs();
        let head = refs.read_head()?;
        refs.list_branches()?
            .into_iter()
            .map(|name| {
                Ok(BranchInfo {
                    commit: refs.resolve_branch(&name)?,
                    current: head.branch() == Some(&name),
                    name,
                })
            })
            .collect()
    }

    /// Move HEAD to a branch or commit and restore its files.
    ///
    /// A branch name wins over a digest. Files absent from the target
    /// snapshot are left in the working tree. Checking out the branch
    /// HEAD already names is allowed, including while it is unborn.
    pub fn checkout(&self, target: &str) -> Result<CheckoutReport, RepoError> {
        let _lock = self.lock()?;
        let refs = self.refs();

        if let Ok(name) = BranchName::new(target) {
            let current = refs.read_head()?;
            if refs.resolve_branch(&name)?.is_none() && current.branch() == Some(&name) {
                return Ok(CheckoutReport {
                    head: current,
                    restored: 0,
                });
            }
        }

        let (head, digest) = match self.resolve_target(target)? {
            Target::Branch(name, digest) => (HeadState::Attached(name), digest),
            Target::Commit(digest) => (HeadState::Detached(digest.clone()), digest),
        };

        // Load before touching anything so a bad target has no side effects.
        let commit = self.graph().load(&digest)?;
        let restored = worktree::restore(&self.paths, self.store(), &commit.files)?;
        refs.write_head(&head)?;

        tracing::info!(head = %head, restored, "checked out");
        Ok(CheckoutReport { head, restored })
    }

    /// Resolve `HEAD`, a branch name, or a full commit digest.
    pub fn resolve_rev(&self, rev: &str) -> Result<Digest, RepoError> {
        if rev == "HEAD" {
            let refs = self.refs();
            return match refs.head_commit()? {
                Some(digest) => Ok(digest),
                None => Err(RepoError::Unborn {
                    branch: refs.read_head()?.branch().cloned().unwrap_or_default(),
                }),
            };
        }

        Ok(match self.resolve_target(rev)? {
            Target::Branch(_, digest) | Target::Commit(digest) => digest,
        })
    }

    fn resolve_target(&self, rev: &str) -> Result<Target, RepoError> {
        let refs = self.refs();

        if let Ok(name) = BranchName::new(rev) {
            if let Some(digest) = refs.resolve_branch(&name)? {
                return Ok(Target::Branch(name, digest));
            }
            if refs.branch_exists(&name) {
                return Err(RepoError::UnbornBranch { name });
            }
        }

        let not_found = || RepoError::RevisionNotFound {
            rev: rev.to_string(),
        };
        let digest = Digest::new(rev).map_err(|_| not_found())?;
        if !self.graph().is_commit(&digest)? {
            return Err(not_found());
        }
        Ok(Target::Commit(digest))
    }

    // =========================================================================
    // History and comparison
    // =========================================================================

    /// History from HEAD, newest first. Empty when HEAD is unborn.
    pub fn log(&self) -> Result<Vec<(Digest, Commit)>, RepoError> {
        match self.refs().head_commit()? {
            Some(head) => self.graph().walk(head).collect(),
            None => Ok(Vec::new()),
        }
    }

    /// Compare the snapshots two revisions name.
    pub fn diff(&self, a: &str, b: &str) -> Result<TreeDiff, RepoError> {
        let graph = self.graph();
        let a = graph.load(&self.resolve_rev(a)?)?;
        let b = graph.load(&self.resolve_rev(b)?)?;
        Ok(worktree::diff_file_maps(&a.files, &b.files))
    }

    /// Two-way merge of `branch` into HEAD.
    ///
    /// On success the merged file map is staged and committed with HEAD
    /// as the only parent. The working tree is not modified.
    ///
    /// # Errors
    ///
    /// - [`RepoError::StagedChangesPending`] if the index is not empty
    /// - [`RepoError::Unborn`] if HEAD has no commit
    /// - [`RepoError::BranchNotFound`] / [`RepoError::UnbornBranch`] for a
    ///   bad target
    /// - [`RepoError::MergeConflict`] listing every conflicting path; the
    ///   index and refs are untouched
    pub fn merge(&self, branch: &BranchName) -> Result<MergeOutcome, RepoError> {
        let _lock = self.lock()?;
        let refs = self.refs();
        let index = self.index();

        if !index.is_empty()? {
            return Err(RepoError::StagedChangesPending);
        }

        let head = refs.read_head()?;
        let Some(current_digest) = refs.head_commit()? else {
            return Err(RepoError::Unborn {
                branch: head.branch().cloned().unwrap_or_default(),
            });
        };

        let Some(incoming_digest) = refs.resolve_branch(branch)? else {
            return Err(if refs.branch_exists(branch) {
                RepoError::UnbornBranch {
                    name: branch.clone(),
                }
            } else {
                RepoError::BranchNotFound {
                    name: branch.clone(),
                }
            });
        };

        let graph = self.graph();
        let current = graph.load(&current_digest)?;
        let incoming = graph.load(&incoming_digest)?;

        let merged = worktree::merge_file_maps(&current.files, &incoming.files).map_err(
            |paths| {
                tracing::info!(branch = %branch, conflicts = paths.len(), "merge conflict");
                RepoError::MergeConflict {
                    branch: branch.clone(),
                    paths,
                }
            },
        )?;

        index.replace(&merged)?;
        let message = format!("Merge branch '{}'", branch);
        let (digest, _) = self.record_commit(&message, merged.clone())?;

        tracing::info!(branch = %branch, commit = %digest.short(12), "merged branch");
        Ok(MergeOutcome {
            digest,
            files: merged,
        })
    }

    // =========================================================================
    // Whole-repository operations
    // =========================================================================

    /// Copy the working tree and state directory to `dest`.
    ///
    /// `dest` must not exist. The lock file is not copied. Returns the
    /// number of files copied.
    pub fn clone_to(&self, dest: &Path) -> Result<usize, RepoError> {
        let lock = self.lock()?;

        if dest.exists() {
            return Err(RepoError::DestinationExists {
                path: dest.to_path_buf(),
            });
        }
        fs::create_dir_all(dest).map_err(|e| RepoError::io(dest, e))?;
        let dest = fs::canonicalize(dest).map_err(|e| RepoError::io(dest, e))?;

        let source = self.work_dir();
        let skip_dest = dest.clone();
        let walker = WalkBuilder::new(source)
            .standard_filters(false)
            .hidden(false)
            .follow_links(false)
            .filter_entry(move |entry| entry.path() != skip_dest)
            .build();

        let mut copied = 0;
        for entry in walker {
            let entry = entry.map_err(|e| walk_error(source, e))?;
            let Ok(relative) = entry.path().strip_prefix(source) else {
                continue;
            };
            if relative.as_os_str().is_empty() || entry.path() == lock.path() {
                continue;
            }

            let target = dest.join(relative);
            match entry.file_type() {
                Some(ft) if ft.is_dir() => {
                    fs::create_dir_all(&target).map_err(|e| RepoError::io(&target, e))?;
                }
                Some(ft) if ft.is_file() => {
                    if let Some(parent) = target.parent() {
                        fs::create_dir_all(parent).map_err(|e| RepoError::io(parent, e))?;
                    }
                    fs::copy(entry.path(), &target).map_err(|e| RepoError::io(&target, e))?;
                    copied += 1;
                }
                _ => {}
            }
        }

        tracing::info!(dest = %dest.display(), files = copied, "cloned repository");
        Ok(copied)
    }

    /// HEAD and the staged entries.
    pub fn status(&self) -> Result<Status, RepoError> {
        Ok(Status {
            head: self.refs().read_head()?,
            staged: self.index().load()?,
        })
    }

    // =========================================================================
    // Helpers
    // =========================================================================

    /// Resolve one `add` input into `(repo path, absolute path)` pairs.
    fn collect_files(
        &self,
        input: &Path,
        out: &mut BTreeMap<RepoPath, PathBuf>,
    ) -> Result<(), RepoError> {
        let joined = if input.is_absolute() {
            input.to_path_buf()
        } else {
            self.work_dir().join(input)
        };
        let absolute = fs::canonicalize(&joined).map_err(|e| match e.kind() {
            io::ErrorKind::NotFound => RepoError::PathNotFound {
                path: input.to_path_buf(),
            },
            _ => RepoError::io(&joined, e),
        })?;
        if !absolute.starts_with(self.work_dir()) {
            return Err(RepoError::PathOutsideRepo {
                path: input.to_path_buf(),
            });
        }

        if absolute.is_file() {
            if let Some(path) = self.repo_path(&absolute)? {
                out.insert(path, absolute);
            }
            return Ok(());
        }

        let walker = WalkBuilder::new(&absolute)
            .standard_filters(false)
            .hidden(false)
            .follow_links(false)
            .filter_entry(|entry| entry.file_name() != STATE_DIR_NAME)
            .build();

        for entry in walker {
            let entry = entry.map_err(|e| walk_error(&absolute, e))?;
            if !entry.file_type().is_some_and(|ft| ft.is_file()) {
                continue;
            }
            if let Some(path) = self.repo_path(entry.path())? {
                out.insert(path, entry.into_path());
            }
        }
        Ok(())
    }

    fn repo_path(&self, absolute: &Path) -> Result<Option<RepoPath>, RepoError> {
        match absolute.strip_prefix(self.work_dir()) {
            Ok(relative) if relative.as_os_str().is_empty() => Ok(None),
            Ok(relative) => Ok(Some(RepoPath::from_relative(relative)?)),
            Err(_) => Err(RepoError::PathOutsideRepo {
                path: absolute.to_path_buf(),
            }),
        }
    }
}

fn in_state_dir(path: &RepoPath) -> bool {
    path.as_str().split('/').next() == Some(STATE_DIR_NAME)
}

fn walk_error(root: &Path, err: ignore::Error) -> RepoError {
    let message = err.to_string();
    let source = err
        .into_io_error()
        .unwrap_or_else(|| io::Error::new(io::ErrorKind::Other, message));
    RepoError::io(root, source)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryObjectStore;
    use tempfile::TempDir;

    fn setup() -> (TempDir, Repository) {
        let temp = TempDir::new().unwrap();
        let (repo, outcome) = Repository::init(temp.path(), None).unwrap();
        assert_eq!(outcome, InitOutcome::Created);
        (temp, repo)
    }

    fn write(repo: &Repository, path: &str, contents: &str) {
        let target = repo.work_dir().join(path);
        fs::create_dir_all(target.parent().unwrap()).unwrap();
        fs::write(target, contents).unwrap();
    }

    fn add(repo: &Repository, paths: &[&str]) -> AddReport {
        let inputs: Vec<PathBuf> = paths.iter().map(PathBuf::from).collect();
        repo.add(&inputs).unwrap()
    }

    fn commit(repo: &Repository, message: &str) -> Digest {
        match repo.commit(message).unwrap() {
            CommitOutcome::Committed { digest, .. } => digest,
            CommitOutcome::NothingToCommit => panic!("expected a commit"),
        }
    }

    fn rp(path: &str) -> RepoPath {
        RepoPath::new(path).unwrap()
    }

    fn branch(name: &str) -> BranchName {
        BranchName::new(name).unwrap()
    }

    #[test]
    fn init_creates_layout() {
        let (_temp, repo) = setup();
        let paths = repo.paths();

        assert!(paths.objects_dir().is_dir());
        assert!(paths.heads_dir().is_dir());
        assert_eq!(
            fs::read_to_string(paths.head_path()).unwrap(),
            "refs/heads/main"
        );
        assert_eq!(
            fs::read_to_string(paths.branch_path(&branch("main"))).unwrap(),
            ""
        );
        assert_eq!(
            fs::read_to_string(paths.ignore_path()).unwrap(),
            ".giclone\n"
        );
        assert!(!paths.index_path().exists());
    }

    #[test]
    fn init_twice_reports_existing() {
        let (temp, _repo) = setup();
        let (_, outcome) = Repository::init(temp.path(), None).unwrap();
        assert_eq!(outcome, InitOutcome::AlreadyInitialized);
    }

    #[test]
    fn init_with_custom_default_branch() {
        let temp = TempDir::new().unwrap();
        let (repo, _) = Repository::init(temp.path(), Some(branch("trunk"))).unwrap();

        assert_eq!(
            repo.status().unwrap().head,
            HeadState::Unborn {
                branch: branch("trunk")
            }
        );
        assert_eq!(repo.config().default_branch(), branch("trunk"));
    }

    #[test]
    fn open_non_repo_fails() {
        let temp = TempDir::new().unwrap();
        let err = Repository::open(temp.path()).unwrap_err();
        assert!(matches!(err, RepoError::NotARepo { .. }));
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }

    #[test]
    fn discover_from_subdirectory() {
        let (temp, repo) = setup();
        let nested = temp.path().join("a/b");
        fs::create_dir_all(&nested).unwrap();

        let found = Repository::discover(&nested).unwrap();
        assert_eq!(found.work_dir(), repo.work_dir());
    }

    #[test]
    fn add_expands_directories_and_skips_state() {
        let (_temp, repo) = setup();
        write(&repo, "src/a.rs", "a");
        write(&repo, "src/nested/b.rs", "b");

        let report = add(&repo, &["."]);
        assert_eq!(report.staged, vec![rp("src/a.rs"), rp("src/nested/b.rs")]);

        let staged = repo.index().load().unwrap();
        assert!(staged.keys().all(|p| !p.as_str().starts_with(".giclone")));
    }

    #[test]
    fn add_honors_ignore_file() {
        let (_temp, repo) = setup();
        fs::write(repo.paths().ignore_path(), ".giclone\n# comment\n.log\n").unwrap();
        let repo = Repository::open(repo.work_dir()).unwrap();
        write(&repo, "keep.txt", "k");
        write(&repo, "debug.log", "d");

        let report = add(&repo, &["keep.txt", "debug.log"]);
        assert_eq!(report.staged, vec![rp("keep.txt")]);
        assert_eq!(report.ignored, vec![rp("debug.log")]);
    }

    #[test]
    fn add_with_custom_predicate() {
        let (_temp, repo) = setup();
        let repo = repo.with_ignore(|p: &RepoPath| p.as_str().starts_with("tmp"));
        write(&repo, "tmp.txt", "t");
        write(&repo, "real.txt", "r");

        let report = add(&repo, &["tmp.txt", "real.txt"]);
        assert_eq!(report.staged, vec![rp("real.txt")]);
        assert_eq!(report.ignored, vec![rp("tmp.txt")]);
    }

    #[test]
    fn add_missing_path_fails() {
        let (_temp, repo) = setup();
        let err = repo.add(&[PathBuf::from("nope.txt")]).unwrap_err();
        assert!(matches!(err, RepoError::PathNotFound { .. }));
    }

    #[test]
    fn add_outside_repo_fails() {
        let (_temp, repo) = setup();
        let outside = TempDir::new().unwrap();
        let file = outside.path().join("x.txt");
        fs::write(&file, "x").unwrap();

        let err = repo.add(&[file]).unwrap_err();
        assert!(matches!(err, RepoError::PathOutsideRepo { .. }));
    }

    #[test]
    fn commit_with_empty_index_is_noop() {
        let (_temp, repo) = setup();
        assert_eq!(repo.commit("nothing").unwrap(), CommitOutcome::NothingToCommit);
        assert!(repo.log().unwrap().is_empty());
    }

    #[test]
    fn first_commit_attaches_head() {
        let (_temp, repo) = setup();
        write(&repo, "a.txt", "A");
        add(&repo, &["a.txt"]);

        let outcome = repo.commit("c1").unwrap();
        let CommitOutcome::Committed {
            digest,
            branch: Some(b),
            file_count,
        } = outcome
        else {
            panic!("expected commit on a branch");
        };
        assert_eq!(b, branch("main"));
        assert_eq!(file_count, 1);

        let status = repo.status().unwrap();
        assert_eq!(status.head, HeadState::Attached(branch("main")));
        assert!(status.staged.is_empty());
        assert_eq!(repo.resolve_rev("HEAD").unwrap(), digest);
    }

    #[test]
    fn layered_commit_keeps_parent_files() {
        let (_temp, repo) = setup();
        write(&repo, "a.txt", "A");
        add(&repo, &["a.txt"]);
        commit(&repo, "c1");

        write(&repo, "b.txt", "B");
        add(&repo, &["b.txt"]);
        let c2 = commit(&repo, "c2");

        let files = repo.graph().load(&c2).unwrap().files;
        assert_eq!(files.keys().cloned().collect::<Vec<_>>(), vec![rp("a.txt"), rp("b.txt")]);
    }

    #[test]
    fn override_commit_records_only_staged() {
        let (_temp, repo) = setup();
        Config::write_repo(
            repo.paths(),
            &RepoConfig {
                snapshot: Some(SnapshotMode::Override),
                ..RepoConfig::default()
            },
        )
        .unwrap();
        let repo = Repository::open(repo.work_dir()).unwrap();

        write(&repo, "a.txt", "A");
        add(&repo, &["a.txt"]);
        commit(&repo, "c1");
        write(&repo, "b.txt", "B");
        add(&repo, &["b.txt"]);
        let c2 = commit(&repo, "c2");

        let files = repo.graph().load(&c2).unwrap().files;
        assert_eq!(files.keys().cloned().collect::<Vec<_>>(), vec![rp("b.txt")]);
    }

    #[test]
    fn branch_before_first_commit_fails() {
        let (_temp, repo) = setup();
        let err = repo.branch(&branch("feature")).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidState);
    }

    #[test]
    fn branches_marks_current() {
        let (_temp, repo) = setup();
        write(&repo, "a.txt", "A");
        add(&repo, &["a.txt"]);
        let c1 = commit(&repo, "c1");
        repo.branch(&branch("feature")).unwrap();

        let infos = repo.branches().unwrap();
        assert_eq!(infos.len(), 2);
        assert_eq!(infos[0].name, branch("feature"));
        assert!(!infos[0].current);
        assert_eq!(infos[1].name, branch("main"));
        assert!(infos[1].current);
        assert_eq!(infos[1].commit, Some(c1));
    }

    #[test]
    fn checkout_commit_detaches_and_commit_moves_detached_head() {
        let (_temp, repo) = setup();
        write(&repo, "a.txt", "A");
        add(&repo, &["a.txt"]);
        let c1 = commit(&repo, "c1");

        let report = repo.checkout(c1.as_str()).unwrap();
        assert_eq!(report.head, HeadState::Detached(c1.clone()));

        write(&repo, "b.txt", "B");
        add(&repo, &["b.txt"]);
        let outcome = repo.commit("detached work").unwrap();
        let CommitOutcome::Committed { digest, branch: None, .. } = outcome else {
            panic!("expected detached commit");
        };

        assert_eq!(repo.status().unwrap().head, HeadState::Detached(digest));
        // main did not move.
        assert_eq!(repo.resolve_rev("main").unwrap(), c1);
    }

    #[test]
    fn checkout_unknown_target_has_no_side_effects() {
        let (_temp, repo) = setup();
        write(&repo, "a.txt", "A");
        add(&repo, &["a.txt"]);
        commit(&repo, "c1");

        let err = repo.checkout("does-not-exist").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
        let err = repo.checkout(Digest::of(b"nope").as_str()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
        assert_eq!(repo.status().unwrap().head, HeadState::Attached(branch("main")));
    }

    #[test]
    fn checkout_blob_digest_is_rejected() {
        let (_temp, repo) = setup();
        write(&repo, "a.txt", "A");
        add(&repo, &["a.txt"]);
        commit(&repo, "c1");

        let blob = Digest::of(b"A");
        assert!(matches!(
            repo.checkout(blob.as_str()),
            Err(RepoError::RevisionNotFound { .. })
        ));
    }

    #[test]
    fn checkout_current_unborn_branch_is_noop() {
        let (_temp, repo) = setup();
        let report = repo.checkout("main").unwrap();
        assert_eq!(report.restored, 0);
    }

    #[test]
    fn merge_refuses_with_staged_changes() {
        let (_temp, repo) = setup();
        write(&repo, "a.txt", "A");
        add(&repo, &["a.txt"]);
        commit(&repo, "c1");
        repo.branch(&branch("feature")).unwrap();
        write(&repo, "b.txt", "B");
        add(&repo, &["b.txt"]);

        assert!(matches!(
            repo.merge(&branch("feature")),
            Err(RepoError::StagedChangesPending)
        ));
    }

    #[test]
    fn merge_unknown_branch_fails() {
        let (_temp, repo) = setup();
        write(&repo, "a.txt", "A");
        add(&repo, &["a.txt"]);
        commit(&repo, "c1");

        assert!(matches!(
            repo.merge(&branch("ghost")),
            Err(RepoError::BranchNotFound { .. })
        ));
    }

    #[test]
    fn merge_of_identical_branch_records_commit() {
        let (_temp, repo) = setup();
        write(&repo, "a.txt", "A");
        add(&repo, &["a.txt"]);
        let c1 = commit(&repo, "c1");
        repo.branch(&branch("feature")).unwrap();

        let outcome = repo.merge(&branch("feature")).unwrap();
        assert_ne!(outcome.digest, c1);
        let merge = repo.graph().load(&outcome.digest).unwrap();
        assert_eq!(merge.parent, Some(c1.clone()));
        assert_eq!(merge.files, repo.graph().load(&c1).unwrap().files);
        assert_eq!(repo.resolve_rev("main").unwrap(), outcome.digest);
    }

    #[test]
    fn merge_on_unborn_head_fails() {
        let (_temp, repo) = setup();
        let err = repo.merge(&branch("main")).unwrap_err();
        assert!(matches!(err, RepoError::Unborn { .. }));
    }

    #[test]
    fn clone_copies_everything_but_lock() {
        let (temp, repo) = setup();
        write(&repo, "a.txt", "A");
        add(&repo, &["a.txt"]);
        commit(&repo, "c1");

        let dest_root = TempDir::new().unwrap();
        let dest = dest_root.path().join("copy");
        let copied = repo.clone_to(&dest).unwrap();
        assert!(copied > 0);

        let cloned = Repository::open(&dest).unwrap();
        assert_eq!(cloned.log().unwrap().len(), 1);
        assert!(!cloned.paths().lock_path().exists());
        assert_eq!(fs::read_to_string(dest.join("a.txt")).unwrap(), "A");

        let err = repo.clone_to(&dest).unwrap_err();
        assert!(matches!(err, RepoError::DestinationExists { .. }));
        drop(temp);
    }

    #[test]
    fn clone_into_own_subdirectory_terminates() {
        let (temp, repo) = setup();
        write(&repo, "a.txt", "A");

        let dest = temp.path().join("backup");
        repo.clone_to(&dest).unwrap();
        assert!(dest.join("a.txt").exists());
        assert!(!dest.join("backup").exists());
    }

    #[test]
    fn engine_runs_on_memory_store() {
        let (_temp, repo) = setup();
        let repo = repo.with_store(MemoryObjectStore::new());
        write(&repo, "a.txt", "A");
        add(&repo, &["a.txt"]);
        let c1 = commit(&repo, "c1");

        assert!(repo.store().exists(&c1).unwrap());
        assert!(fs::read_dir(repo.paths().objects_dir())
            .unwrap()
            .next()
            .is_none());
    }
}
