//! core::types
//!
//! Strong types for core domain concepts.
//!
//! # Types
//!
//! - [`BranchName`] - Validated branch name
//! - [`Digest`] - SHA-256 content digest, the key of every stored object
//! - [`RepoPath`] - Working-tree path relative to the repository root
//! - [`FileMap`] - Snapshot of tracked paths to blob digests
//!
//! # Validation
//!
//! These types enforce validity at construction time. Invalid values
//! cannot be represented, and they cannot be deserialized either: every
//! type round-trips through serde as a plain string and is re-validated
//! on the way in.
//!
//! # Examples
//!
//! ```
//! use giclone::core::types::{BranchName, Digest, RepoPath};
//!
//! let branch = BranchName::new("feature/my-branch").unwrap();
//! let digest = Digest::of(b"hello");
//! let path = RepoPath::new("src/main.rs").unwrap();
//!
//! assert_eq!(branch.head_ref(), "refs/heads/feature/my-branch");
//! assert_eq!(digest.as_str().len(), 64);
//! assert_eq!(path.as_str(), "src/main.rs");
//!
//! assert!(BranchName::new("invalid..name").is_err());
//! assert!(Digest::new("not-a-sha").is_err());
//! assert!(RepoPath::new("../escape").is_err());
//! ```

use std::collections::BTreeMap;
use std::path::{Component, Path, PathBuf};

use serde::{Deserialize, Serialize};
use sha2::{Digest as _, Sha256};
use thiserror::Error;

/// Errors from type validation.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TypeError {
    #[error("invalid branch name: {0}")]
    InvalidBranchName(String),

    #[error("invalid digest: {0}")]
    InvalidDigest(String),

    #[error("invalid path: {0}")]
    InvalidPath(String),
}

/// Snapshot of tracked contents: working-tree path to blob digest.
///
/// A `BTreeMap` keeps iteration (and therefore serialization) sorted by
/// path, which is what makes commit digests deterministic.
pub type FileMap = BTreeMap<RepoPath, Digest>;

/// Prefix under which branch refs live, both in HEAD and on disk.
pub const HEADS_PREFIX: &str = "refs/heads/";

/// Branch used when no configuration names one.
pub const DEFAULT_BRANCH: &str = "main";

/// A validated branch name.
///
/// Branch names follow git's refname rules:
/// - Cannot be empty
/// - Cannot start with `.` or `-`
/// - Cannot end with `.lock` or `/`
/// - Cannot contain `..`, `@{`, `//`, or ASCII control characters
/// - Cannot contain spaces, `~`, `^`, `:`, `\`, `?`, `*`, `[`
/// - Cannot be exactly `@`
///
/// Names may contain `/`; they are stored as nested files under
/// `refs/heads/`.
///
/// # Example
///
/// ```
/// use giclone::core::types::BranchName;
///
/// let name = BranchName::new("feature/my-branch").unwrap();
/// assert_eq!(name.as_str(), "feature/my-branch");
///
/// assert!(BranchName::new("").is_err());
/// assert!(BranchName::new(".hidden").is_err());
/// assert!(BranchName::new("branch.lock").is_err());
/// assert!(BranchName::new("has space").is_err());
/// assert!(BranchName::new("@").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct BranchName(String);

impl BranchName {
    /// Create a new validated branch name.
    ///
    /// # Errors
    ///
    /// Returns `TypeError::InvalidBranchName` if the name violates refname rules.
    pub fn new(name: impl Into<String>) -> Result<Self, TypeError> {
        let name = name.into();
        Self::validate(&name)?;
        Ok(Self(name))
    }

    /// Parse the symbolic form stored in HEAD (`refs/heads/<name>`).
    ///
    /// Returns `None` when `text` is not under `refs/heads/`.
    pub fn from_head_ref(text: &str) -> Option<Result<Self, TypeError>> {
        text.strip_prefix(HEADS_PREFIX).map(Self::new)
    }

    /// The symbolic ref HEAD stores for this branch.
    pub fn head_ref(&self) -> String {
        format!("{}{}", HEADS_PREFIX, self.0)
    }

    fn validate(name: &str) -> Result<(), TypeError> {
        let fail = |msg: &str| Err(TypeError::InvalidBranchName(msg.to_string()));

        if name.is_empty() {
            return fail("branch name cannot be empty");
        }
        if name == "@" {
            return fail("branch name cannot be '@' (reserved)");
        }
        if name == "HEAD" {
            return fail("branch name cannot be 'HEAD' (reserved)");
        }
        if name.starts_with('.') {
            return fail("branch name cannot start with '.'");
        }
        if name.starts_with('-') {
            return fail("branch name cannot start with '-'");
        }
        if name.ends_with(".lock") {
            return fail("branch name cannot end with '.lock'");
        }
        if name.ends_with('/') {
            return fail("branch name cannot end with '/'");
        }
        if name.starts_with('/') {
            return fail("branch name cannot start with '/'");
        }
        for seq in ["..", "@{", "//"] {
            if name.contains(seq) {
                return Err(TypeError::InvalidBranchName(format!(
                    "branch name cannot contain '{seq}'"
                )));
            }
        }

        const INVALID_CHARS: [char; 8] = [' ', '~', '^', ':', '\\', '?', '*', '['];
        for c in INVALID_CHARS {
            if name.contains(c) {
                return Err(TypeError::InvalidBranchName(format!(
                    "branch name cannot contain '{c}'"
                )));
            }
        }

        if name.chars().any(|c| c.is_ascii_control()) {
            return fail("branch name cannot contain control characters");
        }

        for component in name.split('/') {
            if component.starts_with('.') {
                return fail("path component cannot start with '.'");
            }
            if component.ends_with(".lock") {
                return fail("path component cannot end with '.lock'");
            }
        }

        Ok(())
    }

    /// Get the branch name as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for BranchName {
    fn default() -> Self {
        Self(DEFAULT_BRANCH.to_string())
    }
}

impl TryFrom<String> for BranchName {
    type Error = TypeError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::new(s)
    }
}

impl From<BranchName> for String {
    fn from(name: BranchName) -> Self {
        name.0
    }
}

impl AsRef<str> for BranchName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for BranchName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A SHA-256 content digest, rendered as 64 lowercase hex characters.
///
/// Blobs and commits share one namespace: both are stored under the
/// digest of their raw bytes.
///
/// # Example
///
/// ```
/// use giclone::core::types::Digest;
///
/// let d = Digest::of(b"A");
/// assert_eq!(d, Digest::of(b"A"));
/// assert_ne!(d, Digest::of(b"B"));
///
/// let parsed = Digest::new(d.as_str().to_uppercase()).unwrap();
/// assert_eq!(parsed, d);
/// assert_eq!(d.short(7).len(), 7);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Digest(String);

impl Digest {
    /// Length of a rendered digest.
    pub const HEX_LEN: usize = 64;

    /// Compute the digest of raw bytes.
    pub fn of(bytes: &[u8]) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(bytes);
        Self(hex::encode(hasher.finalize()))
    }

    /// Parse a digest from its hex form.
    ///
    /// The digest is normalized to lowercase.
    ///
    /// # Errors
    ///
    /// Returns `TypeError::InvalidDigest` if the string is not 64 hex characters.
    pub fn new(digest: impl Into<String>) -> Result<Self, TypeError> {
        let digest = digest.into().to_ascii_lowercase();
        if digest.len() != Self::HEX_LEN {
            return Err(TypeError::InvalidDigest(format!(
                "expected {} hex characters, got {}",
                Self::HEX_LEN,
                digest.len()
            )));
        }
        if !digest.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(TypeError::InvalidDigest("digest must be hexadecimal".into()));
        }
        Ok(Self(digest))
    }

    /// Get an abbreviated form of the digest.
    ///
    /// Returns the first `len` characters, or the full digest if `len`
    /// exceeds its length.
    pub fn short(&self, len: usize) -> &str {
        &self.0[..len.min(self.0.len())]
    }

    /// Get the digest as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for Digest {
    type Error = TypeError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::new(s)
    }
}

impl From<Digest> for String {
    fn from(digest: Digest) -> Self {
        digest.0
    }
}

impl AsRef<str> for Digest {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Digest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A working-tree path relative to the repository root.
///
/// Always `/`-separated, never absolute, and free of `.`, `..` and empty
/// components, so joining it onto the work tree can never escape it.
///
/// # Example
///
/// ```
/// use giclone::core::types::RepoPath;
/// use std::path::Path;
///
/// let p = RepoPath::from_relative(Path::new("docs/readme.md")).unwrap();
/// assert_eq!(p.as_str(), "docs/readme.md");
///
/// assert!(RepoPath::new("/etc/passwd").is_err());
/// assert!(RepoPath::new("a/../b").is_err());
/// assert!(RepoPath::new("").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct RepoPath(String);

impl RepoPath {
    /// Create a validated repository path from its `/`-separated form.
    ///
    /// # Errors
    ///
    /// Returns `TypeError::InvalidPath` for empty, absolute or
    /// non-normalized paths.
    pub fn new(path: impl Into<String>) -> Result<Self, TypeError> {
        let path = path.into();
        if path.is_empty() {
            return Err(TypeError::InvalidPath("path cannot be empty".into()));
        }
        if path.starts_with('/') {
            return Err(TypeError::InvalidPath(format!("'{path}' is absolute")));
        }
        if path.contains('\\') || path.contains('\0') {
            return Err(TypeError::InvalidPath(format!(
                "'{path}' contains a forbidden character"
            )));
        }
        for component in path.split('/') {
            if component.is_empty() || component == "." || component == ".." {
                return Err(TypeError::InvalidPath(format!(
                    "'{path}' is not a normalized relative path"
                )));
            }
        }
        Ok(Self(path))
    }

    /// Build a repository path from a relative file-system path.
    ///
    /// # Errors
    ///
    /// Returns `TypeError::InvalidPath` if the path is absolute, contains
    /// `..`, or is not valid UTF-8.
    pub fn from_relative(path: &Path) -> Result<Self, TypeError> {
        let mut parts = Vec::new();
        for component in path.components() {
            match component {
                Component::Normal(part) => {
                    let part = part.to_str().ok_or_else(|| {
                        TypeError::InvalidPath(format!("{} is not valid UTF-8", path.display()))
                    })?;
                    parts.push(part);
                }
                Component::CurDir => {}
                _ => {
                    return Err(TypeError::InvalidPath(format!(
                        "{} is not a relative path inside the repository",
                        path.display()
                    )))
                }
            }
        }
        Self::new(parts.join("/"))
    }

    /// Convert to a platform path relative to the work tree.
    pub fn to_path_buf(&self) -> PathBuf {
        self.0.split('/').collect()
    }

    /// Get the path as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for RepoPath {
    type Error = TypeError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::new(s)
    }
}

impl From<RepoPath> for String {
    fn from(path: RepoPath) -> Self {
        path.0
    }
}

impl AsRef<str> for RepoPath {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for RepoPath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    mod branch_name {
        use super::*;

        #[test]
        fn valid_branch_names() {
            assert!(BranchName::new("main").is_ok());
            assert!(BranchName::new("feature/foo").is_ok());
            assert!(BranchName::new("fix-123").is_ok());
            assert!(BranchName::new("user@feature").is_ok());
            assert!(BranchName::new("with.dot").is_ok());
            assert!(BranchName::new("a/b/c/d").is_ok());
        }

        #[test]
        fn structural_violations_rejected() {
            assert!(BranchName::new("").is_err());
            assert!(BranchName::new(".hidden").is_err());
            assert!(BranchName::new("foo/.hidden").is_err());
            assert!(BranchName::new("-flag").is_err());
            assert!(BranchName::new("branch.lock").is_err());
            assert!(BranchName::new("foo/bar.lock").is_err());
            assert!(BranchName::new("branch/").is_err());
            assert!(BranchName::new("/branch").is_err());
            assert!(BranchName::new("bad..path").is_err());
            assert!(BranchName::new("foo@{bar").is_err());
            assert!(BranchName::new("foo//bar").is_err());
            assert!(BranchName::new("@").is_err());
            assert!(BranchName::new("HEAD").is_err());
            assert!(BranchName::new("HEADS").is_ok());
        }

        #[test]
        fn special_chars_rejected() {
            for bad in [
                "has space", "has~tilde", "has^caret", "has:colon", "has\\bs", "has?q",
                "has*star", "has[bracket", "has\ttab", "has\x7fDEL",
            ] {
                assert!(BranchName::new(bad).is_err(), "{bad:?} should be rejected");
            }
        }

        #[test]
        fn head_ref_roundtrip() {
            let name = BranchName::new("feature/x").unwrap();
            assert_eq!(name.head_ref(), "refs/heads/feature/x");
            let parsed = BranchName::from_head_ref(&name.head_ref()).unwrap().unwrap();
            assert_eq!(parsed, name);
            assert!(BranchName::from_head_ref("abc123").is_none());
        }

        #[test]
        fn deserialize_rejects_invalid() {
            let parsed: Result<BranchName, _> = serde_json::from_str("\"bad..name\"");
            assert!(parsed.is_err());
        }
    }

    mod digest {
        use super::*;

        #[test]
        fn of_is_sha256_hex() {
            // sha256("") is a well-known constant.
            assert_eq!(
                Digest::of(b"").as_str(),
                "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
            );
        }

        #[test]
        fn same_bytes_same_digest() {
            assert_eq!(Digest::of(b"A"), Digest::of(b"A"));
            assert_ne!(Digest::of(b"A"), Digest::of(b"B"));
        }

        #[test]
        fn normalizes_to_lowercase() {
            let d = Digest::of(b"x");
            let upper = Digest::new(d.as_str().to_uppercase()).unwrap();
            assert_eq!(upper, d);
        }

        #[test]
        fn invalid_length_or_alphabet() {
            assert!(Digest::new("").is_err());
            assert!(Digest::new("abc123").is_err());
            assert!(Digest::new("abc123def4567890abc123def4567890abc12345").is_err());
            assert!(Digest::new("z".repeat(64)).is_err());
        }

        #[test]
        fn short_form() {
            let d = Digest::of(b"x");
            assert_eq!(d.short(7), &d.as_str()[..7]);
            assert_eq!(d.short(100), d.as_str());
        }
    }

    mod repo_path {
        use super::*;

        #[test]
        fn valid_paths() {
            assert!(RepoPath::new("a.txt").is_ok());
            assert!(RepoPath::new("dir/sub/file.rs").is_ok());
            assert!(RepoPath::new(".hidden").is_ok());
        }

        #[test]
        fn rejects_escapes_and_garbage() {
            assert!(RepoPath::new("").is_err());
            assert!(RepoPath::new("/abs").is_err());
            assert!(RepoPath::new("../up").is_err());
            assert!(RepoPath::new("a/./b").is_err());
            assert!(RepoPath::new("a//b").is_err());
            assert!(RepoPath::new("trailing/").is_err());
            assert!(RepoPath::new("win\\path").is_err());
        }

        #[test]
        fn from_relative_normalizes_curdir() {
            let p = RepoPath::from_relative(Path::new("./dir/file.txt")).unwrap();
            assert_eq!(p.as_str(), "dir/file.txt");
        }

        #[test]
        fn from_relative_rejects_parent() {
            assert!(RepoPath::from_relative(Path::new("dir/../../x")).is_err());
        }

        #[test]
        fn to_path_buf_joins_components() {
            let p = RepoPath::new("a/b/c.txt").unwrap();
            assert_eq!(p.to_path_buf(), Path::new("a").join("b").join("c.txt"));
        }

        #[test]
        fn file_map_is_sorted() {
            let mut map = FileMap::new();
            map.insert(RepoPath::new("z.txt").unwrap(), Digest::of(b"z"));
            map.insert(RepoPath::new("a.txt").unwrap(), Digest::of(b"a"));
            let keys: Vec<_> = map.keys().map(|p| p.as_str()).collect();
            assert_eq!(keys, vec!["a.txt", "z.txt"]);
        }
    }
}
