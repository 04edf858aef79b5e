//! core::ignore
//!
//! Ignore rules consulted by `add` before anything is staged.
//!
//! Patterns come from `<state_dir>/ignore`, one per line. Blank lines and
//! lines starting with `#` are skipped. A path is ignored when any pattern
//! appears in its root-relative form as a substring, prefix or suffix.
//! This is deliberately simpler than gitignore globbing.
//!
//! The repository only depends on the [`IgnorePredicate`] trait, so a
//! caller can swap in a different matcher (or a closure) without touching
//! the engine.

use std::fs;
use std::io;

use crate::core::paths::{RepoPaths, STATE_DIR_NAME};
use crate::core::types::RepoPath;

/// Decides whether a working-tree path is excluded from staging.
pub trait IgnorePredicate: Send + Sync {
    /// Returns true when `path` must not be staged.
    fn is_ignored(&self, path: &RepoPath) -> bool;
}

impl<F> IgnorePredicate for F
where
    F: Fn(&RepoPath) -> bool + Send + Sync,
{
    fn is_ignored(&self, path: &RepoPath) -> bool {
        self(path)
    }
}

/// Patterns loaded from the repository's ignore file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IgnorePatterns {
    patterns: Vec<String>,
}

impl IgnorePatterns {
    /// Build from already-parsed patterns.
    pub fn new(patterns: Vec<String>) -> Self {
        Self { patterns }
    }

    /// Parse the ignore file format.
    pub fn parse(contents: &str) -> Self {
        let patterns = contents
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty() && !line.starts_with('#'))
            .map(String::from)
            .collect();
        Self { patterns }
    }

    /// The parsed patterns, in file order.
    pub fn patterns(&self) -> &[String] {
        &self.patterns
    }

    /// Contents written to a freshly initialized repository.
    pub fn default_file_contents() -> String {
        format!("{}\n", STATE_DIR_NAME)
    }
}

impl IgnorePredicate for IgnorePatterns {
    fn is_ignored(&self, path: &RepoPath) -> bool {
        is_ignored(path, self)
    }
}

/// Read the ignore patterns for a repository.
///
/// A missing ignore file yields an empty pattern set.
pub fn load_ignore_patterns(paths: &RepoPaths) -> io::Result<IgnorePatterns> {
    match fs::read_to_string(paths.ignore_path()) {
        Ok(contents) => Ok(IgnorePatterns::parse(&contents)),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(IgnorePatterns::default()),
        Err(e) => Err(e),
    }
}

/// Substring/prefix/suffix match of any pattern against `path`.
pub fn is_ignored(path: &RepoPath, patterns: &IgnorePatterns) -> bool {
    let path = path.as_str();
    patterns.patterns.iter().any(|pattern| {
        path.contains(pattern.as_str())
            || path.starts_with(pattern.as_str())
            || path.ends_with(pattern.as_str())
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn path(p: &str) -> RepoPath {
        RepoPath::new(p).unwrap()
    }

    #[test]
    fn parse_skips_comments_and_blanks() {
        let patterns = IgnorePatterns::parse("# comment\n\n  target  \n.log\n");
        assert_eq!(patterns.patterns(), &["target".to_string(), ".log".to_string()]);
    }

    #[test]
    fn matches_substring_prefix_suffix() {
        let patterns = IgnorePatterns::new(vec!["build".into(), ".tmp".into()]);
        assert!(is_ignored(&path("build/out.o"), &patterns));
        assert!(is_ignored(&path("src/build/x"), &patterns));
        assert!(is_ignored(&path("notes.tmp"), &patterns));
        assert!(!is_ignored(&path("src/main.rs"), &patterns));
    }

    #[test]
    fn empty_patterns_ignore_nothing() {
        assert!(!is_ignored(&path("anything"), &IgnorePatterns::default()));
    }

    #[test]
    fn missing_file_yields_empty_set() {
        let temp = TempDir::new().unwrap();
        let paths = RepoPaths::new(temp.path().to_path_buf());
        let patterns = load_ignore_patterns(&paths).unwrap();
        assert!(patterns.patterns().is_empty());
    }

    #[test]
    fn loads_from_state_dir() {
        let temp = TempDir::new().unwrap();
        let paths = RepoPaths::new(temp.path().to_path_buf());
        fs::create_dir_all(paths.state_dir()).unwrap();
        fs::write(paths.ignore_path(), IgnorePatterns::default_file_contents()).unwrap();

        let patterns = load_ignore_patterns(&paths).unwrap();
        assert!(patterns.is_ignored(&path(".giclone/index")));
    }

    #[test]
    fn closures_are_predicates() {
        let only_secrets = |p: &RepoPath| p.as_str() == "secret.key";
        assert!(only_secrets.is_ignored(&path("secret.key")));
        assert!(!only_secrets.is_ignored(&path("public.txt")));
    }
}
