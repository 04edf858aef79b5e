//! store::fs
//!
//! File-system object store: `objects/<digest>`, one file per object.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use super::{ObjectStore, StoreError};
use crate::core::fs::write_atomic;
use crate::core::types::Digest;

/// Objects stored as flat files named by digest.
///
/// Writes are atomic, so a crash mid-`put` never leaves a truncated
/// object behind. Reads re-hash the content and refuse bytes that no
/// longer match their name.
#[derive(Debug, Clone)]
pub struct FsObjectStore {
    dir: PathBuf,
}

impl FsObjectStore {
    /// Create a store rooted at `dir` (usually `.giclone/objects`).
    pub fn new(dir: PathBuf) -> Self {
        Self { dir }
    }

    fn object_path(&self, digest: &Digest) -> PathBuf {
        self.dir.join(digest.as_str())
    }

    fn io_error(path: &Path, source: io::Error) -> StoreError {
        StoreError::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}

impl ObjectStore for FsObjectStore {
    fn put(&self, bytes: &[u8]) -> Result<Digest, StoreError> {
        let digest = Digest::of(bytes);
        let path = self.object_path(&digest);

        if path.exists() {
            tracing::trace!(digest = %digest.short(12), "object already stored");
            return Ok(digest);
        }

        write_atomic(&path, bytes).map_err(|e| Self::io_error(&path, e))?;
        tracing::debug!(digest = %digest.short(12), size = bytes.len(), "stored object");
        Ok(digest)
    }

    fn get(&self, digest: &Digest) -> Result<Vec<u8>, StoreError> {
        let path = self.object_path(digest);
        let bytes = match fs::read(&path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                return Err(StoreError::NotFound {
                    digest: digest.clone(),
                })
            }
            Err(e) => return Err(Self::io_error(&path, e)),
        };

        let actual = Digest::of(&bytes);
        if &actual != digest {
            return Err(StoreError::Corrupt {
                digest: digest.clone(),
                actual,
            });
        }
        Ok(bytes)
    }

    fn exists(&self, digest: &Digest) -> Result<bool, StoreError> {
        let path = self.object_path(digest);
        match fs::metadata(&path) {
            Ok(meta) => Ok(meta.is_file()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(Self::io_error(&path, e)),
        }
    }
}
