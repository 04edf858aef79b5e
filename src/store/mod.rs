//! store
//!
//! Content-addressed object storage.
//!
//! # Design
//!
//! The [`ObjectStore`] trait is the whole capability set the engine needs
//! from storage: `put`, `get`, `exists`. Objects are keyed by the SHA-256
//! digest of their raw bytes, so storing identical bytes twice is a no-op
//! and a stored object can never change. Blobs and serialized commits
//! share the same namespace.
//!
//! Two implementations:
//! - [`FsObjectStore`] - one file per object under `.giclone/objects/`
//! - [`MemoryObjectStore`] - a hash map, for tests
//!
//! There is no delete operation; objects live forever.
//!
//! # Example
//!
//! ```
//! use giclone::store::{MemoryObjectStore, ObjectStore};
//!
//! let store = MemoryObjectStore::new();
//! let digest = store.put(b"hello").unwrap();
//! assert!(store.exists(&digest).unwrap());
//! assert_eq!(store.get(&digest).unwrap(), b"hello");
//! ```

mod fs;
mod memory;

pub use fs::FsObjectStore;
pub use memory::MemoryObjectStore;

use std::path::PathBuf;

use thiserror::Error;

use crate::core::types::Digest;

/// Errors from object storage.
#[derive(Debug, Error)]
pub enum StoreError {
    /// No object is stored under the digest.
    #[error("object not found: {digest}")]
    NotFound { digest: Digest },

    /// Stored bytes no longer hash to their key.
    #[error("object {digest} is corrupt: content hashes to {actual}")]
    Corrupt { digest: Digest, actual: Digest },

    /// Underlying storage failure.
    #[error("object store i/o error at {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Content-addressed blob storage.
///
/// Implementations must be thread-safe and must guarantee
/// `get(put(b)) == b` for every byte sequence `b`.
pub trait ObjectStore: Send + Sync {
    /// Store `bytes` under their digest and return it.
    ///
    /// Idempotent: re-putting identical bytes writes nothing.
    fn put(&self, bytes: &[u8]) -> Result<Digest, StoreError>;

    /// Read the bytes stored under `digest`.
    ///
    /// Fails with [`StoreError::NotFound`] if nothing is stored there.
    fn get(&self, digest: &Digest) -> Result<Vec<u8>, StoreError>;

    /// Check whether an object is stored under `digest`.
    fn exists(&self, digest: &Digest) -> Result<bool, StoreError>;
}
