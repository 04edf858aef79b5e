//! core::ops
//!
//! Repository-wide locking.
//!
//! # Architecture
//!
//! Every mutating command acquires the exclusive repo lock before its
//! first read of mutable state and holds it until its last write. The
//! guard is released on every exit path, including failures.
//!
//! # Example
//!
//! ```ignore
//! use giclone::core::ops::lock::RepoLock;
//!
//! let _lock = RepoLock::acquire(&paths)?;
//! // read-modify-write the index and refs
//! ```

pub mod lock;

pub use lock::{LockError, RepoLock};
