//! giclone - local, single-user version control
//!
//! giclone snapshots tracked files into a content-addressed store, links
//! snapshots into a commit history, and moves the working directory
//! between named branches or specific commits.
//!
//! # Architecture
//!
//! The codebase follows a strict layered architecture:
//!
//! - [`cli`] - Command-line interface layer (parses args, delegates to the repository)
//! - [`repo`] - The engine: staging index, refs, commit graph, working-tree sync
//! - [`store`] - Content-addressed object storage
//! - [`core`] - Domain types, path routing, configuration, locking
//! - [`ui`] - User-facing output
//!
//! # Correctness Invariants
//!
//! 1. Objects are immutable and keyed by the SHA-256 of their bytes
//! 2. A commit's digest depends only on its message, files and parent
//! 3. A branch, once it has a commit, always names a stored commit
//! 4. Mutating operations hold the repository lock for their whole duration

pub mod cli;
pub mod core;
pub mod repo;
pub mod store;
pub mod ui;
