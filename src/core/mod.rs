//! core
//!
//! Core domain types and ambient plumbing shared by the engine.
//!
//! # Modules
//!
//! - [`types`] - Strong types: BranchName, Digest, RepoPath, FileMap
//! - [`paths`] - Centralized path routing for repository storage
//! - [`config`] - Configuration schema and loading
//! - [`ops`] - Repository-wide locking
//! - [`fs`] - Atomic file replacement
//! - [`ignore`] - Ignore patterns consulted before staging
//!
//! # Design Principles
//!
//! - Strong typing prevents invalid states at compile time
//! - Schemas are strict and self-describing
//! - Every write of mutable state is atomic

pub mod config;
pub mod fs;
pub mod ignore;
pub mod ops;
pub mod paths;
pub mod types;
