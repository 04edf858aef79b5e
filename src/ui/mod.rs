//! ui
//!
//! User-facing output.
//!
//! # Modules
//!
//! - [`output`] - Message printing and list formatting
//!
//! Command handlers print through this module so that `--quiet` is
//! honored in one place. Diagnostics go through `tracing` instead.

pub mod output;
