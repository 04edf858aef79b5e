//! cli::commands
//!
//! Command dispatch and handlers.
//!
//! # Architecture
//!
//! Each command handler:
//! 1. Validates command-specific arguments
//! 2. Calls the repository handle to execute the command
//! 3. Formats and displays output
//!
//! Handlers do NOT read or write repository files directly.

mod add;
mod branch;
mod checkout;
mod clone;
mod commit;
mod completion;
mod diff;
mod init;
mod log_cmd;
mod merge;
mod status;

// Re-export command functions for testing and direct invocation
pub use add::add;
pub use branch::branch;
pub use checkout::checkout;
pub use clone::clone;
pub use commit::commit;
pub use completion::completion;
pub use diff::diff;
pub use init::init;
pub use log_cmd::log;
pub use merge::merge;
pub use status::status;

use crate::cli::args::Command;
use crate::cli::Context;
use anyhow::Result;

/// Dispatch a command to its handler.
pub fn dispatch(command: Command, ctx: &Context) -> Result<()> {
    match command {
        // Setup
        Command::Init {
            path,
            default_branch,
        } => init::init(ctx, path.as_deref(), default_branch.as_deref()),
        Command::Completion { shell } => completion::completion(shell),

        // Recording
        Command::Add { paths } => add::add(ctx, &paths),
        Command::Commit { message } => commit::commit(ctx, &message),

        // Branches and navigation
        Command::Branch { name } => branch::branch(ctx, name.as_deref()),
        Command::Checkout { target } => checkout::checkout(ctx, &target),

        // Inspection
        Command::Log => log_cmd::log(ctx),
        Command::Diff { a, b } => diff::diff(ctx, &a, &b),
        Command::Status => status::status(ctx),

        // Combining and copying
        Command::Merge { branch } => merge::merge(ctx, &branch),
        Command::Clone { dest } => clone::clone(ctx, &dest),
    }
}
