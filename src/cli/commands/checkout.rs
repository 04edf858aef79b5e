//! checkout command - Switch to a branch or commit

use anyhow::Result;

use crate::cli::Context;
use crate::repo::HeadState;
use crate::ui::output;

/// Check out a branch or commit digest.
pub fn checkout(ctx: &Context, target: &str) -> Result<()> {
    let repo = ctx.repository()?;
    let report = repo.checkout(target)?;
    let verbosity = ctx.verbosity();

    let message = match &report.head {
        HeadState::Attached(branch) | HeadState::Unborn { branch } => {
            format!("Switched to branch '{}'", branch)
        }
        HeadState::Detached(digest) => format!("HEAD is now at {}", digest.short(12)),
    };
    output::print(message, verbosity);
    output::print(format!("Restored {} files", report.restored), verbosity);
    Ok(())
}
