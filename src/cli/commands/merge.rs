//! merge command - Merge a branch into HEAD

use anyhow::{Context as _, Result};

use crate::cli::Context;
use crate::core::types::BranchName;
use crate::ui::output;

/// Merge `branch` into HEAD. Conflicts surface as an error listing every
/// conflicting path.
pub fn merge(ctx: &Context, branch: &str) -> Result<()> {
    let repo = ctx.repository()?;
    let branch = BranchName::new(branch).context("Invalid branch name")?;

    let outcome = repo.merge(&branch)?;
    output::print(
        format!(
            "Merged branch '{}' into {} ({} files)",
            branch,
            outcome.digest.short(12),
            outcome.files.len()
        ),
        ctx.verbosity(),
    );
    Ok(())
}
