//! clone command - Copy this repository to a new directory

use std::path::Path;

use anyhow::Result;

use crate::cli::Context;
use crate::ui::output;

/// Copy the repository, state directory included, to `dest`.
pub fn clone(ctx: &Context, dest: &Path) -> Result<()> {
    let repo = ctx.repository()?;
    let dest = ctx.resolve(dest)?;

    let copied = repo.clone_to(&dest)?;
    output::print(
        format!("Cloned into {} ({} files)", dest.display(), copied),
        ctx.verbosity(),
    );
    Ok(())
}
