//! add command - Stage files for the next commit

use std::path::PathBuf;

use anyhow::Result;

use crate::cli::Context;
use crate::ui::output;

/// Stage files. Relative paths are taken from the working directory.
pub fn add(ctx: &Context, paths: &[PathBuf]) -> Result<()> {
    let repo = ctx.repository()?;
    let inputs = paths
        .iter()
        .map(|p| ctx.resolve(p))
        .collect::<Result<Vec<_>>>()?;

    let report = repo.add(&inputs)?;
    let verbosity = ctx.verbosity();

    for path in &report.ignored {
        output::print(format!("Ignoring {}", path), verbosity);
    }
    match report.staged.len() {
        0 => output::warn("nothing staged", verbosity),
        1 => output::print("Staged 1 file", verbosity),
        n => output::print(format!("Staged {} files", n), verbosity),
    }
    Ok(())
}
