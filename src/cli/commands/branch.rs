//! branch command - Create or list branches

use anyhow::{Context as _, Result};

use crate::cli::Context;
use crate::core::types::BranchName;
use crate::ui::output;

/// Create `name` at HEAD, or list branches when no name is given.
pub fn branch(ctx: &Context, name: Option<&str>) -> Result<()> {
    let repo = ctx.repository()?;
    let verbosity = ctx.verbosity();

    let Some(name) = name else {
        let lines: Vec<String> = repo
            .branches()?
            .into_iter()
            .map(|info| {
                let marker = if info.current { '*' } else { ' ' };
                match info.commit {
                    Some(commit) => format!("{} {} {}", marker, info.name, commit.short(12)),
                    None => format!("{} {} (no commits)", marker, info.name),
                }
            })
            .collect();
        if !lines.is_empty() {
            output::print(output::format_list(&lines, ""), verbosity);
        }
        return Ok(());
    };

    let name = BranchName::new(name).context("Invalid branch name")?;
    let digest = repo.branch(&name)?;
    output::print(
        format!("Created branch '{}' at {}", name, digest.short(12)),
        verbosity,
    );
    Ok(())
}
