//! init command - Create an empty repository

use std::path::Path;

use anyhow::{Context as _, Result};

use crate::cli::Context;
use crate::core::types::BranchName;
use crate::repo::{InitOutcome, Repository};
use crate::ui::output;

/// Initialize a repository at `path`, or the working directory.
///
/// # Arguments
///
/// * `ctx` - Execution context
/// * `path` - Directory to initialize
/// * `default_branch` - Branch the first commit creates
pub fn init(ctx: &Context, path: Option<&Path>, default_branch: Option<&str>) -> Result<()> {
    let root = match path {
        Some(path) => ctx.resolve(path)?,
        None => ctx.cwd()?,
    };
    let default_branch = default_branch
        .map(BranchName::new)
        .transpose()
        .context("Invalid --default-branch")?;

    let (repo, outcome) = Repository::init(&root, default_branch)?;
    let verbosity = ctx.verbosity();

    match outcome {
        InitOutcome::Created => output::print(
            format!(
                "Initialized empty repository in {}",
                repo.paths().state_dir().display()
            ),
            verbosity,
        ),
        InitOutcome::AlreadyInitialized => output::print(
            format!("Repository already initialized in {}", repo.work_dir().display()),
            verbosity,
        ),
    }
    Ok(())
}
