//! commit command - Record staged changes

use anyhow::Result;

use crate::cli::Context;
use crate::repo::CommitOutcome;
use crate::ui::output;

/// Commit the staging index. An empty index is reported, not an error.
pub fn commit(ctx: &Context, message: &str) -> Result<()> {
    let repo = ctx.repository()?;
    let verbosity = ctx.verbosity();

    match repo.commit(message)? {
        CommitOutcome::NothingToCommit => {
            output::print("No changes to commit.", verbosity);
        }
        CommitOutcome::Committed {
            digest,
            branch,
            file_count,
        } => {
            let location = match branch {
                Some(branch) => branch.to_string(),
                None => "detached HEAD".to_string(),
            };
            output::print(
                format!(
                    "[{} {}] Committed {} files with message: {}",
                    location,
                    digest.short(12),
                    file_count,
                    message
                ),
                verbosity,
            );
        }
    }
    Ok(())
}
