//! log command - Show commit history from HEAD

use anyhow::Result;

use crate::cli::Context;
use crate::ui::output;

/// Print every commit reachable from HEAD, newest first.
pub fn log(ctx: &Context) -> Result<()> {
    let repo = ctx.repository()?;
    let verbosity = ctx.verbosity();

    let history = repo.log()?;
    if history.is_empty() {
        output::print("No commits yet.", verbosity);
        return Ok(());
    }

    for (digest, commit) in history {
        output::print(format!("Commit: {}", digest), verbosity);
        output::print(format!("Message: {}", commit.message), verbosity);
        output::print(
            format!("Files: {}", output::format_inline(commit.files.keys())),
            verbosity,
        );
        output::print("", verbosity);
    }
    Ok(())
}
