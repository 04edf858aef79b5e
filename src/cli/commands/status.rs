//! status command - Show HEAD and staged files

use anyhow::Result;

use crate::cli::Context;
use crate::ui::output;

/// Print where HEAD points and what is staged.
pub fn status(ctx: &Context) -> Result<()> {
    let repo = ctx.repository()?;
    let status = repo.status()?;
    let verbosity = ctx.verbosity();

    output::print(format!("On {}", status.head), verbosity);
    if status.staged.is_empty() {
        output::print("Nothing staged.", verbosity);
    } else {
        let lines: Vec<String> = status
            .staged
            .iter()
            .map(|(path, digest)| format!("{}  {}", digest.short(12), path))
            .collect();
        output::print("Staged:", verbosity);
        output::print(output::format_list(&lines, "  "), verbosity);
    }
    Ok(())
}
