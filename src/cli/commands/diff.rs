//! diff command - Compare the files two revisions track

use anyhow::Result;

use crate::cli::Context;
use crate::ui::output;

/// Print added, removed and conflicting paths between `a` and `b`.
pub fn diff(ctx: &Context, a: &str, b: &str) -> Result<()> {
    let repo = ctx.repository()?;
    let diff = repo.diff(a, b)?;
    let verbosity = ctx.verbosity();

    output::print(format!("Diff between {} and {}:", a, b), verbosity);
    output::print(
        format!("Added files: {}", output::format_inline(&diff.added)),
        verbosity,
    );
    output::print(
        format!("Removed files: {}", output::format_inline(&diff.removed)),
        verbosity,
    );
    if !diff.conflicting.is_empty() {
        output::print(
            format!(
                "Conflicting files: {}",
                output::format_inline(&diff.conflicting)
            ),
            verbosity,
        );
    }
    Ok(())
}
