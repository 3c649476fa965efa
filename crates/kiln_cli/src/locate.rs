//! `kiln-history locate` — print the well-known cache locations for a target.

use std::path::PathBuf;

use kiln_history::locations;

use crate::TargetArgs;

/// Runs the `locate` command.
pub fn run(args: &TargetArgs) -> Result<i32, Box<dyn std::error::Error>> {
    for path in cache_files(args) {
        println!("{}", path.display());
    }
    Ok(0)
}

/// Resolves the top-level cache files for the selected target.
pub(crate) fn cache_files(args: &TargetArgs) -> Vec<PathBuf> {
    locations::files_to_clean(
        &args.engine_dir,
        args.project.as_deref(),
        &args.target,
        &args.platform,
        args.kind.into(),
        &args.architecture,
        args.installed_engine,
    )
}
