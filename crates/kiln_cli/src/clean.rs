//! `kiln-history clean` — delete the well-known cache files for a target.

use std::io::ErrorKind;

use crate::locate;
use crate::CleanArgs;

/// Runs the `clean` command.
///
/// Missing files are skipped silently; other filesystem errors abort the
/// command.
pub fn run(args: &CleanArgs) -> Result<i32, Box<dyn std::error::Error>> {
    for path in locate::cache_files(&args.target) {
        if args.dry_run {
            println!("would remove {}", path.display());
            continue;
        }
        match std::fs::remove_file(&path) {
            Ok(()) => println!("removed {}", path.display()),
            Err(e) if e.kind() == ErrorKind::NotFound => {
                log::debug!("{} not present, skipping", path.display());
            }
            Err(e) => return Err(Box::new(e)),
        }
    }
    Ok(0)
}
