//! `kiln-history dump` — print the entries of an action history file.

use kiln_common::{CommandHash, FileItem};

use crate::{DumpArgs, DumpFormat};

/// Runs the `dump` command.
///
/// Unlike the build-time loader this is strict: a missing, truncated, or
/// out-of-date file is reported as an error rather than shown as empty.
pub fn run(args: &DumpArgs) -> Result<i32, Box<dyn std::error::Error>> {
    let entries = kiln_history::read_entries(&args.file)?;

    match args.format {
        DumpFormat::Text => {
            for (file, digest) in &entries {
                println!("{digest}  {file}");
            }
            eprintln!("{} entries in {}", entries.len(), args.file.display());
        }
        DumpFormat::Json => {
            println!("{}", render_json(&entries)?);
        }
    }

    Ok(0)
}

/// Renders entries as a pretty-printed JSON array of `{file, digest}`.
fn render_json(entries: &[(FileItem, CommandHash)]) -> Result<String, serde_json::Error> {
    let values: Vec<serde_json::Value> = entries
        .iter()
        .map(|(file, digest)| {
            serde_json::json!({
                "file": file,
                "digest": digest.to_string(),
            })
        })
        .collect();
    serde_json::to_string_pretty(&values)
}
