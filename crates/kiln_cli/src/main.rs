//! `kiln-history` — inspection and cleanup tooling for Kiln action history
//! caches.
//!
//! Provides `dump` for printing the entries of a cache file, `locate` for
//! printing the well-known top-level cache locations of a target, and
//! `clean` for deleting them.

#![warn(missing_docs)]

mod clean;
mod dump;
mod locate;

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand, ValueEnum};
use kiln_history::TargetKind;

/// Inspect and clean Kiln action history caches.
#[derive(Parser, Debug)]
#[command(name = "kiln-history", version, about = "Kiln action history tooling")]
pub struct Cli {
    /// Enable verbose (trace-level) logging.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// The subcommand to run.
    #[command(subcommand)]
    pub command: Command,
}

/// Available CLI commands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Print the entries of an action history file.
    Dump(DumpArgs),
    /// Print the well-known top-level cache locations for a target.
    Locate(TargetArgs),
    /// Delete the well-known top-level cache files for a target.
    Clean(CleanArgs),
}

/// Arguments for the `dump` subcommand.
#[derive(Parser, Debug)]
pub struct DumpArgs {
    /// Path to the action history file to read.
    pub file: PathBuf,

    /// Output format.
    #[arg(short, long, value_enum, default_value_t = DumpFormat::Text)]
    pub format: DumpFormat,
}

/// Output formats for `dump`.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum DumpFormat {
    /// One `digest  path` line per entry.
    Text,
    /// A JSON array of `{file, digest}` objects.
    Json,
}

/// Target selection shared by `locate` and `clean`.
#[derive(Parser, Debug)]
pub struct TargetArgs {
    /// Engine root directory.
    #[arg(long)]
    pub engine_dir: PathBuf,

    /// Project file, when building a project target.
    #[arg(long)]
    pub project: Option<PathBuf>,

    /// Name of the target.
    #[arg(long)]
    pub target: String,

    /// Platform name (e.g. Win64, Linux, Mac).
    #[arg(long)]
    pub platform: String,

    /// Kind of the target.
    #[arg(long, value_enum, default_value_t = KindArg::Program)]
    pub kind: KindArg,

    /// Target architecture, when not the platform default.
    #[arg(long, default_value = "")]
    pub architecture: String,

    /// Treat the engine as installed (read-only); its caches are skipped.
    #[arg(long)]
    pub installed_engine: bool,
}

/// Arguments for the `clean` subcommand.
#[derive(Parser, Debug)]
pub struct CleanArgs {
    /// Target whose cache files should be deleted.
    #[command(flatten)]
    pub target: TargetArgs,

    /// List the files without deleting them.
    #[arg(long)]
    pub dry_run: bool,
}

/// Target kind, as selectable on the command line.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum KindArg {
    /// A standalone program.
    Program,
    /// A game target.
    Game,
    /// An editor target.
    Editor,
}

impl From<KindArg> for TargetKind {
    fn from(kind: KindArg) -> Self {
        match kind {
            KindArg::Program => TargetKind::Program,
            KindArg::Game => TargetKind::Game,
            KindArg::Editor => TargetKind::Editor,
        }
    }
}

fn main() {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "trace" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .init();

    let result = match cli.command {
        Command::Dump(ref args) => dump::run(args),
        Command::Locate(ref args) => locate::run(args),
        Command::Clean(ref args) => clean::run(args),
    };

    match result {
        Ok(code) => process::exit(code),
        Err(e) => {
            eprintln!("error: {e}");
            process::exit(1);
        }
    }
}
