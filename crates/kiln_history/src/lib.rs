//! Per-output command-line change-detection cache for the Kiln build tool.
//!
//! Every build action records, per output artifact, a digest of the command
//! line that produced it. On the next build, an artifact whose producing
//! command line changed can be rebuilt even though none of its input files
//! changed. The cache is layered: a [`History`] routes each output path to a
//! [`Partition`] (one per mounted root directory), which routes it to the
//! [`Layer`] file that persists its record.
//!
//! All reads are fail-safe: a missing, corrupt, or out-of-date cache file
//! degrades to an empty cache and a spurious rebuild, never a build failure.

#![warn(missing_docs)]

pub mod error;
pub mod history;
pub mod layer;
pub mod locations;
pub mod partition;

pub use error::HistoryError;
pub use history::History;
pub use layer::{read_entries, Layer};
pub use locations::TargetKind;
pub use partition::Partition;
