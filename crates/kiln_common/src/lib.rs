//! Shared foundational types used across the Kiln build tool.
//!
//! This crate provides the canonical file-identity handle used to key build
//! outputs, the fixed-size command-line digest used for change detection,
//! and the platform path-comparison convention shared by both.

#![warn(missing_docs)]

pub mod file_item;
pub mod hash;
pub mod paths;

pub use file_item::FileItem;
pub use hash::CommandHash;
