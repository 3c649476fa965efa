//! Canonical file-identity handle for build outputs.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

use crate::paths;

/// An opaque handle to a canonical absolute output path.
///
/// Equality, ordering, and hashing are by the canonical path text; case and
/// separator normalization happen upstream when the path is resolved, so two
/// `FileItem`s for the same output compare equal. This type never touches the
/// filesystem.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct FileItem(String);

impl FileItem {
    /// Creates a file item from an already-canonical absolute path.
    pub fn new(path: impl Into<String>) -> Self {
        Self(path.into())
    }

    /// Returns the canonical path text.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns the canonical path.
    pub fn path(&self) -> &Path {
        Path::new(&self.0)
    }

    /// Returns `true` if this file lives strictly below `dir`, under the
    /// platform path-comparison convention.
    pub fn is_under(&self, dir: &Path) -> bool {
        paths::is_strict_ancestor(dir, self.path())
    }
}

impl fmt::Display for FileItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Debug for FileItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "FileItem({})", self.0)
    }
}
