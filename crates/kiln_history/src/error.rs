//! Error types for action history operations.

use std::path::PathBuf;

/// Errors that can occur while reading or writing action history files.
///
/// Load-side errors are fail-safe: [`Layer::new`](crate::Layer::new) catches
/// them, logs, and starts with an empty cache. Save-side errors propagate to
/// the orchestrator, since a failed save is a genuine environment problem
/// (disk full, permissions) the build should surface.
#[derive(Debug, thiserror::Error)]
pub enum HistoryError {
    /// An I/O error occurred while reading or writing a cache file.
    #[error("action history I/O error at {path}: {source}")]
    Io {
        /// The path that caused the error.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// A cache file ended before the declared data was read.
    #[error("truncated action history file {path}")]
    Truncated {
        /// The cache file path.
        path: PathBuf,
    },

    /// The cache file format version does not match the current version.
    #[error("version mismatch in {path}: expected {expected}, got {actual}")]
    VersionMismatch {
        /// The cache file path.
        path: PathBuf,
        /// The expected format version.
        expected: u32,
        /// The actual version found in the file.
        actual: u32,
    },

    /// An entry in the cache file could not be decoded.
    #[error("malformed entry in {path}: {reason}")]
    MalformedEntry {
        /// The cache file path.
        path: PathBuf,
        /// Description of the decode failure.
        reason: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn io_error_display() {
        let err = HistoryError::Io {
            path: PathBuf::from("/tmp/Intermediate/Build/ActionHistory.bin"),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "file not found"),
        };
        let msg = err.to_string();
        assert!(msg.contains("I/O error"));
        assert!(msg.contains("ActionHistory.bin"));
    }

    #[test]
    fn truncated_display() {
        let err = HistoryError::Truncated {
            path: PathBuf::from("short.bin"),
        };
        assert!(err.to_string().contains("truncated"));
        assert!(err.to_string().contains("short.bin"));
    }

    #[test]
    fn version_mismatch_display() {
        let err = HistoryError::VersionMismatch {
            path: PathBuf::from("old.bin"),
            expected: 2,
            actual: 1,
        };
        let msg = err.to_string();
        assert!(msg.contains("expected 2"));
        assert!(msg.contains("got 1"));
    }

    #[test]
    fn malformed_entry_display() {
        let err = HistoryError::MalformedEntry {
            path: PathBuf::from("bad.bin"),
            reason: "entry path is not valid UTF-8".to_string(),
        };
        assert!(err.to_string().contains("not valid UTF-8"));
    }
}
