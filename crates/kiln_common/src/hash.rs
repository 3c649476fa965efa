//! Command-line hashing for action change detection.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Width of a command-line digest in bytes.
pub const HASH_LEN: usize = 16;

/// A 128-bit digest of a case-normalized command line, computed using XXH3.
///
/// Two actions with the same `CommandHash` are assumed to have been produced
/// by the same command line. The input text is upper-cased before hashing so
/// that command-line tokens (paths, flags) differing only in case across
/// platforms or tools hash identically. Used only for compact equality, never
/// for authentication.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CommandHash([u8; HASH_LEN]);

impl CommandHash {
    /// Computes the digest of a command line.
    ///
    /// The text is upper-cased and its UTF-8 bytes are hashed with XXH3-128.
    pub fn from_command_line(command_line: &str) -> Self {
        let normalized = command_line.to_uppercase();
        let hash = xxhash_rust::xxh3::xxh3_128(normalized.as_bytes());
        Self(hash.to_le_bytes())
    }

    /// Reconstructs a digest from its raw on-disk bytes.
    pub fn from_bytes(bytes: [u8; HASH_LEN]) -> Self {
        Self(bytes)
    }

    /// Returns the raw digest bytes for serialization.
    pub fn as_bytes(&self) -> &[u8; HASH_LEN] {
        &self.0
    }
}

impl fmt::Display for CommandHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for byte in &self.0 {
            write!(f, "{byte:02x}")?;
        }
        Ok(())
    }
}

impl fmt::Debug for CommandHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "CommandHash({:02x}{:02x}..)", self.0[0], self.0[1])
    }
}
