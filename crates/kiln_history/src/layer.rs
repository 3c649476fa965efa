//! A single persisted file-to-digest mapping, bound to one cache file.
//!
//! Each layer remembers the digest of the command line that last produced
//! each output file in its scope. Layers are loaded lazily on first use and
//! written back once at the end of the build, and only if they changed.
//!
//! On-disk format (little-endian, fixed order):
//!
//! ```text
//! u32          version        // must equal 2 to be honored
//! u32          entry count
//! per entry:
//!     u32      path byte length
//!     [u8]     canonical path, UTF-8
//!     [u8; 16] command-line digest
//! ```

use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::RwLock;

use kiln_common::hash::HASH_LEN;
use kiln_common::{CommandHash, FileItem};

use crate::error::HistoryError;

/// Current cache file format version. Files with any other version are
/// treated as absent.
const CURRENT_VERSION: u32 = 2;

/// One persisted mapping from output file to producing-command-line digest.
///
/// The entry map supports concurrent reads and atomic insert-if-absent from
/// parallel build actions. `dirty` is set on the first successful insertion
/// and cleared on a completed save; an unmodified layer never touches disk.
pub struct Layer {
    /// Path of the cache file backing this layer.
    location: PathBuf,

    /// Command-line digests keyed by the output files they produced.
    entries: RwLock<HashMap<FileItem, CommandHash>>,

    /// Whether the layer has new entries that need saving.
    dirty: AtomicBool,
}

impl Layer {
    /// Creates a layer backed by the cache file at `location`, loading it if
    /// it exists.
    ///
    /// Loading is fail-safe: an I/O error, malformed stream, or version
    /// mismatch is logged and the layer starts empty. The cache is purely an
    /// optimization; its absence or corruption never blocks a build.
    pub fn new(location: PathBuf) -> Self {
        let entries = if location.exists() {
            match load(&location) {
                Ok(entries) => entries,
                Err(HistoryError::VersionMismatch {
                    expected, actual, ..
                }) => {
                    log::trace!(
                        "unable to read action history from {}; version {actual} vs current {expected}",
                        location.display()
                    );
                    HashMap::new()
                }
                Err(err) => {
                    log::warn!(
                        "unable to read action history from {}; starting empty",
                        location.display()
                    );
                    log::trace!("failed to load {}: {err}", location.display());
                    HashMap::new()
                }
            }
        } else {
            HashMap::new()
        };

        Self {
            location,
            entries: RwLock::new(entries),
            dirty: AtomicBool::new(false),
        }
    }

    /// Returns the path of the cache file backing this layer.
    pub fn location(&self) -> &Path {
        &self.location
    }

    /// Records the command line that produced `file`, if no record exists.
    ///
    /// Returns `true` and marks the layer dirty iff this is the first record
    /// for `file` in the lifetime of the in-memory map (which includes
    /// everything restored from a previous save). Returns `false` with no
    /// mutation if a record already exists, even when the new digest differs
    /// from the stored one: this is a record-once contract, and under a race
    /// only the winner's digest is kept.
    pub fn update(&self, file: &FileItem, command_line: &str) -> bool {
        let digest = CommandHash::from_command_line(command_line);

        // Fast path: the steady state is "already recorded".
        {
            let entries = self.entries.read().unwrap();
            if entries.contains_key(file) {
                return false;
            }
        }

        let mut entries = self.entries.write().unwrap();
        match entries.entry(file.clone()) {
            Entry::Vacant(slot) => {
                slot.insert(digest);
                self.dirty.store(true, Ordering::Release);
                true
            }
            Entry::Occupied(_) => false,
        }
    }

    /// Writes the layer back to disk if it has unsaved entries.
    ///
    /// Creates the containing directory if missing and overwrites the cache
    /// file with the full entry map. Expects single-saver discipline: save is
    /// invoked once, after all concurrent updates have quiesced.
    pub fn save(&self) -> Result<(), HistoryError> {
        if !self.dirty.load(Ordering::Acquire) {
            return Ok(());
        }

        if let Some(dir) = self.location.parent() {
            std::fs::create_dir_all(dir).map_err(|e| HistoryError::Io {
                path: dir.to_path_buf(),
                source: e,
            })?;
        }

        let data = {
            let entries = self.entries.read().unwrap();
            let mut data = Vec::new();
            data.extend_from_slice(&CURRENT_VERSION.to_le_bytes());
            data.extend_from_slice(&(entries.len() as u32).to_le_bytes());
            for (file, digest) in entries.iter() {
                let path_bytes = file.as_str().as_bytes();
                data.extend_from_slice(&(path_bytes.len() as u32).to_le_bytes());
                data.extend_from_slice(path_bytes);
                data.extend_from_slice(digest.as_bytes());
            }
            data
        };

        std::fs::write(&self.location, &data).map_err(|e| HistoryError::Io {
            path: self.location.clone(),
            source: e,
        })?;
        self.dirty.store(false, Ordering::Release);
        Ok(())
    }

    /// Returns the number of recorded entries.
    pub fn len(&self) -> usize {
        self.entries.read().unwrap().len()
    }

    /// Returns `true` if the layer has no recorded entries.
    pub fn is_empty(&self) -> bool {
        self.entries.read().unwrap().is_empty()
    }

    /// Returns a snapshot of all entries, sorted by file path.
    pub fn snapshot(&self) -> Vec<(FileItem, CommandHash)> {
        let entries = self.entries.read().unwrap();
        let mut all: Vec<_> = entries
            .iter()
            .map(|(file, digest)| (file.clone(), *digest))
            .collect();
        all.sort_by(|a, b| a.0.cmp(&b.0));
        all
    }
}

impl std::fmt::Debug for Layer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Layer({})", self.location.display())
    }
}

/// Reads and decodes the cache file at `location`, returning its entries
/// sorted by file path.
///
/// Unlike [`Layer::new`] this is strict: any I/O, format, or version problem
/// is returned as an error. Used by inspection tooling.
pub fn read_entries(location: &Path) -> Result<Vec<(FileItem, CommandHash)>, HistoryError> {
    let entries = load(location)?;
    let mut all: Vec<_> = entries.into_iter().collect();
    all.sort_by(|a, b| a.0.cmp(&b.0));
    Ok(all)
}

/// Reads and decodes the cache file at `location`.
fn load(location: &Path) -> Result<HashMap<FileItem, CommandHash>, HistoryError> {
    let raw = std::fs::read(location).map_err(|e| HistoryError::Io {
        path: location.to_path_buf(),
        source: e,
    })?;

    let mut pos = 0usize;
    let version = read_u32(&raw, &mut pos, location)?;
    if version != CURRENT_VERSION {
        return Err(HistoryError::VersionMismatch {
            path: location.to_path_buf(),
            expected: CURRENT_VERSION,
            actual: version,
        });
    }

    let count = read_u32(&raw, &mut pos, location)? as usize;
    let mut entries = HashMap::with_capacity(count);
    for _ in 0..count {
        let path_len = read_u32(&raw, &mut pos, location)? as usize;
        let path_bytes = take(&raw, &mut pos, path_len, location)?;
        let path = std::str::from_utf8(path_bytes).map_err(|_| HistoryError::MalformedEntry {
            path: location.to_path_buf(),
            reason: "entry path is not valid UTF-8".to_string(),
        })?;
        let mut digest = [0u8; HASH_LEN];
        digest.copy_from_slice(take(&raw, &mut pos, HASH_LEN, location)?);
        entries.insert(FileItem::new(path), CommandHash::from_bytes(digest));
    }
    Ok(entries)
}

/// Reads a little-endian `u32` at `pos`, advancing the cursor.
fn read_u32(data: &[u8], pos: &mut usize, location: &Path) -> Result<u32, HistoryError> {
    let bytes = take(data, pos, 4, location)?;
    Ok(u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]))
}

/// Returns `len` bytes at `pos`, advancing the cursor.
fn take<'a>(
    data: &'a [u8],
    pos: &mut usize,
    len: usize,
    location: &Path,
) -> Result<&'a [u8], HistoryError> {
    let end = pos.checked_add(len).filter(|&end| end <= data.len());
    match end {
        Some(end) => {
            let slice = &data[*pos..end];
            *pos = end;
            Ok(slice)
        }
        None => Err(HistoryError::Truncated {
            path: location.to_path_buf(),
        }),
    }
}
