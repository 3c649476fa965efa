//! Top-level action history aggregate exposed to the build orchestrator.

use std::path::PathBuf;
use std::sync::{Arc, RwLock};

use kiln_common::{paths, FileItem};

use crate::error::HistoryError;
use crate::partition::Partition;

/// Registry of [`Partition`]s, one per mounted root directory.
///
/// Always contains a partition rooted at the engine directory; narrower
/// roots (typically one per loaded project) are added with [`mount`]. Owned
/// state with process-scoped lifetime: create at build start, [`save`] and
/// drop at build end.
///
/// [`mount`]: History::mount
/// [`save`]: History::save
pub struct History {
    /// Mounted partitions, in registration order. The engine partition is
    /// always first and acts as the fallback scope.
    partitions: RwLock<Vec<Arc<Partition>>>,
}

impl History {
    /// Creates a history with a single partition rooted at the engine
    /// directory.
    pub fn new(engine_dir: impl Into<PathBuf>) -> Self {
        Self {
            partitions: RwLock::new(vec![Arc::new(Partition::new(engine_dir.into()))]),
        }
    }

    /// Mounts a partition for outputs under `base_dir`.
    ///
    /// Idempotent: mounting the same base directory again is a no-op.
    /// Typically called once per loaded project.
    pub fn mount(&self, base_dir: impl Into<PathBuf>) {
        let base_dir = base_dir.into();
        let mut partitions = self.partitions.write().unwrap();
        if !partitions
            .iter()
            .any(|p| paths::paths_equal(p.base_dir(), &base_dir))
        {
            partitions.push(Arc::new(Partition::new(base_dir)));
        }
    }

    /// Records the command line that produced `file`.
    ///
    /// Routes to the first mounted partition (in registration order) whose
    /// base directory contains the file, and returns its record-once result.
    /// A file outside every mounted root is logged as a warning and reported
    /// as `false` with no mutation: a missing record only costs a redundant
    /// future rebuild, never build correctness.
    pub fn update(&self, file: &FileItem, command_line: &str) -> bool {
        let partitions: Vec<Arc<Partition>> = self.partitions.read().unwrap().clone();
        for partition in &partitions {
            if file.is_under(partition.base_dir()) {
                return partition.update(file, command_line);
            }
        }

        log::warn!("file {file} is not under any action history root directory");
        false
    }

    /// Saves every mounted partition, in registration order.
    ///
    /// Expected to run once, after all build actions complete. Save errors
    /// propagate: a failed save is an environment problem the build should
    /// surface.
    pub fn save(&self) -> Result<(), HistoryError> {
        let partitions = self.partitions.write().unwrap();
        for partition in partitions.iter() {
            partition.save()?;
        }
        Ok(())
    }

    /// Returns the base directories of all mounted partitions, in
    /// registration order.
    pub fn mounted_roots(&self) -> Vec<PathBuf> {
        self.partitions
            .read()
            .unwrap()
            .iter()
            .map(|p| p.base_dir().to_path_buf())
            .collect()
    }
}

impl std::fmt::Debug for History {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let partitions = self.partitions.read().unwrap();
        f.debug_list().entries(partitions.iter()).finish()
    }
}
