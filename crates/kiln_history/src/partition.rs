//! Routing scope for build outputs under one base directory.
//!
//! A partition owns a growing set of [`Layer`]s and decides, from the shape
//! of an output path, which layer file holds that path's record. Splitting
//! the cache per platform/target/configuration keeps each layer file small
//! and lets cleanup invalidate one build flavor without touching the others.

use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};

use kiln_common::{paths, FileItem};

use crate::error::HistoryError;
use crate::layer::Layer;
use crate::locations::LAYER_FILE_NAME;

/// Records command lines for outputs under a single base directory.
///
/// The layer list is append-only and read far more often than it grows:
/// lookups scan a read-locked snapshot, and creation re-checks under the
/// write lock so a concurrent first touch of the same location constructs
/// exactly one layer.
pub struct Partition {
    /// The base directory for this partition.
    base_dir: PathBuf,

    /// Layers created so far, at most one per layer location.
    layers: RwLock<Vec<Arc<Layer>>>,
}

impl Partition {
    /// Creates a partition rooted at the given base directory.
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
            layers: RwLock::new(Vec::new()),
        }
    }

    /// Returns the base directory for this partition.
    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    /// Records the command line that produced `file` in the owning layer,
    /// creating (and loading) that layer on first use.
    ///
    /// Returns the layer's record-once result: `true` iff this is the first
    /// record for `file`.
    pub fn update(&self, file: &FileItem, command_line: &str) -> bool {
        let location = self.layer_location_for(file.path());

        let existing = {
            let layers = self.layers.read().unwrap();
            layers
                .iter()
                .find(|layer| paths::paths_equal(layer.location(), &location))
                .cloned()
        };

        let layer = match existing {
            Some(layer) => layer,
            None => {
                let mut layers = self.layers.write().unwrap();
                // Re-check: another thread may have created the layer while
                // we waited for the lock.
                match layers
                    .iter()
                    .find(|layer| paths::paths_equal(layer.location(), &location))
                {
                    Some(layer) => Arc::clone(layer),
                    None => {
                        let layer = Arc::new(Layer::new(location));
                        layers.push(Arc::clone(&layer));
                        layer
                    }
                }
            }
        };

        layer.update(file, command_line)
    }

    /// Computes the layer file location for an output path under this
    /// partition.
    ///
    /// Scans path segments below the base directory in order; the first
    /// structural marker wins:
    ///
    /// 1. `Binaries/<Platform>/` routes to
    ///    `<base>/Intermediate/Build/<Platform>/ActionHistory.bin`;
    /// 2. `Intermediate/Build/<Platform>/<Target>/<Configuration>/` routes to
    ///    `<base>/Intermediate/Build/<Platform>/<Target>/<Configuration>/ActionHistory.bin`,
    ///    preserving the segment spelling found in the path;
    /// 3. anything else routes to the partition default
    ///    `<base>/Intermediate/Build/ActionHistory.bin`.
    ///
    /// A marker whose required trailing segments are incomplete (e.g. the
    /// platform name is the file itself) does not match and scanning
    /// continues.
    pub fn layer_location_for(&self, path: &Path) -> PathBuf {
        let segments = paths::relative_components(&self.base_dir, path).unwrap_or_default();
        let n = segments.len();

        // Only directory segments are scanned; the last segment is the file
        // name itself.
        for i in 0..n.saturating_sub(1) {
            if paths::fragments_equal(segments[i], "Binaries") && i + 2 < n {
                return self
                    .base_dir
                    .join("Intermediate")
                    .join("Build")
                    .join(segments[i + 1])
                    .join(LAYER_FILE_NAME);
            }

            if paths::fragments_equal(segments[i], "Intermediate")
                && i + 5 < n
                && paths::fragments_equal(segments[i + 1], "Build")
            {
                let mut location = self.base_dir.clone();
                for segment in &segments[i..i + 5] {
                    location.push(segment);
                }
                location.push(LAYER_FILE_NAME);
                return location;
            }
        }

        self.base_dir
            .join("Intermediate")
            .join("Build")
            .join(LAYER_FILE_NAME)
    }

    /// Saves every layer in the current snapshot.
    ///
    /// Safe to call while updates are in flight; layers created concurrently
    /// may or may not be included in this pass. Expected to run once, after
    /// all build actions complete.
    pub fn save(&self) -> Result<(), HistoryError> {
        let layers: Vec<Arc<Layer>> = self.layers.read().unwrap().clone();
        for layer in &layers {
            layer.save()?;
        }
        Ok(())
    }
}

impl std::fmt::Debug for Partition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Partition({})", self.base_dir.display())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn binaries_routes_per_platform() {
        let partition = Partition::new("/base");
        let location =
            partition.layer_location_for(Path::new("/base/Binaries/Win64/MyGame.exe"));
        assert_eq!(
            location,
            Path::new("/base/Intermediate/Build/Win64/ActionHistory.bin")
        );
    }

    #[test]
    fn binaries_marker_deep_in_tree() {
        let partition = Partition::new("/base");
        let location = partition
            .layer_location_for(Path::new("/base/Games/Shooter/Binaries/Linux/Shooter"));
        assert_eq!(
            location,
            Path::new("/base/Intermediate/Build/Linux/ActionHistory.bin")
        );
    }

    #[test]
    fn binaries_without_platform_directory_falls_through() {
        // "Win64" here is the output file itself, not a platform directory.
        let partition = Partition::new("/base");
        let location = partition.layer_location_for(Path::new("/base/Binaries/Win64"));
        assert_eq!(
            location,
            Path::new("/base/Intermediate/Build/ActionHistory.bin")
        );
    }

    #[test]
    fn intermediate_build_routes_per_target_configuration() {
        let partition = Partition::new("/base");
        let location = partition.layer_location_for(Path::new(
            "/base/Intermediate/Build/Win64/MyGame/Development/Module/a.obj",
        ));
        assert_eq!(
            location,
            Path::new("/base/Intermediate/Build/Win64/MyGame/Development/ActionHistory.bin")
        );
    }

    #[test]
    fn intermediate_marker_deep_in_tree_reroots_at_base() {
        let partition = Partition::new("/base");
        let location = partition.layer_location_for(Path::new(
            "/base/Plugins/Foo/Intermediate/Build/Linux/Foo/Shipping/a.o",
        ));
        assert_eq!(
            location,
            Path::new("/base/Intermediate/Build/Linux/Foo/Shipping/ActionHistory.bin")
        );
    }

    #[test]
    fn incomplete_intermediate_marker_uses_default() {
        // Platform/target/configuration segments are not all present.
        let partition = Partition::new("/base");
        let location =
            partition.layer_location_for(Path::new("/base/Intermediate/Build/Win64/a.obj"));
        assert_eq!(
            location,
            Path::new("/base/Intermediate/Build/ActionHistory.bin")
        );
    }

    #[test]
    fn unmarked_path_uses_default() {
        let partition = Partition::new("/base");
        let location = partition.layer_location_for(Path::new("/base/Saved/Logs/build.log"));
        assert_eq!(
            location,
            Path::new("/base/Intermediate/Build/ActionHistory.bin")
        );
    }

    #[test]
    fn binaries_wins_when_first_in_path_order() {
        let partition = Partition::new("/base");
        let location = partition.layer_location_for(Path::new(
            "/base/Binaries/Mac/Intermediate/Build/Mac/App/Debug/a.o",
        ));
        assert_eq!(
            location,
            Path::new("/base/Intermediate/Build/Mac/ActionHistory.bin")
        );
    }

    #[test]
    fn update_creates_one_layer_per_location() {
        let dir = tempfile::tempdir().unwrap();
        let base = dir.path().to_path_buf();
        let partition = Partition::new(base.clone());

        let a = FileItem::new(base.join("Binaries/Win64/a.dll").to_str().unwrap());
        let b = FileItem::new(base.join("Binaries/Win64/b.dll").to_str().unwrap());
        let c = FileItem::new(base.join("Binaries/Linux/c.so").to_str().unwrap());

        assert!(partition.update(&a, "cmd a"));
        assert!(partition.update(&b, "cmd b"));
        assert!(partition.update(&c, "cmd c"));
        assert!(!partition.update(&a, "cmd a again"));

        let layers = partition.layers.read().unwrap();
        assert_eq!(layers.len(), 2, "Win64 and Linux share no layer");
    }

    #[test]
    fn save_persists_all_layers() {
        let dir = tempfile::tempdir().unwrap();
        let base = dir.path().to_path_buf();
        let partition = Partition::new(base.clone());

        let a = FileItem::new(base.join("Binaries/Win64/a.dll").to_str().unwrap());
        let c = FileItem::new(base.join("Binaries/Linux/c.so").to_str().unwrap());
        partition.update(&a, "cmd a");
        partition.update(&c, "cmd c");
        partition.save().unwrap();

        assert!(base
            .join("Intermediate/Build/Win64/ActionHistory.bin")
            .exists());
        assert!(base
            .join("Intermediate/Build/Linux/ActionHistory.bin")
            .exists());
    }
}
