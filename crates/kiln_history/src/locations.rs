//! Well-known action history file locations.
//!
//! Routed (per-partition) layer files always use the fixed name
//! `ActionHistory.bin` under a computed subdirectory; see
//! [`Partition::layer_location_for`](crate::Partition::layer_location_for).
//! The helpers here produce the two top-level, non-routed cache locations —
//! one engine-scoped, one project-scoped — so cleanup tooling can enumerate
//! and delete them.

use std::path::{Path, PathBuf};

/// Fixed file name for routed per-partition layer files.
pub const LAYER_FILE_NAME: &str = "ActionHistory.bin";

/// File name for the project-scoped top-level cache.
const PROJECT_FILE_NAME: &str = "ActionHistory.dat";

/// The kind of target being built, as far as cache naming is concerned.
///
/// Program targets keep their own engine-scoped cache keyed by target name;
/// game and editor targets share one per kind, since they link against the
/// same engine binaries regardless of project.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TargetKind {
    /// A standalone program; cached under its own name.
    Program,
    /// A game target; all game targets share the engine-scoped cache.
    Game,
    /// An editor target; all editor targets share the engine-scoped cache.
    Editor,
}

impl TargetKind {
    /// Returns the application name used to key the engine-scoped cache.
    fn app_name(self, target_name: &str) -> String {
        match self {
            TargetKind::Program => target_name.to_string(),
            TargetKind::Game => "KilnGame".to_string(),
            TargetKind::Editor => "KilnEditor".to_string(),
        }
    }
}

/// Returns the intermediate build folder for a platform and architecture,
/// relative to a root directory.
///
/// The architecture becomes a `-<arch>` suffix on the platform folder when
/// non-empty, so multi-architecture builds of the same platform never share
/// a cache.
pub fn platform_intermediate_folder(platform: &str, architecture: &str) -> PathBuf {
    let platform_dir = if architecture.is_empty() {
        platform.to_string()
    } else {
        format!("{platform}-{architecture}")
    };
    Path::new("Intermediate").join("Build").join(platform_dir)
}

/// Returns the engine-scoped top-level cache location for a target.
pub fn engine_location(
    engine_dir: &Path,
    target_name: &str,
    platform: &str,
    kind: TargetKind,
    architecture: &str,
) -> PathBuf {
    engine_dir
        .join(platform_intermediate_folder(platform, architecture))
        .join(kind.app_name(target_name))
        .join(LAYER_FILE_NAME)
}

/// Returns the project-scoped top-level cache location for a target.
pub fn project_location(
    project_file: &Path,
    target_name: &str,
    platform: &str,
    architecture: &str,
) -> PathBuf {
    let project_dir = project_file.parent().unwrap_or(project_file);
    project_dir
        .join(platform_intermediate_folder(platform, architecture))
        .join(target_name)
        .join(PROJECT_FILE_NAME)
}

/// Enumerates the top-level cache files for a target, for cleanup tooling.
///
/// The engine-scoped location is included except when building a project
/// against an installed (read-only) engine; the project-scoped location is
/// included whenever a project file is given.
pub fn files_to_clean(
    engine_dir: &Path,
    project_file: Option<&Path>,
    target_name: &str,
    platform: &str,
    kind: TargetKind,
    architecture: &str,
    engine_installed: bool,
) -> Vec<PathBuf> {
    let mut files = Vec::new();
    if project_file.is_none() || !engine_installed {
        files.push(engine_location(
            engine_dir,
            target_name,
            platform,
            kind,
            architecture,
        ));
    }
    if let Some(project_file) = project_file {
        files.push(project_location(
            project_file,
            target_name,
            platform,
            architecture,
        ));
    }
    files
}
