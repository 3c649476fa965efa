//! End-to-end tests for the action history across a simulated build cycle:
//! parallel updates through a `History`, save, and reload in a fresh process
//! image.

use std::path::Path;
use std::sync::Arc;

use kiln_common::FileItem;
use kiln_history::History;

// ---------------------------------------------------------------------------
// Helper: output files for a fake target
// ---------------------------------------------------------------------------

/// Builds the output set of a fake compile+link target under `base`.
fn target_outputs(base: &Path, platform: &str, count: usize) -> Vec<(FileItem, String)> {
    let mut outputs = Vec::new();
    for idx in 0..count {
        let obj = base.join(format!(
            "Intermediate/Build/{platform}/Game/Development/Module/file{idx}.o"
        ));
        outputs.push((
            FileItem::new(obj.to_str().unwrap()),
            format!("clang -O2 -DNDEBUG -c file{idx}.cpp"),
        ));
    }
    let binary = base.join(format!("Binaries/{platform}/Game"));
    outputs.push((
        FileItem::new(binary.to_str().unwrap()),
        "clang -o Game file0.o file1.o".to_string(),
    ));
    outputs
}

// ---------------------------------------------------------------------------
// Full build cycle
// ---------------------------------------------------------------------------

#[test]
fn build_save_and_rerun_sees_all_records() {
    let engine = tempfile::tempdir().unwrap();
    let project = tempfile::tempdir().unwrap();

    let outputs = [
        target_outputs(engine.path(), "Linux", 4),
        target_outputs(project.path(), "Linux", 4),
    ]
    .concat();

    // First build: every output is a first observation.
    {
        let history = History::new(engine.path());
        history.mount(project.path());
        for (file, cmd) in &outputs {
            assert!(history.update(file, cmd), "first record for {file}");
        }
        history.save().unwrap();
    }

    assert!(engine
        .path()
        .join("Intermediate/Build/Linux/Game/Development/ActionHistory.bin")
        .exists());
    assert!(project
        .path()
        .join("Intermediate/Build/Linux/ActionHistory.bin")
        .exists());

    // Second build: everything was persisted, nothing is new.
    {
        let history = History::new(engine.path());
        history.mount(project.path());
        for (file, cmd) in &outputs {
            assert!(!history.update(file, cmd), "{file} must already be known");
        }
    }
}

#[test]
fn parallel_actions_record_each_output_once() {
    let engine = tempfile::tempdir().unwrap();
    let history = Arc::new(History::new(engine.path()));
    let outputs = target_outputs(engine.path(), "Win64", 16);

    // Each worker walks all outputs; every output has exactly one winner.
    let handles: Vec<_> = (0..4)
        .map(|_| {
            let history = Arc::clone(&history);
            let outputs = outputs.clone();
            std::thread::spawn(move || {
                outputs
                    .iter()
                    .map(|(file, cmd)| history.update(file, cmd) as usize)
                    .sum::<usize>()
            })
        })
        .collect();

    let wins: usize = handles.into_iter().map(|h| h.join().unwrap()).sum();
    assert_eq!(wins, outputs.len(), "one winner per output file");

    history.save().unwrap();
    let layer = engine
        .path()
        .join("Intermediate/Build/Win64/Game/Development/ActionHistory.bin");
    let entries = kiln_history::read_entries(&layer).unwrap();
    assert_eq!(entries.len(), outputs.len() - 1, "all objects, binary aside");
}

#[test]
fn unrouted_files_never_create_caches() {
    let engine = tempfile::tempdir().unwrap();
    let stray_dir = tempfile::tempdir().unwrap();

    let history = History::new(engine.path());
    let stray = FileItem::new(stray_dir.path().join("out.o").to_str().unwrap());
    assert!(!history.update(&stray, "cc -c out.c"));
    assert!(!history.update(&stray, "cc -c out.c"));

    history.save().unwrap();
    assert!(!stray_dir.path().join("Intermediate").exists());
}
