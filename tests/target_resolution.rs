// tests/target_resolution.rs

mod common;
use crate::common::builders::WorkspaceBuilder;

use std::path::{Path, PathBuf};

use gob::errors::GobError;
use gob::target::resolve_targets;

const ROOT: &str = "/go/src";

fn workspace() -> WorkspaceBuilder {
    WorkspaceBuilder::new(ROOT)
        .package("app/main", &[])
        .package("app/worker", &[])
        .file("world.json", r#"["app/main", "app/worker"]"#)
        .file("broken.json", r#"["app/main", "app/nope"]"#)
}

fn args(list: &[&str]) -> Vec<String> {
    list.iter().map(|s| s.to_string()).collect()
}

#[test]
fn package_path_relative_to_the_source_root() {
    let ws = workspace();
    let set = resolve_targets(ws.fs(), Path::new(ROOT), Path::new("/"), "app/main", args(&["-v"])).unwrap();

    assert_eq!(set.packages(), vec!["app/main"]);
    assert_eq!(set.args, vec!["-v"]);
    assert!(!set.world);
    assert_eq!(
        set.primary().binary_in(Path::new("/go/gob/build")),
        PathBuf::from("/go/gob/build/main")
    );
}

#[test]
fn source_file_resolves_to_its_package() {
    let ws = workspace();
    let cwd = Path::new("/go/src/app/main");
    let set = resolve_targets(ws.fs(), Path::new(ROOT), cwd, "./main.go", vec![]).unwrap();
    assert_eq!(set.packages(), vec!["app/main"]);

    let file_in_root = resolve_targets(ws.fs(), Path::new(ROOT), Path::new("/"), "app/worker/main.go", vec![]).unwrap();
    assert_eq!(file_in_root.packages(), vec!["app/worker"]);
}

#[test]
fn directory_relative_to_cwd() {
    let ws = workspace();
    let cwd = Path::new("/go/src/app/main");

    let here = resolve_targets(ws.fs(), Path::new(ROOT), cwd, ".", vec![]).unwrap();
    assert_eq!(here.packages(), vec!["app/main"]);

    let sibling = resolve_targets(ws.fs(), Path::new(ROOT), cwd, "../worker/", vec![]).unwrap();
    assert_eq!(sibling.packages(), vec!["app/worker"]);
}

#[test]
fn world_file_lists_several_packages_and_drops_args() {
    let ws = workspace();
    let set = resolve_targets(ws.fs(), Path::new(ROOT), Path::new("/"), "world.json", args(&["x"])).unwrap();

    assert!(set.world);
    assert_eq!(set.packages(), vec!["app/main", "app/worker"]);
    assert!(set.args.is_empty());
}

#[test]
fn world_file_with_a_bad_entry_is_rejected() {
    let ws = workspace();
    let err = resolve_targets(ws.fs(), Path::new(ROOT), Path::new("/"), "broken.json", vec![]).unwrap_err();
    assert!(matches!(err, GobError::InvalidTarget(msg) if msg.contains("app/nope")));
}

#[test]
fn missing_targets_are_invalid() {
    let ws = workspace();
    for input in ["app/nope", "./nope.go", ""] {
        let err = resolve_targets(ws.fs(), Path::new(ROOT), Path::new("/go/src/app"), input, vec![])
            .unwrap_err();
        assert!(matches!(err, GobError::InvalidTarget(_)), "{input:?} gave {err:?}");
    }
}
