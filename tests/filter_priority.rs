// tests/filter_priority.rs

mod common;
use crate::common::builders::WorkspaceBuilder;
use crate::common::packages;

use gob::deps::{
    plan_watch_set, select, Filter, PlanOptions, Priority, StdLib, WatchSet,
};
use std::collections::HashSet;
use std::path::{Path, PathBuf};

/// Two root packages under `app/`:
/// - `app/shared`: first-party, imported by both  -> High
/// - `app/only`:   first-party, imported once     -> Medium
/// - `ext/leaf`:   third-party, imported once     -> Low
/// - `ext/common`: third-party, imported by both  -> Medium
fn tiered_workspace() -> WorkspaceBuilder {
    WorkspaceBuilder::new("/src")
        .package("app/one", &["app/shared", "app/only", "ext/leaf", "ext/common"])
        .package("app/two", &["app/shared", "ext/common"])
}

#[test]
fn every_dependency_lands_in_its_tier() {
    let graph = tiered_workspace().graph(&["app/one", "app/two"]);
    let tier = |p: &str| Priority::of(graph.get(p).unwrap());

    assert_eq!(tier("app/shared"), Priority::High);
    assert_eq!(tier("app/only"), Priority::Medium);
    assert_eq!(tier("ext/common"), Priority::Medium);
    assert_eq!(tier("ext/leaf"), Priority::Low);
}

#[test]
fn limit_keeps_the_highest_tiers_with_path_tie_break() {
    let graph = tiered_workspace().graph(&["app/one", "app/two"]);
    let filter = Filter::new(&graph, 2);

    assert_eq!(filter.selected(), &["app/shared".to_string(), "app/only".to_string()]);
    assert_eq!(filter.removed(), &["ext/common".to_string(), "ext/leaf".to_string()]);
    assert_eq!(filter.to_remove(), 2);
    assert_eq!(filter.limit(), 2);
}

#[test]
fn limit_above_total_keeps_everything_in_tier_order() {
    let graph = tiered_workspace().graph(&["app/one", "app/two"]);
    let selected = select(&graph, 256);

    assert_eq!(selected, vec!["app/shared", "app/only", "ext/common", "ext/leaf"]);
    assert_eq!(Filter::new(&graph, 256).to_remove(), 0);
}

#[test]
fn negative_limit_selects_nothing() {
    let graph = tiered_workspace().graph(&["app/one", "app/two"]);
    let filter = Filter::new(&graph, -5);

    assert!(filter.selected().is_empty());
    assert_eq!(filter.limit(), 0);
    assert_eq!(filter.to_remove(), 4);
}

#[test]
fn planned_watch_set_lists_dependencies_then_packages() {
    let ws = tiered_workspace();
    let plan = plan_watch_set(
        ws.resolver(),
        StdLib::go(),
        Path::new("/src"),
        &packages(&["app/one", "app/two"]),
        &HashSet::new(),
        PlanOptions {
            include_standard_library: false,
            recursive: false,
            limit: 3,
        },
    );

    assert!(plan.failures.is_empty());
    let dirs: Vec<PathBuf> = plan.watch_set.dirs().map(Path::to_path_buf).collect();
    assert_eq!(
        dirs,
        vec![
            PathBuf::from("/src/app/shared"),
            PathBuf::from("/src/app/only"),
            PathBuf::from("/src/ext/common"),
            PathBuf::from("/src/app/one"),
            PathBuf::from("/src/app/two"),
        ]
    );
}

#[test]
fn dependency_that_is_a_root_package_is_listed_once() {
    let set = WatchSet::new(
        Path::new("/src"),
        &["app/two", "lib/x"],
        &["app/one", "app/two"],
    );

    assert_eq!(set.dependency_dirs(), &[PathBuf::from("/src/lib/x")]);
    assert_eq!(set.package_dirs().len(), 2);
    assert_eq!(set.len(), 3);
}

#[test]
fn hosted_first_party_code_outranks_third_party_libraries() {
    let graph = WorkspaceBuilder::new("/src")
        .package(
            "github.com/me/app",
            &["github.com/gorilla/mux", "github.com/me/app/internal/db", "gopkg.in/yaml.v2"],
        )
        .graph(&["github.com/me/app"]);

    assert!(!graph.get("github.com/gorilla/mux").unwrap().is_core_dependency());
    assert!(graph.get("github.com/me/app/internal/db").unwrap().is_core_dependency());

    let filter = Filter::new(&graph, 2);
    assert_eq!(
        filter.selected(),
        &[
            "github.com/me/app/internal/db".to_string(),
            "github.com/gorilla/mux".to_string(),
        ]
    );
}
