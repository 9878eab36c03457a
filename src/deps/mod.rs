// src/deps/mod.rs

//! Dependency graph and watch-set selection.
//!
//! - [`resolver`] is the seam to the host toolchain (`go list`).
//! - [`stdlib`] knows which import roots belong to the standard library.
//! - [`graph`] merges the imports of the root packages into a path tree.
//! - [`filter`] ranks the graph's dependencies and bounds them to a limit.
//! - [`watch_set`] turns the selection into absolute directories.
//! - [`discover`] optionally expands the root packages transitively first.
//!
//! Nothing here watches files or decides when to rebuild.

pub mod discover;
pub mod filter;
pub mod graph;
pub mod resolver;
pub mod stdlib;
pub mod watch_set;

use std::collections::HashSet;
use std::path::Path;

use tracing::info;

pub use discover::{discover_packages, valid_package_roots, Discovery};
pub use filter::{select, Filter, Priority};
pub use graph::{Graph, GraphBuild, GraphBuilder, Node, NodeId};
pub use resolver::{GoListResolver, ImportResolver, StaticResolver};
pub use stdlib::{StdLib, GO_STDLIB_ROOTS};
pub use watch_set::WatchSet;

use crate::errors::GobError;

/// Knobs for [`plan_watch_set`].
#[derive(Debug, Clone, Copy)]
pub struct PlanOptions {
    pub include_standard_library: bool,
    /// Expand the root packages transitively before building the graph.
    pub recursive: bool,
    /// Maximum number of dependency directories to watch.
    pub limit: i64,
}

/// Everything computed while deciding what to watch.
#[derive(Debug)]
pub struct WatchPlan {
    pub graph: Graph,
    pub filter: Filter,
    pub watch_set: WatchSet,
    pub failures: Vec<GobError>,
}

/// Build the dependency graph of `packages`, filter it and produce the
/// watch set.
///
/// `valid_roots` is only consulted when `options.recursive` is set.
pub fn plan_watch_set<R: ImportResolver>(
    resolver: &R,
    stdlib: StdLib,
    source_root: &Path,
    packages: &[String],
    valid_roots: &HashSet<String>,
    options: PlanOptions,
) -> WatchPlan {
    let (graph, failures) = if options.recursive {
        let discovery = discover_packages(resolver, packages, source_root, valid_roots);
        // Reuse the import lists discovery already fetched; failed packages
        // are absent from them and reported once, by discovery.
        let GraphBuild { graph, .. } = GraphBuilder::new(&discovery.resolved, stdlib)
            .include_standard_library(options.include_standard_library)
            .build(&discovery.packages, source_root);
        (graph, discovery.failures)
    } else {
        let GraphBuild { graph, failures } = GraphBuilder::new(resolver, stdlib)
            .include_standard_library(options.include_standard_library)
            .build(packages, source_root);
        (graph, failures)
    };

    let filter = Filter::new(&graph, options.limit);
    let watch_set = WatchSet::new(source_root, filter.selected(), packages);

    info!(
        dependencies = graph.total_dependencies(),
        selected = filter.selected().len(),
        dropped = filter.to_remove(),
        dirs = watch_set.len(),
        "watch set planned"
    );

    WatchPlan {
        graph,
        filter,
        watch_set,
        failures,
    }
}
