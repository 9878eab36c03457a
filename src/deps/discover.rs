// src/deps/discover.rs

//! Transitive expansion of the root packages.
//!
//! Starting from the root packages, follow imports whose first segment is a
//! top-level directory of the source root (i.e. code that lives in the
//! workspace rather than in the toolchain), breadth first. The expanded list
//! feeds the graph builder when recursive dependency watching is enabled.

use std::collections::{HashMap, HashSet, VecDeque};
use std::path::Path;

use anyhow::Result;
use petgraph::algo::toposort;
use petgraph::graphmap::DiGraphMap;
use tracing::{debug, warn};

use crate::deps::resolver::{ImportResolver, StaticResolver};
use crate::errors::GobError;
use crate::fs::FileSystem;

/// Outcome of a transitive discovery.
#[derive(Debug, Default)]
pub struct Discovery {
    /// Roots first, then every reachable workspace package in BFS order.
    pub packages: Vec<String>,
    /// Packages that failed to resolve (roots or reachable ones).
    pub failures: Vec<GobError>,
    /// A package on an import cycle, if one was found.
    pub cycle: Option<String>,
    /// Import lists of every package that resolved, so the graph builder
    /// can reuse them.
    pub resolved: StaticResolver,
}

/// Names of the top-level directories of `source_root`.
pub fn valid_package_roots(fs: &dyn FileSystem, source_root: &Path) -> Result<HashSet<String>> {
    let mut roots = HashSet::new();
    for entry in fs.read_dir(source_root)? {
        if !fs.is_dir(&entry) {
            continue;
        }
        if let Some(name) = entry.file_name().and_then(|n| n.to_str()) {
            roots.insert(name.to_string());
        }
    }
    Ok(roots)
}

/// Expand `roots` to every package reachable through workspace imports.
pub fn discover_packages<R: ImportResolver + ?Sized>(
    resolver: &R,
    roots: &[String],
    source_root: &Path,
    valid_roots: &HashSet<String>,
) -> Discovery {
    let mut discovery = Discovery::default();
    let mut index: HashMap<String, usize> = HashMap::new();
    let mut imports_graph: DiGraphMap<usize, ()> = DiGraphMap::new();
    let mut queue: VecDeque<usize> = VecDeque::new();

    for root in roots {
        if !index.contains_key(root) {
            let id = discovery.packages.len();
            index.insert(root.clone(), id);
            discovery.packages.push(root.clone());
            imports_graph.add_node(id);
            queue.push_back(id);
        }
    }

    while let Some(id) = queue.pop_front() {
        let package = discovery.packages[id].clone();
        let imports = match resolver.resolve(&package, source_root) {
            Ok(imports) => imports,
            Err(err) => {
                warn!(package = %package, error = %err, "could not resolve package during discovery");
                discovery.failures.push(err);
                continue;
            }
        };
        discovery.resolved.insert(&package, imports.iter().cloned());

        for import in imports {
            let first = import.split('/').next().unwrap_or_default();
            if !valid_roots.contains(first) {
                continue;
            }

            let dep = match index.get(&import) {
                Some(&dep) => dep,
                None => {
                    let dep = discovery.packages.len();
                    index.insert(import.clone(), dep);
                    discovery.packages.push(import);
                    imports_graph.add_node(dep);
                    queue.push_back(dep);
                    dep
                }
            };
            imports_graph.add_edge(id, dep, ());
        }
    }

    if let Err(cycle) = toposort(&imports_graph, None) {
        let package = discovery.packages[cycle.node_id()].clone();
        warn!(package = %package, "import cycle detected among workspace packages");
        discovery.cycle = Some(package);
    }

    debug!(
        roots = roots.len(),
        packages = discovery.packages.len(),
        "transitive package discovery finished"
    );

    discovery
}
