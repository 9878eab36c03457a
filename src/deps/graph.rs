// src/deps/graph.rs

//! Dependency tree over import path strings.
//!
//! Every import of the root packages becomes a *dependency* node, and every
//! directory prefix of an import becomes an *ancestor* node, so the graph
//! mirrors the directory hierarchy implied by the import paths:
//!
//! ```text
//! /src (3 children)
//!     app (1 children)
//!         app/util (0 children)
//!     vendor (1 children)
//!         vendor/lib (1 children)
//!             vendor/lib/json (0 children)
//! ```
//!
//! Nodes live in an arena and refer to each other by [`NodeId`]. The
//! `nodes` index maps each path to the single node that owns it, which is
//! what makes shared ancestors converge instead of being duplicated.

use std::collections::HashMap;
use std::fmt::Write as _;
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use crate::deps::resolver::ImportResolver;
use crate::deps::stdlib::StdLib;
use crate::errors::GobError;

/// Index of a node in the graph arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

impl NodeId {
    pub fn index(self) -> usize {
        self.0
    }
}

/// A path in the dependency tree.
#[derive(Debug, Clone)]
pub struct Node {
    path: String,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    child_count: usize,
    is_dependency: bool,
    is_core_dependency: bool,
    is_duplicate: bool,
    /// Position (in `packages`) of the root package that first imported this
    /// path. `None` for ancestors and the root.
    importer: Option<usize>,
}

impl Node {
    fn ancestor(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            parent: None,
            children: Vec::new(),
            child_count: 0,
            is_dependency: false,
            is_core_dependency: false,
            is_duplicate: false,
            importer: None,
        }
    }

    fn dependency(path: impl Into<String>, is_core: bool, importer: usize) -> Self {
        Self {
            is_dependency: true,
            is_core_dependency: is_core,
            importer: Some(importer),
            ..Self::ancestor(path)
        }
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    pub fn child_count(&self) -> usize {
        self.child_count
    }

    pub fn is_dependency(&self) -> bool {
        self.is_dependency
    }

    pub fn is_core_dependency(&self) -> bool {
        self.is_core_dependency
    }

    pub fn is_duplicate(&self) -> bool {
        self.is_duplicate
    }
}

/// The dependency tree of a set of root packages.
#[derive(Debug, Clone)]
pub struct Graph {
    include_standard_library: bool,
    source_root: PathBuf,
    packages: Vec<String>,

    arena: Vec<Node>,
    root: NodeId,
    nodes: HashMap<String, NodeId>,
    total_dependencies: usize,
}

impl Graph {
    fn empty(source_root: &Path, packages: &[String], include_standard_library: bool) -> Self {
        let root = Node::ancestor(source_root.to_string_lossy());
        Self {
            include_standard_library,
            source_root: source_root.to_path_buf(),
            packages: packages.to_vec(),
            arena: vec![root],
            root: NodeId(0),
            nodes: HashMap::new(),
            total_dependencies: 0,
        }
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn root_node(&self) -> &Node {
        self.node(self.root)
    }

    /// Node behind an id handed out by this graph.
    pub fn node(&self, id: NodeId) -> &Node {
        &self.arena[id.0]
    }

    pub fn id_of(&self, path: &str) -> Option<NodeId> {
        self.nodes.get(path).copied()
    }

    pub fn get(&self, path: &str) -> Option<&Node> {
        self.id_of(path).map(|id| self.node(id))
    }

    /// All path nodes (excluding the synthetic root), in creation order.
    pub fn nodes(&self) -> impl Iterator<Item = &Node> {
        self.arena.iter().skip(1)
    }

    /// Nodes that correspond to an actual import, in creation order.
    pub fn dependencies(&self) -> impl Iterator<Item = &Node> {
        self.nodes().filter(|n| n.is_dependency)
    }

    /// Unique list of node paths.
    pub fn list_nodes(&self) -> Vec<&str> {
        self.nodes().map(Node::path).collect()
    }

    /// Unique list of dependency paths.
    pub fn list_deps(&self) -> Vec<&str> {
        self.dependencies().map(Node::path).collect()
    }

    /// Number of path nodes, excluding the root.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn total_dependencies(&self) -> usize {
        self.total_dependencies
    }

    pub fn source_root(&self) -> &Path {
        &self.source_root
    }

    pub fn packages(&self) -> &[String] {
        &self.packages
    }

    pub fn include_standard_library(&self) -> bool {
        self.include_standard_library
    }

    /// Human-readable tree, one line per node, indented by depth.
    pub fn render(&self) -> String {
        let mut out = String::new();
        self.render_node(self.root, "", &mut out);
        out
    }

    fn render_node(&self, id: NodeId, prefix: &str, out: &mut String) {
        let node = self.node(id);
        let _ = writeln!(out, "{prefix}{} ({} children)", node.path, node.child_count);

        let child_prefix = format!("{prefix}\t");
        for &child in &node.children {
            self.render_node(child, &child_prefix, out);
        }
    }

    fn alloc(&mut self, node: Node) -> NodeId {
        let id = NodeId(self.arena.len());
        self.nodes.insert(node.path.clone(), id);
        self.arena.push(node);
        id
    }

    /// Attach `child` below `parent`. A node's parent is only ever set once.
    fn link(&mut self, parent: NodeId, child: NodeId) {
        if self.arena[child.0].parent.is_some() {
            return;
        }
        self.arena[child.0].parent = Some(parent);

        let parent = &mut self.arena[parent.0];
        parent.children.push(child);
        parent.child_count += 1;
    }

    /// Add one import of the root package at `importer` to the tree.
    fn insert_import(&mut self, importer: usize, import: &str, stdlib: &StdLib) {
        let import = import.trim_matches('/');
        if import.is_empty() {
            return;
        }

        if let Some(id) = self.id_of(import) {
            let importer_pkg = &self.packages[importer];
            let is_core = is_core_import(importer_pkg, import);
            let node = &mut self.arena[id.0];

            if !node.is_dependency {
                // Already linked as an ancestor of a deeper import.
                node.is_dependency = true;
                node.is_core_dependency = is_core;
                node.importer = Some(importer);
                self.total_dependencies += 1;
            } else if node.importer != Some(importer) {
                node.is_duplicate = true;
            }
            return;
        }

        if !self.include_standard_library && stdlib.contains_import(import) {
            return;
        }

        let is_core = is_core_import(&self.packages[importer], import);
        let mut current = self.alloc(Node::dependency(import, is_core, importer));
        self.total_dependencies += 1;

        let mut path = import;
        loop {
            let Some(prefix) = parent_path(path) else {
                self.link(self.root, current);
                return;
            };

            if let Some(existing) = self.id_of(prefix) {
                // The existing node already has a complete chain to the root.
                self.link(existing, current);
                return;
            }

            let ancestor = self.alloc(Node::ancestor(prefix));
            self.link(ancestor, current);
            current = ancestor;
            path = prefix;
        }
    }
}

/// Result of a graph build: the graph plus one error per root package that
/// could not be resolved.
#[derive(Debug)]
pub struct GraphBuild {
    pub graph: Graph,
    pub failures: Vec<GobError>,
}

impl GraphBuild {
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Builds a [`Graph`] from the direct imports of a list of root packages.
#[derive(Debug, Clone)]
pub struct GraphBuilder<R> {
    resolver: R,
    stdlib: StdLib,
    include_standard_library: bool,
}

impl<R: ImportResolver> GraphBuilder<R> {
    pub fn new(resolver: R, stdlib: StdLib) -> Self {
        Self {
            resolver,
            stdlib,
            include_standard_library: false,
        }
    }

    pub fn include_standard_library(mut self, include: bool) -> Self {
        self.include_standard_library = include;
        self
    }

    /// Resolve every package in `packages` (in order) and merge its imports
    /// into one tree rooted at `source_root`.
    ///
    /// A package that fails to resolve is reported in
    /// [`GraphBuild::failures`]; the remaining packages are still processed.
    pub fn build(&self, packages: &[String], source_root: &Path) -> GraphBuild {
        let mut graph = Graph::empty(source_root, packages, self.include_standard_library);
        let mut failures = Vec::new();

        for (idx, package) in packages.iter().enumerate() {
            let imports = match self.resolver.resolve(package, source_root) {
                Ok(imports) => imports,
                Err(err) => {
                    warn!(package = %package, error = %err, "skipping unresolvable package");
                    failures.push(err);
                    continue;
                }
            };

            debug!(package = %package, imports = imports.len(), "merging imports into graph");
            for import in &imports {
                graph.insert_import(idx, import, &self.stdlib);
            }
        }

        info!(
            packages = packages.len(),
            nodes = graph.node_count(),
            dependencies = graph.total_dependencies(),
            "dependency graph built"
        );

        GraphBuild { graph, failures }
    }
}

/// Drop the last segment of `path`. `None` once no segments remain.
fn parent_path(path: &str) -> Option<&str> {
    let (head, _) = path.rsplit_once('/')?;
    let head = head.trim_end_matches('/');
    if head.is_empty() { None } else { Some(head) }
}

/// Whether `import` is first-party relative to `package`.
///
/// True when one path is a segment-wise prefix of the other, or when the
/// import lives below the package's parent directory. A single-segment
/// package has no parent, so only the prefix rule applies to it.
///
/// `x/y` and `x/y/z` qualify, as do `app/main` and `app/util`;
/// `github.com/me/app` and `github.com/gorilla/mux` do not.
pub fn is_core_import(package: &str, import: &str) -> bool {
    let package: Vec<&str> = package.split('/').filter(|s| !s.is_empty()).collect();
    let import: Vec<&str> = import.split('/').filter(|s| !s.is_empty()).collect();
    if package.is_empty() || import.is_empty() {
        return false;
    }

    let shared = package.iter().zip(&import).take_while(|(a, b)| a == b).count();
    shared == package.len() || shared == import.len() || (package.len() > 1 && shared == package.len() - 1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::deps::resolver::StaticResolver;

    fn packages(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn parent_path_strips_one_segment() {
        assert_eq!(parent_path("a/b/c"), Some("a/b"));
        assert_eq!(parent_path("a/b"), Some("a"));
        assert_eq!(parent_path("a"), None);
        assert_eq!(parent_path("a//b"), Some("a"));
    }

    #[test]
    fn core_import_rules() {
        assert!(is_core_import("x/y", "x/y/z"));
        assert!(is_core_import("x/y/z", "x/y"));
        assert!(is_core_import("app/main", "app/util"));
        assert!(is_core_import("app", "app/util"));
        assert!(!is_core_import("x/y", "lib/z"));
        assert!(!is_core_import("app", "application/x"));
        assert!(!is_core_import("app", "lib"));
    }

    #[test]
    fn hosted_third_party_imports_are_not_core() {
        assert!(!is_core_import("github.com/me/app", "github.com/gorilla/mux"));
        assert!(!is_core_import("github.com/me/app", "gopkg.in/yaml.v2"));
        assert!(is_core_import("github.com/me/app", "github.com/me/app/internal/db"));
        assert!(is_core_import("github.com/me/app", "github.com/me/tools"));
    }

    #[test]
    fn converging_imports_share_ancestors() {
        let resolver = StaticResolver::new().with_package("p", ["a/b/c", "a/b/d", "a/e"]);
        let build = GraphBuilder::new(&resolver, StdLib::go())
            .build(&packages(&["p"]), Path::new("/src"));
        let graph = build.graph;

        assert_eq!(graph.node_count(), 5); // a, a/b, a/b/c, a/b/d, a/e
        let ab = graph.get("a/b").unwrap();
        assert_eq!(ab.child_count(), 2);
        assert_eq!(graph.root_node().child_count(), 1);
        assert_eq!(graph.total_dependencies(), 3);
    }

    #[test]
    fn ancestor_promoted_when_imported_directly() {
        let resolver = StaticResolver::new().with_package("p", ["lib/a/b", "lib/a"]);
        let graph = GraphBuilder::new(&resolver, StdLib::go())
            .build(&packages(&["p"]), Path::new("/src"))
            .graph;

        let node = graph.get("lib/a").unwrap();
        assert!(node.is_dependency());
        assert!(!node.is_duplicate());
        assert_eq!(graph.total_dependencies(), 2);
        assert_eq!(graph.node_count(), 3);
    }

    #[test]
    fn render_lists_children_counts() {
        let resolver = StaticResolver::new().with_package("p", ["a/b"]);
        let graph = GraphBuilder::new(&resolver, StdLib::go())
            .build(&packages(&["p"]), Path::new("/src"))
            .graph;

        assert_eq!(
            graph.render(),
            "/src (1 children)\n\ta (1 children)\n\t\ta/b (0 children)\n"
        );
    }
}
