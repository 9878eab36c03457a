// tests/property_graph.rs

use std::collections::HashSet;
use std::path::Path;

use gob::deps::{Filter, Graph, GraphBuilder, StaticResolver, StdLib};
use proptest::prelude::*;

// Import paths drawn from a small alphabet so that prefixes collide often.
fn import_strategy() -> impl Strategy<Value = String> {
    proptest::collection::vec(prop::sample::select(vec!["a", "b", "c", "lib", "x"]), 1..4)
        .prop_map(|segs| segs.join("/"))
}

// Up to three root packages, each with a handful of imports.
fn workspace_strategy() -> impl Strategy<Value = Vec<(String, Vec<String>)>> {
    proptest::collection::vec(proptest::collection::vec(import_strategy(), 0..8), 1..4).prop_map(
        |lists| {
            lists
                .into_iter()
                .enumerate()
                .map(|(i, imports)| (format!("root{i}/cmd"), imports))
                .collect()
        },
    )
}

fn build(workspace: &[(String, Vec<String>)]) -> Graph {
    let mut resolver = StaticResolver::new();
    for (package, imports) in workspace {
        resolver.insert(package, imports.iter().cloned());
    }
    let packages: Vec<String> = workspace.iter().map(|(p, _)| p.clone()).collect();
    GraphBuilder::new(&resolver, StdLib::go())
        .build(&packages, Path::new("/src"))
        .graph
}

proptest! {
    #[test]
    fn every_path_has_exactly_one_node(ws in workspace_strategy()) {
        let graph = build(&ws);
        let paths = graph.list_nodes();
        let unique: HashSet<&str> = paths.iter().copied().collect();
        prop_assert_eq!(unique.len(), paths.len());
        prop_assert_eq!(graph.node_count(), paths.len());
    }

    #[test]
    fn graph_is_a_tree_rooted_at_the_source_root(ws in workspace_strategy()) {
        let graph = build(&ws);
        for node in graph.nodes() {
            let parent = node.parent();
            prop_assert!(parent.is_some(), "{} has no parent", node.path());

            // Walking up always reaches the root within depth bounds.
            let mut steps = 0;
            let mut current = parent;
            while let Some(id) = current {
                if id == graph.root() {
                    break;
                }
                current = graph.node(id).parent();
                steps += 1;
                prop_assert!(steps <= 4);
            }
            prop_assert_eq!(current, Some(graph.root()));

            prop_assert_eq!(node.child_count(), node.children().len());
        }

        // No node is reachable from the root along two different paths.
        let mut seen = HashSet::new();
        for parent in std::iter::once(graph.root_node()).chain(graph.nodes()) {
            for &child in parent.children() {
                prop_assert!(child != graph.root());
                prop_assert!(seen.insert(child), "{} listed twice", graph.node(child).path());
            }
        }
        prop_assert_eq!(seen.len(), graph.node_count());
    }

    #[test]
    fn every_distinct_import_is_one_dependency(ws in workspace_strategy()) {
        let graph = build(&ws);
        let distinct: HashSet<&str> = ws
            .iter()
            .flat_map(|(_, imports)| imports.iter().map(String::as_str))
            .collect();
        prop_assert_eq!(graph.total_dependencies(), distinct.len());
        prop_assert_eq!(graph.dependencies().count(), distinct.len());
    }

    #[test]
    fn selection_is_bounded_by_the_limit(ws in workspace_strategy(), limit in -3i64..12) {
        let graph = build(&ws);
        let filter = Filter::new(&graph, limit);
        let bound = usize::try_from(limit).unwrap_or(0).min(graph.total_dependencies());

        prop_assert_eq!(filter.selected().len(), bound);
        prop_assert_eq!(filter.selected().len() + filter.removed().len(), graph.total_dependencies());
    }

    #[test]
    fn building_twice_gives_the_same_selection(ws in workspace_strategy(), limit in 0i64..10) {
        let first = Filter::new(&build(&ws), limit);
        let second = Filter::new(&build(&ws), limit);
        prop_assert_eq!(first.selected(), second.selected());
        prop_assert_eq!(build(&ws).render(), build(&ws).render());
    }
}
