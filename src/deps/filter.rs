// src/deps/filter.rs

//! Bounded, priority-ordered selection of the dependencies worth watching.
//!
//! Native watch mechanisms cap the number of watched directories, so only
//! `limit` dependencies survive. Shared first-party code is kept first,
//! single-use third-party leaves are dropped first.

use tracing::debug;

use crate::deps::graph::{Graph, Node};

/// Watch priority of a dependency.
///
/// Ordering follows declaration order: `High < Medium < Low`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Priority {
    /// First-party code imported by more than one root package.
    High,
    /// Either first-party or shared, not both.
    Medium,
    /// Single-use third-party code.
    Low,
}

impl Priority {
    pub fn classify(is_core: bool, is_duplicate: bool) -> Self {
        match (is_core, is_duplicate) {
            (true, true) => Priority::High,
            (true, false) | (false, true) => Priority::Medium,
            (false, false) => Priority::Low,
        }
    }

    pub fn of(node: &Node) -> Self {
        Self::classify(node.is_core_dependency(), node.is_duplicate())
    }
}

/// The selected watch candidates of a [`Graph`].
#[derive(Debug, Clone)]
pub struct Filter {
    limit: usize,
    to_remove: usize,
    selected: Vec<String>,
    removed: Vec<String>,
}

impl Filter {
    /// Rank every dependency of `graph` and keep at most `limit` of them.
    ///
    /// A negative limit behaves like zero: nothing is selected.
    pub fn new(graph: &Graph, limit: i64) -> Self {
        let limit = usize::try_from(limit).unwrap_or(0);
        let to_remove = graph.total_dependencies().saturating_sub(limit);

        let mut ranked: Vec<(Priority, &str)> = graph
            .dependencies()
            .map(|node| (Priority::of(node), node.path()))
            .collect();
        // Ties inside a tier are broken by path so selection is reproducible.
        ranked.sort_unstable();

        let mut selected: Vec<String> = ranked.into_iter().map(|(_, p)| p.to_string()).collect();
        let removed = if selected.len() > limit {
            selected.split_off(limit)
        } else {
            Vec::new()
        };

        if !removed.is_empty() {
            debug!(
                limit,
                kept = selected.len(),
                dropped = removed.len(),
                "watch limit reached; dropping lowest-priority dependencies"
            );
        }

        Self {
            limit,
            to_remove,
            selected,
            removed,
        }
    }

    pub fn limit(&self) -> usize {
        self.limit
    }

    /// How many dependencies exceeded the limit.
    pub fn to_remove(&self) -> usize {
        self.to_remove
    }

    /// Surviving dependency paths, highest priority first.
    pub fn selected(&self) -> &[String] {
        &self.selected
    }

    /// Dependency paths dropped by the limit, highest priority first.
    pub fn removed(&self) -> &[String] {
        &self.removed
    }

    pub fn into_selected(self) -> Vec<String> {
        self.selected
    }
}

/// Shorthand for `Filter::new(graph, limit).into_selected()`.
pub fn select(graph: &Graph, limit: i64) -> Vec<String> {
    Filter::new(graph, limit).into_selected()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tiers_follow_core_and_duplicate_flags() {
        assert_eq!(Priority::classify(true, true), Priority::High);
        assert_eq!(Priority::classify(true, false), Priority::Medium);
        assert_eq!(Priority::classify(false, true), Priority::Medium);
        assert_eq!(Priority::classify(false, false), Priority::Low);
        assert!(Priority::High < Priority::Medium && Priority::Medium < Priority::Low);
    }
}
