// SPDX-License-Identifier: PMPL-1.0-or-later
//! Depth-first traversal of a document tree.
//!
//! Every node is visited at most once per walk, parents before children and
//! siblings in document order. Only element nodes reach the visitor.

use crate::tree::{DocumentTree, NodeId};
use std::collections::HashSet;
use tracing::debug;

/// Counters collected during one walk
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WalkStats {
    /// Nodes of any kind reached from the root
    pub nodes: usize,
    /// Element nodes handed to the visitor
    pub elements: usize,
}

/// Walk the tree from its root, calling `visit` on each element in pre-order
pub fn walk<T, F>(tree: &T, mut visit: F) -> WalkStats
where
    T: DocumentTree + ?Sized,
    F: FnMut(NodeId),
{
    let mut stats = WalkStats::default();
    let mut visited: HashSet<NodeId> = HashSet::new();
    let mut stack = vec![tree.root()];

    while let Some(node) = stack.pop() {
        if !visited.insert(node) {
            continue;
        }
        stats.nodes += 1;

        if !tree.is_element(node) {
            continue;
        }
        stats.elements += 1;
        visit(node);

        let mut children = tree.children(node);
        children.reverse();
        stack.extend(children.into_iter().filter(|c| !visited.contains(c)));
    }

    debug!(nodes = stats.nodes, elements = stats.elements, "walk complete");
    stats
}
