// SPDX-License-Identifier: PMPL-1.0-or-later
//! XPath-style structural paths: `/html[1]/body[1]/div[2]`.
//!
//! Each step is a tag with its 1-based index among same-tag siblings.
//! Used as the fallback when a CSS selector no longer resolves.

use super::selector::nth_of_type;
use super::{DocumentTree, NodeId};
use once_cell::sync::Lazy;
use regex::Regex;

static STEP_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^([a-zA-Z][a-zA-Z0-9-]*)(?:\[(\d+)\])?$").expect("valid regex"));

/// Build the path of an element from the root
pub fn path_for<T: DocumentTree + ?Sized>(tree: &T, node: NodeId) -> String {
    let mut steps = Vec::new();
    let mut current = Some(node);
    while let Some(n) = current {
        if tree.is_element(n) {
            steps.push(format!("{}[{}]", tree.tag_name(n), nth_of_type(tree, n)));
        }
        current = tree.parent(n);
    }
    steps.reverse();
    format!("/{}", steps.join("/"))
}

/// Resolve a path produced by [`path_for`]
pub fn resolve<T: DocumentTree + ?Sized>(tree: &T, path: &str) -> Option<NodeId> {
    let mut steps = path
        .trim()
        .strip_prefix('/')?
        .split('/')
        .map(parse_step);

    let (root_tag, root_index) = steps.next()??;
    let root = tree.root();
    if tree.tag_name(root) != root_tag || root_index != 1 {
        return None;
    }

    let mut current = root;
    for step in steps {
        let (tag, index) = step?;
        current = tree
            .element_children(current)
            .into_iter()
            .filter(|&c| tree.tag_name(c) == tag)
            .nth(index - 1)?;
    }
    Some(current)
}

fn parse_step(step: &str) -> Option<(String, usize)> {
    let caps = STEP_RE.captures(step)?;
    let tag = caps[1].to_ascii_lowercase();
    let index = match caps.get(2) {
        Some(m) => m.as_str().parse().ok().filter(|&i: &usize| i > 0)?,
        None => 1,
    };
    Some((tag, index))
}
