// SPDX-License-Identifier: PMPL-1.0-or-later
//! Document-tree provider contract.
//!
//! The scan pipeline never touches a browser DOM directly. Anything that can
//! expose a root node and, per node, its tag, attributes, children, computed
//! style and bounding rectangle can be scanned and highlighted. The
//! in-memory [`SnapshotTree`] is the implementation shipped with the crate.

pub mod path;
pub mod selector;
pub mod snapshot;

pub use snapshot::{SnapshotTree, TreeBuilder};

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Stable identity of a node within one tree
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct NodeId(pub usize);

/// Node type. Only elements are evaluated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
    Element,
    Text,
    Comment,
}

/// Screen-space rectangle, relative to the viewport
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self { x, y, width, height }
    }

    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    /// Shift by an offset
    pub fn translate(&self, dx: f64, dy: f64) -> Self {
        Self { x: self.x + dx, y: self.y + dy, ..*self }
    }
}

/// Scroll position and size of the visible area
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Viewport {
    pub scroll_x: f64,
    pub scroll_y: f64,
    pub width: f64,
    pub height: f64,
}

impl Default for Viewport {
    fn default() -> Self {
        Self { scroll_x: 0.0, scroll_y: 0.0, width: 1280.0, height: 800.0 }
    }
}

/// Computed style values, as CSS strings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComputedStyle {
    pub color: String,
    pub background_color: String,
    pub font_size: String,
    pub font_weight: String,
}

impl Default for ComputedStyle {
    fn default() -> Self {
        Self {
            color: "rgb(0, 0, 0)".to_string(),
            background_color: "rgba(0, 0, 0, 0)".to_string(),
            font_size: "16px".to_string(),
            font_weight: "400".to_string(),
        }
    }
}

/// Read access to a rendered document tree.
///
/// Tag names are lowercase. Methods called with a node of the wrong kind
/// return empty values rather than failing.
pub trait DocumentTree {
    /// The document root element
    fn root(&self) -> NodeId;

    fn kind(&self, node: NodeId) -> NodeKind;

    /// Lowercase tag name; empty for non-element nodes
    fn tag_name(&self, node: NodeId) -> &str;

    fn attribute(&self, node: NodeId, name: &str) -> Option<&str>;

    fn attributes(&self, node: NodeId) -> BTreeMap<String, String>;

    /// Ordered child nodes, including text nodes
    fn children(&self, node: NodeId) -> Vec<NodeId>;

    fn parent(&self, node: NodeId) -> Option<NodeId>;

    /// Character data of a text node
    fn text(&self, node: NodeId) -> Option<&str>;

    fn computed_style(&self, node: NodeId) -> ComputedStyle;

    fn bounding_rect(&self, node: NodeId) -> Rect;

    /// Document URL, if the provider knows it
    fn url(&self) -> Option<&str> {
        None
    }

    /// Scroll position and size of the window showing the document
    fn viewport(&self) -> Option<Viewport> {
        None
    }

    fn is_element(&self, node: NodeId) -> bool {
        self.kind(node) == NodeKind::Element
    }

    /// Child elements only
    fn element_children(&self, node: NodeId) -> Vec<NodeId> {
        self.children(node)
            .into_iter()
            .filter(|&c| self.is_element(c))
            .collect()
    }

    /// Concatenated text of all descendant text nodes
    fn text_content(&self, node: NodeId) -> String {
        let mut out = String::new();
        let mut stack = vec![node];
        while let Some(current) = stack.pop() {
            match self.kind(current) {
                NodeKind::Text => {
                    if let Some(text) = self.text(current) {
                        out.push_str(text);
                    }
                }
                NodeKind::Element => {
                    let mut children = self.children(current);
                    children.reverse();
                    stack.extend(children);
                }
                NodeKind::Comment => {}
            }
        }
        out
    }

    /// Text of the node's own text children, ignoring descendants
    fn own_text(&self, node: NodeId) -> String {
        self.children(node)
            .into_iter()
            .filter_map(|c| self.text(c))
            .collect()
    }

    /// First element in document order whose `id` attribute equals `id`
    fn find_by_id(&self, id: &str) -> Option<NodeId> {
        let mut stack = vec![self.root()];
        while let Some(node) = stack.pop() {
            if !self.is_element(node) {
                continue;
            }
            if self.attribute(node, "id") == Some(id) {
                return Some(node);
            }
            let mut children = self.children(node);
            children.reverse();
            stack.extend(children);
        }
        None
    }

    /// First element in document order matching a CSS selector
    fn resolve_selector(&self, selector: &str) -> Option<NodeId> {
        selector::Selector::parse(selector).and_then(|s| s.select_first(self))
    }

    /// Element addressed by a structural path such as `/html[1]/body[1]/p[2]`
    fn resolve_path(&self, path: &str) -> Option<NodeId> {
        path::resolve(self, path)
    }

    /// Selector that re-locates `node` through [`resolve_selector`](Self::resolve_selector)
    fn selector_for(&self, node: NodeId) -> String {
        selector::selector_for(self, node)
    }

    /// Structural path that re-locates `node` through [`resolve_path`](Self::resolve_path)
    fn path_for(&self, node: NodeId) -> String {
        path::path_for(self, node)
    }
}
