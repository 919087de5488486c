// SPDX-License-Identifier: PMPL-1.0-or-later
//! In-memory document tree.
//!
//! Nodes live in an arena indexed by [`NodeId`]. Trees are assembled with
//! [`TreeBuilder`] (used by the HTML loader and tests) or read from a nested
//! JSON document capture:
//!
//! ```json
//! {
//!   "url": "https://example.org/",
//!   "viewport": { "scrollX": 0, "scrollY": 0, "width": 1280, "height": 800 },
//!   "root": {
//!     "tag": "html",
//!     "attributes": { "lang": "en" },
//!     "children": [
//!       { "tag": "body", "style": { "color": "#333" },
//!         "rect": { "x": 0, "y": 0, "width": 1280, "height": 2000 },
//!         "children": [ { "text": "Hello" } ] }
//!     ]
//!   }
//! }
//! ```
//!
//! Style declarations follow CSS inheritance: `color`, `fontSize` and
//! `fontWeight` inherit from the parent when absent, `backgroundColor`
//! defaults to transparent.

use super::{ComputedStyle, DocumentTree, NodeId, NodeKind, Rect, Viewport};
use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Declared (possibly partial) style of an element
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StyleDeclaration {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background_color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_size: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_weight: Option<String>,
}

impl StyleDeclaration {
    fn compute(&self, parent: &ComputedStyle) -> ComputedStyle {
        let defaults = ComputedStyle::default();
        ComputedStyle {
            color: self.color.clone().unwrap_or_else(|| parent.color.clone()),
            background_color: self
                .background_color
                .clone()
                .unwrap_or(defaults.background_color),
            font_size: self.font_size.clone().unwrap_or_else(|| parent.font_size.clone()),
            font_weight: self
                .font_weight
                .clone()
                .unwrap_or_else(|| parent.font_weight.clone()),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SnapshotNode {
    kind: NodeKind,
    tag: String,
    attributes: BTreeMap<String, String>,
    text: Option<String>,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    declared: StyleDeclaration,
    style: ComputedStyle,
    rect: Rect,
}

impl SnapshotNode {
    fn new(kind: NodeKind, tag: &str, parent: Option<NodeId>) -> Self {
        Self {
            kind,
            tag: tag.to_ascii_lowercase(),
            attributes: BTreeMap::new(),
            text: None,
            parent,
            children: Vec::new(),
            declared: StyleDeclaration::default(),
            style: ComputedStyle::default(),
            rect: Rect::default(),
        }
    }
}

/// Arena-backed document tree
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SnapshotTree {
    url: Option<String>,
    viewport: Option<Viewport>,
    nodes: Vec<SnapshotNode>,
}

impl SnapshotTree {
    /// Parse a nested JSON document capture
    pub fn from_json(json: &str) -> Result<Self> {
        let capture: DocumentCapture = serde_json::from_str(json)?;
        Ok(capture.into_tree())
    }

    /// Scroll or resize, as the host window would
    pub fn set_viewport(&mut self, viewport: Viewport) {
        self.viewport = Some(viewport);
    }

    /// Number of nodes of any kind
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Move an element, as a layout change would
    pub fn set_rect(&mut self, node: NodeId, rect: Rect) {
        if let Some(n) = self.nodes.get_mut(node.0) {
            n.rect = rect;
        }
    }

    pub fn set_attribute(&mut self, node: NodeId, name: &str, value: &str) {
        if let Some(n) = self.nodes.get_mut(node.0) {
            n.attributes.insert(name.to_ascii_lowercase(), value.to_string());
        }
    }

    pub fn remove_attribute(&mut self, node: NodeId, name: &str) {
        if let Some(n) = self.nodes.get_mut(node.0) {
            n.attributes.remove(&name.to_ascii_lowercase());
        }
    }

    fn node(&self, id: NodeId) -> Option<&SnapshotNode> {
        self.nodes.get(id.0)
    }
}

impl DocumentTree for SnapshotTree {
    fn root(&self) -> NodeId {
        NodeId(0)
    }

    fn kind(&self, node: NodeId) -> NodeKind {
        self.node(node).map_or(NodeKind::Comment, |n| n.kind)
    }

    fn tag_name(&self, node: NodeId) -> &str {
        self.node(node).map_or("", |n| n.tag.as_str())
    }

    fn attribute(&self, node: NodeId, name: &str) -> Option<&str> {
        self.node(node)?.attributes.get(name).map(String::as_str)
    }

    fn attributes(&self, node: NodeId) -> BTreeMap<String, String> {
        self.node(node).map(|n| n.attributes.clone()).unwrap_or_default()
    }

    fn children(&self, node: NodeId) -> Vec<NodeId> {
        self.node(node).map(|n| n.children.clone()).unwrap_or_default()
    }

    fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.node(node)?.parent
    }

    fn text(&self, node: NodeId) -> Option<&str> {
        let n = self.node(node)?;
        match n.kind {
            NodeKind::Text => n.text.as_deref(),
            _ => None,
        }
    }

    fn computed_style(&self, node: NodeId) -> ComputedStyle {
        self.node(node).map(|n| n.style.clone()).unwrap_or_default()
    }

    fn bounding_rect(&self, node: NodeId) -> Rect {
        self.node(node).map(|n| n.rect).unwrap_or_default()
    }

    fn url(&self) -> Option<&str> {
        self.url.as_deref()
    }

    fn viewport(&self) -> Option<Viewport> {
        self.viewport
    }
}

/// Incremental tree construction
#[derive(Debug, Clone)]
pub struct TreeBuilder {
    url: Option<String>,
    viewport: Option<Viewport>,
    nodes: Vec<SnapshotNode>,
}

impl TreeBuilder {
    /// Start a tree whose root element has tag `root_tag`
    pub fn new(root_tag: &str) -> Self {
        Self {
            url: None,
            viewport: None,
            nodes: vec![SnapshotNode::new(NodeKind::Element, root_tag, None)],
        }
    }

    pub fn root(&self) -> NodeId {
        NodeId(0)
    }

    fn push(&mut self, parent: NodeId, mut node: SnapshotNode) -> NodeId {
        let id = NodeId(self.nodes.len());
        node.parent = Some(parent);
        self.nodes.push(node);
        if let Some(p) = self.nodes.get_mut(parent.0) {
            p.children.push(id);
        }
        id
    }

    /// Append an element child
    pub fn element(&mut self, parent: NodeId, tag: &str) -> NodeId {
        self.push(parent, SnapshotNode::new(NodeKind::Element, tag, Some(parent)))
    }

    /// Append a text child
    pub fn text(&mut self, parent: NodeId, text: &str) -> NodeId {
        let mut node = SnapshotNode::new(NodeKind::Text, "", Some(parent));
        node.text = Some(text.to_string());
        self.push(parent, node)
    }

    pub fn comment(&mut self, parent: NodeId, text: &str) -> NodeId {
        let mut node = SnapshotNode::new(NodeKind::Comment, "", Some(parent));
        node.text = Some(text.to_string());
        self.push(parent, node)
    }

    pub fn attr(&mut self, node: NodeId, name: &str, value: &str) -> &mut Self {
        if let Some(n) = self.nodes.get_mut(node.0) {
            n.attributes.insert(name.to_ascii_lowercase(), value.to_string());
        }
        self
    }

    pub fn style(&mut self, node: NodeId, declaration: StyleDeclaration) -> &mut Self {
        if let Some(n) = self.nodes.get_mut(node.0) {
            n.declared = declaration;
        }
        self
    }

    pub fn color(&mut self, node: NodeId, value: &str) -> &mut Self {
        if let Some(n) = self.nodes.get_mut(node.0) {
            n.declared.color = Some(value.to_string());
        }
        self
    }

    pub fn background(&mut self, node: NodeId, value: &str) -> &mut Self {
        if let Some(n) = self.nodes.get_mut(node.0) {
            n.declared.background_color = Some(value.to_string());
        }
        self
    }

    pub fn font(&mut self, node: NodeId, size: &str, weight: &str) -> &mut Self {
        if let Some(n) = self.nodes.get_mut(node.0) {
            n.declared.font_size = Some(size.to_string());
            n.declared.font_weight = Some(weight.to_string());
        }
        self
    }

    pub fn rect(&mut self, node: NodeId, rect: Rect) -> &mut Self {
        if let Some(n) = self.nodes.get_mut(node.0) {
            n.rect = rect;
        }
        self
    }

    pub fn url(&mut self, url: &str) -> &mut Self {
        self.url = Some(url.to_string());
        self
    }

    pub fn viewport(&mut self, viewport: Viewport) -> &mut Self {
        self.viewport = Some(viewport);
        self
    }

    /// Resolve computed styles and freeze the tree
    pub fn build(mut self) -> SnapshotTree {
        // Parents always precede their children in the arena.
        for idx in 0..self.nodes.len() {
            let parent_style = match self.nodes[idx].parent {
                Some(p) => self.nodes[p.0].style.clone(),
                None => ComputedStyle::default(),
            };
            let computed = self.nodes[idx].declared.compute(&parent_style);
            self.nodes[idx].style = computed;
        }
        SnapshotTree {
            url: self.url,
            viewport: self.viewport,
            nodes: self.nodes,
        }
    }
}

/// Nested JSON capture of a document
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentCapture {
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub viewport: Option<Viewport>,
    pub root: ElementCapture,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ElementCapture {
    pub tag: String,
    #[serde(default)]
    pub attributes: BTreeMap<String, String>,
    #[serde(default)]
    pub style: StyleDeclaration,
    #[serde(default)]
    pub rect: Rect,
    #[serde(default)]
    pub children: Vec<NodeCapture>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum NodeCapture {
    Text { text: String },
    Comment { comment: String },
    Element(ElementCapture),
}

impl DocumentCapture {
    pub fn into_tree(self) -> SnapshotTree {
        let mut builder = TreeBuilder::new(&self.root.tag);
        if let Some(url) = &self.url {
            builder.url(url);
        }
        if let Some(viewport) = self.viewport {
            builder.viewport(viewport);
        }
        let root = builder.root();
        fill_element(&mut builder, root, self.root);
        builder.build()
    }
}

fn fill_element(builder: &mut TreeBuilder, node: NodeId, element: ElementCapture) {
    for (name, value) in &element.attributes {
        builder.attr(node, name, value);
    }
    builder.style(node, element.style).rect(node, element.rect);
    for child in element.children {
        match child {
            NodeCapture::Text { text } => {
                builder.text(node, &text);
            }
            NodeCapture::Comment { comment } => {
                builder.comment(node, &comment);
            }
            NodeCapture::Element(element) => {
                let id = builder.element(node, &element.tag);
                fill_element(builder, id, element);
            }
        }
    }
}
