// SPDX-License-Identifier: PMPL-1.0-or-later
//! CSS selectors for re-locating elements.
//!
//! Selectors are parsed with scraper's selector grammar and matched by
//! `selectors` against any [`DocumentTree`] through [`ElementHandle`].
//! Pseudo-classes that need live browser state (`:hover`, `:focus`, ...)
//! and pseudo-elements do not parse.

use super::{DocumentTree, NodeId, NodeKind};
use scraper::selector::{CssLocalName, CssString, NonTSPseudoClass, Parser, PseudoElement, Simple};
use selectors::attr::{AttrSelectorOperation, CaseSensitivity, NamespaceConstraint};
use selectors::matching::{
    self, ElementSelectorFlags, IgnoreNthChildForInvalidation, MatchingContext, MatchingMode,
    NeedsSelectorFlags, QuirksMode,
};
use selectors::parser::{ParseRelative, SelectorImpl};
use selectors::{Element, NthIndexCache, OpaqueElement, SelectorList};
use std::fmt;

const HTML_NAMESPACE: &str = "http://www.w3.org/1999/xhtml";

type NamespaceUrl = <Simple as SelectorImpl>::NamespaceUrl;

/// Parsed selector list
#[derive(Debug, Clone)]
pub struct Selector {
    list: SelectorList<Simple>,
}

impl Selector {
    /// Parse a selector list; `None` when it is not valid CSS
    pub fn parse(input: &str) -> Option<Self> {
        let mut input = cssparser::ParserInput::new(input);
        let mut parser = cssparser::Parser::new(&mut input);
        SelectorList::parse(&Parser, &mut parser, ParseRelative::No)
            .ok()
            .map(|list| Self { list })
    }

    /// First matching element in document order
    pub fn select_first<T: DocumentTree + ?Sized>(&self, tree: &T) -> Option<NodeId> {
        let mut elements = Vec::new();
        crate::walker::walk(tree, |node| elements.push(node));

        let slots = vec![0u8; elements.iter().map(|n| n.0 + 1).max().unwrap_or(0)];
        let mut cache = NthIndexCache::default();
        let mut context = MatchingContext::new(
            MatchingMode::Normal,
            None,
            &mut cache,
            QuirksMode::NoQuirks,
            NeedsSelectorFlags::No,
            IgnoreNthChildForInvalidation::No,
        );

        elements.into_iter().find(|&node| {
            let element = ElementHandle { tree, node, slots: &slots };
            matching::matches_selector_list(&self.list, &element, &mut context)
        })
    }
}

/// An element of a [`DocumentTree`] as seen by the selector matcher.
///
/// `slots` holds one byte per node id for the duration of a match; the
/// address of a node's byte is its opaque identity.
pub struct ElementHandle<'a, T: ?Sized> {
    tree: &'a T,
    node: NodeId,
    slots: &'a [u8],
}

impl<'a, T: ?Sized> Clone for ElementHandle<'a, T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<'a, T: ?Sized> Copy for ElementHandle<'a, T> {}

impl<'a, T: ?Sized> fmt::Debug for ElementHandle<'a, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ElementHandle").field(&self.node).finish()
    }
}

impl<'a, T: DocumentTree + ?Sized> ElementHandle<'a, T> {
    fn at(&self, node: NodeId) -> Self {
        Self { node, ..*self }
    }

    fn tag(&self) -> &'a str {
        self.tree.tag_name(self.node)
    }

    fn siblings(&self) -> Vec<NodeId> {
        match self.tree.parent(self.node) {
            Some(parent) => self.tree.element_children(parent),
            None => Vec::new(),
        }
    }
}

impl<'a, T: DocumentTree + ?Sized> Element for ElementHandle<'a, T> {
    type Impl = Simple;

    fn opaque(&self) -> OpaqueElement {
        match self.slots.get(self.node.0) {
            Some(slot) => OpaqueElement::new(slot),
            None => OpaqueElement::new(&self.node),
        }
    }

    fn parent_element(&self) -> Option<Self> {
        self.tree
            .parent(self.node)
            .filter(|&p| self.tree.is_element(p))
            .map(|p| self.at(p))
    }

    fn parent_node_is_shadow_root(&self) -> bool {
        false
    }

    fn containing_shadow_host(&self) -> Option<Self> {
        None
    }

    fn is_pseudo_element(&self) -> bool {
        false
    }

    fn prev_sibling_element(&self) -> Option<Self> {
        let siblings = self.siblings();
        let index = siblings.iter().position(|&s| s == self.node)?;
        index.checked_sub(1).map(|i| self.at(siblings[i]))
    }

    fn next_sibling_element(&self) -> Option<Self> {
        let siblings = self.siblings();
        let index = siblings.iter().position(|&s| s == self.node)?;
        siblings.get(index + 1).map(|&s| self.at(s))
    }

    fn first_element_child(&self) -> Option<Self> {
        self.tree
            .element_children(self.node)
            .first()
            .map(|&c| self.at(c))
    }

    fn is_html_element_in_html_document(&self) -> bool {
        true
    }

    fn has_local_name(&self, name: &CssLocalName) -> bool {
        self.tag() == &*name.0
    }

    fn has_namespace(&self, namespace: &NamespaceUrl) -> bool {
        &**namespace == HTML_NAMESPACE
    }

    fn is_same_type(&self, other: &Self) -> bool {
        self.tag() == other.tag()
    }

    fn attr_matches(
        &self,
        ns: &NamespaceConstraint<&NamespaceUrl>,
        local_name: &CssLocalName,
        operation: &AttrSelectorOperation<&CssString>,
    ) -> bool {
        let no_namespace = match ns {
            NamespaceConstraint::Any => true,
            NamespaceConstraint::Specific(url) => url.is_empty(),
        };
        no_namespace
            && self
                .tree
                .attribute(self.node, &local_name.0)
                .map_or(false, |value| operation.eval_str(value))
    }

    fn match_non_ts_pseudo_class(
        &self,
        _pseudo_class: &NonTSPseudoClass,
        _context: &mut MatchingContext<Self::Impl>,
    ) -> bool {
        false
    }

    fn match_pseudo_element(
        &self,
        _pseudo_element: &PseudoElement,
        _context: &mut MatchingContext<Self::Impl>,
    ) -> bool {
        false
    }

    fn apply_selector_flags(&self, _flags: ElementSelectorFlags) {}

    fn is_link(&self) -> bool {
        matches!(self.tag(), "a" | "area") && self.tree.attribute(self.node, "href").is_some()
    }

    fn is_html_slot_element(&self) -> bool {
        self.tag() == "slot"
    }

    fn has_id(&self, id: &CssLocalName, case_sensitivity: CaseSensitivity) -> bool {
        self.tree
            .attribute(self.node, "id")
            .map_or(false, |value| case_sensitivity.eq(id.0.as_bytes(), value.as_bytes()))
    }

    fn has_class(&self, name: &CssLocalName, case_sensitivity: CaseSensitivity) -> bool {
        self.tree.attribute(self.node, "class").map_or(false, |classes| {
            classes
                .split_whitespace()
                .any(|c| case_sensitivity.eq(name.0.as_bytes(), c.as_bytes()))
        })
    }

    fn imported_part(&self, _name: &CssLocalName) -> Option<CssLocalName> {
        None
    }

    fn is_part(&self, _name: &CssLocalName) -> bool {
        false
    }

    fn is_empty(&self) -> bool {
        self.tree.children(self.node).into_iter().all(|c| match self.tree.kind(c) {
            NodeKind::Element => false,
            NodeKind::Text => self.tree.text(c).map_or(true, str::is_empty),
            NodeKind::Comment => true,
        })
    }

    fn is_root(&self) -> bool {
        self.tree.parent(self.node).is_none()
    }
}

/// 1-based position of `node` among its parent's element children sharing its tag
pub fn nth_of_type<T: DocumentTree + ?Sized>(tree: &T, node: NodeId) -> usize {
    let tag = tree.tag_name(node);
    match tree.parent(node) {
        Some(parent) => tree
            .element_children(parent)
            .into_iter()
            .filter(|&c| tree.tag_name(c) == tag)
            .position(|c| c == node)
            .map_or(1, |p| p + 1),
        None => 1,
    }
}

fn is_plain_ident(value: &str) -> bool {
    value
        .chars()
        .next()
        .map_or(false, |c| c.is_ascii_alphabetic())
        && value.chars().all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}

/// Build a selector for `node`.
///
/// An `#id` is used when the id is a plain identifier and is the first
/// occurrence in the document; otherwise the selector is a `>` chain of
/// `tag:nth-of-type(n)` steps, anchored at the nearest such id or the root.
pub fn selector_for<T: DocumentTree + ?Sized>(tree: &T, node: NodeId) -> String {
    let mut segments = Vec::new();
    let mut current = Some(node);

    while let Some(n) = current {
        if let Some(id) = tree.attribute(n, "id") {
            if is_plain_ident(id) && tree.find_by_id(id) == Some(n) {
                segments.push(format!("#{}", id));
                break;
            }
        }

        let tag = tree.tag_name(n).to_string();
        let parent = tree.parent(n);
        let segment = match parent {
            Some(p) => {
                let same_tag = tree
                    .element_children(p)
                    .into_iter()
                    .filter(|&c| tree.tag_name(c) == tag)
                    .count();
                if same_tag > 1 {
                    format!("{}:nth-of-type({})", tag, nth_of_type(tree, n))
                } else {
                    tag
                }
            }
            None => tag,
        };
        segments.push(segment);
        current = parent;
    }

    segments.reverse();
    segments.join(" > ")
}
