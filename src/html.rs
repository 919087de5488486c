// SPDX-License-Identifier: PMPL-1.0-or-later
//! HTML loader.
//!
//! Parses markup with `scraper` into a [`SnapshotTree`]. Without a layout
//! engine there is no cascade: inline `style` attributes supply the declared
//! color, background and font values, and inheritance is resolved by
//! [`TreeBuilder::build`]. Bounding rectangles are empty.

use crate::error::Result;
use crate::tree::snapshot::StyleDeclaration;
use crate::tree::{NodeId, SnapshotTree, TreeBuilder};
use once_cell::sync::Lazy;
use regex::Regex;
use scraper::{ElementRef, Html, Node};
use std::path::Path;
use tracing::debug;

/// One `property: value` pair of an inline style
static DECLARATION_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)([a-z-]+)\s*:\s*([^;]+)").expect("valid regex"));

/// Parse an HTML document
pub fn parse_html(content: &str) -> SnapshotTree {
    let document = Html::parse_document(content);
    let root = document.root_element();

    let mut builder = TreeBuilder::new(root.value().name());
    let root_id = builder.root();
    copy_element(&mut builder, root_id, root);

    let mut stack = vec![(root, root_id)];
    while let Some((element, id)) = stack.pop() {
        let mut child_elements = Vec::new();

        for child in element.children() {
            match child.value() {
                Node::Element(el) => {
                    let child_id = builder.element(id, el.name());
                    if let Some(child_ref) = ElementRef::wrap(child) {
                        copy_element(&mut builder, child_id, child_ref);
                        child_elements.push((child_ref, child_id));
                    }
                }
                Node::Text(text) => {
                    builder.text(id, text);
                }
                Node::Comment(comment) => {
                    builder.comment(id, comment);
                }
                _ => {}
            }
        }

        child_elements.reverse();
        stack.extend(child_elements);
    }

    let tree = builder.build();
    debug!("Parsed HTML into {} nodes", tree.len());
    tree
}

/// Read and parse an HTML file
pub fn load_html(path: &Path) -> Result<SnapshotTree> {
    let content = std::fs::read_to_string(path)?;
    Ok(parse_html(&content))
}

fn copy_element(builder: &mut TreeBuilder, id: NodeId, element: ElementRef<'_>) {
    for (name, value) in element.value().attrs() {
        builder.attr(id, name, value);
    }
    if let Some(style) = element.value().attr("style") {
        builder.style(id, parse_inline_style(style));
    }
}

/// Extract the properties the contrast calculator uses from an inline style
pub fn parse_inline_style(style: &str) -> StyleDeclaration {
    let mut declaration = StyleDeclaration::default();

    for caps in DECLARATION_RE.captures_iter(style) {
        let property = caps[1].to_ascii_lowercase();
        let value = caps[2].trim().trim_end_matches("!important").trim().to_string();

        match property.as_str() {
            "color" => declaration.color = Some(value),
            "background-color" => declaration.background_color = Some(value),
            // Shorthand: only a leading color token is meaningful here
            "background" => {
                if let Some(first) = value.split_whitespace().next() {
                    if crate::contrast::parse_color(first).is_some() {
                        declaration.background_color = Some(first.to_string());
                    }
                }
            }
            "font-size" => declaration.font_size = Some(value),
            "font-weight" => declaration.font_weight = Some(value),
            _ => {}
        }
    }

    declaration
}
