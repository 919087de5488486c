// SPDX-License-Identifier: PMPL-1.0-or-later
//! ARIA validator - WCAG 4.1.2 Name, Role, Value (Level A)
//!
//! - Widgets exposed through `role` need an accessible name
//! - `aria-hidden="true"` must not be set on focusable elements

use super::keyboard::is_focusable;
use super::{understanding_url, CheckResult, Outcome, Rule, RuleContext, RuleMeta};
use crate::issue::{Category, ImpactAssessment, Severity, WcagLevel};
use crate::tree::NodeId;

/// Roles whose elements must have an accessible name
pub const NAME_REQUIRED_ROLES: &[&str] = &[
    "button",
    "link",
    "checkbox",
    "radio",
    "tab",
    "menuitem",
    "treeitem",
    "slider",
    "spinbutton",
];

pub fn aria_name() -> Rule {
    Rule::new(
        RuleMeta::new("aria-name", "ARIA widgets must have an accessible name", Severity::Serious)
            .with_description("Ensures elements with interactive ARIA roles expose a name to assistive technology")
            .with_category(Category::Robust)
            .with_wcag("4.1.2", WcagLevel::A)
            .with_help_url(&understanding_url("name-role-value"))
            .with_impact(ImpactAssessment::blind()),
        check_aria_name,
    )
}

pub fn aria_hidden_focus() -> Rule {
    Rule::new(
        RuleMeta::new("aria-hidden-focus", "Hidden elements must not be focusable", Severity::Serious)
            .with_description("Ensures aria-hidden=\"true\" is not set on keyboard-focusable elements")
            .with_category(Category::Robust)
            .with_wcag("4.1.2", WcagLevel::A)
            .with_help_url(&understanding_url("name-role-value"))
            .with_impact(ImpactAssessment::blind().and(ImpactAssessment::motor())),
        check_aria_hidden_focus,
    )
}

/// Accessible name from `aria-label`, `aria-labelledby` or text content
pub fn accessible_name(ctx: &RuleContext<'_>, node: NodeId) -> Option<String> {
    if let Some(label) = ctx.non_empty_attr(node, "aria-label") {
        return Some(label.to_string());
    }
    let referenced = ctx.referenced_text(node, "aria-labelledby");
    if !referenced.is_empty() {
        return Some(referenced);
    }
    let text = ctx.text(node);
    (!text.is_empty()).then_some(text)
}

fn check_aria_name(node: NodeId, ctx: &RuleContext<'_>) -> CheckResult {
    let Some(role) = ctx.role(node) else {
        return Ok(None);
    };
    if !NAME_REQUIRED_ROLES.contains(&role.as_str()) {
        return Ok(None);
    }

    if accessible_name(ctx, node).is_some() {
        return Ok(Some(Outcome::pass()));
    }

    Ok(Some(Outcome::fail(
        format!("Element with role=\"{}\" has no accessible name", role),
        "Provide a name with aria-label, aria-labelledby referencing visible text, or text content",
    )))
}

fn check_aria_hidden_focus(node: NodeId, ctx: &RuleContext<'_>) -> CheckResult {
    let hidden = ctx
        .attr(node, "aria-hidden")
        .map_or(false, |v| v.trim().eq_ignore_ascii_case("true"));
    if !hidden {
        return Ok(None);
    }

    if is_focusable(ctx, node) {
        return Ok(Some(Outcome::fail(
            format!(
                "aria-hidden=\"true\" is set on a focusable <{}> element",
                ctx.tag(node)
            ),
            "Remove aria-hidden=\"true\" or add tabindex=\"-1\" to take the element out of the tab order",
        )));
    }

    Ok(Some(Outcome::pass()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::{SnapshotTree, TreeBuilder};

    fn widget(role: &str, text: Option<&str>, attrs: &[(&str, &str)]) -> (SnapshotTree, NodeId) {
        let mut b = TreeBuilder::new("html");
        let body = b.element(b.root(), "body");
        let label = b.element(body, "span");
        b.attr(label, "id", "lbl");
        b.text(label, "Volume");
        let el = b.element(body, "div");
        b.attr(el, "role", role);
        if let Some(t) = text {
            b.text(el, t);
        }
        for (k, v) in attrs {
            b.attr(el, k, v);
        }
        (b.build(), el)
    }

    fn name_outcome(role: &str, text: Option<&str>, attrs: &[(&str, &str)]) -> Option<Outcome> {
        let (tree, el) = widget(role, text, attrs);
        check_aria_name(el, &RuleContext::new(&tree)).unwrap()
    }

    #[test]
    fn test_unnamed_widget_fails() {
        let outcome = name_outcome("slider", None, &[]).unwrap();
        assert!(!outcome.passed);
        assert!(outcome.message.contains("slider"));
    }

    #[test]
    fn test_name_sources() {
        assert!(name_outcome("button", Some("Save"), &[]).unwrap().passed);
        assert!(name_outcome("checkbox", None, &[("aria-label", "Agree")]).unwrap().passed);
        assert!(name_outcome("slider", None, &[("aria-labelledby", "lbl")]).unwrap().passed);
    }

    #[test]
    fn test_dangling_labelledby_fails() {
        let outcome = name_outcome("tab", None, &[("aria-labelledby", "missing")]).unwrap();
        assert!(!outcome.passed);
    }

    #[test]
    fn test_roles_outside_set_not_applicable() {
        assert!(name_outcome("region", None, &[]).is_none());
        assert!(name_outcome("presentation", None, &[]).is_none());
    }

    #[test]
    fn test_aria_hidden_focusable() {
        let mut b = TreeBuilder::new("html");
        let body = b.element(b.root(), "body");
        let button = b.element(body, "button");
        b.attr(button, "aria-hidden", "true");
        let removed = b.element(body, "button");
        b.attr(removed, "aria-hidden", "true").attr(removed, "tabindex", "-1");
        let span = b.element(body, "span");
        b.attr(span, "aria-hidden", "true");
        let tree = b.build();
        let ctx = RuleContext::new(&tree);

        assert!(!check_aria_hidden_focus(button, &ctx).unwrap().unwrap().passed);
        assert!(check_aria_hidden_focus(removed, &ctx).unwrap().unwrap().passed);
        assert!(check_aria_hidden_focus(span, &ctx).unwrap().unwrap().passed);
        assert!(check_aria_hidden_focus(body, &ctx).unwrap().is_none());
    }
}
