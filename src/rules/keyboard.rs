// SPDX-License-Identifier: PMPL-1.0-or-later
//! Keyboard access - WCAG 2.1.1 Keyboard, 2.4.3 Focus Order (Level A)
//!
//! - Elements exposed with an interactive ARIA role must be focusable
//! - Positive tabindex values disrupt the natural tab order

use super::{understanding_url, CheckResult, Outcome, Rule, RuleContext, RuleMeta};
use crate::issue::{Category, ImpactAssessment, Severity, WcagLevel};
use crate::tree::NodeId;

/// Roles that promise keyboard interaction
pub const INTERACTIVE_ROLES: &[&str] = &[
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

/// Native interactive elements
pub const NATIVE_INTERACTIVE: &[&str] = &["a", "button", "input", "select", "textarea", "summary", "iframe"];

/// Tags that are focusable without a tabindex
const NATIVE_FOCUSABLE: &[&str] = &["button", "input", "select", "textarea", "summary", "iframe"];

/// Parsed `tabindex`, `None` when absent or not an integer
pub fn tab_index(ctx: &RuleContext<'_>, node: NodeId) -> Option<i32> {
    ctx.attr(node, "tabindex")?.trim().parse().ok()
}

/// Native interactive tag, or an explicit non-negative tabindex
pub fn is_keyboard_operable(ctx: &RuleContext<'_>, node: NodeId) -> bool {
    NATIVE_INTERACTIVE.contains(&ctx.tag(node)) || tab_index(ctx, node).map_or(false, |i| i >= 0)
}

/// Whether the browser would currently put `node` in the tab order.
///
/// Stricter than [`is_keyboard_operable`]: a negative tabindex, `disabled`
/// and an `<a>` without `href` all take the element out.
pub fn is_focusable(ctx: &RuleContext<'_>, node: NodeId) -> bool {
    if let Some(index) = tab_index(ctx, node) {
        return index >= 0;
    }
    let tag = ctx.tag(node);
    if ctx.attr(node, "disabled").is_some() && tag != "a" {
        return false;
    }
    match tag {
        "a" | "area" => ctx.attr(node, "href").is_some(),
        "input" => !ctx
            .attr(node, "type")
            .map_or(false, |t| t.eq_ignore_ascii_case("hidden")),
        t => NATIVE_FOCUSABLE.contains(&t) || ctx.attr(node, "contenteditable").map_or(false, |v| v != "false"),
    }
}

pub fn keyboard_access() -> Rule {
    Rule::new(
        RuleMeta::new("keyboard-access", "Interactive elements must be keyboard accessible", Severity::Critical)
            .with_description("Ensures elements with interactive ARIA roles can receive keyboard focus")
            .with_category(Category::Operable)
            .with_wcag("2.1.1", WcagLevel::A)
            .with_help_url(&understanding_url("keyboard"))
            .with_impact(ImpactAssessment::motor().and(ImpactAssessment::blind())),
        check_keyboard_access,
    )
}

pub fn positive_tabindex() -> Rule {
    Rule::new(
        RuleMeta::new("positive-tabindex", "Avoid positive tabindex values", Severity::Moderate)
            .with_description("Ensures tabindex values do not override the natural focus order")
            .with_category(Category::Operable)
            .with_wcag("2.4.3", WcagLevel::A)
            .with_help_url(&understanding_url("focus-order"))
            .with_impact(ImpactAssessment::motor()),
        check_positive_tabindex,
    )
}

fn check_keyboard_access(node: NodeId, ctx: &RuleContext<'_>) -> CheckResult {
    let Some(role) = ctx.role(node) else {
        return Ok(None);
    };
    if !INTERACTIVE_ROLES.contains(&role.as_str()) {
        return Ok(None);
    }

    if is_keyboard_operable(ctx, node) {
        return Ok(Some(Outcome::pass()));
    }

    Ok(Some(Outcome::fail(
        format!(
            "<{}> has role=\"{}\" but cannot receive keyboard focus",
            ctx.tag(node),
            role
        ),
        "Use a native interactive element, or add tabindex=\"0\" and keyboard event handlers",
    )))
}

fn check_positive_tabindex(node: NodeId, ctx: &RuleContext<'_>) -> CheckResult {
    match tab_index(ctx, node) {
        Some(index) if index > 0 => Ok(Some(Outcome::fail(
            format!("<{}> has tabindex=\"{}\"", ctx.tag(node), index),
            "Remove the tabindex attribute or use tabindex=\"0\" to follow document order",
        ))),
        Some(_) => Ok(Some(Outcome::pass())),
        None => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::TreeBuilder;

    fn with_element(tag: &str, attrs: &[(&str, &str)], check: fn(NodeId, &RuleContext<'_>) -> CheckResult) -> Option<Outcome> {
        let mut b = TreeBuilder::new("html");
        let el = b.element(b.root(), tag);
        for (k, v) in attrs {
            b.attr(el, k, v);
        }
        let tree = b.build();
        check(el, &RuleContext::new(&tree)).unwrap()
    }

    #[test]
    fn test_div_button_without_tabindex_fails() {
        let outcome = with_element("div", &[("role", "button")], check_keyboard_access).unwrap();
        assert!(!outcome.passed);
        assert!(outcome.message.contains("role=\"button\""));
    }

    #[test]
    fn test_tabindex_zero_or_native_passes() {
        assert!(with_element("div", &[("role", "button"), ("tabindex", "0")], check_keyboard_access).unwrap().passed);
        assert!(with_element("button", &[("role", "tab")], check_keyboard_access).unwrap().passed);
        assert!(with_element("a", &[("role", "menuitem"), ("href", "#")], check_keyboard_access).unwrap().passed);
    }

    #[test]
    fn test_negative_tabindex_not_focusable() {
        let outcome = with_element("span", &[("role", "checkbox"), ("tabindex", "-1")], check_keyboard_access).unwrap();
        assert!(!outcome.passed);
    }

    #[test]
    fn test_native_tag_passes_regardless_of_state() {
        let native = [
            ("button", vec![("role", "button"), ("tabindex", "-1")]),
            ("a", vec![("role", "link")]),
            ("button", vec![("role", "button"), ("disabled", "")]),
        ];
        for (tag, attrs) in native {
            let outcome = with_element(tag, &attrs, check_keyboard_access).unwrap();
            assert!(outcome.passed, "<{}> {:?} should pass", tag, attrs);
        }
    }

    #[test]
    fn test_tab_order_stricter_than_operable() {
        let mut b = TreeBuilder::new("html");
        let a = b.element(b.root(), "a");
        let button = b.element(b.root(), "button");
        b.attr(button, "disabled", "");
        let link = b.element(b.root(), "a");
        b.attr(link, "href", "/docs");
        let tree = b.build();
        let ctx = RuleContext::new(&tree);

        assert!(is_keyboard_operable(&ctx, a));
        assert!(!is_focusable(&ctx, a));
        assert!(is_keyboard_operable(&ctx, button));
        assert!(!is_focusable(&ctx, button));
        assert!(is_focusable(&ctx, link));
    }

    #[test]
    fn test_non_interactive_role_not_applicable() {
        assert!(with_element("div", &[("role", "banner")], check_keyboard_access).is_none());
        assert!(with_element("div", &[], check_keyboard_access).is_none());
    }

    #[test]
    fn test_positive_tabindex() {
        assert!(!with_element("div", &[("tabindex", "3")], check_positive_tabindex).unwrap().passed);
        assert!(with_element("div", &[("tabindex", "0")], check_positive_tabindex).unwrap().passed);
        assert!(with_element("div", &[], check_positive_tabindex).is_none());
    }
}
