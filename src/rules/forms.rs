// SPDX-License-Identifier: PMPL-1.0-or-later
//! Form labels - WCAG 1.3.1 Info and Relationships, 4.1.2 Name, Role, Value (Level A)
//!
//! Every user-editable `<input>`, `<select>` and `<textarea>` needs an
//! accessible label: a `<label for>` pointing at it, a wrapping `<label>`,
//! `aria-label`, `aria-labelledby` or `title`.

use super::{understanding_url, CheckResult, Outcome, Rule, RuleContext, RuleMeta};
use crate::issue::{Category, ImpactAssessment, Severity, WcagLevel};
use crate::tree::{DocumentTree, NodeId};

/// Input types exempt from labelling
const UNLABELLED_INPUT_TYPES: &[&str] = &["hidden", "submit", "button"];

pub fn form_label() -> Rule {
    Rule::new(
        RuleMeta::new("form-label", "Form elements must have labels", Severity::Critical)
            .with_description("Ensures every form control has an accessible label")
            .with_category(Category::Understandable)
            .with_wcag("1.3.1", WcagLevel::A)
            .with_wcag("4.1.2", WcagLevel::A)
            .with_help_url(&understanding_url("labels-or-instructions"))
            .with_impact(ImpactAssessment::blind().and(ImpactAssessment::cognitive())),
        check_form_label,
    )
}

fn check_form_label(node: NodeId, ctx: &RuleContext<'_>) -> CheckResult {
    let tag = ctx.tag(node);
    match tag {
        "input" => {
            let input_type = ctx.attr(node, "type").unwrap_or("text").trim().to_ascii_lowercase();
            if UNLABELLED_INPUT_TYPES.contains(&input_type.as_str()) {
                return Ok(None);
            }
        }
        "select" | "textarea" => {}
        _ => return Ok(None),
    }

    if has_label(ctx, node) {
        return Ok(Some(Outcome::pass()));
    }

    Ok(Some(Outcome::fail(
        format!("<{}> has no associated label", tag),
        "Add a <label for=\"...\">, wrap the control in a <label>, or provide aria-label / aria-labelledby",
    )))
}

fn has_label(ctx: &RuleContext<'_>, node: NodeId) -> bool {
    if ["aria-label", "aria-labelledby", "title"]
        .iter()
        .any(|a| ctx.non_empty_attr(node, a).is_some())
    {
        return true;
    }
    if let Some(id) = ctx.non_empty_attr(node, "id") {
        if label_for_exists(ctx.tree, id) {
            return true;
        }
    }
    let mut ancestor = ctx.tree.parent(node);
    while let Some(a) = ancestor {
        if ctx.tag(a) == "label" {
            return true;
        }
        ancestor = ctx.tree.parent(a);
    }
    false
}

fn label_for_exists(tree: &dyn DocumentTree, id: &str) -> bool {
    let mut stack = vec![tree.root()];
    while let Some(n) = stack.pop() {
        if !tree.is_element(n) {
            continue;
        }
        if tree.tag_name(n) == "label" && tree.attribute(n, "for") == Some(id) {
            return true;
        }
        stack.extend(tree.element_children(n));
    }
    false
}
