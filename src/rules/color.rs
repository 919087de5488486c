// SPDX-License-Identifier: PMPL-1.0-or-later
//! Color contrast - WCAG 1.4.3 Contrast (Minimum) (Level AA)
//!
//! Offered every element that directly contains visible text. The ratio
//! comes from [`crate::contrast`].

use super::{understanding_url, CheckResult, Outcome, Rule, RuleContext, RuleMeta};
use crate::config::IndeterminatePolicy;
use crate::contrast;
use crate::issue::{Category, ImpactAssessment, Severity, WcagLevel};
use crate::tree::NodeId;
use tracing::debug;

/// Elements whose text is never rendered
const NON_RENDERED: &[&str] = &["script", "style", "noscript", "template", "title", "head"];

pub fn color_contrast() -> Rule {
    Rule::new(
        RuleMeta::new("color-contrast", "Text must have sufficient color contrast", Severity::Serious)
            .with_description("Ensures text meets the WCAG AA minimum contrast ratio against its background")
            .with_category(Category::Perceivable)
            .with_wcag("1.4.3", WcagLevel::AA)
            .with_help_url(&understanding_url("contrast-minimum"))
            .with_impact(ImpactAssessment::low_vision()),
        check_color_contrast,
    )
}

fn check_color_contrast(node: NodeId, ctx: &RuleContext<'_>) -> CheckResult {
    if NON_RENDERED.contains(&ctx.tag(node)) || ctx.tree.own_text(node).trim().is_empty() {
        return Ok(None);
    }

    let result = contrast::evaluate(ctx.tree, node);

    if !result.is_determinate() {
        debug!(node = node.0, "contrast colors could not be resolved");
        return Ok(Some(match ctx.indeterminate_contrast {
            IndeterminatePolicy::Pass => Outcome::pass(),
            IndeterminatePolicy::Flag => Outcome::fail(
                "Unable to verify color contrast: text or background color could not be resolved",
                "Check the contrast manually or use plain color values",
            )
            .with_impact(Severity::Minor),
        }));
    }

    if result.passes() {
        return Ok(Some(Outcome::pass()));
    }

    let kind = if result.large_text { "large" } else { "normal" };
    Ok(Some(Outcome::fail(
        format!(
            "Color contrast ratio {:.2}:1 is below the {}:1 minimum for {} text",
            result.ratio, result.required, kind
        ),
        format!(
            "Increase contrast between text and background to at least {}:1",
            result.required
        ),
    )))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::TreeBuilder;

    fn text_node(color: &str, background: &str, size: &str, weight: &str) -> Option<Outcome> {
        text_node_with(color, background, size, weight, IndeterminatePolicy::Pass)
    }

    fn text_node_with(
        color: &str,
        background: &str,
        size: &str,
        weight: &str,
        policy: IndeterminatePolicy,
    ) -> Option<Outcome> {
        let mut b = TreeBuilder::new("html");
        let body = b.element(b.root(), "body");
        b.background(body, background);
        let p = b.element(body, "p");
        b.color(p, color).font(p, size, weight);
        b.text(p, "Some text");
        let tree = b.build();
        let ctx = RuleContext::new(&tree).with_indeterminate_contrast(policy);
        check_color_contrast(p, &ctx).unwrap()
    }

    #[test]
    fn test_black_on_white_passes() {
        assert!(text_node("#000", "#fff", "16px", "400").unwrap().passed);
    }

    #[test]
    fn test_gray_on_white_fails_normal_text() {
        let outcome = text_node("rgb(119, 119, 119)", "#fff", "16px", "400").unwrap();
        assert!(!outcome.passed);
        assert!(outcome.message.contains("4.48:1"), "{}", outcome.message);
    }

    #[test]
    fn test_gray_on_white_passes_large_text() {
        assert!(text_node("rgb(119, 119, 119)", "#fff", "24px", "400").unwrap().passed);
        assert!(text_node("rgb(119, 119, 119)", "#fff", "19px", "bold").unwrap().passed);
    }

    #[test]
    fn test_indeterminate_policy() {
        assert!(text_node("var(--x)", "#fff", "16px", "400").unwrap().passed);
        let flagged =
            text_node_with("var(--x)", "#fff", "16px", "400", IndeterminatePolicy::Flag).unwrap();
        assert!(!flagged.passed);
        assert_eq!(flagged.impact, Some(Severity::Minor));
    }

    #[test]
    fn test_elements_without_own_text_not_applicable() {
        let mut b = TreeBuilder::new("html");
        let div = b.element(b.root(), "div");
        let span = b.element(div, "span");
        b.text(span, "nested");
        let tree = b.build();
        assert!(check_color_contrast(div, &RuleContext::new(&tree)).unwrap().is_none());
        assert!(check_color_contrast(span, &RuleContext::new(&tree)).unwrap().is_some());
    }
}
