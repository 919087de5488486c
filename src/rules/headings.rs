// SPDX-License-Identifier: PMPL-1.0-or-later
//! Heading order - WCAG 1.3.1 Info and Relationships (Level A)
//!
//! Compares a heading with the nearest preceding heading sibling. Going
//! deeper by more than one level (h1 followed by h3) is the violation;
//! returning to a shallower level is fine.

use super::{understanding_url, CheckResult, Outcome, Rule, RuleContext, RuleMeta};
use crate::issue::{Category, ImpactAssessment, Severity, WcagLevel};
use crate::tree::NodeId;

pub fn heading_order() -> Rule {
    Rule::new(
        RuleMeta::new("heading-order", "Heading levels should only increase by one", Severity::Serious)
            .with_description("Ensures headings do not skip levels")
            .with_category(Category::Perceivable)
            .with_wcag("1.3.1", WcagLevel::A)
            .with_help_url(&understanding_url("info-and-relationships"))
            .with_impact(ImpactAssessment::blind().and(ImpactAssessment::cognitive())),
        check_heading_order,
    )
}

/// Level of an `h1`..`h6` tag
pub fn heading_level(tag: &str) -> Option<u8> {
    let level = tag.strip_prefix('h')?.parse::<u8>().ok()?;
    (1..=6).contains(&level).then_some(level)
}

fn check_heading_order(node: NodeId, ctx: &RuleContext<'_>) -> CheckResult {
    let Some(level) = heading_level(ctx.tag(node)) else {
        return Ok(None);
    };
    let Some(parent) = ctx.tree.parent(node) else {
        return Ok(Some(Outcome::pass()));
    };

    let siblings = ctx.tree.element_children(parent);
    let position = siblings.iter().position(|&s| s == node).unwrap_or(0);
    let previous = siblings[..position]
        .iter()
        .rev()
        .find_map(|&s| heading_level(ctx.tag(s)));

    match previous {
        Some(prev) if level > prev + 1 => Ok(Some(Outcome::fail(
            format!("Heading level skipped from <h{}> to <h{}>", prev, level),
            format!("Use <h{}> instead of <h{}>, or add the intermediate heading levels", prev + 1, level),
        ))),
        _ => Ok(Some(Outcome::pass())),
    }
}
