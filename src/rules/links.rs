// SPDX-License-Identifier: PMPL-1.0-or-later
//! Link text - WCAG 2.4.4 Link Purpose (In Context) (Level A)

use super::{understanding_url, CheckResult, Outcome, Rule, RuleContext, RuleMeta};
use crate::issue::{Category, ImpactAssessment, Severity, WcagLevel};
use crate::tree::NodeId;

/// Link texts that say nothing about the destination
pub const NON_DESCRIPTIVE_TEXT: &[&str] = &["click here", "read more", "more", "here", "link"];

pub fn link_text() -> Rule {
    Rule::new(
        RuleMeta::new("link-text", "Links must have discernible text", Severity::Critical)
            .with_description("Ensures links have text that describes their purpose")
            .with_category(Category::Operable)
            .with_wcag("2.4.4", WcagLevel::A)
            .with_help_url(&understanding_url("link-purpose-in-context"))
            .with_impact(ImpactAssessment::blind().and(ImpactAssessment::cognitive())),
        check_link_text,
    )
}

fn check_link_text(node: NodeId, ctx: &RuleContext<'_>) -> CheckResult {
    if ctx.tag(node) != "a" {
        return Ok(None);
    }

    let text = ctx.text(node);
    if text.is_empty() {
        if ctx.non_empty_attr(node, "aria-label").is_some() {
            return Ok(Some(Outcome::pass()));
        }
        return Ok(Some(Outcome::fail(
            "Link has no text",
            "Add link text or an aria-label describing the link destination",
        )));
    }

    let normalized = text.to_lowercase();
    if NON_DESCRIPTIVE_TEXT.contains(&normalized.as_str()) {
        return Ok(Some(
            Outcome::fail(
                format!("Link text \"{}\" is not descriptive", text),
                "Use link text that describes the destination, e.g. \"Read the 2024 annual report\"",
            )
            .with_impact(Severity::Serious),
        ));
    }

    Ok(Some(Outcome::pass()))
}
