// SPDX-License-Identifier: PMPL-1.0-or-later
//! Image alt text - WCAG 1.1.1 Non-text Content (Level A)
//!
//! - Every `<img>` must have an `alt` attribute (not missing)
//! - `alt=""` marks a decorative image only together with
//!   `role="presentation"` (or its synonym `role="none"`)

use super::{understanding_url, CheckResult, Outcome, Rule, RuleContext, RuleMeta};
use crate::issue::{Category, ImpactAssessment, Severity, WcagLevel};
use crate::tree::NodeId;

const DECORATIVE_ROLES: &[&str] = &["presentation", "none"];

pub fn image_alt_text() -> Rule {
    Rule::new(
        RuleMeta::new("image-alt-text", "Images must have alternative text", Severity::Critical)
            .with_description("Ensures <img> elements have alternative text or are marked decorative")
            .with_category(Category::Perceivable)
            .with_wcag("1.1.1", WcagLevel::A)
            .with_help_url(&understanding_url("non-text-content"))
            .with_impact(ImpactAssessment::blind()),
        check_image_alt,
    )
}

fn check_image_alt(node: NodeId, ctx: &RuleContext<'_>) -> CheckResult {
    if ctx.tag(node) != "img" {
        return Ok(None);
    }

    let outcome = match ctx.attr(node, "alt") {
        None => Outcome::fail(
            "Image is missing an alt attribute",
            "Add alt=\"description\" for informative images, or alt=\"\" with role=\"presentation\" for decorative ones",
        ),
        Some(alt) if alt.trim().is_empty() => {
            let decorative = ctx
                .role(node)
                .map_or(false, |r| DECORATIVE_ROLES.contains(&r.as_str()));
            if decorative {
                Outcome::pass()
            } else {
                Outcome::fail(
                    "Image has empty alt text but is not marked as decorative",
                    "If the image is decorative add role=\"presentation\"; otherwise describe it in the alt attribute",
                )
                .with_impact(Severity::Moderate)
            }
        }
        Some(_) => Outcome::pass(),
    };

    Ok(Some(outcome))
}
