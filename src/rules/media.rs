// SPDX-License-Identifier: PMPL-1.0-or-later
//! Media captions - WCAG 1.2.2 Captions (Prerecorded) (Level A)

use super::{understanding_url, CheckResult, Outcome, Rule, RuleContext, RuleMeta};
use crate::issue::{Category, ImpactAssessment, Severity, WcagLevel};
use crate::tree::NodeId;

const CAPTION_KINDS: &[&str] = &["captions", "subtitles"];

pub fn video_captions() -> Rule {
    Rule::new(
        RuleMeta::new("video-captions", "Videos must have captions", Severity::Critical)
            .with_description("Ensures <video> elements provide a captions or subtitles track")
            .with_category(Category::Perceivable)
            .with_wcag("1.2.2", WcagLevel::A)
            .with_help_url(&understanding_url("captions-prerecorded"))
            .with_impact(ImpactAssessment::deaf()),
        check_video_captions,
    )
}

fn check_video_captions(node: NodeId, ctx: &RuleContext<'_>) -> CheckResult {
    if ctx.tag(node) != "video" {
        return Ok(None);
    }

    let has_captions = ctx.tree.element_children(node).into_iter().any(|c| {
        ctx.tag(c) == "track"
            && ctx
                .attr(c, "kind")
                .map_or(false, |k| CAPTION_KINDS.contains(&k.trim().to_ascii_lowercase().as_str()))
    });

    if has_captions {
        return Ok(Some(Outcome::pass()));
    }

    Ok(Some(Outcome::fail(
        "<video> has no captions track",
        "Add <track kind=\"captions\" src=\"...\" srclang=\"en\"> inside the <video> element",
    )))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::TreeBuilder;

    fn video(track_kind: Option<&str>) -> Outcome {
        let mut b = TreeBuilder::new("html");
        let video = b.element(b.root(), "video");
        b.attr(video, "src", "intro.mp4");
        if let Some(kind) = track_kind {
            let track = b.element(video, "track");
            b.attr(track, "kind", kind);
        }
        let tree = b.build();
        check_video_captions(video, &RuleContext::new(&tree)).unwrap().unwrap()
    }

    #[test]
    fn test_video_without_track_fails() {
        assert!(!video(None).passed);
        assert!(!video(Some("chapters")).passed);
    }

    #[test]
    fn test_captions_or_subtitles_pass() {
        assert!(video(Some("captions")).passed);
        assert!(video(Some("Subtitles")).passed);
    }
}
