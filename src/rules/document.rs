// SPDX-License-Identifier: PMPL-1.0-or-later
//! Document-level checks, bound to the tree root:
//! - WCAG 2.4.2 Page Titled (Level A)
//! - WCAG 3.1.1 Language of Page (Level A)

use super::{understanding_url, CheckResult, Outcome, Rule, RuleContext, RuleMeta};
use crate::issue::{Category, ImpactAssessment, Severity, WcagLevel};
use crate::tree::NodeId;
use once_cell::sync::Lazy;
use regex::Regex;

/// BCP 47 primary tag with optional subtags
static LANG_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-zA-Z]{2,3}(-[a-zA-Z0-9]{1,8})*$").expect("valid regex"));

pub fn page_title() -> Rule {
    Rule::new(
        RuleMeta::new("page-title", "Documents must have a title", Severity::Serious)
            .with_description("Ensures the document has a non-empty <title> element")
            .with_category(Category::Operable)
            .with_wcag("2.4.2", WcagLevel::A)
            .with_help_url(&understanding_url("page-titled"))
            .with_impact(ImpactAssessment::blind().and(ImpactAssessment::cognitive()))
            .document_scoped(),
        check_page_title,
    )
}

pub fn html_lang() -> Rule {
    Rule::new(
        RuleMeta::new("html-lang", "The <html> element must have a lang attribute", Severity::Serious)
            .with_description("Ensures the document root declares a valid language")
            .with_category(Category::Understandable)
            .with_wcag("3.1.1", WcagLevel::A)
            .with_help_url(&understanding_url("language-of-page"))
            .with_impact(ImpactAssessment::blind())
            .document_scoped(),
        check_html_lang,
    )
}

fn find_title(ctx: &RuleContext<'_>, root: NodeId) -> Option<NodeId> {
    let mut stack = vec![root];
    while let Some(n) = stack.pop() {
        let tag = ctx.tag(n);
        if tag == "title" {
            return Some(n);
        }
        // <title> inside inline SVG names the graphic, not the page
        if tag == "svg" {
            continue;
        }
        let mut children = ctx.tree.element_children(n);
        children.reverse();
        stack.extend(children);
    }
    None
}

fn check_page_title(node: NodeId, ctx: &RuleContext<'_>) -> CheckResult {
    let outcome = match find_title(ctx, node) {
        None => Outcome::fail(
            "Document does not have a <title> element",
            "Add a <title> to the <head> that describes the page's topic or purpose",
        ),
        Some(title) if ctx.text(title).is_empty() => Outcome::fail(
            "Document <title> element is empty",
            "Give the <title> element text describing the page",
        ),
        Some(_) => Outcome::pass(),
    };
    Ok(Some(outcome))
}

fn check_html_lang(node: NodeId, ctx: &RuleContext<'_>) -> CheckResult {
    if ctx.tag(node) != "html" {
        return Ok(None);
    }
    let outcome = match ctx.non_empty_attr(node, "lang") {
        None => Outcome::fail(
            "<html> element does not have a lang attribute",
            "Add a lang attribute, e.g. <html lang=\"en\">",
        ),
        Some(lang) if !LANG_RE.is_match(lang) => Outcome::fail(
            format!("<html> lang attribute \"{}\" is not a valid language tag", lang),
            "Use a valid BCP 47 language tag such as \"en\" or \"pt-BR\"",
        ),
        Some(_) => Outcome::pass(),
    };
    Ok(Some(outcome))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::{SnapshotTree, TreeBuilder};

    fn document(lang: Option<&str>, title: Option<&str>) -> SnapshotTree {
        let mut b = TreeBuilder::new("html");
        if let Some(l) = lang {
            b.attr(b.root(), "lang", l);
        }
        let head = b.element(b.root(), "head");
        if let Some(t) = title {
            let title = b.element(head, "title");
            b.text(title, t);
        }
        b.element(b.root(), "body");
        b.build()
    }

    fn run(tree: &SnapshotTree, check: fn(NodeId, &RuleContext<'_>) -> CheckResult) -> Outcome {
        use crate::tree::DocumentTree;
        check(tree.root(), &RuleContext::new(tree)).unwrap().unwrap()
    }

    #[test]
    fn test_title_present() {
        assert!(run(&document(Some("en"), Some("Home")), check_page_title).passed);
    }

    #[test]
    fn test_title_missing_or_empty() {
        let missing = run(&document(Some("en"), None), check_page_title);
        assert!(!missing.passed);
        assert!(missing.message.contains("does not have"));
        let empty = run(&document(Some("en"), Some("  ")), check_page_title);
        assert!(!empty.passed);
        assert!(empty.message.contains("empty"));
    }

    #[test]
    fn test_lang() {
        assert!(run(&document(Some("en"), None), check_html_lang).passed);
        assert!(run(&document(Some("pt-BR"), None), check_html_lang).passed);
        assert!(!run(&document(None, None), check_html_lang).passed);
        assert!(!run(&document(Some(" "), None), check_html_lang).passed);
        assert!(!run(&document(Some("english language"), None), check_html_lang).passed);
    }

    #[test]
    fn test_rules_are_document_scoped() {
        assert_eq!(page_title().meta.scope, super::super::RuleScope::Document);
        assert_eq!(html_lang().meta.scope, super::super::RuleScope::Document);
    }
}
