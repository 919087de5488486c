// SPDX-License-Identifier: PMPL-1.0-or-later
//! Integration tests for a11y-lens

use a11y_lens::config::{load_config, Config, IndeterminatePolicy};
use a11y_lens::contrast;
use a11y_lens::issue::{Severity, WcagLevel};
use a11y_lens::report::{generate_report, OutputFormat, ScanReport};
use a11y_lens::rules::{CheckResult, Outcome, Rule, RuleContext, RuleMeta, RuleRegistry};
use a11y_lens::scanner::{load_document, Scanner};
use a11y_lens::tree::{DocumentTree, NodeId, SnapshotTree, TreeBuilder};
use std::collections::HashSet;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

fn scanner() -> Scanner {
    Scanner::new(Config::default()).expect("built-in registry is valid")
}

fn rule_ids(report: &ScanReport) -> HashSet<&str> {
    report.issues.iter().map(|i| i.rule_id.as_str()).collect()
}

/// html[lang] > head > title, plus a body the caller fills in
fn page(fill: impl FnOnce(&mut TreeBuilder, NodeId)) -> SnapshotTree {
    let mut b = TreeBuilder::new("html");
    b.attr(b.root(), "lang", "en");
    let head = b.element(b.root(), "head");
    let title = b.element(head, "title");
    b.text(title, "Test page");
    let body = b.element(b.root(), "body");
    fill(&mut b, body);
    b.build()
}

// ============================================================================
// Fixture scans
// ============================================================================
mod fixtures {
    use super::*;

    #[test]
    fn test_scan_accessible_fixture() {
        let report = scanner()
            .scan_file(Path::new("tests/fixtures/accessible.html"))
            .expect("scan should succeed");

        assert!(
            report.is_empty(),
            "Accessible fixture should have no issues, got: {:?}",
            report.issues.iter().map(|i| (&i.rule_id, &i.description)).collect::<Vec<_>>()
        );
        assert_eq!(report.summary.compliance_score, 100);
        assert!(report.url.starts_with("file://"));
    }

    #[test]
    fn test_scan_inaccessible_fixture() {
        let report = scanner()
            .scan_file(Path::new("tests/fixtures/inaccessible.html"))
            .expect("scan should succeed");
        let ids = rule_ids(&report);

        for expected in [
            "page-title",
            "html-lang",
            "image-alt-text",
            "heading-order",
            "link-text",
            "form-label",
            "aria-name",
            "keyboard-access",
            "positive-tabindex",
            "color-contrast",
            "video-captions",
            "aria-hidden-focus",
        ] {
            assert!(ids.contains(expected), "expected a {} issue, got {:?}", expected, ids);
        }
        assert!(report.blocks_release());
        assert_eq!(report.metadata.rule_failures, 0);
    }

    #[test]
    fn test_scan_json_snapshot() {
        let report = scanner()
            .scan_file(Path::new("tests/fixtures/page.json"))
            .expect("scan should succeed");

        assert_eq!(report.url, "https://shop.example/");
        assert_eq!(report.summary.total, 3);
        assert_eq!(report.summary.critical, 1);
        assert_eq!(report.summary.serious, 2);
        assert_eq!(report.by_rule("image-alt-text")[0].selector, "#hero");
        assert!(report.metadata.viewport.is_some());
    }

    #[test]
    fn test_scan_fixtures_directory() {
        let reports = scanner()
            .scan_directory(Path::new("tests/fixtures"))
            .expect("scan should succeed");
        assert_eq!(reports.len(), 3);
    }
}

// ============================================================================
// Directory walking
// ============================================================================
mod directories {
    use super::*;

    #[test]
    fn test_skips_excluded_and_hidden_directories() {
        let temp = TempDir::new().expect("Create temp dir");
        let root = temp.path();
        let doc = "<html lang=\"en\"><head><title>t</title></head><body><img src=\"a.png\"></body></html>";

        fs::create_dir_all(root.join("site")).unwrap();
        fs::create_dir_all(root.join("node_modules/pkg")).unwrap();
        fs::create_dir_all(root.join(".cache")).unwrap();
        fs::write(root.join("site/index.html"), doc).unwrap();
        fs::write(root.join("node_modules/pkg/readme.html"), doc).unwrap();
        fs::write(root.join(".cache/page.htm"), doc).unwrap();
        fs::write(root.join("notes.txt"), "not a document").unwrap();

        let reports = scanner().scan_directory(root).unwrap();

        assert_eq!(reports.len(), 1);
        assert!(reports[0].url.ends_with("index.html"));
        assert_eq!(reports[0].summary.total, 1);
    }

    #[test]
    fn test_unparseable_snapshot_is_skipped() {
        let temp = TempDir::new().expect("Create temp dir");
        fs::write(temp.path().join("broken.json"), "{ not json").unwrap();
        fs::write(temp.path().join("ok.html"), "<html lang=\"en\"><title>x</title></html>").unwrap();

        let reports = scanner().scan_directory(temp.path()).unwrap();
        assert_eq!(reports.len(), 1);
        assert!(load_document(&temp.path().join("broken.json")).is_err());
    }
}

// ============================================================================
// Scan properties
// ============================================================================
mod properties {
    use super::*;

    #[test]
    fn test_repeat_scan_is_deterministic() {
        let tree = load_document(Path::new("tests/fixtures/inaccessible.html")).unwrap();
        let scanner = scanner();

        let first = scanner.scan(&tree);
        let second = scanner.scan(&tree);

        let key = |r: &ScanReport| {
            r.issues
                .iter()
                .map(|i| (i.rule_id.clone(), i.selector.clone(), i.severity, i.description.clone()))
                .collect::<Vec<_>>()
        };
        assert_eq!(key(&first), key(&second));
        assert_eq!(first.summary, second.summary);

        let first_ids: HashSet<_> = first.issues.iter().map(|i| i.id).collect();
        assert!(second.issues.iter().all(|i| !first_ids.contains(&i.id)));
    }

    #[test]
    fn test_summary_totals_consistent() {
        let report = scanner()
            .scan_file(Path::new("tests/fixtures/inaccessible.html"))
            .unwrap();
        let s = &report.summary;

        assert_eq!(s.total, report.issues.len());
        assert_eq!(s.total, s.critical + s.serious + s.moderate + s.minor);
        assert_eq!(s.by_category.values().sum::<usize>(), s.total);
        for severity in Severity::ALL {
            assert_eq!(s.count(severity), report.by_severity(severity).len());
        }

        let ids: HashSet<_> = report.issues.iter().map(|i| i.id).collect();
        assert_eq!(ids.len(), report.issues.len());
    }

    #[test]
    fn test_rescan_after_fix() {
        let mut tree = load_document(Path::new("tests/fixtures/page.json")).unwrap();
        let hero = tree.find_by_id("hero").unwrap();

        tree.set_attribute(hero, "alt", "Summer sale banner");
        let fixed = scanner().scan(&tree);
        assert_eq!(fixed.summary.total, 2);
        assert!(fixed.by_rule("image-alt-text").is_empty());

        tree.remove_attribute(hero, "alt");
        let regressed = scanner().scan(&tree);
        assert_eq!(regressed.by_rule("image-alt-text").len(), 1);
    }

    #[test]
    fn test_image_alt_variants() {
        let tree = page(|b, body| {
            let missing = b.element(body, "img");
            b.attr(missing, "id", "missing");
            let empty = b.element(body, "img");
            b.attr(empty, "id", "empty").attr(empty, "alt", "");
            let decorative = b.element(body, "img");
            b.attr(decorative, "id", "decorative").attr(decorative, "alt", "").attr(decorative, "role", "presentation");
            let described = b.element(body, "img");
            b.attr(described, "id", "described").attr(described, "alt", "Company logo");
        });

        let report = scanner().scan(&tree);
        let alt_issues = report.by_rule("image-alt-text");

        assert_eq!(alt_issues.len(), 2);
        let by_selector = |sel: &str| alt_issues.iter().find(|i| i.selector == sel).map(|i| i.severity);
        assert_eq!(by_selector("#missing"), Some(Severity::Critical));
        assert_eq!(by_selector("#empty"), Some(Severity::Moderate));
        assert_eq!(by_selector("#decorative"), None);
        assert_eq!(by_selector("#described"), None);
    }

    #[test]
    fn test_heading_order() {
        let skipped = page(|b, body| {
            for tag in ["h1", "h3"] {
                let h = b.element(body, tag);
                b.text(h, "Heading");
            }
        });
        let sequential = page(|b, body| {
            for tag in ["h1", "h2", "h3"] {
                let h = b.element(body, tag);
                b.text(h, "Heading");
            }
        });

        let skipped_report = scanner().scan(&skipped);
        let issues = skipped_report.by_rule("heading-order");
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].element.tag_name, "h3");

        assert!(scanner().scan(&sequential).is_empty());
    }

    #[test]
    fn test_contrast_ratios() {
        let mut b = TreeBuilder::new("html");
        let body = b.element(b.root(), "body");
        b.background(body, "#ffffff");
        let black = b.element(body, "p");
        b.color(black, "#000000");
        b.text(black, "black");
        let gray = b.element(body, "p");
        b.color(gray, "#777777");
        b.text(gray, "gray");
        let tree = b.build();

        assert_eq!(format!("{:.2}", contrast::ratio(&tree, black)), "21.00");
        assert!((contrast::ratio(&tree, gray) - 4.48).abs() < 0.01);
    }

    #[test]
    fn test_indeterminate_contrast_policy() {
        let tree = page(|b, body| {
            let p = b.element(body, "p");
            b.color(p, "var(--brand)");
            b.text(p, "Brand text");
        });

        assert!(scanner().scan(&tree).is_empty());

        let mut config = Config::default();
        config.contrast.indeterminate = IndeterminatePolicy::Flag;
        let flagged = Scanner::new(config).unwrap().scan(&tree);
        assert_eq!(flagged.summary.total, 1);
        assert_eq!(flagged.issues[0].rule_id, "color-contrast");
        assert_eq!(flagged.issues[0].severity, Severity::Minor);
    }
}

// ============================================================================
// Rule isolation and registry
// ============================================================================
mod isolation {
    use super::*;

    fn exploding(_: NodeId, _: &RuleContext<'_>) -> CheckResult {
        panic!("rule exploded")
    }

    fn erroring(node: NodeId, ctx: &RuleContext<'_>) -> CheckResult {
        if ctx.tag(node) == "img" {
            anyhow::bail!("cannot inspect image");
        }
        Ok(Some(Outcome::pass()))
    }

    fn meta(id: &str) -> RuleMeta {
        RuleMeta::new(id, "Broken rule", Severity::Minor)
            .with_description("Always fails to run")
            .with_wcag("4.1.2", WcagLevel::A)
            .with_help_url("https://example.org/broken")
    }

    #[test]
    fn test_throwing_rule_does_not_abort_scan() {
        let registry = RuleRegistry::builder()
            .with_builtin_rules()
            .register(Rule::new(meta("exploding"), exploding))
            .register(Rule::new(meta("erroring"), erroring))
            .build()
            .unwrap();
        let scanner = Scanner::with_registry(registry, Config::default());
        let tree = page(|b, body| {
            b.element(body, "img");
        });

        let report = scanner.scan(&tree);

        assert_eq!(report.metadata.element_count, 5);
        assert_eq!(report.metadata.rule_failures, 5 + 1);
        assert_eq!(report.by_rule("image-alt-text").len(), 1);
        assert!(report.by_rule("exploding").is_empty());
        assert!(report.by_rule("erroring").is_empty());
    }

    #[test]
    fn test_malformed_registration_fails_at_build() {
        let bad = Rule::new(RuleMeta::new("no-help", "No help", Severity::Minor), exploding);
        assert!(RuleRegistry::builder().register(bad).build().is_err());
    }
}

// ============================================================================
// Configuration and output
// ============================================================================
mod output {
    use super::*;

    #[test]
    fn test_config_file_disables_rules_and_level() {
        let temp = TempDir::new().expect("Create temp dir");
        let path = temp.path().join("a11y-lens.yml");
        fs::write(&path, "level: A\nrules:\n  disabled:\n    - image-alt-text\n").unwrap();

        let config = load_config(&path).unwrap();
        let scanner = Scanner::new(config).unwrap();

        assert!(scanner.registry().get("image-alt-text").is_none());
        assert!(scanner.registry().get("color-contrast").is_none());
        assert!(scanner.registry().get("link-text").is_some());
    }

    #[test]
    fn test_json_export_fields() {
        let report = scanner()
            .scan_file(Path::new("tests/fixtures/page.json"))
            .unwrap();
        let json = generate_report(std::slice::from_ref(&report), OutputFormat::Json);
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        for field in ["url", "timestamp", "durationMs", "issues", "summary", "metadata"] {
            assert!(value.get(field).is_some(), "missing {}", field);
        }
        let issue = value["issues"][0].as_object().unwrap();
        let mut keys: Vec<&str> = issue.keys().map(String::as_str).collect();
        keys.sort_unstable();
        assert_eq!(
            keys,
            [
                "category", "description", "elementSnapshot", "helpUrl", "id", "impact", "ruleId",
                "selector", "severity", "snippet", "suggestion", "timestamp", "title",
                "wcagCriteria", "wcagLevel", "xpath",
            ]
        );
        assert_eq!(issue["elementSnapshot"]["tagName"], "img");
        assert_eq!(value["metadata"]["nodeCount"], 12);

        let round_trip: ScanReport = serde_json::from_str(&json).unwrap();
        assert_eq!(round_trip.issues.len(), report.issues.len());
    }

    #[test]
    fn test_sarif_for_directory() {
        let reports = scanner().scan_directory(Path::new("tests/fixtures")).unwrap();
        let sarif = generate_report(&reports, OutputFormat::Sarif);
        let value: serde_json::Value = serde_json::from_str(&sarif).unwrap();
        let results = value["runs"][0]["results"].as_array().unwrap();
        let total: usize = reports.iter().map(|r| r.summary.total).sum();
        assert_eq!(results.len(), total);
    }
}
