// SPDX-License-Identifier: PMPL-1.0-or-later
//! Result aggregation.
//!
//! A [`ScanReport`] owns every [`Issue`] produced by one scan together with
//! per-severity and per-category counts, a compliance score, and metadata
//! about the walk. Renderers for text, JSON and SARIF live in [`format`].

pub mod format;

pub use format::{generate_report, OutputFormat};

use crate::issue::{Category, Issue, Severity};
use crate::tree::Viewport;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Issue counts for one report
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Summary {
    pub total: usize,
    pub critical: usize,
    pub serious: usize,
    pub moderate: usize,
    pub minor: usize,
    pub by_category: BTreeMap<Category, usize>,
    /// 0-100, 100 when no issues were found
    pub compliance_score: u32,
}

impl Summary {
    /// Count issues by severity and category
    pub fn from_issues(issues: &[Issue]) -> Self {
        let mut summary = Summary {
            total: issues.len(),
            by_category: Category::ALL.iter().map(|c| (*c, 0)).collect(),
            compliance_score: compliance_score(issues.len()),
            ..Summary::default()
        };

        for issue in issues {
            match issue.severity {
                Severity::Critical => summary.critical += 1,
                Severity::Serious => summary.serious += 1,
                Severity::Moderate => summary.moderate += 1,
                Severity::Minor => summary.minor += 1,
            }
            *summary.by_category.entry(issue.category).or_insert(0) += 1;
        }

        summary
    }

    pub fn count(&self, severity: Severity) -> usize {
        match severity {
            Severity::Critical => self.critical,
            Severity::Serious => self.serious,
            Severity::Moderate => self.moderate,
            Severity::Minor => self.minor,
        }
    }
}

/// Facts about the scan itself
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScanMetadata {
    /// Nodes of any kind reached by the walker
    pub node_count: usize,
    /// Elements handed to the evaluator
    pub element_count: usize,
    /// Rules in the registry used for the scan
    pub rules_evaluated: usize,
    /// Checks that errored or panicked and were skipped
    pub rule_failures: usize,
    pub duration_ms: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_agent: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub viewport: Option<Viewport>,
}

/// Output of one scan. Replaced wholesale by the next scan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScanReport {
    pub url: String,
    pub timestamp: DateTime<Utc>,
    pub duration_ms: u64,
    pub issues: Vec<Issue>,
    pub summary: Summary,
    pub metadata: ScanMetadata,
}

impl ScanReport {
    /// Aggregate issues into a report
    pub fn new(url: impl Into<String>, issues: Vec<Issue>, metadata: ScanMetadata) -> Self {
        Self {
            url: url.into(),
            timestamp: Utc::now(),
            duration_ms: metadata.duration_ms,
            summary: Summary::from_issues(&issues),
            issues,
            metadata,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.issues.is_empty()
    }

    /// Issues of one severity, in scan order
    pub fn by_severity(&self, severity: Severity) -> Vec<&Issue> {
        self.issues.iter().filter(|i| i.severity == severity).collect()
    }

    pub fn by_rule(&self, rule_id: &str) -> Vec<&Issue> {
        self.issues.iter().filter(|i| i.rule_id == rule_id).collect()
    }

    pub fn get(&self, id: uuid::Uuid) -> Option<&Issue> {
        self.issues.iter().find(|i| i.id == id)
    }

    /// Whether any issue blocks a release
    pub fn blocks_release(&self) -> bool {
        self.issues.iter().any(|i| i.severity.blocks_release())
    }
}

/// Score from an issue count: `round(max(0, 100 - total) / 100 * 100)`
pub fn compliance_score(total: usize) -> u32 {
    let remaining = 100usize.saturating_sub(total) as f64;
    (remaining / 100.0 * 100.0).round() as u32
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::issue::{ElementSnapshot, ImpactAssessment, WcagLevel};
    use crate::tree::Rect;
    use uuid::Uuid;

    pub(crate) fn issue(rule_id: &str, severity: Severity, category: Category) -> Issue {
        Issue {
            id: Uuid::new_v4(),
            rule_id: rule_id.to_string(),
            severity,
            category,
            wcag_criteria: vec!["1.1.1".to_string()],
            wcag_level: WcagLevel::A,
            title: "Title".to_string(),
            description: "Description".to_string(),
            element: ElementSnapshot {
                tag_name: "img".to_string(),
                id: None,
                class_name: None,
                role: None,
                aria_label: None,
                text: String::new(),
                attributes: BTreeMap::new(),
                bounding_rect: Rect::default(),
                path: "/html[1]/body[1]/img[1]".to_string(),
            },
            selector: "html > body > img:nth-of-type(1)".to_string(),
            xpath: "/html[1]/body[1]/img[1]".to_string(),
            snippet: "<img>".to_string(),
            impact: ImpactAssessment::blind(),
            suggestion: "Fix".to_string(),
            help_url: "https://example.org".to_string(),
            timestamp: Utc::now(),
        }
    }

    #[test]
    fn test_compliance_score() {
        assert_eq!(compliance_score(0), 100);
        assert_eq!(compliance_score(37), 63);
        assert_eq!(compliance_score(100), 0);
        assert_eq!(compliance_score(250), 0);
    }

    #[test]
    fn test_summary_counts_match_issues() {
        let issues = vec![
            issue("a", Severity::Critical, Category::Perceivable),
            issue("b", Severity::Serious, Category::Operable),
            issue("c", Severity::Serious, Category::Operable),
            issue("d", Severity::Minor, Category::Robust),
        ];
        let report = ScanReport::new("about:blank", issues, ScanMetadata::default());
        let s = &report.summary;

        assert_eq!(s.total, report.issues.len());
        assert_eq!(s.total, s.critical + s.serious + s.moderate + s.minor);
        assert_eq!(s.serious, 2);
        assert_eq!(s.by_category[&Category::Operable], 2);
        assert_eq!(s.by_category[&Category::Understandable], 0);
        assert_eq!(s.compliance_score, 96);
        assert!(report.blocks_release());
        assert_eq!(report.by_rule("b").len(), 1);
        assert_eq!(report.by_severity(Severity::Minor).len(), 1);
    }

    #[test]
    fn test_empty_report() {
        let report = ScanReport::new("about:blank", Vec::new(), ScanMetadata::default());
        assert!(report.is_empty());
        assert_eq!(report.summary.compliance_score, 100);
        assert!(!report.blocks_release());
    }

    #[test]
    fn test_report_serializes_camel_case() {
        let metadata = ScanMetadata { node_count: 3, duration_ms: 5, ..ScanMetadata::default() };
        let report = ScanReport::new(
            "https://example.org/",
            vec![issue("a", Severity::Moderate, Category::Perceivable)],
            metadata,
        );
        let value = serde_json::to_value(&report).unwrap();

        assert_eq!(value["durationMs"], 5);
        assert_eq!(value["summary"]["complianceScore"], 99);
        assert_eq!(value["summary"]["byCategory"]["perceivable"], 1);
        assert_eq!(value["metadata"]["nodeCount"], 3);
        assert!(value["metadata"].get("userAgent").is_none());
        assert_eq!(value["issues"][0]["ruleId"], "a");
        assert_eq!(value["issues"][0]["severity"], "moderate");
    }
}
