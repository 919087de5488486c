// SPDX-License-Identifier: PMPL-1.0-or-later
//! Report rendering.
//!
//! Supports multiple output formats:
//! - Text: human-readable issues grouped by severity with WCAG references
//! - JSON: the scan report itself, or an array when several documents were scanned
//! - SARIF: Static Analysis Results Interchange Format for IDE/CI integration

use super::ScanReport;
use crate::issue::Severity;
use serde::Serialize;

/// Output format for reports
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable text
    Text,
    /// Structured JSON
    Json,
    /// SARIF for IDE/CI integration
    Sarif,
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Text => write!(f, "text"),
            OutputFormat::Json => write!(f, "json"),
            OutputFormat::Sarif => write!(f, "sarif"),
        }
    }
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            "sarif" => Ok(OutputFormat::Sarif),
            other => Err(format!("Unknown output format: {}", other)),
        }
    }
}

/// Render one or more scan reports
pub fn generate_report(reports: &[ScanReport], format: OutputFormat) -> String {
    match format {
        OutputFormat::Text => generate_text_report(reports),
        OutputFormat::Json => generate_json_report(reports),
        OutputFormat::Sarif => generate_sarif_report(reports),
    }
}

fn generate_text_report(reports: &[ScanReport]) -> String {
    let mut output = String::new();

    output.push_str("=== a11y-lens WCAG Scan Report ===\n\n");

    if reports.is_empty() {
        output.push_str("No documents scanned.\n");
        return output;
    }

    for report in reports {
        render_document(&mut output, report);
    }

    if reports.iter().any(ScanReport::blocks_release) {
        output.push_str("RESULT: RELEASE BLOCKED (critical issues found)\n");
    } else if reports.iter().any(|r| !r.is_empty()) {
        output.push_str("RESULT: PASS WITH WARNINGS\n");
    } else {
        output.push_str("RESULT: PASS\n");
    }

    output
}

fn render_document(output: &mut String, report: &ScanReport) {
    let summary = &report.summary;
    output.push_str(&format!("Document: {}\n", report.url));
    output.push_str(&format!(
        "Compliance score: {}/100 ({} elements, {} ms)\n",
        summary.compliance_score, report.metadata.element_count, report.duration_ms
    ));

    if report.metadata.rule_failures > 0 {
        output.push_str(&format!(
            "Warning: {} rule check(s) failed and were skipped\n",
            report.metadata.rule_failures
        ));
    }

    if report.is_empty() {
        output.push_str("No accessibility issues found. All checks passed.\n\n");
        return;
    }

    output.push_str(&format!(
        "Found {} issue(s): {} critical, {} serious, {} moderate, {} minor\n\n",
        summary.total, summary.critical, summary.serious, summary.moderate, summary.minor
    ));

    for severity in Severity::ALL {
        let issues = report.by_severity(severity);
        if issues.is_empty() {
            continue;
        }

        output.push_str(&format!("--- {} ({}) ---\n", severity, issues.len()));

        for issue in issues {
            output.push_str(&format!("[{}] {}\n", issue.rule_id, issue.description));
            output.push_str(&format!("  Element: {}\n", issue.snippet));
            output.push_str(&format!("  Selector: {}\n", issue.selector));
            output.push_str(&format!("  WCAG: {}\n", issue.wcag_reference()));

            if !issue.suggestion.is_empty() {
                output.push_str(&format!("  Fix: {}\n", issue.suggestion));
            }

            let groups = issue.impact.affected_groups();
            if !groups.is_empty() {
                output.push_str(&format!("  Affects: {}\n", groups.join(", ")));
            }

            output.push('\n');
        }
    }
}

fn generate_json_report(reports: &[ScanReport]) -> String {
    let rendered = match reports {
        [single] => serde_json::to_string_pretty(single),
        many => serde_json::to_string_pretty(many),
    };
    rendered.unwrap_or_else(|e| format!("{{\"error\": \"Failed to serialize report: {}\"}}", e))
}

/// SARIF report structure (simplified)
#[derive(Debug, Serialize)]
struct SarifReport {
    #[serde(rename = "$schema")]
    schema: String,
    version: String,
    runs: Vec<SarifRun>,
}

#[derive(Debug, Serialize)]
struct SarifRun {
    tool: SarifTool,
    results: Vec<SarifResult>,
}

#[derive(Debug, Serialize)]
struct SarifTool {
    driver: SarifDriver,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SarifDriver {
    name: String,
    version: String,
    information_uri: String,
    rules: Vec<SarifRule>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SarifRule {
    id: String,
    short_description: SarifMessage,
    help_uri: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SarifResult {
    rule_id: String,
    level: String,
    message: SarifMessage,
    locations: Vec<SarifLocation>,
}

#[derive(Debug, Serialize)]
struct SarifMessage {
    text: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SarifLocation {
    physical_location: SarifPhysicalLocation,
    logical_locations: Vec<SarifLogicalLocation>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SarifPhysicalLocation {
    artifact_location: SarifArtifactLocation,
}

#[derive(Debug, Serialize)]
struct SarifArtifactLocation {
    uri: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SarifLogicalLocation {
    fully_qualified_name: String,
    kind: String,
}

fn sarif_level(severity: Severity) -> &'static str {
    match severity {
        Severity::Critical | Severity::Serious => "error",
        Severity::Moderate => "warning",
        Severity::Minor => "note",
    }
}

fn generate_sarif_report(reports: &[ScanReport]) -> String {
    let mut rules: Vec<SarifRule> = Vec::new();
    let mut results = Vec::new();

    for report in reports {
        for issue in &report.issues {
            if !rules.iter().any(|r| r.id == issue.rule_id) {
                rules.push(SarifRule {
                    id: issue.rule_id.clone(),
                    short_description: SarifMessage { text: issue.title.clone() },
                    help_uri: issue.help_url.clone(),
                });
            }

            results.push(SarifResult {
                rule_id: issue.rule_id.clone(),
                level: sarif_level(issue.severity).to_string(),
                message: SarifMessage {
                    text: format!("{} [WCAG {}]", issue.description, issue.wcag_reference()),
                },
                locations: vec![SarifLocation {
                    physical_location: SarifPhysicalLocation {
                        artifact_location: SarifArtifactLocation { uri: report.url.clone() },
                    },
                    logical_locations: vec![SarifLogicalLocation {
                        fully_qualified_name: issue.selector.clone(),
                        kind: "element".to_string(),
                    }],
                }],
            });
        }
    }

    let report = SarifReport {
        schema: "https://json.schemastore.org/sarif-2.1.0.json".to_string(),
        version: "2.1.0".to_string(),
        runs: vec![SarifRun {
            tool: SarifTool {
                driver: SarifDriver {
                    name: "a11y-lens".to_string(),
                    version: env!("CARGO_PKG_VERSION").to_string(),
                    information_uri: "https://www.w3.org/WAI/standards-guidelines/wcag/".to_string(),
                    rules,
                },
            },
            results,
        }],
    };

    serde_json::to_string_pretty(&report).unwrap_or_else(|e| {
        format!("{{\"error\": \"Failed to serialize SARIF report: {}\"}}", e)
    })
}
