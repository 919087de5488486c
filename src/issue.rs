// SPDX-License-Identifier: PMPL-1.0-or-later
//! Core finding types: severities, WCAG levels, impact assessments and the
//! immutable [`Issue`] record produced for every failing (element, rule) pair.

use crate::tree::{DocumentTree, NodeId, Rect};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use uuid::Uuid;

/// Issue severity, most severe first
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Blocks access entirely for some users
    Critical,
    /// Seriously degrades access
    Serious,
    /// Some users will be inconvenienced
    Moderate,
    /// Cosmetic or best-practice
    Minor,
}

impl Severity {
    /// All severities, most severe first
    pub const ALL: [Severity; 4] = [
        Severity::Critical,
        Severity::Serious,
        Severity::Moderate,
        Severity::Minor,
    ];

    /// Whether this severity blocks releases
    pub fn blocks_release(&self) -> bool {
        matches!(self, Severity::Critical)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Critical => "critical",
            Severity::Serious => "serious",
            Severity::Moderate => "moderate",
            Severity::Minor => "minor",
        }
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Severity::Critical => write!(f, "CRITICAL"),
            Severity::Serious => write!(f, "SERIOUS"),
            Severity::Moderate => write!(f, "MODERATE"),
            Severity::Minor => write!(f, "MINOR"),
        }
    }
}

/// WCAG principle a rule belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Perceivable,
    Operable,
    Understandable,
    Robust,
}

impl Category {
    pub const ALL: [Category; 4] = [
        Category::Perceivable,
        Category::Operable,
        Category::Understandable,
        Category::Robust,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Perceivable => "perceivable",
            Category::Operable => "operable",
            Category::Understandable => "understandable",
            Category::Robust => "robust",
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// WCAG conformance level
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum WcagLevel {
    /// Level A - minimum conformance
    A,
    /// Level AA - standard conformance
    AA,
    /// Level AAA - enhanced conformance
    AAA,
}

impl std::fmt::Display for WcagLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            WcagLevel::A => write!(f, "A"),
            WcagLevel::AA => write!(f, "AA"),
            WcagLevel::AAA => write!(f, "AAA"),
        }
    }
}

/// Impact assessment: who is affected by an accessibility issue
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImpactAssessment {
    /// Affects blind users (screen reader users)
    pub blind: bool,
    /// Affects low-vision users
    pub low_vision: bool,
    /// Affects users with motor disabilities
    pub motor: bool,
    /// Affects users with cognitive disabilities
    pub cognitive: bool,
    /// Affects deaf/hard-of-hearing users
    pub deaf: bool,
}

impl ImpactAssessment {
    pub fn blind() -> Self {
        Self { blind: true, ..Self::default() }
    }

    pub fn low_vision() -> Self {
        Self { low_vision: true, ..Self::default() }
    }

    pub fn motor() -> Self {
        Self { motor: true, ..Self::default() }
    }

    pub fn cognitive() -> Self {
        Self { cognitive: true, ..Self::default() }
    }

    pub fn deaf() -> Self {
        Self { deaf: true, ..Self::default() }
    }

    /// Combine two assessments
    pub fn and(self, other: Self) -> Self {
        Self {
            blind: self.blind || other.blind,
            low_vision: self.low_vision || other.low_vision,
            motor: self.motor || other.motor,
            cognitive: self.cognitive || other.cognitive,
            deaf: self.deaf || other.deaf,
        }
    }

    /// Describe affected groups
    pub fn affected_groups(&self) -> Vec<&'static str> {
        let mut groups = Vec::new();
        if self.blind { groups.push("blind"); }
        if self.low_vision { groups.push("low-vision"); }
        if self.motor { groups.push("motor"); }
        if self.cognitive { groups.push("cognitive"); }
        if self.deaf { groups.push("deaf/hard-of-hearing"); }
        groups
    }
}

/// Read-only copy of an element's identity at scan time
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ElementSnapshot {
    pub tag_name: String,
    pub id: Option<String>,
    pub class_name: Option<String>,
    pub role: Option<String>,
    pub aria_label: Option<String>,
    /// Text content, truncated
    pub text: String,
    pub attributes: BTreeMap<String, String>,
    pub bounding_rect: Rect,
    /// Structural path from the root, e.g. `/html[1]/body[1]/img[2]`
    pub path: String,
}

impl ElementSnapshot {
    /// Capture a node. Text longer than `max_text_len` characters is cut
    /// and suffixed with `...`.
    pub fn capture(tree: &dyn DocumentTree, node: NodeId, max_text_len: usize) -> Self {
        let attr = |name: &str| tree.attribute(node, name).map(str::to_string);
        let text = tree.text_content(node);
        Self {
            tag_name: tree.tag_name(node).to_string(),
            id: attr("id"),
            class_name: attr("class"),
            role: attr("role"),
            aria_label: attr("aria-label"),
            text: truncate(text.trim(), max_text_len),
            attributes: tree.attributes(node),
            bounding_rect: tree.bounding_rect(node),
            path: tree.path_for(node),
        }
    }
}

/// Truncate on a char boundary, appending `...` when cut
pub fn truncate(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let cut: String = text.chars().take(max_chars).collect();
    format!("{}...", cut)
}

/// One failing (element, rule) pair. Built only by the evaluator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Issue {
    /// Unique identifier
    pub id: Uuid,
    /// Rule that produced this issue
    pub rule_id: String,
    pub severity: Severity,
    pub category: Category,
    /// WCAG success criteria references, e.g. `["1.1.1"]`
    pub wcag_criteria: Vec<String>,
    pub wcag_level: WcagLevel,
    /// Rule name
    pub title: String,
    /// Outcome message
    pub description: String,
    #[serde(rename = "elementSnapshot")]
    pub element: ElementSnapshot,
    /// CSS-like selector used to re-locate the element
    pub selector: String,
    /// Structural path fallback when the selector no longer resolves
    pub xpath: String,
    /// Opening tag of the element as markup
    pub snippet: String,
    pub impact: ImpactAssessment,
    pub suggestion: String,
    pub help_url: String,
    pub timestamp: DateTime<Utc>,
}

impl Issue {
    /// All WCAG criteria with the level, e.g. `1.3.1, 4.1.2 (Level A)`
    pub fn wcag_reference(&self) -> String {
        format!("{} (Level {})", self.wcag_criteria.join(", "), self.wcag_level)
    }
}
