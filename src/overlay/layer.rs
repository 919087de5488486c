// SPDX-License-Identifier: PMPL-1.0-or-later
//! Read-only view of what the overlay layer currently shows.

use crate::config::HighlightStyle;
use crate::issue::{Issue, Severity};
use crate::tree::{NodeId, Rect};
use serde::Serialize;
use uuid::Uuid;

/// Text shown in an issue's tooltip
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TooltipContent {
    pub title: String,
    pub description: String,
    pub suggestion: String,
    /// e.g. `1.1.1 (Level A)`
    pub wcag: String,
    pub help_url: String,
}

impl TooltipContent {
    pub fn from_issue(issue: &Issue) -> Self {
        Self {
            title: issue.title.clone(),
            description: issue.description.clone(),
            suggestion: issue.suggestion.clone(),
            wcag: issue.wcag_reference(),
            help_url: issue.help_url.clone(),
        }
    }
}

/// Marker drawn over one flagged element
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Overlay {
    pub issue_id: Uuid,
    pub rule_id: String,
    #[serde(skip)]
    pub node: NodeId,
    pub selector: String,
    pub severity: Severity,
    /// Document coordinates: bounding rect plus scroll offset
    pub bounds: Rect,
    pub style: HighlightStyle,
    /// Severity badge text
    pub badge: String,
    /// Accessible label announced for the marker
    pub label: String,
    pub tooltip: TooltipContent,
}

impl Overlay {
    pub fn contains(&self, x: f64, y: f64) -> bool {
        x >= self.bounds.x && x <= self.bounds.right() && y >= self.bounds.y && y <= self.bounds.bottom()
    }
}

/// Which side of the overlay the tooltip sits on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Placement {
    Below,
    Above,
}

/// The single visible tooltip
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Tooltip {
    pub issue_id: Uuid,
    pub bounds: Rect,
    pub placement: Placement,
    pub content: TooltipContent,
}

/// Temporary outline drawn after an overlay is clicked
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Flash {
    pub issue_id: Uuid,
    pub bounds: Rect,
    pub stroke_color: String,
}

/// Everything the host needs to paint
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OverlayLayer {
    pub visible: bool,
    /// Paint order: lowest z-index first
    pub overlays: Vec<Overlay>,
    pub tooltip: Option<Tooltip>,
    pub flash: Option<Flash>,
}

impl OverlayLayer {
    pub fn get(&self, issue_id: Uuid) -> Option<&Overlay> {
        self.overlays.iter().find(|o| o.issue_id == issue_id)
    }

    /// Topmost overlay under a document point
    pub fn overlay_at(&self, x: f64, y: f64) -> Option<&Overlay> {
        self.overlays.iter().rev().find(|o| o.contains(x, y))
    }

    pub fn len(&self) -> usize {
        self.overlays.len()
    }

    pub fn is_empty(&self) -> bool {
        self.overlays.is_empty()
    }
}
