// SPDX-License-Identifier: PMPL-1.0-or-later
//! Overlay / highlight manager.
//!
//! Turns a report's issues into markers positioned over the flagged elements
//! and reacts to host events: pointer hover, clicks, scrolling and resizing.
//! Time is passed in explicitly; pending timers (tooltip hide, click flash,
//! throttled reposition) are applied by [`OverlayManager::tick`].
//!
//! Overlay lifecycle: uncreated, rendered, tooltip shown or hidden, cleared.

pub mod layer;
pub mod tooltip;

pub use layer::{Flash, Overlay, OverlayLayer, Placement, Tooltip, TooltipContent};

use crate::config::OverlayConfig;
use crate::issue::Issue;
use crate::tree::{DocumentTree, NodeId, Viewport};
use std::time::{Duration, Instant};
use tracing::{debug, warn};
use uuid::Uuid;

/// Request for the host to act on the document
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OverlayCommand {
    /// Smoothly scroll the element into the center of the viewport
    ScrollIntoView { node: NodeId, selector: String },
}

/// Owns the overlay layer and every timer that mutates it
#[derive(Debug)]
pub struct OverlayManager {
    config: OverlayConfig,
    layer: OverlayLayer,
    viewport: Viewport,
    hide_at: Option<Instant>,
    flash_until: Option<Instant>,
    last_reposition: Option<Instant>,
    reposition_pending: bool,
}

impl OverlayManager {
    pub fn new(config: OverlayConfig) -> Self {
        Self {
            config,
            layer: OverlayLayer { visible: true, ..OverlayLayer::default() },
            viewport: Viewport::default(),
            hide_at: None,
            flash_until: None,
            last_reposition: None,
            reposition_pending: false,
        }
    }

    /// Current layer contents
    pub fn layer(&self) -> &OverlayLayer {
        &self.layer
    }

    pub fn is_visible(&self) -> bool {
        self.layer.visible
    }

    /// Replace all overlays with one per resolvable issue.
    ///
    /// Each issue is located by its selector, then by its structural path.
    /// Issues whose element cannot be found are logged and skipped.
    pub fn render(&mut self, tree: &dyn DocumentTree, issues: &[Issue]) {
        self.clear();
        self.viewport = tree.viewport().unwrap_or_default();

        for issue in issues {
            let node = tree
                .resolve_selector(&issue.selector)
                .or_else(|| tree.resolve_path(&issue.xpath));

            let Some(node) = node else {
                warn!(
                    issue = %issue.id,
                    selector = %issue.selector,
                    "Could not resolve element for issue; overlay skipped"
                );
                continue;
            };

            let style = self.config.styles.for_severity(issue.severity).clone();
            let bounds = self.document_rect(tree, node);
            self.layer.overlays.push(Overlay {
                issue_id: issue.id,
                rule_id: issue.rule_id.clone(),
                node,
                selector: issue.selector.clone(),
                severity: issue.severity,
                bounds,
                style,
                badge: issue.severity.to_string(),
                label: format!("{} accessibility issue: {}", issue.severity.as_str(), issue.title),
                tooltip: TooltipContent::from_issue(issue),
            });
        }

        self.layer.overlays.sort_by_key(|o| o.style.z_index);
        debug!("Rendered {} of {} overlays", self.layer.overlays.len(), issues.len());
    }

    /// Remove every overlay, the tooltip, the flash and pending timers
    pub fn clear(&mut self) {
        self.layer.overlays.clear();
        self.layer.tooltip = None;
        self.layer.flash = None;
        self.hide_at = None;
        self.flash_until = None;
        self.reposition_pending = false;
    }

    /// Hide or show all overlays without discarding them
    pub fn toggle(&mut self) -> bool {
        self.layer.visible = !self.layer.visible;
        if !self.layer.visible {
            self.layer.tooltip = None;
            self.hide_at = None;
        }
        self.layer.visible
    }

    /// Tear down the manager
    pub fn destroy(mut self) {
        self.clear();
        debug!("Overlay manager destroyed");
    }

    /// Pointer entered an overlay: show its tooltip and cancel any pending hide
    pub fn pointer_enter(&mut self, issue_id: Uuid) {
        if !self.layer.visible {
            return;
        }
        let Some(overlay) = self.layer.get(issue_id) else {
            return;
        };
        let (bounds, placement) = tooltip::place(
            overlay.bounds,
            self.config.tooltip_width,
            self.config.tooltip_height,
            self.viewport,
            self.config.tooltip_margin,
        );
        let shown = Tooltip {
            issue_id,
            bounds,
            placement,
            content: overlay.tooltip.clone(),
        };
        self.layer.tooltip = Some(shown);
        self.hide_at = None;
    }

    /// Pointer left an overlay: hide its tooltip after the configured delay
    pub fn pointer_leave(&mut self, issue_id: Uuid, now: Instant) {
        if self.tooltip_for(issue_id) {
            self.schedule_hide(now);
        }
    }

    /// Pointer moved onto the tooltip itself
    pub fn tooltip_enter(&mut self) {
        self.hide_at = None;
    }

    pub fn tooltip_leave(&mut self, now: Instant) {
        if self.layer.tooltip.is_some() {
            self.schedule_hide(now);
        }
    }

    /// Overlay clicked: outline the element briefly and ask the host to scroll to it
    pub fn click(&mut self, issue_id: Uuid, now: Instant) -> Option<OverlayCommand> {
        if !self.layer.visible {
            return None;
        }
        let overlay = self.layer.get(issue_id)?;
        let command = OverlayCommand::ScrollIntoView {
            node: overlay.node,
            selector: overlay.selector.clone(),
        };
        let flash = Flash {
            issue_id,
            bounds: overlay.bounds,
            stroke_color: overlay.style.stroke_color.clone(),
        };
        self.layer.flash = Some(flash);
        self.flash_until = Some(now + Duration::from_millis(self.config.flash_duration_ms));
        Some(command)
    }

    /// Scroll or resize: reposition every overlay, at most once per throttle window
    pub fn viewport_changed(&mut self, tree: &dyn DocumentTree, now: Instant) {
        let window = Duration::from_millis(self.config.reposition_throttle_ms);
        let due = self
            .last_reposition
            .map_or(true, |last| now.saturating_duration_since(last) >= window);

        if due {
            self.reposition(tree);
            self.last_reposition = Some(now);
            self.reposition_pending = false;
        } else {
            self.reposition_pending = true;
        }
    }

    /// Apply timers that have come due
    pub fn tick(&mut self, tree: &dyn DocumentTree, now: Instant) {
        if self.hide_at.map_or(false, |at| now >= at) {
            self.layer.tooltip = None;
            self.hide_at = None;
        }

        if self.flash_until.map_or(false, |until| now >= until) {
            self.layer.flash = None;
            self.flash_until = None;
        }

        if self.reposition_pending {
            self.viewport_changed(tree, now);
        }
    }

    /// Whether a tooltip hide is scheduled
    pub fn hide_pending(&self) -> bool {
        self.hide_at.is_some()
    }

    fn tooltip_for(&self, issue_id: Uuid) -> bool {
        self.layer.tooltip.as_ref().map_or(false, |t| t.issue_id == issue_id)
    }

    fn schedule_hide(&mut self, now: Instant) {
        self.hide_at = Some(now + Duration::from_millis(self.config.tooltip_hide_delay_ms));
    }

    fn document_rect(&self, tree: &dyn DocumentTree, node: NodeId) -> crate::tree::Rect {
        tree.bounding_rect(node)
            .translate(self.viewport.scroll_x, self.viewport.scroll_y)
    }

    fn reposition(&mut self, tree: &dyn DocumentTree) {
        self.viewport = tree.viewport().unwrap_or_default();

        let mut overlays = std::mem::take(&mut self.layer.overlays);
        for overlay in &mut overlays {
            overlay.bounds = self.document_rect(tree, overlay.node);
        }
        self.layer.overlays = overlays;

        if let Some(flash) = self.layer.flash.as_mut() {
            if let Some(overlay) = self.layer.overlays.iter().find(|o| o.issue_id == flash.issue_id) {
                flash.bounds = overlay.bounds;
            }
        }

        if let Some(issue_id) = self.layer.tooltip.as_ref().map(|t| t.issue_id) {
            let pending_hide = self.hide_at;
            self.pointer_enter(issue_id);
            self.hide_at = pending_hide;
        }

        debug!("Repositioned {} overlays", self.layer.overlays.len());
    }
}

impl Default for OverlayManager {
    fn default() -> Self {
        Self::new(OverlayConfig::default())
    }
}
