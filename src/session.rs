// SPDX-License-Identifier: PMPL-1.0-or-later
//! Host-facing session: one scanner, the latest report, and its overlays.
//!
//! Each scan supersedes the previous one. Overlays are cleared before the new
//! report replaces the old, so no overlay outlives the issue it marks.

use crate::config::Config;
use crate::error::Result;
use crate::overlay::{OverlayLayer, OverlayManager};
use crate::report::ScanReport;
use crate::scanner::Scanner;
use crate::tree::DocumentTree;
use tracing::debug;

pub struct Session {
    scanner: Scanner,
    report: Option<ScanReport>,
    overlays: OverlayManager,
}

impl Session {
    pub fn new(config: Config) -> Result<Self> {
        let overlays = OverlayManager::new(config.overlay.clone());
        Ok(Self::with_scanner(Scanner::new(config)?, overlays))
    }

    pub fn with_scanner(scanner: Scanner, overlays: OverlayManager) -> Self {
        Self { scanner, report: None, overlays }
    }

    /// Scan `tree`, replacing the previous report and discarding its overlays
    pub fn scan(&mut self, tree: &dyn DocumentTree) -> &ScanReport {
        self.overlays.clear();
        if self.report.take().is_some() {
            debug!("Previous report discarded");
        }
        self.report.insert(self.scanner.scan(tree))
    }

    /// Draw overlays for the current report's issues
    pub fn highlight(&mut self, tree: &dyn DocumentTree) -> &OverlayLayer {
        match &self.report {
            Some(report) => self.overlays.render(tree, &report.issues),
            None => self.overlays.clear(),
        }
        self.overlays.layer()
    }

    /// Scan and highlight in one step
    pub fn scan_and_highlight(&mut self, tree: &dyn DocumentTree) -> &OverlayLayer {
        self.scan(tree);
        self.highlight(tree)
    }

    pub fn report(&self) -> Option<&ScanReport> {
        self.report.as_ref()
    }

    pub fn overlays(&self) -> &OverlayManager {
        &self.overlays
    }

    /// Host event entry point for hover, click, scroll and timer ticks
    pub fn overlays_mut(&mut self) -> &mut OverlayManager {
        &mut self.overlays
    }

    pub fn scanner(&self) -> &Scanner {
        &self.scanner
    }
}
