// SPDX-License-Identifier: PMPL-1.0-or-later
//! Scan entry points.
//!
//! [`Scanner::scan`] runs the full pipeline over one document tree: walk,
//! evaluate, aggregate. The file and directory helpers load HTML or JSON
//! snapshot captures from disk first.

use crate::config::Config;
use crate::error::{LensError, Result};
use crate::evaluator::Evaluator;
use crate::html;
use crate::report::{ScanMetadata, ScanReport};
use crate::rules::{RuleContext, RuleRegistry};
use crate::tree::{DocumentTree, SnapshotTree};
use crate::walker;
use std::path::Path;
use std::time::Instant;
use tracing::{debug, info, warn};
use walkdir::WalkDir;

/// File extensions that can be loaded as documents
const SCANNABLE_EXTENSIONS: &[&str] = &["html", "htm", "json"];

/// Directories to skip
const SKIP_DIRS: &[&str] = &[
    "node_modules", ".git", "target", "dist", "build",
    "_build", "vendor", ".next", ".nuxt", "coverage",
];

/// URL used when neither the tree nor the configuration provides one
const UNKNOWN_URL: &str = "about:blank";

/// Runs a rule registry over document trees
#[derive(Debug)]
pub struct Scanner {
    registry: RuleRegistry,
    config: Config,
}

impl Scanner {
    /// Scanner with the built-in rules, filtered by the configuration
    pub fn new(config: Config) -> Result<Self> {
        let mut builder = RuleRegistry::builder()
            .with_builtin_rules()
            .max_level(config.level);
        for id in &config.rules.disabled {
            builder = builder.disable(id);
        }
        Ok(Self::with_registry(builder.build()?, config))
    }

    /// Scanner with a caller-supplied registry
    pub fn with_registry(registry: RuleRegistry, config: Config) -> Self {
        Self { registry, config }
    }

    pub fn registry(&self) -> &RuleRegistry {
        &self.registry
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Scan one document tree
    pub fn scan(&self, tree: &dyn DocumentTree) -> ScanReport {
        let started = Instant::now();
        let ctx = RuleContext::new(tree).with_indeterminate_contrast(self.config.contrast.indeterminate);
        let mut evaluator = Evaluator::new(&self.registry, self.config.snapshot.clone());
        let mut issues = Vec::new();

        let stats = walker::walk(tree, |node| issues.extend(evaluator.evaluate(node, &ctx)));

        let url = tree
            .url()
            .map(str::to_string)
            .or_else(|| self.config.url.clone())
            .unwrap_or_else(|| UNKNOWN_URL.to_string());

        let metadata = ScanMetadata {
            node_count: stats.nodes,
            element_count: stats.elements,
            rules_evaluated: self.registry.len(),
            rule_failures: evaluator.rule_failures(),
            duration_ms: started.elapsed().as_millis() as u64,
            user_agent: Some(format!("a11y-lens/{}", env!("CARGO_PKG_VERSION"))),
            viewport: tree.viewport(),
        };

        if metadata.rule_failures > 0 {
            warn!("{} rule check(s) failed during scan of {}", metadata.rule_failures, url);
        }
        debug!(
            url = %url,
            issues = issues.len(),
            checks = evaluator.checks_run(),
            "Scan complete"
        );

        ScanReport::new(url, issues, metadata)
    }

    /// Load and scan a single `.html`, `.htm` or `.json` file
    pub fn scan_file(&self, path: &Path) -> Result<ScanReport> {
        let tree = load_document(path)?;
        let mut report = self.scan(&tree);
        if tree.url().is_none() && self.config.url.is_none() {
            report.url = file_url(path);
        }
        Ok(report)
    }

    /// Scan every loadable document below `dir`
    pub fn scan_directory(&self, dir: &Path) -> Result<Vec<ScanReport>> {
        let mut reports = Vec::new();

        info!("Scanning directory: {}", dir.display());

        for entry in WalkDir::new(dir)
            .follow_links(false)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|e| {
                let name = e.file_name().to_str().unwrap_or("");
                if e.file_type().is_dir() && e.depth() > 0 {
                    return !SKIP_DIRS.contains(&name) && !name.starts_with('.');
                }
                true
            })
        {
            let entry = match entry {
                Ok(e) => e,
                Err(_) => continue,
            };

            if !entry.file_type().is_file() || !is_scannable(entry.path()) {
                continue;
            }

            match self.scan_file(entry.path()) {
                Ok(report) => reports.push(report),
                Err(e) => info!("Skipping {}: {}", entry.path().display(), e),
            }
        }

        let total: usize = reports.iter().map(|r| r.summary.total).sum();
        info!("Scanned {} documents, found {} issues", reports.len(), total);

        Ok(reports)
    }
}

fn extension(path: &Path) -> String {
    path.extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase()
}

fn is_scannable(path: &Path) -> bool {
    SCANNABLE_EXTENSIONS.contains(&extension(path).as_str())
}

/// Load a document tree from an HTML file or a JSON snapshot capture
pub fn load_document(path: &Path) -> Result<SnapshotTree> {
    match extension(path).as_str() {
        "html" | "htm" => html::load_html(path),
        "json" => SnapshotTree::from_json(&std::fs::read_to_string(path)?),
        _ => Err(LensError::UnsupportedInput(path.display().to_string())),
    }
}

fn file_url(path: &Path) -> String {
    let absolute = path.canonicalize().unwrap_or_else(|_| path.to_path_buf());
    format!("file://{}", absolute.display())
}
