// SPDX-License-Identifier: PMPL-1.0-or-later
//! Element evaluation: runs every applicable rule against one node and turns
//! failing outcomes into [`Issue`]s.
//!
//! A rule that returns an error or panics is isolated. The failure is logged
//! with the rule id, counted, and the rule is treated as not applicable to
//! that node; evaluation continues with the next rule.

use crate::config::SnapshotConfig;
use crate::issue::{truncate, ElementSnapshot, Issue};
use crate::rules::{Outcome, Rule, RuleContext, RuleRegistry};
use crate::tree::{DocumentTree, NodeId};
use chrono::Utc;
use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use tracing::warn;
use uuid::Uuid;

/// Runs the registry against nodes handed over by the walker
pub struct Evaluator<'r> {
    registry: &'r RuleRegistry,
    snapshot: SnapshotConfig,
    checks_run: usize,
    rule_failures: usize,
}

impl<'r> Evaluator<'r> {
    pub fn new(registry: &'r RuleRegistry, snapshot: SnapshotConfig) -> Self {
        Self {
            registry,
            snapshot,
            checks_run: 0,
            rule_failures: 0,
        }
    }

    /// Evaluate every applicable rule against `node`
    pub fn evaluate(&mut self, node: NodeId, ctx: &RuleContext<'_>) -> Vec<Issue> {
        let root = ctx.tree.root();
        let mut issues = Vec::new();

        for rule in self.registry.rules() {
            if !rule.applies_to(node, root) {
                continue;
            }
            self.checks_run += 1;

            match run_isolated(rule, node, ctx) {
                Ok(Some(outcome)) if !outcome.passed => {
                    issues.push(self.build_issue(rule, node, ctx.tree, outcome));
                }
                Ok(_) => {}
                Err(reason) => {
                    self.rule_failures += 1;
                    warn!(rule = %rule.id(), node = node.0, "Rule check failed: {}", reason);
                }
            }
        }

        issues
    }

    /// Number of (node, rule) checks invoked so far
    pub fn checks_run(&self) -> usize {
        self.checks_run
    }

    /// Number of checks that errored or panicked so far
    pub fn rule_failures(&self) -> usize {
        self.rule_failures
    }

    fn build_issue(&self, rule: &Rule, node: NodeId, tree: &dyn DocumentTree, outcome: Outcome) -> Issue {
        let meta = &rule.meta;
        Issue {
            id: Uuid::new_v4(),
            rule_id: meta.id.clone(),
            severity: outcome.impact.unwrap_or(meta.severity),
            category: meta.category,
            wcag_criteria: meta.wcag_criteria.clone(),
            wcag_level: meta.wcag_level,
            title: meta.name.clone(),
            description: outcome.message,
            element: ElementSnapshot::capture(tree, node, self.snapshot.max_text_len),
            selector: tree.selector_for(node),
            xpath: tree.path_for(node),
            snippet: snippet(tree, node, self.snapshot.max_snippet_len),
            impact: meta.affects,
            suggestion: outcome.suggestion,
            help_url: meta.help_url.clone(),
            timestamp: Utc::now(),
        }
    }
}

/// Run one check, converting both errors and panics into a reason string
fn run_isolated(rule: &Rule, node: NodeId, ctx: &RuleContext<'_>) -> Result<Option<Outcome>, String> {
    match panic::catch_unwind(AssertUnwindSafe(|| rule.check(node, ctx))) {
        Ok(Ok(outcome)) => Ok(outcome),
        Ok(Err(e)) => Err(format!("{:#}", e)),
        Err(payload) => Err(format!("panicked: {}", panic_message(payload.as_ref()))),
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    if let Some(s) = payload.downcast_ref::<&str>() {
        *s
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.as_str()
    } else {
        "unknown panic"
    }
}

/// Opening tag of an element as markup, e.g. `<img src="a.png" alt="">`
pub fn snippet(tree: &dyn DocumentTree, node: NodeId, max_len: usize) -> String {
    let mut out = format!("<{}", tree.tag_name(node));
    for (name, value) in tree.attributes(node) {
        out.push(' ');
        out.push_str(&name);
        out.push_str("=\"");
        out.push_str(&value.replace('"', "&quot;"));
        out.push('"');
    }
    out.push('>');
    truncate(&out, max_len)
}
