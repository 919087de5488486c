// SPDX-License-Identifier: PMPL-1.0-or-later
//! Rule registry: the catalog of compliance rules.
//!
//! A [`Rule`] pairs static metadata with a stateless [`Check`]. Checks
//! receive one node plus a read-only [`RuleContext`] and return:
//! - `Ok(None)` when the rule does not apply to the node
//! - `Ok(Some(outcome))` with `passed` set accordingly
//! - `Err(_)` when the check itself failed; the evaluator logs and skips it
//!
//! Rules must not share mutable state or depend on evaluation order.

pub mod aria;
pub mod color;
pub mod document;
pub mod forms;
pub mod headings;
pub mod images;
pub mod keyboard;
pub mod links;
pub mod media;

use crate::config::IndeterminatePolicy;
use crate::error::RegistryError;
use crate::issue::{Category, ImpactAssessment, Severity, WcagLevel};
use crate::tree::{DocumentTree, NodeId};
use serde::Serialize;
use std::collections::HashSet;
use tracing::debug;

/// Result type returned by every check
pub type CheckResult = anyhow::Result<Option<Outcome>>;

/// Which nodes a rule is offered
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RuleScope {
    /// Every element
    Element,
    /// Only the document root, once per scan
    Document,
}

/// Dynamic result of one check against one node
#[derive(Debug, Clone, PartialEq)]
pub struct Outcome {
    pub passed: bool,
    pub message: String,
    pub suggestion: String,
    /// Severity override for this outcome; the rule's severity applies when `None`
    pub impact: Option<Severity>,
}

impl Outcome {
    pub fn pass() -> Self {
        Self {
            passed: true,
            message: String::new(),
            suggestion: String::new(),
            impact: None,
        }
    }

    pub fn fail(message: impl Into<String>, suggestion: impl Into<String>) -> Self {
        Self {
            passed: false,
            message: message.into(),
            suggestion: suggestion.into(),
            impact: None,
        }
    }

    /// Override the rule's default severity
    pub fn with_impact(mut self, severity: Severity) -> Self {
        self.impact = Some(severity);
        self
    }
}

/// Read-only state shared by all checks during a scan
pub struct RuleContext<'a> {
    pub tree: &'a dyn DocumentTree,
    pub indeterminate_contrast: IndeterminatePolicy,
}

impl<'a> RuleContext<'a> {
    pub fn new(tree: &'a dyn DocumentTree) -> Self {
        Self {
            tree,
            indeterminate_contrast: IndeterminatePolicy::default(),
        }
    }

    pub fn with_indeterminate_contrast(mut self, policy: IndeterminatePolicy) -> Self {
        self.indeterminate_contrast = policy;
        self
    }

    pub fn tag(&self, node: NodeId) -> &str {
        self.tree.tag_name(node)
    }

    pub fn attr(&self, node: NodeId, name: &str) -> Option<&str> {
        self.tree.attribute(node, name)
    }

    /// Attribute value with surrounding whitespace removed, `None` when blank
    pub fn non_empty_attr(&self, node: NodeId, name: &str) -> Option<&str> {
        self.tree
            .attribute(node, name)
            .map(str::trim)
            .filter(|v| !v.is_empty())
    }

    /// Lowercased `role` attribute
    pub fn role(&self, node: NodeId) -> Option<String> {
        self.non_empty_attr(node, "role").map(|r| r.to_ascii_lowercase())
    }

    /// Trimmed text content
    pub fn text(&self, node: NodeId) -> String {
        self.tree.text_content(node).trim().to_string()
    }

    /// Text of the elements referenced by an id-list attribute such as
    /// `aria-labelledby`
    pub fn referenced_text(&self, node: NodeId, attr: &str) -> String {
        self.attr(node, attr)
            .unwrap_or("")
            .split_whitespace()
            .filter_map(|id| self.tree.find_by_id(id))
            .map(|n| self.text(n))
            .filter(|t| !t.is_empty())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// The predicate half of a rule
pub trait Check: Send + Sync {
    fn check(&self, node: NodeId, ctx: &RuleContext<'_>) -> CheckResult;
}

impl<F> Check for F
where
    F: Fn(NodeId, &RuleContext<'_>) -> CheckResult + Send + Sync,
{
    fn check(&self, node: NodeId, ctx: &RuleContext<'_>) -> CheckResult {
        self(node, ctx)
    }
}

/// Static description of a rule
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RuleMeta {
    pub id: String,
    pub name: String,
    pub description: String,
    pub category: Category,
    pub wcag_criteria: Vec<String>,
    pub wcag_level: WcagLevel,
    pub severity: Severity,
    pub help_url: String,
    pub scope: RuleScope,
    /// Who is affected when the rule fails
    pub affects: ImpactAssessment,
}

impl RuleMeta {
    pub fn new(id: &str, name: &str, severity: Severity) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            description: String::new(),
            category: Category::Perceivable,
            wcag_criteria: Vec::new(),
            wcag_level: WcagLevel::A,
            severity,
            help_url: String::new(),
            scope: RuleScope::Element,
            affects: ImpactAssessment::default(),
        }
    }

    pub fn with_description(mut self, description: &str) -> Self {
        self.description = description.to_string();
        self
    }

    pub fn with_category(mut self, category: Category) -> Self {
        self.category = category;
        self
    }

    /// Set the WCAG criterion and level
    pub fn with_wcag(mut self, criterion: &str, level: WcagLevel) -> Self {
        self.wcag_criteria.push(criterion.to_string());
        self.wcag_level = level;
        self
    }

    pub fn with_help_url(mut self, url: &str) -> Self {
        self.help_url = url.to_string();
        self
    }

    pub fn document_scoped(mut self) -> Self {
        self.scope = RuleScope::Document;
        self
    }

    pub fn with_impact(mut self, impact: ImpactAssessment) -> Self {
        self.affects = impact;
        self
    }

    fn validate(&self) -> Result<(), RegistryError> {
        if self.id.trim().is_empty() {
            return Err(RegistryError::MissingId);
        }
        let missing = |field: &'static str| RegistryError::MissingField {
            rule: self.id.clone(),
            field,
        };
        if self.name.trim().is_empty() {
            return Err(missing("name"));
        }
        if self.description.trim().is_empty() {
            return Err(missing("description"));
        }
        if self.help_url.trim().is_empty() {
            return Err(missing("helpUrl"));
        }
        if self.wcag_criteria.iter().all(|c| c.trim().is_empty()) {
            return Err(RegistryError::NoCriteria(self.id.clone()));
        }
        Ok(())
    }
}

/// A registered compliance rule
pub struct Rule {
    pub meta: RuleMeta,
    check: Box<dyn Check>,
}

impl Rule {
    pub fn new(meta: RuleMeta, check: impl Check + 'static) -> Self {
        Self {
            meta,
            check: Box::new(check),
        }
    }

    pub fn id(&self) -> &str {
        &self.meta.id
    }

    /// Whether this rule is offered `node`
    pub fn applies_to(&self, node: NodeId, root: NodeId) -> bool {
        match self.meta.scope {
            RuleScope::Element => true,
            RuleScope::Document => node == root,
        }
    }

    pub fn check(&self, node: NodeId, ctx: &RuleContext<'_>) -> CheckResult {
        self.check.check(node, ctx)
    }
}

impl std::fmt::Debug for Rule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Rule").field("meta", &self.meta).finish_non_exhaustive()
    }
}

/// Immutable set of validated rules
#[derive(Debug, Default)]
pub struct RuleRegistry {
    rules: Vec<Rule>,
}

impl RuleRegistry {
    pub fn builder() -> RegistryBuilder {
        RegistryBuilder::default()
    }

    /// Registry holding every built-in rule
    pub fn builtin() -> Result<Self, RegistryError> {
        Self::builder().with_builtin_rules().build()
    }

    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    pub fn get(&self, id: &str) -> Option<&Rule> {
        self.rules.iter().find(|r| r.id() == id)
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

/// Collects rules and validates them on [`build`](RegistryBuilder::build)
#[derive(Default)]
pub struct RegistryBuilder {
    rules: Vec<Rule>,
    disabled: HashSet<String>,
    max_level: Option<WcagLevel>,
}

impl RegistryBuilder {
    pub fn register(mut self, rule: Rule) -> Self {
        self.rules.push(rule);
        self
    }

    pub fn with_builtin_rules(self) -> Self {
        builtin_rules().into_iter().fold(self, Self::register)
    }

    /// Leave out a rule by id
    pub fn disable(mut self, id: &str) -> Self {
        self.disabled.insert(id.to_string());
        self
    }

    /// Leave out rules above a conformance level
    pub fn max_level(mut self, level: WcagLevel) -> Self {
        self.max_level = Some(level);
        self
    }

    pub fn build(self) -> Result<RuleRegistry, RegistryError> {
        let mut seen = HashSet::new();
        for rule in &self.rules {
            rule.meta.validate()?;
            if !seen.insert(rule.meta.id.clone()) {
                return Err(RegistryError::DuplicateId(rule.meta.id.clone()));
            }
        }

        let max_level = self.max_level;
        let disabled = self.disabled;
        let rules: Vec<Rule> = self
            .rules
            .into_iter()
            .filter(|r| !disabled.contains(&r.meta.id))
            .filter(|r| max_level.map_or(true, |max| r.meta.wcag_level <= max))
            .collect();

        debug!("Rule registry built with {} rules", rules.len());
        Ok(RuleRegistry { rules })
    }
}

/// Every built-in rule
pub fn builtin_rules() -> Vec<Rule> {
    vec![
        images::image_alt_text(),
        forms::form_label(),
        headings::heading_order(),
        links::link_text(),
        aria::aria_name(),
        aria::aria_hidden_focus(),
        keyboard::keyboard_access(),
        keyboard::positive_tabindex(),
        color::color_contrast(),
        media::video_captions(),
        document::page_title(),
        document::html_lang(),
    ]
}

/// Link to the W3C "Understanding" document for a criterion slug
pub(crate) fn understanding_url(slug: &str) -> String {
    format!("https://www.w3.org/WAI/WCAG21/Understanding/{}.html", slug)
}
