// SPDX-License-Identifier: PMPL-1.0-or-later
//! a11y-lens - WCAG scan-and-highlight pipeline
//!
//! Walks a rendered document tree once, runs a registry of compliance rules
//! against every element, aggregates the failures into a scored report, and
//! manages interactive overlays that mark each flagged element.
//!
//! ## Pipeline
//!
//! Walker → Evaluator → (Rule Registry, Contrast Calculator) → Aggregator →
//! Report → Overlay Manager.
//!
//! ## Rules
//!
//! - **image-alt-text** (1.1.1): Image alternative text
//! - **form-label** (1.3.1/4.1.2): Form controls need a label
//! - **heading-order** (1.3.1): No skipped heading levels
//! - **link-text** (2.4.4): Descriptive link text
//! - **aria-name** / **aria-hidden-focus** (4.1.2): Accessible names for ARIA widgets
//! - **keyboard-access** / **positive-tabindex** (2.1.1/2.4.3): Keyboard reachability
//! - **color-contrast** (1.4.3): Text contrast ratio
//! - **video-captions** (1.2.2): Captions for video
//! - **page-title** / **html-lang** (2.4.2/3.1.1): Document-level checks
//!
//! ## Example
//!
//! ```
//! use a11y_lens::config::Config;
//! use a11y_lens::scanner::Scanner;
//! use a11y_lens::tree::TreeBuilder;
//!
//! let mut b = TreeBuilder::new("html");
//! let body = b.element(b.root(), "body");
//! b.element(body, "img");
//! let tree = b.build();
//!
//! let report = Scanner::new(Config::default()).unwrap().scan(&tree);
//! assert!(report.by_rule("image-alt-text").len() == 1);
//! ```

pub mod config;
pub mod contrast;
pub mod error;
pub mod evaluator;
pub mod html;
pub mod issue;
pub mod overlay;
pub mod report;
pub mod rules;
pub mod scanner;
pub mod session;
pub mod tree;
pub mod walker;
