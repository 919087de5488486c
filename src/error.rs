// SPDX-License-Identifier: PMPL-1.0-or-later
//! Error types for a11y-lens

use thiserror::Error;

pub type Result<T> = std::result::Result<T, LensError>;

/// Main error type. Only registry construction, configuration and input
/// loading surface errors; per-node and per-rule failures are recovered
/// inside the scan.
#[derive(Error, Debug)]
pub enum LensError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Rule registry error: {0}")]
    Registry(#[from] RegistryError),

    #[error("Unsupported input: {0}")]
    UnsupportedInput(String),
}

/// Malformed rule registration. Raised when the registry is built, never
/// during a scan.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RegistryError {
    #[error("rule is missing an id")]
    MissingId,

    #[error("rule `{rule}` is missing required field `{field}`")]
    MissingField { rule: String, field: &'static str },

    #[error("rule `{0}` declares no WCAG success criteria")]
    NoCriteria(String),

    #[error("rule id `{0}` is registered more than once")]
    DuplicateId(String),
}
