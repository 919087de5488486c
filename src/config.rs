// SPDX-License-Identifier: PMPL-1.0-or-later
//! Configuration handling for a11y-lens

use crate::error::{LensError, Result};
use crate::issue::{Severity, WcagLevel};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Highest WCAG conformance level whose rules run
    #[serde(default = "default_level")]
    pub level: WcagLevel,

    /// URL reported when the document tree does not carry one
    #[serde(default)]
    pub url: Option<String>,

    #[serde(default)]
    pub rules: RuleConfig,

    #[serde(default)]
    pub contrast: ContrastConfig,

    #[serde(default)]
    pub snapshot: SnapshotConfig,

    #[serde(default)]
    pub overlay: OverlayConfig,

    #[serde(default)]
    pub log: LogConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            level: default_level(),
            url: None,
            rules: RuleConfig::default(),
            contrast: ContrastConfig::default(),
            snapshot: SnapshotConfig::default(),
            overlay: OverlayConfig::default(),
            log: LogConfig::default(),
        }
    }
}

fn default_level() -> WcagLevel {
    WcagLevel::AA
}

/// Rule selection
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RuleConfig {
    /// Rule ids to leave out of the registry
    #[serde(default)]
    pub disabled: Vec<String>,
}

/// How the contrast rule treats colors it cannot resolve
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IndeterminatePolicy {
    /// Treat as compliant (ratio 21:1)
    #[default]
    Pass,
    /// Report a minor "unable to verify" issue
    Flag,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ContrastConfig {
    #[serde(default)]
    pub indeterminate: IndeterminatePolicy,
}

/// Element snapshot limits
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SnapshotConfig {
    /// Characters of text kept per element snapshot
    #[serde(default = "default_max_text_len")]
    pub max_text_len: usize,

    /// Characters of markup kept per issue snippet
    #[serde(default = "default_max_snippet_len")]
    pub max_snippet_len: usize,
}

impl Default for SnapshotConfig {
    fn default() -> Self {
        Self {
            max_text_len: default_max_text_len(),
            max_snippet_len: default_max_snippet_len(),
        }
    }
}

fn default_max_text_len() -> usize {
    100
}

fn default_max_snippet_len() -> usize {
    200
}

/// Stroke pattern of an overlay border
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StrokeStyle {
    Solid,
    Dashed,
    Dotted,
}

/// Visual parameters of overlays for one severity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HighlightStyle {
    pub stroke_color: String,
    pub stroke_width: f64,
    pub stroke_style: StrokeStyle,
    pub fill_opacity: f64,
    pub z_index: u32,
}

impl HighlightStyle {
    fn new(color: &str, width: f64, style: StrokeStyle, opacity: f64, z_index: u32) -> Self {
        Self {
            stroke_color: color.to_string(),
            stroke_width: width,
            stroke_style: style,
            fill_opacity: opacity,
            z_index,
        }
    }
}

/// Per-severity overlay styles
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HighlightStyles {
    pub critical: HighlightStyle,
    pub serious: HighlightStyle,
    pub moderate: HighlightStyle,
    pub minor: HighlightStyle,
}

impl HighlightStyles {
    pub fn for_severity(&self, severity: Severity) -> &HighlightStyle {
        match severity {
            Severity::Critical => &self.critical,
            Severity::Serious => &self.serious,
            Severity::Moderate => &self.moderate,
            Severity::Minor => &self.minor,
        }
    }
}

impl Default for HighlightStyles {
    fn default() -> Self {
        Self {
            critical: HighlightStyle::new("#dc2626", 3.0, StrokeStyle::Solid, 0.15, 10004),
            serious: HighlightStyle::new("#ea580c", 2.0, StrokeStyle::Solid, 0.12, 10003),
            moderate: HighlightStyle::new("#ca8a04", 2.0, StrokeStyle::Dashed, 0.10, 10002),
            minor: HighlightStyle::new("#2563eb", 1.0, StrokeStyle::Dotted, 0.08, 10001),
        }
    }
}

/// Overlay manager timing and geometry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OverlayConfig {
    /// Delay before a tooltip hides after the pointer leaves
    #[serde(default = "default_tooltip_hide_delay_ms")]
    pub tooltip_hide_delay_ms: u64,

    /// How long a clicked overlay's element stays outlined
    #[serde(default = "default_flash_duration_ms")]
    pub flash_duration_ms: u64,

    /// Coalesce viewport events arriving within this window; 0 repositions on every event
    #[serde(default)]
    pub reposition_throttle_ms: u64,

    #[serde(default = "default_tooltip_width")]
    pub tooltip_width: f64,

    #[serde(default = "default_tooltip_height")]
    pub tooltip_height: f64,

    /// Gap between an overlay and its tooltip, and between tooltip and viewport edge
    #[serde(default = "default_tooltip_margin")]
    pub tooltip_margin: f64,

    #[serde(default)]
    pub styles: HighlightStyles,
}

impl Default for OverlayConfig {
    fn default() -> Self {
        Self {
            tooltip_hide_delay_ms: default_tooltip_hide_delay_ms(),
            flash_duration_ms: default_flash_duration_ms(),
            reposition_throttle_ms: 0,
            tooltip_width: default_tooltip_width(),
            tooltip_height: default_tooltip_height(),
            tooltip_margin: default_tooltip_margin(),
            styles: HighlightStyles::default(),
        }
    }
}

fn default_tooltip_hide_delay_ms() -> u64 {
    300
}

fn default_flash_duration_ms() -> u64 {
    2000
}

fn default_tooltip_width() -> f64 {
    320.0
}

fn default_tooltip_height() -> f64 {
    180.0
}

fn default_tooltip_margin() -> f64 {
    8.0
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "warn".to_string()
}

fn is_toml(path: &Path) -> bool {
    path.extension().map(|e| e == "toml").unwrap_or(false)
}

/// Load configuration from a path; a missing file yields defaults
pub fn load_config(path: &Path) -> Result<Config> {
    if !path.exists() {
        debug!("Config file not found at {}, using defaults", path.display());
        return Ok(Config::default());
    }

    let content = std::fs::read_to_string(path)?;

    let config: Config = if is_toml(path) {
        toml::from_str(&content)?
    } else {
        serde_yaml::from_str(&content)?
    };

    debug!(?config, "Loaded configuration");
    Ok(config)
}

/// Get the default config path for a project
pub fn default_config_path() -> PathBuf {
    PathBuf::from(".a11y-lens.yml")
}

/// Write default configuration to a file
pub fn write_default_config(path: &Path) -> Result<()> {
    let config = Config::default();

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    let content = if is_toml(path) {
        toml::to_string_pretty(&config).map_err(|e| LensError::Config(e.to_string()))?
    } else {
        serde_yaml::to_string(&config)?
    };

    std::fs::write(path, content)?;
    Ok(())
}
