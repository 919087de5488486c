// SPDX-License-Identifier: PMPL-1.0-or-later
//! Color contrast calculator - WCAG 1.4.3 Contrast (Minimum), Level AA
//!
//! Resolves the foreground color from an element's computed style and the
//! background by walking the element and its ancestors until a
//! non-transparent background is found (white when none is).
//! - Normal text: 4.5:1
//! - Large text (>= 24px, or >= 18.5px bold): 3:1
//!
//! A color that cannot be parsed yields [`INDETERMINATE_RATIO`], which
//! never fails the check.

use crate::tree::{ComputedStyle, DocumentTree, NodeId};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

/// Ratio reported when either color is indeterminate
pub const INDETERMINATE_RATIO: f64 = 21.0;

/// Minimum ratio for normal text (AA)
pub const NORMAL_TEXT_MIN: f64 = 4.5;

/// Minimum ratio for large text (AA)
pub const LARGE_TEXT_MIN: f64 = 3.0;

const WHITE: Rgba = Rgba { r: 255, g: 255, b: 255, a: 1.0 };

static RGB_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^rgba?\(\s*(\d+(?:\.\d+)?)\s*[, ]\s*(\d+(?:\.\d+)?)\s*[, ]\s*(\d+(?:\.\d+)?)\s*(?:[,/]\s*([\d.]+%?)\s*)?\)$")
        .expect("valid regex")
});

/// An sRGB color with alpha in `0.0..=1.0`
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: f64,
}

impl Rgba {
    pub fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    pub fn is_transparent(&self) -> bool {
        self.a <= 0.0
    }
}

/// Parse a CSS hex color (#rgb, #rgba, #rrggbb, #rrggbbaa)
pub fn parse_hex_color(hex: &str) -> Option<Rgba> {
    let hex = hex.trim_start_matches('#');
    if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }
    let channel = |s: &str| u8::from_str_radix(s, 16).ok();
    let short = |i: usize| channel(&hex[i..i + 1].repeat(2));
    match hex.len() {
        3 => Some(Rgba::rgb(short(0)?, short(1)?, short(2)?)),
        4 => Some(Rgba { a: f64::from(short(3)?) / 255.0, ..Rgba::rgb(short(0)?, short(1)?, short(2)?) }),
        6 => Some(Rgba::rgb(channel(&hex[0..2])?, channel(&hex[2..4])?, channel(&hex[4..6])?)),
        8 => Some(Rgba {
            a: f64::from(channel(&hex[6..8])?) / 255.0,
            ..Rgba::rgb(channel(&hex[0..2])?, channel(&hex[2..4])?, channel(&hex[4..6])?)
        }),
        _ => None,
    }
}

/// Parse an rgb() or rgba() color
pub fn parse_rgb_color(value: &str) -> Option<Rgba> {
    let caps = RGB_RE.captures(value)?;
    let channel = |i: usize| -> Option<u8> {
        let v: f64 = caps[i].parse().ok()?;
        (0.0..=255.0).contains(&v).then(|| v.round() as u8)
    };
    let a = match caps.get(4) {
        Some(m) => {
            let raw = m.as_str();
            match raw.strip_suffix('%') {
                Some(pct) => pct.parse::<f64>().ok()? / 100.0,
                None => raw.parse::<f64>().ok()?,
            }
        }
        None => 1.0,
    };
    Some(Rgba { r: channel(1)?, g: channel(2)?, b: channel(3)?, a: a.clamp(0.0, 1.0) })
}

/// Parse any supported CSS color value
pub fn parse_color(value: &str) -> Option<Rgba> {
    let trimmed = value.trim().to_lowercase();
    if trimmed.starts_with('#') {
        parse_hex_color(&trimmed)
    } else if trimmed.starts_with("rgb") {
        parse_rgb_color(&trimmed)
    } else {
        parse_named_color(&trimmed)
    }
}

/// Parse a named CSS color
pub fn parse_named_color(name: &str) -> Option<Rgba> {
    let (r, g, b) = match name {
        "transparent" => return Some(Rgba { r: 0, g: 0, b: 0, a: 0.0 }),
        "white" => (255, 255, 255),
        "black" => (0, 0, 0),
        "red" => (255, 0, 0),
        "green" => (0, 128, 0),
        "blue" => (0, 0, 255),
        "yellow" => (255, 255, 0),
        "gray" | "grey" => (128, 128, 128),
        "darkgray" | "darkgrey" => (169, 169, 169),
        "lightgray" | "lightgrey" => (211, 211, 211),
        "dimgray" | "dimgrey" => (105, 105, 105),
        "silver" => (192, 192, 192),
        "maroon" => (128, 0, 0),
        "olive" => (128, 128, 0),
        "lime" => (0, 255, 0),
        "aqua" | "cyan" => (0, 255, 255),
        "teal" => (0, 128, 128),
        "navy" => (0, 0, 128),
        "fuchsia" | "magenta" => (255, 0, 255),
        "purple" => (128, 0, 128),
        "orange" => (255, 165, 0),
        "pink" => (255, 192, 203),
        "brown" => (165, 42, 42),
        "whitesmoke" => (245, 245, 245),
        "gainsboro" => (220, 220, 220),
        _ => return None,
    };
    Some(Rgba::rgb(r, g, b))
}

/// Calculate relative luminance per WCAG 2.x
/// <https://www.w3.org/TR/WCAG21/#dfn-relative-luminance>
pub fn relative_luminance(r: u8, g: u8, b: u8) -> f64 {
    let srgb = [r, g, b].map(|c| {
        let v = c as f64 / 255.0;
        if v <= 0.04045 {
            v / 12.92
        } else {
            ((v + 0.055) / 1.055).powf(2.4)
        }
    });
    0.2126 * srgb[0] + 0.7152 * srgb[1] + 0.0722 * srgb[2]
}

/// Calculate contrast ratio between two colors
/// Returns a ratio >= 1.0 (e.g., 4.5, 7.0, 21.0)
pub fn contrast_ratio(fg: Rgba, bg: Rgba) -> f64 {
    let l1 = relative_luminance(fg.r, fg.g, fg.b);
    let l2 = relative_luminance(bg.r, bg.g, bg.b);
    let (lighter, darker) = if l1 > l2 { (l1, l2) } else { (l2, l1) };
    (lighter + 0.05) / (darker + 0.05)
}

/// Font size in CSS pixels. `pt` converts at 96dpi; `em`/`rem` assume a
/// 16px base. Unparseable sizes count as 16px.
pub fn font_size_px(value: &str) -> f64 {
    let v = value.trim().to_lowercase();
    let parse = |s: &str| s.trim().parse::<f64>().ok();
    let px = if let Some(n) = v.strip_suffix("px") {
        parse(n)
    } else if let Some(n) = v.strip_suffix("pt") {
        parse(n).map(|p| p * 4.0 / 3.0)
    } else if let Some(n) = v.strip_suffix("rem") {
        parse(n).map(|e| e * 16.0)
    } else if let Some(n) = v.strip_suffix("em") {
        parse(n).map(|e| e * 16.0)
    } else {
        parse(&v)
    };
    px.unwrap_or(16.0)
}

/// Numeric font weight; keywords map to their CSS values
pub fn font_weight(value: &str) -> u16 {
    match value.trim().to_lowercase().as_str() {
        "bold" | "bolder" => 700,
        "normal" => 400,
        "lighter" => 300,
        other => other.parse::<f64>().map(|w| w as u16).unwrap_or(400),
    }
}

/// Large text: >= 24px, or >= 18.5px at weight 700 or heavier
pub fn is_large_text(style: &ComputedStyle) -> bool {
    let size = font_size_px(&style.font_size);
    size >= 24.0 || (size >= 18.5 && font_weight(&style.font_weight) >= 700)
}

/// Minimum passing ratio for the given text size
pub fn required_ratio(large_text: bool) -> f64 {
    if large_text { LARGE_TEXT_MIN } else { NORMAL_TEXT_MIN }
}

/// Full result of a contrast evaluation
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContrastResult {
    pub ratio: f64,
    pub required: f64,
    pub large_text: bool,
    pub foreground: Option<Rgba>,
    pub background: Option<Rgba>,
}

impl ContrastResult {
    /// Both colors were resolved
    pub fn is_determinate(&self) -> bool {
        self.foreground.is_some() && self.background.is_some()
    }

    pub fn passes(&self) -> bool {
        self.ratio >= self.required
    }
}

/// Background of `node`: its own or the nearest ancestor's non-transparent
/// background color, white when none. `None` when a background on the
/// chain cannot be parsed.
pub fn resolve_background<T: DocumentTree + ?Sized>(tree: &T, node: NodeId) -> Option<Rgba> {
    let mut current = Some(node);
    while let Some(n) = current {
        if tree.is_element(n) {
            let color = parse_color(&tree.computed_style(n).background_color)?;
            if !color.is_transparent() {
                return Some(color);
            }
        }
        current = tree.parent(n);
    }
    Some(WHITE)
}

/// Evaluate contrast for the text of `node`
pub fn evaluate<T: DocumentTree + ?Sized>(tree: &T, node: NodeId) -> ContrastResult {
    let style = tree.computed_style(node);
    let large_text = is_large_text(&style);
    let foreground = parse_color(&style.color).filter(|c| !c.is_transparent());
    let background = resolve_background(tree, node);

    let ratio = match (foreground, background) {
        (Some(fg), Some(bg)) => contrast_ratio(fg, bg),
        _ => INDETERMINATE_RATIO,
    };

    ContrastResult {
        ratio,
        required: required_ratio(large_text),
        large_text,
        foreground,
        background,
    }
}

/// Contrast ratio of the text of `node` against its resolved background
pub fn ratio<T: DocumentTree + ?Sized>(tree: &T, node: NodeId) -> f64 {
    evaluate(tree, node).ratio
}
