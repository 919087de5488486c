// SPDX-License-Identifier: PMPL-1.0-or-later
//! Tooltip placement.
//!
//! The tooltip sits below its overlay. When that would run past the bottom of
//! the viewport it flips above, and the result is clamped so it stays inside
//! the viewport with `margin` to spare. All coordinates are document
//! coordinates.

use super::layer::Placement;
use crate::tree::{Rect, Viewport};

/// Position a `width` x `height` tooltip next to `anchor`
pub fn place(anchor: Rect, width: f64, height: f64, viewport: Viewport, margin: f64) -> (Rect, Placement) {
    let top = viewport.scroll_y;
    let bottom = viewport.scroll_y + viewport.height;
    let left = viewport.scroll_x;
    let right = viewport.scroll_x + viewport.width;

    let below = anchor.bottom() + margin;
    let (y, placement) = if below + height > bottom - margin {
        (anchor.y - margin - height, Placement::Above)
    } else {
        (below, Placement::Below)
    };

    let y = clamp(y, top + margin, bottom - height - margin);
    let x = clamp(anchor.x, left + margin, right - width - margin);

    (Rect::new(x, y, width, height), placement)
}

/// Clamp into `[min, max]`, favouring `min` when the range is empty
fn clamp(value: f64, min: f64, max: f64) -> f64 {
    value.min(max).max(min)
}
