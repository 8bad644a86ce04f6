//! Logical-unit geometry for element layout.
//!
//! All layout queries against a scene element are in logical units
//! (CSS-pixel equivalents). Physical pixel dimensions only appear at the
//! capture surface, where the device scale is applied.

use serde::{Deserialize, Serialize};

/// A rectangle in logical units.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// A rect anchored at the origin.
    pub fn sized(width: f64, height: f64) -> Self {
        Self::new(0.0, 0.0, width, height)
    }

    /// Whether this rect covers no drawable area.
    pub fn is_empty(&self) -> bool {
        self.width <= 0.0 || self.height <= 0.0
    }

    /// Logical dimensions rounded to whole pixels, never below zero.
    pub fn logical_size(&self) -> (u32, u32) {
        (
            self.width.max(0.0).round() as u32,
            self.height.max(0.0).round() as u32,
        )
    }

    /// Physical dimensions under the given device scale.
    pub fn physical_size(&self, scale: f64) -> (u32, u32) {
        (
            (self.width.max(0.0) * scale).round() as u32,
            (self.height.max(0.0) * scale).round() as u32,
        )
    }
}
