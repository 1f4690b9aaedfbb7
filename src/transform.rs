//! View transform between canvas space and screen space.
//!
//! `screen = canvas * scale + (translate_x, translate_y)`. Node positions are
//! always stored in canvas space; anything coming from pointer events has to
//! go through [`ViewTransform::screen_to_canvas`] first.

use serde::{Deserialize, Serialize};

pub const MIN_SCALE: f64 = 0.25;
pub const MAX_SCALE: f64 = 3.0;
pub const ZOOM_FACTOR: f64 = 1.1;

/// Affine zoom/pan transform of the canvas.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewTransform {
    pub scale: f64,
    pub translate_x: f64,
    pub translate_y: f64,
}

impl Default for ViewTransform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

/// Zoom limits and step applied by [`ViewTransform::zoom_in`] and friends.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ZoomLimits {
    pub min: f64,
    pub max: f64,
    pub factor: f64,
}

impl Default for ZoomLimits {
    fn default() -> Self {
        Self {
            min: MIN_SCALE,
            max: MAX_SCALE,
            factor: ZOOM_FACTOR,
        }
    }
}

impl ViewTransform {
    pub const IDENTITY: Self = Self {
        scale: 1.0,
        translate_x: 0.0,
        translate_y: 0.0,
    };

    pub fn new(scale: f64, translate_x: f64, translate_y: f64) -> Self {
        Self {
            scale,
            translate_x,
            translate_y,
        }
    }

    /// Convert a screen-space point to canvas space.
    pub fn screen_to_canvas(&self, x: f64, y: f64) -> (f64, f64) {
        let s = if self.scale > 0.0 { self.scale } else { 1.0 };
        ((x - self.translate_x) / s, (y - self.translate_y) / s)
    }

    /// Convert a canvas-space point to screen space.
    pub fn canvas_to_screen(&self, x: f64, y: f64) -> (f64, f64) {
        (
            x * self.scale + self.translate_x,
            y * self.scale + self.translate_y,
        )
    }

    /// Convert a screen-space length to canvas space.
    pub fn screen_len_to_canvas(&self, len: f64) -> f64 {
        if self.scale > 0.0 {
            len / self.scale
        } else {
            len
        }
    }

    /// Multiply the scale by `factor` and clamp it to the limits.
    pub fn zoom_by(&mut self, factor: f64, limits: &ZoomLimits) {
        self.scale = (self.scale * factor).clamp(limits.min, limits.max);
    }

    pub fn zoom_in(&mut self, limits: &ZoomLimits) {
        self.zoom_by(limits.factor, limits);
    }

    pub fn zoom_out(&mut self, limits: &ZoomLimits) {
        self.zoom_by(1.0 / limits.factor, limits);
    }

    /// Shift the view by a screen-space delta.
    pub fn pan_by(&mut self, dx: f64, dy: f64) {
        self.translate_x += dx;
        self.translate_y += dy;
    }

    pub fn reset(&mut self) {
        *self = Self::IDENTITY;
    }

    /// Clamp a restored scale into the limits, replacing non-finite values with 1.
    pub fn sanitized(self, limits: &ZoomLimits) -> Self {
        let scale = if self.scale.is_finite() {
            self.scale.clamp(limits.min, limits.max)
        } else {
            1.0
        };
        let finite_or_zero = |v: f64| if v.is_finite() { v } else { 0.0 };
        Self {
            scale,
            translate_x: finite_or_zero(self.translate_x),
            translate_y: finite_or_zero(self.translate_y),
        }
    }
}
