//! Viewport module for pan/zoom transforms.
//!
//! Every conversion between screen pixels and canvas units goes through
//! [`Viewport`]; callers never derive `1/scale` themselves.

use kurbo::{Affine, Point, Vec2};
use serde::{Deserialize, Serialize};

/// Scale that corresponds to "100%" in the UI.
pub const DEFAULT_SCALE: f64 = 1.0;

/// Inclusive bounds for the viewport scale.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ZoomRange {
    pub min: f64,
    pub max: f64,
}

impl ZoomRange {
    /// Range used by zoom buttons, keyboard shortcuts and the wheel.
    pub const CONTROLS: Self = Self { min: 0.25, max: 2.0 };
    /// Range used by touch pinch gestures.
    pub const PINCH: Self = Self { min: 0.1, max: 3.0 };

    pub fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    /// Clamp a scale into this range.
    pub fn clamp(&self, scale: f64) -> f64 {
        scale.clamp(self.min, self.max)
    }
}

/// Viewport manages the view transform for the board.
///
/// It handles panning (translation) and zooming (scaling) operations,
/// converting between screen coordinates and canvas coordinates:
/// `screen = canvas * scale + pan`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    /// Current translation offset in screen pixels.
    pub pan: Vec2,
    /// Current zoom level (1.0 = 100%).
    pub scale: f64,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            pan: Vec2::ZERO,
            scale: DEFAULT_SCALE,
        }
    }
}

impl Viewport {
    /// Create a viewport with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a viewport with an explicit pan and scale.
    pub fn with_pan_and_scale(pan: Vec2, scale: f64) -> Self {
        Self { pan, scale }
    }

    /// Get the affine transform for rendering.
    ///
    /// This transform converts canvas coordinates to screen coordinates.
    pub fn transform(&self) -> Affine {
        Affine::translate(self.pan) * Affine::scale(self.scale)
    }

    /// Convert a screen point to canvas coordinates.
    pub fn to_canvas(&self, screen_point: Point) -> Point {
        Point::new(
            (screen_point.x - self.pan.x) / self.scale,
            (screen_point.y - self.pan.y) / self.scale,
        )
    }

    /// Convert a canvas point to screen coordinates.
    pub fn to_screen(&self, canvas_point: Point) -> Point {
        Point::new(
            canvas_point.x * self.scale + self.pan.x,
            canvas_point.y * self.scale + self.pan.y,
        )
    }

    /// Convert a screen-space displacement into canvas units.
    pub fn delta_to_canvas(&self, screen_delta: Vec2) -> Vec2 {
        screen_delta / self.scale
    }

    /// Convert a screen-space length (e.g. a hit radius in pixels) into canvas units.
    pub fn len_to_canvas(&self, screen_len: f64) -> f64 {
        screen_len / self.scale
    }

    /// Factor that keeps strokes and arrowheads visually constant across zoom levels.
    pub fn stroke_scale(&self) -> f64 {
        1.0 / self.scale
    }

    /// Pan the viewport by a delta in screen coordinates.
    pub fn pan_by(&mut self, delta: Vec2) {
        self.pan += delta;
    }

    /// Set the scale, keeping the canvas point under `screen_point` fixed.
    ///
    /// The requested scale is clamped into `range` first. Returns `true`
    /// when the viewport changed.
    pub fn zoom_to(&mut self, screen_point: Point, scale: f64, range: ZoomRange) -> bool {
        let new_scale = range.clamp(scale);
        if (new_scale - self.scale).abs() < f64::EPSILON {
            return false;
        }

        // pan' = p - (p - pan) * (s1 / s0)
        let ratio = new_scale / self.scale;
        let p = screen_point.to_vec2();
        self.pan = p - (p - self.pan) * ratio;
        self.scale = new_scale;
        true
    }

    /// Multiply the scale by `factor`, keeping the given screen point fixed.
    pub fn zoom_at(&mut self, screen_point: Point, factor: f64, range: ZoomRange) -> bool {
        self.zoom_to(screen_point, self.scale * factor, range)
    }

    /// Re-clamp the current scale into `range` without moving the origin.
    pub fn clamp_scale(&mut self, range: ZoomRange) {
        self.scale = range.clamp(self.scale);
    }
}
