//! Kind-specific element data.

use kurbo::{Point, Rect, Vec2};
use serde::{Deserialize, Serialize};

/// Free-form text note.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TextPayload {
    /// Raw label source; rendering is up to the host.
    pub content: String,
}

/// Book cover card with a title/author caption.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct BookPayload {
    pub title: String,
    pub author: String,
    pub cover_url: Option<String>,
    pub isbn: Option<String>,
}

/// Freehand straight line. Geometry lives here, not in the element position.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LinePayload {
    /// Start point in canvas units.
    pub start: Point,
    /// End point in canvas units.
    pub end: Point,
    /// Stroke width in canvas units.
    #[serde(default = "default_stroke_width")]
    pub stroke_width: f64,
}

fn default_stroke_width() -> f64 {
    2.0
}

impl LinePayload {
    pub fn new(start: Point, end: Point) -> Self {
        Self {
            start,
            end,
            stroke_width: default_stroke_width(),
        }
    }

    /// Bounding box of the two endpoints.
    pub fn bounds(&self) -> Rect {
        Rect::from_points(self.start, self.end)
    }

    pub fn translate(&mut self, delta: Vec2) {
        self.start += delta;
        self.end += delta;
    }
}

/// Embedded image.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ImagePayload {
    pub url: String,
    pub alt: Option<String>,
}

/// Web link preview card.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LinkPayload {
    pub url: String,
    pub title: Option<String>,
    pub description: Option<String>,
    pub image_url: Option<String>,
}
