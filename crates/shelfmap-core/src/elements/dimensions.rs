//! Default element sizes.
//!
//! Everything that needs an element's width or height goes through
//! [`DimensionTable::effective_size`].

use super::{Element, ElementKind, Orientation, Payload};
use kurbo::{Point, Rect, Size};
use serde::{Deserialize, Serialize};

/// Default sizes keyed by element kind and, for text, orientation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DimensionTable {
    pub text_horizontal: Size,
    pub text_vertical: Size,
    pub book: Size,
    pub image: Size,
    pub link: Size,
}

impl Default for DimensionTable {
    fn default() -> Self {
        Self {
            text_horizontal: Size::new(160.0, 128.0),
            text_vertical: Size::new(140.0, 200.0),
            book: Size::new(140.0, 220.0),
            image: Size::new(200.0, 150.0),
            link: Size::new(240.0, 160.0),
        }
    }
}

impl DimensionTable {
    /// Default size for a kind/orientation pair.
    ///
    /// Lines have no intrinsic size; their extent comes from the payload.
    pub fn defaults(&self, kind: ElementKind, orientation: Orientation) -> Size {
        match (kind, orientation) {
            (ElementKind::Text, Orientation::Horizontal) => self.text_horizontal,
            (ElementKind::Text, Orientation::Vertical) => self.text_vertical,
            (ElementKind::Book, _) => self.book,
            (ElementKind::Image, _) => self.image,
            (ElementKind::Link, _) => self.link,
            (ElementKind::Line, _) => Size::ZERO,
        }
    }

    /// Explicit width/height when present, table defaults otherwise.
    pub fn effective_size(&self, element: &Element) -> Size {
        if let Payload::Line(line) = &element.payload {
            return line.bounds().size();
        }
        let defaults = self.defaults(element.kind(), element.orientation);
        Size::new(
            element.width.unwrap_or(defaults.width),
            element.height.unwrap_or(defaults.height),
        )
    }

    /// Resolved bounding box in canvas units.
    pub fn element_rect(&self, element: &Element) -> Rect {
        match &element.payload {
            Payload::Line(line) => line.bounds(),
            _ => Rect::from_origin_size(
                Point::new(element.left, element.top),
                self.effective_size(element),
            ),
        }
    }
}
