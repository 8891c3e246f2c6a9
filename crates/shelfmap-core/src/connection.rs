//! Connections between elements and their anchor geometry.

use crate::config::EngineConfig;
use crate::elements::{Element, ElementId, new_id};
use kurbo::{Point, Rect};
use serde::{Deserialize, Serialize};

/// Attachment side on an element's bounding box.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Anchor {
    Top,
    Right,
    Bottom,
    Left,
}

impl Anchor {
    /// All anchors in hit-test order.
    pub const ALL: [Anchor; 4] = [Anchor::Top, Anchor::Right, Anchor::Bottom, Anchor::Left];

    /// Midpoint of the matching edge of `rect`.
    pub fn edge_midpoint(self, rect: Rect) -> Point {
        let center = rect.center();
        match self {
            Anchor::Top => Point::new(center.x, rect.y0),
            Anchor::Right => Point::new(rect.x1, center.y),
            Anchor::Bottom => Point::new(center.x, rect.y1),
            Anchor::Left => Point::new(rect.x0, center.y),
        }
    }
}

/// Directed link between two elements.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Connection {
    pub id: ElementId,
    pub start_element_id: ElementId,
    pub end_element_id: ElementId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_anchor: Option<Anchor>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_anchor: Option<Anchor>,
}

impl Connection {
    /// Create a connection with a fresh id and default anchors.
    pub fn new(start: impl Into<ElementId>, end: impl Into<ElementId>) -> Self {
        Self {
            id: new_id(),
            start_element_id: start.into(),
            end_element_id: end.into(),
            start_anchor: None,
            end_anchor: None,
        }
    }

    pub fn with_anchors(mut self, start: Anchor, end: Anchor) -> Self {
        self.start_anchor = Some(start);
        self.end_anchor = Some(end);
        self
    }

    /// Start anchor, `Right` when unspecified.
    pub fn start_anchor(&self) -> Anchor {
        self.start_anchor.unwrap_or(Anchor::Right)
    }

    /// End anchor, `Left` when unspecified.
    pub fn end_anchor(&self) -> Anchor {
        self.end_anchor.unwrap_or(Anchor::Left)
    }

    /// Check whether either endpoint refers to `element_id`.
    pub fn references(&self, element_id: &str) -> bool {
        self.start_element_id == element_id || self.end_element_id == element_id
    }
}

/// Position of an anchor handle for `element` whose resolved bounds are `rect`.
///
/// Anchors sit outside the bounds so they do not overlap resize handles.
/// Books push them further out, and the bottom one below the caption.
pub fn anchor_point(element: &Element, rect: Rect, anchor: Anchor, config: &EngineConfig) -> Point {
    let offset = if element.is_book() {
        config.book_anchor_offset
    } else {
        config.anchor_offset
    };
    let mid = anchor.edge_midpoint(rect);
    match anchor {
        Anchor::Top => Point::new(mid.x, mid.y - offset),
        Anchor::Right => Point::new(mid.x + offset, mid.y),
        Anchor::Bottom if element.is_book() => {
            Point::new(mid.x, mid.y + offset + config.book_caption_height)
        }
        Anchor::Bottom => Point::new(mid.x, mid.y + offset),
        Anchor::Left => Point::new(mid.x - offset, mid.y),
    }
}

/// Anchor whose edge midpoint is closest to `point`. The first anchor wins ties.
pub fn nearest_anchor(rect: Rect, point: Point) -> Anchor {
    let mut best = Anchor::Top;
    let mut best_dist = f64::INFINITY;
    for anchor in Anchor::ALL {
        let dist = anchor.edge_midpoint(rect).distance_squared(point);
        if dist < best_dist {
            best = anchor;
            best_dist = dist;
        }
    }
    best
}
