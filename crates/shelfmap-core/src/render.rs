//! Rendering seam for connection arrows.
//!
//! The engine resolves where arrows start and end; drawing the curve and the
//! arrowhead is up to the host.

use crate::connection::Anchor;
use crate::elements::ElementId;
use kurbo::Point;

/// Screen-space endpoints of one arrow.
#[derive(Debug, Clone, PartialEq)]
pub struct ArrowGeometry {
    /// `None` for the temporary arrow of an in-progress connection.
    pub connection_id: Option<ElementId>,
    /// Start anchor position in screen pixels.
    pub start: Point,
    /// End anchor (or cursor) position in screen pixels.
    pub end: Point,
    pub start_anchor: Anchor,
    /// `None` while the temporary arrow is not over a target.
    pub end_anchor: Option<Anchor>,
    /// Multiply stroke widths and arrowhead sizes by this to keep them
    /// visually constant across zoom levels.
    pub stroke_scale: f64,
}

/// Draws connection arrows.
pub trait ArrowRenderer {
    fn draw_arrow(&mut self, arrow: &ArrowGeometry);
}

/// Collects arrows instead of drawing them. Handy for headless hosts.
impl ArrowRenderer for Vec<ArrowGeometry> {
    fn draw_arrow(&mut self, arrow: &ArrowGeometry) {
        self.push(arrow.clone());
    }
}
