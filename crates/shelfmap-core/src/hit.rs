//! Element-at-point queries.

use crate::board::Board;
use crate::elements::{DimensionTable, Element, ElementId, Payload};
use kurbo::{Line, ParamCurveNearest, Point};

/// Answers "which element is under this canvas point".
///
/// Hosts with their own scene graph can supply an implementation; the engine
/// falls back to [`BoundsHitTester`].
pub trait HitTester {
    /// Topmost element containing `point` among those `accept` allows.
    ///
    /// Rejected elements are skipped, so one lying on top does not hide
    /// an accepted element underneath.
    fn element_at(
        &self,
        board: &Board,
        dimensions: &DimensionTable,
        point: Point,
        accept: &dyn Fn(&Element) -> bool,
    ) -> Option<ElementId>;
}

/// Predicate that accepts every element.
pub fn any_element(_: &Element) -> bool {
    true
}

/// Hit-tests resolved bounding boxes front to back.
#[derive(Debug, Clone, Copy)]
pub struct BoundsHitTester {
    /// Distance from a line segment that still counts as a hit, in canvas units.
    pub line_tolerance: f64,
}

impl Default for BoundsHitTester {
    fn default() -> Self {
        Self { line_tolerance: 6.0 }
    }
}

impl HitTester for BoundsHitTester {
    fn element_at(
        &self,
        board: &Board,
        dimensions: &DimensionTable,
        point: Point,
        accept: &dyn Fn(&Element) -> bool,
    ) -> Option<ElementId> {
        // Reverse z-order (front to back) for selection priority
        board
            .elements
            .iter()
            .rev()
            .filter(|&e| accept(e))
            .find(|e| match &e.payload {
                Payload::Line(line) => {
                    let segment = Line::new(line.start, line.end);
                    let nearest = segment.nearest(point, 1e-6);
                    let tolerance = self.line_tolerance.max(line.stroke_width / 2.0);
                    nearest.distance_sq <= tolerance * tolerance
                }
                _ => dimensions.element_rect(e).contains(point),
            })
            .map(|e| e.id.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::elements::{Element, LinePayload};

    fn board() -> Board {
        let mut board = Board::new();
        board.insert_element(Element::text("back", 0.0, 0.0).with_id("back")).unwrap();
        board.insert_element(Element::text("front", 50.0, 50.0).with_id("front")).unwrap();
        board
            .insert_element(
                Element::new(
                    Payload::Line(LinePayload::new(Point::new(500.0, 500.0), Point::new(700.0, 500.0))),
                    0.0,
                    0.0,
                )
                .with_id("line"),
            )
            .unwrap();
        board
    }

    #[test]
    fn test_topmost_wins() {
        let tester = BoundsHitTester::default();
        let dims = DimensionTable::default();
        let hit = tester.element_at(&board(), &dims, Point::new(60.0, 60.0), &any_element);
        assert_eq!(hit.as_deref(), Some("front"));
    }

    #[test]
    fn test_rejected_element_falls_through() {
        let tester = BoundsHitTester::default();
        let dims = DimensionTable::default();
        let hit = tester.element_at(&board(), &dims, Point::new(60.0, 60.0), &|e| e.id != "front");
        assert_eq!(hit.as_deref(), Some("back"));
    }

    #[test]
    fn test_skipping_lines_finds_element_below() {
        let tester = BoundsHitTester::default();
        let dims = DimensionTable::default();
        let mut board = board();
        board
            .insert_element(
                Element::new(
                    Payload::Line(LinePayload::new(Point::new(0.0, 60.0), Point::new(300.0, 60.0))),
                    0.0,
                    0.0,
                )
                .with_id("over"),
            )
            .unwrap();

        let point = Point::new(100.0, 60.0);
        assert_eq!(tester.element_at(&board, &dims, point, &any_element).as_deref(), Some("over"));
        assert_eq!(
            tester.element_at(&board, &dims, point, &|e| !e.is_line()).as_deref(),
            Some("front")
        );
    }

    #[test]
    fn test_empty_canvas() {
        let tester = BoundsHitTester::default();
        let dims = DimensionTable::default();
        assert!(tester.element_at(&board(), &dims, Point::new(1500.0, 10.0), &any_element).is_none());
    }

    #[test]
    fn test_line_hit_uses_segment_distance() {
        let tester = BoundsHitTester::default();
        let dims = DimensionTable::default();
        let board = board();
        assert_eq!(
            tester.element_at(&board, &dims, Point::new(600.0, 504.0), &any_element).as_deref(),
            Some("line")
        );
        assert!(tester.element_at(&board, &dims, Point::new(600.0, 520.0), &any_element).is_none());
    }
}
