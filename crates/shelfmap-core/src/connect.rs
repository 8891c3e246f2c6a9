//! Drawing a new connection from an anchor.

use crate::board::Board;
use crate::config::EngineConfig;
use crate::connection::{Anchor, Connection, anchor_point, nearest_anchor};
use crate::elements::{Element, ElementId};
use crate::hit::HitTester;
use kurbo::{Point, Rect};

/// Anchor of `element` (with bounds `rect`) within `tolerance` of `point`.
///
/// Lines expose no anchors.
pub fn hit_test_anchors(
    element: &Element,
    rect: Rect,
    point: Point,
    tolerance: f64,
    config: &EngineConfig,
) -> Option<Anchor> {
    if element.is_line() {
        return None;
    }
    Anchor::ALL.into_iter().find(|&anchor| {
        anchor_point(element, rect, anchor, config).distance_squared(point) <= tolerance * tolerance
    })
}

/// State of an in-progress connection gesture.
#[derive(Debug, Clone, PartialEq)]
pub struct ConnectState {
    pub source_id: ElementId,
    pub source_anchor: Anchor,
    /// Temporary endpoint in canvas units.
    pub cursor: Point,
    /// Element under the cursor and its nearest anchor, if any.
    pub target: Option<(ElementId, Anchor)>,
}

impl ConnectState {
    pub fn begin(source_id: ElementId, source_anchor: Anchor, cursor: Point) -> Self {
        Self {
            source_id,
            source_anchor,
            cursor,
            target: None,
        }
    }

    /// Move the temporary endpoint and re-resolve the provisional target.
    pub fn update(
        &mut self,
        cursor: Point,
        board: &Board,
        config: &EngineConfig,
        hit_tester: &dyn HitTester,
    ) {
        self.cursor = cursor;
        let source_id = self.source_id.as_str();
        let connectable = |e: &Element| !e.is_line() && e.id != source_id;
        self.target = hit_tester
            .element_at(board, &config.dimensions, cursor, &connectable)
            .and_then(|id| board.element(&id))
            .filter(|&e| connectable(e))
            .map(|e| {
                let rect = config.dimensions.element_rect(e);
                (e.id.clone(), nearest_anchor(rect, cursor))
            });
    }

    /// Insert the connection if the gesture ended over a valid target.
    pub fn commit(self, board: &mut Board) -> Option<Connection> {
        let (target_id, target_anchor) = self.target?;
        let connection =
            Connection::new(self.source_id.clone(), target_id).with_anchors(self.source_anchor, target_anchor);
        match board.insert_connection(connection.clone()) {
            Ok(()) => {
                log::debug!(
                    "Connected {} ({:?}) -> {} ({:?})",
                    connection.start_element_id,
                    self.source_anchor,
                    connection.end_element_id,
                    target_anchor
                );
                Some(connection)
            }
            Err(err) => {
                log::warn!("Dropping connection from {}: {}", self.source_id, err);
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::elements::{LinePayload, Payload};
    use crate::hit::BoundsHitTester;

    fn board() -> Board {
        let mut board = Board::new();
        board.insert_element(Element::text("a", 0.0, 0.0).with_id("a")).unwrap();
        board.insert_element(Element::text("b", 400.0, 0.0).with_id("b")).unwrap();
        board
    }

    #[test]
    fn test_hit_anchor() {
        let config = EngineConfig::default();
        let board = board();
        let a = board.element("a").unwrap();
        let rect = config.dimensions.element_rect(a);

        // Right anchor sits at (172, 64).
        assert_eq!(hit_test_anchors(a, rect, Point::new(170.0, 66.0), 10.0, &config), Some(Anchor::Right));
        assert_eq!(hit_test_anchors(a, rect, Point::new(80.0, 64.0), 10.0, &config), None);
    }

    #[test]
    fn test_connect_resolves_nearest_anchor() {
        let config = EngineConfig::default();
        let mut board = board();
        let tester = BoundsHitTester::default();
        let mut state = ConnectState::begin("a".into(), Anchor::Right, Point::new(172.0, 64.0));

        state.update(Point::new(300.0, 60.0), &board, &config, &tester);
        assert!(state.target.is_none());

        // Near b's bottom edge.
        state.update(Point::new(470.0, 120.0), &board, &config, &tester);
        assert_eq!(state.target, Some(("b".into(), Anchor::Bottom)));

        let connection = state.commit(&mut board).unwrap();
        assert_eq!(connection.start_element_id, "a");
        assert_eq!(connection.end_element_id, "b");
        assert_eq!(connection.start_anchor(), Anchor::Right);
        assert_eq!(connection.end_anchor(), Anchor::Bottom);
        assert_eq!(board.connections.len(), 1);
    }

    #[test]
    fn test_line_over_target_does_not_block_connection() {
        let config = EngineConfig::default();
        let mut board = board();
        board
            .insert_element(
                Element::new(
                    Payload::Line(LinePayload::new(Point::new(300.0, 50.0), Point::new(700.0, 50.0))),
                    0.0,
                    0.0,
                )
                .with_id("stroke"),
            )
            .unwrap();
        let tester = BoundsHitTester::default();
        let mut state = ConnectState::begin("a".into(), Anchor::Right, Point::new(172.0, 64.0));

        // On the stroke, inside b.
        state.update(Point::new(480.0, 50.0), &board, &config, &tester);
        assert_eq!(state.target.as_ref().map(|(id, _)| id.as_str()), Some("b"));
        let connection = state.commit(&mut board).unwrap();
        assert_eq!(connection.end_element_id, "b");
        assert_eq!(board.connections.len(), 1);
    }

    #[test]
    fn test_release_over_source_is_discarded() {
        let config = EngineConfig::default();
        let mut board = board();
        let tester = BoundsHitTester::default();
        let mut state = ConnectState::begin("a".into(), Anchor::Right, Point::ZERO);
        state.update(Point::new(50.0, 50.0), &board, &config, &tester);
        assert!(state.commit(&mut board).is_none());
        assert!(board.connections.is_empty());
    }
}
