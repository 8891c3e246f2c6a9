//! Magnetic snapping and alignment guides.
//!
//! Both work on the three vertical lines (left, center, right) and the three
//! horizontal lines (top, middle, bottom) of each rect. Every line of the
//! moving rect is compared against every line of every candidate, one axis
//! at a time.

use crate::board::Board;
use crate::elements::DimensionTable;
use kurbo::{Point, Rect, Vec2};
use serde::{Deserialize, Serialize};

/// Guide positions closer than this are the same guide.
const GUIDE_EPSILON: f64 = 1e-6;

/// Orientation of a guide line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GuideAxis {
    /// A vertical line at an x position.
    Vertical,
    /// A horizontal line at a y position.
    Horizontal,
}

/// A transient guide line shown while dragging.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AlignmentGuide {
    /// Canvas x for vertical guides, canvas y for horizontal ones.
    pub position: f64,
    pub axis: GuideAxis,
}

/// Result of a snap operation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SnapResult {
    /// Correction to add to the tentative position.
    pub correction: Vec2,
    /// Whether the X coordinate was snapped.
    pub snapped_x: bool,
    /// Whether the Y coordinate was snapped.
    pub snapped_y: bool,
}

impl SnapResult {
    /// Create a result with no snapping.
    pub fn none() -> Self {
        Self {
            correction: Vec2::ZERO,
            snapped_x: false,
            snapped_y: false,
        }
    }

    /// Check if any snapping occurred.
    pub fn is_snapped(&self) -> bool {
        self.snapped_x || self.snapped_y
    }

    /// Tentative origin with the correction applied.
    pub fn apply(&self, tentative: Point) -> Point {
        tentative + self.correction
    }
}

fn x_lines(rect: Rect) -> [f64; 3] {
    [rect.x0, rect.center().x, rect.x1]
}

fn y_lines(rect: Rect) -> [f64; 3] {
    [rect.y0, rect.center().y, rect.y1]
}

/// Rects the moving element may snap or align to.
///
/// Lines are skipped: they have no meaningful edges to align with.
pub fn snap_candidates(board: &Board, dimensions: &DimensionTable, moving_id: &str) -> Vec<Rect> {
    board
        .elements
        .iter()
        .filter(|e| e.id != moving_id && !e.is_line())
        .map(|e| dimensions.element_rect(e))
        .collect()
}

/// Smallest signed distance `other - active` across all candidates on one axis.
///
/// Candidates are scanned in order and only a strictly smaller distance
/// replaces the current best, so the first minimal match wins ties.
fn closest_on_axis(active: [f64; 3], candidates: impl Iterator<Item = [f64; 3]>) -> Option<f64> {
    let mut best: Option<f64> = None;
    for other in candidates {
        for a in active {
            for o in other {
                let d = o - a;
                if best.is_none_or(|b| d.abs() < b.abs()) {
                    best = Some(d);
                }
            }
        }
    }
    best
}

/// Compute the correction that snaps `tentative` onto the nearest candidate line.
///
/// Axes are independent; an axis is only corrected when its closest distance
/// is below `threshold`.
pub fn snap_rect(tentative: Rect, candidates: &[Rect], threshold: f64) -> SnapResult {
    let mut result = SnapResult::none();

    if let Some(dx) = closest_on_axis(x_lines(tentative), candidates.iter().map(|r| x_lines(*r))) {
        if dx.abs() < threshold {
            result.correction.x = dx;
            result.snapped_x = true;
        }
    }
    if let Some(dy) = closest_on_axis(y_lines(tentative), candidates.iter().map(|r| y_lines(*r))) {
        if dy.abs() < threshold {
            result.correction.y = dy;
            result.snapped_y = true;
        }
    }

    if result.is_snapped() {
        log::trace!("Snap correction {:?}", result.correction);
    }
    result
}

fn push_unique(guides: &mut Vec<AlignmentGuide>, guide: AlignmentGuide) {
    let exists = guides
        .iter()
        .any(|g| g.axis == guide.axis && (g.position - guide.position).abs() < GUIDE_EPSILON);
    if !exists {
        guides.push(guide);
    }
}

/// Every candidate line within `threshold` of a line of `tentative`.
///
/// Guides sit on the candidate's line and are deduplicated by position and axis.
pub fn alignment_guides(tentative: Rect, candidates: &[Rect], threshold: f64) -> Vec<AlignmentGuide> {
    let mut guides = Vec::new();
    let active_x = x_lines(tentative);
    let active_y = y_lines(tentative);

    for other in candidates {
        for o in x_lines(*other) {
            if active_x.iter().any(|a| (o - a).abs() < threshold) {
                push_unique(&mut guides, AlignmentGuide { position: o, axis: GuideAxis::Vertical });
            }
        }
        for o in y_lines(*other) {
            if active_y.iter().any(|a| (o - a).abs() < threshold) {
                push_unique(&mut guides, AlignmentGuide { position: o, axis: GuideAxis::Horizontal });
            }
        }
    }
    guides
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rect(left: f64, top: f64, width: f64, height: f64) -> Rect {
        Rect::from_origin_size((left, top), (width, height))
    }

    #[test]
    fn test_right_edge_snaps_to_neighbour_left_edge() {
        // A dragged from (100,100) by +5 with B 10 units to its right.
        let b = rect(270.0, 100.0, 160.0, 128.0);
        let tentative = rect(105.0, 100.0, 160.0, 128.0);

        let result = snap_rect(tentative, &[b], 10.0);
        assert!(result.snapped_x);
        let snapped = result.apply(tentative.origin());
        assert_eq!(snapped.x, 110.0);
        assert_eq!(snapped.y, 100.0);
    }

    #[test]
    fn test_left_edges_align_exactly() {
        let b = rect(300.0, 600.0, 200.0, 150.0);
        for offset in [-9.5, -4.0, 0.0, 3.25, 9.9] {
            let tentative = rect(300.0 + offset, 100.0, 160.0, 128.0);
            let result = snap_rect(tentative, &[b], 10.0);
            assert!(result.snapped_x);
            assert_eq!(result.apply(tentative.origin()).x, 300.0);
        }
    }

    #[test]
    fn test_axes_are_independent() {
        let b = rect(500.0, 104.0, 100.0, 100.0);
        let tentative = rect(100.0, 100.0, 100.0, 100.0);
        let result = snap_rect(tentative, &[b], 10.0);
        assert!(!result.snapped_x);
        assert!(result.snapped_y);
        assert_eq!(result.correction, Vec2::new(0.0, 4.0));
    }

    #[test]
    fn test_outside_threshold_is_untouched() {
        let b = rect(400.0, 400.0, 100.0, 100.0);
        let tentative = rect(100.0, 100.0, 100.0, 100.0);
        assert_eq!(snap_rect(tentative, &[b], 10.0), SnapResult::none());
        assert_eq!(snap_rect(tentative, &[], 10.0), SnapResult::none());
    }

    #[test]
    fn test_threshold_is_exclusive() {
        let b = rect(210.0, 800.0, 100.0, 100.0);
        let tentative = rect(100.0, 100.0, 100.0, 100.0);
        assert!(!snap_rect(tentative, &[b], 10.0).snapped_x);
    }

    #[test]
    fn test_closest_candidate_wins() {
        let near = rect(103.0, 600.0, 100.0, 100.0);
        let far = rect(92.0, 900.0, 100.0, 100.0);
        let tentative = rect(100.0, 100.0, 100.0, 100.0);
        let result = snap_rect(tentative, &[far, near], 10.0);
        assert_eq!(result.correction.x, 3.0);
    }

    #[test]
    fn test_first_candidate_wins_ties() {
        let first = rect(104.0, 600.0, 100.0, 100.0);
        let second = rect(96.0, 900.0, 100.0, 100.0);
        let tentative = rect(100.0, 100.0, 100.0, 100.0);
        assert_eq!(snap_rect(tentative, &[first, second], 10.0).correction.x, 4.0);
        assert_eq!(snap_rect(tentative, &[second, first], 10.0).correction.x, -4.0);
    }

    #[test]
    fn test_center_alignment() {
        // Centers 2 units apart; edges are far apart because widths differ.
        let b = rect(0.0, 500.0, 300.0, 50.0);
        let tentative = rect(102.0, 100.0, 100.0, 50.0);
        let result = snap_rect(tentative, &[b], 10.0);
        assert_eq!(result.correction.x, -2.0);
    }

    #[test]
    fn test_guides_deduplicated() {
        // Two candidates sharing the same left edge and same top edge.
        let a = rect(200.0, 400.0, 100.0, 100.0);
        let b = rect(200.0, 400.0, 100.0, 100.0);
        let tentative = rect(202.0, 401.0, 100.0, 100.0);
        let guides = alignment_guides(tentative, &[a, b], 5.0);

        for (i, g) in guides.iter().enumerate() {
            for h in &guides[i + 1..] {
                assert!(!(g.axis == h.axis && g.position == h.position));
            }
        }
        assert!(guides.contains(&AlignmentGuide { position: 200.0, axis: GuideAxis::Vertical }));
        assert!(guides.contains(&AlignmentGuide { position: 400.0, axis: GuideAxis::Horizontal }));
    }

    #[test]
    fn test_guides_report_all_matches() {
        let b = rect(300.0, 100.0, 100.0, 100.0);
        // Same size, 3 units off: left, center and right all line up.
        let tentative = rect(297.0, 800.0, 100.0, 100.0);
        let guides = alignment_guides(tentative, &[b], 5.0);
        let vertical: Vec<f64> = guides
            .iter()
            .filter(|g| g.axis == GuideAxis::Vertical)
            .map(|g| g.position)
            .collect();
        assert_eq!(vertical, vec![300.0, 350.0, 400.0]);
    }

    #[test]
    fn test_guides_use_tighter_threshold_than_snap() {
        let b = rect(307.0, 900.0, 100.0, 100.0);
        let tentative = rect(300.0, 100.0, 100.0, 100.0);
        assert!(alignment_guides(tentative, &[b], 5.0).is_empty());
        assert!(snap_rect(tentative, &[b], 10.0).snapped_x);
    }
}
