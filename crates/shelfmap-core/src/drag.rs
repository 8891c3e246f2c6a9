//! Move and duplicate-on-drag.

use crate::board::Board;
use crate::config::EngineConfig;
use crate::elements::{Element, ElementId};
use crate::snap::{AlignmentGuide, SnapResult, alignment_guides, snap_candidates, snap_rect};
use crate::viewport::Viewport;
use kurbo::{Point, Rect, Size};

/// State of an in-progress move.
///
/// The board is not touched until [`DragState::commit`]; until then the
/// corrected position lives in `preview`.
#[derive(Debug, Clone)]
pub struct DragState {
    pub element_id: ElementId,
    /// Resolved bounds at gesture start.
    pub origin_rect: Rect,
    /// Screen position of the pointer-down.
    pub start_screen: Point,
    /// Leave the original in place and insert a copy on commit.
    pub is_duplicating: bool,
    /// Corrected origin of the element (or ghost) after the last move.
    pub preview: Point,
    /// Last snap applied to `preview`.
    pub snap: SnapResult,
    is_line: bool,
    /// Rects of the other elements, captured once per gesture.
    candidates: Vec<Rect>,
}

/// What a committed drag did to the board.
#[derive(Debug, Clone, PartialEq)]
pub enum DragOutcome {
    Moved { id: ElementId, left: f64, top: f64 },
    Duplicated { source: ElementId, new_id: ElementId },
    /// A plain press and release with no movement.
    Unchanged,
}

/// Preview of a drag for rendering.
#[derive(Debug, Clone, PartialEq)]
pub struct DragPreview {
    pub element_id: ElementId,
    pub rect: Rect,
    /// The rect belongs to a translucent copy, not the element itself.
    pub is_ghost: bool,
}

/// Clamp an origin so a rect of `size` stays inside `extent`.
///
/// Rects larger than the extent are pinned to the top-left corner.
pub fn clamp_to_extent(origin: Point, size: Size, extent: Size) -> Point {
    Point::new(
        origin.x.min(extent.width - size.width).max(0.0),
        origin.y.min(extent.height - size.height).max(0.0),
    )
}

impl DragState {
    /// Start dragging `element`, snapshotting its bounds and its neighbours.
    pub fn begin(
        element: &Element,
        board: &Board,
        config: &EngineConfig,
        start_screen: Point,
        is_duplicating: bool,
    ) -> Self {
        let origin_rect = config.dimensions.element_rect(element);
        let is_line = element.is_line();
        let candidates = if is_line {
            Vec::new()
        } else {
            snap_candidates(board, &config.dimensions, &element.id)
        };
        Self {
            element_id: element.id.clone(),
            origin_rect,
            start_screen,
            is_duplicating,
            preview: origin_rect.origin(),
            snap: SnapResult::none(),
            is_line,
            candidates,
        }
    }

    /// Origin at gesture start.
    pub fn origin(&self) -> Point {
        self.origin_rect.origin()
    }

    pub fn preview_rect(&self) -> Rect {
        self.origin_rect.with_origin(self.preview)
    }

    pub fn has_moved(&self) -> bool {
        self.preview != self.origin()
    }

    /// Recompute the preview for a pointer at `screen_pos`.
    ///
    /// Returns the alignment guides for the raw (unsnapped) position. Lines
    /// follow the pointer exactly and never produce guides.
    pub fn update(&mut self, screen_pos: Point, viewport: &Viewport, config: &EngineConfig) -> Vec<AlignmentGuide> {
        let delta = viewport.delta_to_canvas(screen_pos - self.start_screen);
        let tentative = self.origin_rect.with_origin(self.origin() + delta);

        if self.is_line {
            self.preview = tentative.origin();
            return Vec::new();
        }

        let guides = alignment_guides(tentative, &self.candidates, config.guide_threshold);
        self.snap = snap_rect(tentative, &self.candidates, config.snap_threshold);
        self.preview = clamp_to_extent(
            self.snap.apply(tentative.origin()),
            tentative.size(),
            config.canvas_extent,
        );
        guides
    }

    pub fn preview_info(&self) -> DragPreview {
        DragPreview {
            element_id: self.element_id.clone(),
            rect: self.preview_rect(),
            is_ghost: self.is_duplicating,
        }
    }

    fn place(&self, element: &mut Element) {
        if self.is_line {
            element.translate(self.preview - self.origin());
        } else {
            element.left = self.preview.x;
            element.top = self.preview.y;
        }
    }

    /// Write the previewed position to the board.
    ///
    /// A duplicating drag always inserts a copy, even when released in place.
    pub fn commit(self, board: &mut Board) -> DragOutcome {
        if !self.is_duplicating && !self.has_moved() {
            return DragOutcome::Unchanged;
        }

        if self.is_duplicating {
            let Some(original) = board.element(&self.element_id) else {
                log::warn!("Drag source {} vanished before commit", self.element_id);
                return DragOutcome::Unchanged;
            };
            let mut copy = original.duplicate();
            self.place(&mut copy);
            let new_id = copy.id.clone();
            if let Err(err) = board.insert_element(copy) {
                log::warn!("Failed to insert duplicate of {}: {}", self.element_id, err);
                return DragOutcome::Unchanged;
            }
            log::debug!("Duplicated {} as {}", self.element_id, new_id);
            return DragOutcome::Duplicated {
                source: self.element_id,
                new_id,
            };
        }

        let Some(element) = board.element_mut(&self.element_id) else {
            log::warn!("Drag target {} vanished before commit", self.element_id);
            return DragOutcome::Unchanged;
        };
        self.place(element);
        log::debug!("Moved {} to ({}, {})", self.element_id, self.preview.x, self.preview.y);
        DragOutcome::Moved {
            id: self.element_id,
            left: self.preview.x,
            top: self.preview.y,
        }
    }
}
