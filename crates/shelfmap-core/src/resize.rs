//! Eight-handle resize.

use crate::board::Board;
use crate::config::EngineConfig;
use crate::elements::{Element, ElementId};
use crate::viewport::Viewport;
use kurbo::{Point, Rect, Size, Vec2};
use serde::{Deserialize, Serialize};

/// Resize handle positions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ResizeHandle {
    Top,
    Right,
    Bottom,
    Left,
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
}

impl ResizeHandle {
    /// Corners first, so they win over edges where the two overlap.
    pub const ALL: [ResizeHandle; 8] = [
        ResizeHandle::TopLeft,
        ResizeHandle::TopRight,
        ResizeHandle::BottomLeft,
        ResizeHandle::BottomRight,
        ResizeHandle::Top,
        ResizeHandle::Right,
        ResizeHandle::Bottom,
        ResizeHandle::Left,
    ];

    /// Handle position on `rect`.
    pub fn position(self, rect: Rect) -> Point {
        let center = rect.center();
        match self {
            ResizeHandle::Top => Point::new(center.x, rect.y0),
            ResizeHandle::Right => Point::new(rect.x1, center.y),
            ResizeHandle::Bottom => Point::new(center.x, rect.y1),
            ResizeHandle::Left => Point::new(rect.x0, center.y),
            ResizeHandle::TopLeft => Point::new(rect.x0, rect.y0),
            ResizeHandle::TopRight => Point::new(rect.x1, rect.y0),
            ResizeHandle::BottomLeft => Point::new(rect.x0, rect.y1),
            ResizeHandle::BottomRight => Point::new(rect.x1, rect.y1),
        }
    }

    fn moves_left(self) -> bool {
        matches!(self, ResizeHandle::Left | ResizeHandle::TopLeft | ResizeHandle::BottomLeft)
    }

    fn moves_right(self) -> bool {
        matches!(self, ResizeHandle::Right | ResizeHandle::TopRight | ResizeHandle::BottomRight)
    }

    fn moves_top(self) -> bool {
        matches!(self, ResizeHandle::Top | ResizeHandle::TopLeft | ResizeHandle::TopRight)
    }

    fn moves_bottom(self) -> bool {
        matches!(self, ResizeHandle::Bottom | ResizeHandle::BottomLeft | ResizeHandle::BottomRight)
    }
}

/// Closest handle of `rect` within `tolerance` of `point`.
/// `tolerance` should be adjusted for viewport zoom.
pub fn hit_test_handles(rect: Rect, point: Point, tolerance: f64) -> Option<ResizeHandle> {
    let mut best: Option<(ResizeHandle, f64)> = None;
    for handle in ResizeHandle::ALL {
        let dist_sq = handle.position(rect).distance_squared(point);
        if dist_sq <= tolerance * tolerance && best.is_none_or(|(_, d)| dist_sq < d) {
            best = Some((handle, dist_sq));
        }
    }
    best.map(|(handle, _)| handle)
}

/// Apply a canvas-space drag `delta` on `handle` to `origin`.
///
/// The edge opposite the handle stays fixed. Width and height never drop
/// below `min`; when they would, the moving edge stops at the minimum.
pub fn apply_resize(origin: Rect, handle: ResizeHandle, delta: Vec2, min: Size) -> Rect {
    let (mut x0, mut x1, mut y0, mut y1) = (origin.x0, origin.x1, origin.y0, origin.y1);

    if handle.moves_left() {
        let width = (origin.width() - delta.x).max(min.width);
        x0 = origin.x1 - width;
    } else if handle.moves_right() {
        let width = (origin.width() + delta.x).max(min.width);
        x1 = origin.x0 + width;
    }

    if handle.moves_top() {
        let height = (origin.height() - delta.y).max(min.height);
        y0 = origin.y1 - height;
    } else if handle.moves_bottom() {
        let height = (origin.height() + delta.y).max(min.height);
        y1 = origin.y0 + height;
    }

    Rect::new(x0, y0, x1, y1)
}

/// State of an in-progress resize.
#[derive(Debug, Clone)]
pub struct ResizeState {
    pub element_id: ElementId,
    pub handle: ResizeHandle,
    /// Resolved bounds at gesture start.
    pub origin_rect: Rect,
    pub start_screen: Point,
    /// Rect after the last move.
    pub current: Rect,
}

impl ResizeState {
    pub fn begin(element: &Element, handle: ResizeHandle, config: &EngineConfig, start_screen: Point) -> Self {
        let origin_rect = config.dimensions.element_rect(element);
        Self {
            element_id: element.id.clone(),
            handle,
            origin_rect,
            start_screen,
            current: origin_rect,
        }
    }

    /// Recompute the live rect for a pointer at `screen_pos`.
    pub fn update(&mut self, screen_pos: Point, viewport: &Viewport, config: &EngineConfig) -> Rect {
        let delta = viewport.delta_to_canvas(screen_pos - self.start_screen);
        let min = Size::new(config.min_width, config.min_height);
        self.current = apply_resize(self.origin_rect, self.handle, delta, min);
        self.current
    }

    /// Write the live rect back to the element. `None` when nothing changed.
    pub fn commit(self, board: &mut Board) -> Option<Rect> {
        if self.current == self.origin_rect {
            return None;
        }
        let Some(element) = board.element_mut(&self.element_id) else {
            log::warn!("Resize target {} vanished before commit", self.element_id);
            return None;
        };
        element.set_rect(self.current);
        log::debug!("Resized {} to {:?}", self.element_id, self.current);
        Some(self.current)
    }
}
