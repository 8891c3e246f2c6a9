//! Engine façade: routes host input to the active gesture.

use crate::board::Board;
use crate::config::EngineConfig;
use crate::connect::{ConnectState, hit_test_anchors};
use crate::connection::{Anchor, Connection, anchor_point};
use crate::drag::{DragOutcome, DragPreview, DragState};
use crate::elements::ElementId;
use crate::error::{EngineError, EngineResult};
use crate::hit::{BoundsHitTester, HitTester, any_element};
use crate::input::{Modifiers, PointerEvent, PointerEventKind};
use crate::interaction::InteractionState;
use crate::render::{ArrowGeometry, ArrowRenderer};
use crate::resize::{ResizeHandle, ResizeState, hit_test_handles};
use crate::snap::AlignmentGuide;
use crate::viewport::{DEFAULT_SCALE, Viewport};
use kurbo::{Point, Rect, Size, Vec2};

/// Notifications for the host, returned from every input call.
#[derive(Debug, Clone, PartialEq)]
pub enum EngineEvent {
    ElementMoved { id: ElementId, left: f64, top: f64 },
    ElementDuplicated { source: ElementId, new_id: ElementId },
    /// Committed resize.
    ElementResized { id: ElementId, rect: Rect },
    /// Live resize rect, emitted on every move.
    ResizePreview { id: ElementId, rect: Rect },
    ConnectionCreated(Connection),
    ConnectionDeleted(Connection),
    ElementDeleted { id: ElementId, purged_connections: Vec<Connection> },
    SelectionChanged(Option<ElementId>),
    GuidesChanged(Vec<AlignmentGuide>),
    GuidesCleared,
    ViewportChanged(Viewport),
    GestureCancelled,
}

/// Temporary arrow of an in-progress connection, in canvas units.
#[derive(Debug, Clone, PartialEq)]
pub struct ConnectionPreview {
    pub source_id: ElementId,
    pub source_anchor: Anchor,
    pub source_point: Point,
    pub cursor: Point,
    pub target_id: Option<ElementId>,
    pub target_anchor: Option<Anchor>,
}

/// Spatial interaction engine for one board.
pub struct Engine {
    board: Board,
    viewport: Viewport,
    config: EngineConfig,
    state: InteractionState,
    selected: Option<ElementId>,
    editing: Option<ElementId>,
    guides: Vec<AlignmentGuide>,
    /// Host surface size in screen pixels; keyboard zoom centres on it.
    screen_size: Size,
    hit_tester: Box<dyn HitTester>,
}

impl Engine {
    pub fn new(board: Board, config: EngineConfig) -> Self {
        Self {
            board,
            viewport: Viewport::new(),
            config,
            state: InteractionState::Idle,
            selected: None,
            editing: None,
            guides: Vec::new(),
            screen_size: Size::ZERO,
            hit_tester: Box::new(BoundsHitTester::default()),
        }
    }

    pub fn with_viewport(mut self, viewport: Viewport) -> Self {
        self.set_viewport(viewport);
        self
    }

    /// Replace the default bounds-based hit tester.
    pub fn with_hit_tester(mut self, hit_tester: Box<dyn HitTester>) -> Self {
        self.hit_tester = hit_tester;
        self
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn board_mut(&mut self) -> &mut Board {
        &mut self.board
    }

    pub fn into_board(self) -> Board {
        self.board
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    /// Replace the viewport. An out-of-range scale is clamped to the pinch range.
    pub fn set_viewport(&mut self, mut viewport: Viewport) {
        viewport.clamp_scale(self.config.pinch_zoom);
        self.viewport = viewport;
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn state(&self) -> &InteractionState {
        &self.state
    }

    pub fn selected(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    pub fn editing(&self) -> Option<&str> {
        self.editing.as_deref()
    }

    /// Guides to render for the current drag.
    pub fn guides(&self) -> &[AlignmentGuide] {
        &self.guides
    }

    pub fn set_screen_size(&mut self, size: Size) {
        self.screen_size = size;
    }

    fn set_selection(&mut self, id: Option<ElementId>, events: &mut Vec<EngineEvent>) {
        if self.selected != id {
            self.selected = id.clone();
            events.push(EngineEvent::SelectionChanged(id));
        }
    }

    /// Select an element (or clear the selection with `None`).
    pub fn select(&mut self, id: Option<&str>) -> EngineResult<Vec<EngineEvent>> {
        if let Some(id) = id {
            if self.board.element(id).is_none() {
                return Err(EngineError::ElementNotFound(id.to_string()));
            }
        }
        let mut events = Vec::new();
        self.set_selection(id.map(str::to_string), &mut events);
        Ok(events)
    }

    // --- Pointer ---

    /// Feed one pointer event.
    pub fn handle_pointer(&mut self, event: PointerEvent) -> Vec<EngineEvent> {
        let mut events = Vec::new();
        match event.kind {
            PointerEventKind::Down => self.pointer_down(event.screen_pos, event.modifiers, &mut events),
            PointerEventKind::Move => self.pointer_move(event.screen_pos, &mut events),
            PointerEventKind::Up => self.pointer_up(event.screen_pos, &mut events),
            PointerEventKind::Cancel => self.cancel_into(&mut events),
        }
        events
    }

    /// Anchor or resize handle of the selected element under the pointer.
    fn press_selected(&self, screen: Point, point: Point) -> Option<InteractionState> {
        let id = self.selected.as_deref()?;
        if self.editing.as_deref() == Some(id) {
            return None;
        }
        let element = self.board.element(id)?;
        let rect = self.config.dimensions.element_rect(element);

        let anchor_tolerance = self.viewport.len_to_canvas(self.config.anchor_hit_radius);
        if let Some(anchor) = hit_test_anchors(element, rect, point, anchor_tolerance, &self.config) {
            log::debug!("Connecting from {} ({:?})", id, anchor);
            return Some(InteractionState::ConnectingFrom(ConnectState::begin(
                id.to_string(),
                anchor,
                point,
            )));
        }

        if element.is_resizable() {
            let handle_tolerance = self.viewport.len_to_canvas(self.config.handle_hit_radius);
            if let Some(handle) = hit_test_handles(rect, point, handle_tolerance) {
                log::debug!("Resizing {} from {:?}", id, handle);
                return Some(InteractionState::Resizing(ResizeState::begin(
                    element,
                    handle,
                    &self.config,
                    screen,
                )));
            }
        }
        None
    }

    fn pointer_down(&mut self, screen: Point, modifiers: Modifiers, events: &mut Vec<EngineEvent>) {
        if !self.state.is_idle() {
            log::debug!("Ignoring pointer down while {}", self.state.name());
            return;
        }
        let point = self.viewport.to_canvas(screen);

        if let Some(state) = self.press_selected(screen, point) {
            self.state = state;
            return;
        }

        let hit = self
            .hit_tester
            .element_at(&self.board, &self.config.dimensions, point, &any_element);
        let Some(id) = hit else {
            self.editing = None;
            self.set_selection(None, events);
            self.state = InteractionState::Panning { last_screen: screen };
            return;
        };

        // The element being edited keeps the pointer for text selection
        if self.editing.as_deref() == Some(id.as_str()) {
            return;
        }
        self.editing = None;
        self.set_selection(Some(id.clone()), events);

        let Some(element) = self.board.element(&id) else {
            log::warn!("Hit tester returned unknown element {}", id);
            return;
        };
        let duplicating = self.config.duplicate_modifier.is_held(&modifiers);
        log::debug!("Dragging {} (duplicate: {})", id, duplicating);
        self.state = InteractionState::Dragging(DragState::begin(
            element,
            &self.board,
            &self.config,
            screen,
            duplicating,
        ));
    }

    fn pointer_move(&mut self, screen: Point, events: &mut Vec<EngineEvent>) {
        match &mut self.state {
            InteractionState::Idle => {}
            InteractionState::Dragging(drag) => {
                let guides = drag.update(screen, &self.viewport, &self.config);
                if guides != self.guides {
                    self.guides = guides;
                    events.push(EngineEvent::GuidesChanged(self.guides.clone()));
                }
            }
            InteractionState::Resizing(resize) => {
                let rect = resize.update(screen, &self.viewport, &self.config);
                events.push(EngineEvent::ResizePreview {
                    id: resize.element_id.clone(),
                    rect,
                });
            }
            InteractionState::ConnectingFrom(connect) => {
                let point = self.viewport.to_canvas(screen);
                connect.update(point, &self.board, &self.config, self.hit_tester.as_ref());
            }
            InteractionState::Panning { last_screen } => {
                let delta = screen - *last_screen;
                *last_screen = screen;
                if delta != Vec2::ZERO {
                    self.viewport.pan_by(delta);
                    events.push(EngineEvent::ViewportChanged(self.viewport));
                }
            }
        }
    }

    fn clear_guides(&mut self, events: &mut Vec<EngineEvent>) {
        self.guides.clear();
        events.push(EngineEvent::GuidesCleared);
    }

    fn pointer_up(&mut self, screen: Point, events: &mut Vec<EngineEvent>) {
        match std::mem::take(&mut self.state) {
            InteractionState::Idle | InteractionState::Panning { .. } => {}
            InteractionState::Dragging(mut drag) => {
                drag.update(screen, &self.viewport, &self.config);
                self.clear_guides(events);
                match drag.commit(&mut self.board) {
                    DragOutcome::Moved { id, left, top } => {
                        events.push(EngineEvent::ElementMoved { id, left, top });
                    }
                    DragOutcome::Duplicated { source, new_id } => {
                        events.push(EngineEvent::ElementDuplicated {
                            source,
                            new_id: new_id.clone(),
                        });
                        self.set_selection(Some(new_id), events);
                    }
                    DragOutcome::Unchanged => {}
                }
            }
            InteractionState::Resizing(mut resize) => {
                resize.update(screen, &self.viewport, &self.config);
                let id = resize.element_id.clone();
                if let Some(rect) = resize.commit(&mut self.board) {
                    events.push(EngineEvent::ElementResized { id, rect });
                }
            }
            InteractionState::ConnectingFrom(mut connect) => {
                let point = self.viewport.to_canvas(screen);
                connect.update(point, &self.board, &self.config, self.hit_tester.as_ref());
                match connect.commit(&mut self.board) {
                    Some(connection) => events.push(EngineEvent::ConnectionCreated(connection)),
                    None => {
                        log::debug!("Connection released over empty canvas");
                        events.push(EngineEvent::GestureCancelled);
                    }
                }
            }
        }
    }

    /// Abort the active gesture, leaving the board as it was before it started.
    pub fn cancel(&mut self) -> Vec<EngineEvent> {
        let mut events = Vec::new();
        self.cancel_into(&mut events);
        events
    }

    fn cancel_into(&mut self, events: &mut Vec<EngineEvent>) {
        let state = std::mem::take(&mut self.state);
        if state.is_idle() {
            return;
        }
        log::debug!("Cancelled {}", state.name());
        if matches!(state, InteractionState::Dragging(_)) {
            self.clear_guides(events);
        }
        events.push(EngineEvent::GestureCancelled);
    }

    // --- Keyboard ---

    /// Feed a key press. `key` uses DOM key names (`"Escape"`, `"Delete"`, `"+"`, ...).
    pub fn handle_key(&mut self, key: &str, _modifiers: Modifiers) -> Vec<EngineEvent> {
        let mut events = Vec::new();
        match key {
            "Escape" => {
                if !self.state.is_idle() {
                    self.cancel_into(&mut events);
                } else if self.editing.is_some() {
                    self.end_text_edit();
                } else {
                    self.set_selection(None, &mut events);
                }
            }
            "Delete" | "Backspace" => {
                if self.state.is_idle() && self.editing.is_none() {
                    if let Some(id) = self.selected.clone() {
                        self.delete_into(&id, &mut events);
                    }
                }
            }
            "+" | "=" if self.editing.is_none() => events.extend(self.zoom_in()),
            "-" if self.editing.is_none() => events.extend(self.zoom_out()),
            "0" if self.editing.is_none() => events.extend(self.reset_zoom()),
            _ => {}
        }
        events
    }

    fn delete_into(&mut self, id: &str, events: &mut Vec<EngineEvent>) {
        let Some((element, purged_connections)) = self.board.remove_element(id) else {
            return;
        };
        log::debug!("Deleted {}", element.id);
        events.push(EngineEvent::ElementDeleted {
            id: element.id,
            purged_connections,
        });
        if self.selected.as_deref() == Some(id) {
            self.set_selection(None, events);
        }
        if self.editing.as_deref() == Some(id) {
            self.editing = None;
        }
    }

    /// Delete an element and every connection attached to it.
    ///
    /// An active gesture is cancelled first.
    pub fn delete_element(&mut self, id: &str) -> EngineResult<Vec<EngineEvent>> {
        if self.board.element(id).is_none() {
            return Err(EngineError::ElementNotFound(id.to_string()));
        }
        let mut events = Vec::new();
        self.cancel_into(&mut events);
        self.delete_into(id, &mut events);
        Ok(events)
    }

    /// Delete a single connection.
    pub fn delete_connection(&mut self, id: &str) -> EngineResult<Vec<EngineEvent>> {
        let connection = self
            .board
            .remove_connection(id)
            .ok_or_else(|| EngineError::ConnectionNotFound(id.to_string()))?;
        log::debug!("Deleted connection {}", connection.id);
        Ok(vec![EngineEvent::ConnectionDeleted(connection)])
    }

    // --- Zoom & pan ---

    fn screen_center(&self) -> Point {
        Point::new(self.screen_size.width / 2.0, self.screen_size.height / 2.0)
    }

    /// Zoom with the UI-controls range toward the screen centre.
    fn zoom_controls(&mut self, scale: f64) -> Option<EngineEvent> {
        if !self.state.is_idle() {
            return None;
        }
        let center = self.screen_center();
        self.viewport
            .zoom_to(center, scale, self.config.controls_zoom)
            .then_some(EngineEvent::ViewportChanged(self.viewport))
    }

    pub fn zoom_in(&mut self) -> Option<EngineEvent> {
        self.zoom_controls(self.viewport.scale + self.config.zoom_step)
    }

    pub fn zoom_out(&mut self) -> Option<EngineEvent> {
        self.zoom_controls(self.viewport.scale - self.config.zoom_step)
    }

    pub fn reset_zoom(&mut self) -> Option<EngineEvent> {
        self.zoom_controls(DEFAULT_SCALE)
    }

    /// Mouse wheel: Ctrl/Cmd zooms toward the cursor, otherwise scrolls.
    pub fn handle_wheel(&mut self, screen_pos: Point, delta: Vec2, modifiers: Modifiers) -> Vec<EngineEvent> {
        if !self.state.is_idle() {
            return Vec::new();
        }
        let changed = if modifiers.command() {
            let factor = if delta.y < 0.0 {
                self.config.wheel_zoom_factor
            } else if delta.y > 0.0 {
                1.0 / self.config.wheel_zoom_factor
            } else {
                return Vec::new();
            };
            self.viewport.zoom_at(screen_pos, factor, self.config.controls_zoom)
        } else if delta != Vec2::ZERO {
            self.viewport.pan_by(-delta);
            true
        } else {
            false
        };

        if changed {
            vec![EngineEvent::ViewportChanged(self.viewport)]
        } else {
            Vec::new()
        }
    }

    /// Touch pinch by `factor` around `center`, clamped to the pinch range.
    pub fn handle_pinch(&mut self, center: Point, factor: f64) -> Vec<EngineEvent> {
        if !self.state.is_idle() {
            return Vec::new();
        }
        if self.viewport.zoom_at(center, factor, self.config.pinch_zoom) {
            vec![EngineEvent::ViewportChanged(self.viewport)]
        } else {
            Vec::new()
        }
    }

    // --- Text editing ---

    /// Enter text editing on `id`. Cancels any active gesture.
    pub fn begin_text_edit(&mut self, id: &str) -> EngineResult<Vec<EngineEvent>> {
        if self.board.element(id).is_none() {
            return Err(EngineError::ElementNotFound(id.to_string()));
        }
        let mut events = Vec::new();
        self.cancel_into(&mut events);
        self.editing = Some(id.to_string());
        self.set_selection(Some(id.to_string()), &mut events);
        Ok(events)
    }

    /// Leave text editing. Returns `false` when nothing was being edited.
    pub fn end_text_edit(&mut self) -> bool {
        self.editing.take().is_some()
    }

    // --- Previews ---

    /// Resolved rect of `id`, following a live move or resize.
    pub fn element_rect(&self, id: &str) -> Option<Rect> {
        match &self.state {
            InteractionState::Dragging(drag) if drag.element_id == id && !drag.is_duplicating => {
                return Some(drag.preview_rect());
            }
            InteractionState::Resizing(resize) if resize.element_id == id => {
                return Some(resize.current);
            }
            _ => {}
        }
        self.board
            .element(id)
            .map(|e| self.config.dimensions.element_rect(e))
    }

    pub fn drag_preview(&self) -> Option<DragPreview> {
        match &self.state {
            InteractionState::Dragging(drag) => Some(drag.preview_info()),
            _ => None,
        }
    }

    pub fn connection_preview(&self) -> Option<ConnectionPreview> {
        let InteractionState::ConnectingFrom(connect) = &self.state else {
            return None;
        };
        Some(ConnectionPreview {
            source_id: connect.source_id.clone(),
            source_anchor: connect.source_anchor,
            source_point: self.anchor_canvas_point(&connect.source_id, connect.source_anchor),
            cursor: connect.cursor,
            target_id: connect.target.as_ref().map(|(id, _)| id.clone()),
            target_anchor: connect.target.as_ref().map(|(_, anchor)| *anchor),
        })
    }

    /// Anchor positions of `id` in canvas units. Empty for lines and unknown ids.
    pub fn anchor_positions(&self, id: &str) -> Vec<(Anchor, Point)> {
        let (Some(element), Some(rect)) = (self.board.element(id), self.element_rect(id)) else {
            return Vec::new();
        };
        if element.is_line() {
            return Vec::new();
        }
        Anchor::ALL
            .iter()
            .map(|&anchor| (anchor, anchor_point(element, rect, anchor, &self.config)))
            .collect()
    }

    /// Resize handle positions of `id` in canvas units. Empty when not resizable.
    pub fn handle_positions(&self, id: &str) -> Vec<(ResizeHandle, Point)> {
        let (Some(element), Some(rect)) = (self.board.element(id), self.element_rect(id)) else {
            return Vec::new();
        };
        if !element.is_resizable() {
            return Vec::new();
        }
        ResizeHandle::ALL
            .iter()
            .map(|&handle| (handle, handle.position(rect)))
            .collect()
    }

    /// Anchor position in canvas units; the canvas origin for missing elements.
    fn anchor_canvas_point(&self, id: &str, anchor: Anchor) -> Point {
        match (self.board.element(id), self.element_rect(id)) {
            (Some(element), Some(rect)) => anchor_point(element, rect, anchor, &self.config),
            _ => {
                log::warn!("Connection endpoint {} does not exist", id);
                Point::ZERO
            }
        }
    }

    /// Emit arrow geometry for every connection plus the in-progress one.
    pub fn render_connections(&self, renderer: &mut dyn ArrowRenderer) {
        let stroke_scale = self.viewport.stroke_scale();
        let to_screen = self.viewport.transform();
        for connection in &self.board.connections {
            let start = self.anchor_canvas_point(&connection.start_element_id, connection.start_anchor());
            let end = self.anchor_canvas_point(&connection.end_element_id, connection.end_anchor());
            renderer.draw_arrow(&ArrowGeometry {
                connection_id: Some(connection.id.clone()),
                start: to_screen * start,
                end: to_screen * end,
                start_anchor: connection.start_anchor(),
                end_anchor: Some(connection.end_anchor()),
                stroke_scale,
            });
        }

        if let Some(preview) = self.connection_preview() {
            renderer.draw_arrow(&ArrowGeometry {
                connection_id: None,
                start: to_screen * preview.source_point,
                end: to_screen * preview.cursor,
                start_anchor: preview.source_anchor,
                end_anchor: preview.target_anchor,
                stroke_scale,
            });
        }
    }
}
