//! The single active gesture.

use crate::connect::ConnectState;
use crate::drag::DragState;
use crate::resize::ResizeState;
use kurbo::Point;

/// Current gesture. At most one is active; new gestures only start from `Idle`.
#[derive(Debug, Clone, Default)]
pub enum InteractionState {
    #[default]
    Idle,
    Dragging(DragState),
    Resizing(ResizeState),
    ConnectingFrom(ConnectState),
    /// Panning the viewport from empty canvas.
    Panning { last_screen: Point },
}

impl InteractionState {
    pub fn is_idle(&self) -> bool {
        matches!(self, InteractionState::Idle)
    }

    /// Short name for logging.
    pub fn name(&self) -> &'static str {
        match self {
            InteractionState::Idle => "idle",
            InteractionState::Dragging(_) => "dragging",
            InteractionState::Resizing(_) => "resizing",
            InteractionState::ConnectingFrom(_) => "connecting",
            InteractionState::Panning { .. } => "panning",
        }
    }

    /// Element the gesture operates on, if any.
    pub fn element_id(&self) -> Option<&str> {
        match self {
            InteractionState::Dragging(drag) => Some(&drag.element_id),
            InteractionState::Resizing(resize) => Some(&resize.element_id),
            InteractionState::ConnectingFrom(connect) => Some(&connect.source_id),
            InteractionState::Idle | InteractionState::Panning { .. } => None,
        }
    }
}
