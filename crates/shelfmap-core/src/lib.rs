//! Shelfmap Core Library
//!
//! Spatial interaction engine for the Shelfmap board: viewport transforms,
//! element sizing, drag/resize/duplicate gestures, magnetic snapping,
//! alignment guides and connection anchors. Rendering and hit-testing are
//! supplied by the host through traits.

pub mod board;
pub mod config;
pub mod connect;
pub mod connection;
pub mod drag;
pub mod elements;
pub mod engine;
pub mod error;
pub mod hit;
pub mod input;
pub mod interaction;
pub mod render;
pub mod resize;
pub mod snap;
pub mod viewport;

pub use board::Board;
pub use config::{EngineConfig, ModifierKey};
pub use connection::{Anchor, Connection};
pub use drag::DragPreview;
pub use elements::{DimensionTable, Element, ElementId, ElementKind, Orientation, Payload};
pub use engine::{ConnectionPreview, Engine, EngineEvent};
pub use error::{EngineError, EngineResult};
pub use hit::{BoundsHitTester, HitTester, any_element};
pub use input::{Modifiers, PointerEvent, PointerEventKind};
pub use interaction::InteractionState;
pub use render::{ArrowGeometry, ArrowRenderer};
pub use resize::ResizeHandle;
pub use snap::{AlignmentGuide, GuideAxis, SnapResult};
pub use viewport::{Viewport, ZoomRange};
