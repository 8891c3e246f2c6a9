//! Board elements.

mod dimensions;
mod payload;

pub use dimensions::DimensionTable;
pub use payload::{BookPayload, ImagePayload, LinePayload, LinkPayload, TextPayload};

use kurbo::{Rect, Vec2};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

/// Unique identifier for elements and connections.
pub type ElementId = String;

/// Generate a fresh random id.
pub fn new_id() -> ElementId {
    Uuid::new_v4().to_string()
}

/// Element kind tag, derived from the payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ElementKind {
    Text,
    Book,
    Line,
    Image,
    Link,
}

impl ElementKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ElementKind::Text => "text",
            ElementKind::Book => "book",
            ElementKind::Line => "line",
            ElementKind::Image => "image",
            ElementKind::Link => "link",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Orientation {
    #[default]
    Horizontal,
    Vertical,
}

/// Kind-specific element data.
#[derive(Debug, Clone, PartialEq)]
pub enum Payload {
    Text(TextPayload),
    Book(BookPayload),
    Line(LinePayload),
    Image(ImagePayload),
    Link(LinkPayload),
}

impl Payload {
    pub fn kind(&self) -> ElementKind {
        match self {
            Payload::Text(_) => ElementKind::Text,
            Payload::Book(_) => ElementKind::Book,
            Payload::Line(_) => ElementKind::Line,
            Payload::Image(_) => ElementKind::Image,
            Payload::Link(_) => ElementKind::Link,
        }
    }

    /// Parse a payload for a raw kind tag.
    ///
    /// Unknown kinds and payloads that fail to parse become a text payload,
    /// keeping any `text`/`content` string found in the raw value.
    fn from_raw(id: &str, kind: &str, raw: Value) -> Self {
        // A missing payload means "all defaults"
        let raw = if raw.is_null() {
            Value::Object(Default::default())
        } else {
            raw
        };
        let parsed = match kind {
            "text" => serde_json::from_value(raw.clone()).map(Payload::Text),
            "book" => serde_json::from_value(raw.clone()).map(Payload::Book),
            "line" => serde_json::from_value(raw.clone()).map(Payload::Line),
            "image" => serde_json::from_value(raw.clone()).map(Payload::Image),
            "link" => serde_json::from_value(raw.clone()).map(Payload::Link),
            other => {
                log::warn!("Element {} has unknown kind {:?}, showing as text", id, other);
                return Payload::Text(fallback_text(&raw));
            }
        };
        parsed.unwrap_or_else(|err| {
            log::warn!("Element {} has malformed {} payload ({}), showing as text", id, kind, err);
            Payload::Text(fallback_text(&raw))
        })
    }

    fn to_value(&self) -> Value {
        let value = match self {
            Payload::Text(p) => serde_json::to_value(p),
            Payload::Book(p) => serde_json::to_value(p),
            Payload::Line(p) => serde_json::to_value(p),
            Payload::Image(p) => serde_json::to_value(p),
            Payload::Link(p) => serde_json::to_value(p),
        };
        value.unwrap_or_default()
    }
}

fn fallback_text(raw: &Value) -> TextPayload {
    let content = raw
        .get("text")
        .or_else(|| raw.get("content"))
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string();
    TextPayload { content }
}

/// A node on the board.
///
/// `left`/`top` are canvas units. `width`/`height` are optional overrides of
/// the [`DimensionTable`] defaults. Lines ignore the position fields; their
/// geometry lives in [`LinePayload`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "RawElement", into = "RawElement")]
pub struct Element {
    pub id: ElementId,
    pub left: f64,
    pub top: f64,
    pub width: Option<f64>,
    pub height: Option<f64>,
    pub orientation: Orientation,
    pub payload: Payload,
}

impl Element {
    /// Create an element with a fresh id at the given canvas position.
    pub fn new(payload: Payload, left: f64, top: f64) -> Self {
        Self {
            id: new_id(),
            left,
            top,
            width: None,
            height: None,
            orientation: Orientation::default(),
            payload,
        }
    }

    pub fn text(content: impl Into<String>, left: f64, top: f64) -> Self {
        Self::new(Payload::Text(TextPayload { content: content.into() }), left, top)
    }

    pub fn with_id(mut self, id: impl Into<ElementId>) -> Self {
        self.id = id.into();
        self
    }

    pub fn with_size(mut self, width: f64, height: f64) -> Self {
        self.width = Some(width);
        self.height = Some(height);
        self
    }

    pub fn with_orientation(mut self, orientation: Orientation) -> Self {
        self.orientation = orientation;
        self
    }

    pub fn kind(&self) -> ElementKind {
        self.payload.kind()
    }

    pub fn is_line(&self) -> bool {
        matches!(self.payload, Payload::Line(_))
    }

    pub fn is_book(&self) -> bool {
        matches!(self.payload, Payload::Book(_))
    }

    /// Books keep their cover size and lines are edited by their endpoints.
    pub fn is_resizable(&self) -> bool {
        !self.is_book() && !self.is_line()
    }

    /// Move by a canvas-space delta.
    pub fn translate(&mut self, delta: Vec2) {
        match &mut self.payload {
            Payload::Line(line) => line.translate(delta),
            _ => {
                self.left += delta.x;
                self.top += delta.y;
            }
        }
    }

    /// Write a resolved rect back as explicit position and size.
    pub fn set_rect(&mut self, rect: Rect) {
        self.left = rect.x0;
        self.top = rect.y0;
        self.width = Some(rect.width());
        self.height = Some(rect.height());
    }

    /// Deep copy with a freshly generated id.
    pub fn duplicate(&self) -> Self {
        let mut copy = self.clone();
        copy.id = new_id();
        copy
    }
}

/// Wire form of an element; the payload is kept untyped until the kind is known.
#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawElement {
    id: String,
    #[serde(default)]
    kind: String,
    #[serde(default)]
    left: f64,
    #[serde(default)]
    top: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    width: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    height: Option<f64>,
    #[serde(default)]
    orientation: Orientation,
    #[serde(default)]
    payload: Value,
}

impl From<RawElement> for Element {
    fn from(raw: RawElement) -> Self {
        let payload = Payload::from_raw(&raw.id, &raw.kind, raw.payload);
        Self {
            id: raw.id,
            left: raw.left,
            top: raw.top,
            width: raw.width,
            height: raw.height,
            orientation: raw.orientation,
            payload,
        }
    }
}

impl From<Element> for RawElement {
    fn from(element: Element) -> Self {
        Self {
            kind: element.kind().as_str().to_string(),
            payload: element.payload.to_value(),
            id: element.id,
            left: element.left,
            top: element.top,
            width: element.width,
            height: element.height,
            orientation: element.orientation,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kurbo::Point;

    #[test]
    fn test_new_ids_are_unique() {
        let a = Element::text("a", 0.0, 0.0);
        let b = Element::text("b", 0.0, 0.0);
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn test_duplicate_is_deep_copy_with_new_id() {
        let original = Element::new(
            Payload::Book(BookPayload {
                title: "Dune".into(),
                author: "Frank Herbert".into(),
                ..Default::default()
            }),
            10.0,
            20.0,
        );
        let mut copy = original.duplicate();
        assert_ne!(copy.id, original.id);
        assert_eq!(copy.payload, original.payload);

        if let Payload::Book(book) = &mut copy.payload {
            book.title = "Changed".into();
        }
        assert_ne!(copy.payload, original.payload);
    }

    #[test]
    fn test_translate_line_moves_endpoints() {
        let mut line = Element::new(
            Payload::Line(LinePayload::new(Point::new(0.0, 0.0), Point::new(50.0, 50.0))),
            0.0,
            0.0,
        );
        line.translate(Vec2::new(10.0, 5.0));
        let Payload::Line(payload) = &line.payload else {
            panic!("expected line payload");
        };
        assert_eq!(payload.start, Point::new(10.0, 5.0));
        assert_eq!((line.left, line.top), (0.0, 0.0));
    }

    #[test]
    fn test_resizable_kinds() {
        assert!(Element::text("t", 0.0, 0.0).is_resizable());
        assert!(!Element::new(Payload::Book(BookPayload::default()), 0.0, 0.0).is_resizable());
        assert!(
            !Element::new(Payload::Line(LinePayload::new(Point::ZERO, Point::ZERO)), 0.0, 0.0)
                .is_resizable()
        );
    }

    #[test]
    fn test_serialization_roundtrip() {
        let element = Element::new(
            Payload::Link(LinkPayload {
                url: "https://example.com".into(),
                title: Some("Example".into()),
                ..Default::default()
            }),
            12.0,
            34.0,
        )
        .with_size(300.0, 180.0);

        let json = serde_json::to_string(&element).unwrap();
        assert!(json.contains(r#""kind":"link""#));
        let back: Element = serde_json::from_str(&json).unwrap();
        assert_eq!(back, element);
    }

    #[test]
    fn test_unknown_kind_falls_back_to_text() {
        let json = r#"{"id":"x1","kind":"video","left":5,"top":6,"payload":{"text":"clip"}}"#;
        let element: Element = serde_json::from_str(json).unwrap();
        assert_eq!(element.kind(), ElementKind::Text);
        assert_eq!(element.payload, Payload::Text(TextPayload { content: "clip".into() }));
        assert_eq!((element.left, element.top), (5.0, 6.0));
    }

    #[test]
    fn test_malformed_payload_falls_back_to_text() {
        let json = r#"{"id":"l1","kind":"line","payload":{"start":"nowhere"}}"#;
        let element: Element = serde_json::from_str(json).unwrap();
        assert_eq!(element.kind(), ElementKind::Text);
        assert_eq!(element.payload, Payload::Text(TextPayload::default()));
    }
}
