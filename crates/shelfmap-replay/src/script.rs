//! Replay scripts: a board plus a recorded stream of host input.

use kurbo::{Point, Vec2};
use serde::Deserialize;
use shelfmap_core::{
    Board, Engine, EngineConfig, EngineError, EngineEvent, Modifiers, PointerEvent, PointerEventKind, Viewport,
};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Replay errors.
#[derive(Debug, Error)]
pub enum ReplayError {
    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Invalid script: {0}")]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    Engine(#[from] EngineError),
}

#[derive(Debug, Clone, Deserialize)]
pub struct PointerStep {
    pub kind: PointerEventKind,
    pub x: f64,
    pub y: f64,
    #[serde(default)]
    pub modifiers: Modifiers,
}

#[derive(Debug, Clone, Deserialize)]
pub struct KeyStep {
    pub key: String,
    #[serde(default)]
    pub modifiers: Modifiers,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WheelStep {
    pub x: f64,
    pub y: f64,
    #[serde(default)]
    pub dx: f64,
    #[serde(default)]
    pub dy: f64,
    #[serde(default)]
    pub modifiers: Modifiers,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PinchStep {
    pub x: f64,
    pub y: f64,
    pub factor: f64,
}

/// One recorded input.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScriptEvent {
    Pointer(PointerStep),
    Key(KeyStep),
    Wheel(WheelStep),
    Pinch(PinchStep),
}

#[derive(Debug, Clone, Deserialize)]
pub struct Script {
    pub board: Board,
    #[serde(default)]
    pub viewport: Option<Viewport>,
    #[serde(default)]
    pub config: Option<EngineConfig>,
    #[serde(default)]
    pub events: Vec<ScriptEvent>,
}

/// Outcome of a replay.
#[derive(Debug)]
pub struct Replay {
    pub board: Board,
    pub events: Vec<EngineEvent>,
}

impl Script {
    pub fn from_json(json: &str) -> Result<Self, ReplayError> {
        let mut script: Script = serde_json::from_str(json)?;
        script.board = script.board.validated()?;
        Ok(script)
    }

    pub fn load(path: &Path) -> Result<Self, ReplayError> {
        let json = std::fs::read_to_string(path).map_err(|source| ReplayError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&json)
    }

    /// Drive a fresh engine through every event.
    pub fn run(self) -> Replay {
        let mut engine = Engine::new(self.board, self.config.unwrap_or_default());
        if let Some(viewport) = self.viewport {
            engine.set_viewport(viewport);
        }

        let mut events = Vec::new();
        for (step, event) in self.events.into_iter().enumerate() {
            let emitted = match event {
                ScriptEvent::Pointer(p) => engine.handle_pointer(PointerEvent::new(
                    p.kind,
                    Point::new(p.x, p.y),
                    p.modifiers,
                )),
                ScriptEvent::Key(k) => engine.handle_key(&k.key, k.modifiers),
                ScriptEvent::Wheel(w) => {
                    engine.handle_wheel(Point::new(w.x, w.y), Vec2::new(w.dx, w.dy), w.modifiers)
                }
                ScriptEvent::Pinch(p) => engine.handle_pinch(Point::new(p.x, p.y), p.factor),
            };
            for event in &emitted {
                log::info!("step {}: {:?}", step, event);
            }
            events.extend(emitted);
        }

        Replay {
            board: engine.into_board(),
            events,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const SNAP_SCRIPT: &str = r#"{
        "board": {
            "elements": [
                {"id": "a", "kind": "text", "left": 100, "top": 100, "payload": {"content": "A"}},
                {"id": "b", "kind": "text", "left": 270, "top": 100, "payload": {"content": "B"}}
            ]
        },
        "events": [
            {"pointer": {"kind": "down", "x": 150, "y": 150}},
            {"pointer": {"kind": "move", "x": 155, "y": 150}},
            {"pointer": {"kind": "up", "x": 155, "y": 150}}
        ]
    }"#;

    #[test]
    fn test_replay_snapped_drag() {
        let replay = Script::from_json(SNAP_SCRIPT).unwrap().run();
        assert_eq!(replay.board.element("a").unwrap().left, 110.0);
        assert!(replay.events.contains(&EngineEvent::ElementMoved {
            id: "a".into(),
            left: 110.0,
            top: 100.0,
        }));
    }

    #[test]
    fn test_replay_with_config_and_viewport() {
        let json = r#"{
            "board": {"elements": [{"id": "a", "kind": "image", "left": 0, "top": 0}]},
            "viewport": {"pan": {"x": 0.0, "y": 0.0}, "scale": 2.0},
            "config": {"minWidth": 120},
            "events": [
                {"key": {"key": "+"}},
                {"wheel": {"x": 0, "y": 0, "dx": 10, "dy": 0}},
                {"pinch": {"x": 0, "y": 0, "factor": 0.01}}
            ]
        }"#;
        let script = Script::from_json(json).unwrap();
        assert_eq!(script.config.as_ref().unwrap().min_width, 120.0);
        assert_eq!(script.config.as_ref().unwrap().snap_threshold, 10.0);

        let replay = script.run();
        let viewports: Vec<&Viewport> = replay
            .events
            .iter()
            .filter_map(|e| match e {
                EngineEvent::ViewportChanged(v) => Some(v),
                _ => None,
            })
            .collect();
        // "+" is a no-op at the controls maximum; wheel pans; pinch clamps to 0.1.
        assert_eq!(viewports.len(), 2);
        assert_eq!(viewports[0].pan, Vec2::new(-10.0, 0.0));
        assert_eq!(viewports[1].scale, 0.1);
    }

    #[test]
    fn test_out_of_range_viewport_is_clamped() {
        let json = r#"{
            "board": {},
            "viewport": {"pan": {"x": 0.0, "y": 0.0}, "scale": 0.0},
            "events": [{"pinch": {"x": 0, "y": 0, "factor": 2.0}}]
        }"#;
        let replay = Script::from_json(json).unwrap().run();
        // Starts at the pinch minimum, so the pinch doubles it.
        assert_eq!(
            replay.events,
            vec![EngineEvent::ViewportChanged(Viewport::with_pan_and_scale(Vec2::ZERO, 0.2))]
        );
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(SNAP_SCRIPT.as_bytes()).unwrap();

        let script = Script::load(file.path()).unwrap();
        assert_eq!(script.events.len(), 3);
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = Script::load(&dir.path().join("missing.json")).unwrap_err();
        assert!(matches!(err, ReplayError::Io { .. }));
    }

    #[test]
    fn test_duplicate_ids_rejected() {
        let json = r#"{"board": {"elements": [{"id": "x", "kind": "text"}, {"id": "x", "kind": "book"}]}}"#;
        let err = Script::from_json(json).unwrap_err();
        assert!(matches!(err, ReplayError::Engine(EngineError::DuplicateElementId(_))));
    }

    #[test]
    fn test_unknown_event_is_json_error() {
        let json = r#"{"board": {}, "events": [{"teleport": {}}]}"#;
        assert!(matches!(Script::from_json(json), Err(ReplayError::Json(_))));
    }
}
