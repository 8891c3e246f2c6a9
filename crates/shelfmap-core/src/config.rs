//! Engine configuration.

use crate::elements::DimensionTable;
use crate::error::EngineResult;
use crate::input::Modifiers;
use crate::viewport::ZoomRange;
use kurbo::Size;
use serde::{Deserialize, Serialize};

/// Modifier key that turns a drag into a duplicate.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModifierKey {
    #[default]
    Alt,
    Ctrl,
    Meta,
    Shift,
}

impl ModifierKey {
    /// Check whether this key is held in `modifiers`.
    pub fn is_held(self, modifiers: &Modifiers) -> bool {
        match self {
            ModifierKey::Alt => modifiers.alt,
            ModifierKey::Ctrl => modifiers.ctrl,
            ModifierKey::Meta => modifiers.meta,
            ModifierKey::Shift => modifiers.shift,
        }
    }
}

/// Tunables for the interaction engine.
///
/// Distances are canvas units unless the field name says otherwise.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EngineConfig {
    /// Snap when the closest edge/center distance is below this.
    pub snap_threshold: f64,
    /// Show a guide when an edge/center distance is below this.
    pub guide_threshold: f64,
    /// Fixed logical canvas size; element rects are kept inside it.
    pub canvas_extent: Size,
    pub min_width: f64,
    pub min_height: f64,
    /// Zoom range for buttons, keyboard and wheel.
    pub controls_zoom: ZoomRange,
    /// Zoom range for touch pinch.
    pub pinch_zoom: ZoomRange,
    /// Additive scale step for zoom buttons and keyboard.
    pub zoom_step: f64,
    /// Multiplicative factor per wheel notch.
    pub wheel_zoom_factor: f64,
    /// Resize handle hit radius in screen pixels.
    pub handle_hit_radius: f64,
    /// Anchor hit radius in screen pixels.
    pub anchor_hit_radius: f64,
    /// Distance of anchors outside the element bounds.
    pub anchor_offset: f64,
    /// Anchor distance for books, which carry a title overlay.
    pub book_anchor_offset: f64,
    /// Extra clearance below books for the title/author caption.
    pub book_caption_height: f64,
    pub duplicate_modifier: ModifierKey,
    pub dimensions: DimensionTable,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            snap_threshold: 10.0,
            guide_threshold: 5.0,
            canvas_extent: Size::new(2700.0, 2700.0),
            min_width: 80.0,
            min_height: 40.0,
            controls_zoom: ZoomRange::CONTROLS,
            pinch_zoom: ZoomRange::PINCH,
            zoom_step: 0.1,
            wheel_zoom_factor: 1.1,
            handle_hit_radius: 8.0,
            anchor_hit_radius: 10.0,
            anchor_offset: 12.0,
            book_anchor_offset: 28.0,
            book_caption_height: 44.0,
            duplicate_modifier: ModifierKey::Alt,
            dimensions: DimensionTable::default(),
        }
    }
}

impl EngineConfig {
    /// Load a config, filling any missing fields with defaults.
    pub fn from_json(json: &str) -> EngineResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json(&self) -> EngineResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = EngineConfig::default();
        assert_eq!(config.snap_threshold, 10.0);
        assert_eq!(config.guide_threshold, 5.0);
        assert_eq!(config.controls_zoom, ZoomRange::new(0.25, 2.0));
        assert_eq!(config.pinch_zoom, ZoomRange::new(0.1, 3.0));
        assert_eq!(config.duplicate_modifier, ModifierKey::Alt);
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config = EngineConfig::from_json(r#"{"snapThreshold": 6, "duplicateModifier": "ctrl"}"#).unwrap();
        assert_eq!(config.snap_threshold, 6.0);
        assert_eq!(config.duplicate_modifier, ModifierKey::Ctrl);
        assert_eq!(config.min_width, 80.0);
        assert_eq!(config.dimensions, DimensionTable::default());
    }

    #[test]
    fn test_invalid_json_is_error() {
        assert!(EngineConfig::from_json("{ nope").is_err());
    }

    #[test]
    fn test_modifier_key_held() {
        let modifiers = Modifiers {
            alt: true,
            ..Default::default()
        };
        assert!(ModifierKey::Alt.is_held(&modifiers));
        assert!(!ModifierKey::Ctrl.is_held(&modifiers));
    }

    #[test]
    fn test_json_roundtrip() {
        let config = EngineConfig::default();
        let json = config.to_json().unwrap();
        assert_eq!(EngineConfig::from_json(&json).unwrap(), config);
    }
}
