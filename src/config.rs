use std::fs;
use std::path::Path;

use egui::{Pos2, pos2};
use serde::{Deserialize, Serialize};

use crate::error::EngineResult;

/// Smallest logical canvas width the engine will allocate.
pub const MIN_CANVAS_WIDTH: u32 = 400;
/// Smallest logical canvas height the engine will allocate.
pub const MIN_CANVAS_HEIGHT: u32 = 300;

/// Static engine configuration, fixed for the lifetime of an editing session.
///
/// Every field has a default so partial JSON documents load cleanly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Logical canvas width
    pub width: u32,
    /// Logical canvas height
    pub height: u32,
    /// Physical pixels per logical unit
    pub device_pixel_ratio: f32,
    /// Maximum snapshots kept per layer
    pub max_history: usize,
    /// Where confirmed text objects are placed
    pub text_anchor: Pos2,
    /// Edge length of the square corner handles
    pub handle_size: f32,
    /// Minimum width/height of a shape created by dragging
    pub min_shape_size: f32,
    /// Minimum width/height an object can be resized to
    pub min_resize_size: f32,
    /// Font size floor applied when resizing text
    pub min_text_size: f32,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            width: MIN_CANVAS_WIDTH,
            height: MIN_CANVAS_HEIGHT,
            device_pixel_ratio: 1.0,
            max_history: 60,
            text_anchor: pos2(50.0, 50.0),
            handle_size: 6.0,
            min_shape_size: 5.0,
            min_resize_size: 10.0,
            min_text_size: 12.0,
        }
    }
}

impl EngineConfig {
    /// Parse a configuration from JSON, then normalize it.
    pub fn from_json_str(json: &str) -> EngineResult<Self> {
        let config: Self = serde_json::from_str(json)?;
        Ok(config.normalized())
    }

    /// Load a configuration file from disk.
    pub fn load(path: impl AsRef<Path>) -> EngineResult<Self> {
        let json = fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    /// Clamp values into the ranges the engine relies on.
    pub fn normalized(mut self) -> Self {
        self.width = self.width.max(MIN_CANVAS_WIDTH);
        self.height = self.height.max(MIN_CANVAS_HEIGHT);
        if !(self.device_pixel_ratio.is_finite() && self.device_pixel_ratio > 0.0) {
            log::warn!(
                "Ignoring device pixel ratio {}, falling back to 1.0",
                self.device_pixel_ratio
            );
            self.device_pixel_ratio = 1.0;
        }
        self.max_history = self.max_history.max(1);

        let defaults = Self::default();
        for (value, fallback) in [
            (&mut self.handle_size, defaults.handle_size),
            (&mut self.min_shape_size, defaults.min_shape_size),
            (&mut self.min_resize_size, defaults.min_resize_size),
            (&mut self.min_text_size, defaults.min_text_size),
        ] {
            if !(value.is_finite() && *value > 0.0) {
                *value = fallback;
            }
        }
        self
    }

    /// Same configuration with another canvas size, normalized.
    pub fn with_size(mut self, width: u32, height: u32) -> Self {
        self.width = width;
        self.height = height;
        self.normalized()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn broken_sizes_fall_back_to_defaults() {
        let config = EngineConfig {
            handle_size: f32::NAN,
            min_resize_size: -1.0,
            max_history: 0,
            ..EngineConfig::default()
        }
        .normalized();
        assert_eq!(config.handle_size, 6.0);
        assert_eq!(config.min_resize_size, 10.0);
        assert_eq!(config.max_history, 1);
    }

    #[test]
    fn with_size_keeps_the_minimum_canvas() {
        let config = EngineConfig::default().with_size(100, 800);
        assert_eq!((config.width, config.height), (400, 800));
    }

    #[test]
    fn partial_json_uses_defaults() {
        let config = EngineConfig::from_json_str(r#"{ "max_history": 10 }"#).unwrap();
        assert_eq!(config.max_history, 10);
        assert_eq!(config.width, 400);
        assert_eq!(config.text_anchor, pos2(50.0, 50.0));
    }

    #[test]
    fn canvas_is_clamped_to_minimum() {
        let config = EngineConfig::from_json_str(r#"{ "width": 120, "height": 900 }"#).unwrap();
        assert_eq!(config.width, 400);
        assert_eq!(config.height, 900);
    }

    #[test]
    fn bad_pixel_ratio_falls_back() {
        let config =
            EngineConfig::from_json_str(r#"{ "device_pixel_ratio": -2.0 }"#).unwrap();
        assert_eq!(config.device_pixel_ratio, 1.0);
    }

    #[test]
    fn malformed_json_is_a_config_error() {
        let err = EngineConfig::from_json_str("{ width: ").unwrap_err();
        assert!(matches!(err, crate::EngineError::Config(_)));
    }
}
