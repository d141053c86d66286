use std::sync::Arc;

use egui::Color32;
use parking_lot::{RwLock, RwLockReadGuard};
use serde::{Deserialize, Serialize};

use crate::shapes::ShapeKind;

/// Tool modes of the interaction controller
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ToolKind {
    #[default]
    Brush,
    Eraser,
    Fill,
    Shape,
    Text,
    Select,
}

impl ToolKind {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Brush => "Brush Tool",
            Self::Eraser => "Eraser Tool",
            Self::Fill => "Fill Tool",
            Self::Shape => "Shape Tool",
            Self::Text => "Text Tool",
            Self::Select => "Select Tool",
        }
    }
}

/// How the brush tool lays down paint
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BrushKind {
    #[default]
    Round,
    Square,
    Textured,
    Spray,
}

/// Font settings used when confirming a text object
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TextStyle {
    pub family: String,
    pub size: f32,
    pub bold: bool,
    pub italic: bool,
}

impl Default for TextStyle {
    fn default() -> Self {
        Self {
            family: "Arial".to_owned(),
            size: 24.0,
            bold: false,
            italic: false,
        }
    }
}

/// The tool state of an editing session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ToolSettings {
    pub tool: ToolKind,
    pub brush: BrushKind,
    pub shape: ShapeKind,
    pub color: Color32,
    pub secondary_color: Color32,
    pub size: f32,
    pub opacity: f32,
    pub flow: f32,
    pub stroke_width: f32,
    pub shape_fill: bool,
    pub shape_stroke: bool,
    pub text_background: bool,
    pub text_style: TextStyle,
}

impl Default for ToolSettings {
    fn default() -> Self {
        Self {
            tool: ToolKind::Brush,
            brush: BrushKind::Round,
            shape: ShapeKind::Rectangle,
            color: Color32::BLACK,
            secondary_color: Color32::WHITE,
            size: 5.0,
            opacity: 1.0,
            flow: 1.0,
            stroke_width: 2.0,
            shape_fill: true,
            shape_stroke: true,
            text_background: true,
            text_style: TextStyle::default(),
        }
    }
}

impl ToolSettings {
    /// Same settings with numeric fields pulled back into usable ranges.
    pub fn normalized(mut self) -> Self {
        self.normalize();
        self
    }

    /// Brush size at least 1, opacity and flow in `0..=1`, no negative
    /// stroke width. Non-finite values fall back to the defaults.
    pub fn normalize(&mut self) {
        let defaults = Self::default();
        self.size = finite_or(self.size, defaults.size).max(1.0);
        self.opacity = finite_or(self.opacity, defaults.opacity).clamp(0.0, 1.0);
        self.flow = finite_or(self.flow, defaults.flow).clamp(0.0, 1.0);
        self.stroke_width = finite_or(self.stroke_width, defaults.stroke_width).max(0.0);
        self.text_style.size = finite_or(self.text_style.size, defaults.text_style.size).max(1.0);
    }
}

fn finite_or(value: f32, fallback: f32) -> f32 {
    if value.is_finite() { value } else { fallback }
}

/// Shared handle to the session's [`ToolSettings`].
///
/// Cloning the handle shares the same settings; the controller and the
/// compositor each hold one from construction.
#[derive(Debug, Clone, Default)]
pub struct SessionSettings {
    inner: Arc<RwLock<ToolSettings>>,
}

impl SessionSettings {
    pub fn new(settings: ToolSettings) -> Self {
        Self {
            inner: Arc::new(RwLock::new(settings.normalized())),
        }
    }

    /// Borrow the settings for reading.
    pub fn read(&self) -> RwLockReadGuard<'_, ToolSettings> {
        self.inner.read()
    }

    /// Copy of the current settings.
    pub fn snapshot(&self) -> ToolSettings {
        self.inner.read().clone()
    }

    /// Edit the settings in place; the result is normalized afterwards.
    pub fn update<R>(&self, f: impl FnOnce(&mut ToolSettings) -> R) -> R {
        let mut settings = self.inner.write();
        let out = f(&mut settings);
        settings.normalize();
        out
    }

    pub fn tool(&self) -> ToolKind {
        self.inner.read().tool
    }

    pub fn brush(&self) -> BrushKind {
        self.inner.read().brush
    }

    pub fn set_brush(&self, brush: BrushKind) {
        self.inner.write().brush = brush;
    }

    pub fn shape(&self) -> ShapeKind {
        self.inner.read().shape.clone()
    }

    pub fn set_shape(&self, shape: ShapeKind) {
        self.inner.write().shape = shape;
    }

    pub fn color(&self) -> Color32 {
        self.inner.read().color
    }

    pub fn set_color(&self, color: Color32) {
        self.inner.write().color = color;
    }

    pub fn secondary_color(&self) -> Color32 {
        self.inner.read().secondary_color
    }

    /// Exchange primary and secondary colors.
    pub fn swap_colors(&self) {
        let mut settings = self.inner.write();
        let ToolSettings {
            color,
            secondary_color,
            ..
        } = &mut *settings;
        std::mem::swap(color, secondary_color);
    }

    pub fn size(&self) -> f32 {
        self.inner.read().size
    }

    pub fn set_size(&self, size: f32) {
        self.inner.write().size = size.max(1.0);
    }

    pub fn opacity(&self) -> f32 {
        self.inner.read().opacity
    }

    pub fn set_opacity(&self, opacity: f32) {
        self.inner.write().opacity = opacity.clamp(0.0, 1.0);
    }

    pub fn flow(&self) -> f32 {
        self.inner.read().flow
    }

    pub fn set_flow(&self, flow: f32) {
        self.inner.write().flow = flow.clamp(0.0, 1.0);
    }

    pub fn stroke_width(&self) -> f32 {
        self.inner.read().stroke_width
    }

    pub fn set_stroke_width(&self, width: f32) {
        self.inner.write().stroke_width = width.max(0.0);
    }

    pub fn set_shape_fill(&self, fill: bool) {
        self.inner.write().shape_fill = fill;
    }

    pub fn set_shape_stroke(&self, stroke: bool) {
        self.inner.write().shape_stroke = stroke;
    }

    pub fn text_background(&self) -> bool {
        self.inner.read().text_background
    }

    pub fn set_text_background(&self, enabled: bool) {
        self.inner.write().text_background = enabled;
    }

    pub fn text_style(&self) -> TextStyle {
        self.inner.read().text_style.clone()
    }

    pub fn set_text_style(&self, style: TextStyle) {
        self.inner.write().text_style = style;
    }
}
