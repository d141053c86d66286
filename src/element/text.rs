use egui::{Color32, Pos2, Rect, Vec2};

use crate::error::EngineResult;
use crate::settings::TextStyle;

use super::{Element, ObjectId, common};

/// Font size floor applied when a text box is resized.
pub const MIN_TEXT_SIZE: f32 = 12.0;

/// A line of text anchored at its top-left corner.
#[derive(Debug, Clone, PartialEq)]
pub struct TextObject {
    id: ObjectId,
    pub content: String,
    pub position: Pos2,
    pub family: String,
    pub size: f32,
    pub color: Color32,
    pub bold: bool,
    pub italic: bool,
    /// Laid-out extent; zero until the text has been measured.
    measured: Vec2,
    selected: bool,
    resizable: bool,
}

impl TextObject {
    pub fn new(
        content: impl Into<String>,
        position: Pos2,
        style: &TextStyle,
        color: Color32,
    ) -> Self {
        Self {
            id: ObjectId::new(),
            content: content.into(),
            position,
            family: style.family.clone(),
            size: style.size,
            color,
            bold: style.bold,
            italic: style.italic,
            measured: Vec2::ZERO,
            selected: false,
            resizable: true,
        }
    }

    pub fn style(&self) -> TextStyle {
        TextStyle {
            family: self.family.clone(),
            size: self.size,
            bold: self.bold,
            italic: self.italic,
        }
    }

    pub fn measured_size(&self) -> Vec2 {
        self.measured
    }

    /// Record the extent produced by the last layout pass.
    pub fn set_measured_size(&mut self, size: Vec2) {
        self.measured = size;
    }

    /// Apply a resized box; the font size follows the smaller of
    /// `width / 5` and `height`, floored at `min_size`.
    pub fn resize_with_floor(&mut self, new_rect: Rect, min_size: f32) -> EngineResult<()> {
        common::validate_rect(self.id, &new_rect)?;
        self.position = new_rect.min;
        self.measured = new_rect.size();
        self.size = (new_rect.width() / 5.0).min(new_rect.height()).max(min_size);
        Ok(())
    }

    pub(super) fn reset_id(&mut self) {
        self.id = ObjectId::new();
    }
}

impl Element for TextObject {
    fn id(&self) -> ObjectId {
        self.id
    }

    fn element_type(&self) -> &'static str {
        "text"
    }

    fn rect(&self) -> Rect {
        Rect::from_min_size(self.position, self.measured)
    }

    fn hit_test(&self, pos: Pos2) -> bool {
        common::rect_contains_inclusive(self.rect(), pos)
    }

    fn set_position(&mut self, pos: Pos2) {
        self.position = pos;
    }

    fn resize(&mut self, new_rect: Rect) -> EngineResult<()> {
        self.resize_with_floor(new_rect, MIN_TEXT_SIZE)
    }

    fn is_selected(&self) -> bool {
        self.selected
    }

    fn set_selected(&mut self, selected: bool) {
        self.selected = selected;
    }

    fn is_resizable(&self) -> bool {
        self.resizable
    }

    fn set_resizable(&mut self, resizable: bool) {
        self.resizable = resizable;
    }
}
