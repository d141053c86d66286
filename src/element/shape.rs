use egui::{Color32, Pos2, Rect, vec2};

use crate::error::EngineResult;
use crate::shapes::ShapeKind;

use super::{Element, ObjectId, common};

/// Floor on each side of a shape created by dragging.
pub const MIN_SHAPE_SIZE: f32 = 5.0;

/// Paint parameters captured when a shape is created.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShapeStyle {
    pub color: Color32,
    pub fill: bool,
    pub stroke: bool,
    pub stroke_width: f32,
}

/// A vector shape kept editable above the raster.
#[derive(Debug, Clone, PartialEq)]
pub struct ShapeObject {
    id: ObjectId,
    pub kind: ShapeKind,
    bounds: Rect,
    pub style: ShapeStyle,
    selected: bool,
    resizable: bool,
}

impl ShapeObject {
    /// Shape spanning a drag from `start` to `end`: the box is normalized
    /// to positive extent and each side is at least `min_size`.
    pub fn from_drag(
        kind: ShapeKind,
        start: Pos2,
        end: Pos2,
        style: ShapeStyle,
        min_size: f32,
    ) -> Self {
        Self {
            id: ObjectId::new(),
            kind,
            bounds: drag_rect(start, end, min_size),
            style,
            selected: false,
            resizable: true,
        }
    }

    pub fn new(kind: ShapeKind, bounds: Rect, style: ShapeStyle) -> Self {
        Self {
            id: ObjectId::new(),
            kind,
            bounds,
            style,
            selected: false,
            resizable: true,
        }
    }

    pub(super) fn reset_id(&mut self) {
        self.id = ObjectId::new();
    }
}

/// Normalized drag rectangle with a minimum extent per axis.
pub fn drag_rect(start: Pos2, end: Pos2, min_size: f32) -> Rect {
    let min = start.min(end);
    let width = (end.x - start.x).abs().max(min_size);
    let height = (end.y - start.y).abs().max(min_size);
    Rect::from_min_size(min, vec2(width, height))
}

impl Element for ShapeObject {
    fn id(&self) -> ObjectId {
        self.id
    }

    fn element_type(&self) -> &'static str {
        "shape"
    }

    fn rect(&self) -> Rect {
        self.bounds
    }

    fn hit_test(&self, pos: Pos2) -> bool {
        common::rect_contains_inclusive(self.bounds, pos)
    }

    fn set_position(&mut self, pos: Pos2) {
        self.bounds = Rect::from_min_size(pos, self.bounds.size());
    }

    fn resize(&mut self, new_rect: Rect) -> EngineResult<()> {
        common::validate_rect(self.id, &new_rect)?;
        self.bounds = new_rect;
        Ok(())
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
