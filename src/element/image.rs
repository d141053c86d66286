use std::sync::Arc;

use egui::{Pos2, Rect, Vec2};
use tiny_skia::Pixmap;

use crate::error::EngineResult;

use super::{Element, ObjectId, common};

/// A bitmap placed above the raster, scaled into its box when painted.
#[derive(Clone)]
pub struct ImageObject {
    id: ObjectId,
    bitmap: Arc<Pixmap>,
    pub position: Pos2,
    pub size: Vec2,
    selected: bool,
    resizable: bool,
}

// Pixmap has no useful Debug output
impl std::fmt::Debug for ImageObject {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ImageObject")
            .field("id", &self.id)
            .field("bitmap", &(self.bitmap.width(), self.bitmap.height()))
            .field("position", &self.position)
            .field("size", &self.size)
            .field("selected", &self.selected)
            .finish()
    }
}

impl PartialEq for ImageObject {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
            && Arc::ptr_eq(&self.bitmap, &other.bitmap)
            && self.position == other.position
            && self.size == other.size
            && self.selected == other.selected
            && self.resizable == other.resizable
    }
}

impl ImageObject {
    pub fn new(bitmap: Arc<Pixmap>, position: Pos2, size: Vec2) -> Self {
        Self {
            id: ObjectId::new(),
            bitmap,
            position,
            size,
            selected: false,
            resizable: true,
        }
    }

    pub fn bitmap(&self) -> &Pixmap {
        &self.bitmap
    }

    pub(super) fn reset_id(&mut self) {
        self.id = ObjectId::new();
    }
}

impl Element for ImageObject {
    fn id(&self) -> ObjectId {
        self.id
    }

    fn element_type(&self) -> &'static str {
        "image"
    }

    fn rect(&self) -> Rect {
        Rect::from_min_size(self.position, self.size)
    }

    fn hit_test(&self, pos: Pos2) -> bool {
        common::rect_contains_inclusive(self.rect(), pos)
    }

    fn set_position(&mut self, pos: Pos2) {
        self.position = pos;
    }

    fn resize(&mut self, new_rect: Rect) -> EngineResult<()> {
        common::validate_rect(self.id, &new_rect)?;
        self.position = new_rect.min;
        self.size = new_rect.size();
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
