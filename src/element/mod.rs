use egui::{Pos2, Rect, Vec2};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::EngineResult;

mod common;
pub mod image;
pub mod shape;
pub mod text;

pub use image::ImageObject;
pub use shape::{MIN_SHAPE_SIZE, ShapeObject, ShapeStyle};
pub use text::{MIN_TEXT_SIZE, TextObject};

/// Unique identifier of an object, stable across moves and resizes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ObjectId(Uuid);

impl ObjectId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ObjectId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for ObjectId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Common trait that all layer objects implement
pub trait Element {
    /// Get the unique identifier for this element
    fn id(&self) -> ObjectId;

    /// Get the element type as a string
    fn element_type(&self) -> &'static str;

    /// Get the bounding rectangle in layer coordinates
    fn rect(&self) -> Rect;

    /// Test if the element contains the given position (edges inclusive)
    fn hit_test(&self, pos: Pos2) -> bool;

    /// Move the top-left corner to `pos`
    fn set_position(&mut self, pos: Pos2);

    /// Resize the element to the new rectangle
    fn resize(&mut self, new_rect: Rect) -> EngineResult<()>;

    fn is_selected(&self) -> bool;

    fn set_selected(&mut self, selected: bool);

    /// Whether corner handles are offered when selected
    fn is_resizable(&self) -> bool;

    fn set_resizable(&mut self, resizable: bool);

    /// Shift the element by `delta`
    fn translate(&mut self, delta: Vec2) {
        let min = self.rect().min;
        self.set_position(min + delta);
    }
}

/// Enumeration of all object kinds a layer can hold
#[derive(Debug, Clone, PartialEq)]
pub enum DrawableObject {
    Text(TextObject),
    Shape(ShapeObject),
    Image(ImageObject),
}

impl DrawableObject {
    /// Copy with a fresh id and no selection.
    pub fn duplicate(&self) -> Self {
        let mut copy = self.clone();
        match &mut copy {
            DrawableObject::Text(t) => t.reset_id(),
            DrawableObject::Shape(s) => s.reset_id(),
            DrawableObject::Image(i) => i.reset_id(),
        }
        copy.set_selected(false);
        copy
    }

    pub fn as_text(&self) -> Option<&TextObject> {
        match self {
            DrawableObject::Text(t) => Some(t),
            _ => None,
        }
    }

    pub fn as_text_mut(&mut self) -> Option<&mut TextObject> {
        match self {
            DrawableObject::Text(t) => Some(t),
            _ => None,
        }
    }

    pub fn as_shape(&self) -> Option<&ShapeObject> {
        match self {
            DrawableObject::Shape(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_image(&self) -> Option<&ImageObject> {
        match self {
            DrawableObject::Image(i) => Some(i),
            _ => None,
        }
    }
}

impl From<TextObject> for DrawableObject {
    fn from(value: TextObject) -> Self {
        DrawableObject::Text(value)
    }
}

impl From<ShapeObject> for DrawableObject {
    fn from(value: ShapeObject) -> Self {
        DrawableObject::Shape(value)
    }
}

impl From<ImageObject> for DrawableObject {
    fn from(value: ImageObject) -> Self {
        DrawableObject::Image(value)
    }
}

impl Element for DrawableObject {
    fn id(&self) -> ObjectId {
        match self {
            DrawableObject::Text(t) => t.id(),
            DrawableObject::Shape(s) => s.id(),
            DrawableObject::Image(i) => i.id(),
        }
    }

    fn element_type(&self) -> &'static str {
        match self {
            DrawableObject::Text(t) => t.element_type(),
            DrawableObject::Shape(s) => s.element_type(),
            DrawableObject::Image(i) => i.element_type(),
        }
    }

    fn rect(&self) -> Rect {
        match self {
            DrawableObject::Text(t) => t.rect(),
            DrawableObject::Shape(s) => s.rect(),
            DrawableObject::Image(i) => i.rect(),
        }
    }

    fn hit_test(&self, pos: Pos2) -> bool {
        match self {
            DrawableObject::Text(t) => t.hit_test(pos),
            DrawableObject::Shape(s) => s.hit_test(pos),
            DrawableObject::Image(i) => i.hit_test(pos),
        }
    }

    fn set_position(&mut self, pos: Pos2) {
        match self {
            DrawableObject::Text(t) => t.set_position(pos),
            DrawableObject::Shape(s) => s.set_position(pos),
            DrawableObject::Image(i) => i.set_position(pos),
        }
    }

    fn resize(&mut self, new_rect: Rect) -> EngineResult<()> {
        match self {
            DrawableObject::Text(t) => t.resize(new_rect),
            DrawableObject::Shape(s) => s.resize(new_rect),
            DrawableObject::Image(i) => i.resize(new_rect),
        }
    }

    fn is_selected(&self) -> bool {
        match self {
            DrawableObject::Text(t) => t.is_selected(),
            DrawableObject::Shape(s) => s.is_selected(),
            DrawableObject::Image(i) => i.is_selected(),
        }
    }

    fn set_selected(&mut self, selected: bool) {
        match self {
            DrawableObject::Text(t) => t.set_selected(selected),
            DrawableObject::Shape(s) => s.set_selected(selected),
            DrawableObject::Image(i) => i.set_selected(selected),
        }
    }

    fn is_resizable(&self) -> bool {
        match self {
            DrawableObject::Text(t) => t.is_resizable(),
            DrawableObject::Shape(s) => s.is_resizable(),
            DrawableObject::Image(i) => i.is_resizable(),
        }
    }

    fn set_resizable(&mut self, resizable: bool) {
        match self {
            DrawableObject::Text(t) => t.set_resizable(resizable),
            DrawableObject::Shape(s) => s.set_resizable(resizable),
            DrawableObject::Image(i) => i.set_resizable(resizable),
        }
    }
}
