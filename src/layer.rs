use std::fmt;

use egui::{Color32, Pos2, Vec2};
use serde::{Deserialize, Serialize};
use tiny_skia::Pixmap;

use crate::element::{DrawableObject, Element, ObjectId};
use crate::error::EngineResult;
use crate::geometry::hit_testing::topmost_hit;
use crate::history::{DecodedSnapshot, History, RestoreRequest, Snapshot};
use crate::raster;

/// A unique identifier for a layer, assigned in creation order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct LayerId(pub usize);

impl LayerId {
    /// The layer created with the document; it starts opaque white.
    pub const BASE: LayerId = LayerId(0);

    pub fn new(index: usize) -> Self {
        Self(index)
    }

    pub fn index(&self) -> usize {
        self.0
    }
}

impl fmt::Display for LayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One paintable surface with its overlay objects and snapshot history.
///
/// `raster` holds committed paint only. `frame` is what the compositor
/// last produced from it: the raster, the objects on top and the
/// selection decorations.
pub struct Layer {
    id: LayerId,
    pub name: String,
    width: u32,
    height: u32,
    dpr: f32,
    raster: Pixmap,
    frame: Pixmap,
    objects: Vec<DrawableObject>,
    history: History,
    pub visible: bool,
    /// Pan applied at display and export time, not part of history.
    pub offset: Vec2,
    restore_generation: u64,
}

impl fmt::Debug for Layer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Layer")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("size", &(self.width, self.height))
            .field("objects", &self.objects.len())
            .field("history", &(self.history.index(), self.history.len()))
            .field("visible", &self.visible)
            .field("offset", &self.offset)
            .finish_non_exhaustive()
    }
}

impl Layer {
    /// Allocate a blank layer of the given logical size.
    ///
    /// The base layer is filled opaque white, every other layer starts
    /// transparent. History starts empty.
    pub fn create(
        id: LayerId,
        width: u32,
        height: u32,
        dpr: f32,
        max_history: usize,
    ) -> EngineResult<Self> {
        let mut raster = raster::new_surface(width, height, dpr)?;
        if id == LayerId::BASE {
            raster::fill_solid(&mut raster, Color32::WHITE);
        }
        let frame = raster.clone();
        log::debug!("Created layer {id} ({width}x{height} @ {dpr}x)");
        Ok(Self {
            id,
            name: format!("Layer {}", id.index() + 1),
            width,
            height,
            dpr,
            raster,
            frame,
            objects: Vec::new(),
            history: History::new(max_history),
            visible: true,
            offset: Vec2::ZERO,
            restore_generation: 0,
        })
    }

    pub fn id(&self) -> LayerId {
        self.id
    }

    pub fn is_base(&self) -> bool {
        self.id == LayerId::BASE
    }

    /// Logical size
    pub fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    pub fn device_pixel_ratio(&self) -> f32 {
        self.dpr
    }

    pub fn raster(&self) -> &Pixmap {
        &self.raster
    }

    pub fn raster_mut(&mut self) -> &mut Pixmap {
        &mut self.raster
    }

    pub fn frame(&self) -> &Pixmap {
        &self.frame
    }

    pub(crate) fn frame_mut(&mut self) -> &mut Pixmap {
        &mut self.frame
    }

    /// Split borrow for the compositor: raster and objects read, frame written.
    pub(crate) fn render_parts(&mut self) -> (&Pixmap, &mut [DrawableObject], &mut Pixmap) {
        (&self.raster, &mut self.objects, &mut self.frame)
    }

    pub fn objects(&self) -> &[DrawableObject] {
        &self.objects
    }

    pub fn objects_mut(&mut self) -> &mut Vec<DrawableObject> {
        &mut self.objects
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    /// Blank pixels for this layer: white for the base layer, clear otherwise.
    fn blank(&mut self) {
        if self.is_base() {
            raster::fill_solid(&mut self.raster, Color32::WHITE);
        } else {
            self.raster.fill(tiny_skia::Color::TRANSPARENT);
        }
    }

    /// Record the current raster and objects as a new history entry.
    pub fn push_history(&mut self) -> EngineResult<()> {
        let snapshot = Snapshot::capture(&self.raster, &self.objects)?;
        log::debug!(
            "Layer {}: history entry {} ({} bytes)",
            self.id,
            self.history.len(),
            snapshot.encoded_len()
        );
        self.history.push(snapshot);
        Ok(())
    }

    /// Move the history cursor to `index` and issue a restore for it.
    ///
    /// Returns `None` when `index` is out of range. Any request issued
    /// earlier for this layer becomes stale.
    pub fn begin_restore(&mut self, index: usize) -> Option<RestoreRequest> {
        if !self.history.set_index(index) {
            return None;
        }
        self.restore_generation += 1;
        let snapshot = self.history.get(index)?;
        Some(RestoreRequest::new(self.id, self.restore_generation, index, snapshot))
    }

    /// Apply a decoded snapshot unless a newer restore superseded it.
    pub fn finish_restore(&mut self, decoded: DecodedSnapshot) -> EngineResult<bool> {
        if decoded.layer != self.id || decoded.generation != self.restore_generation {
            log::debug!(
                "Layer {}: dropping stale restore (generation {}, current {})",
                self.id,
                decoded.generation,
                self.restore_generation
            );
            return Ok(false);
        }

        let DecodedSnapshot { raster, objects, .. } = decoded;
        let same_size =
            raster.width() == self.raster.width() && raster.height() == self.raster.height();
        self.raster = if same_size {
            raster
        } else {
            raster::rescale(&raster, self.width, self.height, self.dpr)?
        };
        self.objects = objects;
        Ok(true)
    }

    /// Jump to history entry `index`, or reset the layer when it is `None`
    /// or out of range.
    ///
    /// A reset blanks the raster, drops every object and records a fresh
    /// baseline entry; it completes synchronously and returns `None`.
    pub fn load_state(&mut self, index: Option<usize>) -> EngineResult<Option<RestoreRequest>> {
        if let Some(request) = index.and_then(|index| self.begin_restore(index)) {
            return Ok(Some(request));
        }

        log::info!("Layer {}: reset to blank", self.id);
        self.restore_generation += 1;
        self.blank();
        self.objects.clear();
        self.history.clear();
        self.push_history()?;
        Ok(None)
    }

    /// Step back one entry; stepping back from the first entry resets.
    pub fn undo(&mut self) -> EngineResult<Option<RestoreRequest>> {
        match self.history.index() {
            Some(index) if index > 0 => self.load_state(Some(index - 1)),
            _ => self.load_state(None),
        }
    }

    /// Step forward one entry if there is one.
    pub fn redo(&mut self) -> EngineResult<Option<RestoreRequest>> {
        match self.history.index() {
            Some(index) if self.history.can_redo() => self.load_state(Some(index + 1)),
            _ => Ok(None),
        }
    }

    /// Index of the topmost object under `pos` (layer coordinates).
    pub fn hit_test(&self, pos: Pos2) -> Option<usize> {
        topmost_hit(&self.objects, pos)
    }

    pub fn object_index(&self, id: ObjectId) -> Option<usize> {
        self.objects.iter().position(|obj| obj.id() == id)
    }

    pub fn object(&self, id: ObjectId) -> Option<&DrawableObject> {
        self.objects.iter().find(|obj| obj.id() == id)
    }

    pub fn object_mut(&mut self, id: ObjectId) -> Option<&mut DrawableObject> {
        self.objects.iter_mut().find(|obj| obj.id() == id)
    }

    pub fn selected(&self) -> Option<&DrawableObject> {
        self.objects.iter().find(|obj| obj.is_selected())
    }

    /// Select exactly the object with `id`.
    pub fn select_only(&mut self, id: ObjectId) {
        for obj in &mut self.objects {
            obj.set_selected(obj.id() == id);
        }
    }

    pub fn deselect_all(&mut self) {
        for obj in &mut self.objects {
            obj.set_selected(false);
        }
    }

    /// Append on top of the paint order and return its id.
    pub fn add_object(&mut self, obj: impl Into<DrawableObject>) -> ObjectId {
        let obj = obj.into();
        let id = obj.id();
        log::debug!("Layer {}: added {} {id}", self.id, obj.element_type());
        self.objects.push(obj);
        id
    }

    pub fn remove_object(&mut self, id: ObjectId) -> Option<DrawableObject> {
        let index = self.object_index(id)?;
        Some(self.objects.remove(index))
    }

    /// Deep copy under a new id: same pixels, objects with fresh ids,
    /// history holding only a baseline of the copied state.
    pub fn duplicate(&self, id: LayerId, max_history: usize) -> EngineResult<Self> {
        let mut copy = Self::create(id, self.width, self.height, self.dpr, max_history)?;
        copy.raster = self.raster.clone();
        copy.frame = self.frame.clone();
        copy.objects = self.objects.iter().map(DrawableObject::duplicate).collect();
        copy.visible = self.visible;
        copy.push_history()?;
        Ok(copy)
    }

    /// Reallocate to a new logical size, stretching the current raster into it.
    pub fn resize(&mut self, width: u32, height: u32) -> EngineResult<()> {
        if (width, height) == (self.width, self.height) {
            return Ok(());
        }
        self.raster = raster::rescale(&self.raster, width, height, self.dpr)?;
        self.frame = raster::new_surface(width, height, self.dpr)?;
        self.width = width;
        self.height = height;
        Ok(())
    }

    pub fn flip_horizontal(&mut self) {
        raster::flip_horizontal(&mut self.raster);
    }

    pub fn flip_vertical(&mut self) {
        raster::flip_vertical(&mut self.raster);
    }
}
