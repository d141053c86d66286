//! Per-layer snapshot history.

use std::collections::VecDeque;
use std::sync::Arc;

use tiny_skia::Pixmap;

use crate::element::DrawableObject;
use crate::error::EngineResult;
use crate::file_handler;

mod restore;

pub use restore::{DecodedSnapshot, RestoreRequest};

/// Default bound on snapshots kept per layer.
pub const DEFAULT_MAX_HISTORY: usize = 60;

/// Immutable capture of a layer: its encoded raster plus its object list.
#[derive(Debug, Clone)]
pub struct Snapshot {
    raster: Arc<[u8]>,
    width: u32,
    height: u32,
    objects: Arc<Vec<DrawableObject>>,
}

impl Snapshot {
    /// Encode `raster` and copy `objects`.
    pub fn capture(raster: &Pixmap, objects: &[DrawableObject]) -> EngineResult<Self> {
        let encoded = file_handler::encode_snapshot(raster)?;
        Ok(Self {
            raster: encoded.into(),
            width: raster.width(),
            height: raster.height(),
            objects: Arc::new(objects.to_vec()),
        })
    }

    pub fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    pub fn encoded_len(&self) -> usize {
        self.raster.len()
    }

    pub fn objects(&self) -> &[DrawableObject] {
        &self.objects
    }

    pub(crate) fn encoded(&self) -> Arc<[u8]> {
        Arc::clone(&self.raster)
    }

    pub(crate) fn shared_objects(&self) -> Arc<Vec<DrawableObject>> {
        Arc::clone(&self.objects)
    }
}

/// Bounded snapshot stack with a cursor.
///
/// `index` is `None` only while the history is empty.
#[derive(Debug, Clone)]
pub struct History {
    entries: VecDeque<Snapshot>,
    index: Option<usize>,
    capacity: usize,
}

impl Default for History {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_HISTORY)
    }
}

impl History {
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: VecDeque::new(),
            index: None,
            capacity: capacity.max(1),
        }
    }

    /// Append a snapshot after the cursor.
    ///
    /// Anything past the cursor (the redo branch) is dropped first, and the
    /// oldest entry is evicted once the capacity is exceeded.
    pub fn push(&mut self, snapshot: Snapshot) {
        match self.index {
            Some(index) => self.entries.truncate(index + 1),
            None => self.entries.clear(),
        }
        self.entries.push_back(snapshot);
        while self.entries.len() > self.capacity {
            self.entries.pop_front();
        }
        self.index = Some(self.entries.len() - 1);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn index(&self) -> Option<usize> {
        self.index
    }

    pub fn get(&self, index: usize) -> Option<&Snapshot> {
        self.entries.get(index)
    }

    pub fn current(&self) -> Option<&Snapshot> {
        self.index.and_then(|index| self.entries.get(index))
    }

    /// Undo is always possible on a non-empty history; stepping back
    /// from the first entry resets the layer.
    pub fn can_undo(&self) -> bool {
        self.index.is_some()
    }

    pub fn can_redo(&self) -> bool {
        self.index.is_some_and(|index| index + 1 < self.entries.len())
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.index = None;
    }

    /// Move the cursor; out-of-range indices are ignored.
    pub(crate) fn set_index(&mut self, index: usize) -> bool {
        if index < self.entries.len() {
            self.index = Some(index);
            true
        } else {
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::raster::new_surface;

    fn snapshot() -> Snapshot {
        let surface = new_surface(4, 4, 1.0).unwrap();
        Snapshot::capture(&surface, &[]).unwrap()
    }

    #[test]
    fn push_moves_cursor_to_tail() {
        let mut history = History::new(5);
        assert_eq!(history.index(), None);
        history.push(snapshot());
        history.push(snapshot());
        assert_eq!(history.len(), 2);
        assert_eq!(history.index(), Some(1));
        assert!(!history.can_redo());
    }

    #[test]
    fn capacity_evicts_oldest() {
        let mut history = History::new(3);
        for _ in 0..7 {
            history.push(snapshot());
        }
        assert_eq!(history.len(), 3);
        assert_eq!(history.index(), Some(2));
    }

    #[test]
    fn push_after_rewind_prunes_redo_branch() {
        let mut history = History::new(10);
        for _ in 0..4 {
            history.push(snapshot());
        }
        assert!(history.set_index(1));
        assert!(history.can_redo());
        history.push(snapshot());
        assert_eq!(history.len(), 3);
        assert_eq!(history.index(), Some(2));
        assert!(!history.can_redo());
    }

    #[test]
    fn set_index_rejects_out_of_range() {
        let mut history = History::new(10);
        history.push(snapshot());
        assert!(!history.set_index(3));
        assert_eq!(history.index(), Some(0));
    }
}
