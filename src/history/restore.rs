use std::sync::Arc;

use tiny_skia::Pixmap;

use crate::element::{DrawableObject, Element};
use crate::error::EngineResult;
use crate::file_handler;
use crate::layer::LayerId;

/// First phase of a history restore: which snapshot to bring back.
///
/// Each request carries the layer's restore generation at the time it was
/// issued. A later request on the same layer supersedes it, so its decoded
/// result is dropped on [`crate::layer::Layer::finish_restore`].
#[derive(Debug, Clone)]
pub struct RestoreRequest {
    layer: LayerId,
    generation: u64,
    index: usize,
    raster: Arc<[u8]>,
    objects: Arc<Vec<DrawableObject>>,
}

impl RestoreRequest {
    pub(crate) fn new(
        layer: LayerId,
        generation: u64,
        index: usize,
        snapshot: &super::Snapshot,
    ) -> Self {
        Self {
            layer,
            generation,
            index,
            raster: snapshot.encoded(),
            objects: snapshot.shared_objects(),
        }
    }

    pub fn layer(&self) -> LayerId {
        self.layer
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn index(&self) -> usize {
        self.index
    }

    /// Second phase: turn the encoded raster back into pixels.
    pub async fn decode(self) -> EngineResult<DecodedSnapshot> {
        let raster = file_handler::decode_snapshot(&self.raster)?;
        let mut objects = self.objects.as_ref().clone();
        for obj in &mut objects {
            obj.set_selected(false);
        }

        Ok(DecodedSnapshot {
            layer: self.layer,
            generation: self.generation,
            raster,
            objects,
        })
    }
}

/// Decoded pixels and objects, ready to be applied to their layer.
#[derive(Debug)]
pub struct DecodedSnapshot {
    pub(crate) layer: LayerId,
    pub(crate) generation: u64,
    pub(crate) raster: Pixmap,
    pub(crate) objects: Vec<DrawableObject>,
}

impl DecodedSnapshot {
    pub fn layer(&self) -> LayerId {
        self.layer
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn raster(&self) -> &Pixmap {
        &self.raster
    }

    pub fn objects(&self) -> &[DrawableObject] {
        &self.objects
    }
}
