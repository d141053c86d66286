use crate::error::{EngineError, EngineResult};
use crate::layer::{Layer, LayerId};

/// Ordered layers, bottom first, with one active layer.
///
/// Never empty: it is built with a base layer and refuses to delete the
/// last remaining one.
#[derive(Debug)]
pub struct LayerStack {
    layers: Vec<Layer>,
    active: usize,
    next_id: usize,
    width: u32,
    height: u32,
    dpr: f32,
    max_history: usize,
}

impl LayerStack {
    /// A stack holding the white base layer with its baseline history entry.
    pub fn new(width: u32, height: u32, dpr: f32, max_history: usize) -> EngineResult<Self> {
        let mut base = Layer::create(LayerId::BASE, width, height, dpr, max_history)?;
        base.push_history()?;
        Ok(Self {
            layers: vec![base],
            active: 0,
            next_id: 1,
            width,
            height,
            dpr,
            max_history,
        })
    }

    /// Logical canvas size shared by every layer.
    pub fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    pub fn device_pixel_ratio(&self) -> f32 {
        self.dpr
    }

    pub fn len(&self) -> usize {
        self.layers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }

    pub fn layers(&self) -> &[Layer] {
        &self.layers
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Layer> {
        self.layers.iter_mut()
    }

    pub fn get(&self, index: usize) -> Option<&Layer> {
        self.layers.get(index)
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut Layer> {
        self.layers.get_mut(index)
    }

    pub fn by_id_mut(&mut self, id: LayerId) -> Option<&mut Layer> {
        self.layers.iter_mut().find(|layer| layer.id() == id)
    }

    pub fn active_index(&self) -> usize {
        self.active
    }

    pub fn active(&self) -> Option<&Layer> {
        self.layers.get(self.active)
    }

    pub fn active_mut(&mut self) -> Option<&mut Layer> {
        self.layers.get_mut(self.active)
    }

    /// Make `index` the active layer, clamped into range.
    pub fn set_active(&mut self, index: usize) {
        self.active = index.min(self.layers.len().saturating_sub(1));
    }

    /// Append a transparent layer on top and activate it.
    pub fn add_layer(&mut self) -> EngineResult<LayerId> {
        let id = LayerId::new(self.next_id);
        let mut layer = Layer::create(id, self.width, self.height, self.dpr, self.max_history)?;
        layer.push_history()?;
        self.next_id += 1;
        self.layers.push(layer);
        self.active = self.layers.len() - 1;
        log::info!("Added layer {id}");
        Ok(id)
    }

    /// Delete the active layer; the one below it becomes active.
    pub fn remove_active(&mut self) -> EngineResult<Layer> {
        if self.layers.len() <= 1 {
            log::warn!("Refusing to delete the last layer");
            return Err(EngineError::LastLayer);
        }
        let removed = self.layers.remove(self.active);
        self.active = self.active.saturating_sub(1);
        log::info!("Deleted layer {}", removed.id());
        Ok(removed)
    }

    /// Copy the active layer onto the top of the stack and activate the copy.
    pub fn duplicate_active(&mut self) -> EngineResult<LayerId> {
        let id = LayerId::new(self.next_id);
        let source = self.layers.get(self.active).ok_or(EngineError::LayerNotFound(self.active))?;
        let copy = source.duplicate(id, self.max_history)?;
        self.next_id += 1;
        self.layers.push(copy);
        self.active = self.layers.len() - 1;
        log::info!("Duplicated layer into {id}");
        Ok(id)
    }

    /// Move the layer at `from` to position `to`; the active layer follows
    /// the move if it is the one being moved.
    pub fn move_layer(&mut self, from: usize, to: usize) -> EngineResult<()> {
        if from >= self.layers.len() {
            return Err(EngineError::LayerNotFound(from));
        }
        let to = to.min(self.layers.len() - 1);
        if from == to {
            return Ok(());
        }
        let active_id = self.layers[self.active].id();
        let layer = self.layers.remove(from);
        self.layers.insert(to, layer);
        if let Some(index) = self.layers.iter().position(|layer| layer.id() == active_id) {
            self.active = index;
        }
        Ok(())
    }

    /// Raise the active layer one step; `false` when already on top.
    pub fn move_active_up(&mut self) -> bool {
        let from = self.active;
        if from + 1 >= self.layers.len() {
            return false;
        }
        self.move_layer(from, from + 1).is_ok()
    }

    /// Lower the active layer one step; `false` when already at the bottom.
    pub fn move_active_down(&mut self) -> bool {
        let from = self.active;
        if from == 0 {
            return false;
        }
        self.move_layer(from, from - 1).is_ok()
    }

    pub fn toggle_visibility(&mut self, index: usize) -> EngineResult<bool> {
        let layer = self.layers.get_mut(index).ok_or(EngineError::LayerNotFound(index))?;
        layer.visible = !layer.visible;
        Ok(layer.visible)
    }

    pub fn rename(&mut self, index: usize, name: impl Into<String>) -> EngineResult<()> {
        let layer = self.layers.get_mut(index).ok_or(EngineError::LayerNotFound(index))?;
        layer.name = name.into();
        Ok(())
    }

    /// Reallocate every layer to a new logical size.
    pub fn resize(&mut self, width: u32, height: u32) -> EngineResult<()> {
        for layer in &mut self.layers {
            layer.resize(width, height)?;
        }
        self.width = width;
        self.height = height;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stack() -> LayerStack {
        LayerStack::new(20, 20, 1.0, 60).unwrap()
    }

    #[test]
    fn starts_with_base_layer_and_baseline() {
        let stack = stack();
        assert_eq!(stack.len(), 1);
        assert!(stack.active().unwrap().is_base());
        assert_eq!(stack.active().unwrap().history().len(), 1);
    }

    #[test]
    fn last_layer_cannot_be_removed() {
        let mut stack = stack();
        assert!(matches!(stack.remove_active(), Err(EngineError::LastLayer)));
        assert_eq!(stack.len(), 1);
    }

    #[test]
    fn remove_activates_layer_below() {
        let mut stack = stack();
        stack.add_layer().unwrap();
        stack.add_layer().unwrap();
        assert_eq!(stack.active_index(), 2);
        stack.remove_active().unwrap();
        assert_eq!(stack.active_index(), 1);
        stack.set_active(0);
        stack.remove_active().unwrap();
        assert_eq!(stack.active_index(), 0);
        assert_eq!(stack.len(), 1);
    }

    #[test]
    fn ids_stay_unique_after_deletes() {
        let mut stack = stack();
        let first = stack.add_layer().unwrap();
        stack.remove_active().unwrap();
        let second = stack.add_layer().unwrap();
        assert_ne!(first, second);
    }

    #[test]
    fn reorder_keeps_active_layer() {
        let mut stack = stack();
        let top = stack.add_layer().unwrap();
        assert!(stack.move_active_down());
        assert_eq!(stack.active_index(), 0);
        assert_eq!(stack.active().unwrap().id(), top);
        assert!(!stack.move_active_down());
        assert!(stack.move_active_up());
        assert_eq!(stack.get(1).unwrap().id(), top);
    }

    #[test]
    fn set_active_clamps() {
        let mut stack = stack();
        stack.add_layer().unwrap();
        stack.set_active(10);
        assert_eq!(stack.active_index(), 1);
    }
}
