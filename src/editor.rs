use std::sync::Arc;

use egui::{Pos2, pos2, vec2};
use futures::executor::block_on;
use tiny_skia::Pixmap;

use crate::compositor::Compositor;
use crate::config::{EngineConfig, MIN_CANVAS_HEIGHT, MIN_CANVAS_WIDTH};
use crate::element::{Element, ImageObject, ObjectId, TextObject};
use crate::error::{EngineError, EngineResult};
use crate::file_handler;
use crate::history::RestoreRequest;
use crate::input::{InputEvent, route_event};
use crate::layer::LayerId;
use crate::layer_stack::LayerStack;
use crate::settings::{SessionSettings, ToolKind, ToolSettings};
use crate::tools::{InteractionController, InteractionState, ToolOutcome};

/// Smallest distance between an inserted image and the canvas's top-left.
const IMAGE_MARGIN: f32 = 10.0;

/// The drawing session: layer stack, tool controller and compositor wired
/// to one shared set of tool settings.
///
/// Every mutating call leaves the active layer's frame up to date.
#[derive(Debug)]
pub struct Editor {
    config: EngineConfig,
    settings: SessionSettings,
    layers: LayerStack,
    compositor: Compositor,
    controller: InteractionController,
    status: Option<String>,
    notice: Option<String>,
    text_prompt_open: bool,
}

impl Editor {
    pub fn new(config: EngineConfig) -> EngineResult<Self> {
        Self::with_settings(config, ToolSettings::default())
    }

    pub fn with_settings(
        config: EngineConfig,
        tool_settings: ToolSettings,
    ) -> EngineResult<Self> {
        let settings = SessionSettings::new(tool_settings);
        let controller = InteractionController::new(settings.clone());
        Self::build(config, settings, controller)
    }

    /// Editor with a seeded brush RNG, so spray and textured strokes repeat.
    pub fn with_seed(config: EngineConfig, seed: u64) -> EngineResult<Self> {
        let settings = SessionSettings::default();
        let controller = InteractionController::with_seed(settings.clone(), seed);
        Self::build(config, settings, controller)
    }

    fn build(
        config: EngineConfig,
        settings: SessionSettings,
        controller: InteractionController,
    ) -> EngineResult<Self> {
        let config = config.normalized();
        let layers = LayerStack::new(
            config.width,
            config.height,
            config.device_pixel_ratio,
            config.max_history,
        )?;
        let compositor =
            Compositor::new(settings.clone(), config.handle_size, config.min_shape_size);
        let mut editor = Self {
            config,
            settings,
            layers,
            compositor,
            controller,
            status: None,
            notice: None,
            text_prompt_open: false,
        };
        editor.render_all();
        log::info!(
            "Editor ready: {}x{} @ {}x",
            editor.config.width,
            editor.config.height,
            editor.config.device_pixel_ratio
        );
        Ok(editor)
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn settings(&self) -> &SessionSettings {
        &self.settings
    }

    pub fn layers(&self) -> &LayerStack {
        &self.layers
    }

    pub fn compositor(&self) -> &Compositor {
        &self.compositor
    }

    /// Register fonts or shape tracers.
    pub fn compositor_mut(&mut self) -> &mut Compositor {
        &mut self.compositor
    }

    pub fn tool_kind(&self) -> ToolKind {
        self.controller.tool_kind()
    }

    pub fn interaction_state(&self) -> InteractionState {
        self.controller.interaction_state()
    }

    pub fn is_text_prompt_open(&self) -> bool {
        self.text_prompt_open
    }

    pub fn status(&self) -> Option<&str> {
        self.status.as_deref()
    }

    pub fn notice(&self) -> Option<&str> {
        self.notice.as_deref()
    }

    /// Hand the pending notice to the host, which shows it once.
    pub fn take_notice(&mut self) -> Option<String> {
        self.notice.take()
    }

    fn render_active(&mut self) {
        if let Some(layer) = self.layers.active_mut() {
            self.compositor.render(layer);
        }
    }

    fn render_all(&mut self) {
        for layer in self.layers.iter_mut() {
            self.compositor.render(layer);
        }
    }

    /// Render the active layer and record it in its history.
    fn commit_active(&mut self) -> EngineResult<()> {
        if let Some(layer) = self.layers.active_mut() {
            self.compositor.render(layer);
            layer.push_history()?;
        }
        Ok(())
    }

    fn cancel_gesture(&mut self) {
        if let Some(layer) = self.layers.active_mut() {
            self.controller.cancel(layer, &self.compositor, &self.config);
        }
    }

    /// Abandon the gesture and the selection on the active layer before
    /// another layer becomes active.
    fn leave_active_layer(&mut self) {
        if let Some(layer) = self.layers.active_mut() {
            self.controller.cancel(layer, &self.compositor, &self.config);
            layer.deselect_all();
            self.compositor.render(layer);
        }
    }

    // --- pointer input ---

    pub fn handle_input(&mut self, event: &InputEvent) -> EngineResult<ToolOutcome> {
        route_event(event, self)
    }

    pub fn pointer_down(&mut self, pos: Pos2) -> EngineResult<ToolOutcome> {
        if self.text_prompt_open {
            return Ok(ToolOutcome::Ignored);
        }
        let Some(layer) = self.layers.active_mut() else {
            return Ok(ToolOutcome::Ignored);
        };
        let outcome = self
            .controller
            .pointer_down(pos, layer, &self.compositor, &self.config)?;
        if outcome == ToolOutcome::TextPromptRequested {
            self.text_prompt_open = true;
        }
        Ok(outcome)
    }

    pub fn pointer_move(&mut self, pos: Pos2) -> EngineResult<ToolOutcome> {
        if self.text_prompt_open {
            return Ok(ToolOutcome::Ignored);
        }
        let Some(layer) = self.layers.active_mut() else {
            return Ok(ToolOutcome::Ignored);
        };
        self.controller.pointer_move(pos, layer, &self.compositor, &self.config)
    }

    pub fn pointer_up(&mut self, pos: Pos2) -> EngineResult<ToolOutcome> {
        if self.text_prompt_open {
            return Ok(ToolOutcome::Ignored);
        }
        let Some(layer) = self.layers.active_mut() else {
            return Ok(ToolOutcome::Ignored);
        };
        self.controller.pointer_up(pos, layer, &self.compositor, &self.config)
    }

    /// The pointer left the canvas; any gesture ends as if released there.
    pub fn pointer_leave(&mut self, last_known_position: Pos2) -> EngineResult<ToolOutcome> {
        self.pointer_up(last_known_position)
    }

    // --- tools and objects ---

    /// Switch tool mode. Leaving the select tool drops the selection.
    pub fn set_tool(&mut self, kind: ToolKind) {
        self.text_prompt_open = false;
        let Some(layer) = self.layers.active_mut() else {
            return;
        };
        self.controller.set_tool(kind, layer, &self.compositor, &self.config);
        if kind != ToolKind::Select {
            layer.deselect_all();
        }
        self.compositor.render(layer);
    }

    /// Place confirmed text at the configured anchor and commit it.
    ///
    /// Blank text closes the prompt without creating anything.
    pub fn confirm_text(&mut self, content: &str) -> EngineResult<Option<ObjectId>> {
        self.text_prompt_open = false;
        if content.trim().is_empty() {
            log::debug!("Ignoring empty text");
            return Ok(None);
        }
        let object = TextObject::new(
            content,
            self.config.text_anchor,
            &self.settings.text_style(),
            self.settings.color(),
        );
        let Some(layer) = self.layers.active_mut() else {
            return Ok(None);
        };
        let id = layer.add_object(object);
        self.commit_active()?;
        Ok(Some(id))
    }

    pub fn cancel_text(&mut self) {
        self.text_prompt_open = false;
    }

    /// Remove the selected object; only the select tool can delete.
    pub fn delete_selected(&mut self) -> EngineResult<bool> {
        if self.controller.tool_kind() != ToolKind::Select {
            return Ok(false);
        }
        let Some(layer) = self.layers.active_mut() else {
            return Ok(false);
        };
        let Some(id) = layer.selected().map(|obj| obj.id()) else {
            return Ok(false);
        };
        layer.remove_object(id);
        layer.deselect_all();
        log::info!("Deleted object {id}");
        self.commit_active()?;
        Ok(true)
    }

    /// Decode an image (PNG, JPEG, ...) and insert it as an object.
    pub fn insert_image_bytes(&mut self, bytes: &[u8]) -> EngineResult<ObjectId> {
        let bitmap = file_handler::decode_image(bytes)?;
        self.insert_image(bitmap)
    }

    pub fn insert_image_data_url(&mut self, url: &str) -> EngineResult<ObjectId> {
        let bytes = file_handler::decode_data_url(url)?;
        self.insert_image_bytes(&bytes)
    }

    /// Insert a bitmap centered on the canvas, at its natural logical size.
    pub fn insert_image(&mut self, bitmap: Pixmap) -> EngineResult<ObjectId> {
        let dpr = self.layers.device_pixel_ratio();
        let (width, height) = self.layers.size();
        let size = vec2(bitmap.width() as f32 / dpr, bitmap.height() as f32 / dpr);
        let position = pos2(
            ((width as f32 - size.x) / 2.0).max(IMAGE_MARGIN),
            ((height as f32 - size.y) / 2.0).max(IMAGE_MARGIN),
        );
        let active = self.layers.active_index();
        let layer = self.layers.active_mut().ok_or(EngineError::LayerNotFound(active))?;
        let id = layer.add_object(ImageObject::new(Arc::new(bitmap), position, size));
        self.commit_active()?;
        Ok(id)
    }

    // --- history ---

    fn apply_restore(&mut self, request: Option<RestoreRequest>) -> EngineResult<()> {
        if let Some(request) = request {
            let decoded = block_on(request.decode())?;
            if let Some(layer) = self.layers.by_id_mut(decoded.layer()) {
                layer.finish_restore(decoded)?;
            }
        }
        self.render_active();
        Ok(())
    }

    pub fn undo(&mut self) -> EngineResult<()> {
        self.cancel_gesture();
        let Some(layer) = self.layers.active_mut() else {
            return Ok(());
        };
        let request = layer.undo()?;
        self.apply_restore(request)
    }

    pub fn redo(&mut self) -> EngineResult<()> {
        self.cancel_gesture();
        let Some(layer) = self.layers.active_mut() else {
            return Ok(());
        };
        let request = layer.redo()?;
        self.apply_restore(request)
    }

    /// Blank the active layer, drop its objects and restart its history.
    pub fn clear(&mut self) -> EngineResult<()> {
        self.cancel_gesture();
        let Some(layer) = self.layers.active_mut() else {
            return Ok(());
        };
        layer.objects_mut().clear();
        let request = layer.load_state(None)?;
        self.apply_restore(request)
    }

    pub fn flip_horizontal(&mut self) -> EngineResult<()> {
        self.cancel_gesture();
        if let Some(layer) = self.layers.active_mut() {
            layer.flip_horizontal();
        }
        self.commit_active()
    }

    pub fn flip_vertical(&mut self) -> EngineResult<()> {
        self.cancel_gesture();
        if let Some(layer) = self.layers.active_mut() {
            layer.flip_vertical();
        }
        self.commit_active()
    }

    // --- layers ---

    pub fn add_layer(&mut self) -> EngineResult<LayerId> {
        self.leave_active_layer();
        let id = self.layers.add_layer()?;
        self.render_active();
        self.status = Some(format!("New Layer {} added", id.index() + 1));
        Ok(id)
    }

    /// Delete the active layer. The last layer is never deleted; the
    /// refusal is left in [`Editor::notice`].
    pub fn delete_layer(&mut self) -> EngineResult<()> {
        self.leave_active_layer();
        match self.layers.remove_active() {
            Ok(_) => {
                self.render_active();
                self.status = Some("Layer deleted".to_owned());
                Ok(())
            }
            Err(err @ EngineError::LastLayer) => {
                self.notice = Some(err.to_string());
                Err(err)
            }
            Err(err) => Err(err),
        }
    }

    pub fn duplicate_layer(&mut self) -> EngineResult<LayerId> {
        self.leave_active_layer();
        let id = self.layers.duplicate_active()?;
        self.render_active();
        self.status = Some("Layer duplicated".to_owned());
        Ok(id)
    }

    pub fn move_layer_up(&mut self) -> bool {
        self.cancel_gesture();
        self.layers.move_active_up()
    }

    pub fn move_layer_down(&mut self) -> bool {
        self.cancel_gesture();
        self.layers.move_active_down()
    }

    pub fn move_layer(&mut self, from: usize, to: usize) -> EngineResult<()> {
        self.cancel_gesture();
        self.layers.move_layer(from, to)
    }

    pub fn set_active_layer(&mut self, index: usize) {
        if index == self.layers.active_index() {
            return;
        }
        self.leave_active_layer();
        self.layers.set_active(index);
        self.render_active();
    }

    pub fn toggle_layer_visibility(&mut self, index: usize) -> EngineResult<bool> {
        self.layers.toggle_visibility(index)
    }

    pub fn rename_layer(&mut self, index: usize, name: impl Into<String>) -> EngineResult<()> {
        self.layers.rename(index, name)
    }

    /// Follow the host viewport. Sizes below the canvas minimum are
    /// raised to it.
    pub fn resize_viewport(&mut self, width: u32, height: u32) -> EngineResult<()> {
        let width = width.max(MIN_CANVAS_WIDTH);
        let height = height.max(MIN_CANVAS_HEIGHT);
        if (width, height) == self.layers.size() {
            return Ok(());
        }
        self.cancel_gesture();
        self.layers.resize(width, height)?;
        self.config.width = width;
        self.config.height = height;
        self.render_all();
        log::info!("Viewport resized to {width}x{height}");
        Ok(())
    }

    // --- export ---

    /// Every visible layer composited over white, without selection marks.
    pub fn flatten(&mut self) -> EngineResult<Pixmap> {
        let (width, height) = self.layers.size();
        let dpr = self.layers.device_pixel_ratio();
        self.compositor.flatten(self.layers.iter_mut(), width, height, dpr)
    }

    pub fn export_png(&mut self) -> EngineResult<Vec<u8>> {
        file_handler::encode_png(&self.flatten()?)
    }

    pub fn export_data_url(&mut self) -> EngineResult<String> {
        Ok(file_handler::png_data_url(&self.export_png()?))
    }
}
