use egui::{Pos2, Vec2};

use crate::element::{DrawableObject, Element, ObjectId};
use crate::error::{EngineError, EngineResult};
use crate::geometry::{Corner, handle_at, resize_rect};
use crate::settings::ToolKind;

use super::{InteractionState, Tool, ToolContext, ToolOutcome};

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SelectionState {
    Idle,
    /// `grab` is the pointer's offset from the object's top-left corner.
    MovingObject { id: ObjectId, grab: Vec2 },
    ResizingObject { id: ObjectId, corner: Corner },
    /// Panning the layer; positions here are canvas positions.
    MovingLayer { start: Pos2, origin: Vec2 },
}

/// Select, move and resize objects, or pan the layer on empty space.
#[derive(Debug, Clone)]
pub struct SelectionTool {
    state: SelectionState,
}

impl Default for SelectionTool {
    fn default() -> Self {
        Self::new()
    }
}

impl SelectionTool {
    pub fn new() -> Self {
        Self {
            state: SelectionState::Idle,
        }
    }

    pub fn state(&self) -> SelectionState {
        self.state
    }
}

impl Tool for SelectionTool {
    fn name(&self) -> &'static str {
        "Selection"
    }

    fn kind(&self) -> ToolKind {
        ToolKind::Select
    }

    fn on_pointer_down(
        &mut self,
        pos: Pos2,
        ctx: &mut ToolContext<'_>,
    ) -> EngineResult<ToolOutcome> {
        let at = ctx.local(pos);
        let Some(index) = ctx.layer.hit_test(at) else {
            ctx.layer.deselect_all();
            self.state = SelectionState::MovingLayer {
                start: pos,
                origin: ctx.layer.offset,
            };
            log::debug!("Panning layer {}", ctx.layer.id());
            ctx.render();
            return Ok(ToolOutcome::Began);
        };

        let obj = &ctx.layer.objects()[index];
        let (id, rect) = (obj.id(), obj.rect());
        let handle = if obj.is_resizable() {
            handle_at(rect, at, ctx.config.handle_size)
        } else {
            None
        };
        self.state = match handle {
            Some(corner) => {
                log::debug!("Resizing {id} from {}", corner.as_str());
                SelectionState::ResizingObject { id, corner }
            }
            None => {
                log::debug!("Moving {id}");
                SelectionState::MovingObject {
                    id,
                    grab: at - rect.min,
                }
            }
        };
        ctx.layer.select_only(id);
        ctx.render();
        Ok(ToolOutcome::Began)
    }

    fn on_pointer_move(
        &mut self,
        pos: Pos2,
        ctx: &mut ToolContext<'_>,
    ) -> EngineResult<ToolOutcome> {
        match self.state {
            SelectionState::Idle => Ok(ToolOutcome::Ignored),
            SelectionState::MovingObject { id, grab } => {
                let at = ctx.local(pos);
                let Some(obj) = ctx.layer.object_mut(id) else {
                    self.state = SelectionState::Idle;
                    return Err(EngineError::ObjectNotFound(id));
                };
                obj.set_position(at - grab);
                ctx.render();
                Ok(ToolOutcome::Redrawn)
            }
            SelectionState::ResizingObject { id, corner } => {
                let at = ctx.local(pos);
                let min_size = ctx.config.min_resize_size;
                let min_text = ctx.config.min_text_size;
                let Some(obj) = ctx.layer.object_mut(id) else {
                    self.state = SelectionState::Idle;
                    return Err(EngineError::ObjectNotFound(id));
                };
                if !obj.is_resizable() {
                    log::warn!("Ignoring resize of non-resizable {id}");
                    return Ok(ToolOutcome::Ignored);
                }
                let target = resize_rect(obj.rect(), corner, at, min_size);
                let resized = match obj {
                    DrawableObject::Text(text) => text.resize_with_floor(target, min_text),
                    other => other.resize(target),
                };
                if let Err(err) = resized {
                    log::warn!("Resize refused: {err}");
                    return Ok(ToolOutcome::Ignored);
                }
                ctx.render();
                Ok(ToolOutcome::Redrawn)
            }
            SelectionState::MovingLayer { start, origin } => {
                ctx.layer.offset = origin + (pos - start);
                Ok(ToolOutcome::Redrawn)
            }
        }
    }

    fn on_pointer_up(
        &mut self,
        _pos: Pos2,
        ctx: &mut ToolContext<'_>,
    ) -> EngineResult<ToolOutcome> {
        match std::mem::replace(&mut self.state, SelectionState::Idle) {
            SelectionState::Idle => Ok(ToolOutcome::Ignored),
            SelectionState::MovingObject { .. } | SelectionState::ResizingObject { .. } => {
                ctx.commit()?;
                Ok(ToolOutcome::Committed)
            }
            SelectionState::MovingLayer { .. } => {
                log::debug!("Layer {} offset now {:?}", ctx.layer.id(), ctx.layer.offset);
                Ok(ToolOutcome::Ended)
            }
        }
    }

    fn cancel(&mut self, _ctx: &mut ToolContext<'_>) {
        self.state = SelectionState::Idle;
    }

    fn interaction_state(&self) -> InteractionState {
        match self.state {
            SelectionState::Idle => InteractionState::Idle,
            SelectionState::MovingObject { .. } => InteractionState::MovingObject,
            SelectionState::ResizingObject { .. } => InteractionState::ResizingObject,
            SelectionState::MovingLayer { .. } => InteractionState::MovingLayer,
        }
    }
}

#[cfg(test)]
mod tests {
    use egui::{Color32, Rect, pos2, vec2};

    use super::*;
    use crate::compositor::Compositor;
    use crate::config::EngineConfig;
    use crate::element::{ShapeObject, ShapeStyle};
    use crate::layer::{Layer, LayerId};
    use crate::settings::{SessionSettings, ToolSettings};
    use crate::shapes::ShapeKind;
    use crate::tools::InteractionController;

    struct Scene {
        controller: InteractionController,
        layer: Layer,
        compositor: Compositor,
        config: EngineConfig,
        id: ObjectId,
    }

    fn scene(resizable: bool) -> Scene {
        let settings = SessionSettings::new(ToolSettings {
            tool: ToolKind::Select,
            ..ToolSettings::default()
        });
        let config = EngineConfig::default();
        let compositor = Compositor::new(settings.clone(), config.handle_size, 5.0);
        let mut layer = Layer::create(LayerId::BASE, 100, 100, 1.0, 60).unwrap();
        layer.push_history().unwrap();
        let mut shape = ShapeObject::new(
            ShapeKind::Rectangle,
            Rect::from_min_size(pos2(20.0, 20.0), vec2(40.0, 40.0)),
            ShapeStyle {
                color: Color32::RED,
                fill: true,
                stroke: false,
                stroke_width: 2.0,
            },
        );
        shape.set_resizable(resizable);
        let id = layer.add_object(shape);
        Scene {
            controller: InteractionController::with_seed(settings, 1),
            layer,
            compositor,
            config,
            id,
        }
    }

    impl Scene {
        fn drag(&mut self, from: Pos2, to: Pos2) -> InteractionState {
            let Self {
                controller,
                layer,
                compositor,
                config,
                ..
            } = self;
            controller.pointer_down(from, layer, compositor, config).unwrap();
            let state = controller.interaction_state();
            controller.pointer_move(to, layer, compositor, config).unwrap();
            controller.pointer_up(to, layer, compositor, config).unwrap();
            state
        }

        fn rect(&self) -> Rect {
            self.layer.object(self.id).unwrap().rect()
        }
    }

    #[test]
    fn corner_drag_resizes_resizable_object() {
        let mut scene = scene(true);
        let state = scene.drag(pos2(60.0, 60.0), pos2(80.0, 70.0));
        assert_eq!(state, InteractionState::ResizingObject);
        assert_eq!(scene.rect(), Rect::from_min_max(pos2(20.0, 20.0), pos2(80.0, 70.0)));
    }

    #[test]
    fn corner_drag_moves_non_resizable_object() {
        let mut scene = scene(false);
        let state = scene.drag(pos2(60.0, 60.0), pos2(70.0, 75.0));
        assert_eq!(state, InteractionState::MovingObject);
        assert_eq!(scene.rect(), Rect::from_min_size(pos2(30.0, 35.0), vec2(40.0, 40.0)));
        assert_eq!(scene.layer.history().len(), 2);
    }
}
