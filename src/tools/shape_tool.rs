use egui::Pos2;
use tiny_skia::Pixmap;

use crate::element::{ShapeObject, ShapeStyle};
use crate::error::EngineResult;
use crate::settings::ToolKind;
use crate::shapes::ShapeKind;

use super::{InteractionState, Tool, ToolContext, ToolOutcome};

#[derive(Debug, Clone)]
pub enum ShapePreviewState {
    Idle,
    /// `scratch` is the frame as it was at pointer-down; every move
    /// restores it before painting the preview.
    Previewing {
        start: Pos2,
        kind: ShapeKind,
        scratch: Pixmap,
    },
}

/// Drag out a shape object, with a live preview while dragging.
#[derive(Debug, Clone)]
pub struct ShapeTool {
    state: ShapePreviewState,
}

impl Default for ShapeTool {
    fn default() -> Self {
        Self::new()
    }
}

impl ShapeTool {
    pub fn new() -> Self {
        Self {
            state: ShapePreviewState::Idle,
        }
    }

    pub fn state(&self) -> &ShapePreviewState {
        &self.state
    }
}

impl Tool for ShapeTool {
    fn name(&self) -> &'static str {
        "Shape"
    }

    fn kind(&self) -> ToolKind {
        ToolKind::Shape
    }

    fn on_pointer_down(
        &mut self,
        pos: Pos2,
        ctx: &mut ToolContext<'_>,
    ) -> EngineResult<ToolOutcome> {
        let start = ctx.local(pos);
        let kind = ctx.settings.shape();
        log::debug!("Shape preview started: {kind} at {start:?}");
        self.state = ShapePreviewState::Previewing {
            start,
            kind,
            scratch: ctx.layer.frame().clone(),
        };
        Ok(ToolOutcome::Began)
    }

    fn on_pointer_move(
        &mut self,
        pos: Pos2,
        ctx: &mut ToolContext<'_>,
    ) -> EngineResult<ToolOutcome> {
        let ShapePreviewState::Previewing { start, kind, scratch } = &self.state else {
            return Ok(ToolOutcome::Ignored);
        };
        let end = ctx.local(pos);
        let dpr = ctx.layer.device_pixel_ratio();
        let frame = ctx.layer.frame_mut();
        *frame = scratch.clone();
        ctx.compositor.draw_shape_preview(frame, dpr, kind, *start, end);
        Ok(ToolOutcome::Redrawn)
    }

    fn on_pointer_up(&mut self, pos: Pos2, ctx: &mut ToolContext<'_>) -> EngineResult<ToolOutcome> {
        let ShapePreviewState::Previewing { start, kind, .. } =
            std::mem::replace(&mut self.state, ShapePreviewState::Idle)
        else {
            return Ok(ToolOutcome::Ignored);
        };
        let end = ctx.local(pos);
        let style = {
            let settings = ctx.settings.read();
            ShapeStyle {
                color: settings.color,
                fill: settings.shape_fill,
                stroke: settings.shape_stroke,
                stroke_width: settings.stroke_width,
            }
        };
        let shape = ShapeObject::from_drag(kind, start, end, style, ctx.config.min_shape_size);
        log::info!("Shape committed: {} {:?}", shape.kind, crate::element::Element::rect(&shape));
        ctx.layer.add_object(shape);
        ctx.commit()?;
        Ok(ToolOutcome::Committed)
    }

    fn cancel(&mut self, ctx: &mut ToolContext<'_>) {
        if let ShapePreviewState::Previewing { scratch, .. } =
            std::mem::replace(&mut self.state, ShapePreviewState::Idle)
        {
            *ctx.layer.frame_mut() = scratch;
        }
    }

    fn interaction_state(&self) -> InteractionState {
        match self.state {
            ShapePreviewState::Idle => InteractionState::Idle,
            ShapePreviewState::Previewing { .. } => InteractionState::DrawingShapePreview,
        }
    }
}
