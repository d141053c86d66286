use egui::Pos2;

use crate::error::EngineResult;
use crate::raster::{self, BrushStroke};
use crate::settings::ToolKind;

use super::{InteractionState, Tool, ToolContext, ToolOutcome};

/// Whether the stroke lays down paint or removes it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StrokeMode {
    Paint,
    Erase,
}

#[derive(Debug, Clone, PartialEq)]
pub enum DrawStrokeState {
    Idle,
    Drawing { last: Pos2, brush: BrushStroke },
}

/// Freehand brush and eraser.
///
/// Paint goes straight into the layer raster; the frame is recomposited
/// after every segment so live objects stay on top of fresh paint.
#[derive(Debug, Clone)]
pub struct DrawStrokeTool {
    mode: StrokeMode,
    state: DrawStrokeState,
}

impl DrawStrokeTool {
    pub fn new(mode: StrokeMode) -> Self {
        Self {
            mode,
            state: DrawStrokeState::Idle,
        }
    }

    pub fn mode(&self) -> StrokeMode {
        self.mode
    }

    pub fn state(&self) -> &DrawStrokeState {
        &self.state
    }
}

impl Tool for DrawStrokeTool {
    fn name(&self) -> &'static str {
        match self.mode {
            StrokeMode::Paint => "Brush",
            StrokeMode::Erase => "Eraser",
        }
    }

    fn kind(&self) -> ToolKind {
        match self.mode {
            StrokeMode::Paint => ToolKind::Brush,
            StrokeMode::Erase => ToolKind::Eraser,
        }
    }

    fn on_pointer_down(
        &mut self,
        pos: Pos2,
        ctx: &mut ToolContext<'_>,
    ) -> EngineResult<ToolOutcome> {
        let at = ctx.local(pos);
        let brush = {
            let settings = ctx.settings.read();
            BrushStroke {
                kind: settings.brush,
                color: settings.color,
                size: settings.size,
                opacity: settings.opacity,
            }
        };
        let dpr = ctx.layer.device_pixel_ratio();
        match self.mode {
            StrokeMode::Erase => raster::erase_dot(ctx.layer.raster_mut(), dpr, at, brush.size),
            StrokeMode::Paint => {
                raster::stroke_dot(ctx.layer.raster_mut(), dpr, at, &brush, &mut *ctx.rng)
            }
        }
        log::debug!("{} stroke started at {at:?}", self.name());
        self.state = DrawStrokeState::Drawing { last: at, brush };
        ctx.render();
        Ok(ToolOutcome::Began)
    }

    fn on_pointer_move(
        &mut self,
        pos: Pos2,
        ctx: &mut ToolContext<'_>,
    ) -> EngineResult<ToolOutcome> {
        let DrawStrokeState::Drawing { last, brush } = &mut self.state else {
            return Ok(ToolOutcome::Ignored);
        };
        let at = ctx.local(pos);
        let dpr = ctx.layer.device_pixel_ratio();
        match self.mode {
            StrokeMode::Erase => {
                raster::erase_segment(ctx.layer.raster_mut(), dpr, *last, at, brush.size)
            }
            StrokeMode::Paint => raster::stroke_segment(
                ctx.layer.raster_mut(),
                dpr,
                *last,
                at,
                brush,
                &mut *ctx.rng,
            ),
        }
        *last = at;
        ctx.render();
        Ok(ToolOutcome::Redrawn)
    }

    fn on_pointer_up(
        &mut self,
        _pos: Pos2,
        ctx: &mut ToolContext<'_>,
    ) -> EngineResult<ToolOutcome> {
        if !matches!(self.state, DrawStrokeState::Drawing { .. }) {
            return Ok(ToolOutcome::Ignored);
        }
        self.state = DrawStrokeState::Idle;
        ctx.commit()?;
        Ok(ToolOutcome::Committed)
    }

    fn cancel(&mut self, _ctx: &mut ToolContext<'_>) {
        self.state = DrawStrokeState::Idle;
    }

    fn interaction_state(&self) -> InteractionState {
        match self.state {
            DrawStrokeState::Idle => InteractionState::Idle,
            DrawStrokeState::Drawing { .. } => InteractionState::DrawingStroke,
        }
    }
}
