use egui::Pos2;

use crate::error::EngineResult;
use crate::raster;
use crate::settings::ToolKind;

use super::{Tool, ToolContext, ToolOutcome};

/// Bucket fill on the layer raster.
#[derive(Debug, Clone, Copy, Default)]
pub struct FillTool;

impl Tool for FillTool {
    fn name(&self) -> &'static str {
        "Fill"
    }

    fn kind(&self) -> ToolKind {
        ToolKind::Fill
    }

    fn on_pointer_down(
        &mut self,
        pos: Pos2,
        ctx: &mut ToolContext<'_>,
    ) -> EngineResult<ToolOutcome> {
        let at = ctx.local(pos);
        let color = ctx.settings.color();
        let dpr = ctx.layer.device_pixel_ratio();
        if !raster::flood_fill(ctx.layer.raster_mut(), dpr, at, color) {
            return Ok(ToolOutcome::Ignored);
        }
        ctx.commit()?;
        Ok(ToolOutcome::Committed)
    }

    fn on_pointer_move(
        &mut self,
        _pos: Pos2,
        _ctx: &mut ToolContext<'_>,
    ) -> EngineResult<ToolOutcome> {
        Ok(ToolOutcome::Ignored)
    }

    fn on_pointer_up(
        &mut self,
        _pos: Pos2,
        _ctx: &mut ToolContext<'_>,
    ) -> EngineResult<ToolOutcome> {
        Ok(ToolOutcome::Ignored)
    }
}
