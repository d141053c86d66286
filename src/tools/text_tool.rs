use egui::Pos2;

use crate::error::EngineResult;
use crate::settings::ToolKind;

use super::{Tool, ToolContext, ToolOutcome};

/// Asks the host for text; the object is created when the text is confirmed.
#[derive(Debug, Clone, Copy, Default)]
pub struct TextTool;

impl Tool for TextTool {
    fn name(&self) -> &'static str {
        "Text"
    }

    fn kind(&self) -> ToolKind {
        ToolKind::Text
    }

    fn on_pointer_down(
        &mut self,
        _pos: Pos2,
        _ctx: &mut ToolContext<'_>,
    ) -> EngineResult<ToolOutcome> {
        Ok(ToolOutcome::TextPromptRequested)
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
