use egui::Pos2;
use rand::rngs::StdRng;

use crate::compositor::Compositor;
use crate::config::EngineConfig;
use crate::error::EngineResult;
use crate::layer::Layer;
use crate::settings::{SessionSettings, ToolKind};

mod controller;
mod draw_stroke_tool;
mod fill_tool;
mod selection_tool;
mod shape_tool;
mod text_tool;

pub use controller::InteractionController;
pub use draw_stroke_tool::{DrawStrokeState, DrawStrokeTool, StrokeMode};
pub use fill_tool::FillTool;
pub use selection_tool::{SelectionState, SelectionTool};
pub use shape_tool::{ShapePreviewState, ShapeTool};
pub use text_tool::TextTool;

/// Everything a tool may touch while handling one pointer event.
pub struct ToolContext<'a> {
    pub layer: &'a mut Layer,
    pub compositor: &'a Compositor,
    pub settings: &'a SessionSettings,
    pub config: &'a EngineConfig,
    pub rng: &'a mut StdRng,
}

impl ToolContext<'_> {
    /// Canvas position to layer-local position (undoes the layer's pan).
    pub fn local(&self, pos: Pos2) -> Pos2 {
        pos - self.layer.offset
    }

    /// Recomposite the active layer's frame.
    pub fn render(&mut self) {
        self.compositor.render(self.layer);
    }

    /// Recomposite, then record the result in history.
    pub fn commit(&mut self) -> EngineResult<()> {
        self.compositor.render(self.layer);
        self.layer.push_history()
    }
}

/// What handling a pointer event did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToolOutcome {
    /// Nothing happened.
    Ignored,
    /// A gesture started.
    Began,
    /// The frame or a layer offset changed.
    Redrawn,
    /// A gesture ended and a history entry was pushed.
    Committed,
    /// A gesture ended without touching history.
    Ended,
    /// The host should ask the user for text and call back with it.
    TextPromptRequested,
}

/// The controller's interaction state, independent of the tool mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InteractionState {
    Idle,
    DrawingStroke,
    DrawingShapePreview,
    MovingObject,
    ResizingObject,
    MovingLayer,
}

/// Tool trait defines the interface for all canvas tools
pub trait Tool {
    /// Return the name of the tool
    fn name(&self) -> &'static str;

    fn kind(&self) -> ToolKind;

    /// Handle pointer press on the canvas.
    fn on_pointer_down(
        &mut self,
        pos: Pos2,
        ctx: &mut ToolContext<'_>,
    ) -> EngineResult<ToolOutcome>;

    /// Handle pointer movement, held or not.
    fn on_pointer_move(
        &mut self,
        pos: Pos2,
        ctx: &mut ToolContext<'_>,
    ) -> EngineResult<ToolOutcome>;

    /// Handle pointer release; this is where gestures commit.
    fn on_pointer_up(
        &mut self,
        pos: Pos2,
        ctx: &mut ToolContext<'_>,
    ) -> EngineResult<ToolOutcome>;

    /// Abandon an in-progress gesture without committing it.
    fn cancel(&mut self, _ctx: &mut ToolContext<'_>) {}

    fn interaction_state(&self) -> InteractionState {
        InteractionState::Idle
    }
}

/// Enum representing all available tool types
#[derive(Debug, Clone)]
pub enum ToolType {
    DrawStroke(DrawStrokeTool),
    Fill(FillTool),
    Shape(ShapeTool),
    Text(TextTool),
    Selection(SelectionTool),
}

impl Tool for ToolType {
    fn name(&self) -> &'static str {
        match self {
            Self::DrawStroke(tool) => tool.name(),
            Self::Fill(tool) => tool.name(),
            Self::Shape(tool) => tool.name(),
            Self::Text(tool) => tool.name(),
            Self::Selection(tool) => tool.name(),
        }
    }

    fn kind(&self) -> ToolKind {
        match self {
            Self::DrawStroke(tool) => tool.kind(),
            Self::Fill(tool) => tool.kind(),
            Self::Shape(tool) => tool.kind(),
            Self::Text(tool) => tool.kind(),
            Self::Selection(tool) => tool.kind(),
        }
    }

    fn on_pointer_down(
        &mut self,
        pos: Pos2,
        ctx: &mut ToolContext<'_>,
    ) -> EngineResult<ToolOutcome> {
        match self {
            Self::DrawStroke(tool) => tool.on_pointer_down(pos, ctx),
            Self::Fill(tool) => tool.on_pointer_down(pos, ctx),
            Self::Shape(tool) => tool.on_pointer_down(pos, ctx),
            Self::Text(tool) => tool.on_pointer_down(pos, ctx),
            Self::Selection(tool) => tool.on_pointer_down(pos, ctx),
        }
    }

    fn on_pointer_move(
        &mut self,
        pos: Pos2,
        ctx: &mut ToolContext<'_>,
    ) -> EngineResult<ToolOutcome> {
        match self {
            Self::DrawStroke(tool) => tool.on_pointer_move(pos, ctx),
            Self::Fill(tool) => tool.on_pointer_move(pos, ctx),
            Self::Shape(tool) => tool.on_pointer_move(pos, ctx),
            Self::Text(tool) => tool.on_pointer_move(pos, ctx),
            Self::Selection(tool) => tool.on_pointer_move(pos, ctx),
        }
    }

    fn on_pointer_up(&mut self, pos: Pos2, ctx: &mut ToolContext<'_>) -> EngineResult<ToolOutcome> {
        match self {
            Self::DrawStroke(tool) => tool.on_pointer_up(pos, ctx),
            Self::Fill(tool) => tool.on_pointer_up(pos, ctx),
            Self::Shape(tool) => tool.on_pointer_up(pos, ctx),
            Self::Text(tool) => tool.on_pointer_up(pos, ctx),
            Self::Selection(tool) => tool.on_pointer_up(pos, ctx),
        }
    }

    fn cancel(&mut self, ctx: &mut ToolContext<'_>) {
        match self {
            Self::DrawStroke(tool) => tool.cancel(ctx),
            Self::Fill(tool) => tool.cancel(ctx),
            Self::Shape(tool) => tool.cancel(ctx),
            Self::Text(tool) => tool.cancel(ctx),
            Self::Selection(tool) => tool.cancel(ctx),
        }
    }

    fn interaction_state(&self) -> InteractionState {
        match self {
            Self::DrawStroke(tool) => tool.interaction_state(),
            Self::Fill(tool) => tool.interaction_state(),
            Self::Shape(tool) => tool.interaction_state(),
            Self::Text(tool) => tool.interaction_state(),
            Self::Selection(tool) => tool.interaction_state(),
        }
    }
}

// Factory function to create a new tool of the specified kind
pub fn new_tool(kind: ToolKind) -> ToolType {
    match kind {
        ToolKind::Brush => ToolType::DrawStroke(DrawStrokeTool::new(StrokeMode::Paint)),
        ToolKind::Eraser => ToolType::DrawStroke(DrawStrokeTool::new(StrokeMode::Erase)),
        ToolKind::Fill => ToolType::Fill(FillTool),
        ToolKind::Shape => ToolType::Shape(ShapeTool::new()),
        ToolKind::Text => ToolType::Text(TextTool),
        ToolKind::Select => ToolType::Selection(SelectionTool::new()),
    }
}

impl ToolType {
    pub fn as_selection_tool(&self) -> Option<&SelectionTool> {
        match self {
            Self::Selection(tool) => Some(tool),
            _ => None,
        }
    }

    pub fn is_selection_tool(&self) -> bool {
        matches!(self, Self::Selection(_))
    }

    pub fn is_busy(&self) -> bool {
        self.interaction_state() != InteractionState::Idle
    }
}
