use egui::Pos2;
use rand::SeedableRng;
use rand::rngs::StdRng;

use crate::compositor::Compositor;
use crate::config::EngineConfig;
use crate::error::EngineResult;
use crate::layer::Layer;
use crate::settings::{SessionSettings, ToolKind};

use super::{InteractionState, Tool, ToolContext, ToolOutcome, ToolType, new_tool};

/// Turns pointer input into tool effects on the active layer.
///
/// Owns the active tool and its gesture state. The session settings are
/// shared with the compositor and read on every event, so a tool mode
/// changed through the settings takes effect at the next pointer-down.
#[derive(Debug)]
pub struct InteractionController {
    settings: SessionSettings,
    tool: ToolType,
    rng: StdRng,
}

impl InteractionController {
    pub fn new(settings: SessionSettings) -> Self {
        Self::with_rng(settings, StdRng::from_os_rng())
    }

    /// Deterministic spray and texture jitter, for tests and replays.
    pub fn with_seed(settings: SessionSettings, seed: u64) -> Self {
        Self::with_rng(settings, StdRng::seed_from_u64(seed))
    }

    fn with_rng(settings: SessionSettings, rng: StdRng) -> Self {
        let tool = new_tool(settings.tool());
        Self { settings, tool, rng }
    }

    pub fn settings(&self) -> &SessionSettings {
        &self.settings
    }

    pub fn tool(&self) -> &ToolType {
        &self.tool
    }

    pub fn tool_kind(&self) -> ToolKind {
        self.tool.kind()
    }

    pub fn interaction_state(&self) -> InteractionState {
        self.tool.interaction_state()
    }

    fn context<'a>(
        &'a mut self,
        layer: &'a mut Layer,
        compositor: &'a Compositor,
        config: &'a EngineConfig,
    ) -> (&'a mut ToolType, ToolContext<'a>) {
        let ctx = ToolContext {
            layer,
            compositor,
            settings: &self.settings,
            config,
            rng: &mut self.rng,
        };
        (&mut self.tool, ctx)
    }

    /// Switch tool mode, abandoning any gesture in progress.
    pub fn set_tool(
        &mut self,
        kind: ToolKind,
        layer: &mut Layer,
        compositor: &Compositor,
        config: &EngineConfig,
    ) {
        self.settings.update(|s| s.tool = kind);
        if self.tool.kind() == kind && !self.tool.is_busy() {
            return;
        }
        let (tool, mut ctx) = self.context(layer, compositor, config);
        tool.cancel(&mut ctx);
        *tool = new_tool(kind);
        log::debug!("Tool changed to {}", kind.name());
    }

    /// Drop any gesture in progress without committing it.
    pub fn cancel(&mut self, layer: &mut Layer, compositor: &Compositor, config: &EngineConfig) {
        let (tool, mut ctx) = self.context(layer, compositor, config);
        tool.cancel(&mut ctx);
    }

    pub fn pointer_down(
        &mut self,
        pos: Pos2,
        layer: &mut Layer,
        compositor: &Compositor,
        config: &EngineConfig,
    ) -> EngineResult<ToolOutcome> {
        let wanted = self.settings.tool();
        let (tool, mut ctx) = self.context(layer, compositor, config);
        if tool.is_busy() {
            log::debug!("New pointer-down abandons {:?}", tool.interaction_state());
            tool.cancel(&mut ctx);
        }
        if tool.kind() != wanted {
            *tool = new_tool(wanted);
        }
        tool.on_pointer_down(pos, &mut ctx)
    }

    pub fn pointer_move(
        &mut self,
        pos: Pos2,
        layer: &mut Layer,
        compositor: &Compositor,
        config: &EngineConfig,
    ) -> EngineResult<ToolOutcome> {
        let (tool, mut ctx) = self.context(layer, compositor, config);
        tool.on_pointer_move(pos, &mut ctx)
    }

    pub fn pointer_up(
        &mut self,
        pos: Pos2,
        layer: &mut Layer,
        compositor: &Compositor,
        config: &EngineConfig,
    ) -> EngineResult<ToolOutcome> {
        let (tool, mut ctx) = self.context(layer, compositor, config);
        tool.on_pointer_up(pos, &mut ctx)
    }
}
