use egui::{Key, PointerButton};

use crate::editor::Editor;
use crate::error::EngineResult;
use crate::tools::ToolOutcome;

use super::InputEvent;

/// Routes one input event to the editor.
pub fn route_event(event: &InputEvent, editor: &mut Editor) -> EngineResult<ToolOutcome> {
    match *event {
        InputEvent::PointerDown { position, button } if button == PointerButton::Primary => {
            editor.pointer_down(position)
        }
        InputEvent::PointerMove { position } => editor.pointer_move(position),
        InputEvent::PointerUp { position, button } if button == PointerButton::Primary => {
            editor.pointer_up(position)
        }
        InputEvent::PointerLeave { last_known_position } => editor.pointer_up(last_known_position),
        InputEvent::KeyPressed { key: Key::Delete | Key::Backspace } => {
            let deleted = editor.delete_selected()?;
            Ok(if deleted { ToolOutcome::Committed } else { ToolOutcome::Ignored })
        }
        _ => Ok(ToolOutcome::Ignored),
    }
}
