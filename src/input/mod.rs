use egui::{Key, PointerButton, Pos2};

mod router;
pub use router::route_event;

/// Pointer and key input for the canvas, in canvas coordinates.
///
/// Only the primary button drives tools; other buttons are ignored.
#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    /// Button was pressed
    PointerDown { position: Pos2, button: PointerButton },
    /// Pointer moved, with or without a button held
    PointerMove { position: Pos2 },
    /// Button was released
    PointerUp { position: Pos2, button: PointerButton },
    /// Pointer left the canvas; ends a gesture like a release
    PointerLeave { last_known_position: Pos2 },
    /// A key was pressed while the canvas had focus
    KeyPressed { key: Key },
}

impl InputEvent {
    pub fn down(position: Pos2) -> Self {
        Self::PointerDown {
            position,
            button: PointerButton::Primary,
        }
    }

    pub fn moved(position: Pos2) -> Self {
        Self::PointerMove { position }
    }

    pub fn up(position: Pos2) -> Self {
        Self::PointerUp {
            position,
            button: PointerButton::Primary,
        }
    }
}
