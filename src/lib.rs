#![warn(clippy::all, rust_2018_idioms)]

pub mod backend;
pub mod compositor;
pub mod config;
pub mod editor;
pub mod element;
pub mod error;
pub mod file_handler;
pub mod geometry;
pub mod history;
pub mod input;
pub mod layer;
pub mod layer_stack;
pub mod raster;
pub mod settings;
pub mod shapes;
pub mod text;
pub mod tools;
pub mod util;

pub use compositor::Compositor;
pub use config::EngineConfig;
pub use editor::Editor;
pub use element::{DrawableObject, Element, ImageObject, ObjectId, ShapeObject, TextObject};
pub use error::{EngineError, EngineResult};
pub use history::{History, Snapshot};
pub use input::InputEvent;
pub use layer::{Layer, LayerId};
pub use layer_stack::LayerStack;
pub use settings::{BrushKind, SessionSettings, TextStyle, ToolKind, ToolSettings};
pub use shapes::{ShapeKind, ShapeRegistry};
pub use tools::{InteractionState, Tool, ToolOutcome};
