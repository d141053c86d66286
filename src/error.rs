use thiserror::Error;

use crate::element::ObjectId;

/// Errors raised by the layer, history and compositing engine.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("Cannot delete the last layer!")]
    LastLayer,

    #[error("No layer at index {0}")]
    LayerNotFound(usize),

    #[error("Object {0} not found")]
    ObjectNotFound(ObjectId),

    #[error("Object {0} is not resizable")]
    NotResizable(ObjectId),

    #[error("Failed to allocate a {width}x{height} surface")]
    SurfaceAllocation { width: u32, height: u32 },

    #[error("Failed to encode snapshot: {0}")]
    SnapshotEncode(String),

    #[error("Failed to decode snapshot: {0}")]
    SnapshotDecode(String),

    #[error("Failed to decode image: {0}")]
    ImageDecode(#[from] image::ImageError),

    #[error("Invalid data URL: {0}")]
    InvalidDataUrl(String),

    #[error("Invalid font data for {0}")]
    InvalidFont(String),

    #[error("Invalid color: {0}")]
    InvalidColor(String),

    #[error("Invalid configuration: {0}")]
    Config(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for engine operations
pub type EngineResult<T> = Result<T, EngineError>;
