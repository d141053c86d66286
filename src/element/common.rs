use egui::{Pos2, Rect};

use crate::error::{EngineError, EngineResult};

use super::ObjectId;

/// Reject degenerate or non-finite target rectangles before applying them.
pub(crate) fn validate_rect(id: ObjectId, rect: &Rect) -> EngineResult<()> {
    let finite = rect.min.x.is_finite()
        && rect.min.y.is_finite()
        && rect.max.x.is_finite()
        && rect.max.y.is_finite();
    if finite && rect.width() > 0.0 && rect.height() > 0.0 {
        Ok(())
    } else {
        log::warn!("Rejecting resize of {id} to {rect:?}");
        Err(EngineError::NotResizable(id))
    }
}

/// Inclusive bounding-box containment, matching edge clicks as hits.
pub(crate) fn rect_contains_inclusive(rect: Rect, pos: Pos2) -> bool {
    pos.x >= rect.min.x && pos.x <= rect.max.x && pos.y >= rect.min.y && pos.y <= rect.max.y
}
