use egui::{Pos2, Rect, Vec2};

use crate::element::{DrawableObject, Element};

/// Represents a corner of a selection box
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Corner {
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
}

impl Corner {
    /// Handle check order; the first match wins when handles overlap.
    pub const ALL: [Corner; 4] = [
        Corner::TopLeft,
        Corner::TopRight,
        Corner::BottomLeft,
        Corner::BottomRight,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Corner::TopLeft => "top-left",
            Corner::TopRight => "top-right",
            Corner::BottomLeft => "bottom-left",
            Corner::BottomRight => "bottom-right",
        }
    }

    /// The corner's position on `rect`.
    pub fn point(&self, rect: Rect) -> Pos2 {
        match self {
            Corner::TopLeft => rect.left_top(),
            Corner::TopRight => rect.right_top(),
            Corner::BottomLeft => rect.left_bottom(),
            Corner::BottomRight => rect.right_bottom(),
        }
    }
}

/// Square handle of edge `size` centered on a corner of `rect`.
pub fn handle_rect(rect: Rect, corner: Corner, size: f32) -> Rect {
    Rect::from_center_size(corner.point(rect), Vec2::splat(size))
}

/// Which corner handle of `rect`, if any, contains `pos` (edges inclusive).
pub fn handle_at(rect: Rect, pos: Pos2, size: f32) -> Option<Corner> {
    Corner::ALL.into_iter().find(|corner| {
        let handle = handle_rect(rect, *corner, size);
        pos.x >= handle.min.x
            && pos.x <= handle.max.x
            && pos.y >= handle.min.y
            && pos.y <= handle.max.y
    })
}

/// Move `corner` of `rect` to `pointer` while the opposite corner stays put.
///
/// Each axis keeps at least `min_size`; if the pointer crosses over the fixed
/// corner the moved edge stops `min_size` away from it.
pub fn resize_rect(rect: Rect, corner: Corner, pointer: Pos2, min_size: f32) -> Rect {
    let mut out = rect;
    match corner {
        Corner::TopLeft => {
            out.min.x = pointer.x.min(rect.max.x - min_size);
            out.min.y = pointer.y.min(rect.max.y - min_size);
        }
        Corner::TopRight => {
            out.max.x = pointer.x.max(rect.min.x + min_size);
            out.min.y = pointer.y.min(rect.max.y - min_size);
        }
        Corner::BottomLeft => {
            out.min.x = pointer.x.min(rect.max.x - min_size);
            out.max.y = pointer.y.max(rect.min.y + min_size);
        }
        Corner::BottomRight => {
            out.max.x = pointer.x.max(rect.min.x + min_size);
            out.max.y = pointer.y.max(rect.min.y + min_size);
        }
    }
    out
}

/// Index of the topmost object whose bounds contain `pos`.
pub fn topmost_hit(objects: &[DrawableObject], pos: Pos2) -> Option<usize> {
    objects.iter().rposition(|obj| obj.hit_test(pos))
}
