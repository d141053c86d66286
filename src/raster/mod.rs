//! Pixel surfaces and the paint operations applied directly to them.
//!
//! Surfaces are premultiplied RGBA [`Pixmap`]s sized in physical pixels
//! (`logical * device_pixel_ratio`). Every drawing helper takes logical
//! coordinates and applies the scale itself.

use egui::Color32;
use tiny_skia::{Pixmap, PixmapPaint, Transform};

use crate::error::{EngineError, EngineResult};

pub mod brush;
pub mod fill;

pub use brush::{BrushStroke, erase_dot, erase_segment, spray, stroke_dot, stroke_segment};
pub use fill::flood_fill;

/// Physical pixel extent of a logical length.
pub fn physical_len(logical: u32, dpr: f32) -> u32 {
    ((logical as f32 * dpr).floor() as u32).max(1)
}

/// Allocate a transparent surface for a logical size.
pub fn new_surface(width: u32, height: u32, dpr: f32) -> EngineResult<Pixmap> {
    let (w, h) = (physical_len(width, dpr), physical_len(height, dpr));
    Pixmap::new(w, h).ok_or(EngineError::SurfaceAllocation { width: w, height: h })
}

/// Fill the whole surface with an opaque color.
pub fn fill_solid(pixmap: &mut Pixmap, color: Color32) {
    let [r, g, b, a] = color.to_srgba_unmultiplied();
    pixmap.fill(tiny_skia::Color::from_rgba8(r, g, b, a));
}

/// Logical-to-physical transform for a surface.
pub fn device_transform(dpr: f32) -> Transform {
    Transform::from_scale(dpr, dpr)
}

/// Mirror the surface left to right.
pub fn flip_horizontal(pixmap: &mut Pixmap) {
    let width = pixmap.width() as usize;
    for row in pixmap.pixels_mut().chunks_exact_mut(width) {
        row.reverse();
    }
}

/// Mirror the surface top to bottom.
pub fn flip_vertical(pixmap: &mut Pixmap) {
    let width = pixmap.width() as usize;
    let height = pixmap.height() as usize;
    let pixels = pixmap.pixels_mut();
    for y in 0..height / 2 {
        let (top, bottom) = pixels.split_at_mut((height - 1 - y) * width);
        top[y * width..(y + 1) * width].swap_with_slice(&mut bottom[..width]);
    }
}

/// Copy `source` into a fresh surface of a new logical size, stretched to fit.
pub fn rescale(source: &Pixmap, width: u32, height: u32, dpr: f32) -> EngineResult<Pixmap> {
    let mut target = new_surface(width, height, dpr)?;
    let sx = target.width() as f32 / source.width() as f32;
    let sy = target.height() as f32 / source.height() as f32;
    target.draw_pixmap(
        0,
        0,
        source.as_ref(),
        &PixmapPaint::default(),
        Transform::from_scale(sx, sy),
        None,
    );
    Ok(target)
}

/// Raw pixel at physical coordinates as unpremultiplied `[r, g, b, a]`.
pub fn pixel_rgba(pixmap: &Pixmap, x: u32, y: u32) -> Option<[u8; 4]> {
    let color = pixmap.pixel(x, y)?.demultiply();
    Some([color.red(), color.green(), color.blue(), color.alpha()])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn surface_is_scaled_by_pixel_ratio() {
        let surface = new_surface(40, 30, 2.0).unwrap();
        assert_eq!((surface.width(), surface.height()), (80, 60));
        assert_eq!(pixel_rgba(&surface, 0, 0), Some([0, 0, 0, 0]));
    }

    #[test]
    fn flips_mirror_pixels() {
        let mut surface = new_surface(4, 3, 1.0).unwrap();
        surface.pixels_mut()[0] = crate::util::color::opaque_pixel(Color32::RED);

        flip_horizontal(&mut surface);
        assert_eq!(pixel_rgba(&surface, 3, 0), Some([255, 0, 0, 255]));
        assert_eq!(pixel_rgba(&surface, 0, 0), Some([0, 0, 0, 0]));

        flip_vertical(&mut surface);
        assert_eq!(pixel_rgba(&surface, 3, 2), Some([255, 0, 0, 255]));
        assert_eq!(pixel_rgba(&surface, 3, 0), Some([0, 0, 0, 0]));
    }

    #[test]
    fn rescale_stretches_content() {
        let mut surface = new_surface(10, 10, 1.0).unwrap();
        fill_solid(&mut surface, Color32::WHITE);
        let bigger = rescale(&surface, 20, 20, 1.0).unwrap();
        assert_eq!((bigger.width(), bigger.height()), (20, 20));
        assert_eq!(pixel_rgba(&bigger, 10, 10), Some([255, 255, 255, 255]));
    }
}
