use egui::{Color32, Pos2};
use tiny_skia::Pixmap;

use crate::util::color::opaque_pixel;

/// 4-connected flood fill from the pixel under logical point `at`.
///
/// Pixels join the region only when they equal the start pixel exactly.
/// Returns `false` without touching the surface when the point is outside
/// it or the start pixel already has the fill color.
pub fn flood_fill(pixmap: &mut Pixmap, dpr: f32, at: Pos2, color: Color32) -> bool {
    let (w, h) = (pixmap.width() as i64, pixmap.height() as i64);
    let sx = (at.x * dpr).floor() as i64;
    let sy = (at.y * dpr).floor() as i64;
    if sx < 0 || sy < 0 || sx >= w || sy >= h {
        log::warn!("Fill at {at:?} is outside the surface");
        return false;
    }

    let fill = opaque_pixel(color);
    let pixels = pixmap.pixels_mut();
    let index = |x: i64, y: i64| (y * w + x) as usize;
    let target = pixels[index(sx, sy)];
    if target == fill {
        log::debug!("Fill skipped, region already {color:?}");
        return false;
    }

    let mut stack = vec![(sx, sy)];
    let mut filled = 0usize;
    while let Some((x, y)) = stack.pop() {
        if x < 0 || y < 0 || x >= w || y >= h {
            continue;
        }
        let i = index(x, y);
        if pixels[i] != target {
            continue;
        }
        pixels[i] = fill;
        filled += 1;
        stack.extend([(x + 1, y), (x - 1, y), (x, y + 1), (x, y - 1)]);
    }
    log::debug!("Flood fill recolored {filled} pixels");
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::raster::{fill_solid, new_surface, pixel_rgba};
    use egui::pos2;

    #[test]
    fn fills_bounded_region_only() {
        let mut surface = new_surface(10, 10, 1.0).unwrap();
        fill_solid(&mut surface, Color32::WHITE);
        // vertical black wall at x = 5
        let wall = opaque_pixel(Color32::BLACK);
        for y in 0..10 {
            surface.pixels_mut()[y * 10 + 5] = wall;
        }

        assert!(flood_fill(&mut surface, 1.0, pos2(1.0, 1.0), Color32::RED));
        assert_eq!(pixel_rgba(&surface, 0, 9), Some([255, 0, 0, 255]));
        assert_eq!(pixel_rgba(&surface, 4, 4), Some([255, 0, 0, 255]));
        assert_eq!(pixel_rgba(&surface, 5, 4), Some([0, 0, 0, 255]));
        assert_eq!(pixel_rgba(&surface, 7, 4), Some([255, 255, 255, 255]));
    }

    #[test]
    fn refilling_same_color_is_a_no_op() {
        let mut surface = new_surface(8, 8, 1.0).unwrap();
        fill_solid(&mut surface, Color32::RED);
        let before = surface.data().to_vec();
        assert!(!flood_fill(&mut surface, 1.0, pos2(3.0, 3.0), Color32::RED));
        assert_eq!(surface.data(), &before[..]);
    }

    #[test]
    fn out_of_bounds_is_ignored() {
        let mut surface = new_surface(8, 8, 1.0).unwrap();
        assert!(!flood_fill(&mut surface, 1.0, pos2(-1.0, 3.0), Color32::RED));
        assert!(!flood_fill(&mut surface, 1.0, pos2(3.0, 8.0), Color32::RED));
    }
}
