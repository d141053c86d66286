use std::f32::consts::TAU;

use egui::{Color32, Pos2};
use rand::Rng;
use tiny_skia::{BlendMode, LineCap, LineJoin, Paint, PathBuilder, Pixmap, Rect, Stroke};

use crate::settings::BrushKind;
use crate::util::color::skia_color;

use super::device_transform;

/// Paint parameters for one brush gesture, captured at pointer-down.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BrushStroke {
    pub kind: BrushKind,
    pub color: Color32,
    pub size: f32,
    pub opacity: f32,
}

impl BrushStroke {
    fn paint(&self) -> Paint<'static> {
        let mut paint = Paint::default();
        paint.set_color(skia_color(self.color, self.opacity));
        paint.anti_alias = true;
        paint
    }

    fn line_cap(&self) -> LineCap {
        match self.kind {
            BrushKind::Square => LineCap::Butt,
            _ => LineCap::Round,
        }
    }

    fn line(&self, width: f32) -> Stroke {
        let cap = self.line_cap();
        Stroke {
            width,
            line_cap: cap,
            line_join: if cap == LineCap::Butt { LineJoin::Miter } else { LineJoin::Round },
            ..Stroke::default()
        }
    }

    /// Number of 1px dabs per spray burst.
    pub fn spray_density(&self) -> usize {
        (self.size * 2.0).max(10.0) as usize
    }

    /// Radius of a spray burst; never negative.
    pub fn spray_radius(&self) -> f32 {
        (self.size * 1.5).max(0.0)
    }
}

/// Paint the first contact point of a gesture.
pub fn stroke_dot(
    pixmap: &mut Pixmap,
    dpr: f32,
    at: Pos2,
    brush: &BrushStroke,
    rng: &mut impl Rng,
) {
    match brush.kind {
        BrushKind::Spray => spray(pixmap, dpr, at, brush, rng),
        BrushKind::Square => {
            let half = brush.size / 2.0;
            if let Some(rect) = Rect::from_xywh(at.x - half, at.y - half, brush.size, brush.size) {
                pixmap.fill_rect(rect, &brush.paint(), device_transform(dpr), None);
            }
        }
        BrushKind::Round => fill_circle(pixmap, dpr, at, brush.size / 2.0, &brush.paint()),
        BrushKind::Textured => {
            for _ in 0..3 {
                let radius = brush.size * rng.random_range(0.6..1.4) / 2.0;
                let off = rng.random_range(-1.0..1.0);
                fill_circle(pixmap, dpr, Pos2::new(at.x + off, at.y + off), radius, &brush.paint());
            }
        }
    }
}

/// Extend a gesture from `from` to `to`.
pub fn stroke_segment(
    pixmap: &mut Pixmap,
    dpr: f32,
    from: Pos2,
    to: Pos2,
    brush: &BrushStroke,
    rng: &mut impl Rng,
) {
    match brush.kind {
        BrushKind::Spray => spray(pixmap, dpr, to, brush, rng),
        BrushKind::Textured => {
            for _ in 0..3 {
                let width = brush.size * rng.random_range(0.6..1.4);
                let off = rng.random_range(-1.0..1.0);
                let shift = egui::vec2(off, off);
                let line = brush.line(width);
                stroke_line(pixmap, dpr, from + shift, to + shift, &line, &brush.paint());
            }
        }
        BrushKind::Round | BrushKind::Square => {
            stroke_line(pixmap, dpr, from, to, &brush.line(brush.size), &brush.paint());
        }
    }
}

/// Scatter 1px dabs uniformly by angle and radius around `center`.
pub fn spray(pixmap: &mut Pixmap, dpr: f32, center: Pos2, brush: &BrushStroke, rng: &mut impl Rng) {
    let paint = brush.paint();
    let radius = brush.spray_radius();
    let transform = device_transform(dpr);
    for _ in 0..brush.spray_density() {
        let r = rng.random_range(0.0..=radius);
        let a = rng.random_range(0.0..TAU);
        let x = center.x + a.cos() * r;
        let y = center.y + a.sin() * r;
        if let Some(rect) = Rect::from_xywh(x, y, 1.0, 1.0) {
            pixmap.fill_rect(rect, &paint, transform, None);
        }
    }
}

fn erase_paint() -> Paint<'static> {
    let mut paint = Paint::default();
    paint.set_color_rgba8(0, 0, 0, 255);
    paint.blend_mode = BlendMode::DestinationOut;
    paint.anti_alias = true;
    paint
}

/// Clear a round spot of diameter `size`.
pub fn erase_dot(pixmap: &mut Pixmap, dpr: f32, at: Pos2, size: f32) {
    fill_circle(pixmap, dpr, at, size / 2.0, &erase_paint());
}

/// Clear along a round-capped line of width `size`.
pub fn erase_segment(pixmap: &mut Pixmap, dpr: f32, from: Pos2, to: Pos2, size: f32) {
    let stroke = Stroke {
        width: size,
        line_cap: LineCap::Round,
        line_join: LineJoin::Round,
        ..Stroke::default()
    };
    stroke_line(pixmap, dpr, from, to, &stroke, &erase_paint());
}

fn fill_circle(pixmap: &mut Pixmap, dpr: f32, center: Pos2, radius: f32, paint: &Paint<'_>) {
    if let Some(path) = PathBuilder::from_circle(center.x, center.y, radius.max(0.5)) {
        pixmap.fill_path(&path, paint, tiny_skia::FillRule::Winding, device_transform(dpr), None);
    }
}

fn stroke_line(
    pixmap: &mut Pixmap,
    dpr: f32,
    from: Pos2,
    to: Pos2,
    stroke: &Stroke,
    paint: &Paint<'_>,
) {
    if from == to {
        // Zero-length segments only leave a mark with round caps.
        if stroke.line_cap == LineCap::Round {
            fill_circle(pixmap, dpr, from, stroke.width / 2.0, paint);
        }
        return;
    }
    let mut pb = PathBuilder::new();
    pb.move_to(from.x, from.y);
    pb.line_to(to.x, to.y);
    if let Some(path) = pb.finish() {
        pixmap.stroke_path(&path, paint, stroke, device_transform(dpr), None);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::raster::{new_surface, pixel_rgba};
    use egui::pos2;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn brush(kind: BrushKind) -> BrushStroke {
        BrushStroke {
            kind,
            color: Color32::from_rgb(0, 0, 255),
            size: 6.0,
            opacity: 1.0,
        }
    }

    #[test]
    fn round_segment_paints_along_the_line() {
        let mut surface = new_surface(50, 50, 1.0).unwrap();
        let mut rng = StdRng::seed_from_u64(7);
        let round = brush(BrushKind::Round);
        stroke_segment(&mut surface, 1.0, pos2(5.0, 25.0), pos2(45.0, 25.0), &round, &mut rng);
        assert_eq!(pixel_rgba(&surface, 25, 25), Some([0, 0, 255, 255]));
        assert_eq!(pixel_rgba(&surface, 25, 5), Some([0, 0, 0, 0]));
    }

    #[test]
    fn eraser_clears_paint() {
        let mut surface = new_surface(20, 20, 1.0).unwrap();
        crate::raster::fill_solid(&mut surface, Color32::WHITE);
        erase_dot(&mut surface, 1.0, pos2(10.0, 10.0), 8.0);
        assert_eq!(pixel_rgba(&surface, 10, 10).map(|p| p[3]), Some(0));
        assert_eq!(pixel_rgba(&surface, 1, 1), Some([255, 255, 255, 255]));
    }

    #[test]
    fn spray_stays_within_radius() {
        let mut surface = new_surface(60, 60, 1.0).unwrap();
        let mut rng = StdRng::seed_from_u64(42);
        let spray_brush = brush(BrushKind::Spray);
        spray(&mut surface, 1.0, pos2(30.0, 30.0), &spray_brush, &mut rng);

        let limit = spray_brush.spray_radius() + 2.0;
        let mut painted = 0;
        for y in 0..60 {
            for x in 0..60 {
                if pixel_rgba(&surface, x, y).is_some_and(|p| p[3] > 0) {
                    painted += 1;
                    let d = pos2(x as f32, y as f32).distance(pos2(30.0, 30.0));
                    assert!(d <= limit, "dab at distance {d}");
                }
            }
        }
        assert!(painted > 0);
    }

    #[test]
    fn spray_with_degenerate_size_paints_at_center() {
        let mut surface = new_surface(20, 20, 1.0).unwrap();
        let mut rng = StdRng::seed_from_u64(1);
        for size in [-4.0, f32::NAN] {
            let degenerate = BrushStroke {
                size,
                ..brush(BrushKind::Spray)
            };
            assert_eq!(degenerate.spray_radius(), 0.0);
            spray(&mut surface, 1.0, pos2(10.0, 10.0), &degenerate, &mut rng);
        }
        assert_eq!(pixel_rgba(&surface, 10, 10), Some([0, 0, 255, 255]));
    }
}
