use std::f32::consts::{FRAC_PI_2, TAU};

use egui::{Pos2, Rect, pos2};
use tiny_skia::{Path, PathBuilder};

/// A path under construction, with the subpath rules of a 2D canvas:
/// `line_to` without a current point starts a subpath, and arcs connect
/// to the current point with a straight segment.
pub struct Outline {
    builder: PathBuilder,
    current: Option<Pos2>,
    subpath_start: Option<Pos2>,
}

impl std::fmt::Debug for Outline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Outline")
            .field("verbs", &self.builder.len())
            .field("current", &self.current)
            .finish_non_exhaustive()
    }
}

impl Default for Outline {
    fn default() -> Self {
        Self::new()
    }
}

impl Outline {
    pub fn new() -> Self {
        Self {
            builder: PathBuilder::new(),
            current: None,
            subpath_start: None,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.builder.is_empty()
    }

    pub fn current_point(&self) -> Option<Pos2> {
        self.current
    }

    pub fn move_to(&mut self, p: Pos2) {
        self.builder.move_to(p.x, p.y);
        self.current = Some(p);
        self.subpath_start = Some(p);
    }

    pub fn line_to(&mut self, p: Pos2) {
        if self.current.is_none() {
            self.move_to(p);
            return;
        }
        self.builder.line_to(p.x, p.y);
        self.current = Some(p);
    }

    pub fn quad_to(&mut self, ctrl: Pos2, to: Pos2) {
        self.ensure_subpath(ctrl);
        self.builder.quad_to(ctrl.x, ctrl.y, to.x, to.y);
        self.current = Some(to);
    }

    pub fn cubic_to(&mut self, c1: Pos2, c2: Pos2, to: Pos2) {
        self.ensure_subpath(c1);
        self.builder.cubic_to(c1.x, c1.y, c2.x, c2.y, to.x, to.y);
        self.current = Some(to);
    }

    pub fn close(&mut self) {
        if self.current.is_some() {
            self.builder.close();
            self.current = self.subpath_start;
        }
    }

    /// Closed rectangle subpath; leaves the current point at its origin.
    pub fn rect(&mut self, rect: Rect) {
        self.move_to(rect.left_top());
        self.line_to(rect.right_top());
        self.line_to(rect.right_bottom());
        self.line_to(rect.left_bottom());
        self.close();
    }

    /// Circular arc. Angles in radians, measured clockwise on screen.
    pub fn arc(&mut self, center: Pos2, radius: f32, start: f32, end: f32, anticlockwise: bool) {
        self.elliptic_arc(center, radius, radius, start, end, anticlockwise);
    }

    /// Full axis-aligned ellipse as its own subpath.
    pub fn ellipse(&mut self, center: Pos2, rx: f32, ry: f32) {
        self.move_to(pos2(center.x + rx, center.y));
        self.elliptic_arc(center, rx, ry, 0.0, TAU, false);
        self.close();
    }

    pub fn elliptic_arc(
        &mut self,
        center: Pos2,
        rx: f32,
        ry: f32,
        start: f32,
        end: f32,
        anticlockwise: bool,
    ) {
        let sweep = arc_sweep(start, end, anticlockwise);
        let point_at = |angle: f32| pos2(center.x + rx * angle.cos(), center.y + ry * angle.sin());

        let first = point_at(start);
        match self.current {
            Some(_) => self.line_to(first),
            None => self.move_to(first),
        }
        if sweep == 0.0 {
            return;
        }

        // Cubic approximation, at most a quarter turn per segment.
        let segments = (sweep.abs() / FRAC_PI_2).ceil().max(1.0) as usize;
        let step = sweep / segments as f32;
        let k = 4.0 / 3.0 * (step / 4.0).tan();
        let mut angle = start;
        for _ in 0..segments {
            let next = angle + step;
            let p0 = point_at(angle);
            let p3 = point_at(next);
            let c1 = pos2(p0.x - k * rx * angle.sin(), p0.y + k * ry * angle.cos());
            let c2 = pos2(p3.x + k * rx * next.sin(), p3.y - k * ry * next.cos());
            self.builder.cubic_to(c1.x, c1.y, c2.x, c2.y, p3.x, p3.y);
            angle = next;
        }
        self.current = Some(point_at(start + sweep));
    }

    pub fn finish(self) -> Option<Path> {
        self.builder.finish()
    }

    fn ensure_subpath(&mut self, p: Pos2) {
        if self.current.is_none() {
            self.move_to(p);
        }
    }
}

/// Signed sweep following canvas `arc()` normalization.
fn arc_sweep(start: f32, end: f32, anticlockwise: bool) -> f32 {
    if !anticlockwise {
        let delta = end - start;
        if delta >= TAU {
            TAU
        } else {
            delta.rem_euclid(TAU)
        }
    } else {
        let delta = start - end;
        if delta >= TAU {
            -TAU
        } else {
            -delta.rem_euclid(TAU)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::PI;

    #[test]
    fn sweep_normalization() {
        assert!((arc_sweep(PI, 0.0, false) - PI).abs() < 1e-5);
        assert!((arc_sweep(0.0, TAU, false) - TAU).abs() < 1e-5);
        assert!((arc_sweep(1.5 * PI, 0.5 * PI, true) + PI).abs() < 1e-5);
        assert_eq!(arc_sweep(1.0, 1.0, false), 0.0);
    }

    #[test]
    fn line_to_without_current_point_starts_subpath() {
        let mut outline = Outline::new();
        outline.line_to(pos2(3.0, 4.0));
        assert_eq!(outline.current_point(), Some(pos2(3.0, 4.0)));
    }

    #[test]
    fn full_circle_bounds() {
        let mut outline = Outline::new();
        outline.arc(pos2(50.0, 50.0), 10.0, 0.0, TAU, false);
        let path = outline.finish().unwrap();
        let bounds = path.bounds();
        assert!((bounds.left() - 40.0).abs() < 0.5);
        assert!((bounds.right() - 60.0).abs() < 0.5);
        assert!((bounds.top() - 40.0).abs() < 0.5);
        assert!((bounds.bottom() - 60.0).abs() < 0.5);
    }

    #[test]
    fn close_returns_to_subpath_start() {
        let mut outline = Outline::new();
        outline.rect(Rect::from_min_size(pos2(1.0, 2.0), egui::vec2(5.0, 5.0)));
        assert_eq!(outline.current_point(), Some(pos2(1.0, 2.0)));
    }
}
