//! Geometry for the built-in shape kinds. Each tracer receives the
//! normalized bounding box and appends its outline.

use std::f32::consts::{PI, TAU};

use egui::{Pos2, Rect, pos2};

use super::Outline;

/// Corner radius of `roundedRect` and the bubble shapes.
pub const CORNER_RADIUS: f32 = 10.0;
/// Arrowhead edge length.
pub const ARROW_HEAD_LENGTH: f32 = 15.0;
/// Arrowhead half-angle (30 degrees).
pub const ARROW_HEAD_ANGLE: f32 = PI / 6.0;
/// Spike count of the default star.
pub const STAR_SPIKES: usize = 5;
/// Side count of the default `polygon` kind.
pub const POLYGON_SIDES: usize = 6;

const SPEECH_TAIL: f32 = 15.0;
const THOUGHT_DOT: f32 = 5.0;
const BURST_SPIKES: usize = 8;
const COG_TEETH: usize = 8;
const SPIRAL_COILS: usize = 4;
const SPIRAL_ROTATION: f32 = 2.0;

fn inscribed_radius(rect: Rect) -> f32 {
    rect.width().min(rect.height()) / 2.0
}

pub fn rectangle(outline: &mut Outline, rect: Rect) {
    outline.rect(rect);
}

pub fn circle(outline: &mut Outline, rect: Rect) {
    outline.arc(rect.center(), inscribed_radius(rect), 0.0, TAU, false);
}

pub fn ellipse(outline: &mut Outline, rect: Rect) {
    outline.ellipse(rect.center(), rect.width() / 2.0, rect.height() / 2.0);
}

pub fn triangle(outline: &mut Outline, rect: Rect) {
    outline.move_to(rect.center_top());
    outline.line_to(rect.left_bottom());
    outline.line_to(rect.right_bottom());
    outline.close();
}

pub fn line(outline: &mut Outline, rect: Rect) {
    outline.move_to(rect.left_top());
    outline.line_to(rect.right_bottom());
}

pub fn star_default(outline: &mut Outline, rect: Rect) {
    let outer = inscribed_radius(rect);
    star(outline, rect.center(), STAR_SPIKES, outer, outer / 2.0);
}

/// Star with alternating outer and inner vertices, first spike pointing up.
pub fn star(outline: &mut Outline, center: Pos2, spikes: usize, outer: f32, inner: f32) {
    let spikes = spikes.max(2);
    let step = PI / spikes as f32;
    let mut rotation = PI / 2.0 * 3.0;
    let top = pos2(center.x, center.y - outer);

    outline.move_to(top);
    for _ in 0..spikes {
        outline.line_to(pos2(
            center.x + rotation.cos() * outer,
            center.y + rotation.sin() * outer,
        ));
        rotation += step;
        outline.line_to(pos2(
            center.x + rotation.cos() * inner,
            center.y + rotation.sin() * inner,
        ));
        rotation += step;
    }
    outline.line_to(top);
    outline.close();
}

/// Four cubic lobes meeting at the top notch and the bottom tip.
pub fn heart(outline: &mut Outline, rect: Rect) {
    let x = rect.center().x;
    let y = rect.top();
    let (w, h) = (rect.width(), rect.height());
    let notch = pos2(x, y + h / 4.0);

    outline.move_to(notch);
    outline.cubic_to(pos2(x, y), pos2(x - w / 2.0, y), pos2(x - w / 2.0, y + h / 4.0));
    outline.cubic_to(
        pos2(x - w / 2.0, y + h / 2.0),
        pos2(x, y + h * 0.75),
        pos2(x, y + h),
    );
    outline.cubic_to(
        pos2(x, y + h * 0.75),
        pos2(x + w / 2.0, y + h / 2.0),
        pos2(x + w / 2.0, y + h / 4.0),
    );
    outline.cubic_to(pos2(x + w / 2.0, y), pos2(x, y), notch);
    outline.close();
}

pub fn arrow_default(outline: &mut Outline, rect: Rect) {
    arrow(outline, rect.left_top(), rect.right_bottom());
}

/// Shaft from `from` to `to` plus a two-segment head at `to`.
pub fn arrow(outline: &mut Outline, from: Pos2, to: Pos2) {
    let angle = (to.y - from.y).atan2(to.x - from.x);
    let barb = |offset: f32| {
        pos2(
            to.x - ARROW_HEAD_LENGTH * (angle + offset).cos(),
            to.y - ARROW_HEAD_LENGTH * (angle + offset).sin(),
        )
    };

    outline.move_to(from);
    outline.line_to(to);
    outline.move_to(barb(-ARROW_HEAD_ANGLE));
    outline.line_to(to);
    outline.line_to(barb(ARROW_HEAD_ANGLE));
}

pub fn polygon_default(outline: &mut Outline, rect: Rect) {
    regular_polygon(outline, rect.center(), POLYGON_SIDES, inscribed_radius(rect));
}

pub fn hexagon(outline: &mut Outline, rect: Rect) {
    regular_polygon(outline, rect.center(), 6, inscribed_radius(rect));
}

pub fn octagon(outline: &mut Outline, rect: Rect) {
    regular_polygon(outline, rect.center(), 8, inscribed_radius(rect));
}

/// Regular polygon with its first vertex on the positive x axis.
pub fn regular_polygon(outline: &mut Outline, center: Pos2, sides: usize, radius: f32) {
    let sides = sides.max(3);
    outline.move_to(pos2(center.x + radius, center.y));
    for i in 1..=sides {
        let angle = i as f32 * TAU / sides as f32;
        outline.line_to(pos2(
            center.x + radius * angle.cos(),
            center.y + radius * angle.sin(),
        ));
    }
    outline.close();
}

pub fn cloud(outline: &mut Outline, rect: Rect) {
    let (x, y, h) = (rect.left(), rect.top(), rect.height());
    let radius = rect.width().min(h) / 4.0;

    outline.move_to(pos2(x + radius, y + h / 2.0));
    outline.arc(pos2(x + radius, y + h / 2.0), radius, PI, 0.0, false);
    outline.arc(pos2(x + radius * 2.0, y + h / 3.0), radius * 0.8, 0.0, PI, true);
    outline.arc(pos2(x + radius * 3.0, y + h / 2.0), radius, 0.0, PI, false);
    outline.close();
}

pub fn house(outline: &mut Outline, rect: Rect) {
    let (x, y, w, h) = (rect.left(), rect.top(), rect.width(), rect.height());
    outline.move_to(pos2(x, y + h * 0.6));
    outline.line_to(pos2(x + w / 2.0, y));
    outline.line_to(pos2(x + w, y + h * 0.6));
    outline.line_to(pos2(x + w * 0.8, y + h * 0.6));
    outline.line_to(pos2(x + w * 0.8, y + h));
    outline.line_to(pos2(x + w * 0.2, y + h));
    outline.line_to(pos2(x + w * 0.2, y + h * 0.6));
    outline.close();
}

/// Rays from the center; only visible when stroked.
pub fn burst(outline: &mut Outline, rect: Rect) {
    let center = rect.center();
    let size = inscribed_radius(rect);
    for i in 0..BURST_SPIKES {
        let angle = i as f32 * TAU / BURST_SPIKES as f32;
        outline.move_to(center);
        outline.line_to(pos2(
            center.x + angle.cos() * size,
            center.y + angle.sin() * size,
        ));
    }
}

pub fn cross(outline: &mut Outline, rect: Rect) {
    let center = rect.center();
    let arm_width = rect.width() / 3.0;
    let arm_height = rect.height() / 3.0;
    outline.rect(Rect::from_min_size(
        pos2(rect.left(), center.y - arm_height / 2.0),
        egui::vec2(rect.width(), arm_height),
    ));
    outline.rect(Rect::from_min_size(
        pos2(center.x - arm_width / 2.0, rect.top()),
        egui::vec2(arm_width, rect.height()),
    ));
}

pub fn moon(outline: &mut Outline, rect: Rect) {
    let radius = inscribed_radius(rect);
    let center = rect.center();
    outline.arc(center, radius, 0.5 * PI, 1.5 * PI, false);
    outline.arc(
        pos2(center.x - radius * 0.3, center.y),
        radius * 0.7,
        1.5 * PI,
        0.5 * PI,
        true,
    );
    outline.close();
}

pub fn rounded_rect(outline: &mut Outline, rect: Rect) {
    rounded_box(outline, rect, CORNER_RADIUS);
}

fn rounded_box(outline: &mut Outline, rect: Rect, r: f32) {
    let (x, y, w, h) = (rect.left(), rect.top(), rect.width(), rect.height());
    outline.move_to(pos2(x + r, y));
    outline.line_to(pos2(x + w - r, y));
    outline.quad_to(pos2(x + w, y), pos2(x + w, y + r));
    outline.line_to(pos2(x + w, y + h - r));
    outline.quad_to(pos2(x + w, y + h), pos2(x + w - r, y + h));
    outline.line_to(pos2(x + r, y + h));
    outline.quad_to(pos2(x, y + h), pos2(x, y + h - r));
    outline.line_to(pos2(x, y + r));
    outline.quad_to(pos2(x, y), pos2(x + r, y));
    outline.close();
}

pub fn speech_bubble(outline: &mut Outline, rect: Rect) {
    let (x, y, w, h) = (rect.left(), rect.top(), rect.width(), rect.height());
    let r = CORNER_RADIUS;
    let tail = SPEECH_TAIL;

    outline.move_to(pos2(x + r, y));
    outline.line_to(pos2(x + w - r, y));
    outline.quad_to(pos2(x + w, y), pos2(x + w, y + r));
    outline.line_to(pos2(x + w, y + h - r - tail));
    outline.quad_to(pos2(x + w, y + h - tail), pos2(x + w - r, y + h - tail));
    outline.line_to(pos2(x + r + tail, y + h - tail));
    outline.line_to(pos2(x + r, y + h));
    outline.line_to(pos2(x + r + tail, y + h - tail));
    outline.line_to(pos2(x + r, y + h - tail));
    outline.quad_to(pos2(x, y + h - tail), pos2(x, y + h - r - tail));
    outline.line_to(pos2(x, y + r));
    outline.quad_to(pos2(x, y), pos2(x + r, y));
    outline.close();
}

/// Rounded body plus two trailing dots below the bottom edge.
pub fn thought_bubble(outline: &mut Outline, rect: Rect) {
    let (x, y, w, h) = (rect.left(), rect.top(), rect.width(), rect.height());
    rounded_box(outline, rect, CORNER_RADIUS);

    outline.move_to(pos2(x + w * 0.7, y + h));
    outline.arc(pos2(x + w * 0.7, y + h + THOUGHT_DOT), THOUGHT_DOT, 0.0, TAU, false);
    outline.move_to(pos2(x + w * 0.8, y + h + THOUGHT_DOT * 2.0));
    outline.arc(
        pos2(x + w * 0.8, y + h + THOUGHT_DOT * 3.0),
        THOUGHT_DOT * 0.7,
        0.0,
        TAU,
        false,
    );
}

/// Archimedean spiral sampled once per degree.
pub fn spiral(outline: &mut Outline, rect: Rect) {
    let center = rect.center();
    let size = inscribed_radius(rect);
    let steps = 360 * SPIRAL_COILS;

    outline.move_to(center);
    for i in 0..=steps {
        let angle = (i as f32).to_radians() + SPIRAL_ROTATION;
        let radius = size * (i as f32 / steps as f32);
        outline.line_to(pos2(
            center.x + angle.cos() * radius,
            center.y + angle.sin() * radius,
        ));
    }
}

pub fn cog(outline: &mut Outline, rect: Rect) {
    let center = rect.center();
    let size = inscribed_radius(rect);
    let inner = size * 0.6;
    let at = |angle: f32, radius: f32| {
        pos2(center.x + angle.cos() * radius, center.y + angle.sin() * radius)
    };

    for i in 0..COG_TEETH {
        let angle = i as f32 * TAU / COG_TEETH as f32;
        let next = (i + 1) as f32 * TAU / COG_TEETH as f32;
        if i == 0 {
            outline.move_to(at(angle, size));
        } else {
            outline.line_to(at(angle, size));
        }
        outline.line_to(at(angle, inner));
        outline.line_to(at(next, inner));
        outline.line_to(at(next, size));
    }
    outline.close();
}
