//! Shape tracing: a registry from shape kind to a pure geometry function
//! that writes the kind's outline for a bounding box.

use std::collections::HashMap;
use std::fmt;

use egui::Rect;
use serde::{Deserialize, Serialize};
use tiny_skia::Path;

pub mod builtin;
mod outline;

pub use outline::Outline;

/// Named shape kinds. Names match the persisted tool-state strings.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ShapeKind {
    Rectangle,
    Circle,
    Ellipse,
    Triangle,
    Line,
    Star,
    Heart,
    Arrow,
    Polygon,
    Cloud,
    House,
    Burst,
    Cross,
    Moon,
    Hexagon,
    Octagon,
    RoundedRect,
    SpeechBubble,
    ThoughtBubble,
    Spiral,
    Cog,
    /// A kind registered by the host at runtime
    Custom(String),
}

impl ShapeKind {
    pub const BUILTIN: [ShapeKind; 21] = [
        Self::Rectangle,
        Self::Circle,
        Self::Ellipse,
        Self::Triangle,
        Self::Line,
        Self::Star,
        Self::Heart,
        Self::Arrow,
        Self::Polygon,
        Self::Cloud,
        Self::House,
        Self::Burst,
        Self::Cross,
        Self::Moon,
        Self::Hexagon,
        Self::Octagon,
        Self::RoundedRect,
        Self::SpeechBubble,
        Self::ThoughtBubble,
        Self::Spiral,
        Self::Cog,
    ];

    pub fn name(&self) -> &str {
        match self {
            Self::Rectangle => "rect",
            Self::Circle => "circle",
            Self::Ellipse => "ellipse",
            Self::Triangle => "triangle",
            Self::Line => "line",
            Self::Star => "star",
            Self::Heart => "heart",
            Self::Arrow => "arrow",
            Self::Polygon => "polygon",
            Self::Cloud => "cloud",
            Self::House => "house",
            Self::Burst => "burst",
            Self::Cross => "cross",
            Self::Moon => "moon",
            Self::Hexagon => "hexagon",
            Self::Octagon => "octagon",
            Self::RoundedRect => "roundedRect",
            Self::SpeechBubble => "speechBubble",
            Self::ThoughtBubble => "thoughtBubble",
            Self::Spiral => "spiral",
            Self::Cog => "cog",
            Self::Custom(name) => name,
        }
    }
}

impl Default for ShapeKind {
    fn default() -> Self {
        Self::Rectangle
    }
}

impl fmt::Display for ShapeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl From<String> for ShapeKind {
    fn from(name: String) -> Self {
        Self::BUILTIN
            .iter()
            .find(|kind| kind.name() == name)
            .cloned()
            .unwrap_or(Self::Custom(name))
    }
}

impl From<&str> for ShapeKind {
    fn from(name: &str) -> Self {
        Self::from(name.to_owned())
    }
}

impl From<ShapeKind> for String {
    fn from(kind: ShapeKind) -> Self {
        kind.name().to_owned()
    }
}

/// Writes a shape's outline for a normalized bounding box.
pub type ShapeTracer = fn(&mut Outline, Rect);

/// Lookup from shape kind to tracer, shared by live previews and
/// committed shape objects.
#[derive(Clone)]
pub struct ShapeRegistry {
    tracers: HashMap<ShapeKind, ShapeTracer>,
}

impl fmt::Debug for ShapeRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ShapeRegistry")
            .field("kinds", &self.tracers.len())
            .finish()
    }
}

impl Default for ShapeRegistry {
    fn default() -> Self {
        Self::with_builtins()
    }
}

impl ShapeRegistry {
    /// A registry with no kinds at all.
    pub fn empty() -> Self {
        Self {
            tracers: HashMap::new(),
        }
    }

    pub fn with_builtins() -> Self {
        let mut registry = Self::empty();
        registry.register(ShapeKind::Rectangle, builtin::rectangle);
        registry.register(ShapeKind::Circle, builtin::circle);
        registry.register(ShapeKind::Ellipse, builtin::ellipse);
        registry.register(ShapeKind::Triangle, builtin::triangle);
        registry.register(ShapeKind::Line, builtin::line);
        registry.register(ShapeKind::Star, builtin::star_default);
        registry.register(ShapeKind::Heart, builtin::heart);
        registry.register(ShapeKind::Arrow, builtin::arrow_default);
        registry.register(ShapeKind::Polygon, builtin::polygon_default);
        registry.register(ShapeKind::Cloud, builtin::cloud);
        registry.register(ShapeKind::House, builtin::house);
        registry.register(ShapeKind::Burst, builtin::burst);
        registry.register(ShapeKind::Cross, builtin::cross);
        registry.register(ShapeKind::Moon, builtin::moon);
        registry.register(ShapeKind::Hexagon, builtin::hexagon);
        registry.register(ShapeKind::Octagon, builtin::octagon);
        registry.register(ShapeKind::RoundedRect, builtin::rounded_rect);
        registry.register(ShapeKind::SpeechBubble, builtin::speech_bubble);
        registry.register(ShapeKind::ThoughtBubble, builtin::thought_bubble);
        registry.register(ShapeKind::Spiral, builtin::spiral);
        registry.register(ShapeKind::Cog, builtin::cog);
        registry
    }

    /// Add or replace the tracer for a kind.
    pub fn register(&mut self, kind: ShapeKind, tracer: ShapeTracer) {
        self.tracers.insert(kind, tracer);
    }

    pub fn contains(&self, kind: &ShapeKind) -> bool {
        self.tracers.contains_key(kind)
    }

    /// Append the outline of `kind` to an existing path.
    pub fn trace_into(&self, kind: &ShapeKind, rect: Rect, outline: &mut Outline) -> bool {
        match self.tracers.get(kind) {
            Some(tracer) => {
                tracer(outline, rect);
                true
            }
            None => {
                log::warn!("No tracer registered for shape kind '{kind}'");
                false
            }
        }
    }

    /// Build the path for `kind` inside `rect`. `None` for unknown kinds
    /// and degenerate outlines.
    pub fn trace(&self, kind: &ShapeKind, rect: Rect) -> Option<Path> {
        let mut outline = Outline::new();
        if !self.trace_into(kind, rect, &mut outline) {
            return None;
        }
        outline.finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use egui::{pos2, vec2};

    fn unit_box() -> Rect {
        Rect::from_min_size(pos2(10.0, 20.0), vec2(100.0, 60.0))
    }

    #[test]
    fn every_builtin_traces_a_path() {
        let registry = ShapeRegistry::with_builtins();
        for kind in ShapeKind::BUILTIN.iter() {
            assert!(
                registry.trace(kind, unit_box()).is_some(),
                "{kind} produced no path"
            );
        }
    }

    #[test]
    fn rectangle_matches_its_box() {
        let path = ShapeRegistry::default()
            .trace(&ShapeKind::Rectangle, unit_box())
            .unwrap();
        let bounds = path.bounds();
        assert_eq!(bounds.left(), 10.0);
        assert_eq!(bounds.top(), 20.0);
        assert_eq!(bounds.right(), 110.0);
        assert_eq!(bounds.bottom(), 80.0);
    }

    #[test]
    fn star_first_spike_points_up() {
        let path = ShapeRegistry::default()
            .trace(&ShapeKind::Star, unit_box())
            .unwrap();
        // Inscribed radius 30 around (60, 50).
        assert!((path.bounds().top() - 20.0).abs() < 1e-3);
    }

    #[test]
    fn unknown_kind_is_skipped() {
        let registry = ShapeRegistry::with_builtins();
        let kind = ShapeKind::from("blob");
        assert_eq!(kind, ShapeKind::Custom("blob".into()));
        assert!(registry.trace(&kind, unit_box()).is_none());
    }

    #[test]
    fn custom_kinds_can_be_registered() {
        let mut registry = ShapeRegistry::with_builtins();
        let kind = ShapeKind::from("diamond");
        registry.register(kind.clone(), |outline, rect| {
            outline.move_to(rect.center_top());
            outline.line_to(rect.right_center());
            outline.line_to(rect.center_bottom());
            outline.line_to(rect.left_center());
            outline.close();
        });
        assert!(registry.trace(&kind, unit_box()).is_some());
    }

    #[test]
    fn names_round_trip_through_serde() {
        let json = serde_json::to_string(&ShapeKind::RoundedRect).unwrap();
        assert_eq!(json, "\"roundedRect\"");
        let kind: ShapeKind = serde_json::from_str("\"speechBubble\"").unwrap();
        assert_eq!(kind, ShapeKind::SpeechBubble);
    }
}
