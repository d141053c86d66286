use egui::{Color32, Pos2, Rect};
use tiny_skia::{
    FillRule, FilterQuality, Paint, PathBuilder, Pixmap, PixmapPaint, Stroke, StrokeDash, Transform,
};

use crate::element::{
    DrawableObject, Element, ImageObject, ShapeObject, TextObject, shape::drag_rect,
};
use crate::error::EngineResult;
use crate::geometry::{Corner, handle_rect};
use crate::layer::Layer;
use crate::raster::{self, device_transform};
use crate::settings::SessionSettings;
use crate::shapes::{ShapeKind, ShapeRegistry};
use crate::text::FontBook;
use crate::util::color::skia_color;

const SELECTION_STROKE: Color32 = Color32::from_rgb(0, 0, 255);
const HANDLE_FILL: Color32 = Color32::WHITE;
const SELECTION_PADDING: f32 = 2.0;
const TEXT_BACKGROUND: Color32 = Color32::from_rgba_premultiplied(0, 0, 0, 179);

/// Builds layer frames: committed raster first, then objects in paint
/// order, then the selection decoration.
#[derive(Debug, Clone)]
pub struct Compositor {
    settings: SessionSettings,
    shapes: ShapeRegistry,
    fonts: FontBook,
    handle_size: f32,
    min_shape_size: f32,
}

impl Compositor {
    pub fn new(settings: SessionSettings, handle_size: f32, min_shape_size: f32) -> Self {
        Self {
            settings,
            shapes: ShapeRegistry::with_builtins(),
            fonts: FontBook::new(),
            handle_size,
            min_shape_size,
        }
    }

    pub fn shapes(&self) -> &ShapeRegistry {
        &self.shapes
    }

    pub fn shapes_mut(&mut self) -> &mut ShapeRegistry {
        &mut self.shapes
    }

    pub fn fonts(&self) -> &FontBook {
        &self.fonts
    }

    pub fn fonts_mut(&mut self) -> &mut FontBook {
        &mut self.fonts
    }

    /// Refresh the layer's frame from its raster and objects.
    ///
    /// Text objects get their measured extent updated as a side effect.
    pub fn render(&self, layer: &mut Layer) {
        let base_without_history = layer.is_base() && layer.history().is_empty();
        let dpr = layer.device_pixel_ratio();
        let (raster, objects, frame) = layer.render_parts();
        self.measure(objects);

        frame.fill(tiny_skia::Color::TRANSPARENT);
        if base_without_history {
            raster::fill_solid(frame, Color32::WHITE);
        }
        self.compose_into(frame, dpr, raster, objects, true);
    }

    /// Raster plus objects with no selection decoration, for export.
    pub fn compose_layer(&self, layer: &mut Layer) -> EngineResult<Pixmap> {
        let (width, height) = layer.size();
        let dpr = layer.device_pixel_ratio();
        let mut out = raster::new_surface(width, height, dpr)?;
        let (raster, objects, _) = layer.render_parts();
        self.measure(objects);
        self.compose_into(&mut out, dpr, raster, objects, false);
        Ok(out)
    }

    /// Composite every visible layer, bottom to top, over white at the
    /// given logical size, honoring each layer's pan offset.
    pub fn flatten<'a>(
        &self,
        layers: impl IntoIterator<Item = &'a mut Layer>,
        width: u32,
        height: u32,
        dpr: f32,
    ) -> EngineResult<Pixmap> {
        let mut out = raster::new_surface(width, height, dpr)?;
        raster::fill_solid(&mut out, Color32::WHITE);
        for layer in layers {
            if !layer.visible {
                continue;
            }
            let content = self.compose_layer(layer)?;
            let offset = layer.offset * dpr;
            out.draw_pixmap(
                0,
                0,
                content.as_ref(),
                &PixmapPaint::default(),
                Transform::from_translate(offset.x, offset.y),
                None,
            );
        }
        Ok(out)
    }

    /// Paint the live shape for a drag from `start` to `end` with the
    /// current tool settings.
    pub fn draw_shape_preview(
        &self,
        frame: &mut Pixmap,
        dpr: f32,
        kind: &ShapeKind,
        start: Pos2,
        end: Pos2,
    ) {
        let settings = self.settings.read();
        let preview = ShapeObject::new(
            kind.clone(),
            drag_rect(start, end, self.min_shape_size),
            crate::element::ShapeStyle {
                color: settings.color,
                fill: settings.shape_fill,
                stroke: settings.shape_stroke,
                stroke_width: settings.stroke_width,
            },
        );
        let opacity = settings.opacity;
        drop(settings);
        self.paint_shape(frame, dpr, &preview, opacity);
    }

    fn measure(&self, objects: &mut [DrawableObject]) {
        for obj in objects.iter_mut() {
            if let Some(text) = obj.as_text_mut() {
                let size = self.fonts.measure(&text.content, &text.style());
                text.set_measured_size(size);
            }
        }
    }

    fn compose_into(
        &self,
        target: &mut Pixmap,
        dpr: f32,
        raster: &Pixmap,
        objects: &[DrawableObject],
        decorations: bool,
    ) {
        target.draw_pixmap(
            0,
            0,
            raster.as_ref(),
            &PixmapPaint::default(),
            Transform::identity(),
            None,
        );

        let (opacity, text_background) = {
            let settings = self.settings.read();
            (settings.opacity, settings.text_background)
        };
        for obj in objects {
            match obj {
                DrawableObject::Text(text) => {
                    self.paint_text(target, dpr, text, opacity, text_background)
                }
                DrawableObject::Shape(shape) => self.paint_shape(target, dpr, shape, opacity),
                DrawableObject::Image(image) => paint_image(target, dpr, image, opacity),
            }
            if decorations && obj.is_selected() {
                if obj.is_resizable() {
                    self.paint_handles(target, dpr, obj.rect());
                } else {
                    paint_bounding_box(target, dpr, obj.rect());
                }
            }
        }
    }

    fn paint_text(
        &self,
        target: &mut Pixmap,
        dpr: f32,
        text: &TextObject,
        opacity: f32,
        background: bool,
    ) {
        if background {
            let size = text.measured_size();
            let backdrop = Rect::from_min_size(text.position, size).expand(SELECTION_PADDING);
            if let Some(rect) = skia_rect(backdrop) {
                let mut paint = Paint::default();
                paint.set_color(skia_color(TEXT_BACKGROUND, opacity));
                target.fill_rect(rect, &paint, device_transform(dpr), None);
            }
        }
        self.fonts
            .draw(target, dpr, &text.content, text.position, &text.style(), text.color, opacity);
    }

    fn paint_shape(&self, target: &mut Pixmap, dpr: f32, shape: &ShapeObject, opacity: f32) {
        let Some(path) = self.shapes.trace(&shape.kind, shape.rect()) else {
            return;
        };
        let mut paint = Paint::default();
        paint.set_color(skia_color(shape.style.color, opacity));
        paint.anti_alias = true;

        let transform = device_transform(dpr);
        if shape.style.fill {
            target.fill_path(&path, &paint, FillRule::Winding, transform, None);
        }
        if shape.style.stroke && shape.style.stroke_width > 0.0 {
            let stroke = Stroke {
                width: shape.style.stroke_width,
                ..Stroke::default()
            };
            target.stroke_path(&path, &paint, &stroke, transform, None);
        }
    }

    fn paint_handles(&self, target: &mut Pixmap, dpr: f32, rect: Rect) {
        let transform = device_transform(dpr);
        let outline = solid_paint(SELECTION_STROKE);
        let stroke = Stroke {
            width: 2.0,
            ..Stroke::default()
        };
        if let Some(path) = skia_rect(rect.expand(SELECTION_PADDING)).map(PathBuilder::from_rect) {
            target.stroke_path(&path, &outline, &stroke, transform, None);
        }

        let fill = solid_paint(HANDLE_FILL);
        for corner in Corner::ALL {
            let Some(handle) = skia_rect(handle_rect(rect, corner, self.handle_size)) else {
                continue;
            };
            target.fill_rect(handle, &fill, transform, None);
            target.stroke_path(&PathBuilder::from_rect(handle), &outline, &stroke, transform, None);
        }
    }
}

fn paint_image(target: &mut Pixmap, dpr: f32, image: &ImageObject, opacity: f32) {
    let bitmap = image.bitmap();
    if image.size.x <= 0.0 || image.size.y <= 0.0 {
        return;
    }
    let sx = image.size.x / bitmap.width() as f32;
    let sy = image.size.y / bitmap.height() as f32;
    let transform = Transform::from_row(sx, 0.0, 0.0, sy, image.position.x, image.position.y)
        .post_scale(dpr, dpr);
    let paint = PixmapPaint {
        opacity: opacity.clamp(0.0, 1.0),
        quality: FilterQuality::Bilinear,
        ..PixmapPaint::default()
    };
    target.draw_pixmap(0, 0, bitmap.as_ref(), &paint, transform, None);
}

fn paint_bounding_box(target: &mut Pixmap, dpr: f32, rect: Rect) {
    let Some(path) = skia_rect(rect.expand(SELECTION_PADDING)).map(PathBuilder::from_rect) else {
        return;
    };
    let stroke = Stroke {
        width: 2.0,
        dash: StrokeDash::new(vec![5.0, 5.0], 0.0),
        ..Stroke::default()
    };
    target.stroke_path(&path, &solid_paint(SELECTION_STROKE), &stroke, device_transform(dpr), None);
}

fn solid_paint(color: Color32) -> Paint<'static> {
    let mut paint = Paint::default();
    paint.set_color(skia_color(color, 1.0));
    paint.anti_alias = true;
    paint
}

fn skia_rect(rect: Rect) -> Option<tiny_skia::Rect> {
    tiny_skia::Rect::from_ltrb(rect.min.x, rect.min.y, rect.max.x, rect.max.y)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::element::ShapeStyle;
    use crate::layer::LayerId;
    use crate::raster::pixel_rgba;
    use egui::{pos2, vec2};

    fn compositor() -> Compositor {
        Compositor::new(SessionSettings::default(), 6.0, 5.0)
    }

    fn red_square(min: Pos2) -> ShapeObject {
        ShapeObject::new(
            ShapeKind::Rectangle,
            Rect::from_min_size(min, vec2(20.0, 20.0)),
            ShapeStyle {
                color: Color32::RED,
                fill: true,
                stroke: false,
                stroke_width: 2.0,
            },
        )
    }

    #[test]
    fn objects_paint_over_raster_without_touching_it() {
        let compositor = compositor();
        let mut layer = Layer::create(LayerId::BASE, 60, 60, 1.0, 60).unwrap();
        layer.add_object(red_square(pos2(10.0, 10.0)));
        compositor.render(&mut layer);

        assert_eq!(pixel_rgba(layer.frame(), 20, 20), Some([255, 0, 0, 255]));
        assert_eq!(pixel_rgba(layer.frame(), 45, 45), Some([255, 255, 255, 255]));
        assert_eq!(pixel_rgba(layer.raster(), 20, 20), Some([255, 255, 255, 255]));
    }

    #[test]
    fn moving_an_object_leaves_no_ghost() {
        let compositor = compositor();
        let mut layer = Layer::create(LayerId::BASE, 80, 80, 1.0, 60).unwrap();
        let id = layer.add_object(red_square(pos2(5.0, 5.0)));
        compositor.render(&mut layer);
        if let Some(obj) = layer.object_mut(id) {
            obj.set_position(pos2(50.0, 50.0));
        }
        compositor.render(&mut layer);

        assert_eq!(pixel_rgba(layer.frame(), 15, 15), Some([255, 255, 255, 255]));
        assert_eq!(pixel_rgba(layer.frame(), 60, 60), Some([255, 0, 0, 255]));
    }

    #[test]
    fn selection_decoration_stays_out_of_export() {
        let compositor = compositor();
        let mut layer = Layer::create(LayerId::BASE, 60, 60, 1.0, 60).unwrap();
        let id = layer.add_object(red_square(pos2(20.0, 20.0)));
        layer.select_only(id);
        compositor.render(&mut layer);
        // top-left handle interior is white-filled, outline is blue
        assert_eq!(pixel_rgba(layer.frame(), 20, 17), Some([0, 0, 255, 255]));

        let exported = compositor.compose_layer(&mut layer).unwrap();
        assert_eq!(pixel_rgba(&exported, 20, 17), Some([255, 255, 255, 255]));
    }

    #[test]
    fn flatten_skips_hidden_layers_and_applies_offset() {
        let compositor = compositor();
        let mut base = Layer::create(LayerId::BASE, 40, 40, 1.0, 60).unwrap();
        let mut top = Layer::create(LayerId(1), 40, 40, 1.0, 60).unwrap();
        top.add_object(red_square(pos2(0.0, 0.0)));
        top.offset = vec2(10.0, 10.0);

        let flat = compositor.flatten([&mut base, &mut top], 40, 40, 1.0).unwrap();
        assert_eq!(pixel_rgba(&flat, 5, 5), Some([255, 255, 255, 255]));
        assert_eq!(pixel_rgba(&flat, 15, 15), Some([255, 0, 0, 255]));

        top.visible = false;
        let flat = compositor.flatten([&mut base, &mut top], 40, 40, 1.0).unwrap();
        assert_eq!(pixel_rgba(&flat, 15, 15), Some([255, 255, 255, 255]));
    }
}
