//! Font registry and glyph rasterization for text objects.

use std::collections::HashMap;

use ab_glyph::{Font as _, FontArc, GlyphId, ScaleFont as _, point};
use egui::{Color32, Pos2, Vec2, vec2};
use tiny_skia::{Mask, Paint, Pixmap, Rect, Transform};

use crate::error::{EngineError, EngineResult};
use crate::settings::TextStyle;
use crate::util::color::skia_color;

/// Advance per character, relative to font size, when no font is loaded.
const FALLBACK_ADVANCE: f32 = 0.6;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct FaceKey {
    family: String,
    bold: bool,
    italic: bool,
}

impl FaceKey {
    fn new(family: &str, bold: bool, italic: bool) -> Self {
        Self {
            family: family.trim().to_lowercase(),
            bold,
            italic,
        }
    }
}

/// Fonts available to the compositor, keyed by family and style.
///
/// Lookups fall back from the requested face to the family's regular face,
/// then to the first font ever registered. With no fonts at all, text is
/// measured approximately and no glyphs are drawn.
#[derive(Default, Clone)]
pub struct FontBook {
    faces: HashMap<FaceKey, FontArc>,
    fallback: Option<FontArc>,
}

impl std::fmt::Debug for FontBook {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FontBook")
            .field("faces", &self.faces.len())
            .field("fallback", &self.fallback.is_some())
            .finish()
    }
}

impl FontBook {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a TrueType/OpenType face.
    pub fn register(
        &mut self,
        family: &str,
        bold: bool,
        italic: bool,
        data: Vec<u8>,
    ) -> EngineResult<()> {
        let font = FontArc::try_from_vec(data)
            .map_err(|_| EngineError::InvalidFont(family.to_owned()))?;
        if self.fallback.is_none() {
            self.fallback = Some(font.clone());
        }
        log::info!("Registered font {family} (bold: {bold}, italic: {italic})");
        self.faces.insert(FaceKey::new(family, bold, italic), font);
        Ok(())
    }

    pub fn is_empty(&self) -> bool {
        self.faces.is_empty()
    }

    fn face(&self, style: &TextStyle) -> Option<&FontArc> {
        self.faces
            .get(&FaceKey::new(&style.family, style.bold, style.italic))
            .or_else(|| self.faces.get(&FaceKey::new(&style.family, false, false)))
            .or(self.fallback.as_ref())
    }

    /// Laid-out extent of a single line; height is the font size.
    pub fn measure(&self, content: &str, style: &TextStyle) -> Vec2 {
        let width = match self.face(style) {
            Some(font) => {
                let scaled = font.as_scaled(style.size);
                let mut width = 0.0;
                let mut prev: Option<GlyphId> = None;
                for ch in content.chars() {
                    let id = font.glyph_id(ch);
                    if let Some(prev) = prev {
                        width += scaled.kern(prev, id);
                    }
                    width += scaled.h_advance(id);
                    prev = Some(id);
                }
                width
            }
            None => content.chars().count() as f32 * style.size * FALLBACK_ADVANCE,
        };
        vec2(width, style.size)
    }

    /// Draw `content` with its top edge at `position` (logical units).
    pub fn draw(
        &self,
        pixmap: &mut Pixmap,
        dpr: f32,
        content: &str,
        position: Pos2,
        style: &TextStyle,
        color: Color32,
        opacity: f32,
    ) {
        let Some(font) = self.face(style) else {
            log::debug!("No font for {:?}, skipping glyphs", style.family);
            return;
        };
        let Some(mut mask) = Mask::new(pixmap.width(), pixmap.height()) else {
            return;
        };

        let px = style.size * dpr;
        let scaled = font.as_scaled(px);
        let baseline = position.y * dpr + scaled.ascent();
        let (mask_w, mask_h) = (mask.width() as i64, mask.height() as i64);
        let coverage = mask.data_mut();

        let mut x = position.x * dpr;
        let mut prev: Option<GlyphId> = None;
        for ch in content.chars() {
            let id = font.glyph_id(ch);
            if let Some(prev) = prev {
                x += scaled.kern(prev, id);
            }
            let glyph = id.with_scale_and_position(px, point(x, baseline));
            if let Some(outlined) = font.outline_glyph(glyph) {
                let bounds = outlined.px_bounds();
                outlined.draw(|gx, gy, c| {
                    let tx = bounds.min.x as i64 + gx as i64;
                    let ty = bounds.min.y as i64 + gy as i64;
                    if tx < 0 || ty < 0 || tx >= mask_w || ty >= mask_h {
                        return;
                    }
                    let slot = &mut coverage[(ty * mask_w + tx) as usize];
                    *slot = (*slot).max((c.clamp(0.0, 1.0) * 255.0).round() as u8);
                });
            }
            x += scaled.h_advance(id);
            prev = Some(id);
        }

        let mut paint = Paint::default();
        paint.set_color(skia_color(color, opacity));
        let (width, height) = (pixmap.width() as f32, pixmap.height() as f32);
        if let Some(rect) = Rect::from_xywh(0.0, 0.0, width, height) {
            pixmap.fill_rect(rect, &paint, Transform::identity(), Some(&mask));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn measures_without_fonts() {
        let book = FontBook::new();
        let style = TextStyle {
            size: 20.0,
            ..TextStyle::default()
        };
        assert_eq!(book.measure("Hi", &style), vec2(24.0, 20.0));
        assert_eq!(book.measure("", &style), vec2(0.0, 20.0));
    }

    #[test]
    fn rejects_garbage_font_data() {
        let mut book = FontBook::new();
        assert!(book.register("Broken", false, false, vec![0, 1, 2, 3]).is_err());
        assert!(book.is_empty());
    }
}
