use egui::Color32;
use tiny_skia::{Color, PremultipliedColorU8};

use crate::error::{EngineError, EngineResult};

/// Parse `#rgb` or `#rrggbb` (leading `#` optional) into an opaque color.
pub fn parse_hex_color(hex: &str) -> EngineResult<Color32> {
    let digits = hex.trim().trim_start_matches('#');
    if !digits.is_ascii() {
        return Err(EngineError::InvalidColor(hex.to_owned()));
    }
    let expanded: String = match digits.len() {
        3 => digits.chars().flat_map(|ch| [ch, ch]).collect(),
        6 => digits.to_owned(),
        _ => return Err(EngineError::InvalidColor(hex.to_owned())),
    };

    let channel = |range: std::ops::Range<usize>| {
        u8::from_str_radix(&expanded[range], 16)
            .map_err(|_| EngineError::InvalidColor(hex.to_owned()))
    };
    Ok(Color32::from_rgb(channel(0..2)?, channel(2..4)?, channel(4..6)?))
}

/// Format a color as `#rrggbb`, dropping alpha.
pub fn to_hex(color: Color32) -> String {
    format!("#{:02x}{:02x}{:02x}", color.r(), color.g(), color.b())
}

/// Convert to a paint color with the given global alpha applied.
pub fn skia_color(color: Color32, opacity: f32) -> Color {
    let [r, g, b, a] = color.to_srgba_unmultiplied();
    let mut skia = Color::from_rgba8(r, g, b, a);
    skia.apply_opacity(opacity.clamp(0.0, 1.0));
    skia
}

/// The exact premultiplied pixel a fully opaque fill writes.
pub fn opaque_pixel(color: Color32) -> PremultipliedColorU8 {
    // Alpha 255 is always a valid premultiplied value for any rgb.
    PremultipliedColorU8::from_rgba(color.r(), color.g(), color.b(), 255)
        .unwrap_or(PremultipliedColorU8::TRANSPARENT)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_long_and_short_forms() {
        assert_eq!(parse_hex_color("#ff0000").unwrap(), Color32::from_rgb(255, 0, 0));
        assert_eq!(parse_hex_color("0f8").unwrap(), Color32::from_rgb(0, 255, 136));
    }

    #[test]
    fn rejects_garbage() {
        assert!(parse_hex_color("#12345").is_err());
        assert!(parse_hex_color("#zzzzzz").is_err());
    }

    #[test]
    fn hex_round_trip() {
        assert_eq!(to_hex(Color32::from_rgb(18, 52, 86)), "#123456");
    }
}
