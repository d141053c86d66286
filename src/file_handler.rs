//! Byte-level conversions between surfaces and files: snapshot blobs,
//! pasted or dropped images, PNG export and data URLs.

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use image::codecs::png::PngEncoder;
use image::{ExtendedColorType, ImageEncoder, ImageFormat, RgbaImage};
use tiny_skia::{ColorU8, IntSize, Pixmap};

use crate::error::{EngineError, EngineResult};

const PNG_DATA_URL_PREFIX: &str = "data:image/png;base64,";

fn write_png(data: &[u8], width: u32, height: u32) -> Result<Vec<u8>, image::ImageError> {
    let mut out = Vec::new();
    PngEncoder::new(&mut out).write_image(data, width, height, ExtendedColorType::Rgba8)?;
    Ok(out)
}

/// Lossless encoding of a surface's raw premultiplied bytes.
///
/// The bytes are stored as-is so decoding reproduces the surface exactly.
pub fn encode_snapshot(pixmap: &Pixmap) -> EngineResult<Vec<u8>> {
    write_png(pixmap.data(), pixmap.width(), pixmap.height())
        .map_err(|err| EngineError::SnapshotEncode(err.to_string()))
}

/// Inverse of [`encode_snapshot`].
pub fn decode_snapshot(bytes: &[u8]) -> EngineResult<Pixmap> {
    let decoded = image::load_from_memory_with_format(bytes, ImageFormat::Png)
        .map_err(|err| EngineError::SnapshotDecode(err.to_string()))?
        .into_rgba8();
    let (width, height) = decoded.dimensions();
    let size = IntSize::from_wh(width, height)
        .ok_or_else(|| EngineError::SnapshotDecode(format!("empty {width}x{height} snapshot")))?;
    Pixmap::from_vec(decoded.into_raw(), size)
        .ok_or_else(|| EngineError::SnapshotDecode("pixel buffer size mismatch".to_owned()))
}

/// Decode any supported image format into a premultiplied surface.
pub fn decode_image(bytes: &[u8]) -> EngineResult<Pixmap> {
    let rgba = image::load_from_memory(bytes)?.to_rgba8();
    log::debug!("Decoded image: {}x{}", rgba.width(), rgba.height());
    pixmap_from_rgba(&rgba)
}

/// Premultiply an RGBA image into a surface.
pub fn pixmap_from_rgba(rgba: &RgbaImage) -> EngineResult<Pixmap> {
    let (width, height) = rgba.dimensions();
    let mut pixmap =
        Pixmap::new(width, height).ok_or(EngineError::SurfaceAllocation { width, height })?;
    for (dst, src) in pixmap.pixels_mut().iter_mut().zip(rgba.pixels()) {
        let [r, g, b, a] = src.0;
        *dst = ColorU8::from_rgba(r, g, b, a).premultiply();
    }
    Ok(pixmap)
}

/// Standard PNG of a surface, with alpha demultiplied.
pub fn encode_png(pixmap: &Pixmap) -> EngineResult<Vec<u8>> {
    let mut data = Vec::with_capacity(pixmap.data().len());
    for pixel in pixmap.pixels() {
        let c = pixel.demultiply();
        data.extend_from_slice(&[c.red(), c.green(), c.blue(), c.alpha()]);
    }
    write_png(&data, pixmap.width(), pixmap.height())
        .map_err(|err| EngineError::SnapshotEncode(err.to_string()))
}

/// `data:image/png;base64,...` payload for PNG bytes.
pub fn png_data_url(png: &[u8]) -> String {
    format!("{PNG_DATA_URL_PREFIX}{}", STANDARD.encode(png))
}

/// Extract the payload of a base64 `data:` URL of any image media type.
pub fn decode_data_url(url: &str) -> EngineResult<Vec<u8>> {
    let rest = url
        .trim()
        .strip_prefix("data:")
        .ok_or_else(|| EngineError::InvalidDataUrl("missing data: scheme".to_owned()))?;
    let (header, payload) = rest
        .split_once(',')
        .ok_or_else(|| EngineError::InvalidDataUrl("missing payload".to_owned()))?;
    if !header.ends_with(";base64") {
        return Err(EngineError::InvalidDataUrl(format!("unsupported encoding in {header}")));
    }
    STANDARD
        .decode(payload)
        .map_err(|err| EngineError::InvalidDataUrl(err.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::raster::{fill_solid, new_surface, pixel_rgba};
    use egui::Color32;

    #[test]
    fn snapshot_round_trip_is_exact() {
        let mut surface = new_surface(16, 8, 1.0).unwrap();
        fill_solid(&mut surface, Color32::from_rgba_unmultiplied(200, 40, 10, 128));
        let blob = encode_snapshot(&surface).unwrap();
        let restored = decode_snapshot(&blob).unwrap();
        assert_eq!(restored.data(), surface.data());
    }

    #[test]
    fn exported_png_decodes_as_image() {
        let mut surface = new_surface(4, 4, 1.0).unwrap();
        fill_solid(&mut surface, Color32::from_rgb(0, 128, 255));
        let png = encode_png(&surface).unwrap();
        let decoded = decode_image(&png).unwrap();
        assert_eq!(pixel_rgba(&decoded, 2, 2), Some([0, 128, 255, 255]));
    }

    #[test]
    fn data_url_round_trip() {
        let url = png_data_url(&[1, 2, 3]);
        assert!(url.starts_with("data:image/png;base64,"));
        assert_eq!(decode_data_url(&url).unwrap(), vec![1, 2, 3]);
        assert!(decode_data_url("https://example.com/a.png").is_err());
        assert!(decode_data_url("data:text/plain,hello").is_err());
    }
}
