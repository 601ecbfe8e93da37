//! Raster encoding.
//!
//! The two export kinds trade differently: a single downloadable slide
//! favors lossless high-density PNG, while the multi-page document embeds
//! lossy JPEG pages to bound the output size.

use image::codecs::jpeg::JpegEncoder;
use image::codecs::png::{CompressionType, FilterType, PngEncoder};
use image::ImageEncoder;

use crate::error::{ExportError, ExportResult};
use crate::surface::CapturedFrame;

/// Encode a frame as lossless PNG at maximum compression.
///
/// # Errors
///
/// Returns an error if encoding fails.
pub fn encode_png(frame: &CapturedFrame) -> ExportResult<Vec<u8>> {
    let mut buf = std::io::Cursor::new(Vec::new());
    let encoder = PngEncoder::new_with_quality(&mut buf, CompressionType::Best, FilterType::Adaptive);
    encoder
        .write_image(
            &frame.rgba,
            frame.width,
            frame.height,
            image::ColorType::Rgba8.into(),
        )
        .map_err(|e| ExportError::Encode(format!("PNG encoding failed: {e}")))?;
    Ok(buf.into_inner())
}

/// Encode a frame as JPEG, alpha-blending it over the given background
/// since JPEG has no alpha channel.
///
/// # Errors
///
/// Returns an error if encoding fails.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn encode_jpeg(frame: &CapturedFrame, quality: u8, background: [u8; 4]) -> ExportResult<Vec<u8>> {
    let mut rgb = Vec::with_capacity((frame.width as usize) * (frame.height as usize) * 3);
    for pixel in frame.rgba.chunks_exact(4) {
        let alpha = f32::from(pixel[3]) / 255.0;
        let inv = 1.0 - alpha;
        rgb.push((f32::from(pixel[0]).mul_add(alpha, f32::from(background[0]) * inv)) as u8);
        rgb.push((f32::from(pixel[1]).mul_add(alpha, f32::from(background[1]) * inv)) as u8);
        rgb.push((f32::from(pixel[2]).mul_add(alpha, f32::from(background[2]) * inv)) as u8);
    }

    let mut buf = std::io::Cursor::new(Vec::new());
    let encoder = JpegEncoder::new_with_quality(&mut buf, quality);
    encoder
        .write_image(
            &rgb,
            frame.width,
            frame.height,
            image::ColorType::Rgb8.into(),
        )
        .map_err(|e| ExportError::Encode(format!("JPEG encoding failed: {e}")))?;
    Ok(buf.into_inner())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frame() -> CapturedFrame {
        CapturedFrame::blank(16, 16, [200, 100, 50, 255])
    }

    #[test]
    fn test_png_magic_bytes() {
        let png = encode_png(&frame()).expect("png");
        assert_eq!(&png[0..4], &[137, 80, 78, 71]);
    }

    #[test]
    fn test_jpeg_magic_bytes() {
        let jpeg = encode_jpeg(&frame(), 85, [255, 255, 255, 255]).expect("jpeg");
        assert_eq!(jpeg[0], 0xFF);
        assert_eq!(jpeg[1], 0xD8);
    }

    #[test]
    #[allow(clippy::cast_possible_truncation)]
    fn test_jpeg_quality_affects_size() {
        let frame = {
            // Noise compresses badly, making the quality gap visible.
            let mut f = CapturedFrame::blank(64, 64, [0, 0, 0, 255]);
            for (i, byte) in f.rgba.iter_mut().enumerate() {
                *byte = (i * 31 % 251) as u8;
            }
            f
        };
        let low = encode_jpeg(&frame, 30, [255, 255, 255, 255]).expect("low");
        let high = encode_jpeg(&frame, 95, [255, 255, 255, 255]).expect("high");
        assert!(high.len() >= low.len());
    }

    #[test]
    fn test_jpeg_blends_alpha_over_background() {
        // Fully transparent frame over a red background encodes as red.
        let transparent = CapturedFrame::blank(8, 8, [0, 0, 0, 0]);
        let jpeg = encode_jpeg(&transparent, 90, [255, 0, 0, 255]).expect("jpeg");
        let decoded = image::load_from_memory(&jpeg).expect("decode").to_rgb8();
        let pixel = decoded.get_pixel(4, 4);
        assert!(pixel[0] > 200, "expected red-dominant pixel, got {pixel:?}");
        assert!(pixel[1] < 60);
    }
}
