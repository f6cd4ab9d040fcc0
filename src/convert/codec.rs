/// Decode, resize and encode steps of the conversion pipeline
///
/// All functions here are synchronous and CPU-bound; the pipeline runs
/// them on a blocking worker thread.
use image::{imageops::FilterType, DynamicImage, RgbaImage};

/// Decode raw file bytes into a bitmap with known dimensions.
pub fn decode(data: &[u8]) -> image::ImageResult<DynamicImage> {
    image::load_from_memory(data)
}

/// Compute the output dimensions for a source image.
///
/// The width is forced to `target_width` and the height follows the
/// source aspect ratio: `round(source_height * target_width / source_width)`.
/// A target width of zero yields a zero-area surface, which the pipeline
/// treats as nothing to encode.
pub fn output_dimensions(
    target_width: u32,
    source_width: u32,
    source_height: u32,
) -> (u32, u32) {
    let scale = target_width as f64 / source_width as f64;
    let height = (source_height as f64 * scale).round() as u32;
    (target_width, height)
}

/// Draw the decoded bitmap into a surface of exactly `width` x `height`,
/// stretching to fill it completely.
pub fn rasterize(source: &DynamicImage, width: u32, height: u32) -> RgbaImage {
    source
        .resize_exact(width, height, FilterType::Lanczos3)
        .into_rgba8()
}

/// Encode an RGBA surface to lossy WebP.
///
/// `quality` is on libwebp's 0 to 100 scale. Returns `None` when the
/// encoder produces no usable data, which callers treat as "skip this
/// image" rather than as an error.
pub fn encode_webp(surface: &RgbaImage, quality: f32) -> Option<Vec<u8>> {
    if surface.width() == 0 || surface.height() == 0 {
        return None;
    }
    let encoder = webp::Encoder::from_rgba(surface.as_raw(), surface.width(), surface.height());
    let encoded = encoder.encode(quality);
    if encoded.is_empty() {
        None
    } else {
        Some(encoded.to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageFormat, Rgba};
    use std::io::Cursor;

    fn png_bytes(width: u32, height: u32) -> Vec<u8> {
        let img = RgbaImage::from_pixel(width, height, Rgba([180, 40, 90, 255]));
        let mut buffer = Cursor::new(Vec::new());
        DynamicImage::ImageRgba8(img)
            .write_to(&mut buffer, ImageFormat::Png)
            .unwrap();
        buffer.into_inner()
    }

    #[test]
    fn decode_reads_dimensions() {
        let decoded = decode(&png_bytes(64, 48)).expect("decode png");
        assert_eq!((decoded.width(), decoded.height()), (64, 48));
    }

    #[test]
    fn decode_rejects_garbage() {
        assert!(decode(b"definitely not an image").is_err());
    }

    #[test]
    fn output_dimensions_follow_the_aspect_ratio() {
        assert_eq!(output_dimensions(400, 800, 600), (400, 300));
        assert_eq!(output_dimensions(400, 400, 300), (400, 300));
        assert_eq!(output_dimensions(1600, 800, 600), (1600, 1200));
    }

    #[test]
    fn output_height_is_rounded() {
        // 333 * 500 / 1000 = 166.5, rounds to 167
        assert_eq!(output_dimensions(500, 1000, 333), (500, 167));
    }

    #[test]
    fn zero_target_width_gives_a_zero_area_surface() {
        assert_eq!(output_dimensions(0, 800, 600), (0, 0));
    }

    #[test]
    fn rasterize_stretches_to_the_exact_size() {
        let source = decode(&png_bytes(64, 48)).unwrap();
        let surface = rasterize(&source, 10, 3);
        assert_eq!((surface.width(), surface.height()), (10, 3));
    }

    #[test]
    fn encode_webp_emits_a_riff_container() {
        let surface = RgbaImage::from_pixel(16, 16, Rgba([10, 200, 120, 255]));
        let encoded = encode_webp(&surface, 80.0).expect("encoded data");
        assert_eq!(&encoded[0..4], b"RIFF");
        assert_eq!(&encoded[8..12], b"WEBP");
    }

    #[test]
    fn encode_webp_skips_zero_area_surfaces() {
        let surface = RgbaImage::new(0, 0);
        assert!(encode_webp(&surface, 80.0).is_none());
    }
}
