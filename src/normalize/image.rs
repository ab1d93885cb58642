//! Bitmap decoding for image uploads

use image::{DynamicImage, GenericImageView, ImageFormat};

use crate::types::{AppError, AppResult};

/// A decoded bitmap plus the dimensions reported to the preview layer.
/// Held in memory only; image content is previewable but not yet queryable.
#[derive(Clone)]
pub struct ImageContent {
    pub pixels: DynamicImage,
    pub width: u32,
    pub height: u32,
    pub format: ImageFormat,
}

impl ImageContent {
    pub fn format_name(&self) -> String {
        format!("{:?}", self.format).to_lowercase()
    }
}

// pixel buffers are noise in logs; print the shape only
impl std::fmt::Debug for ImageContent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ImageContent")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("format", &self.format)
            .finish()
    }
}

pub fn decode(bytes: &[u8]) -> AppResult<ImageContent> {
    let format = image::guess_format(bytes)
        .map_err(|e| AppError::Normalization(format!("failed to detect image format: {}", e)))?;
    let pixels = image::load_from_memory_with_format(bytes, format)
        .map_err(|e| AppError::Normalization(format!("failed to decode image: {}", e)))?;
    let (width, height) = pixels.dimensions();

    Ok(ImageContent {
        pixels,
        width,
        height,
        format,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn encoded(format: ImageFormat) -> Vec<u8> {
        let img = image::RgbImage::from_pixel(6, 4, image::Rgb([120, 10, 200]));
        let mut buf = Cursor::new(Vec::new());
        img.write_to(&mut buf, format).unwrap();
        buf.into_inner()
    }

    #[test]
    fn test_decode_png() {
        let content = decode(&encoded(ImageFormat::Png)).unwrap();
        assert_eq!((content.width, content.height), (6, 4));
        assert_eq!(content.format_name(), "png");
    }

    #[test]
    fn test_decode_jpeg() {
        let content = decode(&encoded(ImageFormat::Jpeg)).unwrap();
        assert_eq!((content.width, content.height), (6, 4));
        assert_eq!(content.format_name(), "jpeg");
    }

    #[test]
    fn test_garbage_is_rejected() {
        assert!(decode(b"not pixels").is_err());
    }

    #[test]
    fn test_debug_omits_pixels() {
        let content = decode(&encoded(ImageFormat::Png)).unwrap();
        let printed = format!("{:?}", content);
        assert!(printed.contains("width"));
        assert!(!printed.contains("pixels"));
    }
}
