//! Pure Rust image backend on the `image` crate.
//!
//! ## Crate mapping
//!
//! | Operation | Crate / function |
//! |---|---|
//! | Decode (JPEG, PNG, TIFF, WebP, GIF, BMP) | `image::ImageReader` with content sniffing |
//! | Render | `DynamicImage::resize_exact` with `Lanczos3` |
//! | Encode → PNG | `image::codecs::png::PngEncoder` (adaptive filtering) |
//!
//! The declared media type of an upload is not trusted: browsers report
//! whatever the file extension says, so the decoder sniffs magic bytes.

use super::backend::{BackendError, Dimensions, ImageBackend};
use super::params::{OutputFormat, PngCompression};
use image::codecs::png::{CompressionType, FilterType as PngFilter, PngEncoder};
use image::imageops::FilterType;
use image::{DynamicImage, ImageReader};
use std::io::Cursor;

/// Pure Rust backend using the `image` crate ecosystem.
///
/// See the [module docs](self) for the crate-to-operation mapping.
pub struct RustBackend;

impl RustBackend {
    pub fn new() -> Self {
        Self
    }
}

impl Default for RustBackend {
    fn default() -> Self {
        Self::new()
    }
}

fn compression_type(compression: PngCompression) -> CompressionType {
    match compression {
        PngCompression::Fast => CompressionType::Fast,
        PngCompression::Default => CompressionType::Default,
        PngCompression::Best => CompressionType::Best,
    }
}

/// Float buffers (HDR/EXR-style decodes) have no PNG representation.
fn png_compatible(img: &DynamicImage) -> Option<DynamicImage> {
    match img {
        DynamicImage::ImageRgb32F(_) | DynamicImage::ImageRgba32F(_) => {
            Some(DynamicImage::ImageRgba8(img.to_rgba8()))
        }
        _ => None,
    }
}

fn encode_png(img: &DynamicImage, compression: PngCompression) -> Result<Vec<u8>, BackendError> {
    let converted = png_compatible(img);
    let img = converted.as_ref().unwrap_or(img);

    let mut buf = Vec::new();
    let encoder =
        PngEncoder::new_with_quality(&mut buf, compression_type(compression), PngFilter::Adaptive);
    img.write_with_encoder(encoder)
        .map_err(|e| BackendError::Encode(format!("PNG encode failed: {}", e)))?;
    Ok(buf)
}

impl ImageBackend for RustBackend {
    type Surface = DynamicImage;

    fn decode(&self, bytes: &[u8]) -> Result<DynamicImage, BackendError> {
        ImageReader::new(Cursor::new(bytes))
            .with_guessed_format()
            .map_err(|e| BackendError::Decode(format!("Failed to sniff format: {}", e)))?
            .decode()
            .map_err(|e| BackendError::Decode(format!("Failed to decode image: {}", e)))
    }

    fn dimensions(&self, surface: &DynamicImage) -> Dimensions {
        Dimensions {
            width: surface.width(),
            height: surface.height(),
        }
    }

    fn render(&self, surface: &DynamicImage, target: Dimensions) -> Result<DynamicImage, BackendError> {
        if self.dimensions(surface) == target {
            return Ok(surface.clone());
        }
        Ok(surface.resize_exact(target.width, target.height, FilterType::Lanczos3))
    }

    fn encode(
        &self,
        surface: &DynamicImage,
        format: OutputFormat,
        compression: PngCompression,
    ) -> Result<Vec<u8>, BackendError> {
        match format {
            OutputFormat::Png => encode_png(surface, compression),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::{gradient_jpeg, gradient_png};

    #[test]
    fn decode_synthetic_jpeg() {
        let backend = RustBackend::new();
        let surface = backend.decode(&gradient_jpeg(200, 150)).unwrap();
        assert_eq!(
            backend.dimensions(&surface),
            Dimensions {
                width: 200,
                height: 150
            }
        );
    }

    #[test]
    fn decode_garbage_errors() {
        let backend = RustBackend::new();
        let result = backend.decode(b"definitely not an image");
        assert!(matches!(result, Err(BackendError::Decode(_))));
    }

    #[test]
    fn decode_empty_errors() {
        let backend = RustBackend::new();
        assert!(backend.decode(&[]).is_err());
    }

    #[test]
    fn render_exact_dimensions() {
        let backend = RustBackend::new();
        let surface = backend.decode(&gradient_jpeg(400, 300)).unwrap();
        let target = Dimensions {
            width: 123,
            height: 45,
        };
        let rendered = backend.render(&surface, target).unwrap();
        assert_eq!(backend.dimensions(&rendered), target);
    }

    #[test]
    fn encode_produces_png_signature() {
        let backend = RustBackend::new();
        let surface = backend.decode(&gradient_jpeg(64, 48)).unwrap();
        let bytes = backend
            .encode(&surface, OutputFormat::Png, PngCompression::Fast)
            .unwrap();
        assert!(bytes.starts_with(&[0x89, b'P', b'N', b'G', b'\r', b'\n', 0x1a, b'\n']));
    }

    #[test]
    fn encode_roundtrip_keeps_dimensions() {
        let backend = RustBackend::new();
        let surface = backend.decode(&gradient_png(90, 30)).unwrap();
        let bytes = backend
            .encode(&surface, OutputFormat::Png, PngCompression::Best)
            .unwrap();
        let again = backend.decode(&bytes).unwrap();
        assert_eq!(
            backend.dimensions(&again),
            Dimensions {
                width: 90,
                height: 30
            }
        );
    }

    #[test]
    fn float_surfaces_are_converted_for_png() {
        let backend = RustBackend::new();
        let img = DynamicImage::ImageRgb32F(image::Rgb32FImage::new(8, 8));
        let bytes = backend
            .encode(&img, OutputFormat::Png, PngCompression::Default)
            .unwrap();
        assert!(!bytes.is_empty());
    }
}
