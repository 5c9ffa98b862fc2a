//! Shared test utilities for the bizcard test suite.
//!
//! Synthetic images are generated in memory so tests never depend on
//! fixture files, and sample records cover every vCard property.

use crate::types::{ContactRecord, SocialKind, SocialLink};
use image::{ExtendedColorType, ImageEncoder, RgbImage};

// =========================================================================
// Synthetic images
// =========================================================================

fn gradient(width: u32, height: u32) -> RgbImage {
    RgbImage::from_fn(width, height, |x, y| {
        image::Rgb([(x % 256) as u8, (y % 256) as u8, 128])
    })
}

/// A valid JPEG of the given size.
pub fn gradient_jpeg(width: u32, height: u32) -> Vec<u8> {
    let img = gradient(width, height);
    let mut buf = Vec::new();
    image::codecs::jpeg::JpegEncoder::new(&mut buf)
        .write_image(img.as_raw(), width, height, ExtendedColorType::Rgb8)
        .unwrap();
    buf
}

/// A valid PNG of the given size.
pub fn gradient_png(width: u32, height: u32) -> Vec<u8> {
    let img = gradient(width, height);
    let mut buf = Vec::new();
    image::codecs::png::PngEncoder::new(&mut buf)
        .write_image(img.as_raw(), width, height, ExtendedColorType::Rgb8)
        .unwrap();
    buf
}

// =========================================================================
// Contact records
// =========================================================================

/// A record with only a name set.
pub fn record_named(name: &str) -> ContactRecord {
    ContactRecord {
        name: name.to_string(),
        ..ContactRecord::default()
    }
}

/// A record with every field populated, including characters that need
/// escaping and one hidden social link.
pub fn full_record() -> ContactRecord {
    ContactRecord {
        name: "Jane Q. Doe".to_string(),
        title: "CTO, Acme".to_string(),
        description: "Builds things\nand breaks them; sometimes".to_string(),
        phone: "14155551234".to_string(),
        email: "jane@x.com".to_string(),
        website: "https://jane.example/?a=1,b=2".to_string(),
        city: "San Francisco, CA".to_string(),
        avatar_url: Some("https://cdn.example/jane.png".to_string()),
        social_links: vec![
            SocialLink {
                kind: SocialKind::Instagram,
                url: "https://instagram.com/jane".to_string(),
                label: "Instagram".to_string(),
                visible: true,
            },
            SocialLink {
                kind: SocialKind::Telegram,
                url: "https://t.me/jane".to_string(),
                label: "Telegram".to_string(),
                visible: false,
            },
            SocialLink {
                kind: SocialKind::Custom,
                url: "https://jane.blog".to_string(),
                label: "Blog".to_string(),
                visible: true,
            },
        ],
    }
}
