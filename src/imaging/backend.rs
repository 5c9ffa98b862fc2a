//! Image processing backend trait and shared types.
//!
//! The [`ImageBackend`] trait is the capability the normalizer needs from its
//! host: decode bytes into a pixel surface, render a surface at new
//! dimensions, and encode a surface. Keeping it behind a trait lets the
//! pipeline logic in [`operations`](super::operations) run against a mock.
//!
//! The production implementation is
//! [`RustBackend`](super::rust_backend::RustBackend), built on the `image`
//! crate.

use super::params::{OutputFormat, PngCompression};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BackendError {
    #[error("Decode failed: {0}")]
    Decode(String),
    #[error("Encode failed: {0}")]
    Encode(String),
}

/// Pixel dimensions of a surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dimensions {
    pub width: u32,
    pub height: u32,
}

/// Trait for image processing backends.
///
/// A `Surface` is owned by a single call: backends must not share mutable
/// state between surfaces, so independent normalizations can run at once.
pub trait ImageBackend: Send + Sync {
    type Surface: Send;

    /// Decode encoded image bytes into a pixel surface.
    fn decode(&self, bytes: &[u8]) -> Result<Self::Surface, BackendError>;

    /// Intrinsic size of a decoded surface.
    fn dimensions(&self, surface: &Self::Surface) -> Dimensions;

    /// Render `surface` onto a new surface of `target` size with
    /// high-quality resampling.
    fn render(&self, surface: &Self::Surface, target: Dimensions)
    -> Result<Self::Surface, BackendError>;

    /// Encode a surface to bytes in the given format.
    fn encode(
        &self,
        surface: &Self::Surface,
        format: OutputFormat,
        compression: PngCompression,
    ) -> Result<Vec<u8>, BackendError>;
}
