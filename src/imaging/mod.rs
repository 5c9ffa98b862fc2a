//! Image normalization in pure Rust, no system libraries.
//!
//! | Operation | Crate / function |
//! |---|---|
//! | **Decode** | `image::ImageReader` (format sniffed from content) |
//! | **Fit** | [`fit_within`]: shrink-only scale to the profile bounds |
//! | **Render** | Lanczos3 resampling |
//! | **Encode** | PNG, always |
//!
//! The module is split into:
//! - **Calculations**: Pure functions for dimension math (unit testable)
//! - **Parameters**: Profiles and encode options
//! - **Backend**: [`ImageBackend`] trait + [`RustBackend`]
//! - **Operations**: The normalization pipeline combining calculations + backend

pub mod backend;
mod calculations;
pub mod operations;
mod params;
pub mod rust_backend;

pub use backend::{BackendError, Dimensions, ImageBackend};
pub use calculations::fit_within;
pub use operations::{
    ImageSource, NormalizeError, NormalizedImage, RawImage, normalize, normalize_bytes,
};
pub use params::{
    EncodeOptions, ImageProfile, OutputFormat, PngCompression, ProfileName, SizePolicy,
};
pub use rust_backend::RustBackend;
