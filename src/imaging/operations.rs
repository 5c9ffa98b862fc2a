//! High-level normalization.
//!
//! [`normalize_bytes`] combines the dimension math with backend execution:
//! decode, fit to the profile, render, encode, name. [`normalize`] is the
//! async entry point: it reads the input, then runs the CPU-bound stages on
//! tokio's blocking pool so the caller's task is never stalled by a decode.
//!
//! ```text
//! read ──► decode ──► fit_within ──► render ──► encode ──► NormalizedImage
//!  │         │                                    │
//! Read     Decode                              Encode / OverBudget
//! ```

use super::backend::{BackendError, Dimensions, ImageBackend};
use super::calculations::{fit_within, scale, shrink_ratio};
use super::params::{EncodeOptions, ImageProfile, SizePolicy};
use crate::naming::normalized_image_name;
use log::{debug, trace};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::SystemTime;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum NormalizeError {
    #[error("Failed to read image: {0}")]
    Read(#[from] std::io::Error),
    #[error("Not a loadable image: {0}")]
    Decode(String),
    #[error("Image encoding failed: {0}")]
    Encode(String),
    #[error("Encoded image is {size} bytes, budget is {budget}")]
    OverBudget { size: u64, budget: u64 },
    #[error("Normalization task failed: {0}")]
    Worker(String),
}

impl From<BackendError> for NormalizeError {
    fn from(e: BackendError) -> Self {
        match e {
            BackendError::Decode(msg) => NormalizeError::Decode(msg),
            BackendError::Encode(msg) => NormalizeError::Encode(msg),
        }
    }
}

/// Result type for image operations.
pub type Result<T> = std::result::Result<T, NormalizeError>;

/// Where the bytes of a [`RawImage`] come from.
#[derive(Debug, Clone)]
pub enum ImageSource {
    Bytes(Vec<u8>),
    File(PathBuf),
}

/// A user-selected image, before normalization.
#[derive(Debug, Clone)]
pub struct RawImage {
    /// Suggested file name, e.g. `IMG_2041.jpg`.
    pub name: Option<String>,
    /// Declared media type. Informational; decoding sniffs the content.
    pub media_type: Option<String>,
    pub source: ImageSource,
}

impl RawImage {
    pub fn from_bytes(bytes: Vec<u8>, name: Option<String>, media_type: Option<String>) -> Self {
        Self {
            name,
            media_type,
            source: ImageSource::Bytes(bytes),
        }
    }

    /// Image backed by a file; name and media type come from the path.
    pub fn from_path(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        let name = path
            .file_name()
            .and_then(|n| n.to_str())
            .map(str::to_string);
        let media_type = path
            .extension()
            .and_then(|e| e.to_str())
            .and_then(|e| image::ImageFormat::from_extension(e))
            .map(|f| f.to_mime_type().to_string());
        Self {
            name,
            media_type,
            source: ImageSource::File(path.to_path_buf()),
        }
    }

    /// Load the bytes into memory.
    pub async fn read(self) -> Result<(Vec<u8>, Option<String>)> {
        let bytes = match self.source {
            ImageSource::Bytes(bytes) => bytes,
            ImageSource::File(path) => tokio::fs::read(&path).await?,
        };
        Ok((bytes, self.name))
    }
}

/// A normalized image, ready to be attached to a multipart upload.
#[derive(Debug, Clone)]
pub struct NormalizedImage {
    pub bytes: Vec<u8>,
    pub file_name: String,
    pub media_type: &'static str,
    pub dimensions: Dimensions,
    pub last_modified: SystemTime,
}

impl NormalizedImage {
    pub fn size(&self) -> u64 {
        self.bytes.len() as u64
    }
}

fn encode_checked<B: ImageBackend>(
    backend: &B,
    surface: &B::Surface,
    options: &EncodeOptions,
) -> Result<Vec<u8>> {
    let bytes = backend.encode(surface, options.format, options.compression)?;
    if bytes.is_empty() {
        return Err(NormalizeError::Encode("encoder produced no output".into()));
    }
    Ok(bytes)
}

/// Normalize in-memory image bytes against a profile.
///
/// Never upscales. Under [`SizePolicy::Enforce`], an encode over the
/// profile's byte budget is retried at smaller dimensions, always rendering
/// from the decoded source.
pub fn normalize_bytes<B: ImageBackend>(
    backend: &B,
    bytes: &[u8],
    name: Option<&str>,
    profile: &ImageProfile,
    options: &EncodeOptions,
) -> Result<NormalizedImage> {
    trace!("decoding {} bytes", bytes.len());
    let source = backend.decode(bytes)?;
    let original = backend.dimensions(&source);

    let mut target = fit_within(original, profile);
    trace!(
        "rendering {}x{} at {}x{}",
        original.width, original.height, target.width, target.height
    );
    let mut encoded = {
        let rendered = backend.render(&source, target)?;
        encode_checked(backend, &rendered, options)?
    };

    if options.size_policy == SizePolicy::Enforce {
        let budget = profile.max_size_bytes;
        let mut attempts = 0;
        while encoded.len() as u64 > budget {
            let at_floor = target.width == 1 && target.height == 1;
            if attempts >= options.max_shrink_attempts || at_floor {
                return Err(NormalizeError::OverBudget {
                    size: encoded.len() as u64,
                    budget,
                });
            }
            attempts += 1;
            target = scale(target, shrink_ratio(encoded.len() as u64, budget));
            debug!(
                "{} bytes over {} budget, retrying at {}x{}",
                encoded.len(),
                budget,
                target.width,
                target.height
            );
            let rendered = backend.render(&source, target)?;
            encoded = encode_checked(backend, &rendered, options)?;
        }
    }

    let file_name = normalized_image_name(name, options.format.extension());
    debug!(
        "{}: {:.1}KB -> {:.1}KB ({}x{})",
        file_name,
        bytes.len() as f64 / 1024.0,
        encoded.len() as f64 / 1024.0,
        target.width,
        target.height
    );

    Ok(NormalizedImage {
        bytes: encoded,
        file_name,
        media_type: options.format.media_type(),
        dimensions: target,
        last_modified: SystemTime::now(),
    })
}

/// Read, decode, fit, render and encode one image.
///
/// Resolves once with the finished image or the first error; intermediate
/// surfaces are dropped before the future completes.
pub async fn normalize<B>(
    backend: Arc<B>,
    input: RawImage,
    profile: ImageProfile,
    options: EncodeOptions,
) -> Result<NormalizedImage>
where
    B: ImageBackend + 'static,
{
    let (bytes, name) = input.read().await?;
    tokio::task::spawn_blocking(move || {
        normalize_bytes(backend.as_ref(), &bytes, name.as_deref(), &profile, &options)
    })
    .await
    .map_err(|e| NormalizeError::Worker(e.to_string()))?
}
