//! # bizcard
//!
//! The data-transformation core of a digital business-card editor. Card owners
//! upload an avatar and social-link icons, and visitors save the card to
//! their address book. Both paths produce an artifact consumed outside the
//! system, so both are pure, deterministic and tested byte for byte.
//!
//! # Two Independent Components
//!
//! ```text
//! Asset Normalizer   RawImage + ImageProfile  →  NormalizedImage (PNG)  →  upload form
//! Contact Exporter   ContactRecord            →  vCard 3.0 text         →  .vcf download
//! ```
//!
//! Neither depends on the other and neither holds state between calls.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`imaging`] | Decode, fit to profile, Lanczos3 render, PNG encode |
//! | [`naming`] | Output file names for normalized images and `.vcf` files |
//! | [`types`] | `ContactRecord` and social links, deserializable from the card API |
//! | [`vcard`] | vCard 3.0 serializer and text escaping |
//! | [`delivery`] | "Save as" capability and the filesystem adapter |
//! | [`upload`] | Multipart form layout for the asset endpoints |
//! | [`config`] | `bizcard.toml` loading, validation and the stock file |
//! | [`output`] | CLI output formatting |
//!
//! # Design Decisions
//!
//! ## PNG-Only Output
//!
//! The card backend accepts exactly one image format, so normalization is
//! format conversion as much as downscaling: a JPEG, WebP or GIF in always
//! yields a PNG out, named `<base>.png`.
//!
//! ## Shrink, Never Enlarge
//!
//! Images inside the profile bounds are re-encoded at their own size. Larger
//! images are scaled by a single factor so the aspect ratio survives, and
//! resampled with Lanczos3; icons at 300×300 are where nearest-neighbor
//! artifacts would show first.
//!
//! ## Advisory Byte Budget
//!
//! Profiles carry a byte budget (500 KiB avatar, 200 KiB logo) that, by
//! default, is not enforced: only dimension scaling affects size. Setting
//! `size_policy = "enforce"` opts into re-rendering at smaller dimensions
//! until the PNG fits.
//!
//! ## Capabilities Behind Traits
//!
//! Pixel work ([`imaging::ImageBackend`]) and file delivery
//! ([`delivery::SaveTarget`]) are injected, so the pipeline and the exporter
//! are tested without real images or a real filesystem.

pub mod config;
pub mod delivery;
pub mod imaging;
pub mod naming;
pub mod output;
pub mod types;
pub mod upload;
pub mod vcard;

#[cfg(test)]
pub(crate) mod test_helpers;
