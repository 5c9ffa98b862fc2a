//! Parameter types for image normalization.
//!
//! These values describe *what* to produce, not *how*. They are the interface
//! between the [`operations`](super::operations) module (which decides the
//! target dimensions and file name) and the [`backend`](super::backend) (which
//! does the pixel work).
//!
//! ## Types
//!
//! - [`ImageProfile`]: dimension bounds plus an advisory byte budget. Two fixed
//!   profiles exist: [`ImageProfile::AVATAR`] and [`ImageProfile::LOGO`].
//! - [`ProfileName`]: how callers pick one of the fixed profiles.
//! - [`OutputFormat`]: the encoded format of every normalized image (PNG).
//! - [`PngCompression`]: deflate effort for the PNG encoder.
//! - [`SizePolicy`]: whether `max_size_bytes` is advisory or enforced.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Size bounds applied during normalization.
///
/// `max_size_bytes` is a target, not an invariant: under
/// [`SizePolicy::Advisory`] only dimension scaling affects the output size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImageProfile {
    pub max_width: u32,
    pub max_height: u32,
    pub max_size_bytes: u64,
}

impl ImageProfile {
    /// Card avatar: 720×720, ≤ 500 KiB.
    pub const AVATAR: ImageProfile = ImageProfile {
        max_width: 720,
        max_height: 720,
        max_size_bytes: 512_000,
    };

    /// Social link icon: 300×300, ≤ 200 KiB.
    pub const LOGO: ImageProfile = ImageProfile {
        max_width: 300,
        max_height: 300,
        max_size_bytes: 204_800,
    };
}

/// The named profiles callers may select.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ProfileName {
    Avatar,
    Logo,
}

impl ProfileName {
    pub fn profile(self) -> ImageProfile {
        match self {
            ProfileName::Avatar => ImageProfile::AVATAR,
            ProfileName::Logo => ImageProfile::LOGO,
        }
    }
}

impl fmt::Display for ProfileName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProfileName::Avatar => f.write_str("avatar"),
            ProfileName::Logo => f.write_str("logo"),
        }
    }
}

/// Encoded output format. The card backend only accepts PNG.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Png,
}

impl OutputFormat {
    pub fn media_type(self) -> &'static str {
        match self {
            OutputFormat::Png => "image/png",
        }
    }

    pub fn extension(self) -> &'static str {
        match self {
            OutputFormat::Png => "png",
        }
    }
}

/// Deflate effort used by the PNG encoder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PngCompression {
    Fast,
    #[default]
    Default,
    Best,
}

/// What happens when an encoded image is larger than the profile's byte budget.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SizePolicy {
    /// Keep the first encode regardless of size.
    #[default]
    Advisory,
    /// Re-render smaller until under budget, or fail with `OverBudget`.
    Enforce,
}

/// Everything the pipeline needs besides the input and the profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EncodeOptions {
    pub format: OutputFormat,
    pub compression: PngCompression,
    pub size_policy: SizePolicy,
    pub max_shrink_attempts: u32,
}

impl Default for EncodeOptions {
    fn default() -> Self {
        Self {
            format: OutputFormat::Png,
            compression: PngCompression::Default,
            size_policy: SizePolicy::Advisory,
            max_shrink_attempts: 6,
        }
    }
}
