//! Pure calculation functions for image dimensions.
//!
//! All functions here are pure and testable without any I/O or images.

use super::backend::Dimensions;
use super::params::ImageProfile;

/// Calculate the dimensions an image must be rendered at to fit a profile.
///
/// Images already inside the bounds keep their size (never upscaled).
/// Larger images are scaled by `min(max_w / w, max_h / h)`, rounded, with
/// each side at least 1.
///
/// # Examples
/// ```
/// # use bizcard::imaging::{Dimensions, ImageProfile, fit_within};
/// // 1440×960 into 720×720 → 720×480
/// let d = fit_within(Dimensions { width: 1440, height: 960 }, &ImageProfile::AVATAR);
/// assert_eq!((d.width, d.height), (720, 480));
/// ```
pub fn fit_within(source: Dimensions, profile: &ImageProfile) -> Dimensions {
    let Dimensions { width, height } = source;
    if width <= profile.max_width && height <= profile.max_height {
        return source;
    }

    let ratio = f64::min(
        profile.max_width as f64 / width as f64,
        profile.max_height as f64 / height as f64,
    );
    scale(source, ratio)
}

/// Scale both sides by `ratio`, rounding to the nearest pixel (min 1).
pub fn scale(source: Dimensions, ratio: f64) -> Dimensions {
    Dimensions {
        width: ((source.width as f64 * ratio).round() as u32).max(1),
        height: ((source.height as f64 * ratio).round() as u32).max(1),
    }
}

/// Ratio for the next shrink attempt when an encode came out over budget.
///
/// Encoded size tracks pixel area, so the side ratio is the square root of the
/// byte ratio, with a 10% margin so the next attempt usually lands under.
pub fn shrink_ratio(encoded_size: u64, budget: u64) -> f64 {
    if encoded_size == 0 {
        return 1.0;
    }
    ((budget as f64 / encoded_size as f64).sqrt() * 0.9).min(0.9)
}
