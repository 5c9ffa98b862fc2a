//! File-name derivation for everything the crate hands to an external consumer.
//!
//! Two conventions live here:
//!
//! - **Normalized images**: the input's base name with the output extension
//!   substituted, e.g. `IMG_2041.HEIC.jpg` → `IMG_2041.HEIC.png`. Inputs with
//!   no usable base name become `image.png`.
//! - **Contact files**: the card's name with every character outside ASCII
//!   letters/digits and Cyrillic letters replaced by `_`, plus `.vcf`, e.g.
//!   `Анна Smith-Jones` → `Анна_Smith_Jones.vcf`.
//!
//! Several inputs of one run can map to the same image name (`a/me.jpg`,
//! `b/me.jpg`); [`unique_name`] numbers the repeats.

use std::collections::HashSet;

/// Base name used when an input file has no usable name.
pub const DEFAULT_IMAGE_BASE: &str = "image";

/// Strip the final `.ext` from a file name.
///
/// Only a non-empty extension counts: `"photo."` is returned unchanged,
/// `".png"` strips to `""`.
pub fn strip_extension(name: &str) -> &str {
    match name.rfind('.') {
        Some(dot) if dot + 1 < name.len() => &name[..dot],
        _ => name,
    }
}

/// Derive the file name of a normalized image.
///
/// Directory components of `input` are ignored.
pub fn normalized_image_name(input: Option<&str>, extension: &str) -> String {
    let file_name = input
        .map(|n| n.rsplit(|c: char| c == '/' || c == '\\').next().unwrap_or(n))
        .unwrap_or("");
    let base = strip_extension(file_name);
    let base = if base.is_empty() {
        DEFAULT_IMAGE_BASE
    } else {
        base
    };
    format!("{}.{}", base, extension)
}

/// Take `name` if no earlier file of the run did, else `<base>-<n>.<ext>`
/// with the smallest free `n`. The returned name is recorded in `taken`.
pub fn unique_name(name: &str, taken: &mut HashSet<String>) -> String {
    if taken.insert(name.to_string()) {
        return name.to_string();
    }
    let base = strip_extension(name);
    let ext = &name[base.len()..];
    let mut n = 1;
    loop {
        let candidate = format!("{}-{}{}", base, n, ext);
        if taken.insert(candidate.clone()) {
            return candidate;
        }
        n += 1;
    }
}

// Any letter of the Cyrillic block, not only the Russian alphabet.
fn is_cyrillic_letter(c: char) -> bool {
    matches!(c, '\u{0400}'..='\u{04FF}') && c.is_alphabetic()
}

/// Derive the download name of a contact card.
pub fn contact_file_name(name: &str) -> String {
    let mut out: String = name
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || is_cyrillic_letter(c) {
                c
            } else {
                '_'
            }
        })
        .collect();
    out.push_str(".vcf");
    out
}
