//! CLI output formatting.
//!
//! Each command has a `format_*` function (returns `Vec<String>`) for
//! testability and a `print_*` wrapper that writes to stdout.
//!
//! ```text
//! Normalized (avatar, 720x720 max)
//!     portrait.png  720x480  2048.0KB → 311.4KB
//!     logo.png      FAILED: Not a loadable image: ...
//!
//! Exported
//!     Jane_Doe.vcf  9 lines → out/Jane_Doe.vcf
//! ```

use crate::delivery::DeliveryError;
use crate::imaging::{ImageProfile, NormalizeError, NormalizedImage, ProfileName};
use std::path::Path;
use thiserror::Error;

fn kb(bytes: u64) -> String {
    format!("{:.1}KB", bytes as f64 / 1024.0)
}

/// Why one input of a `normalize` run produced no file.
#[derive(Error, Debug)]
pub enum ReportError {
    #[error(transparent)]
    Normalize(#[from] NormalizeError),
    #[error("Failed to save: {0}")]
    Save(#[from] DeliveryError),
}

/// Outcome of one input in a `normalize` run.
pub struct NormalizeReport {
    pub input: String,
    pub input_size: Option<u64>,
    pub result: Result<NormalizedImage, ReportError>,
}

pub fn format_normalize_output(profile: ProfileName, reports: &[NormalizeReport]) -> Vec<String> {
    let ImageProfile {
        max_width,
        max_height,
        ..
    } = profile.profile();
    let mut lines = vec![format!(
        "Normalized ({}, {}x{} max)",
        profile, max_width, max_height
    )];

    let width = reports
        .iter()
        .map(|r| match &r.result {
            Ok(img) => img.file_name.chars().count(),
            Err(_) => r.input.chars().count(),
        })
        .max()
        .unwrap_or(0);

    for report in reports {
        match &report.result {
            Ok(img) => {
                let sizes = match report.input_size {
                    Some(input) => format!("{} → {}", kb(input), kb(img.size())),
                    None => kb(img.size()),
                };
                lines.push(format!(
                    "    {:<width$}  {}x{}  {}",
                    img.file_name, img.dimensions.width, img.dimensions.height, sizes
                ));
            }
            Err(e) => lines.push(format!("    {:<width$}  FAILED: {}", report.input, e)),
        }
    }
    lines
}

pub fn print_normalize_output(profile: ProfileName, reports: &[NormalizeReport]) {
    for line in format_normalize_output(profile, reports) {
        println!("{}", line);
    }
}

pub fn format_export_output(file_name: &str, line_count: usize, dest: &Path) -> Vec<String> {
    vec![
        "Exported".to_string(),
        format!("    {}  {} lines → {}", file_name, line_count, dest.display()),
    ]
}

pub fn print_export_output(file_name: &str, line_count: usize, dest: &Path) {
    for line in format_export_output(file_name, line_count, dest) {
        println!("{}", line);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::imaging::Dimensions;
    use std::time::SystemTime;

    fn ok_report(input: &str, name: &str, size: usize) -> NormalizeReport {
        NormalizeReport {
            input: input.to_string(),
            input_size: Some(2048 * 1024),
            result: Ok(NormalizedImage {
                bytes: vec![0; size],
                file_name: name.to_string(),
                media_type: "image/png",
                dimensions: Dimensions {
                    width: 720,
                    height: 480,
                },
                last_modified: SystemTime::now(),
            }),
        }
    }

    #[test]
    fn header_names_profile_bounds() {
        let lines = format_normalize_output(ProfileName::Logo, &[]);
        assert_eq!(lines, vec!["Normalized (logo, 300x300 max)"]);
    }

    #[test]
    fn success_line_shows_dimensions_and_sizes() {
        let lines =
            format_normalize_output(ProfileName::Avatar, &[ok_report("me.jpg", "me.png", 1024)]);
        assert_eq!(lines[1], "    me.png  720x480  2048.0KB → 1.0KB");
    }

    #[test]
    fn failure_line_shows_error() {
        let reports = vec![
            ok_report("portrait.jpg", "portrait.png", 512),
            NormalizeReport {
                input: "x.txt".to_string(),
                input_size: None,
                result: Err(NormalizeError::Decode("bad magic".into()).into()),
            },
        ];
        let lines = format_normalize_output(ProfileName::Avatar, &reports);
        assert_eq!(lines.len(), 3);
        assert_eq!(
            lines[2],
            "    x.txt         FAILED: Not a loadable image: bad magic"
        );
    }

    #[test]
    fn save_failure_line() {
        let reports = vec![NormalizeReport {
            input: "a.jpg".to_string(),
            input_size: None,
            result: Err(DeliveryError::Persist {
                name: "a.png".into(),
                reason: "Is a directory".into(),
            }
            .into()),
        }];
        let lines = format_normalize_output(ProfileName::Logo, &reports);
        assert_eq!(
            lines[1],
            "    a.jpg  FAILED: Failed to save: Failed to persist a.png: Is a directory"
        );
    }

    #[test]
    fn export_lines() {
        let lines = format_export_output("Jane_Doe.vcf", 9, Path::new("out/Jane_Doe.vcf"));
        assert_eq!(lines[1], "    Jane_Doe.vcf  9 lines → out/Jane_Doe.vcf");
    }
}
