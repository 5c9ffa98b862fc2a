//! Multipart payloads for the card asset endpoints.
//!
//! An [`UploadForm`] lists the form parts in the order the backend expects
//! them. It carries per-part file names and media types but never a
//! request-level `Content-Type`: the HTTP client generates the multipart
//! boundary and the header that names it.

use crate::imaging::NormalizedImage;

pub const AVATAR_ENDPOINT: &str = "/assets/avatar/";
pub const LOGO_ENDPOINT: &str = "/assets/logo/";

/// Name of the form field carrying the image.
pub const FILE_FIELD: &str = "file";

#[derive(Debug, Clone, PartialEq)]
pub enum FormPart {
    Text {
        name: String,
        value: String,
    },
    File {
        name: String,
        file_name: String,
        media_type: String,
        bytes: Vec<u8>,
    },
}

impl FormPart {
    pub fn name(&self) -> &str {
        match self {
            FormPart::Text { name, .. } | FormPart::File { name, .. } => name,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct UploadForm {
    pub endpoint: &'static str,
    pub parts: Vec<FormPart>,
}

fn file_part(image: NormalizedImage) -> FormPart {
    FormPart::File {
        name: FILE_FIELD.to_string(),
        file_name: image.file_name,
        media_type: image.media_type.to_string(),
        bytes: image.bytes,
    }
}

impl UploadForm {
    /// The card's avatar: a single file field.
    pub fn avatar(image: NormalizedImage) -> Self {
        Self {
            endpoint: AVATAR_ENDPOINT,
            parts: vec![file_part(image)],
        }
    }

    /// A social link's icon: `social_id` first, then the file.
    pub fn logo(social_id: u64, image: NormalizedImage) -> Self {
        Self {
            endpoint: LOGO_ENDPOINT,
            parts: vec![
                FormPart::Text {
                    name: "social_id".to_string(),
                    value: social_id.to_string(),
                },
                file_part(image),
            ],
        }
    }
}
