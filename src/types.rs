//! Card data handed to the contact exporter.
//!
//! The field names follow the card API, so a card fetched from the backend
//! deserializes straight into a [`ContactRecord`]: `avatar_link`, `socials`
//! and `is_visible` are accepted as aliases, bookkeeping fields (`id`,
//! `created_at`, ...) are ignored, and missing strings default to empty.

use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// A card's contact data.
///
/// `name` must be non-empty. Every other string may be empty, in which case
/// the exporter omits it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContactRecord {
    pub name: String,
    pub title: String,
    pub description: String,
    /// Digits only, usually without the leading `+`.
    pub phone: String,
    pub email: String,
    pub website: String,
    pub city: String,
    #[serde(alias = "avatar_link", deserialize_with = "non_empty")]
    pub avatar_url: Option<String>,
    #[serde(alias = "socials")]
    pub social_links: Vec<SocialLink>,
}

/// One entry in the card's ordered list of social links.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SocialLink {
    #[serde(rename = "type")]
    pub kind: SocialKind,
    pub url: String,
    #[serde(default)]
    pub label: String,
    #[serde(alias = "is_visible", default = "visible_by_default")]
    pub visible: bool,
}

fn visible_by_default() -> bool {
    true
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SocialKind {
    Instagram,
    Telegram,
    Tiktok,
    Youtube,
    Custom,
}

impl SocialKind {
    pub fn as_str(self) -> &'static str {
        match self {
            SocialKind::Instagram => "instagram",
            SocialKind::Telegram => "telegram",
            SocialKind::Tiktok => "tiktok",
            SocialKind::Youtube => "youtube",
            SocialKind::Custom => "custom",
        }
    }
}

impl fmt::Display for SocialKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// `null` and `""` both mean "no avatar".
fn non_empty<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<String>::deserialize(deserializer)?;
    Ok(value.filter(|s| !s.is_empty()))
}
