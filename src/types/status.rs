//! Status documents returned by the upstream status service

use serde::{Deserialize, Serialize};

use super::TweetCard;

/// Author of a status
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Author {
    #[serde(default)]
    pub name: String,
    pub screen_name: String,
}

/// Kind of attached media
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    Photo,
    Video,
}

/// A photo or video attached to a status
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Media {
    #[serde(rename = "type")]
    pub kind: MediaKind,
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<u32>,
}

/// A social post as delivered by the upstream
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Status {
    pub id: String,
    #[serde(default)]
    pub text: String,
    pub author: Author,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub card: Option<TweetCard>,
    #[serde(default)]
    pub media: Vec<Media>,
}

impl Status {
    /// Media item by 1-based position
    pub fn media_at(&self, media_number: u32) -> Option<&Media> {
        let index = usize::try_from(media_number.checked_sub(1)?).ok()?;
        self.media.get(index)
    }

    /// `Name (@handle)` line used as the embed title
    pub fn display_author(&self) -> String {
        if self.author.name.is_empty() {
            format!("@{}", self.author.screen_name)
        } else {
            format!("{} (@{})", self.author.name, self.author.screen_name)
        }
    }
}
