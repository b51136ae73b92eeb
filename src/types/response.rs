//! Response type definitions

use serde::{Deserialize, Serialize};

/// oEmbed provider document served at `/owoembed`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OEmbedResponse {
    pub author_name: String,
    pub author_url: String,
    pub provider_name: String,
    pub provider_url: String,
    pub title: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub version: String,
}

impl OEmbedResponse {
    /// A `link`-type oEmbed document, version 1.0
    pub fn link(
        author_name: impl Into<String>,
        author_url: impl Into<String>,
        provider_name: impl Into<String>,
        provider_url: impl Into<String>,
        title: impl Into<String>,
    ) -> Self {
        Self {
            author_name: author_name.into(),
            author_url: author_url.into(),
            provider_name: provider_name.into(),
            provider_url: provider_url.into(),
            title: title.into(),
            kind: "link".to_string(),
            version: "1.0".to_string(),
        }
    }
}
