//! Crawler-facing status page
//!
//! Builds the HTML document whose `<head>` carries the Open Graph and
//! Twitter meta tags link-preview clients read.

use maud::{DOCTYPE, PreEscaped, html};
use tracing::warn;

use super::{RenderedCard, render_tweet_card};
use crate::config::settings::LinkSettings;
use crate::error::format_error;
use crate::types::{Media, MediaKind, Status};

const THEME_COLOR: &str = "#00a8fc";

fn meta_property(property: &str, content: &str) -> String {
    html! { meta property=(property) content=(content); }.into_string()
}

fn meta_name(name: &str, content: &str) -> String {
    html! { meta name=(name) content=(content); }.into_string()
}

fn media_tags(media: &Media, headers: &mut Vec<String>) {
    let dimensions = media.width.zip(media.height);
    match media.kind {
        MediaKind::Photo => {
            headers.push(meta_property("og:image", &media.url));
            headers.push(meta_name("twitter:image", &media.url));
            if let Some((width, height)) = dimensions {
                headers.push(meta_property("og:image:width", &width.to_string()));
                headers.push(meta_property("og:image:height", &height.to_string()));
            }
        }
        MediaKind::Video => {
            headers.push(meta_property("og:type", "video.other"));
            headers.push(meta_property("og:video", &media.url));
            headers.push(meta_property("og:video:secure_url", &media.url));
            headers.push(meta_property("og:video:type", "video/mp4"));
            headers.push(meta_name("twitter:player:stream", &media.url));
            if let Some((width, height)) = dimensions {
                headers.push(meta_property("og:video:width", &width.to_string()));
                headers.push(meta_property("og:video:height", &height.to_string()));
            }
        }
    }
}

/// oEmbed discovery URL for a status
pub fn oembed_url(status: &Status, links: &LinkSettings) -> String {
    format!(
        "{}/owoembed?text={}&author={}&status={}",
        links.public_url.trim_end_matches('/'),
        urlencoding::encode(&status.display_author()),
        urlencoding::encode(&status.author.screen_name),
        urlencoding::encode(&status.id)
    )
}

/// Address of the status on the original site
pub fn canonical_url(status: &Status, links: &LinkSettings) -> String {
    format!(
        "{}/{}/status/{}",
        links.twitter_root,
        urlencoding::encode(&status.author.screen_name),
        urlencoding::encode(&status.id)
    )
}

/// Render the full HTML document for a status.
///
/// A card that fails to classify is logged and left out; the rest of the
/// page still renders. Browsers that receive the page (a cached crawler
/// response, say) are sent on to the original post by a meta refresh.
pub fn render_status_page(
    status: &Status,
    media_number: u32,
    user_agent: &str,
    links: &LinkSettings,
) -> String {
    let mut headers = vec![
        meta_name("theme-color", THEME_COLOR),
        meta_property("og:site_name", &links.provider_name),
    ];
    let mut description = status.text.clone();
    let mut twitter_card = "tweet";

    if let Some(card) = &status.card {
        match render_tweet_card(card, &mut headers, user_agent) {
            Ok(RenderedCard::Html(text)) => description.push_str(&text),
            Ok(RenderedCard::Embedded) => twitter_card = "player",
            Err(e) => warn!(
                "Dropping card of status {}: {}",
                status.id,
                format_error(&e)
            ),
        }
    }

    if let Some(media) = status.media_at(media_number) {
        media_tags(media, &mut headers);
        if twitter_card == "tweet" {
            twitter_card = match media.kind {
                MediaKind::Photo => "summary_large_image",
                MediaKind::Video => "player",
            };
        }
    }

    let title = status.display_author();
    headers.push(meta_name("twitter:card", twitter_card));
    headers.push(meta_property("og:title", &title));
    headers.push(meta_name("twitter:title", &title));
    headers.push(meta_property("og:description", &description));
    headers.push(meta_name("twitter:description", &description));
    headers.push(
        html! {
            link rel="alternate" href=(oembed_url(status, links)) type="application/json+oembed" title=(title);
        }
        .into_string(),
    );

    let canonical = canonical_url(status, links);
    html! {
        (DOCTYPE)
        html {
            head {
                meta charset="utf-8";
                link rel="canonical" href=(canonical);
                meta http-equiv="refresh" content=(format!("0;url={canonical}"));
                @for tag in &headers {
                    (PreEscaped(tag))
                }
            }
            body {}
        }
    }
    .into_string()
}
