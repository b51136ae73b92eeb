//! Card rendering
//!
//! Polls become a plain-text bar chart; players are expressed entirely as
//! meta tags pushed onto the caller's head collection.

use chrono::{DateTime, Utc};
use maud::{Markup, html};

use super::time::{FINAL_RESULTS, TimeRemaining};
use crate::classify::ClientFamily;
use crate::types::{Card, Player, Poll, PollEnd, TweetCard};

/// Bar width used for most clients
pub const DEFAULT_BAR_WIDTH: usize = 36;

/// Bar width for clients that render narrow chat bubbles
pub const NARROW_BAR_WIDTH: usize = 24;

const BAR_CHAR: char = '█';

/// Per-render configuration, derived from the requesting client
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderConfig {
    pub bar_width: usize,
    pub now: DateTime<Utc>,
}

impl RenderConfig {
    pub fn for_user_agent(user_agent: &str) -> Self {
        Self::for_family(ClientFamily::from_user_agent(user_agent))
    }

    pub fn for_family(family: ClientFamily) -> Self {
        let bar_width = match family {
            ClientFamily::Telegram => NARROW_BAR_WIDTH,
            ClientFamily::Discord | ClientFamily::Other => DEFAULT_BAR_WIDTH,
        };
        Self {
            bar_width,
            now: Utc::now(),
        }
    }

    /// Pin the clock used for poll countdowns
    pub fn at(mut self, now: DateTime<Utc>) -> Self {
        self.now = now;
        self
    }
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self::for_family(ClientFamily::Other)
    }
}

/// Result of rendering a card
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenderedCard {
    /// Text to splice into the status description
    Html(String),
    /// The card is fully expressed by meta tags already pushed to the head
    Embedded,
}

impl RenderedCard {
    /// Body text, if the card produced any
    pub fn text(&self) -> Option<&str> {
        match self {
            RenderedCard::Html(text) => Some(text.as_str()),
            RenderedCard::Embedded => None,
        }
    }
}

/// Render a classified card.
///
/// Player cards push eight meta tags onto `headers` and return
/// [`RenderedCard::Embedded`]. Everything else returns text that starts with
/// two newlines; an unknown card renders nothing beyond them.
pub fn render_card(card: &Card, headers: &mut Vec<String>, config: &RenderConfig) -> RenderedCard {
    match card {
        Card::Poll(poll) => RenderedCard::Html(render_poll(poll, config)),
        Card::Player(player) => {
            headers.extend(player_meta_tags(player));
            RenderedCard::Embedded
        }
        Card::Unknown => RenderedCard::Html("\n\n".to_string()),
    }
}

/// Classify a raw card and render it for the given client.
pub fn render_tweet_card(
    card: &TweetCard,
    headers: &mut Vec<String>,
    user_agent: &str,
) -> crate::Result<RenderedCard> {
    tracing::debug!("Rendering card for user agent {:?}", user_agent);
    let card = Card::try_from(card)?;
    Ok(render_card(
        &card,
        headers,
        &RenderConfig::for_user_agent(user_agent),
    ))
}

/// Fraction of `total`, treating an empty poll as zero.
fn share(votes: u64, total: u64) -> f64 {
    if total == 0 {
        0.0
    } else {
        votes as f64 / total as f64
    }
}

fn render_poll(poll: &Poll, config: &RenderConfig) -> String {
    let total = poll.total_votes();
    let mut out = String::from("\n\n");

    for choice in &poll.choices {
        let ratio = share(choice.votes, total);
        let bar_len = (ratio * config.bar_width as f64).round() as usize;
        let percent = (ratio * 100.0).round() as u64;

        out.extend(std::iter::repeat_n(BAR_CHAR, bar_len));
        out.push('\n');
        out.push_str(&format!("{}  ({}%)\n", choice.label, percent));
    }

    let time_left = match poll.ends_at {
        Some(PollEnd::At(ends_at)) => TimeRemaining::between(ends_at, config.now).label(),
        Some(PollEnd::Unreadable) => FINAL_RESULTS.to_string(),
        None => String::new(),
    };
    out.push_str(&format!("\n{} votes · {}", total, time_left));
    out
}

fn player_meta_tags(player: &Player) -> [String; 8] {
    let Player { url, width, height } = player;
    [
        html! { meta name="twitter:player" content=(url); },
        html! { meta name="twitter:player:width" content=(width); },
        html! { meta name="twitter:player:height" content=(height); },
        html! { meta property="og:type" content="video.other"; },
        html! { meta property="og:video:url" content=(url); },
        html! { meta property="og:video:secure_url" content=(url); },
        html! { meta property="og:video:width" content=(width); },
        html! { meta property="og:video:height" content=(height); },
    ]
    .map(Markup::into_string)
}
