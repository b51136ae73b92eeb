//! Card data attached to a status
//!
//! [`TweetCard`] is the loose wire shape delivered by the upstream. It is
//! classified exactly once into [`Card`], which the renderer consumes.

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::warn;

use crate::{Error, Result};

const DEFAULT_PLAYER_WIDTH: &str = "1280";
const DEFAULT_PLAYER_HEIGHT: &str = "720";

/// A single `binding_values` entry
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BindingValue {
    #[serde(default)]
    pub string_value: String,
}

impl BindingValue {
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            string_value: value.into(),
        }
    }
}

/// Raw card as delivered by the upstream status service
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TweetCard {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub binding_values: Option<HashMap<String, BindingValue>>,
}

impl TweetCard {
    /// Build a card from `(field, string_value)` pairs
    pub fn from_pairs<'a>(pairs: impl IntoIterator<Item = (&'a str, &'a str)>) -> Self {
        Self {
            binding_values: Some(
                pairs
                    .into_iter()
                    .map(|(k, v)| (k.to_string(), BindingValue::new(v)))
                    .collect(),
            ),
        }
    }
}

/// One poll option, in display order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PollChoice {
    pub label: String,
    pub votes: u64,
}

/// When a poll closes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollEnd {
    At(DateTime<Utc>),
    /// An end date that is not a readable timestamp; the poll reads as closed
    Unreadable,
}

impl PollEnd {
    /// RFC 3339 first, then a bare `YYYY-MM-DD HH:MM:SS` taken as UTC.
    pub fn parse(raw: &str) -> Self {
        DateTime::parse_from_rfc3339(raw)
            .map(|d| d.with_timezone(&Utc))
            .or_else(|_| {
                NaiveDateTime::parse_from_str(raw.trim(), "%Y-%m-%d %H:%M:%S").map(|d| d.and_utc())
            })
            .map(PollEnd::At)
            .unwrap_or_else(|e| {
                warn!("Unreadable poll end date {:?}: {}", raw, e);
                PollEnd::Unreadable
            })
    }
}

/// Poll card
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Poll {
    /// Options in wire order. A label that repeats keeps every entry rather
    /// than collapsing onto the last one, so no votes drop out of the total.
    pub choices: Vec<PollChoice>,
    pub ends_at: Option<PollEnd>,
}

impl Poll {
    pub fn total_votes(&self) -> u64 {
        self.choices.iter().map(|c| c.votes).sum()
    }
}

/// Embeddable third-party player card
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Player {
    pub url: String,
    pub width: String,
    pub height: String,
}

/// A card, classified once at ingestion
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Card {
    Poll(Poll),
    Player(Player),
    Unknown,
}

impl TryFrom<&TweetCard> for Card {
    type Error = Error;

    /// Poll takes precedence over player. A poll whose vote counts are not
    /// decimal integers is rejected as a whole; an unreadable end date is not.
    fn try_from(card: &TweetCard) -> Result<Self> {
        let Some(values) = card.binding_values.as_ref() else {
            return Ok(Card::Unknown);
        };
        let get = |key: &str| values.get(key).map(|v| v.string_value.as_str());

        if get("choice1_count").is_some() && get("choice2_count").is_some() {
            // choice3 and choice4 are read independently of each other
            let mut choices = Vec::with_capacity(4);
            for n in 1..=4 {
                let count_key = format!("choice{n}_count");
                let Some(raw) = get(&count_key) else {
                    continue;
                };
                let votes = parse_vote_count(&count_key, raw)?;
                let label = get(&format!("choice{n}_label")).unwrap_or_default();
                choices.push(PollChoice {
                    label: label.to_string(),
                    votes,
                });
            }

            let ends_at = get("end_datetime_utc").map(PollEnd::parse);

            return Ok(Card::Poll(Poll { choices, ends_at }));
        }

        if let Some(url) = get("player_url") {
            let non_empty = |key: &str, default: &str| {
                get(key)
                    .filter(|v| !v.is_empty())
                    .unwrap_or(default)
                    .to_string()
            };
            return Ok(Card::Player(Player {
                url: url.to_string(),
                width: non_empty("player_width", DEFAULT_PLAYER_WIDTH),
                height: non_empty("player_height", DEFAULT_PLAYER_HEIGHT),
            }));
        }

        Ok(Card::Unknown)
    }
}

fn parse_vote_count(field: &str, raw: &str) -> Result<u64> {
    raw.trim().parse::<u64>().map_err(|e| {
        Error::validation_with_value(field, format!("invalid vote count: {e}"), raw)
    })
}
