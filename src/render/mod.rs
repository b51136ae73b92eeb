//! Embed rendering
//!
//! Card rendering, poll countdowns and the crawler-facing status page.

pub mod card;
pub mod page;
pub mod time;

pub use card::{RenderConfig, RenderedCard, render_card, render_tweet_card};
pub use page::render_status_page;
pub use time::{FINAL_RESULTS, TimeRemaining, time_remaining, time_remaining_label};
