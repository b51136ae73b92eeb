//! Card mode CLI logic
//!
//! Renders a single raw card document without starting the server.

use std::io::Read;
use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use tracing::debug;
use tracing_subscriber::EnvFilter;

use crate::{
    cli::init_logging,
    render::{RenderConfig, RenderedCard, render_card},
    types::{Card, TweetCard},
};

/// Arguments for card mode
#[derive(Debug)]
pub struct CardArgs {
    /// JSON document to read; stdin when absent
    pub file: Option<PathBuf>,
    pub user_agent: String,
    /// Clock override for poll countdowns
    pub now: Option<DateTime<Utc>>,
    pub verbose: bool,
}

/// Render a raw card document.
///
/// Polls produce the bar chart text; players produce their meta tags, one
/// per line.
pub fn render_card_document(
    input: &str,
    user_agent: &str,
    now: Option<DateTime<Utc>>,
) -> crate::Result<String> {
    let raw: TweetCard = serde_json::from_str(input)?;
    let card = Card::try_from(&raw)?;

    let mut config = RenderConfig::for_user_agent(user_agent);
    if let Some(now) = now {
        config = config.at(now);
    }

    let mut headers = Vec::new();
    Ok(match render_card(&card, &mut headers, &config) {
        RenderedCard::Html(text) => text,
        RenderedCard::Embedded => headers.join("\n"),
    })
}

/// Run card mode with the given arguments
pub fn run_card_mode(args: CardArgs) -> Result<()> {
    let default_level = if args.verbose { "debug" } else { "error" };
    init_logging(
        EnvFilter::try_from_default_env().unwrap_or_else(|_| default_level.into()),
        std::io::stderr,
    );

    let input = match &args.file {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read card file {}", path.display()))?,
        None => {
            let mut buffer = String::new();
            std::io::stdin()
                .read_to_string(&mut buffer)
                .context("Failed to read card from stdin")?;
            buffer
        }
    };
    debug!("Read {} bytes of card JSON", input.len());

    let output = render_card_document(&input, &args.user_agent, args.now)
        .map_err(|e| anyhow::anyhow!(crate::error::format_error(&e)))?;
    println!("{}", output);

    Ok(())
}
