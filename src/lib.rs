//! Embed gateway
//!
//! An HTTP gateway that serves rich link-preview embeds for social posts.
//! Crawlers and chat clients get an HTML page with Open Graph metadata,
//! including plain-text poll bar charts and player cards; people are
//! redirected to the original post.
//!
//! # Architecture
//!
//! - [`classify`] decides bot vs. human, direct media requests and the
//!   client family used for render width and cache keys
//! - [`render`] turns cards and statuses into text and meta tags
//! - [`server`] holds the route table and the caching gateway middleware
//! - [`cache`] and [`status`] are the two ports the gateway depends on
//!
//! # Usage
//!
//! ```bash
//! embed-gateway server --port 4416 --host 0.0.0.0
//! ```
//!
//! ```rust
//! use embed_gateway::{render::RenderConfig, render::render_card, types::Card};
//!
//! let mut headers = Vec::new();
//! let rendered = render_card(&Card::Unknown, &mut headers, &RenderConfig::default());
//! assert_eq!(rendered.text(), Some("\n\n"));
//! ```

pub mod cache;
pub mod classify;
pub mod cli;
pub mod config;
pub mod error;
pub mod render;
pub mod server;
pub mod status;
pub mod types;
pub mod utils;

pub use config::{ConfigLoader, Settings};
pub use error::{Error, Result};
pub use server::{AppState, create_app};
pub use status::{StatusLookup, StatusOutcome, StatusRequest};
