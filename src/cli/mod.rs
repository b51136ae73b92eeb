//! Command-line entry points
//!
//! `server` runs the HTTP gateway; `card` renders a single card document.

use tracing_subscriber::{
    EnvFilter, fmt::MakeWriter, layer::SubscriberExt, util::SubscriberInitExt,
};

pub mod card;
pub mod server;

/// Install the global subscriber.
///
/// Returns `false`, after a warning on stderr, when another subscriber was
/// already installed; that one keeps receiving events.
pub fn init_logging<W>(filter: EnvFilter, writer: W) -> bool
where
    W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
{
    match tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(writer))
        .try_init()
    {
        Ok(()) => true,
        Err(e) => {
            eprintln!(
                "Warning: Failed to initialize logging: {}. Keeping the existing subscriber.",
                e
            );
            false
        }
    }
}
