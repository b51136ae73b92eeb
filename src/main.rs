//! Embed gateway binary
//!
//! # Usage
//!
//! ## Server Mode
//! ```bash
//! embed-gateway server --port 4416 --host 0.0.0.0
//! ```
//!
//! ## Card Mode
//! ```bash
//! embed-gateway card --file card.json --user-agent TelegramBot
//! ```

use std::path::PathBuf;

use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand};

use embed_gateway::cli::{
    card::{CardArgs, run_card_mode},
    server::{ServerArgs, run_server_mode},
};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
#[command(name = "embed-gateway")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP gateway
    Server {
        /// Port to listen on
        #[arg(short, long)]
        port: Option<u16>,

        /// Host to bind to
        #[arg(long)]
        host: Option<String>,

        /// Configuration file path
        #[arg(long)]
        config: Option<String>,

        /// Enable verbose logging
        #[arg(short, long)]
        verbose: bool,
    },
    /// Render a raw card JSON document and print the result
    Card {
        /// Card JSON file (reads stdin when omitted)
        #[arg(short, long, value_name = "PATH")]
        file: Option<PathBuf>,

        /// User agent of the client to render for
        #[arg(short, long, default_value = "")]
        user_agent: String,

        /// Render as of this RFC 3339 instant instead of now
        #[arg(long, value_name = "RFC3339")]
        now: Option<DateTime<Utc>>,

        /// Enable verbose logging
        #[arg(short, long)]
        verbose: bool,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Server {
            port,
            host,
            config,
            verbose,
        } => {
            let args = ServerArgs {
                port,
                host,
                config,
                verbose,
            };
            run_server_mode(args).await
        }
        Commands::Card {
            file,
            user_agent,
            now,
            verbose,
        } => {
            let args = CardArgs {
                file,
                user_agent,
                now,
                verbose,
            };
            run_card_mode(args)
        }
    }
}
