//! ZMK Keymap Viewer web server
//!
//! Serves one keymap document as an interactive page: layer tabs and the
//! theme switch post back to the server, which keeps the view state.
//!
//! # Usage
//!
//! ```bash
//! # Serve on the default port (3001)
//! zmkview-web keymap_data.json
//!
//! # Specify port and theme
//! zmkview-web keymap_data.json --port 8080 --theme light
//! ```

use std::net::SocketAddr;
use std::path::PathBuf;

use clap::Parser;
use tracing::warn;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use zmk_keymap_viewer::app::Theme;
use zmk_keymap_viewer::config::Config;
use zmk_keymap_viewer::web;

/// ZMK Keymap Viewer web server
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the keymap document (JSON)
    #[arg(value_name = "DOC")]
    document: PathBuf,

    /// Port to listen on
    #[arg(short, long, default_value = "3001")]
    port: u16,

    /// Host to bind to
    #[arg(long, default_value = "127.0.0.1")]
    host: String,

    /// Initial theme (defaults to the configured theme mode)
    #[arg(long, value_enum)]
    theme: Option<Theme>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // Initialize tracing
    let filter = if args.verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::load().unwrap_or_else(|e| {
        warn!("Ignoring unusable configuration: {e:#}");
        Config::default()
    });

    let addr: SocketAddr = format!("{}:{}", args.host, args.port).parse()?;

    web::run_server(config, args.document, args.theme, addr).await
}
