//! ZMK Keymap Viewer - renders extracted ZMK keymaps
//!
//! Turns a keymap document (layout geometry plus per-layer bindings) into
//! static HTML pages, terminal diagrams and KLE JSON.

use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use zmk_keymap_viewer::cli::{
    CliError, ConfigArgs, DiagramArgs, ExitCode, KleArgs, LayersArgs, RenderArgs, ResolveArgs,
};

/// ZMK Keymap Viewer - render extracted ZMK keymaps
#[derive(Parser, Debug)]
#[command(name = "zmkview", author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Render the keymap to HTML pages
    Render(RenderArgs),
    /// Show how keycode tokens are displayed
    Resolve(ResolveArgs),
    /// Show layer activation keys and references
    Layers(LayersArgs),
    /// Print a text diagram of one layer
    Diagram(DiagramArgs),
    /// Export the layout as keyboard-layout-editor JSON
    Kle(KleArgs),
    /// Manage configuration
    Config(ConfigArgs),
}

fn main() {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let result: Result<(), CliError> = match &cli.command {
        Commands::Render(args) => args.execute(),
        Commands::Resolve(args) => args.execute(),
        Commands::Layers(args) => args.execute(),
        Commands::Diagram(args) => args.execute(),
        Commands::Kle(args) => args.execute(),
        Commands::Config(args) => args.execute(),
    };

    let code = match result {
        Ok(()) => ExitCode::Success,
        Err(err) => {
            eprintln!("Error: {}", err.message);
            err.code
        }
    };
    std::process::exit(code.code());
}
