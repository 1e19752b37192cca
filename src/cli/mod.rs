//! CLI command handlers.
//!
//! Headless, scriptable access to the renderers for automation and CI.

pub mod common;
pub mod config;
pub mod diagram;
pub mod kle;
pub mod layers;
pub mod render;
pub mod resolve;

// Re-export types used by main.rs and tests
pub use common::{CliError, CliResult, ExitCode};
pub use config::ConfigArgs;
pub use diagram::DiagramArgs;
pub use kle::KleArgs;
pub use layers::LayersArgs;
pub use render::RenderArgs;
pub use resolve::ResolveArgs;
