//! Layers command: activation keys, layer references and hold conflicts.

use crate::cli::common::{load_document, CliError, CliResult};
use crate::export::generate_layer_navigation;
use crate::services::build_navigation_report;
use clap::Args;
use std::path::PathBuf;

/// Show how layers are activated and referenced
#[derive(Debug, Clone, Args)]
pub struct LayersArgs {
    /// Path to the keymap document (JSON)
    #[arg(value_name = "DOC")]
    pub document: PathBuf,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

impl LayersArgs {
    /// Execute the layers command
    pub fn execute(&self) -> CliResult<()> {
        let document = load_document(&self.document)?;
        let report = build_navigation_report(&document);

        if self.json {
            println!(
                "{}",
                serde_json::to_string_pretty(&report)
                    .map_err(|e| CliError::io(format!("Failed to serialize JSON: {e}")))?
            );
        } else {
            print!("{}", generate_layer_navigation(&document, &report));
        }

        Ok(())
    }
}
