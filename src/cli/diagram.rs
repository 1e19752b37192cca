//! Diagram command: box-drawing preview of one layer.

use crate::cli::common::{load_config, load_document, load_keycode_db, require_layer, CliError, CliResult};
use crate::export::render_text_diagram;
use clap::Args;
use std::path::PathBuf;

/// Print a text diagram of a layer
#[derive(Debug, Clone, Args)]
pub struct DiagramArgs {
    /// Path to the keymap document (JSON)
    #[arg(value_name = "DOC")]
    pub document: PathBuf,

    /// Layer to draw (defaults to the base layer)
    #[arg(long, value_name = "NAME")]
    pub layer: Option<String>,
}

impl DiagramArgs {
    /// Execute the diagram command
    pub fn execute(&self) -> CliResult<()> {
        let document = load_document(&self.document)?;
        let db = load_keycode_db(&load_config()?)?;

        let layer = match &self.layer {
            Some(layer) => {
                require_layer(&document, layer)?;
                layer.as_str()
            }
            None => document
                .base_layer()
                .ok_or_else(|| CliError::validation("Keymap document has no layers"))?,
        };

        let diagram = render_text_diagram(&document, layer, &db)
            .map_err(|e| CliError::validation(format!("{e:#}")))?;
        print!("{diagram}");

        Ok(())
    }
}
