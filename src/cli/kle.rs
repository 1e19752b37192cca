//! KLE command: exports the layout as keyboard-layout-editor JSON.

use crate::cli::common::{load_config, load_document, load_keycode_db, require_layer, write_output, CliError, CliResult};
use crate::export::export_kle;
use clap::Args;
use std::path::PathBuf;
use tracing::info;

/// Export the layout as keyboard-layout-editor.com JSON
#[derive(Debug, Clone, Args)]
pub struct KleArgs {
    /// Path to the keymap document (JSON)
    #[arg(value_name = "DOC")]
    pub document: PathBuf,

    /// Output file (defaults to stdout)
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Use this layer's bindings as legends instead of the key labels
    #[arg(long, value_name = "NAME")]
    pub layer: Option<String>,
}

impl KleArgs {
    /// Execute the kle command
    pub fn execute(&self) -> CliResult<()> {
        let document = load_document(&self.document)?;
        if let Some(layer) = &self.layer {
            require_layer(&document, layer)?;
        }
        let db = load_keycode_db(&load_config()?)?;

        let kle = export_kle(&document, self.layer.as_deref(), &db)
            .map_err(|e| CliError::validation(format!("{e:#}")))?;
        let mut json = serde_json::to_string_pretty(&kle)
            .map_err(|e| CliError::io(format!("Failed to serialize JSON: {e}")))?;
        json.push('\n');

        write_output(self.output.as_deref(), &json)?;
        if let Some(path) = &self.output {
            info!("Wrote KLE layout to {}", path.display());
            println!("✓ Exported KLE layout to: {}", path.display());
        }

        Ok(())
    }
}
