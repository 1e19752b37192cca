//! Shared CLI plumbing: error type, exit codes and loaders.

use std::fmt;
use std::path::Path;

use crate::config::Config;
use crate::keycode_db::KeycodeDb;
use crate::models::KeymapDocument;
use crate::parser;

/// Process exit codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitCode {
    /// Command completed
    Success = 0,
    /// Bad arguments, unknown layer, invalid config
    ValidationError = 1,
    /// Unreadable or malformed files, write failures
    IoError = 2,
}

impl ExitCode {
    /// Numeric status for `std::process::exit`.
    #[must_use]
    pub const fn code(self) -> i32 {
        self as i32
    }
}

/// A failed command with the exit code it maps to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CliError {
    /// Exit code for the process
    pub code: ExitCode,
    /// Message printed to stderr
    pub message: String,
}

impl CliError {
    /// I/O or parse failure (exit code 2).
    pub fn io(message: impl Into<String>) -> Self {
        Self {
            code: ExitCode::IoError,
            message: message.into(),
        }
    }

    /// Validation failure (exit code 1).
    pub fn validation(message: impl Into<String>) -> Self {
        Self {
            code: ExitCode::ValidationError,
            message: message.into(),
        }
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for CliError {}

/// Result type for command handlers.
pub type CliResult<T> = Result<T, CliError>;

/// Loads a keymap document; any failure is an I/O error.
pub fn load_document(path: &Path) -> CliResult<KeymapDocument> {
    parser::load_document(path).map_err(|e| CliError::io(format!("{e:#}")))
}

/// Loads the user configuration.
pub fn load_config() -> CliResult<Config> {
    Config::load().map_err(|e| CliError::validation(format!("Failed to load configuration: {e:#}")))
}

/// Loads the symbol tables with the configured overrides.
pub fn load_keycode_db(config: &Config) -> CliResult<KeycodeDb> {
    config
        .keycode_db()
        .map_err(|e| CliError::io(format!("Failed to load keycode database: {e:#}")))
}

/// Checks that `layer` is part of the document.
pub fn require_layer(document: &KeymapDocument, layer: &str) -> CliResult<()> {
    if document.layer_index(layer).is_some() {
        Ok(())
    } else {
        Err(CliError::validation(format!(
            "Unknown layer '{layer}'. Available layers: {}",
            document.layer_order.join(", ")
        )))
    }
}

/// Writes `content` to `path`, or prints it when no path is given.
pub fn write_output(path: Option<&Path>, content: &str) -> CliResult<()> {
    match path {
        Some(path) => std::fs::write(path, content).map_err(|e| {
            CliError::io(format!("Failed to write output file {}: {e}", path.display()))
        }),
        None => {
            print!("{content}");
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_document;

    #[test]
    fn test_error_codes() {
        assert_eq!(CliError::io("x").code.code(), 2);
        assert_eq!(CliError::validation("x").code.code(), 1);
        assert_eq!(ExitCode::Success.code(), 0);
        assert_eq!(CliError::io("disk full").to_string(), "disk full");
    }

    #[test]
    fn test_require_layer() {
        let doc = parse_document(
            r#"{"layout": [], "keymap": {"Base": []}, "layer_order": ["Base"]}"#,
        )
        .unwrap();
        assert!(require_layer(&doc, "Base").is_ok());
        let err = require_layer(&doc, "Nav").unwrap_err();
        assert_eq!(err.code, ExitCode::ValidationError);
        assert!(err.message.contains("Available layers: Base"));
    }

    #[test]
    fn test_missing_document_is_io_error() {
        let err = load_document(Path::new("/nonexistent/keymap.json")).unwrap_err();
        assert_eq!(err.code, ExitCode::IoError);
    }
}
