//! Parsing for keymap documents and raw binding strings.
//!
//! This module handles reading the pre-extracted keymap JSON and decoding
//! the small set of binding string forms it may contain.

pub mod binding;
pub mod keymap_json;

// Re-export commonly used functions
pub use binding::parse_binding;
pub use keymap_json::{check_document, load_document, parse_document};
