//! Loader for pre-extracted keymap documents (`keymap_data.json`).
//!
//! The document carries the physical layout, the per-layer bindings, the
//! layer order and the encoder descriptors. Structural problems that still
//! leave something renderable are reported as warnings rather than errors.

use anyhow::{bail, Context, Result};
use std::fs;
use std::path::Path;
use tracing::{debug, warn};

use crate::models::KeymapDocument;

/// Reads and parses a keymap document from disk.
///
/// Warnings from [`check_document`] are logged but do not fail the load.
pub fn load_document(path: &Path) -> Result<KeymapDocument> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read keymap document: {}", path.display()))?;

    let document = parse_document(&content)
        .with_context(|| format!("Failed to parse keymap document: {}", path.display()))?;

    debug!(
        "Loaded {} keys and {} layers from {}",
        document.layout.len(),
        document.layer_order.len(),
        path.display()
    );

    Ok(document)
}

/// Parses a keymap document from a JSON string.
pub fn parse_document(content: &str) -> Result<KeymapDocument> {
    let document: KeymapDocument =
        serde_json::from_str(content).context("Invalid keymap JSON")?;

    if document.layer_order.is_empty() {
        bail!("Keymap document has no layers in layer_order");
    }

    for issue in check_document(&document) {
        warn!("{issue}");
    }

    Ok(document)
}

/// Lists cross-reference problems in a document.
///
/// These never prevent rendering: a missing layer renders as empty keys and
/// extra bindings beyond the layout are ignored.
#[must_use]
pub fn check_document(document: &KeymapDocument) -> Vec<String> {
    let mut issues = Vec::new();
    let key_count = document.layout.len();

    for layer in &document.layer_order {
        match document.keymap.get(layer) {
            None => issues.push(format!("Layer '{layer}' has no bindings in keymap")),
            Some(bindings) if bindings.len() != key_count => issues.push(format!(
                "Layer '{layer}' has {} bindings but the layout has {key_count} keys",
                bindings.len()
            )),
            Some(_) => {}
        }
    }

    let mut unlisted: Vec<&String> = document
        .keymap
        .keys()
        .filter(|layer| !document.layer_order.contains(layer))
        .collect();
    unlisted.sort();
    for layer in unlisted {
        issues.push(format!("Layer '{layer}' is not listed in layer_order"));
    }

    issues
}
