//! Layer navigation tree for terminal output.
//!
//! Shows how layers are reached through layer-switching bindings
//! (`&mo`, `&lt`, `&tog`, ...) and which base-layer key activates each one.

use std::fmt::Write as _;

use crate::models::KeymapDocument;
use crate::services::layer_refs::NavigationReport;

/// Generates the navigation tree for `zmkview layers`.
///
/// # Example Output
///
/// ```text
/// Layer 0 (Base)
///   ├─→ &mo 1 on key 14 → Layer 1 (Nav)
///   └─→ &lt 2 SPACE on key 15 → Layer 2 (Sym)
///
/// Layer 1 (Nav) [activated by key 14]
///   └─→ [No outbound references]
/// ```
#[must_use]
pub fn generate_layer_navigation(document: &KeymapDocument, report: &NavigationReport) -> String {
    let mut output = String::new();

    for layer in &report.layers {
        let _ = write!(output, "Layer {} ({})", layer.index, layer.name);
        if let Some(key) = layer.activation_key {
            let _ = write!(output, " [activated by {}]", key_name(document, key));
        }
        output.push('\n');

        if layer.outbound.is_empty() {
            output.push_str("  └─→ [No outbound references]\n");
        }

        let count = layer.outbound.len();
        for (idx, layer_ref) in layer.outbound.iter().enumerate() {
            let prefix = if idx + 1 == count { "└─→" } else { "├─→" };
            let target_index = document
                .layer_index(&layer_ref.to_layer)
                .map_or_else(|| "?".to_string(), |i| i.to_string());

            let _ = writeln!(
                output,
                "  {prefix} {} on {} → Layer {target_index} ({})",
                layer_ref.binding.trim(),
                key_name(document, layer_ref.key_index),
                layer_ref.to_layer
            );
        }

        output.push('\n');
    }

    if !report.warnings.is_empty() {
        output.push_str("Warnings:\n");
        for warning in &report.warnings {
            let _ = writeln!(output, "  ⚠ {warning}");
        }
    }

    output
}

/// A key's layout label if it has one, otherwise its index.
fn key_name(document: &KeymapDocument, index: usize) -> String {
    match document.layout.get(index).and_then(|key| key.label.as_deref()) {
        Some(label) => format!("key {index} ({label})"),
        None => format!("key {index}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_document;
    use crate::services::build_navigation_report;

    #[test]
    fn test_navigation_tree() {
        let doc = parse_document(
            r#"{
                "layout": [{"x": 0}, {"x": 1, "label": "THUMB"}, {"x": 2}],
                "keymap": {
                    "Base": ["&kp A", "&mo 1", "&lt 2 SPACE"],
                    "Nav": ["&kp LEFT", "___", "&to 0"],
                    "Sym": ["___", "___", "___"]
                },
                "layer_order": ["Base", "Nav", "Sym"]
            }"#,
        )
        .unwrap();

        let output = generate_layer_navigation(&doc, &build_navigation_report(&doc));

        assert!(output.contains("Layer 0 (Base)\n"));
        assert!(output.contains("├─→ &mo 1 on key 1 (THUMB) → Layer 1 (Nav)"));
        assert!(output.contains("└─→ &lt 2 SPACE on key 2 → Layer 2 (Sym)"));
        assert!(output.contains("Layer 1 (Nav) [activated by key 1 (THUMB)]"));
        assert!(output.contains("└─→ &to 0 on key 2 → Layer 0 (Base)"));
        assert!(output.contains("Layer 2 (Sym) [activated by key 2]\n  └─→ [No outbound references]"));
        // Held keys are transparent on their target layers
        assert!(!output.contains("Warnings:"));
    }

    #[test]
    fn test_navigation_warnings() {
        let doc = parse_document(
            r#"{
                "layout": [{"x": 0}],
                "keymap": {"Base": ["&mo 1"], "Nav": ["&kp ESC"]},
                "layer_order": ["Base", "Nav"]
            }"#,
        )
        .unwrap();

        let output = generate_layer_navigation(&doc, &build_navigation_report(&doc));
        assert!(output.contains("Warnings:\n  ⚠ Layer 'Nav' key 0 is '&kp ESC'"));
    }
}
