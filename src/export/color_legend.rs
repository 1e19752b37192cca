//! Layer palette, CSS color variables and the color legend.
//!
//! Layers are numbered from 1 in CSS (`--layer-color-1` is the base layer).
//! Colors come from the configured palette and are cycled when there are
//! more layers than colors.

use std::fmt::Write as _;

use crate::constants::DEFAULT_LAYER_COLORS;
use crate::keycode_db::escape_html;

/// Palette color for a layer index (0-based), cycling through `palette`.
///
/// An empty palette falls back to the built-in default colors.
#[must_use]
pub fn layer_color(palette: &[String], layer_index: usize) -> &str {
    if palette.is_empty() {
        return DEFAULT_LAYER_COLORS[layer_index % DEFAULT_LAYER_COLORS.len()];
    }
    &palette[layer_index % palette.len()]
}

/// CSS variable reference for a layer's color.
#[must_use]
pub fn layer_color_var(layer_index: usize) -> String {
    format!("var(--layer-color-{})", layer_index + 1)
}

/// Generates the `:root` block defining `--layer-color-N` and
/// `--layer-color-N-bg` for every layer.
///
/// # Example Output
///
/// ```css
/// :root {
///   --layer-color-1: #8f9bb3;
///   --layer-color-1-bg: color-mix(in srgb, #8f9bb3 18%, transparent);
/// }
/// ```
#[must_use]
pub fn generate_color_variables(layer_order: &[String], palette: &[String]) -> String {
    let mut output = String::from(":root {\n");

    for index in 0..layer_order.len() {
        let color = layer_color(palette, index);
        let n = index + 1;
        let _ = writeln!(output, "  --layer-color-{n}: {color};");
        let _ = writeln!(
            output,
            "  --layer-color-{n}-bg: color-mix(in srgb, {color} 18%, transparent);"
        );
    }

    output.push_str("}\n");
    output
}

/// Generates the legend block: one entry per non-base layer plus the
/// homerow-mod indicator.
#[must_use]
pub fn generate_color_legend(layer_order: &[String]) -> String {
    let mut output = String::from(r#"<div class="legend" id="legend-container">"#);

    for (index, name) in layer_order.iter().enumerate().skip(1) {
        let _ = write!(
            output,
            r#"<div class="legend-item"><div class="legend-color-box" style="background-color: {};"></div><span>{}</span></div>"#,
            layer_color_var(index),
            escape_html(name)
        );
    }

    output.push_str(
        r#"<div class="legend-item"><div class="legend-color-box" style="box-shadow: 0 0 0 2px var(--hrm-indicator-color);"></div><span>Homerow Mod</span></div>"#,
    );
    output.push_str("</div>");
    output
}
