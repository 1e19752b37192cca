//! Full HTML page assembly.
//!
//! A page is the header with the theme switcher, the layer tabs, the
//! keyboard and the legend, with the stylesheet and the layer color
//! variables embedded. Static exports link tabs to sibling files; the HTTP
//! viewer posts forms back to the server.

use std::fmt::Write as _;

use super::color_legend::{generate_color_legend, generate_color_variables, layer_color_var};
use super::keyboard_renderer::KeyboardView;
use crate::app::{Theme, ViewState};
use crate::constants::APP_NAME;
use crate::keycode_db::{escape_html, KeycodeRenderer};
use crate::models::KeymapDocument;

/// Embedded base stylesheet.
pub const STYLESHEET: &str = include_str!("style.css");

/// How layer tabs and the theme switcher navigate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Navigation {
    /// Links to `{stem}-{layer}.html` siblings; theme toggles client-side
    StaticFiles {
        /// File name stem shared by all pages of the export
        stem: String,
    },
    /// POST forms to `/layers/{name}` and `/theme/toggle`
    Forms,
}

/// Page-level rendering options.
#[derive(Debug, Clone)]
pub struct PageOptions<'a> {
    /// Pixels per keyboard unit
    pub scale: f32,
    /// Layer palette
    pub layer_colors: &'a [String],
    /// Tab navigation style
    pub navigation: Navigation,
    /// Show every layer on one keyboard instead of the active one
    pub overview: bool,
}

/// File name of a layer's page in a static export.
///
/// Characters outside `[A-Za-z0-9_-]` in the layer name become `_`.
///
/// # Examples
/// ```
/// use zmk_keymap_viewer::export::page::layer_file_name;
///
/// assert_eq!(layer_file_name("corne", "Nav"), "corne-Nav.html");
/// assert_eq!(layer_file_name("corne", "Sym & Num"), "corne-Sym___Num.html");
/// ```
#[must_use]
pub fn layer_file_name(stem: &str, layer: &str) -> String {
    let safe: String = layer
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect();
    format!("{stem}-{safe}.html")
}

/// Percent-encodes a string for use as one URL path segment.
#[must_use]
pub fn encode_path_segment(segment: &str) -> String {
    let mut encoded = String::with_capacity(segment.len());
    for byte in segment.bytes() {
        if byte.is_ascii_alphanumeric() || matches!(byte, b'-' | b'_' | b'.' | b'~') {
            encoded.push(char::from(byte));
        } else {
            let _ = write!(encoded, "%{byte:02X}");
        }
    }
    encoded
}

/// Renders the complete viewer page for the current state.
#[must_use]
pub fn render_page(
    document: &KeymapDocument,
    state: &ViewState,
    renderer: &KeycodeRenderer<'_>,
    options: &PageOptions<'_>,
) -> String {
    let view = KeyboardView::new(document, renderer, options.scale);
    let keyboard = if options.overview {
        view.render_overview()
    } else {
        view.render(state)
    };

    let active = if options.overview {
        None
    } else {
        state.active_layer.as_deref()
    };
    let title = match active {
        Some(layer) => format!("{APP_NAME} - {layer}"),
        None => APP_NAME.to_string(),
    };

    let mut body = String::new();
    body.push_str(r#"<div class="container">"#);
    let _ = write!(
        body,
        r#"<div class="header"><h1>{APP_NAME}</h1>{}</div>"#,
        theme_switcher(state.theme, &options.navigation)
    );
    body.push_str(&layer_tabs(document, active, &options.navigation));
    body.push_str(&keyboard);
    body.push_str(&generate_color_legend(&document.layer_order));
    body.push_str("</div>");

    let styles = format!(
        "{STYLESHEET}\n{}",
        generate_color_variables(&document.layer_order, options.layer_colors)
    );
    html_document(&title, state.theme, &styles, &body)
}

/// Renders the inline error page shown when the document can't be loaded.
#[must_use]
pub fn render_error_page(message: &str, theme: Theme) -> String {
    let body = format!(
        r#"<div class="container"><div class="header"><h1>{APP_NAME}</h1></div><div id="keyboard-container"><p class="error" style="color: red;">Failed to load keymap.</p><pre>{}</pre></div></div>"#,
        escape_html(message)
    );
    html_document(APP_NAME, theme, STYLESHEET, &body)
}

fn html_document(title: &str, theme: Theme, styles: &str, body: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>{}</title>
<style>
{styles}</style>
</head>
<body data-theme="{}">
{body}
</body>
</html>
"#,
        escape_html(title),
        theme.as_str()
    )
}

fn theme_switcher(theme: Theme, navigation: &Navigation) -> String {
    let label = theme.switch_label();
    match navigation {
        Navigation::Forms => format!(
            r#"<form method="post" action="/theme/toggle"><button type="submit" class="theme-switcher">{label}</button></form>"#
        ),
        Navigation::StaticFiles { .. } => format!(
            r#"<button type="button" class="theme-switcher" onclick="var b=document.body,d=b.getAttribute('data-theme')==='dark';b.setAttribute('data-theme',d?'light':'dark');this.textContent=d?'Dark Mode':'Light Mode';">{label}</button>"#
        ),
    }
}

fn layer_tabs(document: &KeymapDocument, active: Option<&str>, navigation: &Navigation) -> String {
    let mut output = String::from(r#"<div class="layer-selector">"#);

    for (index, name) in document.layer_order.iter().enumerate() {
        let is_active = active == Some(name.as_str());
        let color = layer_color_var(index);
        let (class, style) = if is_active {
            (
                "layer-tab active",
                format!(
                    "background-color: var(--layer-color-{}-bg); color: {color};",
                    index + 1
                ),
            )
        } else {
            ("layer-tab", "background-color: transparent; color: inherit;".to_string())
        };
        let content = format!(
            r#"<span class="layer-color-indicator" style="background-color: {color};"></span>{}"#,
            escape_html(name)
        );

        match navigation {
            Navigation::StaticFiles { stem } => {
                let _ = write!(
                    output,
                    r#"<a class="{class}" style="{style}" href="{}">{content}</a>"#,
                    escape_html(&layer_file_name(stem, name))
                );
            }
            Navigation::Forms => {
                let _ = write!(
                    output,
                    r#"<form method="post" action="/layers/{}"><button type="submit" class="{class}" style="{style}">{content}</button></form>"#,
                    encode_path_segment(name)
                );
            }
        }
    }

    output.push_str("</div>");
    output
}
