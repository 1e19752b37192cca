//! Renderers for keymap documents.
//!
//! HTML pages for the browser viewer and static exports, plus the terminal
//! diagram, the layer navigation tree and KLE JSON.

pub mod color_legend;
pub mod keyboard_renderer;
pub mod kle;
pub mod layer_navigation;
pub mod page;
pub mod text_diagram;

pub use color_legend::{generate_color_legend, generate_color_variables};
pub use keyboard_renderer::{key_label, KeyLabel, KeyboardView};
pub use kle::export_kle;
pub use layer_navigation::generate_layer_navigation;
pub use page::{layer_file_name, render_error_page, render_page, Navigation, PageOptions};
pub use text_diagram::render_text_diagram;
