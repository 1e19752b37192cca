//! HTML keyboard renderer.
//!
//! Lays out one absolutely positioned keycap per layout entry and overlays
//! the active layer's label. Keycaps carry state classes (`encoder`,
//! `is-hrm`, `noop`, `layer-switch`, `pressed`) and inline styles that refer
//! to the per-layer CSS color variables.

use std::fmt::Write as _;

use super::color_legend::layer_color_var;
use crate::app::ViewState;
use crate::constants::{HOMEROW_MOD_BEHAVIORS, KEYCAP_GAP, KEYPRESS_BEHAVIORS, LAYER_TAP_BEHAVIORS};
use crate::keycode_db::{escape_html, KeycodeRenderer};
use crate::models::{Binding, KeyGeometry, KeyboardBounds, KeymapDocument};

/// Corner positions used by the overview for non-base layers, in order.
const OVERVIEW_POSITIONS: &[&str] = &["tl", "tr", "bl", "br", "b"];

/// Which keycodes a binding shows on its keycap.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyLabel<'a> {
    /// Homerow mod: tap key as main content, hold modifier underneath
    HomerowMod {
        /// Tap keycode (`params[1]`)
        tap: Option<&'a str>,
        /// Hold modifier (`params[0]`)
        hold: Option<&'a str>,
    },
    /// A single keycode
    Keycode(Option<&'a str>),
}

impl<'a> KeyLabel<'a> {
    /// The keycode shown as the main label.
    #[must_use]
    pub const fn primary(&self) -> Option<&'a str> {
        match *self {
            Self::HomerowMod { tap, .. } => tap,
            Self::Keycode(keycode) => keycode,
        }
    }
}

/// Picks the keycode(s) to display for a binding.
///
/// - `hml`/`hmr`: tap key `params[1]`, hold `params[0]`
/// - `kp`, `bootloader`, `sys_reset`: `params[0]`, else the behavior name
/// - `lt`, `hll`, `hlr`: `params[1]`
/// - `bt`: `BT`
/// - anything else: the binding's source text
#[must_use]
pub fn key_label(binding: &Binding) -> KeyLabel<'_> {
    let behavior = binding.behavior.as_str();

    if HOMEROW_MOD_BEHAVIORS.contains(&behavior) {
        KeyLabel::HomerowMod {
            tap: binding.param(1),
            hold: binding.param(0),
        }
    } else if KEYPRESS_BEHAVIORS.contains(&behavior) {
        KeyLabel::Keycode(Some(binding.param(0).unwrap_or(behavior)))
    } else if LAYER_TAP_BEHAVIORS.contains(&behavior) {
        KeyLabel::Keycode(binding.param(1))
    } else if behavior == "bt" {
        KeyLabel::Keycode(Some("BT"))
    } else {
        KeyLabel::Keycode(Some(binding.original.as_str()))
    }
}

/// Whether a binding gets a label at all.
fn is_labelled(binding: &Binding) -> bool {
    !binding.is_noop() && !binding.behavior.is_empty()
}

/// Ordered inline CSS declarations; setting a property again replaces it.
#[derive(Debug, Default)]
struct InlineStyle(Vec<(&'static str, String)>);

impl InlineStyle {
    fn set(&mut self, property: &'static str, value: impl Into<String>) {
        let value = value.into();
        match self.0.iter_mut().find(|(name, _)| *name == property) {
            Some(entry) => entry.1 = value,
            None => self.0.push((property, value)),
        }
    }

    /// ` style="..."`, or nothing when empty.
    fn attribute(&self) -> String {
        if self.0.is_empty() {
            return String::new();
        }
        let declarations: Vec<String> = self
            .0
            .iter()
            .map(|(name, value)| format!("{name}: {value};"))
            .collect();
        format!(r#" style="{}""#, escape_html(&declarations.join(" ")))
    }
}

/// Formats a pixel length with at most two decimals.
fn px(value: f32) -> String {
    // Adding 0.0 turns -0.0 into 0.0
    format!("{}px", (value * 100.0).round() / 100.0 + 0.0)
}

/// Renders keycaps for one document at one scale.
pub struct KeyboardView<'a> {
    document: &'a KeymapDocument,
    renderer: &'a KeycodeRenderer<'a>,
    bounds: KeyboardBounds,
    scale: f32,
}

impl<'a> KeyboardView<'a> {
    /// Creates a view; `scale` is pixels per keyboard unit.
    #[must_use]
    pub fn new(document: &'a KeymapDocument, renderer: &'a KeycodeRenderer<'a>, scale: f32) -> Self {
        Self {
            document,
            renderer,
            bounds: KeyboardBounds::of(&document.layout),
            scale,
        }
    }

    /// Renders the keyboard for the state's active layer.
    #[must_use]
    pub fn render(&self, state: &ViewState) -> String {
        let active = state
            .active_layer
            .as_deref()
            .or_else(|| self.document.base_layer());

        let keycaps = self
            .document
            .layout
            .iter()
            .enumerate()
            .map(|(index, key)| self.keycap(state, active, index, key));
        self.container(keycaps)
    }

    /// Renders every layer at once: the base label in the center and up to
    /// five other layers in the corners.
    #[must_use]
    pub fn render_overview(&self) -> String {
        let keycaps = self
            .document
            .layout
            .iter()
            .enumerate()
            .map(|(index, key)| self.overview_keycap(index, key));
        self.container(keycaps)
    }

    fn container(&self, keycaps: impl Iterator<Item = String>) -> String {
        let mut output = String::new();
        let _ = write!(
            output,
            r#"<div id="keyboard-container"><div class="keyboard-content" style="width: {}; height: {};">"#,
            px(self.bounds.width() * self.scale),
            px(self.bounds.height() * self.scale)
        );
        for keycap in keycaps {
            output.push_str(&keycap);
        }
        output.push_str("</div></div>");
        output
    }

    /// Position, size and rotation of a keycap.
    fn geometry_style(&self, key: &KeyGeometry) -> InlineStyle {
        let x = (key.x - self.bounds.min_x) * self.scale;
        let y = (key.y - self.bounds.min_y) * self.scale;
        let width = key.w * self.scale - KEYCAP_GAP;
        let height = key.h * self.scale - KEYCAP_GAP;

        let mut style = InlineStyle::default();
        style.set("left", px(x));
        style.set("top", px(y));
        style.set("width", px(width));
        style.set("height", px(height));

        if let Some(r) = key.rotation() {
            // Rotation origin in keycap-local pixels, same offset as the keycap
            let origin_x = key
                .rx
                .map_or(width / 2.0, |rx| (rx - self.bounds.min_x) * self.scale - x);
            let origin_y = key
                .ry
                .map_or(height / 2.0, |ry| (ry - self.bounds.min_y) * self.scale - y);
            style.set("transform-origin", format!("{} {}", px(origin_x), px(origin_y)));
            style.set("transform", format!("rotate({r}deg)"));
        }

        style
    }

    fn static_classes(&self, index: usize) -> Vec<&'static str> {
        let mut classes = vec!["keycap"];
        if self.document.is_encoder_key(index) {
            classes.push("encoder");
        }
        if self.document.is_homerow_mod_key(index) {
            classes.push("is-hrm");
        }
        classes
    }

    fn keycap(&self, state: &ViewState, active: Option<&str>, index: usize, key: &KeyGeometry) -> String {
        let mut style = self.geometry_style(key);
        let mut classes = self.static_classes(index);

        let binding = active.and_then(|layer| self.document.binding(layer, index));
        let noop = binding.map_or(true, Binding::is_noop);
        if noop {
            classes.push("noop");
        }

        let active_index = active.and_then(|layer| self.document.layer_index(layer));
        match (active, active_index) {
            (_, Some(0)) => {
                let switched = state
                    .activation
                    .iter()
                    .find(|&(_, &key_index)| key_index == index)
                    .and_then(|(layer, _)| self.document.layer_index(layer));
                if let Some(target) = switched {
                    let color = layer_color_var(target);
                    style.set("border-color", color.clone());
                    style.set("background-color", format!("rgb(from {color} r g b / 0.5)"));
                    classes.push("layer-switch");
                }
            }
            (Some(layer), Some(layer_index)) => {
                if state.activation.get(layer) == Some(&index) {
                    style.set("background-color", layer_color_var(layer_index));
                    classes.push("pressed");
                }
                if !noop {
                    style.set(
                        "background-color",
                        format!("var(--layer-color-{}-bg, var(--key-bg))", layer_index + 1),
                    );
                }
            }
            _ => {}
        }

        let label = match (active, active_index, binding) {
            (Some(layer), Some(layer_index), Some(binding)) if is_labelled(binding) => {
                self.label(layer, layer_index, binding, "center")
            }
            _ => String::new(),
        };

        format!(
            r#"<div class="{}"{} data-index="{index}">{label}</div>"#,
            classes.join(" "),
            style.attribute()
        )
    }

    fn overview_keycap(&self, index: usize, key: &KeyGeometry) -> String {
        let style = self.geometry_style(key);
        let classes = self.static_classes(index);

        let mut labels = String::new();
        let mut corners = OVERVIEW_POSITIONS.iter();
        for (layer_index, layer) in self.document.layer_order.iter().enumerate() {
            let Some(binding) = self.document.binding(layer, index) else {
                continue;
            };
            if !is_labelled(binding) {
                continue;
            }
            let position = if layer_index == 0 {
                Some("center")
            } else {
                corners.next().copied()
            };
            if let Some(position) = position {
                labels.push_str(&self.label(layer, layer_index, binding, position));
            }
        }

        format!(
            r#"<div class="{}"{} data-index="{index}">{labels}</div>"#,
            classes.join(" "),
            style.attribute()
        )
    }

    fn label(&self, layer: &str, layer_index: usize, binding: &Binding, position: &str) -> String {
        let mut style = InlineStyle::default();
        if layer_index > 0 {
            let color = format!("var(--layer-color-{}, #6c757d)", layer_index + 1);
            style.set("color", color.clone());
            style.set("fill", color);
        }

        let content = match key_label(binding) {
            KeyLabel::HomerowMod { tap, hold } => format!(
                r#"<div class="label-main-content">{}</div><div class="label label-b">{}</div>"#,
                self.renderer.render(tap, None),
                self.renderer.render(hold, None)
            ),
            KeyLabel::Keycode(keycode) => self.renderer.render(keycode, None),
        };

        format!(
            r#"<div class="label label-{position}"{} title="{}">{content}</div>"#,
            style.attribute(),
            escape_html(&format!("{layer}: {}", binding.original))
        )
    }
}
