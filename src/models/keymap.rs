//! Keymap document and binding data structures.

use crate::constants::{HOMEROW_MOD_BEHAVIORS, TRANSPARENT_MARKER};
use crate::models::KeyGeometry;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// The action assigned to one physical key position within one layer.
///
/// Bindings are built once when the document is loaded and never mutated
/// afterwards. In the JSON document a binding is either an object
/// (`{"original": "&kp A", "behavior": "kp", "params": ["A"]}`) or the raw
/// source string (`"&kp A"`), which is parsed on load.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "BindingSource")]
pub struct Binding {
    /// Behavior tag without the `&` marker (e.g. "kp", "lt", "trans")
    pub behavior: String,
    /// Ordered behavior parameters (e.g. `["1", "SPACE"]` for `&lt 1 SPACE`)
    pub params: Vec<String>,
    /// Raw source text of the binding
    pub original: String,
}

impl Binding {
    /// Creates a binding from its parts.
    pub fn new(
        behavior: impl Into<String>,
        params: Vec<String>,
        original: impl Into<String>,
    ) -> Self {
        Self {
            behavior: behavior.into(),
            params,
            original: original.into(),
        }
    }

    /// Parses a raw binding string such as `&kp A` or `&lt(NAV, SPACE)`.
    pub fn parse(raw: &str) -> Self {
        crate::parser::binding::parse_binding(raw)
    }

    /// Returns the parameter at `index`, if present.
    #[must_use]
    pub fn param(&self, index: usize) -> Option<&str> {
        self.params.get(index).map(String::as_str)
    }

    /// Transparent or placeholder bindings render as empty keys.
    #[must_use]
    pub fn is_noop(&self) -> bool {
        self.original == TRANSPARENT_MARKER || self.behavior == "trans"
    }

    /// Checks whether this binding is a homerow mod (`&hml` / `&hmr`).
    #[must_use]
    pub fn is_homerow_mod(&self) -> bool {
        HOMEROW_MOD_BEHAVIORS.contains(&self.behavior.as_str())
    }
}

/// Accepted JSON shapes for a binding.
#[derive(Deserialize)]
#[serde(untagged)]
enum BindingSource {
    Structured {
        #[serde(default)]
        behavior: String,
        #[serde(default)]
        params: Vec<String>,
        #[serde(default)]
        original: String,
    },
    Raw(String),
}

impl From<BindingSource> for Binding {
    fn from(source: BindingSource) -> Self {
        match source {
            BindingSource::Structured {
                behavior,
                params,
                original,
            } => Self {
                behavior,
                params,
                original,
            },
            BindingSource::Raw(raw) => Self::parse(&raw),
        }
    }
}

/// Rotary encoder / sensor descriptor.
///
/// Only `ref` is used: a key whose label equals a sensor reference is drawn
/// as an encoder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sensor {
    /// Reference matched against key labels
    #[serde(rename = "ref")]
    pub reference: String,
}

/// The static keymap description consumed by every renderer.
///
/// `keymap` maps a layer name to bindings index-aligned with `layout`;
/// `layer_order` lists layer names with the base layer first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeymapDocument {
    /// Physical key geometry, in key index order
    pub layout: Vec<KeyGeometry>,
    /// Bindings per layer name; `null` entries mean no binding
    pub keymap: HashMap<String, Vec<Option<Binding>>>,
    /// Layer names, base layer first
    pub layer_order: Vec<String>,
    /// Encoder descriptors
    #[serde(default)]
    pub sensors: Vec<Sensor>,
}

impl KeymapDocument {
    /// Name of the base (always active) layer.
    #[must_use]
    pub fn base_layer(&self) -> Option<&str> {
        self.layer_order.first().map(String::as_str)
    }

    /// Position of a layer in `layer_order`.
    #[must_use]
    pub fn layer_index(&self, layer: &str) -> Option<usize> {
        self.layer_order.iter().position(|name| name == layer)
    }

    /// Looks up the binding of key `index` on `layer`.
    ///
    /// Unknown layers, out-of-range indices and `null` entries all yield `None`.
    #[must_use]
    pub fn binding(&self, layer: &str, index: usize) -> Option<&Binding> {
        self.keymap.get(layer)?.get(index)?.as_ref()
    }

    /// True when any layer binds a homerow mod at key `index`.
    #[must_use]
    pub fn is_homerow_mod_key(&self, index: usize) -> bool {
        self.layer_order.iter().any(|layer| {
            self.binding(layer, index)
                .is_some_and(Binding::is_homerow_mod)
        })
    }

    /// True when the key's label matches a sensor reference.
    #[must_use]
    pub fn is_encoder_key(&self, index: usize) -> bool {
        let Some(label) = self.layout.get(index).and_then(|key| key.label.as_deref()) else {
            return false;
        };
        self.sensors.iter().any(|sensor| sensor.reference == label)
    }
}
