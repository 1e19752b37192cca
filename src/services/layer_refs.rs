//! Layer reference tracking and analysis.
//!
//! This module detects layer-switching bindings (`&mo 1`, `&lt NAV SPACE`,
//! `&tog 2`, ...) across a keymap document, enabling features like:
//! - Highlighting the base-layer key that activates each layer
//! - Listing inbound and outbound references per layer
//! - Warning when a non-transparent key sits under a held layer key

use serde::Serialize;
use std::collections::BTreeMap;

use crate::models::{Binding, KeymapDocument};

/// How a binding activates another layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LayerRefKind {
    /// Momentary while held - `&mo`
    Momentary,
    /// Tap for key, hold for layer - `&lt`
    LayerTap,
    /// Switch to layer - `&to`
    SwitchTo,
    /// Toggle layer on/off - `&tog`
    Toggle,
    /// Hold-layer on the left hand - `&hll`
    HoldLayerLeft,
    /// Hold-layer on the right hand - `&hlr`
    HoldLayerRight,
    /// Layer-tap on the space key - `&lt_spc`
    LayerTapSpace,
}

impl LayerRefKind {
    /// Maps a behavior name to its reference kind.
    #[must_use]
    pub fn from_behavior(behavior: &str) -> Option<Self> {
        match behavior {
            "mo" => Some(Self::Momentary),
            "lt" => Some(Self::LayerTap),
            "to" => Some(Self::SwitchTo),
            "tog" => Some(Self::Toggle),
            "hll" => Some(Self::HoldLayerLeft),
            "hlr" => Some(Self::HoldLayerRight),
            "lt_spc" => Some(Self::LayerTapSpace),
            _ => None,
        }
    }

    /// Returns true if the layer is only active while the key is held, so the
    /// key at the same position on the target layer is what gets pressed.
    #[must_use]
    pub const fn is_hold_like(self) -> bool {
        !matches!(self, Self::SwitchTo | Self::Toggle)
    }

    /// Human-readable name.
    #[must_use]
    pub const fn display_name(self) -> &'static str {
        match self {
            Self::Momentary => "Momentary (mo)",
            Self::LayerTap => "Layer-Tap (lt)",
            Self::SwitchTo => "Switch (to)",
            Self::Toggle => "Toggle (tog)",
            Self::HoldLayerLeft => "Hold-Layer Left (hll)",
            Self::HoldLayerRight => "Hold-Layer Right (hlr)",
            Self::LayerTapSpace => "Layer-Tap Space (lt_spc)",
        }
    }
}

/// A reference from one layer to another via a layer-switching binding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LayerRef {
    /// Layer holding the key
    pub from_layer: String,
    /// Layer the key activates
    pub to_layer: String,
    /// Index of the key in the layout
    pub key_index: usize,
    /// Type of layer reference
    pub kind: LayerRefKind,
    /// Source text of the binding (e.g. "&lt NAV SPACE")
    pub binding: String,
}

/// Layer name → index of the base-layer key that activates it.
pub type ActivationIndex = BTreeMap<String, usize>;

/// Resolves a layer parameter against the document's layer order.
///
/// Numeric parameters index `layer_order`; anything else matches a layer
/// name case-insensitively. Returns the canonical layer name.
///
/// # Examples
/// ```
/// use zmk_keymap_viewer::services::layer_refs::resolve_layer_target;
///
/// let order = vec!["Base".to_string(), "Nav".to_string()];
/// assert_eq!(resolve_layer_target("1", &order), Some("Nav"));
/// assert_eq!(resolve_layer_target("NAV", &order), Some("Nav"));
/// assert_eq!(resolve_layer_target("7", &order), None);
/// ```
#[must_use]
pub fn resolve_layer_target<'a>(param: &str, layer_order: &'a [String]) -> Option<&'a str> {
    let param = param.trim();
    if param.is_empty() {
        return None;
    }

    if let Ok(index) = param.parse::<usize>() {
        return layer_order.get(index).map(String::as_str);
    }

    layer_order
        .iter()
        .find(|name| name.eq_ignore_ascii_case(param))
        .map(String::as_str)
}

/// Parses a binding as a layer switch.
///
/// Returns the target layer name and kind, or `None` for other behaviors and
/// for targets that don't exist.
#[must_use]
pub fn parse_layer_binding<'a>(
    binding: &Binding,
    layer_order: &'a [String],
) -> Option<(&'a str, LayerRefKind)> {
    let kind = LayerRefKind::from_behavior(&binding.behavior)?;
    let target = resolve_layer_target(binding.param(0)?, layer_order)?;
    Some((target, kind))
}

/// Builds the activation index from the base layer.
///
/// When several keys activate the same layer the last one wins.
#[must_use]
pub fn build_activation_index(document: &KeymapDocument) -> ActivationIndex {
    let mut index = ActivationIndex::new();
    let Some(base) = document.base_layer() else {
        return index;
    };
    let Some(bindings) = document.keymap.get(base) else {
        return index;
    };

    for (key_index, binding) in bindings.iter().enumerate() {
        let Some(binding) = binding else { continue };
        if let Some((target, _)) = parse_layer_binding(binding, &document.layer_order) {
            index.insert(target.to_string(), key_index);
        }
    }

    index
}

/// Collects every layer reference in the document, in layer order.
#[must_use]
pub fn collect_layer_refs(document: &KeymapDocument) -> Vec<LayerRef> {
    let mut refs = Vec::new();

    for layer in &document.layer_order {
        let Some(bindings) = document.keymap.get(layer) else {
            continue;
        };

        for (key_index, binding) in bindings.iter().enumerate() {
            let Some(binding) = binding else { continue };
            if binding.is_noop() {
                continue;
            }
            if let Some((target, kind)) = parse_layer_binding(binding, &document.layer_order) {
                refs.push(LayerRef {
                    from_layer: layer.clone(),
                    to_layer: target.to_string(),
                    key_index,
                    kind,
                    binding: binding.original.clone(),
                });
            }
        }
    }

    refs
}

/// Builds a reverse index: target layer name → references that activate it.
#[must_use]
pub fn build_layer_ref_index(document: &KeymapDocument) -> BTreeMap<String, Vec<LayerRef>> {
    let mut index: BTreeMap<String, Vec<LayerRef>> = BTreeMap::new();
    for layer_ref in collect_layer_refs(document) {
        index
            .entry(layer_ref.to_layer.clone())
            .or_default()
            .push(layer_ref);
    }
    index
}

/// Finds keys that shadow a held layer key.
///
/// A hold-like reference at key `k` keeps that key pressed while the target
/// layer is active; a non-transparent binding at `k` on the target layer is
/// then unreachable. Returns one warning per such key.
#[must_use]
pub fn find_hold_conflicts(document: &KeymapDocument) -> Vec<String> {
    collect_layer_refs(document)
        .iter()
        .filter(|layer_ref| layer_ref.kind.is_hold_like())
        .filter(|layer_ref| layer_ref.from_layer != layer_ref.to_layer)
        .filter_map(|layer_ref| {
            let binding = document.binding(&layer_ref.to_layer, layer_ref.key_index)?;
            if binding.is_noop() {
                return None;
            }
            Some(format!(
                "Layer '{}' key {} is '{}' but is held by {} from '{}'",
                layer_ref.to_layer,
                layer_ref.key_index,
                binding.original,
                layer_ref.kind.display_name(),
                layer_ref.from_layer
            ))
        })
        .collect()
}

/// Per-layer navigation summary.
#[derive(Debug, Clone, Serialize)]
pub struct LayerNavigation {
    /// Layer name
    pub name: String,
    /// Position in `layer_order`
    pub index: usize,
    /// Base-layer key that activates this layer
    #[serde(skip_serializing_if = "Option::is_none")]
    pub activation_key: Option<usize>,
    /// References from this layer to others
    pub outbound: Vec<LayerRef>,
    /// References from other layers to this one
    pub inbound: Vec<LayerRef>,
}

/// Navigation report for a whole document.
#[derive(Debug, Clone, Serialize)]
pub struct NavigationReport {
    /// One entry per layer, in layer order
    pub layers: Vec<LayerNavigation>,
    /// Shadowed held-layer keys
    pub warnings: Vec<String>,
}

/// Builds the navigation report used by `zmkview layers`.
#[must_use]
pub fn build_navigation_report(document: &KeymapDocument) -> NavigationReport {
    let activation = build_activation_index(document);
    let refs = collect_layer_refs(document);

    let layers = document
        .layer_order
        .iter()
        .enumerate()
        .map(|(index, name)| LayerNavigation {
            name: name.clone(),
            index,
            activation_key: activation.get(name).copied(),
            outbound: refs
                .iter()
                .filter(|r| &r.from_layer == name)
                .cloned()
                .collect(),
            inbound: refs.iter().filter(|r| &r.to_layer == name).cloned().collect(),
        })
        .collect();

    NavigationReport {
        layers,
        warnings: find_hold_conflicts(document),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::KeyGeometry;
    use std::collections::HashMap;

    fn layer(bindings: &[&str]) -> Vec<Option<Binding>> {
        bindings
            .iter()
            .map(|raw| (!raw.is_empty()).then(|| Binding::parse(raw)))
            .collect()
    }

    fn create_test_document(layers: &[(&str, &[&str])]) -> KeymapDocument {
        let key_count = layers.first().map_or(0, |(_, bindings)| bindings.len());
        KeymapDocument {
            layout: (0..key_count)
                .map(|i| KeyGeometry::new(i as f32, 0.0))
                .collect(),
            keymap: layers
                .iter()
                .map(|(name, bindings)| ((*name).to_string(), layer(bindings)))
                .collect::<HashMap<_, _>>(),
            layer_order: layers.iter().map(|(name, _)| (*name).to_string()).collect(),
            sensors: Vec::new(),
        }
    }

    #[test]
    fn test_kind_from_behavior() {
        assert_eq!(LayerRefKind::from_behavior("mo"), Some(LayerRefKind::Momentary));
        assert_eq!(LayerRefKind::from_behavior("lt_spc"), Some(LayerRefKind::LayerTapSpace));
        assert_eq!(LayerRefKind::from_behavior("kp"), None);
        assert!(LayerRefKind::HoldLayerLeft.is_hold_like());
        assert!(!LayerRefKind::Toggle.is_hold_like());

        for behavior in crate::constants::LAYER_SWITCH_BEHAVIORS {
            assert!(LayerRefKind::from_behavior(behavior).is_some(), "{behavior}");
        }
    }

    #[test]
    fn test_resolve_layer_target() {
        let order = vec!["Base".to_string(), "Nav".to_string(), "Sym".to_string()];
        assert_eq!(resolve_layer_target("2", &order), Some("Sym"));
        assert_eq!(resolve_layer_target(" nav ", &order), Some("Nav"));
        assert_eq!(resolve_layer_target("3", &order), None);
        assert_eq!(resolve_layer_target("Fun", &order), None);
        assert_eq!(resolve_layer_target("", &order), None);
    }

    #[test]
    fn test_activation_index_numeric_and_named() {
        let doc = create_test_document(&[
            ("Base", &["&kp A", "&mo 1", "&lt SYM SPACE", "&tog 3"]),
            ("Nav", &["___", "___", "___", "___"]),
            ("Sym", &["___", "___", "___", "___"]),
        ]);

        let index = build_activation_index(&doc);
        assert_eq!(index.get("Nav"), Some(&1));
        assert_eq!(index.get("Sym"), Some(&2));
        // Index 3 is out of range
        assert_eq!(index.len(), 2);
    }

    #[test]
    fn test_activation_index_last_key_wins() {
        let doc = create_test_document(&[
            ("Base", &["&mo 1", "&kp B", "&hlr 1 SPACE"]),
            ("Nav", &["___", "___", "___"]),
        ]);
        assert_eq!(build_activation_index(&doc).get("Nav"), Some(&2));
    }

    #[test]
    fn test_activation_index_ignores_other_layers() {
        let doc = create_test_document(&[
            ("Base", &["&kp A", "&kp B"]),
            ("Nav", &["&mo 0", "&to 1"]),
        ]);
        assert!(build_activation_index(&doc).is_empty());
    }

    #[test]
    fn test_activation_index_skips_missing_params_and_null() {
        let doc = create_test_document(&[("Base", &["&mo", "", "&lt"]), ("Nav", &["", "", ""])]);
        assert!(build_activation_index(&doc).is_empty());
    }

    #[test]
    fn test_layer_ref_index() {
        let doc = create_test_document(&[
            ("Base", &["&mo 1", "&tog 2", "&kp A"]),
            ("Nav", &["___", "&to 0", "&mo 2"]),
            ("Sym", &["___", "___", "___"]),
        ]);

        let index = build_layer_ref_index(&doc);
        assert_eq!(index["Nav"].len(), 1);
        assert_eq!(index["Sym"].len(), 2);
        assert_eq!(index["Base"][0].from_layer, "Nav");
        assert_eq!(index["Base"][0].kind, LayerRefKind::SwitchTo);
        assert_eq!(index["Base"][0].binding, "&to 0");
    }

    #[test]
    fn test_hold_conflicts() {
        let doc = create_test_document(&[
            ("Base", &["&mo 1", "&tog 1", "&kp A"]),
            ("Nav", &["&kp ESC", "&kp TAB", "___"]),
        ]);

        let warnings = find_hold_conflicts(&doc);
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].contains("Layer 'Nav' key 0 is '&kp ESC'"));
        assert!(warnings[0].contains("Momentary (mo)"));
    }

    #[test]
    fn test_navigation_report() {
        let doc = create_test_document(&[
            ("Base", &["&mo 1", "&kp A"]),
            ("Nav", &["___", "&to 0"]),
        ]);

        let report = build_navigation_report(&doc);
        assert_eq!(report.layers.len(), 2);
        assert_eq!(report.layers[0].activation_key, None);
        assert_eq!(report.layers[0].outbound.len(), 1);
        assert_eq!(report.layers[0].inbound.len(), 1);
        assert_eq!(report.layers[1].activation_key, Some(0));
        assert!(report.warnings.is_empty());
    }
}
