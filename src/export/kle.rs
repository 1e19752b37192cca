//! keyboard-layout-editor.com (KLE) JSON export.
//!
//! Keys are grouped into rows: a new row starts whenever a key's `y` moves
//! more than half a unit away from the current row's `y`. Each key becomes a
//! property object followed by its legend string.

use anyhow::{bail, Result};
use serde_json::{json, Map, Value};

use super::keyboard_renderer::key_label;
use crate::keycode_db::KeycodeDb;
use crate::models::{KeyGeometry, KeymapDocument};

/// Vertical distance that starts a new KLE row.
const ROW_BREAK_THRESHOLD: f32 = 0.5;

/// Exports the layout as KLE rows.
///
/// Without a layer the legends are the layout's own key labels. With a layer
/// they are the resolved text of that layer's bindings, and a `{"name": ..}`
/// metadata object leads the array.
pub fn export_kle(document: &KeymapDocument, layer: Option<&str>, db: &KeycodeDb) -> Result<Value> {
    if let Some(layer) = layer {
        if document.layer_index(layer).is_none() {
            bail!(
                "Unknown layer '{layer}'. Available layers: {}",
                document.layer_order.join(", ")
            );
        }
    }

    let mut rows: Vec<Value> = Vec::new();
    if let Some(layer) = layer {
        rows.push(json!({ "name": layer }));
    }

    let mut row: Vec<Value> = Vec::new();
    let mut row_y: Option<f32> = None;

    for (index, key) in document.layout.iter().enumerate() {
        let current_y = match row_y {
            Some(y) if (key.y - y).abs() > ROW_BREAK_THRESHOLD => {
                rows.push(Value::Array(std::mem::take(&mut row)));
                key.y
            }
            Some(y) => y,
            None => key.y,
        };
        row_y = Some(current_y);

        row.push(key_properties(key, current_y));
        row.push(Value::String(legend(document, layer, index, key, db)));
    }

    if !row.is_empty() {
        rows.push(Value::Array(row));
    }

    Ok(Value::Array(rows))
}

fn key_properties(key: &KeyGeometry, row_y: f32) -> Value {
    let mut props = Map::new();
    props.insert("x".into(), number(key.x));
    props.insert("y".into(), number(key.y - row_y));
    for (name, value) in [("r", key.r), ("rx", key.rx), ("ry", key.ry)] {
        if let Some(value) = value {
            props.insert(name.into(), number(value));
        }
    }
    Value::Object(props)
}

fn legend(
    document: &KeymapDocument,
    layer: Option<&str>,
    index: usize,
    key: &KeyGeometry,
    db: &KeycodeDb,
) -> String {
    match layer {
        None => key.label.clone().unwrap_or_default(),
        Some(layer) => document
            .binding(layer, index)
            .filter(|binding| !binding.is_noop())
            .and_then(|binding| key_label(binding).primary())
            .map(|keycode| db.normalize(keycode).text)
            .unwrap_or_default(),
    }
}

/// Converts to a JSON number, rounded to 4 decimals to hide f32 noise.
fn number(value: f32) -> Value {
    let rounded = (f64::from(value) * 10_000.0).round() / 10_000.0;
    json!(rounded)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_document;

    fn create_test_document() -> KeymapDocument {
        parse_document(
            r#"{
                "layout": [
                    {"x": 0, "y": 0, "label": "Q"},
                    {"x": 1, "y": 0.25, "label": "W"},
                    {"x": 0, "y": 1, "label": "A"},
                    {"x": 4, "y": 2, "r": 15, "rx": 4, "ry": 2, "label": "THUMB"}
                ],
                "keymap": {
                    "Base": ["&kp Q", "&kp W", "___", "&mo 1"],
                    "Nav": ["&kp LEFT", null, "&kp ESC", "___"]
                },
                "layer_order": ["Base", "Nav"]
            }"#,
        )
        .unwrap()
    }

    #[test]
    fn test_rows_break_on_vertical_jump() {
        let doc = create_test_document();
        let db = KeycodeDb::load().unwrap();
        let kle = export_kle(&doc, None, &db).unwrap();

        let rows = kle.as_array().unwrap();
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0], json!([{"x": 0.0, "y": 0.0}, "Q", {"x": 1.0, "y": 0.25}, "W"]));
        assert_eq!(rows[1], json!([{"x": 0.0, "y": 0.0}, "A"]));
        assert_eq!(
            rows[2],
            json!([{"x": 4.0, "y": 0.0, "r": 15.0, "rx": 4.0, "ry": 2.0}, "THUMB"])
        );
    }

    #[test]
    fn test_layer_legends() {
        let doc = create_test_document();
        let db = KeycodeDb::load().unwrap();
        let kle = export_kle(&doc, Some("Nav"), &db).unwrap();

        let rows = kle.as_array().unwrap();
        assert_eq!(rows[0], json!({"name": "Nav"}));
        assert_eq!(rows[1][3], json!(""));
        assert_eq!(rows[2][1], db.normalize("ESC").text);
        assert_eq!(rows[3][1], json!(""));
        assert_eq!(rows[1][1], db.normalize("LEFT").text);
    }

    #[test]
    fn test_unknown_layer() {
        let doc = create_test_document();
        let db = KeycodeDb::load().unwrap();
        assert!(export_kle(&doc, Some("Gaming"), &db).is_err());
    }

    #[test]
    fn test_empty_layout() {
        let doc = parse_document(r#"{"layout": [], "keymap": {"Base": []}, "layer_order": ["Base"]}"#).unwrap();
        let db = KeycodeDb::load().unwrap();
        assert_eq!(export_kle(&doc, None, &db).unwrap(), json!([]));
    }
}
