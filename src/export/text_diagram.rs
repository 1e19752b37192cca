//! Terminal keyboard diagram.
//!
//! Draws one layer with box-drawing characters. Each keyboard unit is 8
//! columns wide and 3 lines tall; rotation is ignored.

use anyhow::{bail, Result};
use std::fmt::Write as _;

use super::keyboard_renderer::key_label;
use crate::keycode_db::KeycodeDb;
use crate::models::{KeyGeometry, KeyboardBounds, KeymapDocument};

/// Character columns per keyboard unit.
const COLS_PER_UNIT: f32 = 8.0;
/// Text lines per keyboard unit.
const ROWS_PER_UNIT: f32 = 3.0;

/// Renders one layer as a box-drawing diagram.
///
/// # Example
///
/// ```text
/// Layer 0: Base
/// ┌──────┐┌──────┐┌──────┐
/// │  Q   ││  W   ││  E   │
/// └──────┘└──────┘└──────┘
/// ```
pub fn render_text_diagram(document: &KeymapDocument, layer: &str, db: &KeycodeDb) -> Result<String> {
    let Some(layer_index) = document.layer_index(layer) else {
        bail!(
            "Unknown layer '{layer}'. Available layers: {}",
            document.layer_order.join(", ")
        );
    };

    let bounds = KeyboardBounds::of(&document.layout);
    let boxes: Vec<KeyBox> = document
        .layout
        .iter()
        .enumerate()
        .map(|(index, key)| {
            let label = document
                .binding(layer, index)
                .filter(|binding| !binding.is_noop())
                .and_then(|binding| key_label(binding).primary())
                .map(|keycode| db.normalize(keycode).text)
                .unwrap_or_default();
            KeyBox::place(key, &bounds, label)
        })
        .collect();

    let mut output = String::new();
    let _ = writeln!(output, "Layer {layer_index}: {layer}");
    output.push_str(&render_grid(&boxes));
    Ok(output)
}

/// A key placed on the character grid.
#[derive(Debug, Clone, PartialEq, Eq)]
struct KeyBox {
    row: usize,
    col: usize,
    width: usize,
    height: usize,
    label: String,
}

impl KeyBox {
    fn place(key: &KeyGeometry, bounds: &KeyboardBounds, label: String) -> Self {
        Self {
            row: to_cells(key.y - bounds.min_y, ROWS_PER_UNIT),
            col: to_cells(key.x - bounds.min_x, COLS_PER_UNIT),
            width: to_cells(key.w, COLS_PER_UNIT).max(4),
            height: to_cells(key.h, ROWS_PER_UNIT).max(3),
            label,
        }
    }
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn to_cells(units: f32, per_unit: f32) -> usize {
    (units * per_unit).round().max(0.0) as usize
}

/// Renders the boxes into a string, trimming trailing spaces on each line.
fn render_grid(boxes: &[KeyBox]) -> String {
    let width = boxes.iter().map(|b| b.col + b.width).max().unwrap_or(0);
    let height = boxes.iter().map(|b| b.row + b.height).max().unwrap_or(0);

    let mut buffer = vec![vec![' '; width]; height];
    for key in boxes {
        render_key_box(&mut buffer, key);
    }

    let mut output = String::new();
    for row in &buffer {
        let line: String = row.iter().collect();
        output.push_str(line.trim_end());
        output.push('\n');
    }
    output
}

/// Draws one key box. Later boxes overwrite earlier ones where they overlap.
fn render_key_box(buffer: &mut [Vec<char>], key: &KeyBox) {
    let (top, left) = (key.row, key.col);
    let bottom = top + key.height - 1;
    let right = left + key.width - 1;

    for col in left..=right {
        buffer[top][col] = '─';
        buffer[bottom][col] = '─';
    }
    for row in top..=bottom {
        buffer[row][left] = '│';
        buffer[row][right] = '│';
    }
    buffer[top][left] = '┌';
    buffer[top][right] = '┐';
    buffer[bottom][left] = '└';
    buffer[bottom][right] = '┘';

    // Clear the interior so overlapping boxes don't bleed through
    for row in buffer.iter_mut().take(bottom).skip(top + 1) {
        for cell in row.iter_mut().take(right).skip(left + 1) {
            *cell = ' ';
        }
    }

    let middle = top + key.height / 2;
    write_centered_text(&mut buffer[middle][left + 1..right], &key.label);
}

/// Writes `text` centered in `cells`, truncating when it doesn't fit.
fn write_centered_text(cells: &mut [char], text: &str) {
    let chars: Vec<char> = text.chars().take(cells.len()).collect();
    let start = (cells.len() - chars.len()) / 2;
    cells[start..start + chars.len()].copy_from_slice(&chars);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_document;

    fn create_test_document() -> KeymapDocument {
        parse_document(
            r#"{
                "layout": [
                    {"x": 0, "y": 0}, {"x": 1, "y": 0}, {"x": 2, "y": 0, "r": 30},
                    {"x": 0, "y": 1, "w": 2}
                ],
                "keymap": {
                    "Base": ["&kp Q", "&hml LSHIFT W", "___", "&kp SPACEBAR_IS_LONG"],
                    "Nav": [null, null, null, null]
                },
                "layer_order": ["Base", "Nav"]
            }"#,
        )
        .unwrap()
    }

    #[test]
    fn test_render_text_diagram() {
        let doc = create_test_document();
        let db = KeycodeDb::load().unwrap();
        let output = render_text_diagram(&doc, "Base", &db).unwrap();

        let lines: Vec<&str> = output.lines().collect();
        assert_eq!(lines[0], "Layer 0: Base");
        assert_eq!(lines[1], "┌──────┐┌──────┐┌──────┐");
        assert_eq!(lines[2], "│  Q   ││  W   ││      │");
        assert_eq!(lines[3], "└──────┘└──────┘└──────┘");
        assert_eq!(lines[4], "┌──────────────┐");
        assert_eq!(lines[5], "│SPACEBAR_IS_LO│");
        assert_eq!(lines.len(), 7);
    }

    #[test]
    fn test_empty_layer_draws_empty_boxes() {
        let doc = create_test_document();
        let db = KeycodeDb::load().unwrap();
        let output = render_text_diagram(&doc, "Nav", &db).unwrap();
        assert!(output.contains("│      ││      ││      │"));
    }

    #[test]
    fn test_unknown_layer() {
        let doc = create_test_document();
        let db = KeycodeDb::load().unwrap();
        let err = render_text_diagram(&doc, "Gaming", &db).unwrap_err();
        assert!(err.to_string().contains("Available layers: Base, Nav"));
    }

    #[test]
    fn test_write_centered_text_truncates() {
        let mut cells = vec![' '; 4];
        write_centered_text(&mut cells, "abcdef");
        assert_eq!(cells.iter().collect::<String>(), "abcd");

        let mut cells = vec![' '; 5];
        write_centered_text(&mut cells, "ab");
        assert_eq!(cells.iter().collect::<String>(), " ab  ");
    }
}
