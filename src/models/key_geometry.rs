//! Physical key geometry as found in ZMK/QMK `layout` arrays.

use serde::{Deserialize, Serialize};

/// One key's physical placement in keyboard units (1u = one key width).
///
/// Missing `x`/`y` default to 0 and missing `w`/`h` to 1, matching the
/// QMK/ZMK `info.json` conventions. `rx`/`ry` give the rotation origin in
/// keyboard units; when absent the key rotates around its own center.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeyGeometry {
    /// Left edge in keyboard units
    #[serde(default)]
    pub x: f32,
    /// Top edge in keyboard units
    #[serde(default)]
    pub y: f32,
    /// Width in keyboard units
    #[serde(default = "one", skip_serializing_if = "is_one")]
    pub w: f32,
    /// Height in keyboard units
    #[serde(default = "one", skip_serializing_if = "is_one")]
    pub h: f32,
    /// Rotation in degrees (clockwise)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub r: Option<f32>,
    /// Rotation origin X in keyboard units
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rx: Option<f32>,
    /// Rotation origin Y in keyboard units
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ry: Option<f32>,
    /// Optional key label (used to match encoders and for KLE export)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

const fn one() -> f32 {
    1.0
}

#[allow(clippy::trivially_copy_pass_by_ref, clippy::float_cmp)]
fn is_one(value: &f32) -> bool {
    *value == 1.0
}

impl KeyGeometry {
    /// Creates a 1u key at the given position.
    #[must_use]
    pub const fn new(x: f32, y: f32) -> Self {
        Self {
            x,
            y,
            w: 1.0,
            h: 1.0,
            r: None,
            rx: None,
            ry: None,
            label: None,
        }
    }

    /// Sets the key size.
    #[must_use]
    pub fn with_size(mut self, w: f32, h: f32) -> Self {
        self.w = w;
        self.h = h;
        self
    }

    /// Sets the rotation and optional origin.
    #[must_use]
    pub fn with_rotation(mut self, r: f32, rx: Option<f32>, ry: Option<f32>) -> Self {
        self.r = Some(r);
        self.rx = rx;
        self.ry = ry;
        self
    }

    /// Sets the key label.
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Rotation in degrees, treating `0` the same as absent.
    #[must_use]
    pub fn rotation(&self) -> Option<f32> {
        self.r.filter(|r| r.abs() > f32::EPSILON)
    }
}

/// Axis-aligned extent of a set of keys, ignoring rotation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KeyboardBounds {
    /// Smallest left edge
    pub min_x: f32,
    /// Smallest top edge
    pub min_y: f32,
    /// Largest right edge
    pub max_x: f32,
    /// Largest bottom edge
    pub max_y: f32,
}

impl KeyboardBounds {
    /// Computes the bounds of `keys`. An empty layout yields all-zero bounds.
    #[must_use]
    pub fn of(keys: &[KeyGeometry]) -> Self {
        if keys.is_empty() {
            return Self {
                min_x: 0.0,
                min_y: 0.0,
                max_x: 0.0,
                max_y: 0.0,
            };
        }

        keys.iter().fold(
            Self {
                min_x: f32::INFINITY,
                min_y: f32::INFINITY,
                max_x: f32::NEG_INFINITY,
                max_y: f32::NEG_INFINITY,
            },
            |bounds, key| Self {
                min_x: bounds.min_x.min(key.x),
                min_y: bounds.min_y.min(key.y),
                max_x: bounds.max_x.max(key.x + key.w),
                max_y: bounds.max_y.max(key.y + key.h),
            },
        )
    }

    /// Width in keyboard units.
    #[must_use]
    pub fn width(&self) -> f32 {
        self.max_x - self.min_x
    }

    /// Height in keyboard units.
    #[must_use]
    pub fn height(&self) -> f32 {
        self.max_y - self.min_y
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_when_deserializing() {
        let key: KeyGeometry = serde_json::from_str(r#"{"x": 2}"#).unwrap();
        assert_eq!(key, KeyGeometry::new(2.0, 0.0));
    }

    #[test]
    fn test_unknown_fields_ignored() {
        let key: KeyGeometry =
            serde_json::from_str(r#"{"x": 1, "y": 2, "matrix": [0, 1], "label": "LEC"}"#).unwrap();
        assert_eq!(key.label.as_deref(), Some("LEC"));
    }

    #[test]
    fn test_zero_rotation_is_none() {
        assert_eq!(KeyGeometry::new(0.0, 0.0).with_rotation(0.0, None, None).rotation(), None);
        assert_eq!(
            KeyGeometry::new(0.0, 0.0).with_rotation(15.0, None, None).rotation(),
            Some(15.0)
        );
    }

    #[test]
    fn test_bounds() {
        let keys = vec![
            KeyGeometry::new(1.0, 0.5),
            KeyGeometry::new(3.0, 2.0).with_size(1.5, 2.0),
        ];
        let bounds = KeyboardBounds::of(&keys);
        assert!((bounds.min_x - 1.0).abs() < f32::EPSILON);
        assert!((bounds.min_y - 0.5).abs() < f32::EPSILON);
        assert!((bounds.width() - 3.5).abs() < f32::EPSILON);
        assert!((bounds.height() - 3.5).abs() < f32::EPSILON);
    }

    #[test]
    fn test_bounds_empty() {
        let bounds = KeyboardBounds::of(&[]);
        assert!(bounds.width().abs() < f32::EPSILON);
    }
}
