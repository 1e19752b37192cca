//! Application-wide constants.
//!
//! This module defines constants used throughout the application,
//! including the application name and the fixed behavior vocabulary
//! recognised in extracted ZMK keymaps.

/// The display name of the application (human-readable, with proper capitalization).
pub const APP_NAME: &str = "ZMK Keymap Viewer";

/// Name of the per-user configuration directory.
pub const CONFIG_DIR_NAME: &str = "ZmkKeymapViewer";

/// Environment variable that overrides the configuration directory.
pub const CONFIG_DIR_ENV: &str = "ZMKVIEW_CONFIG_DIR";

/// Pixels per keyboard unit when rendering keycaps.
pub const DEFAULT_SCALE: f32 = 60.0;

/// Pixels removed from each keycap's width and height to leave a visible gap.
pub const KEYCAP_GAP: f32 = 4.0;

/// Behaviors whose first parameter names the layer they activate.
pub const LAYER_SWITCH_BEHAVIORS: &[&str] = &["mo", "lt", "to", "tog", "hll", "hlr", "lt_spc"];

/// Homerow-mod behaviors (`&hml MOD KEY`, `&hmr MOD KEY`).
pub const HOMEROW_MOD_BEHAVIORS: &[&str] = &["hml", "hmr"];

/// Layer-tap style behaviors that show their tap key (`params[1]`).
pub const LAYER_TAP_BEHAVIORS: &[&str] = &["lt", "hll", "hlr"];

/// Behaviors that show their first parameter (or their own name).
pub const KEYPRESS_BEHAVIORS: &[&str] = &["kp", "bootloader", "sys_reset"];

/// Source marker for a transparent binding.
pub const TRANSPARENT_MARKER: &str = "___";

/// Source marker for a disabled binding.
pub const NONE_MARKER: &str = "XXX";

/// Default layer palette, cycled when a keymap has more layers than colors.
pub const DEFAULT_LAYER_COLORS: &[&str] = &[
    "#8f9bb3", "#4dabf7", "#69db7c", "#ffa94d", "#f783ac", "#b197fc", "#ffd43b", "#63e6be",
];
