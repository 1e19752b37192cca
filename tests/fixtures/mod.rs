//! Shared test fixtures for E2E tests.
#![allow(dead_code)] // Not every test binary uses every fixture

use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use tempfile::TempDir;

/// A small split keyboard: three layers, a homerow mod, a rotated thumb key
/// and an encoder.
///
/// Base key 4 (`&lt 1 SPACE`) activates Nav, key 5 (`&mo 2`) activates Sym.
/// Nav binds `&kp ESC` on key 4, which conflicts with the hold from Base.
pub const TEST_DOCUMENT: &str = r#"{
    "layout": [
        {"x": 0, "y": 0, "label": "Q"},
        {"x": 1, "y": 0},
        {"x": 2, "y": 0},
        {"x": 0, "y": 1},
        {"x": 1, "y": 1.5, "r": 15, "rx": 1, "ry": 1.5, "label": "THUMB"},
        {"x": 2, "y": 1.5, "label": "LEC"}
    ],
    "keymap": {
        "Base": ["&kp Q", "&kp W", "&kp E", "&hml LSHIFT A", "&lt 1 SPACE", "&mo 2"],
        "Nav": ["&kp LEFT", "&kp RIGHT", "&kp LC(RET)", "___", "&kp ESC", "&to 0"],
        "Sym": ["&kp EXCL", "&kp AT", "___", "___", "___", "___"]
    },
    "layer_order": ["Base", "Nav", "Sym"],
    "sensors": [{"ref": "LEC", "type": "encoder"}]
}"#;

/// Writes `content` as `keymap.json` in a fresh temp directory.
///
/// Keep the returned `TempDir` alive for as long as the file is needed.
pub fn write_document(content: &str) -> (PathBuf, TempDir) {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let path = temp_dir.path().join("keymap.json");
    fs::write(&path, content).expect("Failed to write keymap document");
    (path, temp_dir)
}

/// Writes [`TEST_DOCUMENT`] to a temp directory.
pub fn test_document_file() -> (PathBuf, TempDir) {
    write_document(TEST_DOCUMENT)
}

/// Path to the zmkview binary
pub fn zmkview_bin() -> &'static str {
    env!("CARGO_BIN_EXE_zmkview")
}

/// Creates a zmkview command whose configuration lives in `config_dir`.
pub fn zmkview(config_dir: &Path) -> Command {
    let mut cmd = Command::new(zmkview_bin());
    cmd.env("ZMKVIEW_CONFIG_DIR", config_dir);
    cmd.env_remove("RUST_LOG");
    cmd
}

/// Runs zmkview with an isolated, empty configuration directory.
pub fn run_isolated(args: &[&str]) -> std::process::Output {
    let config_dir = TempDir::new().expect("Failed to create temp dir");
    zmkview(config_dir.path())
        .args(args)
        .output()
        .expect("Failed to execute command")
}

/// Asserts the process exited with `code`, showing stderr otherwise.
pub fn assert_exit_code(output: &std::process::Output, code: i32) {
    assert_eq!(
        output.status.code(),
        Some(code),
        "unexpected exit code. stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );
}
